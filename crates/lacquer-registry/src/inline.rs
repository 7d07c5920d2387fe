//! Inline-style preparation hook.

use lacquer_style::Declarations;

/// Transform applied to inline declaration blocks before they are returned
/// to the caller. Deployments that need vendor prefixing or value rewriting
/// plug it in through
/// [`RegistryOptions::inline_transform`](crate::RegistryOptions::inline_transform);
/// when unconfigured, declarations pass through untouched.
pub type InlineTransform = Box<dyn Fn(&mut Declarations)>;

pub(crate) fn apply(transform: Option<&InlineTransform>, declarations: &mut Declarations) {
    if let Some(transform) = transform {
        transform(declarations);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lacquer_style::decl_block;
    use serde_json::json;

    #[test]
    fn no_transform_leaves_declarations_untouched() {
        let mut block = decl_block(json!({"color": "red"}));
        let before = block.clone();
        apply(None, &mut block);
        assert_eq!(block, before);
    }

    #[test]
    fn transform_rewrites_in_place() {
        let transform: InlineTransform = Box::new(|declarations| {
            if let Some(value) = declarations.remove("transform") {
                declarations.insert("WebkitTransform".to_string(), value.clone());
                declarations.insert("transform".to_string(), value);
            }
        });
        let mut block = decl_block(json!({"transform": "scale(2)"}));
        apply(Some(&transform), &mut block);
        assert_eq!(block, decl_block(json!({
            "transform": "scale(2)",
            "WebkitTransform": "scale(2)",
        })));
    }
}
