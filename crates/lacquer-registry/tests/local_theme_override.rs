//! Integration tests for local-theme derivation: a sheet reshapes the
//! global theme through a registered deriver, and per-render custom themes
//! merge over the derived values.

use std::rc::Rc;

use lacquer_registry::StyleRegistry;
use lacquer_render::MemoryRenderer;
use lacquer_style::{RuleSet, StyleSheet, Theme, decl_block};
use serde_json::{Value, json};

fn global_theme(primary: &str, font_size: i64) -> Theme {
    Theme::builder()
        .set("palette", json!({ "primary": primary }))
        .set("typography", json!({ "fontSize": font_size }))
        .build()
}

/// A sheet whose producer only understands the flat local shape its
/// deriver builds out of the nested global theme.
fn paper() -> Rc<StyleSheet> {
    let sheet = StyleSheet::computed("paper", |local| {
        RuleSet::new().with_rule(
            "root",
            decl_block(json!({
                "color": local.str_value("color").unwrap_or("black"),
                "fontSize": local.number_value("fontSize").unwrap_or(10.0),
            })),
        )
    })
    .shared();
    sheet.register_local_theme(|global| {
        Theme::builder()
            .set(
                "color",
                global
                    .get("palette")
                    .and_then(|palette| palette.get("primary"))
                    .and_then(Value::as_str)
                    .unwrap_or("black"),
            )
            .set(
                "fontSize",
                global
                    .get("typography")
                    .and_then(|typography| typography.get("fontSize"))
                    .and_then(Value::as_i64)
                    .unwrap_or(10),
            )
            .build()
    });
    sheet
}

fn registry_with(theme: Theme) -> StyleRegistry {
    let mut registry = StyleRegistry::with_renderer(MemoryRenderer::new());
    registry.replace_theme(theme);
    registry
}

#[test]
fn deriver_feeds_the_producer() {
    let mut registry = registry_with(global_theme("red", 12));
    registry.render(&paper(), None).unwrap();
    assert_eq!(
        registry.sheets_to_string(),
        ".paper-root-lq-1 {\n  color: red;\n  font-size: 12px;\n}"
    );
}

#[test]
fn custom_theme_overrides_derived_values() {
    let mut registry = registry_with(global_theme("red", 12));
    let paper = paper();
    registry.render(&paper, None).unwrap();

    let custom = Theme::builder().set("color", "green").build();
    registry.render(&paper, Some(&custom)).unwrap();

    assert_eq!(registry.len(), 2, "custom render must not evict the global one");
    assert_eq!(
        registry.sheets_to_string(),
        ".paper-root-lq-1 {\n  color: red;\n  font-size: 12px;\n}\n\
         .paper-root-lq-2 {\n  color: green;\n  font-size: 12px;\n}"
    );
}

#[test]
fn theme_update_reflows_derived_and_custom_renders() {
    let mut registry = registry_with(global_theme("red", 12));
    let paper = paper();
    let custom = Theme::builder().set("color", "green").build();
    registry.render(&paper, None).unwrap();
    registry.render(&paper, Some(&custom)).unwrap();

    registry.update_theme(global_theme("blue", 14)).unwrap();
    assert_eq!(
        registry.sheets_to_string(),
        ".paper-root-lq-3 {\n  color: blue;\n  font-size: 14px;\n}\n\
         .paper-root-lq-4 {\n  color: green;\n  font-size: 14px;\n}"
    );
}

#[test]
fn deriver_changes_apply_on_the_next_rerender() {
    let mut registry = registry_with(global_theme("red", 12));
    let paper = paper();
    registry.render(&paper, None).unwrap();

    paper.register_local_theme(|_global| {
        Theme::builder().set("color", "orange").set("fontSize", 9).build()
    });
    assert_eq!(
        registry.sheets_to_string(),
        ".paper-root-lq-1 {\n  color: red;\n  font-size: 12px;\n}",
        "a new deriver must not retroactively change mounted output"
    );

    registry.rerender().unwrap();
    assert_eq!(
        registry.sheets_to_string(),
        ".paper-root-lq-2 {\n  color: orange;\n  font-size: 9px;\n}"
    );
}
