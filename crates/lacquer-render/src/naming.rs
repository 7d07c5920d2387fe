//! Class-name generation strategies.
//!
//! The naming policy lives on the renderer, not the registry: the registry's
//! only obligation is supplying a meta tag per resource. The counter
//! strategy gives compact, human-scannable names for a live client; the
//! hashed strategy gives names that are stable across processes, which is
//! what server-rendered output needs so a hydrating client regenerates the
//! same names.

/// Digest length for hashed class names.
const HASH_HEX_LEN: usize = 10;

/// Per-rule context handed to a naming strategy.
#[derive(Debug, Clone, Copy)]
pub struct NameContext<'a> {
    /// Name of the sheet the rule belongs to (may be empty).
    pub sheet_name: &'a str,
    /// The resource's meta tag (`name` or `name-<custom theme id>`).
    pub meta: &'a str,
}

enum Strategy {
    Counter { next: u32 },
    Hashed,
    Custom(Box<dyn FnMut(&str, &NameContext<'_>) -> String>),
}

/// A class-name generation policy.
pub struct NamingStrategy {
    strategy: Strategy,
}

impl NamingStrategy {
    /// Monotonic counter names: `{sheet}-{rule}-lq-{n}`. The default.
    pub fn counter() -> Self {
        Self {
            strategy: Strategy::Counter { next: 0 },
        }
    }

    /// Digest names: `{sheet}-{rule}-{digest(meta, rule)}`. Deterministic
    /// across processes; use for server-side rendering.
    pub fn hashed() -> Self {
        Self {
            strategy: Strategy::Hashed,
        }
    }

    /// Bring your own policy.
    pub fn custom(generate: impl FnMut(&str, &NameContext<'_>) -> String + 'static) -> Self {
        Self {
            strategy: Strategy::Custom(Box::new(generate)),
        }
    }

    /// Generate the class name for one rule.
    pub fn class_name(&mut self, rule: &str, ctx: &NameContext<'_>) -> String {
        match &mut self.strategy {
            Strategy::Counter { next } => {
                *next += 1;
                if ctx.sheet_name.is_empty() {
                    format!("{rule}-lq-{next}")
                } else {
                    format!("{}-{rule}-lq-{next}", ctx.sheet_name)
                }
            }
            Strategy::Hashed => {
                let mut hasher = blake3::Hasher::new();
                hasher.update(ctx.meta.as_bytes());
                hasher.update(&[0]);
                hasher.update(rule.as_bytes());
                let hex = hasher.finalize().to_hex();
                let digest = &hex[..HASH_HEX_LEN];
                if ctx.sheet_name.is_empty() {
                    format!("{rule}-{digest}")
                } else {
                    format!("{}-{rule}-{digest}", ctx.sheet_name)
                }
            }
            Strategy::Custom(generate) => generate(rule, ctx),
        }
    }
}

impl Default for NamingStrategy {
    fn default() -> Self {
        Self::counter()
    }
}

impl std::fmt::Debug for NamingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.strategy {
            Strategy::Counter { .. } => "counter",
            Strategy::Hashed => "hashed",
            Strategy::Custom(_) => "custom",
        };
        f.debug_tuple("NamingStrategy").field(&kind).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(sheet: &'a str, meta: &'a str) -> NameContext<'a> {
        NameContext {
            sheet_name: sheet,
            meta,
        }
    }

    #[test]
    fn counter_names_are_sequential() {
        let mut naming = NamingStrategy::counter();
        assert_eq!(
            naming.class_name("root", &ctx("button", "button")),
            "button-root-lq-1"
        );
        assert_eq!(
            naming.class_name("label", &ctx("button", "button")),
            "button-label-lq-2"
        );
        assert_eq!(
            naming.class_name("root", &ctx("icon", "icon")),
            "icon-root-lq-3"
        );
    }

    #[test]
    fn counter_without_sheet_name() {
        let mut naming = NamingStrategy::counter();
        assert_eq!(naming.class_name("root", &ctx("", "")), "root-lq-1");
    }

    #[test]
    fn hashed_names_are_stable() {
        let mut a = NamingStrategy::hashed();
        let mut b = NamingStrategy::hashed();
        let name_a = a.class_name("root", &ctx("button", "button-ff00"));
        let name_b = b.class_name("root", &ctx("button", "button-ff00"));
        assert_eq!(name_a, name_b);
        assert!(name_a.starts_with("button-root-"));
    }

    #[test]
    fn hashed_names_vary_with_meta() {
        let mut naming = NamingStrategy::hashed();
        let plain = naming.class_name("root", &ctx("button", "button"));
        let custom = naming.class_name("root", &ctx("button", "button-ff00"));
        assert_ne!(plain, custom);
    }

    #[test]
    fn hashed_names_vary_with_rule() {
        let mut naming = NamingStrategy::hashed();
        let root = naming.class_name("root", &ctx("button", "button"));
        let label = naming.class_name("label", &ctx("button", "button"));
        assert_ne!(root, label);
    }

    #[test]
    fn custom_strategy_is_called() {
        let mut naming = NamingStrategy::custom(|rule, ctx| format!("x-{}-{rule}", ctx.meta));
        assert_eq!(
            naming.class_name("root", &ctx("button", "button-1")),
            "x-button-1-root"
        );
    }

    #[test]
    fn default_is_counter() {
        let mut naming = NamingStrategy::default();
        assert_eq!(
            naming.class_name("root", &ctx("button", "button")),
            "button-root-lq-1"
        );
    }

    mod property {
        use super::*;
        use proptest::prelude::*;
        use std::collections::HashSet;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(256))]

            /// Counter names never collide, whatever the inputs.
            #[test]
            fn counter_names_are_unique(
                calls in proptest::collection::vec(("[a-z]{0,8}", "[a-z]{1,8}"), 1..32),
            ) {
                let mut naming = NamingStrategy::counter();
                let mut seen = HashSet::new();
                for (sheet, rule) in &calls {
                    let name = naming.class_name(rule, &ctx(sheet, sheet));
                    prop_assert!(seen.insert(name));
                }
            }

            /// Hashed names depend only on meta and rule, not on call order.
            #[test]
            fn hashed_names_are_order_independent(
                calls in proptest::collection::vec(("[a-z]{1,8}", "[a-z]{1,8}"), 1..16),
            ) {
                let mut forward = NamingStrategy::hashed();
                let mut names: Vec<String> = calls
                    .iter()
                    .map(|(meta, rule)| forward.class_name(rule, &ctx("", meta)))
                    .collect();

                let mut backward = NamingStrategy::hashed();
                let mut reversed: Vec<String> = calls
                    .iter()
                    .rev()
                    .map(|(meta, rule)| backward.class_name(rule, &ctx("", meta)))
                    .collect();

                names.sort();
                reversed.sort();
                prop_assert_eq!(names, reversed);
            }
        }
    }
}
