#![forbid(unsafe_code)]

//! Theme and style-sheet descriptor types for Lacquer.
//!
//! # Role in Lacquer
//! `lacquer-style` is the shared vocabulary for themes and rules. The
//! renderer and registry crates consume these types; nothing here touches a
//! backend or keeps registry state.
//!
//! # This crate provides
//! - [`Theme`] / [`ThemeBuilder`] for opaque key/value theme bags, including
//!   per-sheet rule overrides.
//! - [`identity`] for stable, content-addressed theme identity.
//! - [`RuleSet`] / [`Rule`] for insertion-ordered CSS-like rules.
//! - [`StyleSheet`] descriptors: named rule producers over a theme, with
//!   optional local-theme derivation.
//!
//! # How it fits in the system
//! A registry asks a [`StyleSheet`] to produce rules from the current theme,
//! keys its cache on `(name, identity(custom theme))`, and hands the rules
//! to a renderer. This crate keeps that pipeline deterministic: themes hash
//! canonically and rule order is author order.

/// Stable theme identity digests.
pub mod identity;
/// Rule sets and declaration blocks.
pub mod rules;
/// Style-sheet descriptors.
pub mod sheet;
/// Theme values and builder.
pub mod theme;

pub use identity::{ThemeId, identity};
pub use rules::{Declarations, Rule, RuleSet, decl_block, merge_declarations};
pub use sheet::{RuleProducer, SheetOptions, StyleSheet, ThemeDeriver};
pub use theme::{Theme, ThemeBuilder};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn descriptor_identity_feeds_cache_keys() {
        let theme = Theme::builder().set("color", "red").build();
        let custom = Theme::builder().set("color", "purple").build();
        let sheet = StyleSheet::computed("button", |theme| {
            RuleSet::new().with_rule(
                "root",
                decl_block(json!({"color": theme.str_value("color").unwrap_or("black")})),
            )
        })
        .shared();

        // End to end through the public surface: descriptor + identity give
        // everything a registry needs to form its composite key.
        let key_plain = (sheet.name().to_string(), None::<ThemeId>);
        let key_custom = (sheet.name().to_string(), Some(identity(&custom)));
        assert_ne!(key_plain, key_custom);

        let rules = sheet.produce_rules(&theme, None);
        assert_eq!(rules.len(), 1);
    }
}
