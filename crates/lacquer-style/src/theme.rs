//! Theme values: opaque key/value bags consumed by rule producers.
//!
//! A [`Theme`] is a JSON object wrapper. The registry and descriptors treat
//! it as a value: nothing in this workspace mutates a caller-supplied theme.
//! Custom themes (per-render overrides) are plain `Theme` values that get
//! shallow-merged over a descriptor's derived local theme.

use serde_json::{Map, Value};

use crate::rules::Declarations;

/// Reserved top-level key holding per-sheet rule overrides.
const OVERRIDES_KEY: &str = "overrides";

/// An opaque mapping of arbitrary keys to JSON values.
///
/// Keys iterate in sorted order (the underlying map is ordered), which keeps
/// serialization canonical; [`identity`](crate::identity::identity) relies
/// on that.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Theme {
    values: Map<String, Value>,
}

impl Theme {
    /// Create an empty theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a theme.
    pub fn builder() -> ThemeBuilder {
        ThemeBuilder::new()
    }

    /// Wrap an existing JSON object.
    pub fn from_object(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Look up a string value by key.
    pub fn str_value(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Look up a numeric value by key.
    pub fn number_value(&self, key: &str) -> Option<f64> {
        self.values.get(key).and_then(Value::as_f64)
    }

    /// The underlying key/value map.
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the theme carries no keys at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Shallow-merge `overlay` on top of this theme, returning the result.
    ///
    /// Overlay keys win on conflict; merging is top-level only (nested
    /// objects are replaced wholesale, not merged).
    #[must_use]
    pub fn merged_with(&self, overlay: &Theme) -> Theme {
        let mut values = self.values.clone();
        for (key, value) in &overlay.values {
            values.insert(key.clone(), value.clone());
        }
        Theme { values }
    }

    /// Per-sheet rule overrides declared by this theme, if any.
    ///
    /// A theme may carry `overrides: { <sheet name>: { <rule name>:
    /// <declarations> } }`; descriptors merge the matching block into their
    /// produced rules.
    pub fn overrides_for(&self, sheet_name: &str) -> Option<&Map<String, Value>> {
        self.values
            .get(OVERRIDES_KEY)?
            .as_object()?
            .get(sheet_name)?
            .as_object()
    }
}

/// Fluent [`Theme`] construction.
#[derive(Debug, Clone, Default)]
pub struct ThemeBuilder {
    values: Map<String, Value>,
}

impl ThemeBuilder {
    /// Start from an empty theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing theme's values.
    pub fn from_theme(theme: Theme) -> Self {
        Self {
            values: theme.values,
        }
    }

    /// Set a top-level key.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Declare a rule override for a sheet: `overrides[sheet][rule] = block`.
    ///
    /// Repeated calls accumulate; the last block for a `(sheet, rule)` pair
    /// wins.
    #[must_use]
    pub fn override_rule(
        mut self,
        sheet: impl Into<String>,
        rule: impl Into<String>,
        block: Declarations,
    ) -> Self {
        let overrides = self
            .values
            .entry(OVERRIDES_KEY.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Some(overrides) = overrides.as_object_mut() {
            let sheet_block = overrides
                .entry(sheet.into())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Some(sheet_block) = sheet_block.as_object_mut() {
                sheet_block.insert(rule.into(), Value::Object(block));
            }
        }
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> Theme {
        Theme {
            values: self.values,
        }
    }
}
