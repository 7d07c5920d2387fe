//! Stable theme identity.
//!
//! [`identity`] computes a content digest for a [`Theme`]: the same content
//! always produces the same [`ThemeId`], within a process and across
//! processes. Identity strings end up in resource meta tags, so a server and
//! a hydrating client must agree on them, which rules out randomized or
//! pointer-based schemes. Themes are never mutated to carry their own id;
//! callers that need memoization hold the id next to the theme.

use std::fmt;

use serde_json::Value;

use crate::theme::Theme;

/// Hex digest length kept in a [`ThemeId`].
///
/// 64 bits of BLAKE3 output: short enough for readable class names and meta
/// tags, wide enough that distinct themes do not collide in practice.
const ID_HEX_LEN: usize = 16;

// Type tags fed to the hasher so that e.g. the string "1" and the number 1
// never hash alike.
const TAG_NULL: u8 = 0;
const TAG_BOOL: u8 = 1;
const TAG_INT: u8 = 2;
const TAG_FLOAT: u8 = 3;
const TAG_STRING: u8 = 4;
const TAG_ARRAY: u8 = 5;
const TAG_OBJECT: u8 = 6;

/// Stable identity string for a theme's content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ThemeId(String);

impl ThemeId {
    /// The identity as a hex string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the identity of a theme.
///
/// Pure: equal content yields equal ids regardless of how the theme was
/// built, and the theme itself is untouched. Top-level keys hash in map
/// order, which is sorted, so insertion order never leaks into the id.
pub fn identity(theme: &Theme) -> ThemeId {
    let mut hasher = blake3::Hasher::new();
    hash_map(&mut hasher, theme.values());
    let hex = hasher.finalize().to_hex();
    ThemeId(hex[..ID_HEX_LEN].to_string())
}

fn hash_map(hasher: &mut blake3::Hasher, map: &serde_json::Map<String, Value>) {
    hasher.update(&[TAG_OBJECT]);
    hasher.update(&(map.len() as u64).to_le_bytes());
    for (key, value) in map {
        hasher.update(&(key.len() as u64).to_le_bytes());
        hasher.update(key.as_bytes());
        hash_value(hasher, value);
    }
}

fn hash_value(hasher: &mut blake3::Hasher, value: &Value) {
    match value {
        Value::Null => {
            hasher.update(&[TAG_NULL]);
        }
        Value::Bool(b) => {
            hasher.update(&[TAG_BOOL, u8::from(*b)]);
        }
        Value::Number(n) => {
            // Integers hash by value (widened so the signed and unsigned
            // ranges cannot alias); everything else hashes by IEEE bits.
            if let Some(i) = n.as_i64() {
                hasher.update(&[TAG_INT]);
                hasher.update(&i128::from(i).to_le_bytes());
            } else if let Some(u) = n.as_u64() {
                hasher.update(&[TAG_INT]);
                hasher.update(&i128::from(u).to_le_bytes());
            } else {
                hasher.update(&[TAG_FLOAT]);
                hasher.update(&n.as_f64().unwrap_or(f64::NAN).to_bits().to_le_bytes());
            }
        }
        Value::String(s) => {
            hasher.update(&[TAG_STRING]);
            hasher.update(&(s.len() as u64).to_le_bytes());
            hasher.update(s.as_bytes());
        }
        Value::Array(items) => {
            hasher.update(&[TAG_ARRAY]);
            hasher.update(&(items.len() as u64).to_le_bytes());
            for item in items {
                hash_value(hasher, item);
            }
        }
        Value::Object(map) => hash_map(hasher, map),
    }
}
