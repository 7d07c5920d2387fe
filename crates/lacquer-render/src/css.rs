//! CSS text emission for the in-memory backend.
//!
//! Just enough of a writer to make serialized output real: camelCase
//! property names come out kebab-cased, bare numbers are treated as pixel
//! lengths, arrays join with spaces, and object values become nested blocks
//! (at-rule bodies). Anything a style engine would reject is skipped rather
//! than guessed at.

use serde_json::Value;

use lacquer_style::{Declarations, RuleSet};

use crate::renderer::ClassMap;

const INDENT: &str = "  ";

/// Convert a camelCase property name to kebab-case.
///
/// A leading capital lowercases without a dash, so `WebkitTransform` becomes
/// `webkit-transform`.
pub fn kebab_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    for (i, ch) in input.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Serialize a compiled sheet to CSS text.
///
/// Rules emit in insertion order. Plain rules select by their generated
/// class name; at-rules emit their name verbatim with nested blocks.
pub fn write_sheet(rules: &RuleSet, classes: &ClassMap) -> String {
    let mut blocks = Vec::with_capacity(rules.len());
    for rule in rules {
        let mut out = String::new();
        if rule.is_at_rule() {
            out.push_str(rule.name());
        } else {
            out.push('.');
            match classes.get(rule.name()) {
                Some(class) => out.push_str(class),
                None => out.push_str(rule.name()),
            }
        }
        out.push_str(" {\n");
        write_block(&mut out, rule.declarations(), 1);
        out.push('}');
        blocks.push(out);
    }
    blocks.join("\n")
}

fn write_block(out: &mut String, declarations: &Declarations, depth: usize) {
    for (key, value) in declarations {
        match value {
            Value::Object(nested) => {
                push_indent(out, depth);
                out.push_str(key);
                out.push_str(" {\n");
                write_block(out, nested, depth + 1);
                push_indent(out, depth);
                out.push_str("}\n");
            }
            _ => {
                if let Some(text) = scalar_text(value) {
                    push_indent(out, depth);
                    out.push_str(&kebab_case(key));
                    out.push_str(": ");
                    out.push_str(&text);
                    out.push_str(";\n");
                }
            }
        }
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_text(n)),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(scalar_text).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(" "))
            }
        }
        _ => None,
    }
}

fn number_text(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return format!("{i}px");
    }
    let f = n.as_f64().unwrap_or(0.0);
    if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        format!("{}px", f as i64)
    } else {
        format!("{f}px")
    }
}
