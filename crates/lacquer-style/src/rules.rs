//! Rule sets: the concrete output of a style-sheet descriptor.
//!
//! A [`RuleSet`] is an insertion-ordered sequence of named rules. Rule order
//! is preserved because it is cascade order within a sheet; the declarations
//! inside a rule are a JSON object map (property to value), which iterates
//! sorted, so output stays deterministic without tracking author order per
//! property.

use serde_json::{Map, Value};

/// A block of property/value declarations.
///
/// Values are JSON: strings pass through to the backend verbatim, bare
/// numbers are backend-interpreted lengths, and nested objects express
/// at-rule bodies (`@keyframes` frames, `@media` contents).
pub type Declarations = Map<String, Value>;

/// Convert a JSON value into a declaration block.
///
/// Meant for literal construction with `serde_json::json!`; non-object
/// values yield an empty block.
pub fn decl_block(value: Value) -> Declarations {
    match value {
        Value::Object(map) => map,
        _ => Declarations::new(),
    }
}

/// Shallow-merge `patch` into `base`: patch keys win, other base keys
/// survive.
pub fn merge_declarations(base: &mut Declarations, patch: &Declarations) {
    for (key, value) in patch {
        base.insert(key.clone(), value.clone());
    }
}

/// A single named rule.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    name: String,
    declarations: Declarations,
}

impl Rule {
    /// Create a rule from a name and its declarations.
    pub fn new(name: impl Into<String>, declarations: Declarations) -> Self {
        Self {
            name: name.into(),
            declarations,
        }
    }

    /// The rule name (a class-producing name, or an at-rule like
    /// `@keyframes pulse`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is an at-rule (name starts with `@`).
    #[inline]
    pub fn is_at_rule(&self) -> bool {
        self.name.starts_with('@')
    }

    /// The declaration block.
    pub fn declarations(&self) -> &Declarations {
        &self.declarations
    }
}

/// An insertion-ordered collection of named rules.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule, builder style.
    #[must_use]
    pub fn with_rule(mut self, name: impl Into<String>, declarations: Declarations) -> Self {
        self.push(Rule::new(name, declarations));
        self
    }

    /// Append a rule.
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Look up a rule by name.
    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.name == name)
    }

    /// Merge an override block into the rule of the same name, or append it
    /// verbatim as a new rule when no such rule exists.
    pub fn merge_override(&mut self, name: &str, patch: &Declarations) {
        match self.rules.iter_mut().find(|rule| rule.name == name) {
            Some(rule) => merge_declarations(&mut rule.declarations, patch),
            None => self.rules.push(Rule::new(name, patch.clone())),
        }
    }

    /// Iterate rules in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Names of all rules, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.name.as_str())
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
