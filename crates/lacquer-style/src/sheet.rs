//! Style-sheet descriptors: named templates that produce rules from a theme.
//!
//! A descriptor is immutable in identity (name, producer) and shared by
//! handle: registries compare `Rc` pointers to detect a reloaded definition
//! under the same name. The one mutable piece is the optional local-theme
//! deriver, which reshapes the global theme before the producer runs.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::rules::RuleSet;
use crate::theme::Theme;

/// Callback deriving a descriptor-local theme shape from the global theme.
pub type ThemeDeriver = Box<dyn Fn(&Theme) -> Theme>;

/// How a descriptor produces rules: a fixed set, or a computation over the
/// theme (with raw access to the per-render custom theme when asked for).
pub enum RuleProducer {
    /// The same rules every render, regardless of theme.
    Static(RuleSet),
    /// Rules computed from the effective theme; the second argument is the
    /// raw custom theme for producers that want it un-merged.
    Computed(Box<dyn Fn(&Theme, Option<&Theme>) -> RuleSet>),
}

impl fmt::Debug for RuleProducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(rules) => f.debug_tuple("Static").field(rules).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Options a descriptor declares for its mounted resource.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetOptions {
    /// Explicit cascade index. When set it always wins over any
    /// registry-level order list.
    pub index: Option<i64>,
    /// Backend-specific options, passed through to the renderer untouched.
    pub extra: Map<String, Value>,
}

/// A named style-sheet descriptor.
pub struct StyleSheet {
    name: String,
    producer: RuleProducer,
    options: SheetOptions,
    local_theme: RefCell<Option<ThemeDeriver>>,
}

impl StyleSheet {
    /// Create a descriptor with a static rule set.
    pub fn new(name: impl Into<String>, rules: RuleSet) -> Self {
        Self::with_producer(name, RuleProducer::Static(rules))
    }

    /// Create a descriptor whose rules are computed from the theme.
    pub fn computed(
        name: impl Into<String>,
        produce: impl Fn(&Theme) -> RuleSet + 'static,
    ) -> Self {
        Self::with_producer(
            name,
            RuleProducer::Computed(Box::new(move |theme, _| produce(theme))),
        )
    }

    /// Create a descriptor whose producer also receives the raw custom
    /// theme (most producers want the merged form instead; see
    /// [`register_local_theme`](Self::register_local_theme)).
    pub fn computed_with(
        name: impl Into<String>,
        produce: impl Fn(&Theme, Option<&Theme>) -> RuleSet + 'static,
    ) -> Self {
        Self::with_producer(name, RuleProducer::Computed(Box::new(produce)))
    }

    fn with_producer(name: impl Into<String>, producer: RuleProducer) -> Self {
        Self {
            name: name.into(),
            producer,
            options: SheetOptions::default(),
            local_theme: RefCell::new(None),
        }
    }

    /// Replace the descriptor options, builder style.
    #[must_use]
    pub fn with_options(mut self, options: SheetOptions) -> Self {
        self.options = options;
        self
    }

    /// Set an explicit cascade index, builder style.
    #[must_use]
    pub fn with_index(mut self, index: i64) -> Self {
        self.options.index = Some(index);
        self
    }

    /// Attach a backend-specific option, builder style.
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.extra.insert(key.into(), value.into());
        self
    }

    /// Wrap in an `Rc` handle; registries key their caches on this handle's
    /// pointer identity.
    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }

    /// The descriptor name, unique within a registry.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared options.
    pub fn options(&self) -> &SheetOptions {
        &self.options
    }

    /// Register a local-theme deriver. Last write wins.
    ///
    /// The deriver reshapes the global theme into whatever the producer
    /// expects; a per-render custom theme is shallow-merged on top of its
    /// output. Changing the deriver does not invalidate anything already
    /// rendered; callers rerender explicitly to pick up the new shape.
    pub fn register_local_theme(&self, derive: impl Fn(&Theme) -> Theme + 'static) {
        tracing::debug!(message = "local theme deriver registered", sheet = %self.name);
        *self.local_theme.borrow_mut() = Some(Box::new(derive));
    }

    /// Whether a local-theme deriver is registered.
    pub fn has_local_theme(&self) -> bool {
        self.local_theme.borrow().is_some()
    }

    /// Produce concrete rules for a theme and optional custom theme.
    ///
    /// With a deriver: the producer sees `derive(theme)` with `custom`
    /// shallow-merged on top. Without one: the producer sees `theme`
    /// directly and `custom` passes through raw. Either way, if `theme`
    /// declares `overrides[name]`, each override block is shallow-merged
    /// into the produced rule of the same name, and override-only rule
    /// names are appended verbatim.
    pub fn produce_rules(&self, theme: &Theme, custom: Option<&Theme>) -> RuleSet {
        let deriver = self.local_theme.borrow();
        let local = deriver.as_ref().map(|derive| {
            let derived = derive(theme);
            match custom {
                Some(custom) => derived.merged_with(custom),
                None => derived,
            }
        });
        let effective = local.as_ref().unwrap_or(theme);

        let mut rules = match &self.producer {
            RuleProducer::Static(rules) => rules.clone(),
            RuleProducer::Computed(produce) => produce(effective, custom),
        };

        if let Some(overrides) = theme.overrides_for(&self.name) {
            for (rule_name, patch) in overrides {
                if let Some(block) = patch.as_object() {
                    rules.merge_override(rule_name, block);
                }
            }
        }

        rules
    }
}

impl fmt::Debug for StyleSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleSheet")
            .field("name", &self.name)
            .field("producer", &self.producer)
            .field("options", &self.options)
            .field("has_local_theme", &self.has_local_theme())
            .finish()
    }
}
