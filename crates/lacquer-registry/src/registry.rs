//! The style registry: name and custom-theme keyed render cache.
//!
//! A [`StyleRegistry`] owns one renderer and the current global theme. Each
//! successful render of a descriptor produces a mapping entry holding the
//! mounted resource and its class map; later renders of the same
//! `(name, custom-theme identity)` pair return the cached map without
//! touching the renderer. Swapping the descriptor handle behind a cached
//! name replaces the mounted resource; swapping the theme rerenders
//! everything with the original call shapes preserved.

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use lacquer_render::{
    ClassMap, MountOptions, MountedSheet, RenderError, Renderer,
};
use lacquer_style::{Declarations, StyleSheet, Theme, ThemeId, identity};

use crate::inline::{self, InlineTransform};

/// Registry construction failure.
#[derive(Debug)]
pub enum ConfigError {
    /// No renderer was supplied.
    MissingRenderer,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRenderer => {
                write!(f, "registry configuration is missing a renderer")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Builder-style configuration for [`StyleRegistry::new`].
#[derive(Default)]
pub struct RegistryOptions {
    renderer: Option<Box<dyn Renderer>>,
    theme: Theme,
    inline_transform: Option<InlineTransform>,
}

impl RegistryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the renderer. Required.
    #[must_use]
    pub fn renderer(self, renderer: impl Renderer + 'static) -> Self {
        self.renderer_boxed(Box::new(renderer))
    }

    /// Set an already boxed renderer.
    #[must_use]
    pub fn renderer_boxed(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Set the initial global theme. Defaults to the empty theme.
    #[must_use]
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Install an inline-style transform (see
    /// [`prepare_inline`](StyleRegistry::prepare_inline)).
    #[must_use]
    pub fn inline_transform(
        mut self,
        transform: impl Fn(&mut Declarations) + 'static,
    ) -> Self {
        self.inline_transform = Some(Box::new(transform));
        self
    }
}

impl fmt::Debug for RegistryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryOptions")
            .field("has_renderer", &self.renderer.is_some())
            .field("theme", &self.theme)
            .field("has_inline_transform", &self.inline_transform.is_some())
            .finish_non_exhaustive()
    }
}

/// Composite cache key: sheet name plus the identity of the custom theme
/// the sheet was rendered with (`None` for a plain global-theme render).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct SheetKey {
    name: String,
    custom_id: Option<ThemeId>,
}

impl SheetKey {
    fn meta(&self) -> String {
        match &self.custom_id {
            Some(id) => format!("{}-{id}", self.name),
            None => self.name.clone(),
        }
    }
}

/// One rendered sheet instance.
struct MappingEntry {
    key: SheetKey,
    sheet: Rc<StyleSheet>,
    custom: Option<Theme>,
    mounted: Box<dyn MountedSheet>,
    classes: Rc<ClassMap>,
}

/// Render cache and mounted-sheet bookkeeping over one renderer.
pub struct StyleRegistry {
    renderer: Box<dyn Renderer>,
    theme: Theme,
    theme_id: ThemeId,
    entries: Vec<MappingEntry>,
    lookup: FxHashMap<SheetKey, usize>,
    sheet_order: Option<Vec<String>>,
    inline_transform: Option<InlineTransform>,
}

impl StyleRegistry {
    /// Build a registry from options.
    pub fn new(options: RegistryOptions) -> Result<Self, ConfigError> {
        let RegistryOptions {
            renderer,
            theme,
            inline_transform,
        } = options;
        let renderer = renderer.ok_or(ConfigError::MissingRenderer)?;
        Ok(Self::assemble(renderer, theme, inline_transform))
    }

    /// Build a registry around a renderer with the empty theme. Infallible
    /// shortcut for the common construction.
    pub fn with_renderer(renderer: impl Renderer + 'static) -> Self {
        Self::assemble(Box::new(renderer), Theme::new(), None)
    }

    fn assemble(
        renderer: Box<dyn Renderer>,
        theme: Theme,
        inline_transform: Option<InlineTransform>,
    ) -> Self {
        let theme_id = identity(&theme);
        Self {
            renderer,
            theme,
            theme_id,
            entries: Vec::new(),
            lookup: FxHashMap::default(),
            sheet_order: None,
            inline_transform,
        }
    }

    /// The current global theme.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Identity of the current global theme.
    pub fn theme_id(&self) -> &ThemeId {
        &self.theme_id
    }

    /// Number of live rendered-sheet entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no sheets are currently rendered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace the explicit render-order list.
    ///
    /// Applies to renders issued afterwards; already mounted sheets keep
    /// the index they resolved at render time until a rerender.
    pub fn set_sheet_order<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sheet_order = Some(names.into_iter().map(Into::into).collect());
    }

    /// The configured order list, if any.
    pub fn sheet_order(&self) -> Option<&[String]> {
        self.sheet_order.as_deref()
    }

    /// Render a descriptor against the current theme, optionally with a
    /// custom theme, and return the shared class map.
    ///
    /// Cache behavior, keyed on `(name, identity(custom))`:
    /// on a hit with the same descriptor handle the cached map comes back
    /// and the renderer is never consulted; on a hit with a *different*
    /// handle the old resource is removed and the sheet re-mounts at the
    /// end of the entry order; on a miss the sheet mounts fresh. A renderer
    /// failure propagates unmodified and leaves no entry behind.
    pub fn render(
        &mut self,
        sheet: &Rc<StyleSheet>,
        custom: Option<&Theme>,
    ) -> Result<Rc<ClassMap>, RenderError> {
        let _span = tracing::debug_span!("render", sheet = sheet.name()).entered();
        let key = SheetKey {
            name: sheet.name().to_string(),
            custom_id: custom.map(identity),
        };

        if let Some(&position) = self.lookup.get(&key) {
            if Rc::ptr_eq(&self.entries[position].sheet, sheet) {
                tracing::trace!(message = "cache hit", sheet = sheet.name());
                return Ok(Rc::clone(&self.entries[position].classes));
            }
            tracing::debug!(
                message = "descriptor replaced, swapping mounted sheet",
                sheet = sheet.name()
            );
            self.remove_entry(position);
        }

        self.mount(sheet, custom, key)
    }

    /// Class map for a previously rendered descriptor, by handle identity.
    pub fn classes(&self, sheet: &Rc<StyleSheet>) -> Option<Rc<ClassMap>> {
        self.entries
            .iter()
            .find(|entry| Rc::ptr_eq(&entry.sheet, sheet))
            .map(|entry| Rc::clone(&entry.classes))
    }

    /// Replace the global theme and rerender every mounted sheet.
    pub fn update_theme(&mut self, theme: Theme) -> Result<(), RenderError> {
        self.replace_theme(theme);
        self.rerender()
    }

    /// Replace the global theme without rerendering. Mounted sheets keep
    /// their previous output until the next render or rerender.
    pub fn replace_theme(&mut self, theme: Theme) {
        self.theme_id = identity(&theme);
        self.theme = theme;
        tracing::debug!(message = "theme replaced", theme_id = %self.theme_id);
    }

    /// Detach every mounted sheet and forget all entries.
    pub fn reset(&mut self) {
        let detached = self.entries.len();
        for entry in &mut self.entries {
            entry.mounted.detach();
        }
        self.entries.clear();
        self.lookup.clear();
        tracing::debug!(message = "registry reset", detached);
    }

    /// Tear everything down and render each sheet again with its original
    /// descriptor and custom theme, in the original entry order.
    pub fn rerender(&mut self) -> Result<(), RenderError> {
        let _span = tracing::debug_span!("rerender", sheets = self.entries.len()).entered();
        let snapshot: Vec<(Rc<StyleSheet>, Option<Theme>)> = self
            .entries
            .iter()
            .map(|entry| (Rc::clone(&entry.sheet), entry.custom.clone()))
            .collect();
        self.reset();
        for (sheet, custom) in snapshot {
            self.render(&sheet, custom.as_ref())?;
        }
        Ok(())
    }

    /// Run a declaration block through the configured inline transform.
    pub fn prepare_inline(&self, declarations: Declarations) -> Declarations {
        let mut declarations = declarations;
        inline::apply(self.inline_transform.as_ref(), &mut declarations);
        declarations
    }

    /// Produce a declaration block from the current theme, then run it
    /// through the configured inline transform.
    pub fn prepare_inline_with(
        &self,
        produce: impl FnOnce(&Theme) -> Declarations,
    ) -> Declarations {
        self.prepare_inline(produce(&self.theme))
    }

    /// Serialize every mounted sheet to CSS text, ascending by resolved
    /// index (unset sorts as 0, ties keep insertion order), joined by
    /// newlines.
    pub fn sheets_to_string(&self) -> String {
        let mut ordered: Vec<&MappingEntry> = self.entries.iter().collect();
        ordered.sort_by_key(|entry| entry.mounted.options().index.unwrap_or(0));
        let blocks: Vec<String> = ordered
            .iter()
            .map(|entry| entry.mounted.to_css())
            .collect();
        blocks.join("\n")
    }

    fn resolved_index(&self, sheet: &StyleSheet) -> Option<i64> {
        if let Some(index) = sheet.options().index {
            return Some(index);
        }
        let order = self.sheet_order.as_ref()?;
        let index = match order.iter().position(|name| name == sheet.name()) {
            Some(position) => position,
            None => order.len(),
        };
        Some(index as i64)
    }

    fn remove_entry(&mut self, position: usize) {
        let entry = self.entries.remove(position);
        self.lookup.remove(&entry.key);
        for index in self.lookup.values_mut() {
            if *index > position {
                *index -= 1;
            }
        }
        self.renderer.remove(entry.mounted);
    }

    fn mount(
        &mut self,
        sheet: &Rc<StyleSheet>,
        custom: Option<&Theme>,
        key: SheetKey,
    ) -> Result<Rc<ClassMap>, RenderError> {
        let rules = sheet.produce_rules(&self.theme, custom);
        let meta = key.meta();
        let element = self.renderer.find_host(&meta);
        let adopted = element.is_some();
        let options = MountOptions {
            name: key.name.clone(),
            meta: meta.clone(),
            index: self.resolved_index(sheet),
            element,
            extra: sheet.options().extra.clone(),
        };

        let mut mounted = self.renderer.compile(&rules, options)?;
        let classes = Rc::new(mounted.attach()?.clone());
        tracing::debug!(
            message = "sheet mounted",
            sheet = %key.name,
            meta = %meta,
            rules = rules.len(),
            adopted
        );

        self.lookup.insert(key.clone(), self.entries.len());
        self.entries.push(MappingEntry {
            key,
            sheet: Rc::clone(sheet),
            custom: custom.cloned(),
            mounted,
            classes: Rc::clone(&classes),
        });
        Ok(classes)
    }
}

impl fmt::Debug for StyleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleRegistry")
            .field("theme_id", &self.theme_id)
            .field("entries", &self.entries.len())
            .field("sheet_order", &self.sheet_order)
            .finish_non_exhaustive()
    }
}
