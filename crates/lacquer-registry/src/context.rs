//! Theme context: the shape component trees thread a registry through.
//!
//! A [`ThemeContext`] pairs the current theme with a shared registry handle.
//! UI glue constructs one at the root (via [`ContextOptions`], which falls
//! back to a [`MemoryRenderer`](lacquer_render::MemoryRenderer)-backed
//! registry when none is supplied) and hands clones of the registry handle
//! down to components; theme updates on the context rerender everything the
//! registry has mounted.

use std::cell::RefCell;
use std::rc::Rc;

use lacquer_render::{ClassMap, MemoryRenderer, RenderError};
use lacquer_style::{StyleSheet, Theme};

use crate::registry::StyleRegistry;

/// Configuration for [`ThemeContext`] construction.
#[derive(Debug, Default)]
pub struct ContextOptions {
    theme: Option<Theme>,
    registry: Option<Rc<RefCell<StyleRegistry>>>,
}

impl ContextOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the context theme. Defaults to the empty theme, or to the
    /// supplied registry's theme when one is given.
    #[must_use]
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    /// Use a pre-built registry instead of the default in-memory one.
    #[must_use]
    pub fn registry(mut self, registry: Rc<RefCell<StyleRegistry>>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Build the context. When both a theme and a registry are supplied,
    /// the theme wins and is pushed into the registry.
    pub fn build(self) -> ThemeContext {
        let ContextOptions { theme, registry } = self;
        match registry {
            Some(registry) => {
                let theme = match theme {
                    Some(theme) => {
                        registry.borrow_mut().replace_theme(theme.clone());
                        theme
                    }
                    None => registry.borrow().theme().clone(),
                };
                ThemeContext { theme, registry }
            }
            None => {
                let theme = theme.unwrap_or_default();
                let mut registry = StyleRegistry::with_renderer(MemoryRenderer::new());
                registry.replace_theme(theme.clone());
                ThemeContext {
                    theme,
                    registry: Rc::new(RefCell::new(registry)),
                }
            }
        }
    }
}

/// Theme plus registry handle, as passed down a component tree.
#[derive(Debug)]
pub struct ThemeContext {
    theme: Theme,
    registry: Rc<RefCell<StyleRegistry>>,
}

impl Default for ThemeContext {
    fn default() -> Self {
        ContextOptions::new().build()
    }
}

impl ThemeContext {
    /// The context theme.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// The shared registry handle.
    pub fn registry(&self) -> &Rc<RefCell<StyleRegistry>> {
        &self.registry
    }

    /// Render a sheet through the shared registry.
    pub fn render(
        &self,
        sheet: &Rc<StyleSheet>,
        custom: Option<&Theme>,
    ) -> Result<Rc<ClassMap>, RenderError> {
        self.registry.borrow_mut().render(sheet, custom)
    }

    /// Swap the theme and rerender every mounted sheet.
    pub fn update_theme(&mut self, theme: Theme) -> Result<(), RenderError> {
        self.theme = theme.clone();
        self.registry.borrow_mut().update_theme(theme)
    }
}
