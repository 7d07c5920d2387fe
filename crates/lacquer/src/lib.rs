#![forbid(unsafe_code)]

//! Lacquer public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users. It
//! re-exports common types from the internal crates and offers a lightweight
//! prelude for day-to-day usage.

use std::fmt;

// --- Style re-exports ------------------------------------------------------

pub use lacquer_style::{
    Declarations, Rule, RuleProducer, RuleSet, SheetOptions, StyleSheet, Theme, ThemeBuilder,
    ThemeDeriver, ThemeId, decl_block, identity, merge_declarations,
};

// --- Render re-exports -----------------------------------------------------

pub use lacquer_render::{
    ClassMap, CompileRecord, HostElement, MemoryRenderer, MemorySheet, MemoryState, MountOptions,
    MountedSheet, NameContext, NamingStrategy, RenderCounters, RenderError, Renderer,
};

// --- Registry re-exports ---------------------------------------------------

pub use lacquer_registry::{
    ConfigError, ContextOptions, InlineTransform, RegistryOptions, StyleRegistry, ThemeContext,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for lacquer users.
#[derive(Debug)]
pub enum Error {
    /// Registry construction failure.
    Config(ConfigError),
    /// Renderer failure during a render or rerender.
    Render(RenderError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Render(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Render(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<RenderError> for Error {
    fn from(err: RenderError) -> Self {
        Self::Render(err)
    }
}

/// Standard result type for lacquer APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ClassMap, Error, MemoryRenderer, NamingStrategy, RegistryOptions, Result, RuleSet,
        StyleRegistry, StyleSheet, Theme, ThemeBuilder, ThemeContext, decl_block,
    };

    pub use crate::{registry, render, style};
}

pub use lacquer_registry as registry;
pub use lacquer_render as render;
pub use lacquer_style as style;
