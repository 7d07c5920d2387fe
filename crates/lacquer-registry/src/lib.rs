#![forbid(unsafe_code)]

//! Style registry: theme-keyed render caching and sheet lifecycle.
//!
//! # Role in Lacquer
//! `lacquer-registry` is the orchestrator. It owns a renderer and the global
//! theme, turns style-sheet descriptors into mounted sheets exactly once per
//! `(name, custom-theme identity)` pair, and replays every mount when the
//! theme changes.
//!
//! # Primary responsibilities
//! - **StyleRegistry**: the render cache, hot-swap and rerender protocol,
//!   explicit sheet ordering, and SSR string serialization.
//! - **ThemeContext**: the theme-plus-registry pair component trees carry.
//! - **Inline preparation**: theme-resolved inline declaration blocks run
//!   through a pluggable transform.
//!
//! # How it fits in the system
//! Components describe styles with `lacquer-style` descriptors; this crate
//! resolves them against the current theme and drives a `lacquer-render`
//! backend. Nothing here touches a concrete backend type.

pub mod context;
pub mod inline;
pub mod registry;

pub use context::{ContextOptions, ThemeContext};
pub use inline::InlineTransform;
pub use registry::{ConfigError, RegistryOptions, StyleRegistry};
