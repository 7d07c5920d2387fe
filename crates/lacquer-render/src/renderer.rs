//! The renderer contract: what a registry needs from a rule-compilation
//! backend.
//!
//! A [`Renderer`] turns a rule set plus resolved options into a
//! [`MountedSheet`]: an owned resource that can attach (yielding generated
//! class names), detach, and serialize itself to CSS text. The traits are
//! object-safe: registries hold a `Box<dyn Renderer>` and never know which
//! backend is behind it.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};

use lacquer_style::RuleSet;

/// Generated class names, keyed by rule name.
///
/// Ordered so listings and serialized output iterate deterministically.
pub type ClassMap = BTreeMap<String, String>;

/// Handle to a host-side mount point (a style element, in DOM terms).
///
/// Returned by [`Renderer::find_host`] when a previously mounted resource is
/// discoverable by its meta tag; passing it back in [`MountOptions::element`]
/// asks the backend to adopt that resource instead of creating a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostElement {
    id: u32,
    meta: String,
}

impl HostElement {
    /// Create a handle. Backends allocate ids; callers only pass handles
    /// around.
    pub fn new(id: u32, meta: impl Into<String>) -> Self {
        Self {
            id,
            meta: meta.into(),
        }
    }

    /// Backend-assigned id.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// The meta tag this host was mounted under.
    pub fn meta(&self) -> &str {
        &self.meta
    }
}

/// Fully resolved options for one compile call.
///
/// The registry assembles this from the descriptor's declared options plus
/// its own bookkeeping (meta tag, resolved cascade index, adopted host).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MountOptions {
    /// Sheet name; naming strategies use it to namespace class names.
    pub name: String,
    /// Cache-key tag for the mounted resource (`name` or
    /// `name-<custom theme id>`). Hydration looks resources up by this
    /// exact string.
    pub meta: String,
    /// Resolved cascade index, when any ordering applies.
    pub index: Option<i64>,
    /// Existing host to adopt instead of mounting fresh.
    pub element: Option<HostElement>,
    /// Backend-specific options, passed through untouched.
    pub extra: Map<String, Value>,
}

/// Errors raised by a renderer backend.
///
/// The registry propagates these unmodified; a failed compile or attach
/// never leaves a cache entry behind.
#[derive(Debug)]
pub enum RenderError {
    /// The backend rejected a rule set.
    Compile { meta: String, reason: String },
    /// The backend could not attach a compiled sheet.
    Attach { meta: String, reason: String },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compile { meta, reason } => {
                write!(f, "failed to compile sheet `{meta}`: {reason}")
            }
            Self::Attach { meta, reason } => {
                write!(f, "failed to attach sheet `{meta}`: {reason}")
            }
        }
    }
}

impl std::error::Error for RenderError {}

/// A compiled, mountable style resource owned by exactly one registry entry.
pub trait MountedSheet: fmt::Debug {
    /// Mount the resource and return its generated class names.
    fn attach(&mut self) -> Result<&ClassMap, RenderError>;

    /// Unmount the resource. The bulk-teardown path (`reset`).
    fn detach(&mut self);

    /// Whether the resource is currently mounted.
    fn is_attached(&self) -> bool;

    /// Generated class names (stable from compile time, attached or not).
    fn classes(&self) -> &ClassMap;

    /// The options this resource was compiled with.
    fn options(&self) -> &MountOptions;

    /// Compiled CSS text, as injected into server-rendered markup.
    fn to_css(&self) -> String;
}

/// A rule-compilation backend.
pub trait Renderer {
    /// Compile a rule set into a mountable resource.
    fn compile(
        &mut self,
        rules: &RuleSet,
        options: MountOptions,
    ) -> Result<Box<dyn MountedSheet>, RenderError>;

    /// Tear down a resource that is being replaced mid-lifetime (the
    /// hot-swap path, distinct from [`MountedSheet::detach`]).
    fn remove(&mut self, sheet: Box<dyn MountedSheet>);

    /// Look up a previously mounted resource by its exact meta tag.
    fn find_host(&self, meta: &str) -> Option<HostElement>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_element_accessors() {
        let host = HostElement::new(7, "button-abc");
        assert_eq!(host.id(), 7);
        assert_eq!(host.meta(), "button-abc");
    }

    #[test]
    fn mount_options_default_is_empty() {
        let options = MountOptions::default();
        assert!(options.name.is_empty());
        assert!(options.meta.is_empty());
        assert_eq!(options.index, None);
        assert!(options.element.is_none());
        assert!(options.extra.is_empty());
    }

    #[test]
    fn render_error_display() {
        let compile = RenderError::Compile {
            meta: "button".to_string(),
            reason: "bad rule".to_string(),
        };
        assert_eq!(
            format!("{compile}"),
            "failed to compile sheet `button`: bad rule"
        );

        let attach = RenderError::Attach {
            meta: "icon-ff00".to_string(),
            reason: "host gone".to_string(),
        };
        assert_eq!(
            format!("{attach}"),
            "failed to attach sheet `icon-ff00`: host gone"
        );
    }

    #[test]
    fn render_error_is_std_error() {
        fn takes_error(_: &dyn std::error::Error) {}
        takes_error(&RenderError::Compile {
            meta: String::new(),
            reason: String::new(),
        });
    }
}
