#![forbid(unsafe_code)]
#![doc = "Rendering boundary for Lacquer: turning rule sets into mounted, class-named sheets."]
#![doc = ""]
#![doc = "This crate defines the contract between the style registry and whatever"]
#![doc = "actually holds compiled CSS (a DOM adapter, a server-side string sink, or"]
#![doc = "the in-memory backend shipped here). The registry never touches a concrete"]
#![doc = "backend type; it speaks `Renderer` and `MountedSheet` only."]

pub mod css;
pub mod memory;
pub mod naming;
pub mod renderer;

pub use memory::{CompileRecord, MemoryRenderer, MemorySheet, MemoryState, RenderCounters};
pub use naming::{NameContext, NamingStrategy};
pub use renderer::{ClassMap, HostElement, MountOptions, MountedSheet, RenderError, Renderer};
