//! In-memory rendering backend.
//!
//! [`MemoryRenderer`] compiles rule sets to CSS text and tracks mounted
//! hosts in a plain map, standing in for a real style target. All activity
//! is counted and logged through a shared [`MemoryState`], so a test can
//! keep a handle to the state after the renderer itself has been handed to
//! a registry.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rustc_hash::FxHashMap;

use lacquer_style::RuleSet;

use crate::css;
use crate::naming::{NameContext, NamingStrategy};
use crate::renderer::{
    ClassMap, HostElement, MountOptions, MountedSheet, RenderError, Renderer,
};

/// Running totals of backend activity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderCounters {
    pub compiled: u32,
    pub attached: u32,
    pub detached: u32,
    pub removed: u32,
    pub adopted: u32,
}

/// One entry in the compile log.
#[derive(Clone, Debug, PartialEq)]
pub struct CompileRecord {
    pub name: String,
    pub meta: String,
    pub index: Option<i64>,
    pub adopted: bool,
    pub rule_names: Vec<String>,
}

/// State shared between a [`MemoryRenderer`], the sheets it produces, and
/// any test that kept a handle.
#[derive(Debug, Default)]
pub struct MemoryState {
    counters: Cell<RenderCounters>,
    hosts: RefCell<FxHashMap<String, HostElement>>,
    log: RefCell<Vec<CompileRecord>>,
    next_host_id: Cell<u32>,
    fail_next_compile: Cell<bool>,
    fail_next_attach: Cell<bool>,
}

impl MemoryState {
    /// Snapshot of the activity counters.
    pub fn counters(&self) -> RenderCounters {
        self.counters.get()
    }

    /// Currently mounted host for `meta`, if any.
    pub fn host(&self, meta: &str) -> Option<HostElement> {
        self.hosts.borrow().get(meta).cloned()
    }

    /// Number of mounted hosts.
    pub fn host_count(&self) -> usize {
        self.hosts.borrow().len()
    }

    /// Number of compile calls recorded so far.
    pub fn log_len(&self) -> usize {
        self.log.borrow().len()
    }

    /// Copy of the `i`th compile record.
    pub fn record(&self, i: usize) -> Option<CompileRecord> {
        self.log.borrow().get(i).cloned()
    }

    /// Plant a pre-mounted host, as if a previous process had already
    /// attached a sheet with this meta string.
    pub fn seed_host(&self, meta: &str) -> HostElement {
        let element = HostElement::new(self.allocate_id(), meta);
        self.hosts
            .borrow_mut()
            .insert(meta.to_string(), element.clone());
        element
    }

    /// Make the next `compile` call fail.
    pub fn fail_next_compile(&self) {
        self.fail_next_compile.set(true);
    }

    /// Make the next `attach` call fail.
    pub fn fail_next_attach(&self) {
        self.fail_next_attach.set(true);
    }

    fn allocate_id(&self) -> u32 {
        let id = self.next_host_id.get() + 1;
        self.next_host_id.set(id);
        id
    }

    fn bump(&self, update: impl FnOnce(&mut RenderCounters)) {
        let mut counters = self.counters.get();
        update(&mut counters);
        self.counters.set(counters);
    }
}

/// Renderer that mounts sheets into process memory.
#[derive(Debug)]
pub struct MemoryRenderer {
    state: Rc<MemoryState>,
    naming: NamingStrategy,
}

impl Default for MemoryRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRenderer {
    pub fn new() -> Self {
        Self::with_naming(NamingStrategy::counter())
    }

    pub fn with_naming(naming: NamingStrategy) -> Self {
        Self {
            state: Rc::new(MemoryState::default()),
            naming,
        }
    }

    /// Shared handle to the backend state. Clone it before handing the
    /// renderer away if the test needs to observe activity afterwards.
    pub fn state(&self) -> Rc<MemoryState> {
        Rc::clone(&self.state)
    }

    /// Convenience passthrough for [`MemoryState::seed_host`].
    pub fn seed_host(&self, meta: &str) -> HostElement {
        self.state.seed_host(meta)
    }
}

impl Renderer for MemoryRenderer {
    fn compile(
        &mut self,
        rules: &RuleSet,
        mut options: MountOptions,
    ) -> Result<Box<dyn MountedSheet>, RenderError> {
        if self.state.fail_next_compile.take() {
            return Err(RenderError::Compile {
                meta: options.meta.clone(),
                reason: "forced compile failure".to_string(),
            });
        }

        let mut classes = ClassMap::new();
        for rule in rules {
            if rule.is_at_rule() {
                continue;
            }
            let ctx = NameContext {
                sheet_name: &options.name,
                meta: &options.meta,
            };
            classes.insert(rule.name().to_string(), self.naming.class_name(rule.name(), &ctx));
        }
        let text = css::write_sheet(rules, &classes);

        let adopted = options.element.is_some();
        if options.element.is_none() {
            options.element = Some(HostElement::new(self.state.allocate_id(), &options.meta));
        }

        self.state.bump(|c| {
            c.compiled += 1;
            if adopted {
                c.adopted += 1;
            }
        });
        self.state.log.borrow_mut().push(CompileRecord {
            name: options.name.clone(),
            meta: options.meta.clone(),
            index: options.index,
            adopted,
            rule_names: rules.names().map(str::to_string).collect(),
        });
        tracing::debug!(
            message = "sheet compiled",
            meta = %options.meta,
            rules = rules.len(),
            adopted
        );

        Ok(Box::new(MemorySheet {
            state: Rc::clone(&self.state),
            options,
            classes,
            text,
            attached: false,
        }))
    }

    fn remove(&mut self, mut sheet: Box<dyn MountedSheet>) {
        if sheet.is_attached() {
            sheet.detach();
        }
        self.state.bump(|c| c.removed += 1);
        tracing::debug!(message = "sheet removed", meta = %sheet.options().meta);
    }

    fn find_host(&self, meta: &str) -> Option<HostElement> {
        self.state.host(meta)
    }
}

/// A sheet compiled by [`MemoryRenderer`].
#[derive(Debug)]
pub struct MemorySheet {
    state: Rc<MemoryState>,
    options: MountOptions,
    classes: ClassMap,
    text: String,
    attached: bool,
}

impl MountedSheet for MemorySheet {
    fn attach(&mut self) -> Result<&ClassMap, RenderError> {
        if self.state.fail_next_attach.take() {
            return Err(RenderError::Attach {
                meta: self.options.meta.clone(),
                reason: "forced attach failure".to_string(),
            });
        }
        if !self.attached {
            self.attached = true;
            if let Some(element) = &self.options.element {
                self.state
                    .hosts
                    .borrow_mut()
                    .insert(self.options.meta.clone(), element.clone());
            }
            self.state.bump(|c| c.attached += 1);
        }
        Ok(&self.classes)
    }

    fn detach(&mut self) {
        if self.attached {
            self.attached = false;
            self.state.hosts.borrow_mut().remove(&self.options.meta);
            self.state.bump(|c| c.detached += 1);
        }
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn classes(&self) -> &ClassMap {
        &self.classes
    }

    fn options(&self) -> &MountOptions {
        &self.options
    }

    fn to_css(&self) -> String {
        self.text.clone()
    }
}
