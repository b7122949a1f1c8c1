//! Native theme modules
//!
//! Only themes with behaviour beyond their stylesheet have a module here.
//! The purely CSS/script themes (snowflakes, fireworks, ...) are handled by
//! loading their resources and need nothing else.

pub mod autumn;
pub mod easter;
pub mod halloween;
pub mod resurrection;
pub mod santa;

use seasonals_config::RemoteConfig;

use crate::decorations::{BaselineLayout, DecorationStyle, extras_allowed};
use crate::host::{NodeId, Selector, ensure_container};
use crate::module::{ModuleSnapshot, ThemeContext, ThemeModule};

pub use easter::EasterModule;
pub use santa::SantaModule;

/// Build the native module for `theme`, if it has one
pub fn create_module(theme: &str, config: &RemoteConfig) -> Option<Box<dyn ThemeModule>> {
    let module: Box<dyn ThemeModule> = match theme {
        "autumn" => Box::new(autumn::module(&config.autumn)),
        "halloween" => Box::new(halloween::module(&config.halloween)),
        "resurrection" => Box::new(resurrection::module(&config.resurrection)),
        "easter" => Box::new(EasterModule::new(&config.easter)),
        "santa" => Box::new(SantaModule::new(&config.santa)),
        _ => return None,
    };
    Some(module)
}

/// Whether `theme` has a native module
pub fn has_module(theme: &str) -> bool {
    matches!(theme, "autumn" | "halloween" | "resurrection" | "easter" | "santa")
}

/// Configuration of a decoration-only theme
#[derive(Debug, Clone)]
pub struct DecorationPlan {
    pub name: &'static str,
    pub label: &'static str,
    pub container_class: &'static str,
    /// Theme enable switch
    pub enabled: bool,
    pub style: DecorationStyle,
    pub baseline: BaselineLayout,
    /// Random extras switch
    pub random_extras: bool,
    /// Allow extras on narrow viewports
    pub mobile_extras: bool,
    pub extra_count: usize,
}

/// A theme made only of CSS-animated decorations
#[derive(Debug)]
pub struct DecorationModule {
    plan: DecorationPlan,
    container: Option<NodeId>,
    created_container: bool,
    nodes: Vec<NodeId>,
}

impl DecorationModule {
    pub fn new(plan: DecorationPlan) -> Self {
        Self {
            plan,
            container: None,
            created_container: false,
            nodes: Vec::new(),
        }
    }

    pub fn plan(&self) -> &DecorationPlan {
        &self.plan
    }

    /// The container the decorations were mounted into
    pub fn container(&self) -> Option<NodeId> {
        self.container
    }

    /// Mount baseline and extras. Returns false when the theme is disabled.
    pub(crate) fn populate(&mut self, ctx: &mut ThemeContext<'_>) -> bool {
        if !self.plan.enabled {
            log::info!("{} is disabled", self.plan.label);
            return false;
        }

        let existing = ctx.host.query(Selector::Class(self.plan.container_class));
        self.created_container = existing.is_none();
        let container = ensure_container(ctx.host, self.plan.container_class);
        self.container = Some(container);

        let baseline = self.plan.style.baseline(&self.plan.baseline, ctx.rng);
        self.nodes = self.plan.style.mount(ctx.host, container, &baseline);

        let width = ctx.host.viewport().width;
        if extras_allowed(self.plan.random_extras, self.plan.mobile_extras, width) && self.plan.extra_count > 0 {
            log::debug!("Adding {} random {} decorations", self.plan.extra_count, self.plan.name);
            let extras = self.plan.style.random_extras(self.plan.extra_count, ctx.rng);
            self.nodes.extend(self.plan.style.mount(ctx.host, container, &extras));
        }
        true
    }

    pub(crate) fn clear(&mut self, ctx: &mut ThemeContext<'_>) {
        for node in self.nodes.drain(..) {
            ctx.host.remove(node);
        }
        if let Some(container) = self.container.take() {
            if self.created_container {
                ctx.host.remove(container);
            }
        }
        self.created_container = false;
    }
}

impl ThemeModule for DecorationModule {
    fn name(&self) -> &'static str {
        self.plan.name
    }

    fn container_class(&self) -> &'static str {
        self.plan.container_class
    }

    fn label(&self) -> &'static str {
        self.plan.label
    }

    fn activate(&mut self, ctx: &mut ThemeContext<'_>) -> bool {
        self.populate(ctx)
    }

    fn deactivate(&mut self, ctx: &mut ThemeContext<'_>) {
        self.clear(ctx);
    }

    fn snapshot(&self) -> ModuleSnapshot {
        ModuleSnapshot {
            decorations: self.nodes.len(),
            ..Default::default()
        }
    }
}
