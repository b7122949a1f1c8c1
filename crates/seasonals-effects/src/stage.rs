//! Central driver for one active theme
//!
//! The [`Stage`] owns the theme module, its scheduler and random source,
//! and the visibility controller. The host calls into it for every
//! mutation, resize and display frame; the stage re-evaluates visibility,
//! fires due timers and ticks registered loops.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::host::{Host, HostEvent, NodeId};
use crate::module::{ModuleSnapshot, ThemeContext, ThemeModule};
use crate::scheduler::{Scheduler, Tick};
use crate::visibility::{Visibility, VisibilityController};

pub struct Stage {
    module: Box<dyn ThemeModule>,
    scheduler: Scheduler,
    rng: StdRng,
    visibility: VisibilityController,
    active: bool,
}

impl Stage {
    /// Stage with an entropy-seeded random source
    pub fn new(module: Box<dyn ThemeModule>) -> Self {
        Self::with_rng(module, StdRng::from_entropy())
    }

    /// Stage with a given random source
    pub fn with_rng(module: Box<dyn ThemeModule>, rng: StdRng) -> Self {
        let visibility = VisibilityController::new(module.container_class(), module.label());
        Self {
            module,
            scheduler: Scheduler::new(),
            rng,
            visibility,
            active: false,
        }
    }

    pub fn theme(&self) -> &'static str {
        self.module.name()
    }

    /// Whether the module accepted activation and has not been torn down
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn visibility(&self) -> Option<Visibility> {
        self.visibility.state()
    }

    pub fn snapshot(&self) -> ModuleSnapshot {
        self.module.snapshot()
    }

    /// Build the theme and apply the initial visibility
    ///
    /// Returns false when the theme is disabled by configuration.
    pub fn activate(&mut self, host: &mut dyn Host) -> bool {
        if self.active {
            return true;
        }
        let mut ctx = ThemeContext {
            host: &mut *host,
            scheduler: &mut self.scheduler,
            rng: &mut self.rng,
        };
        self.active = self.module.activate(&mut ctx);
        if self.active {
            log::debug!("Theme module {} active", self.module.name());
            self.host_changed(host);
        }
        self.active
    }

    /// Re-evaluate visibility after a host mutation
    pub fn host_changed(&mut self, host: &mut dyn Host) {
        if !self.active {
            return;
        }
        if let Some(visibility) = self.visibility.evaluate(host) {
            let mut ctx = ThemeContext {
                host,
                scheduler: &mut self.scheduler,
                rng: &mut self.rng,
            };
            self.module.on_visibility_change(visibility, &mut ctx);
        }
    }

    /// Forward a size change of an observed element
    pub fn resized(&mut self, host: &mut dyn Host, node: NodeId) {
        if !self.active {
            return;
        }
        let mut ctx = ThemeContext {
            host,
            scheduler: &mut self.scheduler,
            rng: &mut self.rng,
        };
        self.module.on_resize(node, &mut ctx);
    }

    /// Route a host notification
    pub fn handle(&mut self, host: &mut dyn Host, event: &HostEvent) {
        match event {
            HostEvent::Mutation => self.host_changed(host),
            HostEvent::Resize(node) => self.resized(host, *node),
            HostEvent::Click(_) | HostEvent::Change { .. } => {}
        }
    }

    /// Run one display frame at `now` milliseconds
    ///
    /// Due timers fire first, then every loop registered before this frame
    /// is ticked once. Loops returning [`Tick::Stop`] are unregistered.
    pub fn frame(&mut self, host: &mut dyn Host, now: f64) {
        if !self.active {
            return;
        }
        let mut ctx = ThemeContext {
            host,
            scheduler: &mut self.scheduler,
            rng: &mut self.rng,
        };

        let timers = ctx.scheduler.advance(now);
        for timer in timers {
            self.module.on_timer(timer, &mut ctx);
        }

        for id in ctx.scheduler.loops() {
            if !ctx.scheduler.is_loop_active(id) {
                continue;
            }
            if self.module.on_frame(id, &mut ctx) == Tick::Stop {
                ctx.scheduler.cancel_loop(id);
            }
        }
    }

    /// Remove the theme's content and drop all pending work
    pub fn teardown(&mut self, host: &mut dyn Host) {
        if !self.active {
            return;
        }
        let mut ctx = ThemeContext {
            host,
            scheduler: &mut self.scheduler,
            rng: &mut self.rng,
        };
        self.module.deactivate(&mut ctx);
        self.scheduler.clear();
        self.active = false;
        log::debug!("Theme module {} torn down", self.module.name());
    }
}
