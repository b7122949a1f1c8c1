//! Theme module trait
//!
//! Every native theme implements [`ThemeModule`]. A [`crate::Stage`] owns
//! one module together with its scheduler, random source and visibility
//! controller, and forwards host notifications to it.

use rand::rngs::StdRng;

use crate::host::{Host, NodeId};
use crate::scheduler::{LoopId, Scheduler, Tick, TimerId};
use crate::visibility::Visibility;

/// Everything a module may touch during a callback
pub struct ThemeContext<'a> {
    pub host: &'a mut dyn Host,
    pub scheduler: &'a mut Scheduler,
    pub rng: &'a mut StdRng,
}

/// Counters describing a running module
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleSnapshot {
    /// CSS-animated decorations currently mounted
    pub decorations: usize,
    /// Canvas particles
    pub particles: usize,
    /// Characters with a pending loop or timer
    pub characters: usize,
    /// Short-lived items such as dropped presents
    pub transients: usize,
}

/// A self-contained seasonal overlay
pub trait ThemeModule {
    /// Registry name, e.g. `"autumn"`
    fn name(&self) -> &'static str;

    /// Class of the overlay container this module draws into
    fn container_class(&self) -> &'static str;

    /// Used in log lines ("Autumn hidden")
    fn label(&self) -> &'static str;

    /// Build the overlay content. Returns false when the theme is disabled
    /// by configuration; a disabled module receives no further callbacks.
    fn activate(&mut self, ctx: &mut ThemeContext<'_>) -> bool;

    /// Remove everything the module created and cancel pending work
    fn deactivate(&mut self, ctx: &mut ThemeContext<'_>);

    /// Called on every hidden/visible transition, the initial one included
    fn on_visibility_change(&mut self, _visibility: Visibility, _ctx: &mut ThemeContext<'_>) {}

    /// Called once per frame for every loop this module started
    fn on_frame(&mut self, _id: LoopId, _ctx: &mut ThemeContext<'_>) -> Tick {
        Tick::Stop
    }

    /// Called when a timer this module set fires
    fn on_timer(&mut self, _id: TimerId, _ctx: &mut ThemeContext<'_>) {}

    /// Called when an observed element changes size
    fn on_resize(&mut self, _node: NodeId, _ctx: &mut ThemeContext<'_>) {}

    fn snapshot(&self) -> ModuleSnapshot;
}
