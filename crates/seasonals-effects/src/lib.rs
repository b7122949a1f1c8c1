//! Seasonals Effects - the in-page rendering engine
//!
//! This crate provides:
//! - The [`Host`] page abstraction and an in-memory [`MemoryPage`]
//! - A cooperative frame/timer [`Scheduler`]
//! - Visibility tracking against host markers
//! - Decorations, characters and the snow canvas
//! - Native theme modules driven by a [`Stage`]

pub mod character;
pub mod decorations;
pub mod host;
pub mod module;
pub mod page;
pub mod scheduler;
pub mod snowfield;
pub mod stage;
pub mod themes;
pub mod visibility;

pub use character::{CharacterAnimator, CharacterMotion, Pose, Trajectory};
pub use decorations::{BaselineLayout, Decoration, DecorationStyle, MOBILE_BREAKPOINT, RotationMode, extras_allowed};
pub use host::{Host, HostError, HostEvent, NodeId, Resource, Selector, ensure_container};
pub use module::{ModuleSnapshot, ThemeContext, ThemeModule};
pub use page::{MemoryPage, PaintCall};
pub use scheduler::{LoopId, Scheduler, Tick, TimerId};
pub use snowfield::{SnowField, SnowParticle};
pub use stage::Stage;
pub use themes::{create_module, has_module};
pub use visibility::{HostMarkers, Visibility, VisibilityController};
