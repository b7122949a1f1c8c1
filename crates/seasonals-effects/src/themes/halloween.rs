//! Ghosts, bats and pumpkins

use seasonals_config::HalloweenConfig;
use seasonals_theme::registry::HALLOWEEN;

use super::{DecorationModule, DecorationPlan};
use crate::decorations::{BaselineLayout, DecorationStyle, RotationMode};

pub const IMAGES: &[&str] = &[
    "../Seasonals/Resources/halloween_images/ghost_20x20.png",
    "../Seasonals/Resources/halloween_images/bat_20x20.png",
    "../Seasonals/Resources/halloween_images/pumpkin_20x20.png",
];

/// How many times the baseline repeats the image set
pub const BASELINE_REPEATS: usize = 4;

pub fn module(config: &HalloweenConfig) -> DecorationModule {
    DecorationModule::new(DecorationPlan {
        name: HALLOWEEN.name,
        label: "Halloween",
        container_class: HALLOWEEN.container_class,
        enabled: config.enable_halloween,
        style: DecorationStyle {
            element_class: "halloween",
            images: IMAGES,
            delays: [0.0..10.0, 0.0..3.0],
            durations: [6.0..16.0, 2.0..7.0],
            different_durations: config.enable_different_duration,
            rotation: RotationMode::Unsupported,
        },
        baseline: BaselineLayout::EachImage { times: BASELINE_REPEATS },
        random_extras: config.enable_random_symbols,
        mobile_extras: config.enable_random_symbols_mobile,
        extra_count: config.symbol_count as usize,
    })
}
