//! Resurrection symbols
//!
//! One of each symbol is spread evenly across the width; `SymbolCount` is
//! the total, so only the remainder is added as random extras.

use seasonals_config::ResurrectionConfig;
use seasonals_theme::registry::RESURRECTION;

use super::{DecorationModule, DecorationPlan};
use crate::decorations::{BaselineLayout, DecorationStyle, RotationMode};

pub const IMAGES: &[&str] = &[
    "../Seasonals/Resources/resurrection_images/crosses.png",
    "../Seasonals/Resources/resurrection_images/palm-branch.png",
    "../Seasonals/Resources/resurrection_images/draped-cross.png",
    "../Seasonals/Resources/resurrection_images/empty-tomb.png",
    "../Seasonals/Resources/resurrection_images/he-is-risen.png",
    "../Seasonals/Resources/resurrection_images/crown-of-thorns.png",
    "../Seasonals/Resources/resurrection_images/risen-lord.png",
    "../Seasonals/Resources/resurrection_images/dove.png",
];

pub fn module(config: &ResurrectionConfig) -> DecorationModule {
    DecorationModule::new(DecorationPlan {
        name: RESURRECTION.name,
        label: "Resurrection",
        container_class: RESURRECTION.container_class,
        enabled: config.enable_resurrection,
        style: DecorationStyle {
            element_class: "resurrection-symbol",
            images: IMAGES,
            delays: [0.0..12.0, 0.0..3.0],
            durations: [7.0..14.0, 2.0..6.0],
            different_durations: config.enable_different_duration,
            rotation: RotationMode::Unsupported,
        },
        baseline: BaselineLayout::Spread { delay: 0.0..8.0 },
        random_extras: config.enable_random_symbols,
        mobile_extras: config.enable_random_symbols_mobile,
        extra_count: (config.symbol_count as usize).saturating_sub(IMAGES.len()),
    })
}
