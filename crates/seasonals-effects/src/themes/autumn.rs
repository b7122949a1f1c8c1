//! Falling leaves and acorns

use seasonals_config::AutumnConfig;
use seasonals_theme::registry::AUTUMN;

use super::{DecorationModule, DecorationPlan};
use crate::decorations::{BaselineLayout, DecorationStyle, RotationMode};

pub const IMAGES: &[&str] = &[
    "../Seasonals/Resources/autumn_images/acorn1.png",
    "../Seasonals/Resources/autumn_images/acorn2.png",
    "../Seasonals/Resources/autumn_images/leaf1.png",
    "../Seasonals/Resources/autumn_images/leaf2.png",
    "../Seasonals/Resources/autumn_images/leaf3.png",
    "../Seasonals/Resources/autumn_images/leaf4.png",
    "../Seasonals/Resources/autumn_images/leaf5.png",
    "../Seasonals/Resources/autumn_images/leaf6.png",
    "../Seasonals/Resources/autumn_images/leaf7.png",
    "../Seasonals/Resources/autumn_images/leaf8.png",
    "../Seasonals/Resources/autumn_images/leaf9.png",
    "../Seasonals/Resources/autumn_images/leaf10.png",
    "../Seasonals/Resources/autumn_images/leaf11.png",
    "../Seasonals/Resources/autumn_images/leaf12.png",
    "../Seasonals/Resources/autumn_images/leaf13.png",
    "../Seasonals/Resources/autumn_images/leaf14.png",
    "../Seasonals/Resources/autumn_images/leaf15.png",
];

/// Leaves always on screen
pub const BASELINE_COUNT: usize = 12;

pub fn module(config: &AutumnConfig) -> DecorationModule {
    let (element_class, rotation) = if config.enable_rotation {
        ("leaf", RotationMode::Random { start: -60.0..-20.0, end: 20.0..60.0 })
    } else {
        ("leaf no-rotation", RotationMode::Zeroed)
    };

    DecorationModule::new(DecorationPlan {
        name: AUTUMN.name,
        label: "Autumn",
        container_class: AUTUMN.container_class,
        enabled: config.enable_autumn,
        style: DecorationStyle {
            element_class,
            images: IMAGES,
            delays: [0.0..12.0, 0.0..4.0],
            durations: [6.0..16.0, 2.0..5.0],
            different_durations: config.enable_different_duration,
            rotation,
        },
        baseline: BaselineLayout::RandomPick(BASELINE_COUNT),
        random_extras: config.enable_random_leaves,
        mobile_extras: config.enable_random_leaves_mobile,
        extra_count: config.leaf_count as usize,
    })
}
