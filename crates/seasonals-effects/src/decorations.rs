//! CSS-animated decorations
//!
//! A decoration is a `div` wrapping one `img`; the theme stylesheet does
//! the actual falling/swaying. This module only decides the per-element
//! parameters (image, horizontal position, delays, durations, rotation)
//! and writes them once. Decorations are never touched again.
//!
//! Each theme creates a fixed baseline set and, when allowed by the
//! viewport and its config, a batch of randomly parameterized extras.

use std::ops::Range;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::host::{Host, NodeId};

/// Mobile/desktop width boundary
///
/// Santa treats widths below it as mobile. Random decoration extras need a
/// width above it.
pub const MOBILE_BREAKPOINT: f64 = 768.0;

/// Rotation pair written as `--rotate-start` / `--rotate-end`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub start_deg: f64,
    pub end_deg: f64,
}

impl Rotation {
    pub const ZERO: Rotation = Rotation { start_deg: 0.0, end_deg: 0.0 };
}

/// How a theme handles per-element rotation
#[derive(Debug, Clone, PartialEq)]
pub enum RotationMode {
    /// The theme's stylesheet has no rotation variables
    Unsupported,
    /// Random start in `start`, random end in `end` (degrees)
    Random { start: Range<f64>, end: Range<f64> },
    /// Variables are written but pinned to zero
    Zeroed,
}

/// One planned decoration
#[derive(Debug, Clone, PartialEq)]
pub struct Decoration {
    pub image: &'static str,
    /// Horizontal position in percent; `None` leaves it to the stylesheet
    pub left_percent: Option<f64>,
    /// Animation delays in seconds (empty, one or two values)
    pub delays: Vec<f64>,
    /// Fall and sway durations in seconds; `None` keeps the stylesheet default
    pub durations: Option<(f64, f64)>,
    pub rotation: Option<Rotation>,
}

/// How the always-present baseline set is built
#[derive(Debug, Clone, PartialEq)]
pub enum BaselineLayout {
    /// `count` elements, each with an independently random image
    RandomPick(usize),
    /// Shuffle the image set and take the first `count`
    Shuffled(usize),
    /// Every image once, the whole set repeated `times` times
    EachImage { times: usize },
    /// Every image once, spread evenly across the width with a random delay
    Spread { delay: Range<f64> },
}

/// Per-theme decoration parameters
#[derive(Debug, Clone)]
pub struct DecorationStyle {
    /// Class of each decoration `div`
    pub element_class: &'static str,
    /// Image set; extras pick uniformly from it
    pub images: &'static [&'static str],
    /// Ranges for the two random delays of extras
    pub delays: [Range<f64>; 2],
    /// Ranges for the two random durations
    pub durations: [Range<f64>; 2],
    /// Randomize durations; otherwise the stylesheet default applies
    pub different_durations: bool,
    pub rotation: RotationMode,
}

impl DecorationStyle {
    fn durations<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(f64, f64)> {
        self.different_durations
            .then(|| (uniform(rng, &self.durations[0]), uniform(rng, &self.durations[1])))
    }

    fn rotation<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Rotation> {
        match &self.rotation {
            RotationMode::Unsupported => None,
            RotationMode::Zeroed => Some(Rotation::ZERO),
            RotationMode::Random { start, end } => Some(Rotation {
                start_deg: uniform(rng, start),
                end_deg: uniform(rng, end),
            }),
        }
    }

    fn pick_image<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        self.images.choose(rng).copied().unwrap_or_default()
    }

    /// Plan the baseline set
    pub fn baseline<R: Rng + ?Sized>(&self, layout: &BaselineLayout, rng: &mut R) -> Vec<Decoration> {
        let plain = |image: &'static str, rng: &mut R| Decoration {
            image,
            left_percent: None,
            delays: Vec::new(),
            durations: self.durations(rng),
            rotation: self.rotation(rng),
        };

        match layout {
            BaselineLayout::RandomPick(count) => (0..*count)
                .map(|_| {
                    let image = self.pick_image(rng);
                    plain(image, rng)
                })
                .collect(),
            BaselineLayout::Shuffled(count) => {
                let mut images = self.images.to_vec();
                images.shuffle(rng);
                images.into_iter().take(*count).map(|image| plain(image, rng)).collect()
            }
            BaselineLayout::EachImage { times } => (0..*times)
                .flat_map(|_| self.images.iter().copied())
                .collect::<Vec<_>>()
                .into_iter()
                .map(|image| plain(image, rng))
                .collect(),
            BaselineLayout::Spread { delay } => {
                let slots = self.images.len() as f64 + 1.0;
                self.images
                    .iter()
                    .enumerate()
                    .map(|(index, image)| Decoration {
                        image: *image,
                        left_percent: Some((index as f64 + 1.0) * (100.0 / slots)),
                        delays: vec![uniform(rng, delay), uniform(rng, &self.delays[1])],
                        durations: self.durations(rng),
                        rotation: self.rotation(rng),
                    })
                    .collect()
            }
        }
    }

    /// Plan `count` randomly parameterized extras
    pub fn random_extras<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<Decoration> {
        (0..count)
            .map(|_| Decoration {
                image: self.pick_image(rng),
                left_percent: Some(rng.gen_range(0.0..100.0)),
                delays: vec![uniform(rng, &self.delays[0]), uniform(rng, &self.delays[1])],
                durations: self.durations(rng),
                rotation: self.rotation(rng),
            })
            .collect()
    }

    /// Create the elements for `decorations` under `container`
    pub fn mount(&self, host: &mut dyn Host, container: NodeId, decorations: &[Decoration]) -> Vec<NodeId> {
        decorations
            .iter()
            .map(|decoration| {
                let node = host.create_element("div");
                host.set_class_name(node, self.element_class);

                let img = host.create_element("img");
                host.set_attribute(img, "src", decoration.image);
                host.set_attribute(img, "alt", "");
                host.append_child(node, img);

                if let Some(left) = decoration.left_percent {
                    host.set_style(node, "left", &format!("{left}%"));
                }
                if !decoration.delays.is_empty() {
                    host.set_style(node, "animation-delay", &seconds_list(&decoration.delays));
                }
                if let Some((fall, sway)) = decoration.durations {
                    host.set_style(node, "animation-duration", &seconds_list(&[fall, sway]));
                }
                if let Some(rotation) = decoration.rotation {
                    host.set_style(node, "--rotate-start", &format!("{}deg", rotation.start_deg));
                    host.set_style(node, "--rotate-end", &format!("{}deg", rotation.end_deg));
                }

                host.append_child(container, node);
                node
            })
            .collect()
    }
}

/// Extras are added on wide viewports, or anywhere when the mobile override is on
pub fn extras_allowed(enabled: bool, mobile_override: bool, viewport_width: f64) -> bool {
    enabled && (viewport_width > MOBILE_BREAKPOINT || mobile_override)
}

fn uniform<R: Rng + ?Sized>(rng: &mut R, range: &Range<f64>) -> f64 {
    if range.is_empty() {
        range.start
    } else {
        rng.gen_range(range.clone())
    }
}

fn seconds_list(values: &[f64]) -> String {
    values.iter().map(|v| format!("{v}s")).collect::<Vec<_>>().join(", ")
}
