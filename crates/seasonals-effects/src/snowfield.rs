//! Canvas snowfall
//!
//! Keeps a fixed-size set of flakes in canvas pixel space. Each frame
//! clears the canvas, draws every flake as a white circle, then moves
//! them: down by `speed`, sideways by `swing`. Flakes leaving the bottom
//! restart at the top with a new random x; flakes leaving a side wrap to
//! the other one.
//!
//! The canvas tracks its container's size. On resize all flakes are
//! scaled proportionally so they don't bunch up.

use rand::Rng;
use vello::kurbo::{Circle, Point, Size};
use vello::peniko::Color;

use crate::host::{Host, NodeId, Selector};

/// Element id of the snow canvas
pub const CANVAS_ID: &str = "snowfallCanvas";

/// Individual flake
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnowParticle {
    pub x: f64,
    pub y: f64,
    /// Radius in pixels, [1, 1.6)
    pub radius: f64,
    /// Downward pixels per frame, [1, 1 + fall speed)
    pub speed: f64,
    /// Sideways pixels per frame, [-1, 1)
    pub swing: f64,
}

impl SnowParticle {
    fn random<R: Rng + ?Sized>(size: Size, fall_speed: f64, rng: &mut R) -> Self {
        Self {
            x: unit(rng) * size.width,
            y: unit(rng) * size.height,
            radius: 1.0 + unit(rng) * 0.6,
            speed: 1.0 + unit(rng) * fall_speed,
            swing: unit(rng) * 2.0 - 1.0,
        }
    }
}

fn unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.r#gen::<f64>()
}

/// Snow particle simulation bound to a canvas
#[derive(Debug)]
pub struct SnowField {
    count: usize,
    fall_speed: f64,
    size: Size,
    particles: Vec<SnowParticle>,
    canvas: Option<NodeId>,
    container: Option<NodeId>,
}

impl SnowField {
    pub fn new(count: usize, fall_speed: f64) -> Self {
        Self {
            count,
            fall_speed,
            size: Size::ZERO,
            particles: Vec::new(),
            canvas: None,
            container: None,
        }
    }

    pub fn particles(&self) -> &[SnowParticle] {
        &self.particles
    }

    /// Canvas size in pixels
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn canvas(&self) -> Option<NodeId> {
        self.canvas
    }

    pub fn is_attached(&self) -> bool {
        self.canvas.is_some()
    }

    /// Replace all flakes with `count` fresh ones spread over `size`
    pub fn populate<R: Rng + ?Sized>(&mut self, size: Size, rng: &mut R) {
        self.size = size;
        self.particles = (0..self.count)
            .map(|_| SnowParticle::random(size, self.fall_speed, rng))
            .collect();
    }

    /// Move every flake one frame forward
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let Size { width, height } = self.size;
        for flake in &mut self.particles {
            flake.y += flake.speed;
            flake.x += flake.swing;

            if flake.y > height {
                flake.y = 0.0;
                flake.x = unit(rng) * width;
            }

            if flake.x > width {
                flake.x = 0.0;
            }
            if flake.x < 0.0 {
                flake.x = width;
            }
        }
    }

    /// Change the canvas size, scaling flake positions to match
    pub fn resize(&mut self, size: Size) {
        let old = self.size;
        self.size = size;
        if old.width <= 0.0 || old.height <= 0.0 || self.particles.is_empty() {
            return;
        }

        let scale_x = size.width / old.width;
        let scale_y = size.height / old.height;
        for flake in &mut self.particles {
            flake.x *= scale_x;
            flake.y *= scale_y;
        }
    }

    /// Create the canvas inside `container`, observe its size and seed flakes
    ///
    /// Returns false without doing anything if a snow canvas already exists.
    pub fn attach<R: Rng + ?Sized>(&mut self, host: &mut dyn Host, container: NodeId, rng: &mut R) -> bool {
        if host.query(Selector::Id(CANVAS_ID)).is_some() {
            log::warn!("Canvas already exists.");
            return false;
        }

        let canvas = host.create_element("canvas");
        host.set_attribute(canvas, "id", CANVAS_ID);
        host.append_child(container, canvas);
        self.canvas = Some(canvas);
        self.container = Some(container);

        // Size from zero so the first resize does not rescale
        self.size = Size::ZERO;
        self.sync_size(host);
        host.observe_resize(container);

        let size = self.size;
        self.populate(size, rng);
        log::debug!("Snow canvas created with {} flakes", self.particles.len());
        true
    }

    /// Remove the canvas and stop observing the container
    ///
    /// Returns false if nothing was attached.
    pub fn detach(&mut self, host: &mut dyn Host) -> bool {
        let Some(canvas) = self.canvas.take() else {
            return false;
        };
        host.remove(canvas);
        if let Some(container) = self.container.take() {
            host.unobserve_resize(container);
        }
        self.particles.clear();
        log::info!("Canvas removed");
        true
    }

    /// Clear the canvas and draw every flake
    pub fn draw(&self, host: &mut dyn Host) {
        let Some(canvas) = self.canvas else {
            log::error!("Error: Canvas or context not found.");
            return;
        };
        host.clear_canvas(canvas);
        let white = Color::from_rgba8(255, 255, 255, 255);
        for flake in &self.particles {
            host.fill_circle(canvas, Circle::new(Point::new(flake.x, flake.y), flake.radius), white);
        }
    }

    /// One animation frame: draw, then advance
    pub fn on_frame<R: Rng + ?Sized>(&mut self, host: &mut dyn Host, rng: &mut R) {
        self.draw(host);
        self.step(rng);
    }

    /// React to a size change of the observed container
    pub fn on_resize(&mut self, host: &mut dyn Host, node: NodeId) {
        if self.container == Some(node) {
            self.sync_size(host);
        }
    }

    fn sync_size(&mut self, host: &mut dyn Host) {
        let (Some(canvas), Some(container)) = (self.canvas, self.container) else {
            return;
        };
        let size = host.bounding_rect(container).size();
        host.set_attribute(canvas, "width", &format!("{}", size.width));
        host.set_attribute(canvas, "height", &format!("{}", size.height));
        self.resize(size);
    }
}
