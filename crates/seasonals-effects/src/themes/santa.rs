//! Santa over a snowy canvas
//!
//! Two independent frame loops: the snow canvas, and Santa's flight.
//! While flying Santa occasionally drops a present that falls to the
//! bottom of the viewport through a CSS transition and is then removed.

use rand::Rng;
use rand::seq::SliceRandom;

use seasonals_config::SantaConfig;
use seasonals_theme::registry::SANTA;

use crate::character::{CharacterAnimator, CharacterMotion};
use crate::decorations::MOBILE_BREAKPOINT;
use crate::host::{NodeId, Selector, ensure_container};
use crate::module::{ModuleSnapshot, ThemeContext, ThemeModule};
use crate::scheduler::{LoopId, Tick, TimerId};
use crate::snowfield::SnowField;
use crate::visibility::Visibility;

pub const SANTA_IMAGE: &str = "../Seasonals/Resources/santa_images/santa.gif";

pub const PRESENT_IMAGES: &[&str] = &[
    "../Seasonals/Resources/santa_images/gift1.png",
    "../Seasonals/Resources/santa_images/gift2.png",
    "../Seasonals/Resources/santa_images/gift3.png",
    "../Seasonals/Resources/santa_images/gift4.png",
    "../Seasonals/Resources/santa_images/gift5.png",
    "../Seasonals/Resources/santa_images/gift6.png",
    "../Seasonals/Resources/santa_images/gift7.png",
    "../Seasonals/Resources/santa_images/gift8.png",
];

/// Chance per flight frame of dropping a present
pub const PRESENT_DROP_CHANCE: f64 = 0.05;

#[derive(Debug, Clone, Copy)]
struct Present {
    node: NodeId,
    timer: TimerId,
    /// Seconds to reach the bottom
    fall_secs: f64,
    falling: bool,
}

#[derive(Debug)]
pub struct SantaModule {
    config: SantaConfig,
    mobile: bool,
    container: Option<NodeId>,
    created_container: bool,
    snow: SnowField,
    snow_loop: Option<LoopId>,
    santa: Option<CharacterAnimator>,
    presents: Vec<Present>,
}

impl SantaModule {
    pub fn new(config: &SantaConfig) -> Self {
        Self {
            config: config.clone(),
            mobile: false,
            container: None,
            created_container: false,
            snow: SnowField::new(config.snowflakes_count as usize, config.snow_fall_speed),
            snow_loop: None,
            santa: None,
            presents: Vec::new(),
        }
    }

    pub fn snow(&self) -> &SnowField {
        &self.snow
    }

    pub fn santa(&self) -> Option<&CharacterAnimator> {
        self.santa.as_ref()
    }

    pub fn snow_loop(&self) -> Option<LoopId> {
        self.snow_loop
    }

    /// Whether the narrow-viewport defaults were picked at activation
    pub fn is_mobile(&self) -> bool {
        self.mobile
    }

    fn start_snow(&mut self, ctx: &mut ThemeContext<'_>) {
        let Some(container) = self.container else {
            return;
        };
        if self.snow_loop.is_some() {
            return;
        }
        if self.snow.attach(ctx.host, container, ctx.rng) {
            self.snow_loop = Some(ctx.scheduler.start_loop());
        }
    }

    fn stop_snow(&mut self, ctx: &mut ThemeContext<'_>) {
        if let Some(id) = self.snow_loop.take() {
            ctx.scheduler.cancel_loop(id);
            log::info!("Animation frame canceled");
        }
        self.snow.detach(ctx.host);
    }

    fn drop_present(&mut self, santa: NodeId, from_left: bool, ctx: &mut ThemeContext<'_>) {
        let Some(container) = self.container else {
            return;
        };
        let image = PRESENT_IMAGES.choose(ctx.rng).copied().unwrap_or_default();
        let present = ctx.host.create_element("img");
        ctx.host.set_attribute(present, "src", image);
        ctx.host.set_class_name(present, "present");
        ctx.host.append_child(container, present);

        let rect = ctx.host.bounding_rect(santa);
        let left = if from_left { rect.x0 } else { rect.x0 + rect.width() - 15.0 };
        ctx.host.set_style(present, "left", &format!("{left}px"));
        ctx.host.set_style(present, "top", &format!("{}px", rect.y1 - 50.0));

        let (min, max) = (self.config.min_present_fall_speed, self.config.max_present_fall_speed);
        let fall_secs = if max > min { ctx.rng.gen_range(min..max) } else { min };
        ctx.host.set_style(present, "transition", &format!("top {fall_secs}s linear"));

        // The target position is written on the next frame so the transition runs
        self.presents.push(Present {
            node: present,
            timer: ctx.scheduler.set_timeout(0.0),
            fall_secs,
            falling: false,
        });
    }

    fn clear_presents(&mut self, ctx: &mut ThemeContext<'_>) {
        for present in self.presents.drain(..) {
            ctx.scheduler.clear_timeout(present.timer);
            ctx.host.remove(present.node);
        }
    }
}

impl ThemeModule for SantaModule {
    fn name(&self) -> &'static str {
        SANTA.name
    }

    fn container_class(&self) -> &'static str {
        SANTA.container_class
    }

    fn label(&self) -> &'static str {
        "Snowfall"
    }

    fn activate(&mut self, ctx: &mut ThemeContext<'_>) -> bool {
        if !self.config.enable_santa {
            log::warn!("Santa is disabled.");
            return false;
        }

        self.created_container = ctx.host.query(Selector::Class(SANTA.container_class)).is_none();
        let container = ensure_container(ctx.host, SANTA.container_class);
        self.container = Some(container);

        let width = ctx.host.viewport().width;
        self.mobile = width < MOBILE_BREAKPOINT;
        let flight_secs = if self.mobile {
            log::info!("Mobile device detected. Reducing snowflakes count.");
            self.snow = SnowField::new(self.config.snowflakes_count_mobile as usize, self.config.snow_fall_speed);
            self.config.santa_speed_mobile
        } else {
            self.config.santa_speed
        };

        let sprite = ctx.host.create_element("img");
        ctx.host.set_attribute(sprite, "src", SANTA_IMAGE);
        ctx.host.set_class_name(sprite, "santa");
        ctx.host.append_child(container, sprite);

        let min_rest = self.config.min_santa_rest_time.min(self.config.max_santa_rest_time);
        self.santa = Some(CharacterAnimator::new(
            sprite,
            CharacterMotion::Glide,
            flight_secs * 1000.0,
            min_rest * 1000.0..self.config.max_santa_rest_time * 1000.0,
        ));

        log::info!("Santa enabled.");
        true
    }

    fn deactivate(&mut self, ctx: &mut ThemeContext<'_>) {
        self.stop_snow(ctx);
        self.clear_presents(ctx);
        if let Some(mut santa) = self.santa.take() {
            santa.stop(ctx.scheduler);
            ctx.host.remove(santa.node());
        }
        if let Some(container) = self.container.take() {
            if self.created_container {
                ctx.host.remove(container);
            }
        }
    }

    fn on_visibility_change(&mut self, visibility: Visibility, ctx: &mut ThemeContext<'_>) {
        match visibility {
            Visibility::Hidden => {
                self.stop_snow(ctx);
                self.clear_presents(ctx);
                if let Some(santa) = self.santa.as_mut() {
                    santa.stop(ctx.scheduler);
                }
            }
            Visibility::Visible => {
                self.start_snow(ctx);
                if let Some(santa) = self.santa.as_mut() {
                    santa.start(ctx.host, ctx.scheduler, ctx.rng);
                }
            }
        }
    }

    fn on_frame(&mut self, id: LoopId, ctx: &mut ThemeContext<'_>) -> Tick {
        if self.snow_loop == Some(id) {
            self.snow.on_frame(ctx.host, ctx.rng);
            return Tick::Continue;
        }

        let Some(santa) = self.santa.as_mut() else {
            return Tick::Stop;
        };
        let Some(from_left) = santa.trajectory().filter(|_| santa.frame_loop() == Some(id)).map(|t| t.left_to_right)
        else {
            return Tick::Stop;
        };

        let node = santa.node();
        let tick = santa.on_frame(id, ctx.host, ctx.scheduler, ctx.rng);
        if ctx.rng.gen_bool(PRESENT_DROP_CHANCE) {
            self.drop_present(node, from_left, ctx);
        }
        tick
    }

    fn on_timer(&mut self, id: TimerId, ctx: &mut ThemeContext<'_>) {
        if let Some(index) = self.presents.iter().position(|p| p.timer == id) {
            let present = &mut self.presents[index];
            if present.falling {
                ctx.host.remove(present.node);
                self.presents.remove(index);
            } else {
                let bottom = ctx.host.viewport().height;
                ctx.host.set_style(present.node, "top", &format!("{bottom}px"));
                present.falling = true;
                present.timer = ctx.scheduler.set_timeout(present.fall_secs * 1000.0);
            }
            return;
        }

        if let Some(santa) = self.santa.as_mut() {
            santa.on_timer(id, ctx.host, ctx.scheduler, ctx.rng);
        }
    }

    fn on_resize(&mut self, node: NodeId, ctx: &mut ThemeContext<'_>) {
        self.snow.on_resize(ctx.host, node);
    }

    fn snapshot(&self) -> ModuleSnapshot {
        ModuleSnapshot {
            decorations: 0,
            particles: self.snow.particles().len(),
            characters: self.santa.as_ref().map_or(0, |s| usize::from(s.is_running())),
            transients: self.presents.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Host;
    use crate::MemoryPage;
    use crate::scheduler::Scheduler;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use vello::kurbo::Size;

    struct Fixture {
        page: MemoryPage,
        scheduler: Scheduler,
        rng: StdRng,
        module: SantaModule,
    }

    impl Fixture {
        fn new(viewport: Size) -> Self {
            Self {
                page: MemoryPage::with_viewport(viewport),
                scheduler: Scheduler::new(),
                rng: StdRng::seed_from_u64(42),
                module: SantaModule::new(&SantaConfig::default()),
            }
        }

        fn with<T>(&mut self, f: impl FnOnce(&mut SantaModule, &mut ThemeContext<'_>) -> T) -> T {
            let mut ctx = ThemeContext {
                host: &mut self.page,
                scheduler: &mut self.scheduler,
                rng: &mut self.rng,
            };
            f(&mut self.module, &mut ctx)
        }

        fn frame(&mut self, now: f64) {
            let timers = self.scheduler.advance(now);
            for timer in timers {
                self.with(|m, ctx| m.on_timer(timer, ctx));
            }
            for id in self.scheduler.loops() {
                if self.with(|m, ctx| m.on_frame(id, ctx)) == Tick::Stop {
                    self.scheduler.cancel_loop(id);
                }
            }
        }
    }

    #[test]
    fn test_mobile_defaults() {
        let mut fixture = Fixture::new(Size::new(500.0, 900.0));
        assert!(fixture.with(|m, ctx| m.activate(ctx)));
        fixture.with(|m, ctx| m.on_visibility_change(Visibility::Visible, ctx));
        assert!(fixture.module.is_mobile());
        assert_eq!(fixture.module.snow().particles().len(), 250);
    }

    #[test]
    fn test_desktop_defaults() {
        let mut fixture = Fixture::new(Size::new(1280.0, 720.0));
        fixture.with(|m, ctx| m.activate(ctx));
        fixture.with(|m, ctx| m.on_visibility_change(Visibility::Visible, ctx));
        assert_eq!(fixture.module.snow().particles().len(), 500);
        assert_eq!(fixture.scheduler.active_loops(), 2);
    }

    #[test]
    fn test_hide_cancels_everything() {
        let mut fixture = Fixture::new(Size::new(1280.0, 720.0));
        fixture.with(|m, ctx| m.activate(ctx));
        fixture.with(|m, ctx| m.on_visibility_change(Visibility::Visible, ctx));
        for frame in 0..120 {
            fixture.frame(frame as f64 * 16.0);
        }

        fixture.with(|m, ctx| m.on_visibility_change(Visibility::Hidden, ctx));
        assert_eq!(fixture.scheduler.active_loops(), 0);
        assert_eq!(fixture.scheduler.pending_timers(), 0);
        assert_eq!(fixture.page.count("present"), 0);
        assert!(fixture.page.query(Selector::Id(crate::snowfield::CANVAS_ID)).is_none());

        fixture.with(|m, ctx| m.on_visibility_change(Visibility::Visible, ctx));
        assert_eq!(fixture.scheduler.active_loops(), 2);
    }

    #[test]
    fn test_presents_fall_and_disappear() {
        let mut fixture = Fixture::new(Size::new(1280.0, 720.0));
        fixture.with(|m, ctx| m.activate(ctx));
        fixture.with(|m, ctx| m.on_visibility_change(Visibility::Visible, ctx));

        let mut now = 0.0;
        while fixture.module.snapshot().transients == 0 {
            now += 16.0;
            fixture.frame(now);
            assert!(now < 10_000.0, "no present dropped");
        }

        let present = fixture.page.query(Selector::Class("present")).unwrap();
        let transition = fixture.page.style(present, "transition").unwrap().to_string();
        assert!(transition.starts_with("top ") && transition.ends_with("s linear"));

        now += 16.0;
        fixture.frame(now);
        assert_eq!(fixture.page.style(present, "top"), Some("720px"));

        // Longest fall is five seconds
        fixture.frame(now + 5_000.0);
        assert!(fixture.page.tag(present).is_none());
    }

    #[test]
    fn test_flight_speed_follows_breakpoint() {
        let config = SantaConfig {
            santa_speed: 12.0,
            santa_speed_mobile: 6.0,
            ..Default::default()
        };
        for (width, secs) in [(767.0, 6.0), (768.0, 12.0)] {
            let mut fixture = Fixture::new(Size::new(width, 900.0));
            fixture.module = SantaModule::new(&config);
            fixture.with(|m, ctx| m.activate(ctx));
            assert_eq!(fixture.module.is_mobile(), width < 768.0);
            assert_eq!(fixture.module.santa().unwrap().duration_ms(), secs * 1000.0);
        }
    }

    #[test]
    fn test_present_timer_sequence() {
        let mut fixture = Fixture::new(Size::new(1280.0, 720.0));
        fixture.with(|m, ctx| m.activate(ctx));
        fixture.with(|m, ctx| m.on_visibility_change(Visibility::Visible, ctx));

        let mut now = 0.0;
        let mut frames = 0;
        while fixture.page.count("present") == 0 {
            now += 16.0;
            frames += 1;
            fixture.frame(now);
            assert!(frames < 600, "no present dropped");
        }
        // A drop queues a zero-delay timer before the fall starts
        assert!(fixture.scheduler.pending_timers() >= 1);
        let present = fixture.page.query(Selector::Class("present")).unwrap();
        assert_ne!(fixture.page.style(present, "top"), Some("720px"));

        // No further drops once the flight loop is gone
        let santa_loop = fixture.module.santa().and_then(|s| s.frame_loop());
        if let Some(id) = santa_loop {
            fixture.scheduler.cancel_loop(id);
        }

        fixture.frame(now + 1.0);
        assert_eq!(fixture.page.style(present, "top"), Some("720px"));
        assert!(fixture.page.is_attached(present));

        fixture.frame(now + 1.0 + SantaConfig::default().max_present_fall_speed * 1000.0);
        assert!(!fixture.page.is_attached(present));
    }

    #[test]
    fn test_disabled() {
        let mut fixture = Fixture::new(Size::new(1280.0, 720.0));
        fixture.module = SantaModule::new(&SantaConfig {
            enable_santa: false,
            ..Default::default()
        });
        assert!(!fixture.with(|m, ctx| m.activate(ctx)));
        assert_eq!(fixture.page.count("santa"), 0);
    }
}
