//! Easter eggs with a hopping bunny

use seasonals_config::EasterConfig;
use seasonals_theme::registry::EASTER;

use super::{DecorationModule, DecorationPlan};
use crate::character::{CharacterAnimator, CharacterMotion};
use crate::decorations::{BaselineLayout, DecorationStyle, RotationMode};
use crate::module::{ModuleSnapshot, ThemeContext, ThemeModule};
use crate::scheduler::{LoopId, Tick, TimerId};
use crate::visibility::Visibility;

pub const IMAGES: &[&str] = &[
    "../Seasonals/Resources/easter_images/egg_1.png",
    "../Seasonals/Resources/easter_images/egg_2.png",
    "../Seasonals/Resources/easter_images/egg_3.png",
    "../Seasonals/Resources/easter_images/egg_4.png",
    "../Seasonals/Resources/easter_images/egg_5.png",
    "../Seasonals/Resources/easter_images/egg_6.png",
    "../Seasonals/Resources/easter_images/egg_7.png",
    "../Seasonals/Resources/easter_images/egg_8.png",
    "../Seasonals/Resources/easter_images/egg_9.png",
    "../Seasonals/Resources/easter_images/egg_10.png",
    "../Seasonals/Resources/easter_images/egg_11.png",
    "../Seasonals/Resources/easter_images/egg_12.png",
];

pub const BUNNY_IMAGE: &str = "../Seasonals/Resources/easter_images/easter-bunny.png";

/// Eggs always on screen
pub const BASELINE_COUNT: usize = 12;

/// Eggs plus an optional bunny
#[derive(Debug)]
pub struct EasterModule {
    eggs: DecorationModule,
    bunny_enabled: bool,
    hop_height: f64,
    bunny_duration: f64,
    rest_ms: std::ops::Range<f64>,
    bunny: Option<CharacterAnimator>,
}

impl EasterModule {
    pub fn new(config: &EasterConfig) -> Self {
        let eggs = DecorationModule::new(DecorationPlan {
            name: EASTER.name,
            label: "Easter",
            container_class: EASTER.container_class,
            enabled: config.enable_easter,
            style: DecorationStyle {
                element_class: "easter",
                images: IMAGES,
                delays: [0.0..12.0, 0.0..5.0],
                durations: [6.0..16.0, 2.0..7.0],
                different_durations: config.enable_different_duration,
                rotation: RotationMode::Unsupported,
            },
            baseline: BaselineLayout::Shuffled(BASELINE_COUNT),
            random_extras: config.enable_random_easter,
            mobile_extras: config.enable_random_easter_mobile,
            extra_count: config.egg_count as usize,
        });

        let min_rest = config.min_bunny_rest_time.min(config.max_bunny_rest_time);
        Self {
            eggs,
            bunny_enabled: config.enable_bunny,
            hop_height: config.hop_height,
            bunny_duration: config.bunny_duration,
            rest_ms: min_rest..config.max_bunny_rest_time,
            bunny: None,
        }
    }

    pub fn bunny(&self) -> Option<&CharacterAnimator> {
        self.bunny.as_ref()
    }

    fn add_bunny(&mut self, ctx: &mut ThemeContext<'_>) {
        let Some(container) = self.eggs.container() else {
            return;
        };

        let rabbit = ctx.host.create_element("img");
        ctx.host.set_attribute(rabbit, "id", "rabbit");
        ctx.host.set_attribute(rabbit, "src", BUNNY_IMAGE);
        ctx.host.set_attribute(rabbit, "alt", "Hopping Easter Bunny");
        ctx.host.set_class_name(rabbit, "hopping-rabbit");
        ctx.host.append_child(container, rabbit);
        ctx.host.set_style(rabbit, "bottom", &format!("{}px", self.hop_height / 2.0 + 6.0));

        self.bunny = Some(CharacterAnimator::new(
            rabbit,
            CharacterMotion::Hop { hop_height: self.hop_height },
            self.bunny_duration,
            self.rest_ms.clone(),
        ));
    }
}

impl ThemeModule for EasterModule {
    fn name(&self) -> &'static str {
        self.eggs.name()
    }

    fn container_class(&self) -> &'static str {
        self.eggs.container_class()
    }

    fn label(&self) -> &'static str {
        self.eggs.label()
    }

    fn activate(&mut self, ctx: &mut ThemeContext<'_>) -> bool {
        if !self.eggs.populate(ctx) {
            return false;
        }
        if self.bunny_enabled {
            self.add_bunny(ctx);
        }
        true
    }

    fn deactivate(&mut self, ctx: &mut ThemeContext<'_>) {
        if let Some(mut bunny) = self.bunny.take() {
            bunny.stop(ctx.scheduler);
            ctx.host.remove(bunny.node());
        }
        self.eggs.clear(ctx);
    }

    fn on_visibility_change(&mut self, visibility: Visibility, ctx: &mut ThemeContext<'_>) {
        let Some(bunny) = self.bunny.as_mut() else {
            return;
        };
        match visibility {
            Visibility::Hidden => bunny.stop(ctx.scheduler),
            Visibility::Visible => bunny.start(ctx.host, ctx.scheduler, ctx.rng),
        }
    }

    fn on_frame(&mut self, id: LoopId, ctx: &mut ThemeContext<'_>) -> Tick {
        match self.bunny.as_mut() {
            Some(bunny) => bunny.on_frame(id, ctx.host, ctx.scheduler, ctx.rng),
            None => Tick::Stop,
        }
    }

    fn on_timer(&mut self, id: TimerId, ctx: &mut ThemeContext<'_>) {
        if let Some(bunny) = self.bunny.as_mut() {
            bunny.on_timer(id, ctx.host, ctx.scheduler, ctx.rng);
        }
    }

    fn snapshot(&self) -> ModuleSnapshot {
        ModuleSnapshot {
            characters: self.bunny.as_ref().map_or(0, |b| usize::from(b.is_running())),
            ..self.eggs.snapshot()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryPage;
    use crate::scheduler::Scheduler;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_bunny_added_and_sized() {
        let mut page = MemoryPage::new();
        let mut scheduler = Scheduler::new();
        let mut rng = StdRng::seed_from_u64(1);
        let mut module = EasterModule::new(&EasterConfig::default());

        let mut ctx = ThemeContext {
            host: &mut page,
            scheduler: &mut scheduler,
            rng: &mut rng,
        };
        assert!(module.activate(&mut ctx));

        let rabbit = module.bunny().unwrap().node();
        assert_eq!(page.attribute(rabbit, "id"), Some("rabbit"));
        assert_eq!(page.style(rabbit, "bottom"), Some("12px"));
        assert_eq!(page.count("easter"), BASELINE_COUNT + 20);
    }

    #[test]
    fn test_bunny_disabled() {
        let mut page = MemoryPage::new();
        let mut scheduler = Scheduler::new();
        let mut rng = StdRng::seed_from_u64(1);
        let mut module = EasterModule::new(&EasterConfig {
            enable_bunny: false,
            ..Default::default()
        });

        let mut ctx = ThemeContext {
            host: &mut page,
            scheduler: &mut scheduler,
            rng: &mut rng,
        };
        assert!(module.activate(&mut ctx));
        module.on_visibility_change(Visibility::Visible, &mut ctx);
        assert!(module.bunny().is_none());
        assert_eq!(scheduler.active_loops(), 0);
    }

    #[test]
    fn test_shuffled_baseline_uses_each_egg_once() {
        let mut page = MemoryPage::with_viewport(vello::kurbo::Size::new(500.0, 800.0));
        let mut scheduler = Scheduler::new();
        let mut rng = StdRng::seed_from_u64(8);
        let mut module = EasterModule::new(&EasterConfig::default());

        let mut ctx = ThemeContext {
            host: &mut page,
            scheduler: &mut scheduler,
            rng: &mut rng,
        };
        module.activate(&mut ctx);

        let mut sources: Vec<String> = page
            .query_all("easter")
            .into_iter()
            .map(|egg| page.attribute(page.children(egg)[0], "src").unwrap().to_string())
            .collect();
        sources.sort();
        sources.dedup();
        assert_eq!(sources.len(), BASELINE_COUNT);
    }
}
