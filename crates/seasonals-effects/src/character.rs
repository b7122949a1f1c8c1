//! Characters that cross the screen
//!
//! A character runs `Idle -> Traveling -> Resting -> Traveling -> ...`
//! while the overlay is visible. Traveling is a frame loop, resting is a
//! single timer. At most one of the two is pending at any time.

use std::f64::consts::PI;
use std::ops::Range;

use rand::Rng;

use crate::host::{Host, NodeId};
use crate::scheduler::{LoopId, Scheduler, Tick, TimerId};

/// Period of one bunny hop
pub const HOP_PERIOD_MS: f64 = 500.0;
/// Height of the arc a gliding character flies through
pub const GLIDE_ARC_PX: f64 = 50.0;
/// How far off-screen a gliding character starts
pub const GLIDE_MARGIN_PX: f64 = 220.0;
/// Retry delay while the sprite has no layout yet
pub const LAYOUT_RETRY_MS: f64 = 100.0;

/// How a character moves
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CharacterMotion {
    /// Hop along the bottom edge; x is measured in `vw`
    Hop { hop_height: f64 },
    /// Glide across the upper part of the screen in one arc; x in px
    Glide,
}

/// One randomized crossing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trajectory {
    pub start_x: f64,
    pub end_x: f64,
    pub start_y: f64,
    pub end_y: f64,
    pub duration_ms: f64,
    /// True when moving towards larger x
    pub left_to_right: bool,
    /// Body tilt in degrees (gliders only)
    pub tilt_deg: f64,
}

impl Trajectory {
    fn x_at(&self, progress: f64) -> f64 {
        self.start_x + (self.end_x - self.start_x) * progress
    }
}

/// Where a character is drawn on one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    AwaitingLayout(TimerId),
    Traveling {
        frame_loop: LoopId,
        trajectory: Trajectory,
        started_at: Option<f64>,
    },
    Resting(TimerId),
}

/// A sprite driven by the scheduler
#[derive(Debug)]
pub struct CharacterAnimator {
    node: NodeId,
    motion: CharacterMotion,
    duration_ms: f64,
    rest_ms: Range<f64>,
    phase: Phase,
}

impl CharacterAnimator {
    /// `duration_ms` is one crossing; `rest_ms` bounds the pause between crossings
    pub fn new(node: NodeId, motion: CharacterMotion, duration_ms: f64, rest_ms: Range<f64>) -> Self {
        Self {
            node,
            motion,
            duration_ms,
            rest_ms,
            phase: Phase::Idle,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Milliseconds for one crossing
    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// True while traveling, resting, or waiting for layout
    pub fn is_running(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn is_traveling(&self) -> bool {
        matches!(self.phase, Phase::Traveling { .. })
    }

    /// Frame loop of the current crossing
    pub fn frame_loop(&self) -> Option<LoopId> {
        match self.phase {
            Phase::Traveling { frame_loop, .. } => Some(frame_loop),
            _ => None,
        }
    }

    /// Current crossing, if any
    pub fn trajectory(&self) -> Option<&Trajectory> {
        match &self.phase {
            Phase::Traveling { trajectory, .. } => Some(trajectory),
            _ => None,
        }
    }

    /// Begin a fresh crossing. Does nothing if already running.
    pub fn start<R: Rng + ?Sized>(&mut self, host: &mut dyn Host, scheduler: &mut Scheduler, rng: &mut R) {
        if self.is_running() {
            return;
        }

        let Some(trajectory) = self.plan(host, rng) else {
            log::debug!("Character sprite has no layout yet, retrying");
            self.phase = Phase::AwaitingLayout(scheduler.set_timeout(LAYOUT_RETRY_MS));
            return;
        };

        self.write_pose(host, &trajectory, 0.0, 0.0);
        self.phase = Phase::Traveling {
            frame_loop: scheduler.start_loop(),
            trajectory,
            started_at: None,
        };
    }

    /// Cancel whatever is pending and go idle
    pub fn stop(&mut self, scheduler: &mut Scheduler) {
        match self.phase {
            Phase::Idle => return,
            Phase::AwaitingLayout(timer) | Phase::Resting(timer) => {
                scheduler.clear_timeout(timer);
            }
            Phase::Traveling { frame_loop, .. } => {
                scheduler.cancel_loop(frame_loop);
            }
        }
        self.phase = Phase::Idle;
    }

    /// Advance the crossing; returns [`Tick::Stop`] once the character rests
    ///
    /// Frames for other loops are ignored.
    pub fn on_frame<R: Rng + ?Sized>(
        &mut self,
        id: LoopId,
        host: &mut dyn Host,
        scheduler: &mut Scheduler,
        rng: &mut R,
    ) -> Tick {
        let Phase::Traveling {
            frame_loop,
            trajectory,
            started_at,
        } = &mut self.phase
        else {
            return Tick::Stop;
        };
        if *frame_loop != id {
            return Tick::Stop;
        }

        let now = scheduler.now();
        let start = *started_at.get_or_insert(now);
        let elapsed = now - start;
        let progress = (elapsed / trajectory.duration_ms).min(1.0);
        let trajectory = *trajectory;
        self.write_pose(host, &trajectory, progress, elapsed);

        if progress < 1.0 {
            return Tick::Continue;
        }

        let rest = if self.rest_ms.is_empty() {
            self.rest_ms.start
        } else {
            rng.gen_range(self.rest_ms.clone())
        };
        self.phase = Phase::Resting(scheduler.set_timeout(rest));
        Tick::Stop
    }

    /// Wake up from a rest or a layout retry
    pub fn on_timer<R: Rng + ?Sized>(
        &mut self,
        id: TimerId,
        host: &mut dyn Host,
        scheduler: &mut Scheduler,
        rng: &mut R,
    ) {
        match self.phase {
            Phase::AwaitingLayout(timer) | Phase::Resting(timer) if timer == id => {
                self.phase = Phase::Idle;
                self.start(host, scheduler, rng);
            }
            _ => {}
        }
    }

    /// Pose at `progress` through a crossing, `elapsed_ms` into it
    pub fn pose(&self, trajectory: &Trajectory, progress: f64, elapsed_ms: f64) -> Pose {
        let x = trajectory.x_at(progress);
        match self.motion {
            CharacterMotion::Hop { hop_height } => Pose {
                x,
                y: (elapsed_ms / HOP_PERIOD_MS * PI).sin() * hop_height,
            },
            CharacterMotion::Glide => Pose {
                x,
                y: trajectory.start_y + (trajectory.end_y - trajectory.start_y) * progress
                    - GLIDE_ARC_PX * (progress * PI).sin(),
            },
        }
    }

    fn plan<R: Rng + ?Sized>(&self, host: &dyn Host, rng: &mut R) -> Option<Trajectory> {
        let left_to_right = rng.gen_bool(0.5);
        match self.motion {
            CharacterMotion::Hop { .. } => {
                let (start_x, end_x) = if left_to_right { (-10.0, 110.0) } else { (110.0, -10.0) };
                Some(Trajectory {
                    start_x,
                    end_x,
                    start_y: 0.0,
                    end_y: 0.0,
                    duration_ms: self.duration_ms,
                    left_to_right,
                    tilt_deg: 0.0,
                })
            }
            CharacterMotion::Glide => {
                let sprite_height = host.bounding_rect(self.node).height();
                if sprite_height <= 0.0 {
                    return None;
                }
                let viewport = host.viewport();
                let band = viewport.height / 5.0;
                let (start_x, end_x) = if left_to_right {
                    (-GLIDE_MARGIN_PX, viewport.width + GLIDE_MARGIN_PX)
                } else {
                    (viewport.width + GLIDE_MARGIN_PX, -GLIDE_MARGIN_PX)
                };
                Some(Trajectory {
                    start_x,
                    end_x,
                    start_y: rng.gen_range(0.0..band.max(f64::MIN_POSITIVE)) + sprite_height,
                    end_y: rng.gen_range(0.0..band.max(f64::MIN_POSITIVE)) + sprite_height,
                    duration_ms: self.duration_ms,
                    left_to_right,
                    tilt_deg: rng.gen_range(-8.0..8.0),
                })
            }
        }
    }

    fn write_pose(&self, host: &mut dyn Host, trajectory: &Trajectory, progress: f64, elapsed_ms: f64) {
        let pose = self.pose(trajectory, progress, elapsed_ms);
        match self.motion {
            CharacterMotion::Hop { .. } => {
                let direction = if trajectory.left_to_right { 1 } else { -1 };
                host.set_style(
                    self.node,
                    "transform",
                    &format!("translate({}vw, {}px) scaleX({direction})", pose.x, pose.y),
                );
            }
            CharacterMotion::Glide => {
                host.set_style(self.node, "left", &format!("{}px", pose.x));
                host.set_style(self.node, "top", &format!("{}px", pose.y));
                if progress == 0.0 {
                    // The sprite faces left
                    let mirror = if trajectory.left_to_right { -1 } else { 1 };
                    host.set_style(
                        self.node,
                        "transform",
                        &format!("rotate({}deg) scaleX({mirror})", trajectory.tilt_deg),
                    );
                }
            }
        }
    }
}
