//! Cooperative frame and timer scheduling
//!
//! Everything runs on one thread. An animation registers a frame loop and
//! is ticked once per display refresh until it returns [`Tick::Stop`] or
//! the loop is cancelled. Pauses use one-shot timers so a resting
//! animation costs no frames.

/// Handle to a registered per-frame update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoopId(u64);

/// Handle to a pending one-shot timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// What a frame update wants next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Call again next frame
    Continue,
    /// Unregister this loop
    Stop,
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    id: TimerId,
    due: f64,
}

/// Frame loop and timer bookkeeping, driven by [`crate::Stage`]
#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: u64,
    /// Time of the last frame, in milliseconds
    now: f64,
    loops: Vec<LoopId>,
    timers: Vec<Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamp of the current frame in milliseconds
    pub fn now(&self) -> f64 {
        self.now
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Register a new frame loop; it is first ticked on the next frame
    pub fn start_loop(&mut self) -> LoopId {
        let id = LoopId(self.next());
        self.loops.push(id);
        id
    }

    /// Unregister a frame loop. Returns false if it was not active.
    pub fn cancel_loop(&mut self, id: LoopId) -> bool {
        let before = self.loops.len();
        self.loops.retain(|l| *l != id);
        self.loops.len() != before
    }

    pub fn is_loop_active(&self, id: LoopId) -> bool {
        self.loops.contains(&id)
    }

    /// Number of registered frame loops
    pub fn active_loops(&self) -> usize {
        self.loops.len()
    }

    /// Snapshot of registered loops in registration order
    pub fn loops(&self) -> Vec<LoopId> {
        self.loops.clone()
    }

    /// Schedule a one-shot timer `delay_ms` after the current frame
    pub fn set_timeout(&mut self, delay_ms: f64) -> TimerId {
        let id = TimerId(self.next());
        self.timers.push(Timer {
            id,
            due: self.now + delay_ms.max(0.0),
        });
        id
    }

    /// Cancel a pending timer. Returns false if it already fired.
    pub fn clear_timeout(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Number of timers still pending
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Move the clock to `now` and pop every timer that is due, earliest first
    pub fn advance(&mut self, now: f64) -> Vec<TimerId> {
        self.now = self.now.max(now);

        let mut due: Vec<Timer> = Vec::new();
        self.timers.retain(|t| {
            if t.due <= self.now {
                due.push(*t);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due.total_cmp(&b.due));
        due.into_iter().map(|t| t.id).collect()
    }

    /// Drop every loop and timer
    pub fn clear(&mut self) {
        self.loops.clear();
        self.timers.clear();
    }
}
