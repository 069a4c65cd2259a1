// Footstep emitter driven by walking and running

use crate::engine::physics::RayProbe;
use crate::game::fsm::StateId;
use crate::game::movement::Timer;

/// Surface reported when the floor has no group
pub const DEFAULT_SURFACE: &str = "default";

/// Seconds between two steps while walking
const WALK_INTERVAL: f32 = 0.6;

/// Running steps come faster
const RUN_INTERVAL_SCALE: f32 = 0.6;

/// A step that was just taken
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footstep {
    pub surface: String,
    pub running: bool,
}

/// Counts steps while the character walks or runs on something.
///
/// Only the cadence lives here; whoever plays sounds reads `last_step`.
#[derive(Debug, Clone)]
pub struct Footsteps {
    walk_interval: f32,
    interval: Timer,
    steps: u64,
    last_step: Option<Footstep>,
}

impl Default for Footsteps {
    fn default() -> Self {
        Self::new(WALK_INTERVAL)
    }
}

impl Footsteps {
    pub fn new(walk_interval: f32) -> Self {
        Self {
            walk_interval,
            interval: Timer::new(walk_interval),
            steps: 0,
            last_step: None,
        }
    }

    /// Total steps taken
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn last_step(&self) -> Option<&Footstep> {
        self.last_step.as_ref()
    }

    /// Take a step now if the cadence allows it
    pub fn step(&mut self, state: StateId, floor: &RayProbe) {
        let running = match state {
            StateId::Walk => false,
            StateId::Run => true,
            _ => return,
        };

        if !self.interval.is_stopped() {
            return;
        }

        let Some(collider) = floor.collider() else {
            return;
        };

        let surface = collider
            .group
            .clone()
            .unwrap_or_else(|| DEFAULT_SURFACE.to_string());

        self.steps += 1;
        log::trace!("Footstep #{} on {}", self.steps, surface);
        self.last_step = Some(Footstep { surface, running });

        let wait = if running {
            self.walk_interval * RUN_INTERVAL_SCALE
        } else {
            self.walk_interval
        };
        self.interval.start_with(wait);
    }

    /// Advance the cadence by one physics step
    pub fn tick(&mut self, delta: f32) {
        self.interval.tick(delta);
    }
}
