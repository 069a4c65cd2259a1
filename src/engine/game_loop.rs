/// Game loop timing and control system
///
/// Implements a fixed timestep loop with variable frame updates. Physics
/// ticks run at a constant rate regardless of how irregular the host's frames
/// are, which keeps jump arcs, timers and frame-counted windows reproducible.
///
/// The loop is driven by the host: every frame it reports the elapsed wall
/// time and gets back how many physics ticks to run.

/// Physics ticks per second
pub const PHYSICS_TICKS_PER_SECOND: u32 = 60;

/// Target physics/update rate (60 updates per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / PHYSICS_TICKS_PER_SECOND as f32;

/// Maximum number of physics steps per frame to prevent spiral of death
const MAX_PHYSICS_STEPS: u32 = 5;

/// Work scheduled for one host frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSteps {
    /// Fixed-step physics ticks to run, each `FIXED_TIMESTEP` long
    pub physics_steps: u32,
    /// Variable delta for the per-frame update
    pub frame_delta: f32,
}

/// Game loop timing state
#[derive(Debug)]
pub struct GameLoop {
    /// Accumulated time for fixed timestep updates
    accumulator: f32,

    /// Total simulated time
    elapsed: f32,

    /// Whether the game is paused
    paused: bool,

    /// Current frame number
    frame_count: u64,

    /// Total updates executed
    update_count: u64,
}

impl GameLoop {
    /// Create a new game loop
    pub fn new() -> Self {
        Self {
            accumulator: 0.0,
            elapsed: 0.0,
            paused: false,
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Advance by one host frame of `frame_time` seconds
    pub fn advance(&mut self, frame_time: f32) -> FrameSteps {
        let frame_time = frame_time.max(0.0);
        self.frame_count += 1;

        // If paused, don't accumulate time for updates
        if self.paused {
            return FrameSteps {
                physics_steps: 0,
                frame_delta: 0.0,
            };
        }

        self.elapsed += frame_time;
        self.accumulator += frame_time;

        let mut updates = 0;
        while self.accumulator >= FIXED_TIMESTEP && updates < MAX_PHYSICS_STEPS {
            self.accumulator -= FIXED_TIMESTEP;
            updates += 1;
        }

        // Drop whatever the cap left behind instead of carrying a backlog
        if updates == MAX_PHYSICS_STEPS && self.accumulator >= FIXED_TIMESTEP {
            log::warn!(
                "Frame of {:.3}s exceeded {} physics steps, dropping {:.3}s",
                frame_time,
                MAX_PHYSICS_STEPS,
                self.accumulator
            );
            self.accumulator %= FIXED_TIMESTEP;
        }

        self.update_count += updates as u64;
        FrameSteps {
            physics_steps: updates,
            frame_delta: frame_time,
        }
    }

    /// Get the fixed timestep for physics updates (in seconds)
    pub fn fixed_timestep(&self) -> f32 {
        FIXED_TIMESTEP
    }

    /// Interpolation alpha between the last two physics steps
    pub fn alpha(&self) -> f32 {
        self.accumulator / FIXED_TIMESTEP
    }

    /// Get total simulated time in seconds
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed
    }

    /// Get total number of frames advanced
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get total number of updates executed
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Check if game is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause the game
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Game paused");
        }
    }

    /// Resume the game
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent update burst
            self.accumulator = 0.0;
            log::info!("Game resumed");
        }
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}
