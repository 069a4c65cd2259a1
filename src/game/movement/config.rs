// Tuning parameters for the locomotion states

use glam::Vec3;

/// Shared by every locomotion state
#[derive(Debug, Clone, PartialEq)]
pub struct MotionConfig {
    /// Downward acceleration while airborne (units/s²)
    pub gravity: f32,
    /// Gravity only applies while this is set
    pub gravity_active: bool,
    /// Maximum speed along the gravity direction
    pub fall_velocity_limit: f32,

    // Stair stepping
    pub stair_stepping_enabled: bool,
    pub max_step_up: f32,
    pub max_step_down: f32,
    /// How far ahead a step is looked for
    pub step_distance_to_check: f32,
    /// Extra slope tolerance on top of the body's floor angle, in degrees
    pub floor_max_angle_check_degrees: f32,

    // Vaulting
    /// Ledge probe origin, relative to the front detector's hit point
    pub vault_offset: Vec3,
    pub vault_max_obstacle_size: f32,
    pub vault_max_obstacle_height: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            gravity: 15.8,
            gravity_active: true,
            fall_velocity_limit: 300.0,
            stair_stepping_enabled: true,
            max_step_up: 0.5,
            max_step_down: 0.5,
            step_distance_to_check: 0.1,
            floor_max_angle_check_degrees: 20.0,
            vault_offset: Vec3::new(0.0, 3.0, 0.0),
            vault_max_obstacle_size: 1.1,
            vault_max_obstacle_height: 1.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdleConfig {
    pub friction: f32,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self { friction: 7.0 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WalkConfig {
    pub speed: f32,
    pub acceleration: f32,
    pub friction: f32,
    /// Cooldown after a sprint ran out, before running is allowed again
    pub catching_breath_recovery_time: f32,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            speed: 3.5,
            acceleration: 10.0,
            friction: 0.0,
            catching_breath_recovery_time: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub speed: f32,
    pub acceleration: f32,
    pub friction: f32,
    /// Seconds of sprint before falling back to walking; 0 sprints forever
    pub sprint_time: f32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            speed: 5.5,
            acceleration: 25.0,
            friction: 0.0,
            sprint_time: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JumpConfig {
    /// Vertical velocity below which a descending jump becomes a fall
    pub velocity_barrier_to_fall: f32,
    pub air_control_speed: f32,
    pub acceleration: f32,
    /// Jumps allowed before landing
    pub jump_times: u32,
    /// Height lost by every extra jump
    pub height_reduced_by_jump: f32,
    /// Replaces the computed ascending gravity when positive
    pub override_jump_gravity: f32,
    /// Replaces the computed descending gravity when positive
    pub override_fall_gravity: f32,
    pub jump_height: f32,
    pub jump_time_to_peak: f32,
    pub jump_time_to_fall: f32,
    /// Physics ticks before wall-running may start off a jump
    pub wall_detection_after_frames: f32,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            velocity_barrier_to_fall: -10.0,
            air_control_speed: 7.0,
            acceleration: 12.5,
            jump_times: 1,
            height_reduced_by_jump: 0.2,
            override_jump_gravity: 0.0,
            override_fall_gravity: 0.0,
            jump_height: 2.0,
            jump_time_to_peak: 0.45,
            jump_time_to_fall: 0.4,
            wall_detection_after_frames: 25.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FallConfig {
    pub air_control_speed: f32,
    pub acceleration: f32,
    pub coyote_time: bool,
    pub coyote_time_frames: i32,
    pub jump_buffer: bool,
    pub jump_buffer_time_frames: i32,
}

impl Default for FallConfig {
    fn default() -> Self {
        Self {
            air_control_speed: 7.0,
            acceleration: 15.0,
            coyote_time: true,
            coyote_time_frames: 10,
            jump_buffer: true,
            jump_buffer_time_frames: 25,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrouchConfig {
    pub speed: f32,
}

impl Default for CrouchConfig {
    fn default() -> Self {
        Self { speed: 2.0 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrawlConfig {
    pub speed: f32,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self { speed: 1.0 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlideConfig {
    pub speed: f32,
    pub slide_time: f32,
    /// Momentum left once the slide has fully decayed
    pub friction_momentum: f32,
    /// Head roll while sliding, in degrees; 0 disables it
    pub slide_tilt: f32,
    pub reduce_speed_gradually: bool,
}

impl Default for SlideConfig {
    fn default() -> Self {
        Self {
            speed: 4.5,
            slide_time: 1.2,
            friction_momentum: 0.1,
            slide_tilt: 5.0,
            reduce_speed_gradually: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VaultConfig {
    pub speed: f32,
    /// Head roll while vaulting, in degrees
    pub vault_tilt: f32,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            speed: 2.5,
            vault_tilt: 7.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WallRunConfig {
    /// Eyes roll while running along a side wall, in radians
    pub camera_rotation_angle: f32,
    /// Signed gravity along the wall; negative values pull upward, 0 disables it
    pub wall_gravity: f32,
    pub speed: f32,
    pub acceleration: f32,
    pub friction: f32,
    /// Upward boost when the wall is in front
    pub climb_boost_speed: f32,
    /// Forward boost when the wall is on a side
    pub run_boost_speed: f32,
    /// Handed to the jump that leaves the wall
    pub jump_horizontal_boost: f32,
    pub jump_vertical_boost: f32,
}

impl Default for WallRunConfig {
    fn default() -> Self {
        Self {
            camera_rotation_angle: 0.15,
            wall_gravity: 2.5,
            speed: 7.5,
            acceleration: 0.0,
            friction: 10.0,
            climb_boost_speed: 2.0,
            run_boost_speed: 1.5,
            jump_horizontal_boost: 1.0,
            jump_vertical_boost: 0.5,
        }
    }
}

/// Every locomotion tunable in one place
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocomotionConfig {
    pub motion: MotionConfig,
    pub idle: IdleConfig,
    pub walk: WalkConfig,
    pub run: RunConfig,
    pub jump: JumpConfig,
    pub fall: FallConfig,
    pub crouch: CrouchConfig,
    pub crawl: CrawlConfig,
    pub slide: SlideConfig,
    pub vault: VaultConfig,
    pub wall_run: WallRunConfig,
}
