use crate::core::math::is_zero_approx;
use crate::engine::game_loop::PHYSICS_TICKS_PER_SECOND;
use crate::engine::input::Action;
use crate::game::fsm::{FsmHandle, State, StateId};
use crate::game::movement::config::{JumpConfig, MotionConfig};
use crate::game::movement::{Motion, MotionContext, Timer};

/// Airborne after leaving the ground on purpose.
///
/// The arc is shaped by a height and the times to reach the peak and to fall
/// back from it:
///
/// * launch velocity `2h / t_peak`
/// * gravity while rising `2h / t_peak²`
/// * gravity while descending `2h / t_fall²`
///
/// Either gravity can be overridden with a fixed positive value.
#[derive(Debug, Clone)]
pub struct Jump {
    pub motion: Motion,
    pub config: JumpConfig,
    /// Jumps spent since leaving the ground
    pub jump_count: u32,
    /// Added along the facing on the next launch, then cleared on exit
    pub jump_horizontal_boost: f32,
    /// Added to the launch velocity of the next launch, then cleared on exit
    pub jump_vertical_boost: f32,
    /// Wall running is held off until this runs out
    pub wall_detection: Timer,
}

impl Jump {
    pub fn new(motion: MotionConfig, config: JumpConfig) -> Self {
        Self {
            motion: Motion::new(motion),
            wall_detection: Timer::from_frames(
                config.wall_detection_after_frames,
                PHYSICS_TICKS_PER_SECOND,
            ),
            config,
            jump_count: 0,
            jump_horizontal_boost: 0.0,
            jump_vertical_boost: 0.0,
        }
    }

    pub fn set_jump_height(&mut self, height: f32) {
        self.config.jump_height = height.max(0.0);
    }

    pub fn set_jump_time_to_peak(&mut self, seconds: f32) {
        self.config.jump_time_to_peak = seconds;
    }

    pub fn set_jump_time_to_fall(&mut self, seconds: f32) {
        self.config.jump_time_to_fall = seconds;
    }

    pub fn jump_velocity(&self) -> f32 {
        self.velocity_for_height(self.config.jump_height)
    }

    pub fn jump_gravity(&self) -> f32 {
        if self.config.override_jump_gravity > 0.0 {
            return self.config.override_jump_gravity;
        }
        gravity_for(self.config.jump_height, self.config.jump_time_to_peak)
    }

    pub fn fall_gravity(&self) -> f32 {
        if self.config.override_fall_gravity > 0.0 {
            return self.config.override_fall_gravity;
        }
        gravity_for(self.config.jump_height, self.config.jump_time_to_fall)
    }

    fn velocity_for_height(&self, height: f32) -> f32 {
        let time = self.config.jump_time_to_peak;
        if time <= 0.0 {
            return 0.0;
        }
        2.0 * height.max(0.0) / time
    }

    /// Launch velocity of the next jump; every extra jump reaches a bit lower
    fn next_jump_velocity(&self) -> f32 {
        let reduction = self.config.height_reduced_by_jump * self.jump_count as f32;
        self.velocity_for_height(self.config.jump_height - reduction)
    }

    fn launch(&mut self, ctx: &mut MotionContext<'_>) {
        let up = ctx.actor.body.up_direction;
        let velocity = self.next_jump_velocity() + self.jump_vertical_boost;
        let body = &mut ctx.actor.body;

        body.velocity -= up * body.velocity.dot(up);
        body.velocity += up * velocity;
        self.jump_count += 1;

        log::debug!("Jump {} at {:.2} m/s", self.jump_count, velocity);
    }

    fn land(&self, fsm: &mut FsmHandle<'_>) {
        if is_zero_approx(self.motion.input.world_direction) {
            fsm.change_state_to(StateId::Idle);
        } else {
            fsm.change_state_to(StateId::Walk);
        }
    }
}

fn gravity_for(height: f32, time: f32) -> f32 {
    if time <= 0.0 {
        return 0.0;
    }
    2.0 * height / (time * time)
}

impl State for Jump {
    fn id(&self) -> StateId {
        StateId::Jump
    }

    fn enter(&mut self, _fsm: &mut FsmHandle<'_>, ctx: &mut MotionContext<'_>) {
        self.motion.enter(ctx);
        self.motion.input.update(ctx.actor, ctx.input);

        self.launch(ctx);

        if self.jump_horizontal_boost != 0.0 {
            let forward = ctx.actor.body.forward();
            ctx.actor.body.velocity += forward * self.jump_horizontal_boost;
        }

        self.wall_detection.start();
    }

    fn exit(&mut self, _next: StateId, _fsm: &mut FsmHandle<'_>, _ctx: &mut MotionContext<'_>) {
        self.jump_count = 0;
        self.jump_horizontal_boost = 0.0;
        self.jump_vertical_boost = 0.0;
        self.wall_detection.stop();
    }

    fn physics_update(&mut self, delta: f32, fsm: &mut FsmHandle<'_>, ctx: &mut MotionContext<'_>) {
        if !self.motion.physics_update(delta, fsm, ctx) {
            return;
        }

        let up = ctx.actor.body.up_direction;
        let vertical = ctx.actor.body.velocity.dot(up);
        if vertical > 0.0 {
            self.motion.apply_gravity(self.jump_gravity(), delta, ctx.actor);
        } else {
            self.motion.apply_gravity(self.fall_gravity(), delta, ctx.actor);

            let barrier = self.config.velocity_barrier_to_fall;
            if barrier < 0.0 && ctx.actor.body.velocity.dot(up) < barrier {
                fsm.change_state_to(StateId::Fall);
                return;
            }
        }

        if !is_zero_approx(self.motion.input.world_direction) {
            let config = &self.config;
            self.motion
                .move_actor(ctx.actor, config.air_control_speed, delta, config.acceleration, 0.0);
        }

        if ctx.input.just_pressed(Action::Jump)
            && self.config.jump_times > 1
            && self.jump_count < self.config.jump_times
        {
            self.launch(ctx);
        }

        ctx.actor.move_and_slide(ctx.space, delta);

        if ctx.actor.is_on_floor() {
            self.land(fsm);
            return;
        }

        if self.wall_detection.is_stopped() {
            self.motion.detect_wall_run(fsm, ctx);
        }
    }

    fn tick_timers(&mut self, delta: f32, _fsm: &mut FsmHandle<'_>, _ctx: &mut MotionContext<'_>) {
        self.wall_detection.tick(delta);
    }

    fn motion(&self) -> Option<&Motion> {
        Some(&self.motion)
    }

    fn motion_mut(&mut self) -> Option<&mut Motion> {
        Some(&mut self.motion)
    }
}
