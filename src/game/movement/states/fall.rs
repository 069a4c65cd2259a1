use crate::core::math::is_zero_approx;
use crate::engine::input::Action;
use crate::game::fsm::{FsmHandle, State, StateId};
use crate::game::movement::config::{FallConfig, MotionConfig};
use crate::game::movement::{Motion, MotionContext};

/// Airborne without having jumped, or past the point of a jump turning into a fall.
///
/// Coyote time allows a late jump for a few ticks after walking off an
/// edge. The jump buffer remembers a jump pressed just before landing.
#[derive(Debug, Clone)]
pub struct Fall {
    pub motion: Motion,
    pub config: FallConfig,
    coyote_frames_left: i32,
    jump_buffer_frames_left: i32,
    jump_requested: bool,
}

impl Fall {
    pub fn new(motion: MotionConfig, config: FallConfig) -> Self {
        Self {
            motion: Motion::new(motion),
            config,
            coyote_frames_left: 0,
            jump_buffer_frames_left: 0,
            jump_requested: false,
        }
    }

    /// Ticks of coyote time still available
    pub fn coyote_frames_left(&self) -> i32 {
        self.coyote_frames_left
    }

    /// A jump was pressed and is still buffered
    pub fn jump_buffered(&self) -> bool {
        self.config.jump_buffer && self.jump_requested && self.jump_buffer_frames_left > 0
    }

    fn coyote_jump_allowed(&self, fsm: &FsmHandle<'_>, ctx: &MotionContext<'_>) -> bool {
        self.config.coyote_time
            && ctx.actor.abilities.jump
            && self.coyote_frames_left > 0
            && fsm.previous_state() != Some(StateId::Jump)
    }

    fn reset(&mut self) {
        self.coyote_frames_left = 0;
        self.jump_buffer_frames_left = 0;
        self.jump_requested = false;
    }
}

impl State for Fall {
    fn id(&self) -> StateId {
        StateId::Fall
    }

    fn enter(&mut self, _fsm: &mut FsmHandle<'_>, ctx: &mut MotionContext<'_>) {
        self.motion.enter(ctx);
        self.reset();
        self.coyote_frames_left = self.config.coyote_time_frames;
    }

    fn exit(&mut self, _next: StateId, _fsm: &mut FsmHandle<'_>, _ctx: &mut MotionContext<'_>) {
        self.reset();
    }

    fn physics_update(&mut self, delta: f32, fsm: &mut FsmHandle<'_>, ctx: &mut MotionContext<'_>) {
        if !self.motion.physics_update(delta, fsm, ctx) {
            return;
        }

        if ctx.input.just_pressed(Action::Jump) {
            if self.coyote_jump_allowed(fsm, ctx) {
                log::debug!("Coyote jump with {} ticks to spare", self.coyote_frames_left);
                fsm.change_state_to(StateId::Jump);
                return;
            }

            self.jump_requested = true;
            self.jump_buffer_frames_left = self.config.jump_buffer_time_frames;
        }

        self.coyote_frames_left = (self.coyote_frames_left - 1).max(0);
        self.jump_buffer_frames_left = (self.jump_buffer_frames_left - 1).max(0);

        if !is_zero_approx(self.motion.input.world_direction) {
            let config = &self.config;
            self.motion
                .move_actor(ctx.actor, config.air_control_speed, delta, config.acceleration, 0.0);
        }

        ctx.actor.move_and_slide(ctx.space, delta);

        let landed = (!self.motion.was_grounded && self.motion.is_grounded) || ctx.actor.is_on_floor();
        if landed {
            if self.jump_buffered() && ctx.actor.abilities.jump {
                fsm.change_state_to(StateId::Jump);
            } else {
                fsm.change_state_to(StateId::Idle);
            }
            return;
        }

        self.motion.detect_wall_run(fsm, ctx);
    }

    fn motion(&self) -> Option<&Motion> {
        Some(&self.motion)
    }

    fn motion_mut(&mut self) -> Option<&mut Motion> {
        Some(&mut self.motion)
    }
}
