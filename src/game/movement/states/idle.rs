use glam::Vec3;

use crate::core::math::{is_zero_approx, lerp};
use crate::game::fsm::{FsmHandle, State, StateId};
use crate::game::movement::config::{IdleConfig, MotionConfig};
use crate::game::movement::{Motion, MotionContext};

/// Standing still, bleeding off whatever horizontal speed is left
#[derive(Debug, Clone)]
pub struct Idle {
    pub motion: Motion,
    pub config: IdleConfig,
}

impl Idle {
    pub fn new(motion: MotionConfig, config: IdleConfig) -> Self {
        Self {
            motion: Motion::new(motion),
            config,
        }
    }
}

impl State for Idle {
    fn id(&self) -> StateId {
        StateId::Idle
    }

    fn enter(&mut self, _fsm: &mut FsmHandle<'_>, ctx: &mut MotionContext<'_>) {
        self.motion.enter(ctx);
        ctx.actor.body.velocity = Vec3::ZERO;
    }

    fn physics_update(&mut self, delta: f32, fsm: &mut FsmHandle<'_>, ctx: &mut MotionContext<'_>) {
        if !self.motion.physics_update(delta, fsm, ctx) {
            return;
        }

        if !is_zero_approx(self.motion.input.world_direction) {
            fsm.change_state_to(StateId::Walk);
            return;
        }

        self.motion.detect_jump(fsm, ctx);
        self.motion.detect_crouch(fsm, ctx);

        let weight = (delta * self.config.friction).min(1.0);
        let velocity = &mut ctx.actor.body.velocity;
        velocity.x = lerp(velocity.x, 0.0, weight);
        velocity.z = lerp(velocity.z, 0.0, weight);

        ctx.actor.move_and_slide(ctx.space, delta);
    }

    fn motion(&self) -> Option<&Motion> {
        Some(&self.motion)
    }

    fn motion_mut(&mut self) -> Option<&mut Motion> {
        Some(&mut self.motion)
    }
}
