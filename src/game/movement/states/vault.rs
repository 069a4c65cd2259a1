use glam::Vec3;
use rand::Rng;

use crate::core::math::{move_toward, CMP_EPSILON};
use crate::game::fsm::{FsmHandle, State, StateId};
use crate::game::movement::config::{MotionConfig, VaultConfig};
use crate::game::movement::{Motion, MotionContext};

/// Carried over a low obstacle along a straight line.
///
/// The displacement is measured by the transition guard before entry; the
/// body is moved directly and does not collide on the way.
#[derive(Debug, Clone)]
pub struct Vault {
    pub motion: Motion,
    pub config: VaultConfig,
    /// Displacement from the entry position to the landing spot
    pub movement_amount: Vec3,
    target_position: Vec3,
}

impl Vault {
    pub fn new(motion: MotionConfig, config: VaultConfig) -> Self {
        Self {
            motion: Motion::new(motion),
            config,
            movement_amount: Vec3::ZERO,
            target_position: Vec3::ZERO,
        }
    }

    /// Where the current vault ends
    pub fn target_position(&self) -> Vec3 {
        self.target_position
    }
}

impl State for Vault {
    fn id(&self) -> StateId {
        StateId::Vault
    }

    fn enter(&mut self, _fsm: &mut FsmHandle<'_>, ctx: &mut MotionContext<'_>) {
        self.motion.enter(ctx);

        let side = if ctx.actor.rng().gen_bool(0.5) { 1.0 } else { -1.0 };
        ctx.actor
            .rig
            .set_head_roll_target(side * self.config.vault_tilt.to_radians());

        ctx.actor.body.velocity = Vec3::ZERO;
        self.target_position = ctx.actor.body.position + self.movement_amount;
        log::debug!(
            "Vaulting from {:?} to {:?}",
            ctx.actor.body.position,
            self.target_position
        );
    }

    fn exit(&mut self, _next: StateId, _fsm: &mut FsmHandle<'_>, ctx: &mut MotionContext<'_>) {
        self.movement_amount = Vec3::ZERO;
        self.target_position = Vec3::ZERO;
        ctx.actor.rig.set_head_roll_target(0.0);
    }

    fn physics_update(&mut self, delta: f32, fsm: &mut FsmHandle<'_>, ctx: &mut MotionContext<'_>) {
        let position = ctx.actor.body.position;
        if position.distance(self.target_position) <= CMP_EPSILON {
            fsm.change_state_to(StateId::Walk);
            return;
        }

        ctx.actor.body.position = move_toward(position, self.target_position, self.config.speed * delta);
    }

    fn motion(&self) -> Option<&Motion> {
        Some(&self.motion)
    }

    fn motion_mut(&mut self) -> Option<&mut Motion> {
        Some(&mut self.motion)
    }
}
