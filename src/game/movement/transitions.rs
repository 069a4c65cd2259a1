// Locomotion transitions: guards and data hand-offs between the concrete states

use glam::Vec3;

use super::states::{Jump, Run, Vault, Walk, WallRun};
use crate::core::math::{is_equal_approx, is_zero_approx};
use crate::engine::physics::ColliderInfo;
use crate::game::fsm::{Binding, StateId, Transition, TransitionTable};
use crate::game::movement::MotionContext;

/// Extra distance past the far side of a vaulted obstacle
const VAULT_CLEARANCE: f32 = 0.5;

/// Register every locomotion transition; other pairs stay neutral
pub fn register_defaults(table: &mut TransitionTable) {
    table.register(StateId::Walk, StateId::Run, Box::new(WalkToRunTransition));
    table.register(StateId::Run, StateId::Walk, Box::new(RunToWalkTransition));
    table.register_from_any(StateId::WallRun, Box::new(AnyToWallRunTransition));
    table.register(StateId::WallRun, StateId::Jump, Box::new(WallRunToJumpTransition));
    table.register_from_any(StateId::Vault, Box::new(AnyToVaultTransition));
}

/// Running is refused while catching breath or without the run ability
#[derive(Debug, Default, Clone, Copy)]
pub struct WalkToRunTransition;

impl Transition for WalkToRunTransition {
    fn name(&self) -> &'static str {
        "WalkToRunTransition"
    }

    fn should_transition(&self, binding: &mut Binding<'_>, ctx: &mut MotionContext<'_>) -> bool {
        match binding.states::<Walk, Run>() {
            Some((walk, _)) => walk.catching_breath.is_stopped() && ctx.actor.abilities.run,
            None => true,
        }
    }
}

/// Starts the breath cooldown when the sprint ran out
#[derive(Debug, Default, Clone, Copy)]
pub struct RunToWalkTransition;

impl Transition for RunToWalkTransition {
    fn name(&self) -> &'static str {
        "RunToWalkTransition"
    }

    fn should_transition(&self, _binding: &mut Binding<'_>, _ctx: &mut MotionContext<'_>) -> bool {
        true
    }

    fn on_transition(&self, binding: &mut Binding<'_>, _ctx: &mut MotionContext<'_>) {
        if let Some((run, walk)) = binding.states::<Run, Walk>() {
            if run.in_recovery {
                walk.catching_breath.start();
                log::debug!(
                    "Catching breath for {:.1}s",
                    walk.catching_breath.wait_time()
                );
            }
        }
    }
}

/// Hands the wall normals found by the outgoing state to the wall run
#[derive(Debug, Default, Clone, Copy)]
pub struct AnyToWallRunTransition;

impl Transition for AnyToWallRunTransition {
    fn name(&self) -> &'static str {
        "AnyToWallRunTransition"
    }

    fn should_transition(&self, _binding: &mut Binding<'_>, _ctx: &mut MotionContext<'_>) -> bool {
        true
    }

    fn on_transition(&self, binding: &mut Binding<'_>, _ctx: &mut MotionContext<'_>) {
        let Some(normals) = binding.from.motion().map(|motion| motion.wall_normals.clone()) else {
            return;
        };

        if let Some(wall_run) = binding.to_state::<WallRun>() {
            wall_run.motion.wall_normals = normals;
        }
    }
}

/// Carries the wall-jump boosts into the jump
#[derive(Debug, Default, Clone, Copy)]
pub struct WallRunToJumpTransition;

impl Transition for WallRunToJumpTransition {
    fn name(&self) -> &'static str {
        "WallRunToJumpTransition"
    }

    fn should_transition(&self, _binding: &mut Binding<'_>, _ctx: &mut MotionContext<'_>) -> bool {
        true
    }

    fn on_transition(&self, binding: &mut Binding<'_>, _ctx: &mut MotionContext<'_>) {
        if let Some((wall_run, jump)) = binding.states::<WallRun, Jump>() {
            jump.jump_horizontal_boost = wall_run.config.jump_horizontal_boost;
            jump.jump_vertical_boost = wall_run.config.jump_vertical_boost;
        }
    }
}

/// Only low, thin, static boxes can be vaulted.
///
/// The guard measures the obstacle hit by the front detector along the hit
/// normal and stores the displacement that carries the character over it.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnyToVaultTransition;

impl AnyToVaultTransition {
    /// Depth of `obstacle` along an axis-aligned `normal`; zero for anything else
    fn size_along_normal(obstacle: &ColliderInfo, normal: Vec3) -> f32 {
        let Some(size) = obstacle.box_size() else {
            return 0.0;
        };

        if is_equal_approx(normal, Vec3::NEG_Z) || is_equal_approx(normal, Vec3::Z) {
            size.z.abs()
        } else if is_equal_approx(normal, Vec3::NEG_X) || is_equal_approx(normal, Vec3::X) {
            size.x.abs()
        } else {
            0.0
        }
    }
}

impl Transition for AnyToVaultTransition {
    fn name(&self) -> &'static str {
        "AnyToVaultTransition"
    }

    fn should_transition(&self, binding: &mut Binding<'_>, ctx: &mut MotionContext<'_>) -> bool {
        let Some(vault) = binding.to_state::<Vault>() else {
            return false;
        };

        let front = &ctx.actor.detectors.front;
        let normal = front.collision_normal();
        let Some(obstacle) = front.collider().filter(|collider| collider.body.is_static()) else {
            log::debug!("Nothing static in front to vault over");
            return false;
        };

        let Some(height) = obstacle.box_size().map(|size| size.y) else {
            return false;
        };

        let size = Self::size_along_normal(obstacle, normal);
        let config = &vault.motion.config;
        if size > 0.0 && size <= config.vault_max_obstacle_size && height <= config.vault_max_obstacle_height {
            vault.movement_amount = -normal * (size + ctx.actor.stand_radius() + VAULT_CLEARANCE);
        }

        !is_zero_approx(vault.movement_amount)
    }
}
