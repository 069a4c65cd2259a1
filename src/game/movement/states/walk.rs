use crate::core::math::is_zero_approx;
use crate::engine::input::Action;
use crate::game::fsm::{FsmHandle, State, StateId};
use crate::game::movement::config::{MotionConfig, WalkConfig};
use crate::game::movement::{Motion, MotionContext, Timer};

/// Ground movement at walking pace.
///
/// Also owns the breath cooldown that keeps the character from running
/// again right after a sprint ran out.
#[derive(Debug, Clone)]
pub struct Walk {
    pub motion: Motion,
    pub config: WalkConfig,
    pub catching_breath: Timer,
}

impl Walk {
    pub fn new(motion: MotionConfig, config: WalkConfig) -> Self {
        Self {
            motion: Motion::new(motion),
            catching_breath: Timer::new(config.catching_breath_recovery_time),
            config,
        }
    }
}

impl State for Walk {
    fn id(&self) -> StateId {
        StateId::Walk
    }

    fn enter(&mut self, _fsm: &mut FsmHandle<'_>, ctx: &mut MotionContext<'_>) {
        self.motion.enter(ctx);
        ctx.actor.body.velocity.y = 0.0;
        ctx.actor.detectors.floor.enabled = true;
    }

    fn exit(&mut self, _next: StateId, _fsm: &mut FsmHandle<'_>, ctx: &mut MotionContext<'_>) {
        ctx.actor.detectors.floor.enabled = false;
    }

    fn physics_update(&mut self, delta: f32, fsm: &mut FsmHandle<'_>, ctx: &mut MotionContext<'_>) {
        if !self.motion.physics_update(delta, fsm, ctx) {
            return;
        }

        let config = &self.config;
        self.motion
            .move_actor(ctx.actor, config.speed, delta, config.acceleration, config.friction);

        if is_zero_approx(self.motion.input.world_direction) || is_zero_approx(ctx.actor.body.velocity) {
            fsm.change_state_to(StateId::Idle);
            return;
        }

        if ctx.input.is_pressed(Action::Run) {
            fsm.change_state_to(StateId::Run);
        }

        self.motion.detect_crouch(fsm, ctx);

        self.motion.stair_step_up(ctx);
        ctx.actor.move_and_slide(ctx.space, delta);
        self.motion.stair_step_down(ctx);

        self.motion.ledge_detect(fsm, ctx);
        self.motion.detect_jump(fsm, ctx);
    }

    fn tick_timers(&mut self, delta: f32, _fsm: &mut FsmHandle<'_>, _ctx: &mut MotionContext<'_>) {
        if self.catching_breath.tick(delta) {
            log::debug!("Caught breath, running allowed again");
        }
    }

    fn motion(&self) -> Option<&Motion> {
        Some(&self.motion)
    }

    fn motion_mut(&mut self) -> Option<&mut Motion> {
        Some(&mut self.motion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::movement::LocomotionConfig;
    use crate::testing::Rig;
    use approx::assert_abs_diff_eq;
    use glam::Vec3;

    const DELTA: f32 = 1.0 / 60.0;

    fn walking() -> (Rig, crate::game::fsm::FiniteStateMachine) {
        let mut rig = Rig::new();
        let mut fsm = rig.machine(&LocomotionConfig::default());
        rig.input.press(Action::MoveForward);
        rig.step(&mut fsm, DELTA);
        assert!(fsm.current_state_is(StateId::Walk));
        (rig, fsm)
    }

    #[test]
    fn test_accelerates_toward_walk_speed() {
        let (mut rig, mut fsm) = walking();

        rig.step(&mut fsm, DELTA);
        assert_abs_diff_eq!(rig.controller.body.velocity.z, -10.0 * DELTA, epsilon = 1e-4);

        for _ in 0..60 {
            rig.step(&mut fsm, DELTA);
        }
        assert_abs_diff_eq!(rig.controller.body.velocity.z, -3.5, epsilon = 1e-4);
        assert!(rig.controller.body.position.z < -1.0);
        assert!(rig.controller.is_on_floor());
    }

    #[test]
    fn test_releasing_input_returns_to_idle() {
        let (mut rig, mut fsm) = walking();
        rig.step(&mut fsm, DELTA);

        rig.input.release(Action::MoveForward);
        rig.step(&mut fsm, DELTA);

        assert!(fsm.current_state_is(StateId::Idle));
        assert_eq!(rig.controller.body.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_run_held_starts_running() {
        let (mut rig, mut fsm) = walking();

        rig.input.press(Action::Run);
        rig.step(&mut fsm, DELTA);

        assert!(fsm.current_state_is(StateId::Run));
    }

    #[test]
    fn test_floor_detector_only_while_walking() {
        let (mut rig, mut fsm) = walking();
        assert!(rig.controller.detectors.floor.enabled);

        rig.input.release(Action::MoveForward);
        rig.step(&mut fsm, DELTA);

        assert!(!rig.controller.detectors.floor.enabled);
    }
}
