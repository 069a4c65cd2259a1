use crate::core::math::is_zero_approx;
use crate::engine::input::Action;
use crate::game::fsm::{FsmHandle, State, StateId};
use crate::game::movement::config::{MotionConfig, RunConfig};
use crate::game::movement::{Motion, MotionContext, Timer};

/// Sprinting, limited by `sprint_time` when it is positive
#[derive(Debug, Clone)]
pub struct Run {
    pub motion: Motion,
    pub config: RunConfig,
    pub sprint: Timer,
    /// The last sprint ended because it ran out, not because it was released
    pub in_recovery: bool,
}

impl Run {
    pub fn new(motion: MotionConfig, config: RunConfig) -> Self {
        Self {
            motion: Motion::new(motion),
            sprint: Timer::new(config.sprint_time),
            config,
            in_recovery: false,
        }
    }
}

impl State for Run {
    fn id(&self) -> StateId {
        StateId::Run
    }

    fn enter(&mut self, _fsm: &mut FsmHandle<'_>, ctx: &mut MotionContext<'_>) {
        self.motion.enter(ctx);

        if self.config.sprint_time > 0.0 {
            self.sprint.start_with(self.config.sprint_time);
        }

        self.in_recovery = false;
        ctx.actor.detectors.floor.enabled = true;
    }

    fn exit(&mut self, _next: StateId, _fsm: &mut FsmHandle<'_>, ctx: &mut MotionContext<'_>) {
        self.sprint.stop();
        ctx.actor.detectors.floor.enabled = false;
    }

    fn physics_update(&mut self, delta: f32, fsm: &mut FsmHandle<'_>, ctx: &mut MotionContext<'_>) {
        if !self.motion.physics_update(delta, fsm, ctx) {
            return;
        }

        let config = &self.config;
        self.motion
            .move_actor(ctx.actor, config.speed, delta, config.acceleration, config.friction);

        if ctx.input.just_released(Action::Run) {
            if is_zero_approx(ctx.actor.body.velocity) {
                fsm.change_state_to(StateId::Idle);
            } else {
                fsm.change_state_to(StateId::Walk);
            }
        }

        if ctx.input.just_pressed(Action::Crouch) && ctx.actor.abilities.slide {
            fsm.change_state_to(StateId::Slide);
        }

        self.motion.stair_step_up(ctx);
        ctx.actor.move_and_slide(ctx.space, delta);
        self.motion.stair_step_down(ctx);

        self.motion.ledge_detect(fsm, ctx);
        self.motion.detect_jump(fsm, ctx);
    }

    fn tick_timers(&mut self, delta: f32, fsm: &mut FsmHandle<'_>, _ctx: &mut MotionContext<'_>) {
        if self.sprint.tick(delta) {
            log::debug!("Sprint ran out after {:.1}s", self.sprint.wait_time());
            self.in_recovery = true;
            fsm.change_state_to(StateId::Walk);
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
    use crate::game::fsm::FiniteStateMachine;
    use crate::game::movement::LocomotionConfig;
    use crate::testing::Rig;
    use approx::assert_abs_diff_eq;

    const DELTA: f32 = 1.0 / 60.0;

    fn running(config: &LocomotionConfig) -> (Rig, FiniteStateMachine) {
        let mut rig = Rig::new();
        let mut fsm = rig.machine(config);
        rig.input.press(Action::MoveForward);
        rig.input.press(Action::Run);
        rig.step(&mut fsm, DELTA);
        rig.step(&mut fsm, DELTA);
        assert!(fsm.current_state_is(StateId::Run));
        (rig, fsm)
    }

    #[test]
    fn test_reaches_run_speed() {
        let (mut rig, mut fsm) = running(&LocomotionConfig::default());

        for _ in 0..30 {
            rig.step(&mut fsm, DELTA);
        }

        assert_abs_diff_eq!(rig.controller.body.velocity.z, -5.5, epsilon = 1e-4);
    }

    #[test]
    fn test_releasing_run_walks_on() {
        let (mut rig, mut fsm) = running(&LocomotionConfig::default());
        rig.step(&mut fsm, DELTA);

        rig.input.release(Action::Run);
        rig.step(&mut fsm, DELTA);

        assert!(fsm.current_state_is(StateId::Walk));
        assert!(fsm.state::<Run>().map_or(false, |run| run.sprint.is_stopped()));
    }

    #[test]
    fn test_crouch_slides_only_with_ability() {
        let (mut rig, mut fsm) = running(&LocomotionConfig::default());
        rig.input.press(Action::Crouch);
        rig.step(&mut fsm, DELTA);
        assert!(fsm.current_state_is(StateId::Run));

        let (mut rig, mut fsm) = running(&LocomotionConfig::default());
        rig.controller.abilities.slide = true;
        rig.input.press(Action::Crouch);
        rig.step(&mut fsm, DELTA);
        assert!(fsm.current_state_is(StateId::Slide));
    }

    #[test]
    fn test_unlimited_sprint() {
        let mut config = LocomotionConfig::default();
        config.run.sprint_time = 0.0;
        let (mut rig, mut fsm) = running(&config);

        for _ in 0..600 {
            rig.step(&mut fsm, DELTA);
        }

        assert!(fsm.current_state_is(StateId::Run));
    }
}
