use crate::core::math::is_zero_approx;
use crate::engine::input::Action;
use crate::game::characters::Stance;
use crate::game::fsm::{FsmHandle, State, StateId};
use crate::game::movement::config::{CrouchConfig, MotionConfig};
use crate::game::movement::{Motion, MotionContext};

/// Moving crouched while the crouch action is held or the ceiling is too low
#[derive(Debug, Clone)]
pub struct Crouch {
    pub motion: Motion,
    pub config: CrouchConfig,
}

impl Crouch {
    pub fn new(motion: MotionConfig, config: CrouchConfig) -> Self {
        Self {
            motion: Motion::new(motion),
            config,
        }
    }
}

impl State for Crouch {
    fn id(&self) -> StateId {
        StateId::Crouch
    }

    fn enter(&mut self, _fsm: &mut FsmHandle<'_>, ctx: &mut MotionContext<'_>) {
        self.motion.enter(ctx);
        ctx.actor.set_stance(Stance::Crouch);
    }

    fn exit(&mut self, next: StateId, _fsm: &mut FsmHandle<'_>, ctx: &mut MotionContext<'_>) {
        if next != StateId::Crawl {
            ctx.actor.set_stance(Stance::Stand);
        }
    }

    fn physics_update(&mut self, delta: f32, fsm: &mut FsmHandle<'_>, ctx: &mut MotionContext<'_>) {
        if !self.motion.physics_update(delta, fsm, ctx) {
            return;
        }

        if !ctx.input.is_pressed(Action::Crouch) && !ctx.actor.ceiling_blocked() {
            if is_zero_approx(ctx.actor.body.velocity) {
                fsm.change_state_to(StateId::Idle);
            } else {
                fsm.change_state_to(StateId::Walk);
            }
            return;
        }

        self.motion
            .move_actor(ctx.actor, self.config.speed, delta, 0.0, 0.0);
        ctx.actor.move_and_slide(ctx.space, delta);

        self.motion.detect_crawl(fsm, ctx);
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
    use crate::engine::physics::{ColliderBuilder, PhysicsWorld};
    use crate::game::fsm::FiniteStateMachine;
    use crate::game::movement::LocomotionConfig;
    use crate::testing::Rig;
    use approx::assert_abs_diff_eq;
    use glam::Vec3;

    const DELTA: f32 = 1.0 / 60.0;

    fn crouching<S: crate::engine::physics::PhysicsSpace>(rig: &mut Rig<S>) -> FiniteStateMachine {
        let mut fsm = rig.machine(&LocomotionConfig::default());
        rig.input.press(Action::Crouch);
        rig.step(&mut fsm, DELTA);
        assert!(fsm.current_state_is(StateId::Crouch));
        fsm
    }

    #[test]
    fn test_crouched_shape_and_speed() {
        let mut rig = Rig::new();
        let mut fsm = crouching(&mut rig);
        assert_eq!(rig.controller.stance(), Stance::Crouch);
        assert_eq!(rig.controller.body.shape.height(), 1.2);

        rig.input.press(Action::MoveLeft);
        rig.step(&mut fsm, DELTA);

        assert!(fsm.current_state_is(StateId::Crouch));
        assert_abs_diff_eq!(rig.controller.body.velocity.x, -2.0, epsilon = 1e-4);
    }

    #[test]
    fn test_release_stands_up() {
        let mut rig = Rig::new();
        let mut fsm = crouching(&mut rig);

        rig.input.release(Action::Crouch);
        rig.step(&mut fsm, DELTA);

        assert!(fsm.current_state_is(StateId::Idle));
        assert_eq!(rig.controller.stance(), Stance::Stand);
    }

    #[test]
    fn test_stays_crouched_under_low_ceiling() {
        let mut world = PhysicsWorld::new();
        world.add_collider(
            ColliderBuilder::cuboid(Vec3::new(20.0, 1.0, 20.0))
                .resting_on(0.0, 0.0, 0.0)
                .name("floor"),
        );
        world.add_collider(
            ColliderBuilder::cuboid(Vec3::new(20.0, 1.0, 20.0))
                .resting_on(0.0, 2.4, 0.0)
                .name("ceiling"),
        );
        let mut rig = Rig::with_space(world);
        let mut fsm = crouching(&mut rig);

        rig.input.release(Action::Crouch);
        rig.step(&mut fsm, DELTA);

        assert!(rig.controller.ceiling_blocked());
        assert!(fsm.current_state_is(StateId::Crouch));
    }

    #[test]
    fn test_crawl_needs_ability() {
        let mut rig = Rig::new();
        let mut fsm = crouching(&mut rig);
        rig.input.press(Action::Crawl);
        rig.step(&mut fsm, DELTA);
        assert!(fsm.current_state_is(StateId::Crouch));

        rig.controller.abilities.crawl = true;
        rig.step(&mut fsm, DELTA);
        assert!(fsm.current_state_is(StateId::Crawl));
        assert_eq!(rig.controller.stance(), Stance::Crawl);
    }
}
