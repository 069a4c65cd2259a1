use glam::Vec3;

use crate::core::math::is_zero_approx;
use crate::game::fsm::{FsmHandle, State, StateId};
use crate::game::movement::config::{MotionConfig, WallRunConfig};
use crate::game::movement::{Motion, MotionContext, WallProbe};

/// Running along, or up, a wall.
///
/// The wall is chosen on entry from the normals handed over by the previous
/// state: right first, then left, then front. A front wall is climbed, a
/// side wall is run along with the eyes rolled away from it.
#[derive(Debug, Clone)]
pub struct WallRun {
    pub motion: Motion,
    pub config: WallRunConfig,
    current_wall_normal: Vec3,
    current_wall_side: Option<WallProbe>,
    current_gravity: f32,
}

impl WallRun {
    pub fn new(motion: MotionConfig, config: WallRunConfig) -> Self {
        Self {
            motion: Motion::new(motion),
            config,
            current_wall_normal: Vec3::ZERO,
            current_wall_side: None,
            current_gravity: 0.0,
        }
    }

    pub fn wall_normal(&self) -> Vec3 {
        self.current_wall_normal
    }

    pub fn wall_side(&self) -> Option<WallProbe> {
        self.current_wall_side
    }

    /// Still touching a wall with any detector, back ones included
    fn wall_detected(&mut self, ctx: &mut MotionContext<'_>) -> bool {
        if ctx.actor.is_on_floor() {
            return false;
        }

        let found = self.motion.wall_detected(ctx);

        let actor = &mut *ctx.actor;
        let position = actor.body.position;
        let basis = actor.body.basis();
        let detectors = &mut actor.detectors;
        detectors.back_left.force_update(ctx.space, position, basis);
        detectors.back_right.force_update(ctx.space, position, basis);

        found || detectors.back_left.is_colliding() || detectors.back_right.is_colliding()
    }

    fn leave(&self, fsm: &mut FsmHandle<'_>) {
        if is_zero_approx(self.motion.input.world_direction) {
            fsm.change_state_to(StateId::Idle);
        } else {
            fsm.change_state_to(StateId::Walk);
        }
    }
}

impl State for WallRun {
    fn id(&self) -> StateId {
        StateId::WallRun
    }

    fn enter(&mut self, _fsm: &mut FsmHandle<'_>, ctx: &mut MotionContext<'_>) {
        self.motion.enter(ctx);
        ctx.actor.detectors.set_back_detectors_enabled(true);
        self.current_gravity = self.config.wall_gravity;

        let wall = [WallProbe::Right, WallProbe::Left, WallProbe::Front]
            .into_iter()
            .find_map(|probe| {
                self.motion
                    .wall_normals
                    .get(&probe)
                    .filter(|normal| !is_zero_approx(**normal))
                    .map(|normal| (probe, *normal))
            });

        if let Some((side, normal)) = wall {
            self.current_wall_side = Some(side);
            self.current_wall_normal = normal;

            let body = &mut ctx.actor.body;
            let config = &self.config;
            let (boost, roll) = match side {
                WallProbe::Front => (body.up_direction * config.climb_boost_speed, 0.0),
                WallProbe::Right => (
                    body.forward() * config.run_boost_speed,
                    config.camera_rotation_angle,
                ),
                WallProbe::Left => (
                    body.forward() * config.run_boost_speed,
                    -config.camera_rotation_angle,
                ),
            };
            body.velocity += boost;
            ctx.actor.rig.set_eyes_roll_target(roll);

            log::debug!("Wall run on the {:?} wall, normal {:?}", side, normal);
        }
    }

    fn exit(&mut self, _next: StateId, _fsm: &mut FsmHandle<'_>, ctx: &mut MotionContext<'_>) {
        ctx.actor.detectors.set_back_detectors_enabled(false);
        ctx.actor.rig.set_eyes_roll_target(0.0);

        self.current_wall_normal = Vec3::ZERO;
        self.current_wall_side = None;
        self.current_gravity = 0.0;
        self.motion.wall_normals.clear();
    }

    fn physics_update(&mut self, delta: f32, fsm: &mut FsmHandle<'_>, ctx: &mut MotionContext<'_>) {
        self.motion.input.update(ctx.actor, ctx.input);

        if ctx.actor.is_on_floor() {
            self.leave(fsm);
            return;
        }

        if self.current_gravity != 0.0 {
            self.motion.apply_gravity(self.current_gravity, delta, ctx.actor);
        }

        if !self.wall_detected(ctx) {
            if self.current_wall_side == Some(WallProbe::Front) {
                fsm.change_state_to(StateId::Jump);
            } else {
                fsm.change_state_to(StateId::Fall);
            }
            return;
        }

        let config = &self.config;
        self.motion
            .move_actor(ctx.actor, config.speed, delta, config.acceleration, config.friction);
        ctx.actor.move_and_slide(ctx.space, delta);

        if ctx.actor.abilities.wall_jump {
            self.motion.detect_jump(fsm, ctx);
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
    use crate::engine::input::Action;
    use crate::engine::physics::{ColliderBuilder, PhysicsWorld};
    use crate::game::characters::Abilities;
    use crate::game::fsm::FiniteStateMachine;
    use crate::game::movement::LocomotionConfig;
    use crate::testing::Rig;
    use approx::assert_abs_diff_eq;

    const DELTA: f32 = 1.0 / 60.0;

    /// A tall wall just right of the character, floor far below
    fn beside_wall() -> Rig<PhysicsWorld> {
        let mut world = PhysicsWorld::new();
        world.add_collider(
            ColliderBuilder::cuboid(Vec3::new(40.0, 1.0, 40.0))
                .resting_on(0.0, 0.0, 0.0)
                .name("floor"),
        );
        world.add_collider(
            ColliderBuilder::cuboid(Vec3::new(1.0, 20.0, 40.0))
                .resting_on(1.1, 20.0, 0.0)
                .name("wall"),
        );

        let mut rig = Rig::with_space(world);
        rig.controller.abilities = Abilities {
            wall_run: true,
            wall_jump: true,
            ..Abilities::default()
        };
        rig.controller.body.position.y = 10.0;
        rig.controller.move_and_slide(&rig.space, DELTA);
        rig.controller.refresh_detectors(&rig.space);
        rig
    }

    fn wall_running(rig: &mut Rig<PhysicsWorld>) -> FiniteStateMachine {
        let mut fsm = rig.machine(&LocomotionConfig::default());
        fsm.change_state_forced(StateId::Fall, &mut rig.ctx()).expect("fall");
        rig.step(&mut fsm, DELTA);
        assert!(fsm.current_state_is(StateId::WallRun));
        fsm
    }

    #[test]
    fn test_fall_next_to_wall_starts_wall_run_on_the_right() {
        let mut rig = beside_wall();
        let fsm = wall_running(&mut rig);

        let wall_run = fsm.state::<WallRun>().expect("wall run");
        assert_eq!(wall_run.wall_side(), Some(WallProbe::Right));
        assert_abs_diff_eq!(wall_run.wall_normal().x, -1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(rig.controller.rig.eyes_roll_target(), 0.15);
        assert!(rig.controller.detectors.back_left.enabled);
        // Forward boost along -Z
        assert_abs_diff_eq!(rig.controller.body.velocity.z, -1.5, epsilon = 1e-4);
    }

    #[test]
    fn test_entry_boosts_without_moving() {
        let mut rig = beside_wall();
        let mut fsm = rig.machine(&LocomotionConfig::default());
        fsm.state_mut::<WallRun>()
            .expect("wall run")
            .motion
            .wall_normals
            .insert(WallProbe::Right, Vec3::NEG_X);
        let before = rig.controller.body.position;

        fsm.change_state_forced(StateId::WallRun, &mut rig.ctx()).expect("wall run");

        assert!(fsm.current_state_is(StateId::WallRun));
        assert_eq!(rig.controller.body.position, before);
        assert_abs_diff_eq!(rig.controller.body.velocity.z, -1.5, epsilon = 1e-4);
    }

    #[test]
    fn test_wall_gravity_slows_the_slide_down() {
        let mut rig = beside_wall();
        let mut fsm = wall_running(&mut rig);
        rig.input.press(Action::MoveForward);
        let before = rig.controller.body.velocity.y;

        rig.step(&mut fsm, DELTA);

        assert!(fsm.current_state_is(StateId::WallRun));
        assert_abs_diff_eq!(rig.controller.body.velocity.y, before - 2.5 * DELTA, epsilon = 1e-4);
        assert!(rig.controller.body.velocity.z < -1.5);
    }

    #[test]
    fn test_wall_jump() {
        let mut rig = beside_wall();
        let mut fsm = wall_running(&mut rig);

        rig.input.press(Action::Jump);
        rig.step(&mut fsm, DELTA);

        assert!(fsm.current_state_is(StateId::Jump));
        assert!(rig.controller.body.velocity.y > 8.0);
        let wall_run = fsm.state::<WallRun>().expect("wall run");
        assert!(wall_run.motion.wall_normals.is_empty());
        assert_eq!(rig.controller.rig.eyes_roll_target(), 0.0);
        assert!(!rig.controller.detectors.back_left.enabled);
    }

    #[test]
    fn test_losing_the_wall_falls() {
        let mut rig = beside_wall();
        let mut fsm = wall_running(&mut rig);

        rig.controller.body.position.x = -5.0;
        rig.step(&mut fsm, DELTA);

        assert!(fsm.current_state_is(StateId::Fall));
    }
}
