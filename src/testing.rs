// Test doubles for the physics collaborator and a rig assembling a motion context

use std::cell::RefCell;
use std::collections::VecDeque;

use glam::Vec3;

use crate::engine::input::PlayerInput;
use crate::engine::physics::{
    ColliderId, ColliderInfo, CollisionShape, Contact, MotionResult, PhysicsSpace, RayHit,
};
use crate::game::characters::FirstPersonController;
use crate::game::fsm::{FiniteStateMachine, FsmConfig};
use crate::game::movement::{locomotion_states, LocomotionConfig, MotionContext};

fn ground_info() -> ColliderInfo {
    ColliderInfo::static_box(ColliderId(0), "ground", Vec3::new(100.0, 1.0, 100.0))
}

/// An infinite floor whose top face is the plane y = 0
#[derive(Debug, Default)]
pub struct FlatGround;

impl FlatGround {
    pub fn new() -> Self {
        Self
    }
}

impl PhysicsSpace for FlatGround {
    fn cast_ray(&self, from: Vec3, to: Vec3) -> Option<RayHit> {
        if from.y < 0.0 || to.y > 0.0 || from.y == to.y {
            return None;
        }

        let t = from.y / (from.y - to.y);
        Some(RayHit {
            point: from.lerp(to, t),
            normal: Vec3::Y,
            collider: ground_info(),
        })
    }

    fn test_motion(&self, _shape: &CollisionShape, from: Vec3, motion: Vec3) -> MotionResult {
        if motion.y >= 0.0 || from.y + motion.y > 0.0 {
            return MotionResult::free(motion);
        }

        let fraction = (from.y / -motion.y).clamp(0.0, 1.0);
        let travel = motion * fraction;
        MotionResult {
            travel,
            remainder: motion - travel,
            collision: Some(Contact {
                point: from + travel,
                normal: Vec3::Y,
                collider: ground_info(),
            }),
        }
    }
}

/// Replays queued sweep results and records every sweep it was asked for.
///
/// Once the queue is empty, sweeps fall back to `FlatGround`. Rays always
/// use `FlatGround`.
#[derive(Debug, Default)]
pub struct ScriptedSpace {
    results: RefCell<VecDeque<MotionResult>>,
    calls: RefCell<Vec<(Vec3, Vec3)>>,
}

impl ScriptedSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result of the next sweep
    pub fn push(&self, result: MotionResult) {
        self.results.borrow_mut().push_back(result);
    }

    /// Queue a sweep that is stopped after `travel` by a surface with `normal`
    pub fn push_hit(&self, travel: Vec3, remainder: Vec3, normal: Vec3) {
        self.push(MotionResult {
            travel,
            remainder,
            collision: Some(Contact {
                point: travel,
                normal,
                collider: ground_info(),
            }),
        });
    }

    /// Queue an unobstructed sweep
    pub fn push_free(&self, motion: Vec3) {
        self.push(MotionResult::free(motion));
    }

    /// `(from, motion)` of every sweep so far
    pub fn calls(&self) -> Vec<(Vec3, Vec3)> {
        self.calls.borrow().clone()
    }

    /// Number of queued results not consumed yet
    pub fn pending(&self) -> usize {
        self.results.borrow().len()
    }
}

impl PhysicsSpace for ScriptedSpace {
    fn cast_ray(&self, from: Vec3, to: Vec3) -> Option<RayHit> {
        FlatGround.cast_ray(from, to)
    }

    fn test_motion(&self, shape: &CollisionShape, from: Vec3, motion: Vec3) -> MotionResult {
        self.calls.borrow_mut().push((from, motion));
        match self.results.borrow_mut().pop_front() {
            Some(result) => result,
            None => FlatGround.test_motion(shape, from, motion),
        }
    }
}

/// A standing character on the origin of `space`, with empty input
pub struct Rig<S: PhysicsSpace = FlatGround> {
    pub controller: FirstPersonController,
    pub input: PlayerInput,
    pub space: S,
}

impl Rig<FlatGround> {
    pub fn new() -> Self {
        Self::with_space(FlatGround::new())
    }
}

impl<S: PhysicsSpace> Rig<S> {
    pub fn with_space(space: S) -> Self {
        let mut controller = FirstPersonController::new(Vec3::ZERO);
        controller.apply_floor_snap(&space);
        Self {
            controller,
            input: PlayerInput::new(),
            space,
        }
    }

    pub fn ctx(&mut self) -> MotionContext<'_> {
        MotionContext::new(&mut self.controller, &self.space, &self.input)
    }

    /// A started machine holding every locomotion state, current state Idle
    pub fn machine(&mut self, config: &LocomotionConfig) -> FiniteStateMachine {
        let mut fsm = FiniteStateMachine::new(FsmConfig::default());
        fsm.add_states(locomotion_states(config)).expect("states");
        fsm.start(&mut self.ctx()).expect("start");
        fsm
    }

    /// One physics step the way the player runs it
    pub fn step(&mut self, fsm: &mut FiniteStateMachine, delta: f32) {
        self.controller.refresh_detectors(&self.space);
        fsm.physics_update(delta, &mut self.ctx());
        self.input.update();
    }
}
