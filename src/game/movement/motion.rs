// Behaviour shared by every locomotion state: grounding, gravity, input,
// stair stepping, ledge and wall detection

use std::collections::BTreeMap;

use glam::{Quat, Vec2, Vec3};

use super::config::MotionConfig;
use super::MotionContext;
use crate::core::math::{angle_to, is_zero_approx, move_toward, project_on_plane, snapped};
use crate::engine::input::{Action, PlayerInput};
use crate::game::characters::FirstPersonController;
use crate::game::fsm::{FsmHandle, StateId};

/// Horizontal wall detectors, in the order a wall run picks its side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WallProbe {
    Right,
    Left,
    Front,
}

/// Movement input of the current tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransformedInput {
    /// Raw 2-axis input, forward is negative y
    pub input_direction: Vec2,
    /// Input rotated into the body's facing, normalized
    pub world_direction: Vec3,
}

impl TransformedInput {
    pub fn update(&mut self, actor: &FirstPersonController, input: &PlayerInput) {
        self.input_direction = input.movement();
        let local = Vec3::new(self.input_direction.x, 0.0, self.input_direction.y);
        self.world_direction = (actor.body.basis() * local).normalize_or_zero();
    }
}

/// State data and helpers common to all locomotion states.
///
/// Concrete states run [`Motion::physics_update`] first and then add their
/// own behaviour on top of the helpers below.
#[derive(Debug, Clone)]
pub struct Motion {
    pub config: MotionConfig,
    pub input: TransformedInput,
    pub is_grounded: bool,
    pub was_grounded: bool,
    /// Set for the tick in which a step was climbed or followed down
    pub stair_stepping: bool,
    /// Last normal seen by each wall detector, zero when it saw nothing
    pub wall_normals: BTreeMap<WallProbe, Vec3>,
    gravity_active: bool,
}

impl Motion {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            gravity_active: config.gravity_active,
            config,
            input: TransformedInput::default(),
            is_grounded: true,
            was_grounded: true,
            stair_stepping: false,
            wall_normals: BTreeMap::new(),
        }
    }

    /// Re-sync grounding with the body when the owning state is entered
    pub fn enter(&mut self, ctx: &MotionContext<'_>) {
        let on_floor = ctx.actor.is_on_floor();
        self.is_grounded = on_floor;
        self.was_grounded = on_floor;
        self.stair_stepping = false;
    }

    /// Shared part of every physics tick.
    ///
    /// Returns `false` when the tick asked for `Fall`; the caller should stop
    /// there and let the fall take over.
    pub fn physics_update(
        &mut self,
        delta: f32,
        fsm: &mut FsmHandle<'_>,
        ctx: &mut MotionContext<'_>,
    ) -> bool {
        self.was_grounded = self.is_grounded;
        self.is_grounded = ctx.actor.is_on_floor();

        self.input.update(ctx.actor, ctx.input);

        if self.gravity_active && !ctx.actor.is_on_floor() && !fsm.current_state_is(StateId::Jump) {
            self.apply_gravity(self.config.gravity, delta, ctx.actor);
        }

        if self.is_falling(fsm, ctx.actor) && !self.stair_stepping {
            fsm.change_state_to(StateId::Fall);
            return false;
        }

        true
    }

    /// Accelerate along the actor's gravity direction; negative forces pull up
    pub fn apply_gravity(&self, force: f32, delta: f32, actor: &mut FirstPersonController) {
        let down = actor.down_direction();
        let mut velocity = actor.body.velocity + down * (force * delta);

        let falling_speed = velocity.dot(down);
        if falling_speed > self.config.fall_velocity_limit {
            velocity -= down * (falling_speed - self.config.fall_velocity_limit);
        }

        actor.body.velocity = velocity;
    }

    /// Off the ground in a grounded state and moving with gravity
    pub fn is_falling(&self, fsm: &FsmHandle<'_>, actor: &FirstPersonController) -> bool {
        let with_gravity = actor.body.velocity.dot(actor.down_direction()) > 0.0;
        with_gravity && !self.is_grounded && fsm.current_state().is_grounded()
    }

    /// Steer the horizontal velocity toward the input direction.
    ///
    /// Without input the velocity decays by `friction * delta` per tick, or
    /// by `speed` when there is no friction. With input it approaches
    /// `direction * speed` by `acceleration * delta`, or jumps there when
    /// there is no acceleration. Vertical velocity is left alone.
    pub fn move_actor(
        &self,
        actor: &mut FirstPersonController,
        speed: f32,
        delta: f32,
        acceleration: f32,
        friction: f32,
    ) {
        let direction = self.input.world_direction;
        let velocity = actor.body.velocity;
        let current = Vec3::new(velocity.x, 0.0, velocity.z);
        let target = Vec3::new(direction.x * speed, 0.0, direction.z * speed);

        let next = if is_zero_approx(direction) {
            if friction > 0.0 {
                move_toward(current, target, delta * friction)
            } else {
                move_toward(current, Vec3::ZERO, speed)
            }
        } else if acceleration > 0.0 {
            move_toward(current, target, acceleration * delta)
        } else {
            target
        };

        actor.body.velocity = Vec3::new(next.x, velocity.y, next.z);
    }

    /// Climb a step in front of the actor using swept motion tests only
    pub fn stair_step_up(&mut self, ctx: &mut MotionContext<'_>) {
        if !self.config.stair_stepping_enabled {
            return;
        }

        self.stair_stepping = false;

        let direction = self.input.world_direction;
        if is_zero_approx(direction) {
            return;
        }

        let space = ctx.space;
        let actor = &mut *ctx.actor;
        let shape = actor.body.shape;
        let up = actor.body.up_direction;
        let origin = actor.body.position;
        let step_up = up * self.config.max_step_up;
        let sweep = |from: Vec3, motion: Vec3| space.test_motion(&shape, from, motion);

        // Anything to step over?
        let probe = sweep(origin, direction * self.config.step_distance_to_check);
        if !probe.collided() {
            return;
        }

        let remainder = probe.remainder;
        let mut position = origin + probe.travel;

        // Up, as far as the ceiling allows
        position += sweep(position, step_up).travel;

        // Forward by what the wall blocked
        let mut result = sweep(position, remainder);
        position += result.travel;

        // Still blocked: slide the rest along the wall
        if result.collided() {
            let remaining = result.remainder.length();
            let along_wall = project_on_plane(direction, result.normal()).normalize_or_zero();
            result = sweep(position, along_wall * remaining);
            position += result.travel;
        }

        // Back down onto the step
        let drop = sweep(position, -step_up);
        position += drop.travel;
        let Some(landing) = drop.collision else {
            return;
        };

        let max_angle =
            actor.body.floor_max_angle + self.config.floor_max_angle_check_degrees.to_radians();
        if snapped(angle_to(landing.normal, up), 0.001) > max_angle {
            return;
        }

        self.stair_stepping = true;
        let rise = (position - origin).dot(up);
        actor.body.position += up * rise;
        log::trace!("Stepped up {:.3}", rise);
    }

    /// Follow a step down instead of briefly going airborne
    pub fn stair_step_down(&mut self, ctx: &mut MotionContext<'_>) {
        if !self.config.stair_stepping_enabled {
            return;
        }

        self.stair_stepping = false;

        let actor = &mut *ctx.actor;
        let up = actor.body.up_direction;
        if actor.body.velocity.dot(up) > 0.0 || !self.was_grounded {
            return;
        }

        let result = ctx.space.test_motion(
            &actor.body.shape,
            actor.body.position,
            -up * self.config.max_step_down,
        );

        if result.collided() {
            self.stair_stepping = true;
            actor.body.position += up * result.travel.dot(up);
            actor.body.apply_floor_snap(ctx.space);
            self.is_grounded = true;
        }
    }

    /// Track the ledge above a wall in front and vault on request
    pub fn ledge_detect(&mut self, fsm: &mut FsmHandle<'_>, ctx: &mut MotionContext<'_>) {
        let detectors = &mut ctx.actor.detectors;
        let wall_ahead = detectors.front.is_colliding();
        detectors.ledge.enabled = wall_ahead;

        if !wall_ahead {
            detectors.ledge.clear();
            return;
        }

        let origin = detectors.front.collision_point() + self.config.vault_offset;
        detectors.ledge.force_update_at(ctx.space, origin, Quat::IDENTITY);

        if ctx.input.just_pressed(Action::Vault) && ctx.actor.is_on_floor() {
            fsm.change_state_to(StateId::Vault);
        }
    }

    /// Re-cast the side and front detectors and remember their normals
    pub fn update_wall_normals(&mut self, ctx: &mut MotionContext<'_>) {
        let actor = &mut *ctx.actor;
        let position = actor.body.position;
        let basis = actor.body.basis();
        let detectors = &mut actor.detectors;

        for (probe, ray) in [
            (WallProbe::Right, &mut detectors.right),
            (WallProbe::Left, &mut detectors.left),
            (WallProbe::Front, &mut detectors.front),
        ] {
            ray.force_update(ctx.space, position, basis);
            let normal = if ray.is_colliding() {
                ray.collision_normal()
            } else {
                Vec3::ZERO
            };
            self.wall_normals.insert(probe, normal);
        }
    }

    /// A side wall, or a front wall tall enough to reach the upper detector
    pub fn wall_detected(&mut self, ctx: &mut MotionContext<'_>) -> bool {
        self.update_wall_normals(ctx);

        let detectors = &ctx.actor.detectors;
        detectors.right.is_colliding()
            || detectors.left.is_colliding()
            || (detectors.front.is_colliding() && detectors.top_front.is_colliding())
    }

    pub fn detect_jump(&self, fsm: &mut FsmHandle<'_>, ctx: &MotionContext<'_>) {
        if ctx.input.just_pressed(Action::Jump)
            && ctx.actor.abilities.jump
            && (ctx.actor.is_on_floor() || fsm.current_state_is(StateId::WallRun))
        {
            fsm.change_state_to(StateId::Jump);
        }
    }

    pub fn detect_crouch(&self, fsm: &mut FsmHandle<'_>, ctx: &MotionContext<'_>) {
        if ctx.input.is_pressed(Action::Crouch) && ctx.actor.is_on_floor() && ctx.actor.abilities.crouch {
            fsm.change_state_to(StateId::Crouch);
        }
    }

    pub fn detect_crawl(&self, fsm: &mut FsmHandle<'_>, ctx: &MotionContext<'_>) {
        if ctx.input.is_pressed(Action::Crawl) && ctx.actor.is_on_floor() && ctx.actor.abilities.crawl {
            fsm.change_state_to(StateId::Crawl);
        }
    }

    pub fn detect_wall_run(&mut self, fsm: &mut FsmHandle<'_>, ctx: &mut MotionContext<'_>) {
        if ctx.actor.abilities.wall_run && self.wall_detected(ctx) {
            fsm.change_state_to(StateId::WallRun);
        }
    }

    pub fn gravity_active(&self) -> bool {
        self.gravity_active
    }

    pub fn set_gravity_active(&mut self, active: bool) {
        if active != self.gravity_active {
            log::debug!("Gravity {}", if active { "enabled" } else { "disabled" });
        }
        self.gravity_active = active;
    }

    pub fn enable_gravity(&mut self) {
        self.set_gravity_active(true);
    }

    pub fn disable_gravity(&mut self) {
        self.set_gravity_active(false);
    }
}
