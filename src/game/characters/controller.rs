// First-person character: body, camera rig, detectors and stance

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::animation::AnimationPlayer;
use super::camera::CameraRig;
use super::detectors::Detectors;
use super::footsteps::Footsteps;
use super::settings::{Abilities, BodySettings, CameraSettings, Stance};
use crate::core::math::{lerp_angle, opposite_of_up};
use crate::engine::physics::{BodyBuilder, CollisionShape, KinematicBody, PhysicsSpace};
use crate::game::fsm::StateId;

/// The character the locomotion states drive.
///
/// States read and write the body directly; everything else here is
/// decoration (camera, animation, footsteps) that never affects movement.
#[derive(Debug)]
pub struct FirstPersonController {
    pub body: KinematicBody,
    pub abilities: Abilities,
    pub camera: CameraSettings,
    pub settings: BodySettings,
    pub rig: CameraRig,
    pub detectors: Detectors,
    pub animation: AnimationPlayer,
    pub footsteps: Footsteps,
    stance: Stance,
    rng: StdRng,
    locked: bool,
}

impl FirstPersonController {
    /// Create a standing character with default settings at `position`
    pub fn new(position: Vec3) -> Self {
        Self::with_settings(BodySettings::default(), position, 0)
    }

    /// Create a standing character; `seed` drives the cosmetic random choices
    pub fn with_settings(settings: BodySettings, position: Vec3, seed: u64) -> Self {
        let body = BodyBuilder::capsule(settings.radius, settings.stand_height)
            .position(position)
            .up_direction(settings.up_direction)
            .floor_max_angle(settings.floor_max_angle_degrees.to_radians())
            .floor_snap_length(settings.floor_snap_length)
            .build();

        Self {
            body,
            abilities: Abilities::default(),
            camera: CameraSettings::default(),
            rig: CameraRig::new(settings.stand_head_height),
            detectors: Detectors::new(&settings),
            animation: AnimationPlayer::with_standard_animations(),
            footsteps: Footsteps::default(),
            settings,
            stance: Stance::Stand,
            rng: StdRng::seed_from_u64(seed),
            locked: false,
        }
    }

    /// Replace the ability toggles
    pub fn abilities(mut self, abilities: Abilities) -> Self {
        self.abilities = abilities;
        self
    }

    /// Set the initial facing (radians around the vertical axis)
    pub fn yaw(mut self, yaw: f32) -> Self {
        self.body.yaw = yaw;
        self
    }

    pub fn is_on_floor(&self) -> bool {
        self.body.is_on_floor()
    }

    pub fn is_on_ceiling(&self) -> bool {
        self.body.is_on_ceiling()
    }

    /// Check if there is no room to grow back to standing height
    pub fn ceiling_blocked(&self) -> bool {
        self.detectors.ceiling_blocked()
    }

    /// Where gravity pulls this character
    pub fn down_direction(&self) -> Vec3 {
        opposite_of_up(self.body.up_direction)
    }

    /// World position of the eyes
    pub fn eye_position(&self) -> Vec3 {
        self.body.position + self.body.up_direction * self.rig.head_height()
    }

    pub fn move_and_slide(&mut self, space: &dyn PhysicsSpace, delta: f32) {
        self.body.move_and_slide(space, delta);
    }

    pub fn apply_floor_snap(&mut self, space: &dyn PhysicsSpace) {
        self.body.apply_floor_snap(space);
    }

    /// Re-cast every detector from the body's current transform
    pub fn refresh_detectors(&mut self, space: &dyn PhysicsSpace) {
        let position = self.body.position;
        let basis = self.body.basis();
        self.detectors.refresh(space, position, basis);
    }

    /// Radius of the standing capsule
    pub fn stand_radius(&self) -> f32 {
        self.settings.radius
    }

    pub fn stance(&self) -> Stance {
        self.stance
    }

    /// Swap the collision capsule and play the matching stance animation
    pub fn set_stance(&mut self, stance: Stance) {
        if stance == self.stance {
            return;
        }

        match (self.stance, stance) {
            (_, Stance::Crawl) => self.animation.play("crawl"),
            (Stance::Crawl, Stance::Crouch) => self.animation.play_backwards("crawl"),
            (Stance::Stand, Stance::Crouch) => self.animation.play("crouch"),
            (_, Stance::Stand) => self.animation.play_backwards("crouch"),
            _ => {}
        }

        let shape = CollisionShape::Capsule {
            radius: self.settings.radius,
            height: self.settings.height(stance),
        };
        self.body.shape = shape;
        self.detectors
            .fit_ceiling_check(shape, self.settings.stand_height, self.body.up_direction);
        self.rig
            .set_head_height_target(self.settings.head_height(stance));

        log::debug!("Stance {:?} -> {:?}", self.stance, stance);
        self.stance = stance;
    }

    /// Turn the body and tilt the head from relative mouse motion
    pub fn rotate_camera(&mut self, relative: Vec2) {
        if self.locked {
            return;
        }

        let scale = self.camera.mouse_sensitivity / 1000.0;
        let weight = self.camera.camera_sensitivity;
        let limit = self.camera.camera_vertical_limit;

        let target_yaw = self.body.yaw - relative.x * scale;
        self.body.yaw = lerp_angle(self.body.yaw, target_yaw, weight);

        let target_pitch = (self.rig.head_pitch - relative.y * scale).clamp(-limit, limit);
        self.rig.head_pitch = lerp_angle(self.rig.head_pitch, target_pitch, weight).clamp(-limit, limit);
    }

    /// Per-physics-step bookkeeping after the state machine ran
    pub fn physics_tick(&mut self, delta: f32, state: Option<StateId>) {
        if let Some(state) = state {
            self.footsteps.step(state, &self.detectors.floor);
        }
        self.footsteps.tick(delta);
    }

    /// Per-frame easing of camera roll, eye height and animations
    pub fn update(&mut self, delta: f32) {
        self.rig.update(delta);
        self.animation.update(delta);
    }

    /// Ignore mouse look until unlocked
    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Random source for cosmetic choices (slide and vault tilt side)
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}
