use glam::Vec3;
use rand::Rng;

use crate::engine::input::Action;
use crate::game::characters::Stance;
use crate::game::fsm::{FsmHandle, State, StateId};
use crate::game::movement::config::{MotionConfig, SlideConfig};
use crate::game::movement::{Motion, MotionContext, Timer};

/// How fast the head leans into the slide
const TILT_BLEND_SPEED: f32 = 8.0;

/// A crouched dash out of a run that loses momentum over `slide_time`.
///
/// The direction is locked on entry; input no longer steers it.
#[derive(Debug, Clone)]
pub struct Slide {
    pub motion: Motion,
    pub config: SlideConfig,
    pub slide_timer: Timer,
    last_direction: Vec3,
    decrease_rate: f32,
    /// +1 or -1, picks the side the head leans to
    side: f32,
}

impl Slide {
    pub fn new(motion: MotionConfig, config: SlideConfig) -> Self {
        Self {
            motion: Motion::new(motion),
            slide_timer: Timer::new(config.slide_time),
            decrease_rate: config.slide_time,
            config,
            last_direction: Vec3::ZERO,
            side: 1.0,
        }
    }

    /// Direction the slide was started in
    pub fn direction(&self) -> Vec3 {
        self.last_direction
    }

    /// Momentum multiplier of the current tick
    pub fn momentum(&self) -> f32 {
        self.decrease_rate + self.config.friction_momentum
    }

    pub fn side(&self) -> f32 {
        self.side
    }
}

impl State for Slide {
    fn id(&self) -> StateId {
        StateId::Slide
    }

    fn enter(&mut self, _fsm: &mut FsmHandle<'_>, ctx: &mut MotionContext<'_>) {
        self.motion.enter(ctx);
        self.slide_timer.start_with(self.config.slide_time);

        self.motion.input.update(ctx.actor, ctx.input);
        self.last_direction = self.motion.input.world_direction;
        if self.last_direction == Vec3::ZERO {
            self.last_direction = ctx.actor.body.forward();
        }

        self.decrease_rate = self.config.slide_time;
        self.side = if ctx.actor.rng().gen_bool(0.5) { 1.0 } else { -1.0 };

        ctx.actor.set_stance(Stance::Crouch);
    }

    fn exit(&mut self, next: StateId, _fsm: &mut FsmHandle<'_>, ctx: &mut MotionContext<'_>) {
        self.slide_timer.stop();
        self.decrease_rate = self.config.slide_time;
        ctx.actor.rig.snap_head_roll(0.0);

        if next != StateId::Crouch {
            ctx.actor.set_stance(Stance::Stand);
        }
    }

    fn physics_update(&mut self, delta: f32, fsm: &mut FsmHandle<'_>, ctx: &mut MotionContext<'_>) {
        if self.config.reduce_speed_gradually {
            self.decrease_rate = (self.decrease_rate - delta).max(0.0);
        }

        let momentum = self.momentum();
        let velocity = &mut ctx.actor.body.velocity;
        velocity.x = self.last_direction.x * momentum * self.config.speed;
        velocity.z = self.last_direction.z * momentum * self.config.speed;

        if self.config.slide_tilt > 0.0 {
            ctx.actor
                .rig
                .blend_head_roll(self.side * self.config.slide_tilt.to_radians(), delta * TILT_BLEND_SPEED);
        }

        if !ctx.actor.ceiling_blocked() {
            self.motion.detect_jump(fsm, ctx);
        }

        ctx.actor.move_and_slide(ctx.space, delta);
    }

    fn tick_timers(&mut self, delta: f32, fsm: &mut FsmHandle<'_>, ctx: &mut MotionContext<'_>) {
        if !self.slide_timer.tick(delta) {
            return;
        }

        log::debug!("Slide finished");
        if ctx.input.is_pressed(Action::Crouch) || ctx.actor.ceiling_blocked() {
            fsm.change_state_to(StateId::Crouch);
        } else {
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
