use crate::engine::input::Action;
use crate::game::characters::Stance;
use crate::game::fsm::{FsmHandle, State, StateId};
use crate::game::movement::config::{CrawlConfig, MotionConfig};
use crate::game::movement::{Motion, MotionContext};

/// Moving prone; only reachable from a crouch
#[derive(Debug, Clone)]
pub struct Crawl {
    pub motion: Motion,
    pub config: CrawlConfig,
}

impl Crawl {
    pub fn new(motion: MotionConfig, config: CrawlConfig) -> Self {
        Self {
            motion: Motion::new(motion),
            config,
        }
    }
}

impl State for Crawl {
    fn id(&self) -> StateId {
        StateId::Crawl
    }

    fn enter(&mut self, _fsm: &mut FsmHandle<'_>, ctx: &mut MotionContext<'_>) {
        self.motion.enter(ctx);
        ctx.actor.set_stance(Stance::Crawl);
    }

    fn exit(&mut self, next: StateId, _fsm: &mut FsmHandle<'_>, ctx: &mut MotionContext<'_>) {
        let stance = if next == StateId::Crouch {
            Stance::Crouch
        } else {
            Stance::Stand
        };
        ctx.actor.set_stance(stance);
    }

    fn physics_update(&mut self, delta: f32, fsm: &mut FsmHandle<'_>, ctx: &mut MotionContext<'_>) {
        if !self.motion.physics_update(delta, fsm, ctx) {
            return;
        }

        if !ctx.input.is_pressed(Action::Crawl) && !ctx.actor.ceiling_blocked() {
            fsm.change_state_to(StateId::Crouch);
            return;
        }

        self.motion
            .move_actor(ctx.actor, self.config.speed, delta, 0.0, 0.0);
        ctx.actor.move_and_slide(ctx.space, delta);
    }

    fn motion(&self) -> Option<&Motion> {
        Some(&self.motion)
    }

    fn motion_mut(&mut self) -> Option<&mut Motion> {
        Some(&mut self.motion)
    }
}
