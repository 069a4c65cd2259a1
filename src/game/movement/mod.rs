// Locomotion: the shared motion layer, the concrete states and the transitions between them
//
// Every state embeds a `Motion` and runs its `physics_update` before adding
// its own behaviour. States read the world through a `MotionContext` built
// fresh for every tick by the player.

pub mod config;
mod motion;
pub mod states;
mod timer;
pub mod transitions;

pub use config::LocomotionConfig;
pub use motion::{Motion, TransformedInput, WallProbe};
pub use states::{Crawl, Crouch, Fall, Idle, Jump, Run, Slide, Vault, Walk, WallRun};
pub use timer::Timer;

use crate::engine::input::PlayerInput;
use crate::engine::physics::PhysicsSpace;
use crate::game::characters::FirstPersonController;
use crate::game::fsm::State;

/// Everything a state may touch during one hook call
pub struct MotionContext<'a> {
    pub actor: &'a mut FirstPersonController,
    pub space: &'a dyn PhysicsSpace,
    pub input: &'a PlayerInput,
}

impl<'a> MotionContext<'a> {
    pub fn new(
        actor: &'a mut FirstPersonController,
        space: &'a dyn PhysicsSpace,
        input: &'a PlayerInput,
    ) -> Self {
        Self {
            actor,
            space,
            input,
        }
    }
}

/// One instance of every locomotion state, ready to register
pub fn locomotion_states(config: &LocomotionConfig) -> Vec<Box<dyn State>> {
    let motion = &config.motion;
    vec![
        Box::new(Idle::new(motion.clone(), config.idle.clone())),
        Box::new(Walk::new(motion.clone(), config.walk.clone())),
        Box::new(Run::new(motion.clone(), config.run.clone())),
        Box::new(Jump::new(motion.clone(), config.jump.clone())),
        Box::new(Fall::new(motion.clone(), config.fall.clone())),
        Box::new(Crouch::new(motion.clone(), config.crouch.clone())),
        Box::new(Crawl::new(motion.clone(), config.crawl.clone())),
        Box::new(Slide::new(motion.clone(), config.slide.clone())),
        Box::new(Vault::new(motion.clone(), config.vault.clone())),
        Box::new(WallRun::new(motion.clone(), config.wall_run.clone())),
    ]
}
