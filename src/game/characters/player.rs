// The player: actor, input and state machine ticked together by the host

use crate::engine::input::{InputEvent, PlayerInput};
use crate::engine::physics::PhysicsSpace;
use crate::game::fsm::{ChangeOutcome, FiniteStateMachine, FsmConfig, FsmError, FsmEvent, StateId};
use crate::game::movement::{locomotion_states, LocomotionConfig, MotionContext};

use super::controller::FirstPersonController;

/// A controllable first-person character.
///
/// The host feeds it input events and calls `physics_process` once per
/// fixed step and `process` once per rendered frame.
pub struct Player {
    pub actor: FirstPersonController,
    pub input: PlayerInput,
    fsm: FiniteStateMachine,
}

impl Player {
    /// Register every locomotion state and enter the initial one
    pub fn spawn(
        actor: FirstPersonController,
        config: FsmConfig,
        locomotion: &LocomotionConfig,
        space: &dyn PhysicsSpace,
    ) -> Result<Self, FsmError> {
        let mut fsm = FiniteStateMachine::new(config);
        fsm.add_states(locomotion_states(locomotion))?;

        let mut player = Self {
            actor,
            input: PlayerInput::new(),
            fsm,
        };

        player.actor.apply_floor_snap(space);
        player.actor.refresh_detectors(space);

        let (fsm, mut ctx) = player.parts(space);
        fsm.start(&mut ctx)?;

        log::info!(
            "Player spawned at {:?} in {}",
            player.actor.body.position,
            player.fsm.current_state().map_or("no state", |id| id.name())
        );
        Ok(player)
    }

    fn parts<'a>(
        &'a mut self,
        space: &'a dyn PhysicsSpace,
    ) -> (&'a mut FiniteStateMachine, MotionContext<'a>) {
        let Self { actor, input, fsm } = self;
        (fsm, MotionContext::new(actor, space, input))
    }

    /// Record an input event and forward it to the current state
    pub fn handle_input(&mut self, event: &InputEvent, space: &dyn PhysicsSpace) {
        self.input.apply(event);

        if let InputEvent::MouseMotion { relative } = event {
            self.actor.rotate_camera(*relative);
        }

        let (fsm, mut ctx) = self.parts(space);
        fsm.handle_input(event, &mut ctx);
    }

    /// One fixed physics step
    pub fn physics_process(&mut self, delta: f32, space: &dyn PhysicsSpace) {
        self.actor.refresh_detectors(space);

        let (fsm, mut ctx) = self.parts(space);
        fsm.physics_update(delta, &mut ctx);

        let current = self.fsm.current_state();
        self.actor.physics_tick(delta, current);
        self.input.update();
    }

    /// One rendered frame
    pub fn process(&mut self, delta: f32, space: &dyn PhysicsSpace) {
        let (fsm, mut ctx) = self.parts(space);
        fsm.update(delta, &mut ctx);
        self.actor.update(delta);
    }

    /// Freeze mouse look and every state machine tick
    pub fn lock(&mut self) {
        self.actor.lock();
        self.fsm.lock();
    }

    pub fn unlock(&mut self) {
        self.actor.unlock();
        self.fsm.unlock();
    }

    pub fn is_locked(&self) -> bool {
        self.fsm.is_locked()
    }

    /// Ask for a state change from outside the states
    pub fn change_state_to(
        &mut self,
        target: StateId,
        space: &dyn PhysicsSpace,
    ) -> Result<ChangeOutcome, FsmError> {
        let (fsm, mut ctx) = self.parts(space);
        fsm.change_state_to(target, &mut ctx)
    }

    pub fn current_state(&self) -> Option<StateId> {
        self.fsm.current_state()
    }

    pub fn fsm(&self) -> &FiniteStateMachine {
        &self.fsm
    }

    pub fn fsm_mut(&mut self) -> &mut FiniteStateMachine {
        &mut self.fsm
    }

    /// Observe every state machine event
    pub fn subscribe(&mut self, listener: impl FnMut(&FsmEvent) + 'static) {
        self.fsm.subscribe(listener);
    }
}
