// Finite state machine
//
// States are stored in an arena indexed by `StateId`, transitions in a fixed
// matrix whose empty cells fall back to `NeutralTransition`. The machine owns
// the current state, the previous one and a bounded history stack, and it
// forwards input, physics and frame ticks to the current state.

mod events;
mod machine;
mod state;
mod transition;

pub use events::{ChangeOutcome, FsmEvent, FsmListener};
pub use machine::{FiniteStateMachine, FsmConfig, FsmHandle};
pub use state::{downcast_mut, downcast_ref, AsAny, State, StateId};
pub use transition::{transition_key, Binding, NeutralTransition, Transition, TransitionTable};

/// State machine configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FsmError {
    #[error("No initial state is configured")]
    NoInitialState,

    #[error("The state {0} does not exist on this finite state machine")]
    UnknownStateName(String),

    #[error("The state {0} is not registered")]
    StateNotRegistered(StateId),

    #[error("The finite state machine has not been started")]
    NotStarted,

    #[error("The finite state machine was already started")]
    AlreadyStarted,

    #[error("The state {0} is registered twice")]
    DuplicateState(StateId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fsm_error_display() {
        let err = FsmError::UnknownStateName("Foo".to_string());
        assert_eq!(
            err.to_string(),
            "The state Foo does not exist on this finite state machine"
        );
        assert_eq!(
            FsmError::StateNotRegistered(StateId::Slide).to_string(),
            "The state Slide is not registered"
        );
    }
}
