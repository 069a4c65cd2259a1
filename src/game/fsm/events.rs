// Notifications emitted by the finite state machine

use super::state::StateId;

/// Something observable happened inside the machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsmEvent {
    /// The current state changed
    StateChanged {
        from: StateId,
        to: StateId,
        transition: &'static str,
    },
    /// A transition guard refused the change
    StateChangeFailed {
        from: StateId,
        to: StateId,
        transition: &'static str,
    },
    /// A vacated state was pushed onto the history stack
    StackPushed {
        pushed: StateId,
        stack: Vec<StateId>,
    },
    /// The history stack reached capacity and was emptied
    StackFlushed { stack: Vec<StateId> },
}

/// Result of a change request that did not hit a configuration error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// The target is now the current state
    Changed,
    /// The transition guard refused; the current state is unchanged
    Rejected,
    /// The target already was the current state
    AlreadyCurrent,
}

/// Observer called for every event
pub type FsmListener = Box<dyn FnMut(&FsmEvent)>;
