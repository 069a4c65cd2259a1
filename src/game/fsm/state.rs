// States: identifiers and lifecycle hooks

use std::any::Any;
use std::fmt;
use std::str::FromStr;

use super::machine::FsmHandle;
use super::FsmError;
use crate::engine::input::InputEvent;
use crate::game::movement::{Motion, MotionContext};

/// Identifies every locomotion state the machine knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StateId {
    Idle,
    Walk,
    Run,
    Jump,
    Fall,
    Crouch,
    Crawl,
    Slide,
    Vault,
    WallRun,
}

impl StateId {
    /// Number of state kinds
    pub const COUNT: usize = 10;

    /// Every state, in declaration order
    pub const ALL: [StateId; Self::COUNT] = [
        StateId::Idle,
        StateId::Walk,
        StateId::Run,
        StateId::Jump,
        StateId::Fall,
        StateId::Crouch,
        StateId::Crawl,
        StateId::Slide,
        StateId::Vault,
        StateId::WallRun,
    ];

    /// Position in lookup tables
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display name, also used to build transition keys
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Walk => "Walk",
            Self::Run => "Run",
            Self::Jump => "Jump",
            Self::Fall => "Fall",
            Self::Crouch => "Crouch",
            Self::Crawl => "Crawl",
            Self::Slide => "Slide",
            Self::Vault => "Vault",
            Self::WallRun => "WallRun",
        }
    }

    /// Check if the state keeps the character on the ground
    pub fn is_grounded(&self) -> bool {
        matches!(
            self,
            Self::Idle | Self::Walk | Self::Run | Self::Crouch | Self::Crawl | Self::Slide
        )
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StateId {
    type Err = FsmError;

    /// Names are matched case-insensitively
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| FsmError::UnknownStateName(name.to_string()))
    }
}

/// Upcast to `Any` so boxed states can be downcast to their concrete type
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A unit of behaviour driven by the finite state machine.
///
/// Every hook is a no-op by default. Hooks never switch states directly;
/// they ask for a change through the [`FsmHandle`] and the machine applies
/// the request as soon as the hook returns.
pub trait State: AsAny {
    /// Which state this is
    fn id(&self) -> StateId;

    /// One-time setup after the machine has registered every state
    fn ready(&mut self, _ctx: &mut MotionContext<'_>) {}

    /// Called when this state becomes current
    fn enter(&mut self, _fsm: &mut FsmHandle<'_>, _ctx: &mut MotionContext<'_>) {}

    /// Called when this state stops being current; `next` is about to be entered
    fn exit(&mut self, _next: StateId, _fsm: &mut FsmHandle<'_>, _ctx: &mut MotionContext<'_>) {}

    /// Raw input delivered while this state is current
    fn handle_input(
        &mut self,
        _event: &InputEvent,
        _fsm: &mut FsmHandle<'_>,
        _ctx: &mut MotionContext<'_>,
    ) {
    }

    /// Fixed-step update while this state is current
    fn physics_update(&mut self, _delta: f32, _fsm: &mut FsmHandle<'_>, _ctx: &mut MotionContext<'_>) {
    }

    /// Per-frame update while this state is current
    fn update(&mut self, _delta: f32, _fsm: &mut FsmHandle<'_>, _ctx: &mut MotionContext<'_>) {}

    /// Advance this state's timers; runs every physics tick, current or not
    fn tick_timers(&mut self, _delta: f32, _fsm: &mut FsmHandle<'_>, _ctx: &mut MotionContext<'_>) {
    }

    /// Shared locomotion data, for states built on [`Motion`]
    fn motion(&self) -> Option<&Motion> {
        None
    }

    fn motion_mut(&mut self) -> Option<&mut Motion> {
        None
    }
}

/// Downcast a state to its concrete type
pub fn downcast_ref<'a, T: State>(state: &'a (dyn State + 'static)) -> Option<&'a T> {
    state.as_any().downcast_ref::<T>()
}

/// Downcast a state to its concrete type, mutably
pub fn downcast_mut<'a, T: State>(state: &'a mut (dyn State + 'static)) -> Option<&'a mut T> {
    state.as_any_mut().downcast_mut::<T>()
}
