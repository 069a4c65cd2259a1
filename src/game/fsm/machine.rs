// Finite state machine: state arena, transition table, history and tick dispatch

use std::collections::VecDeque;

use super::events::{ChangeOutcome, FsmEvent, FsmListener};
use super::state::{downcast_mut, downcast_ref, State, StateId};
use super::transition::{Binding, TransitionTable};
use super::FsmError;
use crate::engine::input::InputEvent;
use crate::game::movement::{transitions, MotionContext};

/// Upper bound on state requests resolved in a row before the rest are dropped
const MAX_CHAINED_REQUESTS: usize = 16;

/// Name reported for changes that bypass the transition table
const FORCED_TRANSITION: &str = "ForcedTransition";

/// Finite state machine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct FsmConfig {
    /// State entered by `start`
    pub initial_state: Option<StateId>,
    /// Maximum number of vacated states kept in history
    pub stack_capacity: usize,
    /// Empty the history entirely instead of evicting the oldest entry
    pub flush_stack_when_reach_capacity: bool,
    /// Record vacated states at all
    pub enable_stack: bool,
}

impl Default for FsmConfig {
    fn default() -> Self {
        Self {
            initial_state: Some(StateId::Idle),
            stack_capacity: 3,
            flush_stack_when_reach_capacity: false,
            enable_stack: true,
        }
    }
}

#[derive(Debug, Default)]
struct FsmStatus {
    current: Option<StateId>,
    previous: Option<StateId>,
    stack: VecDeque<StateId>,
}

/// What a state sees of its machine while one of its hooks runs.
///
/// Change requests are queued and applied, in order, right after the hook
/// returns.
pub struct FsmHandle<'a> {
    current: StateId,
    previous: Option<StateId>,
    stack: &'a VecDeque<StateId>,
    requests: Vec<StateId>,
}

impl<'a> FsmHandle<'a> {
    fn new(current: StateId, status: &'a FsmStatus) -> Self {
        Self {
            current,
            previous: status.previous,
            stack: &status.stack,
            requests: Vec::new(),
        }
    }

    /// A handle that belongs to no machine, for exercising hooks directly
    #[cfg(test)]
    pub(crate) fn detached(current: StateId, stack: &'a VecDeque<StateId>) -> Self {
        Self {
            current,
            previous: stack.back().copied(),
            stack,
            requests: Vec::new(),
        }
    }

    pub fn current_state(&self) -> StateId {
        self.current
    }

    pub fn current_state_is(&self, id: StateId) -> bool {
        self.current == id
    }

    /// State that was current before the current one
    pub fn previous_state(&self) -> Option<StateId> {
        self.previous
    }

    /// Most recently vacated state in the history stack
    pub fn last_state(&self) -> Option<StateId> {
        self.stack.back().copied()
    }

    /// History, oldest first
    pub fn states_stack(&self) -> impl Iterator<Item = StateId> + '_ {
        self.stack.iter().copied()
    }

    /// Ask the machine to move to `id`
    pub fn change_state_to(&mut self, id: StateId) {
        self.requests.push(id);
    }

    /// Requests made so far during this hook
    pub fn requests(&self) -> &[StateId] {
        &self.requests
    }
}

/// Central dispatcher owning states, transitions and history.
///
/// Exactly one state is current once `start` succeeded; every change goes
/// through the transition registered for the pair, or a neutral one.
pub struct FiniteStateMachine {
    config: FsmConfig,
    states: [Option<Box<dyn State>>; StateId::COUNT],
    transitions: TransitionTable,
    status: FsmStatus,
    listeners: Vec<FsmListener>,
    pending: VecDeque<StateId>,
    started: bool,
    locked: bool,
}

impl Default for FiniteStateMachine {
    fn default() -> Self {
        Self::new(FsmConfig::default())
    }
}

impl FiniteStateMachine {
    /// Create a machine without states
    pub fn new(config: FsmConfig) -> Self {
        Self {
            config,
            states: std::array::from_fn(|_| None),
            transitions: TransitionTable::new(),
            status: FsmStatus::default(),
            listeners: Vec::new(),
            pending: VecDeque::new(),
            started: false,
            locked: true,
        }
    }

    pub fn config(&self) -> &FsmConfig {
        &self.config
    }

    /// Register a state; each `StateId` can only be registered once
    pub fn add_state(&mut self, state: Box<dyn State>) -> Result<(), FsmError> {
        let id = state.id();
        let slot = &mut self.states[id.index()];
        if slot.is_some() {
            log::error!("State {} is registered twice", id);
            return Err(FsmError::DuplicateState(id));
        }

        *slot = Some(state);
        log::trace!("Registered state {}", id);
        Ok(())
    }

    /// Register several states
    pub fn add_states(
        &mut self,
        states: impl IntoIterator<Item = Box<dyn State>>,
    ) -> Result<(), FsmError> {
        for state in states {
            self.add_state(state)?;
        }
        Ok(())
    }

    pub fn has_state(&self, id: StateId) -> bool {
        self.states[id.index()].is_some()
    }

    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }

    pub fn transitions_mut(&mut self) -> &mut TransitionTable {
        &mut self.transitions
    }

    /// Add an observer for every event the machine emits
    pub fn subscribe(&mut self, listener: impl FnMut(&FsmEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Register the locomotion transitions, ready every state and enter the initial one
    pub fn start(&mut self, ctx: &mut MotionContext<'_>) -> Result<(), FsmError> {
        if self.started {
            log::error!("{}", FsmError::AlreadyStarted);
            return Err(FsmError::AlreadyStarted);
        }

        let Some(initial) = self.config.initial_state else {
            log::error!("{}", FsmError::NoInitialState);
            return Err(FsmError::NoInitialState);
        };

        if !self.has_state(initial) {
            log::error!("Initial state {} is not registered", initial);
            return Err(FsmError::StateNotRegistered(initial));
        }

        transitions::register_defaults(&mut self.transitions);

        for state in self.states.iter_mut().flatten() {
            state.ready(ctx);
        }

        self.started = true;
        self.change_state_forced(initial, ctx)?;
        self.unlock();

        log::info!("State machine started in {}", initial);
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Stop forwarding ticks and input to the current state
    pub fn lock(&mut self) {
        if !self.locked {
            self.locked = true;
            log::info!("State machine locked");
        }
    }

    /// Resume forwarding ticks and input
    pub fn unlock(&mut self) {
        if self.locked {
            self.locked = false;
            log::info!("State machine unlocked");
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Request a change to `target` through its registered transition.
    ///
    /// Unknown or unregistered targets are configuration errors; a refused
    /// guard is a normal outcome.
    pub fn change_state_to(
        &mut self,
        target: StateId,
        ctx: &mut MotionContext<'_>,
    ) -> Result<ChangeOutcome, FsmError> {
        let outcome = self.request_change(target, ctx).map_err(|err| {
            log::error!("{}", err);
            err
        })?;
        self.drain_requests(ctx);
        Ok(outcome)
    }

    /// Same as `change_state_to`, resolving the target by (case-insensitive) name
    pub fn change_state_by_name(
        &mut self,
        name: &str,
        ctx: &mut MotionContext<'_>,
    ) -> Result<ChangeOutcome, FsmError> {
        let target = name.parse::<StateId>().map_err(|err| {
            log::error!("{}", err);
            err
        })?;
        self.change_state_to(target, ctx)
    }

    /// Switch to `target` without consulting any transition, re-entering it if already current
    pub fn change_state_forced(
        &mut self,
        target: StateId,
        ctx: &mut MotionContext<'_>,
    ) -> Result<(), FsmError> {
        if !self.started {
            return Err(FsmError::NotStarted);
        }
        if !self.has_state(target) {
            log::error!("Cannot force unregistered state {}", target);
            return Err(FsmError::StateNotRegistered(target));
        }

        match self.status.current {
            Some(current) => self.swap_states(current, target, FORCED_TRANSITION, ctx),
            None => {
                self.status.current = Some(target);
                self.dispatch(target, ctx, |state, fsm, ctx| state.enter(fsm, ctx));
            }
        }

        self.drain_requests(ctx);
        Ok(())
    }

    fn request_change(
        &mut self,
        target: StateId,
        ctx: &mut MotionContext<'_>,
    ) -> Result<ChangeOutcome, FsmError> {
        let current = match self.status.current {
            Some(current) if self.started => current,
            _ => return Err(FsmError::NotStarted),
        };

        if !self.has_state(target) {
            return Err(FsmError::StateNotRegistered(target));
        }

        if current == target {
            return Ok(ChangeOutcome::AlreadyCurrent);
        }

        Ok(self.run_transition(current, target, ctx))
    }

    fn run_transition(
        &mut self,
        from: StateId,
        to: StateId,
        ctx: &mut MotionContext<'_>,
    ) -> ChangeOutcome {
        let transition = self.transitions.get(from, to);
        let name = transition.name();

        let Some((from_state, to_state)) = pair_mut(&mut self.states, from, to) else {
            log::error!("Cannot bind {} to {} -> {}", name, from, to);
            return ChangeOutcome::Rejected;
        };

        let mut binding = Binding {
            from: from_state,
            to: to_state,
        };

        if !transition.should_transition(&mut binding, ctx) {
            log::debug!("{} rejected {} -> {}", name, from, to);
            self.emit(FsmEvent::StateChangeFailed {
                from,
                to,
                transition: name,
            });
            return ChangeOutcome::Rejected;
        }

        transition.on_transition(&mut binding, ctx);
        self.swap_states(from, to, name, ctx);
        ChangeOutcome::Changed
    }

    /// Exit `from`, record it, enter `to` and announce the change
    fn swap_states(
        &mut self,
        from: StateId,
        to: StateId,
        transition: &'static str,
        ctx: &mut MotionContext<'_>,
    ) {
        self.dispatch(from, ctx, |state, fsm, ctx| state.exit(to, fsm, ctx));

        self.status.previous = Some(from);
        self.push_state_to_stack(from);
        self.status.current = Some(to);

        self.dispatch(to, ctx, |state, fsm, ctx| state.enter(fsm, ctx));

        log::debug!("{} -> {} via {}", from, to, transition);
        self.emit(FsmEvent::StateChanged {
            from,
            to,
            transition,
        });
    }

    fn push_state_to_stack(&mut self, id: StateId) {
        let capacity = self.config.stack_capacity;
        if !self.config.enable_stack || capacity == 0 {
            return;
        }

        if self.status.stack.len() >= capacity {
            if self.config.flush_stack_when_reach_capacity {
                let stack: Vec<StateId> = self.status.stack.drain(..).collect();
                self.emit(FsmEvent::StackFlushed { stack });
            } else {
                self.status.stack.pop_front();
            }
        }

        self.status.stack.push_back(id);
        let stack = self.status.stack.iter().copied().collect();
        self.emit(FsmEvent::StackPushed { pushed: id, stack });
    }

    /// Run a hook on the state `id` and queue whatever it requested
    fn dispatch<F>(&mut self, id: StateId, ctx: &mut MotionContext<'_>, hook: F)
    where
        F: FnOnce(&mut dyn State, &mut FsmHandle<'_>, &mut MotionContext<'_>),
    {
        let Self {
            states,
            status,
            pending,
            ..
        } = self;

        let Some(current) = status.current else {
            return;
        };

        if let Some(state) = states[id.index()].as_deref_mut() {
            let mut handle = FsmHandle::new(current, status);
            hook(state, &mut handle, ctx);
            pending.extend(handle.requests);
        }
    }

    fn drain_requests(&mut self, ctx: &mut MotionContext<'_>) {
        let mut resolved = 0;

        while let Some(target) = self.pending.pop_front() {
            if resolved == MAX_CHAINED_REQUESTS {
                log::warn!(
                    "Dropping {} state requests after {} chained changes",
                    self.pending.len() + 1,
                    MAX_CHAINED_REQUESTS
                );
                self.pending.clear();
                break;
            }
            resolved += 1;

            if let Err(err) = self.request_change(target, ctx) {
                log::error!("{}", err);
            }
        }
    }

    fn emit(&mut self, event: FsmEvent) {
        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    /// Forward raw input to the current state
    pub fn handle_input(&mut self, event: &InputEvent, ctx: &mut MotionContext<'_>) {
        let Some(current) = self.active_state() else {
            return;
        };

        self.dispatch(current, ctx, |state, fsm, ctx| {
            state.handle_input(event, fsm, ctx)
        });
        self.drain_requests(ctx);
    }

    /// Fixed-step tick: the current state first, then every state's timers
    pub fn physics_update(&mut self, delta: f32, ctx: &mut MotionContext<'_>) {
        let Some(current) = self.active_state() else {
            return;
        };

        self.dispatch(current, ctx, |state, fsm, ctx| {
            state.physics_update(delta, fsm, ctx)
        });
        self.drain_requests(ctx);

        for id in StateId::ALL {
            self.dispatch(id, ctx, |state, fsm, ctx| state.tick_timers(delta, fsm, ctx));
        }
        self.drain_requests(ctx);
    }

    /// Per-frame tick of the current state
    pub fn update(&mut self, delta: f32, ctx: &mut MotionContext<'_>) {
        let Some(current) = self.active_state() else {
            return;
        };

        self.dispatch(current, ctx, |state, fsm, ctx| state.update(delta, fsm, ctx));
        self.drain_requests(ctx);
    }

    fn active_state(&self) -> Option<StateId> {
        if !self.started || self.locked {
            return None;
        }
        self.status.current
    }

    pub fn current_state(&self) -> Option<StateId> {
        self.status.current
    }

    pub fn previous_state(&self) -> Option<StateId> {
        self.status.previous
    }

    pub fn current_state_is(&self, id: StateId) -> bool {
        self.status.current == Some(id)
    }

    /// Case-insensitive; unknown names are never current
    pub fn current_state_name_is(&self, name: &str) -> bool {
        name.parse::<StateId>()
            .map(|id| self.current_state_is(id))
            .unwrap_or(false)
    }

    /// History, oldest first
    pub fn states_stack(&self) -> Vec<StateId> {
        self.status.stack.iter().copied().collect()
    }

    /// Most recently vacated state still in history
    pub fn last_state(&self) -> Option<StateId> {
        self.status.stack.back().copied()
    }

    /// A registered state by id
    pub fn state_by_id(&self, id: StateId) -> Option<&dyn State> {
        self.states[id.index()].as_deref()
    }

    /// The registered state of concrete type `T`
    pub fn state<T: State>(&self) -> Option<&T> {
        self.states
            .iter()
            .flatten()
            .find_map(|state| downcast_ref::<T>(state.as_ref()))
    }

    /// The registered state of concrete type `T`, mutably
    pub fn state_mut<T: State>(&mut self) -> Option<&mut T> {
        self.states
            .iter_mut()
            .flatten()
            .find_map(|state| downcast_mut::<T>(state.as_mut()))
    }
}

/// Borrow two different states at once
fn pair_mut(
    states: &mut [Option<Box<dyn State>>],
    a: StateId,
    b: StateId,
) -> Option<(&mut (dyn State + 'static), &mut (dyn State + 'static))> {
    let (i, j) = (a.index(), b.index());
    if i == j {
        return None;
    }

    if i < j {
        let (left, right) = states.split_at_mut(j);
        Some((left[i].as_deref_mut()?, right[0].as_deref_mut()?))
    } else {
        let (left, right) = states.split_at_mut(i);
        Some((right[0].as_deref_mut()?, left[j].as_deref_mut()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Rig;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    /// Records every hook call and optionally requests a state on enter
    struct Recorder {
        id: StateId,
        log: Log,
        on_enter: Option<StateId>,
        on_physics: Option<StateId>,
    }

    impl Recorder {
        fn boxed(id: StateId, log: &Log) -> Box<dyn State> {
            Box::new(Self {
                id,
                log: Rc::clone(log),
                on_enter: None,
                on_physics: None,
            })
        }
    }

    impl State for Recorder {
        fn id(&self) -> StateId {
            self.id
        }

        fn ready(&mut self, _ctx: &mut MotionContext<'_>) {
            self.log.borrow_mut().push(format!("ready {}", self.id));
        }

        fn enter(&mut self, fsm: &mut FsmHandle<'_>, _ctx: &mut MotionContext<'_>) {
            assert_eq!(fsm.current_state(), self.id);
            self.log.borrow_mut().push(format!("enter {}", self.id));
            if let Some(next) = self.on_enter {
                fsm.change_state_to(next);
            }
        }

        fn exit(&mut self, next: StateId, fsm: &mut FsmHandle<'_>, _ctx: &mut MotionContext<'_>) {
            assert_eq!(fsm.current_state(), self.id);
            self.log.borrow_mut().push(format!("exit {} -> {}", self.id, next));
        }

        fn physics_update(&mut self, _delta: f32, fsm: &mut FsmHandle<'_>, _ctx: &mut MotionContext<'_>) {
            self.log.borrow_mut().push(format!("physics {}", self.id));
            if let Some(next) = self.on_physics {
                fsm.change_state_to(next);
            }
        }
    }

    fn machine(config: FsmConfig, ids: &[StateId], log: &Log) -> FiniteStateMachine {
        let mut fsm = FiniteStateMachine::new(config);
        for id in ids {
            fsm.add_state(Recorder::boxed(*id, log)).expect("unique ids");
        }
        fsm
    }

    fn events(fsm: &mut FiniteStateMachine) -> Rc<RefCell<Vec<FsmEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        fsm.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        events
    }

    const CYCLE: [StateId; 6] = [
        StateId::Walk,
        StateId::Crouch,
        StateId::Crawl,
        StateId::Fall,
        StateId::Slide,
        StateId::Idle,
    ];

    #[test]
    fn test_start_enters_initial_state() {
        let log = Log::default();
        let mut rig = Rig::new();
        let mut fsm = machine(FsmConfig::default(), &[StateId::Idle, StateId::Walk], &log);

        assert!(fsm.is_locked());
        fsm.start(&mut rig.ctx()).expect("start");

        assert!(fsm.is_started());
        assert!(!fsm.is_locked());
        assert_eq!(fsm.current_state(), Some(StateId::Idle));
        assert_eq!(fsm.previous_state(), None);
        assert!(fsm.states_stack().is_empty());
        assert_eq!(
            *log.borrow(),
            vec!["ready Idle", "ready Walk", "enter Idle"]
        );
    }

    #[test]
    fn test_start_without_initial_state() {
        let log = Log::default();
        let mut rig = Rig::new();
        let config = FsmConfig {
            initial_state: None,
            ..FsmConfig::default()
        };
        let mut fsm = machine(config, &[StateId::Idle], &log);

        assert_eq!(fsm.start(&mut rig.ctx()), Err(FsmError::NoInitialState));
        assert_eq!(fsm.current_state(), None);
    }

    #[test]
    fn test_start_with_unregistered_initial_state() {
        let log = Log::default();
        let mut rig = Rig::new();
        let mut fsm = machine(FsmConfig::default(), &[StateId::Walk], &log);

        assert_eq!(
            fsm.start(&mut rig.ctx()),
            Err(FsmError::StateNotRegistered(StateId::Idle))
        );
    }

    #[test]
    fn test_start_twice() {
        let log = Log::default();
        let mut rig = Rig::new();
        let mut fsm = machine(FsmConfig::default(), &[StateId::Idle], &log);

        fsm.start(&mut rig.ctx()).expect("start");
        assert_eq!(fsm.start(&mut rig.ctx()), Err(FsmError::AlreadyStarted));
    }

    #[test]
    fn test_duplicate_state() {
        let log = Log::default();
        let mut fsm = machine(FsmConfig::default(), &[StateId::Idle], &log);
        assert_eq!(
            fsm.add_state(Recorder::boxed(StateId::Idle, &log)),
            Err(FsmError::DuplicateState(StateId::Idle))
        );
    }

    #[test]
    fn test_change_before_start() {
        let log = Log::default();
        let mut rig = Rig::new();
        let mut fsm = machine(FsmConfig::default(), &[StateId::Idle, StateId::Walk], &log);

        assert_eq!(
            fsm.change_state_to(StateId::Walk, &mut rig.ctx()),
            Err(FsmError::NotStarted)
        );
    }

    #[test]
    fn test_change_runs_exit_then_enter() {
        let log = Log::default();
        let mut rig = Rig::new();
        let mut fsm = machine(FsmConfig::default(), &[StateId::Idle, StateId::Walk], &log);
        fsm.start(&mut rig.ctx()).expect("start");
        log.borrow_mut().clear();

        let outcome = fsm.change_state_to(StateId::Walk, &mut rig.ctx());

        assert_eq!(outcome, Ok(ChangeOutcome::Changed));
        assert_eq!(*log.borrow(), vec!["exit Idle -> Walk", "enter Walk"]);
        assert_eq!(fsm.current_state(), Some(StateId::Walk));
        assert_eq!(fsm.previous_state(), Some(StateId::Idle));
        assert_eq!(fsm.last_state(), Some(StateId::Idle));
    }

    #[test]
    fn test_change_to_current_state_is_noop() {
        let log = Log::default();
        let mut rig = Rig::new();
        let mut fsm = machine(FsmConfig::default(), &[StateId::Idle], &log);
        fsm.start(&mut rig.ctx()).expect("start");
        log.borrow_mut().clear();

        let outcome = fsm.change_state_to(StateId::Idle, &mut rig.ctx());

        assert_eq!(outcome, Ok(ChangeOutcome::AlreadyCurrent));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_unknown_targets_leave_state_unchanged() {
        let log = Log::default();
        let mut rig = Rig::new();
        let mut fsm = machine(FsmConfig::default(), &[StateId::Idle], &log);
        fsm.start(&mut rig.ctx()).expect("start");

        assert_eq!(
            fsm.change_state_by_name("Foo", &mut rig.ctx()),
            Err(FsmError::UnknownStateName("Foo".to_string()))
        );
        assert_eq!(
            fsm.change_state_to(StateId::Crawl, &mut rig.ctx()),
            Err(FsmError::StateNotRegistered(StateId::Crawl))
        );
        assert_eq!(fsm.current_state(), Some(StateId::Idle));
    }

    #[test]
    fn test_change_by_name_is_case_insensitive() {
        let log = Log::default();
        let mut rig = Rig::new();
        let mut fsm = machine(FsmConfig::default(), &[StateId::Idle, StateId::Crouch], &log);
        fsm.start(&mut rig.ctx()).expect("start");

        fsm.change_state_by_name("crouch", &mut rig.ctx()).expect("known");

        assert!(fsm.current_state_name_is("CROUCH"));
        assert!(!fsm.current_state_name_is("Foo"));
    }

    #[test]
    fn test_registered_transition_is_used() {
        let log = Log::default();
        let mut rig = Rig::new();
        let mut fsm = machine(
            FsmConfig::default(),
            &[StateId::Idle, StateId::Walk, StateId::Run],
            &log,
        );
        let events = events(&mut fsm);
        fsm.start(&mut rig.ctx()).expect("start");

        fsm.change_state_to(StateId::Walk, &mut rig.ctx()).expect("walk");
        fsm.change_state_to(StateId::Run, &mut rig.ctx()).expect("run");

        let names: Vec<&str> = events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                FsmEvent::StateChanged { transition, .. } => Some(*transition),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["NeutralTransition", "WalkToRunTransition"]);
    }

    #[test]
    fn test_neutral_transition_is_idempotent() {
        let log = Log::default();
        let mut rig = Rig::new();
        let mut fsm = machine(FsmConfig::default(), &[StateId::Idle, StateId::Crouch], &log);
        let events = events(&mut fsm);
        fsm.start(&mut rig.ctx()).expect("start");

        for _ in 0..4 {
            assert_eq!(
                fsm.change_state_to(StateId::Crouch, &mut rig.ctx()),
                Ok(ChangeOutcome::Changed)
            );
            assert_eq!(
                fsm.change_state_to(StateId::Idle, &mut rig.ctx()),
                Ok(ChangeOutcome::Changed)
            );
        }

        assert_eq!(fsm.current_state(), Some(StateId::Idle));
        assert!(events
            .borrow()
            .iter()
            .all(|event| !matches!(event, FsmEvent::StateChangeFailed { .. })));
    }

    #[test]
    fn test_history_keeps_most_recent_states() {
        let log = Log::default();
        let mut rig = Rig::new();
        let mut fsm = machine(FsmConfig::default(), &CYCLE, &log);
        fsm.start(&mut rig.ctx()).expect("start");

        // Idle -> Walk -> Crouch -> Crawl -> Fall -> Slide
        for target in &CYCLE[..5] {
            fsm.change_state_to(*target, &mut rig.ctx()).expect("registered");
        }

        assert_eq!(
            fsm.states_stack(),
            vec![StateId::Crouch, StateId::Crawl, StateId::Fall]
        );
    }

    #[test]
    fn test_history_flush_on_capacity() {
        let log = Log::default();
        let mut rig = Rig::new();
        let config = FsmConfig {
            flush_stack_when_reach_capacity: true,
            ..FsmConfig::default()
        };
        let mut fsm = machine(config, &CYCLE, &log);
        let events = events(&mut fsm);
        fsm.start(&mut rig.ctx()).expect("start");

        for target in &CYCLE[..4] {
            fsm.change_state_to(*target, &mut rig.ctx()).expect("registered");
        }

        // The 4th change vacated Crawl
        assert_eq!(fsm.states_stack(), vec![StateId::Crawl]);
        assert!(events.borrow().contains(&FsmEvent::StackFlushed {
            stack: vec![StateId::Idle, StateId::Walk, StateId::Crouch],
        }));
    }

    #[test]
    fn test_disabled_stack_still_tracks_previous() {
        let log = Log::default();
        let mut rig = Rig::new();
        let config = FsmConfig {
            enable_stack: false,
            ..FsmConfig::default()
        };
        let mut fsm = machine(config, &[StateId::Idle, StateId::Walk], &log);
        fsm.start(&mut rig.ctx()).expect("start");

        fsm.change_state_to(StateId::Walk, &mut rig.ctx()).expect("walk");

        assert!(fsm.states_stack().is_empty());
        assert_eq!(fsm.previous_state(), Some(StateId::Idle));
    }

    #[test]
    fn test_requests_from_hooks_are_chained() {
        let log = Log::default();
        let mut rig = Rig::new();
        let mut fsm = FiniteStateMachine::default();
        fsm.add_state(Recorder::boxed(StateId::Idle, &log)).expect("idle");
        fsm.add_state(Box::new(Recorder {
            id: StateId::Walk,
            log: Rc::clone(&log),
            on_enter: Some(StateId::Crouch),
            on_physics: None,
        }))
        .expect("walk");
        fsm.add_state(Recorder::boxed(StateId::Crouch, &log)).expect("crouch");
        fsm.start(&mut rig.ctx()).expect("start");

        fsm.change_state_to(StateId::Walk, &mut rig.ctx()).expect("walk");

        assert_eq!(fsm.current_state(), Some(StateId::Crouch));
        assert_eq!(fsm.previous_state(), Some(StateId::Walk));
    }

    #[test]
    fn test_runaway_request_chain_is_cut() {
        let log = Log::default();
        let mut rig = Rig::new();
        let mut fsm = FiniteStateMachine::default();
        for (id, next) in [(StateId::Idle, StateId::Walk), (StateId::Walk, StateId::Idle)] {
            fsm.add_state(Box::new(Recorder {
                id,
                log: Rc::clone(&log),
                on_enter: Some(next),
                on_physics: None,
            }))
            .expect("unique");
        }

        // Must terminate
        fsm.start(&mut rig.ctx()).expect("start");
        assert!(fsm.current_state().is_some());
    }

    #[test]
    fn test_lock_stops_ticks() {
        let log = Log::default();
        let mut rig = Rig::new();
        let mut fsm = machine(FsmConfig::default(), &[StateId::Idle], &log);
        fsm.start(&mut rig.ctx()).expect("start");
        log.borrow_mut().clear();

        fsm.lock();
        fsm.physics_update(1.0 / 60.0, &mut rig.ctx());
        assert!(log.borrow().is_empty());

        fsm.unlock();
        fsm.physics_update(1.0 / 60.0, &mut rig.ctx());
        assert_eq!(*log.borrow(), vec!["physics Idle"]);
    }

    #[test]
    fn test_physics_request_applies_same_tick() {
        let log = Log::default();
        let mut rig = Rig::new();
        let mut fsm = FiniteStateMachine::default();
        fsm.add_state(Box::new(Recorder {
            id: StateId::Idle,
            log: Rc::clone(&log),
            on_enter: None,
            on_physics: Some(StateId::Walk),
        }))
        .expect("idle");
        fsm.add_state(Recorder::boxed(StateId::Walk, &log)).expect("walk");
        fsm.start(&mut rig.ctx()).expect("start");

        fsm.physics_update(1.0 / 60.0, &mut rig.ctx());

        assert!(fsm.current_state_is(StateId::Walk));
    }

    #[test]
    fn test_typed_state_lookup() {
        let log = Log::default();
        let mut fsm = machine(FsmConfig::default(), &[StateId::Idle], &log);

        assert!(fsm.state::<Recorder>().is_some());
        fsm.state_mut::<Recorder>().expect("recorder").on_enter = Some(StateId::Walk);
        assert_eq!(
            fsm.state_by_id(StateId::Idle).map(|state| state.id()),
            Some(StateId::Idle)
        );
        assert!(fsm.state_by_id(StateId::Walk).is_none());
    }
}
