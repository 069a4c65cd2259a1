// Transitions: guards and hand-off hooks evaluated on state changes

use super::state::{downcast_mut, State, StateId};
use crate::game::movement::MotionContext;

const COUNT: usize = StateId::COUNT;

/// The pair of states a transition is evaluated for.
///
/// Transitions are shared and stateless; the binding is what tells a
/// transition which states it is currently moving between.
pub struct Binding<'a> {
    pub from: &'a mut (dyn State + 'static),
    pub to: &'a mut (dyn State + 'static),
}

impl<'a> Binding<'a> {
    /// Both states as concrete types, if they are `F` and `T`
    pub fn states<F: State, T: State>(&mut self) -> Option<(&mut F, &mut T)> {
        let from = downcast_mut::<F>(&mut *self.from)?;
        let to = downcast_mut::<T>(&mut *self.to)?;
        Some((from, to))
    }

    /// The incoming state as a concrete type
    pub fn to_state<T: State>(&mut self) -> Option<&mut T> {
        downcast_mut::<T>(&mut *self.to)
    }
}

/// Policy evaluated when the machine moves between two states
pub trait Transition {
    /// Name reported in change notifications
    fn name(&self) -> &'static str;

    /// Guard; a `false` leaves the current state untouched
    fn should_transition(&self, binding: &mut Binding<'_>, ctx: &mut MotionContext<'_>) -> bool;

    /// Hand-off run only after the guard passed
    fn on_transition(&self, _binding: &mut Binding<'_>, _ctx: &mut MotionContext<'_>) {}
}

/// Always allows the change and hands nothing over.
///
/// Used for every pair of states without a registered transition.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeutralTransition;

impl Transition for NeutralTransition {
    fn name(&self) -> &'static str {
        "NeutralTransition"
    }

    fn should_transition(&self, _binding: &mut Binding<'_>, _ctx: &mut MotionContext<'_>) -> bool {
        true
    }
}

/// Key under which a transition between two states is known
pub fn transition_key(from: StateId, to: StateId) -> String {
    format!("{}To{}", from.name(), to.name())
}

/// Fixed-size matrix from `(from, to)` to a registered transition.
///
/// Empty cells resolve to [`NeutralTransition`].
pub struct TransitionTable {
    transitions: Vec<Box<dyn Transition>>,
    matrix: [[Option<usize>; COUNT]; COUNT],
    neutral: NeutralTransition,
}

impl Default for TransitionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionTable {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
            matrix: [[None; COUNT]; COUNT],
            neutral: NeutralTransition,
        }
    }

    /// Register `transition` for a single pair, replacing any previous one
    pub fn register(&mut self, from: StateId, to: StateId, transition: Box<dyn Transition>) {
        let index = self.push(transition);
        self.matrix[from.index()][to.index()] = Some(index);
        log::trace!(
            "Registered {} as {}",
            self.transitions[index].name(),
            transition_key(from, to)
        );
    }

    /// Register one shared `transition` from every other state into `to`
    pub fn register_from_any(&mut self, to: StateId, transition: Box<dyn Transition>) {
        let index = self.push(transition);
        for from in StateId::ALL {
            if from != to {
                self.matrix[from.index()][to.index()] = Some(index);
            }
        }
        log::trace!(
            "Registered {} as AnyTo{}",
            self.transitions[index].name(),
            to.name()
        );
    }

    fn push(&mut self, transition: Box<dyn Transition>) -> usize {
        self.transitions.push(transition);
        self.transitions.len() - 1
    }

    /// Check if a pair has an explicit registration
    pub fn is_registered(&self, from: StateId, to: StateId) -> bool {
        self.matrix[from.index()][to.index()].is_some()
    }

    /// Transition for a pair, falling back to [`NeutralTransition`]
    pub fn get(&self, from: StateId, to: StateId) -> &dyn Transition {
        match self.matrix[from.index()][to.index()] {
            Some(index) => self.transitions[index].as_ref(),
            None => &self.neutral,
        }
    }

    /// Forget every registration
    pub fn clear(&mut self) {
        self.transitions.clear();
        self.matrix = [[None; COUNT]; COUNT];
    }
}
