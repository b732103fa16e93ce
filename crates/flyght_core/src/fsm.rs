//! State Machine Runtime
//!
//! Small flat state machines keyed by caller-defined state and signal
//! types. Supports:
//! - Guards (conditional transitions)
//! - Entry actions
//! - Transition actions
//! - Transition history for inspection

use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// A guard function that determines if a transition should occur
pub type Guard = Box<dyn Fn() -> bool>;

/// An action function executed during transitions
pub type Action = Box<dyn FnMut()>;

/// Bounds shared by state and signal types
pub trait StateKey: Copy + Eq + Hash + Debug {}

impl<T: Copy + Eq + Hash + Debug> StateKey for T {}

/// A transition in the state machine
pub struct Transition<S, E> {
    pub from_state: S,
    pub signal: E,
    pub to_state: S,
    pub guard: Option<Guard>,
    pub actions: SmallVec<[Action; 2]>,
}

impl<S: StateKey, E: StateKey> Transition<S, E> {
    /// Create a simple transition without guard or actions
    pub fn new(from: S, signal: E, to: S) -> Self {
        Self {
            from_state: from,
            signal,
            to_state: to,
            guard: None,
            actions: SmallVec::new(),
        }
    }

    /// Add a guard condition
    pub fn with_guard<F: Fn() -> bool + 'static>(mut self, guard: F) -> Self {
        self.guard = Some(Box::new(guard));
        self
    }

    /// Add an action to execute during transition
    pub fn with_action<F: FnMut() + 'static>(mut self, action: F) -> Self {
        self.actions.push(Box::new(action));
        self
    }

    fn accepts(&self, state: S, signal: E) -> bool {
        self.from_state == state
            && self.signal == signal
            && self.guard.as_ref().map_or(true, |guard| guard())
    }
}

/// Builder for creating state machines
pub struct StateMachineBuilder<S, E> {
    initial_state: S,
    transitions: Vec<Transition<S, E>>,
    entry_callbacks: FxHashMap<S, Vec<Action>>,
}

impl<S: StateKey, E: StateKey> StateMachineBuilder<S, E> {
    pub fn new(initial_state: S) -> Self {
        Self {
            initial_state,
            transitions: Vec::new(),
            entry_callbacks: FxHashMap::default(),
        }
    }

    /// Add a transition
    pub fn transition(mut self, transition: Transition<S, E>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add a simple transition (from, signal, to)
    pub fn on(mut self, from: S, signal: E, to: S) -> Self {
        self.transitions.push(Transition::new(from, signal, to));
        self
    }

    /// Add an entry action for a state
    pub fn on_enter<F: FnMut() + 'static>(mut self, state: S, action: F) -> Self {
        self.entry_callbacks
            .entry(state)
            .or_default()
            .push(Box::new(action));
        self
    }

    /// Build the state machine
    pub fn build(self) -> StateMachine<S, E> {
        StateMachine {
            current_state: self.initial_state,
            transitions: self.transitions,
            entry_callbacks: self.entry_callbacks,
            history: Vec::new(),
        }
    }
}

/// A state machine instance
pub struct StateMachine<S, E> {
    current_state: S,
    transitions: Vec<Transition<S, E>>,
    entry_callbacks: FxHashMap<S, Vec<Action>>,
    history: Vec<(S, E, S)>,
}

impl<S: StateKey, E: StateKey> StateMachine<S, E> {
    /// Create a builder for a state machine
    pub fn builder(initial_state: S) -> StateMachineBuilder<S, E> {
        StateMachineBuilder::new(initial_state)
    }

    pub fn current_state(&self) -> S {
        self.current_state
    }

    pub fn is_in(&self, state: S) -> bool {
        self.current_state == state
    }

    /// History of (from, signal, to) transitions taken
    pub fn history(&self) -> &[(S, E, S)] {
        &self.history
    }

    /// Check if a signal can trigger a transition from the current state
    pub fn can_send(&self, signal: E) -> bool {
        let current = self.current_state;
        self.transitions.iter().any(|t| t.accepts(current, signal))
    }

    /// Send a signal, potentially triggering a transition.
    ///
    /// Signals with no matching transition are ignored. Returns the state
    /// after handling.
    pub fn send(&mut self, signal: E) -> S {
        let current = self.current_state;

        let Some(idx) = self
            .transitions
            .iter()
            .position(|t| t.accepts(current, signal))
        else {
            tracing::trace!(state = ?current, ?signal, "signal ignored");
            return current;
        };

        let to_state = self.transitions[idx].to_state;

        for action in self.transitions[idx].actions.iter_mut() {
            action();
        }

        self.current_state = to_state;
        self.history.push((current, signal, to_state));
        tracing::debug!(from = ?current, ?signal, to = ?to_state, "state transition");

        if let Some(callbacks) = self.entry_callbacks.get_mut(&to_state) {
            for callback in callbacks.iter_mut() {
                callback();
            }
        }

        to_state
    }
}
