//! Stepped NFA simulation over a frozen diagram snapshot.
//!
//! [`Simulation::load`] scans the diagram once into a per-state adjacency
//! index; after that the walk never touches the diagram again, so the caller
//! is free to keep editing it and reload. Epsilon transitions (label `"$"`)
//! are consumed without input via the closure in [`Simulation::activate`].
//!
//! Backward stepping is a full replay from the start rather than a reverse
//! walk: the automaton may be nondeterministic, and a true inverse of one
//! step is not well-defined without recording every intermediate frontier.

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;

use crate::diagram::{Diagram, StateId, Symbol};

/// Per-state transition index, keyed by condition symbol.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    pub outgoing: IndexMap<Symbol, IndexSet<StateId>>,
    pub incoming: IndexMap<Symbol, IndexSet<StateId>>,
}

/// Where the interaction session currently stands. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No input string has been loaded yet.
    Idle,
    /// Input loaded, nothing consumed.
    Ready,
    /// Somewhere in the middle of the input.
    Stepping,
    /// The whole input has been consumed; the acceptance verdict is final.
    Completed,
}

/// What one operation left behind: returned directly instead of being
/// broadcast over an event bus.
#[derive(Debug, Clone, PartialEq)]
pub struct StepSnapshot {
    pub phase: Phase,
    pub position: usize,
    pub frontier: Vec<StateId>,
    pub accepting: bool,
}

/// The simulation engine.
#[derive(Debug, Clone, Default)]
pub struct Simulation {
    adjacency: FxHashMap<StateId, Adjacency>,
    accepting: IndexSet<StateId>,
    entry: Option<StateId>,
    alphabet: IndexSet<char>,
    active: IndexSet<StateId>,
    raw_input: Option<String>,
    input: Vec<char>,
    position: usize,
}

impl Simulation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the adjacency index from a diagram snapshot.
    ///
    /// Cost is `O(states + transitions × symbols-per-transition)`. Any
    /// previously loaded input string survives the reload: it is re-filtered
    /// against the new alphabet and the session returns to [`Phase::Ready`].
    pub fn load(&mut self, diagram: &Diagram) {
        let raw = self.raw_input.take();
        *self = Self::default();

        for (id, state) in diagram.states() {
            self.adjacency.entry(id).or_default();
            if state.accepting {
                self.accepting.insert(id);
            }
            if state.entry && self.entry.is_none() {
                self.entry = Some(id);
            }
        }

        for (_, transition) in diagram.transitions() {
            let Some(to) = transition.to else {
                continue;
            };
            if !self.adjacency.contains_key(&transition.from) || !self.adjacency.contains_key(&to)
            {
                continue;
            }
            for symbol in transition.symbols() {
                if let Symbol::Char(c) = symbol {
                    self.alphabet.insert(c);
                }
                if let Some(adj) = self.adjacency.get_mut(&transition.from) {
                    adj.outgoing.entry(symbol).or_default().insert(to);
                }
                if let Some(adj) = self.adjacency.get_mut(&to) {
                    adj.incoming.entry(symbol).or_default().insert(transition.from);
                }
            }
        }
        self.alphabet.sort_unstable();

        if let Some(raw) = raw {
            self.set_input(&raw);
        }
    }

    /// Loads an input string, keeping only characters of the discovered
    /// alphabet. Unknown characters are dropped silently: the tape widget
    /// feeds raw keyboard input through here, and sanitizing is friendlier
    /// than rejecting. Resets the walk to [`Phase::Ready`].
    pub fn set_input(&mut self, raw: &str) {
        self.raw_input = Some(raw.to_string());
        self.input = raw.chars().filter(|c| self.alphabet.contains(c)).collect();
        self.reset();
    }

    /// Deactivates everything and re-activates the entry state (with its
    /// epsilon closure) at position 0.
    pub fn reset(&mut self) {
        self.position = 0;
        self.active.clear();
        if let Some(entry) = self.entry {
            self.activate(entry);
        }
    }

    /// Activates `id` and, recursively, everything reachable from it over
    /// epsilon transitions alone. The already-active membership check makes
    /// epsilon cycles (including epsilon self-loops) terminate.
    pub fn activate(&mut self, id: StateId) {
        let mut pending = vec![id];
        while let Some(state) = pending.pop() {
            if !self.adjacency.contains_key(&state) {
                continue;
            }
            if !self.active.insert(state) {
                continue;
            }
            if let Some(dests) = self
                .adjacency
                .get(&state)
                .and_then(|adj| adj.outgoing.get(&Symbol::Epsilon))
            {
                for dest in dests {
                    if !self.active.contains(dest) {
                        pending.push(*dest);
                    }
                }
            }
        }
    }

    /// Consumes the symbol at the current position: unions the successor
    /// states of the whole frontier, swaps the frontier for that union, and
    /// closes it over epsilon. A no-op past the end of the input.
    pub fn step_forward(&mut self) -> StepSnapshot {
        if self.position >= self.input.len() {
            return self.snapshot();
        }
        let symbol = Symbol::Char(self.input[self.position]);
        let mut next: IndexSet<StateId> = IndexSet::new();
        for state in &self.active {
            if let Some(dests) = self
                .adjacency
                .get(state)
                .and_then(|adj| adj.outgoing.get(&symbol))
            {
                next.extend(dests.iter().copied());
            }
        }
        self.active.clear();
        for state in next {
            self.activate(state);
        }
        self.position += 1;
        tracing::debug!(
            position = self.position,
            frontier = self.active.len(),
            "consumed input symbol"
        );
        self.snapshot()
    }

    /// Steps one symbol backwards by replaying from the start.
    ///
    /// Deliberately not a reverse traversal; see the module docs. A no-op at
    /// position 0.
    pub fn step_back(&mut self) -> StepSnapshot {
        if self.position == 0 {
            return self.snapshot();
        }
        let target = self.position - 1;
        self.reset();
        while self.position < target {
            self.step_forward();
        }
        self.snapshot()
    }

    /// Runs the remaining input to completion.
    pub fn run_to_end(&mut self) -> StepSnapshot {
        while self.position < self.input.len() {
            self.step_forward();
        }
        self.snapshot()
    }

    /// Whether at least one active state is accepting. Only meaningful as a
    /// verdict once the phase is [`Phase::Completed`].
    pub fn accepts(&self) -> bool {
        self.active.iter().any(|s| self.accepting.contains(s))
    }

    pub fn phase(&self) -> Phase {
        if self.raw_input.is_none() {
            Phase::Idle
        } else if !self.input.is_empty() && self.position >= self.input.len() {
            Phase::Completed
        } else if self.position == 0 {
            Phase::Ready
        } else {
            Phase::Stepping
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// The sanitized input actually being walked.
    pub fn input(&self) -> &[char] {
        &self.input
    }

    /// The discovered alphabet, sorted, epsilon excluded.
    pub fn alphabet(&self) -> impl Iterator<Item = char> + '_ {
        self.alphabet.iter().copied()
    }

    pub fn is_active(&self, id: StateId) -> bool {
        self.active.contains(&id)
    }

    pub fn active_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.active.iter().copied()
    }

    /// The adjacency record built for `id` at load time.
    pub fn adjacency(&self, id: StateId) -> Option<&Adjacency> {
        self.adjacency.get(&id)
    }

    /// Mirrors the walk onto the input tape widget: the sanitized symbols
    /// in order, then the highlight at the current position.
    pub fn sync_tape(&self, tape: &mut dyn InputTapePort) {
        for &c in &self.input {
            tape.append_symbol(c);
        }
        tape.highlight_position(self.position);
    }

    pub fn snapshot(&self) -> StepSnapshot {
        StepSnapshot {
            phase: self.phase(),
            position: self.position,
            frontier: self.active.iter().copied().collect(),
            accepting: self.accepts(),
        }
    }
}

/// The input tape widget, as seen from this core: symbols are appended as
/// the user types, and the consumed prefix is highlighted while stepping.
pub trait InputTapePort {
    fn append_symbol(&mut self, symbol: char);
    fn highlight_position(&mut self, position: usize);
}
