//! The entity model: states, transitions, and the diagram that owns them.
//!
//! The diagram is a plain container. It knows nothing about curve layout or
//! simulation; both consume it read-only (`machina-render` derives drawable
//! curves from it, [`crate::sim::Simulation`] snapshots it into an adjacency
//! index). The one rule it does enforce on its mutation path is the
//! single-entry-state invariant of [`Diagram::set_entry`].

use indexmap::IndexMap;

use crate::config::DiagramConfig;
use crate::geom::{Point, Vector, vector};

/// Stable handle to a [`State`]. Not the positional index of the persisted
/// form; handles survive unrelated insertions and removals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(u64);

/// Stable handle to a [`Transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionId(u64);

/// The label text reserved for epsilon transitions.
pub const EPSILON_LABEL: &str = "$";

/// One condition symbol of a transition label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    /// Consumed without reading input.
    Epsilon,
    /// Matches one input character.
    Char(char),
}

#[derive(Debug, Clone, PartialEq)]
pub struct State {
    /// Center position on the canvas, owned by the diagram.
    pub position: Point,
    pub label: String,
    pub accepting: bool,
    pub entry: bool,
    /// Transient simulation highlight; never persisted.
    pub active: bool,
    /// Fixed circle radius, used for tangent trimming.
    pub radius: f64,
}

impl State {
    pub fn new(position: Point) -> Self {
        Self {
            position,
            label: String::new(),
            accepting: false,
            entry: false,
            active: false,
            radius: DiagramConfig::default().state_radius,
        }
    }

    pub fn with_label(position: Point, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::new(position)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub from: StateId,
    /// `None` while the user is still dragging the free end; such a
    /// transition is rendered against the live pointer position and is
    /// skipped by the serializer.
    pub to: Option<StateId>,
    /// One or more condition symbols, comma-delimited; `"$"` is epsilon.
    pub label: String,
    /// Signed perpendicular bow height from the chord midpoint; `0` renders
    /// as a straight segment.
    pub sagitta: f64,
    /// Whether the arc bows to the opposite side of the chord.
    pub reversed: bool,
    /// Self-loops only: unit vector from the state center towards the loop.
    pub self_link_direction: Vector,
    /// Self-loops only: distance from the state center to the loop's
    /// outermost point.
    pub self_link_distance: f64,
}

impl Transition {
    /// A transition with a dangling free end, as created by the connect
    /// gesture before it lands on a second state.
    pub fn new(from: StateId) -> Self {
        Self {
            from,
            to: None,
            label: String::new(),
            sagitta: 0.0,
            reversed: false,
            self_link_direction: vector(1.0, 0.0),
            self_link_distance: DiagramConfig::default().self_link_distance,
        }
    }

    pub fn between(from: StateId, to: StateId) -> Self {
        Self {
            to: Some(to),
            ..Self::new(from)
        }
    }

    pub fn self_link(state: StateId, direction: Vector) -> Self {
        Self {
            to: Some(state),
            self_link_direction: direction,
            ..Self::new(state)
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Whether both endpoints are connected.
    pub fn is_set(&self) -> bool {
        self.to.is_some()
    }

    pub fn is_self_link(&self) -> bool {
        self.to == Some(self.from)
    }

    /// The condition symbols of this transition's label.
    ///
    /// The label is split on commas and trimmed; `"$"` is epsilon. Any other
    /// token that is not exactly one character can never match a consumed
    /// input character and is dropped, mirroring the silent input
    /// sanitization of the simulation engine.
    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.label.split(',').filter_map(|token| {
            let token = token.trim();
            if token == EPSILON_LABEL {
                return Some(Symbol::Epsilon);
            }
            let mut chars = token.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Symbol::Char(c)),
                _ => None,
            }
        })
    }
}

/// The set of states and transitions making up one automaton drawing.
#[derive(Debug, Clone, Default)]
pub struct Diagram {
    states: IndexMap<StateId, State>,
    transitions: IndexMap<TransitionId, Transition>,
    next_state: u64,
    next_transition: u64,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_state(&mut self, state: State) -> StateId {
        let id = StateId(self.next_state);
        self.next_state += 1;
        self.states.insert(id, state);
        id
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(&id)
    }

    pub fn state_mut(&mut self, id: StateId) -> Option<&mut State> {
        self.states.get_mut(&id)
    }

    pub fn states(&self) -> impl Iterator<Item = (StateId, &State)> {
        self.states.iter().map(|(id, s)| (*id, s))
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Removes a state and, cascading, every transition that references it
    /// at either end.
    pub fn remove_state(&mut self, id: StateId) -> Option<State> {
        let removed = self.states.shift_remove(&id);
        if removed.is_some() {
            self.transitions
                .retain(|_, t| t.from != id && t.to != Some(id));
        }
        removed
    }

    pub fn add_transition(&mut self, transition: Transition) -> TransitionId {
        let id = TransitionId(self.next_transition);
        self.next_transition += 1;
        self.transitions.insert(id, transition);
        id
    }

    pub fn transition(&self, id: TransitionId) -> Option<&Transition> {
        self.transitions.get(&id)
    }

    pub fn transition_mut(&mut self, id: TransitionId) -> Option<&mut Transition> {
        self.transitions.get_mut(&id)
    }

    pub fn transitions(&self) -> impl Iterator<Item = (TransitionId, &Transition)> {
        self.transitions.iter().map(|(id, t)| (*id, t))
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    pub fn remove_transition(&mut self, id: TransitionId) -> Option<Transition> {
        self.transitions.shift_remove(&id)
    }

    /// Lands the free end of an in-progress transition on `to`.
    pub fn complete_transition(&mut self, id: TransitionId, to: StateId) -> bool {
        if !self.states.contains_key(&to) {
            return false;
        }
        match self.transitions.get_mut(&id) {
            Some(t) => {
                t.to = Some(to);
                true
            }
            None => false,
        }
    }

    /// Marks `id` as the entry state, clearing the flag on every other
    /// state. At most one state carries the flag after this returns.
    pub fn set_entry(&mut self, id: StateId) -> bool {
        if !self.states.contains_key(&id) {
            return false;
        }
        for (sid, state) in self.states.iter_mut() {
            state.entry = *sid == id;
        }
        true
    }

    /// The entry state, if one is marked.
    pub fn entry_state(&self) -> Option<StateId> {
        self.states
            .iter()
            .find(|(_, s)| s.entry)
            .map(|(id, _)| *id)
    }

    pub fn set_position(&mut self, id: StateId, position: Point) -> bool {
        match self.states.get_mut(&id) {
            Some(state) => {
                state.position = position;
                true
            }
            None => false,
        }
    }

    /// Replaces the transient simulation highlight with `frontier`.
    pub fn apply_frontier(&mut self, frontier: impl IntoIterator<Item = StateId>) {
        for state in self.states.values_mut() {
            state.active = false;
        }
        for id in frontier {
            if let Some(state) = self.states.get_mut(&id) {
                state.active = true;
            }
        }
    }

    pub fn clear(&mut self) {
        self.states.clear();
        self.transitions.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty() && self.transitions.is_empty()
    }
}
