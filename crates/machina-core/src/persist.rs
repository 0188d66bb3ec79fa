//! Compact JSON persistence for diagrams.
//!
//! The persisted form is deliberately lossy: ids are positional indices
//! assigned at encode time, `sag` is rounded to an integer, and self-loop
//! direction components to two decimals. Round-tripping therefore reproduces
//! structure exactly and geometry only within the rounding tolerance.
//!
//! Decoding never fails the session over bad data: unknown state references
//! drop the transition, surplus entry flags fall back to first-wins, and the
//! [`load_diagram`] helper treats unparsable JSON as "no data".

use serde::{Deserialize, Serialize};

use crate::config::DiagramConfig;
use crate::diagram::{Diagram, State, Transition};
use crate::error::Result;
use crate::geom::{COINCIDENT_EPSILON, point, vector};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct PersistedPoint {
    x: f64,
    y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedState {
    id: usize,
    pos: PersistedPoint,
    txt: String,
    acc: bool,
    ent: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedTransition {
    frm: usize,
    to: usize,
    con: String,
    /// Self-loops only: outward direction of the loop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dir: Option<PersistedPoint>,
    /// Curved non-self-links only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sag: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rev: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PersistedDiagram {
    states: Vec<PersistedState>,
    transitions: Vec<PersistedTransition>,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Serializes a diagram to its persisted JSON form.
///
/// Transitions whose free end has not landed on a state yet are interactive
/// artifacts and are skipped.
pub fn encode(diagram: &Diagram) -> Result<String> {
    let mut index = rustc_hash::FxHashMap::default();
    let mut states = Vec::with_capacity(diagram.state_count());
    for (position, (id, state)) in diagram.states().enumerate() {
        index.insert(id, position);
        states.push(PersistedState {
            id: position,
            pos: PersistedPoint {
                x: state.position.x,
                y: state.position.y,
            },
            txt: state.label.clone(),
            acc: state.accepting,
            ent: state.entry,
        });
    }

    let mut transitions = Vec::new();
    for (_, transition) in diagram.transitions() {
        let Some(to) = transition.to else {
            continue;
        };
        let (Some(&frm), Some(&to)) = (index.get(&transition.from), index.get(&to)) else {
            continue;
        };
        let self_link = frm == to;
        transitions.push(PersistedTransition {
            frm,
            to,
            con: transition.label.clone(),
            dir: self_link.then(|| PersistedPoint {
                x: round2(transition.self_link_direction.x),
                y: round2(transition.self_link_direction.y),
            }),
            sag: (!self_link && transition.sagitta != 0.0)
                .then(|| transition.sagitta.round() as i64),
            rev: (!self_link && transition.sagitta != 0.0).then_some(transition.reversed),
        });
    }

    Ok(serde_json::to_string(&PersistedDiagram {
        states,
        transitions,
    })?)
}

/// Rebuilds a diagram from its persisted JSON form.
pub fn decode(json: &str, config: &DiagramConfig) -> Result<Diagram> {
    let persisted: PersistedDiagram = serde_json::from_str(json)?;
    let mut diagram = Diagram::new();

    let mut index = rustc_hash::FxHashMap::default();
    let mut entry_seen = false;
    for ps in &persisted.states {
        let mut state = State::with_label(point(ps.pos.x, ps.pos.y), ps.txt.clone());
        state.accepting = ps.acc;
        state.radius = config.state_radius;
        // At most one entry state; surplus flags lose, first encountered wins.
        if ps.ent {
            if entry_seen {
                tracing::warn!(id = ps.id, "ignoring extra entry flag");
            } else {
                state.entry = true;
                entry_seen = true;
            }
        }
        index.insert(ps.id, diagram.add_state(state));
    }

    for pt in &persisted.transitions {
        let (Some(&from), Some(&to)) = (index.get(&pt.frm), index.get(&pt.to)) else {
            tracing::warn!(frm = pt.frm, to = pt.to, "dropping transition with unknown state id");
            continue;
        };
        let mut transition = Transition::between(from, to).with_label(pt.con.clone());
        if from == to {
            let dir = pt
                .dir
                .map(|d| vector(d.x, d.y))
                .filter(|d| d.length() > COINCIDENT_EPSILON)
                .map(|d| d / d.length())
                .unwrap_or_else(|| vector(1.0, 0.0));
            transition.self_link_direction = dir;
            transition.self_link_distance = config.self_link_distance;
        } else {
            transition.sagitta = pt.sag.unwrap_or(0) as f64;
            transition.reversed = pt.rev.unwrap_or(false);
        }
        diagram.add_transition(transition);
    }

    Ok(diagram)
}

/// Where serialized diagrams go: the embedder brings the storage (browser
/// local storage, a file, a test buffer); this core never touches it
/// directly.
pub trait PersistencePort {
    fn load(&self) -> Option<String>;
    fn save(&mut self, data: &str);
    fn clear(&mut self);
}

/// In-memory [`PersistencePort`], used by tests and headless embedders.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: impl Into<String>) -> Self {
        Self {
            data: Some(data.into()),
        }
    }
}

impl PersistencePort for MemoryStore {
    fn load(&self) -> Option<String> {
        self.data.clone()
    }

    fn save(&mut self, data: &str) {
        self.data = Some(data.to_string());
    }

    fn clear(&mut self) {
        self.data = None;
    }
}

/// Loads a diagram from the port, treating missing or malformed data as an
/// empty diagram. Never fails: a corrupt store costs the saved drawing, not
/// the session.
pub fn load_diagram(port: &dyn PersistencePort, config: &DiagramConfig) -> Diagram {
    let Some(raw) = port.load() else {
        return Diagram::new();
    };
    match decode(&raw, config) {
        Ok(diagram) => diagram,
        Err(err) => {
            tracing::warn!(error = %err, "persisted diagram is unreadable, starting empty");
            Diagram::new()
        }
    }
}

/// Encodes and stores a diagram through the port.
pub fn save_diagram(port: &mut dyn PersistencePort, diagram: &Diagram) -> Result<()> {
    let encoded = encode(diagram)?;
    port.save(&encoded);
    Ok(())
}
