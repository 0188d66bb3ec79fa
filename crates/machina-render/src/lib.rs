#![forbid(unsafe_code)]

//! Headless transition curve layout for machina diagrams.
//!
//! Consumes the entity model of `machina-core` and produces drawable
//! descriptors: straight segments, circular arcs, self-loop arcs, arrowheads
//! and label anchors. No drawing happens here — descriptors go out through
//! an injected [`RenderPort`].

mod arrow;
pub mod config;
pub mod curve;
pub mod model;
pub mod port;

use machina_core::DiagramConfig;
use machina_core::diagram::{Diagram, TransitionId};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Geometry(#[from] machina_core::Error),
    #[error("self-loop geometry collapsed for the state at ({x}, {y})")]
    SelfLoopCollapsed { x: f64, y: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;

pub use config::RenderConfig;
pub use curve::{
    Curvature, CurveInputs, CurveMemo, apply_curvature, compute_curve, pull_curvature,
    pull_self_link,
};
pub use model::{ArrowHead, Capabilities, CurveDescriptor, CurvePoint, CurveSet, ShapeKind};
pub use port::{RecordingPort, RenderPort, render_transition};

/// Lays out every fully connected transition of a diagram.
///
/// Transitions with a dangling free end are interactive artifacts and are
/// skipped; they are laid out against the live pointer position via
/// [`CurveInputs::for_dangling`] instead.
pub fn layout_diagram(
    diagram: &Diagram,
    diagram_config: &DiagramConfig,
    render_config: &RenderConfig,
) -> Result<Vec<(TransitionId, CurveSet)>> {
    let mut curves = Vec::with_capacity(diagram.transition_count());
    for (id, transition) in diagram.transitions() {
        let Some(inputs) = CurveInputs::for_transition(diagram, transition, diagram_config) else {
            continue;
        };
        curves.push((id, compute_curve(&inputs, render_config)?));
    }
    Ok(curves)
}

#[cfg(test)]
mod tests;
