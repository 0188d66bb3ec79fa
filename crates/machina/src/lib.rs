#![forbid(unsafe_code)]

//! `machina` is the headless core of a canvas finite-state automaton editor.
//!
//! It owns everything that is hard to get right and nothing that touches a
//! screen: the entity model, the transition curve geometry, the stepped
//! (nondeterministic, epsilon-aware) simulation, and the compact persisted
//! form. Pointer capture, DOM/canvas surfaces, and dialogs stay with the
//! embedder, wired in through the ports each module exposes.
//!
//! # Features
//!
//! - `render`: enable the transition curve layout (`machina::render`)

pub use machina_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use machina_render::model::{
        ArrowHead, Capabilities, CurveDescriptor, CurvePoint, CurveSet, ShapeKind,
    };
    pub use machina_render::port::{RecordingPort, RenderPort, render_transition};
    pub use machina_render::{
        Curvature, CurveInputs, CurveMemo, RenderConfig, compute_curve, layout_diagram,
        pull_curvature, pull_self_link,
    };

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Core(#[from] machina_core::Error),
        #[error(transparent)]
        Render(#[from] machina_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Restores a diagram from a persistence port and lays out every
    /// connected transition in one go.
    ///
    /// This is the cold-start path of an embedder: load whatever was saved
    /// (malformed data falls back to an empty diagram), then hand the curve
    /// descriptors to the drawing surface.
    pub fn load_and_layout(
        port: &dyn machina_core::PersistencePort,
        diagram_config: &machina_core::DiagramConfig,
        render_config: &RenderConfig,
    ) -> Result<(
        machina_core::Diagram,
        Vec<(machina_core::TransitionId, CurveSet)>,
    )> {
        let diagram = machina_core::load_diagram(port, diagram_config);
        let curves = layout_diagram(&diagram, diagram_config, render_config)?;
        Ok((diagram, curves))
    }
}
