//! Diagram-level tunables.
//!
//! The defaults reproduce the canvas editor's stock look and feel; embedders
//! that draw at a different scale override the whole struct.

/// Geometry constants owned by the diagram (as opposed to drawing constants,
/// which live with the curve layout).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagramConfig {
    /// Radius of every state circle, in canvas units. Fixed per state and
    /// used by the curve layout for tangent trimming.
    pub state_radius: f64,
    /// Maximum perpendicular distance at which a dragged transition midpoint
    /// still counts as collinear with its endpoints, snapping the curve back
    /// to a straight segment.
    pub collinear_tolerance: f64,
    /// Angular half-spread between a self-loop's two tangent points on the
    /// state circle, in radians.
    pub self_link_half_spread: f64,
    /// Distance from a state's center to a self-loop's outermost point.
    pub self_link_distance: f64,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            state_radius: 25.0,
            collinear_tolerance: 5.0,
            self_link_half_spread: 0.75,
            self_link_distance: 50.0,
        }
    }
}
