//! Drawing constants for the curve layout.

/// Rendering tunables, kept separate from the diagram-level geometry config
/// so embedders can restyle arrows and labels without touching entity data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Distance from an arrowhead's tip to its base.
    pub arrow_length: f64,
    /// Half the width of an arrowhead's base.
    pub arrow_half_width: f64,
    /// Angular step used to sample the terminal tangent of an arc.
    pub tangent_step: f64,
    /// Distance from a curve to its condition-label anchor.
    pub label_offset: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            arrow_length: 8.0,
            arrow_half_width: 5.0,
            tangent_step: 0.05,
            label_offset: 12.0,
        }
    }
}
