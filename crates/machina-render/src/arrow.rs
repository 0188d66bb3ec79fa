use machina_core::geom::{Point, Vector, perp};

use crate::config::RenderConfig;
use crate::model::ArrowHead;

/// Filled triangle at `tip`, pointing along the unit vector `direction`.
pub(crate) fn arrowhead(tip: Point, direction: Vector, config: &RenderConfig) -> ArrowHead {
    let back = tip - direction * config.arrow_length;
    let side = perp(direction) * config.arrow_half_width;
    ArrowHead {
        tip: tip.into(),
        left: (back + side).into(),
        right: (back - side).into(),
    }
}
