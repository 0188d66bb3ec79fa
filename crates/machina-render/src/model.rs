//! Drawable descriptors produced by the curve layout.
//!
//! These are plain serializable values: the render port consumes them as-is,
//! and snapshot tests compare them structurally.

use machina_core::geom::{Point, point};
use serde::{Deserialize, Serialize};

/// A point in the descriptor's own serializable form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

impl From<Point> for CurvePoint {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl CurvePoint {
    pub fn to_point(self) -> Point {
        point(self.x, self.y)
    }
}

/// The renderable shape of one transition.
///
/// One tagged variant per curve kind; geometry operations dispatch on the
/// tag rather than on a class hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum CurveDescriptor {
    /// Non-self-link with zero sagitta.
    #[serde(rename = "straight")]
    Straight { from: CurvePoint, to: CurvePoint },
    /// Non-self-link bowed to one side of its chord. When `reversed`, the
    /// arc is traced with decreasing angle from `start_angle` to
    /// `end_angle`; otherwise with increasing angle.
    #[serde(rename = "arc")]
    Arc {
        center: CurvePoint,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        reversed: bool,
    },
    /// A transition from a state to itself. Always traced with increasing
    /// angle; `end_angle` is normalized above `start_angle`.
    #[serde(rename = "selfLoop")]
    SelfLoop {
        center: CurvePoint,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
}

/// What a shape on the canvas is, for interaction dispatch. One flat
/// discriminant instead of an inheritance chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    #[serde(rename = "state")]
    State,
    #[serde(rename = "straightEdge")]
    StraightEdge,
    #[serde(rename = "arcEdge")]
    ArcEdge,
    #[serde(rename = "selfLoopEdge")]
    SelfLoopEdge,
}

/// What the editor may do with a shape of a given kind. States move;
/// edges follow their endpoints and are pulled into shape instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub hoverable: bool,
    pub selectable: bool,
    pub movable: bool,
    pub pullable: bool,
}

impl ShapeKind {
    pub fn capabilities(self) -> Capabilities {
        let edge = !matches!(self, ShapeKind::State);
        Capabilities {
            hoverable: true,
            selectable: true,
            movable: !edge,
            pullable: edge,
        }
    }
}

impl CurveDescriptor {
    pub fn shape_kind(&self) -> ShapeKind {
        match self {
            CurveDescriptor::Straight { .. } => ShapeKind::StraightEdge,
            CurveDescriptor::Arc { .. } => ShapeKind::ArcEdge,
            CurveDescriptor::SelfLoop { .. } => ShapeKind::SelfLoopEdge,
        }
    }
}

/// Filled triangle marking the transition's terminal point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrowHead {
    pub tip: CurvePoint,
    pub left: CurvePoint,
    pub right: CurvePoint,
}

/// Everything the renderer needs for one transition. The arrowhead is absent
/// only for the degenerate zero-length case, which draws as nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveSet {
    pub curve: CurveDescriptor,
    pub arrow: Option<ArrowHead>,
    /// Anchor for the transition's condition label.
    pub label_anchor: CurvePoint,
}
