//! The transition geometry engine.
//!
//! Two separate concerns live here, and keeping them apart is what makes
//! curvature stable under drags:
//!
//! - [`pull_curvature`] runs while the user drags a transition's midpoint.
//!   It reduces the live drag point to `(sagitta, reversed)` — a curvature
//!   magnitude plus a side — so the drag point itself never needs to be
//!   stored or replayed.
//! - [`compute_curve`] runs on every redraw. It reconstructs the circle from
//!   the stored curvature alone, which makes repeated recomputation from
//!   unchanged inputs bit-identical.
//!
//! [`CurveMemo`] is the memoization layer: a `(last_inputs, last_output)`
//! pair compared by value, nothing smuggled onto the entities.

use machina_core::DiagramConfig;
use machina_core::diagram::{Diagram, Transition};
use machina_core::geom::{
    self, Point, Vector, angle_of, ccw_reaches_before, circumcircle, collinear, direction,
    normalize_angle, on_circle, perp,
};

use crate::arrow::arrowhead;
use crate::config::RenderConfig;
use crate::model::{CurveDescriptor, CurveSet};
use crate::{Error, Result};

/// Persisted curvature of a non-self-link, as derived from a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Curvature {
    pub sagitta: f64,
    pub reversed: bool,
}

impl Curvature {
    pub const STRAIGHT: Curvature = Curvature {
        sagitta: 0.0,
        reversed: false,
    };
}

/// The complete value-compared input of one curve computation. Two equal
/// inputs always produce the same output, which is what the memoization in
/// [`CurveMemo`] relies on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveInputs {
    Link {
        from: Point,
        to: Point,
        from_radius: f64,
        to_radius: f64,
        sagitta: f64,
        reversed: bool,
    },
    SelfLink {
        center: Point,
        state_radius: f64,
        direction: Vector,
        distance: f64,
        half_spread: f64,
    },
}

impl CurveInputs {
    /// Inputs for a fully connected transition, read from the live diagram.
    /// `None` when an endpoint state is missing or the free end has not
    /// landed yet.
    pub fn for_transition(
        diagram: &Diagram,
        transition: &Transition,
        config: &DiagramConfig,
    ) -> Option<CurveInputs> {
        let from = diagram.state(transition.from)?;
        let to_id = transition.to?;
        if transition.is_self_link() {
            return Some(CurveInputs::SelfLink {
                center: from.position,
                state_radius: from.radius,
                direction: transition.self_link_direction,
                distance: transition.self_link_distance,
                half_spread: config.self_link_half_spread,
            });
        }
        let to = diagram.state(to_id)?;
        Some(CurveInputs::Link {
            from: from.position,
            to: to.position,
            from_radius: from.radius,
            to_radius: to.radius,
            sagitta: transition.sagitta,
            reversed: transition.reversed,
        })
    }

    /// Inputs for an in-progress transition whose free end follows the
    /// pointer: a straight segment from the source boundary to the pointer.
    pub fn for_dangling(
        diagram: &Diagram,
        transition: &Transition,
        pointer: Point,
    ) -> Option<CurveInputs> {
        let from = diagram.state(transition.from)?;
        Some(CurveInputs::Link {
            from: from.position,
            to: pointer,
            from_radius: from.radius,
            to_radius: 0.0,
            sagitta: 0.0,
            reversed: false,
        })
    }
}

/// Normal of the chord `from -> to` on the side the arc bows toward.
fn bulge_normal(chord_dir: Vector, reversed: bool) -> Vector {
    if reversed {
        perp(chord_dir)
    } else {
        -perp(chord_dir)
    }
}

/// Reduces a live drag point to stored curvature.
///
/// Within `tolerance` of the chord the curve snaps back to straight.
/// Otherwise the side is taken from the sign of the cross product of the
/// drag point against both endpoints, and the sagitta from the circle
/// through all three points: the chord midpoint displaced along the bulge
/// normal by the sagitta lands back on that circle, so redraws reproduce the
/// arc without ever re-reading the drag point.
pub fn pull_curvature(from: Point, to: Point, drag: Point, tolerance: f64) -> Curvature {
    if collinear(from, to, drag, tolerance) {
        return Curvature::STRAIGHT;
    }
    let reversed = (drag - from).cross(drag - to) > 0.0;
    let Some((center, radius)) = circumcircle(from, to, drag) else {
        return Curvature::STRAIGHT;
    };
    // collinear() above already rejected a degenerate chord.
    let Ok(chord_dir) = direction(from, to, "measuring chord curvature") else {
        return Curvature::STRAIGHT;
    };
    let normal = bulge_normal(chord_dir, reversed);
    let midpoint = from.lerp(to, 0.5);
    let sagitta = (center - midpoint).dot(normal) + radius;
    Curvature { sagitta, reversed }
}

/// Re-anchors a self-loop towards a drag point. The loop only rotates
/// around its state; it never changes shape.
pub fn pull_self_link(center: Point, drag: Point) -> Result<Vector> {
    Ok(direction(center, drag, "rotating a self-loop")?)
}

/// Writes pulled curvature back onto the transition it was pulled for.
pub fn apply_curvature(transition: &mut Transition, curvature: Curvature) {
    transition.sagitta = curvature.sagitta;
    transition.reversed = curvature.reversed;
}

/// Derives the drawable curve, arrowhead, and label anchor for one
/// transition from its stored geometry.
pub fn compute_curve(inputs: &CurveInputs, config: &RenderConfig) -> Result<CurveSet> {
    match *inputs {
        CurveInputs::Link {
            from,
            to,
            from_radius,
            to_radius,
            sagitta,
            reversed,
        } => link_curve(from, to, from_radius, to_radius, sagitta, reversed, config),
        CurveInputs::SelfLink {
            center,
            state_radius,
            direction,
            distance,
            half_spread,
        } => self_link_curve(center, state_radius, direction, distance, half_spread, config),
    }
}

fn link_curve(
    a: Point,
    b: Point,
    ra: f64,
    rb: f64,
    sagitta: f64,
    reversed: bool,
    config: &RenderConfig,
) -> Result<CurveSet> {
    if (b - a).length() < geom::COINCIDENT_EPSILON {
        // Coincident endpoints on a non-self-link: nothing sensible to draw.
        // A zero-radius arc instead of a division by zero.
        return Ok(CurveSet {
            curve: CurveDescriptor::Arc {
                center: a.into(),
                radius: 0.0,
                start_angle: 0.0,
                end_angle: 0.0,
                reversed: false,
            },
            arrow: None,
            label_anchor: a.into(),
        });
    }
    let chord_dir = direction(a, b, "trimming a transition to its endpoints")?;
    if sagitta == 0.0 {
        return Ok(straight_curve(a, b, ra, rb, chord_dir, config));
    }

    let normal = bulge_normal(chord_dir, reversed);
    let bulge = a.lerp(b, 0.5) + normal * sagitta;
    let Some((center, radius)) = circumcircle(a, b, bulge) else {
        // Numerically too flat to bow.
        return Ok(straight_curve(a, b, ra, rb, chord_dir, config));
    };
    Ok(arc_curve(a, b, ra, rb, center, radius, reversed, config))
}

fn straight_curve(
    a: Point,
    b: Point,
    ra: f64,
    rb: f64,
    chord_dir: Vector,
    config: &RenderConfig,
) -> CurveSet {
    let start = a + chord_dir * ra;
    let end = b - chord_dir * rb;
    let anchor = start.lerp(end, 0.5) + bulge_normal(chord_dir, false) * config.label_offset;
    CurveSet {
        curve: CurveDescriptor::Straight {
            from: start.into(),
            to: end.into(),
        },
        arrow: Some(arrowhead(end, chord_dir, config)),
        label_anchor: anchor.into(),
    }
}

#[allow(clippy::too_many_arguments)]
fn arc_curve(
    a: Point,
    b: Point,
    ra: f64,
    rb: f64,
    center: Point,
    radius: f64,
    reversed: bool,
    config: &RenderConfig,
) -> CurveSet {
    // The arc must meet the state boundaries, not the centers: back each end
    // off by the angle subtended on this circle by a chord of the state's
    // radius. The sweep runs with increasing angle unless reversed.
    let sweep = if reversed { -1.0 } else { 1.0 };
    let start = angle_of(a - center) + sweep * trim_angle(ra, radius);
    let end = angle_of(b - center) - sweep * trim_angle(rb, radius);

    let end_point = on_circle(center, radius, end);
    let sample = on_circle(center, radius, end - sweep * config.tangent_step);
    let arrow = direction(sample, end_point, "orienting an arc arrowhead")
        .ok()
        .map(|d| arrowhead(end_point, d, config));

    let mid = if reversed {
        start - normalize_angle(start - end) / 2.0
    } else {
        start + normalize_angle(end - start) / 2.0
    };
    let anchor = on_circle(center, radius + config.label_offset, mid);

    CurveSet {
        curve: CurveDescriptor::Arc {
            center: center.into(),
            radius,
            start_angle: start,
            end_angle: end,
            reversed,
        },
        arrow,
        label_anchor: anchor.into(),
    }
}

/// Angle subtended on a circle of `arc_radius` by a chord of `state_radius`.
fn trim_angle(state_radius: f64, arc_radius: f64) -> f64 {
    2.0 * (state_radius / (2.0 * arc_radius)).clamp(-1.0, 1.0).asin()
}

fn self_link_curve(
    center: Point,
    state_radius: f64,
    loop_dir: Vector,
    distance: f64,
    half_spread: f64,
    config: &RenderConfig,
) -> Result<CurveSet> {
    let len = loop_dir.length();
    if len < geom::COINCIDENT_EPSILON {
        return Err(Error::SelfLoopCollapsed {
            x: center.x,
            y: center.y,
        });
    }
    let loop_dir = loop_dir / len;
    let theta = angle_of(loop_dir);

    // The loop's circle passes through two tangent points on the state's own
    // circle and one point pushed outward along the anchor direction.
    let t1 = on_circle(center, state_radius, theta - half_spread);
    let t2 = on_circle(center, state_radius, theta + half_spread);
    let outer = center + loop_dir * distance;
    let Some((loop_center, loop_radius)) = circumcircle(t1, t2, outer) else {
        return Err(Error::SelfLoopCollapsed {
            x: center.x,
            y: center.y,
        });
    };

    // Trace counterclockwise so the sweep passes through the outward point.
    let a1 = angle_of(t1 - loop_center);
    let a2 = angle_of(t2 - loop_center);
    let outer_angle = angle_of(outer - loop_center);
    let (start, end_raw) = if ccw_reaches_before(a1, outer_angle, a2) {
        (a1, a2)
    } else {
        (a2, a1)
    };
    let end = start + normalize_angle(end_raw - start);

    let end_point = on_circle(loop_center, loop_radius, end);
    let sample = on_circle(loop_center, loop_radius, end - config.tangent_step);
    let arrow = direction(sample, end_point, "orienting a self-loop arrowhead")
        .ok()
        .map(|d| arrowhead(end_point, d, config));

    let anchor = outer + loop_dir * config.label_offset;
    Ok(CurveSet {
        curve: CurveDescriptor::SelfLoop {
            center: loop_center.into(),
            radius: loop_radius,
            start_angle: start,
            end_angle: end,
        },
        arrow,
        label_anchor: anchor.into(),
    })
}

/// Explicit memoization of the most recent curve computation.
///
/// Holds the `(inputs, output)` of the last call and recomputes only when
/// the new inputs differ by value — a state moved or the curvature changed.
/// The arrowhead and label anchor live inside the cached [`CurveSet`], so
/// they invalidate together with the curve. Call [`CurveMemo::invalidate`]
/// after swapping the render configuration.
#[derive(Debug, Clone, Default)]
pub struct CurveMemo {
    last: Option<(CurveInputs, CurveSet)>,
}

impl CurveMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// The curve for `inputs`, reusing the cached output when the inputs
    /// compare equal to the previous call.
    pub fn curve(&mut self, inputs: CurveInputs, config: &RenderConfig) -> Result<CurveSet> {
        if let Some((last_inputs, last_output)) = self.last {
            if last_inputs == inputs {
                return Ok(last_output);
            }
        }
        let output = compute_curve(&inputs, config)?;
        self.last = Some((inputs, output));
        Ok(output)
    }

    /// Whether the cache currently holds a result for exactly `inputs`.
    pub fn is_fresh(&self, inputs: &CurveInputs) -> bool {
        matches!(&self.last, Some((last, _)) if last == inputs)
    }

    pub fn invalidate(&mut self) {
        self.last = None;
    }
}
