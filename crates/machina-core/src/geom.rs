#![forbid(unsafe_code)]

//! Plane geometry primitives shared by the diagram model and the curve layout.
//!
//! Everything here is a pure function of its arguments; tolerances are passed
//! explicitly by callers (see [`crate::config::DiagramConfig`] for defaults).

use crate::error::{Error, Result};

pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Vector = euclid::Vector2D<f64, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn vector(x: f64, y: f64) -> Vector {
    euclid::vec2(x, y)
}

/// Below this distance two points are treated as the same point.
pub const COINCIDENT_EPSILON: f64 = 1e-9;

/// Unit vector from `from` towards `to`.
///
/// Coincident inputs are a hard error: a direction cannot be derived from a
/// single point, and silently returning a zero vector would poison every
/// downstream trig computation. Callers are expected to check for coincidence
/// first and skip the operation instead of recovering from this.
pub fn direction(from: Point, to: Point, context: &'static str) -> Result<Vector> {
    let d = to - from;
    let len = d.length();
    if len < COINCIDENT_EPSILON {
        return Err(Error::DegenerateGeometry { context });
    }
    Ok(d / len)
}

/// Counterclockwise perpendicular of `v` (in the y-down canvas frame this
/// points to the right of travel).
pub fn perp(v: Vector) -> Vector {
    vector(-v.y, v.x)
}

/// Center and radius of the circle through three points, or `None` when the
/// points are numerically collinear (no finite circle exists).
pub fn circumcircle(a: Point, b: Point, c: Point) -> Option<(Point, f64)> {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() < COINCIDENT_EPSILON {
        return None;
    }
    let a2 = a.x * a.x + a.y * a.y;
    let b2 = b.x * b.x + b.y * b.y;
    let c2 = c.x * c.x + c.y * c.y;
    let center = point(
        (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d,
        (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d,
    );
    Some((center, (a - center).length()))
}

/// Whether `p` lies within `tolerance` of the infinite line through `a` and
/// `b`. A degenerate chord (`a == b`) is collinear with everything.
pub fn collinear(a: Point, b: Point, p: Point, tolerance: f64) -> bool {
    let chord = b - a;
    let len = chord.length();
    if len < COINCIDENT_EPSILON {
        return true;
    }
    (chord.cross(p - a) / len).abs() <= tolerance
}

/// Whether `p` lies within `max_distance` of the segment `a..b`.
pub fn near_segment(p: Point, a: Point, b: Point, max_distance: f64) -> bool {
    let chord = b - a;
    let len2 = chord.square_length();
    if len2 < COINCIDENT_EPSILON * COINCIDENT_EPSILON {
        return (p - a).length() <= max_distance;
    }
    let t = ((p - a).dot(chord) / len2).clamp(0.0, 1.0);
    let closest = a + chord * t;
    (p - closest).length() <= max_distance
}

/// Whether `p` lies inside (or on) the circle at `center` with `radius`.
pub fn inside_circle(p: Point, center: Point, radius: f64) -> bool {
    (p - center).length() <= radius
}

/// Whether `p` lies within `tolerance` of the circle's ring.
pub fn near_circle(p: Point, center: Point, radius: f64, tolerance: f64) -> bool {
    ((p - center).length() - radius).abs() <= tolerance
}

/// Normalizes an angle into `[0, 2π)`.
pub fn normalize_angle(a: f64) -> f64 {
    let tau = std::f64::consts::TAU;
    let r = a % tau;
    if r < 0.0 { r + tau } else { r }
}

/// Angle of `v` from the positive x axis, in `(-π, π]`.
pub fn angle_of(v: Vector) -> f64 {
    v.y.atan2(v.x)
}

/// Walking counterclockwise (increasing angle) from `start`, whether `mid` is
/// reached no later than `end`.
pub fn ccw_reaches_before(start: f64, mid: f64, end: f64) -> bool {
    normalize_angle(mid - start) <= normalize_angle(end - start)
}

/// Point on the circle at `center`/`radius` at the given angle.
pub fn on_circle(center: Point, radius: f64, angle: f64) -> Point {
    center + vector(angle.cos(), angle.sin()) * radius
}
