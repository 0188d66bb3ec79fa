use crate::*;
use approx::assert_relative_eq;
use machina_core::geom::{Point, Vector, normalize_angle, on_circle, point, vector};

fn loop_inputs(center: Point, direction: Vector) -> CurveInputs {
    CurveInputs::SelfLink {
        center,
        state_radius: 25.0,
        direction,
        distance: 50.0,
        half_spread: 0.75,
    }
}

fn loop_arc(set: &CurveSet) -> (Point, f64, f64, f64) {
    match set.curve {
        CurveDescriptor::SelfLoop {
            center,
            radius,
            start_angle,
            end_angle,
        } => (center.to_point(), radius, start_angle, end_angle),
        other => panic!("expected a self-loop, got {other:?}"),
    }
}

fn assert_same_angle(a: f64, b: f64) {
    let d = normalize_angle(a - b);
    assert!(
        d < 1e-9 || std::f64::consts::TAU - d < 1e-9,
        "angles differ: {a} vs {b}"
    );
}

#[test]
fn the_loop_starts_and_ends_on_the_state_circle() {
    let state_center = point(100.0, 100.0);
    let set = compute_curve(&loop_inputs(state_center, vector(1.0, 0.0)), &RenderConfig::default())
        .unwrap();
    let (center, radius, start_angle, end_angle) = loop_arc(&set);

    let start = on_circle(center, radius, start_angle);
    let end = on_circle(center, radius, end_angle);
    assert_relative_eq!((start - state_center).length(), 25.0, epsilon = 1e-9);
    assert_relative_eq!((end - state_center).length(), 25.0, epsilon = 1e-9);

    // Traced with increasing angle, passing through the outward point.
    assert!(end_angle > start_angle);
    let outer = point(150.0, 100.0);
    assert_relative_eq!((outer - center).length(), radius, epsilon = 1e-9);

    // The loop's circle sits outward of the state along the anchor.
    assert!(center.x > state_center.x);
    assert_relative_eq!(center.y, 100.0, epsilon = 1e-9);

    let arrow = set.arrow.expect("self-loops carry an arrowhead");
    assert_relative_eq!(arrow.tip.x, end.x, epsilon = 1e-9);
    assert_relative_eq!(arrow.tip.y, end.y, epsilon = 1e-9);

    // Label anchor sits beyond the outermost point of the loop.
    assert_relative_eq!(set.label_anchor.x, 162.0, epsilon = 1e-9);
    assert_relative_eq!(set.label_anchor.y, 100.0, epsilon = 1e-9);
}

/// Rotating the anchor direction by θ rotates the whole loop by θ around
/// the state's center without changing its shape.
#[test]
fn dragging_rotates_the_loop_rigidly() {
    let state_center = point(100.0, 100.0);
    let theta: f64 = 0.7;

    let config = RenderConfig::default();
    let base = compute_curve(&loop_inputs(state_center, vector(1.0, 0.0)), &config).unwrap();
    let turned = compute_curve(
        &loop_inputs(state_center, vector(theta.cos(), theta.sin())),
        &config,
    )
    .unwrap();

    let (c0, r0, s0, e0) = loop_arc(&base);
    let (c1, r1, s1, e1) = loop_arc(&turned);

    assert_relative_eq!(r0, r1, epsilon = 1e-9);

    // Loop center orbits the state center.
    let offset = c0 - state_center;
    let rotated = vector(
        offset.x * theta.cos() - offset.y * theta.sin(),
        offset.x * theta.sin() + offset.y * theta.cos(),
    );
    assert_relative_eq!(c1.x, state_center.x + rotated.x, epsilon = 1e-9);
    assert_relative_eq!(c1.y, state_center.y + rotated.y, epsilon = 1e-9);

    // Angles shift by θ; the swept extent is unchanged.
    assert_same_angle(s1, s0 + theta);
    assert_same_angle(e1, e0 + theta);
    assert_relative_eq!(e1 - s1, e0 - s0, epsilon = 1e-9);
}

#[test]
fn a_zero_direction_cannot_anchor_a_loop() {
    let err = compute_curve(
        &loop_inputs(point(0.0, 0.0), vector(0.0, 0.0)),
        &RenderConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::SelfLoopCollapsed { .. }));
}

#[test]
fn pulling_a_loop_follows_the_pointer() {
    let dir = pull_self_link(point(0.0, 0.0), point(30.0, 40.0)).unwrap();
    assert_relative_eq!(dir.x, 0.6, epsilon = 1e-12);
    assert_relative_eq!(dir.y, 0.8, epsilon = 1e-12);

    // Dragging onto the state's own center is a guarded hard error.
    assert!(pull_self_link(point(5.0, 5.0), point(5.0, 5.0)).is_err());
}
