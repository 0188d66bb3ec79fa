use crate::*;
use approx::assert_relative_eq;
use machina_core::DiagramConfig;
use machina_core::diagram::{Diagram, State, Transition};
use machina_core::geom::{point, vector};

fn inputs_at(x: f64) -> CurveInputs {
    CurveInputs::Link {
        from: point(0.0, 0.0),
        to: point(x, 0.0),
        from_radius: 25.0,
        to_radius: 25.0,
        sagitta: 0.0,
        reversed: false,
    }
}

#[test]
fn the_memo_recomputes_only_when_inputs_change() {
    let config = RenderConfig::default();
    let mut memo = CurveMemo::new();

    let first = inputs_at(200.0);
    assert!(!memo.is_fresh(&first));

    let a = memo.curve(first, &config).unwrap();
    assert!(memo.is_fresh(&first));

    // Identical inputs are served from the cache and compare identical.
    let b = memo.curve(first, &config).unwrap();
    assert_eq!(a, b);

    // A moved endpoint invalidates by value, no dirty flag involved.
    let moved = inputs_at(240.0);
    assert!(!memo.is_fresh(&moved));
    let c = memo.curve(moved, &config).unwrap();
    assert_ne!(a, c);
    assert!(memo.is_fresh(&moved));
    assert!(!memo.is_fresh(&first));

    memo.invalidate();
    assert!(!memo.is_fresh(&moved));
}

#[test]
fn render_transition_pushes_curve_and_label_through_the_port() {
    let config = RenderConfig::default();
    let mut memo = CurveMemo::new();
    let mut port = RecordingPort::new();

    render_transition(&mut port, &mut memo, inputs_at(200.0), "a,b", &config).unwrap();
    assert_eq!(port.curves.len(), 1);
    assert_eq!(port.labels.len(), 1);
    assert_eq!(port.labels[0].0, "a,b");
    assert_relative_eq!(port.labels[0].1.x, 100.0);

    // Unlabeled transitions draw no label.
    render_transition(&mut port, &mut memo, inputs_at(240.0), "", &config).unwrap();
    assert_eq!(port.curves.len(), 2);
    assert_eq!(port.labels.len(), 1);
}

#[test]
fn layout_diagram_skips_dangling_transitions() {
    let mut diagram = Diagram::new();
    let s0 = diagram.add_state(State::with_label(point(0.0, 0.0), "S0"));
    let s1 = diagram.add_state(State::with_label(point(200.0, 0.0), "S1"));
    let connected = diagram.add_transition(Transition::between(s0, s1).with_label("a"));
    diagram.add_transition(Transition::new(s1));
    diagram.add_transition(Transition::self_link(s0, vector(0.0, -1.0)).with_label("$"));

    let curves = layout_diagram(
        &diagram,
        &DiagramConfig::default(),
        &RenderConfig::default(),
    )
    .unwrap();
    assert_eq!(curves.len(), 2);
    assert_eq!(curves[0].0, connected);
    assert!(matches!(
        curves[0].1.curve,
        CurveDescriptor::Straight { .. }
    ));
    assert!(matches!(
        curves[1].1.curve,
        CurveDescriptor::SelfLoop { .. }
    ));
}

/// The full interactive loop: drag a midpoint, store the pulled curvature on
/// the transition, and lay it out again from the entity alone.
#[test]
fn pulled_curvature_round_trips_through_the_entity() {
    let diagram_config = DiagramConfig::default();
    let render_config = RenderConfig::default();

    let mut diagram = Diagram::new();
    let s0 = diagram.add_state(State::with_label(point(0.0, 0.0), "S0"));
    let s1 = diagram.add_state(State::with_label(point(200.0, 0.0), "S1"));
    let t = diagram.add_transition(Transition::between(s0, s1).with_label("a"));

    let drag = point(100.0, 40.0);
    let pulled = pull_curvature(point(0.0, 0.0), point(200.0, 0.0), drag, 5.0);
    apply_curvature(diagram.transition_mut(t).unwrap(), pulled);

    let transition = diagram.transition(t).unwrap();
    let inputs = CurveInputs::for_transition(&diagram, transition, &diagram_config).unwrap();
    let set = compute_curve(&inputs, &render_config).unwrap();

    // The reconstructed circle passes through the drag point.
    let CurveDescriptor::Arc { center, radius, .. } = set.curve else {
        panic!("expected an arc, got {:?}", set.curve);
    };
    assert_relative_eq!(
        (drag - center.to_point()).length(),
        radius,
        epsilon = 1e-9
    );
}

#[test]
fn shape_kinds_carry_editor_capabilities() {
    let config = RenderConfig::default();
    let straight = compute_curve(&inputs_at(200.0), &config).unwrap();
    assert_eq!(straight.curve.shape_kind(), ShapeKind::StraightEdge);

    let caps = ShapeKind::ArcEdge.capabilities();
    assert!(caps.hoverable && caps.selectable && caps.pullable);
    assert!(!caps.movable);

    let caps = ShapeKind::State.capabilities();
    assert!(caps.movable);
    assert!(!caps.pullable);
}

#[test]
fn descriptors_serialize_with_a_kind_tag() {
    let config = RenderConfig::default();
    let set = compute_curve(&inputs_at(200.0), &config).unwrap();
    let json = serde_json::to_value(set).unwrap();
    assert_eq!(json["curve"]["kind"], "straight");

    let parsed: CurveSet = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, set);

    let arc = compute_curve(
        &CurveInputs::Link {
            from: point(0.0, 0.0),
            to: point(200.0, 0.0),
            from_radius: 25.0,
            to_radius: 25.0,
            sagitta: 50.0,
            reversed: false,
        },
        &config,
    )
    .unwrap();
    let json = serde_json::to_value(arc).unwrap();
    assert_eq!(json["curve"]["kind"], "arc");
}
