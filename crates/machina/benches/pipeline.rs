use criterion::{Criterion, criterion_group, criterion_main};
use machina::render::{RenderConfig, layout_diagram};
use machina::geom::{point, vector};
use machina::{Diagram, DiagramConfig, Simulation, State, Transition};

/// A ring of states with curved links, epsilon shortcuts, and a self-loop:
/// enough variety to exercise every curve kind and a nondeterministic walk.
fn fixture(states: usize) -> Diagram {
    let mut diagram = Diagram::new();
    let mut ids = Vec::with_capacity(states);
    for i in 0..states {
        let angle = (i as f64) / (states as f64) * std::f64::consts::TAU;
        let mut state = State::with_label(
            point(400.0 + 300.0 * angle.cos(), 400.0 + 300.0 * angle.sin()),
            format!("S{i}"),
        );
        state.entry = i == 0;
        state.accepting = i == states - 1;
        ids.push(diagram.add_state(state));
    }
    for i in 0..states {
        let next = ids[(i + 1) % states];
        let mut link = Transition::between(ids[i], next).with_label("a,b");
        link.sagitta = 40.0;
        link.reversed = i % 2 == 0;
        diagram.add_transition(link);
        if i % 3 == 0 {
            diagram.add_transition(Transition::between(ids[i], ids[i / 2]).with_label("$"));
        }
    }
    diagram.add_transition(Transition::self_link(ids[0], vector(0.0, -1.0)).with_label("a"));
    diagram
}

fn bench_layout(c: &mut Criterion) {
    let diagram_config = DiagramConfig::default();
    let render_config = RenderConfig::default();

    let mut group = c.benchmark_group("layout");
    for size in [8usize, 64] {
        let diagram = fixture(size);
        group.bench_function(format!("{size}_states"), |b| {
            b.iter(|| layout_diagram(&diagram, &diagram_config, &render_config).unwrap());
        });
    }
    group.finish();
}

fn bench_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation");
    for size in [8usize, 64] {
        let diagram = fixture(size);
        let input: String = "ab".repeat(size);
        group.bench_function(format!("{size}_states_run_to_end"), |b| {
            b.iter(|| {
                let mut sim = Simulation::new();
                sim.load(&diagram);
                sim.set_input(&input);
                sim.run_to_end()
            });
        });

        let mut sim = Simulation::new();
        sim.load(&diagram);
        sim.set_input(&"ab".repeat(size));
        sim.run_to_end();
        group.bench_function(format!("{size}_states_step_back_replay"), |b| {
            b.iter(|| {
                sim.step_back();
                sim.step_forward()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_layout, bench_simulation);
criterion_main!(benches);
