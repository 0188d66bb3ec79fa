//! The drawing surface, as seen from the curve layout.

use crate::Result;
use crate::config::RenderConfig;
use crate::curve::{CurveInputs, CurveMemo};
use crate::model::{CurvePoint, CurveSet};

/// Whatever actually draws: a canvas binding, an SVG writer, a test
/// recorder. The layout never knows.
pub trait RenderPort {
    fn draw_curve(&mut self, curve: &CurveSet);
    fn draw_label(&mut self, text: &str, anchor: CurvePoint);
}

/// Lays out one transition (through its memo) and pushes the curve and its
/// condition label through the port.
pub fn render_transition(
    port: &mut dyn RenderPort,
    memo: &mut CurveMemo,
    inputs: CurveInputs,
    label: &str,
    config: &RenderConfig,
) -> Result<()> {
    let set = memo.curve(inputs, config)?;
    port.draw_curve(&set);
    if !label.is_empty() {
        port.draw_label(label, set.label_anchor);
    }
    Ok(())
}

/// [`RenderPort`] that records every draw call, for tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingPort {
    pub curves: Vec<CurveSet>,
    pub labels: Vec<(String, CurvePoint)>,
}

impl RecordingPort {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderPort for RecordingPort {
    fn draw_curve(&mut self, curve: &CurveSet) {
        self.curves.push(*curve);
    }

    fn draw_label(&mut self, text: &str, anchor: CurvePoint) {
        self.labels.push((text.to_string(), anchor));
    }
}
