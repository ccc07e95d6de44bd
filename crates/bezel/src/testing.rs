//! Test doubles for running frames without a window or GPU.

use glam::Mat4;

use crate::animation::AnimationPreset;
use crate::frame::DrawCall;
use crate::input::{ControlEvent, InputSource};
use crate::math::{Parameter, TransformParameters};
use crate::mesh::GeometryBuffer;
use crate::render::{ClearColor, DEFAULT_BACKGROUND, GraphicsBackend, MatrixSlot};

/// One call made on a [`RecordingBackend`], geometry uploads aside.
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Matrix(MatrixSlot, Mat4),
    Clear(ClearColor),
    Draw(DrawCall),
}

/// Backend that records every call in order.
pub struct RecordingBackend {
    pub size: (u32, u32),
    pub uploads: usize,
    pub uploaded_indices: usize,
    pub calls: Vec<Recorded>,
}

impl RecordingBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            uploads: 0,
            uploaded_indices: 0,
            calls: Vec::new(),
        }
    }

    pub fn draws(&self) -> Vec<DrawCall> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Recorded::Draw(d) => Some(*d),
                _ => None,
            })
            .collect()
    }
}

impl GraphicsBackend for RecordingBackend {
    fn upload_geometry(&mut self, geometry: &GeometryBuffer) {
        self.uploads += 1;
        self.uploaded_indices = geometry.index_count();
    }

    fn set_matrix(&mut self, slot: MatrixSlot, matrix: Mat4) {
        self.calls.push(Recorded::Matrix(slot, matrix));
    }

    fn clear(&mut self, color: ClearColor) {
        self.calls.push(Recorded::Clear(color));
    }

    fn draw(&mut self, call: DrawCall) {
        self.calls.push(Recorded::Draw(call));
    }

    fn viewport_size(&self) -> (u32, u32) {
        self.size
    }
}

/// Input whose values are set directly by the test.
pub struct ScriptedInput {
    pub parameters: TransformParameters,
    pub wireframe: bool,
    pub background: String,
    pub events: Vec<ControlEvent>,
    /// Every `write_back` call, in order.
    pub written: Vec<(Parameter, f32, String)>,
    /// Last `show_animation` call.
    pub animating: Option<(bool, AnimationPreset)>,
}

impl Default for ScriptedInput {
    fn default() -> Self {
        Self {
            parameters: TransformParameters::default(),
            wireframe: false,
            background: DEFAULT_BACKGROUND.to_string(),
            events: Vec::new(),
            written: Vec::new(),
            animating: None,
        }
    }
}

impl InputSource for ScriptedInput {
    fn parameters(&self) -> TransformParameters {
        self.parameters
    }

    fn wireframe(&self) -> bool {
        self.wireframe
    }

    fn background(&self) -> &str {
        &self.background
    }

    fn write_back(&mut self, parameter: Parameter, value: f32, text: &str) {
        self.parameters.set(parameter, value);
        self.written.push((parameter, value, text.to_string()));
    }

    fn show_animation(&mut self, active: bool, preset: AnimationPreset) {
        self.animating = Some((active, preset));
    }

    fn restore(&mut self, parameters: &TransformParameters, wireframe: bool, background: &str) {
        self.parameters = *parameters;
        self.wireframe = wireframe;
        self.background = background.to_string();
    }

    fn take_events(&mut self) -> Vec<ControlEvent> {
        std::mem::take(&mut self.events)
    }
}
