//! The control panel model: seven sliders, a wireframe checkbox, a
//! background color, and the animation controls.

use crate::animation::AnimationPreset;
use crate::math::{Parameter, TransformParameters};
use crate::render::DEFAULT_BACKGROUND;

use super::{ControlEvent, InputSource};

pub const START_CAPTION: &str = "Start Animation";
pub const STOP_CAPTION: &str = "Stop Animation";

/// A slider's value and the text shown next to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    pub value: f32,
    pub text: String,
}

impl Slider {
    fn new(parameter: Parameter, value: f32) -> Self {
        Self {
            value,
            text: parameter.format(value),
        }
    }
}

/// In-process [`InputSource`] shared by the keyboard and the egui panel.
#[derive(Debug, Clone)]
pub struct ControlPanel {
    sliders: [Slider; 7],
    wireframe: bool,
    background: String,
    animating: bool,
    preset: AnimationPreset,
    events: Vec<ControlEvent>,
}

fn slot(parameter: Parameter) -> usize {
    match parameter {
        Parameter::PositionX => 0,
        Parameter::PositionY => 1,
        Parameter::PositionZ => 2,
        Parameter::RotationX => 3,
        Parameter::RotationY => 4,
        Parameter::RotationZ => 5,
        Parameter::Scale => 6,
    }
}

impl ControlPanel {
    pub fn new(parameters: &TransformParameters, wireframe: bool, background: &str) -> Self {
        let mut panel = Self {
            sliders: std::array::from_fn(|_| Slider {
                value: 0.0,
                text: String::new(),
            }),
            wireframe,
            background: background.to_string(),
            animating: false,
            preset: AnimationPreset::default(),
            events: Vec::new(),
        };
        panel.load_parameters(parameters);
        panel
    }

    pub fn slider(&self, parameter: Parameter) -> &Slider {
        &self.sliders[slot(parameter)]
    }

    /// User moved a slider. The value is kept within the slider's range.
    pub fn set_value(&mut self, parameter: Parameter, value: f32) {
        let range = parameter.range();
        let value = value.clamp(*range.start(), *range.end());
        self.sliders[slot(parameter)] = Slider::new(parameter, value);
        self.events.push(ControlEvent::SliderInput(parameter));
    }

    pub fn set_wireframe(&mut self, wireframe: bool) {
        self.wireframe = wireframe;
    }

    pub fn toggle_wireframe(&mut self) {
        self.wireframe = !self.wireframe;
    }

    pub fn set_background(&mut self, background: impl Into<String>) {
        self.background = background.into();
    }

    /// The animate button was pressed.
    pub fn press_animate(&mut self) {
        self.events.push(ControlEvent::ToggleAnimation);
    }

    /// A preset was picked from the list.
    pub fn choose_preset(&mut self, preset: AnimationPreset) {
        self.preset = preset;
        self.events.push(ControlEvent::SelectPreset(preset));
    }

    /// Queue any other action (reset, save, load).
    pub fn request(&mut self, event: ControlEvent) {
        self.events.push(event);
    }

    /// Text of the animate button.
    pub fn animate_caption(&self) -> &'static str {
        if self.animating { STOP_CAPTION } else { START_CAPTION }
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn preset(&self) -> AnimationPreset {
        self.preset
    }

    fn load_parameters(&mut self, parameters: &TransformParameters) {
        for parameter in Parameter::ALL {
            self.sliders[slot(parameter)] = Slider::new(parameter, parameters.get(parameter));
        }
    }
}

impl InputSource for ControlPanel {
    fn parameters(&self) -> TransformParameters {
        let mut params = TransformParameters::default();
        for parameter in Parameter::ALL {
            params.set(parameter, self.slider(parameter).value);
        }
        params
    }

    fn wireframe(&self) -> bool {
        self.wireframe
    }

    fn background(&self) -> &str {
        &self.background
    }

    fn write_back(&mut self, parameter: Parameter, value: f32, text: &str) {
        let slider = &mut self.sliders[slot(parameter)];
        slider.value = value;
        slider.text.clear();
        slider.text.push_str(text);
    }

    fn show_animation(&mut self, active: bool, preset: AnimationPreset) {
        self.animating = active;
        self.preset = preset;
    }

    fn restore(&mut self, parameters: &TransformParameters, wireframe: bool, background: &str) {
        self.load_parameters(parameters);
        self.wireframe = wireframe;
        self.background = background.to_string();
    }

    fn take_events(&mut self) -> Vec<ControlEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self::new(&TransformParameters::default(), false, DEFAULT_BACKGROUND)
    }
}
