//! Where the frame driver gets its per-frame values from.
//!
//! [`InputSource`] is the presentation side of the viewer: it holds what the
//! user currently sees on the controls and queues discrete [`ControlEvent`]s.
//! The frame driver reads it once per frame and writes animated values back
//! so the controls follow the animation.
//!
//! [`ControlPanel`] is the in-process implementation shared by the keyboard
//! bindings and the egui panel.

mod control;
mod keys;

pub use control::{ControlPanel, Slider};
pub use keys::{Input, KeyAction, KeyBindings, KeyCode, Nudge};

use crate::animation::AnimationPreset;
use crate::math::{Parameter, TransformParameters};

/// A discrete user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// Start or stop the animation.
    ToggleAnimation,
    /// Pick the spin / bounce / pulse preset.
    SelectPreset(AnimationPreset),
    /// A slider moved. Only its displayed text changes.
    SliderInput(Parameter),
    /// Restore the configured starting view.
    ResetView,
    /// Write the current view to the preset file.
    SavePreset,
    /// Replace the current view with the preset file.
    LoadPreset,
}

/// The controls as seen by the frame driver.
pub trait InputSource {
    /// Current values of all seven parameters.
    fn parameters(&self) -> TransformParameters;

    /// Whether wireframe drawing is selected.
    fn wireframe(&self) -> bool;

    /// Background color text, normally `#RRGGBB`.
    fn background(&self) -> &str;

    /// Mirror an animated value into the control for `parameter`.
    fn write_back(&mut self, parameter: Parameter, value: f32, text: &str);

    /// Show whether the animation runs and which preset is selected.
    fn show_animation(&mut self, active: bool, preset: AnimationPreset);

    /// Replace every control value at once (reset / load preset).
    fn restore(&mut self, parameters: &TransformParameters, wireframe: bool, background: &str);

    /// Take all events queued since the last call.
    fn take_events(&mut self) -> Vec<ControlEvent>;
}
