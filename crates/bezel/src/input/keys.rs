//! Keyboard state and the default key map.
//!
//! The window feeds raw key presses into an [`Input<KeyCode>`]; once per
//! frame [`KeyBindings::apply`] turns that state into control panel changes:
//! held keys move sliders at a per-second rate, single presses fire actions.
//!
//! ```text
//! ← →        position x        W S   rotation x
//! ↓ ↑        position y        A D   rotation y
//! PgDn PgUp  position z        Z X   rotation z
//! - =        scale
//!
//! Space  animate     1 2 3  spin / bounce / pulse     F  wireframe
//! R      reset       F5     save view                 F9 load view
//! ```

use std::collections::HashSet;
use std::hash::Hash;

pub use winit::keyboard::KeyCode;

use crate::animation::AnimationPreset;
use crate::math::Parameter;

use super::{ControlEvent, ControlPanel};

/// Tracks the state of a set of inputs (keys or mouse buttons).
///
/// - `pressed`: currently held down
/// - `just_pressed`: went down since the last [`clear_just`](Self::clear_just)
pub struct Input<T: Eq + Hash + Copy> {
    pressed: HashSet<T>,
    just_pressed: HashSet<T>,
}

impl<T: Eq + Hash + Copy> Input<T> {
    pub fn new() -> Self {
        Self {
            pressed: HashSet::new(),
            just_pressed: HashSet::new(),
        }
    }

    /// Returns `true` if the input is currently held down.
    pub fn pressed(&self, input: T) -> bool {
        self.pressed.contains(&input)
    }

    /// Returns `true` if the input went down this frame.
    pub fn just_pressed(&self, input: T) -> bool {
        self.just_pressed.contains(&input)
    }

    /// Record a press. Auto-repeat of a held key is not a new press.
    pub fn press(&mut self, input: T) {
        if self.pressed.insert(input) {
            self.just_pressed.insert(input);
        }
    }

    pub fn release(&mut self, input: T) {
        self.pressed.remove(&input);
    }

    /// Forget everything, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.pressed.clear();
        self.just_pressed.clear();
    }

    /// Clear per-frame state. Called after each frame.
    pub fn clear_just(&mut self) {
        self.just_pressed.clear();
    }
}

impl<T: Eq + Hash + Copy> Default for Input<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A held key that moves one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nudge {
    pub key: KeyCode,
    pub parameter: Parameter,
    /// `1.0` or `-1.0`.
    pub direction: f32,
}

/// What a single key press does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    ToggleAnimation,
    SelectPreset(AnimationPreset),
    ToggleWireframe,
    ResetView,
    SavePreset,
    LoadPreset,
}

/// Key map from keyboard state to control panel changes.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub nudges: Vec<Nudge>,
    pub actions: Vec<(KeyCode, KeyAction)>,
}

impl KeyBindings {
    /// Apply one frame of keyboard state. `dt` is the frame delta in seconds.
    pub fn apply(&self, keys: &Input<KeyCode>, panel: &mut ControlPanel, dt: f32) {
        for nudge in &self.nudges {
            if !keys.pressed(nudge.key) {
                continue;
            }
            let parameter = nudge.parameter;
            let mut value = panel.slider(parameter).value
                + nudge.direction * parameter.nudge_rate() * dt;
            if parameter.is_rotation() {
                value = value.rem_euclid(360.0);
            }
            panel.set_value(parameter, value);
        }

        for &(key, action) in &self.actions {
            if !keys.just_pressed(key) {
                continue;
            }
            log::debug!("key {key:?} -> {action:?}");
            match action {
                KeyAction::ToggleAnimation => panel.press_animate(),
                KeyAction::SelectPreset(preset) => panel.choose_preset(preset),
                KeyAction::ToggleWireframe => panel.toggle_wireframe(),
                KeyAction::ResetView => panel.request(ControlEvent::ResetView),
                KeyAction::SavePreset => panel.request(ControlEvent::SavePreset),
                KeyAction::LoadPreset => panel.request(ControlEvent::LoadPreset),
            }
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let nudge = |key, parameter, direction| Nudge {
            key,
            parameter,
            direction,
        };
        Self {
            nudges: vec![
                nudge(KeyCode::ArrowLeft, Parameter::PositionX, -1.0),
                nudge(KeyCode::ArrowRight, Parameter::PositionX, 1.0),
                nudge(KeyCode::ArrowDown, Parameter::PositionY, -1.0),
                nudge(KeyCode::ArrowUp, Parameter::PositionY, 1.0),
                nudge(KeyCode::PageDown, Parameter::PositionZ, -1.0),
                nudge(KeyCode::PageUp, Parameter::PositionZ, 1.0),
                nudge(KeyCode::KeyS, Parameter::RotationX, -1.0),
                nudge(KeyCode::KeyW, Parameter::RotationX, 1.0),
                nudge(KeyCode::KeyA, Parameter::RotationY, -1.0),
                nudge(KeyCode::KeyD, Parameter::RotationY, 1.0),
                nudge(KeyCode::KeyZ, Parameter::RotationZ, -1.0),
                nudge(KeyCode::KeyX, Parameter::RotationZ, 1.0),
                nudge(KeyCode::Minus, Parameter::Scale, -1.0),
                nudge(KeyCode::Equal, Parameter::Scale, 1.0),
            ],
            actions: vec![
                (KeyCode::Space, KeyAction::ToggleAnimation),
                (KeyCode::Digit1, KeyAction::SelectPreset(AnimationPreset::Spin)),
                (KeyCode::Digit2, KeyAction::SelectPreset(AnimationPreset::Bounce)),
                (KeyCode::Digit3, KeyAction::SelectPreset(AnimationPreset::Pulse)),
                (KeyCode::KeyF, KeyAction::ToggleWireframe),
                (KeyCode::KeyR, KeyAction::ResetView),
                (KeyCode::F5, KeyAction::SavePreset),
                (KeyCode::F9, KeyAction::LoadPreset),
            ],
        }
    }
}
