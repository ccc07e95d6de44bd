//! # Animation — Time-Driven Parameter Overrides
//!
//! While an animation runs, exactly one transform parameter is replaced each
//! frame by a function of the accumulated animation time `t`:
//!
//! ```text
//! Spin    rotation.y = (t * 50) mod 360        degrees
//! Bounce  position.y = 0.3 * sin(t * 4)
//! Pulse   scale      = 1.0 + 0.2 * sin(t * 5)
//! ```
//!
//! ## State Machine
//!
//! ```text
//!             toggle (t := 0)
//!   ┌─────┐ ─────────────────▶ ┌──────────────────────┐
//!   │ Off │                    │ Spin | Bounce | Pulse │ ◀─┐ select_preset
//!   └─────┘ ◀───────────────── └──────────────────────┘ ──┘ (t unchanged)
//!             toggle (t := 0)
//! ```
//!
//! The selected preset is remembered while off, so toggling back on resumes
//! with the same preset.
//!
//! ## Time Step
//!
//! By default each frame adds a fixed 0.016 s regardless of how long the frame
//! really took, which ties animation speed to the display refresh rate.
//! [`TimeStep::RealTime`] feeds the measured frame delta instead.

use serde::{Deserialize, Serialize};

use crate::math::Parameter;

/// Seconds added per frame under [`TimeStep::Fixed`] by default (60 Hz).
pub const NOMINAL_STEP: f32 = 0.016;

/// Degrees per second of the spin preset.
pub const SPIN_SPEED: f32 = 50.0;
pub const BOUNCE_AMPLITUDE: f32 = 0.3;
pub const BOUNCE_FREQUENCY: f32 = 4.0;
pub const PULSE_AMPLITUDE: f32 = 0.2;
pub const PULSE_FREQUENCY: f32 = 5.0;

/// Which parameter the animation drives, and how.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationPreset {
    #[default]
    Spin,
    Bounce,
    Pulse,
}

impl AnimationPreset {
    pub const ALL: [AnimationPreset; 3] = [
        AnimationPreset::Spin,
        AnimationPreset::Bounce,
        AnimationPreset::Pulse,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AnimationPreset::Spin => "spin",
            AnimationPreset::Bounce => "bounce",
            AnimationPreset::Pulse => "pulse",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AnimationPreset::Spin => "Spin",
            AnimationPreset::Bounce => "Bounce",
            AnimationPreset::Pulse => "Pulse",
        }
    }

    /// The parameter this preset overrides.
    pub fn parameter(self) -> Parameter {
        match self {
            AnimationPreset::Spin => Parameter::RotationY,
            AnimationPreset::Bounce => Parameter::PositionY,
            AnimationPreset::Pulse => Parameter::Scale,
        }
    }

    /// Evaluate the preset at animation time `t` (seconds).
    pub fn sample(self, t: f32) -> AnimatedValue {
        let value = match self {
            AnimationPreset::Spin => (t * SPIN_SPEED).rem_euclid(360.0),
            AnimationPreset::Bounce => BOUNCE_AMPLITUDE * (t * BOUNCE_FREQUENCY).sin(),
            AnimationPreset::Pulse => 1.0 + PULSE_AMPLITUDE * (t * PULSE_FREQUENCY).sin(),
        };
        AnimatedValue {
            parameter: self.parameter(),
            value,
        }
    }
}

/// One overridden parameter for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatedValue {
    pub parameter: Parameter,
    pub value: f32,
}

/// Externally visible animation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Off,
    Spin,
    Bounce,
    Pulse,
}

impl AnimationState {
    pub fn name(self) -> &'static str {
        match self {
            AnimationState::Off => "off",
            AnimationState::Spin => "spin",
            AnimationState::Bounce => "bounce",
            AnimationState::Pulse => "pulse",
        }
    }
}

impl From<AnimationPreset> for AnimationState {
    fn from(preset: AnimationPreset) -> Self {
        match preset {
            AnimationPreset::Spin => AnimationState::Spin,
            AnimationPreset::Bounce => AnimationState::Bounce,
            AnimationPreset::Pulse => AnimationState::Pulse,
        }
    }
}

/// How animation time advances each frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeStep {
    /// Add this many seconds per frame.
    Fixed(f32),
    /// Add the measured frame delta.
    RealTime,
}

impl Default for TimeStep {
    fn default() -> Self {
        TimeStep::Fixed(NOMINAL_STEP)
    }
}

/// Drives the active preset and its elapsed time.
#[derive(Debug, Clone)]
pub struct AnimationController {
    active: bool,
    preset: AnimationPreset,
    elapsed: f32,
    time_step: TimeStep,
}

impl AnimationController {
    /// A stopped controller with the spin preset selected.
    pub fn new(time_step: TimeStep) -> Self {
        Self {
            active: false,
            preset: AnimationPreset::default(),
            elapsed: 0.0,
            time_step,
        }
    }

    pub fn with_preset(mut self, preset: AnimationPreset) -> Self {
        self.preset = preset;
        self
    }

    /// Start or stop the animation. Either way, time restarts at zero.
    pub fn toggle(&mut self) {
        self.active = !self.active;
        self.elapsed = 0.0;
        log::info!(
            "animation {} ({})",
            if self.active { "started" } else { "stopped" },
            self.preset.name()
        );
    }

    /// Switch preset without touching the elapsed time or the on/off state.
    pub fn select_preset(&mut self, preset: AnimationPreset) {
        if preset != self.preset {
            log::debug!("animation preset {} -> {}", self.preset.name(), preset.name());
        }
        self.preset = preset;
    }

    /// Advance one frame and return the override for it, if running.
    ///
    /// Time is incremented before sampling, so the first frame after a toggle
    /// samples at one step past zero.
    pub fn advance(&mut self, frame_delta: f32) -> Option<AnimatedValue> {
        if !self.active {
            return None;
        }
        self.elapsed += match self.time_step {
            TimeStep::Fixed(step) => step,
            TimeStep::RealTime => frame_delta.max(0.0),
        };
        Some(self.preset.sample(self.elapsed))
    }

    pub fn state(&self) -> AnimationState {
        if self.active {
            self.preset.into()
        } else {
            AnimationState::Off
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn preset(&self) -> AnimationPreset {
        self.preset
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn time_step(&self) -> TimeStep {
        self.time_step
    }
}

impl Default for AnimationController {
    fn default() -> Self {
        Self::new(TimeStep::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn spin_at_one_second() {
        let v = AnimationPreset::Spin.sample(1.0);
        assert_eq!(v.parameter, Parameter::RotationY);
        assert!(approx(v.value, 50.0));
    }

    #[test]
    fn spin_wraps_at_full_turn() {
        assert!(approx(AnimationPreset::Spin.sample(8.0).value, 40.0));
    }

    #[test]
    fn pulse_at_zero_is_unit_scale() {
        let v = AnimationPreset::Pulse.sample(0.0);
        assert_eq!(v.parameter, Parameter::Scale);
        assert_eq!(v.value, 1.0);
    }

    #[test]
    fn bounce_peaks_at_amplitude() {
        let t = std::f32::consts::FRAC_PI_2 / BOUNCE_FREQUENCY;
        let v = AnimationPreset::Bounce.sample(t);
        assert_eq!(v.parameter, Parameter::PositionY);
        assert!(approx(v.value, 0.3));
    }

    #[test]
    fn starts_off() {
        let mut anim = AnimationController::default();
        assert_eq!(anim.state(), AnimationState::Off);
        assert_eq!(anim.advance(0.5), None);
        assert_eq!(anim.elapsed(), 0.0);
    }

    #[test]
    fn fixed_step_ignores_frame_delta() {
        let mut anim = AnimationController::default();
        anim.toggle();
        anim.advance(1.0);
        anim.advance(0.0);
        assert!(approx(anim.elapsed(), 2.0 * NOMINAL_STEP));
    }

    #[test]
    fn real_time_uses_frame_delta() {
        let mut anim = AnimationController::new(TimeStep::RealTime);
        anim.toggle();
        let v = anim.advance(1.0).unwrap();
        assert!(approx(v.value, 50.0));
    }

    #[test]
    fn toggle_resets_elapsed() {
        let mut anim = AnimationController::default();
        anim.toggle();
        for _ in 0..10 {
            anim.advance(0.0);
        }
        assert!(anim.elapsed() > 0.0);
        anim.toggle();
        assert_eq!(anim.elapsed(), 0.0);
        assert_eq!(anim.state(), AnimationState::Off);
        anim.toggle();
        assert_eq!(anim.elapsed(), 0.0);
    }

    #[test]
    fn preset_change_keeps_elapsed() {
        let mut anim = AnimationController::default();
        anim.toggle();
        for _ in 0..5 {
            anim.advance(0.0);
        }
        let before = anim.elapsed();
        anim.select_preset(AnimationPreset::Pulse);
        assert_eq!(anim.elapsed(), before);
        assert_eq!(anim.state(), AnimationState::Pulse);
    }

    #[test]
    fn preset_survives_stop() {
        let mut anim = AnimationController::default().with_preset(AnimationPreset::Bounce);
        anim.toggle();
        anim.toggle();
        anim.toggle();
        assert_eq!(anim.state(), AnimationState::Bounce);
    }

    #[test]
    fn first_frame_samples_one_step_in() {
        let mut anim = AnimationController::default();
        anim.toggle();
        let v = anim.advance(0.0).unwrap();
        assert!(approx(v.value, NOMINAL_STEP * SPIN_SPEED));
    }

    #[test]
    fn time_step_parses_from_json() {
        let fixed: TimeStep = serde_json::from_str(r#"{ "fixed": 0.02 }"#).unwrap();
        assert_eq!(fixed, TimeStep::Fixed(0.02));
        let real: TimeStep = serde_json::from_str(r#""real-time""#).unwrap();
        assert_eq!(real, TimeStep::RealTime);
    }
}
