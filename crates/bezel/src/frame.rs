//! # Frame — Per-Frame Orchestration
//!
//! [`FrameDriver`] owns the [`Scene`] and runs one frame at a time:
//!
//! ```text
//!  InputSource ──▶ parameters ──▶ animation override ──▶ model-view ──▶ backend
//!       ▲                               │                                 │
//!       └──────── write back ───────────┘                 clear + draw ◀──┘
//! ```
//!
//! 1. Read the seven parameters and replace any non-finite value.
//! 2. If animating, advance time and override one parameter, then write the
//!    animated value back to the input so the controls follow it.
//! 3. Parse the background; a bad string keeps the previous clear color.
//! 4. Clear, push the model-view matrix, and issue the draws from
//!    [`plan_draws`].
//!
//! Scheduling the next frame is the window's job (`request_redraw`). The
//! geometry is uploaded once in [`FrameDriver::startup`] and never changes.
//!
//! ## Wireframe
//!
//! Wireframe mode draws every triangle as its own closed line loop, so an edge
//! shared by two triangles is drawn twice. That is the intended look, not a
//! deduplicated edge list.

use std::path::{Path, PathBuf};

use crate::animation::{AnimationController, AnimationState};
use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::input::{ControlEvent, InputSource};
use crate::math::{Parameter, Projection, TransformParameters, model_view_matrix};
use crate::mesh::{GeometryBuffer, ModelVariant};
use crate::preset::ViewPreset;
use crate::render::{ClearColor, GraphicsBackend, MatrixSlot};

// ── Draw planning ───────────────────────────────────────────────────────

/// One indexed draw over a range of the model's index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCall {
    /// Filled triangles over `first..first + count`.
    Triangles { first: u32, count: u32 },
    /// The outline of the triangle at `first..first + count`.
    LineLoop { first: u32, count: u32 },
}

impl DrawCall {
    pub fn index_count(&self) -> u32 {
        match *self {
            DrawCall::Triangles { count, .. } | DrawCall::LineLoop { count, .. } => count,
        }
    }
}

/// The draws for one frame: one triangle draw over all `index_count`
/// indices, or one 3-index loop per triangle in wireframe mode.
pub fn plan_draws(index_count: usize, wireframe: bool) -> Vec<DrawCall> {
    let count = index_count as u32;
    if count == 0 {
        return Vec::new();
    }
    if wireframe {
        (0..count / 3)
            .map(|k| DrawCall::LineLoop {
                first: k * 3,
                count: 3,
            })
            .collect()
    } else {
        vec![DrawCall::Triangles { first: 0, count }]
    }
}

// ── Scene ───────────────────────────────────────────────────────────────

/// Everything one viewer renders, owned by the [`FrameDriver`].
#[derive(Debug, Clone)]
pub struct Scene {
    pub model: ModelVariant,
    pub geometry: GeometryBuffer,
    /// Parameters used for the most recent frame, animation applied.
    pub parameters: TransformParameters,
    pub animation: AnimationController,
    pub clear_color: ClearColor,
    pub projection: Projection,
    pub wireframe: bool,
    /// Frames run so far.
    pub frame: u64,
}

impl Scene {
    /// Assemble `model` and start from the identity transform.
    pub fn new(model: ModelVariant, animation: AnimationController) -> Self {
        Self {
            model,
            geometry: model.assemble(),
            parameters: TransformParameters::default(),
            animation,
            clear_color: ClearColor::default(),
            projection: Projection::default(),
            wireframe: false,
            frame: 0,
        }
    }
}

/// What the last frame did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub frame: u64,
    pub draw_calls: usize,
    pub indices_drawn: usize,
    pub wireframe: bool,
    pub animation: AnimationState,
}

// ── FrameDriver ─────────────────────────────────────────────────────────

/// Runs frames against an [`InputSource`] and a [`GraphicsBackend`].
pub struct FrameDriver {
    scene: Scene,
    default_view: ViewPreset,
    preset_path: PathBuf,
    /// Last background string that failed to parse, to warn once per value.
    rejected_background: Option<String>,
    /// Parameters replaced last frame for being non-finite.
    non_finite: Vec<Parameter>,
    last_stats: Option<FrameStats>,
}

impl FrameDriver {
    pub fn new(scene: Scene, default_view: ViewPreset, preset_path: PathBuf) -> Self {
        let mut scene = scene;
        scene.parameters = default_view.parameters;
        scene.wireframe = default_view.wireframe;
        scene.animation.select_preset(default_view.animation_preset);
        if let Ok(color) = ClearColor::from_hex(&default_view.background) {
            scene.clear_color = color;
        }
        Self {
            scene,
            default_view,
            preset_path,
            rejected_background: None,
            non_finite: Vec::new(),
            last_stats: None,
        }
    }

    /// Build the scene a config describes.
    pub fn from_config(config: &ViewerConfig) -> Self {
        let mut animation = AnimationController::new(config.animation.time_step)
            .with_preset(config.animation.preset);
        if config.animation.autostart {
            animation.toggle();
        }
        Self::new(
            Scene::new(config.model, animation),
            config.default_view(),
            config.preset_path.clone(),
        )
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn preset_path(&self) -> &Path {
        &self.preset_path
    }

    pub fn last_stats(&self) -> Option<FrameStats> {
        self.last_stats
    }

    /// Validate and upload the model, then set the projection once.
    pub fn startup(&mut self, backend: &mut impl GraphicsBackend) -> Result<(), ViewerError> {
        self.scene.geometry.validate()?;
        backend.upload_geometry(&self.scene.geometry);

        let (width, height) = backend.viewport_size();
        backend.set_matrix(MatrixSlot::Projection, self.scene.projection.matrix(width, height));

        log::info!(
            "{} monitor ready: {} vertices, {} triangles, viewport {width}x{height}",
            self.scene.model.name(),
            self.scene.geometry.vertex_count(),
            self.scene.geometry.triangle_count()
        );
        Ok(())
    }

    /// Recompute the projection for a new viewport size.
    pub fn resize(&mut self, backend: &mut impl GraphicsBackend, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        backend.set_matrix(MatrixSlot::Projection, self.scene.projection.matrix(width, height));
        log::debug!("projection updated for {width}x{height}");
    }

    /// Push the animation state to the controls.
    pub fn sync_controls(&self, input: &mut impl InputSource) {
        input.show_animation(self.scene.animation.is_active(), self.scene.animation.preset());
    }

    /// Apply all queued discrete events.
    pub fn handle_events(&mut self, input: &mut impl InputSource) {
        for event in input.take_events() {
            match event {
                ControlEvent::ToggleAnimation => {
                    self.scene.animation.toggle();
                    self.sync_controls(input);
                }
                ControlEvent::SelectPreset(preset) => {
                    self.scene.animation.select_preset(preset);
                    self.sync_controls(input);
                }
                ControlEvent::SliderInput(parameter) => {
                    log::trace!("{} slider moved", parameter.label());
                }
                ControlEvent::ResetView => {
                    let view = self.default_view.clone();
                    self.apply_view(input, &view);
                    log::info!("view reset");
                }
                ControlEvent::SavePreset => {
                    let mut parameters = input.parameters();
                    parameters.sanitize();
                    let view = ViewPreset {
                        parameters,
                        background: input.background().to_string(),
                        wireframe: input.wireframe(),
                        animation_preset: self.scene.animation.preset(),
                    };
                    if let Err(e) = view.save(&self.preset_path) {
                        log::warn!("could not save view: {e}");
                    }
                }
                ControlEvent::LoadPreset => match ViewPreset::load(&self.preset_path) {
                    Ok(view) => self.apply_view(input, &view),
                    Err(e) => log::warn!("could not load view: {e}"),
                },
            }
        }
    }

    fn apply_view(&mut self, input: &mut impl InputSource, view: &ViewPreset) {
        input.restore(&view.parameters, view.wireframe, &view.background);
        self.scene.animation.select_preset(view.animation_preset);
        self.sync_controls(input);
    }

    /// Run one frame. `frame_delta` is the measured time since the last
    /// frame, used only by real-time animation.
    pub fn run_frame(
        &mut self,
        input: &mut impl InputSource,
        backend: &mut impl GraphicsBackend,
        frame_delta: f32,
    ) -> FrameStats {
        // Parameters.
        let mut parameters = input.parameters();
        let replaced = parameters.sanitize();
        if !replaced.is_empty() && replaced != self.non_finite {
            log::warn!("non-finite {replaced:?} replaced by defaults");
        }
        self.non_finite = replaced;

        // Animation override and write-back.
        if let Some(animated) = self.scene.animation.advance(frame_delta) {
            parameters.set(animated.parameter, animated.value);
            let text = animated.parameter.format(animated.value);
            input.write_back(animated.parameter, animated.value, &text);
        }

        // Background.
        match ClearColor::from_hex(input.background()) {
            Ok(color) => {
                self.scene.clear_color = color;
                self.rejected_background = None;
            }
            Err(e) => {
                let bad = input.background();
                if self.rejected_background.as_deref() != Some(bad) {
                    log::warn!("background {bad:?} ignored: {e}");
                    self.rejected_background = Some(bad.to_string());
                }
            }
        }

        backend.clear(self.scene.clear_color);

        // Transform.
        self.scene.parameters = parameters;
        backend.set_matrix(MatrixSlot::ModelView, model_view_matrix(&parameters));

        // Draws.
        self.scene.wireframe = input.wireframe();
        let draws = plan_draws(self.scene.geometry.index_count(), self.scene.wireframe);
        let indices_drawn = draws.iter().map(|d| d.index_count() as usize).sum();
        let draw_calls = draws.len();
        for call in draws {
            backend.draw(call);
        }

        self.scene.frame += 1;
        let stats = FrameStats {
            frame: self.scene.frame,
            draw_calls,
            indices_drawn,
            wireframe: self.scene.wireframe,
            animation: self.scene.animation.state(),
        };
        self.last_stats = Some(stats);
        stats
    }
}
