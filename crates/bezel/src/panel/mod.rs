//! On-screen control panel, toggled with F12.
//!
//! Feature-gated behind `#[cfg(feature = "panel")]`. Draws the
//! [`ControlPanel`] with egui on top of the model and forwards every change
//! into it; the frame driver never sees egui.
//!
//! [`PanelOverlay`] lives in the window state rather than next to the
//! backend because `egui_winit::State` is not `Sync`.

mod controls;

use std::sync::Arc;

use crate::frame::FrameStats;
use crate::input::ControlPanel;
use crate::render::{FrameContext, GpuContext};

/// egui context, winit glue, and wgpu renderer for the panel.
pub struct PanelOverlay {
    pub egui_ctx: egui::Context,
    pub egui_winit: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    /// Whether the panel is drawn and receives input.
    pub visible: bool,
    /// Prepared paint jobs for the current frame.
    paint_jobs: Vec<egui::ClippedPrimitive>,
    /// Textures delta for the current frame.
    textures_delta: egui::TexturesDelta,
    /// Whether paint jobs are ready for rendering.
    frame_ready: bool,
}

impl PanelOverlay {
    pub fn new(gpu: &GpuContext, window: &Arc<winit::window::Window>, visible: bool) -> Self {
        let egui_ctx = egui::Context::default();

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window.as_ref(),
            Some(window.scale_factor() as f32),
            None,
            Some(gpu.device.limits().max_texture_dimension_2d as usize),
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            &gpu.device,
            gpu.surface_format(),
            egui_wgpu::RendererOptions::default(),
        );

        Self {
            egui_ctx,
            egui_winit,
            egui_renderer,
            visible,
            paint_jobs: Vec::new(),
            textures_delta: egui::TexturesDelta::default(),
            frame_ready: false,
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        log::info!("control panel {}", if self.visible { "shown" } else { "hidden" });
    }

    /// Forward a winit event to egui. Returns true if egui consumed the event.
    pub fn on_window_event(
        &mut self,
        window: &winit::window::Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        if !self.visible {
            return false;
        }
        let response = self.egui_winit.on_window_event(window, event);
        response.consumed
    }

    /// Build the panel for this frame.
    pub fn build_ui(
        &mut self,
        window: &winit::window::Window,
        panel: &mut ControlPanel,
        stats: Option<FrameStats>,
        fps: f32,
    ) {
        if !self.visible {
            self.frame_ready = false;
            return;
        }

        let raw_input = self.egui_winit.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            controls::controls_panel(ctx, panel, stats, fps);
        });

        self.egui_winit
            .handle_platform_output(window, full_output.platform_output);

        self.paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        self.textures_delta = full_output.textures_delta;
        self.frame_ready = true;
    }

    /// Render the panel into the current frame, over the model.
    pub fn render_overlay(&mut self, frame: &mut FrameContext<'_>) {
        if !self.frame_ready {
            return;
        }
        self.frame_ready = false;

        let gpu = frame.gpu;
        let (sw, sh) = gpu.surface_size();

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [sw, sh],
            pixels_per_point: self.egui_ctx.pixels_per_point(),
        };

        for (id, delta) in &self.textures_delta.set {
            self.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, delta);
        }

        let cmd_buffers = self.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut frame.encoder,
            &self.paint_jobs,
            &screen_descriptor,
        );
        if !cmd_buffers.is_empty() {
            gpu.queue.submit(cmd_buffers);
        }

        {
            let render_pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("panel overlay"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.egui_renderer.render(
                &mut render_pass.forget_lifetime(),
                &self.paint_jobs,
                &screen_descriptor,
            );
        }

        for id in &self.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}
