//! # Pipeline — wgpu Implementation of the Backend
//!
//! [`WgpuBackend`] owns the [`GpuContext`], the static model buffers, and two
//! render pipelines that share one shader and one matrix bind group:
//!
//! ```text
//!                 ┌─────────────────────┐
//!  positions ───▶ │ slot 0              │     triangles: TriangleList over
//!  colors    ───▶ │ slot 1   vs_main ───┼──▶            the index buffer
//!  matrices  ───▶ │ group 0             │     wireframe: LineStrip over the
//!                 └─────────────────────┘                loop index buffer
//! ```
//!
//! ## Frame Flow
//!
//! The frame driver calls [`clear`](GraphicsBackend::clear),
//! [`set_matrix`](GraphicsBackend::set_matrix) and
//! [`draw`](GraphicsBackend::draw); those only record state. The window then
//! calls [`WgpuBackend::submit`], which acquires the surface texture, encodes
//! everything into a single render pass, runs the overlay callback, and
//! presents.
//!
//! ## Culling
//!
//! Winding is only consistent within a primitive, so both pipelines draw
//! front and back faces. The depth buffer (`Depth32Float`, compare `Less`)
//! sorts out visibility.

use glam::Mat4;
use wgpu::util::DeviceExt;

use super::backend::{GraphicsBackend, MatrixSlot};
use super::gpu::GpuContext;
use super::pass::ClearColor;
use super::vertex::{COLOR_LAYOUT, MatrixUniform, POSITION_LAYOUT, line_loop_indices};
use crate::frame::DrawCall;
use crate::mesh::GeometryBuffer;

/// Depth texture format used by the model pipelines.
pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Per-frame render context handed to overlay passes.
///
/// The model pass has already been recorded into `encoder` when an overlay
/// sees it; overlays add their own passes with `LoadOp::Load`.
pub struct FrameContext<'a> {
    pub encoder: wgpu::CommandEncoder,
    pub view: wgpu::TextureView,
    pub gpu: &'a GpuContext,
}

/// Static model buffers, created once by `upload_geometry`.
struct ModelBuffers {
    positions: wgpu::Buffer,
    colors: wgpu::Buffer,
    indices: wgpu::Buffer,
    loop_indices: wgpu::Buffer,
}

/// Renders one static mesh with wgpu.
pub struct WgpuBackend {
    gpu: GpuContext,
    triangle_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    matrix_buffer: wgpu::Buffer,
    matrix_bind_group: wgpu::BindGroup,
    model: Option<ModelBuffers>,
    depth_texture: wgpu::TextureView,
    depth_size: (u32, u32),
    clear_color: ClearColor,
    pending: Vec<DrawCall>,
}

impl WgpuBackend {
    pub fn new(gpu: GpuContext) -> Self {
        let device = &gpu.device;

        // ── Shader ──────────────────────────────────────────────────────
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("bezel shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        // ── Matrix uniform ──────────────────────────────────────────────
        let matrix_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("matrix layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let matrix_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("matrix buffer"),
            contents: bytemuck::cast_slice(&[MatrixUniform::identity()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let matrix_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("matrix bind group"),
            layout: &matrix_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: matrix_buffer.as_entire_binding(),
            }],
        });

        // ── Pipelines ───────────────────────────────────────────────────
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("model pipeline layout"),
            bind_group_layouts: &[&matrix_bind_group_layout],
            push_constant_ranges: &[],
        });

        let triangle_pipeline = build_pipeline(
            &gpu,
            &pipeline_layout,
            &shader,
            "model triangles",
            wgpu::PrimitiveTopology::TriangleList,
        );
        let line_pipeline = build_pipeline(
            &gpu,
            &pipeline_layout,
            &shader,
            "model wireframe",
            wgpu::PrimitiveTopology::LineStrip,
        );

        // ── Depth texture ───────────────────────────────────────────────
        let (w, h) = gpu.surface_size();
        let depth_texture = create_depth_texture(device, w, h);

        Self {
            gpu,
            triangle_pipeline,
            line_pipeline,
            matrix_buffer,
            matrix_bind_group,
            model: None,
            depth_texture,
            depth_size: (w, h),
            clear_color: ClearColor::default(),
            pending: Vec::new(),
        }
    }

    pub fn gpu(&self) -> &GpuContext {
        &self.gpu
    }

    /// Resize the surface; the depth texture follows on the next submit.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }

    /// Reconfigure the surface at its current size (after `Lost`/`Outdated`).
    pub fn reconfigure(&mut self) {
        self.gpu.reconfigure();
    }

    /// Encode the queued draws, run `overlay`, and present.
    ///
    /// The queue is emptied even when the surface texture cannot be acquired,
    /// so a skipped frame never replays stale draws.
    pub fn submit(
        &mut self,
        overlay: impl FnOnce(&mut FrameContext<'_>),
    ) -> Result<(), wgpu::SurfaceError> {
        let calls = std::mem::take(&mut self.pending);

        let (w, h) = self.gpu.surface_size();
        if (w, h) != self.depth_size {
            self.depth_texture = create_depth_texture(&self.gpu.device, w, h);
            self.depth_size = (w, h);
        }

        let output = self.gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("bezel frame encoder"),
            });

        let mut frame = FrameContext {
            encoder,
            view,
            gpu: &self.gpu,
        };

        {
            let mut pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("model pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(model) = &self.model {
                pass.set_bind_group(0, &self.matrix_bind_group, &[]);
                pass.set_vertex_buffer(0, model.positions.slice(..));
                pass.set_vertex_buffer(1, model.colors.slice(..));

                let mut wireframe_bound = None;
                for call in &calls {
                    let wireframe = matches!(call, DrawCall::LineLoop { .. });
                    if wireframe_bound != Some(wireframe) {
                        if wireframe {
                            pass.set_pipeline(&self.line_pipeline);
                            pass.set_index_buffer(
                                model.loop_indices.slice(..),
                                wgpu::IndexFormat::Uint16,
                            );
                        } else {
                            pass.set_pipeline(&self.triangle_pipeline);
                            pass.set_index_buffer(
                                model.indices.slice(..),
                                wgpu::IndexFormat::Uint16,
                            );
                        }
                        wireframe_bound = Some(wireframe);
                    }

                    match *call {
                        DrawCall::Triangles { first, count } => {
                            pass.draw_indexed(first..first + count, 0, 0..1);
                        }
                        DrawCall::LineLoop { first, count } => {
                            // Triangle k occupies loop indices 4k..4k+4.
                            let start = first / 3 * 4;
                            let len = count / 3 * 4;
                            pass.draw_indexed(start..start + len, 0, 0..1);
                        }
                    }
                }
            }
        }

        overlay(&mut frame);

        self.gpu.queue.submit(std::iter::once(frame.encoder.finish()));
        output.present();

        Ok(())
    }
}

impl GraphicsBackend for WgpuBackend {
    fn upload_geometry(&mut self, geometry: &GeometryBuffer) {
        let device = &self.gpu.device;
        let loops = line_loop_indices(geometry.indices());

        self.model = Some(ModelBuffers {
            positions: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("model positions"),
                contents: bytemuck::cast_slice(geometry.positions()),
                usage: wgpu::BufferUsages::VERTEX,
            }),
            colors: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("model colors"),
                contents: bytemuck::cast_slice(geometry.colors()),
                usage: wgpu::BufferUsages::VERTEX,
            }),
            indices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("model indices"),
                contents: bytemuck::cast_slice(geometry.indices()),
                usage: wgpu::BufferUsages::INDEX,
            }),
            loop_indices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("model line loops"),
                contents: bytemuck::cast_slice(&loops),
                usage: wgpu::BufferUsages::INDEX,
            }),
        });

        log::info!(
            "uploaded {} vertices, {} indices ({} loop indices)",
            geometry.vertex_count(),
            geometry.index_count(),
            loops.len()
        );
    }

    fn set_matrix(&mut self, slot: MatrixSlot, matrix: Mat4) {
        self.gpu.queue.write_buffer(
            &self.matrix_buffer,
            slot.offset(),
            bytemuck::cast_slice(&matrix.to_cols_array_2d()),
        );
    }

    fn clear(&mut self, color: ClearColor) {
        self.clear_color = color;
    }

    fn draw(&mut self, call: DrawCall) {
        self.pending.push(call);
    }

    fn viewport_size(&self) -> (u32, u32) {
        self.gpu.surface_size()
    }
}

fn build_pipeline(
    gpu: &GpuContext,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    label: &str,
    topology: wgpu::PrimitiveTopology,
) -> wgpu::RenderPipeline {
    let strip_index_format = match topology {
        wgpu::PrimitiveTopology::LineStrip | wgpu::PrimitiveTopology::TriangleStrip => {
            Some(wgpu::IndexFormat::Uint16)
        }
        _ => None,
    };

    gpu.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[POSITION_LAYOUT, COLOR_LAYOUT],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: gpu.surface_format(),
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

/// Create a depth texture at the given dimensions.
fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
