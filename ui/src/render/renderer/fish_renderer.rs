use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use glam::Vec2;
use shoal::{Scene, TemplateKey};

use super::gpu::utils::{create_shape_bind_group, create_shape_bind_group_layout, create_shape_ubo, make_fish_pipe};
use super::gpu::{SurfaceContext, VertexCtx};
use super::mesh::Mesh;
use super::plan::{DrawCall, FramePlan};
use super::uniform::{ShapeUniform, uniform_stride};
use super::vertex::Vertex;

/// Shape slots the uniform buffer starts with; grows by doubling.
const INITIAL_SHAPES: u32 = 128;

struct ShapeUbo {
    buf: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    capacity: u32,
    stride: u64,
    staging: Vec<u8>,
}

impl ShapeUbo {
    fn new(sc: &SurfaceContext, layout: &wgpu::BindGroupLayout, capacity: u32) -> Self {
        let stride = uniform_stride(sc.device.limits().min_uniform_buffer_offset_alignment);
        let buf = create_shape_ubo(&sc.device, stride, capacity);
        let bind_group = create_shape_bind_group(&sc.device, layout, &buf);
        Self { buf, bind_group, capacity, stride, staging: Vec::new() }
    }

    fn upload(&mut self, sc: &SurfaceContext, layout: &wgpu::BindGroupLayout, uniforms: &[ShapeUniform]) {
        let needed = uniforms.len() as u32;
        if needed > self.capacity {
            *self = Self::new(sc, layout, needed.next_power_of_two());
            log::debug!("shape UBO grown to {} slots", self.capacity);
        }

        self.staging.clear();
        self.staging.resize(self.stride as usize * uniforms.len(), 0);
        for (slot, u) in self.staging.chunks_exact_mut(self.stride as usize).zip(uniforms) {
            slot[..ShapeUniform::SIZE as usize].copy_from_slice(bytemuck::bytes_of(u));
        }
        if !self.staging.is_empty() {
            sc.queue.write_buffer(&self.buf, 0, &self.staging);
        }
    }

    fn offset(&self, slot: u32) -> u32 {
        (slot as u64 * self.stride) as u32
    }
}

/// Draws a [`Scene`] with one pipeline: cached template meshes posed by
/// per-shape uniforms, plus per-frame geometry for shapes that change every
/// frame.
pub struct FishRenderer {
    pipeline: wgpu::RenderPipeline,
    shape_layout: wgpu::BindGroupLayout,
    shapes: ShapeUbo,
    vertices: VertexCtx<Vertex>,
    indices: VertexCtx<u32>,
    templates: HashMap<TemplateKey, Mesh>,
    epoch: Option<u64>,
}

impl FishRenderer {
    pub fn new(sc: &SurfaceContext) -> Self {
        let shape_layout = create_shape_bind_group_layout(&sc.device);
        let pipeline = make_fish_pipe(&sc.device, sc.config.format, &shape_layout);
        let shapes = ShapeUbo::new(sc, &shape_layout, INITIAL_SHAPES);

        Self {
            pipeline,
            vertices: VertexCtx::new(sc, 1024),
            indices: VertexCtx::index(sc, 2048),
            shapes,
            shape_layout,
            templates: HashMap::new(),
            epoch: None,
        }
    }

    /// Uploads everything `plan` needs. Templates from an older layout epoch
    /// are dropped and rebuilt from the scene.
    fn prepare(&mut self, sc: &SurfaceContext, scene: &Scene, plan: &FramePlan) -> Result<()> {
        if self.epoch != Some(scene.layout_epoch()) {
            if !self.templates.is_empty() {
                log::debug!("layout epoch {}: dropping {} templates", scene.layout_epoch(), self.templates.len());
            }
            self.templates.clear();
            self.epoch = Some(scene.layout_epoch());
        }

        for key in &plan.templates {
            if self.templates.contains_key(key) {
                continue;
            }
            let fan = scene
                .template(*key)
                .ok_or_else(|| anyhow!("no template for {key:?}"))?;
            self.templates.insert(*key, Mesh::from_fan(&sc.device, &fan));
        }

        self.vertices.sync(sc, |v| v.extend_from_slice(&plan.vertices));
        self.indices.sync(sc, |i| i.extend_from_slice(&plan.indices));
        self.shapes.upload(sc, &self.shape_layout, &plan.uniforms);
        Ok(())
    }

    pub fn render(&mut self, sc: &SurfaceContext, scene: &Scene) -> Result<()> {
        let (w, h) = sc.resolution();
        let plan = FramePlan::build(&scene.draw_list(), Vec2::new(w, h), scene.aspect_correction());
        self.prepare(sc, scene, &plan)?;

        let frame = match sc.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // skip this frame; the next one sees a fresh surface
                sc.surface.configure(&sc.device, &sc.config);
                return Ok(());
            }
            Err(e) => return Err(e).context("failed to acquire the next frame"),
        };
        let view = frame.texture.create_view(&Default::default());
        let mut encoder = sc.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("fish encoder"),
        });

        {
            let [r, g, b, a] = scene.clear_color().map(f64::from);
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("fish pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            rpass.set_pipeline(&self.pipeline);

            for call in &plan.calls {
                match call {
                    DrawCall::Template { key, uniform } => {
                        let Some(mesh) = self.templates.get(key) else {
                            continue;
                        };
                        rpass.set_bind_group(0, &self.shapes.bind_group, &[self.shapes.offset(*uniform)]);
                        mesh.draw(&mut rpass);
                    }
                    DrawCall::Dynamic { indices, uniform } => {
                        rpass.set_bind_group(0, &self.shapes.bind_group, &[self.shapes.offset(*uniform)]);
                        rpass.set_vertex_buffer(0, self.vertices.buf.slice(..));
                        rpass.set_index_buffer(self.indices.buf.slice(..), wgpu::IndexFormat::Uint32);
                        rpass.draw_indexed(indices.clone(), 0, 0..1);
                    }
                }
            }
        }

        sc.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
