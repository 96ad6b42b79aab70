use std::num::NonZeroU64;

use anyhow::{Context, Result};

use crate::render::renderer::uniform::ShapeUniform;
use crate::render::renderer::vertex::Vertex;

#[macro_export]
macro_rules! dynamic_ubo_layout_entry {
  ($b:expr, $vis:expr, $size:expr) => {
    wgpu::BindGroupLayoutEntry {
        binding: $b,
        visibility: $vis,
        ty: wgpu::BindingType::Buffer {
            ty:                wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: true,
            min_binding_size:  NonZeroU64::new($size),
        },
        count: None
    }
  };
}

pub fn create_shape_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Shape UBO Bind Group Layout"),
        entries: &[
            // binding 0 = Shape UBO, one slot per draw call
            dynamic_ubo_layout_entry!(0, wgpu::ShaderStages::VERTEX_FRAGMENT, ShapeUniform::SIZE),
        ],
    })
}

/// Uniform buffer holding `capacity` shape slots `stride` bytes apart.
pub fn create_shape_ubo(device: &wgpu::Device, stride: u64, capacity: u32) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Shape UBO"),
        size: stride * capacity as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

pub fn create_shape_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            // a single slot; the dynamic offset picks which one
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer,
                offset: 0,
                size: NonZeroU64::new(ShapeUniform::SIZE),
            }),
        }],
        label: Some("Shape UBO Bind Group"),
    })
}

pub fn make_fish_pipe(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("fish shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("../../shaders/fish.wgsl").into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("fish pipeline layout"),
        bind_group_layouts: &[layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some("fish pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            compilation_options: Default::default(),
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
        },
        fragment: Some(wgpu::FragmentState {
            compilation_options: Default::default(),
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            cull_mode: None,
            ..Default::default()
        },
        // painter's order, no depth
        depth_stencil: None,
        multisample: Default::default(),
        multiview: None,
    })
}

pub async fn request_device(adapter: &wgpu::Adapter) -> Result<(wgpu::Device, wgpu::Queue)> {
    adapter.request_device(&wgpu::DeviceDescriptor {
        label: None,
        required_features: wgpu::Features::empty(),
        required_limits: if cfg!(target_arch = "wasm32") {
            wgpu::Limits::downlevel_webgl2_defaults()
        } else {
            wgpu::Limits::default()
        },
        memory_hints: wgpu::MemoryHints::default(),
        trace: wgpu::Trace::Off,
    }).await.context("Failed to request device")
}

pub async fn request_adapter(
    instance: &wgpu::Instance,
    surface: &wgpu::Surface<'static>,
) -> Result<wgpu::Adapter> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(surface),
            force_fallback_adapter: false,
        })
        .await
        .context("Failed to request a GPU adapter")?;

    Ok(adapter)
}
