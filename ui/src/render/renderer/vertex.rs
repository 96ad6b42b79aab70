use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// World-space point, pixels from the canvas centre, y up.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
}

impl Vertex {
    pub const ATTRIBS: [wgpu::VertexAttribute; 1] =
        wgpu::vertex_attr_array![
            0 => Float32x2,  // position
        ];
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as _,
            step_mode:    wgpu::VertexStepMode::Vertex,
            attributes:   &Self::ATTRIBS,
        }
    }
}

impl From<Vec2> for Vertex {
    fn from(p: Vec2) -> Self {
        Self { position: p.to_array() }
    }
}
