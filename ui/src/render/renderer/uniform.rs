use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use shoal::{Rgba, Transform2D};

/// Per-shape pose and colour. Matches `struct Shape` in `fish.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ShapeUniform {
    pub color: [f32; 4],       // 16 bytes @ offset 0
    pub translation: [f32; 2], //  8 bytes @ offset 16
    pub resolution: [f32; 2],  //  8 bytes @ offset 24
    pub rotation: f32,         //  4 bytes @ offset 32, radians clockwise
    pub aspect: f32,           //  4 bytes @ offset 36
    _pad: [f32; 2],            //  8 bytes @ offset 40 (struct align 16)
} // total size = 48 bytes

impl ShapeUniform {
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    pub fn new(color: Rgba, transform: Transform2D, resolution: Vec2, aspect: f32) -> Self {
        Self {
            color,
            translation: transform.translation.to_array(),
            resolution: resolution.to_array(),
            rotation: transform.rotation.to_radians(),
            aspect,
            _pad: [0.0; 2],
        }
    }

    /// Identity pose, for geometry already in world space.
    pub fn unposed(color: Rgba, resolution: Vec2, aspect: f32) -> Self {
        Self::new(color, Transform2D::IDENTITY, resolution, aspect)
    }
}

/// Distance between consecutive uniforms in a dynamic-offset buffer.
pub fn uniform_stride(min_alignment: u32) -> u64 {
    let align = u64::from(min_alignment.max(1));
    ShapeUniform::SIZE.div_ceil(align) * align
}
