//! CPU side of a frame: flattens a [`DrawList`] into buffers and an ordered
//! list of draw calls, without touching the GPU.

use std::ops::Range;

use glam::Vec2;
use shoal::{DrawList, DrawOp, TemplateKey};

use super::uniform::ShapeUniform;
use super::vertex::Vertex;

const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    /// Cached template mesh posed by its uniform.
    Template { key: TemplateKey, uniform: u32 },
    /// Slice of this frame's dynamic index buffer.
    Dynamic { indices: Range<u32>, uniform: u32 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FramePlan {
    pub vertices: Vec<Vertex>,
    /// Absolute into `vertices`; 32-bit since a large school overflows u16.
    pub indices: Vec<u32>,
    pub uniforms: Vec<ShapeUniform>,
    /// Every template this frame uses, first use first, no repeats.
    pub templates: Vec<TemplateKey>,
    pub calls: Vec<DrawCall>,
}

impl FramePlan {
    pub fn build(list: &DrawList, resolution: Vec2, aspect: f32) -> Self {
        let mut plan = Self::default();

        for op in &list.ops {
            match op {
                DrawOp::Template { key, transform, color } => {
                    let uniform = plan.push_uniform(ShapeUniform::new(*color, *transform, resolution, aspect));
                    if !plan.templates.contains(key) {
                        plan.templates.push(*key);
                    }
                    plan.calls.push(DrawCall::Template { key: *key, uniform });
                }
                DrawOp::Fan { fan, color } => {
                    let uniform = plan.push_uniform(ShapeUniform::unposed(*color, resolution, aspect));
                    let indices = fan.triangle_indices().into_iter().map(u32::from).collect();
                    plan.push_dynamic(fan.points.iter().copied(), indices, uniform);
                }
                DrawOp::Quads { quads, color } => {
                    if quads.is_empty() {
                        continue;
                    }
                    let uniform = plan.push_uniform(ShapeUniform::unposed(*color, resolution, aspect));
                    let indices = (0..quads.len() as u32)
                        .flat_map(|q| QUAD_INDICES.map(|i| q * 4 + i))
                        .collect();
                    plan.push_dynamic(quads.iter().flatten().copied(), indices, uniform);
                }
            }
        }

        plan
    }

    fn push_uniform(&mut self, u: ShapeUniform) -> u32 {
        self.uniforms.push(u);
        (self.uniforms.len() - 1) as u32
    }

    /// `local` indices count from the first of `points`.
    fn push_dynamic(&mut self, points: impl Iterator<Item = Vec2>, local: Vec<u32>, uniform: u32) {
        // no base_vertex: WebGL2 cannot offset indexed draws
        let base = self.vertices.len() as u32;
        self.vertices.extend(points.map(Vertex::from));

        let start = self.indices.len() as u32;
        self.indices.extend(local.into_iter().map(|i| base + i));
        let end = self.indices.len() as u32;

        self.calls.push(DrawCall::Dynamic { indices: start..end, uniform });
    }
}
