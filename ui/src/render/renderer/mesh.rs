use shoal::Fan;
use wgpu::{Buffer, BufferUsages, Device, RenderPass};
use wgpu::util::DeviceExt;

use super::vertex::Vertex;

/// Static template geometry, uploaded once per layout epoch.
pub struct Mesh {
    vertex_buf: Buffer,
    index_buf:  Buffer,
    index_count: u32,
}

impl Mesh {
    pub fn new<V: bytemuck::Pod>(
        device: &Device,
        vertices: &[V],
        indices:  &[u16],
    ) -> Self {
        let vertex_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("template vertex buffer"),
            contents: bytemuck::cast_slice(vertices),
            usage: BufferUsages::VERTEX,
        });

        // pad to the 4-byte copy alignment; the extra index is never drawn
        let mut padded = indices.to_vec();
        if padded.len() % 2 == 1 {
            padded.push(0);
        }
        let index_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("template index buffer"),
            contents: bytemuck::cast_slice(&padded),
            usage: BufferUsages::INDEX,
        });

        Self {
            vertex_buf,
            index_buf,
            index_count: indices.len() as u32,
        }
    }

    pub fn from_fan(device: &Device, fan: &Fan) -> Self {
        let vertices: Vec<Vertex> = fan.points.iter().copied().map(Vertex::from).collect();
        Self::new(device, &vertices, &fan.triangle_indices())
    }

    pub fn draw(&self, pass: &mut RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buf.slice(..));
        pass.set_index_buffer (self.index_buf.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}
