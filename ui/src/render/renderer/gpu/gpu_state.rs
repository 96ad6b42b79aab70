use anyhow::Result;
use shoal::Scene;

use crate::render::renderer::fish_renderer::FishRenderer;

use super::surface_context::SurfaceContext;

pub struct GpuState {
    pub surface_context: SurfaceContext,
    pub renderer: FishRenderer,
    pub frame_counter: u32,
}

impl GpuState {
    pub fn new(surface_context: SurfaceContext) -> Self {
        let renderer = FishRenderer::new(&surface_context);
        Self { surface_context, renderer, frame_counter: 0 }
    }

    pub fn resolution(&self) -> (f32, f32) {
        self.surface_context.resolution()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface_context.resize(width, height);
    }

    pub fn render(&mut self, scene: &Scene) -> Result<()> {
        self.renderer.render(&self.surface_context, scene)?;
        self.frame_counter = self.frame_counter.wrapping_add(1);
        if self.frame_counter % 600 == 0 {
            log::trace!("{} frames, layout epoch {}", self.frame_counter, scene.layout_epoch());
        }
        Ok(())
    }
}
