use anyhow::Result;
use web_sys::HtmlCanvasElement;

use super::renderer::gpu::GpuState;
use super::renderer::gpu::SurfaceContext;

/// Acquires a WebGPU (or WebGL2 fallback) surface on `canvas` and builds the
/// fish pipeline for it.
pub async fn init_wgpu(canvas: &HtmlCanvasElement) -> Result<GpuState> {
    let target = wgpu::SurfaceTarget::Canvas(canvas.clone());
    let sc = SurfaceContext::new_async(target, canvas.width(), canvas.height()).await?;

    Ok(GpuState::new(sc))
}
