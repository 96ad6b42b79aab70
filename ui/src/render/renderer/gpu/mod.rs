pub mod utils;
pub mod gpu_state;
pub mod surface_context;
pub mod vertex_ctx;

pub use gpu_state::GpuState;
pub use surface_context::SurfaceContext;
pub use vertex_ctx::VertexCtx;
