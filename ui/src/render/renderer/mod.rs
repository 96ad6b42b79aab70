pub mod fish_renderer;
pub mod gpu;
pub mod mesh;
pub mod plan;
pub mod uniform;
pub mod vertex;

pub use fish_renderer::FishRenderer;
pub use plan::{DrawCall, FramePlan};
pub use uniform::ShapeUniform;
pub use vertex::Vertex;
