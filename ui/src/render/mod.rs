pub mod renderer;

#[cfg(feature = "web")]
pub mod web_gpu;
