//! wgpu renderer for a [`shoal::Scene`], plus (feature `web`) a leptos
//! component that runs the school in a browser canvas.

pub mod render;

#[cfg(feature = "web")]
pub mod components;

pub use render::renderer::{DrawCall, FishRenderer, FramePlan, ShapeUniform, Vertex};
pub use render::renderer::gpu::{GpuState, SurfaceContext};

#[cfg(feature = "web")]
pub use components::FishCanvas;

#[cfg(feature = "web")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    use leptos::view;

    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(|| view! { <FishCanvas/> });
}
