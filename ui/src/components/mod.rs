pub mod fish_canvas;
pub mod utils;

pub use fish_canvas::main::FishCanvas;
