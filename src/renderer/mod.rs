//! WebGPU rendering module
//!
//! The scene is a list of flat-colored rectangles in screen pixels; text lives
//! in DOM overlays.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use shapes::build_scene;
pub use vertex::Vertex;
