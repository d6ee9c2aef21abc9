//! WebGPU rendering module
//!
//! The scene builder produces flat-colored triangles in screen pixels; the
//! render state maps them to clip space and draws them in one pass.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;
