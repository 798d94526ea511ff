mod buffers;
mod context;
mod render;

pub use buffers::{FrameBuffers, LineVertex};
pub use context::GpuContext;
pub use render::RenderPipeline;
