mod buffers;
mod context;
mod render;

pub use buffers::PointBuffers;
pub use context::GpuContext;
pub use render::PointPipeline;
