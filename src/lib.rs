pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod planar;

pub use error::{BufferError, Result};
