pub mod batch;
pub mod buffer;
pub mod offset;
