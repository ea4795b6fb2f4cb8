mod parallel_line_2d;

pub use parallel_line_2d::ParallelLine2D;
