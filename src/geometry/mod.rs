pub mod polygon;
pub mod ring;

pub use polygon::Polygon;
pub use ring::Ring;
