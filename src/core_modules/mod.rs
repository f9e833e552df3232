pub mod bounding_box;
pub mod brush;
pub mod centroid;
pub mod error;
pub mod grid;
pub mod intensity;
pub mod recenter;
pub mod serializer;
pub mod smoother;
pub mod utils;
