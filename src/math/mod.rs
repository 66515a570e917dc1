pub mod normal;

pub use normal::{is_equivalent, NormalTolerance, UnitNormal};

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
///
/// Normals shorter than this are treated as degenerate.
pub const TOLERANCE: f64 = 1e-10;
