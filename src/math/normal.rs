use crate::error::{NormalError, ToleranceError};

use super::{Vector3, TOLERANCE};

/// Angular tolerance for comparing normals, stored as `1 - cos(angle)`.
///
/// Precomputing the cosine form keeps the comparison loop free of
/// inverse trigonometry: two unit normals `a` and `b` are equivalent
/// when `1 - a·b <= tolerance`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalTolerance(f64);

impl NormalTolerance {
    /// Only identical normals are equivalent (0 degrees).
    pub const EXACT: Self = Self(0.0);

    /// Every normal is equivalent to every other (180 degrees).
    pub const ANY: Self = Self(2.0);

    /// Creates a tolerance from a raw `1 - cos(angle)` value.
    ///
    /// # Errors
    ///
    /// Returns [`ToleranceError::OutOfRange`] if `value` is outside `[0, 2]` or NaN.
    pub fn new(value: f64) -> Result<Self, ToleranceError> {
        if !(0.0..=2.0).contains(&value) {
            return Err(ToleranceError::OutOfRange { value });
        }
        Ok(Self(value))
    }

    /// Creates a tolerance from a maximum angular deviation in degrees.
    ///
    /// # Errors
    ///
    /// Returns [`ToleranceError::InvalidAngle`] if `degrees` is outside
    /// `[0, 180]` or NaN.
    pub fn from_degrees(degrees: f64) -> Result<Self, ToleranceError> {
        if !(0.0..=180.0).contains(&degrees) {
            return Err(ToleranceError::InvalidAngle { degrees });
        }
        // cos(180.0.to_radians()) is not guaranteed to round to exactly -1.
        let value = if degrees >= 180.0 {
            2.0
        } else {
            1.0 - degrees.to_radians().cos()
        };
        Ok(Self(value.clamp(0.0, 2.0)))
    }

    /// Returns the raw `1 - cos(angle)` value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Returns the angle in degrees this tolerance corresponds to.
    #[must_use]
    pub fn to_degrees(self) -> f64 {
        (1.0 - self.0).clamp(-1.0, 1.0).acos().to_degrees()
    }
}

/// A face normal that has been validated and normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitNormal(Vector3);

impl UnitNormal {
    /// Normalizes `normal`, returning `None` if its magnitude is below
    /// [`TOLERANCE`] or not finite.
    #[must_use]
    pub fn new(normal: Vector3) -> Option<Self> {
        let len = normal.norm();
        if !len.is_finite() || len < TOLERANCE {
            return None;
        }
        Some(Self(normal / len))
    }

    /// Returns the underlying unit vector.
    #[must_use]
    pub fn as_vector(&self) -> &Vector3 {
        &self.0
    }

    /// Tests whether two unit normals deviate by no more than `tolerance`.
    #[must_use]
    pub fn is_equivalent(&self, other: &Self, tolerance: NormalTolerance) -> bool {
        if self.0 == other.0 {
            return true;
        }
        // Distinct unit vectors can still have a dot product that rounds to 1.
        if tolerance.value() == 0.0 {
            return false;
        }
        let dot = self.0.dot(&other.0).clamp(-1.0, 1.0);
        1.0 - dot <= tolerance.value()
    }
}

/// Tests whether two arbitrary-length normals point in equivalent directions.
///
/// Both vectors are normalized before comparison.
///
/// # Errors
///
/// Returns [`NormalError::Degenerate`] if either vector is too short to
/// normalize. `index` is 0 for `a` and 1 for `b`.
pub fn is_equivalent(
    a: &Vector3,
    b: &Vector3,
    tolerance: NormalTolerance,
) -> Result<bool, NormalError> {
    let unit = |index: usize, v: &Vector3| {
        UnitNormal::new(*v).ok_or(NormalError::Degenerate {
            index,
            magnitude: v.norm(),
        })
    };
    let a = unit(0, a)?;
    let b = unit(1, b)?;
    Ok(a.is_equivalent(&b, tolerance))
}
