//! Vector and rotation helpers shared by every pipeline stage.

use std::f64::consts::TAU;

use nalgebra::{Matrix3, Vector3};

use crate::error::{PipelineError, PipelineResult};

/// A direction in one of the pipeline frames (ECI, ENU, Body, SFS).
pub type DirectionVector = Vector3<f64>;

/// Largest element-wise deviation of `MᵀM` from identity (and of `det M`
/// from one) accepted for a matrix supplied from outside the crate.
pub const DEFAULT_ORTHONORMAL_TOLERANCE: f64 = 1e-3;

/// Scale `v` to unit length.
pub fn normalize(v: DirectionVector) -> PipelineResult<DirectionVector> {
    if v.iter().all(|c| *c == 0.0) {
        return Err(PipelineError::DegenerateVector);
    }
    Ok(v / v.norm())
}

/// Reduce an angle in radians to `[0, 2π)` by subtracting the largest
/// multiple of 2π not exceeding it. Negative angles floor toward -∞.
pub fn wrap_two_pi(angle: f64) -> f64 {
    let mut wrapped = angle - (angle / TAU).floor() * TAU;
    // Rounding can leave the result a hair outside the interval.
    if wrapped < 0.0 {
        wrapped += TAU;
    }
    if wrapped >= TAU {
        wrapped -= TAU;
    }
    wrapped
}

/// Largest absolute element of `MᵀM - I`.
pub fn orthonormality_error(m: &Matrix3<f64>) -> f64 {
    (m.transpose() * m - Matrix3::identity()).amax()
}

/// True when `m` is a proper rotation within `tolerance`: orthonormal
/// columns and determinant +1.
pub fn is_rotation(m: &Matrix3<f64>, tolerance: f64) -> bool {
    orthonormality_error(m) <= tolerance && (m.determinant() - 1.0).abs() <= tolerance
}

/// Build a matrix from row-major nested arrays, the layout used in config
/// files and on the command line.
pub fn matrix_from_rows(rows: [[f64; 3]; 3]) -> Matrix3<f64> {
    Matrix3::new(
        rows[0][0], rows[0][1], rows[0][2], //
        rows[1][0], rows[1][1], rows[1][2], //
        rows[2][0], rows[2][1], rows[2][2],
    )
}
