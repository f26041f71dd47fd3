use nalgebra::Matrix3;
use serde::Serialize;

use crate::error::{PipelineError, PipelineResult};
use crate::geometry::{matrix_from_rows, orthonormality_error, DirectionVector};

/// Boresight azimuth of the reference optical assembly, radians.
pub const DEFAULT_BORESIGHT_AZIMUTH: f64 = 0.0866;
/// Boresight inclination of the reference optical assembly, radians.
pub const DEFAULT_BORESIGHT_INCLINATION: f64 = 0.3437;

fn check_rotation(field: &'static str, m: &Matrix3<f64>, tolerance: f64) -> PipelineResult<()> {
    if m.iter().any(|v| !v.is_finite()) {
        return Err(PipelineError::input_range(field, f64::NAN, "non-finite element"));
    }
    let error = orthonormality_error(m);
    if error > tolerance {
        return Err(PipelineError::input_range(field, error, "matrix is not orthonormal"));
    }
    let det = m.determinant();
    if (det - 1.0).abs() > tolerance {
        return Err(PipelineError::input_range(field, det, "determinant is not +1"));
    }
    Ok(())
}

/// ENU → Body rotation reported by the IMU. One snapshot per pipeline call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttitudeMatrix(Matrix3<f64>);

impl AttitudeMatrix {
    /// Rejects matrices whose `MᵀM` departs from identity, or whose
    /// determinant departs from one, by more than `tolerance`.
    pub fn new(matrix: Matrix3<f64>, tolerance: f64) -> PipelineResult<Self> {
        check_rotation("attitude", &matrix, tolerance)?;
        Ok(Self(matrix))
    }

    pub fn from_rows(rows: [[f64; 3]; 3], tolerance: f64) -> PipelineResult<Self> {
        Self::new(matrix_from_rows(rows), tolerance)
    }

    /// Mount body aligned with East-North-Up.
    pub fn identity() -> Self {
        Self(Matrix3::identity())
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.0
    }
}

/// Body → SFS rotation, fixed by the optical and mechanical assembly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibrationMatrix(Matrix3<f64>);

impl CalibrationMatrix {
    pub fn from_matrix(matrix: Matrix3<f64>, tolerance: f64) -> PipelineResult<Self> {
        check_rotation("calibration", &matrix, tolerance)?;
        Ok(Self(matrix))
    }

    pub fn from_rows(rows: [[f64; 3]; 3], tolerance: f64) -> PipelineResult<Self> {
        Self::from_matrix(matrix_from_rows(rows), tolerance)
    }

    /// Build from the boresight azimuth and inclination (radians) of the
    /// sensor's field of view in the body frame.
    pub fn from_boresight(azimuth: f64, inclination: f64) -> Self {
        let (sin_az, cos_az) = azimuth.sin_cos();
        let (sin_inc, cos_inc) = inclination.sin_cos();
        Self(Matrix3::new(
            cos_inc * cos_az, cos_inc * sin_az, sin_inc, //
            -sin_az, cos_az, 0.0, //
            -sin_inc * cos_az, -sin_inc * sin_az, cos_inc,
        ))
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.0
    }
}

impl Default for CalibrationMatrix {
    fn default() -> Self {
        Self::from_boresight(DEFAULT_BORESIGHT_AZIMUTH, DEFAULT_BORESIGHT_INCLINATION)
    }
}

pub fn enu_to_body(enu: &DirectionVector, attitude: &AttitudeMatrix) -> DirectionVector {
    attitude.0 * enu
}

pub fn body_to_sfs(body: &DirectionVector, calibration: &CalibrationMatrix) -> DirectionVector {
    calibration.0 * body
}

pub fn enu_to_sfs(
    enu: &DirectionVector,
    attitude: &AttitudeMatrix,
    calibration: &CalibrationMatrix,
) -> DirectionVector {
    body_to_sfs(&enu_to_body(enu, attitude), calibration)
}
