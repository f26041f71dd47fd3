use std::f64::consts::PI;

use serde::Serialize;
use strum_macros::Display;

use crate::error::{PipelineError, PipelineResult};
use crate::geometry::DirectionVector;

/// Which branch produced an [`ActuatorAngle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Projection {
    Regular,
    /// `x == 0`: the single-argument arctangent would divide by zero.
    Singular,
    /// The Sun lies on the field-of-view axis and has no direction in the
    /// projection plane.
    Degenerate,
}

/// Filter rotation command in degrees, `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActuatorAngle {
    degrees: f64,
    projection: Projection,
}

impl ActuatorAngle {
    pub fn degrees(&self) -> f64 {
        self.degrees
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }
}

/// Project the SFS direction onto the x/z plane (the field-of-view axis is
/// y) and turn its polar angle into a filter command.
pub fn sfs_to_actuator_angle(sfs: &DirectionVector) -> ActuatorAngle {
    let (x, z) = (sfs[0], sfs[2]);

    if !(x.is_finite() && z.is_finite()) || (x == 0.0 && z == 0.0) {
        log::warn!("Sun on the field-of-view axis ({x}, {z}); filter angle is undefined");
        return ActuatorAngle {
            degrees: 180.0,
            projection: Projection::Degenerate,
        };
    }

    let projection = if x == 0.0 {
        Projection::Singular
    } else {
        Projection::Regular
    };
    let theta = z.atan2(x);
    let degrees = (PI - theta).to_degrees().rem_euclid(360.0);

    ActuatorAngle {
        degrees,
        projection,
    }
}

/// Single-argument arctangent form with a half-turn quadrant fix. Output is
/// in `(0, 180]` and agrees with [`sfs_to_actuator_angle`] modulo 180°.
pub fn legacy_actuator_angle(sfs: &DirectionVector) -> PipelineResult<f64> {
    if sfs[0] == 0.0 {
        return Err(PipelineError::SingularProjection);
    }
    let theta1 = (sfs[2] / sfs[0]).atan();
    let theta2 = if theta1 < 0.0 { theta1 + PI } else { theta1 };
    Ok((180.0 / PI) * (PI - theta2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::Vector3;

    fn angle(x: f64, y: f64, z: f64) -> ActuatorAngle {
        sfs_to_actuator_angle(&Vector3::new(x, y, z))
    }

    #[test]
    fn test_cardinal_directions() {
        assert_abs_diff_eq!(angle(1.0, 0.0, 0.0).degrees(), 180.0, epsilon = 1e-12);
        assert_abs_diff_eq!(angle(0.0, 0.0, 1.0).degrees(), 90.0, epsilon = 1e-12);
        assert_abs_diff_eq!(angle(-1.0, 0.0, 0.0).degrees(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(angle(0.0, 0.0, -1.0).degrees(), 270.0, epsilon = 1e-12);
    }

    #[test]
    fn test_negative_zero_stays_in_range() {
        // atan2(-0, -1) = -π would map to exactly 360.
        let a = angle(-1.0, 0.0, -0.0);
        assert_eq!(a.degrees(), 0.0);
    }

    #[test]
    fn test_singular_branch() {
        let up = angle(0.0, 0.6, 0.8);
        assert_eq!(up.projection(), Projection::Singular);
        assert_abs_diff_eq!(up.degrees(), 90.0, epsilon = 1e-12);
        let down = angle(-0.0, 0.6, -0.8);
        assert_eq!(down.projection(), Projection::Singular);
        assert_abs_diff_eq!(down.degrees(), 270.0, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_branch_has_no_nan() {
        for v in [
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(-0.0, -1.0, -0.0),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(f64::NAN, 0.0, 1.0),
        ] {
            let a = sfs_to_actuator_angle(&v);
            assert_eq!(a.projection(), Projection::Degenerate);
            assert_eq!(a.degrees(), 180.0);
        }
    }

    #[test]
    fn test_range_over_full_circle() {
        for step in 0..720 {
            let phi = (step as f64 * 0.5).to_radians();
            let a = angle(phi.cos(), 0.3, phi.sin());
            assert!((0.0..360.0).contains(&a.degrees()), "{}", a.degrees());
            assert_eq!(a.projection(), Projection::Regular);
        }
    }

    #[test]
    fn test_scale_invariance() {
        let a = angle(0.3, 0.1, -0.4);
        let b = angle(3.0, -7.0, -4.0);
        assert_abs_diff_eq!(a.degrees(), b.degrees(), epsilon = 1e-12);
    }

    #[test]
    fn test_legacy_formula_agrees_modulo_half_turn() {
        for step in 0..360 {
            let phi = (step as f64 + 0.25).to_radians();
            let v = Vector3::new(phi.cos(), -0.2, phi.sin());
            let modern = sfs_to_actuator_angle(&v).degrees();
            let legacy = legacy_actuator_angle(&v).unwrap();
            assert!(legacy > 0.0 && legacy <= 180.0);
            let diff = (modern - legacy).rem_euclid(180.0);
            assert!(diff < 1e-9 || 180.0 - diff < 1e-9, "phi {step}: {modern} vs {legacy}");
        }
    }

    #[test]
    fn test_legacy_formula_reference_values() {
        assert_abs_diff_eq!(
            legacy_actuator_angle(&Vector3::new(1.0, 0.0, 0.0)).unwrap(),
            180.0,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            legacy_actuator_angle(&Vector3::new(1.0, 0.0, 1.0)).unwrap(),
            135.0,
            epsilon = 1e-12
        );
        assert_eq!(
            legacy_actuator_angle(&Vector3::new(0.0, 0.0, 1.0)),
            Err(PipelineError::SingularProjection)
        );
    }
}
