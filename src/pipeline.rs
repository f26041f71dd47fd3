//! Time + attitude → filter angle.
//!
//! Each call is a pure function of its arguments and the configuration the
//! [`FilterPipeline`] was built with; nothing carries over between calls.

use serde::{Deserialize, Serialize};

use crate::actuator::{sfs_to_actuator_angle, ActuatorAngle, ServoMap};
use crate::ephemeris::{
    range_caveat, EphemerisRangeWarning, EpochScale, SolarCoordinates, Timestamp,
};
use crate::error::PipelineResult;
use crate::frames::{
    body_to_sfs, eci_to_enu_with, enu_to_body, AttitudeMatrix, CalibrationMatrix,
    EarthRotation, GeographicAngle, Site,
};
use crate::geometry::DirectionVector;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    pub epoch_scale: EpochScale,
    pub earth_rotation: EarthRotation,
}

/// The Sun direction as seen in each frame along the chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StageVectors {
    pub eci: DirectionVector,
    pub enu: DirectionVector,
    pub body: DirectionVector,
    pub sfs: DirectionVector,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterCommand {
    pub timestamp: Timestamp,
    pub julian_date: f64,
    pub angle: ActuatorAngle,
    pub servo_code: Option<f64>,
    pub warnings: Vec<EphemerisRangeWarning>,
    pub stages: StageVectors,
}

#[derive(Debug, Clone)]
pub struct FilterPipeline {
    site: Site,
    calibration: CalibrationMatrix,
    options: PipelineOptions,
    servo: Option<ServoMap>,
}

impl FilterPipeline {
    pub fn new(site: Site, calibration: CalibrationMatrix, options: PipelineOptions) -> Self {
        Self {
            site,
            calibration,
            options,
            servo: None,
        }
    }

    pub fn with_servo(mut self, servo: ServoMap) -> Self {
        self.servo = Some(servo);
        self
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    pub fn options(&self) -> PipelineOptions {
        self.options
    }

    /// Run all four stages for one timestamp and one attitude snapshot.
    pub fn compute(
        &self,
        timestamp: &Timestamp,
        attitude: &AttitudeMatrix,
    ) -> PipelineResult<FilterCommand> {
        let julian_date = timestamp.julian_date();

        let warnings: Vec<EphemerisRangeWarning> = range_caveat(julian_date).into_iter().collect();
        for warning in &warnings {
            log::warn!("{}", warning);
        }

        let solar = SolarCoordinates::from_julian_date(julian_date, self.options.epoch_scale);
        let eci = solar.eci()?;
        let enu = eci_to_enu_with(&eci, &self.site, timestamp, self.options.earth_rotation);
        let body = enu_to_body(&enu, attitude);
        let sfs = body_to_sfs(&body, &self.calibration);

        let angle = sfs_to_actuator_angle(&sfs);
        let servo_code = self.servo.as_ref().map(|servo| servo.code(&angle));

        log::debug!(
            "JD {:.5} ({}, {}): eci={:?} enu={:?} sfs={:?} -> {:.3} deg ({})",
            julian_date,
            self.options.epoch_scale,
            self.options.earth_rotation,
            eci.as_slice(),
            enu.as_slice(),
            sfs.as_slice(),
            angle.degrees(),
            angle.projection()
        );

        Ok(FilterCommand {
            timestamp: *timestamp,
            julian_date,
            angle,
            servo_code,
            warnings,
            stages: StageVectors { eci, enu, body, sfs },
        })
    }
}

/// One-shot entry point with the reference calibration and default options.
pub fn compute_filter_angle(
    timestamp: &Timestamp,
    latitude: GeographicAngle,
    longitude: GeographicAngle,
    attitude: &AttitudeMatrix,
) -> PipelineResult<FilterCommand> {
    let site = Site::new(latitude, longitude)?;
    FilterPipeline::new(site, CalibrationMatrix::default(), PipelineOptions::default())
        .compute(timestamp, attitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuator::Projection;
    use crate::ephemeris::{compute_solar_eci, Gmt};
    use crate::frames::{eci_to_enu, enu_to_sfs};
    use approx::assert_relative_eq;
    use nalgebra::Rotation3;

    fn reference_inputs() -> (Timestamp, GeographicAngle, GeographicAngle) {
        let ts = Timestamp::from_calendar(2014, 6, 18, Gmt::new(10, 10, 10).unwrap()).unwrap();
        (ts, GeographicAngle::new(50.0, 30.5), GeographicAngle::new(30.0, 22.5))
    }

    #[test]
    fn test_matches_stage_by_stage_composition() {
        let (ts, lat, lon) = reference_inputs();
        let tilt = Rotation3::from_euler_angles(0.05, -0.1, 1.2);
        let attitude = AttitudeMatrix::new(*tilt.matrix(), 1e-9).unwrap();

        let eci = compute_solar_eci(&ts).unwrap();
        let enu = eci_to_enu(&eci, lat, lon, &ts);
        let sfs = enu_to_sfs(&enu, &attitude, &CalibrationMatrix::default());
        let expected = sfs_to_actuator_angle(&sfs);

        let command = compute_filter_angle(&ts, lat, lon, &attitude).unwrap();
        assert_relative_eq!(command.stages.sfs, sfs, epsilon = 1e-15);
        assert_eq!(command.angle, expected);
        assert_eq!(command.angle.projection(), Projection::Regular);
    }

    #[test]
    fn test_repeatable() {
        let (ts, lat, lon) = reference_inputs();
        let attitude = AttitudeMatrix::identity();
        let first = compute_filter_angle(&ts, lat, lon, &attitude).unwrap();
        let second = compute_filter_angle(&ts, lat, lon, &attitude).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.angle.degrees().to_bits(), second.angle.degrees().to_bits());
    }

    #[test]
    fn test_stage_vectors_stay_unit_length() {
        let (ts, lat, lon) = reference_inputs();
        let command = compute_filter_angle(&ts, lat, lon, &AttitudeMatrix::identity()).unwrap();
        for v in [
            command.stages.eci,
            command.stages.enu,
            command.stages.body,
            command.stages.sfs,
        ] {
            assert_relative_eq!(v.norm(), 1.0, epsilon = 1e-9);
        }
        assert!(command.warnings.is_empty());
        assert!(command.servo_code.is_none());
    }

    #[test]
    fn test_invalid_site_is_rejected() {
        let (ts, _, lon) = reference_inputs();
        let lat = GeographicAngle::new(95.0, 0.0);
        let result = compute_filter_angle(&ts, lat, lon, &AttitudeMatrix::identity());
        assert!(result.is_err());
    }

    #[test]
    fn test_far_dates_carry_a_warning() {
        let (_, lat, lon) = reference_inputs();
        let ts = Timestamp::from_calendar(1890, 3, 1, Gmt::new(0, 0, 0).unwrap()).unwrap();
        let command = compute_filter_angle(&ts, lat, lon, &AttitudeMatrix::identity()).unwrap();
        assert_eq!(command.warnings.len(), 1);
        assert!(command.warnings[0].years_from_j2000 < -100.0);
    }

    #[test]
    fn test_servo_code_attached() {
        let (ts, lat, lon) = reference_inputs();
        let servo = ServoMap::default();
        let pipeline = FilterPipeline::new(
            Site::new(lat, lon).unwrap(),
            CalibrationMatrix::default(),
            PipelineOptions::default(),
        )
        .with_servo(servo);
        let command = pipeline.compute(&ts, &AttitudeMatrix::identity()).unwrap();
        assert_eq!(command.servo_code, Some(servo.code(&command.angle)));
    }
}
