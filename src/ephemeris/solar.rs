use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use super::time::Timestamp;
use crate::error::PipelineResult;
use crate::geometry::{normalize, wrap_two_pi, DirectionVector};

pub const J2000_JULIAN_DATE: f64 = 2_451_545.0;
pub const DAYS_PER_JULIAN_YEAR: f64 = 365.25;
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

/// Distance from J2000.0 beyond which the series is reported as imprecise.
pub const EPHEMERIS_VALID_YEARS: f64 = 50.0;

// Low-precision solar series, radians.
const MEAN_LONGITUDE_J2000: f64 = 4.894961213;
const MEAN_LONGITUDE_RATE: f64 = 628.3319706889;
const MEAN_ANOMALY_J2000: f64 = 6.240035939;
const MEAN_ANOMALY_RATE: f64 = 628.301956;
const CENTER_TERM_1: f64 = 0.033417234;
const CENTER_TERM_2: f64 = 0.00034897235;
const OBLIQUITY_J2000: f64 = 0.4090928;
const OBLIQUITY_RATE: f64 = 0.000226966;

/// How the Julian date is turned into the series time argument `J`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EpochScale {
    /// Whole Julian years since J2000.0, truncated toward zero.
    #[default]
    TruncatedYears,
    /// Fractional Julian years since J2000.0, the argument the flight
    /// polarizer tool fed to the series.
    JulianYears,
    /// Fractional Julian centuries since J2000.0.
    JulianCenturies,
}

impl EpochScale {
    pub fn epoch_argument(&self, julian_date: f64) -> f64 {
        let days = julian_date - J2000_JULIAN_DATE;
        match self {
            EpochScale::TruncatedYears => (days / DAYS_PER_JULIAN_YEAR).trunc(),
            EpochScale::JulianYears => days / DAYS_PER_JULIAN_YEAR,
            EpochScale::JulianCenturies => days / DAYS_PER_JULIAN_CENTURY,
        }
    }
}

/// Intermediate quantities of the solar series. Angles in radians, already
/// wrapped to `[0, 2π)` where the series calls for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolarCoordinates {
    pub julian_date: f64,
    pub epoch_argument: f64,
    pub mean_longitude: f64,
    pub mean_anomaly: f64,
    pub ecliptic_longitude: f64,
    pub obliquity: f64,
}

impl SolarCoordinates {
    pub fn from_julian_date(julian_date: f64, scale: EpochScale) -> Self {
        let j = scale.epoch_argument(julian_date);

        let mean_longitude = wrap_two_pi(MEAN_LONGITUDE_J2000 + MEAN_LONGITUDE_RATE * j);
        let mean_anomaly = wrap_two_pi(MEAN_ANOMALY_J2000 + MEAN_ANOMALY_RATE * j);

        let ecliptic_longitude = wrap_two_pi(
            mean_longitude
                + CENTER_TERM_1 * mean_anomaly.sin()
                + CENTER_TERM_2 * (2.0 * mean_anomaly).sin(),
        );
        let obliquity = OBLIQUITY_J2000 - OBLIQUITY_RATE * j;

        Self {
            julian_date,
            epoch_argument: j,
            mean_longitude,
            mean_anomaly,
            ecliptic_longitude,
            obliquity,
        }
    }

    /// Equatorial rectangular direction of the Sun.
    pub fn eci(&self) -> PipelineResult<DirectionVector> {
        let lambda = self.ecliptic_longitude;
        let x = lambda.cos();
        let y = self.obliquity.cos() * lambda.sin();
        let z = self.obliquity.sin() * lambda.sin();
        normalize(DirectionVector::new(x, y, z))
    }

    pub fn declination(&self) -> f64 {
        (self.obliquity.sin() * self.ecliptic_longitude.sin()).asin()
    }
}

/// Solar direction in ECI using the default epoch scale.
pub fn compute_solar_eci(timestamp: &Timestamp) -> PipelineResult<DirectionVector> {
    compute_solar_eci_with(timestamp, EpochScale::default())
}

pub fn compute_solar_eci_with(
    timestamp: &Timestamp,
    scale: EpochScale,
) -> PipelineResult<DirectionVector> {
    SolarCoordinates::from_julian_date(timestamp.julian_date(), scale).eci()
}

/// The series was fitted around J2000.0 and drifts away from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EphemerisRangeWarning {
    pub julian_date: f64,
    pub years_from_j2000: f64,
}

impl fmt::Display for EphemerisRangeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "JD {:.1} is {:.1} years from J2000.0; solar position accuracy degrades beyond {} years",
            self.julian_date,
            self.years_from_j2000.abs(),
            EPHEMERIS_VALID_YEARS
        )
    }
}

pub fn range_caveat(julian_date: f64) -> Option<EphemerisRangeWarning> {
    let years_from_j2000 = (julian_date - J2000_JULIAN_DATE) / DAYS_PER_JULIAN_YEAR;
    if years_from_j2000.abs() > EPHEMERIS_VALID_YEARS {
        Some(EphemerisRangeWarning {
            julian_date,
            years_from_j2000,
        })
    } else {
        None
    }
}
