use std::f64::consts::PI;

use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::ephemeris::{Gmt, Timestamp};
use crate::error::{PipelineError, PipelineResult};
use crate::geometry::{wrap_two_pi, DirectionVector};

/// An angle given as whole degrees plus arc-minutes. The two parts are
/// summed as given, so a southern or western coordinate carries the sign on
/// both fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeographicAngle {
    pub degrees: f64,
    #[serde(default)]
    pub minutes: f64,
}

impl GeographicAngle {
    pub fn new(degrees: f64, minutes: f64) -> Self {
        Self { degrees, minutes }
    }

    pub fn from_decimal_degrees(degrees: f64) -> Self {
        Self {
            degrees,
            minutes: 0.0,
        }
    }

    pub fn to_radians(&self) -> f64 {
        self.degrees * (PI / 180.0) + self.minutes * (PI / 10_800.0)
    }

    pub fn decimal_degrees(&self) -> f64 {
        self.degrees + self.minutes / 60.0
    }

    fn check(&self, field: &'static str, limit: f64) -> PipelineResult<()> {
        if !self.degrees.is_finite() || !self.minutes.is_finite() {
            return Err(PipelineError::input_range(field, f64::NAN, "not a finite angle"));
        }
        if self.minutes.abs() >= 60.0 {
            return Err(PipelineError::input_range(
                field,
                self.minutes,
                "arc-minutes must be below 60",
            ));
        }
        let value = self.decimal_degrees();
        if value.abs() > limit {
            return Err(PipelineError::input_range(field, value, "beyond geographic limit"));
        }
        Ok(())
    }
}

/// Observation site. At the poles the transform stays well-defined but the
/// east and north axes no longer point anywhere meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Site {
    latitude: GeographicAngle,
    longitude: GeographicAngle,
}

impl Site {
    pub fn new(latitude: GeographicAngle, longitude: GeographicAngle) -> PipelineResult<Self> {
        latitude.check("latitude", 90.0)?;
        longitude.check("longitude", 180.0)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> GeographicAngle {
        self.latitude
    }

    pub fn longitude(&self) -> GeographicAngle {
        self.longitude
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude.to_radians()
    }
}

/// Source of the Greenwich rotation angle used to orient the site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EarthRotation {
    /// GMT clock time read as an angle, 24 h = 2π.
    #[default]
    GreenwichClock,
    /// IAU Greenwich mean sidereal time.
    Sidereal,
}

impl EarthRotation {
    pub fn greenwich_angle(&self, timestamp: &Timestamp) -> f64 {
        match self {
            EarthRotation::GreenwichClock => greenwich_clock_angle(&timestamp.gmt()),
            EarthRotation::Sidereal => wrap_two_pi(sgp4::iau_epoch_to_sidereal_time(
                sgp4::julian_years_since_j2000(&timestamp.naive_utc()),
            )),
        }
    }
}

pub fn greenwich_clock_angle(gmt: &Gmt) -> f64 {
    gmt.hour() as f64 * (PI / 12.0)
        + gmt.minute() as f64 * (PI / 720.0)
        + gmt.second() as f64 * (PI / 43_200.0)
}

/// ECI → ENU rotation for a local angle (Greenwich angle plus longitude,
/// not wrapped) and a geodetic latitude, both radians.
pub fn site_rotation(local_angle: f64, lat_rad: f64) -> Matrix3<f64> {
    let (sin_lrt, cos_lrt) = local_angle.sin_cos();
    let (sin_lat, cos_lat) = lat_rad.sin_cos();
    Matrix3::new(
        -sin_lrt, cos_lrt, 0.0, //
        -sin_lat * cos_lrt, -sin_lat * sin_lrt, cos_lat, //
        cos_lat * cos_lrt, cos_lat * sin_lrt, sin_lat,
    )
}

pub fn eci_to_enu(
    eci: &DirectionVector,
    latitude: GeographicAngle,
    longitude: GeographicAngle,
    timestamp: &Timestamp,
) -> DirectionVector {
    let local_angle = greenwich_clock_angle(&timestamp.gmt()) + longitude.to_radians();
    site_rotation(local_angle, latitude.to_radians()) * eci
}

pub fn eci_to_enu_with(
    eci: &DirectionVector,
    site: &Site,
    timestamp: &Timestamp,
    rotation: EarthRotation,
) -> DirectionVector {
    let local_angle = rotation.greenwich_angle(timestamp) + site.lon_rad();
    site_rotation(local_angle, site.lat_rad()) * eci
}
