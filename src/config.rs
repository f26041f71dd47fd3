use serde::Deserialize;
use thiserror::Error;

use crate::actuator::ServoMap;
use crate::error::PipelineError;
use crate::frames::{
    AttitudeMatrix, CalibrationMatrix, GeographicAngle, Site, DEFAULT_BORESIGHT_AZIMUTH,
    DEFAULT_BORESIGHT_INCLINATION,
};
use crate::geometry::DEFAULT_ORTHONORMAL_TOLERANCE;
use crate::pipeline::{FilterPipeline, PipelineOptions};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(#[from] PipelineError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default, with = "serde_yaml::with::singleton_map")]
    pub calibration: CalibrationConfig,
    #[serde(default)]
    pub ephemeris: PipelineOptions,
    #[serde(default = "default_tolerance")]
    pub attitude_tolerance: f64,
    /// Fixed mount orientation (row-major) used when no IMU snapshot is
    /// supplied.
    #[serde(default)]
    pub attitude: Option<[[f64; 3]; 3]>,
    #[serde(default)]
    pub servo: Option<ServoMap>,
}

fn default_tolerance() -> f64 {
    DEFAULT_ORTHONORMAL_TOLERANCE
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub name: Option<String>,
    pub latitude: GeographicAngle,
    pub longitude: GeographicAngle,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationConfig {
    Boresight {
        azimuth_rad: f64,
        inclination_rad: f64,
    },
    Matrix {
        rows: [[f64; 3]; 3],
    },
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        CalibrationConfig::Boresight {
            azimuth_rad: DEFAULT_BORESIGHT_AZIMUTH,
            inclination_rad: DEFAULT_BORESIGHT_INCLINATION,
        }
    }
}

impl CalibrationConfig {
    pub fn build(&self, tolerance: f64) -> Result<CalibrationMatrix, PipelineError> {
        match self {
            CalibrationConfig::Boresight {
                azimuth_rad,
                inclination_rad,
            } => Ok(CalibrationMatrix::from_boresight(*azimuth_rad, *inclination_rad)),
            CalibrationConfig::Matrix { rows } => CalibrationMatrix::from_rows(*rows, tolerance),
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn site(&self) -> Result<Site, ConfigError> {
        Ok(Site::new(self.site.latitude, self.site.longitude)?)
    }

    pub fn pipeline(&self) -> Result<FilterPipeline, ConfigError> {
        let site = self.site()?;
        let calibration = self.calibration.build(self.attitude_tolerance)?;
        let pipeline = FilterPipeline::new(site, calibration, self.ephemeris);
        Ok(match self.servo {
            Some(servo) => pipeline.with_servo(servo),
            None => pipeline,
        })
    }

    /// The configured fixed attitude, or identity when none is set.
    pub fn static_attitude(&self) -> Result<AttitudeMatrix, ConfigError> {
        match self.attitude {
            Some(rows) => Ok(AttitudeMatrix::from_rows(rows, self.attitude_tolerance)?),
            None => Ok(AttitudeMatrix::identity()),
        }
    }

    /// Build every derived object once so problems surface before use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pipeline()?;
        self.static_attitude()?;
        Ok(())
    }
}
