//! Sun-tracking polarizer: turns a UTC timestamp, a site and an IMU attitude
//! into the rotation angle of a polarizing filter.

pub mod actuator;
pub mod config;
pub mod ephemeris;
pub mod error;
pub mod frames;
pub mod geometry;
pub mod pipeline;

pub use actuator::{ActuatorAngle, Projection, ServoMap};
pub use config::{Config, ConfigError};
pub use ephemeris::{Gmt, Timestamp};
pub use error::{PipelineError, PipelineResult};
pub use frames::{AttitudeMatrix, CalibrationMatrix, GeographicAngle, Site};
pub use pipeline::{compute_filter_angle, FilterCommand, FilterPipeline, PipelineOptions};
