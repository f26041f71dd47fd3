mod angle;
mod servo;

pub use angle::{legacy_actuator_angle, sfs_to_actuator_angle, ActuatorAngle, Projection};
pub use servo::{LinearSegment, ServoMap};
