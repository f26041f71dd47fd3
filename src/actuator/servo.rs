use serde::{Deserialize, Serialize};

use super::angle::ActuatorAngle;

/// `code = gain * phi + offset`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearSegment {
    pub gain: f64,
    pub offset: f64,
}

impl LinearSegment {
    fn apply(&self, phi: f64) -> f64 {
        self.gain * phi + self.offset
    }
}

/// Maps a filter angle onto the position code understood by the servo.
///
/// A linear polarizer looks the same after half a turn, so the angle is
/// reduced modulo 180° (after removing `zero_offset_deg`) before the
/// piecewise-linear response is applied.
///
/// `zero_offset_deg` is the filter angle, measured the way
/// [`sfs_to_actuator_angle`](super::sfs_to_actuator_angle) measures it, at
/// which the servo sits at its zero position. A zero position read off a
/// different projection axis (for example the bench mount's 167.5° taken
/// from `atan2` of the first two sensor components and applied as
/// `167.5 - phi`) is not a drop-in value and has to be re-measured in this
/// convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServoMap {
    pub zero_offset_deg: f64,
    pub breakpoint_deg: f64,
    pub low: LinearSegment,
    pub high: LinearSegment,
}

impl Default for ServoMap {
    fn default() -> Self {
        Self {
            zero_offset_deg: 0.0,
            breakpoint_deg: 92.5,
            low: LinearSegment {
                gain: 1.0,
                offset: -2.5,
            },
            high: LinearSegment {
                gain: 1.0588,
                offset: -7.939,
            },
        }
    }
}

impl ServoMap {
    pub fn half_turn_angle(&self, angle: &ActuatorAngle) -> f64 {
        (angle.degrees() - self.zero_offset_deg).rem_euclid(180.0)
    }

    pub fn code(&self, angle: &ActuatorAngle) -> f64 {
        let phi = self.half_turn_angle(angle);
        if phi < self.breakpoint_deg {
            self.low.apply(phi)
        } else {
            self.high.apply(phi)
        }
    }
}
