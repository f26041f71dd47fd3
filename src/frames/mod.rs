mod body;
mod site;

pub use body::{
    body_to_sfs, enu_to_body, enu_to_sfs, AttitudeMatrix, CalibrationMatrix,
    DEFAULT_BORESIGHT_AZIMUTH, DEFAULT_BORESIGHT_INCLINATION,
};
pub use site::{
    eci_to_enu, eci_to_enu_with, greenwich_clock_angle, site_rotation, EarthRotation,
    GeographicAngle, Site,
};
