mod solar;
mod time;

pub use solar::{
    compute_solar_eci, compute_solar_eci_with, range_caveat, EphemerisRangeWarning, EpochScale,
    SolarCoordinates, EPHEMERIS_VALID_YEARS, J2000_JULIAN_DATE,
};
pub use time::{julian_day_number, Gmt, Timestamp, MAX_YEAR, MIN_YEAR};
