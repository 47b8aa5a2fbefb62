use crate::{error::Error, prelude::Epoch};

use hifitime::{TimeScale, Unit};
use nalgebra::{Rotation3, Vector3};

use std::f64::consts::TAU;

/// Julian date of J2000
const J2000_JD: f64 = 2451545.0;

/// Days per Julian century
const JULIAN_CENTURY_DAYS: f64 = 36525.0;

/// Builds an [Epoch] from calendar fields, seconds possibly being fractional.
pub fn epoch_from_calendar(
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    seconds: f64,
    timescale: TimeScale,
) -> Result<Epoch, Error> {
    let t = Epoch::maybe_from_gregorian(year, month, day, hour, minute, 0, 0, timescale)?;
    if !(0.0..61.0).contains(&seconds) {
        return Err(Error::MalformedEpoch(format!(
            "{}-{:02}-{:02}T{:02}:{:02}:{}",
            year, month, day, hour, minute, seconds
        )));
    }
    Ok(t + seconds * Unit::Second)
}

/// Calendar date and time of day, as handed over by the simulation clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calendar {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    /// Seconds, possibly fractional
    pub seconds: f64,
}

impl Calendar {
    /// Converts to an [Epoch] expressed in given [TimeScale]
    pub fn to_epoch(&self, timescale: TimeScale) -> Result<Epoch, Error> {
        epoch_from_calendar(
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.seconds,
            timescale,
        )
    }
}

/// Greenwich mean sidereal angle (IAU-82 model), in radians within [0, 2π).
/// UT1 is approximated by UTC.
pub fn greenwich_sidereal_angle_rad(t: Epoch) -> f64 {
    let tut1 = (t.to_jde_utc_days() - J2000_JD) / JULIAN_CENTURY_DAYS;

    // seconds of sidereal time
    let gmst_s = -6.2E-6 * tut1.powi(3)
        + 0.093104 * tut1.powi(2)
        + (876600.0 * 3600.0 + 8640184.812866) * tut1
        + 67310.54841;

    (gmst_s / 240.0).to_radians().rem_euclid(TAU)
}

/// Earth fixed to inertial rotation at given [Epoch]
pub fn ecef_to_eci(t: Epoch) -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), greenwich_sidereal_angle_rad(t))
}
