mod orbits;
pub use orbits::SyntheticOrbit;

mod products;
pub use products::{clk_page, ProductBuilder};

mod engine;
pub use engine::*;

use crate::constants::EARTH_EQUATORIAL_RADIUS_KM;
use crate::prelude::{Epoch, TimeScale};
use crate::time::Calendar;

/// Earth equatorial radius (meters)
pub const EARTH_EQUATORIAL_RADIUS_M: f64 = EARTH_EQUATORIAL_RADIUS_KM * 1.0E3;

/// Reference epoch of all synthetic products
pub fn reference_epoch() -> Epoch {
    Epoch::from_gregorian_utc_at_midnight(2020, 1, 1)
}

/// Reference epoch, as a [Calendar] shifted by `hours`
pub fn reference_calendar(hours: u8) -> Calendar {
    Calendar {
        year: 2020,
        month: 1,
        day: 1,
        hour: hours,
        minute: 0,
        seconds: 0.0,
    }
}

pub const REFERENCE_TIMESCALE: TimeScale = TimeScale::UTC;
