use anise::constants::SPEED_OF_LIGHT_KM_S;

use std::f64::consts::TAU;

/// Speed of light in m.s⁻¹
pub const SPEED_OF_LIGHT_M_S: f64 = SPEED_OF_LIGHT_KM_S * 1000.0;

/// Earth equatorial radius (kilometers)
pub const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6378.1366;

/// "No data" marker used by precise products, for both
/// coordinates and clock fields.
pub const NO_DATA_SENTINEL: f64 = 999999.999999;

/// Any value closer than this to [NO_DATA_SENTINEL] is a missing sample.
pub const NO_DATA_TOLERANCE: f64 = 1.0;

/// Numerical tolerance on epochs, in seconds.
pub const EPOCH_TOLERANCE_S: f64 = 1.0E-4;

/// Angular rate of the trigonometric interpolation basis, in rad.s⁻¹.
///
/// One revolution per day, scaled by 1.03 to fit the GNSS orbital periods.
/// This is an empirical tuning constant, keep it as is.
pub const TRIGONOMETRIC_ANGULAR_RATE_RAD_S: f64 = TAU / 86400.0 * 1.03;
