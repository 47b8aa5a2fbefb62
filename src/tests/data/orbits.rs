use crate::prelude::Vector3;

use std::f64::consts::TAU;

/// Circular orbit and linear clock, used to synthesize products
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticOrbit {
    pub radius_m: f64,
    pub rate_rad_s: f64,
    pub phase_rad: f64,
    pub inclination_rad: f64,
    pub clock_offset_us: f64,
    pub clock_drift_us_s: f64,
}

impl SyntheticOrbit {
    /// GPS like orbit (two revolutions per sidereal day)
    pub fn gps(slot: usize) -> Self {
        Self {
            radius_m: 26_560.0E3,
            rate_rad_s: TAU / 43_082.0,
            phase_rad: 0.4 * slot as f64,
            inclination_rad: 55.0_f64.to_radians(),
            clock_offset_us: 10.0 * slot as f64,
            clock_drift_us_s: 1.0E-6,
        }
    }

    /// Same orbit, shifted radially and in clock
    pub fn shifted(&self, radius_m: f64, clock_us: f64) -> Self {
        let mut s = *self;
        s.radius_m += radius_m;
        s.clock_offset_us += clock_us;
        s
    }

    /// ECEF position, `dt_s` seconds after the reference epoch
    pub fn position_m(&self, dt_s: f64) -> Vector3<f64> {
        let angle = self.rate_rad_s * dt_s + self.phase_rad;
        Vector3::new(
            self.radius_m * angle.cos(),
            self.radius_m * angle.sin() * self.inclination_rad.cos(),
            self.radius_m * angle.sin() * self.inclination_rad.sin(),
        )
    }

    /// Clock bias (µs), `dt_s` seconds after the reference epoch
    pub fn clock_us(&self, dt_s: f64) -> f64 {
        self.clock_offset_us + self.clock_drift_us_s * dt_s
    }
}
