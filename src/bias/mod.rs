//! Propagation biases
use crate::prelude::Vector3;

pub(crate) mod iono;
pub use iono::SingleLayerIonosphere;

/// Geometry of one signal path, at the simulated instant.
/// Both positions are expressed in the same frame (ECEF or ECI),
/// picked by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiasRuntime {
    /// Receiver position, in the caller's frame (m)
    pub rx_position_m: Vector3<f64>,
    /// Satellite position, in the caller's frame (m)
    pub sv_position_m: Vector3<f64>,
    /// Carrier frequency (MHz)
    pub frequency_mhz: f64,
}

impl BiasRuntime {
    /// Angle between the local vertical and the line of sight (rad)
    pub fn off_zenith_angle_rad(&self) -> f64 {
        let los = self.sv_position_m - self.rx_position_m;
        self.rx_position_m.angle(&los)
    }
}

/// Ionospheric delay model. You can either deploy the [SingleLayerIonosphere]
/// or apply your own equations.
pub trait IonosphereBias {
    /// Return the (positive) ionospheric group delay, in meters,
    /// for this [BiasRuntime].
    fn ionosphere_bias_m(&self, rtm: &BiasRuntime) -> f64;
}
