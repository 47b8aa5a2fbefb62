use crate::{
    bias::{BiasRuntime, IonosphereBias},
    constants::EARTH_EQUATORIAL_RADIUS_KM,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

fn default_zenith_delay_m() -> f64 {
    20.0
}

fn default_reference_frequency_mhz() -> f64 {
    1500.0
}

fn default_layer_altitude_km() -> f64 {
    1000.0
}

fn default_earth_radius_km() -> f64 {
    EARTH_EQUATORIAL_RADIUS_KM
}

/// Single layer ionosphere. The zenith delay decreases linearly with the
/// receiver altitude, vanishes at the top of the layer, and is mapped to the
/// line of sight with 1/cos(off zenith angle). The delay scales with the
/// inverse square of the carrier frequency.
///
/// The mapping is not bounded: lines of sight close to (or below) the horizon
/// return very large (or negative) values.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SingleLayerIonosphere {
    /// Zenith delay at sea level (m), at the reference frequency
    #[cfg_attr(feature = "serde", serde(default = "default_zenith_delay_m"))]
    pub zenith_delay_m: f64,
    /// Reference frequency (MHz)
    #[cfg_attr(
        feature = "serde",
        serde(default = "default_reference_frequency_mhz")
    )]
    pub reference_frequency_mhz: f64,
    /// Top of the layer (km)
    #[cfg_attr(feature = "serde", serde(default = "default_layer_altitude_km"))]
    pub layer_altitude_km: f64,
    /// Earth radius used to determine the receiver altitude (km)
    #[cfg_attr(feature = "serde", serde(default = "default_earth_radius_km"))]
    pub earth_radius_km: f64,
}

impl Default for SingleLayerIonosphere {
    fn default() -> Self {
        Self {
            zenith_delay_m: default_zenith_delay_m(),
            reference_frequency_mhz: default_reference_frequency_mhz(),
            layer_altitude_km: default_layer_altitude_km(),
            earth_radius_km: default_earth_radius_km(),
        }
    }
}

impl SingleLayerIonosphere {
    /// Receiver altitude above the spherical Earth (km)
    fn altitude_km(&self, rtm: &BiasRuntime) -> f64 {
        rtm.rx_position_m.norm() / 1000.0 - self.earth_radius_km
    }
}

impl IonosphereBias for SingleLayerIonosphere {
    fn ionosphere_bias_m(&self, rtm: &BiasRuntime) -> f64 {
        let altitude_km = self.altitude_km(rtm);
        if altitude_km >= self.layer_altitude_km {
            return 0.0;
        }

        let zenith_m =
            self.zenith_delay_m * (self.layer_altitude_km - altitude_km) / self.layer_altitude_km;

        let frequency_ratio = self.reference_frequency_mhz / rtm.frequency_mhz;

        zenith_m / rtm.off_zenith_angle_rad().cos() * frequency_ratio.powi(2)
    }
}
