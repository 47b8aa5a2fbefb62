#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

// private modules
mod bias;
mod cfg;
mod clock;
mod constants;
mod constellation;
mod error;
mod info;
mod observer;
mod position;
mod records;
mod report;
mod satellites;
mod window;

// public modules
pub mod interp;
pub mod loader;
pub mod time;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::bias::{BiasRuntime, IonosphereBias, SingleLayerIonosphere};
    pub use crate::cfg::{
        ClockFormat, ClockSettings, Config, InterpolationMethod, PositionSettings, ProductConfig,
        ProductFiles, UltraRapidMode,
    };
    pub use crate::clock::ClockStore;
    pub use crate::constellation::{ConstellationRange, ConstellationTable};
    pub use crate::error::Error;
    pub use crate::info::SatelliteInfo;
    pub use crate::observer::{CsvObserver, UpdateObserver};
    pub use crate::position::PositionStore;
    pub use crate::records::{IngestContext, Page};
    pub use crate::satellites::{
        CarrierPhase, GnssSatellites, ProductPages, ReferenceFrame, SimulationClock, SteppedClock,
    };
    pub use crate::time::Calendar;
    // re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch, TimeScale};
    pub use nalgebra::Vector3;
}

// pub export
pub use error::Error;
