#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{bias::SingleLayerIonosphere, prelude::TimeScale};

use std::path::PathBuf;

mod format;
mod method;
mod ultra_rapid;

pub use format::ClockFormat;
pub use method::InterpolationMethod;
pub use ultra_rapid::UltraRapidMode;

fn default_calculation() -> bool {
    true
}

fn default_timescale() -> TimeScale {
    TimeScale::UTC
}

fn default_position_window() -> usize {
    9
}

fn default_clock_window() -> usize {
    3
}

/// Sequence of product files, from `first` to `last` (both included).
#[derive(Default, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProductFiles {
    /// Product sort, like "IGS", "IGU" or "JAXA_Final".
    /// Selects the sub directory, and the file naming convention.
    pub sort: String,
    /// First file name
    pub first: String,
    /// Last file name
    pub last: String,
    /// Sub directory of clock streams, defaults to the file extension.
    #[cfg_attr(feature = "serde", serde(default))]
    pub subdirectory: Option<String>,
}

/// Position interpolation settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PositionSettings {
    /// Interpolation method
    #[cfg_attr(feature = "serde", serde(default))]
    pub method: InterpolationMethod,
    /// Number of samples used in the interpolation
    #[cfg_attr(feature = "serde", serde(default = "default_position_window"))]
    pub window_size: usize,
}

impl Default for PositionSettings {
    fn default() -> Self {
        Self {
            method: InterpolationMethod::default(),
            window_size: default_position_window(),
        }
    }
}

/// Clock interpolation settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClockSettings {
    /// Source format
    #[cfg_attr(feature = "serde", serde(default))]
    pub format: ClockFormat,
    /// Number of samples used in the (Lagrange) interpolation
    #[cfg_attr(feature = "serde", serde(default = "default_clock_window"))]
    pub window_size: usize,
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            format: ClockFormat::default(),
            window_size: default_clock_window(),
        }
    }
}

/// One complete product set: positions and clocks.
#[derive(Default, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProductConfig {
    /// Position files
    pub position_files: ProductFiles,
    /// Position settings
    #[cfg_attr(feature = "serde", serde(default))]
    pub position: PositionSettings,
    /// Clock files. May designate the position files, when
    /// clock biases are picked up from the SP3 products.
    pub clock_files: ProductFiles,
    /// Clock settings
    #[cfg_attr(feature = "serde", serde(default))]
    pub clock: ClockSettings,
    /// Ultra rapid segment, for both positions and clocks
    #[cfg_attr(feature = "serde", serde(default))]
    pub ultra_rapid: UltraRapidMode,
}

/// GNSS constellation engine configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Engine activation. A disabled engine loads nothing and
    /// all its queries return neutral values.
    #[cfg_attr(feature = "serde", serde(default = "default_calculation"))]
    pub calculation: bool,
    /// Root directory of the precise products
    #[cfg_attr(feature = "serde", serde(default))]
    pub directory: PathBuf,
    /// [TimeScale] in which product epochs and simulation start are expressed
    #[cfg_attr(feature = "serde", serde(default = "default_timescale"))]
    pub timescale: TimeScale,
    /// Ionosphere model
    #[cfg_attr(feature = "serde", serde(default))]
    pub ionosphere: SingleLayerIonosphere,
    /// Reference products
    pub truth: ProductConfig,
    /// Estimated products
    pub estimate: ProductConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            calculation: default_calculation(),
            directory: PathBuf::new(),
            timescale: default_timescale(),
            ionosphere: SingleLayerIonosphere::default(),
            truth: ProductConfig::default(),
            estimate: ProductConfig::default(),
        }
    }
}
