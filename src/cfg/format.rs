use crate::error::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Clock product format. Selected once, when loading the configuration.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ClockFormat {
    /// Clock biases embedded in SP3 orbit products, in microseconds.
    #[cfg_attr(feature = "serde", serde(alias = "sp3", alias = ".sp3"))]
    #[default]
    Sp3,

    /// High rate clock products (`AS` records), in seconds.
    #[cfg_attr(
        feature = "serde",
        serde(alias = "clk", alias = ".clk", alias = ".clk_30s", alias = "clk_30s")
    )]
    Clk,
}

impl std::fmt::Display for ClockFormat {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Sp3 => write!(fmt, "SP3"),
            Self::Clk => write!(fmt, "CLK"),
        }
    }
}

impl std::str::FromStr for ClockFormat {
    type Err = Error;
    /// Interprets a file extension, with or without leading dot
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let extension = lowered.trim_start_matches('.');
        if extension == "sp3" {
            Ok(Self::Sp3)
        } else if extension.starts_with("clk") {
            Ok(Self::Clk)
        } else {
            Err(Error::UnknownClockFormat(s.to_string()))
        }
    }
}
