use crate::error::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Position interpolation method
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InterpolationMethod {
    /// Trigonometric interpolation, suited for orbital states that
    /// roughly repeat themselves every (sidereal) day.
    #[cfg_attr(
        feature = "serde",
        serde(alias = "trigonometric", alias = "trigo")
    )]
    #[default]
    Trigonometric,

    /// Lagrange polynomial interpolation
    #[cfg_attr(feature = "serde", serde(alias = "lagrange"))]
    Lagrange,
}

impl std::fmt::Display for InterpolationMethod {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Trigonometric => write!(fmt, "Trigonometric"),
            Self::Lagrange => write!(fmt, "Lagrange"),
        }
    }
}

impl std::str::FromStr for InterpolationMethod {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trigonometric" | "trigo" => Ok(Self::Trigonometric),
            "lagrange" => Ok(Self::Lagrange),
            _ => Err(Error::UnknownInterpolationMethod(s.to_string())),
        }
    }
}
