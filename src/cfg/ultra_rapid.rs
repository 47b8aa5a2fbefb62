use crate::error::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ultra rapid products span 48h, split in eight 6h segments:
/// four observed segments followed by four predicted segments.
/// [UltraRapidMode] selects the segment we use.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "String", into = "String")
)]
pub enum UltraRapidMode {
    /// Use the complete product
    #[default]
    NotUsed,
    /// Observed segment (1 to 4)
    Observed(u8),
    /// Predicted segment (1 to 4)
    Predicted(u8),
}

impl UltraRapidMode {
    /// Number of segments per product
    pub const SEGMENTS: usize = 8;

    /// Segment duration, in seconds
    pub const SEGMENT_DURATION_S: f64 = 6.0 * 3600.0;

    /// Segment index within the product (0 to 7), None when not used
    /// or out of range.
    pub fn segment(&self) -> Option<usize> {
        match self {
            Self::Observed(n @ 1..=4) => Some(*n as usize - 1),
            Self::Predicted(n @ 1..=4) => Some(*n as usize + 3),
            _ => None,
        }
    }

    /// Returns an error for segment numbers outside 1 to 4
    pub fn validate(&self) -> Result<(), Error> {
        match self {
            Self::NotUsed => Ok(()),
            mode if mode.segment().is_some() => Ok(()),
            mode => Err(Error::UnknownUltraRapidMode(mode.to_string())),
        }
    }

    /// True for the predicted segments
    pub fn is_predicted(&self) -> bool {
        matches!(self, Self::Predicted(_))
    }
}

impl std::fmt::Display for UltraRapidMode {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::NotUsed => write!(fmt, "not used"),
            Self::Observed(n) => write!(fmt, "observe{}", n),
            Self::Predicted(n) => write!(fmt, "predict{}", n),
        }
    }
}

impl std::str::FromStr for UltraRapidMode {
    type Err = Error;
    /// Parses "observe1" to "observe4" and "predict1" to "predict4"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let segment = |prefix: &str| {
            lowered
                .strip_prefix(prefix)
                .and_then(|n| n.trim().parse::<u8>().ok())
                .filter(|n| (1..=4).contains(n))
        };
        if let Some(n) = segment("observe") {
            Ok(Self::Observed(n))
        } else if let Some(n) = segment("predict") {
            Ok(Self::Predicted(n))
        } else if lowered.is_empty() || lowered == "none" {
            Ok(Self::NotUsed)
        } else {
            Err(Error::UnknownUltraRapidMode(s.to_string()))
        }
    }
}

impl TryFrom<String> for UltraRapidMode {
    type Error = Error;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<UltraRapidMode> for String {
    fn from(mode: UltraRapidMode) -> String {
        match mode {
            UltraRapidMode::NotUsed => "none".to_string(),
            mode => mode.to_string(),
        }
    }
}
