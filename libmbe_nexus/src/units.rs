use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::error::UnitError;

/// Physical units used by the growth-run schema.
///
/// Serialized by symbol, in the notation the host platform's unit registry expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "kelvin")]
    Kelvin,
    #[serde(rename = "mbar")]
    Millibar,
    #[serde(rename = "percent")]
    Percent,
    #[serde(rename = "angstrom")]
    Angstrom,
    #[serde(rename = "celsius")]
    Celsius,
    #[serde(rename = "s")]
    Second,
    #[serde(rename = "angstrom/s")]
    AngstromPerSecond,
    #[serde(rename = "rpm")]
    Rpm,
    #[serde(rename = "torr")]
    Torr,
    #[serde(rename = "nm")]
    Nanometer,
    #[serde(rename = "µm")]
    Micrometer,
    #[serde(rename = "mm**2")]
    SquareMillimeter,
    #[serde(rename = "inches")]
    Inch,
    #[serde(rename = "hour")]
    Hour,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Kelvin => "kelvin",
            Self::Millibar => "mbar",
            Self::Percent => "percent",
            Self::Angstrom => "angstrom",
            Self::Celsius => "celsius",
            Self::Second => "s",
            Self::AngstromPerSecond => "angstrom/s",
            Self::Rpm => "rpm",
            Self::Torr => "torr",
            Self::Nanometer => "nm",
            Self::Micrometer => "µm",
            Self::SquareMillimeter => "mm**2",
            Self::Inch => "inches",
            Self::Hour => "hour",
        }
    }

    /// Resolve the unit of a sensor reading from its measurement type.
    ///
    /// Matching is exact but case-insensitive. Returns None for measurement types
    /// without a known unit.
    pub fn for_measurement(measurement: &str) -> Option<Self> {
        let measurement = measurement.to_ascii_lowercase();
        match measurement.as_str() {
            "rate_temperature" => Some(Self::Kelvin),
            "pressure" => Some(Self::Millibar),
            "emissivity_temperature" => Some(Self::Percent),
            "reflectivity" => Some(Self::Percent),
            _ => None,
        }
    }

    /// Check that a raw reading can carry this unit
    pub fn apply(&self, value: f64) -> Result<f64, UnitError> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(UnitError::NonFinite {
                value,
                unit: self.symbol(),
            })
        }
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
