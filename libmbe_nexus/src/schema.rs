use serde::{Deserialize, Serialize};
use spdlog::Logger;
use std::fmt::Display;
use std::str::FromStr;
use time::OffsetDateTime;

use super::error::FieldError;
use super::units::Unit;

/// Fold an enum spelling so that `single_crystal`, `Single Crystal` and
/// `single-crystal` compare equal
fn fold_enum_str(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '_' | '-' => ' ',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// Crystallinity of a substrate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Crystallinity {
    #[serde(rename = "single crystal")]
    SingleCrystal,
    #[serde(rename = "polycrystal")]
    Polycrystal,
    #[serde(rename = "quasi crystal")]
    QuasiCrystal,
    #[serde(rename = "amorphous crystal")]
    AmorphousCrystal,
}

impl Crystallinity {
    pub const VALUES: &'static [&'static str] = &[
        "single crystal",
        "polycrystal",
        "quasi crystal",
        "amorphous crystal",
    ];
}

impl FromStr for Crystallinity {
    type Err = FieldError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold_enum_str(s).as_str() {
            "single crystal" => Ok(Self::SingleCrystal),
            "polycrystal" => Ok(Self::Polycrystal),
            "quasi crystal" => Ok(Self::QuasiCrystal),
            "amorphous crystal" => Ok(Self::AmorphousCrystal),
            _ => Err(FieldError::BadEnumValue {
                value: s.to_string(),
                kind: "crystallinity",
            }),
        }
    }
}

/// Wafer flat convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlatConvention {
    EJ,
    US,
}

impl FlatConvention {
    pub const VALUES: &'static [&'static str] = &["EJ", "US"];
}

impl FromStr for FlatConvention {
    type Err = FieldError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold_enum_str(s).as_str() {
            "ej" => Ok(Self::EJ),
            "us" => Ok(Self::US),
            _ => Err(FieldError::BadEnumValue {
                value: s.to_string(),
                kind: "flat convention",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoolingMode {
    LiquidNitrogen,
    GaseousNitrogen,
    Water,
    Air,
    Other,
    Off,
}

impl CoolingMode {
    pub const VALUES: &'static [&'static str] = &[
        "liquid_nitrogen",
        "gaseous_nitrogen",
        "water",
        "air",
        "other",
        "off",
    ];
}

impl FromStr for CoolingMode {
    type Err = FieldError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold_enum_str(s).as_str() {
            "liquid nitrogen" => Ok(Self::LiquidNitrogen),
            "gaseous nitrogen" => Ok(Self::GaseousNitrogen),
            "water" => Ok(Self::Water),
            "air" => Ok(Self::Air),
            "other" => Ok(Self::Other),
            "off" => Ok(Self::Off),
            _ => Err(FieldError::BadEnumValue {
                value: s.to_string(),
                kind: "cooling mode",
            }),
        }
    }
}

impl Display for CoolingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::LiquidNitrogen => "liquid_nitrogen",
            Self::GaseousNitrogen => "gaseous_nitrogen",
            Self::Water => "water",
            Self::Air => "air",
            Self::Other => "other",
            Self::Off => "off",
        };
        write!(f, "{name}")
    }
}

/// A person who took part in the growth run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operator {
    pub name: Option<String>,
    pub role: Option<String>,
    pub affiliation: Option<String>,
    pub orcid: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Substrate {
    pub name: Option<String>,
    pub chemical_formula: Option<String>,
    pub crystallinity: Option<Crystallinity>,
    pub orientation: Option<String>,
    pub doping: Option<String>,
    /// inches
    pub diameter: Option<i64>,
    /// µm
    pub thickness: Option<f64>,
    /// mm**2
    pub area: Option<f64>,
    pub flat_convention: Option<FlatConvention>,
    pub holder: Option<String>,
}

/// One deposited layer of the growth run.
///
/// Rates are in angstrom/s, thickness in angstrom, temperature in celsius, time in
/// seconds, rotation in rpm and partial pressure in torr.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerStep {
    pub name: Option<String>,
    pub chemical_formula: Option<String>,
    pub description: Option<String>,
    pub doping: Option<String>,
    pub thickness: Option<f64>,
    pub growth_temperature: Option<f64>,
    pub growth_time: Option<f64>,
    pub growth_rate: Option<f64>,
    pub alloy_fraction: Option<f64>,
    pub rotational_frequency: Option<f64>,
    pub rate_ga1: Option<f64>,
    pub rate_ga2: Option<f64>,
    pub rate_al: Option<f64>,
    pub rate_in: Option<f64>,
    pub partial_pressure: Option<f64>,
}

/// A sensor mounted in the growth chamber.
///
/// The unit of `value` depends on what is being measured, so it is not stored in the
/// file. It is resolved from `measurement` by [`Sensor::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    pub name: Option<String>,
    pub model: Option<String>,
    pub measurement: Option<String>,
    /// nm
    pub wavelength: Option<f64>,
    pub value: Option<f64>,
    pub unit: Option<Unit>,
}

impl Sensor {
    /// Assign the unit of the reading.
    ///
    /// Does nothing unless both measurement and value are set. Unknown measurement
    /// types leave the value unit-less with a warning. A failure to apply the unit is
    /// logged and the raw value is kept.
    pub fn normalize(&mut self, logger: &Logger) {
        let (Some(measurement), Some(value)) = (self.measurement.as_deref(), self.value)
        else {
            return;
        };
        self.unit = None;
        let Some(unit) = Unit::for_measurement(measurement) else {
            spdlog::warn!(
                logger: logger,
                "Sensor {} has unknown measurement type '{}'; value {} is left without a unit",
                self.label(),
                measurement,
                value
            );
            return;
        };
        match unit.apply(value) {
            Ok(applied) => {
                self.value = Some(applied);
                self.unit = Some(unit);
            }
            Err(e) => spdlog::error!(
                logger: logger,
                "Could not assign a unit to sensor {}: {e}",
                self.label()
            ),
        }
    }

    fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.model.as_deref())
            .unwrap_or("<unnamed>")
    }
}

/// A pressure gauge. Values are always in mbar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Gauge {
    pub name: Option<String>,
    pub model: Option<String>,
    pub measurement: Option<String>,
    pub value: Option<f64>,
}

impl Gauge {
    pub const UNIT: Unit = Unit::Millibar;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoolingDevice {
    pub name: Option<String>,
    pub model: Option<String>,
    pub cooling_mode: Option<CoolingMode>,
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthChamber {
    pub model: Option<String>,
    pub chamber_type: Option<String>,
    pub description: Option<String>,
    pub cooling_device: Option<CoolingDevice>,
    pub sensors: Vec<Sensor>,
    pub gauges: Vec<Gauge>,
}

impl GrowthChamber {
    pub fn normalize(&mut self, logger: &Logger) {
        for sensor in self.sensors.iter_mut() {
            sensor.normalize(logger);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub chamber: Option<GrowthChamber>,
}

/// The grown sample: its substrate, the ordered layer sequence and, for the embedded
/// layout, the chamber it was grown in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleAssembly {
    pub name: Option<String>,
    /// nm
    pub thickness: Option<f64>,
    pub substrate: Option<Substrate>,
    pub layers: Vec<LayerStep>,
    pub chamber: Option<GrowthChamber>,
}

/// Root record of one MBE growth run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthRun {
    pub definition: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub start_time: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub end_time: Option<OffsetDateTime>,
    /// hours
    pub duration: Option<f64>,
    pub operators: Vec<Operator>,
    pub sample: Option<SampleAssembly>,
    pub instruments: Vec<Instrument>,
}

impl GrowthRun {
    /// Resolve derived values (sensor units) across every chamber in the run
    pub fn normalize(&mut self, logger: &Logger) {
        for instrument in self.instruments.iter_mut() {
            if let Some(chamber) = instrument.chamber.as_mut() {
                chamber.normalize(logger);
            }
        }
        if let Some(chamber) = self
            .sample
            .as_mut()
            .and_then(|sample| sample.chamber.as_mut())
        {
            chamber.normalize(logger);
        }
    }
}

/// The host-owned destination of a parse. The parser replaces `data` with a fresh
/// GrowthRun and fills it in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryArchive {
    pub data: Option<GrowthRun>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use spdlog::sink::WriteSink;
    use std::sync::Arc;

    fn capture_logger() -> (Arc<WriteSink<Vec<u8>>>, Logger) {
        let sink = Arc::new(WriteSink::builder().target(Vec::new()).build().unwrap());
        let logger = Logger::builder().sink(sink.clone()).build().unwrap();
        (sink, logger)
    }

    fn logged(sink: &WriteSink<Vec<u8>>) -> String {
        String::from_utf8(sink.clone_target()).unwrap()
    }

    fn sensor(measurement: &str, value: f64) -> Sensor {
        Sensor {
            name: Some(String::from("pyrometer")),
            measurement: Some(String::from(measurement)),
            value: Some(value),
            ..Default::default()
        }
    }

    #[test]
    fn test_pressure_sensor_gets_millibar() {
        let (sink, logger) = capture_logger();
        let mut s = sensor("pressure", 5.0);
        s.normalize(&logger);
        assert_eq!(s.value, Some(5.0));
        assert_eq!(s.unit, Some(Unit::Millibar));
        assert!(logged(&sink).is_empty());
    }

    #[test]
    fn test_unknown_measurement_warns() {
        let (sink, logger) = capture_logger();
        let mut s = sensor("unknown_type", 5.0);
        s.normalize(&logger);
        assert_eq!(s.value, Some(5.0));
        assert_eq!(s.unit, None);
        assert!(logged(&sink).contains("unknown measurement type 'unknown_type'"));
    }

    #[test]
    fn test_reflectivity_is_percent() {
        let (_sink, logger) = capture_logger();
        let mut s = sensor("reflectivity", 0.3);
        s.normalize(&logger);
        assert_eq!(s.unit, Some(Unit::Percent));
    }

    #[test]
    fn test_non_finite_value_is_kept_without_unit() {
        let (sink, logger) = capture_logger();
        let mut s = sensor("rate_temperature", f64::INFINITY);
        s.normalize(&logger);
        assert_eq!(s.value, Some(f64::INFINITY));
        assert_eq!(s.unit, None);
        assert!(logged(&sink).contains("Could not assign a unit"));
    }

    #[test]
    fn test_incomplete_sensor_is_untouched() {
        let (sink, logger) = capture_logger();
        let mut s = Sensor {
            measurement: Some(String::from("pressure")),
            ..Default::default()
        };
        s.normalize(&logger);
        assert_eq!(s, Sensor {
            measurement: Some(String::from("pressure")),
            ..Default::default()
        });
        assert!(logged(&sink).is_empty());
    }

    #[test]
    fn test_run_normalizes_every_chamber() {
        let (_sink, logger) = capture_logger();
        let chamber = GrowthChamber {
            sensors: vec![sensor("pressure", 1e-8)],
            ..Default::default()
        };
        let mut run = GrowthRun {
            instruments: vec![Instrument {
                chamber: Some(chamber.clone()),
            }],
            sample: Some(SampleAssembly {
                chamber: Some(chamber),
                ..Default::default()
            }),
            ..Default::default()
        };
        run.normalize(&logger);
        assert_eq!(
            run.instruments[0].chamber.as_ref().unwrap().sensors[0].unit,
            Some(Unit::Millibar)
        );
        assert_eq!(
            run.sample.unwrap().chamber.unwrap().sensors[0].unit,
            Some(Unit::Millibar)
        );
    }

    #[test]
    fn test_enum_spellings() {
        assert_eq!(
            Crystallinity::from_str("single_crystal").unwrap(),
            Crystallinity::SingleCrystal
        );
        assert_eq!(
            Crystallinity::from_str("Quasi Crystal").unwrap(),
            Crystallinity::QuasiCrystal
        );
        assert_eq!(FlatConvention::from_str("ej").unwrap(), FlatConvention::EJ);
        assert_eq!(
            CoolingMode::from_str("liquid-nitrogen").unwrap(),
            CoolingMode::LiquidNitrogen
        );
        assert!(CoolingMode::from_str("helium").is_err());
        assert_eq!(CoolingMode::GaseousNitrogen.to_string(), "gaseous_nitrogen");
    }

    #[test]
    fn test_empty_run_is_valid() {
        let run = GrowthRun::default();
        let yaml = serde_yaml::to_string(&run).unwrap();
        let back: GrowthRun = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(run, back);
    }
}
