//! ELN presentation metadata.
//!
//! The host platform renders each record as an editable section. These static tables
//! tell it in which order to show the quantities, which widget to use for each, and in
//! which unit numbers are displayed by default. They carry no data of their own.
use serde::Serialize;

use super::schema::{
    CoolingDevice, CoolingMode, Crystallinity, FlatConvention, Gauge, GrowthChamber,
    GrowthRun, Instrument, LayerStep, Operator, SampleAssembly, Sensor, Substrate,
};
use super::units::Unit;

/// The edit widget the ELN uses for a quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ElnComponent {
    StringEditQuantity,
    RichTextEditQuantity,
    NumberEditQuantity,
    DateTimeEditQuantity,
    EnumEditQuantity,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuantityDef {
    pub name: &'static str,
    pub description: &'static str,
    pub component: ElnComponent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
    #[serde(skip_serializing_if = "no_values")]
    pub values: &'static [&'static str],
}

fn no_values(values: &&'static [&'static str]) -> bool {
    values.is_empty()
}

#[derive(Debug, Clone, Serialize)]
pub struct SubSectionDef {
    pub name: &'static str,
    pub section: &'static str,
    pub repeats: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionDef {
    pub name: &'static str,
    pub order: &'static [&'static str],
    pub quantities: &'static [QuantityDef],
    pub sub_sections: &'static [SubSectionDef],
}

impl SectionDef {
    pub fn quantity(&self, name: &str) -> Option<&QuantityDef> {
        self.quantities.iter().find(|q| q.name == name)
    }
}

/// Implemented by every record type the ELN can display
pub trait ElnSection {
    fn section_def() -> &'static SectionDef;
}

const fn text(name: &'static str, description: &'static str) -> QuantityDef {
    QuantityDef {
        name,
        description,
        component: ElnComponent::StringEditQuantity,
        unit: None,
        values: &[],
    }
}

const fn rich_text(name: &'static str, description: &'static str) -> QuantityDef {
    QuantityDef {
        name,
        description,
        component: ElnComponent::RichTextEditQuantity,
        unit: None,
        values: &[],
    }
}

const fn number(name: &'static str, description: &'static str, unit: Option<Unit>) -> QuantityDef {
    QuantityDef {
        name,
        description,
        component: ElnComponent::NumberEditQuantity,
        unit,
        values: &[],
    }
}

const fn datetime(name: &'static str, description: &'static str) -> QuantityDef {
    QuantityDef {
        name,
        description,
        component: ElnComponent::DateTimeEditQuantity,
        unit: None,
        values: &[],
    }
}

const fn choice(
    name: &'static str,
    description: &'static str,
    values: &'static [&'static str],
) -> QuantityDef {
    QuantityDef {
        name,
        description,
        component: ElnComponent::EnumEditQuantity,
        unit: None,
        values,
    }
}

static OPERATOR: SectionDef = SectionDef {
    name: "Operator",
    order: &["name", "role", "affiliation", "orcid", "email"],
    quantities: &[
        text("name", "Name and Surname of the operator"),
        text("role", "Role of the operator"),
        text("affiliation", "Affiliated institution of the operator"),
        text("orcid", "ORCID identifier of the operator"),
        text("email", "Contact email of the operator"),
    ],
    sub_sections: &[],
};

static SUBSTRATE: SectionDef = SectionDef {
    name: "Substrate",
    order: &[
        "name",
        "chemical_formula",
        "crystallinity",
        "orientation",
        "doping",
        "diameter",
        "thickness",
        "area",
        "flat_convention",
        "holder",
    ],
    quantities: &[
        text(
            "name",
            "Identifier of the wafer from which the substrate was derived",
        ),
        text("chemical_formula", "Chemical formula of the substrate material"),
        choice(
            "crystallinity",
            "Crystallinity type of the material",
            Crystallinity::VALUES,
        ),
        text("orientation", "Crystallographic direction of the material"),
        text(
            "doping",
            "Doping type and level of the substrate (e.g., p+, n, SI)",
        ),
        number(
            "diameter",
            "Diameter of the wafer from which the substrate was derived",
            Some(Unit::Inch),
        ),
        number("thickness", "Thickness of the substrate", Some(Unit::Micrometer)),
        number("area", "Area of the substrate", Some(Unit::SquareMillimeter)),
        choice(
            "flat_convention",
            "Flat convention of the wafer",
            FlatConvention::VALUES,
        ),
        text("holder", "Type of substrate holder used in the process"),
    ],
    sub_sections: &[],
};

static LAYER_STEP: SectionDef = SectionDef {
    name: "LayerStep",
    order: &[
        "name",
        "chemical_formula",
        "description",
        "doping",
        "thickness",
        "growth_temperature",
        "growth_time",
        "growth_rate",
        "alloy_fraction",
        "rotational_frequency",
        "rate_ga1",
        "rate_ga2",
        "rate_al",
        "rate_in",
        "partial_pressure",
    ],
    quantities: &[
        text("name", "Name of the growth step"),
        text("chemical_formula", "Chemical formula of the material or step name"),
        rich_text("description", "Information about the layer"),
        text("doping", "Doping of the layer"),
        number("thickness", "Thickness of the layer", Some(Unit::Angstrom)),
        number(
            "growth_temperature",
            "Growing temperature of the layer",
            Some(Unit::Celsius),
        ),
        number("growth_time", "Growing time of the layer", Some(Unit::Second)),
        number(
            "growth_rate",
            "Growing rate of the layer",
            Some(Unit::AngstromPerSecond),
        ),
        number(
            "alloy_fraction",
            "Fraction of the first element in a ternary alloy",
            None,
        ),
        number(
            "rotational_frequency",
            "Rotation velocity of the sample during the deposition of the current layer",
            Some(Unit::Rpm),
        ),
        number(
            "rate_ga1",
            "Evaporation rate of first Gallium cell during the deposition of the current layer",
            Some(Unit::AngstromPerSecond),
        ),
        number(
            "rate_ga2",
            "Evaporation rate of second Gallium cell during the deposition of the current layer",
            Some(Unit::AngstromPerSecond),
        ),
        number(
            "rate_al",
            "Evaporation rate of Aluminum cell during the deposition of the current layer",
            Some(Unit::AngstromPerSecond),
        ),
        number(
            "rate_in",
            "Evaporation rate of Indium cell during the deposition of the current layer",
            Some(Unit::AngstromPerSecond),
        ),
        number(
            "partial_pressure",
            "Partial pressure of Arsenic cell during the deposition of the current layer",
            Some(Unit::Torr),
        ),
    ],
    sub_sections: &[],
};

// The sensor unit is resolved per reading, so value has no default display unit
static SENSOR: SectionDef = SectionDef {
    name: "Sensor",
    order: &["name", "model", "measurement", "wavelength", "value"],
    quantities: &[
        text("name", "Name of the sensor in the chamber"),
        text("model", "Model of the sensor in the chamber"),
        text("measurement", "Physical quantity being measured"),
        number(
            "wavelength",
            "Reading wavelength of the sensor",
            Some(Unit::Nanometer),
        ),
        number("value", "Nominal value of the signal", None),
    ],
    sub_sections: &[],
};

static GAUGE: SectionDef = SectionDef {
    name: "Gauge",
    order: &["name", "model", "measurement", "value"],
    quantities: &[
        text("name", "Name of the gauge in the chamber"),
        text("model", "Model of the gauge in the chamber"),
        text("measurement", "Physical quantity being measured"),
        number("value", "Nominal value of the signal", Some(Gauge::UNIT)),
    ],
    sub_sections: &[],
};

static COOLING_DEVICE: SectionDef = SectionDef {
    name: "CoolingDevice",
    order: &["name", "model", "cooling_mode", "temperature"],
    quantities: &[
        text("name", "Name of the cooling device"),
        text("model", "Model of the cooling device"),
        choice(
            "cooling_mode",
            "Medium used to cool the chamber",
            CoolingMode::VALUES,
        ),
        number(
            "temperature",
            "Temperature of the cooling device",
            Some(Unit::Celsius),
        ),
    ],
    sub_sections: &[],
};

static GROWTH_CHAMBER: SectionDef = SectionDef {
    name: "GrowthChamber",
    order: &["model", "chamber_type", "description"],
    quantities: &[
        text("model", "Model of the growing chamber"),
        text("chamber_type", "Type of growing chamber"),
        rich_text("description", "Description of the growing chamber"),
    ],
    sub_sections: &[
        SubSectionDef {
            name: "cooling_device",
            section: "CoolingDevice",
            repeats: false,
        },
        SubSectionDef {
            name: "sensors",
            section: "Sensor",
            repeats: true,
        },
        SubSectionDef {
            name: "gauges",
            section: "Gauge",
            repeats: true,
        },
    ],
};

static INSTRUMENT: SectionDef = SectionDef {
    name: "Instrument",
    order: &[],
    quantities: &[],
    sub_sections: &[SubSectionDef {
        name: "chamber",
        section: "GrowthChamber",
        repeats: false,
    }],
};

static SAMPLE_ASSEMBLY: SectionDef = SectionDef {
    name: "SampleAssembly",
    order: &["name", "thickness"],
    quantities: &[
        text("name", "Identifier name of the sample"),
        number(
            "thickness",
            "Total thickness of the sample",
            Some(Unit::Nanometer),
        ),
    ],
    sub_sections: &[
        SubSectionDef {
            name: "substrate",
            section: "Substrate",
            repeats: false,
        },
        SubSectionDef {
            name: "layers",
            section: "LayerStep",
            repeats: true,
        },
        SubSectionDef {
            name: "chamber",
            section: "GrowthChamber",
            repeats: false,
        },
    ],
};

static GROWTH_RUN: SectionDef = SectionDef {
    name: "GrowthRun",
    order: &[
        "definition",
        "title",
        "description",
        "start_time",
        "end_time",
        "duration",
    ],
    quantities: &[
        text(
            "definition",
            "Type of metadata format, based on NeXus application definition",
        ),
        text("title", "Title of the growth"),
        rich_text("description", "Growing technique involved"),
        datetime("start_time", "Starting time of the growth process"),
        datetime("end_time", "Ending time of the growth process"),
        number("duration", "Total time of growth", Some(Unit::Hour)),
    ],
    sub_sections: &[
        SubSectionDef {
            name: "operators",
            section: "Operator",
            repeats: true,
        },
        SubSectionDef {
            name: "sample",
            section: "SampleAssembly",
            repeats: false,
        },
        SubSectionDef {
            name: "instruments",
            section: "Instrument",
            repeats: true,
        },
    ],
};

macro_rules! impl_eln_section {
    ($($record:ty => $def:ident),* $(,)?) => {
        $(
            impl ElnSection for $record {
                fn section_def() -> &'static SectionDef {
                    &$def
                }
            }
        )*
    };
}

impl_eln_section!(
    Operator => OPERATOR,
    Substrate => SUBSTRATE,
    LayerStep => LAYER_STEP,
    Sensor => SENSOR,
    Gauge => GAUGE,
    CoolingDevice => COOLING_DEVICE,
    GrowthChamber => GROWTH_CHAMBER,
    Instrument => INSTRUMENT,
    SampleAssembly => SAMPLE_ASSEMBLY,
    GrowthRun => GROWTH_RUN,
);

/// Every section definition, root first
pub fn all_sections() -> Vec<&'static SectionDef> {
    vec![
        GrowthRun::section_def(),
        Operator::section_def(),
        SampleAssembly::section_def(),
        Substrate::section_def(),
        LayerStep::section_def(),
        Instrument::section_def(),
        GrowthChamber::section_def(),
        CoolingDevice::section_def(),
        Sensor::section_def(),
        Gauge::section_def(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_names_declared_quantities() {
        for section in all_sections() {
            for key in section.order {
                assert!(
                    section.quantity(key).is_some(),
                    "{} orders undeclared quantity {}",
                    section.name,
                    key
                );
            }
        }
    }

    #[test]
    fn test_sub_sections_resolve() {
        let sections = all_sections();
        for section in sections.iter() {
            for sub in section.sub_sections {
                assert!(
                    sections.iter().any(|s| s.name == sub.section),
                    "{} refers to unknown section {}",
                    section.name,
                    sub.section
                );
            }
        }
    }

    #[test]
    fn test_quantities_match_record_fields() {
        // Every declared quantity must be a key of the serialized record
        let run = GrowthRun::default();
        let value = serde_yaml::to_value(&run).unwrap();
        let mapping = value.as_mapping().unwrap();
        for quantity in GrowthRun::section_def().quantities {
            assert!(mapping.contains_key(quantity.name), "{}", quantity.name);
        }

        let layer = serde_yaml::to_value(LayerStep::default()).unwrap();
        for quantity in LayerStep::section_def().quantities {
            assert!(
                layer.as_mapping().unwrap().contains_key(quantity.name),
                "{}",
                quantity.name
            );
        }
    }

    #[test]
    fn test_enum_quantities_list_values() {
        let q = CoolingDevice::section_def().quantity("cooling_mode").unwrap();
        assert_eq!(q.component, ElnComponent::EnumEditQuantity);
        assert!(q.values.contains(&"liquid_nitrogen"));
        assert_eq!(
            Substrate::section_def().quantity("area").unwrap().unit,
            Some(Unit::SquareMillimeter)
        );
    }
}
