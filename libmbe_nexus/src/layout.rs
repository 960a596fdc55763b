use serde::{Deserialize, Serialize};

/// The two known arrangements of growth-run metadata in a NeXus file.
///
/// `Instrumented` keeps the growth chamber under `entry/instrument` and zero-pads layer
/// indices. `Embedded` is the older arrangement, where the chamber lives under the
/// sample and layer indices are not padded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    #[default]
    Instrumented,
    Embedded,
}

impl LayoutKind {
    pub fn layout(&self) -> &'static Layout {
        match self {
            Self::Instrumented => &INSTRUMENTED,
            Self::Embedded => &EMBEDDED,
        }
    }
}

/// Where the growth chamber group sits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChamberLocation {
    /// `entry/instrument/chamber`, cooling device at `entry/instrument/cooling_device`
    Instrument,
    /// `entry/sample/chamber`, cooling device inside the chamber
    Sample,
}

/// Dataset names of the substrate quantities that differ between layouts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstrateKeys {
    pub crystallinity: &'static str,
    pub orientation: &'static str,
}

/// Dataset names of the layer quantities that differ between layouts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerKeys {
    pub rotational_frequency: &'static str,
    pub rate_ga1: &'static str,
    pub rate_ga2: &'static str,
    pub rate_al: &'static str,
    pub rate_in: &'static str,
}

/// Name tables for one layout. Candidate group lists are checked in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub kind: LayoutKind,
    pub operator_groups: &'static [&'static str],
    pub chamber: ChamberLocation,
    pub chamber_model_key: &'static str,
    pub sensor_groups: &'static [&'static str],
    pub gauge_groups: &'static [&'static str],
    pub layer_index_width: usize,
    pub substrate_keys: SubstrateKeys,
    pub layer_keys: LayerKeys,
}

impl Layout {
    /// Group name of the layer at a 1-based position in the growth sequence
    pub fn layer_group_name(&self, index: usize) -> String {
        format!("layer{index:0>width$}", width = self.layer_index_width)
    }
}

static INSTRUMENTED: Layout = Layout {
    kind: LayoutKind::Instrumented,
    operator_groups: &["user", "user_1", "user_2"],
    chamber: ChamberLocation::Instrument,
    chamber_model_key: "name",
    sensor_groups: &["sensor_1", "sensor_2", "sensor_3", "sensor_4", "sensor_5"],
    gauge_groups: &["gauge_1", "gauge_2"],
    layer_index_width: 2,
    substrate_keys: SubstrateKeys {
        crystallinity: "crystalline_structure",
        orientation: "crystal_orientation",
    },
    layer_keys: LayerKeys {
        rotational_frequency: "rotational_frequency",
        rate_ga1: "partial_growth_rate_Ga1",
        rate_ga2: "partial_growth_rate_Ga2",
        rate_al: "partial_growth_rate_Al",
        rate_in: "partial_growth_rate_In",
    },
};

static EMBEDDED: Layout = Layout {
    kind: LayoutKind::Embedded,
    operator_groups: &["user"],
    chamber: ChamberLocation::Sample,
    chamber_model_key: "model",
    sensor_groups: &[
        "pyrometer_1",
        "pyrometer_2",
        "reflectometer_1",
        "reflectometer_2",
    ],
    gauge_groups: &["gauge_1", "gauge_2"],
    layer_index_width: 0,
    substrate_keys: SubstrateKeys {
        crystallinity: "crystallinity",
        orientation: "orientation",
    },
    layer_keys: LayerKeys {
        rotational_frequency: "rotation_velocity",
        rate_ga1: "evaporation_rate_Ga1",
        rate_ga2: "evaporation_rate_Ga2",
        rate_al: "evaporation_rate_Al",
        rate_in: "evaporation_rate_In",
    },
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_names() {
        let instrumented = LayoutKind::Instrumented.layout();
        assert_eq!(instrumented.layer_group_name(1), "layer01");
        assert_eq!(instrumented.layer_group_name(12), "layer12");
        assert_eq!(instrumented.layer_group_name(123), "layer123");

        let embedded = LayoutKind::Embedded.layout();
        assert_eq!(embedded.layer_group_name(1), "layer1");
        assert_eq!(embedded.layer_group_name(10), "layer10");
    }

    #[test]
    fn test_layout_kind_round_trip() {
        assert_eq!(LayoutKind::default(), LayoutKind::Instrumented);
        let kind: LayoutKind = serde_yaml::from_str("embedded").unwrap();
        assert_eq!(kind.layout().kind, LayoutKind::Embedded);
        assert_eq!(kind.layout().chamber, ChamberLocation::Sample);
    }
}
