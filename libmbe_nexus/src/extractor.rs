use spdlog::Logger;
use std::str::FromStr;
use time::OffsetDateTime;

use super::config::Config;
use super::error::FieldError;
use super::layout::{ChamberLocation, Layout};
use super::nexus_reader::NexusGroup;
use super::schema::{
    CoolingDevice, Gauge, GrowthChamber, GrowthRun, Instrument, LayerStep, Operator,
    SampleAssembly, Sensor, Substrate,
};

const INSTRUMENT_NAME: &str = "instrument";
const CHAMBER_NAME: &str = "chamber";
const COOLING_DEVICE_NAME: &str = "cooling_device";
const SAMPLE_NAME: &str = "sample";
const SUBSTRATE_NAME: &str = "substrate";

// Structure
// entry - definition, title, experiment_description, start_time, end_time, duration
// |---- user / user_1 / user_2 - name, email, role, affiliation, ORCID
// |---- instrument                                  (instrumented layout)
// |    |---- cooling_device - name, model, cooling_mode, temperature
// |    |---- chamber - name, type, description
// |    |    |---- sensor_1..sensor_5 - name, model, measurement, wavelength, value
// |    |    |---- gauge_1, gauge_2 - name, model, measurement, value
// |---- sample - name, thickness
// |    |---- substrate - name, chemical_formula, ...
// |    |---- chamber                                (embedded layout)
// |    |---- layer01, layer02, ... (layer1, layer2, ... when embedded)

/// Copies the values of a NeXus `entry` tree into a GrowthRun.
///
/// Every read is optional. A dataset that is missing leaves the field as None, and a
/// dataset that cannot be read or decoded is logged at debug level and also leaves the
/// field as None. Nothing in here fails.
pub struct Extractor<'a> {
    layout: &'a Layout,
    config: &'a Config,
    logger: &'a Logger,
}

impl<'a> Extractor<'a> {
    pub fn new(config: &'a Config, logger: &'a Logger) -> Self {
        Self {
            layout: config.layout.layout(),
            config,
            logger,
        }
    }

    fn absorb<T>(
        &self,
        group: &NexusGroup,
        name: &str,
        result: Result<Option<T>, FieldError>,
    ) -> Option<T> {
        match result {
            Ok(value) => value,
            Err(e) => {
                spdlog::debug!(
                    logger: self.logger,
                    "Ignoring {}/{}: {e}",
                    group.path(),
                    name
                );
                None
            }
        }
    }

    fn string(&self, group: &NexusGroup, name: &str) -> Option<String> {
        self.absorb(group, name, group.string(name))
    }

    fn float(&self, group: &NexusGroup, name: &str) -> Option<f64> {
        self.absorb(group, name, group.float(name))
    }

    fn integer(&self, group: &NexusGroup, name: &str) -> Option<i64> {
        self.absorb(group, name, group.integer(name))
    }

    fn timestamp(&self, group: &NexusGroup, name: &str) -> Option<OffsetDateTime> {
        self.absorb(group, name, group.timestamp(name))
    }

    /// Read a string and coerce it into one of an enum's declared values
    fn choice<T>(&self, group: &NexusGroup, name: &str) -> Option<T>
    where
        T: FromStr<Err = FieldError>,
    {
        let value = self.string(group, name)?;
        self.absorb(group, name, T::from_str(&value).map(Some))
    }

    /// Fill a GrowthRun from the `entry` group
    pub fn growth_run(&self, entry: &NexusGroup, run: &mut GrowthRun) {
        run.definition = self.string(entry, "definition");
        run.title = self.string(entry, "title");
        run.description = self
            .string(entry, "experiment_description")
            .or_else(|| self.config.missing_description.clone());
        run.start_time = self.timestamp(entry, "start_time");
        run.end_time = self.timestamp(entry, "end_time");
        run.duration = self.float(entry, "duration");

        for name in self.layout.operator_groups {
            if let Some(group) = entry.subgroup(name) {
                run.operators.push(self.operator(&group));
            }
        }

        if self.layout.chamber == ChamberLocation::Instrument {
            if let Some(group) = entry.subgroup(INSTRUMENT_NAME) {
                run.instruments.push(self.instrument(&group));
            }
        }

        if let Some(group) = entry.subgroup(SAMPLE_NAME) {
            run.sample = Some(self.sample(&group));
        }
    }

    pub fn operator(&self, group: &NexusGroup) -> Operator {
        Operator {
            name: self.string(group, "name"),
            role: self.string(group, "role"),
            affiliation: self.string(group, "affiliation"),
            orcid: self.string(group, "ORCID"),
            email: self.string(group, "email"),
        }
    }

    /// The cooling device is a sibling of the chamber inside the instrument group
    pub fn instrument(&self, group: &NexusGroup) -> Instrument {
        let chamber = group.subgroup(CHAMBER_NAME).map(|chamber_group| {
            let mut chamber = self.chamber(&chamber_group);
            chamber.cooling_device = group
                .subgroup(COOLING_DEVICE_NAME)
                .map(|device| self.cooling_device(&device));
            chamber
        });
        Instrument { chamber }
    }

    /// Read a chamber with its sensors and gauges. The cooling device is left to the
    /// caller since where it lives depends on the layout.
    pub fn chamber(&self, group: &NexusGroup) -> GrowthChamber {
        let mut chamber = GrowthChamber {
            model: self.string(group, self.layout.chamber_model_key),
            chamber_type: self.string(group, "type"),
            description: self.string(group, "description"),
            ..Default::default()
        };
        for name in self.layout.sensor_groups {
            if let Some(sensor) = group.subgroup(name) {
                chamber.sensors.push(self.sensor(&sensor));
            }
        }
        for name in self.layout.gauge_groups {
            if let Some(gauge) = group.subgroup(name) {
                chamber.gauges.push(self.gauge(&gauge));
            }
        }
        chamber
    }

    pub fn cooling_device(&self, group: &NexusGroup) -> CoolingDevice {
        CoolingDevice {
            name: self.string(group, "name"),
            model: self.string(group, "model"),
            cooling_mode: self.choice(group, "cooling_mode"),
            temperature: self.float(group, "temperature"),
        }
    }

    /// The unit is not read here; it is resolved by normalization
    pub fn sensor(&self, group: &NexusGroup) -> Sensor {
        Sensor {
            name: self.string(group, "name"),
            model: self.string(group, "model"),
            measurement: self.string(group, "measurement"),
            wavelength: self.float(group, "wavelength"),
            value: self.float(group, "value"),
            unit: None,
        }
    }

    pub fn gauge(&self, group: &NexusGroup) -> Gauge {
        Gauge {
            name: self.string(group, "name"),
            model: self.string(group, "model"),
            measurement: self.string(group, "measurement"),
            value: self.float(group, "value"),
        }
    }

    pub fn sample(&self, group: &NexusGroup) -> SampleAssembly {
        let mut sample = SampleAssembly {
            name: self.string(group, "name"),
            thickness: self.float(group, "thickness"),
            substrate: group
                .subgroup(SUBSTRATE_NAME)
                .map(|substrate| self.substrate(&substrate)),
            ..Default::default()
        };

        if self.layout.chamber == ChamberLocation::Sample {
            sample.chamber = group.subgroup(CHAMBER_NAME).map(|chamber_group| {
                let mut chamber = self.chamber(&chamber_group);
                chamber.cooling_device = chamber_group
                    .subgroup(COOLING_DEVICE_NAME)
                    .map(|device| self.cooling_device(&device));
                chamber
            });
        }

        // Layers are contiguous from 1; the first gap ends the sequence
        let mut index = 1;
        while let Some(layer) = group.subgroup(&self.layout.layer_group_name(index)) {
            sample.layers.push(self.layer(&layer));
            index += 1;
        }

        sample
    }

    pub fn substrate(&self, group: &NexusGroup) -> Substrate {
        let keys = &self.layout.substrate_keys;
        Substrate {
            name: self.string(group, "name"),
            chemical_formula: self.string(group, "chemical_formula"),
            crystallinity: self.choice(group, keys.crystallinity),
            orientation: self.string(group, keys.orientation),
            doping: self.string(group, "doping"),
            diameter: self.integer(group, "diameter"),
            thickness: self.float(group, "thickness"),
            area: self.float(group, "area"),
            flat_convention: self.choice(group, "flat_convention"),
            holder: self.string(group, "holder"),
        }
    }

    pub fn layer(&self, group: &NexusGroup) -> LayerStep {
        let keys = &self.layout.layer_keys;
        LayerStep {
            name: self.string(group, "name"),
            chemical_formula: self.string(group, "chemical_formula"),
            description: self.string(group, "description"),
            doping: self.string(group, "doping"),
            thickness: self.float(group, "thickness"),
            growth_temperature: self.float(group, "growth_temperature"),
            growth_time: self.float(group, "growth_time"),
            growth_rate: self.float(group, "growth_rate"),
            alloy_fraction: self.float(group, "alloy_fraction"),
            rotational_frequency: self.float(group, keys.rotational_frequency),
            rate_ga1: self.float(group, keys.rate_ga1),
            rate_ga2: self.float(group, keys.rate_ga2),
            rate_al: self.float(group, keys.rate_al),
            rate_in: self.float(group, keys.rate_in),
            partial_pressure: self.float(group, "partial_pressure"),
        }
    }
}
