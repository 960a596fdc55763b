//! # libmbe_nexus
//!
//! libmbe_nexus reads molecular-beam-epitaxy (MBE) growth-run metadata from NeXus
//! (HDF5) files and copies it into the strongly-typed records of an Electronic Lab
//! Notebook (ELN) schema, so a data-management platform can index, display and edit it.
//!
//! ## HDF5
//!
//! HDF5 must be installed before building. Typically this will be installed using a
//! package manager (homebrew, apt, etc), and the Rust libraries will auto detect the
//! location of the HDF install. If a custom install is needed, write the following
//! snippet into the file `.cargo/config.toml`:
//!
//! ```toml
//! [env]
//! HDF5_DIR="/path/to/my/hdf5/install/"
//!
//! [build]
//! rustflags="-C link-args=-Wl,-rpath,/path/to/my/hdf5/install/lib"
//! ```
//!
//! ## Use
//!
//! The host creates an [`schema::EntryArchive`], hands it to
//! [`parser::MbeNexusParser::parse`] together with a logger, and then normalizes the
//! result to resolve sensor units:
//!
//! ```no_run
//! use libmbe_nexus::config::Config;
//! use libmbe_nexus::parser::MbeNexusParser;
//! use libmbe_nexus::schema::EntryArchive;
//! use std::path::Path;
//!
//! let parser = MbeNexusParser::new(Config::default());
//! let mut archive = EntryArchive::default();
//! let logger = spdlog::default_logger();
//! parser.parse(Path::new("growth.nxs"), &mut archive, &logger).unwrap();
//! if let Some(run) = archive.data.as_mut() {
//!     run.normalize(&logger);
//! }
//! ```
//!
//! ## Configuration
//!
//! The YAML format of a configuration file is as follows:
//!
//! ```yml
//! layout: instrumented
//! missing_description: null
//! mainfile_extensions:
//! - nxs
//! mainfile_mime: application/x-hdf5
//! ```
//!
//! `layout` is `instrumented` (the default) or `embedded`. Set `missing_description`
//! to store a placeholder when the file has no `experiment_description`.
//!
//! ### NeXus Data Format
//!
//! The instrumented layout is:
//!
//! ```text
//! growth.nxs
//! entry - definition, title, experiment_description, start_time, end_time, duration
//! |---- user, user_1, user_2 - name, email, role, affiliation, ORCID
//! |---- instrument
//! |    |---- cooling_device - name, model, cooling_mode, temperature
//! |    |---- chamber - name, type, description
//! |    |    |---- sensor_1 .. sensor_5 - name, model, measurement, wavelength, value
//! |    |    |---- gauge_1, gauge_2 - name, model, measurement, value
//! |---- sample - name, thickness
//! |    |---- substrate - name, chemical_formula, crystalline_structure, crystal_orientation,
//! |    |                 doping, diameter, thickness, area, flat_convention, holder
//! |    |---- layer01, layer02, ... - name, chemical_formula, description, doping,
//! |    |                 thickness, growth_temperature, growth_time, growth_rate,
//! |    |                 alloy_fraction, rotational_frequency, partial_pressure,
//! |    |                 partial_growth_rate_Ga1, _Ga2, _Al, _In
//! ```
//!
//! The embedded layout keeps the chamber (with its cooling device, `pyrometer_1`,
//! `pyrometer_2`, `reflectometer_1`, `reflectometer_2` and gauges) under `sample`, reads
//! a single `user`, and numbers layers `layer1`, `layer2`, ... It also uses the older
//! dataset names `crystallinity`, `orientation`, `rotation_velocity` and
//! `evaporation_rate_Ga1`, `_Ga2`, `_Al`, `_In`.
pub mod config;
pub mod eln;
pub mod error;
pub mod extractor;
pub mod layout;
pub mod nexus_reader;
pub mod parser;
pub mod schema;
pub mod units;
