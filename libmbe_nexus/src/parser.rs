use spdlog::Logger;
use std::path::Path;

use super::config::Config;
use super::error::ParseError;
use super::extractor::Extractor;
use super::nexus_reader::NexusGroup;
use super::schema::{EntryArchive, GrowthRun};

const ENTRY_NAME: &str = "entry";

/// The parser the host platform invokes on every matching upload.
///
/// Each call to [`MbeNexusParser::parse`] opens its own file handle and fills the
/// archive it is given, so calls on different files are independent of each other.
#[derive(Debug, Clone, Default)]
pub struct MbeNexusParser {
    config: Config,
}

impl MbeNexusParser {
    pub const NAME: &'static str = "mbe_nexus_parser";

    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Create a parser from a YAML configuration file
    pub fn from_config_file(path: &Path) -> Result<Self, ParseError> {
        Ok(Self::new(Config::read_config_file(path)?))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Does the host consider this upload ours?
    pub fn is_mainfile(&self, path: &Path, mime: &str) -> bool {
        self.config.has_mainfile_extension(path) && mime == self.config.mainfile_mime
    }

    /// Parse a NeXus file into `archive.data`.
    ///
    /// The archive gets a fresh GrowthRun before the `entry` group is looked up, so on
    /// error it may hold a partially populated record. Only structural failures (missing
    /// file, not HDF5, no `entry` group) are errors; field-level problems are absorbed.
    pub fn parse(
        &self,
        mainfile: &Path,
        archive: &mut EntryArchive,
        logger: &Logger,
    ) -> Result<(), ParseError> {
        if !mainfile.exists() {
            return Err(ParseError::BadFilePath(mainfile.to_path_buf()));
        }
        let file_size = std::fs::metadata(mainfile)?.len();
        spdlog::info!(
            logger: logger,
            "{}: Parsing HDF5 file: {} ({})",
            Self::NAME,
            mainfile.display(),
            human_bytes::human_bytes(file_size as f64)
        );

        // Dropped on every return path, closing the file
        let file = hdf5::File::open(mainfile)?;

        let run = archive.data.insert(GrowthRun::default());
        let entry = match file.group(ENTRY_NAME) {
            Ok(group) => NexusGroup::new(group),
            Err(_) => {
                return Err(ParseError::MissingEntry(
                    mainfile.to_path_buf(),
                    ENTRY_NAME,
                ))
            }
        };

        Extractor::new(&self.config, logger).growth_run(&entry, run);

        spdlog::info!(
            logger: logger,
            "HDF5 file {} successfully parsed into {} layers and {} operators.",
            mainfile.display(),
            run.sample.as_ref().map_or(0, |sample| sample.layers.len()),
            run.operators.len()
        );
        Ok(())
    }
}
