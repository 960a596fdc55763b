use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FieldError {
    #[error("Field could not be read due to HDF5 error: {0}")]
    HDF5Error(#[from] hdf5::Error),
    #[error("Field is stored as {0}, which is not a string type")]
    NotAString(String),
    #[error("Field contains bytes which are not valid UTF-8: {0}")]
    BadEncoding(#[from] std::str::Utf8Error),
    #[error("Field could not be parsed as an ISO-8601 timestamp: {0}")]
    BadTimestamp(#[from] time::error::Parse),
    #[error("Field value {0} is not an integer that fits in 64 bits")]
    NotAnInteger(f64),
    #[error("Fixed-length string of {0} bytes exceeds the largest supported length")]
    StringTooLong(usize),
    #[error("Field value {value:?} is not one of the allowed values for {kind}")]
    BadEnumValue { value: String, kind: &'static str },
}

#[derive(Debug, Clone, Error)]
pub enum UnitError {
    #[error("Unit {unit} cannot be applied to non-finite value {value}")]
    NonFinite { value: f64, unit: &'static str },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Config failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Config failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Could not parse NeXus file because file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Parser failed due to HDF5 error: {0}")]
    HDF5Error(#[from] hdf5::Error),
    #[error("NeXus file {0:?} has no '{1}' group")]
    MissingEntry(PathBuf, &'static str),
    #[error("Parser failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Parser failed due to Config error: {0}")]
    ConfigError(#[from] ConfigError),
}
