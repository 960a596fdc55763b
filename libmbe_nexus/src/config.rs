use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::ConfigError;
use super::layout::LayoutKind;

/// Structure representing the parser configuration.
/// Configs are seralizable and deserializable to YAML using serde and serde_yaml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutKind,
    pub missing_description: Option<String>,
    pub mainfile_extensions: Vec<String>,
    pub mainfile_mime: String,
}

impl Default for Config {
    /// Generate a new Config for the instrumented layout. Missing descriptions stay empty.
    fn default() -> Self {
        Self {
            layout: LayoutKind::Instrumented,
            missing_description: None,
            mainfile_extensions: vec![String::from("nxs")],
            mainfile_mime: String::from("application/x-hdf5"),
        }
    }
}

impl Config {
    /// Read the configuration in a YAML file
    /// Returns a Config if successful
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;

        Ok(serde_yaml::from_str::<Self>(&yaml_str)?)
    }

    /// Check a file name against the configured extensions (case-insensitive)
    pub fn has_mainfile_extension(&self, path: &Path) -> bool {
        match path.extension() {
            Some(ext) => {
                let ext = ext.to_string_lossy();
                self.mainfile_extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(&ext))
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_yaml_round_trip() {
        let config = Config {
            layout: LayoutKind::Embedded,
            missing_description: Some(String::from("No description provided")),
            ..Default::default()
        };
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("layout: embedded"));
        assert_eq!(serde_yaml::from_str::<Config>(&yaml).unwrap(), config);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("layout: embedded\n").unwrap();
        assert_eq!(config.layout, LayoutKind::Embedded);
        assert_eq!(config.mainfile_mime, "application/x-hdf5");
        assert_eq!(config.missing_description, None);
    }

    #[test]
    fn test_missing_config_file() {
        let path = PathBuf::from("/definitely/not/here.yml");
        match Config::read_config_file(&path) {
            Err(ConfigError::BadFilePath(p)) => assert_eq!(p, path),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_mainfile_extension() {
        let config = Config::default();
        assert!(config.has_mainfile_extension(Path::new("/data/run_12.nxs")));
        assert!(config.has_mainfile_extension(Path::new("RUN.NXS")));
        assert!(!config.has_mainfile_extension(Path::new("run.h5")));
        assert!(!config.has_mainfile_extension(Path::new("nxs")));
    }
}
