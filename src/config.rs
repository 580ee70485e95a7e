use crate::{Algorithm, FibError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings of the driver loop, read from TOML and overridden by CLI flags.
///
/// ```toml
/// library = "target/release/libfibexport.so"
/// start = 0
/// count = 3
/// offset = 21
/// delay_ms = 1000
/// show_info = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriverConfig {
    /// Shared library to load instead of the in-process engine.
    pub library: Option<PathBuf>,
    pub algorithm: Option<Algorithm>,
    pub start: i64,
    pub count: u32,
    /// Added to each input for the `printFib` call.
    pub offset: i64,
    pub delay_ms: u64,
    pub show_info: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            library: None,
            algorithm: None,
            start: 0,
            count: 3,
            offset: 21,
            delay_ms: 1000,
            show_info: false,
        }
    }
}

/// Values given on the command line. `None` and `false` keep what the file
/// (or the default) says.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverOverrides {
    pub library: Option<PathBuf>,
    pub algorithm: Option<Algorithm>,
    pub start: Option<i64>,
    pub count: Option<u32>,
    pub offset: Option<i64>,
    pub delay_ms: Option<u64>,
    pub show_info: bool,
}

impl DriverConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: DriverConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.library.is_some() && self.algorithm.is_some() {
            return Err(FibError::InvalidConfig(
                "`library` and `algorithm` are mutually exclusive".to_string(),
            ));
        }
        Ok(())
    }

    /// Layers command-line values over this config. A `library` or
    /// `algorithm` override replaces whichever of the two the config named.
    pub fn apply_overrides(&mut self, overrides: DriverOverrides) -> Result<()> {
        match (overrides.library, overrides.algorithm) {
            (Some(library), Some(algorithm)) => {
                self.library = Some(library);
                self.algorithm = Some(algorithm);
            }
            (Some(library), None) => {
                self.library = Some(library);
                self.algorithm = None;
            }
            (None, Some(algorithm)) => {
                self.algorithm = Some(algorithm);
                self.library = None;
            }
            (None, None) => {}
        }

        if let Some(start) = overrides.start {
            self.start = start;
        }
        if let Some(count) = overrides.count {
            self.count = count;
        }
        if let Some(offset) = overrides.offset {
            self.offset = offset;
        }
        if let Some(delay_ms) = overrides.delay_ms {
            self.delay_ms = delay_ms;
        }
        self.show_info |= overrides.show_info;

        self.validate()
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}
