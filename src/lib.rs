pub mod config;
pub mod driver;
pub mod engine;
pub mod ffi;
#[cfg(not(target_os = "windows"))]
pub mod loader;

use thiserror::Error;

pub use config::{DriverConfig, DriverOverrides};
pub use driver::{open_backend, run, Builtin, FibBackend};
pub use engine::{Algorithm, ACTIVE, LIBRARY_NAME, VERSION};
#[cfg(not(target_os = "windows"))]
pub use loader::FibLibrary;

#[derive(Error, Debug)]
pub enum FibError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[cfg(not(target_os = "windows"))]
    #[error("Failed to load library {path}: {source}")]
    LibraryLoad {
        path: String,
        source: libloading::Error,
    },

    #[cfg(not(target_os = "windows"))]
    #[error("Symbol `{symbol}` not found: {source}")]
    MissingSymbol {
        symbol: String,
        source: libloading::Error,
    },
}

pub type Result<T> = std::result::Result<T, FibError>;
