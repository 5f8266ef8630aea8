//! Engine configuration and TOML loading.

use crate::alpha::DEFAULT_BACKGROUND;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration file names searched in the working directory.
const CONFIG_CANDIDATES: [&str; 3] = ["imgpress.toml", ".imgpress.toml", ".config/imgpress.toml"];

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for [`EngineConfig`]
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Root engine configuration. Immutable once an engine is built from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Encode `avif` requests natively instead of substituting WebP.
    /// Only takes effect when an AVIF encoder is wired in.
    #[serde(default)]
    pub avif_native_supported: bool,

    /// RGB background used when dropping alpha for JPEG output
    #[serde(default = "default_background")]
    pub flatten_background: [u8; 3],

    #[serde(default)]
    pub defaults: RequestDefaults,

    #[serde(default)]
    pub png: PngConfig,

    #[serde(default)]
    pub avif: AvifConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            avif_native_supported: false,
            flatten_background: default_background(),
            defaults: RequestDefaults::default(),
            png: PngConfig::default(),
            avif: AvifConfig::default(),
        }
    }
}

fn default_background() -> [u8; 3] {
    DEFAULT_BACKGROUND
}

/// Values boundary collaborators use when a caller omits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDefaults {
    #[serde(default = "default_format")]
    pub format: String,

    #[serde(default = "default_quality")]
    pub quality: u32,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            format: default_format(),
            quality: default_quality(),
        }
    }
}

fn default_format() -> String {
    "webp".to_string()
}

fn default_quality() -> u32 {
    80
}

/// oxipng settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PngConfig {
    #[serde(default = "default_true")]
    pub strip_metadata: bool,

    #[serde(default)]
    pub optimize_alpha: bool,
}

impl Default for PngConfig {
    fn default() -> Self {
        Self {
            strip_metadata: true,
            optimize_alpha: false,
        }
    }
}

fn default_true() -> bool {
    true
}

/// ravif settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvifConfig {
    /// 1 (slowest, best) to 10 (fastest)
    #[serde(default = "default_avif_speed")]
    pub speed: u8,
}

impl Default for AvifConfig {
    fn default() -> Self {
        Self {
            speed: default_avif_speed(),
        }
    }
}

fn default_avif_speed() -> u8 {
    6
}

impl EngineConfig {
    /// Load from an explicit path, or the first candidate file that exists,
    /// or fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = path.map(Path::to_path_buf).or_else(find_config_file);

        match config_path {
            Some(p) => {
                tracing::debug!(path = %p.display(), "Loading configuration");
                load_config_file(&p)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|candidate| candidate.exists())
}

fn load_config_file(path: &Path) -> Result<EngineConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    EngineConfig::from_toml_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
