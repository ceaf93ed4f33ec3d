//! Runtime configuration and the crate error type.

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("invalid state: {0}")]
    InvalidState(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Video standard. Decides lines per frame, V30 availability and the
/// PAL status bit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    #[default]
    Ntsc,
    Pal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub region: Region,
    /// Drop sprites past the hardware per-line limit and raise the
    /// overflow flag.
    pub sprite_limits: bool,
    /// Warn when the main CPU touches sound RAM without holding the bus.
    pub log_refused_z80_access: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: Region::Ntsc,
            sprite_limits: true,
            log_refused_z80_access: true,
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
