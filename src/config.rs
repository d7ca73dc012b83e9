use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::codec::capacity::{DEFAULT_BASE_URL, MAX_URL_BYTES};
use crate::foundation::error::{PinmentError, PinmentResult};

/// Where share URLs point and how long they may get.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShareConfig {
    /// Viewer page the payload is appended to.
    pub base_url: String,
    /// Largest acceptable share URL, in bytes.
    pub max_url_bytes: usize,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            max_url_bytes: MAX_URL_BYTES,
        }
    }
}

impl ShareConfig {
    /// Load from a JSON file. Missing keys keep their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> PinmentResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open share config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| PinmentError::serde(format!("parse share config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings that could never produce a usable URL.
    pub fn validate(&self) -> PinmentResult<()> {
        if url::Url::parse(&self.base_url).is_err() {
            return Err(PinmentError::validation(format!(
                "base_url '{}' is not an absolute URL",
                self.base_url
            )));
        }
        if self.max_url_bytes == 0 {
            return Err(PinmentError::validation("max_url_bytes must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
