use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::Context;
use serde_json::Value;

use crate::foundation::error::{PinmentError, PinmentResult};
use crate::state::model::State;
use crate::state::validate::{validate, validate_detailed};

/// Pretty-printed JSON for file export.
pub fn to_json(state: &State) -> PinmentResult<String> {
    serde_json::to_string_pretty(state)
        .map_err(|e| PinmentError::serde(format!("serialize state JSON: {e}")))
}

/// Parse and validate an exported file's contents; `None` on any problem.
pub fn from_json(text: &str) -> Option<State> {
    match serde_json::from_str::<Value>(text) {
        Ok(raw) => validate(&raw),
        Err(e) => {
            tracing::debug!(error = %e, "state JSON does not parse");
            None
        }
    }
}

/// Parse and validate state JSON from a reader, keeping the reason on failure.
pub fn read_json_reader<R: Read>(r: R) -> PinmentResult<State> {
    let raw: Value = serde_json::from_reader(r)
        .map_err(|e| PinmentError::serde(format!("parse state JSON: {e}")))?;
    Ok(validate_detailed(&raw)?)
}

/// [`read_json_reader`] on a file.
pub fn read_json_path(path: impl AsRef<Path>) -> PinmentResult<State> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open state JSON '{}'", path.display()))?;
    read_json_reader(BufReader::new(f))
}

/// Write `state` as pretty JSON, replacing `path`.
pub fn write_json_path(path: impl AsRef<Path>, state: &State) -> PinmentResult<()> {
    let path = path.as_ref();
    let mut text = to_json(state)?;
    text.push('\n');
    std::fs::write(path, text).with_context(|| format!("write state JSON '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/codec/json.rs"]
mod tests;
