use serde_json::Value;
use url::Url;

use crate::codec::compress::{compress_to_fragment, decompress_fragment};
use crate::foundation::error::{PinmentError, PinmentResult};
use crate::state::model::{State, strip_fragment};
use crate::state::validate::validate;

/// Separator between the base URL and the payload.
pub const SHARE_FRAGMENT_MARKER: &str = "#data=";

/// Compact JSON, compressed into a fragment-safe payload.
#[tracing::instrument(level = "debug", skip_all, fields(pins = state.pins.len()))]
pub fn encode(state: &State) -> PinmentResult<String> {
    let json = serde_json::to_string(state)
        .map_err(|e| PinmentError::serde(format!("serialize state: {e}")))?;
    let payload = compress_to_fragment(&json)?;
    tracing::debug!(json_bytes = json.len(), payload_bytes = payload.len(), "encoded state");
    Ok(payload)
}

/// Raw JSON value carried by `payload`, or `None` if it is corrupt.
///
/// The result is not validated; see [`decode_state`].
pub fn decode(payload: &str) -> Option<Value> {
    match try_decode(payload) {
        Ok(raw) => Some(raw),
        Err(e) => {
            tracing::debug!(error = %e, "share payload rejected");
            None
        }
    }
}

fn try_decode(payload: &str) -> PinmentResult<Value> {
    let json = decompress_fragment(payload)?;
    serde_json::from_str(&json).map_err(|e| PinmentError::serde(format!("parse payload JSON: {e}")))
}

/// Decode and validate, migrating legacy states.
pub fn decode_state(payload: &str) -> Option<State> {
    decode(payload).and_then(|raw| validate(&raw))
}

/// `<base_url>#data=<payload>`. A fragment already on `base_url` is replaced.
pub fn to_share_url(state: &State, base_url: &str) -> PinmentResult<String> {
    let payload = encode(state)?;
    Ok(format!(
        "{}{SHARE_FRAGMENT_MARKER}{payload}",
        strip_fragment(base_url)
    ))
}

/// Raw JSON value from a share URL; `None` if the URL does not parse, has no `#data=` fragment,
/// or carries a corrupt payload.
pub fn from_share_url(url: &str) -> Option<Value> {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!(error = %e, "share URL does not parse");
            return None;
        }
    };
    let marker = SHARE_FRAGMENT_MARKER.trim_start_matches('#');
    let Some(payload) = parsed.fragment().and_then(|f| f.strip_prefix(marker)) else {
        tracing::debug!("share URL has no data fragment");
        return None;
    };
    decode(payload)
}

/// [`from_share_url`] followed by validation.
pub fn state_from_share_url(url: &str) -> Option<State> {
    from_share_url(url).and_then(|raw| validate(&raw))
}

#[cfg(test)]
#[path = "../../tests/unit/codec/share.rs"]
mod tests;
