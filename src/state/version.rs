use serde_json::Value;

use crate::state::migrate::migrate_v1_to_v2;
use crate::state::model::{LegacyState, State};

/// Version written by this crate.
pub const SCHEMA_VERSION: u32 = 2;

/// Oldest version still accepted; always migrated on load.
pub const LEGACY_SCHEMA_VERSION: u32 = 1;

/// Known schema versions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SchemaVersion {
    /// Ratio/absolute pins, no anchors.
    V1,
    /// Anchored pins with pixel fallback.
    V2,
}

impl SchemaVersion {
    /// Version number as written in `v`.
    pub fn number(self) -> u32 {
        match self {
            SchemaVersion::V1 => LEGACY_SCHEMA_VERSION,
            SchemaVersion::V2 => SCHEMA_VERSION,
        }
    }

    /// Read the `v` field of a raw state. `1.0` and `1` are the same version.
    pub fn from_value(v: &Value) -> Option<Self> {
        let n = v.as_f64()?;
        if n == f64::from(LEGACY_SCHEMA_VERSION) {
            Some(SchemaVersion::V1)
        } else if n == f64::from(SCHEMA_VERSION) {
            Some(SchemaVersion::V2)
        } else {
            None
        }
    }
}

/// A validated state in whichever version it arrived.
#[derive(Clone, Debug, PartialEq)]
pub enum VersionedState {
    /// Version 1 input, not yet migrated.
    Legacy(LegacyState),
    /// Current-version input.
    Current(State),
}

impl VersionedState {
    /// Version the input was written in.
    pub fn version(&self) -> SchemaVersion {
        match self {
            VersionedState::Legacy(_) => SchemaVersion::V1,
            VersionedState::Current(_) => SchemaVersion::V2,
        }
    }

    /// Migrate to the current version if needed.
    pub fn into_current(self) -> State {
        match self {
            VersionedState::Legacy(legacy) => {
                tracing::debug!(pins = legacy.pins.len(), "migrating v1 state");
                migrate_v1_to_v2(legacy)
            }
            VersionedState::Current(state) => state,
        }
    }
}
