//! Pinment anchors review comments ("pins") to elements of a web page and carries a whole set of
//! them between page loads in a share URL or a JSON file.
//!
//! The crate has two halves:
//!
//! - Anchoring: [`synthesize`] a structural locator for the element under a click,
//!   [`compute_anchor`] to capture the click, and [`resolve`] to find the pin again after the page
//!   has reflowed, falling back to stored page pixels when the element is gone.
//! - State: the versioned [`State`] model, [`validate`] (with migration from version 1),
//!   and the codecs behind [`to_share_url`], [`state_from_share_url`], [`to_json`] and
//!   [`from_json`], plus a [`capacity_report`] against the URL budget.
//!
//! Page access goes through the [`Document`] and [`Viewport`] traits; [`StaticDocument`] is an
//! in-memory implementation.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Click-to-anchor and anchor-to-position.
pub mod anchor;
/// Share URL and JSON file codecs.
pub mod codec;
/// Share settings.
pub mod config;
/// Document traits and the in-memory document.
pub mod dom;
/// Geometry helpers and errors.
pub mod foundation;
/// Locator grammar, matching and synthesis.
pub mod locator;
/// Versioned annotation state.
pub mod state;

pub use crate::foundation::core::{Point, Rect, Vec2};
pub use crate::foundation::error::{PinmentError, PinmentResult};

pub use crate::anchor::calculator::{AnchorData, OverlaySuppression, compute_anchor};
pub use crate::anchor::resolver::{
    Marker, PinMarker, Placement, ResolvedPin, reposition, resolve, resolve_all,
};
pub use crate::codec::capacity::{
    CapacityReport, DEFAULT_BASE_URL, MAX_URL_BYTES, capacity_report, estimate_bytes,
};
pub use crate::codec::json::{from_json, read_json_path, to_json, write_json_path};
pub use crate::codec::share::{
    decode, decode_state, encode, from_share_url, state_from_share_url, to_share_url,
};
pub use crate::config::ShareConfig;
pub use crate::dom::document::{Document, Viewport};
pub use crate::dom::tree::{Element, NodeId, StaticDocument};
pub use crate::locator::synth::{synthesize, validate_locator};
pub use crate::state::model::{Category, DeviceClass, Env, Pin, Reply, State};
pub use crate::state::validate::{SchemaError, SchemaErrors, validate, validate_detailed};
pub use crate::state::version::{SCHEMA_VERSION, SchemaVersion, VersionedState};
