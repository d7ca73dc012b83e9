use serde::Serialize;

use crate::foundation::core::{compact_number, compact_opt_number};
use crate::state::version::SCHEMA_VERSION;

/// Closed set of pin categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Copy or wording.
    Text,
    /// Spacing, alignment, sizing.
    Layout,
    /// Something that should be there and is not.
    Missing,
    /// An open question for the page owner.
    Question,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 4] = [
        Category::Text,
        Category::Layout,
        Category::Missing,
        Category::Question,
    ];

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Text => "text",
            Category::Layout => "layout",
            Category::Missing => "missing",
            Category::Question => "question",
        }
    }

    /// Parse a wire name.
    pub fn from_wire(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

/// Coarse device class from the viewport width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DeviceClass {
    /// Width of 1024px or more.
    #[serde(rename = "d")]
    Desktop,
    /// Width in `[768, 1024)`.
    #[serde(rename = "t")]
    Tablet,
    /// Width below 768px.
    #[serde(rename = "m")]
    Mobile,
}

impl DeviceClass {
    /// Classify a viewport width.
    pub fn from_width(width: u32) -> Self {
        if width < 768 {
            DeviceClass::Mobile
        } else if width < 1024 {
            DeviceClass::Tablet
        } else {
            DeviceClass::Desktop
        }
    }

    /// Wire code.
    pub fn code(self) -> &'static str {
        match self {
            DeviceClass::Desktop => "d",
            DeviceClass::Tablet => "t",
            DeviceClass::Mobile => "m",
        }
    }

    /// Parse a wire code.
    pub fn from_code(s: &str) -> Option<Self> {
        match s {
            "d" => Some(DeviceClass::Desktop),
            "t" => Some(DeviceClass::Tablet),
            "m" => Some(DeviceClass::Mobile),
            _ => None,
        }
    }
}

/// Capture environment. Informational only; nothing resolves against it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Env {
    /// `<browser code>/<major version>`, e.g. `C/120`.
    pub ua: String,
    /// Viewport `[width, height]`.
    pub vp: [u32; 2],
    /// Device class.
    pub dt: DeviceClass,
}

/// A reply in a pin's thread.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Reply {
    /// Reply author, if given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Reply body.
    pub text: String,
}

/// One annotation.
///
/// `s`, `ox` and `oy` are either all present (anchored) or all `None` (pixel-only); `fx`/`fy` are
/// always set so the pin can be drawn when its anchor is lost.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Pin {
    /// Unique within a state, assigned by the caller.
    pub id: u64,
    /// Structural locator of the anchor element.
    pub s: Option<String>,
    /// Horizontal ratio inside the anchor's box.
    #[serde(serialize_with = "compact_opt_number")]
    pub ox: Option<f64>,
    /// Vertical ratio inside the anchor's box.
    #[serde(serialize_with = "compact_opt_number")]
    pub oy: Option<f64>,
    /// Fallback page x.
    #[serde(serialize_with = "compact_number")]
    pub fx: f64,
    /// Fallback page y.
    #[serde(serialize_with = "compact_number")]
    pub fy: f64,
    /// Author, possibly empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Comment body, possibly empty.
    pub text: String,
    /// Category tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c: Option<Category>,
    /// Resolved flag; absent means open.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<bool>,
    /// Reply thread, oldest first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replies: Option<Vec<Reply>>,
}

impl Pin {
    /// Whether the pin carries a locator.
    pub fn is_anchored(&self) -> bool {
        self.s.is_some()
    }

    /// Whether the pin was marked resolved.
    pub fn is_resolved(&self) -> bool {
        self.resolved == Some(true)
    }
}

/// A current-version annotation set.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct State {
    /// Schema version, always [`SCHEMA_VERSION`] once validated.
    pub v: u32,
    /// Annotated page, without fragment.
    pub url: String,
    /// Viewport width at capture time.
    pub viewport: u32,
    /// Capture environment, serialized as `null` when unknown.
    pub env: Option<Env>,
    /// Pins in creation order.
    pub pins: Vec<Pin>,
}

impl State {
    /// Empty state for a new session on `url`.
    pub fn new(url: &str, viewport: u32, env: Option<Env>) -> Self {
        Self {
            v: SCHEMA_VERSION,
            url: strip_fragment(url).to_owned(),
            viewport,
            env,
            pins: Vec::new(),
        }
    }

    /// Whether the page is being viewed at a different width than it was annotated at.
    pub fn viewport_mismatch(&self, current_width: u32) -> bool {
        self.viewport != current_width
    }

    /// Id for the next pin: one past the largest id in use.
    pub fn next_pin_id(&self) -> u64 {
        self.pins.iter().map(|p| p.id).max().map_or(1, |id| id + 1)
    }

    /// Number of pins with a locator.
    pub fn anchored_count(&self) -> usize {
        self.pins.iter().filter(|p| p.is_anchored()).count()
    }
}

/// Version 1 state: pins positioned by width ratio and absolute y.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LegacyState {
    /// Annotated page.
    pub url: String,
    /// Viewport width at capture time.
    pub viewport: u32,
    /// Pins.
    pub pins: Vec<LegacyPin>,
}

/// Version 1 pin.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LegacyPin {
    /// Pin id.
    pub id: u64,
    /// Horizontal position as a fraction of the viewport width.
    pub x: f64,
    /// Page y in pixels.
    pub y: f64,
    /// Comment body.
    pub text: String,
    /// Author, if given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

pub(crate) fn strip_fragment(url: &str) -> &str {
    url.split_once('#').map_or(url, |(head, _)| head)
}

#[cfg(test)]
#[path = "../../tests/unit/state/model.rs"]
mod tests;
