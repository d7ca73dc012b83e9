use crate::foundation::core::round_px;
use crate::state::model::{LegacyPin, LegacyState, Pin, State};
use crate::state::version::SCHEMA_VERSION;

/// Upgrade a version 1 state.
///
/// Version 1 pins carry no anchor, so every migrated pin is pixel-only: `x` was a fraction of the
/// capture width and becomes `round(x * viewport)`, `y` was already in page pixels. The
/// environment was never recorded and stays unknown.
pub fn migrate_v1_to_v2(legacy: LegacyState) -> State {
    let viewport = f64::from(legacy.viewport);
    State {
        v: SCHEMA_VERSION,
        url: legacy.url,
        viewport: legacy.viewport,
        env: None,
        pins: legacy
            .pins
            .into_iter()
            .map(|pin| migrate_pin(pin, viewport))
            .collect(),
    }
}

fn migrate_pin(pin: LegacyPin, viewport: f64) -> Pin {
    Pin {
        id: pin.id,
        s: None,
        ox: None,
        oy: None,
        fx: round_px(pin.x * viewport),
        fy: pin.y,
        author: Some(pin.author.unwrap_or_default()),
        text: pin.text,
        c: None,
        resolved: None,
        replies: None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/migrate.rs"]
mod tests;
