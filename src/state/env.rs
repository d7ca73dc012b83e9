use std::sync::LazyLock;

use regex::Regex;

use crate::state::model::{DeviceClass, Env};

static EDGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Edg/(\d+)").expect("valid regex"));
static CHROME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Chrome/(\d+)").expect("valid regex"));
static FIREFOX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Firefox/(\d+)").expect("valid regex"));
static SAFARI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Version/(\d+).*Safari").expect("valid regex"));

/// Other or unrecognised browser.
pub const UNKNOWN_BROWSER: &str = "O";

impl Env {
    /// Summarise a user agent string and viewport size.
    ///
    /// Edge also advertises Chrome, and Chrome also advertises Safari, so the order of the checks
    /// matters.
    pub fn detect(user_agent: &str, width: u32, height: u32) -> Self {
        let browsers: [(&str, &Regex); 4] = [
            ("E", &*EDGE_RE),
            ("C", &*CHROME_RE),
            ("F", &*FIREFOX_RE),
            ("S", &*SAFARI_RE),
        ];
        let (code, version) = browsers
            .into_iter()
            .find_map(|(code, re)| {
                re.captures(user_agent)
                    .and_then(|caps| caps.get(1))
                    .map(|m| (code, m.as_str()))
            })
            .unwrap_or((UNKNOWN_BROWSER, ""));

        Self {
            ua: format!("{code}/{version}"),
            vp: [width, height],
            dt: DeviceClass::from_width(width),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/env.rs"]
mod tests;
