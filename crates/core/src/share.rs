//! Share text for the "share earnings" button.

use serde::Serialize;

use crate::types::Credits;

pub const DEFAULT_SHARE_URL: &str = "https://swarm.example/node";

/// How the page should hand the share text to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareMethod {
    /// Platform share sheet.
    Native,
    /// Copy to clipboard; used whenever the share sheet is unavailable.
    Clipboard,
}

impl ShareMethod {
    pub fn choose(native_available: bool) -> Self {
        if native_available {
            ShareMethod::Native
        } else {
            ShareMethod::Clipboard
        }
    }
}

pub fn share_text(total: Credits, url: &str) -> String {
    format!("I've earned {total} SWARM running a node on the compute swarm! Join me: {url}")
}
