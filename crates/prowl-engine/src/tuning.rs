use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Policy constants for the exploration heuristics.
///
/// These are tunables, not derived values; the algorithms only ever read
/// them from here. Every field has a serde default so a config file can
/// override any subset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    /// Phase-1 scroll increment in pixels.
    #[serde(default = "default_descend_step")]
    pub descend_step: f64,
    /// Phase-2 scroll increment in pixels.
    #[serde(default = "default_scan_step")]
    pub scan_step: f64,
    #[serde(default = "default_descend_delay_ms")]
    pub descend_delay_ms: u64,
    #[serde(default = "default_scan_settle_ms")]
    pub scan_settle_ms: u64,
    #[serde(default = "default_hscroll_settle_ms")]
    pub hscroll_settle_ms: u64,
    #[serde(default = "default_popup_settle_ms")]
    pub popup_settle_ms: u64,
    #[serde(default = "default_viewport_settle_ms")]
    pub viewport_settle_ms: u64,
    /// Extra wait before declaring the bottom reached; lazy loaders often
    /// grow the page right at the end.
    #[serde(default = "default_bottom_confirm_delay_ms")]
    pub bottom_confirm_delay_ms: u64,
    /// Consecutive no-movement scroll attempts tolerated before aborting.
    #[serde(default = "default_stuck_threshold")]
    pub stuck_threshold: u32,
    /// Maximum Input steps per viewport pass.
    #[serde(default = "default_input_budget")]
    pub input_budget: u32,
    /// Horizontal overflow below this many pixels is ignored.
    #[serde(default = "default_hscroll_tolerance")]
    pub hscroll_tolerance: f64,
    /// How far the horizontal probe pushes a region before restoring it.
    #[serde(default = "default_hscroll_offset")]
    pub hscroll_offset: f64,
    #[serde(default = "default_interaction_timeout_ms")]
    pub interaction_timeout_ms: u64,
    /// Click step text is truncated to this many characters.
    #[serde(default = "default_click_text_len")]
    pub click_text_len: usize,
    #[serde(default = "default_fill_value")]
    pub fill_value: String,
    /// Case-insensitive substrings that disqualify a clickable.
    #[serde(default = "default_denylist")]
    pub denylist: Vec<String>,
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            descend_step: default_descend_step(),
            scan_step: default_scan_step(),
            descend_delay_ms: default_descend_delay_ms(),
            scan_settle_ms: default_scan_settle_ms(),
            hscroll_settle_ms: default_hscroll_settle_ms(),
            popup_settle_ms: default_popup_settle_ms(),
            viewport_settle_ms: default_viewport_settle_ms(),
            bottom_confirm_delay_ms: default_bottom_confirm_delay_ms(),
            stuck_threshold: default_stuck_threshold(),
            input_budget: default_input_budget(),
            hscroll_tolerance: default_hscroll_tolerance(),
            hscroll_offset: default_hscroll_offset(),
            interaction_timeout_ms: default_interaction_timeout_ms(),
            click_text_len: default_click_text_len(),
            fill_value: default_fill_value(),
            denylist: default_denylist(),
        }
    }
}

impl Tuning {
    pub fn descend_delay(&self) -> Duration {
        Duration::from_millis(self.descend_delay_ms)
    }

    pub fn scan_settle(&self) -> Duration {
        Duration::from_millis(self.scan_settle_ms)
    }

    pub fn hscroll_settle(&self) -> Duration {
        Duration::from_millis(self.hscroll_settle_ms)
    }

    pub fn popup_settle(&self) -> Duration {
        Duration::from_millis(self.popup_settle_ms)
    }

    pub fn viewport_settle(&self) -> Duration {
        Duration::from_millis(self.viewport_settle_ms)
    }

    pub fn bottom_confirm_delay(&self) -> Duration {
        Duration::from_millis(self.bottom_confirm_delay_ms)
    }

    pub fn interaction_timeout(&self) -> Duration {
        Duration::from_millis(self.interaction_timeout_ms)
    }
}

fn default_descend_step() -> f64 {
    10.0
}

fn default_scan_step() -> f64 {
    20.0
}

fn default_descend_delay_ms() -> u64 {
    50
}

fn default_scan_settle_ms() -> u64 {
    100
}

fn default_hscroll_settle_ms() -> u64 {
    300
}

fn default_popup_settle_ms() -> u64 {
    500
}

fn default_viewport_settle_ms() -> u64 {
    2500
}

fn default_bottom_confirm_delay_ms() -> u64 {
    500
}

fn default_stuck_threshold() -> u32 {
    20
}

fn default_input_budget() -> u32 {
    5
}

fn default_hscroll_tolerance() -> f64 {
    5.0
}

fn default_hscroll_offset() -> f64 {
    150.0
}

fn default_interaction_timeout_ms() -> u64 {
    1000
}

fn default_click_text_len() -> usize {
    20
}

fn default_fill_value() -> String {
    "QA Test".to_string()
}

fn default_denylist() -> Vec<String> {
    ["delete", "탈퇴", "삭제", "logout", "signout", "로그아웃"]
        .into_iter()
        .map(String::from)
        .collect()
}
