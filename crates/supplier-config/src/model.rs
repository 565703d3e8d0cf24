use serde::{de::Deserializer, Deserialize, Serialize};
use std::time::Duration;

const PAGE_SIZES: [usize; 3] = [10, 25, 50];

/// Stores user-configurable desk preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Rows per page on the list screen. Only 10, 25 and 50 are honoured.
    #[serde(
        default = "Config::default_page_size_value",
        deserialize_with = "deserialize_page_size"
    )]
    pub default_page_size: usize,
    /// Also require the corporate id to be all digits.
    #[serde(default)]
    pub strict_corporate_id: bool,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default = "Config::default_saved_banner_ms")]
    pub saved_banner_ms: u64,
    #[serde(default)]
    pub latency: LatencySettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_page_size: Self::default_page_size_value(),
            strict_corporate_id: false,
            ui_color_enabled: Self::default_ui_color_enabled(),
            saved_banner_ms: Self::default_saved_banner_ms(),
            latency: LatencySettings::default(),
        }
    }
}

impl Config {
    pub fn default_page_size_value() -> usize {
        PAGE_SIZES[0]
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_saved_banner_ms() -> u64 {
        3000
    }

    pub fn saved_banner(&self) -> Duration {
        Duration::from_millis(self.saved_banner_ms)
    }
}

/// Simulated round-trip time per gateway operation, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencySettings {
    pub save_draft_ms: u64,
    pub submit_ms: u64,
    pub update_ms: u64,
    pub search_ms: u64,
    pub list_ms: u64,
}

impl Default for LatencySettings {
    fn default() -> Self {
        Self {
            save_draft_ms: 1000,
            submit_ms: 2000,
            update_ms: 1500,
            search_ms: 1500,
            list_ms: 1000,
        }
    }
}

impl LatencySettings {
    /// No simulated delay at all.
    pub fn instant() -> Self {
        Self {
            save_draft_ms: 0,
            submit_ms: 0,
            update_ms: 0,
            search_ms: 0,
            list_ms: 0,
        }
    }
}

fn deserialize_page_size<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<usize>::deserialize(deserializer)?;
    Ok(value
        .filter(|size| PAGE_SIZES.contains(size))
        .unwrap_or_else(Config::default_page_size_value))
}
