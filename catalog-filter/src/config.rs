use crate::error::ConfigError;
use serde::Deserialize;
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_DEBOUNCE_MS: u64 = 350;
pub const MAX_DEBOUNCE_MS: u64 = 10_000;
pub const DEFAULT_DURATION_SLIDER_MAX: u32 = 60;

/// Tuning knobs of the filter engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Quiet interval after the newest text edit before a query is issued.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Slider reading that means "no duration ceiling".
    #[serde(default = "default_duration_slider_max")]
    pub duration_slider_max: u32,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_duration_slider_max() -> u32 {
    DEFAULT_DURATION_SLIDER_MAX
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            duration_slider_max: default_duration_slider_max(),
        }
    }
}

impl FilterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.debounce_ms == 0 {
            return Err(ConfigError::Invalid(
                "debounce_ms must be > 0".to_string(),
            ));
        }

        if self.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(ConfigError::Invalid(format!(
                "debounce_ms must be <= {MAX_DEBOUNCE_MS}, got {}",
                self.debounce_ms
            )));
        }

        if self.duration_slider_max == 0 {
            return Err(ConfigError::Invalid(
                "duration_slider_max must be > 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
