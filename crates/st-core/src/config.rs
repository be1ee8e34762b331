//! Station timing configuration.
//!
//! The four durations are immutable once a station is built.  Any external
//! speed scaling is applied before the values get here.
//!
//! ```json
//! {
//!   "main_segment": 25.0,
//!   "platform_segment": 40.0,
//!   "platform_dwell": 50.0,
//!   "crossover": 10.0
//! }
//! ```
//!
//! Missing fields fall back to the defaults above.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// Segment travel and dwell durations, in virtual time units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    /// Travel time over one main-line segment.
    pub main_segment: f64,

    /// Travel time over a platform line used as a through path.
    pub platform_segment: f64,

    /// Time a train stands at a platform (or in the siding).
    pub platform_dwell: f64,

    /// Time to run across a crossover onto another line.
    pub crossover: f64,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            main_segment:     25.0,
            platform_segment: 40.0,
            platform_dwell:   50.0,
            crossover:        10.0,
        }
    }
}

impl StationConfig {
    /// Parse a configuration from JSON text and validate it.
    pub fn from_json_str(text: &str) -> CoreResult<Self> {
        let config: StationConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn load_json(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check that every duration is finite and strictly positive.
    ///
    /// Station construction never calls this; it belongs to whoever loads
    /// the values.
    pub fn validate(&self) -> CoreResult<()> {
        for (name, value) in self.named_durations() {
            if !value.is_finite() || value <= 0.0 {
                return Err(CoreError::Config(format!(
                    "{name} must be a positive, finite duration (got {value})"
                )));
            }
        }
        Ok(())
    }

    fn named_durations(&self) -> [(&'static str, f64); 4] {
        [
            ("main_segment", self.main_segment),
            ("platform_segment", self.platform_segment),
            ("platform_dwell", self.platform_dwell),
            ("crossover", self.crossover),
        ]
    }
}
