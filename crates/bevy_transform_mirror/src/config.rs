use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::delayed_mirror::ConfigurationFault;

/// How long a snapshot waits before it is applied.
///
/// Stored as a [`Duration`] so that due checks are exact on frame timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct DelayWindow(Duration);

impl DelayWindow {
    pub const DEFAULT: Duration = Duration::from_secs(2);
    pub const ZERO: Self = Self(Duration::ZERO);

    /// Fails on negative, non-finite or overflowing durations.
    pub fn from_secs(seconds: f64) -> Result<Self, ConfigurationFault> {
        Duration::try_from_secs_f64(seconds)
            .map(Self)
            .map_err(|_| ConfigurationFault::InvalidDelay(seconds))
    }

    pub fn as_secs(&self) -> f64 {
        self.0.as_secs_f64()
    }

    /// Whether something captured at `captured_at` is due at `now`.
    pub fn has_elapsed(&self, captured_at: Duration, now: Duration) -> bool {
        now.saturating_sub(captured_at) >= self.0
    }
}

impl Default for DelayWindow {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<f64> for DelayWindow {
    type Error = ConfigurationFault;

    fn try_from(seconds: f64) -> Result<Self, Self::Error> {
        Self::from_secs(seconds)
    }
}

impl From<DelayWindow> for f64 {
    fn from(delay: DelayWindow) -> Self {
        delay.as_secs()
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    pub delay: DelayWindow,
    /// Applies to the root and every pair alike.
    pub mirror_scale: bool,
}
