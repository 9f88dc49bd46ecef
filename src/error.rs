//! Configuration errors.
//!
//! The running hourglass has no recoverable failures: bad sensor reads degrade to "no
//! gravity" for a frame. Only a malformed [`Config`](crate::Config) is refused up front.

use core::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// No run durations to choose from.
    EmptyPresets,
    /// A preset of zero seconds would make grains drop continuously.
    ZeroPreset(usize),
    DefaultPresetOutOfRange { index: usize, len: usize },
    /// The deadzone's lower bound sits above its upper bound.
    InvertedThresholds { low: i32, high: i32 },
    PressBandInverted,
    /// The short-press band reaches the commit threshold.
    PressBandOverlapsCommit,
    ZeroFramePeriod,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyPresets => write!(f, "at least one run duration is required"),
            ConfigError::ZeroPreset(index) => write!(f, "run duration #{} is zero", index),
            ConfigError::DefaultPresetOutOfRange { index, len } => write!(
                f,
                "default run duration #{} is out of range for {} presets",
                index, len
            ),
            ConfigError::InvertedThresholds { low, high } => write!(
                f,
                "tilt threshold low ({}) must not exceed high ({})",
                low, high
            ),
            ConfigError::PressBandInverted => {
                write!(f, "short press minimum exceeds its maximum")
            }
            ConfigError::PressBandOverlapsCommit => {
                write!(f, "short press band must end below the commit threshold")
            }
            ConfigError::ZeroFramePeriod => write!(f, "frame and poll periods must be non-zero"),
        }
    }
}

impl core::error::Error for ConfigError {}
