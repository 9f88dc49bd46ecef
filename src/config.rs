use embassy_time::Duration;

use crate::error::ConfigError;
use crate::gravity::Thresholds;
use crate::mode::PressThresholds;

// --- CONFIGURATION CONSTANTS ---
pub const GRID_SIZE: usize = 8;
/// Grains in the glass. The drop interval assumes exactly this many transfers per run.
pub const GRAIN_COUNT: usize = 60;

// Resting samples are about 260/330/400 for -1g/0g/+1g.
pub const ACC_THRESHOLD_LOW: i32 = 282;
pub const ACC_THRESHOLD_HIGH: i32 = 348;

// How the matrices are mounted relative to the sensor.
pub const ROTATION_OFFSET: u16 = 90;

pub const FRAME_MS: u64 = 100;
pub const CONFIG_POLL_MS: u64 = 10;
pub const FIRST_DROP_MS: u64 = 1000;
pub const DEBOUNCE_MS: u64 = 30;
pub const SHORT_PRESS_MIN_MS: u64 = 30;
pub const SHORT_PRESS_MAX_MS: u64 = 600;
pub const COMMIT_PRESS_MS: u64 = 1500;
pub const BLINK_PERIOD_MS: u64 = 1000;
pub const RUN_INTENSITY: u8 = 1;

/// Total run times offered by the duration selector, in seconds.
pub const PRESET_SECONDS: [u32; 5] = [30, 60, 120, 300, 600];
pub const DEFAULT_PRESET: usize = 1;

/// Everything tunable about the hourglass. `Default` gives the shipped behaviour.
#[derive(Clone, Debug)]
pub struct Config {
    pub thresholds: Thresholds,
    pub rotation_offset: u16,
    pub frame_period: Duration,
    /// Polling period while the duration selector is open.
    pub config_poll_period: Duration,
    pub first_drop_delay: Duration,
    pub debounce: Duration,
    pub press: PressThresholds,
    pub blink_period: Duration,
    pub run_intensity: u8,
    pub presets: &'static [u32],
    pub default_preset: usize,
    /// Clear the "already sounded" flag when the selector resets the glass.
    pub rearm_alarm_on_reset: bool,
    /// Log both matrices at debug level after every frame.
    pub debug_dump: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::new(ACC_THRESHOLD_LOW, ACC_THRESHOLD_HIGH),
            rotation_offset: ROTATION_OFFSET,
            frame_period: Duration::from_millis(FRAME_MS),
            config_poll_period: Duration::from_millis(CONFIG_POLL_MS),
            first_drop_delay: Duration::from_millis(FIRST_DROP_MS),
            debounce: Duration::from_millis(DEBOUNCE_MS),
            press: PressThresholds {
                short_min: Duration::from_millis(SHORT_PRESS_MIN_MS),
                short_max: Duration::from_millis(SHORT_PRESS_MAX_MS),
                commit: Duration::from_millis(COMMIT_PRESS_MS),
            },
            blink_period: Duration::from_millis(BLINK_PERIOD_MS),
            run_intensity: RUN_INTENSITY,
            presets: &PRESET_SECONDS,
            default_preset: DEFAULT_PRESET,
            rearm_alarm_on_reset: true,
            debug_dump: false,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thresholds.low > self.thresholds.high {
            return Err(ConfigError::InvertedThresholds {
                low: self.thresholds.low,
                high: self.thresholds.high,
            });
        }
        if self.frame_period == Duration::from_ticks(0)
            || self.config_poll_period == Duration::from_ticks(0)
        {
            return Err(ConfigError::ZeroFramePeriod);
        }
        if self.presets.is_empty() {
            return Err(ConfigError::EmptyPresets);
        }
        if let Some(index) = self.presets.iter().position(|&secs| secs == 0) {
            return Err(ConfigError::ZeroPreset(index));
        }
        if self.default_preset >= self.presets.len() {
            return Err(ConfigError::DefaultPresetOutOfRange {
                index: self.default_preset,
                len: self.presets.len(),
            });
        }
        if self.press.short_min > self.press.short_max {
            return Err(ConfigError::PressBandInverted);
        }
        if self.press.short_max >= self.press.commit {
            return Err(ConfigError::PressBandOverlapsCommit);
        }
        Ok(())
    }
}
