//! Potentiometer reading to keying speed and mode

use crate::config::KeyerConfig;
use crate::hal::Duration;
use crate::types::{ElementTiming, KeyerMode};

/// Result of interpreting one analog reading
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SpeedSetting {
    /// Reading at or above the threshold: straight-key passthrough
    Straight,
    /// Iambic keying at the derived element lengths
    Iambic(ElementTiming),
}

impl SpeedSetting {
    pub const fn mode(&self) -> KeyerMode {
        match self {
            SpeedSetting::Straight => KeyerMode::Straight,
            SpeedSetting::Iambic(_) => KeyerMode::Iambic,
        }
    }

    pub fn timing(&self) -> Option<ElementTiming> {
        match self {
            SpeedSetting::Straight => None,
            SpeedSetting::Iambic(timing) => Some(*timing),
        }
    }
}

/// Linear map of a reading onto the dot length in milliseconds.
///
/// Truncates; no clamping is applied, so readings past `analog_max` keep
/// extending the line.
pub fn dit_length_ms(reading: u16, config: &KeyerConfig) -> u32 {
    let span = config.max_dit_ms - config.min_dit_ms;
    reading as u32 * span / config.analog_max as u32 + config.min_dit_ms
}

/// Derive mode and element timing from a fresh reading.
///
/// Evaluated every cycle without hysteresis.
pub fn derive(reading: u16, config: &KeyerConfig) -> SpeedSetting {
    if reading >= config.mode_threshold {
        return SpeedSetting::Straight;
    }
    let dit = Duration::from_millis(dit_length_ms(reading, config) as u64);
    SpeedSetting::Iambic(ElementTiming::from_dit(dit, config.dit_dah_ratio))
}
