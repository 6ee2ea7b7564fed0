//! Device behaviour constants and the configuration built from them

/// Dash length as a multiple of the dot length
pub const DIT_DAH_RATIO: u32 = 3;

/// Sidetone frequency in Hz
pub const TONE_FREQUENCY_HZ: f32 = 746.25;

/// Dot length in ms with the potentiometer at its low end
pub const MIN_DIT_MS: u32 = 35;

/// Dot length in ms with the potentiometer at full scale
pub const MAX_DIT_MS: u32 = 100;

/// Analog readings at or above this select straight-key mode
pub const MODE_THRESHOLD: u16 = 1000;

/// Full-scale analog reading (10-bit converter)
pub const ANALOG_MAX: u16 = 1023;

/// Keyer configuration parameters
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KeyerConfig {
    /// Dot:dash duration ratio
    pub dit_dah_ratio: u32,
    /// Sidetone frequency
    pub tone_frequency_hz: f32,
    /// Dot length at reading 0
    pub min_dit_ms: u32,
    /// Dot length at full-scale reading
    pub max_dit_ms: u32,
    /// Straight-key threshold on the analog range
    pub mode_threshold: u16,
    /// Full-scale analog reading
    pub analog_max: u16,
}

impl Default for KeyerConfig {
    fn default() -> Self {
        Self {
            dit_dah_ratio: DIT_DAH_RATIO,
            tone_frequency_hz: TONE_FREQUENCY_HZ,
            min_dit_ms: MIN_DIT_MS,
            max_dit_ms: MAX_DIT_MS,
            mode_threshold: MODE_THRESHOLD,
            analog_max: ANALOG_MAX,
        }
    }
}

impl KeyerConfig {
    /// Create a new configuration with validation
    pub fn new(
        dit_dah_ratio: u32,
        tone_frequency_hz: f32,
        min_dit_ms: u32,
        max_dit_ms: u32,
        mode_threshold: u16,
        analog_max: u16,
    ) -> Result<Self, &'static str> {
        Self {
            dit_dah_ratio,
            tone_frequency_hz,
            min_dit_ms,
            max_dit_ms,
            mode_threshold,
            analog_max,
        }
        .validate()
    }

    /// Check the parameter envelope, returning the config unchanged if valid
    pub fn validate(self) -> Result<Self, &'static str> {
        if self.dit_dah_ratio == 0 {
            return Err("Dit:dah ratio must be at least 1");
        }
        if !(self.tone_frequency_hz > 0.0) {
            return Err("Tone frequency must be positive");
        }
        if self.min_dit_ms == 0 {
            return Err("Minimum dit length must be non-zero");
        }
        if self.min_dit_ms > self.max_dit_ms {
            return Err("Minimum dit length exceeds maximum");
        }
        if self.analog_max == 0 {
            return Err("Analog full scale must be non-zero");
        }
        Ok(self)
    }

    pub fn with_ratio(mut self, ratio: u32) -> Self {
        self.dit_dah_ratio = ratio;
        self
    }

    pub fn with_tone_frequency(mut self, hz: f32) -> Self {
        self.tone_frequency_hz = hz;
        self
    }

    pub fn with_dit_range(mut self, min_ms: u32, max_ms: u32) -> Self {
        self.min_dit_ms = min_ms;
        self.max_dit_ms = max_ms;
        self
    }

    pub fn with_mode_threshold(mut self, threshold: u16) -> Self {
        self.mode_threshold = threshold;
        self
    }

    pub fn with_analog_max(mut self, analog_max: u16) -> Self {
        self.analog_max = analog_max;
        self
    }
}
