//! Per-cycle keyer controller: speed derivation, keying, tone output

use crate::config::KeyerConfig;
use crate::fsm::IambicKeyer;
use crate::hal::{HalError, KeyerHal};
use crate::speed::{self, SpeedSetting};
use crate::types::{KeyerMode, KeyerState, PaddleState, Tone};

/// Straight-key passthrough: tone follows either paddle
pub const fn straight_tone(paddles: PaddleState) -> Tone {
    if paddles.any_pressed() {
        Tone::On
    } else {
        Tone::Off
    }
}

/// What one cycle did
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleOutcome {
    /// Mode selected by this cycle's reading
    pub mode: KeyerMode,
    /// Tone command asserted
    pub tone: Tone,
    /// FSM state after the cycle
    pub state: KeyerState,
}

/// Keyer bound to a HAL instance
pub struct Keyer<H> {
    hal: H,
    config: KeyerConfig,
    fsm: IambicKeyer,
    mode: Option<KeyerMode>,
}

impl<H> Keyer<H>
where
    H: KeyerHal,
{
    /// Bind a HAL to a configuration. The configuration is validated here so
    /// that no cycle can run on an envelope the speed mapping cannot handle.
    pub fn new(hal: H, config: KeyerConfig) -> Result<Self, HalError> {
        Ok(Self {
            hal,
            config: Self::checked(config)?,
            fsm: IambicKeyer::new(),
            mode: None,
        })
    }

    fn checked(config: KeyerConfig) -> Result<KeyerConfig, HalError> {
        config.validate().map_err(|_reason| {
            #[cfg(feature = "defmt")]
            defmt::warn!("Rejected keyer config: {}", _reason);
            HalError::InvalidConfig
        })
    }

    /// Run one control cycle: read inputs, derive speed, step, drive output.
    ///
    /// On a HAL error the tone is forced off (best effort) before the error
    /// is returned.
    pub fn cycle(&mut self) -> Result<CycleOutcome, H::Error> {
        match self.try_cycle() {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                let _ = self.hal.set_tone(false, self.config.tone_frequency_hz);
                Err(err)
            }
        }
    }

    fn try_cycle(&mut self) -> Result<CycleOutcome, H::Error> {
        let reading = self.hal.read_speed()?;
        let setting = speed::derive(reading, &self.config);
        self.track_mode(setting.mode(), reading);

        let paddles = self.hal.read_paddles()?;
        let tone = match setting {
            SpeedSetting::Straight => straight_tone(paddles),
            SpeedSetting::Iambic(timing) => {
                let now = self.hal.now();
                self.fsm.step(paddles, now, timing)
            }
        };
        self.hal.set_tone(tone.is_on(), self.config.tone_frequency_hz)?;

        Ok(CycleOutcome {
            mode: setting.mode(),
            tone,
            state: self.fsm.current_state(),
        })
    }

    fn track_mode(&mut self, mode: KeyerMode, _reading: u16) {
        if self.mode != Some(mode) {
            #[cfg(feature = "defmt")]
            defmt::info!("Mode {} (reading {})", mode, _reading);
            self.mode = Some(mode);
        }
    }

    /// Poll forever. Failed cycles are logged and polling continues.
    pub fn run(&mut self) -> ! {
        loop {
            if self.cycle().is_err() {
                #[cfg(feature = "defmt")]
                defmt::warn!("Keyer cycle failed, tone forced off");
            }
        }
    }

    /// Mode chosen by the most recent cycle
    pub fn mode(&self) -> Option<KeyerMode> {
        self.mode
    }

    pub fn fsm(&self) -> &IambicKeyer {
        &self.fsm
    }

    /// Get current configuration
    pub fn config(&self) -> &KeyerConfig {
        &self.config
    }

    /// Update configuration; keying state is kept. An invalid configuration
    /// is rejected and the current one stays in force.
    pub fn set_config(&mut self, config: KeyerConfig) -> Result<(), HalError> {
        self.config = Self::checked(config)?;
        Ok(())
    }

    pub fn hal(&self) -> &H {
        &self.hal
    }

    pub fn hal_mut(&mut self) -> &mut H {
        &mut self.hal
    }

    pub fn into_hal(self) -> H {
        self.hal
    }
}
