//! Host-side harness for whole-keyer simulations

use keyer_core::test_utils::output_capture::ToneInterval;
use keyer_core::test_utils::paddle_simulator::PaddleScript;
use keyer_core::test_utils::simulated_hal::{simulate, SimulatedHal};
use keyer_core::{derive_speed, ElementTiming, HalError, Keyer, KeyerConfig};

#[cfg(test)]
mod timing_tests;

/// Pot reading giving a 50 ms dot with the default configuration
/// (240 * 65 / 1023 = 15.2, truncated, + 35)
pub const READING_DIT_50: u16 = 240;

/// Result of running a script through a keyer
pub struct Run {
    pub keyer: Keyer<SimulatedHal>,
    pub timing: Option<ElementTiming>,
}

impl Run {
    pub fn intervals(&self) -> &[ToneInterval] {
        self.keyer.hal().capture.intervals()
    }

    pub fn gaps(&self) -> heapless::Vec<u64, 128> {
        self.keyer.hal().capture.gaps()
    }

    /// Dots and dashes sounded, classified against the run's timing
    pub fn morse(&self) -> heapless::String<128> {
        match &self.timing {
            Some(timing) => self.keyer.hal().capture.to_morse_string(timing),
            None => heapless::String::new(),
        }
    }
}

/// Build a keyer on a simulated HAL
pub fn keyer_with(
    script: PaddleScript,
    reading: u16,
    config: KeyerConfig,
) -> Result<Keyer<SimulatedHal>, HalError> {
    Keyer::new(SimulatedHal::new(script, reading), config)
}

/// Run `script` at 1 ms cycles up to `until_ms`
pub fn run_script(script: PaddleScript, reading: u16, until_ms: u64) -> Result<Run, HalError> {
    run_script_with(script, reading, KeyerConfig::default(), until_ms, 1)
}

pub fn run_script_with(
    script: PaddleScript,
    reading: u16,
    config: KeyerConfig,
    until_ms: u64,
    step_ms: u64,
) -> Result<Run, HalError> {
    let timing = derive_speed(reading, &config).timing();
    let mut keyer = keyer_with(script, reading, config)?;
    simulate(&mut keyer, until_ms, step_ms)?;
    keyer.hal_mut().capture.finish(until_ms);
    Ok(Run { keyer, timing })
}
