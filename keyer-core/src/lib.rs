#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! # Keyer Core
//!
//! Polled iambic paddle keyer for embedded systems.
//! Turns paddle contacts and a speed potentiometer into timed tone on/off
//! intervals, with a straight-key passthrough above the mode threshold.

pub mod types;
pub mod config;
pub mod speed;
pub mod fsm;
pub mod controller;
pub mod hal;

#[cfg(feature = "test-utils")]
pub mod test_utils;


pub use types::*;
pub use config::*;
pub use speed::{derive as derive_speed, SpeedSetting};
pub use fsm::*;
pub use controller::*;
pub use hal::{*, Instant, Duration};

/// Keyer library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration: 3:1 ratio, 746.25 Hz, 35-100 ms dots, straight
/// mode from reading 1000
pub fn default_config() -> KeyerConfig {
    KeyerConfig::default()
}
