//! Hardware Abstraction Layer for keyer implementation

// Re-export time types based on feature
#[cfg(feature = "embassy-time")]
pub use embassy_time::{Duration, Instant};

#[cfg(not(feature = "embassy-time"))]
pub use self::mock_time::{Duration, Instant};

#[cfg(not(feature = "embassy-time"))]
mod mock_time {
    /// Millisecond instant used when embassy-time is not linked
    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Instant(u64);

    impl Instant {
        pub const fn from_millis(ms: u64) -> Self {
            Self(ms)
        }

        pub fn duration_since(&self, other: Instant) -> Duration {
            Duration::from_millis(self.0.saturating_sub(other.0))
        }

        pub const fn as_millis(&self) -> u64 {
            self.0
        }
    }

    impl core::ops::Add<Duration> for Instant {
        type Output = Instant;

        fn add(self, rhs: Duration) -> Instant {
            Instant(self.0 + rhs.as_millis())
        }
    }

    /// Millisecond duration used when embassy-time is not linked
    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Duration(u64);

    impl Duration {
        pub const fn from_millis(ms: u64) -> Self {
            Self(ms)
        }

        pub const fn as_millis(&self) -> u64 {
            self.0
        }
    }

    impl core::ops::Add for Duration {
        type Output = Duration;

        fn add(self, rhs: Duration) -> Duration {
            Duration(self.0 + rhs.0)
        }
    }

    impl core::ops::Mul<u32> for Duration {
        type Output = Duration;

        fn mul(self, rhs: u32) -> Duration {
            Duration(self.0 * rhs as u64)
        }
    }
}

use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::pwm::SetDutyCycle;
use crate::types::{PaddleSide, PaddleState};

/// Error types for HAL operations
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    /// GPIO operation failed
    GpioError,
    /// Analog conversion failed
    AdcError,
    /// Tone generator could not be driven
    ToneError,
    /// Hardware not initialized
    NotInitialized,
    /// Invalid configuration
    InvalidConfig,
}

#[cfg(feature = "std")]
impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HalError::GpioError => write!(f, "GPIO operation failed"),
            HalError::AdcError => write!(f, "Analog conversion failed"),
            HalError::ToneError => write!(f, "Tone output failed"),
            HalError::NotInitialized => write!(f, "Hardware not initialized"),
            HalError::InvalidConfig => write!(f, "Invalid configuration"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}

/// Trait for paddle contact input
pub trait InputPaddle {
    type Error: Into<HalError>;

    /// Check if the paddle contact is currently closed
    fn is_pressed(&mut self) -> Result<bool, Self::Error>;
}

/// Trait for the sidetone output
pub trait ToneOutput {
    type Error: Into<HalError>;

    /// Start sounding at the given frequency. Safe to call while sounding.
    fn start_tone(&mut self, frequency_hz: f32) -> Result<(), Self::Error>;

    /// Silence the output. Safe to call while silent.
    fn stop_tone(&mut self) -> Result<(), Self::Error>;

    /// Last commanded state
    fn is_sounding(&self) -> bool;
}

/// Trait for the speed/mode potentiometer
pub trait SpeedInput {
    type Error: Into<HalError>;

    /// Raw analog reading
    fn read(&mut self) -> Result<u16, Self::Error>;
}

/// Monotonic millisecond time source
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Complete keyer HAL interface consumed by the cycle controller
pub trait KeyerHal {
    type Error: From<HalError>;

    /// Read one paddle contact
    fn read_paddle(&mut self, side: PaddleSide) -> Result<bool, Self::Error>;

    /// Read the speed potentiometer
    fn read_speed(&mut self) -> Result<u16, Self::Error>;

    /// Assert tone on or off. `frequency_hz` is the configured sidetone
    /// pitch; outputs with a fixed pitch ignore it.
    fn set_tone(&mut self, on: bool, frequency_hz: f32) -> Result<(), Self::Error>;

    /// Current monotonic time
    fn now(&self) -> Instant;

    /// Read both paddles
    fn read_paddles(&mut self) -> Result<PaddleState, Self::Error> {
        let left = self.read_paddle(PaddleSide::Left)?;
        let right = self.read_paddle(PaddleSide::Right)?;
        Ok(PaddleState::new(left, right))
    }
}

/// Paddle on an embedded-hal input pin.
///
/// Active low: the pin is pulled up and the contact grounds it.
pub struct EmbeddedHalPaddle<P> {
    pin: P,
}

impl<P> EmbeddedHalPaddle<P>
where
    P: InputPin,
{
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    pub fn release(self) -> P {
        self.pin
    }
}

impl<P> InputPaddle for EmbeddedHalPaddle<P>
where
    P: InputPin,
{
    type Error = HalError;

    fn is_pressed(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_low().map_err(|_| HalError::GpioError)
    }
}

/// Sidetone from a PWM channel whose carrier frequency is set when the timer
/// is configured. Sounding drives a 50 % duty cycle.
pub struct PwmTone<P> {
    pwm: P,
    sounding: bool,
}

impl<P> PwmTone<P>
where
    P: SetDutyCycle,
{
    pub fn new(pwm: P) -> Self {
        Self { pwm, sounding: false }
    }

    pub fn release(self) -> P {
        self.pwm
    }
}

impl<P> ToneOutput for PwmTone<P>
where
    P: SetDutyCycle,
{
    type Error = HalError;

    fn start_tone(&mut self, _frequency_hz: f32) -> Result<(), Self::Error> {
        self.pwm
            .set_duty_cycle_percent(50)
            .map_err(|_| HalError::ToneError)?;
        self.sounding = true;
        Ok(())
    }

    fn stop_tone(&mut self) -> Result<(), Self::Error> {
        self.pwm
            .set_duty_cycle_fully_off()
            .map_err(|_| HalError::ToneError)?;
        self.sounding = false;
        Ok(())
    }

    fn is_sounding(&self) -> bool {
        self.sounding
    }
}

/// Keying line for an external oscillator or transmitter
pub struct GpioTone<P> {
    pin: P,
    inverted: bool,
    sounding: bool,
}

impl<P> GpioTone<P>
where
    P: OutputPin,
{
    pub fn new(pin: P, inverted: bool) -> Self {
        Self { pin, inverted, sounding: false }
    }

    pub fn release(self) -> P {
        self.pin
    }

    fn drive(&mut self, on: bool) -> Result<(), HalError> {
        let level = if self.inverted { !on } else { on };
        if level {
            self.pin.set_high().map_err(|_| HalError::GpioError)?;
        } else {
            self.pin.set_low().map_err(|_| HalError::GpioError)?;
        }
        self.sounding = on;
        Ok(())
    }
}

impl<P> ToneOutput for GpioTone<P>
where
    P: OutputPin,
{
    type Error = HalError;

    fn start_tone(&mut self, _frequency_hz: f32) -> Result<(), Self::Error> {
        self.drive(true)
    }

    fn stop_tone(&mut self) -> Result<(), Self::Error> {
        self.drive(false)
    }

    fn is_sounding(&self) -> bool {
        self.sounding
    }
}

/// Speed source for builds without a potentiometer
#[derive(Copy, Clone, Debug)]
pub struct FixedSpeed(pub u16);

impl SpeedInput for FixedSpeed {
    type Error = HalError;

    fn read(&mut self) -> Result<u16, Self::Error> {
        Ok(self.0)
    }
}

/// Wraps an ADC driver call as a speed source
pub struct FnSpeed<F>(pub F);

impl<F> SpeedInput for FnSpeed<F>
where
    F: FnMut() -> Result<u16, HalError>,
{
    type Error = HalError;

    fn read(&mut self) -> Result<u16, Self::Error> {
        (self.0)()
    }
}

/// Clock backed by the embassy time driver
#[cfg(feature = "embassy-time")]
#[derive(Copy, Clone, Debug, Default)]
pub struct EmbassyClock;

#[cfg(feature = "embassy-time")]
impl Clock for EmbassyClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Keyer HAL assembled from individual pins
pub struct PinKeyerHal<L, R, T, S, C> {
    left: L,
    right: R,
    tone: T,
    speed: S,
    clock: C,
}

impl<L, R, T, S, C> PinKeyerHal<L, R, T, S, C>
where
    L: InputPaddle,
    R: InputPaddle,
    T: ToneOutput,
    S: SpeedInput,
    C: Clock,
{
    pub fn new(left: L, right: R, tone: T, speed: S, clock: C) -> Self {
        Self {
            left,
            right,
            tone,
            speed,
            clock,
        }
    }

    /// Access to tone output
    pub fn tone(&self) -> &T {
        &self.tone
    }

    /// Access to the time source
    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn release(self) -> (L, R, T, S, C) {
        (self.left, self.right, self.tone, self.speed, self.clock)
    }
}

impl<L, R, T, S, C> KeyerHal for PinKeyerHal<L, R, T, S, C>
where
    L: InputPaddle,
    R: InputPaddle,
    T: ToneOutput,
    S: SpeedInput,
    C: Clock,
{
    type Error = HalError;

    fn read_paddle(&mut self, side: PaddleSide) -> Result<bool, Self::Error> {
        match side {
            PaddleSide::Left => self.left.is_pressed().map_err(Into::into),
            PaddleSide::Right => self.right.is_pressed().map_err(Into::into),
        }
    }

    fn read_speed(&mut self) -> Result<u16, Self::Error> {
        self.speed.read().map_err(Into::into)
    }

    fn set_tone(&mut self, on: bool, frequency_hz: f32) -> Result<(), Self::Error> {
        if on {
            self.tone.start_tone(frequency_hz).map_err(Into::into)
        } else {
            self.tone.stop_tone().map_err(Into::into)
        }
    }

    fn now(&self) -> Instant {
        self.clock.now()
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    //! Mock implementations for testing

    use super::*;
    use core::cell::Cell;

    #[derive(Default)]
    pub struct MockPaddle {
        pressed: Cell<bool>,
        fail: Cell<bool>,
    }

    impl MockPaddle {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_pressed(&self, pressed: bool) {
            self.pressed.set(pressed);
        }

        /// Make subsequent reads fail
        pub fn set_failing(&self, fail: bool) {
            self.fail.set(fail);
        }
    }

    impl InputPaddle for MockPaddle {
        type Error = HalError;

        fn is_pressed(&mut self) -> Result<bool, Self::Error> {
            if self.fail.get() {
                return Err(HalError::GpioError);
            }
            Ok(self.pressed.get())
        }
    }

    #[derive(Default)]
    pub struct MockTone {
        sounding: Cell<bool>,
        frequency_hz: Cell<f32>,
        commands: Cell<u32>,
    }

    impl MockTone {
        pub fn new() -> Self {
            Self::default()
        }

        /// Frequency passed on the last start command
        pub fn frequency_hz(&self) -> f32 {
            self.frequency_hz.get()
        }

        /// Number of on/off commands received
        pub fn commands(&self) -> u32 {
            self.commands.get()
        }
    }

    impl ToneOutput for MockTone {
        type Error = HalError;

        fn start_tone(&mut self, frequency_hz: f32) -> Result<(), Self::Error> {
            self.sounding.set(true);
            self.frequency_hz.set(frequency_hz);
            self.commands.set(self.commands.get() + 1);
            Ok(())
        }

        fn stop_tone(&mut self) -> Result<(), Self::Error> {
            self.sounding.set(false);
            self.commands.set(self.commands.get() + 1);
            Ok(())
        }

        fn is_sounding(&self) -> bool {
            self.sounding.get()
        }
    }

    #[derive(Default)]
    pub struct MockSpeed {
        reading: Cell<u16>,
    }

    impl MockSpeed {
        pub fn new(reading: u16) -> Self {
            Self { reading: Cell::new(reading) }
        }

        pub fn set_reading(&self, reading: u16) {
            self.reading.set(reading);
        }
    }

    impl SpeedInput for MockSpeed {
        type Error = HalError;

        fn read(&mut self) -> Result<u16, Self::Error> {
            Ok(self.reading.get())
        }
    }

    /// Manually advanced clock
    #[derive(Default)]
    pub struct MockClock {
        now_ms: Cell<u64>,
    }

    impl MockClock {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_millis(&self, ms: u64) {
            self.now_ms.set(ms);
        }

        pub fn advance_millis(&self, ms: u64) {
            self.now_ms.set(self.now_ms.get() + ms);
        }
    }

    impl Clock for MockClock {
        fn now(&self) -> Instant {
            Instant::from_millis(self.now_ms.get())
        }
    }

    /// Mock hardware collection
    #[derive(Default)]
    pub struct MockKeyerHal {
        pub left: MockPaddle,
        pub right: MockPaddle,
        pub tone: MockTone,
        pub speed: MockSpeed,
        pub clock: MockClock,
    }

    impl MockKeyerHal {
        pub fn new(reading: u16) -> Self {
            Self {
                speed: MockSpeed::new(reading),
                ..Self::default()
            }
        }

        pub fn press(&self, left: bool, right: bool) {
            self.left.set_pressed(left);
            self.right.set_pressed(right);
        }
    }

    impl KeyerHal for MockKeyerHal {
        type Error = HalError;

        fn read_paddle(&mut self, side: PaddleSide) -> Result<bool, Self::Error> {
            match side {
                PaddleSide::Left => self.left.is_pressed(),
                PaddleSide::Right => self.right.is_pressed(),
            }
        }

        fn read_speed(&mut self) -> Result<u16, Self::Error> {
            self.speed.read()
        }

        fn set_tone(&mut self, on: bool, frequency_hz: f32) -> Result<(), Self::Error> {
            if on {
                self.tone.start_tone(frequency_hz)
            } else {
                self.tone.stop_tone()
            }
        }

        fn now(&self) -> Instant {
            self.clock.now()
        }
    }
}
