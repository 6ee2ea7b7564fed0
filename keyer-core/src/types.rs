//! Core data types for the paddle keyer

use crate::hal::Duration;

/// Morse elements that can sit in the next-element memory
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "std", derive(Hash))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Element {
    /// Dot (short element)
    Dot,
    /// Dash (long element)
    Dash,
}

impl Element {
    /// Returns the opposite element (Dot <-> Dash)
    pub const fn opposite(&self) -> Element {
        match self {
            Element::Dot => Element::Dash,
            Element::Dash => Element::Dot,
        }
    }

    /// Keyer state that sounds this element
    pub const fn state(&self) -> KeyerState {
        match self {
            Element::Dot => KeyerState::Dot,
            Element::Dash => KeyerState::Dash,
        }
    }

    /// Sounding length of this element at the given timing
    pub fn length(&self, timing: &ElementTiming) -> Duration {
        match self {
            Element::Dot => timing.dit,
            Element::Dash => timing.dah,
        }
    }
}

/// What the tone output is doing this cycle
///
/// `Delay` is the mandatory one-dit silence that follows every element.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum KeyerState {
    /// Not sending, nor finishing the gap after an element
    #[default]
    Idle = 0,
    /// Sounding a dash
    Dash = 1,
    /// Sounding a dot
    Dot = 2,
    /// Inter-element silence after a dot or dash
    Delay = 3,
}

impl KeyerState {
    /// Decode a raw state value. Anything outside the four known states
    /// collapses to `Idle`, which keeps the tone off.
    pub const fn from_raw(raw: u8) -> KeyerState {
        match raw {
            1 => KeyerState::Dash,
            2 => KeyerState::Dot,
            3 => KeyerState::Delay,
            _ => KeyerState::Idle,
        }
    }

    /// Returns true if the tone sounds while in this state
    pub const fn is_keyed(&self) -> bool {
        matches!(self, KeyerState::Dash | KeyerState::Dot)
    }

    /// Element sounded in this state, if any
    pub const fn element(&self) -> Option<Element> {
        match self {
            KeyerState::Dot => Some(Element::Dot),
            KeyerState::Dash => Some(Element::Dash),
            KeyerState::Idle | KeyerState::Delay => None,
        }
    }
}

/// Paddle contact identification. Left keys dots, right keys dashes.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PaddleSide {
    /// Dot paddle
    Left,
    /// Dash paddle
    Right,
}

impl PaddleSide {
    /// Convert to corresponding Element
    pub const fn to_element(&self) -> Element {
        match self {
            PaddleSide::Left => Element::Dot,
            PaddleSide::Right => Element::Dash,
        }
    }

    /// Returns the opposite paddle side
    pub const fn opposite(&self) -> PaddleSide {
        match self {
            PaddleSide::Left => PaddleSide::Right,
            PaddleSide::Right => PaddleSide::Left,
        }
    }
}

/// Snapshot of both paddle contacts taken once per cycle
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PaddleState {
    /// Left (dot) paddle closed
    pub left: bool,
    /// Right (dash) paddle closed
    pub right: bool,
}

impl PaddleState {
    pub const fn new(left: bool, right: bool) -> Self {
        Self { left, right }
    }

    /// Dot paddle pressed
    pub const fn dot(&self) -> bool {
        self.left
    }

    /// Dash paddle pressed
    pub const fn dash(&self) -> bool {
        self.right
    }

    /// Check if both paddles are pressed (squeeze condition)
    pub const fn both_pressed(&self) -> bool {
        self.left && self.right
    }

    /// Check if either paddle is pressed
    pub const fn any_pressed(&self) -> bool {
        self.left || self.right
    }

    /// State of a single side
    pub const fn is_pressed(&self, side: PaddleSide) -> bool {
        match side {
            PaddleSide::Left => self.left,
            PaddleSide::Right => self.right,
        }
    }
}

/// Dot and dash lengths derived for the current cycle
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ElementTiming {
    /// Dot length, also the inter-element gap
    pub dit: Duration,
    /// Dash length
    pub dah: Duration,
}

impl ElementTiming {
    /// Timing from a dot length and a dot:dash ratio
    pub fn from_dit(dit: Duration, ratio: u32) -> Self {
        Self { dit, dah: dit * ratio }
    }

    /// Inter-element gap duration
    pub fn gap(&self) -> Duration {
        self.dit
    }
}

/// Keyer operating modes selected by the speed potentiometer
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyerMode {
    /// Timed iambic keying through the state machine
    Iambic,
    /// Tone follows the paddles directly
    Straight,
}

/// Tone command asserted once per cycle
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tone {
    On,
    Off,
}

impl Tone {
    pub const fn is_on(&self) -> bool {
        matches!(self, Tone::On)
    }
}

impl From<bool> for Tone {
    fn from(on: bool) -> Self {
        if on {
            Tone::On
        } else {
            Tone::Off
        }
    }
}
