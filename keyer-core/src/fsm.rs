//! Polled iambic keyer state machine

use crate::hal::Instant;
use crate::types::{Element, ElementTiming, KeyerState, PaddleState, Tone};

/// Iambic keyer FSM.
///
/// One instance holds all keying state. It is advanced only by [`step`],
/// once per control cycle, and never blocks.
///
/// [`step`]: IambicKeyer::step
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IambicKeyer {
    /// State being executed this cycle
    current: KeyerState,
    /// Element to play once the current delay ends
    next: Option<Element>,
    /// State before the most recent transition into `Delay`
    last: KeyerState,
    /// End of the current element or delay
    deadline: Instant,
}

impl Default for IambicKeyer {
    fn default() -> Self {
        Self::new()
    }
}

impl IambicKeyer {
    pub const fn new() -> Self {
        Self {
            current: KeyerState::Idle,
            next: None,
            last: KeyerState::Idle,
            deadline: Instant::from_millis(0),
        }
    }

    /// Get current FSM state
    pub fn current_state(&self) -> KeyerState {
        self.current
    }

    /// Element waiting in the one-slot memory
    pub fn queued(&self) -> Option<Element> {
        self.next
    }

    pub fn last_state(&self) -> KeyerState {
        self.last
    }

    /// Scheduled end of the current element or delay. Only meaningful
    /// outside `Idle`.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Reset FSM to initial state
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Advance one control cycle.
    ///
    /// The returned tone reflects the state the cycle started in: a cycle
    /// that starts an element from `Idle` still reports `Off`, and the cycle
    /// on which an element expires still reports `On`.
    pub fn step(&mut self, paddles: PaddleState, now: Instant, timing: ElementTiming) -> Tone {
        match self.current {
            KeyerState::Dash => {
                self.handle_element(Element::Dash, paddles, now, timing);
                Tone::On
            }
            KeyerState::Dot => {
                self.handle_element(Element::Dot, paddles, now, timing);
                Tone::On
            }
            KeyerState::Idle => {
                self.handle_idle(paddles, now, timing);
                Tone::Off
            }
            KeyerState::Delay => {
                self.handle_delay(paddles, now, timing);
                Tone::Off
            }
        }
    }

    /// Dot or Dash sounding: capture the opposite paddle, end on expiry.
    /// The element is never cut short by paddle release.
    fn handle_element(&mut self, element: Element, paddles: PaddleState, now: Instant, timing: ElementTiming) {
        let opposite = element.opposite();
        if self.next.is_none() && Self::pressed(paddles, opposite) {
            self.next = Some(opposite);
            #[cfg(feature = "defmt")]
            defmt::trace!("captured {} during {}", opposite, element);
        }

        if now >= self.deadline {
            self.last = element.state();
            self.current = KeyerState::Delay;
            self.deadline = now + timing.gap();
            #[cfg(feature = "defmt")]
            defmt::trace!("{} ended at {} ms", element, now.as_millis());
        }
    }

    fn handle_idle(&mut self, paddles: PaddleState, now: Instant, timing: ElementTiming) {
        match (paddles.dot(), paddles.dash()) {
            (true, false) => self.start(Element::Dot, now + timing.dit),
            (false, true) => self.start(Element::Dash, now + timing.dah),
            (true, true) if self.next.is_none() => {
                // Squeeze from idle: the leading dot takes the dash's window
                self.start(Element::Dot, now + timing.dah);
                self.next = Some(Element::Dash);
            }
            _ => {}
        }
    }

    fn handle_delay(&mut self, paddles: PaddleState, now: Instant, timing: ElementTiming) {
        if now >= self.deadline {
            self.current = match self.next.take() {
                Some(element) => {
                    self.deadline = now + element.length(&timing);
                    #[cfg(feature = "defmt")]
                    defmt::debug!("playing queued {} at {} ms", element, now.as_millis());
                    element.state()
                }
                None => KeyerState::Idle,
            };
            self.last = KeyerState::Delay;
        }

        // Capture runs against `last` as left by the expiry check above, so
        // the cycle that pops the memory cannot refill it.
        if self.next.is_none() {
            match self.last {
                KeyerState::Dot if paddles.dash() => self.next = Some(Element::Dash),
                KeyerState::Dash if paddles.dot() => self.next = Some(Element::Dot),
                _ => {}
            }
        }
    }

    fn start(&mut self, element: Element, deadline: Instant) {
        self.last = KeyerState::Idle;
        self.current = element.state();
        self.deadline = deadline;
        #[cfg(feature = "defmt")]
        defmt::debug!("starting {} from idle", element);
    }

    fn pressed(paddles: PaddleState, element: Element) -> bool {
        match element {
            Element::Dot => paddles.dot(),
            Element::Dash => paddles.dash(),
        }
    }
}
