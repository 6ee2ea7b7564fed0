//! Test utilities for keyer core functionality

pub mod virtual_time {
    //! Virtual time simulation for deterministic testing

    use crate::hal::{Clock, Instant};
    use std::cell::Cell;
    use std::rc::Rc;

    /// Shared virtual clock. Clones observe the same time.
    #[derive(Clone, Default)]
    pub struct VirtualClock {
        now_ms: Rc<Cell<u64>>,
    }

    impl VirtualClock {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn millis(&self) -> u64 {
            self.now_ms.get()
        }

        pub fn set_millis(&self, ms: u64) {
            self.now_ms.set(ms);
        }

        /// Advance virtual time by a number of milliseconds
        pub fn advance(&self, ms: u64) {
            self.now_ms.set(self.now_ms.get() + ms);
        }
    }

    impl Clock for VirtualClock {
        fn now(&self) -> Instant {
            Instant::from_millis(self.now_ms.get())
        }
    }
}

pub mod paddle_simulator {
    //! Paddle input simulation for testing

    use crate::types::{PaddleSide, PaddleState};
    use heapless::Vec;

    /// Paddle contact change at an absolute time
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PaddleEvent {
        pub at_ms: u64,
        pub side: PaddleSide,
        pub pressed: bool,
    }

    /// Time-ordered paddle script (up to 64 events)
    #[derive(Debug, Clone, Default)]
    pub struct PaddleScript {
        events: Vec<PaddleEvent, 64>,
    }

    impl PaddleScript {
        pub fn new() -> Self {
            Self::default()
        }

        /// Insert an event, keeping time order. Events at the same time keep
        /// insertion order.
        pub fn push(&mut self, event: PaddleEvent) -> Result<(), PaddleEvent> {
            let index = self
                .events
                .iter()
                .position(|e| e.at_ms > event.at_ms)
                .unwrap_or(self.events.len());
            self.events.insert(index, event)
        }

        /// Hold one paddle over `[from_ms, to_ms)`
        pub fn hold(mut self, side: PaddleSide, from_ms: u64, to_ms: u64) -> Self {
            self.push(PaddleEvent { at_ms: from_ms, side, pressed: true }).ok();
            self.push(PaddleEvent { at_ms: to_ms, side, pressed: false }).ok();
            self
        }

        /// Hold both paddles over `[from_ms, to_ms)`
        pub fn squeeze(self, from_ms: u64, to_ms: u64) -> Self {
            self.hold(PaddleSide::Left, from_ms, to_ms)
                .hold(PaddleSide::Right, from_ms, to_ms)
        }

        /// Single dot paddle tap
        pub fn dot(self, at_ms: u64, held_ms: u64) -> Self {
            self.hold(PaddleSide::Left, at_ms, at_ms + held_ms)
        }

        /// Single dash paddle tap
        pub fn dash(self, at_ms: u64, held_ms: u64) -> Self {
            self.hold(PaddleSide::Right, at_ms, at_ms + held_ms)
        }

        pub fn events(&self) -> &[PaddleEvent] {
            &self.events
        }

        /// Contact state after applying every event at or before `ms`
        pub fn state_at(&self, ms: u64) -> PaddleState {
            let mut state = PaddleState::default();
            for event in self.events.iter().take_while(|e| e.at_ms <= ms) {
                match event.side {
                    PaddleSide::Left => state.left = event.pressed,
                    PaddleSide::Right => state.right = event.pressed,
                }
            }
            state
        }
    }
}

pub mod output_capture {
    //! Output capture and analysis for testing

    use crate::types::{Element, ElementTiming};
    use heapless::{String, Vec};

    /// One tone-on period, `[start_ms, end_ms)`
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ToneInterval {
        pub start_ms: u64,
        pub end_ms: u64,
    }

    impl ToneInterval {
        pub fn duration_ms(&self) -> u64 {
            self.end_ms - self.start_ms
        }

        /// Classify as dot or dash; anything shorter than the midpoint of the
        /// two lengths is a dot.
        pub fn element(&self, timing: &ElementTiming) -> Element {
            let midpoint = (timing.dit.as_millis() + timing.dah.as_millis()) / 2;
            if self.duration_ms() < midpoint {
                Element::Dot
            } else {
                Element::Dash
            }
        }
    }

    /// Records tone commands and folds them into on-intervals
    #[derive(Debug, Default)]
    pub struct ToneCapture {
        intervals: Vec<ToneInterval, 128>,
        on_since: Option<u64>,
        commands: u32,
    }

    impl ToneCapture {
        pub fn new() -> Self {
            Self::default()
        }

        /// Record the command asserted at `now_ms`
        pub fn record(&mut self, now_ms: u64, on: bool) {
            self.commands += 1;
            match (self.on_since, on) {
                (None, true) => self.on_since = Some(now_ms),
                (Some(start), false) => {
                    self.on_since = None;
                    self.intervals
                        .push(ToneInterval { start_ms: start, end_ms: now_ms })
                        .ok();
                }
                _ => {}
            }
        }

        /// Close an interval still sounding at `now_ms`
        pub fn finish(&mut self, now_ms: u64) {
            if self.on_since.is_some() {
                self.record(now_ms, false);
                self.commands -= 1;
            }
        }

        pub fn is_sounding(&self) -> bool {
            self.on_since.is_some()
        }

        pub fn intervals(&self) -> &[ToneInterval] {
            &self.intervals
        }

        /// Number of tone commands seen
        pub fn commands(&self) -> u32 {
            self.commands
        }

        /// Silences between consecutive tone-on periods
        pub fn gaps(&self) -> Vec<u64, 128> {
            let mut gaps = Vec::new();
            for pair in self.intervals.windows(2) {
                gaps.push(pair[1].start_ms - pair[0].end_ms).ok();
            }
            gaps
        }

        pub fn elements(&self, timing: &ElementTiming) -> Vec<Element, 128> {
            self.intervals.iter().map(|i| i.element(timing)).collect()
        }

        /// Render as dots and dashes
        pub fn to_morse_string(&self, timing: &ElementTiming) -> String<128> {
            let mut result = String::new();
            for element in self.elements(timing) {
                let ch = match element {
                    Element::Dot => '.',
                    Element::Dash => '-',
                };
                result.push(ch).ok();
            }
            result
        }

        pub fn clear(&mut self) {
            self.intervals.clear();
            self.on_since = None;
            self.commands = 0;
        }
    }
}

pub mod simulated_hal {
    //! Whole-keyer simulation against virtual time

    use super::output_capture::ToneCapture;
    use super::paddle_simulator::PaddleScript;
    use super::virtual_time::VirtualClock;
    use crate::controller::Keyer;
    use crate::hal::{Clock, HalError, Instant, KeyerHal};
    use crate::types::PaddleSide;

    /// HAL driven by a paddle script and a virtual clock
    pub struct SimulatedHal {
        pub clock: VirtualClock,
        pub script: PaddleScript,
        pub reading: u16,
        pub capture: ToneCapture,
    }

    impl SimulatedHal {
        pub fn new(script: PaddleScript, reading: u16) -> Self {
            Self {
                clock: VirtualClock::new(),
                script,
                reading,
                capture: ToneCapture::new(),
            }
        }
    }

    impl KeyerHal for SimulatedHal {
        type Error = HalError;

        fn read_paddle(&mut self, side: PaddleSide) -> Result<bool, Self::Error> {
            Ok(self.script.state_at(self.clock.millis()).is_pressed(side))
        }

        fn read_speed(&mut self) -> Result<u16, Self::Error> {
            Ok(self.reading)
        }

        fn set_tone(&mut self, on: bool, _frequency_hz: f32) -> Result<(), Self::Error> {
            self.capture.record(self.clock.millis(), on);
            Ok(())
        }

        fn now(&self) -> Instant {
            self.clock.now()
        }
    }

    /// Cycle the keyer every `step_ms` from the current virtual time up to
    /// and including `until_ms`. The clock is left one step past the last
    /// cycle so a later call continues where this one stopped.
    pub fn simulate(
        keyer: &mut Keyer<SimulatedHal>,
        until_ms: u64,
        step_ms: u64,
    ) -> Result<(), HalError> {
        let step = step_ms.max(1);
        while keyer.hal().clock.millis() <= until_ms {
            keyer.cycle()?;
            keyer.hal().clock.advance(step);
        }
        Ok(())
    }
}
