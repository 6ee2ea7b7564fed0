//! Element and gap timing on a virtual clock

use crate::*;
use keyer_core::test_utils::paddle_simulator::PaddleScript;
use keyer_core::test_utils::simulated_hal::simulate;
use keyer_core::{KeyerConfig, KeyerState};

#[test]
fn test_single_dot_then_idle() {
    // Dot paddle tapped at t=0 and released before the dot ends
    let script = PaddleScript::new().dot(0, 30);
    let mut keyer = keyer_with(script, READING_DIT_50, KeyerConfig::default()).unwrap();

    simulate(&mut keyer, 50, 1).unwrap();
    assert_eq!(keyer.fsm().current_state(), KeyerState::Delay);
    assert_eq!(keyer.fsm().deadline().as_millis(), 100);

    simulate(&mut keyer, 99, 1).unwrap();
    assert_eq!(keyer.fsm().current_state(), KeyerState::Delay);
    assert!(!keyer.hal().capture.is_sounding());

    simulate(&mut keyer, 300, 1).unwrap();
    assert_eq!(keyer.fsm().current_state(), KeyerState::Idle);

    let intervals = keyer.hal().capture.intervals();
    assert_eq!(intervals.len(), 1);
    // Tone starts on the cycle after the press is seen
    assert!(intervals[0].start_ms <= 1);
    assert_eq!(intervals[0].duration_ms(), 50);
}

#[test]
fn test_single_dash_then_idle() {
    let run = run_script(PaddleScript::new().dash(0, 30), READING_DIT_50, 400).unwrap();
    assert_eq!(run.intervals().len(), 1);
    assert_eq!(run.intervals()[0].duration_ms(), 150);
    assert_eq!(run.keyer.fsm().current_state(), KeyerState::Idle);
}

#[test]
fn test_held_dot_repeats_through_idle() {
    let run = run_script(PaddleScript::new().dot(0, 400), READING_DIT_50, 400).unwrap();

    let intervals = run.intervals();
    assert!(intervals.len() >= 3);
    for interval in intervals {
        assert_eq!(interval.duration_ms(), 50);
    }
    // One dit of delay plus the idle cycle that restarts the element
    for gap in run.gaps() {
        assert_eq!(gap, 51);
    }
}

#[test]
fn test_tone_commanded_every_cycle() {
    let mut keyer = keyer_with(PaddleScript::new(), READING_DIT_50, KeyerConfig::default()).unwrap();
    simulate(&mut keyer, 99, 1).unwrap();
    assert_eq!(keyer.hal().capture.commands(), 100);
    assert!(keyer.hal().capture.intervals().is_empty());
}

#[test]
fn test_slow_cycles_stretch_elements() {
    // 7 ms cycles: expiry is only seen on the first cycle past the deadline
    let run = run_script_with(
        PaddleScript::new().dot(0, 10),
        READING_DIT_50,
        KeyerConfig::default(),
        400,
        7,
    )
    .unwrap();
    let intervals = run.intervals();
    assert_eq!(intervals.len(), 1);
    assert_eq!((intervals[0].start_ms, intervals[0].end_ms), (7, 63));
}

#[test]
fn test_dah_is_three_dits() {
    for reading in [0u16, 240, 700, 999] {
        let timing = keyer_core::derive_speed(reading, &KeyerConfig::default())
            .timing()
            .unwrap();
        assert_eq!(timing.dah, timing.dit * 3);
        assert_eq!(timing.gap(), timing.dit);
    }
}
