// Cycle cost benchmarks for the polled keyer

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use keyer_core::hal::mock::MockKeyerHal;
use keyer_core::test_utils::paddle_simulator::PaddleScript;
use keyer_core::test_utils::simulated_hal::simulate;
use keyer_core::{default_config, derive_speed, Duration, ElementTiming, IambicKeyer, Instant, Keyer, PaddleState};
use keyer_tests::{keyer_with, READING_DIT_50};

fn bench_fsm_step(c: &mut Criterion) {
    let timing = ElementTiming::from_dit(Duration::from_millis(50), 3);
    let squeeze = PaddleState::new(true, true);

    c.bench_function("fsm_step_squeeze", |b| {
        let mut fsm = IambicKeyer::new();
        let mut now = 0u64;
        b.iter(|| {
            now += 1;
            black_box(fsm.step(black_box(squeeze), Instant::from_millis(now), timing))
        })
    });
}

fn bench_speed_derivation(c: &mut Criterion) {
    let config = default_config();
    c.bench_function("derive_speed", |b| {
        let mut reading = 0u16;
        b.iter(|| {
            reading = (reading + 7) % 1024;
            black_box(derive_speed(black_box(reading), &config))
        })
    });
}

fn bench_keyer_cycle(c: &mut Criterion) {
    c.bench_function("keyer_cycle_mock_hal", |b| {
        let mut keyer = Keyer::new(MockKeyerHal::new(READING_DIT_50), default_config()).unwrap();
        keyer.hal().press(true, true);
        b.iter(|| {
            keyer.hal().clock.advance_millis(1);
            black_box(keyer.cycle())
        })
    });
}

fn bench_one_second_squeeze(c: &mut Criterion) {
    c.bench_function("simulate_1s_squeeze", |b| {
        b.iter(|| {
            let mut keyer = keyer_with(PaddleScript::new().squeeze(0, 1000), READING_DIT_50, default_config()).unwrap();
            black_box(simulate(&mut keyer, 1000, 1))
        })
    });
}

criterion_group!(
    benches,
    bench_fsm_step,
    bench_speed_derivation,
    bench_keyer_cycle,
    bench_one_second_squeeze
);
criterion_main!(benches);
