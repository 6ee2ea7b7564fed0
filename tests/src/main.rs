// Scenario runner: plays paddle scripts through the keyer on a virtual clock

use keyer_core::test_utils::paddle_simulator::PaddleScript;
use keyer_core::{default_config, derive_speed, HalError, VERSION};
use keyer_tests::{run_script, Run, READING_DIT_50};

fn main() {
    println!("🧪 Keyer Scenario Runner v{}", VERSION);

    if let Err(e) = run_all() {
        println!("❌ Scenario failed: {:?}", e);
        std::process::exit(1);
    }

    println!("✅ All scenarios completed");
}

fn run_all() -> Result<(), HalError> {
    // Speed table
    println!("⏱️  Speed table (default configuration)...");
    for reading in [0u16, 240, 500, 999, 1000] {
        match derive_speed(reading, &default_config()).timing() {
            Some(timing) => println!(
                "  reading {:4}: dit {} ms, dah {} ms",
                reading,
                timing.dit.as_millis(),
                timing.dah.as_millis()
            ),
            None => println!("  reading {:4}: straight key", reading),
        }
    }

    report("Single dot", run_script(PaddleScript::new().dot(0, 30), READING_DIT_50, 300)?);
    report("Single dash", run_script(PaddleScript::new().dash(0, 30), READING_DIT_50, 300)?);
    report(
        "Held squeeze",
        run_script(PaddleScript::new().squeeze(0, 600), READING_DIT_50, 600)?,
    );
    report(
        "Letter A",
        run_script(PaddleScript::new().dot(0, 40).dash(60, 60), READING_DIT_50, 500)?,
    );
    report(
        "Straight key",
        run_script(PaddleScript::new().dot(10, 30).dash(100, 80), 1023, 300)?,
    );

    Ok(())
}

fn report(name: &str, run: Run) {
    println!("📡 {}: \"{}\"", name, run.morse());
    for interval in run.intervals() {
        println!(
            "  on {:4} ms .. {:4} ms ({} ms)",
            interval.start_ms,
            interval.end_ms,
            interval.duration_ms()
        );
    }
}
