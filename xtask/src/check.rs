use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

/// Bare-metal target the engine ships on (Raspberry Pi 4, AArch64).
const HARDWARE_TARGET: &str = "aarch64-unknown-none";

/// Outcome policy of one check step.
#[derive(Clone, Copy, PartialEq, Eq)]
enum OnFailure {
    Abort,
    Warn,
}

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking engine builds...".cyan().bold());
    println!();

    let total_start = Instant::now();

    // Check 1: Engine on the hardware target (no_std + defmt)
    step(
        &format!("engine on hardware target ({HARDWARE_TARGET})"),
        &[
            "check",
            "-p",
            "i2s-audio",
            "--target",
            HARDWARE_TARGET,
            "--features",
            "defmt",
        ],
        OnFailure::Abort,
    )?;

    // Check 2: Engine on the host (std mocks + tracing)
    step(
        "engine on host",
        &["check", "-p", "i2s-audio", "--features", "std,tracing"],
        OnFailure::Abort,
    )?;

    // Check 3: Platform crate (no_std compatibility)
    step(
        "platform crate (no_std)",
        &[
            "check",
            "-p",
            "platform",
            "--target",
            HARDWARE_TARGET,
            "--no-default-features",
        ],
        OnFailure::Abort,
    )?;

    // Check 4: Clippy lints
    step(
        "clippy lints",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
        OnFailure::Warn,
    )?;

    // Check 5: Format check
    if !step("code formatting", &["fmt", "--all", "--check"], OnFailure::Warn)? {
        eprintln!("     Run 'cargo fmt --all' to fix");
    }

    println!(
        "{}",
        format!(
            "✓ All checks completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}

/// Run one `cargo` invocation and report it. Returns whether it passed.
fn step(label: &str, args: &[&str], on_failure: OnFailure) -> Result<bool> {
    println!("{}", format!("  Checking {label}...").cyan());
    let start = Instant::now();

    let output = Command::new("cargo")
        .args(args)
        .output()
        .with_context(|| format!("Failed to run cargo {}", args.join(" ")))?;

    let passed = output.status.success();
    if passed {
        println!(
            "{}",
            format!(
                "  ✓ {label} passed in {:.2}s",
                start.elapsed().as_secs_f64()
            )
            .green()
        );
    } else if on_failure == OnFailure::Abort {
        eprintln!("{}", format!("  ✗ {label} failed").red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        anyhow::bail!("{label} failed");
    } else {
        eprintln!("{}", format!("  ⚠ {label} reported problems").yellow().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
    }
    println!();

    Ok(passed)
}
