use anyhow::Result;
use colored::Colorize;
use std::time::Instant;

use crate::step::{cargo, OnFailure};

const TARGET: &str = "thumbv7em-none-eabihf";

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking firmware builds...".cyan().bold());
    println!();

    let total_start = Instant::now();

    cargo(
        "Hardware target (STM32H7)",
        &["check", "-p", "firmware", "--target", TARGET, "--features", "hardware"],
        OnFailure::Abort,
    )?;
    cargo(
        "Emulator target (host)",
        &["check", "-p", "firmware", "--features", "emulator", "--examples"],
        OnFailure::Abort,
    )?;
    // platform must stay no_std without any feature.
    cargo(
        "Platform crate (no_std)",
        &["check", "-p", "platform", "--target", TARGET, "--no-default-features"],
        OnFailure::Abort,
    )?;
    cargo(
        "Clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
        OnFailure::Warn,
    )?;
    let fmt = cargo("Formatting", &["fmt", "--all", "--check"], OnFailure::Warn)?;
    if !fmt.status.success() {
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
