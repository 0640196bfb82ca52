use anyhow::Result;
use colored::Colorize;
use std::time::Instant;

use crate::step::{cargo, test_summary, OnFailure};

pub fn run(unit_only: bool, integration_only: bool) -> Result<()> {
    println!();
    println!("{}", "🧪 Running tests...".cyan().bold());
    println!();

    let total_start = Instant::now();

    if !integration_only {
        let out = cargo("Unit tests", &["test", "--workspace", "--lib", "--bins"], OnFailure::Abort)?;
        println!("   {}", test_summary(&out.stdout).dimmed());
    }

    if !unit_only {
        // tests/ directories: pipeline, ST7789, boot (firmware); geometry
        // properties and DMA placement (platform).
        let out = cargo(
            "Integration tests",
            &["test", "-p", "firmware", "-p", "platform", "--tests"],
            OnFailure::Abort,
        )?;
        println!("   {}", test_summary(&out.stdout).dimmed());
    }

    // Doc examples are illustrative; a failure here is reported, not fatal.
    cargo("Doc tests", &["test", "--doc", "--workspace"], OnFailure::Warn)?;

    println!(
        "{}",
        format!(
            "✓ All tests completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}
