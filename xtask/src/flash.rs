use anyhow::{Context, Result};
use colored::Colorize;
use platform::config;
use std::process::Command;
use std::time::Instant;

use crate::step::{cargo, OnFailure};

const TARGET: &str = "thumbv7em-none-eabihf";
const CHIP: &str = "STM32H743ZITx";

pub fn run(release: bool) -> Result<()> {
    let profile = if release { "release" } else { "debug" };
    let binary = format!("target/{TARGET}/{profile}/firmware");

    println!();
    println!(
        "{}",
        format!("🔨 Building firmware ({profile} mode)...").cyan().bold()
    );
    println!();

    let mut args = vec!["build", "-p", "firmware", "--target", TARGET, "--features", "hardware"];
    if release {
        args.push("--release");
    }
    cargo("Firmware build", &args, OnFailure::Abort)?;

    show_binary_size(&binary);

    println!("{}", "📡 Flashing to STM32H7...".cyan().bold());
    println!("   {}", "Connecting to probe...".dimmed());

    let flash_start = Instant::now();
    let flash_output = Command::new("probe-rs")
        .args(["run", &binary, "--chip", CHIP, "--probe-index", "0"])
        .output()
        .context("Failed to run probe-rs. Is probe-rs installed? (cargo install probe-rs-tools)")?;

    if !flash_output.status.success() {
        eprintln!("{}", "✗ Flash failed".red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&flash_output.stderr));
        anyhow::bail!("Flash failed - check that the probe is connected and the device is powered");
    }

    println!(
        "{}",
        format!(
            "✓ Flash successful in {:.2}s",
            flash_start.elapsed().as_secs_f64()
        )
        .green()
    );
    println!();
    println!(
        "{}",
        format!("{} is running on hardware!", config::app_title()).bold()
    );
    println!(
        "   {}",
        format!("Use 'probe-rs attach --chip {CHIP}' to view RTT logs").dimmed()
    );
    println!();

    Ok(())
}

/// Print section sizes if `rust-size` (cargo-binutils) is installed.
fn show_binary_size(binary: &str) {
    let Ok(out) = Command::new("rust-size").arg(binary).arg("-A").output() else {
        return;
    };
    if !out.status.success() {
        return;
    }
    println!("{}", "📊 Binary size:".cyan());
    // .axisram is NOLOAD: it shows up here but costs no flash.
    for line in String::from_utf8_lossy(&out.stdout).lines() {
        println!("   {}", line.dimmed());
    }
    println!();
}
