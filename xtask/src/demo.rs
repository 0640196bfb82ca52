//! xtask demo - run `tile_demo` in the embedded-graphics simulator window.
//!
//! Needs SDL2 on the host (see the embedded-graphics-simulator README).

use anyhow::{Context, Result};
use colored::Colorize;
use platform::config;
use std::process::Command;

pub fn run(passes: Option<u32>, log: &str) -> Result<()> {
    println!();
    println!(
        "{}",
        format!("🖥  {} v{} - simulator", config::app_title(), config::APP_VERSION)
            .cyan()
            .bold()
    );
    println!(
        "   {}",
        format!(
            "{}×{} panel, {}×{} tiles, close the window to stop",
            config::DISPLAY_WIDTH,
            config::DISPLAY_HEIGHT,
            config::TILE_SIZE,
            config::TILE_SIZE
        )
        .dimmed()
    );
    println!();

    let mut cmd = Command::new("cargo");
    cmd.args([
        "run",
        "-p",
        "firmware",
        "--example",
        "tile_demo",
        "--features",
        "emulator",
    ])
    .env("RUST_LOG", log);
    if let Some(passes) = passes {
        cmd.arg("--").arg(passes.to_string());
    }

    let status = cmd.status().context("Failed to run the tile demo")?;
    if !status.success() {
        anyhow::bail!("tile_demo exited with {status}");
    }
    Ok(())
}
