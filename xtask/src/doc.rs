use anyhow::Result;
use colored::Colorize;

use crate::step::{cargo, OnFailure};

pub fn run(open: bool) -> Result<()> {
    println!();
    println!("{}", "📚 Building documentation...".cyan().bold());
    println!();

    // Host docs only; the hardware-gated items (St7789Display, boot::hardware)
    // need `--target thumbv7em-none-eabihf --features hardware`.
    let mut args = vec!["doc", "-p", "platform", "-p", "firmware", "--no-deps", "--document-private-items"];
    if open {
        args.push("--open");
    }
    cargo("Documentation", &args, OnFailure::Abort)?;

    if !open {
        println!(
            "   {}",
            "Open target/doc/firmware/index.html in your browser".dimmed()
        );
        println!("   {}", "Or run 'cargo xtask doc --open'".dimmed());
        println!();
    }

    Ok(())
}
