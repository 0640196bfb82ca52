//! One `cargo` invocation with a colored status line.

use anyhow::{Context, Result};
use colored::Colorize;
use std::process::{Command, Output};
use std::time::Instant;

/// What to do when a step fails.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum OnFailure {
    /// Print stderr and return an error.
    Abort,
    /// Print a warning and carry on.
    Warn,
}

/// Run `cargo <args>`, print a ✓/✗/⚠ line and return the captured output.
pub fn cargo(label: &str, args: &[&str], on_failure: OnFailure) -> Result<Output> {
    println!("{}", format!("  {label}...").cyan());
    let start = Instant::now();

    let output = Command::new("cargo")
        .args(args)
        .output()
        .with_context(|| format!("Failed to run cargo {}", args.join(" ")))?;

    if output.status.success() {
        println!(
            "{}",
            format!("  ✓ {label} passed in {:.2}s", start.elapsed().as_secs_f64()).green()
        );
    } else if on_failure == OnFailure::Warn {
        eprintln!("{}", format!("  ⚠ {label} reported problems").yellow().bold());
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
    } else {
        eprintln!("{}", format!("  ✗ {label} failed").red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        anyhow::bail!("{label} failed");
    }
    println!();
    Ok(output)
}

/// Pull "N passed; M failed; ..." out of libtest output.
pub fn test_summary(stdout: &[u8]) -> String {
    let text = String::from_utf8_lossy(stdout);
    let mut passed = 0u32;
    let mut failed = 0u32;
    for line in text.lines().filter(|l| l.contains("test result:")) {
        for part in line.split(';') {
            let mut words = part.split_whitespace().rev();
            let (Some(kind), Some(count)) = (words.next(), words.next()) else {
                continue;
            };
            let Ok(count) = count.parse::<u32>() else {
                continue;
            };
            match kind {
                "passed" => passed = passed.saturating_add(count),
                "failed" => failed = failed.saturating_add(count),
                _ => {}
            }
        }
    }
    format!("{passed} passed, {failed} failed")
}

#[cfg(test)]
mod tests {
    use super::test_summary;

    #[test]
    fn summary_adds_up_every_test_binary() {
        let out = b"test result: ok. 5 passed; 0 failed; 0 ignored; 0 measured; 0 filtered out\n\
                    running 3 tests\n\
                    test result: FAILED. 2 passed; 1 failed; 0 ignored; 0 measured; 0 filtered out\n";
        assert_eq!(test_summary(out), "7 passed, 1 failed");
    }

    #[test]
    fn summary_without_results_is_zero() {
        assert_eq!(test_summary(b"error: could not compile"), "0 passed, 0 failed");
    }
}
