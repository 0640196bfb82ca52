//! Tile Refresh Firmware
//!
//! Repaints a 320×240 RGB565 panel as a grid of solid-color 80×80 tiles,
//! one full pass per second, with each tile's pixels staged in a DMA-safe
//! buffer before it is streamed to the panel.
//!
//! # Architecture
//!
//! ```text
//! main.rs (boot, peripherals, refresh loop)
//!         ↓
//! scheduler: pass, settle, interval, forever
//!         ↓
//! renderer: two tiles per step, solid fills, abort on first draw error
//!         ↓
//! pool: one DMA buffer per tile, carved from an arena
//!         ↓
//! display: ST7789 over SPI (hardware), embedded-graphics (simulator, tests)
//! ```
//!
//! # Features
//!
//! - `hardware` - Build for STM32H7 target (embassy, embedded HAL, defmt)
//! - `emulator` - Build for desktop testing (tokio, embedded-graphics-simulator, tracing)
//! - `std` - Enable standard library (for emulator and testing)
//!
//! # Examples
//!
//! ## Hardware Target
//!
//! ```bash
//! cargo build --release --target thumbv7em-none-eabihf --features hardware
//! ```
//!
//! ## Emulator Target
//!
//! ```bash
//! cargo run --example tile_demo --features emulator
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
// Upgrade relevant warns to deny; keep pedantic as warn (too noisy for firmware)
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Critical correctness: deny these
#![deny(clippy::await_holding_lock)] // holding a blocking Mutex across .await is a bug
#![deny(unsafe_op_in_unsafe_fn)]
// unsafe fn body is not implicitly unsafe block
// Logging discipline (allow println in tests via clippy.toml)
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![warn(clippy::dbg_macro)] // dbg! should not be left in committed code
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)] // common in Rust crates; not a real issue
#![allow(clippy::missing_errors_doc)] // most errors are self-explanatory
// Pedantic lints too noisy for firmware application code:
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]
#![allow(clippy::unused_self)]
#![allow(clippy::unused_async)]

#[macro_use]
mod fmt;

pub mod boot;
pub mod display;
pub mod dma;
pub mod exception_handlers;
pub mod pool;
pub mod renderer;
pub mod scheduler;

// Re-export key types
pub use display::{DisplayError, GraphicsSurface, PanelConfig, St7789, SurfaceError};
pub use dma::{Align32, TileArena};
pub use pool::{PoolError, TileBufferPool};
pub use renderer::{PassOutcome, RendererError, TilePosition, TileRenderer};
pub use scheduler::{RefreshScheduler, RefreshStats};

#[cfg(feature = "hardware")]
pub use display::St7789Display;
