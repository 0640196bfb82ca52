//! Hardware Abstraction Layer (HAL) for the tile refresh firmware
//!
//! This crate holds everything the tile renderer needs to know about the
//! outside world, expressed as traits and plain data, so the renderer and the
//! buffer pool can be developed and tested without a panel attached.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate: pool, renderer, scheduler)
//!         ↓
//! Platform HAL (this crate - geometry, traits, DMA arena)
//!         ↓
//! Hardware Layer (ST7789 driver, Embassy HAL + PAC)
//! ```
//!
//! # Boundary traits
//!
//! - [`DrawSurface`] - blits one rectangle of RGB565 pixels
//! - [`ColorSource`] - yields color pairs for solid tile fills
//! - [`DmaAllocator`] - hands out DMA-capable pixel buffers
//!
//! # Features
//!
//! - `std`: Enable host-only items (`mocks`, `HostRam`)
//! - `defmt`: Enable defmt logging derives
//!
//! # Example
//!
//! ```no_run
//! use platform::{DrawSurface, TileRect};
//!
//! async fn clear<D: DrawSurface>(surface: &mut D, rect: TileRect, pixels: &[u16]) {
//!     surface.draw(rect, pixels).await.ok();
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // hex addresses and register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors: callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::new_without_default)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

pub mod color;
pub mod config;
pub mod display;
pub mod dma;
pub mod dma_safety;
pub mod geometry;
pub mod mocks;

// Re-export boundary traits and the types that cross them
pub use color::{ColorPair, ColorSource, WordColorSource, Xorshift32};
pub use config::RefreshConfig;
pub use display::{DrawError, DrawSurface, RawPixel};
pub use dma::{AllocError, DmaAllocator, DmaArena};
pub use geometry::{DisplayGeometry, DisplayGrid, GeometryError, Span, TilePair, TileRect};
