//! Board-agnostic export logic for the Eikon sketch device
//!
//! This crate contains everything between the drawing surface and the
//! QR code that does not touch hardware:
//!
//! - Collaborator contracts (pixel capture, QR generation)
//! - The fixed-capacity export arena
//! - The export pipeline: capture → PNG → base64 data URL → QR handoff
//! - Canvas geometry and export settings
//!
//! Hardware-specific crates implement the traits; the pipeline only sees
//! byte buffers and results. The whole pipeline is synchronous and runs
//! to completion in one call.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod arena;
pub mod config;
pub mod export;
pub mod traits;

pub use arena::ExportArena;
pub use config::ExportSettings;
pub use export::{ExportError, ExportPipeline, ExportStats};
pub use traits::{CaptureError, PixelCapture, QrCode};
