//! Byte-exact image and text codecs for the Eikon sketch device
//!
//! Everything here writes into caller-owned, pre-sized buffers in a single
//! pass. There is no allocation and no general-purpose compression: the
//! device has a few kilobytes of working RAM, so the PNG encoder emits
//! zlib "stored" blocks only and the output size is known exactly before
//! the first byte is written.
//!
//! # PNG file layout
//!
//! One of each chunk type, in this order:
//!
//! ```text
//! ┌───────────┬──────┬──────┬───────────────────────────────┬──────┐
//! │ Signature │ IHDR │ PLTE │ IDAT                          │ IEND │
//! │ 8B        │      │      │  zlib hdr (2B)                │      │
//! │           │      │      │  stored block per pixel row:  │      │
//! │           │      │      │    final flag (1B)            │      │
//! │           │      │      │    length / ~length (2B+2B)   │      │
//! │           │      │      │    filter byte (1B)           │      │
//! │           │      │      │    packed row data            │      │
//! │           │      │      │  Adler-32 trailer (4B)        │      │
//! └───────────┴──────┴──────┴───────────────────────────────┴──────┘
//! ```
//!
//! Each chunk is framed as LENGTH (4B BE) + TYPE (4B) + payload +
//! CRC-32 over TYPE and payload.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod adler32;
pub mod base64;
pub mod chunk;
pub mod crc32;
pub mod palettes;
pub mod png;

pub use adler32::Adler32;
pub use chunk::{write_chunk, ChunkPayload};
pub use crc32::crc32;
pub use png::{BitDepth, EncodeError, PixelFormat, PngConfig, PNG_SIGNATURE};
