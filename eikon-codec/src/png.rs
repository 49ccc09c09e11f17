//! Uncompressed indexed PNG encoder
//!
//! Builds a complete PNG file in a single streaming pass over the pixel
//! data. Each scanline is wrapped in its own zlib stored block, which
//! keeps the output size a closed-form function of the geometry: the
//! buffer can be sized exactly before any pixel exists, and the pixel
//! stream is written directly into its final IDAT position with no
//! staging copy.
//!
//! [`PngConfig`] is the explicit encoder state: construct it once per
//! image, size the output buffer from [`PngConfig::max_file_size`], then
//! call [`PngConfig::encode`]. Independent configs are independent; there
//! is no shared encoder state.

use crate::adler32::Adler32;
use crate::chunk::{self, ChunkPayload};

/// Fixed eight byte PNG file signature
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Bytes per RGB888 palette entry
const PAL_RGB888_SZ: usize = 3;

/// LENGTH + TYPE + CRC framing around every chunk payload
const CHUNK_OVERHEAD: usize = 12;
const CHUNK_LENGTH_SZ: usize = 4;
const CHUNK_TYPE_SZ: usize = 4;

const IHDR_SZ: usize = 13;

const COLOR_TYPE_INDEXED: u8 = 3;
const COMPRESSION_METHOD_DEFLATE: u8 = 0;
const FILTER_METHOD_NONE: u8 = 0;
const INTERLACING_NONE: u8 = 0;

const ROW_FILTER_SZ: usize = 1;
const ROW_FILTER_NONE: u8 = 0;

// CMF: deflate, 32K window. FLG: check bits, no dict, fastest level.
const ZLIB_HEADER: [u8; 2] = [0x78, 0x01];
const ZLIB_HEADER_SZ: usize = 2;
const ZLIB_FOOTER_SZ: usize = 4;

// Final-block flag (1) + length (2) + one's complement length (2)
const STORED_HEADER_SZ: usize = 5;
const STORED_FINAL_NO: u8 = 0;
const STORED_FINAL_YES: u8 = 1;

/// Output bits per palette index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitDepth {
    One = 1,
    Two = 2,
    Four = 4,
    Eight = 8,
}

impl BitDepth {
    pub const fn bits(self) -> u8 {
        self as u8
    }

    pub const fn pixels_per_byte(self) -> u8 {
        8 / self.bits()
    }

    /// Mask that drops index bits the depth cannot represent
    pub const fn index_mask(self) -> u8 {
        ((1u16 << self.bits()) - 1) as u8
    }

    /// Largest PLTE payload this depth can index, in bytes
    pub const fn max_palette_len(self) -> usize {
        (1usize << self.bits()) * PAL_RGB888_SZ
    }
}

/// Layout of the caller's pixel buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelFormat {
    /// One byte per pixel, row-major; values masked to the bit depth
    Indexed8,
    /// Rows already packed at 1 bit per pixel, leftmost pixel in the
    /// high-order bit. Only valid with [`BitDepth::One`].
    Packed1,
}

/// Errors that can occur during encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Output buffer is smaller than [`PngConfig::max_file_size`]
    BufferTooSmall,
    /// Pixel buffer holds fewer entries than the geometry requires
    PixelsTooShort,
    /// Palette buffer is shorter than the configured palette length
    PaletteTooShort,
    /// [`PixelFormat::Packed1`] with a depth other than 1 bpp
    FormatMismatch,
}

/// Encoder configuration and precomputed sizes
///
/// All sizes are fixed by the constructor; the encode pass neither
/// allocates nor measures.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PngConfig {
    width: u8,
    height: u8,
    depth: BitDepth,
    palette_len: usize,
    zlib_len: usize,
    file_len: usize,
}

/// Packed bytes per scanline, rounded up for widths that do not fill
/// the last byte
const fn row_bytes(width: u8, depth: BitDepth) -> usize {
    let ppb = depth.pixels_per_byte() as usize;
    (width as usize + (ppb - 1)) / ppb
}

impl PngConfig {
    /// Compute the configuration for one image
    ///
    /// `palette_len` is the PLTE payload length in bytes (RGB888 triples)
    /// and is clamped to the most entries the depth can index.
    pub const fn new(width: u8, height: u8, depth: BitDepth, palette_len: usize) -> Self {
        let max_palette = depth.max_palette_len();
        let palette_len = if palette_len > max_palette {
            max_palette
        } else {
            palette_len
        };

        let scanline = ROW_FILTER_SZ + row_bytes(width, depth);
        let zlib_len =
            ZLIB_HEADER_SZ + (STORED_HEADER_SZ + scanline) * height as usize + ZLIB_FOOTER_SZ;

        let file_len = PNG_SIGNATURE.len()
            + IHDR_SZ + CHUNK_OVERHEAD
            + palette_len + CHUNK_OVERHEAD
            + zlib_len + CHUNK_OVERHEAD
            + CHUNK_OVERHEAD; // IEND, empty payload

        Self {
            width,
            height,
            depth,
            palette_len,
            zlib_len,
            file_len,
        }
    }

    pub const fn width(&self) -> u8 {
        self.width
    }

    pub const fn height(&self) -> u8 {
        self.height
    }

    pub const fn depth(&self) -> BitDepth {
        self.depth
    }

    /// PLTE payload length after clamping
    pub const fn palette_len(&self) -> usize {
        self.palette_len
    }

    /// Exact output size. Only stored blocks are emitted, so the bound
    /// is also the actual encoded length.
    pub const fn max_file_size(&self) -> usize {
        self.file_len
    }

    /// Offset of the IDAT payload within the output buffer
    const fn idat_payload_offset(&self) -> usize {
        PNG_SIGNATURE.len()
            + IHDR_SZ + CHUNK_OVERHEAD
            + self.palette_len + CHUNK_OVERHEAD
            + CHUNK_LENGTH_SZ + CHUNK_TYPE_SZ
    }

    /// Build the complete PNG file into `out`, returning the byte count
    ///
    /// `out` must be at least [`PngConfig::max_file_size`] bytes; the
    /// length is checked once here and never inside the pixel loop.
    pub fn encode(
        &self,
        palette: &[u8],
        pixels: &[u8],
        format: PixelFormat,
        out: &mut [u8],
    ) -> Result<usize, EncodeError> {
        if out.len() < self.file_len {
            return Err(EncodeError::BufferTooSmall);
        }
        if palette.len() < self.palette_len {
            return Err(EncodeError::PaletteTooShort);
        }
        let pixels_needed = match format {
            PixelFormat::Indexed8 => self.width as usize * self.height as usize,
            PixelFormat::Packed1 => row_bytes(self.width, self.depth) * self.height as usize,
        };
        if pixels.len() < pixels_needed {
            return Err(EncodeError::PixelsTooShort);
        }
        if format == PixelFormat::Packed1 && self.depth != BitDepth::One {
            return Err(EncodeError::FormatMismatch);
        }

        // Pixel stream first, straight into its final IDAT position
        let zlib_written = self.write_pixel_stream(pixels, format, out);

        out[..PNG_SIGNATURE.len()].copy_from_slice(&PNG_SIGNATURE);
        let mut cursor = PNG_SIGNATURE.len();

        // IHDR: write the fields in place, then commit the chunk around them
        let ihdr_start = cursor;
        let mut field = cursor + CHUNK_LENGTH_SZ + CHUNK_TYPE_SZ;
        field = chunk::put_u32_be(out, field, self.width as u32);
        field = chunk::put_u32_be(out, field, self.height as u32);
        out[field] = self.depth.bits();
        out[field + 1] = COLOR_TYPE_INDEXED;
        out[field + 2] = COMPRESSION_METHOD_DEFLATE;
        out[field + 3] = FILTER_METHOD_NONE;
        out[field + 4] = INTERLACING_NONE;
        cursor = chunk::write_chunk(out, ihdr_start, b"IHDR", ChunkPayload::InPlace { len: IHDR_SZ });

        cursor = chunk::write_chunk(
            out,
            cursor,
            b"PLTE",
            ChunkPayload::Copy(&palette[..self.palette_len]),
        );

        // IDAT payload is already assembled in place
        cursor = chunk::write_chunk(out, cursor, b"IDAT", ChunkPayload::InPlace { len: zlib_written });

        cursor = chunk::write_chunk(out, cursor, b"IEND", ChunkPayload::Copy(&[]));

        Ok(cursor)
    }

    /// Write the zlib-wrapped scanlines at their final IDAT offset,
    /// returning the stream length
    fn write_pixel_stream(&self, pixels: &[u8], format: PixelFormat, out: &mut [u8]) -> usize {
        let mut adler = Adler32::new();

        let start = self.idat_payload_offset();
        let mut cursor = start;

        out[cursor..cursor + ZLIB_HEADER_SZ].copy_from_slice(&ZLIB_HEADER);
        cursor += ZLIB_HEADER_SZ;

        let width = self.width as usize;
        let height = self.height as usize;
        let row_len = row_bytes(self.width, self.depth);
        let block_len = (ROW_FILTER_SZ + row_len) as u16;

        let bits = self.depth.bits();
        let mask = self.depth.index_mask();

        for y in 0..height {
            out[cursor] = if y == height - 1 {
                STORED_FINAL_YES
            } else {
                STORED_FINAL_NO
            };
            cursor += 1;
            cursor = chunk::put_u16_le(out, cursor, block_len);
            cursor = chunk::put_u16_le(out, cursor, !block_len);

            // The Adler range is the filter byte plus the packed row,
            // never the stored-block header
            let adler_start = cursor;
            out[cursor] = ROW_FILTER_NONE;
            cursor += 1;

            match format {
                PixelFormat::Packed1 => {
                    let row = &pixels[y * row_len..(y + 1) * row_len];
                    out[cursor..cursor + row_len].copy_from_slice(row);
                    cursor += row_len;
                }
                PixelFormat::Indexed8 => {
                    let row = &pixels[y * width..(y + 1) * width];
                    // Leftmost pixel lands in the high-order bits
                    let mut packed = 0u8;
                    let mut used = 0u8;
                    for &index in row {
                        packed = (((packed as u16) << bits) as u8) | (index & mask);
                        used += bits;
                        if used == 8 {
                            out[cursor] = packed;
                            cursor += 1;
                            packed = 0;
                            used = 0;
                        }
                    }
                    if used != 0 {
                        // Residual pixels shift up; the low-order bits of
                        // the last byte are wasted per the format
                        out[cursor] = packed << (8 - used);
                        cursor += 1;
                    }
                }
            }

            adler.update(&out[adler_start..cursor]);
        }

        // Stream trailer: Adler-32 big-endian, b half first
        cursor = chunk::put_u32_be(out, cursor, adler.finish());

        cursor - start
    }
}
