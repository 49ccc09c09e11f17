//! Canvas geometry and export settings
//!
//! The drawing surface is tile aligned: capture hands back whole 8-pixel
//! tile rows, so canvas widths are multiples of 8.

use eikon_codec::base64;
use eikon_codec::palettes::PAL_1BPP_WHITE_BLACK;
use eikon_codec::png::{BitDepth, PngConfig};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tile edge in pixels
pub const TILE_SZ_PX: usize = 8;

/// Drawing canvas size in tiles
pub const CANVAS_WIDTH_TILES: usize = 12;
pub const CANVAS_HEIGHT_TILES: usize = 12;

/// Drawing canvas size in pixels
pub const CANVAS_WIDTH_PX: u8 = (CANVAS_WIDTH_TILES * TILE_SZ_PX) as u8;
pub const CANVAS_HEIGHT_PX: u8 = (CANVAS_HEIGHT_TILES * TILE_SZ_PX) as u8;

/// Packed 1 bpp byte count for the full canvas
pub const CANVAS_1BPP_BYTES: usize = (CANVAS_WIDTH_PX as usize / 8) * CANVAS_HEIGHT_PX as usize;

/// File region capacity: exact worst case for the full canvas PNG
pub const FILE_BUF_LEN: usize = PngConfig::new(
    CANVAS_WIDTH_PX,
    CANVAS_HEIGHT_PX,
    BitDepth::One,
    PAL_1BPP_WHITE_BLACK.len(),
)
.max_file_size();

/// Scratch region capacity: the captured pixels on the way in, the data
/// URL text on the way out, so sized for the larger of the two
pub const SCRATCH_BUF_LEN: usize = base64::url_encoded_len(FILE_BUF_LEN);

// The data URL always outgrows the packed pixels it replaces
const _: () = assert!(SCRATCH_BUF_LEN >= CANVAS_1BPP_BYTES);

/// Settings for the share pipeline
///
/// The share path is monochrome: capture produces 1 bit per pixel and
/// the PNG is written at 1 bpp with the white/black palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExportSettings {
    /// Exported width in pixels (multiple of 8)
    pub width: u8,
    /// Exported height in pixels
    pub height: u8,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH_PX,
            height: CANVAS_HEIGHT_PX,
        }
    }
}

impl ExportSettings {
    /// Packed bytes per captured row
    pub const fn row_bytes(&self) -> usize {
        (self.width as usize + 7) / 8
    }

    /// Packed byte count capture must produce
    pub const fn pixel_bytes(&self) -> usize {
        self.row_bytes() * self.height as usize
    }

    /// Encoder configuration for these settings
    pub const fn png_config(&self) -> PngConfig {
        PngConfig::new(
            self.width,
            self.height,
            BitDepth::One,
            PAL_1BPP_WHITE_BLACK.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_covers_canvas() {
        let settings = ExportSettings::default();
        assert_eq!(settings.width, 96);
        assert_eq!(settings.height, 96);
        assert_eq!(settings.pixel_bytes(), CANVAS_1BPP_BYTES);
    }

    #[test]
    fn test_region_capacities() {
        let settings = ExportSettings::default();
        let config = settings.png_config();

        assert_eq!(config.max_file_size(), FILE_BUF_LEN);
        assert!(SCRATCH_BUF_LEN >= settings.pixel_bytes());
        assert!(SCRATCH_BUF_LEN >= base64::url_encoded_len(config.max_file_size()));
    }

    #[test]
    fn test_row_bytes_rounds_up() {
        let settings = ExportSettings {
            width: 12,
            height: 3,
        };
        assert_eq!(settings.row_bytes(), 2);
        assert_eq!(settings.pixel_bytes(), 6);
    }
}
