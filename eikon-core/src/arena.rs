//! Fixed-capacity working memory for the export pipeline
//!
//! Two regions cover the whole pipeline. The scratch region holds the
//! captured pixels first and the data URL text last; the file region
//! holds the PNG in between:
//!
//! ```text
//!            scratch region      file region
//! capture    pixels (write)      -
//! encode     pixels (read)       png file (write)
//! text       data url (write)    png file (read)
//! ```
//!
//! Each stage leases exactly the regions it touches, and every lease
//! mutably borrows the arena, so the text stage cannot start while the
//! encode stage still holds the pixel bytes it is about to overwrite.

/// Two-region buffer arena
///
/// `SCRATCH` must hold both the packed capture and the final data URL;
/// `FILE` must hold the PNG file. [`crate::config::SCRATCH_BUF_LEN`] and
/// [`crate::config::FILE_BUF_LEN`] size both for the full canvas.
pub struct ExportArena<const SCRATCH: usize, const FILE: usize> {
    scratch: [u8; SCRATCH],
    file: [u8; FILE],
}

impl<const SCRATCH: usize, const FILE: usize> ExportArena<SCRATCH, FILE> {
    pub const fn new() -> Self {
        Self {
            scratch: [0; SCRATCH],
            file: [0; FILE],
        }
    }

    /// Capture stage: the whole scratch region, writable
    pub fn capture_lease(&mut self) -> &mut [u8] {
        &mut self.scratch
    }

    /// Encode stage: captured pixels read-only, file region writable
    pub fn encode_lease(&mut self) -> (&[u8], &mut [u8]) {
        (&self.scratch, &mut self.file)
    }

    /// Text stage: finished file read-only, text written back over the
    /// pixel bytes the encode stage has fully consumed
    pub fn text_lease(&mut self) -> (&[u8], &mut [u8]) {
        (&self.file, &mut self.scratch)
    }
}

impl<const SCRATCH: usize, const FILE: usize> Default for ExportArena<SCRATCH, FILE> {
    fn default() -> Self {
        Self::new()
    }
}
