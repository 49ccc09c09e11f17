//! Export pipeline: capture → PNG → base64 data URL → QR handoff
//!
//! The pipeline runs to completion as one synchronous call. Stage order
//! is a correctness invariant, not a convention: the data URL is written
//! back over the captured pixels, which is only sound because the PNG
//! encoder has fully consumed them by then. The arena's lease structure
//! makes that ordering a compile-time fact.

use eikon_codec::base64;
use eikon_codec::palettes::PAL_1BPP_WHITE_BLACK;
use eikon_codec::png::{EncodeError, PixelFormat};

use crate::arena::ExportArena;
use crate::config::ExportSettings;
use crate::traits::{CaptureError, PixelCapture, QrCode};

/// Errors that can occur during an export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExportError {
    /// Reading the drawing surface failed
    Capture(CaptureError),
    /// PNG encoding failed
    Encode(EncodeError),
    /// Arena scratch region cannot hold the data URL
    ArenaTooSmall,
    /// Data URL exceeds the QR generator's maximum payload.
    /// An expected outcome for large drawings, not a fault.
    TextTooLong,
    /// The QR generator refused the payload
    QrRejected,
}

/// Outcome of a successful export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ExportStats {
    /// Packed bytes read from the drawing surface
    pub captured_len: usize,
    /// PNG file size
    pub png_len: usize,
    /// Data URL length, prefix and terminator included
    pub text_len: usize,
}

/// Sequences one drawing through capture, encoding and QR generation
///
/// Each run is a pure function of the drawing surface contents; nothing
/// is retried, and independent pipelines are fully independent.
pub struct ExportPipeline {
    settings: ExportSettings,
}

impl ExportPipeline {
    pub fn new(settings: ExportSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Run the full export over `arena`, handing the finished data URL
    /// to `qr`
    pub fn run<const S: usize, const F: usize, C, Q>(
        &self,
        arena: &mut ExportArena<S, F>,
        capture: &mut C,
        qr: &mut Q,
    ) -> Result<ExportStats, ExportError>
    where
        C: PixelCapture,
        Q: QrCode,
    {
        // Stage 1: read the drawing into the scratch region
        let captured_len = capture
            .capture(arena.capture_lease())
            .map_err(ExportError::Capture)?;

        // Stage 2: build the PNG in place in the file region
        let config = self.settings.png_config();
        let (pixels, file) = arena.encode_lease();
        let png_len = config
            .encode(
                &PAL_1BPP_WHITE_BLACK,
                &pixels[..captured_len],
                PixelFormat::Packed1,
                file,
            )
            .map_err(ExportError::Encode)?;

        // Stage 3: data URL written back over the consumed pixels
        let (file, text) = arena.text_lease();
        if text.len() < base64::url_encoded_len(png_len) {
            return Err(ExportError::ArenaTooSmall);
        }
        let text_len = base64::encode_to_url(text, &file[..png_len]);

        // Stage 4: QR handoff. The length gate lives here because this
        // is the last point where both the text and its length are known.
        if text_len > Q::MAX_TEXT_LEN {
            return Err(ExportError::TextTooLong);
        }
        if !qr.generate(&text[..text_len]) {
            return Err(ExportError::QrRejected);
        }
        qr.render();

        Ok(ExportStats {
            captured_len,
            png_len,
            text_len,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FILE_BUF_LEN, SCRATCH_BUF_LEN};
    use heapless::Vec;

    type CanvasArena = ExportArena<SCRATCH_BUF_LEN, FILE_BUF_LEN>;

    /// Fills the frame with a fixed byte pattern
    struct PatternCapture {
        fill: u8,
        len: usize,
        fail: bool,
    }

    impl PixelCapture for PatternCapture {
        fn capture(&mut self, dst: &mut [u8]) -> Result<usize, CaptureError> {
            if self.fail {
                return Err(CaptureError::NotReady);
            }
            dst[..self.len].fill(self.fill);
            Ok(self.len)
        }
    }

    /// Records the handed-off text instead of building a matrix
    struct MockQr<const MAX: usize> {
        accept: bool,
        rendered: bool,
        received: Vec<u8, 4096>,
    }

    impl<const MAX: usize> MockQr<MAX> {
        fn new(accept: bool) -> Self {
            Self {
                accept,
                rendered: false,
                received: Vec::new(),
            }
        }
    }

    impl<const MAX: usize> QrCode for MockQr<MAX> {
        const MAX_TEXT_LEN: usize = MAX;

        fn generate(&mut self, text: &[u8]) -> bool {
            self.received.extend_from_slice(text).unwrap();
            self.accept
        }

        fn render(&mut self) {
            self.rendered = true;
        }
    }

    fn pipeline() -> (ExportPipeline, PatternCapture) {
        let settings = ExportSettings::default();
        let capture = PatternCapture {
            fill: 0b1010_0101,
            len: settings.pixel_bytes(),
            fail: false,
        };
        (ExportPipeline::new(settings), capture)
    }

    #[test]
    fn test_full_export() {
        let (pipeline, mut capture) = pipeline();
        let mut arena = CanvasArena::new();
        let mut qr = MockQr::<4096>::new(true);

        let stats = pipeline.run(&mut arena, &mut capture, &mut qr).unwrap();

        assert_eq!(stats.captured_len, 96 * 96 / 8);
        assert_eq!(stats.png_len, FILE_BUF_LEN);
        assert_eq!(stats.text_len, base64::url_encoded_len(stats.png_len));

        assert!(qr.rendered);
        assert_eq!(qr.received.len(), stats.text_len);
        assert!(qr.received.starts_with(base64::DATA_URL_PNG_PREFIX));
        assert_eq!(*qr.received.last().unwrap(), 0);
    }

    #[test]
    fn test_handed_off_text_is_ascii() {
        let (pipeline, mut capture) = pipeline();
        let mut arena = CanvasArena::new();
        let mut qr = MockQr::<4096>::new(true);

        pipeline.run(&mut arena, &mut capture, &mut qr).unwrap();

        // Everything between prefix and NUL is base64 text
        let body = &qr.received[base64::DATA_URL_PNG_PREFIX.len()..qr.received.len() - 1];
        assert!(body
            .iter()
            .all(|&c| c.is_ascii_alphanumeric() || c == b'+' || c == b'/' || c == b'='));
    }

    #[test]
    fn test_capture_failure_short_circuits() {
        let (pipeline, mut capture) = pipeline();
        capture.fail = true;
        let mut arena = CanvasArena::new();
        let mut qr = MockQr::<4096>::new(true);

        let result = pipeline.run(&mut arena, &mut capture, &mut qr);
        assert_eq!(result, Err(ExportError::Capture(CaptureError::NotReady)));
        assert!(qr.received.is_empty());
        assert!(!qr.rendered);
    }

    #[test]
    fn test_short_capture_fails_encode() {
        let (pipeline, mut capture) = pipeline();
        capture.len = 10;
        let mut arena = CanvasArena::new();
        let mut qr = MockQr::<4096>::new(true);

        let result = pipeline.run(&mut arena, &mut capture, &mut qr);
        assert_eq!(
            result,
            Err(ExportError::Encode(EncodeError::PixelsTooShort))
        );
    }

    #[test]
    fn test_oversized_text_aborts_before_generation() {
        let (pipeline, mut capture) = pipeline();
        let mut arena = CanvasArena::new();
        let mut qr = MockQr::<100>::new(true);

        let result = pipeline.run(&mut arena, &mut capture, &mut qr);
        assert_eq!(result, Err(ExportError::TextTooLong));
        // The generator was never invoked
        assert!(qr.received.is_empty());
        assert!(!qr.rendered);
    }

    #[test]
    fn test_generator_rejection() {
        let (pipeline, mut capture) = pipeline();
        let mut arena = CanvasArena::new();
        let mut qr = MockQr::<4096>::new(false);

        let result = pipeline.run(&mut arena, &mut capture, &mut qr);
        assert_eq!(result, Err(ExportError::QrRejected));
        assert!(!qr.rendered);
    }

    #[test]
    fn test_runs_are_independent() {
        let (pipeline, mut capture) = pipeline();
        let mut arena = CanvasArena::new();

        let mut first = MockQr::<4096>::new(true);
        let mut second = MockQr::<4096>::new(true);

        let a = pipeline.run(&mut arena, &mut capture, &mut first).unwrap();
        let b = pipeline.run(&mut arena, &mut capture, &mut second).unwrap();

        assert_eq!(a, b);
        assert_eq!(first.received, second.received);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn any_fill_exports(fill in any::<u8>(), tiles_w in 1u8..=12, tiles_h in 1u8..=12) {
                let settings = ExportSettings {
                    width: tiles_w * 8,
                    height: tiles_h * 8,
                };
                let pipeline = ExportPipeline::new(settings);
                let mut capture = PatternCapture {
                    fill,
                    len: settings.pixel_bytes(),
                    fail: false,
                };
                let mut arena = CanvasArena::new();
                let mut qr = MockQr::<4096>::new(true);

                let stats = pipeline.run(&mut arena, &mut capture, &mut qr).unwrap();

                prop_assert_eq!(stats.png_len, settings.png_config().max_file_size());
                prop_assert_eq!(stats.text_len, base64::url_encoded_len(stats.png_len));
                prop_assert!(qr.rendered);
            }
        }
    }
}
