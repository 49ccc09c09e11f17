//! QR code generator trait

/// Trait for the on-device QR code generator
///
/// Generation runs in byte mode: the alphanumeric character set cannot
/// represent a full data URL (base64 output plus the `;` and `,` of the
/// MIME header).
pub trait QrCode {
    /// Largest text payload the generator accepts, in bytes
    const MAX_TEXT_LEN: usize;

    /// Build the QR bit matrix for `text`
    ///
    /// Returns false when generation fails (payload too long for the
    /// configured version and error-correction level).
    fn generate(&mut self, text: &[u8]) -> bool;

    /// Paint the previously generated matrix to the screen
    fn render(&mut self);
}
