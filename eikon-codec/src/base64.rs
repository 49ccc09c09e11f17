//! Base64 text encoding for data URLs
//!
//! Symbols 62 and 63 are a build-time choice: the default alphabet uses
//! `+` and `/`, the `url-alphabet` crate feature switches to `-` and `_`.
//! Nothing selects the alphabet at runtime.

#[cfg(not(feature = "url-alphabet"))]
const SYM_62: u8 = b'+';
#[cfg(not(feature = "url-alphabet"))]
const SYM_63: u8 = b'/';

#[cfg(feature = "url-alphabet")]
const SYM_62: u8 = b'-';
#[cfg(feature = "url-alphabet")]
const SYM_63: u8 = b'_';

const PADDING_CHAR: u8 = b'=';

#[rustfmt::skip]
const DIGITS: [u8; 64] = [
    b'A', b'B', b'C', b'D', b'E', b'F', b'G', b'H',
    b'I', b'J', b'K', b'L', b'M', b'N', b'O', b'P',
    b'Q', b'R', b'S', b'T', b'U', b'V', b'W', b'X',
    b'Y', b'Z', b'a', b'b', b'c', b'd', b'e', b'f',
    b'g', b'h', b'i', b'j', b'k', b'l', b'm', b'n',
    b'o', b'p', b'q', b'r', b's', b't', b'u', b'v',
    b'w', b'x', b'y', b'z', b'0', b'1', b'2', b'3',
    b'4', b'5', b'6', b'7', b'8', b'9', SYM_62, SYM_63,
];

/// Data URL prefix for PNG image payloads
pub const DATA_URL_PNG_PREFIX: &[u8] = b"data:image/png;base64,";

/// Data URL prefix for arbitrary binary payloads
pub const DATA_URL_OCTET_PREFIX: &[u8] = b"data:application/octet-stream;base64,";

/// Encoded length for `n` source bytes, padding included
pub const fn encoded_len(n: usize) -> usize {
    ((n + 2) / 3) * 4
}

/// Buffer length needed by [`encode_to_url`]: prefix, encoded payload,
/// NUL terminator
pub const fn url_encoded_len(n: usize) -> usize {
    DATA_URL_PNG_PREFIX.len() + encoded_len(n) + 1
}

/// Encode `src` into `dst`, returning the number of bytes written
///
/// `dst` must hold at least [`encoded_len`] of `src.len()` bytes.
pub fn encode(dst: &mut [u8], src: &[u8]) -> usize {
    let mut di = 0;

    let mut groups = src.chunks_exact(3);
    for group in &mut groups {
        let (b1, b2, b3) = (group[0], group[1], group[2]);
        dst[di] = DIGITS[(b1 >> 2) as usize];                          // Byte0[7..2]
        dst[di + 1] = DIGITS[(((b1 & 0x03) << 4) | (b2 >> 4)) as usize]; // Byte0[1..0] with Byte1[7..4]
        dst[di + 2] = DIGITS[(((b2 & 0x0F) << 2) | (b3 >> 6)) as usize]; // Byte1[3..0] with Byte2[7..6]
        dst[di + 3] = DIGITS[(b3 & 0x3F) as usize];                    // Byte2[5..0]
        di += 4;
    }

    // Phantom trailing source bits read as zero
    match *groups.remainder() {
        [b1] => {
            dst[di] = DIGITS[(b1 >> 2) as usize];
            dst[di + 1] = DIGITS[((b1 & 0x03) << 4) as usize];
            dst[di + 2] = PADDING_CHAR;
            dst[di + 3] = PADDING_CHAR;
            di += 4;
        }
        [b1, b2] => {
            dst[di] = DIGITS[(b1 >> 2) as usize];
            dst[di + 1] = DIGITS[(((b1 & 0x03) << 4) | (b2 >> 4)) as usize];
            dst[di + 2] = DIGITS[((b2 & 0x0F) << 2) as usize];
            dst[di + 3] = PADDING_CHAR;
            di += 4;
        }
        _ => {}
    }

    di
}

/// Encode `src` as a ready-to-embed PNG data URL with a trailing NUL,
/// returning the combined length
///
/// `dst` must hold at least [`url_encoded_len`] of `src.len()` bytes.
pub fn encode_to_url(dst: &mut [u8], src: &[u8]) -> usize {
    // Encode past the prefix, then lay the prefix in front
    let mut len = encode(&mut dst[DATA_URL_PNG_PREFIX.len()..], src);
    dst[..DATA_URL_PNG_PREFIX.len()].copy_from_slice(DATA_URL_PNG_PREFIX);
    len += DATA_URL_PNG_PREFIX.len();

    // NUL terminator for collaborators that expect C strings
    dst[len] = 0;
    len + 1
}
