//! Hexadecimal encoding and decoding utilities.

/// Encode bytes as lowercase hex string.
///
/// # Examples
///
/// ```
/// use kms_mac::format::hex::encode;
///
/// assert_eq!(encode(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
/// assert_eq!(encode(&[0x00, 0xff]), "00ff");
/// ```
pub fn encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Decode hex string to bytes.
///
/// Accepts either case. Returns an error for invalid hex characters or
/// odd-length strings.
///
/// # Examples
///
/// ```
/// use kms_mac::format::hex::{DecodeError, decode};
///
/// assert_eq!(decode("deadbeef").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
/// assert_eq!(decode("00FF").unwrap(), vec![0x00, 0xff]);
/// assert_eq!(decode("xyz0"), Err(DecodeError::InvalidChar { index: 0 }));
/// assert_eq!(decode("abc"), Err(DecodeError::OddLength)); // odd length
/// ```
pub fn decode(s: &str) -> Result<Vec<u8>, DecodeError> {
    let bytes = s.as_bytes();
    if !bytes.len().is_multiple_of(2) {
        return Err(DecodeError::OddLength);
    }
    bytes
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| {
            let hi = nibble(pair[0]).ok_or(DecodeError::InvalidChar { index: i * 2 })?;
            let lo = nibble(pair[1]).ok_or(DecodeError::InvalidChar { index: i * 2 + 1 })?;
            Ok((hi << 4) | lo)
        })
        .collect()
}

fn nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Error type for hex decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Input has odd length (must be pairs of hex digits)
    #[error("odd number of hex digits")]
    OddLength,
    /// Invalid hexadecimal character
    #[error("invalid hex character at index {index}")]
    InvalidChar { index: usize },
}
