//! Formatting utilities.
//!
//! ## Hex Encoding
//!
//! The [`hex`] module provides hexadecimal encoding and decoding, used for
//! backing keys in seed records.
//!
//! ```
//! use kms_mac::format::hex;
//!
//! let encoded = hex::encode(&[0xca, 0xfe]);
//! assert_eq!(encoded, "cafe");
//! assert_eq!(hex::decode(&encoded).unwrap(), vec![0xca, 0xfe]);
//! ```

pub mod hex;
