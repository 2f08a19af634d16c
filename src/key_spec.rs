//! HMAC key specifications and MAC algorithm identifiers.
//!
//! Every MAC key is created with one of four fixed key specs. The spec fixes
//! the digest used by the HMAC construction, the exact length of every
//! backing key version, and the single MAC algorithm the key advertises:
//!
//! | Key spec   | Digest  | Key length | MAC algorithm  |
//! |------------|---------|------------|----------------|
//! | `HMAC_224` | SHA-224 | 28 bytes   | `HMAC_SHA_224` |
//! | `HMAC_256` | SHA-256 | 32 bytes   | `HMAC_SHA_256` |
//! | `HMAC_384` | SHA-384 | 48 bytes   | `HMAC_SHA_384` |
//! | `HMAC_512` | SHA-512 | 64 bytes   | `HMAC_SHA_512` |

use serde::{Deserialize, Serialize};

/// Error returned when parsing a key spec or MAC algorithm name fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNameError {
    input: String,
    kind: NameKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameKind {
    KeySpec,
    MacAlgorithm,
}

impl ParseNameError {
    /// The rejected input.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl std::fmt::Display for ParseNameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            NameKind::KeySpec => write!(
                f,
                "unsupported key spec '{}'; expected one of: HMAC_224, HMAC_256, HMAC_384, HMAC_512",
                self.input
            ),
            NameKind::MacAlgorithm => write!(
                f,
                "unsupported MAC algorithm '{}'; expected one of: HMAC_SHA_224, HMAC_SHA_256, HMAC_SHA_384, HMAC_SHA_512",
                self.input
            ),
        }
    }
}

impl std::error::Error for ParseNameError {}

/// HMAC key specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeySpec {
    /// 224-bit key for HMAC-SHA-224
    #[serde(rename = "HMAC_224")]
    Hmac224,
    /// 256-bit key for HMAC-SHA-256
    #[serde(rename = "HMAC_256")]
    Hmac256,
    /// 384-bit key for HMAC-SHA-384
    #[serde(rename = "HMAC_384")]
    Hmac384,
    /// 512-bit key for HMAC-SHA-512
    #[serde(rename = "HMAC_512")]
    Hmac512,
}

/// MAC algorithm identifiers accepted by `GenerateMac` and `VerifyMac`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MacAlgorithm {
    #[serde(rename = "HMAC_SHA_224")]
    HmacSha224,
    #[serde(rename = "HMAC_SHA_256")]
    HmacSha256,
    #[serde(rename = "HMAC_SHA_384")]
    HmacSha384,
    #[serde(rename = "HMAC_SHA_512")]
    HmacSha512,
}

/// Digest function underlying an HMAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl DigestAlgorithm {
    /// Digest output length in bytes, which is also the MAC length.
    pub fn output_len(self) -> usize {
        match self {
            Self::Sha224 => 28,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }
}

/// Everything a key spec determines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySpecInfo {
    /// Digest used by the HMAC construction.
    pub digest: DigestAlgorithm,
    /// Exact length every backing key version must have.
    pub key_len: usize,
    /// The one MAC algorithm a key of this spec advertises.
    pub algorithm: MacAlgorithm,
}

/// All supported key specs, smallest first.
pub const ALL_KEY_SPECS: [KeySpec; 4] = [
    KeySpec::Hmac224,
    KeySpec::Hmac256,
    KeySpec::Hmac384,
    KeySpec::Hmac512,
];

impl KeySpec {
    /// Describe this spec.
    ///
    /// ```
    /// use kms_mac::{DigestAlgorithm, KeySpec, MacAlgorithm};
    ///
    /// let info = KeySpec::Hmac384.describe();
    /// assert_eq!(info.digest, DigestAlgorithm::Sha384);
    /// assert_eq!(info.key_len, 48);
    /// assert_eq!(info.algorithm, MacAlgorithm::HmacSha384);
    /// ```
    pub fn describe(self) -> KeySpecInfo {
        match self {
            Self::Hmac224 => KeySpecInfo {
                digest: DigestAlgorithm::Sha224,
                key_len: 28,
                algorithm: MacAlgorithm::HmacSha224,
            },
            Self::Hmac256 => KeySpecInfo {
                digest: DigestAlgorithm::Sha256,
                key_len: 32,
                algorithm: MacAlgorithm::HmacSha256,
            },
            Self::Hmac384 => KeySpecInfo {
                digest: DigestAlgorithm::Sha384,
                key_len: 48,
                algorithm: MacAlgorithm::HmacSha384,
            },
            Self::Hmac512 => KeySpecInfo {
                digest: DigestAlgorithm::Sha512,
                key_len: 64,
                algorithm: MacAlgorithm::HmacSha512,
            },
        }
    }

    /// Required backing key length in bytes.
    pub fn key_len(self) -> usize {
        self.describe().key_len
    }

    /// The MAC algorithm advertised by keys of this spec.
    pub fn mac_algorithm(self) -> MacAlgorithm {
        self.describe().algorithm
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hmac224 => "HMAC_224",
            Self::Hmac256 => "HMAC_256",
            Self::Hmac384 => "HMAC_384",
            Self::Hmac512 => "HMAC_512",
        }
    }
}

impl std::fmt::Display for KeySpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for KeySpec {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HMAC_224" => Ok(Self::Hmac224),
            "HMAC_256" => Ok(Self::Hmac256),
            "HMAC_384" => Ok(Self::Hmac384),
            "HMAC_512" => Ok(Self::Hmac512),
            _ => Err(ParseNameError {
                input: s.to_string(),
                kind: NameKind::KeySpec,
            }),
        }
    }
}

impl MacAlgorithm {
    /// Digest used to compute MACs with this algorithm.
    pub fn digest(self) -> DigestAlgorithm {
        match self {
            Self::HmacSha224 => DigestAlgorithm::Sha224,
            Self::HmacSha256 => DigestAlgorithm::Sha256,
            Self::HmacSha384 => DigestAlgorithm::Sha384,
            Self::HmacSha512 => DigestAlgorithm::Sha512,
        }
    }

    /// Length of the MAC produced by this algorithm.
    pub fn mac_len(self) -> usize {
        self.digest().output_len()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::HmacSha224 => "HMAC_SHA_224",
            Self::HmacSha256 => "HMAC_SHA_256",
            Self::HmacSha384 => "HMAC_SHA_384",
            Self::HmacSha512 => "HMAC_SHA_512",
        }
    }
}

impl std::fmt::Display for MacAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MacAlgorithm {
    type Err = ParseNameError;

    // Names are matched exactly; the service rejects lowercase variants.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HMAC_SHA_224" => Ok(Self::HmacSha224),
            "HMAC_SHA_256" => Ok(Self::HmacSha256),
            "HMAC_SHA_384" => Ok(Self::HmacSha384),
            "HMAC_SHA_512" => Ok(Self::HmacSha512),
            _ => Err(ParseNameError {
                input: s.to_string(),
                kind: NameKind::MacAlgorithm,
            }),
        }
    }
}
