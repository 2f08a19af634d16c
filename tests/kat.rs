//! Known-Answer Tests (KAT) for MAC generation.
//!
//! Each key spec is exercised through an imported key holding the bytes
//! `00 01 02 ..` of the spec's key length, so the expected MACs can be
//! reproduced with any HMAC implementation.

mod common;

use common::{external_key, key_bytes};
use kms_mac::testing::{decode_hex, encode_hex};
use kms_mac::{DigestAlgorithm, KeySpec, MacAlgorithm, compute_hmac};

struct Vector {
    spec: KeySpec,
    message: &'static [u8],
    mac: &'static str,
}

const HELLO: &[Vector] = &[
    Vector {
        spec: KeySpec::Hmac224,
        message: b"hello",
        mac: "c09239b6faaf3854e3427a07c584fe1d293080e91c1bc7157a50df0c",
    },
    Vector {
        spec: KeySpec::Hmac256,
        message: b"hello",
        mac: "53c40272a70c15ca4ee0af4df1f155fd6c41e00ce2307d8987ecd4bb36a7e990",
    },
    Vector {
        spec: KeySpec::Hmac384,
        message: b"hello",
        mac: "4e06ed828feefad17a79f67d15bc21019146581086b60ddd0405f6943d3a40327ec1384a2254df1cdb35eb5b1564bad5",
    },
    Vector {
        spec: KeySpec::Hmac512,
        message: b"hello",
        mac: "a368b9ee93c0db9aa6613651020032e7b89b28c664a3a8c1319b2b6616a96854cd88307bc997e8728b50d4027adc09ad92adfd22983ff835f5844d73ec339bdc",
    },
];

const NOTHING: &[Vector] = &[
    Vector {
        spec: KeySpec::Hmac224,
        message: b"what do ya want for nothing?",
        mac: "bf43ffd96fc2324eebe3f097b440ad68045a11c24ae6e1b288531dab",
    },
    Vector {
        spec: KeySpec::Hmac256,
        message: b"what do ya want for nothing?",
        mac: "099805f4ac310786968565c098db515cc50862b420ae31e20238312344bed36a",
    },
    Vector {
        spec: KeySpec::Hmac384,
        message: b"what do ya want for nothing?",
        mac: "822101068661a631a5bc51aa6bd788bfa7f96480291d0449f95bde86d684652a7b39c9410d114487fdc8f7a246714e42",
    },
    Vector {
        spec: KeySpec::Hmac512,
        message: b"what do ya want for nothing?",
        mac: "a4e4293ad3d01934e3485a2e4b5d4d4b21eee4105f5774e35dafb3d53c6d885e47134b39a81705c0af381c23be19b9c7d63cd25fca21dcbddeb242210629f646",
    },
];

#[test]
fn test_generate_mac_known_answers() {
    for v in HELLO.iter().chain(NOTHING) {
        let key = external_key(v.spec);
        key.import_key_material(&key_bytes(v.spec.key_len())).unwrap();

        let mac = key.generate_mac(v.message, v.spec.mac_algorithm()).unwrap();
        assert_eq!(mac.len(), v.spec.mac_algorithm().mac_len());
        assert_eq!(encode_hex(&mac), v.mac, "{} MAC mismatch", v.spec);
    }
}

#[test]
fn test_verify_mac_known_answers() {
    for v in HELLO.iter().chain(NOTHING) {
        let key = external_key(v.spec);
        key.import_key_material(&key_bytes(v.spec.key_len())).unwrap();

        let expected = decode_hex(v.mac).unwrap();
        assert!(
            key.verify_mac(v.message, &expected, v.spec.mac_algorithm())
                .unwrap(),
            "{} known MAC rejected",
            v.spec
        );
    }
}

#[test]
fn test_compute_hmac_matches_key_path() {
    for v in HELLO {
        let digest = v.spec.describe().digest;
        let mac = compute_hmac(digest, &key_bytes(v.spec.key_len()), v.message);
        assert_eq!(encode_hex(&mac), v.mac);
    }
}

/// Key `0b` repeated 32 times, SHA-256, message "hello".
#[test]
fn test_hmac_sha256_repeated_byte_key() {
    let mac = compute_hmac(DigestAlgorithm::Sha256, &[0x0b; 32], b"hello");
    assert_eq!(
        encode_hex(&mac),
        "7ea37d205ced9b21b2f3eb6836fb773100da5dd3ba84900fb712826ef6b20fef"
    );
}

#[test]
fn test_algorithm_names() {
    assert_eq!(KeySpec::Hmac384.mac_algorithm(), MacAlgorithm::HmacSha384);
    assert_eq!(MacAlgorithm::HmacSha224.to_string(), "HMAC_SHA_224");
    assert_eq!("HMAC_SHA_512".parse::<MacAlgorithm>().unwrap(), MacAlgorithm::HmacSha512);
    assert!("hmac_sha_512".parse::<MacAlgorithm>().is_err());
}
