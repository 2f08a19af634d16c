//! `GenerateMac` and `VerifyMac` request handling.
//!
//! [`MacService`] validates a request, resolves the key through a
//! [`KeyRegistry`], checks the key is usable and then runs the MAC
//! operation. Every failure is an [`ApiError`] carrying the AWS error type.
//!
//! Checks run in this order, and the first failure is returned:
//!
//! 1. `KeyId` and `MacAlgorithm` present
//! 2. `Message` (and for `VerifyMac`, `Mac`) length
//! 3. key exists
//! 4. key state permits use
//! 5. key is a MAC key
//! 6. algorithm is known and supported by the key
//!
//! ```rust
//! use std::sync::Arc;
//! use kms_mac::handler::{GenerateMacRequest, MacService, VerifyMacRequest};
//! use kms_mac::{KeyOrigin, KeyRegistry, KeySpec, OsRandom, ServiceConfig};
//!
//! let registry = Arc::new(KeyRegistry::new(ServiceConfig::default()));
//! let key = registry.create_mac_key(KeySpec::Hmac256, KeyOrigin::Internal, &OsRandom);
//! let service = MacService::new(registry);
//!
//! let generated = service
//!     .generate_mac(&GenerateMacRequest::new(key.key_id(), "hello", "HMAC_SHA_256"))
//!     .unwrap();
//! let verified = service
//!     .verify_mac(&VerifyMacRequest::new(key.key_id(), "hello", generated.mac, "HMAC_SHA_256"))
//!     .unwrap();
//! assert!(verified.mac_valid);
//! ```

mod types;

use std::sync::Arc;

use crate::config::{MAX_MAC_LEN, MAX_MESSAGE_LEN, MIN_MESSAGE_LEN};
use crate::error::ApiError;
use crate::key_spec::MacAlgorithm;
use crate::mac::MacKey;
use crate::metadata::KeyState;
use crate::registry::KeyRegistry;

pub use types::{GenerateMacRequest, GenerateMacResponse, VerifyMacRequest, VerifyMacResponse};

/// Executes MAC requests against a key registry.
#[derive(Debug, Clone)]
pub struct MacService {
    registry: Arc<KeyRegistry>,
}

impl MacService {
    pub fn new(registry: Arc<KeyRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<KeyRegistry> {
        &self.registry
    }

    /// Handle a `GenerateMac` request.
    pub fn generate_mac(
        &self,
        request: &GenerateMacRequest,
    ) -> Result<GenerateMacResponse, ApiError> {
        self.try_generate(request)
            .inspect_err(|err| log_rejection("GenerateMac", request.key_id.as_deref(), err))
    }

    /// Handle a `VerifyMac` request.
    ///
    /// A MAC that does not verify is a successful response with
    /// `MacValid: false`, not an error.
    pub fn verify_mac(&self, request: &VerifyMacRequest) -> Result<VerifyMacResponse, ApiError> {
        self.try_verify(request)
            .inspect_err(|err| log_rejection("VerifyMac", request.key_id.as_deref(), err))
    }

    fn try_generate(&self, request: &GenerateMacRequest) -> Result<GenerateMacResponse, ApiError> {
        let key_id = required(&request.key_id, "KeyId")?;
        let algorithm = required(&request.mac_algorithm, "MacAlgorithm")?;
        let message = blob(&request.message, "Message", MIN_MESSAGE_LEN, MAX_MESSAGE_LEN)?;

        let key = self.usable_mac_key(key_id, "GenerateMac")?;
        let algorithm = parse_algorithm(algorithm)?;
        let mac = key.generate_mac(message, algorithm)?;

        tracing::debug!(target: "kms_mac::handler", { key_id = %key.key_id(), mac_algorithm = %algorithm }, "generated MAC");
        Ok(GenerateMacResponse {
            key_id: key.arn().to_string(),
            mac,
            mac_algorithm: algorithm.to_string(),
        })
    }

    fn try_verify(&self, request: &VerifyMacRequest) -> Result<VerifyMacResponse, ApiError> {
        let key_id = required(&request.key_id, "KeyId")?;
        let algorithm = required(&request.mac_algorithm, "MacAlgorithm")?;
        let message = blob(&request.message, "Message", MIN_MESSAGE_LEN, MAX_MESSAGE_LEN)?;
        let mac = blob(&request.mac, "Mac", 1, MAX_MAC_LEN)?;

        let key = self.usable_mac_key(key_id, "VerifyMac")?;
        let algorithm = parse_algorithm(algorithm)?;
        let mac_valid = key.verify_mac(message, mac, algorithm)?;

        tracing::debug!(target: "kms_mac::handler", { key_id = %key.key_id(), mac_algorithm = %algorithm, mac_valid }, "verified MAC");
        Ok(VerifyMacResponse {
            key_id: key_id.to_string(),
            mac_algorithm: algorithm.to_string(),
            mac_valid,
        })
    }

    /// Resolve `key_id` to a MAC key whose state permits use.
    fn usable_mac_key(&self, key_id: &str, operation: &str) -> Result<Arc<MacKey>, ApiError> {
        let key = self.registry.get(key_id).ok_or_else(|| {
            let arn = if key_id.starts_with("arn:") {
                key_id.to_string()
            } else {
                self.registry.config().key_arn(key_id)
            };
            ApiError::NotFound(format!("Key '{}' does not exist", arn))
        })?;

        match key.key_state() {
            KeyState::Enabled => {}
            KeyState::Disabled => {
                return Err(ApiError::Disabled(format!("{} is disabled.", key.arn())));
            }
            KeyState::PendingImport => {
                return Err(ApiError::InvalidState(format!(
                    "{} is pending import.",
                    key.arn()
                )));
            }
            KeyState::PendingDeletion => {
                return Err(ApiError::InvalidState(format!(
                    "{} is pending deletion.",
                    key.arn()
                )));
            }
            KeyState::Unavailable => {
                return Err(ApiError::InvalidState(format!(
                    "{} is unavailable.",
                    key.arn()
                )));
            }
        }

        key.as_mac().cloned().ok_or_else(|| {
            ApiError::InvalidKeyUsage(format!(
                "{} key usage is {} which is not valid for {}.",
                key.arn(),
                key.key_usage(),
                operation
            ))
        })
    }
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, ApiError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::MissingParameter(format!(
            "{} is a required parameter",
            name
        ))),
    }
}

fn blob<'a>(
    value: &'a Option<Vec<u8>>,
    name: &str,
    min: usize,
    max: usize,
) -> Result<&'a [u8], ApiError> {
    let bytes = value.as_deref().unwrap_or_default();
    if bytes.len() < min {
        return Err(ApiError::Validation(format!(
            "1 validation error detected: Value at '{}' failed to satisfy constraint: Member must have length greater than or equal to {}",
            name, min
        )));
    }
    if bytes.len() > max {
        return Err(ApiError::Validation(format!(
            "1 validation error detected: Value at '{}' failed to satisfy constraint: Member must have length less than or equal to {}",
            name, max
        )));
    }
    Ok(bytes)
}

fn parse_algorithm(name: &str) -> Result<MacAlgorithm, ApiError> {
    name.parse::<MacAlgorithm>()
        .map_err(|e| ApiError::InvalidKeyUsage(e.to_string()))
}

fn log_rejection(operation: &'static str, key_id: Option<&str>, err: &ApiError) {
    tracing::warn!(target: "kms_mac::handler", { operation, key_id = ?key_id, error_type = err.error_type(), error = %err }, "request rejected");
}
