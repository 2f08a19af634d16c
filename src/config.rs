//! Service configuration.
//!
//! [`ServiceConfig`] holds the account context used to build key ARNs.
//!
//! ```rust
//! use kms_mac::ServiceConfig;
//!
//! let config = ServiceConfig::builder()
//!     .region("us-east-1")
//!     .account_id("123456789012")
//!     .build();
//! assert_eq!(
//!     config.key_arn("abc"),
//!     "arn:aws:kms:us-east-1:123456789012:key/abc"
//! );
//! ```

/// Default region, matching local KMS emulators.
pub const DEFAULT_REGION: &str = "eu-west-2";

/// Default account id.
pub const DEFAULT_ACCOUNT_ID: &str = "111122223333";

/// Environment variable overriding the region.
pub const REGION_ENV: &str = "KMS_REGION";

/// Environment variable overriding the account id.
pub const ACCOUNT_ID_ENV: &str = "KMS_ACCOUNT_ID";

/// Minimum `Message` length for `GenerateMac`/`VerifyMac`.
pub const MIN_MESSAGE_LEN: usize = 1;

/// Maximum `Message` length for `GenerateMac`/`VerifyMac`.
pub const MAX_MESSAGE_LEN: usize = 4096;

/// Maximum `Mac` length for `VerifyMac`.
pub const MAX_MAC_LEN: usize = 6144;

/// Account context of the emulated service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    region: String,
    account_id: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            account_id: DEFAULT_ACCOUNT_ID.to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    /// Defaults overridden by `KMS_REGION` and `KMS_ACCOUNT_ID` when set.
    pub fn from_env() -> Self {
        let mut builder = Self::builder();
        if let Some(region) = non_empty_env(REGION_ENV) {
            builder = builder.region(region);
        }
        if let Some(account_id) = non_empty_env(ACCOUNT_ID_ENV) {
            builder = builder.account_id(account_id);
        }
        let config = builder.build();
        tracing::debug!(target: "kms_mac::config", { region = %config.region, account_id = %config.account_id }, "loaded service configuration");
        config
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// ARN of the key with `key_id` in this account and region.
    pub fn key_arn(&self, key_id: &str) -> String {
        format!(
            "arn:aws:kms:{}:{}:key/{}",
            self.region, self.account_id, key_id
        )
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Builder for [`ServiceConfig`].
#[derive(Debug, Clone, Default)]
pub struct ServiceConfigBuilder {
    region: Option<String>,
    account_id: Option<String>,
}

impl ServiceConfigBuilder {
    /// Set the region (default: `eu-west-2`).
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the account id (default: `111122223333`).
    pub fn account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn build(self) -> ServiceConfig {
        let defaults = ServiceConfig::default();
        ServiceConfig {
            region: self.region.unwrap_or(defaults.region),
            account_id: self.account_id.unwrap_or(defaults.account_id),
        }
    }
}
