//! Command-line argument structures for the kms-mac CLI.
//!
//! This module provides reusable clap argument structures for the `kms-mac` binary.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::ServiceConfig;
use crate::registry::KeyRegistry;

/// Output format for CLI tools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable `Field: value` lines.
    #[default]
    Human,
    /// JSON response body, as the service would return it.
    Json,
}

/// Arguments locating the keys to operate on.
#[derive(Debug, Parser)]
pub struct CommonArgs {
    /// JSON seed document with the keys to load.
    #[arg(short = 's', long = "seed", value_name = "FILE")]
    pub seed: PathBuf,

    /// Region used in key ARNs (default: $KMS_REGION, then eu-west-2).
    #[arg(long = "region")]
    pub region: Option<String>,

    /// Account id used in key ARNs (default: $KMS_ACCOUNT_ID, then 111122223333).
    #[arg(long = "account-id")]
    pub account_id: Option<String>,
}

impl CommonArgs {
    /// Service configuration from the environment, with command-line overrides applied.
    pub fn service_config(&self) -> ServiceConfig {
        let env = ServiceConfig::from_env();
        ServiceConfig::builder()
            .region(self.region.as_deref().unwrap_or(env.region()))
            .account_id(self.account_id.as_deref().unwrap_or(env.account_id()))
            .build()
    }

    /// Read the seed document and load it into a new registry.
    ///
    /// Rejected records are logged and skipped; only an unreadable file or
    /// an invalid document is an error.
    pub fn load_registry(&self) -> Result<KeyRegistry, String> {
        let json = std::fs::read_to_string(&self.seed)
            .map_err(|e| format!("failed to read {}: {}", self.seed.display(), e))?;
        let registry = KeyRegistry::new(self.service_config());
        registry
            .load_seed(&json)
            .map_err(|e| format!("{}: {}", self.seed.display(), e))?;
        Ok(registry)
    }
}

/// Arguments shared by `generate` and `verify`.
#[derive(Debug, Parser)]
pub struct MacArgs {
    /// Key id or key ARN.
    #[arg(short = 'k', long = "key-id")]
    pub key_id: String,

    /// MAC algorithm, e.g. HMAC_SHA_256.
    #[arg(short = 'a', long = "algorithm")]
    pub algorithm: String,

    /// Message, taken as UTF-8 bytes.
    #[arg(short = 'm', long = "message")]
    pub message: String,
}

/// Output control arguments.
#[derive(Debug, Parser)]
pub struct OutputArgs {
    /// Output format: human or json.
    #[arg(short = 'O', long = "output", default_value = "human")]
    pub format: OutputFormat,

    /// Enable debug logging (kms_mac=debug).
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Enable trace logging (kms_mac=trace).
    #[arg(short = 'D', long = "trace")]
    pub trace: bool,
}

impl OutputArgs {
    /// Initialize tracing based on debug/trace flags.
    pub fn init_tracing(&self) {
        use tracing_subscriber::EnvFilter;

        let filter = if self.trace {
            "kms_mac=trace"
        } else if self.debug {
            "kms_mac=debug"
        } else {
            "kms_mac=warn"
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(filter))
            .with_writer(std::io::stderr)
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_win() {
        let args = CommonArgs {
            seed: PathBuf::from("seed.json"),
            region: Some("us-west-1".to_string()),
            account_id: Some("000000000000".to_string()),
        };
        assert_eq!(
            args.service_config().key_arn("k"),
            "arn:aws:kms:us-west-1:000000000000:key/k"
        );
    }

    #[test]
    fn test_missing_seed_file() {
        let args = CommonArgs {
            seed: PathBuf::from("/nonexistent/kms-mac-seed.json"),
            region: None,
            account_id: None,
        };
        let err = args.load_registry().unwrap_err();
        assert!(err.starts_with("failed to read /nonexistent/kms-mac-seed.json"));
    }

    #[test]
    fn test_mac_args_require_algorithm() {
        assert!(MacArgs::try_parse_from(["mac", "--key-id", "k1", "--message", "hi"]).is_err());

        let args = MacArgs::try_parse_from([
            "mac",
            "--key-id",
            "k1",
            "--message",
            "hi",
            "--algorithm",
            "HMAC_SHA_384",
        ])
        .unwrap();
        assert_eq!(args.algorithm, "HMAC_SHA_384");
        assert_eq!(args.message, "hi");
    }
}
