//! Building blocks for the `kms-mac` command-line tool.
//!
//! Enabled with the `cli` feature.

pub mod args;
pub mod output;
