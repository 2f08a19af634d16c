//! Output formatting for CLI tools.

use std::io::{self, Write};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;

use super::args::OutputFormat;
use crate::error::ApiError;
use crate::handler::{GenerateMacResponse, VerifyMacResponse};

fn write_json<W: Write, T: Serialize + ?Sized>(w: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *w, value)?;
    writeln!(w)
}

pub fn write_generate<W: Write>(
    w: &mut W,
    format: OutputFormat,
    response: &GenerateMacResponse,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => write_json(w, response),
        OutputFormat::Human => {
            writeln!(w, "KeyId: {}", response.key_id)?;
            writeln!(w, "MacAlgorithm: {}", response.mac_algorithm)?;
            writeln!(w, "Mac: {}", STANDARD.encode(&response.mac))
        }
    }
}

pub fn write_verify<W: Write>(
    w: &mut W,
    format: OutputFormat,
    response: &VerifyMacResponse,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => write_json(w, response),
        OutputFormat::Human => {
            writeln!(w, "KeyId: {}", response.key_id)?;
            writeln!(w, "MacAlgorithm: {}", response.mac_algorithm)?;
            writeln!(w, "MacValid: {}", response.mac_valid)
        }
    }
}

/// Write a request error: the JSON error body, or `Type: message`.
pub fn write_error<W: Write>(w: &mut W, format: OutputFormat, err: &ApiError) -> io::Result<()> {
    match format {
        OutputFormat::Json => write_json(w, &err.to_body()),
        OutputFormat::Human => writeln!(w, "{}: {}", err.error_type(), err),
    }
}
