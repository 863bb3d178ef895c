// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Gzip compression of the payload before it enters the envelope.
//!
//! The payload is always gzip-framed, even when compression does not shrink
//! it, so the decoder never has to guess whether a stream was compressed.

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::stego::error::StegoError;

/// Gzip-compress `data` at `level` (0–9; higher values are clamped to 9).
pub fn compress(data: &[u8], level: u32) -> Result<Vec<u8>, StegoError> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2 + 32), Compression::new(level.min(9)));
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Inflate a gzip stream, refusing to produce more than `limit` bytes.
///
/// Returns [`StegoError::CorruptPayload`] for invalid streams and for
/// streams that inflate past `limit`.
pub fn decompress(data: &[u8], limit: usize) -> Result<Vec<u8>, StegoError> {
    let mut output = Vec::new();
    let decoder = GzDecoder::new(data);
    // Read one byte past the limit so an overflow is observable.
    decoder
        .take((limit as u64).saturating_add(1))
        .read_to_end(&mut output)
        .map_err(|_| StegoError::CorruptPayload)?;

    if output.len() > limit {
        tracing::warn!(limit, "inflated payload exceeds limit");
        return Err(StegoError::CorruptPayload);
    }
    Ok(output)
}
