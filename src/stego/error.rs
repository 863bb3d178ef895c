// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for the container codec.
//!
//! [`StegoError`] covers every failure mode from container construction
//! through unmasking, integrity verification, decompression and decryption.

use core::fmt;

use crate::raster::error::RasterError;

/// Errors that can occur while building, encoding or decoding a container.
#[derive(Debug)]
pub enum StegoError {
    /// The pixel buffer holds fewer than 4 pixels (16 bytes).
    BufferTooSmall,
    /// The envelope does not fit into the buffer's LSB capacity.
    MessageTooLarge { needed: usize, available: usize },
    /// The buffer is too short to hold a header, or the header points past it.
    MalformedContainer,
    /// SHA-256 of the extracted payload does not match the stored digest.
    IntegrityMismatch,
    /// The payload passed the integrity check but is not a valid gzip stream.
    CorruptPayload,
    /// AES-CBC decryption failed (wrong passphrase or corrupted ciphertext).
    DecryptionFailed,
    /// The extracted plaintext is not valid UTF-8.
    InvalidUtf8,
    /// The raster collaborator failed to read or write an image.
    Raster(RasterError),
    /// Reading or writing a payload file failed.
    Io(std::io::Error),
}

impl fmt::Display for StegoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooSmall => write!(f, "pixel buffer too small to be used as a container"),
            Self::MessageTooLarge { needed, available } => {
                write!(f, "message too long: needs {needed} bytes, container holds {available}")
            }
            Self::MalformedContainer => write!(f, "cannot decode this container"),
            Self::IntegrityMismatch => write!(f, "payload digest mismatch"),
            Self::CorruptPayload => write!(f, "payload is not a valid gzip stream"),
            Self::DecryptionFailed => write!(f, "decryption failed (wrong passphrase?)"),
            Self::InvalidUtf8 => write!(f, "extracted text is not valid UTF-8"),
            Self::Raster(e) => write!(f, "raster codec: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for StegoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Raster(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RasterError> for StegoError {
    fn from(e: RasterError) -> Self {
        Self::Raster(e)
    }
}

impl From<std::io::Error> for StegoError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
