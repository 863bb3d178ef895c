// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Integrity envelope construction and parsing.
//!
//! The envelope is the binary structure written into the pixel LSBs:
//!
//! ```text
//! [4 bytes ] payload length (big-endian u32)
//! [32 bytes] SHA-256 of the payload
//! [N bytes ] payload (gzip stream, optionally of IV || ciphertext)
//! ```
//!
//! The envelope does not know what the payload contains; it only frames and
//! authenticates it against accidental corruption.

use sha2::{Digest, Sha256};

use crate::stego::error::StegoError;

/// Length prefix size in bytes.
pub const LENGTH_LEN: usize = 4;

/// SHA-256 digest size in bytes.
pub const HASH_LEN: usize = 32;

/// Fixed header overhead: length(4) + hash(32) = 36 bytes.
pub const HEADER_LEN: usize = LENGTH_LEN + HASH_LEN;

/// SHA-256 of `data`.
pub fn digest(data: &[u8]) -> [u8; HASH_LEN] {
    Sha256::digest(data).into()
}

/// Parsed envelope header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Declared payload length in bytes.
    pub length: u32,
    /// Expected SHA-256 of the payload.
    pub hash: [u8; HASH_LEN],
}

impl Header {
    /// Offset one past the last payload byte in the unmasked stream.
    pub fn end(&self) -> usize {
        HEADER_LEN.saturating_add(self.length as usize)
    }
}

/// Build `u32_be(len) || sha256(payload) || payload`.
///
/// Returns [`StegoError::MessageTooLarge`] if the payload does not fit the
/// 32-bit length field.
pub fn build_envelope(payload: &[u8]) -> Result<Vec<u8>, StegoError> {
    let length = u32::try_from(payload.len()).map_err(|_| StegoError::MessageTooLarge {
        needed: HEADER_LEN.saturating_add(payload.len()),
        available: HEADER_LEN.saturating_add(u32::MAX as usize),
    })?;

    let mut env = Vec::with_capacity(HEADER_LEN + payload.len());
    env.extend_from_slice(&length.to_be_bytes());
    env.extend_from_slice(&digest(payload));
    env.extend_from_slice(payload);
    Ok(env)
}

/// Read length and hash from the first [`HEADER_LEN`] bytes of `data`.
///
/// Extra trailing bytes are ignored.
pub fn parse_header(data: &[u8]) -> Result<Header, StegoError> {
    if data.len() < HEADER_LEN {
        return Err(StegoError::MalformedContainer);
    }

    let length = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
    let mut hash = [0u8; HASH_LEN];
    hash.copy_from_slice(&data[LENGTH_LEN..HEADER_LEN]);

    Ok(Header { length, hash })
}

/// Take the payload described by `header` out of the full unmasked `stream`
/// and verify its digest.
///
/// # Errors
/// - [`StegoError::MalformedContainer`] if the declared region runs past the stream.
/// - [`StegoError::IntegrityMismatch`] if the digest does not match.
pub fn open_envelope<'a>(header: &Header, stream: &'a [u8]) -> Result<&'a [u8], StegoError> {
    let end = header.end();
    if stream.len() < end {
        return Err(StegoError::MalformedContainer);
    }

    let payload = &stream[HEADER_LEN..end];
    if digest(payload) != header.hash {
        return Err(StegoError::IntegrityMismatch);
    }

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_parse_roundtrip() {
        let payload = b"\x1f\x8b compressed-ish bytes";
        let env = build_envelope(payload).unwrap();
        assert_eq!(env.len(), HEADER_LEN + payload.len());

        let header = parse_header(&env).unwrap();
        assert_eq!(header.length as usize, payload.len());
        assert_eq!(open_envelope(&header, &env).unwrap(), payload);
    }

    #[test]
    fn layout_is_length_then_hash() {
        let env = build_envelope(&[7u8; 5]).unwrap();
        assert_eq!(&env[..4], &[0, 0, 0, 5]);
        assert_eq!(&env[4..36], &digest(&[7u8; 5]));
        assert_eq!(&env[36..], &[7u8; 5]);
    }

    #[test]
    fn known_sha256_vector() {
        // SHA-256("abc")
        let expected = [
            0xba, 0x78, 0x16, 0xbf, 0x8f, 0x01, 0xcf, 0xea, 0x41, 0x41, 0x40, 0xde, 0x5d, 0xae,
            0x22, 0x23, 0xb0, 0x03, 0x61, 0xa3, 0x96, 0x17, 0x7a, 0x9c, 0xb4, 0x10, 0xff, 0x61,
            0xf2, 0x00, 0x15, 0xad,
        ];
        assert_eq!(digest(b"abc"), expected);
    }

    #[test]
    fn empty_payload() {
        let env = build_envelope(&[]).unwrap();
        assert_eq!(env.len(), HEADER_LEN);
        let header = parse_header(&env).unwrap();
        assert_eq!(header.length, 0);
        assert!(open_envelope(&header, &env).unwrap().is_empty());
    }

    #[test]
    fn payload_taken_from_full_stream_ignores_trailing_padding() {
        let mut stream = build_envelope(b"hello").unwrap();
        stream.extend_from_slice(&[0xAA; 100]);
        let header = parse_header(&stream[..HEADER_LEN]).unwrap();
        assert_eq!(open_envelope(&header, &stream).unwrap(), b"hello");
    }

    #[test]
    fn corrupted_payload_detected() {
        let mut env = build_envelope(b"integrity").unwrap();
        let last = env.len() - 1;
        env[last] ^= 0x01;
        let header = parse_header(&env).unwrap();
        assert!(matches!(open_envelope(&header, &env), Err(StegoError::IntegrityMismatch)));
    }

    #[test]
    fn corrupted_hash_detected() {
        let mut env = build_envelope(b"integrity").unwrap();
        env[10] ^= 0x80;
        let header = parse_header(&env).unwrap();
        assert!(matches!(open_envelope(&header, &env), Err(StegoError::IntegrityMismatch)));
    }

    #[test]
    fn length_past_stream_is_malformed() {
        let mut env = build_envelope(b"abc").unwrap();
        env[0] = 0x7F;
        let header = parse_header(&env).unwrap();
        assert!(matches!(open_envelope(&header, &env), Err(StegoError::MalformedContainer)));
    }

    #[test]
    fn truncated_header_rejected() {
        assert!(matches!(parse_header(&[0u8; 35]), Err(StegoError::MalformedContainer)));
        assert!(matches!(parse_header(&[]), Err(StegoError::MalformedContainer)));
    }
}
