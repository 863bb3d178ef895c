// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Container encode/decode pipeline.
//!
//! A [`Container`] owns one RGBA pixel buffer and orchestrates the stages:
//!
//! 1. (optional) AES-256-CBC encryption, output `IV || ciphertext`
//! 2. gzip compression
//! 3. integrity envelope: `u32_be(len) || sha256 || payload`
//! 4. LSB masking into R, G, B of every pixel, random bits after the envelope
//!
//! Decode runs the stages in reverse. Encoding never modifies the source
//! container; it returns a new one wrapping a fresh buffer.

use std::path::Path;

use rand::{CryptoRng, RngCore};

use crate::raster::{PixelBuffer, RasterCodec};
use crate::stego::compress;
use crate::stego::config::ContainerConfig;
use crate::stego::crypto;
use crate::stego::envelope::{self, HEADER_LEN};
use crate::stego::error::StegoError;
use crate::stego::lsb::{self, BYTES_PER_PIXEL};

/// Smallest pixel buffer accepted as a container: 4 pixels.
pub const MIN_CONTAINER_BYTES: usize = 4 * BYTES_PER_PIXEL;

/// Smallest pixel buffer that can hold a header: 36 bytes * 8 bits / 3 bits
/// per pixel = 96 pixels.
pub const MIN_DECODE_BYTES: usize = 96 * BYTES_PER_PIXEL;

/// Envelope length (header + compressed payload) an unkeyed encode of `data`
/// would need under `config`.
///
/// Compare against [`Container::available_encode_bytes`] to check fit before
/// encoding. Keyed encodes are a few bytes larger and vary with the random IV.
pub fn envelope_size(data: &[u8], config: &ContainerConfig) -> Result<usize, StegoError> {
    Ok(HEADER_LEN + compress::compress(data, config.compression_level)?.len())
}

/// A pixel buffer used as a steganographic container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pixels: PixelBuffer,
    config: ContainerConfig,
}

impl Container {
    /// Wrap `pixels` with the default configuration.
    ///
    /// # Errors
    /// Returns [`StegoError::BufferTooSmall`] if the buffer holds fewer than
    /// 4 pixels.
    pub fn new(pixels: PixelBuffer) -> Result<Self, StegoError> {
        Self::with_config(pixels, ContainerConfig::default())
    }

    pub fn with_config(pixels: PixelBuffer, config: ContainerConfig) -> Result<Self, StegoError> {
        if pixels.data().len() < MIN_CONTAINER_BYTES {
            return Err(StegoError::BufferTooSmall);
        }
        Ok(Self { pixels, config })
    }

    /// Build a container straight from raw RGBA8 bytes.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, StegoError> {
        Self::new(PixelBuffer::new(width, height, data)?)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn into_pixels(self) -> PixelBuffer {
        self.pixels
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Total bytes the LSB plane can carry: `floor(pixels * 3 / 8)`.
    pub fn available_encode_bytes(&self) -> usize {
        lsb::bit_slots(self.pixels.data().len()) / 8
    }

    /// Bytes left for the compressed payload after the 36-byte header.
    pub fn usable_memory(&self) -> usize {
        self.available_encode_bytes().saturating_sub(HEADER_LEN)
    }

    /// [`envelope_size`] under this container's configuration.
    pub fn envelope_size(&self, data: impl AsRef<[u8]>) -> Result<usize, StegoError> {
        envelope_size(data.as_ref(), &self.config)
    }

    // ------------------------------------------------------------------
    // Encode
    // ------------------------------------------------------------------

    /// Hide `data` in a copy of this container's pixels.
    ///
    /// # Errors
    /// [`StegoError::MessageTooLarge`] if header + compressed data exceed
    /// [`available_encode_bytes`](Self::available_encode_bytes).
    pub fn encode(&self, data: impl AsRef<[u8]>) -> Result<Container, StegoError> {
        self.encode_with_rng(data, &mut rand::thread_rng())
    }

    /// [`encode`](Self::encode) with an explicit source for the padding bits.
    pub fn encode_with_rng<R>(&self, data: impl AsRef<[u8]>, rng: &mut R) -> Result<Container, StegoError>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        self.embed(data.as_ref(), rng)
    }

    /// Encrypt `data` under `passphrase`, then hide it like [`encode`](Self::encode).
    pub fn encode_with_key(&self, passphrase: impl AsRef<[u8]>, data: impl AsRef<[u8]>) -> Result<Container, StegoError> {
        self.encode_with_key_and_rng(passphrase, data, &mut rand::thread_rng())
    }

    /// [`encode_with_key`](Self::encode_with_key) with an explicit source for
    /// the IV and the padding bits.
    pub fn encode_with_key_and_rng<R>(
        &self,
        passphrase: impl AsRef<[u8]>,
        data: impl AsRef<[u8]>,
        rng: &mut R,
    ) -> Result<Container, StegoError>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        let sealed = crypto::encrypt(data.as_ref(), passphrase.as_ref(), rng);
        self.embed(&sealed, rng)
    }

    fn embed<R>(&self, payload: &[u8], rng: &mut R) -> Result<Container, StegoError>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        let compressed = compress::compress(payload, self.config.compression_level)?;
        let env = envelope::build_envelope(&compressed)?;

        let available = self.available_encode_bytes();
        if env.len() > available {
            tracing::debug!(needed = env.len(), available, "message too long for container");
            return Err(StegoError::MessageTooLarge { needed: env.len(), available });
        }

        tracing::debug!(
            payload = payload.len(),
            compressed = compressed.len(),
            envelope = env.len(),
            available,
            "masking envelope"
        );

        let masked = lsb::mask(self.pixels.data(), &env, rng);
        Ok(Container { pixels: self.pixels.with_data(masked), config: self.config })
    }

    // ------------------------------------------------------------------
    // Decode
    // ------------------------------------------------------------------

    /// Extract and verify the hidden bytes.
    ///
    /// # Errors
    /// - [`StegoError::MalformedContainer`] if the buffer is shorter than
    ///   [`MIN_DECODE_BYTES`] or the header points past the buffer.
    /// - [`StegoError::IntegrityMismatch`] if the payload digest does not match.
    /// - [`StegoError::CorruptPayload`] if the payload is not valid gzip.
    pub fn decode(&self) -> Result<Vec<u8>, StegoError> {
        self.extract()
    }

    /// [`decode`](Self::decode) and interpret the result as UTF-8.
    pub fn decode_text(&self) -> Result<String, StegoError> {
        into_text(self.decode()?)
    }

    /// [`decode`](Self::decode) and interpret the result as UTF-8, replacing
    /// invalid sequences with U+FFFD.
    pub fn decode_text_lossy(&self) -> Result<String, StegoError> {
        Ok(into_text_lossy(self.decode()?))
    }

    /// Extract, verify and decrypt bytes hidden with
    /// [`encode_with_key`](Self::encode_with_key).
    ///
    /// Returns [`StegoError::DecryptionFailed`] on a wrong passphrase, in
    /// addition to the errors of [`decode`](Self::decode).
    pub fn decode_with_key(&self, passphrase: impl AsRef<[u8]>) -> Result<Vec<u8>, StegoError> {
        let sealed = self.extract()?;
        crypto::decrypt(&sealed, passphrase.as_ref())
    }

    /// [`decode_with_key`](Self::decode_with_key) and interpret the result as UTF-8.
    pub fn decode_text_with_key(&self, passphrase: impl AsRef<[u8]>) -> Result<String, StegoError> {
        into_text(self.decode_with_key(passphrase)?)
    }

    /// Lossy counterpart of [`decode_text_with_key`](Self::decode_text_with_key).
    pub fn decode_text_lossy_with_key(&self, passphrase: impl AsRef<[u8]>) -> Result<String, StegoError> {
        Ok(into_text_lossy(self.decode_with_key(passphrase)?))
    }

    fn extract(&self) -> Result<Vec<u8>, StegoError> {
        let data = self.pixels.data();
        if data.len() < MIN_DECODE_BYTES {
            return Err(StegoError::MalformedContainer);
        }

        let header = envelope::parse_header(&lsb::unmask(&data[..MIN_DECODE_BYTES]))?;
        let end = header.end();
        if end > self.available_encode_bytes() {
            tracing::debug!(declared = header.length, available = self.available_encode_bytes(), "header points past buffer");
            return Err(StegoError::MalformedContainer);
        }

        // Unmasking the prefix that carries `end` bytes yields the same bytes
        // as unmasking the whole buffer.
        let region = lsb::pixel_bytes_for(end).min(data.len());
        let stream = lsb::unmask(&data[..region]);
        let payload = envelope::open_envelope(&header, &stream).inspect_err(|e| {
            if matches!(e, StegoError::IntegrityMismatch) {
                tracing::warn!(length = header.length, "payload digest mismatch");
            }
        })?;

        let inflated = compress::decompress(payload, self.config.max_inflated_len)?;
        tracing::debug!(payload = payload.len(), inflated = inflated.len(), "container decoded");
        Ok(inflated)
    }

    // ------------------------------------------------------------------
    // Files
    // ------------------------------------------------------------------

    /// Read an image through `codec` and wrap it as a container.
    pub fn open<C: RasterCodec + ?Sized>(codec: &C, path: impl AsRef<Path>) -> Result<Self, StegoError> {
        Self::new(codec.read(path.as_ref())?)
    }

    /// Write this container's pixels through `codec`.
    pub fn save<C: RasterCodec + ?Sized>(&self, codec: &C, path: impl AsRef<Path>) -> Result<(), StegoError> {
        Ok(codec.write(&self.pixels, path.as_ref())?)
    }

    /// Hide the contents of the file at `path`.
    pub fn encode_file(&self, path: impl AsRef<Path>) -> Result<Container, StegoError> {
        self.encode(std::fs::read(path)?)
    }

    /// Encrypt and hide the contents of the file at `path`.
    pub fn encode_file_with_key(&self, passphrase: impl AsRef<[u8]>, path: impl AsRef<Path>) -> Result<Container, StegoError> {
        self.encode_with_key(passphrase, std::fs::read(path)?)
    }

    /// Decode and write the hidden bytes to `path`. Nothing is written if
    /// decoding fails.
    pub fn decode_to_file(&self, path: impl AsRef<Path>) -> Result<(), StegoError> {
        let data = self.decode()?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Decode, decrypt and write the hidden bytes to `path`.
    pub fn decode_to_file_with_key(&self, passphrase: impl AsRef<[u8]>, path: impl AsRef<Path>) -> Result<(), StegoError> {
        let data = self.decode_with_key(passphrase)?;
        std::fs::write(path, data)?;
        Ok(())
    }
}

fn into_text(bytes: Vec<u8>) -> Result<String, StegoError> {
    String::from_utf8(bytes).map_err(|_| StegoError::InvalidUtf8)
}

fn into_text_lossy(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}
