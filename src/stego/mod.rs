// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Steganographic container codec.
//!
//! Stages, leaves first:
//!
//! - [`lsb`]: masks bytes into the R, G, B least-significant bits of an RGBA
//!   buffer and reads them back.
//! - [`envelope`]: `u32_be(len) || sha256 || payload` framing with digest
//!   verification.
//! - [`compress`]: gzip deflate/inflate.
//! - [`crypto`]: optional AES-256-CBC with a SHA-256-derived key.
//! - [`container`]: the [`Container`] type tying the stages together.

pub mod error;
pub mod config;
pub mod lsb;
pub mod envelope;
pub mod compress;
pub mod crypto;
pub mod container;

pub use error::StegoError;
pub use config::ContainerConfig;
pub use container::{envelope_size, Container, MIN_CONTAINER_BYTES, MIN_DECODE_BYTES};
pub use envelope::HEADER_LEN;
