// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! # pixmask-core
//!
//! Hides arbitrary bytes in the least-significant bits of a lossless RGBA
//! image. Each pixel carries three bits (R, G, B); alpha is left alone.
//!
//! The embedded stream is
//!
//! ```text
//! [4 bytes ] payload length (big-endian u32)
//! [32 bytes] SHA-256 of the payload
//! [N bytes ] gzip(plaintext)            -- unkeyed
//!            gzip(IV || AES-256-CBC)    -- keyed
//! ```
//!
//! followed by random bits up to the end of the image, so unused capacity is
//! indistinguishable from payload.
//!
//! The codec works on in-memory [`PixelBuffer`]s. The [`raster`] module
//! defines the [`RasterCodec`] collaborator that moves buffers to and from
//! files, with a PNG implementation behind the default `png` feature.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use pixmask_core::{Container, PngCodec};
//!
//! let cover = Container::open(&PngCodec, "input.png")?;
//! let stego = cover.encode_with_key("passphrase", "secret message")?;
//! stego.save(&PngCodec, "output.png")?;
//!
//! let opened = Container::open(&PngCodec, "output.png")?;
//! assert_eq!(opened.decode_text_with_key("passphrase")?, "secret message");
//! ```

pub mod raster;
pub mod stego;

pub use raster::error::RasterError;
pub use raster::{PixelBuffer, RasterCodec};
#[cfg(feature = "png")]
pub use raster::PngCodec;
pub use stego::{envelope_size, Container, ContainerConfig, StegoError};
pub use stego::{HEADER_LEN, MIN_CONTAINER_BYTES, MIN_DECODE_BYTES};
