// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Raster collaborator: RGBA pixel buffers and the codecs that move them to
//! and from image files.
//!
//! The container codec only needs a flat `width * height * 4` byte buffer in
//! R, G, B, A order. Anything that can produce and reproduce such a buffer
//! losslessly can implement [`RasterCodec`]. With the `png` feature (on by
//! default) [`PngCodec`] provides one backed by the `image` crate.
//!
//! Lossy formats must not be used for output: a single recompression step
//! destroys the LSB plane.

pub mod error;

use std::path::Path;

use error::RasterError;

/// Decoded RGBA8 image.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA8 data.
    ///
    /// # Errors
    /// - [`RasterError::InvalidDimensions`] if either side is zero or the
    ///   geometry overflows `usize`.
    /// - [`RasterError::DimensionMismatch`] if `data.len() != width * height * 4`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidDimensions);
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|p| p.checked_mul(4))
            .ok_or(RasterError::InvalidDimensions)?;
        if data.len() != expected {
            return Err(RasterError::DimensionMismatch { expected, actual: data.len() });
        }
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Same geometry, different pixel bytes. Used by encode to produce a new
    /// buffer without touching the original.
    pub(crate) fn with_data(&self, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), self.data.len(), "pixel buffer length changed");
        Self { width: self.width, height: self.height, data }
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Reads and writes lossless RGBA images.
pub trait RasterCodec {
    /// Decode the image at `path` into an RGBA8 buffer.
    fn read(&self, path: &Path) -> Result<PixelBuffer, RasterError>;

    /// Encode `pixels` losslessly to `path`, reproducing every byte.
    fn write(&self, pixels: &PixelBuffer, path: &Path) -> Result<(), RasterError>;
}

/// PNG codec backed by the `image` crate.
///
/// `read` accepts any PNG color type and converts it to RGBA8; `write`
/// always produces an 8-bit RGBA PNG.
#[cfg(feature = "png")]
#[derive(Debug, Clone, Copy, Default)]
pub struct PngCodec;

#[cfg(feature = "png")]
impl RasterCodec for PngCodec {
    fn read(&self, path: &Path) -> Result<PixelBuffer, RasterError> {
        let rgba = image::open(path)?.into_rgba8();
        let (width, height) = rgba.dimensions();
        tracing::debug!(path = %path.display(), width, height, "decoded raster");
        PixelBuffer::new(width, height, rgba.into_raw())
    }

    fn write(&self, pixels: &PixelBuffer, path: &Path) -> Result<(), RasterError> {
        let img = image::RgbaImage::from_raw(pixels.width(), pixels.height(), pixels.data().to_vec())
            .ok_or(RasterError::InvalidDimensions)?;
        img.save_with_format(path, image::ImageFormat::Png)?;
        tracing::debug!(path = %path.display(), width = pixels.width(), height = pixels.height(), "wrote raster");
        Ok(())
    }
}
