// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for the raster collaborator.

use std::fmt;

/// Errors that can occur while building a pixel buffer or moving it to and
/// from an image file.
#[derive(Debug)]
pub enum RasterError {
    /// Pixel data length does not equal `width * height * 4`.
    DimensionMismatch { expected: usize, actual: usize },
    /// Width or height is zero, or their product overflows.
    InvalidDimensions,
    /// Filesystem error while reading or writing an image.
    Io(std::io::Error),
    /// The image codec rejected the file or the buffer.
    #[cfg(feature = "png")]
    Image(image::ImageError),
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DimensionMismatch { expected, actual } => {
                write!(f, "pixel data is {actual} bytes, expected {expected} for the given dimensions")
            }
            Self::InvalidDimensions => write!(f, "invalid image dimensions"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "png")]
            Self::Image(e) => write!(f, "image codec error: {e}"),
        }
    }
}

impl std::error::Error for RasterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "png")]
            Self::Image(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RasterError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(feature = "png")]
impl From<image::ImageError> for RasterError {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::IoError(io) => Self::Io(io),
            other => Self::Image(other),
        }
    }
}
