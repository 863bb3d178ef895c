// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Per-container tuning knobs.

/// Default gzip level (zlib's own default).
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Default cap on inflated payload size: 256 MiB.
pub const DEFAULT_MAX_INFLATED_LEN: usize = 256 * 1024 * 1024;

/// Settings applied by a [`Container`](crate::stego::container::Container)
/// on encode and decode.
///
/// None of these values are stored in the image, so a container encoded with
/// any compression level decodes with any other configuration as long as the
/// inflated payload stays under `max_inflated_len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerConfig {
    /// Gzip level 0–9 used on encode. Values above 9 are clamped.
    pub compression_level: u32,
    /// Decode refuses payloads that inflate past this many bytes.
    pub max_inflated_len: usize,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            max_inflated_len: DEFAULT_MAX_INFLATED_LEN,
        }
    }
}

impl ContainerConfig {
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level.min(9);
        self
    }

    pub fn with_max_inflated_len(mut self, len: usize) -> Self {
        self.max_inflated_len = len;
        self
    }
}
