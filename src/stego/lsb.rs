// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! RGB least-significant-bit channel.
//!
//! Each RGBA pixel carries three payload bits, one in the LSB of R, G and B
//! (in that order). Alpha is never touched. Bits are taken MSB first from
//! each payload byte:
//!
//! ```text
//! pixel 0: R.lsb = byte0.b7  G.lsb = byte0.b6  B.lsb = byte0.b5
//! pixel 1: R.lsb = byte0.b4  G.lsb = byte0.b3  B.lsb = byte0.b2
//! pixel 2: R.lsb = byte0.b1  G.lsb = byte0.b0  B.lsb = byte1.b7
//! ...
//! ```
//!
//! Slots left over after the payload are filled with random bits so that
//! unused capacity looks the same as payload to a statistical observer.

use rand::{CryptoRng, RngCore};

/// Bytes per RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Payload-carrying channels per pixel (R, G, B).
pub const BITS_PER_PIXEL: usize = 3;

/// Number of LSB slots in a buffer of `len` bytes.
///
/// A trailing partial pixel carries no bits.
pub fn bit_slots(len: usize) -> usize {
    (len / BYTES_PER_PIXEL) * BITS_PER_PIXEL
}

/// Number of buffer bytes (whole pixels) needed to carry the first
/// `n_bytes` payload bytes.
pub fn pixel_bytes_for(n_bytes: usize) -> usize {
    let bits = n_bytes * 8;
    bits.div_ceil(BITS_PER_PIXEL) * BYTES_PER_PIXEL
}

/// Write `data` into the RGB LSBs of a copy of `pixels`.
///
/// The returned buffer has the same length as `pixels`. Once `data` is
/// exhausted every remaining slot receives a bit drawn from `rng`. Bits of
/// `data` that do not fit are dropped; callers check capacity first.
pub fn mask<R: RngCore + CryptoRng + ?Sized>(pixels: &[u8], data: &[u8], rng: &mut R) -> Vec<u8> {
    let mut out = pixels.to_vec();
    let data_bits = data.len() * 8;

    // Random bits are drawn 32 at a time to avoid one RNG call per slot.
    let mut pool = 0u32;
    let mut pool_left = 0u32;

    let mut bit_idx = 0usize;
    for px in out.chunks_exact_mut(BYTES_PER_PIXEL) {
        for channel in px.iter_mut().take(BITS_PER_PIXEL) {
            let bit = if bit_idx < data_bits {
                (data[bit_idx / 8] >> (7 - (bit_idx % 8))) & 1
            } else {
                if pool_left == 0 {
                    pool = rng.next_u32();
                    pool_left = 32;
                }
                let b = (pool & 1) as u8;
                pool >>= 1;
                pool_left -= 1;
                b
            };
            *channel = (*channel & 0xFE) | bit;
            bit_idx += 1;
        }
    }

    out
}

/// Read the RGB LSBs of every pixel back into bytes (MSB first).
///
/// Decodes the whole region; only complete bytes are emitted, so trailing
/// bits that do not fill a byte are discarded.
pub fn unmask(pixels: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(bit_slots(pixels.len()) / 8);
    let mut current = 0u8;
    let mut filled = 0u32;

    for px in pixels.chunks_exact(BYTES_PER_PIXEL) {
        for &channel in &px[..BITS_PER_PIXEL] {
            current = (current << 1) | (channel & 1);
            filled += 1;
            if filled == 8 {
                bytes.push(current);
                current = 0;
                filled = 0;
            }
        }
    }

    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn rng() -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(0x5EED)
    }

    #[test]
    fn slot_accounting() {
        assert_eq!(bit_slots(0), 0);
        assert_eq!(bit_slots(16), 12);
        // Partial trailing pixel carries nothing.
        assert_eq!(bit_slots(19), 12);
        // 36-byte header needs 288 bits = 96 pixels.
        assert_eq!(pixel_bytes_for(36), 96 * 4);
        // 1 byte = 8 bits -> 3 pixels (9 slots).
        assert_eq!(pixel_bytes_for(1), 12);
        assert_eq!(pixel_bytes_for(0), 0);
    }

    #[test]
    fn mask_writes_msb_first_into_rgb() {
        let pixels = vec![0u8; 4 * 3];
        // 0b1011_0010
        let out = mask(&pixels, &[0xB2], &mut rng());
        let lsbs: Vec<u8> = out
            .chunks_exact(4)
            .flat_map(|px| px[..3].iter().map(|c| c & 1).collect::<Vec<_>>())
            .collect();
        assert_eq!(&lsbs[..8], &[1, 0, 1, 1, 0, 0, 1, 0]);
    }

    #[test]
    fn mask_preserves_upper_bits_and_alpha() {
        let pixels: Vec<u8> = (0..400u32).map(|i| (i * 37 % 256) as u8).collect();
        let out = mask(&pixels, b"payload", &mut rng());
        assert_eq!(out.len(), pixels.len());
        for (a, b) in pixels.iter().zip(&out) {
            assert_eq!(a & 0xFE, b & 0xFE);
        }
        for (a, b) in pixels.chunks_exact(4).zip(out.chunks_exact(4)) {
            assert_eq!(a[3], b[3], "alpha must be untouched");
        }
    }

    #[test]
    fn unmask_recovers_masked_bytes() {
        let pixels = vec![0x80u8; 4 * 200];
        let data = b"The quick brown fox";
        let out = mask(&pixels, data, &mut rng());
        let recovered = unmask(&out);
        assert_eq!(recovered.len(), 200 * 3 / 8);
        assert_eq!(&recovered[..data.len()], data);
    }

    #[test]
    fn source_buffer_not_aliased() {
        let pixels = vec![0xFFu8; 64];
        let snapshot = pixels.clone();
        let _ = mask(&pixels, &[0x00, 0x00], &mut rng());
        assert_eq!(pixels, snapshot);
    }

    #[test]
    fn padding_is_random_not_constant() {
        // No payload at all: every slot is padding.
        let pixels = vec![0u8; 4 * 1024];
        let out = mask(&pixels, &[], &mut rng());
        let ones = out
            .chunks_exact(4)
            .flat_map(|px| px[..3].to_vec())
            .filter(|c| c & 1 == 1)
            .count();
        let total = 1024 * 3;
        assert!(ones > total / 4 && ones < total * 3 / 4, "ones={ones} of {total}");
    }

    #[test]
    fn padding_is_reproducible_with_seeded_rng() {
        let pixels = vec![0u8; 4 * 128];
        let a = mask(&pixels, b"x", &mut rng());
        let b = mask(&pixels, b"x", &mut rng());
        assert_eq!(a, b);
    }

    #[test]
    fn trailing_partial_pixel_is_ignored() {
        let mut pixels = vec![0u8; 4 * 8];
        pixels.extend_from_slice(&[0xAB, 0xCD]);
        let out = mask(&pixels, &[0xFF, 0xFF], &mut rng());
        assert_eq!(&out[32..], &[0xAB, 0xCD]);
        assert_eq!(unmask(&pixels).len(), 3);
    }

    #[test]
    fn oversized_data_is_truncated_silently() {
        // 2 pixels = 6 slots, less than one byte.
        let pixels = vec![0u8; 8];
        let out = mask(&pixels, &[0xFF; 4], &mut rng());
        assert!(out.chunks_exact(4).all(|px| px[0] & 1 == 1 && px[1] & 1 == 1 && px[2] & 1 == 1));
        assert!(unmask(&out).is_empty());
    }
}
