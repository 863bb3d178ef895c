// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Optional payload encryption.
//!
//! The scheme is AES-256-CBC with PKCS#7 padding. The key is the SHA-256 of
//! the passphrase bytes, with no salt and no iteration count. That is weak
//! key stretching by modern standards, but the container format depends on
//! it: changing the derivation would make existing images undecodable.
//!
//! Encrypted output is `IV (16 bytes) || ciphertext`, with a fresh random IV
//! per call.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::stego::error::StegoError;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;
/// CBC initialization vector length in bytes.
pub const IV_LEN: usize = 16;
/// AES block size in bytes.
pub const BLOCK_LEN: usize = 16;

/// Derive the AES-256 key as `sha256(passphrase)`.
pub fn derive_key(passphrase: &[u8]) -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    key.copy_from_slice(&Sha256::digest(passphrase));
    key
}

/// Encrypt `plaintext` under `passphrase` with a fresh IV from `rng`.
///
/// Returns `IV || ciphertext`. The ciphertext is always a non-zero multiple of
/// the block size because PKCS#7 adds at least one padding byte.
pub fn encrypt<R: RngCore + CryptoRng + ?Sized>(plaintext: &[u8], passphrase: &[u8], rng: &mut R) -> Vec<u8> {
    let key = derive_key(passphrase);

    let mut iv = [0u8; IV_LEN];
    rng.fill_bytes(&mut iv);

    let ciphertext = Aes256CbcEnc::new(key.as_slice().into(), &iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut out = Vec::with_capacity(IV_LEN + ciphertext.len());
    out.extend_from_slice(&iv);
    out.extend_from_slice(&ciphertext);
    out
}

/// Decrypt `IV || ciphertext` produced by [`encrypt`].
///
/// Returns [`StegoError::DecryptionFailed`] if the input is too short, the
/// ciphertext is not block-aligned, or the padding does not validate (the
/// usual symptom of a wrong passphrase).
pub fn decrypt(data: &[u8], passphrase: &[u8]) -> Result<Vec<u8>, StegoError> {
    if data.len() < IV_LEN + BLOCK_LEN {
        return Err(StegoError::DecryptionFailed);
    }
    let (iv, ciphertext) = data.split_at(IV_LEN);
    if ciphertext.len() % BLOCK_LEN != 0 {
        return Err(StegoError::DecryptionFailed);
    }

    let mut iv_block = [0u8; IV_LEN];
    iv_block.copy_from_slice(iv);

    let key = derive_key(passphrase);
    Aes256CbcDec::new(key.as_slice().into(), &iv_block.into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| StegoError::DecryptionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn rng(seed: u64) -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(seed)
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let msg = b"Hello, steganography!";
        let ct = encrypt(msg, b"secret123", &mut rng(1));
        assert_eq!(decrypt(&ct, b"secret123").unwrap(), msg);
    }

    #[test]
    fn output_layout() {
        let ct = encrypt(&[0u8; 16], b"k", &mut rng(2));
        // 16-byte IV + two blocks (full padding block after an aligned input).
        assert_eq!(ct.len(), IV_LEN + 32);
        let ct = encrypt(&[0u8; 5], b"k", &mut rng(2));
        assert_eq!(ct.len(), IV_LEN + 16);
    }

    #[test]
    fn empty_message_works() {
        let ct = encrypt(b"", b"pass", &mut rng(3));
        assert_eq!(ct.len(), IV_LEN + BLOCK_LEN);
        assert!(decrypt(&ct, b"pass").unwrap().is_empty());
    }

    #[test]
    fn key_is_sha256_of_passphrase() {
        // SHA-256("") = e3b0c442...
        let key = derive_key(b"");
        assert_eq!(&key[..4], &[0xe3, 0xb0, 0xc4, 0x42]);
        assert_eq!(derive_key(b"mypass"), derive_key(b"mypass"));
        assert_ne!(derive_key(b"pass1"), derive_key(b"pass2"));
    }

    #[test]
    fn wrong_passphrase_fails() {
        let ct = encrypt(b"secret message", b"correct", &mut rng(4));
        assert!(matches!(decrypt(&ct, b"wrong"), Err(StegoError::DecryptionFailed)));
    }

    #[test]
    fn fresh_iv_per_encryption() {
        let mut r = rng(5);
        let a = encrypt(b"same message", b"pass", &mut r);
        let b = encrypt(b"same message", b"pass", &mut r);
        assert_ne!(&a[..IV_LEN], &b[..IV_LEN]);
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_input_rejected() {
        assert!(matches!(decrypt(&[], b"k"), Err(StegoError::DecryptionFailed)));
        assert!(matches!(decrypt(&[0u8; IV_LEN], b"k"), Err(StegoError::DecryptionFailed)));
        assert!(matches!(decrypt(&[0u8; IV_LEN + 17], b"k"), Err(StegoError::DecryptionFailed)));
    }

    #[test]
    fn decrypts_externally_framed_ciphertext() {
        // IV || ciphertext assembled outside `encrypt` with a fixed zero IV.
        let iv = [0u8; IV_LEN];
        let key = derive_key(b"key");
        let ct = Aes256CbcEnc::new(key.as_slice().into(), &iv.into()).encrypt_padded_vec_mut::<Pkcs7>(&[0u8; 16]);
        let mut framed = iv.to_vec();
        framed.extend_from_slice(&ct);
        assert_eq!(decrypt(&framed, b"key").unwrap(), vec![0u8; 16]);
    }
}
