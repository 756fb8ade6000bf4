//! Passphrase envelope compatible with CryptoJS `AES.encrypt(text, passphrase)`.
//!
//! Layout: base64(`"Salted__"` || salt[8] || AES-256-CBC/PKCS#7 ciphertext),
//! with key and IV derived from the passphrase and salt by OpenSSL's
//! `EVP_BytesToKey` using one round of MD5.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use md5::{Digest, Md5};
use rand::Rng;

use crate::error::{Error, Result};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

const MAGIC: &[u8; 8] = b"Salted__";
const SALT_LEN: usize = 8;
const KEY_LEN: usize = 32;
const IV_LEN: usize = 16;

/// Encrypt `plaintext` under `passphrase` with a random salt.
pub fn encrypt(plaintext: &str, passphrase: &str) -> Result<String> {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill(&mut salt);
    encrypt_with_salt(plaintext, passphrase, &salt)
}

/// Encrypt with an explicit salt.
pub fn encrypt_with_salt(plaintext: &str, passphrase: &str, salt: &[u8; SALT_LEN]) -> Result<String> {
    let (key, iv) = derive_key_iv(passphrase.as_bytes(), salt);
    let cipher = Aes256CbcEnc::new_from_slices(&key, &iv)
        .map_err(|e| Error::Cipher(e.to_string()))?;
    let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

    let mut envelope = Vec::with_capacity(MAGIC.len() + SALT_LEN + ciphertext.len());
    envelope.extend_from_slice(MAGIC);
    envelope.extend_from_slice(salt);
    envelope.extend_from_slice(&ciphertext);
    Ok(STANDARD.encode(envelope))
}

/// Decrypt an envelope produced by [`encrypt`] (or by CryptoJS).
pub fn decrypt(encoded: &str, passphrase: &str) -> Result<String> {
    let envelope = STANDARD
        .decode(encoded.trim())
        .map_err(|e| Error::Cipher(format!("invalid base64: {}", e)))?;

    if envelope.len() < MAGIC.len() + SALT_LEN || &envelope[..MAGIC.len()] != MAGIC {
        return Err(Error::Cipher("missing salt header".to_string()));
    }
    let (salt, ciphertext) = envelope[MAGIC.len()..].split_at(SALT_LEN);

    let (key, iv) = derive_key_iv(passphrase.as_bytes(), salt);
    let cipher = Aes256CbcDec::new_from_slices(&key, &iv)
        .map_err(|e| Error::Cipher(e.to_string()))?;
    let plaintext = cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| Error::Cipher("bad padding or wrong passphrase".to_string()))?;

    String::from_utf8(plaintext).map_err(|_| Error::Cipher("plaintext is not UTF-8".to_string()))
}

fn derive_key_iv(passphrase: &[u8], salt: &[u8]) -> ([u8; KEY_LEN], [u8; IV_LEN]) {
    let mut derived = Vec::with_capacity(KEY_LEN + IV_LEN + 16);
    let mut block: Vec<u8> = Vec::new();
    while derived.len() < KEY_LEN + IV_LEN {
        let mut hasher = Md5::new();
        hasher.update(&block);
        hasher.update(passphrase);
        hasher.update(salt);
        block = hasher.finalize().to_vec();
        derived.extend_from_slice(&block);
    }

    let mut key = [0u8; KEY_LEN];
    let mut iv = [0u8; IV_LEN];
    key.copy_from_slice(&derived[..KEY_LEN]);
    iv.copy_from_slice(&derived[KEY_LEN..KEY_LEN + IV_LEN]);
    (key, iv)
}
