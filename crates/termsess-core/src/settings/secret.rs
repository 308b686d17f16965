//! Obfuscation of hidden autocommand entries.
//!
//! Hidden entries are persisted as ciphertext next to an
//! `AutocommandEncrypted{i}` marker. The cipher is a fixed-key XOR stream
//! rendered as base64: it keeps casual readers of the store from seeing the
//! text and nothing more. There is no key management and no authentication;
//! do not treat it as a security boundary.
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

use crate::kernel::constants::{AUTOCOMMAND_MAX_LEN, AUTOCOMMAND_SLOTS};
use crate::settings::accessors::{Emitter, Resolver};
use crate::settings::conf::Conf;

const KEY: &[u8] = b"termsess:autocommand:v1";

pub const AUTOCOMMAND: &str = "Autocommand";
pub const AUTOCOMMAND_DELAY: &str = "AutocommandDelay";
pub const AUTOCOMMAND_HIDDEN: &str = "AutocommandHidden";
pub const AUTOCOMMAND_ENCRYPTED: &str = "AutocommandEncrypted";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("ciphertext is not valid base64: {0}")]
    Encoding(String),

    #[error("decrypted text is not valid UTF-8")]
    Utf8,

    #[error("text is {len} bytes, longer than the {limit} byte field limit")]
    TooLong { len: usize, limit: usize },
}

fn keystream(i: usize) -> u8 {
    KEY[i % KEY.len()] ^ (i as u8).wrapping_mul(31)
}

/// Encrypt a field value
pub fn encrypt_field(plaintext: &str) -> Result<String, CodecError> {
    if plaintext.len() > AUTOCOMMAND_MAX_LEN {
        return Err(CodecError::TooLong {
            len: plaintext.len(),
            limit: AUTOCOMMAND_MAX_LEN,
        });
    }
    let bytes: Vec<u8> = plaintext
        .bytes()
        .enumerate()
        .map(|(i, b)| b ^ keystream(i))
        .collect();
    Ok(STANDARD.encode(bytes))
}

/// Decrypt a value produced by [`encrypt_field`]
pub fn decrypt_field(ciphertext: &str) -> Result<String, CodecError> {
    let bytes = STANDARD
        .decode(ciphertext.trim())
        .map_err(|e| CodecError::Encoding(e.to_string()))?;
    let plain: Vec<u8> = bytes
        .into_iter()
        .enumerate()
        .map(|(i, b)| b ^ keystream(i))
        .collect();
    String::from_utf8(plain).map_err(|_| CodecError::Utf8)
}

/// Read the autocommand table into `conf`, decrypting hidden entries that
/// are marked encrypted. Entries that fail to decrypt keep their stored
/// text.
pub fn read_autocommands(resolver: &Resolver<'_>, conf: &mut Conf) {
    for slot in 0..AUTOCOMMAND_SLOTS {
        let stored = resolver.string_indexed(AUTOCOMMAND, slot, "");
        let delay = resolver.int_indexed(AUTOCOMMAND_DELAY, slot, 0);
        let hidden = resolver.int_indexed(AUTOCOMMAND_HIDDEN, slot, 0);
        let encrypted = resolver.raw_int(&format!("{}{}", AUTOCOMMAND_ENCRYPTED, slot), 0);

        let text = if hidden != 0 && encrypted != 0 {
            match decrypt_field(&stored) {
                Ok(plain) => plain,
                Err(e) => {
                    log::warn!("Autocommand slot {} could not be decrypted: {}", slot, e);
                    stored
                }
            }
        } else {
            stored
        };

        conf.set_str_indexed(AUTOCOMMAND, slot, text);
        conf.set_int_indexed(AUTOCOMMAND_DELAY, slot, delay);
        conf.set_int_indexed(AUTOCOMMAND_HIDDEN, slot, hidden);
    }
}

/// Write the autocommand table. Hidden entries are encrypted and marked;
/// all others are written as plaintext with the marker cleared.
pub fn write_autocommands(emitter: &mut Emitter<'_, '_>, conf: &Conf) -> Result<(), CodecError> {
    for slot in 0..AUTOCOMMAND_SLOTS {
        let text = conf.get_str_indexed(AUTOCOMMAND, slot).unwrap_or("");
        let hidden = conf.get_int_indexed(AUTOCOMMAND_HIDDEN, slot).unwrap_or(0);
        let delay = conf.get_int_indexed(AUTOCOMMAND_DELAY, slot).unwrap_or(0);

        if hidden != 0 && !text.is_empty() {
            emitter.string_indexed(AUTOCOMMAND, slot, &encrypt_field(text)?);
            emitter.int_indexed(AUTOCOMMAND_ENCRYPTED, slot, 1);
        } else {
            emitter.string_indexed(AUTOCOMMAND, slot, text);
            emitter.int_indexed(AUTOCOMMAND_ENCRYPTED, slot, 0);
        }
        emitter.int_indexed(AUTOCOMMAND_DELAY, slot, delay);
        emitter.int_indexed(AUTOCOMMAND_HIDDEN, slot, hidden);
    }
    Ok(())
}
