//! Legacy text encoding.
//!
//! Every string in the game data is stored in EUC-KR, regardless of the
//! platform the files were authored on. Both directions are strict: a byte
//! sequence that does not decode is rejected at load, so every string that
//! loads can be written back to the same bytes.

use std::borrow::Cow;

use encoding_rs::EUC_KR;

use crate::{Error, Result};

/// Decode legacy-encoded bytes into a string.
pub fn decode(bytes: &[u8]) -> Result<String> {
    if bytes.is_ascii() {
        return Ok(bytes.iter().map(|&b| b as char).collect());
    }

    match EUC_KR.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => Ok(text.into_owned()),
        None => {
            tracing::warn!(len = bytes.len(), "malformed EUC-KR sequence");
            Err(Error::MalformedText(bytes.to_vec()))
        }
    }
}

/// Encode a string into legacy-encoded bytes.
pub fn encode(text: &str) -> Result<Cow<'_, [u8]>> {
    if text.is_ascii() {
        return Ok(Cow::Borrowed(text.as_bytes()));
    }

    let (bytes, _, unmappable) = EUC_KR.encode(text);
    if unmappable {
        return Err(Error::Unencodable(text.to_string()));
    }
    Ok(bytes)
}
