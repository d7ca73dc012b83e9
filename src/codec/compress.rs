//! Reversible text transform for URL fragments.
//!
//! Brotli at maximum quality, then unpadded URL-safe base64, so the result only contains
//! `A-Z a-z 0-9 - _` and never needs percent-encoding.

use std::io::{Read, Write};

use base64::Engine;
use base64::alphabet::URL_SAFE;
use base64::engine::DecodePaddingMode;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD};

use crate::foundation::error::{PinmentError, PinmentResult};

const BROTLI_QUALITY: u32 = 11;
const BROTLI_WINDOW_BITS: u32 = 22;
const BROTLI_BUFFER_SIZE: usize = 4096;

/// Upper bound on decompressed payload size.
pub const MAX_DECOMPRESSED_BYTES: usize = 1 << 20;

/// Accepts payloads whether or not something re-added `=` padding.
const FRAGMENT_DECODER: GeneralPurpose = GeneralPurpose::new(
    &URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Compress `text` into a fragment-safe payload.
pub fn compress_to_fragment(text: &str) -> PinmentResult<String> {
    let mut compressed = Vec::new();
    {
        let mut writer = brotli::CompressorWriter::new(
            &mut compressed,
            BROTLI_BUFFER_SIZE,
            BROTLI_QUALITY,
            BROTLI_WINDOW_BITS,
        );
        writer
            .write_all(text.as_bytes())
            .map_err(|e| PinmentError::codec(format!("brotli compress: {e}")))?;
        writer
            .flush()
            .map_err(|e| PinmentError::codec(format!("brotli flush: {e}")))?;
    }
    Ok(URL_SAFE_NO_PAD.encode(&compressed))
}

/// Reverse [`compress_to_fragment`].
///
/// The payload may have been percent-decoded or percent-encoded on the way; surrounding
/// whitespace is ignored.
pub fn decompress_fragment(payload: &str) -> PinmentResult<String> {
    let unescaped = urlencoding::decode(payload)
        .map_err(|e| PinmentError::codec(format!("percent-decode payload: {e}")))?;
    let trimmed = unescaped.trim();
    if trimmed.is_empty() {
        return Err(PinmentError::codec("empty payload"));
    }

    let compressed = FRAGMENT_DECODER
        .decode(trimmed)
        .map_err(|e| PinmentError::codec(format!("base64 decode: {e}")))?;

    let mut out = Vec::new();
    brotli::Decompressor::new(compressed.as_slice(), BROTLI_BUFFER_SIZE)
        .take(MAX_DECOMPRESSED_BYTES as u64 + 1)
        .read_to_end(&mut out)
        .map_err(|e| PinmentError::codec(format!("brotli decompress: {e}")))?;
    if out.len() > MAX_DECOMPRESSED_BYTES {
        return Err(PinmentError::codec(format!(
            "decompressed payload exceeds {MAX_DECOMPRESSED_BYTES} bytes"
        )));
    }

    String::from_utf8(out).map_err(|e| PinmentError::codec(format!("payload is not UTF-8: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/codec/compress.rs"]
mod tests;
