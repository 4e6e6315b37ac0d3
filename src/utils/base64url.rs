//! Base64URL encoding/decoding per RFC 4648 section 5, without padding
//!
//! Thin wrapper around the `base64` crate that enforces a decoded size cap
//! before the caller sees any bytes.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

/// Encode bytes as unpadded Base64URL
pub fn encode(input: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Decode unpadded Base64URL, rejecting results larger than `max_size`
///
/// The encoded length is checked first so oversized input is refused before
/// any allocation proportional to it.
pub fn decode(input: &str, max_size: usize) -> Result<Vec<u8>, String> {
    let ceiling = max_size.div_ceil(3) * 4;
    if input.len() > ceiling {
        return Err(format!(
            "encoded size {} exceeds limit for {max_size} decoded bytes",
            input.len()
        ));
    }

    let decoded = URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| format!("invalid base64url: {e}"))?;

    if decoded.len() > max_size {
        return Err(format!(
            "decoded size {} exceeds limit of {max_size} bytes",
            decoded.len()
        ));
    }

    Ok(decoded)
}
