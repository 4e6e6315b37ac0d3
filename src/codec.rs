//! Compact serialization: `base64url(header).base64url(claims).base64url(signature)`
//!
//! Decoding is pure data transformation. A successfully decoded [`Token`] is
//! structurally sound but untrusted until validated.

use serde_json::{Map, Value};

use crate::claims::ClaimSet;
use crate::error::{DecodeError, Error, Segment};
use crate::limits::{MAX_CLAIMS_SIZE, MAX_HEADER_SIZE, MAX_SIGNATURE_SIZE, MAX_TOKEN_LENGTH};
use crate::token::{Header, Token};
use crate::utils::base64url;

/// Encrypted (JWE) and critical-extension header parameters, neither of which
/// this crate can honour
const UNSUPPORTED_HEADERS: [&str; 2] = ["enc", "crit"];

/// Decode a compact token string
///
/// Checks, in order: overall size, segment count, header and claims as
/// base64url JSON objects, absence of `enc` and `crit` in the header,
/// registered claim shapes, signature base64url. An empty signature segment
/// decodes to an empty signature.
pub fn decode(input: &str) -> Result<Token, DecodeError> {
    if input.len() > MAX_TOKEN_LENGTH {
        return Err(DecodeError::TokenTooLarge {
            size: input.len(),
            max: MAX_TOKEN_LENGTH,
        });
    }

    let segments: Vec<&str> = input.split('.').collect();
    let [header_b64, claims_b64, signature_b64] = segments.as_slice() else {
        return Err(DecodeError::MalformedStructure {
            segments: segments.len(),
        });
    };

    let header = decode_object(Segment::Header, header_b64, MAX_HEADER_SIZE)?;
    if let Some(name) = UNSUPPORTED_HEADERS.iter().find(|name| header.contains_key(**name)) {
        return Err(DecodeError::UnsupportedHeader(name.to_string()));
    }

    let claims = decode_object(Segment::Claims, claims_b64, MAX_CLAIMS_SIZE)?;
    let claims = ClaimSet::from_map(claims).map_err(|reason| DecodeError::CannotDecodeContent {
        segment: Segment::Claims,
        reason,
    })?;

    let signature = base64url::decode(signature_b64, MAX_SIGNATURE_SIZE).map_err(|reason| {
        DecodeError::CannotDecodeContent {
            segment: Segment::Signature,
            reason,
        }
    })?;

    // Slice of the original input, never a re-serialization
    let signing_input = &input[..header_b64.len() + 1 + claims_b64.len()];

    tracing::trace!(
        alg = header.get("alg").and_then(serde_json::Value::as_str),
        signature_len = signature.len(),
        "decoded token"
    );

    Ok(Token::new(
        Header::from_map(header),
        claims,
        signing_input.to_string(),
        signature,
    ))
}

/// Encode header, claims and signature into a compact token string
pub fn encode(header: &Header, claims: &ClaimSet, signature: &[u8]) -> Result<String, Error> {
    let signing_input = signing_input(header, claims)?;
    Ok(format!("{signing_input}.{}", base64url::encode(signature)))
}

/// `base64url(header) "." base64url(claims)`
pub(crate) fn signing_input(header: &Header, claims: &ClaimSet) -> Result<String, Error> {
    let header = serde_json::to_vec(header).map_err(|e| Error::Encoding(e.to_string()))?;
    let claims = serde_json::to_vec(claims).map_err(|e| Error::Encoding(e.to_string()))?;
    Ok(format!(
        "{}.{}",
        base64url::encode(header),
        base64url::encode(claims)
    ))
}

fn decode_object(
    segment: Segment,
    encoded: &str,
    max_size: usize,
) -> Result<Map<String, Value>, DecodeError> {
    let cannot_decode = |reason: String| DecodeError::CannotDecodeContent { segment, reason };

    let bytes = base64url::decode(encoded, max_size).map_err(cannot_decode)?;
    match serde_json::from_slice(&bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(cannot_decode("expected a JSON object".to_string())),
        Err(e) => Err(cannot_decode(format!("invalid JSON: {e}"))),
    }
}
