//! Immutable parsed token
//!
//! A [`Token`] is produced by [`codec::decode`](crate::codec::decode) or by
//! [`TokenBuilder::sign`](crate::TokenBuilder::sign) and never changes after
//! that. Holding a `Token` says nothing about its authenticity: only a
//! successful [`TokenLoader::load`](crate::TokenLoader::load) or
//! [`Validator::assert_all`](crate::Validator::assert_all) does.

use crate::claims::ClaimSet;
use crate::token::Header;
use crate::utils::base64url;

/// Header, claims, signing input and signature of a compact token
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    header: Header,
    claims: ClaimSet,
    signing_input: String,
    signature: Vec<u8>,
}

impl Token {
    /// `signing_input` must be the exact `header.claims` text the signature
    /// was computed over
    pub(crate) fn new(
        header: Header,
        claims: ClaimSet,
        signing_input: String,
        signature: Vec<u8>,
    ) -> Self {
        Self {
            header,
            claims,
            signing_input,
            signature,
        }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn claims(&self) -> &ClaimSet {
        &self.claims
    }

    /// Bytes the signature covers, byte-identical to the presented token
    pub fn signing_input(&self) -> &[u8] {
        self.signing_input.as_bytes()
    }

    /// Raw signature bytes (base64url-decoded)
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Compact serialization of this token
    pub fn to_compact(&self) -> String {
        format!(
            "{}.{}",
            self.signing_input,
            base64url::encode(&self.signature)
        )
    }

    // ============================================================================
    // Claim predicates
    // ============================================================================

    pub fn has_been_issued_by(&self, issuer: &str) -> bool {
        self.claims.issuer() == Some(issuer)
    }

    /// Membership check: `aud` may list several audiences
    pub fn is_permitted_for(&self, audience: &str) -> bool {
        self.claims.audience().contains(&audience)
    }

    pub fn is_identified_by(&self, id: &str) -> bool {
        self.claims.id() == Some(id)
    }

    pub fn is_related_to(&self, subject: &str) -> bool {
        self.claims.subject() == Some(subject)
    }

    /// `exp` at or before `now`; a token without `exp` never expires
    pub fn is_expired(&self, now: i64) -> bool {
        self.claims.expires_at().is_some_and(|exp| now >= exp)
    }

    /// `nbf` at or before `now`, or no `nbf`
    pub fn is_minimum_time_before(&self, now: i64) -> bool {
        self.claims.not_before().is_none_or(|nbf| nbf <= now)
    }

    /// `iat` at or before `now`, or no `iat`
    pub fn has_been_issued_before(&self, now: i64) -> bool {
        self.claims.issued_at().is_none_or(|iat| iat <= now)
    }
}
