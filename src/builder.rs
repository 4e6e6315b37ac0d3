//! Issuing tokens
//!
//! ```ignore
//! use jwtgate::*;
//!
//! let token = TokenBuilder::new()
//!     .issued_by("app")
//!     .permitted_for("users")
//!     .identified_by("abc123")
//!     .issued_at(now)
//!     .expires_at(now + 3600)
//!     .with_claim("role", "admin")?
//!     .sign(AlgorithmId::HS256, &SigningKey::plain_text("secret"))?;
//!
//! let compact = token.to_compact();
//! ```

use serde_json::{Map, Value};

use crate::algorithm::{self, AlgorithmId};
use crate::claims::{self, ClaimSet};
use crate::codec;
use crate::error::{Error, Result};
use crate::keys::SigningKey;
use crate::token::{Header, Token};

/// Assembles claims and headers, then signs them into a [`Token`]
#[derive(Debug, Clone, Default)]
pub struct TokenBuilder {
    headers: Map<String, Value>,
    claims: ClaimSet,
    audiences: Vec<String>,
}

impl TokenBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the issuer (`iss`)
    pub fn issued_by(mut self, issuer: impl Into<String>) -> Self {
        self.claims
            .insert(claims::ISSUER, Value::String(issuer.into()));
        self
    }

    /// Add an audience (`aud`); repeated calls accumulate
    pub fn permitted_for(mut self, audience: impl Into<String>) -> Self {
        let audience = audience.into();
        if !self.audiences.contains(&audience) {
            self.audiences.push(audience);
        }
        self
    }

    /// Set the token identifier (`jti`)
    pub fn identified_by(mut self, id: impl Into<String>) -> Self {
        self.claims.insert(claims::ID, Value::String(id.into()));
        self
    }

    /// Set the subject (`sub`)
    pub fn related_to(mut self, subject: impl Into<String>) -> Self {
        self.claims
            .insert(claims::SUBJECT, Value::String(subject.into()));
        self
    }

    /// Set `iat` (Unix seconds)
    pub fn issued_at(mut self, at: i64) -> Self {
        self.claims.insert(claims::ISSUED_AT, Value::from(at));
        self
    }

    /// Set `nbf` (Unix seconds)
    pub fn can_only_be_used_after(mut self, at: i64) -> Self {
        self.claims.insert(claims::NOT_BEFORE, Value::from(at));
        self
    }

    /// Set `exp` (Unix seconds)
    pub fn expires_at(mut self, at: i64) -> Self {
        self.claims
            .insert(claims::EXPIRATION_TIME, Value::from(at));
        self
    }

    /// Add a custom claim
    ///
    /// Registered claims have dedicated setters and are refused here.
    pub fn with_claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        let name = name.into();
        if claims::REGISTERED.contains(&name.as_str()) {
            return Err(Error::RegisteredClaimGiven(name));
        }
        self.claims.insert(name, value.into());
        Ok(self)
    }

    /// Add a header parameter; `alg` is always taken from [`sign`](Self::sign)
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sign the assembled claims with `algorithm` and `key`
    pub fn sign(self, algorithm: AlgorithmId, key: &SigningKey) -> Result<Token> {
        let mut header = Header::new(algorithm);
        for (name, value) in self.headers {
            if name != "alg" {
                header.insert(name, value);
            }
        }

        let mut claims = self.claims;
        match self.audiences.as_slice() {
            [] => {}
            [single] => claims.insert(claims::AUDIENCE, Value::String(single.clone())),
            many => claims.insert(claims::AUDIENCE, Value::from(many.to_vec())),
        }

        let signing_input = codec::signing_input(&header, &claims)?;
        let signature = algorithm::sign(algorithm, key, signing_input.as_bytes())?;

        tracing::debug!(%algorithm, claims = claims.as_map().len(), "token signed");
        Ok(Token::new(header, claims, signing_input, signature))
    }
}
