//! Token loader: the single entry point for untrusted token strings
//!
//! Loading runs three steps, each able to reject the token:
//!
//! ```text
//! &str
//!   │ codec::decode          (structure, base64url, JSON, size limits)
//!   ▼
//! Token (untrusted)
//!   │ verify_algorithm       (header alg in the supported set)
//!   ▼
//!   │ Validator::assert_all  (IssuedBy, PermittedFor, IdentifiedBy,
//!   │                         RelatedTo, SignedWith, ValidAt)
//!   ▼
//! Token (authentic and currently valid)
//! ```
//!
//! The last two steps can be switched off per call with [`LoadOptions`], for
//! example to inspect the claims of an expired token. Every opt-out emits a
//! `WARN` audit event naming the call site.

use std::panic::Location;

use crate::clock::{Clock, SystemClock};
use crate::codec;
use crate::error::Result;
use crate::token::Token;
use crate::validation::{ExpectedClaims, Validator, verify_algorithm};

/// Which loading steps run
///
/// Both default to on; turning one off is always an explicit method call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    validate: bool,
    verify: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            validate: true,
            verify: true,
        }
    }
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip constraint validation (signature and claims are NOT checked)
    pub fn skip_validation(mut self) -> Self {
        self.validate = false;
        self
    }

    /// Skip the supported-algorithm check on the header
    pub fn skip_algorithm_check(mut self) -> Self {
        self.verify = false;
        self
    }

    pub fn validates(&self) -> bool {
        self.validate
    }

    pub fn verifies(&self) -> bool {
        self.verify
    }
}

/// Loads tokens against one expected-claims profile
///
/// # Examples
///
/// ```ignore
/// use jwtgate::*;
///
/// let loader = TokenLoader::new(
///     ExpectedClaims::new(AlgorithmId::HS256, SigningKey::plain_text("secret"))
///         .issuer("app")
///         .audience("users")
///         .token_id("abc123"),
/// );
///
/// let token = loader.load(presented)?;
/// println!("jti: {:?}", token.claims().id());
/// ```
#[derive(Debug, Clone)]
pub struct TokenLoader<C = SystemClock> {
    expected: ExpectedClaims,
    clock: C,
}

impl TokenLoader<SystemClock> {
    /// Loader reading wall-clock time
    pub fn new(expected: ExpectedClaims) -> Self {
        Self::with_clock(expected, SystemClock)
    }
}

impl<C: Clock> TokenLoader<C> {
    /// Loader reading time from `clock`
    pub fn with_clock(expected: ExpectedClaims, clock: C) -> Self {
        Self { expected, clock }
    }

    pub fn expected(&self) -> &ExpectedClaims {
        &self.expected
    }

    /// Decode, check the algorithm and validate
    #[track_caller]
    pub fn load(&self, token: &str) -> Result<Token> {
        self.load_with(token, LoadOptions::default())
    }

    /// Decode, then run the steps enabled in `options`
    #[track_caller]
    pub fn load_with(&self, token: &str, options: LoadOptions) -> Result<Token> {
        let caller = Location::caller();
        let token = codec::decode(token)?;

        if options.verifies() {
            verify_algorithm(&token)?;
        } else {
            tracing::warn!(%caller, "supported-algorithm check skipped by caller");
        }

        if options.validates() {
            Validator::assert_all(&token, &self.expected, &self.clock)?;
        } else {
            tracing::warn!(%caller, "token loaded without validation");
        }

        tracing::debug!(
            alg = token.header().alg(),
            jti = token.claims().id(),
            validated = options.validates(),
            "token loaded"
        );
        Ok(token)
    }
}
