//! # jwtgate - Issue, parse and validate signed JSON Web Tokens
//!
//! **jwtgate** answers one question about a presented bearer token: is it
//! authentic and currently valid for *this* caller? The caller describes an
//! acceptable token up front (issuer, audience, token id, the algorithm and
//! key the signature must verify under) and every load is checked against
//! that profile. Nothing the token says about itself decides its acceptance.
//!
//! ## Quick Start
//!
//! ```ignore
//! use jwtgate::*;
//!
//! let key = SigningKey::plain_text("secret");
//!
//! // Issue
//! let compact = TokenBuilder::new()
//!     .issued_by("app")
//!     .permitted_for("users")
//!     .identified_by("abc123")
//!     .expires_at(now + 3600)
//!     .sign(AlgorithmId::HS256, &key)?
//!     .to_compact();
//!
//! // Load
//! let loader = TokenLoader::new(
//!     ExpectedClaims::new(AlgorithmId::HS256, key)
//!         .issuer("app")
//!         .audience("users")
//!         .token_id("abc123"),
//! );
//! let token = loader.load(&compact)?;
//! assert_eq!(token.claims().id(), Some("abc123"));
//! ```
//!
//! ## Loading Flow
//!
//! ```text
//! &str ── codec::decode ──▶ Token ── verify_algorithm ──▶ Validator::assert_all ──▶ Token
//!            │                            │                        │
//!        DecodeError             UnsupportedAlgorithm        Rejected { violations }
//! ```
//!
//! [`TokenLoader::load`] runs all steps. [`TokenLoader::load_with`] can skip
//! the last two for inspection purposes; skipping is logged as a warning.
//!
//! ## Constraints
//!
//! The [`Validator`] evaluates every constraint and reports each failure, so
//! callers can tell an expired token from a forged one:
//!
//! - [`IssuedBy`]: `iss` equals the expected issuer
//! - [`PermittedFor`]: the expected audience is one of the `aud` values
//! - [`IdentifiedBy`]: `jti` equals the expected token id
//! - [`RelatedTo`]: `sub` equals the expected subject
//! - [`SignedWith`]: signature verifies with the *expected* algorithm and key
//! - [`ValidAt`]: `nbf <= now < exp` and `iat <= now`, with optional leeway
//!
//! ## Algorithm Support
//!
//! | Family | Algorithms            | Backend                          |
//! |--------|-----------------------|----------------------------------|
//! | HMAC   | HS256, HS384, HS512   | `hmac` + `sha2`, constant-time   |
//! | RSA    | RS256, RS384, RS512   | `aws-lc-rs`, PKCS#1 v1.5         |
//! | ECDSA  | ES256, ES384, ES512   | `aws-lc-rs`, P-256 / P-384 / P-521 |
//!
//! Any other `alg`, `none` included, is rejected before key material is used.
//!
//! ## Security
//!
//! ### Algorithm Confusion Prevention
//!
//! Verification always uses the algorithm from [`ExpectedClaims`]. A token
//! declaring `HS256` over an RSA public key, or `RS256` when `HS256` is
//! expected, fails [`SignedWith`].
//!
//! ### Token Substitution
//!
//! Issuer, audience and token id must each be configured or explicitly
//! waived with `any_issuer()`, `any_audience()` or `any_token_id()`. A bare
//! profile rejects every token, and waivers are logged as warnings.
//!
//! ### Bounded Input
//!
//! Token length and each decoded segment are size-capped before parsing.
//!
//! ### Timing Attack Protection
//!
//! HMAC signature verification uses constant-time comparison via the
//! [`constant_time_eq`](https://crates.io/crates/constant_time_eq) crate.
//!
//! ## References
//!
//! - [RFC 7515](https://datatracker.ietf.org/doc/html/rfc7515): JSON Web Signature (JWS)
//! - [RFC 7519](https://datatracker.ietf.org/doc/html/rfc7519): JSON Web Token (JWT)
//! - [RFC 8725](https://datatracker.ietf.org/doc/html/rfc8725): JSON Web Token Best Current Practices

// Core modules
pub mod error;
mod limits;
pub mod utils;

// Signer registry and keys
pub mod algorithm;
pub mod keys;

// Token model
pub mod claims;
pub mod codec;
pub mod token;

// Issuing
pub mod builder;

// Validation
pub mod clock;
pub mod validation;

// Facade (main public API)
pub mod loader;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use loader::{LoadOptions, TokenLoader};
pub use validation::{
    Constraint, ExpectedClaims, IdentifiedBy, IssuedBy, PermittedFor, RelatedTo, SignedWith,
    ValidAt, Validator, verify_algorithm,
};

pub use algorithm::{AlgorithmFamily, AlgorithmId, Signer};
pub use builder::TokenBuilder;
pub use claims::ClaimSet;
pub use clock::{Clock, FrozenClock, SystemClock};
pub use error::{
    ConstraintKind, DecodeError, Error, Rejected, Result, Segment, SignerError,
    UnsupportedAlgorithm, Violation,
};
pub use keys::SigningKey;
pub use token::{Header, Token};
