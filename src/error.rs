//! Error types for token decoding, signing and validation
//!
//! Each component reports failures through its own enum so callers can match
//! on exactly the failures a step can produce:
//!
//! - [`DecodeError`] for the compact serialization codec
//! - [`UnsupportedAlgorithm`] for algorithm allow-listing
//! - [`SignerError`] for the signing and verification primitives
//! - [`Violation`] and [`Rejected`] for the constraint validator
//!
//! The facade collects them into [`Error`] through `From` conversions.

use std::fmt;

use thiserror::Error;

use crate::algorithm::AlgorithmId;

/// Segment of a compact token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Header,
    Claims,
    Signature,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Segment::Header => "header",
            Segment::Claims => "claims",
            Segment::Signature => "signature",
        })
    }
}

/// Structural failures while decoding a compact token
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Token too large: {size} bytes (maximum: {max} bytes)")]
    TokenTooLarge { size: usize, max: usize },

    #[error("Malformed token: expected 3 segments separated by '.', found {segments}")]
    MalformedStructure { segments: usize },

    #[error("Cannot decode {segment} segment: {reason}")]
    CannotDecodeContent { segment: Segment, reason: String },

    /// Header carries an entry this crate refuses to interpret (e.g. `enc`)
    #[error("Unsupported header parameter '{0}'")]
    UnsupportedHeader(String),
}

/// Algorithm name outside the supported set
///
/// Holds the offending name, truncated so an attacker-chosen header value
/// cannot inflate error messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Algorithm '{0}' is not supported")]
pub struct UnsupportedAlgorithm(pub String);

/// Failures of the signing and verification primitives
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignerError {
    #[error("Signature verification failed")]
    SignatureInvalid,

    #[error("Key rejected for {algorithm}: {reason}")]
    KeyRejected {
        algorithm: AlgorithmId,
        reason: String,
    },

    #[error("Signing with {0} failed")]
    SigningFailed(AlgorithmId),
}

/// Name of a validation constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    IssuedBy,
    PermittedFor,
    IdentifiedBy,
    RelatedTo,
    SignedWith,
    ValidAt,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConstraintKind::IssuedBy => "IssuedBy",
            ConstraintKind::PermittedFor => "PermittedFor",
            ConstraintKind::IdentifiedBy => "IdentifiedBy",
            ConstraintKind::RelatedTo => "RelatedTo",
            ConstraintKind::SignedWith => "SignedWith",
            ConstraintKind::ValidAt => "ValidAt",
        })
    }
}

/// A single failed constraint, with the values that caused it
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    // ============================================================================
    // Identity claims
    // ============================================================================
    #[error("Issuer mismatch: expected '{expected}', found {found:?}")]
    IssuerMismatch {
        expected: String,
        found: Option<String>,
    },

    #[error("Audience mismatch: expected '{expected}', found {found:?}")]
    AudienceMismatch {
        expected: String,
        found: Vec<String>,
    },

    #[error("Token id mismatch: expected '{expected}', found {found:?}")]
    IdentifierMismatch {
        expected: String,
        found: Option<String>,
    },

    #[error("Subject mismatch: expected '{expected}', found {found:?}")]
    SubjectMismatch {
        expected: String,
        found: Option<String>,
    },

    /// The profile neither configured nor waived this identity check
    #[error("No expected value configured for {0}")]
    ExpectationMissing(ConstraintKind),

    // ============================================================================
    // Signature
    // ============================================================================
    #[error("Algorithm mismatch: expected {expected}, header declares {found:?}")]
    AlgorithmMismatch {
        expected: AlgorithmId,
        found: Option<String>,
    },

    #[error("Signature verification failed")]
    SignatureInvalid,

    #[error("Key rejected for {algorithm}: {reason}")]
    KeyRejected {
        algorithm: AlgorithmId,
        reason: String,
    },

    // ============================================================================
    // Validity window
    // ============================================================================
    #[error("Token expired at {expires_at} (now: {now}, leeway: {leeway}s)")]
    Expired {
        expires_at: i64,
        now: i64,
        leeway: u64,
    },

    #[error("Token not valid until {not_before} (now: {now}, leeway: {leeway}s)")]
    NotYetValid {
        not_before: i64,
        now: i64,
        leeway: u64,
    },

    #[error("Token issued in future at {issued_at} (now: {now}, leeway: {leeway}s)")]
    IssuedInFuture {
        issued_at: i64,
        now: i64,
        leeway: u64,
    },

    #[error("Required time claim '{0}' is missing")]
    MissingTimeClaim(&'static str),
}

impl Violation {
    /// The constraint this violation belongs to
    pub fn constraint(&self) -> ConstraintKind {
        match self {
            Violation::IssuerMismatch { .. } => ConstraintKind::IssuedBy,
            Violation::AudienceMismatch { .. } => ConstraintKind::PermittedFor,
            Violation::IdentifierMismatch { .. } => ConstraintKind::IdentifiedBy,
            Violation::SubjectMismatch { .. } => ConstraintKind::RelatedTo,
            Violation::ExpectationMissing(kind) => *kind,
            Violation::AlgorithmMismatch { .. }
            | Violation::SignatureInvalid
            | Violation::KeyRejected { .. } => ConstraintKind::SignedWith,
            Violation::Expired { .. }
            | Violation::NotYetValid { .. }
            | Violation::IssuedInFuture { .. }
            | Violation::MissingTimeClaim(_) => ConstraintKind::ValidAt,
        }
    }
}

impl From<SignerError> for Violation {
    fn from(err: SignerError) -> Self {
        match err {
            SignerError::KeyRejected { algorithm, reason } => {
                Violation::KeyRejected { algorithm, reason }
            }
            SignerError::SignatureInvalid | SignerError::SigningFailed(_) => {
                Violation::SignatureInvalid
            }
        }
    }
}

/// Aggregate verdict of a failed validation: every violated constraint
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Token rejected: {}", join(.violations))]
pub struct Rejected {
    violations: Vec<Violation>,
}

impl Rejected {
    pub(crate) fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// All violations, in constraint evaluation order
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Distinct failing constraints, in evaluation order
    pub fn constraints(&self) -> Vec<ConstraintKind> {
        let mut kinds: Vec<ConstraintKind> = Vec::with_capacity(self.violations.len());
        for kind in self.violations.iter().map(Violation::constraint) {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        kinds
    }

    /// Whether the given constraint failed
    pub fn contains(&self, kind: ConstraintKind) -> bool {
        self.violations.iter().any(|v| v.constraint() == kind)
    }
}

fn join(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("[{}] {v}", v.constraint()))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors returned by the token loader and builder
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    UnsupportedAlgorithm(#[from] UnsupportedAlgorithm),

    #[error(transparent)]
    ConstraintViolated(#[from] Rejected),

    #[error(transparent)]
    Signer(#[from] SignerError),

    /// A registered claim was passed to the custom-claim setter
    #[error("Registered claim '{0}' must be set through its dedicated builder method")]
    RegisteredClaimGiven(String),

    #[error("Cannot encode token: {0}")]
    Encoding(String),
}

impl Error {
    /// Failing constraints, empty unless this is a constraint violation
    pub fn constraints(&self) -> Vec<ConstraintKind> {
        match self {
            Error::ConstraintViolated(rejected) => rejected.constraints(),
            _ => Vec::new(),
        }
    }
}

/// Result type alias for token operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_maps_to_constraint() {
        let expired = Violation::Expired {
            expires_at: 10,
            now: 20,
            leeway: 0,
        };
        assert_eq!(expired.constraint(), ConstraintKind::ValidAt);
        assert_eq!(
            Violation::SignatureInvalid.constraint(),
            ConstraintKind::SignedWith
        );
        assert_eq!(
            Violation::MissingTimeClaim("exp").constraint(),
            ConstraintKind::ValidAt
        );
        assert_eq!(
            Violation::ExpectationMissing(ConstraintKind::PermittedFor).constraint(),
            ConstraintKind::PermittedFor
        );
    }

    #[test]
    fn test_rejected_deduplicates_constraints() {
        let rejected = Rejected::new(vec![
            Violation::IssuerMismatch {
                expected: "app".into(),
                found: None,
            },
            Violation::Expired {
                expires_at: 1,
                now: 5,
                leeway: 0,
            },
            Violation::MissingTimeClaim("iat"),
        ]);

        assert_eq!(
            rejected.constraints(),
            vec![ConstraintKind::IssuedBy, ConstraintKind::ValidAt]
        );
        assert!(rejected.contains(ConstraintKind::IssuedBy));
        assert!(!rejected.contains(ConstraintKind::SignedWith));
    }

    #[test]
    fn test_rejected_message_names_constraints() {
        let rejected = Rejected::new(vec![Violation::SignatureInvalid]);
        assert_eq!(
            rejected.to_string(),
            "Token rejected: [SignedWith] Signature verification failed"
        );
    }

    #[test]
    fn test_signer_error_into_violation() {
        let violation: Violation = SignerError::KeyRejected {
            algorithm: AlgorithmId::RS256,
            reason: "not a key".into(),
        }
        .into();
        assert_eq!(violation.constraint(), ConstraintKind::SignedWith);
    }

    #[test]
    fn test_facade_error_constraints() {
        let err: Error = Rejected::new(vec![Violation::SignatureInvalid]).into();
        assert_eq!(err.constraints(), vec![ConstraintKind::SignedWith]);

        let err: Error = DecodeError::MalformedStructure { segments: 2 }.into();
        assert!(err.constraints().is_empty());
    }
}
