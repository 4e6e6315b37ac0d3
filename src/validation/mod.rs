//! Constraint-based validation against an expected-claims profile
//!
//! The caller describes what an acceptable token looks like with
//! [`ExpectedClaims`]: issuer, audience, token id, optionally subject, plus
//! the algorithm and key the signature must verify under. The profile is
//! never derived from the token being checked.
//!
//! [`Validator::assert_all`] evaluates every applicable constraint, in this
//! order, and reports all failures together:
//!
//! 1. [`IssuedBy`]
//! 2. [`PermittedFor`]
//! 3. [`IdentifiedBy`]
//! 4. [`RelatedTo`] when a subject is expected
//! 5. [`SignedWith`]
//! 6. [`ValidAt`], at one clock reading
//!
//! Issuer, audience and token id are mandatory. A profile that leaves one
//! unset rejects every token with [`Violation::ExpectationMissing`]; skipping
//! the check takes an explicit `any_*` call, which is logged at `WARN`.

mod constraints;

pub use constraints::{
    Constraint, IdentifiedBy, IssuedBy, PermittedFor, RelatedTo, SignedWith, ValidAt,
};

use std::panic::Location;

use crate::algorithm::AlgorithmId;
use crate::clock::Clock;
use crate::error::{ConstraintKind, Rejected, UnsupportedAlgorithm, Violation};
use crate::keys::SigningKey;
use crate::limits::MAX_LEEWAY_SECONDS;
use crate::token::Token;

/// What the profile demands for one identity claim
#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum Expectation {
    #[default]
    Unset,
    Equals(String),
    Waived,
}

impl Expectation {
    fn value(&self) -> Option<&str> {
        match self {
            Expectation::Equals(value) => Some(value),
            Expectation::Unset | Expectation::Waived => None,
        }
    }
}

/// Caller-supplied description of an acceptable token
#[derive(Debug, Clone)]
pub struct ExpectedClaims {
    algorithm: AlgorithmId,
    key: SigningKey,
    issuer: Expectation,
    audience: Expectation,
    token_id: Expectation,
    subject: Option<String>,
    leeway: u64,
    strict: bool,
}

impl ExpectedClaims {
    /// Profile verifying signatures with `algorithm` and `key`
    ///
    /// Issuer, audience and token id still have to be set or waived.
    pub fn new(algorithm: AlgorithmId, key: SigningKey) -> Self {
        Self {
            algorithm,
            key,
            issuer: Expectation::Unset,
            audience: Expectation::Unset,
            token_id: Expectation::Unset,
            subject: None,
            leeway: 0,
            strict: false,
        }
    }

    /// Require `iss` to equal `issuer`
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Expectation::Equals(issuer.into());
        self
    }

    /// Require `audience` among the `aud` values
    pub fn audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Expectation::Equals(audience.into());
        self
    }

    /// Require `jti` to equal `id`
    pub fn token_id(mut self, id: impl Into<String>) -> Self {
        self.token_id = Expectation::Equals(id.into());
        self
    }

    /// Accept any issuer (the `IssuedBy` check is skipped)
    #[track_caller]
    pub fn any_issuer(mut self) -> Self {
        waived(ConstraintKind::IssuedBy, Location::caller());
        self.issuer = Expectation::Waived;
        self
    }

    /// Accept any audience (the `PermittedFor` check is skipped)
    #[track_caller]
    pub fn any_audience(mut self) -> Self {
        waived(ConstraintKind::PermittedFor, Location::caller());
        self.audience = Expectation::Waived;
        self
    }

    /// Accept any token id (the `IdentifiedBy` check is skipped)
    #[track_caller]
    pub fn any_token_id(mut self) -> Self {
        waived(ConstraintKind::IdentifiedBy, Location::caller());
        self.token_id = Expectation::Waived;
        self
    }

    /// Require `sub` to equal `subject`
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Tolerated clock skew for time claims
    ///
    /// Capped at 300 seconds so a large value cannot disable expiry.
    pub fn leeway(mut self, seconds: u64) -> Self {
        self.leeway = seconds.min(MAX_LEEWAY_SECONDS);
        self
    }

    /// Require `exp` and `iat` to be present
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn algorithm(&self) -> AlgorithmId {
        self.algorithm
    }

    pub fn key(&self) -> &SigningKey {
        &self.key
    }

    pub fn expected_issuer(&self) -> Option<&str> {
        self.issuer.value()
    }

    pub fn expected_audience(&self) -> Option<&str> {
        self.audience.value()
    }

    pub fn expected_token_id(&self) -> Option<&str> {
        self.token_id.value()
    }

    pub fn expected_subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn leeway_seconds(&self) -> u64 {
        self.leeway
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Constraints this profile imposes at instant `now`
    pub fn constraints(&self, now: i64) -> Vec<Box<dyn Constraint + '_>> {
        let mut constraints: Vec<Box<dyn Constraint + '_>> = Vec::with_capacity(6);

        match &self.issuer {
            Expectation::Equals(issuer) => constraints.push(Box::new(IssuedBy(issuer))),
            Expectation::Unset => {
                constraints.push(Box::new(Unconfigured(ConstraintKind::IssuedBy)))
            }
            Expectation::Waived => {}
        }
        match &self.audience {
            Expectation::Equals(audience) => constraints.push(Box::new(PermittedFor(audience))),
            Expectation::Unset => {
                constraints.push(Box::new(Unconfigured(ConstraintKind::PermittedFor)))
            }
            Expectation::Waived => {}
        }
        match &self.token_id {
            Expectation::Equals(id) => constraints.push(Box::new(IdentifiedBy(id))),
            Expectation::Unset => {
                constraints.push(Box::new(Unconfigured(ConstraintKind::IdentifiedBy)))
            }
            Expectation::Waived => {}
        }
        if let Some(subject) = &self.subject {
            constraints.push(Box::new(RelatedTo(subject)));
        }

        constraints.push(Box::new(SignedWith::new(self.algorithm, &self.key)));

        let mut valid_at = ValidAt::new(now).with_leeway(self.leeway);
        if self.strict {
            valid_at = valid_at.strict();
        }
        constraints.push(Box::new(valid_at));

        constraints
    }
}

fn waived(kind: ConstraintKind, caller: &Location<'_>) {
    tracing::warn!(%caller, constraint = %kind, "identity check waived by caller");
}

/// Stands in for an identity check the profile never configured
struct Unconfigured(ConstraintKind);

impl Constraint for Unconfigured {
    fn kind(&self) -> ConstraintKind {
        self.0
    }

    fn assert(&self, _token: &Token) -> Result<(), Violation> {
        Err(Violation::ExpectationMissing(self.0))
    }
}

/// Evaluates constraints and aggregates their violations
pub struct Validator;

impl Validator {
    /// Assert every given constraint; all are evaluated
    pub fn assert(token: &Token, constraints: &[&dyn Constraint]) -> Result<(), Rejected> {
        let violations: Vec<_> = constraints
            .iter()
            .flat_map(|constraint| constraint.violations(token))
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(Rejected::new(violations))
        }
    }

    /// Assert everything `expected` demands, reading `clock` once
    pub fn assert_all(
        token: &Token,
        expected: &ExpectedClaims,
        clock: &dyn Clock,
    ) -> Result<(), Rejected> {
        let now = clock.now();
        let constraints = expected.constraints(now);
        let constraints: Vec<&dyn Constraint> = constraints.iter().map(|c| c.as_ref()).collect();

        tracing::trace!(now, count = constraints.len(), "asserting constraints");
        Self::assert(token, &constraints)
    }

    /// Boolean form of [`assert_all`](Self::assert_all)
    pub fn validate(token: &Token, expected: &ExpectedClaims, clock: &dyn Clock) -> bool {
        Self::assert_all(token, expected, clock).is_ok()
    }
}

/// Check that the header declares a supported algorithm
///
/// A missing or non-string `alg` is reported as an empty name.
pub fn verify_algorithm(token: &Token) -> Result<AlgorithmId, UnsupportedAlgorithm> {
    token.header().alg().unwrap_or_default().parse()
}
