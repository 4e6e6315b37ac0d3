//! Individual validation constraints
//!
//! Each constraint checks one property of a [`Token`] and can be asserted on
//! its own through the [`Constraint`] trait.

use crate::algorithm::{AlgorithmId, signer_for};
use crate::error::{ConstraintKind, Violation};
use crate::keys::SigningKey;
use crate::token::Token;

/// A single named check against a token
pub trait Constraint {
    fn kind(&self) -> ConstraintKind;

    /// First violation, if any
    fn assert(&self, token: &Token) -> Result<(), Violation>;

    /// Every violation; constraints checking several claims override this
    fn violations(&self, token: &Token) -> Vec<Violation> {
        self.assert(token).err().into_iter().collect()
    }
}

/// `iss` equals the expected issuer
#[derive(Debug, Clone, Copy)]
pub struct IssuedBy<'a>(pub &'a str);

impl Constraint for IssuedBy<'_> {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::IssuedBy
    }

    fn assert(&self, token: &Token) -> Result<(), Violation> {
        if token.has_been_issued_by(self.0) {
            return Ok(());
        }
        Err(Violation::IssuerMismatch {
            expected: self.0.to_string(),
            found: token.claims().issuer().map(str::to_string),
        })
    }
}

/// Expected audience is one of the `aud` values
#[derive(Debug, Clone, Copy)]
pub struct PermittedFor<'a>(pub &'a str);

impl Constraint for PermittedFor<'_> {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::PermittedFor
    }

    fn assert(&self, token: &Token) -> Result<(), Violation> {
        if token.is_permitted_for(self.0) {
            return Ok(());
        }
        Err(Violation::AudienceMismatch {
            expected: self.0.to_string(),
            found: token
                .claims()
                .audience()
                .into_iter()
                .map(str::to_string)
                .collect(),
        })
    }
}

/// `jti` equals the expected token identifier
#[derive(Debug, Clone, Copy)]
pub struct IdentifiedBy<'a>(pub &'a str);

impl Constraint for IdentifiedBy<'_> {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::IdentifiedBy
    }

    fn assert(&self, token: &Token) -> Result<(), Violation> {
        if token.is_identified_by(self.0) {
            return Ok(());
        }
        Err(Violation::IdentifierMismatch {
            expected: self.0.to_string(),
            found: token.claims().id().map(str::to_string),
        })
    }
}

/// `sub` equals the expected subject
#[derive(Debug, Clone, Copy)]
pub struct RelatedTo<'a>(pub &'a str);

impl Constraint for RelatedTo<'_> {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::RelatedTo
    }

    fn assert(&self, token: &Token) -> Result<(), Violation> {
        if token.is_related_to(self.0) {
            return Ok(());
        }
        Err(Violation::SubjectMismatch {
            expected: self.0.to_string(),
            found: token.claims().subject().map(str::to_string),
        })
    }
}

/// Signature verifies under the pinned algorithm and key
///
/// The verifier is always the one for `algorithm`. The header `alg` has to
/// name the same algorithm, but is never used to pick the verifier.
#[derive(Debug, Clone, Copy)]
pub struct SignedWith<'a> {
    pub algorithm: AlgorithmId,
    pub key: &'a SigningKey,
}

impl<'a> SignedWith<'a> {
    pub fn new(algorithm: AlgorithmId, key: &'a SigningKey) -> Self {
        Self { algorithm, key }
    }
}

impl Constraint for SignedWith<'_> {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::SignedWith
    }

    fn assert(&self, token: &Token) -> Result<(), Violation> {
        let declared = token.header().alg();
        if declared != Some(self.algorithm.as_str()) {
            return Err(Violation::AlgorithmMismatch {
                expected: self.algorithm,
                found: declared.map(str::to_string),
            });
        }

        signer_for(self.algorithm)
            .verify(token.signing_input(), token.signature(), self.key)
            .map_err(Violation::from)
    }
}

/// Token is usable at `now`
///
/// With `leeway`, `exp` is extended and `nbf`/`iat` moved back by that many
/// seconds. In strict mode `exp` and `iat` must be present.
#[derive(Debug, Clone, Copy)]
pub struct ValidAt {
    pub now: i64,
    pub leeway: u64,
    pub strict: bool,
}

impl ValidAt {
    pub fn new(now: i64) -> Self {
        Self {
            now,
            leeway: 0,
            strict: false,
        }
    }

    pub fn with_leeway(mut self, leeway: u64) -> Self {
        self.leeway = leeway;
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }
}

impl Constraint for ValidAt {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::ValidAt
    }

    fn assert(&self, token: &Token) -> Result<(), Violation> {
        match self.violations(token).into_iter().next() {
            Some(violation) => Err(violation),
            None => Ok(()),
        }
    }

    /// Strict-mode presence, then `iat`, `nbf` and `exp`, all reported
    fn violations(&self, token: &Token) -> Vec<Violation> {
        let claims = token.claims();
        let leeway = i64::try_from(self.leeway).unwrap_or(i64::MAX);
        let latest = self.now.saturating_add(leeway);
        let earliest = self.now.saturating_sub(leeway);
        let mut violations = Vec::new();

        if self.strict {
            if claims.expires_at().is_none() {
                violations.push(Violation::MissingTimeClaim(crate::claims::EXPIRATION_TIME));
            }
            if claims.issued_at().is_none() {
                violations.push(Violation::MissingTimeClaim(crate::claims::ISSUED_AT));
            }
        }

        if !token.has_been_issued_before(latest) {
            violations.push(Violation::IssuedInFuture {
                issued_at: claims.issued_at().unwrap_or_default(),
                now: self.now,
                leeway: self.leeway,
            });
        }

        if !token.is_minimum_time_before(latest) {
            violations.push(Violation::NotYetValid {
                not_before: claims.not_before().unwrap_or_default(),
                now: self.now,
                leeway: self.leeway,
            });
        }

        if token.is_expired(earliest) {
            violations.push(Violation::Expired {
                expires_at: claims.expires_at().unwrap_or_default(),
                now: self.now,
                leeway: self.leeway,
            });
        }

        violations
    }
}
