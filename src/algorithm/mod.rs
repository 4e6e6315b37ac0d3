//! Signer registry: the fixed set of supported algorithms
//!
//! Algorithm names are matched exactly against nine identifiers. Anything
//! else, `none` included, is an [`UnsupportedAlgorithm`] before a key is
//! touched. Each identifier maps to one statically allocated [`Signer`].

mod traits;

pub mod ecdsa;
pub mod hmac;
pub mod rsa;

pub use traits::{Signer, resolve, sign, signer_for, verify};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnsupportedAlgorithm;
use crate::limits::MAX_ALG_LENGTH;

/// Algorithm identifier as carried in the `alg` header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlgorithmId {
    /// HMAC with SHA-256
    HS256,

    /// HMAC with SHA-384
    HS384,

    /// HMAC with SHA-512
    HS512,

    /// RSASSA-PKCS1-v1_5 with SHA-256
    RS256,

    /// RSASSA-PKCS1-v1_5 with SHA-384
    RS384,

    /// RSASSA-PKCS1-v1_5 with SHA-512
    RS512,

    /// ECDSA with P-256 and SHA-256
    ES256,

    /// ECDSA with P-384 and SHA-384
    ES384,

    /// ECDSA with P-521 and SHA-512
    ES512,
}

/// Family of primitives behind an algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmFamily {
    Hmac,
    Rsa,
    Ecdsa,
}

impl AlgorithmId {
    /// Every supported algorithm
    pub const ALL: [AlgorithmId; 9] = [
        AlgorithmId::HS256,
        AlgorithmId::HS384,
        AlgorithmId::HS512,
        AlgorithmId::RS256,
        AlgorithmId::RS384,
        AlgorithmId::RS512,
        AlgorithmId::ES256,
        AlgorithmId::ES384,
        AlgorithmId::ES512,
    ];

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AlgorithmId::HS256 => "HS256",
            AlgorithmId::HS384 => "HS384",
            AlgorithmId::HS512 => "HS512",
            AlgorithmId::RS256 => "RS256",
            AlgorithmId::RS384 => "RS384",
            AlgorithmId::RS512 => "RS512",
            AlgorithmId::ES256 => "ES256",
            AlgorithmId::ES384 => "ES384",
            AlgorithmId::ES512 => "ES512",
        }
    }

    pub fn family(&self) -> AlgorithmFamily {
        match self {
            AlgorithmId::HS256 | AlgorithmId::HS384 | AlgorithmId::HS512 => AlgorithmFamily::Hmac,
            AlgorithmId::RS256 | AlgorithmId::RS384 | AlgorithmId::RS512 => AlgorithmFamily::Rsa,
            AlgorithmId::ES256 | AlgorithmId::ES384 | AlgorithmId::ES512 => AlgorithmFamily::Ecdsa,
        }
    }

    /// Check if algorithm is HMAC-based (symmetric)
    pub fn is_symmetric(&self) -> bool {
        self.family() == AlgorithmFamily::Hmac
    }
}

impl FromStr for AlgorithmId {
    type Err = UnsupportedAlgorithm;

    /// Exact, case-sensitive match against the supported set
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlgorithmId::ALL
            .into_iter()
            .find(|alg| alg.as_str() == s)
            .ok_or_else(|| UnsupportedAlgorithm(s.chars().take(MAX_ALG_LENGTH).collect()))
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_from_str() {
        for alg in AlgorithmId::ALL {
            assert_eq!(alg.as_str().parse::<AlgorithmId>().unwrap(), alg);
        }

        assert_eq!(
            "none".parse::<AlgorithmId>(),
            Err(UnsupportedAlgorithm("none".to_string()))
        );
        assert!("hs256".parse::<AlgorithmId>().is_err());
        assert!("HS256 ".parse::<AlgorithmId>().is_err());
        assert!("".parse::<AlgorithmId>().is_err());
        assert!("PS256".parse::<AlgorithmId>().is_err());
        assert!("EdDSA".parse::<AlgorithmId>().is_err());
    }

    #[test]
    fn test_unsupported_name_is_truncated() {
        let long = "X".repeat(500);
        let err = long.parse::<AlgorithmId>().unwrap_err();
        assert_eq!(err.0.len(), MAX_ALG_LENGTH);
    }

    #[test]
    fn test_families() {
        assert!(AlgorithmId::HS384.is_symmetric());
        assert!(!AlgorithmId::RS256.is_symmetric());
        assert_eq!(AlgorithmId::ES512.family(), AlgorithmFamily::Ecdsa);
        assert_eq!(AlgorithmId::RS384.family(), AlgorithmFamily::Rsa);
    }

    #[test]
    fn test_serde_uses_header_names() {
        assert_eq!(
            serde_json::to_string(&AlgorithmId::ES384).unwrap(),
            "\"ES384\""
        );
        let alg: AlgorithmId = serde_json::from_str("\"RS512\"").unwrap();
        assert_eq!(alg, AlgorithmId::RS512);
    }
}
