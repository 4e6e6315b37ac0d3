use crate::algorithm::{AlgorithmId, ecdsa, hmac, rsa};
use crate::error::{SignerError, UnsupportedAlgorithm};
use crate::keys::SigningKey;

/// Signing and verification primitive for one algorithm
///
/// Implemented by unit structs in the `hmac`, `rsa` and `ecdsa` modules.
/// Implementations hold no state, so one `'static` instance per algorithm
/// serves every caller.
pub trait Signer: Send + Sync {
    /// The algorithm this signer implements
    fn algorithm(&self) -> AlgorithmId;

    /// Sign `message` (the token signing input)
    ///
    /// Asymmetric algorithms require a private key.
    fn sign(&self, message: &[u8], key: &SigningKey) -> Result<Vec<u8>, SignerError>;

    /// Verify raw `signature` bytes over `message`
    ///
    /// Asymmetric algorithms accept a public key or the private key it
    /// belongs to.
    fn verify(&self, message: &[u8], signature: &[u8], key: &SigningKey)
    -> Result<(), SignerError>;
}

/// Static dispatch table from algorithm to signer
pub fn signer_for(algorithm: AlgorithmId) -> &'static dyn Signer {
    match algorithm {
        AlgorithmId::HS256 => &hmac::HS256,
        AlgorithmId::HS384 => &hmac::HS384,
        AlgorithmId::HS512 => &hmac::HS512,
        AlgorithmId::RS256 => &rsa::RS256,
        AlgorithmId::RS384 => &rsa::RS384,
        AlgorithmId::RS512 => &rsa::RS512,
        AlgorithmId::ES256 => &ecdsa::ES256,
        AlgorithmId::ES384 => &ecdsa::ES384,
        AlgorithmId::ES512 => &ecdsa::ES512,
    }
}

/// Look up the signer for an algorithm name
pub fn resolve(name: &str) -> Result<&'static dyn Signer, UnsupportedAlgorithm> {
    let algorithm: AlgorithmId = name.parse()?;
    tracing::trace!(%algorithm, "resolved signer");
    Ok(signer_for(algorithm))
}

/// Sign `message` with `algorithm`
pub fn sign(
    algorithm: AlgorithmId,
    key: &SigningKey,
    message: &[u8],
) -> Result<Vec<u8>, SignerError> {
    signer_for(algorithm).sign(message, key)
}

/// Check `signature` over `message`; every failure is `false`
pub fn verify(algorithm: AlgorithmId, key: &SigningKey, message: &[u8], signature: &[u8]) -> bool {
    signer_for(algorithm)
        .verify(message, signature, key)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_every_algorithm() {
        for alg in AlgorithmId::ALL {
            assert_eq!(signer_for(alg).algorithm(), alg);
        }
    }

    #[test]
    fn test_resolve_rejects_unknown_names() {
        assert!(resolve("HS256").is_ok());
        for name in ["none", "None", "HS1", "RSA", "ES256K", "PS512", ""] {
            assert!(matches!(resolve(name), Err(UnsupportedAlgorithm(_))));
        }
    }

    #[test]
    fn test_sign_then_verify_hmac() {
        let key = SigningKey::plain_text("secret");
        let signature = sign(AlgorithmId::HS384, &key, b"a.b").unwrap();

        assert!(verify(AlgorithmId::HS384, &key, b"a.b", &signature));
        assert!(!verify(AlgorithmId::HS384, &key, b"a.c", &signature));
        assert!(!verify(AlgorithmId::HS256, &key, b"a.b", &signature));
    }
}
