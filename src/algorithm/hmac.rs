use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

use crate::algorithm::{AlgorithmId, Signer};
use crate::error::SignerError;
use crate::keys::SigningKey;

macro_rules! hmac_signer {
    ($(#[$doc:meta])* $name:ident, $digest:ty) => {
        $(#[$doc])*
        pub struct $name;

        impl Signer for $name {
            fn algorithm(&self) -> AlgorithmId {
                AlgorithmId::$name
            }

            fn sign(&self, message: &[u8], key: &SigningKey) -> Result<Vec<u8>, SignerError> {
                let secret = key.secret(AlgorithmId::$name)?;
                let mut mac = Hmac::<$digest>::new_from_slice(secret)
                    .map_err(|_| SignerError::SigningFailed(AlgorithmId::$name))?;
                mac.update(message);
                Ok(mac.finalize().into_bytes().to_vec())
            }

            fn verify(
                &self,
                message: &[u8],
                signature: &[u8],
                key: &SigningKey,
            ) -> Result<(), SignerError> {
                let expected = self.sign(message, key)?;
                compare(&expected, signature)
            }
        }
    };
}

hmac_signer!(
    /// HS256 algorithm (HMAC with SHA-256)
    HS256,
    Sha256
);
hmac_signer!(
    /// HS384 algorithm (HMAC with SHA-384)
    HS384,
    Sha384
);
hmac_signer!(
    /// HS512 algorithm (HMAC with SHA-512)
    HS512,
    Sha512
);

/// Constant-time comparison; length is not secret
fn compare(expected: &[u8], provided: &[u8]) -> Result<(), SignerError> {
    if provided.len() != expected.len() {
        return Err(SignerError::SignatureInvalid);
    }

    if constant_time_eq(provided, expected) {
        Ok(())
    } else {
        Err(SignerError::SignatureInvalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::base64url;

    const SIGNING_INPUT: &[u8] = b"eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiIxMjM0NTY3ODkwIiwibmFtZSI6IkpvaG4gRG9lIiwiaWF0IjoxNTE2MjM5MDIyfQ";

    #[test]
    fn test_hs256_known_vector() {
        // jwt.io default token
        let key = SigningKey::plain_text("your-256-bit-secret");
        let signature = HS256.sign(SIGNING_INPUT, &key).unwrap();
        assert_eq!(
            base64url::encode(&signature),
            "SflKxwRJSMeKKF2QT4fwpMeJf36POk6yJV_adQssw5c"
        );
        assert!(HS256.verify(SIGNING_INPUT, &signature, &key).is_ok());
    }

    #[test]
    fn test_signature_lengths() {
        let key = SigningKey::plain_text("secret");
        assert_eq!(HS256.sign(b"m", &key).unwrap().len(), 32);
        assert_eq!(HS384.sign(b"m", &key).unwrap().len(), 48);
        assert_eq!(HS512.sign(b"m", &key).unwrap().len(), 64);
    }

    #[test]
    fn test_wrong_secret() {
        let signature = HS256
            .sign(SIGNING_INPUT, &SigningKey::plain_text("your-256-bit-secret"))
            .unwrap();
        let result = HS256.verify(SIGNING_INPUT, &signature, &SigningKey::plain_text("wrong"));
        assert_eq!(result, Err(SignerError::SignatureInvalid));
    }

    #[test]
    fn test_truncated_signature() {
        let key = SigningKey::plain_text("secret");
        let signature = HS512.sign(b"m", &key).unwrap();
        assert_eq!(
            HS512.verify(b"m", &signature[..32], &key),
            Err(SignerError::SignatureInvalid)
        );
        assert_eq!(
            HS512.verify(b"m", &[], &key),
            Err(SignerError::SignatureInvalid)
        );
    }

    #[test]
    fn test_cross_variant_signature_fails() {
        let key = SigningKey::plain_text("secret");
        let signature = HS384.sign(b"m", &key).unwrap();
        assert!(HS256.verify(b"m", &signature, &key).is_err());
        assert!(HS512.verify(b"m", &signature, &key).is_err());
    }

    #[test]
    fn test_empty_secret_rejected() {
        let key = SigningKey::from_bytes(Vec::new());
        assert!(matches!(
            HS256.sign(b"m", &key),
            Err(SignerError::KeyRejected { .. })
        ));
    }
}
