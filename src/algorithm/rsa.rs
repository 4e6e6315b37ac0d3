use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{
    self, KeyPair, RsaEncoding, RsaKeyPair, RsaParameters, UnparsedPublicKey,
};

use crate::algorithm::{AlgorithmId, Signer};
use crate::error::SignerError;
use crate::keys::{SigningKey, rejected};

macro_rules! rsa_signer {
    ($(#[$doc:meta])* $name:ident, $padding:expr, $params:expr) => {
        $(#[$doc])*
        pub struct $name;

        impl Signer for $name {
            fn algorithm(&self) -> AlgorithmId {
                AlgorithmId::$name
            }

            fn sign(&self, message: &[u8], key: &SigningKey) -> Result<Vec<u8>, SignerError> {
                sign_rsa(AlgorithmId::$name, $padding, message, key)
            }

            fn verify(
                &self,
                message: &[u8],
                signature: &[u8],
                key: &SigningKey,
            ) -> Result<(), SignerError> {
                verify_rsa(AlgorithmId::$name, $params, message, signature, key)
            }
        }
    };
}

rsa_signer!(
    /// RS256 algorithm (RSASSA-PKCS1-v1_5 with SHA-256)
    RS256,
    &signature::RSA_PKCS1_SHA256,
    &signature::RSA_PKCS1_2048_8192_SHA256
);
rsa_signer!(
    /// RS384 algorithm (RSASSA-PKCS1-v1_5 with SHA-384)
    RS384,
    &signature::RSA_PKCS1_SHA384,
    &signature::RSA_PKCS1_2048_8192_SHA384
);
rsa_signer!(
    /// RS512 algorithm (RSASSA-PKCS1-v1_5 with SHA-512)
    RS512,
    &signature::RSA_PKCS1_SHA512,
    &signature::RSA_PKCS1_2048_8192_SHA512
);

/// Parse a private key: PKCS#8 first, then PKCS#1 `RSAPrivateKey`
fn key_pair(algorithm: AlgorithmId, der: &[u8]) -> Result<RsaKeyPair, SignerError> {
    RsaKeyPair::from_pkcs8(der)
        .or_else(|_| RsaKeyPair::from_der(der))
        .map_err(|e| rejected(algorithm, &e.to_string()))
}

fn sign_rsa(
    algorithm: AlgorithmId,
    padding: &'static dyn RsaEncoding,
    message: &[u8],
    key: &SigningKey,
) -> Result<Vec<u8>, SignerError> {
    let der = key.der(algorithm)?;
    let key_pair = key_pair(algorithm, &der)?;

    let mut signature = vec![0; key_pair.public_modulus_len()];
    key_pair
        .sign(padding, &SystemRandom::new(), message, &mut signature)
        .map_err(|_| SignerError::SigningFailed(algorithm))?;

    tracing::trace!(%algorithm, bits = key_pair.public_modulus_len() * 8, "rsa signature created");
    Ok(signature)
}

/// Verify with a public key, or with the public half of a private key
fn verify_rsa(
    algorithm: AlgorithmId,
    params: &'static RsaParameters,
    message: &[u8],
    signature: &[u8],
    key: &SigningKey,
) -> Result<(), SignerError> {
    let der = key.der(algorithm)?;

    let result = match key_pair(algorithm, &der) {
        Ok(key_pair) => UnparsedPublicKey::new(params, key_pair.public_key().as_ref())
            .verify(message, signature),
        Err(_) => UnparsedPublicKey::new(params, der.as_slice()).verify(message, signature),
    };

    result.map_err(|_| SignerError::SignatureInvalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_lc_rs::encoding::{AsDer, Pkcs8V1Der, PublicKeyX509Der};
    use aws_lc_rs::rsa::KeySize;
    use std::sync::OnceLock;

    fn private_key() -> &'static [u8] {
        static KEY: OnceLock<Vec<u8>> = OnceLock::new();
        KEY.get_or_init(|| {
            let key_pair = RsaKeyPair::generate(KeySize::Rsa2048).unwrap();
            AsDer::<Pkcs8V1Der>::as_der(&key_pair)
                .unwrap()
                .as_ref()
                .to_vec()
        })
    }

    fn public_key_spki() -> Vec<u8> {
        let key_pair = RsaKeyPair::from_pkcs8(private_key()).unwrap();
        AsDer::<PublicKeyX509Der>::as_der(key_pair.public_key())
            .unwrap()
            .as_ref()
            .to_vec()
    }

    #[test]
    fn test_rs256_sign_and_verify_with_spki() {
        let private = SigningKey::from_bytes(private_key());
        let public = SigningKey::from_bytes(public_key_spki());

        let signature = RS256.sign(b"header.claims", &private).unwrap();
        assert_eq!(signature.len(), 256);
        assert!(RS256.verify(b"header.claims", &signature, &public).is_ok());
    }

    #[test]
    fn test_verify_with_private_key() {
        let private = SigningKey::from_bytes(private_key());
        let signature = RS512.sign(b"m", &private).unwrap();
        assert!(RS512.verify(b"m", &signature, &private).is_ok());
    }

    #[test]
    fn test_hash_variant_mismatch() {
        let private = SigningKey::from_bytes(private_key());
        let signature = RS384.sign(b"m", &private).unwrap();
        assert_eq!(
            RS256.verify(b"m", &signature, &private),
            Err(SignerError::SignatureInvalid)
        );
    }

    #[test]
    fn test_tampered_message() {
        let private = SigningKey::from_bytes(private_key());
        let signature = RS256.sign(b"header.claims", &private).unwrap();
        assert_eq!(
            RS256.verify(b"header.claimz", &signature, &private),
            Err(SignerError::SignatureInvalid)
        );
    }

    #[test]
    fn test_hmac_secret_cannot_sign() {
        let secret = SigningKey::plain_text("secret");
        assert!(matches!(
            RS256.sign(b"m", &secret),
            Err(SignerError::KeyRejected {
                algorithm: AlgorithmId::RS256,
                ..
            })
        ));
    }
}
