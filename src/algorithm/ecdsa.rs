use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{
    self, EcdsaKeyPair, EcdsaSigningAlgorithm, EcdsaVerificationAlgorithm, KeyPair,
    UnparsedPublicKey,
};

use crate::algorithm::{AlgorithmId, Signer};
use crate::error::SignerError;
use crate::keys::{SigningKey, rejected};

// JOSE ECDSA signatures are the fixed-width R || S concatenation, not ASN.1
macro_rules! ecdsa_signer {
    ($(#[$doc:meta])* $name:ident, $signing:expr, $verification:expr) => {
        $(#[$doc])*
        pub struct $name;

        impl Signer for $name {
            fn algorithm(&self) -> AlgorithmId {
                AlgorithmId::$name
            }

            fn sign(&self, message: &[u8], key: &SigningKey) -> Result<Vec<u8>, SignerError> {
                sign_ecdsa(AlgorithmId::$name, $signing, message, key)
            }

            fn verify(
                &self,
                message: &[u8],
                signature: &[u8],
                key: &SigningKey,
            ) -> Result<(), SignerError> {
                verify_ecdsa(AlgorithmId::$name, $signing, $verification, message, signature, key)
            }
        }
    };
}

ecdsa_signer!(
    /// ES256 algorithm (ECDSA with P-256 and SHA-256)
    ES256,
    &signature::ECDSA_P256_SHA256_FIXED_SIGNING,
    &signature::ECDSA_P256_SHA256_FIXED
);
ecdsa_signer!(
    /// ES384 algorithm (ECDSA with P-384 and SHA-384)
    ES384,
    &signature::ECDSA_P384_SHA384_FIXED_SIGNING,
    &signature::ECDSA_P384_SHA384_FIXED
);
ecdsa_signer!(
    /// ES512 algorithm (ECDSA with P-521 and SHA-512)
    ES512,
    &signature::ECDSA_P521_SHA512_FIXED_SIGNING,
    &signature::ECDSA_P521_SHA512_FIXED
);

fn sign_ecdsa(
    algorithm: AlgorithmId,
    curve: &'static EcdsaSigningAlgorithm,
    message: &[u8],
    key: &SigningKey,
) -> Result<Vec<u8>, SignerError> {
    let der = key.der(algorithm)?;
    let key_pair =
        EcdsaKeyPair::from_pkcs8(curve, &der).map_err(|e| rejected(algorithm, &e.to_string()))?;

    let signature = key_pair
        .sign(&SystemRandom::new(), message)
        .map_err(|_| SignerError::SigningFailed(algorithm))?;

    tracing::trace!(%algorithm, "ecdsa signature created");
    Ok(signature.as_ref().to_vec())
}

/// Verify with SPKI / SEC1 public key, or with the public half of a PKCS#8 key
fn verify_ecdsa(
    algorithm: AlgorithmId,
    curve: &'static EcdsaSigningAlgorithm,
    params: &'static EcdsaVerificationAlgorithm,
    message: &[u8],
    signature: &[u8],
    key: &SigningKey,
) -> Result<(), SignerError> {
    let der = key.der(algorithm)?;

    let result = match EcdsaKeyPair::from_pkcs8(curve, &der) {
        Ok(key_pair) => UnparsedPublicKey::new(params, key_pair.public_key().as_ref())
            .verify(message, signature),
        Err(_) => UnparsedPublicKey::new(params, der.as_slice()).verify(message, signature),
    };

    result.map_err(|_| SignerError::SignatureInvalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_lc_rs::encoding::{AsDer, PublicKeyX509Der};

    fn private_key(curve: &'static EcdsaSigningAlgorithm) -> Vec<u8> {
        EcdsaKeyPair::generate_pkcs8(curve, &SystemRandom::new())
            .unwrap()
            .as_ref()
            .to_vec()
    }

    fn public_point(curve: &'static EcdsaSigningAlgorithm, pkcs8: &[u8]) -> Vec<u8> {
        EcdsaKeyPair::from_pkcs8(curve, pkcs8)
            .unwrap()
            .public_key()
            .as_ref()
            .to_vec()
    }

    #[test]
    fn test_signature_widths() {
        let cases: [(&dyn Signer, &'static EcdsaSigningAlgorithm, usize); 3] = [
            (&ES256, &signature::ECDSA_P256_SHA256_FIXED_SIGNING, 64),
            (&ES384, &signature::ECDSA_P384_SHA384_FIXED_SIGNING, 96),
            (&ES512, &signature::ECDSA_P521_SHA512_FIXED_SIGNING, 132),
        ];

        for (signer, curve, width) in cases {
            let pkcs8 = private_key(curve);
            let signature = signer
                .sign(b"header.claims", &SigningKey::from_bytes(pkcs8.clone()))
                .unwrap();
            assert_eq!(signature.len(), width, "{}", signer.algorithm());

            let public = SigningKey::from_bytes(public_point(curve, &pkcs8));
            assert!(signer.verify(b"header.claims", &signature, &public).is_ok());
        }
    }

    #[test]
    fn test_verify_with_spki() {
        let curve = &signature::ECDSA_P256_SHA256_FIXED_SIGNING;
        let pkcs8 = private_key(curve);
        let key_pair = EcdsaKeyPair::from_pkcs8(curve, &pkcs8).unwrap();
        let spki = AsDer::<PublicKeyX509Der>::as_der(key_pair.public_key())
            .unwrap()
            .as_ref()
            .to_vec();

        let signature = ES256.sign(b"m", &SigningKey::from_bytes(pkcs8)).unwrap();
        assert!(ES256.verify(b"m", &signature, &SigningKey::from_bytes(spki)).is_ok());
    }

    #[test]
    fn test_curve_mismatch_rejected() {
        let pkcs8 = private_key(&signature::ECDSA_P256_SHA256_FIXED_SIGNING);
        assert!(matches!(
            ES384.sign(b"m", &SigningKey::from_bytes(pkcs8)),
            Err(SignerError::KeyRejected {
                algorithm: AlgorithmId::ES384,
                ..
            })
        ));
    }

    #[test]
    fn test_wrong_key() {
        let curve = &signature::ECDSA_P256_SHA256_FIXED_SIGNING;
        let signer_key = SigningKey::from_bytes(private_key(curve));
        let other_key = SigningKey::from_bytes(private_key(curve));

        let signature = ES256.sign(b"m", &signer_key).unwrap();
        assert_eq!(
            ES256.verify(b"m", &signature, &other_key),
            Err(SignerError::SignatureInvalid)
        );
    }
}
