//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::sync::OnceLock;

use aws_lc_rs::encoding::{AsDer, Pkcs8V1Der, PublicKeyX509Der};
use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::rsa::KeySize;
use aws_lc_rs::signature::{
    ECDSA_P256_SHA256_FIXED_SIGNING, ECDSA_P384_SHA384_FIXED_SIGNING,
    ECDSA_P521_SHA512_FIXED_SIGNING, EcdsaKeyPair, EcdsaSigningAlgorithm, KeyPair, RsaKeyPair,
};
use jwtgate::utils::base64url;
use jwtgate::{AlgorithmFamily, AlgorithmId, SigningKey};
use pkcs8::PrivateKeyInfo;
use pkcs8::pkcs5::pbes2;

pub const NOW: i64 = 1_700_000_000;
pub const SECRET: &str = "secret";
pub const PASSPHRASE: &str = "correct horse battery staple";

/// PKCS#8 DER of a 2048-bit RSA key, generated once per test binary
pub fn rsa_private_der() -> &'static [u8] {
    static KEY: OnceLock<Vec<u8>> = OnceLock::new();
    KEY.get_or_init(|| {
        let key_pair = RsaKeyPair::generate(KeySize::Rsa2048).unwrap();
        AsDer::<Pkcs8V1Der>::as_der(&key_pair)
            .unwrap()
            .as_ref()
            .to_vec()
    })
}

/// SPKI DER of the RSA fixture key
pub fn rsa_public_der() -> Vec<u8> {
    let key_pair = RsaKeyPair::from_pkcs8(rsa_private_der()).unwrap();
    AsDer::<PublicKeyX509Der>::as_der(key_pair.public_key())
        .unwrap()
        .as_ref()
        .to_vec()
}

/// PKCS#1 `RSAPublicKey` DER of the RSA fixture key
pub fn rsa_public_pkcs1() -> Vec<u8> {
    let key_pair = RsaKeyPair::from_pkcs8(rsa_private_der()).unwrap();
    key_pair.public_key().as_ref().to_vec()
}

fn curve(algorithm: AlgorithmId) -> &'static EcdsaSigningAlgorithm {
    match algorithm {
        AlgorithmId::ES256 => &ECDSA_P256_SHA256_FIXED_SIGNING,
        AlgorithmId::ES384 => &ECDSA_P384_SHA384_FIXED_SIGNING,
        AlgorithmId::ES512 => &ECDSA_P521_SHA512_FIXED_SIGNING,
        other => panic!("{other} is not an ECDSA algorithm"),
    }
}

/// Fresh PKCS#8 DER for the curve of an ECDSA algorithm
pub fn ec_private_der(algorithm: AlgorithmId) -> Vec<u8> {
    EcdsaKeyPair::generate_pkcs8(curve(algorithm), &SystemRandom::new())
        .unwrap()
        .as_ref()
        .to_vec()
}

/// SPKI DER for an ECDSA PKCS#8 key
pub fn ec_public_der(algorithm: AlgorithmId, private_der: &[u8]) -> Vec<u8> {
    let key_pair = EcdsaKeyPair::from_pkcs8(curve(algorithm), private_der).unwrap();
    AsDer::<PublicKeyX509Der>::as_der(key_pair.public_key())
        .unwrap()
        .as_ref()
        .to_vec()
}

/// (signing key, verification key) for any algorithm
pub fn key_pair(algorithm: AlgorithmId) -> (SigningKey, SigningKey) {
    match algorithm.family() {
        AlgorithmFamily::Hmac => (
            SigningKey::plain_text(SECRET),
            SigningKey::plain_text(SECRET),
        ),
        AlgorithmFamily::Rsa => (
            SigningKey::from_bytes(rsa_private_der()),
            SigningKey::from_bytes(rsa_public_der()),
        ),
        AlgorithmFamily::Ecdsa => {
            let private = ec_private_der(algorithm);
            let public = ec_public_der(algorithm, &private);
            (SigningKey::from_bytes(private), SigningKey::from_bytes(public))
        }
    }
}

/// Encrypt a PKCS#8 document with PBES2 (PBKDF2-SHA256, AES-256-CBC)
pub fn encrypt_pkcs8(private_der: &[u8], passphrase: &str) -> Vec<u8> {
    let info = PrivateKeyInfo::try_from(private_der).unwrap();
    let params =
        pbes2::Parameters::pbkdf2_sha256_aes256cbc(2048, b"jwtgate-fixture!", b"0123456789abcdef")
            .unwrap();
    info.encrypt_with_params(params, passphrase)
        .unwrap()
        .as_bytes()
        .to_vec()
}

/// Assemble a token from raw JSON texts and a raw signature
pub fn forge(header: &str, claims: &str, signature: &[u8]) -> String {
    format!(
        "{}.{}.{}",
        base64url::encode(header),
        base64url::encode(claims),
        base64url::encode(signature)
    )
}
