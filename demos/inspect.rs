//! Load a token against a profile taken from the environment
//!
//! ```text
//! JWT_KEY=secret JWT_ISSUER=app JWT_AUDIENCE=users \
//!     cargo run --example inspect -- <token>
//! ```
//!
//! | Variable       | Meaning                                   | Default  |
//! |----------------|-------------------------------------------|----------|
//! | `JWT_KEY`      | HMAC secret, or path to a PEM/DER key     | `secret` |
//! | `JWT_ALG`      | Expected algorithm                        | `HS256`  |
//! | `JWT_ISSUER`   | Expected `iss`                            | any      |
//! | `JWT_AUDIENCE` | Expected member of `aud`                  | any      |
//! | `JWT_ID`       | Expected `jti`                            | any      |
//! | `JWT_LEEWAY`   | Clock skew in seconds (capped at 300)     | `0`      |
//!
//! Without a token argument a sample token is issued for the profile and
//! loaded, so the demo can be run as-is. Set `RUST_LOG=jwtgate=trace` to see
//! the library's diagnostics.

use std::env;
use std::path::Path;
use std::process::ExitCode;
use std::result::Result;

use jwtgate::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jwtgate=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let algorithm: AlgorithmId = var("JWT_ALG")
        .as_deref()
        .unwrap_or("HS256")
        .parse()
        .map_err(|e: UnsupportedAlgorithm| e.to_string())?;
    let key = load_key(var("JWT_KEY").as_deref().unwrap_or("secret"))?;

    // Unset variables waive the check, which the library logs at WARN
    let mut expected = ExpectedClaims::new(algorithm, key.clone());
    expected = match var("JWT_ISSUER") {
        Some(issuer) => expected.issuer(issuer),
        None => expected.any_issuer(),
    };
    expected = match var("JWT_AUDIENCE") {
        Some(audience) => expected.audience(audience),
        None => expected.any_audience(),
    };
    expected = match var("JWT_ID") {
        Some(id) => expected.token_id(id),
        None => expected.any_token_id(),
    };
    if let Some(leeway) = var("JWT_LEEWAY") {
        let seconds = leeway
            .parse()
            .map_err(|e| format!("JWT_LEEWAY: {e}"))?;
        expected = expected.leeway(seconds);
    }

    let presented = match env::args().nth(1) {
        Some(token) => token,
        None => sample_token(&expected, &key)?,
    };

    let loader = TokenLoader::new(expected);
    match loader.load(&presented) {
        Ok(token) => {
            println!("accepted ({})", token.header().alg().unwrap_or_default());
            print_token(&token);
            Ok(())
        }
        Err(Error::ConstraintViolated(rejected)) => {
            println!("rejected by {} constraint(s):", rejected.violations().len());
            for violation in rejected.violations() {
                println!("  [{}] {violation}", violation.constraint());
            }

            // Show what the token claims even though it was refused
            let options = LoadOptions::new().skip_validation();
            if let Ok(token) = loader.load_with(&presented, options) {
                print_token(&token);
            }
            Err("token rejected".to_string())
        }
        Err(e) => Err(e.to_string()),
    }
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

/// A readable file is key material, anything else a plain-text secret
fn load_key(value: &str) -> Result<SigningKey, String> {
    let path = Path::new(value);
    if !path.is_file() {
        return Ok(SigningKey::plain_text(value));
    }

    let bytes = std::fs::read(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let key = SigningKey::from_bytes(bytes);
    Ok(match var("JWT_KEY_PASSPHRASE") {
        Some(passphrase) => key.with_passphrase(passphrase),
        None => key,
    })
}

fn sample_token(expected: &ExpectedClaims, key: &SigningKey) -> Result<String, String> {
    let now = SystemClock.now();
    let mut builder = TokenBuilder::new()
        .issued_at(now)
        .expires_at(now + 300);
    if let Some(issuer) = expected.expected_issuer() {
        builder = builder.issued_by(issuer);
    }
    if let Some(audience) = expected.expected_audience() {
        builder = builder.permitted_for(audience);
    }
    if let Some(id) = expected.expected_token_id() {
        builder = builder.identified_by(id);
    }

    let token = builder
        .sign(expected.algorithm(), key)
        .map_err(|e| e.to_string())?
        .to_compact();
    println!("issued sample token: {token}");
    Ok(token)
}

fn print_token(token: &Token) {
    println!("header: {}", pretty(token.header()));
    println!("claims: {}", pretty(token.claims()));
}

fn pretty(value: &impl serde::Serialize) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}
