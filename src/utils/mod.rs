//! Encoding helpers

pub mod base64url;
