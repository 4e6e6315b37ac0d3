//! Size limit constants for input validation

/// Maximum length for a compact token string (64KB)
pub(crate) const MAX_TOKEN_LENGTH: usize = 64 * 1024;

// ============================================================================
// Decoded segment size limits
// ============================================================================

/// Maximum size for decoded header JSON (8KB)
pub(crate) const MAX_HEADER_SIZE: usize = 8 * 1024;

/// Maximum size for decoded claims JSON (32KB)
pub(crate) const MAX_CLAIMS_SIZE: usize = 32 * 1024;

/// Maximum size for decoded signature bytes (1KB)
/// RSA-8192 signatures are 1024 bytes, ES512 signatures 132
pub(crate) const MAX_SIGNATURE_SIZE: usize = 1024;

// ============================================================================
// Field bounds
// ============================================================================

/// Maximum length of an algorithm name echoed back in errors
pub(crate) const MAX_ALG_LENGTH: usize = 16;

/// Maximum leeway applied to time claims (5 minutes)
pub(crate) const MAX_LEEWAY_SECONDS: u64 = 300;
