//! Centralized default constants for the triage system.
//!
//! **This module is the single source of truth** for shared limit and
//! default values. All crates should reference these constants instead of
//! defining their own magic numbers.

// =============================================================================
// SCHEMA BOUNDS
// =============================================================================

/// Minimum subject length in characters.
pub const SUBJECT_MIN_LEN: usize = 1;

/// Maximum subject length in characters.
pub const SUBJECT_MAX_LEN: usize = 200;

/// Minimum description length in characters.
pub const DESCRIPTION_MIN_LEN: usize = 10;

/// Maximum description length in characters.
pub const DESCRIPTION_MAX_LEN: usize = 2000;

// =============================================================================
// CLASSIFIER
// =============================================================================

/// Combined hit count that saturates classification confidence at 1.0.
pub const CONFIDENCE_SATURATION_HITS: f64 = 4.0;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 3000;

/// Maximum request body size in bytes (2 MB; bulk imports ride the body).
pub const MAX_BODY_SIZE_BYTES: usize = 2 * 1024 * 1024;

/// Default CORS max-age in seconds (1 hour).
pub const CORS_MAX_AGE_SECS: u64 = 3600;
