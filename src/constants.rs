//! Decoder limits and metainfo sizes.
//!
//! Values here are defaults; anything tunable at runtime is exposed through
//! [`DecodeOptions`](crate::bencode::DecodeOptions).

// ============================================================================
// Decoder limits
// ============================================================================

/// Default maximum nesting depth for lists and dictionaries.
///
/// Atoms (integers and byte strings) sit at the depth of their container, so
/// `le` has depth 1 and `llee` has depth 2.
pub const DEFAULT_MAX_DEPTH: usize = 64;

// ============================================================================
// Metainfo
// ============================================================================

/// Length of one SHA1 piece hash in the `pieces` field.
pub const PIECE_HASH_LEN: usize = 20;

/// Length of a SHA1 info hash.
pub const INFO_HASH_LEN: usize = 20;
