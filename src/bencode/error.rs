use thiserror::Error;

/// Errors raised while decoding bencode or projecting a decoded [`Value`].
///
/// Every parse-time variant carries the byte offset at which the problem was
/// detected. Decoding aborts on the first error; no partial output is ever
/// returned alongside one.
///
/// [`Value`]: super::Value
#[derive(Debug, Error)]
pub enum BencodeError {
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEnd { offset: usize },

    #[error("unexpected token {found:?} at offset {offset}")]
    UnexpectedToken { found: char, offset: usize },

    #[error("expected at least one digit at offset {offset}")]
    MissingDigits { offset: usize },

    #[error("number at offset {offset} does not fit in a 64-bit signed integer")]
    NumberOverflow { offset: usize },

    #[error("non-canonical integer at offset {offset}: {reason}")]
    NonCanonicalInteger { offset: usize, reason: &'static str },

    #[error("expected {expected:?} at offset {offset}, found {found:?}")]
    MissingSeparator {
        expected: char,
        found: char,
        offset: usize,
    },

    #[error("byte string at offset {offset} declares {declared} bytes but only {remaining} remain")]
    TruncatedString {
        declared: u64,
        remaining: usize,
        offset: usize,
    },

    #[error("{remaining} trailing bytes after value ending at offset {offset}")]
    TrailingData {
        offset: usize,
        remaining: usize,
        #[source]
        cause: Option<Box<BencodeError>>,
    },

    #[error("nesting deeper than {max_depth} levels at offset {offset}")]
    NestingTooDeep { max_depth: usize, offset: usize },

    #[error("duplicate dictionary key {key:?} at offset {offset}")]
    DuplicateKey { key: String, offset: usize },

    #[error("input exceeds the {limit} byte limit")]
    InputTooLarge { limit: usize },

    #[error("invalid cast: expected {expected}, found {found}")]
    InvalidCast {
        expected: &'static str,
        found: &'static str,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// The kind of a [`BencodeError`], without its diagnostic payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnexpectedEnd,
    UnexpectedToken,
    MissingDigits,
    NumberOverflow,
    NonCanonicalInteger,
    MissingSeparator,
    TruncatedString,
    TrailingData,
    NestingTooDeep,
    DuplicateKey,
    InputTooLarge,
    InvalidCast,
    Io,
}

impl BencodeError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BencodeError::UnexpectedEnd { .. } => ErrorKind::UnexpectedEnd,
            BencodeError::UnexpectedToken { .. } => ErrorKind::UnexpectedToken,
            BencodeError::MissingDigits { .. } => ErrorKind::MissingDigits,
            BencodeError::NumberOverflow { .. } => ErrorKind::NumberOverflow,
            BencodeError::NonCanonicalInteger { .. } => ErrorKind::NonCanonicalInteger,
            BencodeError::MissingSeparator { .. } => ErrorKind::MissingSeparator,
            BencodeError::TruncatedString { .. } => ErrorKind::TruncatedString,
            BencodeError::TrailingData { .. } => ErrorKind::TrailingData,
            BencodeError::NestingTooDeep { .. } => ErrorKind::NestingTooDeep,
            BencodeError::DuplicateKey { .. } => ErrorKind::DuplicateKey,
            BencodeError::InputTooLarge { .. } => ErrorKind::InputTooLarge,
            BencodeError::InvalidCast { .. } => ErrorKind::InvalidCast,
            BencodeError::Io(_) => ErrorKind::Io,
        }
    }

    /// Returns the input offset the error refers to, for parse-time errors.
    pub fn offset(&self) -> Option<usize> {
        match self {
            BencodeError::UnexpectedEnd { offset }
            | BencodeError::UnexpectedToken { offset, .. }
            | BencodeError::MissingDigits { offset }
            | BencodeError::NumberOverflow { offset }
            | BencodeError::NonCanonicalInteger { offset, .. }
            | BencodeError::MissingSeparator { offset, .. }
            | BencodeError::TruncatedString { offset, .. }
            | BencodeError::TrailingData { offset, .. }
            | BencodeError::NestingTooDeep { offset, .. }
            | BencodeError::DuplicateKey { offset, .. } => Some(*offset),
            BencodeError::InputTooLarge { .. }
            | BencodeError::InvalidCast { .. }
            | BencodeError::Io(_) => None,
        }
    }
}
