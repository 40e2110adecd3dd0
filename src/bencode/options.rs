use crate::constants::DEFAULT_MAX_DEPTH;

/// Limits and policies applied while decoding.
///
/// The defaults accept anything the grammar accepts, up to
/// [`DEFAULT_MAX_DEPTH`] levels of nesting.
///
/// # Examples
///
/// ```
/// use benc::bencode::{decode_with, DecodeOptions};
///
/// let options = DecodeOptions::default()
///     .with_max_depth(2)
///     .with_max_input_len(1024);
///
/// assert!(decode_with(b"lli1eee", &options).is_ok());
/// assert!(decode_with(b"llli1eeee", &options).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Deepest list/dictionary nesting accepted.
    pub max_depth: usize,
    /// Largest input accepted, in bytes. `None` means unlimited.
    pub max_input_len: Option<usize>,
    /// Fail on a repeated dictionary key instead of keeping the last value.
    pub reject_duplicate_keys: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_input_len: None,
            reject_duplicate_keys: false,
        }
    }
}

impl DecodeOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_input_len(mut self, max_input_len: usize) -> Self {
        self.max_input_len = Some(max_input_len);
        self
    }

    pub fn with_reject_duplicate_keys(mut self, reject: bool) -> Self {
        self.reject_duplicate_keys = reject;
        self
    }
}
