use thiserror::Error;

use crate::bencode::BencodeError;

/// Errors that can occur when extracting torrent metainfo.
///
/// Malformed bencode is reported as [`MetainfoError::Bencode`]; every other
/// variant means the document decoded fine but does not describe a torrent.
#[derive(Debug, Error)]
pub enum MetainfoError {
    /// The torrent file contains invalid bencode.
    #[error("bencode error: {0}")]
    Bencode(#[from] BencodeError),

    /// The input decoded to zero documents.
    #[error("torrent file is empty")]
    EmptyDocument,

    /// A required field is missing from the torrent file.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// A field holds a different bencode type than expected.
    #[error("field {field} has the wrong type")]
    WrongType {
        field: &'static str,
        source: BencodeError,
    },

    /// A field has the right type but an unusable value.
    #[error("invalid field: {0}")]
    InvalidField(&'static str),

    /// The info hash has an invalid length or encoding.
    #[error("invalid info hash")]
    InvalidInfoHash,

    /// An I/O error occurred while reading the torrent file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
