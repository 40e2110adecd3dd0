//! benc - Bencode decoding for BitTorrent metainfo
//!
//! This library decodes the bencode serialization format ([BEP-3]) into an
//! owned document tree and extracts typed torrent metadata from it.
//!
//! # Modules
//!
//! - [`bencode`] - Binary-safe recursive-descent bencode decoder
//! - [`metainfo`] - Torrent metainfo extraction and info hashes
//! - [`constants`] - Decoder limits and metainfo sizes
//!
//! # Example
//!
//! ```
//! use benc::{decode, Value};
//!
//! let docs = decode(b"li123ei-234e5:helloe")?;
//! assert_eq!(docs.len(), 1);
//!
//! let items = docs[0].try_list()?;
//! assert_eq!(items[0], Value::Integer(123));
//! assert_eq!(items[2].try_text()?, "hello");
//! # Ok::<(), benc::BencodeError>(())
//! ```
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

pub mod bencode;
pub mod constants;
pub mod metainfo;

pub use bencode::{decode, decode_with, BencodeError, DecodeOptions, ErrorKind, Value};
pub use metainfo::{File, Info, InfoHash, Metainfo, MetainfoError};
