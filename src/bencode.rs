//! Bencode decoding ([BEP-3]).
//!
//! Bencode is the serialization format used throughout BitTorrent for storing
//! structured data such as `.torrent` files.
//!
//! # Data Types
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Integer | `i<number>e` | `i42e` → 42 |
//! | Byte String | `<length>:<data>` | `4:spam` → "spam" |
//! | List | `l<items>e` | `l4:spami42ee` → ["spam", 42] |
//! | Dictionary | `d<key><value>...e` | `d3:foo3:bare` → {"foo": "bar"} |
//!
//! Byte strings are binary-safe: their payload is kept verbatim and only
//! interpreted as text on request.
//!
//! # Examples
//!
//! ```
//! use benc::bencode::{decode, Value};
//!
//! // A single input may hold several concatenated documents
//! let docs = decode(b"i42e4:spam").unwrap();
//! assert_eq!(docs.len(), 2);
//! assert_eq!(docs[0].as_integer(), Some(42));
//! assert_eq!(docs[1].as_str(), Some("spam"));
//!
//! let docs = decode(b"d3:fool1:a1:bee").unwrap();
//! let foo = docs[0].get(b"foo").unwrap();
//! assert_eq!(foo.as_list().map(|l| l.len()), Some(2));
//! ```
//!
//! # Error Handling
//!
//! Decoding is all-or-nothing. The first problem aborts the call with a
//! [`BencodeError`] naming the offset:
//!
//! - [`BencodeError::UnexpectedEnd`] - Input ended inside a value
//! - [`BencodeError::UnexpectedToken`] - A value started with an unknown byte
//! - [`BencodeError::MissingDigits`] - A number had no digits
//! - [`BencodeError::NumberOverflow`] - A number exceeded the 64-bit range
//! - [`BencodeError::MissingSeparator`] - The `:` or `e` terminator was absent
//! - [`BencodeError::TruncatedString`] - A byte string ran past the input
//! - [`BencodeError::TrailingData`] - Extra bytes followed the last value
//! - [`BencodeError::NestingTooDeep`] - Depth limit exceeded (see [`DecodeOptions`])
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod cursor;
mod decode;
mod error;
mod options;
mod value;

pub use decode::{decode, decode_file, decode_reader, decode_single, decode_with, raw_dict_entry};
pub use error::{BencodeError, ErrorKind};
pub use options::DecodeOptions;
pub use value::Value;
