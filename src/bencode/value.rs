use bytes::Bytes;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use super::error::BencodeError;

/// A decoded bencode document.
///
/// Bencode has four data types: integers, byte strings, lists, and
/// dictionaries. A `Value` owns its whole subtree; there is no sharing between
/// documents and nothing is mutated after decoding.
///
/// Two families of accessors are provided. The `as_*` methods return `None`
/// on a variant mismatch, which suits optional lookups. The `try_*` methods
/// return [`BencodeError::InvalidCast`] instead, which suits required fields.
///
/// # Examples
///
/// ```
/// use benc::bencode::Value;
///
/// let int: Value = 42i64.into();
/// let string: Value = "hello".into();
///
/// assert_eq!(int.as_integer(), Some(42));
/// assert_eq!(string.as_str(), Some("hello"));
/// assert!(string.try_integer().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A signed 64-bit integer.
    Integer(i64),
    /// A byte string (may or may not be valid UTF-8).
    Bytes(Bytes),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A dictionary keyed by the raw bytes of each key string.
    Dict(BTreeMap<Bytes, Value>),
}

impl Value {
    /// Creates a byte string value from a UTF-8 string.
    pub fn string(s: &str) -> Self {
        Value::Bytes(Bytes::copy_from_slice(s.as_bytes()))
    }

    /// Names the variant, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Bytes(_) => "byte string",
            Value::List(_) => "list",
            Value::Dict(_) => "dictionary",
        }
    }

    /// Returns the value as an integer, if it is one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a byte string, if it is one.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the value as a UTF-8 string, if it is a valid UTF-8 byte string.
    ///
    /// # Examples
    ///
    /// ```
    /// use benc::bencode::Value;
    ///
    /// assert_eq!(Value::string("hello").as_str(), Some("hello"));
    /// assert_eq!(Value::Integer(42).as_str(), None);
    /// ```
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Bytes(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    /// Returns the value as a list, if it is one.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// Returns the value as a dictionary reference, if it is one.
    pub fn as_dict(&self) -> Option<&BTreeMap<Bytes, Value>> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Consumes the value and returns the dictionary, if it is one.
    pub fn into_dict(self) -> Option<BTreeMap<Bytes, Value>> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Looks up a key in this value if it is a dictionary.
    ///
    /// # Examples
    ///
    /// ```
    /// use benc::bencode::decode_single;
    ///
    /// let value = decode_single(b"d3:foo3:bare").unwrap();
    /// assert_eq!(value.get(b"foo").and_then(|v| v.as_str()), Some("bar"));
    /// assert_eq!(value.get(b"missing"), None);
    /// ```
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.as_dict()?.get(key)
    }

    pub fn try_integer(&self) -> Result<i64, BencodeError> {
        self.as_integer().ok_or_else(|| self.cast_error("integer"))
    }

    pub fn try_bytes(&self) -> Result<&Bytes, BencodeError> {
        self.as_bytes().ok_or_else(|| self.cast_error("byte string"))
    }

    /// Returns the text view of a byte string.
    ///
    /// Invalid UTF-8 sequences are replaced with U+FFFD; use
    /// [`try_bytes`](Self::try_bytes) when the exact bytes matter.
    pub fn try_text(&self) -> Result<Cow<'_, str>, BencodeError> {
        self.try_bytes().map(|b| String::from_utf8_lossy(b))
    }

    pub fn try_list(&self) -> Result<&[Value], BencodeError> {
        self.as_list().ok_or_else(|| self.cast_error("list"))
    }

    pub fn try_dict(&self) -> Result<&BTreeMap<Bytes, Value>, BencodeError> {
        self.as_dict().ok_or_else(|| self.cast_error("dictionary"))
    }

    fn cast_error(&self, expected: &'static str) -> BencodeError {
        BencodeError::InvalidCast {
            expected,
            found: self.kind_name(),
        }
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Bytes(b) => match std::str::from_utf8(b) {
                Ok(s) => write!(f, "{:?}", s),
                Err(_) => write!(f, "<{} bytes>", b.len()),
            },
            Value::List(items) if items.is_empty() => f.write_str("[]"),
            Value::List(items) => {
                f.write_str("[\n")?;
                for item in items {
                    write!(f, "{:width$}", "", width = indent + 2)?;
                    item.fmt_indented(f, indent + 2)?;
                    f.write_str(",\n")?;
                }
                write!(f, "{:width$}]", "", width = indent)
            }
            Value::Dict(entries) if entries.is_empty() => f.write_str("{}"),
            Value::Dict(entries) => {
                f.write_str("{\n")?;
                for (key, value) in entries {
                    write!(
                        f,
                        "{:width$}{:?} => ",
                        "",
                        String::from_utf8_lossy(key),
                        width = indent + 2
                    )?;
                    value.fmt_indented(f, indent + 2)?;
                    f.write_str(",\n")?;
                }
                write!(f, "{:width$}}}", "", width = indent)
            }
        }
    }
}

/// Renders the document as an indented tree.
///
/// Byte strings that are not valid UTF-8 print as their length only.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(Bytes::copy_from_slice(b))
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(l: Vec<Value>) -> Self {
        Value::List(l)
    }
}

impl From<BTreeMap<Bytes, Value>> for Value {
    fn from(d: BTreeMap<Bytes, Value>) -> Self {
        Value::Dict(d)
    }
}
