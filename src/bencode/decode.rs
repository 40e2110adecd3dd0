use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use bytes::Bytes;

use super::cursor::Cursor;
use super::error::{BencodeError, ErrorKind};
use super::options::DecodeOptions;
use super::value::Value;

/// Decodes every top-level document in `data` with default options.
///
/// Documents may be concatenated with no separator. An empty input yields
/// an empty sequence.
///
/// # Errors
///
/// Fails on the first malformed value. Bytes after the last complete
/// document that do not form another complete document are reported as
/// [`BencodeError::TrailingData`], except that exceeding the depth limit is
/// always reported as [`BencodeError::NestingTooDeep`].
pub fn decode(data: &[u8]) -> Result<Vec<Value>, BencodeError> {
    decode_with(data, &DecodeOptions::default())
}

/// Decodes every top-level document in `data`.
pub fn decode_with(data: &[u8], options: &DecodeOptions) -> Result<Vec<Value>, BencodeError> {
    if let Some(limit) = options.max_input_len {
        if data.len() > limit {
            return Err(BencodeError::InputTooLarge { limit });
        }
    }

    let mut decoder = Decoder::new(data, options);
    let mut values = Vec::new();

    while !decoder.cursor.at_end() {
        let start = decoder.cursor.position();
        match decoder.decode_value(0) {
            Ok(value) => values.push(value),
            Err(e) if !values.is_empty() && e.kind() != ErrorKind::NestingTooDeep => {
                tracing::debug!("Rejecting trailing bytes at offset {}: {}", start, e);
                return Err(BencodeError::TrailingData {
                    offset: start,
                    remaining: data.len() - start,
                    cause: Some(Box::new(e)),
                });
            }
            Err(e) => return Err(e),
        }
    }

    tracing::debug!(
        "Decoded {} bencode documents from {} bytes",
        values.len(),
        data.len()
    );
    Ok(values)
}

/// Decodes exactly one document, rejecting empty input and anything after it.
///
/// # Examples
///
/// ```
/// use benc::bencode::{decode_single, Value};
///
/// assert_eq!(decode_single(b"i42e").unwrap(), Value::Integer(42));
/// assert!(decode_single(b"i42ei43e").is_err());
/// assert!(decode_single(b"").is_err());
/// ```
pub fn decode_single(data: &[u8]) -> Result<Value, BencodeError> {
    let options = DecodeOptions::default();
    let mut decoder = Decoder::new(data, &options);
    let value = decoder.decode_value(0)?;

    if !decoder.cursor.at_end() {
        return Err(BencodeError::TrailingData {
            offset: decoder.cursor.position(),
            remaining: decoder.cursor.remaining(),
            cause: None,
        });
    }

    Ok(value)
}

/// Reads `reader` to its end, then decodes the collected bytes.
///
/// When [`DecodeOptions::max_input_len`] is set, reading stops one byte past
/// the limit and the call fails with [`BencodeError::InputTooLarge`].
pub fn decode_reader<R: Read>(
    mut reader: R,
    options: &DecodeOptions,
) -> Result<Vec<Value>, BencodeError> {
    let mut buf = Vec::new();
    match options.max_input_len {
        Some(limit) => {
            reader.take((limit as u64).saturating_add(1)).read_to_end(&mut buf)?;
            if buf.len() > limit {
                return Err(BencodeError::InputTooLarge { limit });
            }
        }
        None => {
            reader.read_to_end(&mut buf)?;
        }
    }
    decode_with(&buf, options)
}

/// Reads and decodes a file.
pub fn decode_file(
    path: impl AsRef<Path>,
    options: &DecodeOptions,
) -> Result<Vec<Value>, BencodeError> {
    let file = File::open(path.as_ref())?;
    decode_reader(file, options)
}

/// Returns the exact source bytes of `key`'s value in the top-level dictionary.
///
/// Returns `None` when the input does not start with a dictionary or the key
/// is absent. If the key repeats, the last occurrence wins, matching the
/// decoded [`Value::Dict`].
///
/// # Examples
///
/// ```
/// use benc::bencode::raw_dict_entry;
///
/// let data = b"d4:infod4:name1:xe3:fooi1ee";
/// assert_eq!(raw_dict_entry(data, b"info").unwrap(), Some(&b"d4:name1:xe"[..]));
/// assert_eq!(raw_dict_entry(data, b"bar").unwrap(), None);
/// ```
pub fn raw_dict_entry<'a>(data: &'a [u8], key: &[u8]) -> Result<Option<&'a [u8]>, BencodeError> {
    let options = DecodeOptions::default();
    let mut decoder = Decoder::new(data, &options);

    if decoder.cursor.peek()? != b'd' {
        return Ok(None);
    }
    let depth = decoder.enter(0)?;
    decoder.cursor.next_byte()?;

    let mut found = None;
    while decoder.cursor.peek()? != b'e' {
        let entry_key = decoder.decode_bytes()?;
        let start = decoder.cursor.position();
        decoder.decode_value(depth)?;
        if entry_key.as_ref() == key {
            found = Some(decoder.cursor.consumed_since(start));
        }
    }

    Ok(found)
}

struct Decoder<'a, 'o> {
    cursor: Cursor<'a>,
    options: &'o DecodeOptions,
}

impl<'a, 'o> Decoder<'a, 'o> {
    fn new(data: &'a [u8], options: &'o DecodeOptions) -> Self {
        Self {
            cursor: Cursor::new(data),
            options,
        }
    }

    fn decode_value(&mut self, depth: usize) -> Result<Value, BencodeError> {
        match self.cursor.peek()? {
            b'0'..=b'9' => self.decode_bytes().map(Value::Bytes),
            b'i' => self.decode_integer(),
            b'l' => self.decode_list(depth),
            b'd' => self.decode_dict(depth),
            c => Err(BencodeError::UnexpectedToken {
                found: c as char,
                offset: self.cursor.position(),
            }),
        }
    }

    /// Checks the depth limit before descending into a container.
    fn enter(&self, depth: usize) -> Result<usize, BencodeError> {
        let depth = depth + 1;
        if depth > self.options.max_depth {
            return Err(BencodeError::NestingTooDeep {
                max_depth: self.options.max_depth,
                offset: self.cursor.position(),
            });
        }
        Ok(depth)
    }

    fn decode_integer(&mut self) -> Result<Value, BencodeError> {
        self.cursor.next_byte()?;

        let negative = self.cursor.peek()? == b'-';
        if negative {
            self.cursor.next_byte()?;
        }

        let offset = self.cursor.position();
        let digits = self.digit_run()?;
        let magnitude = parse_magnitude(digits, offset)?;

        if digits.len() > 1 && digits[0] == b'0' {
            return Err(BencodeError::NonCanonicalInteger {
                offset,
                reason: "leading zero",
            });
        }
        if negative && magnitude == 0 {
            return Err(BencodeError::NonCanonicalInteger {
                offset,
                reason: "negative zero",
            });
        }

        let value = if negative {
            0i64.checked_sub_unsigned(magnitude)
        } else {
            i64::try_from(magnitude).ok()
        }
        .ok_or(BencodeError::NumberOverflow { offset })?;

        self.expect_byte(b'e')?;
        Ok(Value::Integer(value))
    }

    fn decode_bytes(&mut self) -> Result<Bytes, BencodeError> {
        let length_offset = self.cursor.position();
        let digits = self.digit_run()?;
        let declared = parse_magnitude(digits, length_offset)?;

        self.expect_byte(b':')?;

        let remaining = self.cursor.remaining();
        let len = usize::try_from(declared)
            .ok()
            .filter(|&len| len <= remaining)
            .ok_or(BencodeError::TruncatedString {
                declared,
                remaining,
                offset: length_offset,
            })?;

        Ok(Bytes::copy_from_slice(self.cursor.advance(len)?))
    }

    fn decode_list(&mut self, depth: usize) -> Result<Value, BencodeError> {
        let depth = self.enter(depth)?;
        self.cursor.next_byte()?;

        let mut list = Vec::new();
        while self.cursor.peek()? != b'e' {
            list.push(self.decode_value(depth)?);
        }

        self.cursor.next_byte()?;
        Ok(Value::List(list))
    }

    fn decode_dict(&mut self, depth: usize) -> Result<Value, BencodeError> {
        let depth = self.enter(depth)?;
        self.cursor.next_byte()?;

        let mut dict = BTreeMap::new();
        while self.cursor.peek()? != b'e' {
            let key_offset = self.cursor.position();
            let key = self.decode_bytes()?;
            let value = self.decode_value(depth)?;

            match dict.entry(key) {
                Entry::Vacant(entry) => {
                    entry.insert(value);
                }
                Entry::Occupied(entry) if self.options.reject_duplicate_keys => {
                    return Err(BencodeError::DuplicateKey {
                        key: String::from_utf8_lossy(entry.key()).into_owned(),
                        offset: key_offset,
                    });
                }
                Entry::Occupied(mut entry) => {
                    tracing::trace!(
                        "Duplicate key {:?} at offset {} replaces earlier value",
                        String::from_utf8_lossy(entry.key()),
                        key_offset
                    );
                    entry.insert(value);
                }
            }
        }

        self.cursor.next_byte()?;
        Ok(Value::Dict(dict))
    }

    /// Consumes a run of ASCII digits. An empty run is an error.
    fn digit_run(&mut self) -> Result<&'a [u8], BencodeError> {
        let start = self.cursor.position();
        while matches!(self.cursor.peek(), Ok(b) if b.is_ascii_digit()) {
            self.cursor.next_byte()?;
        }

        let digits = self.cursor.consumed_since(start);
        if digits.is_empty() {
            // at end of input this reports UnexpectedEnd instead
            self.cursor.peek()?;
            return Err(BencodeError::MissingDigits { offset: start });
        }
        Ok(digits)
    }

    fn expect_byte(&mut self, expected: u8) -> Result<(), BencodeError> {
        let offset = self.cursor.position();
        let found = self.cursor.peek()?;
        if found != expected {
            return Err(BencodeError::MissingSeparator {
                expected: expected as char,
                found: found as char,
                offset,
            });
        }
        self.cursor.next_byte()?;
        Ok(())
    }
}

fn parse_magnitude(digits: &[u8], offset: usize) -> Result<u64, BencodeError> {
    digits
        .iter()
        .try_fold(0u64, |acc, &d| {
            acc.checked_mul(10)?.checked_add(u64::from(d - b'0'))
        })
        .ok_or(BencodeError::NumberOverflow { offset })
}
