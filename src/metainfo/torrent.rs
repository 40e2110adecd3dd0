use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use url::Url;

use super::error::MetainfoError;
use super::info_hash::InfoHash;
use crate::bencode::{decode, raw_dict_entry, BencodeError, Value};
use crate::constants::PIECE_HASH_LEN;

type Dict = BTreeMap<Bytes, Value>;

/// A parsed torrent file.
///
/// Contains all metadata from a `.torrent` file, including file information,
/// piece hashes, and tracker URLs.
///
/// # Examples
///
/// ```no_run
/// use benc::metainfo::Metainfo;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let metainfo = Metainfo::from_file("example.torrent")?;
///
/// println!("Torrent: {}", metainfo.info.name);
/// println!("Size: {} bytes", metainfo.info.total_length);
/// println!("Info hash: {}", metainfo.info_hash);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Metainfo {
    /// The info dictionary containing file and piece information.
    pub info: Info,
    /// SHA1 of the raw info dictionary.
    pub info_hash: InfoHash,
    /// Primary tracker URL.
    pub announce: String,
    /// Multi-tier tracker list ([BEP-12](http://bittorrent.org/beps/bep_0012.html)).
    pub announce_list: Vec<Vec<String>>,
    /// Unix timestamp when the torrent was created.
    pub creation_date: Option<i64>,
    /// Optional comment about the torrent.
    pub comment: Option<String>,
    /// Name/version of the program that created the torrent.
    pub created_by: Option<String>,
    /// Character encoding of the text fields, as declared by the creator.
    pub encoding: Option<String>,
    raw_info: Bytes,
}

/// The info dictionary from a torrent file.
#[derive(Debug, Clone)]
pub struct Info {
    /// Suggested name for the file or directory.
    pub name: String,
    /// Number of bytes per piece.
    pub piece_length: u64,
    /// SHA1 hash of each piece.
    pub pieces: Vec<[u8; PIECE_HASH_LEN]>,
    /// Files in piece-data order.
    pub files: Vec<File>,
    /// Total size of all files combined.
    pub total_length: u64,
    /// If true, clients should only use trackers in the metainfo (no DHT/PEX).
    pub private: bool,
    multi_file: bool,
}

/// A file within a torrent.
///
/// For single-file torrents, there is one file with the torrent name.
/// For multi-file torrents, paths start with the torrent name as root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    /// Path to the file.
    pub path: PathBuf,
    /// Size of the file in bytes.
    pub length: u64,
    /// Byte offset within the torrent's piece data.
    pub offset: u64,
    /// Hex MD5 of the file contents, when the creator supplied one.
    pub md5sum: Option<String>,
}

impl Metainfo {
    /// Parses a torrent file from raw bytes.
    ///
    /// Only the first top-level document is used.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The data is not valid bencode
    /// - Required fields are missing (announce, info, pieces, etc.)
    /// - A field holds the wrong bencode type
    /// - The pieces field length is not a multiple of 20
    pub fn from_bytes(data: &[u8]) -> Result<Self, MetainfoError> {
        // decode, then walk the root dictionary again for the raw info span
        let documents = decode(data)?;
        let root = documents.first().ok_or(MetainfoError::EmptyDocument)?;
        if documents.len() > 1 {
            tracing::debug!(
                "Ignoring {} extra documents after the torrent dictionary",
                documents.len() - 1
            );
        }

        let raw_info = raw_dict_entry(data, b"info")?;
        Self::from_parts(root, raw_info)
    }

    /// Reads and parses a torrent file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MetainfoError> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Extracts metainfo from an already decoded root dictionary.
    ///
    /// `raw_info` must be the `info` value exactly as it appeared in the
    /// source (see [`raw_dict_entry`]); the info hash is computed over it.
    pub fn from_value(root: &Value, raw_info: &[u8]) -> Result<Self, MetainfoError> {
        Self::from_parts(root, Some(raw_info))
    }

    fn from_parts(root: &Value, raw_info: Option<&[u8]>) -> Result<Self, MetainfoError> {
        let dict = root.try_dict().map_err(wrong_type("root"))?;

        let announce = tracker_url(required(dict, "announce")?, "announce")?;
        let info = parse_info(required(dict, "info")?)?;
        let raw_info = raw_info
            .map(Bytes::copy_from_slice)
            .ok_or(MetainfoError::MissingField("info"))?;

        let announce_list = match dict.get(b"announce-list".as_slice()) {
            Some(value) => parse_announce_list(value)?,
            None => Vec::new(),
        };

        let creation_date = optional(dict, "creation date", integer)?;
        let comment = optional(dict, "comment", text)?;
        let created_by = optional(dict, "created by", text)?;
        let encoding = optional(dict, "encoding", text)?;

        Ok(Self {
            info,
            info_hash: InfoHash::from_info_bytes(&raw_info),
            announce,
            announce_list,
            creation_date,
            comment,
            created_by,
            encoding,
            raw_info,
        })
    }

    /// Returns the raw bencoded info dictionary, exactly as found in the file.
    pub fn raw_info(&self) -> &Bytes {
        &self.raw_info
    }

    /// Returns the creation date as a point in time.
    pub fn creation_time(&self) -> Option<SystemTime> {
        let secs = self.creation_date?;
        let offset = Duration::from_secs(secs.unsigned_abs());
        if secs >= 0 {
            UNIX_EPOCH.checked_add(offset)
        } else {
            UNIX_EPOCH.checked_sub(offset)
        }
    }

    /// Returns all tracker URLs from both `announce` and `announce-list`.
    ///
    /// The primary tracker (from `announce`) comes first, followed by
    /// trackers from `announce-list`. Duplicates are removed.
    pub fn trackers(&self) -> Vec<String> {
        let mut trackers = vec![self.announce.clone()];

        for tier in &self.announce_list {
            for tracker in tier {
                if !trackers.contains(tracker) {
                    trackers.push(tracker.clone());
                }
            }
        }

        trackers
    }
}

impl Info {
    /// Returns true if the torrent describes a directory of files.
    pub fn is_multi_file(&self) -> bool {
        self.multi_file
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// Returns the size of piece `index`; the last piece may be short.
    pub fn piece_size(&self, index: usize) -> Option<u64> {
        if index >= self.pieces.len() {
            return None;
        }
        let start = (index as u64).saturating_mul(self.piece_length);
        Some(self.piece_length.min(self.total_length.saturating_sub(start)))
    }
}

fn parse_info(value: &Value) -> Result<Info, MetainfoError> {
    let dict = value.try_dict().map_err(wrong_type("info"))?;

    let name = text(required(dict, "name")?, "name")?;

    let piece_length = integer(required(dict, "piece length")?, "piece length")?;
    let piece_length = u64::try_from(piece_length)
        .ok()
        .filter(|&len| len > 0)
        .ok_or(MetainfoError::InvalidField("piece length"))?;

    let pieces_bytes = required(dict, "pieces")?
        .try_bytes()
        .map_err(wrong_type("pieces"))?;

    if pieces_bytes.len() % PIECE_HASH_LEN != 0 {
        return Err(MetainfoError::InvalidField("pieces"));
    }

    let pieces: Vec<[u8; PIECE_HASH_LEN]> = pieces_bytes
        .chunks_exact(PIECE_HASH_LEN)
        .map(|chunk| {
            let mut arr = [0u8; PIECE_HASH_LEN];
            arr.copy_from_slice(chunk);
            arr
        })
        .collect();

    let private = optional(dict, "private", integer)?.is_some_and(|v| v == 1);

    let (files, multi_file) = if let Some(length) = dict.get(b"length".as_slice()) {
        let file = File {
            path: PathBuf::from(&name),
            length: file_length(length)?,
            offset: 0,
            md5sum: optional(dict, "md5sum", text)?,
        };
        (vec![file], false)
    } else if let Some(files_value) = dict.get(b"files".as_slice()) {
        (parse_files(files_value, &name)?, true)
    } else {
        return Err(MetainfoError::MissingField("length or files"));
    };

    let total_length = files.iter().map(|f| f.length).sum::<u64>();

    let expected_pieces = total_length.div_ceil(piece_length);
    if expected_pieces != pieces.len() as u64 {
        tracing::warn!(
            "Torrent {:?} has {} piece hashes but {} bytes need {}",
            name,
            pieces.len(),
            total_length,
            expected_pieces
        );
    }

    Ok(Info {
        name,
        piece_length,
        pieces,
        files,
        total_length,
        private,
        multi_file,
    })
}

fn parse_files(value: &Value, name: &str) -> Result<Vec<File>, MetainfoError> {
    let list = value.try_list().map_err(wrong_type("files"))?;
    let mut files = Vec::with_capacity(list.len());
    let mut offset = 0u64;

    for file_value in list {
        let file_dict = file_value.try_dict().map_err(wrong_type("files"))?;

        let length = file_length(required(file_dict, "length")?)?;

        let components = required(file_dict, "path")?
            .try_list()
            .map_err(wrong_type("path"))?;
        if components.is_empty() {
            return Err(MetainfoError::InvalidField("path"));
        }

        let mut path = PathBuf::from(name);
        for component in components {
            let component = text(component, "path")?;
            if !is_plain_component(&component) {
                return Err(MetainfoError::InvalidField("path"));
            }
            path.push(component);
        }

        files.push(File {
            path,
            length,
            offset,
            md5sum: optional(file_dict, "md5sum", text)?,
        });

        offset = offset
            .checked_add(length)
            .ok_or(MetainfoError::InvalidField("length"))?;
    }

    Ok(files)
}

fn parse_announce_list(value: &Value) -> Result<Vec<Vec<String>>, MetainfoError> {
    value
        .try_list()
        .map_err(wrong_type("announce-list"))?
        .iter()
        .map(|tier| -> Result<Vec<String>, MetainfoError> {
            tier.try_list()
                .map_err(wrong_type("announce-list"))?
                .iter()
                .map(|url| tracker_url(url, "announce-list"))
                .collect()
        })
        .collect()
}

/// Tracker URLs must be absolute; the text is kept as written.
fn tracker_url(value: &Value, field: &'static str) -> Result<String, MetainfoError> {
    let url = text(value, field)?;
    Url::parse(&url).map_err(|_| MetainfoError::InvalidField(field))?;
    Ok(url)
}

/// A path component must name a single entry below the torrent root.
fn is_plain_component(component: &str) -> bool {
    let mut parts = Path::new(component).components();
    matches!(
        (parts.next(), parts.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn file_length(value: &Value) -> Result<u64, MetainfoError> {
    u64::try_from(integer(value, "length")?).map_err(|_| MetainfoError::InvalidField("length"))
}

fn required<'a>(dict: &'a Dict, key: &'static str) -> Result<&'a Value, MetainfoError> {
    dict.get(key.as_bytes())
        .ok_or(MetainfoError::MissingField(key))
}

fn optional<T>(
    dict: &Dict,
    key: &'static str,
    extract: fn(&Value, &'static str) -> Result<T, MetainfoError>,
) -> Result<Option<T>, MetainfoError> {
    dict.get(key.as_bytes())
        .map(|value| extract(value, key))
        .transpose()
}

fn text(value: &Value, field: &'static str) -> Result<String, MetainfoError> {
    value
        .try_text()
        .map(|s| s.into_owned())
        .map_err(wrong_type(field))
}

fn integer(value: &Value, field: &'static str) -> Result<i64, MetainfoError> {
    value.try_integer().map_err(wrong_type(field))
}

fn wrong_type(field: &'static str) -> impl Fn(BencodeError) -> MetainfoError {
    move |source| MetainfoError::WrongType { field, source }
}
