use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, UNIX_EPOCH};

use super::*;
use crate::bencode::Value;
use crate::bencode::{decode_single, raw_dict_entry, ErrorKind};

fn bstr(s: &[u8]) -> Vec<u8> {
    let mut out = format!("{}:", s.len()).into_bytes();
    out.extend_from_slice(s);
    out
}

fn int(n: i64) -> Vec<u8> {
    format!("i{}e", n).into_bytes()
}

fn list(items: &[Vec<u8>]) -> Vec<u8> {
    let mut out = vec![b'l'];
    for item in items {
        out.extend_from_slice(item);
    }
    out.push(b'e');
    out
}

fn dict(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut out = vec![b'd'];
    for (key, value) in entries {
        out.extend(bstr(key.as_bytes()));
        out.extend_from_slice(value);
    }
    out.push(b'e');
    out
}

fn two_piece_hashes() -> Vec<u8> {
    let mut pieces = vec![0x01u8; 20];
    pieces.extend_from_slice(&[0xABu8; 20]);
    pieces
}

fn single_file_info() -> Vec<u8> {
    dict(&[
        ("length", int(20000)),
        ("name", bstr(b"test.txt")),
        ("piece length", int(16384)),
        ("pieces", bstr(&two_piece_hashes())),
    ])
}

fn torrent_with_info(info: Vec<u8>) -> Vec<u8> {
    dict(&[
        ("announce", bstr(b"http://tracker.example.com/announce")),
        ("info", info),
    ])
}

#[test]
fn test_single_file_torrent() {
    let info = single_file_info();
    let data = dict(&[
        ("announce", bstr(b"http://tracker.example.com/announce")),
        ("comment", bstr(b"a comment")),
        ("created by", bstr(b"benc")),
        ("creation date", int(1_700_000_000)),
        ("info", info.clone()),
    ]);

    let torrent = Metainfo::from_bytes(&data).unwrap();
    assert_eq!(torrent.announce, "http://tracker.example.com/announce");
    assert_eq!(torrent.comment.as_deref(), Some("a comment"));
    assert_eq!(torrent.created_by.as_deref(), Some("benc"));
    assert_eq!(torrent.creation_date, Some(1_700_000_000));
    assert_eq!(
        torrent.creation_time(),
        Some(UNIX_EPOCH + Duration::from_secs(1_700_000_000))
    );
    assert!(torrent.announce_list.is_empty());

    let info_struct = &torrent.info;
    assert_eq!(info_struct.name, "test.txt");
    assert_eq!(info_struct.piece_length, 16384);
    assert_eq!(info_struct.piece_count(), 2);
    assert_eq!(info_struct.pieces[0], [0x01u8; 20]);
    assert_eq!(info_struct.pieces[1], [0xABu8; 20]);
    assert_eq!(info_struct.total_length, 20000);
    assert!(!info_struct.is_multi_file());
    assert!(!info_struct.private);
    assert_eq!(info_struct.files.len(), 1);
    assert_eq!(info_struct.files[0].path, PathBuf::from("test.txt"));
    assert_eq!(info_struct.files[0].offset, 0);

    assert_eq!(info_struct.piece_size(0), Some(16384));
    assert_eq!(info_struct.piece_size(1), Some(20000 - 16384));
    assert_eq!(info_struct.piece_size(2), None);

    assert_eq!(torrent.raw_info().as_ref(), info.as_slice());
    assert_eq!(torrent.info_hash, InfoHash::from_info_bytes(&info));
}

#[test]
fn test_multi_file_torrent() {
    let info = dict(&[
        (
            "files",
            list(&[
                dict(&[
                    ("length", int(10)),
                    ("path", list(&[bstr(b"dir"), bstr(b"a.txt")])),
                ]),
                dict(&[
                    ("length", int(5)),
                    ("md5sum", bstr(b"d41d8cd98f00b204e9800998ecf8427e")),
                    ("path", list(&[bstr(b"b.txt")])),
                ]),
            ]),
        ),
        ("name", bstr(b"root")),
        ("piece length", int(16384)),
        ("pieces", bstr(&[0u8; 20])),
        ("private", int(1)),
    ]);

    let torrent = Metainfo::from_bytes(&torrent_with_info(info)).unwrap();
    let files = &torrent.info.files;

    assert!(torrent.info.is_multi_file());
    assert!(torrent.info.private);
    assert_eq!(torrent.info.total_length, 15);
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].path, ["root", "dir", "a.txt"].iter().collect::<PathBuf>());
    assert_eq!(files[0].offset, 0);
    assert_eq!(files[0].md5sum, None);
    assert_eq!(files[1].path, ["root", "b.txt"].iter().collect::<PathBuf>());
    assert_eq!(files[1].offset, 10);
    assert_eq!(
        files[1].md5sum.as_deref(),
        Some("d41d8cd98f00b204e9800998ecf8427e")
    );
}

#[test]
fn test_announce_list_and_trackers() {
    let data = dict(&[
        ("announce", bstr(b"http://a")),
        (
            "announce-list",
            list(&[
                list(&[bstr(b"http://a"), bstr(b"http://b")]),
                list(&[bstr(b"udp://c")]),
            ]),
        ),
        ("info", single_file_info()),
    ]);

    let torrent = Metainfo::from_bytes(&data).unwrap();
    assert_eq!(
        torrent.announce_list,
        vec![
            vec!["http://a".to_string(), "http://b".to_string()],
            vec!["udp://c".to_string()],
        ]
    );
    assert_eq!(torrent.trackers(), vec!["http://a", "http://b", "udp://c"]);
}

#[test]
fn test_announce_list_wrong_type() {
    let data = dict(&[
        ("announce", bstr(b"http://a")),
        ("announce-list", list(&[list(&[int(1)])])),
        ("info", single_file_info()),
    ]);

    assert!(matches!(
        Metainfo::from_bytes(&data),
        Err(MetainfoError::WrongType {
            field: "announce-list",
            ..
        })
    ));
}

#[test]
fn test_rejects_malformed_tracker_urls() {
    let data = dict(&[
        ("announce", bstr(b"not a url at all")),
        ("info", single_file_info()),
    ]);
    assert!(matches!(
        Metainfo::from_bytes(&data),
        Err(MetainfoError::InvalidField("announce"))
    ));

    let data = dict(&[
        ("announce", bstr(b"http://a")),
        ("announce-list", list(&[list(&[bstr(b"::::")])])),
        ("info", single_file_info()),
    ]);
    assert!(matches!(
        Metainfo::from_bytes(&data),
        Err(MetainfoError::InvalidField("announce-list"))
    ));
}

#[test]
fn test_from_value() {
    let data = torrent_with_info(single_file_info());
    let root = decode_single(&data).unwrap();
    let raw_info = raw_dict_entry(&data, b"info").unwrap().unwrap();

    let torrent = Metainfo::from_value(&root, raw_info).unwrap();
    assert_eq!(torrent.info.name, "test.txt");
    assert_eq!(torrent.info_hash, InfoHash::from_info_bytes(&single_file_info()));
    assert_eq!(torrent.raw_info().as_ref(), raw_info);

    assert!(matches!(
        Metainfo::from_value(&Value::Integer(1), raw_info),
        Err(MetainfoError::WrongType { field: "root", .. })
    ));
}

#[test]
fn test_missing_announce() {
    let data = dict(&[("info", single_file_info())]);
    assert!(matches!(
        Metainfo::from_bytes(&data),
        Err(MetainfoError::MissingField("announce"))
    ));
}

#[test]
fn test_missing_info() {
    let data = dict(&[("announce", bstr(b"http://a"))]);
    assert!(matches!(
        Metainfo::from_bytes(&data),
        Err(MetainfoError::MissingField("info"))
    ));
}

#[test]
fn test_root_must_be_dict() {
    match Metainfo::from_bytes(b"li1ee") {
        Err(MetainfoError::WrongType { field, source }) => {
            assert_eq!(field, "root");
            assert_eq!(source.kind(), ErrorKind::InvalidCast);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_info_must_be_dict() {
    let data = torrent_with_info(bstr(b"nope"));
    assert!(matches!(
        Metainfo::from_bytes(&data),
        Err(MetainfoError::WrongType { field: "info", .. })
    ));
}

#[test]
fn test_pieces_not_multiple_of_20() {
    let info = dict(&[
        ("length", int(1)),
        ("name", bstr(b"x")),
        ("piece length", int(16384)),
        ("pieces", bstr(&[0u8; 21])),
    ]);
    assert!(matches!(
        Metainfo::from_bytes(&torrent_with_info(info)),
        Err(MetainfoError::InvalidField("pieces"))
    ));
}

#[test]
fn test_pieces_wrong_type() {
    let info = dict(&[
        ("length", int(1)),
        ("name", bstr(b"x")),
        ("piece length", int(16384)),
        ("pieces", int(7)),
    ]);
    assert!(matches!(
        Metainfo::from_bytes(&torrent_with_info(info)),
        Err(MetainfoError::WrongType {
            field: "pieces",
            ..
        })
    ));
}

#[test]
fn test_invalid_piece_length() {
    let info = dict(&[
        ("length", int(1)),
        ("name", bstr(b"x")),
        ("piece length", int(0)),
        ("pieces", bstr(&[0u8; 20])),
    ]);
    assert!(matches!(
        Metainfo::from_bytes(&torrent_with_info(info)),
        Err(MetainfoError::InvalidField("piece length"))
    ));
}

#[test]
fn test_missing_length_and_files() {
    let info = dict(&[
        ("name", bstr(b"x")),
        ("piece length", int(16384)),
        ("pieces", bstr(&[0u8; 20])),
    ]);
    assert!(matches!(
        Metainfo::from_bytes(&torrent_with_info(info)),
        Err(MetainfoError::MissingField("length or files"))
    ));
}

#[test]
fn test_rejects_path_traversal() {
    for component in [&b".."[..], &b""[..], &b"a/b"[..]] {
        let info = dict(&[
            (
                "files",
                list(&[dict(&[
                    ("length", int(1)),
                    ("path", list(&[bstr(component)])),
                ])]),
            ),
            ("name", bstr(b"root")),
            ("piece length", int(16384)),
            ("pieces", bstr(&[0u8; 20])),
        ]);
        assert!(matches!(
            Metainfo::from_bytes(&torrent_with_info(info)),
            Err(MetainfoError::InvalidField("path"))
        ));
    }
}

#[test]
fn test_negative_file_length() {
    let info = dict(&[
        ("length", int(-1)),
        ("name", bstr(b"x")),
        ("piece length", int(16384)),
        ("pieces", bstr(&[0u8; 20])),
    ]);
    assert!(matches!(
        Metainfo::from_bytes(&torrent_with_info(info)),
        Err(MetainfoError::InvalidField("length"))
    ));
}

#[test]
fn test_decode_errors_stay_distinct() {
    match Metainfo::from_bytes(b"d8:announce") {
        Err(MetainfoError::Bencode(e)) => assert_eq!(e.kind(), ErrorKind::UnexpectedEnd),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(matches!(
        Metainfo::from_bytes(b""),
        Err(MetainfoError::EmptyDocument)
    ));
}

#[test]
fn test_info_hash_uses_source_bytes() {
    // keys out of canonical order must still hash as written
    let info = dict(&[
        ("pieces", bstr(&[0u8; 20])),
        ("name", bstr(b"x")),
        ("piece length", int(16384)),
        ("length", int(1)),
    ]);
    let torrent = Metainfo::from_bytes(&torrent_with_info(info.clone())).unwrap();
    assert_eq!(torrent.info_hash, InfoHash::from_info_bytes(&info));
}

#[test]
fn test_negative_creation_date() {
    let data = dict(&[
        ("announce", bstr(b"http://a")),
        ("creation date", int(-60)),
        ("info", single_file_info()),
    ]);
    let torrent = Metainfo::from_bytes(&data).unwrap();
    assert_eq!(
        torrent.creation_time(),
        Some(UNIX_EPOCH - Duration::from_secs(60))
    );
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&torrent_with_info(single_file_info())).unwrap();
    file.flush().unwrap();

    let torrent = Metainfo::from_file(file.path()).unwrap();
    assert_eq!(torrent.info.name, "test.txt");

    let dir = tempfile::TempDir::new().unwrap();
    assert!(matches!(
        Metainfo::from_file(dir.path().join("missing.torrent")),
        Err(MetainfoError::Io(_))
    ));
}

#[test]
fn test_info_hash_known_digests() {
    assert_eq!(
        InfoHash::from_info_bytes(b"").to_hex(),
        "da39a3ee5e6b4b0d3255bfef95601890afd80709"
    );
    assert_eq!(
        InfoHash::from_info_bytes(b"abc").to_string(),
        "a9993e364706816aba3e25717850c26c9cd0d89d"
    );
}

#[test]
fn test_info_hash_from_hex() {
    let hex = "0123456789abcdef0123456789abcdef01234567";
    let hash = InfoHash::from_hex(hex).unwrap();
    assert_eq!(hash.to_hex(), hex);
    assert_eq!(hash.as_bytes()[0], 0x01);

    assert!(InfoHash::from_hex("0123").is_err());
    assert!(InfoHash::from_hex("zz").is_err());
    assert!(InfoHash::from_bytes(&[0u8; 19]).is_err());
}
