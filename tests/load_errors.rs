use std::fs;

use goscan::{Error, GoSource, ParseOptions, TagSet};
use tempfile::tempdir;

#[test]
fn missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.go");
    let err = GoSource::open(&path).unwrap_err();
    assert!(matches!(err, Error::Io { ref path, .. } if path.ends_with("absent.go")));
}

#[test]
fn directory_is_rejected() {
    let dir = tempdir().unwrap();
    let err = GoSource::open(dir.path()).unwrap_err();
    assert!(matches!(err, Error::NotAFile { .. }));
    assert!(err.to_string().ends_with("is a directory"));
}

#[test]
fn syntax_error_is_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.go");
    fs::write(&path, "package broken\n\nvar x = \n").unwrap();
    let err = GoSource::open(&path).unwrap_err();
    let Error::Parse(failure) = err else {
        panic!("expected parse failure, got {err:?}");
    };
    assert!(!failure.diags.is_empty());
}

#[test]
fn invalid_utf8_is_io_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("latin1.go");
    fs::write(&path, b"package p\n\nvar (\n\t// caf\xe9\n\tx = 1\n)\n").unwrap();
    assert!(matches!(GoSource::open(&path), Err(Error::Io { .. })));
}

#[test]
fn file_round_trip_with_options() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ok.go");
    fs::write(&path, "package ok\n\nvar (\n\t// cfg\n\tport uint16 = 8080\n)\n").unwrap();

    let src = GoSource::open(&path).unwrap();
    let got = src.scalar_values::<u16>(&TagSet::from(["cfg"]));
    assert_eq!(got[0].value, 8080);

    // Without comments nothing is tagged.
    let bare = GoSource::open_with(&path, &ParseOptions { comments: false }).unwrap();
    assert!(bare.scalar_values::<u16>(&TagSet::from(["cfg"])).is_empty());
}
