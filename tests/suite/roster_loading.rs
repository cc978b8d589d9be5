//! Roster files on disk through `Roster::load`.

use std::fs;

use starpick_engine::{Roster, RosterError};
use tempfile::tempdir;

#[test]
fn loads_mixed_id_positions() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("names.txt");
    fs::write(&path, "12 Ada Lovelace\nGrace Hopper, 1906\n\n   \nAlan\n").unwrap();

    let roster = Roster::load(&path).unwrap();
    let entities = roster.entities();
    assert_eq!(entities.len(), 3);

    assert_eq!(entities[0].name(), "Ada Lovelace");
    assert_eq!(entities[0].id(), Some("12"));
    assert_eq!(entities[1].name(), "Grace Hopper");
    assert_eq!(entities[1].id(), Some("1906"));
    assert_eq!(entities[2].name(), "Alan");
    assert_eq!(entities[2].id(), None);
}

#[test]
fn source_names_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("class-a.txt");
    fs::write(&path, "Ada\n").unwrap();

    let roster = Roster::load(&path).unwrap();
    assert!(roster.source().contains("class-a.txt"));
}

#[test]
fn blank_file_is_empty_roster() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("names.txt");
    fs::write(&path, "\n \n\t\n").unwrap();

    assert!(matches!(Roster::load(&path), Err(RosterError::Empty)));
}

#[test]
fn missing_file_is_read_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nope.txt");

    match Roster::load(&path) {
        Err(RosterError::Read { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected read error, got {other:?}"),
    }
}
