use std::io::{ErrorKind, Write};

use rand::RngCore;
use tempfile::NamedTempFile;

use crate::retention::disk::{Disk, DiskSpec, Member};

const DISK_LEN: usize = 64 * 1024;

fn disk_with(content: &[u8]) -> (NamedTempFile, Disk) {
    let mut tf = NamedTempFile::new().expect("tmp file");
    tf.write_all(content).expect("write image");
    tf.flush().expect("flush image");
    let d = Disk::open(tf.path()).expect("open disk");
    (tf, d)
}

#[test]
fn open_reports_length_and_path() {
    let (tf, d) = disk_with(&vec![0u8; DISK_LEN]);
    assert_eq!(d.len(), DISK_LEN as u64);
    assert!(!d.is_empty());
    assert_eq!(d.path(), tf.path());
}

#[test]
fn open_missing_file_fails() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let err = Disk::open(dir.path().join("nope.img")).expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn read_at_returns_exact_bytes() {
    let mut content = vec![0u8; DISK_LEN];
    rand::rng().fill_bytes(&mut content);
    let (_tf, d) = disk_with(&content);

    let mut buf = vec![0u8; 4096];
    d.read_at(12_345, &mut buf).expect("read");
    assert_eq!(buf, content[12_345..12_345 + 4096]);
}

#[test]
fn read_past_end_is_a_short_read() {
    let (_tf, d) = disk_with(&vec![7u8; 1024]);

    let mut buf = vec![0u8; 512];
    let err = d.read_at(768, &mut buf).expect_err("short read");
    assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
}

#[test]
fn empty_disk_is_empty() {
    let (_tf, d) = disk_with(&[]);
    assert!(d.is_empty());
}

#[test]
fn disk_spec_parses_missing_token() {
    assert_eq!("MISSING".parse::<DiskSpec>(), Ok(DiskSpec::Missing));
    assert_eq!(
        "/dev/sdb".parse::<DiskSpec>(),
        Ok(DiskSpec::Path("/dev/sdb".into()))
    );
    // Only the exact token marks absence.
    assert_eq!(
        "missing".parse::<DiskSpec>(),
        Ok(DiskSpec::Path("missing".into()))
    );
    assert_eq!(DiskSpec::Missing.to_string(), "MISSING");
}

#[test]
fn member_exposes_disk_only_when_present() {
    let (_tf, d) = disk_with(&[1, 2, 3]);
    let present = Member::Present(d);
    assert!(!present.is_absent());
    assert_eq!(present.disk().map(Disk::len), Some(3));

    assert!(Member::Absent.is_absent());
    assert!(Member::Absent.disk().is_none());
}
