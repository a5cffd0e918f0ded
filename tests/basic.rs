//! Basic integration tests for mmap-stream.

use mmap_stream::{delete_stream, open_stream, MappedStream, StreamError, StreamMode};
use std::fs;
use std::path::PathBuf;

fn tmp_path(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("mmap_stream_test_{}_{}", name, std::process::id()));
    p
}

#[test]
fn open_missing_file_read_fails() {
    let path = tmp_path("open_missing_read");
    let _ = fs::remove_file(&path);

    assert!(matches!(
        MappedStream::open(&path, StreamMode::Read),
        Err(StreamError::Io(_))
    ));
    assert!(matches!(
        MappedStream::open(&path, StreamMode::ReadUpdate),
        Err(StreamError::Io(_))
    ));
}

#[test]
fn open_invalid_mode_and_path() {
    let path = tmp_path("open_invalid");
    let _ = fs::remove_file(&path);

    assert!(matches!(
        open_stream(&path, "a+"),
        Err(StreamError::InvalidArgument(_))
    ));
    assert!(matches!(
        open_stream(&path, ""),
        Err(StreamError::InvalidArgument(_))
    ));
    assert!(matches!(
        open_stream("", "w+"),
        Err(StreamError::InvalidArgument(_))
    ));
}

#[test]
fn open_write_truncates_existing_contents() {
    let path = tmp_path("open_write_truncates");
    fs::write(&path, b"stale contents").expect("seed file");

    let stream = open_stream(&path, "w").expect("open w");
    assert_eq!(stream.end(), 0);
    assert!(stream.is_empty());
    drop(stream);

    assert_eq!(fs::metadata(&path).expect("stat").len(), 0);
    delete_stream(&path).expect("delete");
}

#[test]
fn open_preserves_existing_contents_in_update_mode() {
    let path = tmp_path("open_r_plus_preserves");
    fs::write(&path, b"keep me around").expect("seed file");

    let mut stream = open_stream(&path, "r+").expect("open r+");
    assert_eq!(stream.end(), 14);

    let mut buf = [0u8; 14];
    let n = stream.read(&mut buf).expect("read");
    assert_eq!(n, 14);
    assert_eq!(&buf, b"keep me around");

    drop(stream);
    delete_stream(&path).expect("delete");
}

#[test]
fn hello_world_scenario() {
    let path = tmp_path("hello_world_scenario");
    let _ = fs::remove_file(&path);

    let mut stream = open_stream(&path, "w+").expect("open w+");
    let written = stream.write(b"HelloWorld").expect("write");
    assert_eq!(written, 10);
    assert_eq!(stream.end(), 10);
    assert_eq!(stream.tell(), 10);

    assert_eq!(stream.seek(-5).expect("seek -5"), 5);
    let mut tail = [0u8; 5];
    let n = stream.read(&mut tail).expect("read tail");
    assert_eq!(n, 5);
    assert_eq!(&tail, b"World");

    stream.close();

    let mut reopened = open_stream(&path, "r").expect("reopen r");
    assert_eq!(reopened.end(), 10);
    let mut all = [0u8; 10];
    let n = reopened.read(&mut all).expect("read all");
    assert_eq!(n, 10);
    assert_eq!(&all, b"HelloWorld");
    drop(reopened);

    assert_eq!(fs::metadata(&path).expect("stat").len(), 10);
    delete_stream(&path).expect("delete");
}

#[test]
fn write_on_read_only_stream_is_rejected() {
    let path = tmp_path("write_on_ro");
    fs::write(&path, b"untouchable").expect("seed file");

    let mut stream = open_stream(&path, "r").expect("open r");
    assert!(matches!(
        stream.write(b"nope"),
        Err(StreamError::PermissionDenied(_))
    ));
    // A rejected write must not move the cursor or the end.
    assert_eq!(stream.tell(), 0);
    assert_eq!(stream.end(), 11);
    drop(stream);

    assert_eq!(fs::read(&path).expect("read back"), b"untouchable");
    delete_stream(&path).expect("delete");
}

#[test]
fn read_on_write_only_stream_is_rejected() {
    let path = tmp_path("read_on_wo");
    let _ = fs::remove_file(&path);

    let mut stream = open_stream(&path, "w").expect("open w");
    stream.write(b"write-only").expect("write");

    let mut buf = [0u8; 4];
    assert!(matches!(
        stream.read(&mut buf),
        Err(StreamError::PermissionDenied(_))
    ));
    drop(stream);
    delete_stream(&path).expect("delete");
}

#[test]
fn mode_accessors() {
    let path = tmp_path("mode_accessors");
    let _ = fs::remove_file(&path);

    let stream = open_stream(&path, "w+").expect("open w+");
    assert_eq!(stream.mode(), StreamMode::WriteUpdate);
    assert_eq!(stream.mode().as_str(), "w+");
    assert!(stream.block_size() > 0);
    assert_eq!(stream.path(), path.as_path());
    drop(stream);
    delete_stream(&path).expect("delete");
}

#[test]
fn flush_policy_always_persists_each_write() {
    use mmap_stream::{FlushPolicy, StreamOptions};

    let path = tmp_path("flush_policy_always");
    let _ = fs::remove_file(&path);

    let mut stream = StreamOptions::new()
        .mode(StreamMode::WriteUpdate)
        .flush_policy(FlushPolicy::Always)
        .open(&path)
        .expect("builder open");

    stream.write(b"ALWAYS").expect("write");

    // A second read-only stream over the same file sees the flushed bytes.
    let mut ro = open_stream(&path, "r").expect("open ro");
    let mut buf = [0u8; 6];
    ro.read(&mut buf).expect("read");
    assert_eq!(&buf, b"ALWAYS");

    drop(ro);
    drop(stream);
    delete_stream(&path).expect("delete");
}

#[test]
fn flush_policy_threshold_triggers() {
    use mmap_stream::{FlushPolicy, MappedStream};

    let path = tmp_path("flush_policy_threshold");
    let _ = fs::remove_file(&path);

    // Threshold of 8 bytes; a single 8-byte write should flush.
    let mut stream = MappedStream::options()
        .mode(StreamMode::WriteUpdate)
        .flush_policy(FlushPolicy::EveryBytes(8))
        .open(&path)
        .expect("builder open");

    stream.write(b"ABCDEFGH").expect("write");

    let mut ro = open_stream(&path, "r").expect("open ro");
    let mut buf = [0u8; 8];
    ro.read(&mut buf).expect("read");
    assert_eq!(&buf, b"ABCDEFGH");

    drop(ro);
    drop(stream);
    delete_stream(&path).expect("delete");
}

#[test]
fn empty_write_and_read_are_no_ops() {
    let path = tmp_path("empty_ops");
    let _ = fs::remove_file(&path);

    let mut stream = open_stream(&path, "w+").expect("open w+");
    assert_eq!(stream.write(b"").expect("empty write"), 0);
    assert_eq!(stream.end(), 0);

    let mut buf = [0u8; 0];
    assert_eq!(stream.read(&mut buf).expect("empty read"), 0);

    drop(stream);
    delete_stream(&path).expect("delete");
}
