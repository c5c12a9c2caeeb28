use std::io::{self, Cursor, Read, Write};
use std::path::Path;

use stow_archive::{Codec, Error, ExtractOptions, extract_from_reader};

fn regular(size: usize) -> tar::Header {
    let mut header = tar::Header::new_gnu();
    header.set_entry_type(tar::EntryType::Regular);
    header.set_size(size as u64);
    header.set_mode(0o644);
    header
}

/// Append an entry whose name bypasses the builder's own path checks.
fn append_raw(builder: &mut tar::Builder<Vec<u8>>, name: &str, body: &[u8]) {
    let mut header = regular(body.len());
    let gnu = header.as_gnu_mut().unwrap();
    gnu.name[..name.len()].copy_from_slice(name.as_bytes());
    header.set_cksum();
    builder.append(&header, body).unwrap();
}

fn zstd(tar: &[u8]) -> Vec<u8> {
    zstd::stream::encode_all(Cursor::new(tar), 3).unwrap()
}

fn gzip(tar: &[u8]) -> Vec<u8> {
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(tar).unwrap();
    encoder.finish().unwrap()
}

fn sample_tree() -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());

    let mut dir = tar::Header::new_gnu();
    dir.set_entry_type(tar::EntryType::Directory);
    dir.set_size(0);
    dir.set_mode(0o755);
    builder.append_data(&mut dir, "voice/", io::empty()).unwrap();

    let mut file = regular(11);
    builder.append_data(&mut file, "voice/model.bin", &b"model bytes"[..]).unwrap();

    let mut link = tar::Header::new_gnu();
    link.set_entry_type(tar::EntryType::Symlink);
    link.set_size(0);
    builder.append_link(&mut link, "current", "voice/model.bin").unwrap();

    builder.into_inner().unwrap()
}

fn list_tree(root: &Path) -> Vec<String> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in std::fs::read_dir(&dir).unwrap() {
            let entry = entry.unwrap();
            let path = entry.path();
            let rel = path.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/");
            let ty = entry.file_type().unwrap();
            if ty.is_dir() {
                stack.push(path);
            }
            out.push(rel);
        }
    }
    out.sort();
    out
}

#[cfg(unix)]
#[test]
fn zstd_round_trip_produces_exactly_the_archived_objects() {
    let root = tempfile::tempdir().unwrap();
    let archive = zstd(&sample_tree());

    let report = extract_from_reader(Cursor::new(archive), root.path(), &ExtractOptions::new()).unwrap();

    assert_eq!(report.files, 1);
    assert_eq!(report.symlinks, 1);
    assert_eq!(report.directories, 1);
    assert_eq!(list_tree(root.path()), vec!["current", "voice", "voice/model.bin"]);

    assert!(root.path().join("voice").is_dir());
    assert_eq!(std::fs::read(root.path().join("voice/model.bin")).unwrap(), b"model bytes");
    let link = root.path().join("current");
    assert!(link.symlink_metadata().unwrap().file_type().is_symlink());
    assert_eq!(std::fs::read_link(&link).unwrap(), Path::new("voice/model.bin"));
}

#[test]
fn gzip_archive_is_detected() {
    let root = tempfile::tempdir().unwrap();
    let mut builder = tar::Builder::new(Vec::new());
    let mut file = regular(4);
    builder.append_data(&mut file, "MODEL_CARD", &b"card"[..]).unwrap();
    let archive = gzip(&builder.into_inner().unwrap());

    extract_from_reader(Cursor::new(archive), root.path(), &ExtractOptions::new()).unwrap();
    assert_eq!(std::fs::read(root.path().join("MODEL_CARD")).unwrap(), b"card");
}

#[test]
fn explicit_codec_skips_detection() {
    let root = tempfile::tempdir().unwrap();
    let mut builder = tar::Builder::new(Vec::new());
    let mut file = regular(3);
    builder.append_data(&mut file, "cfg", &b"abc"[..]).unwrap();
    let archive = zstd(&builder.into_inner().unwrap());

    let options = ExtractOptions::new().codec(Codec::Zstd);
    extract_from_reader(Cursor::new(archive), root.path(), &options).unwrap();
    assert!(root.path().join("cfg").exists());
}

#[test]
fn parent_escape_aborts_before_writing() {
    let base = tempfile::tempdir().unwrap();
    let root = base.path().join("stage");
    std::fs::create_dir(&root).unwrap();

    let mut builder = tar::Builder::new(Vec::new());
    append_raw(&mut builder, "../evil", b"pwned");
    let archive = zstd(&builder.into_inner().unwrap());

    let result = extract_from_reader(Cursor::new(archive), &root, &ExtractOptions::new());
    assert!(matches!(result, Err(Error::Escape { .. })));
    assert!(!base.path().join("evil").exists());
    assert!(list_tree(&root).is_empty());
}

#[test]
fn absolute_entry_aborts() {
    let root = tempfile::tempdir().unwrap();
    let mut builder = tar::Builder::new(Vec::new());
    append_raw(&mut builder, "/tmp/stow-absolute-entry", b"x");
    let archive = zstd(&builder.into_inner().unwrap());

    let result = extract_from_reader(Cursor::new(archive), root.path(), &ExtractOptions::new());
    assert!(matches!(result, Err(Error::Escape { .. })));
    assert!(list_tree(root.path()).is_empty());
}

#[test]
fn escape_after_valid_entries_still_fails() {
    let root = tempfile::tempdir().unwrap();
    let mut builder = tar::Builder::new(Vec::new());
    let mut ok = regular(2);
    builder.append_data(&mut ok, "fine.txt", &b"ok"[..]).unwrap();
    append_raw(&mut builder, "sub/../../escape", b"x");
    let archive = zstd(&builder.into_inner().unwrap());

    let result = extract_from_reader(Cursor::new(archive), root.path(), &ExtractOptions::new());
    assert!(matches!(result, Err(Error::Escape { .. })));
}

#[cfg(unix)]
#[test]
fn symlink_targets_are_not_sanitized() {
    let root = tempfile::tempdir().unwrap();
    let mut builder = tar::Builder::new(Vec::new());
    let mut link = tar::Header::new_gnu();
    link.set_entry_type(tar::EntryType::Symlink);
    link.set_size(0);
    builder.append_link(&mut link, "outside", "../../etc").unwrap();
    let archive = zstd(&builder.into_inner().unwrap());

    extract_from_reader(Cursor::new(archive), root.path(), &ExtractOptions::new()).unwrap();
    assert_eq!(std::fs::read_link(root.path().join("outside")).unwrap(), Path::new("../../etc"));
}

#[cfg(unix)]
#[test]
fn later_entries_below_a_symlink_are_written_through_it() {
    let outside = tempfile::tempdir().unwrap();
    let root = tempfile::tempdir().unwrap();
    let mut builder = tar::Builder::new(Vec::new());
    let mut link = tar::Header::new_gnu();
    link.set_entry_type(tar::EntryType::Symlink);
    link.set_size(0);
    builder.append_link(&mut link, "link", outside.path()).unwrap();
    builder.append_data(&mut regular(2), "link/x", &b"hi"[..]).unwrap();
    let archive = zstd(&builder.into_inner().unwrap());

    extract_from_reader(Cursor::new(archive), root.path(), &ExtractOptions::new()).unwrap();
    assert_eq!(std::fs::read(outside.path().join("x")).unwrap(), b"hi");
}

/// Yields `limit` bytes of `inner`, then fails.
struct FailAfter<R> {
    inner:     R,
    remaining: usize,
}

impl<R: Read> Read for FailAfter<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.remaining == 0 {
            return Err(io::Error::other("injected read failure"));
        }
        let len = buf.len().min(self.remaining);
        let n = self.inner.read(&mut buf[..len])?;
        self.remaining -= n;
        Ok(n)
    }
}

#[test]
fn stream_failure_mid_file_aborts() {
    let root = tempfile::tempdir().unwrap();
    let mut builder = tar::Builder::new(Vec::new());
    let body = vec![7u8; 4096];
    let mut file = regular(body.len());
    builder.append_data(&mut file, "model.bin", &body[..]).unwrap();
    let tar = builder.into_inner().unwrap();

    let reader = FailAfter {
        inner:     Cursor::new(tar),
        remaining: 1024,
    };
    let options = ExtractOptions::new().codec(Codec::None);
    let result = extract_from_reader(reader, root.path(), &options);
    assert!(matches!(result, Err(Error::Copy { .. }) | Err(Error::Read { .. })));
}

#[test]
fn truncated_archive_is_an_error() {
    let root = tempfile::tempdir().unwrap();
    let mut builder = tar::Builder::new(Vec::new());
    let body = vec![1u8; 2048];
    let mut file = regular(body.len());
    builder.append_data(&mut file, "big", &body[..]).unwrap();
    let mut tar = builder.into_inner().unwrap();
    tar.truncate(1024);

    let options = ExtractOptions::new().codec(Codec::None);
    let result = extract_from_reader(Cursor::new(tar), root.path(), &options);
    assert!(result.is_err());
}
