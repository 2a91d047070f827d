#![cfg(test)]

use std::collections::BTreeSet;
use std::ffi::CString;

use super::*;
use crate::fd;
use crate::flags::{AccessMode, OpenFlags};
use crate::test_support::temp_path;

fn make_dir_with(names: &[&str]) -> CString {
    let dir = temp_path("dir");
    fd::mkdir(&dir, 0o755).expect("mkdir");
    for name in names {
        let mut path = dir.clone().into_bytes();
        path.push(b'/');
        path.extend_from_slice(name.as_bytes());
        let path = CString::new(path).expect("path");
        let handle = fd::open(
            &path,
            AccessMode::WriteOnly,
            OpenFlags::CREAT | OpenFlags::EXCL,
            0o644,
        )
        .expect("create entry");
        fd::close(handle).expect("close entry");
    }
    dir
}

fn remove_dir_with(dir: &CString, names: &[&str]) {
    for name in names {
        let mut path = dir.clone().into_bytes();
        path.push(b'/');
        path.extend_from_slice(name.as_bytes());
        fd::unlink(&CString::new(path).expect("path")).expect("unlink entry");
    }
    fd::rmdir(dir).expect("rmdir");
}

#[test]
fn test_enumeration_yields_each_entry_once_then_end_of_stream() {
    let names = ["alpha", "beta", "gamma"];
    let dir = make_dir_with(&names);

    let mut stream = DirectoryStream::open(&dir).expect("open stream");
    let mut buf = DirBuffer::new();
    let mut seen = BTreeSet::new();

    loop {
        match stream.read(&mut buf).expect("read") {
            Some(entry) => {
                let name = entry.name().to_str().expect("utf8").to_owned();
                assert_eq!(entry.name_len(), name.len());
                if name == "." || name == ".." {
                    continue;
                }
                assert!(
                    seen.insert(name),
                    "no entry may be repeated within one enumeration"
                );
            }
            None => break,
        }
    }

    assert_eq!(
        seen,
        names.iter().map(|n| (*n).to_owned()).collect::<BTreeSet<_>>(),
        "every entry appears exactly once before end of stream"
    );

    // Past the end the stream keeps reporting end of stream.
    assert!(stream.read(&mut buf).expect("read past end").is_none());

    stream.close().expect("close");
    remove_dir_with(&dir, &names);
}

#[test]
fn test_entry_types_are_native_or_unknown() {
    let names = ["typed"];
    let dir = make_dir_with(&names);

    let mut stream = DirectoryStream::open(&dir).expect("open stream");
    let mut buf = DirBuffer::new();
    while let Some(entry) = stream.read(&mut buf).expect("read") {
        let name = entry.name().to_str().expect("utf8");
        if name == "typed" {
            // Filesystems may legitimately decline to record a type.
            assert!(
                matches!(entry.inode_type(), InodeType::Regular | InodeType::Unknown),
                "a plain file reports Regular, or Unknown where the \
                 filesystem records no types"
            );
        }
    }
    stream.close().expect("close");
    remove_dir_with(&dir, &names);
}

#[test]
#[cfg(all(
    not(debug_assertions),
    any(
        target_os = "linux",
        target_os = "android",
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
    )
))]
fn test_undersized_buffer_is_a_contract_violation() {
    let names = ["entry"];
    let dir = make_dir_with(&names);

    let mut stream = DirectoryStream::open(&dir).expect("open stream");
    let mut buf = DirBuffer::with_capacity(4);
    assert!(
        matches!(
            stream.read(&mut buf),
            Err(crate::ReadDirError::UndersizedBuffer(_))
        ),
        "an undersized buffer is rejected before anything is read"
    );

    stream.close().expect("close");
    remove_dir_with(&dir, &names);
}

#[test]
fn test_open_missing_directory_forwards_not_found() {
    let path = CString::new("/definitely/not/a/real/directory").expect("cstring");
    assert!(matches!(
        DirectoryStream::open(&path),
        Err(crate::OsError(libc::ENOENT))
    ));
}
