#![cfg(test)]

use std::ffi::CString;

use super::*;
use crate::error::OsError;
use crate::flags::{AccessCheck, AccessMode, FdFlags, FlockKind, OpenFlags, SeekWhence};
use crate::test_support::temp_path;

fn create(path: &CString, mode: u32) -> Fd {
    open(path, AccessMode::ReadWrite, OpenFlags::CREAT | OpenFlags::EXCL, mode).expect("create")
}

#[test]
fn test_open_missing_path_forwards_not_found() {
    let path = CString::new("/definitely/not/a/real/file").expect("cstring");
    assert_eq!(
        open(&path, AccessMode::ReadOnly, OpenFlags::empty(), 0),
        Err(OsError(libc::ENOENT))
    );
}

#[test]
fn test_exclusive_create_succeeds_once() {
    let path = temp_path("excl");
    let first = create(&path, 0o644);

    assert_eq!(
        open(&path, AccessMode::ReadWrite, OpenFlags::CREAT | OpenFlags::EXCL, 0o644),
        Err(OsError(libc::EEXIST)),
        "a second exclusive create of the same path must report already-exists"
    );

    close(first).expect("close");
    unlink(&path).expect("unlink");
}

#[test]
fn test_close_of_invalid_handle_is_a_defined_error() {
    let path = temp_path("close-twice");
    let handle = create(&path, 0o644);
    close(handle).expect("first close");
    assert_eq!(close(handle), Err(OsError(libc::EBADF)));
    unlink(&path).expect("unlink");
}

#[test]
fn test_open_with_cloexec_sets_the_descriptor_flag() {
    let path = temp_path("cloexec");
    let handle = open(
        &path,
        AccessMode::WriteOnly,
        OpenFlags::CREAT | OpenFlags::EXCL | OpenFlags::CLOEXEC,
        0o644,
    )
    .expect("create");
    assert_eq!(get_fd_flags(handle).expect("getfd"), FdFlags::CLOEXEC);

    close(handle).expect("close");
    unlink(&path).expect("unlink");
}

#[test]
fn test_dup_is_always_cloexec() {
    let path = temp_path("dup");
    let handle = create(&path, 0o644);
    assert_eq!(get_fd_flags(handle).expect("getfd"), FdFlags::empty());

    let duplicate = dup(handle).expect("dup");
    assert_ne!(duplicate, handle);
    assert_eq!(
        get_fd_flags(duplicate).expect("getfd dup"),
        FdFlags::CLOEXEC,
        "duplicates are close-on-exec regardless of the original"
    );

    close(duplicate).expect("close dup");
    close(handle).expect("close");
    unlink(&path).expect("unlink");
}

#[test]
fn test_pipe_round_trip_and_flags() {
    let (read_end, write_end) = pipe(true).expect("pipe");
    assert_eq!(get_fd_flags(read_end).expect("getfd"), FdFlags::CLOEXEC);
    assert_eq!(get_fd_flags(write_end).expect("getfd"), FdFlags::CLOEXEC);

    assert_eq!(write(write_end, b"through the pipe").expect("write"), 16);
    let mut buf = [0u8; 16];
    assert_eq!(read(read_end, &mut buf).expect("read"), 16);
    assert_eq!(&buf, b"through the pipe");

    close(read_end).expect("close read end");
    close(write_end).expect("close write end");
}

#[test]
fn test_non_blocking_mode_round_trip() {
    let (read_end, write_end) = pipe(false).expect("pipe");
    assert!(!get_is_non_blocking(read_end).expect("query"));

    set_is_non_blocking(read_end, true).expect("enable");
    assert!(get_is_non_blocking(read_end).expect("query enabled"));
    assert_eq!(
        read(read_end, &mut [0u8; 8]),
        Err(OsError(libc::EAGAIN)),
        "an empty non-blocking pipe reports would-block instead of blocking"
    );

    set_is_non_blocking(read_end, false).expect("disable");
    assert!(!get_is_non_blocking(read_end).expect("query disabled"));

    close(read_end).expect("close read end");
    close(write_end).expect("close write end");
}

#[test]
fn test_pipe_size_is_gated_and_adjustable() {
    let (read_end, write_end) = pipe(false).expect("pipe");

    if crate::caps::can_get_set_pipe_size() {
        set_pipe_size(write_end, 64 * 1024).expect("set size");
        let size = get_pipe_size(write_end).expect("get size");
        assert!(size >= 64 * 1024, "the kernel may round up, never down");
    } else {
        assert!(matches!(
            get_pipe_size(write_end),
            Err(crate::GatedError::NotSupported(_))
        ));
    }

    close(read_end).expect("close read end");
    close(write_end).expect("close write end");
}

#[test]
fn test_directory_lifecycle() {
    let dir = temp_path("lifecycle-dir");
    mkdir(&dir, 0o755).expect("mkdir");
    access(&dir, AccessCheck::READ | AccessCheck::EXECUTE).expect("access");

    let renamed = temp_path("lifecycle-dir-renamed");
    rename(&dir, &renamed).expect("rename");
    assert_eq!(
        access(&dir, AccessCheck::empty()),
        Err(OsError(libc::ENOENT)),
        "the old name is gone after a rename"
    );

    rmdir(&renamed).expect("rmdir");
}

#[test]
fn test_symlink_read_link_and_real_path() {
    let target = temp_path("link-target");
    let link = temp_path("link-name");
    let handle = create(&target, 0o644);
    close(handle).expect("close");

    symlink(&target, &link).expect("symlink");

    let mut buf = [0u8; 512];
    let len = read_link(&link, &mut buf).expect("read_link");
    assert_eq!(&buf[..len], target.to_bytes());

    assert_eq!(
        real_path(&link).expect("real_path"),
        real_path(&target).expect("real_path target"),
        "resolving the link and the target lands on one canonical path"
    );

    unlink(&link).expect("unlink link");
    unlink(&target).expect("unlink target");
}

#[test]
fn test_hard_link_shares_the_inode() {
    let original = temp_path("hard-original");
    let alias = temp_path("hard-alias");
    let handle = create(&original, 0o644);
    write(handle, b"shared").expect("write");

    link(&original, &alias).expect("link");
    let a = crate::stat::stat(&original).expect("stat original");
    let b = crate::stat::stat(&alias).expect("stat alias");
    assert_eq!((a.dev, a.ino), (b.dev, b.ino));

    close(handle).expect("close");
    unlink(&alias).expect("unlink alias");
    unlink(&original).expect("unlink original");
}

#[test]
fn test_chmod_changes_are_visible_in_status() {
    let path = temp_path("chmod");
    let handle = create(&path, 0o644);

    chmod(&path, 0o600).expect("chmod");
    assert_eq!(crate::stat::fstat(handle).expect("fstat").mode & 0o777, 0o600);

    fchmod(handle, 0o751).expect("fchmod");
    assert_eq!(crate::stat::fstat(handle).expect("fstat").mode & 0o777, 0o751);

    close(handle).expect("close");
    unlink(&path).expect("unlink");
}

#[test]
fn test_truncate_allocate_and_seek() {
    let path = temp_path("truncate");
    let handle = create(&path, 0o644);

    ftruncate(handle, 4096).expect("extend");
    assert_eq!(crate::stat::fstat(handle).expect("fstat").size, 4096);
    ftruncate(handle, 10).expect("shrink");
    assert_eq!(crate::stat::fstat(handle).expect("fstat").size, 10);

    // Reserving space never changes the apparent size; filesystems without
    // the capability report their refusal as a plain OS error.
    match fallocate(handle, 0, 1 << 20) {
        Ok(()) => assert_eq!(crate::stat::fstat(handle).expect("fstat").size, 10),
        Err(crate::GatedError::NotSupported(_)) => {}
        Err(crate::GatedError::Os(OsError(libc::EOPNOTSUPP))) => {}
        Err(other) => panic!("unexpected fallocate failure: {other}"),
    }

    assert_eq!(lseek(handle, 0, SeekWhence::End).expect("seek end"), 10);
    assert_eq!(lseek(handle, 2, SeekWhence::Begin).expect("seek set"), 2);
    assert_eq!(lseek(handle, 3, SeekWhence::Current).expect("seek cur"), 5);

    close(handle).expect("close");
    unlink(&path).expect("unlink");
}

#[test]
fn test_fsync_flushes_without_error() {
    let path = temp_path("fsync");
    let handle = create(&path, 0o644);
    write(handle, b"durable").expect("write");
    fsync(handle).expect("fsync");
    close(handle).expect("close");
    unlink(&path).expect("unlink");
}

#[test]
fn test_flock_cycle() {
    let path = temp_path("flock");
    let handle = create(&path, 0o644);

    flock(handle, FlockKind::Exclusive, true).expect("exclusive");
    flock(handle, FlockKind::Shared, true).expect("downgrade");
    flock(handle, FlockKind::Unlock, false).expect("unlock");

    close(handle).expect("close");
    unlink(&path).expect("unlink");
}

#[test]
fn test_mks_temps_creates_a_unique_file() {
    let mut template = temp_path("mkstemp").into_bytes();
    template.extend_from_slice(b"-XXXXXX.tmp");
    template.push(0);
    let placeholder = template.clone();

    let handle = mks_temps(&mut template, 4).expect("mks_temps");
    assert_ne!(template, placeholder, "the placeholder section is rewritten");
    assert_eq!(&template[template.len() - 5..], b".tmp\0", "the suffix survives");

    write(handle, b"temp content").expect("write");
    close(handle).expect("close");

    let path = CString::new(&template[..template.len() - 1]).expect("path");
    unlink(&path).expect("unlink");
}

#[test]
fn test_shm_lifecycle_where_supported() {
    if !crate::caps::has_shared_memory_objects() {
        return;
    }
    let name = CString::new(format!("/sys-native-shm-{}", std::process::id())).expect("name");

    let handle = match shm_open(
        &name,
        AccessMode::ReadWrite,
        OpenFlags::CREAT | OpenFlags::EXCL,
        0o600,
    ) {
        Ok(handle) => handle,
        // Some build sandboxes mount /dev/shm read-only.
        Err(crate::GatedError::Os(OsError(libc::EACCES | libc::EROFS))) => return,
        Err(other) => panic!("shm_open failed: {other}"),
    };

    ftruncate(handle, 128).expect("size the object");
    close(handle).expect("close");
    shm_unlink(&name).expect("shm_unlink");
}

#[test]
fn test_peer_euid_on_a_local_socket_pair() {
    let mut pair = [0 as std::os::fd::RawFd; 2];
    // SAFETY: pair points to two writable descriptor slots.
    let ret = unsafe {
        libc::socketpair(libc::AF_UNIX, libc::SOCK_STREAM, 0, pair.as_mut_ptr())
    };
    assert_eq!(ret, 0);
    let (a, b) = (Fd::from_raw(pair[0]), Fd::from_raw(pair[1]));

    // SAFETY: geteuid cannot fail.
    let expected = unsafe { libc::geteuid() };
    match peer_euid(a) {
        Ok(uid) => assert_eq!(uid, expected),
        Err(crate::GatedError::NotSupported(_)) => {}
        Err(other) => panic!("peer credential lookup failed: {other}"),
    }

    close(a).expect("close a");
    close(b).expect("close b");
}

#[test]
fn test_sync_returns() {
    sync();
}
