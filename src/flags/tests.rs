#![cfg(test)]

use super::*;

#[test]
fn test_open_decode_totality() {
    for (raw, mode) in [
        (0, AccessMode::ReadOnly),
        (1, AccessMode::WriteOnly),
        (2, AccessMode::ReadWrite),
    ] {
        assert_eq!(
            AccessMode::from_raw(raw),
            Ok(mode),
            "every documented access-mode encoding must decode"
        );
    }

    let all = OpenFlags::CLOEXEC | OpenFlags::CREAT | OpenFlags::EXCL | OpenFlags::TRUNC | OpenFlags::SYNC;
    let (access, flags) = decode_open(2 | all.bits()).expect("full recognized encoding must decode");
    assert_eq!(access, AccessMode::ReadWrite);
    assert_eq!(flags, all);
}

#[test]
#[cfg(not(debug_assertions))]
fn test_open_decode_rejects_unknown_bits() {
    assert_eq!(decode_open(0x0200), Err(crate::UnknownBitsError));
    assert_eq!(decode_open(0x3), Err(crate::UnknownBitsError), "access mode 3 is not recognized");
}

#[test]
fn test_open_translation_is_deterministic() {
    assert_eq!(AccessMode::ReadOnly.to_native(), libc::O_RDONLY);
    assert_eq!(AccessMode::WriteOnly.to_native(), libc::O_WRONLY);
    assert_eq!(AccessMode::ReadWrite.to_native(), libc::O_RDWR);

    assert_eq!(OpenFlags::CLOEXEC.to_native(), libc::O_CLOEXEC);
    assert_eq!(OpenFlags::CREAT.to_native(), libc::O_CREAT);
    assert_eq!(OpenFlags::EXCL.to_native(), libc::O_EXCL);
    assert_eq!(OpenFlags::TRUNC.to_native(), libc::O_TRUNC);
    assert_eq!(OpenFlags::SYNC.to_native(), libc::O_SYNC);
    assert_eq!(
        (OpenFlags::CREAT | OpenFlags::EXCL).to_native(),
        libc::O_CREAT | libc::O_EXCL,
        "translation must distribute over unions"
    );
}

#[test]
fn test_protection_translation() {
    assert_eq!(Protection::empty().to_native(), libc::PROT_NONE);
    assert_eq!(Protection::READ.to_native(), libc::PROT_READ);
    assert_eq!(Protection::WRITE.to_native(), libc::PROT_WRITE);
    assert_eq!(Protection::EXEC.to_native(), libc::PROT_EXEC);
    assert_eq!(
        (Protection::READ | Protection::WRITE).to_native(),
        libc::PROT_READ | libc::PROT_WRITE
    );
    assert_eq!(Protection::from_bits(0x8), None, "bits outside the table are rejected");
}

#[test]
fn test_map_flags_translation() {
    assert_eq!(MapFlags::SHARED.to_native(), libc::MAP_SHARED);
    assert_eq!(MapFlags::PRIVATE.to_native(), libc::MAP_PRIVATE);
    assert_eq!(
        (MapFlags::ANONYMOUS | MapFlags::PRIVATE).to_native(),
        libc::MAP_ANON | libc::MAP_PRIVATE
    );
    assert_eq!(MapFlags::from_bits(0x4), None);
}

#[test]
fn test_msync_translation() {
    assert_eq!(MSyncFlags::SYNC.to_native(), libc::MS_SYNC);
    assert_eq!(MSyncFlags::ASYNC.to_native(), libc::MS_ASYNC);
    assert_eq!(MSyncFlags::INVALIDATE.to_native(), libc::MS_INVALIDATE);
    assert_eq!(MSyncFlags::from_bits(0x8), None);
}

#[test]
fn test_access_check_translation() {
    assert_eq!(AccessCheck::empty().to_native(), libc::F_OK);
    assert_eq!(AccessCheck::EXECUTE.to_native(), libc::X_OK);
    assert_eq!(AccessCheck::WRITE.to_native(), libc::W_OK);
    assert_eq!(AccessCheck::READ.to_native(), libc::R_OK);
}

#[test]
fn test_fd_flags_round_trip() {
    assert_eq!(FdFlags::CLOEXEC.to_native(), libc::FD_CLOEXEC);
    assert_eq!(FdFlags::from_native(libc::FD_CLOEXEC), FdFlags::CLOEXEC);
    assert_eq!(FdFlags::from_native(0), FdFlags::empty());
}

#[test]
fn test_lock_kind_is_a_table_not_a_cast() {
    assert_eq!(LockKind::from_raw(0), Ok(LockKind::Read));
    assert_eq!(LockKind::from_raw(1), Ok(LockKind::Write));
    assert_eq!(LockKind::from_raw(2), Ok(LockKind::Unlock));
    assert_eq!(LockKind::Read.to_native(), libc::F_RDLCK as libc::c_short);
    assert_eq!(LockKind::Write.to_native(), libc::F_WRLCK as libc::c_short);
    assert_eq!(LockKind::Unlock.to_native(), libc::F_UNLCK as libc::c_short);
}

#[test]
#[cfg(not(debug_assertions))]
fn test_enum_decoders_reject_unknown_values() {
    assert_eq!(LockKind::from_raw(3), Err(crate::UnknownBitsError));
    assert_eq!(SeekWhence::from_raw(3), Err(crate::UnknownBitsError));
    assert_eq!(FileAdvice::from_raw(6), Err(crate::UnknownBitsError));
    assert_eq!(MemAdvice::from_raw(1), Err(crate::UnknownBitsError));
    assert_eq!(SysConfName::from_raw(2), Err(crate::UnknownBitsError));
}

#[test]
fn test_seek_whence_translation() {
    assert_eq!(SeekWhence::Begin.to_native(), libc::SEEK_SET);
    assert_eq!(SeekWhence::Current.to_native(), libc::SEEK_CUR);
    assert_eq!(SeekWhence::End.to_native(), libc::SEEK_END);
}

#[test]
fn test_flock_translation() {
    assert_eq!(FlockKind::Shared.to_native(false), libc::LOCK_SH);
    assert_eq!(FlockKind::Exclusive.to_native(true), libc::LOCK_EX | libc::LOCK_NB);
    assert_eq!(FlockKind::Unlock.to_native(false), libc::LOCK_UN);
}

#[test]
#[cfg(any(target_os = "linux", target_os = "android", target_os = "freebsd"))]
fn test_file_advice_translation() {
    assert_eq!(FileAdvice::Normal.to_native(), libc::POSIX_FADV_NORMAL);
    assert_eq!(FileAdvice::Random.to_native(), libc::POSIX_FADV_RANDOM);
    assert_eq!(FileAdvice::Sequential.to_native(), libc::POSIX_FADV_SEQUENTIAL);
    assert_eq!(FileAdvice::WillNeed.to_native(), libc::POSIX_FADV_WILLNEED);
    assert_eq!(FileAdvice::DontNeed.to_native(), libc::POSIX_FADV_DONTNEED);
    assert_eq!(FileAdvice::NoReuse.to_native(), libc::POSIX_FADV_NOREUSE);
}
