#![cfg(test)]

use super::*;
use crate::fd;
use crate::flags::{AccessMode, OpenFlags};
use crate::test_support::temp_path;

#[test]
fn test_table_is_sorted_for_binary_search() {
    for pair in table::FILE_SYSTEM_NAMES.windows(2) {
        assert!(
            pair[0].0 < pair[1].0,
            "table must be strictly sorted: {:?} before {:?}",
            pair[0].0,
            pair[1].0
        );
    }
}

#[test]
fn test_well_known_names_map_to_their_magic_numbers() {
    assert_eq!(file_system_type_by_name("tmpfs"), Some(0x01021994));
    assert_eq!(file_system_type_by_name("ext4"), Some(0xEF53));
    assert_eq!(file_system_type_by_name("btrfs"), Some(0x9123683E));
    assert_eq!(file_system_type_by_name("xfs"), Some(0x58465342));
    assert_eq!(file_system_type_by_name("zfs"), Some(0x2FC12FC1));
    assert_eq!(file_system_type_by_name("nfs"), Some(0x6969));
    assert_eq!(file_system_type_by_name("proc"), Some(0x9FA0));
}

#[test]
fn test_aliases_share_one_numeric_space() {
    // Different names for one filesystem family collapse to one identifier.
    assert_eq!(
        file_system_type_by_name("ext2"),
        file_system_type_by_name("ext4")
    );
    assert_eq!(
        file_system_type_by_name("fuse"),
        file_system_type_by_name("fuseblk")
    );
    assert_eq!(
        file_system_type_by_name("smb"),
        file_system_type_by_name("samba")
    );
}

#[test]
fn test_unrecognized_name_is_rejected() {
    assert_eq!(file_system_type_by_name("not-a-filesystem"), None);
    assert_eq!(file_system_type_by_name(""), None);
}

#[test]
fn test_identifier_is_stable_across_repeated_calls() {
    let path = temp_path("fstype");
    let handle = fd::open(
        &path,
        AccessMode::ReadWrite,
        OpenFlags::CREAT | OpenFlags::EXCL,
        0o644,
    )
    .expect("create");

    let first = file_system_type(handle).expect("first query");
    for _ in 0..3 {
        assert_eq!(
            file_system_type(handle).expect("repeat query"),
            first,
            "the identifier for one handle never changes between calls"
        );
    }

    fd::close(handle).expect("close");
    fd::unlink(&path).expect("unlink");
}
