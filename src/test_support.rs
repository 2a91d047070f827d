use std::env;
use std::ffi::CString;
use std::process;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_ID: AtomicU32 = AtomicU32::new(0);

/// A unique, not-yet-existing path under the system temporary directory.
pub(crate) fn temp_path(tag: &str) -> CString {
    let dir = env::temp_dir();
    let unique = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let path = dir.join(format!("sys-native-{}-{}-{}", tag, process::id(), unique));
    CString::new(path.into_os_string().into_encoded_bytes()).expect("temp paths contain no NUL")
}
