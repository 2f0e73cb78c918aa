use crate::config::BindDir;
use std::{
    path::PathBuf,
    process,
    sync::atomic::{AtomicU64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

impl BindDir {
    pub(crate) fn resolve(&self) -> Option<PathBuf> {
        match self {
            Self::TempDir => Some(std::env::temp_dir()),
            Self::SystemTemp => system_temp_dir(),
            Self::Fixed(path) => Some(path.clone()),
            Self::CurrentDir => Some(PathBuf::new()),
        }
    }
}

/// File name for a listener socket: clock ticks, process id, and a
/// per-process sequence number so concurrent callers never share a name.
pub(crate) fn socket_file_name() -> String {
    let ticks = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos() as u64);
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{ticks:x}-{pid}-{seq}.sock", pid = process::id())
}

#[cfg(windows)]
fn system_temp_dir() -> Option<PathBuf> {
    use std::{ffi::OsString, os::windows::ffi::OsStringExt};
    use windows_sys::Win32::{Foundation::MAX_PATH, System::SystemInformation::GetWindowsDirectoryW};

    let mut buf = [0u16; MAX_PATH as usize];
    let len = unsafe { GetWindowsDirectoryW(buf.as_mut_ptr(), buf.len() as u32) } as usize;
    if len == 0 || len >= buf.len() {
        return None;
    }
    Some(PathBuf::from(OsString::from_wide(&buf[..len])).join("Temp"))
}

#[cfg(not(windows))]
fn system_temp_dir() -> Option<PathBuf> {
    Some(PathBuf::from("/var/tmp"))
}
