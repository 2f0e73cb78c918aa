//! Kept in its own test binary so no other test opens descriptors meanwhile.
#![cfg(target_os = "linux")]

use dumb_socketpair::{emulated_socketpair, BindDir, EmulationConfig, SocketDomain};

fn open_fds() -> usize {
    std::fs::read_dir("/proc/self/fd").unwrap().count()
}

#[test]
fn pairs_leak_no_descriptors() {
    let dir = tempfile::tempdir().unwrap();
    let config = EmulationConfig::default()
        .with_domains([SocketDomain::Local, SocketDomain::Local])
        .with_bind_dirs([
            BindDir::Fixed(dir.path().join("missing")),
            BindDir::Fixed(dir.path().join("also-missing")),
        ]);

    let before = open_fds();
    for _ in 0..10 {
        assert!(emulated_socketpair(false, &config).is_err());
    }
    assert_eq!(open_fds(), before);

    for _ in 0..10 {
        let pair = emulated_socketpair(false, &EmulationConfig::default()).unwrap();
        drop(pair);
        let pair = dumb_socketpair::socketpair(false).unwrap();
        drop(pair);
    }
    assert_eq!(open_fds(), before);
}
