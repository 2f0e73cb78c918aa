use dumb_socketpair::ffi::{dumb_socketpair, RawSocket, INVALID_SOCKET, SOCKET_ERROR};
use std::{io, os::raw::c_int, ptr};

#[test]
fn null_pair_sets_einval() {
    let ret = unsafe { dumb_socketpair(ptr::null_mut(), 0) };
    assert_eq!(ret, SOCKET_ERROR);

    #[cfg(unix)]
    assert_eq!(io::Error::last_os_error().raw_os_error(), Some(22));
}

#[cfg(unix)]
#[test]
fn raw_handles_are_connected() {
    use std::{
        io::{Read, Write},
        os::unix::net::UnixStream,
        os::fd::FromRawFd,
    };

    let mut socks: [RawSocket; 2] = [INVALID_SOCKET; 2];
    let ret = unsafe { dumb_socketpair(&mut socks, 1) };
    assert_eq!(ret, 0);
    assert!(socks.iter().all(|&fd| fd != INVALID_SOCKET));
    assert_ne!(socks[0], socks[1]);

    let mut first = unsafe { UnixStream::from_raw_fd(socks[0]) };
    let mut second = unsafe { UnixStream::from_raw_fd(socks[1]) };
    first.write_all(b"hello").unwrap();
    let mut buf = [0; 5];
    second.read_exact(&mut buf).unwrap();
    assert_eq!(&buf, b"hello");

    drop(first);
    let mut rest = Vec::new();
    second.read_to_end(&mut rest).unwrap();
    assert!(rest.is_empty());
}

#[cfg(windows)]
#[test]
fn raw_handles_are_connected() {
    use std::{
        io::{Read, Write},
        net::TcpStream,
        os::windows::io::{FromRawSocket, RawSocket as StdRawSocket},
    };

    let mut socks: [RawSocket; 2] = [INVALID_SOCKET; 2];
    let ret = unsafe { dumb_socketpair(&mut socks, 0) };
    assert_eq!(ret, 0, "{}", io::Error::last_os_error());

    // Both halves are plain stream sockets; TcpStream only wraps the handle.
    let mut first = unsafe { TcpStream::from_raw_socket(socks[0] as StdRawSocket) };
    let mut second = unsafe { TcpStream::from_raw_socket(socks[1] as StdRawSocket) };
    first.write_all(b"hello").unwrap();
    let mut buf = [0; 5];
    second.read_exact(&mut buf).unwrap();
    assert_eq!(&buf, b"hello");
}

#[test]
fn exported_symbol_matches_header() {
    type CSocketPair = unsafe extern "C" fn(*mut [RawSocket; 2], c_int) -> c_int;
    let _: CSocketPair = dumb_socketpair;

    let header = include_str!("../include/dumb_socketpair.h");
    assert!(header.contains("int dumb_socketpair(SOCKET socks[2], int make_overlapped);"));
}
