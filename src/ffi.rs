//! C entry point with the classic `dumb_socketpair` contract.

use crate::error::Error;
use socket2::Socket;
use std::os::raw::c_int;

cfg_if::cfg_if! {
    if #[cfg(windows)] {
        // `SOCKET` is pointer-sized, unlike std's `RawSocket`.
        pub use windows_sys::Win32::Networking::WinSock::{SOCKET as RawSocket, INVALID_SOCKET};
        use std::os::windows::io::IntoRawSocket;

        fn into_raw(socket: Socket) -> RawSocket {
            socket.into_raw_socket() as RawSocket
        }

        fn set_last_error(code: i32) {
            unsafe { windows_sys::Win32::Networking::WinSock::WSASetLastError(code) }
        }
    } else {
        pub use std::os::fd::RawFd as RawSocket;
        use std::os::fd::IntoRawFd;

        pub const INVALID_SOCKET: RawSocket = -1;

        fn into_raw(socket: Socket) -> RawSocket {
            socket.into_raw_fd()
        }

        fn set_last_error(code: i32) {
            nix::errno::Errno::set_raw(code);
        }
    }
}

pub const SOCKET_ERROR: c_int = -1;

/// Creates a connected socket pair and stores the handles in `socks`.
///
/// If `make_overlapped` is nonzero, both sockets are usable for overlapped
/// operations via `WSASend` etc. If it is zero, `socks[0]` (only) is usable
/// with regular `ReadFile` etc., and thus suitable as the stdin or stdout of a
/// child process. The overlapped flag means nothing outside Windows.
///
/// Returns `0` on success. On failure returns `SOCKET_ERROR`, sets both slots
/// to `INVALID_SOCKET` and leaves the cause in `errno` / `WSAGetLastError()`.
/// The caller owns the returned sockets and must close them with `close` /
/// `closesocket`.
///
/// # Safety
///
/// `socks` must be null or point to two writable socket slots.
#[no_mangle]
pub unsafe extern "C" fn dumb_socketpair(
    socks: *mut [RawSocket; 2],
    make_overlapped: c_int,
) -> c_int {
    let out = unsafe { socks.as_mut() };
    match fill_pair(out, || crate::socketpair(make_overlapped != 0)) {
        Ok(()) => 0,
        Err(err) => {
            if let Some(code) = err.raw_os_error() {
                set_last_error(code);
            }
            SOCKET_ERROR
        }
    }
}

fn fill_pair(
    out: Option<&mut [RawSocket; 2]>,
    create: impl FnOnce() -> Result<(Socket, Socket), Error>,
) -> Result<(), Error> {
    let out = out.ok_or(Error::Usage("null socket pair"))?;
    *out = [INVALID_SOCKET; 2];

    let (first, second) = create()?;
    *out = [into_raw(first), into_raw(second)];
    Ok(())
}
