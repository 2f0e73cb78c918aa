use crate::error::Error;
use nix::sys::socket::{socketpair as nix_socketpair, AddressFamily, SockFlag, SockType};
use socket2::Socket;

#[cfg(any(target_os = "linux", target_os = "android"))]
const FLAGS: SockFlag = SockFlag::SOCK_CLOEXEC;
#[cfg(not(any(target_os = "linux", target_os = "android")))]
const FLAGS: SockFlag = SockFlag::empty();

/// `socketpair(AF_UNIX, SOCK_STREAM, 0)`. There is no overlapped I/O here,
/// so the flag is accepted and ignored.
pub(crate) fn socketpair(_overlapped: bool) -> Result<(Socket, Socket), Error> {
    let (first, second) = nix_socketpair(
        AddressFamily::Unix,
        SockType::Stream,
        None, // Use the default protocol for the SockType
        FLAGS,
    )
    .map_err(|errno| Error::Native(errno.into()))?;

    Ok((Socket::from(first), Socket::from(second)))
}
