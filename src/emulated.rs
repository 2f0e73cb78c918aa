//! Socket pair emulation for platforms without a native `socketpair`.

use crate::{
    config::{BindDir, EmulationConfig, SocketDomain},
    error::{Error, Step},
    path,
};
use socket2::{SockAddr, Socket, Type};
use std::{
    fs, io,
    net::{Ipv4Addr, SocketAddrV4},
    path::PathBuf,
};
use tracing::{debug, trace, warn};

#[cfg_attr(unix, allow(dead_code))]
pub(crate) fn socketpair(overlapped: bool) -> Result<(Socket, Socket), Error> {
    emulated_socketpair(overlapped, &EmulationConfig::default())
}

/// Tries each domain of `config` in order. The error is the last domain's.
pub fn emulated_socketpair(
    overlapped: bool,
    config: &EmulationConfig,
) -> Result<(Socket, Socket), Error> {
    let mut last_err = None;

    for &domain in &config.domains {
        match connect_pair(domain, overlapped, &config.bind_dirs) {
            Ok(pair) => {
                debug!("Created {domain} socket pair");
                return Ok(pair);
            }
            Err(err) => {
                warn!("{err}");
                last_err = Some(err);
            }
        }
    }

    Err(last_err.unwrap_or(Error::Usage("no socket domains to try")))
}

fn connect_pair(
    domain: SocketDomain,
    overlapped: bool,
    bind_dirs: &[BindDir],
) -> Result<(Socket, Socket), Error> {
    let listener = Socket::new(domain.as_socket2(), Type::STREAM, None)
        .map_err(Error::setup(Step::Create, domain))?;

    let bound = match domain {
        SocketDomain::Local => bind_local(&listener, bind_dirs),
        SocketDomain::Loopback => bind_loopback(&listener),
    }
    .map_err(Error::setup(Step::Bind, domain))?;
    debug!("Bound {domain} listener to {}", bound.describe());

    listener
        .listen(1)
        .map_err(Error::setup(Step::Listen, domain))?;

    let client = client_socket(domain, overlapped).map_err(Error::setup(Step::Create, domain))?;
    client
        .connect(&bound.addr)
        .map_err(Error::setup(Step::Connect, domain))?;

    let (server, _) = listener
        .accept()
        .map_err(Error::setup(Step::Accept, domain))?;

    drop(listener);
    Ok((client, server))
}

struct Bound {
    addr: SockAddr,
    path: Option<PathBuf>,
}

impl Bound {
    fn describe(&self) -> String {
        match (&self.path, self.addr.as_socket()) {
            (Some(path), _) => path.display().to_string(),
            (None, Some(addr)) => addr.to_string(),
            (None, None) => "unnamed address".to_owned(),
        }
    }
}

impl Drop for Bound {
    fn drop(&mut self) {
        if let Some(path) = &self.path {
            if let Err(err) = fs::remove_file(path) {
                trace!("Could not remove {}: {err}", path.display());
            }
        }
    }
}

fn bind_local(listener: &Socket, bind_dirs: &[BindDir]) -> io::Result<Bound> {
    let mut last_err = None;

    for dir in bind_dirs.iter().filter_map(BindDir::resolve) {
        let path = dir.join(path::socket_file_name());
        let result = SockAddr::unix(&path).and_then(|addr| {
            listener.bind(&addr)?;
            Ok(addr)
        });

        match result {
            Ok(addr) => {
                return Ok(Bound {
                    addr,
                    path: Some(path),
                })
            }
            Err(err) => {
                trace!("Cannot bind {}: {err}", path.display());
                last_err = Some(err);
            }
        }
    }

    Err(last_err.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "no usable directory to bind in")
    }))
}

fn bind_loopback(listener: &Socket) -> io::Result<Bound> {
    // Without SO_REUSEADDR, rapid repeated pairs exhaust TCP resources on Windows.
    listener.set_reuse_address(true)?;
    listener.bind(&SocketAddrV4::new(Ipv4Addr::LOCALHOST, 0).into())?;

    let mut addr = listener.local_addr()?.as_socket_ipv4().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidData, "listener has no IPv4 address")
    })?;
    // Windows getsockname may fill in only the port.
    addr.set_ip(Ipv4Addr::LOCALHOST);

    Ok(Bound {
        addr: addr.into(),
        path: None,
    })
}

#[cfg(windows)]
fn client_socket(domain: SocketDomain, overlapped: bool) -> io::Result<Socket> {
    use std::{
        os::windows::io::{FromRawSocket, RawSocket},
        ptr,
    };
    use windows_sys::Win32::Networking::WinSock::{
        WSAGetLastError, WSASocketW, INVALID_SOCKET, SOCK_STREAM, WSA_FLAG_OVERLAPPED,
    };

    let flags = if overlapped { WSA_FLAG_OVERLAPPED } else { 0 };
    // Winsock is already initialized: the listener was created through socket2.
    let raw = unsafe {
        WSASocketW(
            i32::from(domain.as_socket2()),
            SOCK_STREAM,
            0,
            ptr::null(),
            0,
            flags,
        )
    };
    if raw == INVALID_SOCKET {
        return Err(io::Error::from_raw_os_error(unsafe { WSAGetLastError() }));
    }

    Ok(unsafe { Socket::from_raw_socket(raw as RawSocket) })
}

#[cfg(not(windows))]
fn client_socket(domain: SocketDomain, _overlapped: bool) -> io::Result<Socket> {
    Socket::new(domain.as_socket2(), Type::STREAM, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loopback_bind_reports_localhost() {
        let listener = Socket::new(SocketDomain::Loopback.as_socket2(), Type::STREAM, None).unwrap();
        let bound = bind_loopback(&listener).unwrap();

        let addr = bound.addr.as_socket_ipv4().unwrap();
        assert_eq!(*addr.ip(), Ipv4Addr::LOCALHOST);
        assert_ne!(addr.port(), 0);
        assert!(bound.path.is_none());
    }

    #[test]
    fn local_bind_skips_unusable_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let listener = Socket::new(SocketDomain::Local.as_socket2(), Type::STREAM, None).unwrap();
        let dirs = [
            BindDir::Fixed(dir.path().join("missing")),
            BindDir::Fixed(dir.path().to_owned()),
        ];

        let bound = bind_local(&listener, &dirs).unwrap();
        let path = bound.path.clone().unwrap();
        assert_eq!(path.parent(), Some(dir.path()));
        assert!(path.exists());

        drop(bound);
        assert!(!path.exists());
    }

    #[test]
    fn local_bind_without_dirs_is_not_found() {
        let listener = Socket::new(SocketDomain::Local.as_socket2(), Type::STREAM, None).unwrap();
        let err = bind_local(&listener, &[]).map(|_| ()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn empty_domain_list_is_usage_error() {
        let config = EmulationConfig::default().with_domains([]);
        let err = emulated_socketpair(false, &config).unwrap_err();
        assert!(matches!(err, Error::Usage(_)));
    }
}
