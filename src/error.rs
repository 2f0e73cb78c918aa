use crate::config::SocketDomain;
use std::{
    fmt::{self, Display, Formatter},
    io,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Create,
    Bind,
    Listen,
    Connect,
    Accept,
}

impl Display for Step {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Create => "create socket",
            Self::Bind => "bind listener",
            Self::Listen => "listen",
            Self::Connect => "connect",
            Self::Accept => "accept",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub enum Error {
    Usage(&'static str),
    Setup {
        step: Step,
        domain: SocketDomain,
        source: io::Error,
    },
    Native(io::Error),
}

impl Error {
    pub(crate) fn setup(step: Step, domain: SocketDomain) -> impl FnOnce(io::Error) -> Self {
        move |source| Self::Setup {
            step,
            domain,
            source,
        }
    }

    pub fn step(&self) -> Option<Step> {
        match self {
            Self::Setup { step, .. } => Some(*step),
            _ => None,
        }
    }

    pub fn domain(&self) -> Option<SocketDomain> {
        match self {
            Self::Setup { domain, .. } => Some(*domain),
            _ => None,
        }
    }

    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Self::Usage(_) => Some(EINVAL),
            Self::Setup { source, .. } | Self::Native(source) => source.raw_os_error(),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Usage(reason) => write!(f, "invalid argument: {reason}"),
            Self::Setup {
                step,
                domain,
                source,
            } => write!(f, "{domain} socket pair: failed to {step}: {source}"),
            Self::Native(source) => write!(f, "socketpair: {source}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Usage(_) => None,
            Self::Setup { source, .. } | Self::Native(source) => Some(source),
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Usage(_) => io::Error::from_raw_os_error(EINVAL),
            Error::Setup { source, .. } | Error::Native(source) => source,
        }
    }
}

cfg_if::cfg_if! {
    if #[cfg(windows)] {
        pub(crate) const EINVAL: i32 = windows_sys::Win32::Networking::WinSock::WSAEINVAL;
    } else {
        pub(crate) const EINVAL: i32 = nix::errno::Errno::EINVAL as i32;
    }
}
