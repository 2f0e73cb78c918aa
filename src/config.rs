use crate::cli::Args;
use socket2::Domain;
use std::{
    fmt::{self, Display, Formatter},
    path::PathBuf,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketDomain {
    Local,
    Loopback,
}

impl SocketDomain {
    pub(crate) fn as_socket2(self) -> Domain {
        match self {
            Self::Local => Domain::UNIX,
            Self::Loopback => Domain::IPV4,
        }
    }
}

impl Display for SocketDomain {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local-domain"),
            Self::Loopback => f.write_str("loopback"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindDir {
    TempDir,
    SystemTemp,
    Fixed(PathBuf),
    CurrentDir,
}

#[cfg(windows)]
pub(crate) const FALLBACK_BIND_DIR: &str = r"C:\Temp";
#[cfg(not(windows))]
pub(crate) const FALLBACK_BIND_DIR: &str = "/tmp";

#[derive(Debug, Clone)]
pub struct EmulationConfig {
    pub domains: Vec<SocketDomain>,
    pub bind_dirs: Vec<BindDir>,
}

impl Default for EmulationConfig {
    fn default() -> Self {
        Self {
            domains: vec![SocketDomain::Local, SocketDomain::Loopback],
            bind_dirs: vec![
                BindDir::TempDir,
                BindDir::SystemTemp,
                BindDir::Fixed(PathBuf::from(FALLBACK_BIND_DIR)),
                BindDir::CurrentDir,
            ],
        }
    }
}

impl EmulationConfig {
    pub fn loopback_only() -> Self {
        Self::default().with_domains([SocketDomain::Loopback])
    }

    pub fn with_domains(mut self, domains: impl IntoIterator<Item = SocketDomain>) -> Self {
        self.domains = domains.into_iter().collect();
        self
    }

    pub fn with_bind_dirs(mut self, bind_dirs: impl IntoIterator<Item = BindDir>) -> Self {
        self.bind_dirs = bind_dirs.into_iter().collect();
        self
    }
}

#[derive(Debug, Clone)]
pub(super) struct ProbeConfig {
    pub count: usize,
    pub payload: Vec<u8>,
    pub overlapped: bool,
    /// `None` uses the platform implementation.
    pub emulation: Option<EmulationConfig>,
}

impl ProbeConfig {
    pub(super) fn new(
        Args {
            count,
            payload,
            overlapped,
            emulate,
            loopback_only,
            bind_dirs,
        }: Args,
    ) -> eyre::Result<ProbeConfig> {
        if payload.is_empty() {
            eyre::bail!("Payload must not be empty");
        }

        let emulation = (emulate || loopback_only || !bind_dirs.is_empty()).then(|| {
            let mut config = if loopback_only {
                EmulationConfig::loopback_only()
            } else {
                EmulationConfig::default()
            };
            if !bind_dirs.is_empty() {
                config = config.with_bind_dirs(bind_dirs.into_iter().map(BindDir::Fixed));
            }
            config
        });

        Ok(Self {
            count,
            payload: payload.into_bytes(),
            overlapped,
            emulation,
        })
    }
}
