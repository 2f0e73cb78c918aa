//! Connected pairs of local stream sockets on every platform.
//!
//! Unix hosts get the native `socketpair(AF_UNIX, SOCK_STREAM)`. Elsewhere the
//! pair is emulated with a listener that accepts exactly one connection from a
//! locally created client, over `AF_UNIX` when the host supports it and over
//! loopback TCP otherwise.

mod cli;
mod config;
mod emulated;
mod error;
pub mod ffi;
mod path;
mod probe;

#[cfg(all(not(unix), not(windows)))]
compile_error!("Only unix and windows support dumb-socketpair!");

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        mod native;
        use native as platform;
    } else {
        use emulated as platform;
    }
}

pub use cli::Args;
pub use config::{BindDir, EmulationConfig, SocketDomain};
pub use emulated::emulated_socketpair;
pub use error::{Error, Step};
pub use ffi::dumb_socketpair;
pub use socket2::Socket;

use config::ProbeConfig;
use probe::Probe;
use tracing::debug;

/// Creates two sockets connected to each other.
///
/// `overlapped` asks for both sockets to support overlapped I/O on Windows;
/// without it only the first one is guaranteed to work with plain file I/O.
/// The flag is ignored on Unix, where the native `socketpair` is used.
pub fn socketpair(overlapped: bool) -> Result<(Socket, Socket), Error> {
    platform::socketpair(overlapped)
}

pub fn start(args: Args) -> eyre::Result<()> {
    let config = ProbeConfig::new(args)?;
    debug!("Probing with {config:?}");

    Probe::new(config).run()?;

    debug!("All socket pairs passed");
    Ok(())
}
