use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(about = "Create connected local socket pairs and push bytes through them")]
pub struct Args {
    /// Number of socket pairs to create
    #[clap(long, default_value_t = 1)]
    pub(super) count: usize,

    /// Bytes to send across each pair
    #[clap(long, default_value = "hello")]
    pub(super) payload: String,

    /// Request overlapped-capable sockets (Windows only)
    #[clap(long)]
    pub(super) overlapped: bool,

    /// Use the listener/connect emulation even where a native socketpair exists
    #[clap(long)]
    pub(super) emulate: bool,

    /// Skip the local-domain attempt and go straight to loopback TCP
    #[clap(long)]
    pub(super) loopback_only: bool,

    /// Directory to bind local-domain sockets in; may be repeated
    #[clap(long = "bind-dir")]
    pub(super) bind_dirs: Vec<PathBuf>,
}
