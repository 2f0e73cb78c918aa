use crate::{config::ProbeConfig, emulated_socketpair};
use eyre::{ensure, WrapErr};
use socket2::Socket;
use std::io::{Read, Write};
use tracing::{debug, info};

pub(super) fn send(socket: &Socket, payload: &[u8]) -> eyre::Result<()> {
    (&*socket)
        .write_all(payload)
        .wrap_err_with(|| format!("Failed to send {} bytes through socket", payload.len()))?;
    Ok(())
}

pub(super) fn recv(socket: &Socket, len: usize) -> eyre::Result<Vec<u8>> {
    let mut buf = vec![0; len];
    (&*socket)
        .read_exact(&mut buf)
        .wrap_err_with(|| format!("Failed to recv {len} bytes through socket"))?;
    Ok(buf)
}

fn expect_eof(socket: &Socket) -> eyre::Result<()> {
    let mut buf = [0];
    let read = (&*socket)
        .read(&mut buf)
        .wrap_err("Failed to read end of stream")?;
    ensure!(read == 0, "Expected end of stream, read {read} more bytes");
    Ok(())
}

#[derive(Debug)]
pub(super) struct Probe {
    config: ProbeConfig,
}

impl Probe {
    pub(super) fn new(config: ProbeConfig) -> Self {
        Self { config }
    }

    fn open_pair(&self) -> eyre::Result<(Socket, Socket)> {
        let pair = match &self.config.emulation {
            Some(emulation) => emulated_socketpair(self.config.overlapped, emulation)?,
            None => crate::socketpair(self.config.overlapped)?,
        };
        Ok(pair)
    }

    /// Sends the payload both ways, then closes the first handle and checks
    /// that the second one sees end of stream.
    pub(super) fn check_pair(&self, first: Socket, second: Socket) -> eyre::Result<()> {
        let payload = &self.config.payload;

        send(&first, payload)?;
        let received = recv(&second, payload.len())?;
        ensure!(&received == payload, "Payload was corrupted from first to second");

        send(&second, payload)?;
        let received = recv(&first, payload.len())?;
        ensure!(&received == payload, "Payload was corrupted from second to first");

        drop(first);
        expect_eof(&second)
    }

    pub(super) fn run(&self) -> eyre::Result<()> {
        for index in 0..self.config.count {
            let (first, second) = self
                .open_pair()
                .wrap_err_with(|| format!("Failed to create socket pair #{index}"))?;
            debug!(
                "Pair #{index}: {:?} <-> {:?}",
                first.local_addr().ok().map(|addr| addr.domain()),
                second.local_addr().ok().map(|addr| addr.domain())
            );

            self.check_pair(first, second)
                .wrap_err_with(|| format!("Socket pair #{index} is not connected"))?;
            info!("Socket pair #{index} passed {} bytes each way", self.config.payload.len());
        }

        Ok(())
    }
}
