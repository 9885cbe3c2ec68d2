//! Test utilities for pairing a loopback server with a client thread and for finding a port the
//! listener factory can actually bind.
#![allow(dead_code, unused_macros)]

#[macro_use]
mod eyre;
mod xorshift;

pub use {eyre::*, xorshift::*};

use color_eyre::eyre::{bail, eyre, WrapErr};
use std::{io, thread};

pub fn testinit() {
    eyre::install();
}

/// Runs `server` on the calling thread and `client` on its own, reporting both failures.
///
/// The caller binds its listener before calling this, so the client cannot race the bind.
pub fn drive_pair(
    server: impl FnOnce() -> TestResult,
    client: impl (FnOnce() -> TestResult) + Send + 'static,
) -> TestResult {
    let client = thread::spawn(client);
    let server_result = server();
    let client_result = client.join().map_err(|_| eyre!("client thread panicked"))?;
    server_result?;
    client_result
}

/// Binds through `bindfn` on ports drawn from `ports`, skipping ports somebody else holds.
pub fn bind_and_pick_port<L>(
    ports: &mut PortGen,
    mut bindfn: impl FnMut(u16) -> io::Result<L>,
) -> TestResult<(u16, L)> {
    use io::ErrorKind::*;
    for _ in 0..16 {
        let port = ports.next();
        match bindfn(port) {
            Ok(listener) => return Ok((port, listener)),
            Err(e) if matches!(e.kind(), AddrInUse | PermissionDenied) => {
                eprintln!("port {port} unavailable (\"{}\"), skipping", e.kind());
            }
            Err(e) => return Err(e).context("listener bind failed"),
        }
    }
    bail!("could not find a bindable port in 16 tries");
}
