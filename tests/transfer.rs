//! Transfer primitives against a real socket pair, where short writes actually happen once the
//! payload outgrows the kernel buffers.

use super::util::*;
use crate::transfer::{recv_once, send_all};
use color_eyre::eyre::Context;
use std::{io::Read, net::TcpListener, net::TcpStream, sync::Arc};

#[test]
fn send_all_delivers_every_byte_in_order() -> TestResult {
    testinit();
    let mut rng = Xorshift32::from_system_time();
    let payload: Arc<Vec<u8>> = Arc::new((0..1 << 20).map(|_| rng.next() as u8).collect());

    let listener = TcpListener::bind("127.0.0.1:0").context("loopback bind failed")?;
    let port = listener.local_addr()?.port();

    let sent = Arc::clone(&payload);
    drive_pair(
        || {
            let (mut conn, _) = listener.accept().context("accept failed")?;
            let mut received = Vec::with_capacity(payload.len());
            conn.read_to_end(&mut received).context("receive failed")?;
            ensure_eq!(received.len(), payload.len());
            ensure_eq!(received, **payload);
            Ok(())
        },
        move || {
            let mut conn =
                TcpStream::connect(("127.0.0.1", port)).context("loopback connect failed")?;
            let n = send_all(&mut conn, &sent)?;
            ensure_eq!(n, sent.len());
            Ok(())
        },
    )
}

#[test]
fn recv_once_returns_a_single_chunk() -> TestResult {
    testinit();
    let listener = TcpListener::bind("127.0.0.1:0").context("loopback bind failed")?;
    let port = listener.local_addr()?.port();

    drive_pair(
        || {
            let (mut conn, _) = listener.accept().context("accept failed")?;
            let mut buf = [0u8; 16];
            let n = recv_once(&mut conn, &mut buf)?;
            color_eyre::eyre::ensure!(n > 0, "peer closed before sending");
            ensure_eq!(&buf[..n], &b"ping"[..n]);
            Ok(())
        },
        move || {
            let mut conn =
                TcpStream::connect(("127.0.0.1", port)).context("loopback connect failed")?;
            send_all(&mut conn, b"ping")?;
            Ok(())
        },
    )
}
