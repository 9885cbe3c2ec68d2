//! Interruption-safe transfer primitives.
//!
//! These are the only two ways this crate moves raw bytes: [`send_all`] pushes a whole buffer
//! through short writes, [`recv_once`] performs a single read. Both retry `EINTR` transparently
//! and surface every other failure immediately, with no retry policy of their own.

use std::{
    fmt::{self, Display, Formatter},
    io::{self, prelude::*},
    net::TcpStream,
};

/// Writes the whole of `buf`, looping over short writes.
///
/// A signal interrupting a write is retried without data loss. Any other error fails the call
/// immediately; the error carries how many bytes had already been sent, so "sent N then failed"
/// is distinguishable from "sent nothing". Returns `buf.len()` on success.
pub fn send_all(conn: &mut impl Write, buf: &[u8]) -> Result<usize, SendAllError> {
    let total = buf.len();
    let mut rem = buf;
    while !rem.is_empty() {
        match conn.write(rem) {
            Ok(0) => {
                let source = io::Error::new(io::ErrorKind::WriteZero, "stream made no progress");
                return Err(SendAllError { bytes_sent: total - rem.len(), source });
            }
            Ok(n) => rem = rem.get(n..).unwrap_or_default(),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => return Err(SendAllError { bytes_sent: total - rem.len(), source }),
        }
    }
    Ok(total)
}

/// Performs one read into `buf`, retrying only on signal interruption.
///
/// `Ok(0)` means the peer closed the connection; what that means is the caller's decision.
pub fn recv_once(conn: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match conn.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

/// Error type for [`send_all`].
#[derive(Debug)]
pub struct SendAllError {
    /// How many bytes made it out before the failure.
    pub bytes_sent: usize,
    /// The write error that stopped the transfer.
    pub source: io::Error,
}

impl Display for SendAllError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "send failed after {} bytes: {}", self.bytes_sent, self.source)
    }
}

impl std::error::Error for SendAllError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl From<SendAllError> for io::Error {
    fn from(e: SendAllError) -> Self {
        e.source
    }
}

/// A stream whose incoming bytes can be inspected without consuming them.
///
/// This is the seam [`read_line`](crate::line::read_line) is built on: a peek discovers where
/// the current line ends, a consuming read then takes exactly that many bytes. Test doubles
/// implement it over in-memory buffers.
pub trait PeekRecv: Read {
    /// Reads into `buf` without removing the returned bytes from the receive buffer. A later
    /// peek or read observes the same bytes again.
    fn peek(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

impl PeekRecv for TcpStream {
    fn peek(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        TcpStream::peek(self, buf)
    }
}

/// Switches a stream between blocking and non-blocking mode.
///
/// The crate itself never polls; this exists so callers that need deadlines on [`send_all`],
/// [`recv_once`] or [`read_line`](crate::line::read_line) can drive the descriptor from their
/// own readiness loop.
#[cfg(unix)]
pub fn set_nonblocking(conn: &TcpStream, nonblocking: bool) -> io::Result<()> {
    use std::os::fd::AsFd;
    crate::os::unix::c_wrappers::set_nonblocking(conn.as_fd(), nonblocking)
}
