//! The non-destructive line reader.
//!
//! A relay that speaks a line-oriented preamble followed by a raw message body cannot afford a
//! buffered reader: any bytes a `BufReader` slurps past the newline are bytes the body read
//! will never see. [`read_line`] instead peeks at the incoming stream to find out how many
//! bytes belong to the current line, then issues a consuming read for exactly that many. After
//! it returns, the stream position is one byte past the line's trailing newline and nothing
//! beyond it has been consumed.

use crate::transfer::{recv_once, PeekRecv};
use std::{
    collections::TryReserveError,
    fmt::{self, Display, Formatter},
    io,
};

/// How many bytes each peek inspects at most.
pub const PEEK_WINDOW: usize = 512;
/// Hard ceiling on the length of a single line, terminator included.
///
/// A peer that never sends a newline is bounded by this, not by a timeout.
pub const MAX_LINE_LEN: usize = 128 * 1024;

/// Reads exactly one newline-terminated line from `conn`.
///
/// Returns `Ok(None)` if the peer closed the connection before any byte of the line arrived,
/// and `Ok(Some(line))` otherwise, with the trailing `\n` included in the buffer. The stream is
/// left positioned exactly one byte past that newline; no later byte is consumed, so a raw read
/// of a message body can follow immediately.
///
/// A connection closed mid-line (some bytes arrived, then end of stream, no newline) is
/// [`ReadLineError::ClosedMidLine`], not a silently truncated line. Lines longer than
/// [`MAX_LINE_LEN`] fail with [`ReadLineError::TooLong`]. Partial state is dropped on every
/// failure path.
pub fn read_line(conn: &mut impl PeekRecv) -> Result<Option<Vec<u8>>, ReadLineError> {
    let mut window = [0u8; PEEK_WINDOW];
    let mut line = Vec::new();
    loop {
        let peeked = peek_retrying(conn, &mut window)?;
        if peeked == 0 {
            // End of stream. Before any data it is a clean close; after, the line is torn.
            return if line.is_empty() { Ok(None) } else { Err(ReadLineError::ClosedMidLine) };
        }
        let newline = window[..peeked].iter().position(|&b| b == b'\n');
        let take = match newline {
            Some(k) => k + 1,
            None => peeked,
        };

        if line.len() + take > MAX_LINE_LEN {
            return Err(ReadLineError::TooLong);
        }
        line.try_reserve_exact(take)?;
        consume_exact(conn, &mut line, take)?;

        if newline.is_some() {
            return Ok(Some(line));
        }
    }
}

/// One peek, with the same interruption policy as [`recv_once`].
fn peek_retrying(conn: &mut impl PeekRecv, buf: &mut [u8]) -> Result<usize, ReadLineError> {
    loop {
        match conn.peek(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            other => return other.map_err(ReadLineError::Io),
        }
    }
}

/// Consuming read of exactly `count` bytes, appended to `line`.
///
/// The bytes were just seen by a peek, but a short read is still possible; loop until the
/// count is satisfied. `line` has capacity reserved for `count` already, so no allocation
/// happens here.
fn consume_exact(
    conn: &mut impl PeekRecv,
    line: &mut Vec<u8>,
    mut count: usize,
) -> Result<(), ReadLineError> {
    let mut chunk = [0u8; PEEK_WINDOW];
    while count > 0 {
        let cap = count.min(PEEK_WINDOW);
        let n = recv_once(conn, &mut chunk[..cap]).map_err(ReadLineError::Io)?;
        if n == 0 {
            return Err(ReadLineError::ClosedMidLine);
        }
        line.extend_from_slice(&chunk[..n]);
        count -= n;
    }
    Ok(())
}

/// Error type for [`read_line`].
#[derive(Debug)]
pub enum ReadLineError {
    /// The line exceeded [`MAX_LINE_LEN`] without a newline in sight.
    TooLong,
    /// The peer closed the connection after sending part of a line.
    ClosedMidLine,
    /// The line buffer could not be grown.
    OutOfMemory(TryReserveError),
    /// A peek or read failed.
    Io(io::Error),
}

impl Display for ReadLineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLong => write!(f, "line exceeded {MAX_LINE_LEN} bytes"),
            Self::ClosedMidLine => f.write_str("connection closed in the middle of a line"),
            Self::OutOfMemory(e) => write!(f, "could not grow line buffer: {e}"),
            Self::Io(e) => write!(f, "line read failed: {e}"),
        }
    }
}

impl std::error::Error for ReadLineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TooLong | Self::ClosedMidLine => None,
            Self::OutOfMemory(e) => Some(e),
            Self::Io(e) => Some(e),
        }
    }
}

impl From<TryReserveError> for ReadLineError {
    fn from(e: TryReserveError) -> Self {
        Self::OutOfMemory(e)
    }
}

impl From<ReadLineError> for io::Error {
    fn from(e: ReadLineError) -> Self {
        match e {
            ReadLineError::Io(e) => e,
            ReadLineError::TooLong => io::Error::new(io::ErrorKind::InvalidData, e.to_string()),
            ReadLineError::ClosedMidLine => {
                io::Error::new(io::ErrorKind::UnexpectedEof, e.to_string())
            }
            ReadLineError::OutOfMemory(_) => io::Error::new(io::ErrorKind::OutOfMemory, e.to_string()),
        }
    }
}
