//! Outbound connection establishment.

use crate::{
    error::LookupError,
    resolver::{Lookup, Resolver},
};
use std::{
    fmt::{self, Display, Formatter},
    io,
    net::TcpStream,
};

/// Resolves `host` and opens a blocking TCP connection to it on `port`.
///
/// The returned stream is connected and in blocking mode. Every failure names its failing step:
/// resolution, socket creation, or the connect itself. A socket created before a later failure
/// is closed before the error returns.
#[cfg(unix)]
pub fn open_stream<L: Lookup>(
    resolver: &Resolver<L>,
    host: &str,
    port: u16,
) -> Result<TcpStream, ConnectError> {
    use crate::os::unix::c_wrappers;
    use std::os::fd::AsFd;

    if port == 0 {
        return Err(ConnectError::BadPort);
    }
    let addr = resolver.resolve(host).map_err(|e| {
        tracing::error!(host, error = %e, "open_stream: lookup failed");
        ConnectError::Lookup(e)
    })?;
    let fd = c_wrappers::create_tcp_socket().map_err(|e| {
        tracing::error!(error = %e, "open_stream: socket() failed");
        ConnectError::CreateSocket(e)
    })?;
    // On failure the OwnedFd drops here, closing the half-made socket.
    c_wrappers::connect(fd.as_fd(), addr, port).map_err(|e| {
        tracing::error!(host, %addr, port, error = %e, "open_stream: connect() failed");
        ConnectError::Connect(e)
    })?;
    Ok(TcpStream::from(fd))
}

/// Error type for [`open_stream`].
#[derive(Debug)]
pub enum ConnectError {
    /// The port was zero.
    BadPort,
    /// The destination could not be resolved.
    Lookup(LookupError),
    /// The `socket()` call failed.
    CreateSocket(io::Error),
    /// The `connect()` call failed.
    Connect(io::Error),
}

impl Display for ConnectError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadPort => f.write_str("port must be nonzero"),
            Self::Lookup(e) => write!(f, "lookup failed: {e}"),
            Self::CreateSocket(e) => write!(f, "could not create socket: {e}"),
            Self::Connect(e) => write!(f, "could not connect: {e}"),
        }
    }
}

impl std::error::Error for ConnectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::BadPort => None,
            Self::Lookup(e) => Some(e),
            Self::CreateSocket(e) | Self::Connect(e) => Some(e),
        }
    }
}

impl From<ConnectError> for io::Error {
    fn from(e: ConnectError) -> Self {
        match e {
            ConnectError::BadPort => io::Error::new(io::ErrorKind::InvalidInput, e.to_string()),
            ConnectError::Lookup(e) => e.into(),
            ConnectError::CreateSocket(e) | ConnectError::Connect(e) => e,
        }
    }
}
