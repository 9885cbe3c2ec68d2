//! Listening endpoint creation.

use std::{
    io,
    net::{Ipv4Addr, TcpListener},
};

/// Listen backlog for sockets created by [`bind_listener`].
pub const BACKLOG: i32 = 1024;

/// Creates a bound, listening TCP socket on `port`.
///
/// Binds to `bind_addr` when the process configuration supplies one, else to the wildcard
/// address. `SO_REUSEADDR` is set first so a relay restarted after a crash does not spend a
/// `TIME_WAIT` period refusing to come back up. The listener is returned as-is; accepting
/// connections in a loop is the caller's job, not this factory's.
#[cfg(unix)]
pub fn bind_listener(port: u16, bind_addr: Option<Ipv4Addr>) -> io::Result<TcpListener> {
    use crate::os::unix::c_wrappers;
    use std::os::fd::AsFd;

    if port == 0 {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "port must be nonzero"));
    }
    let addr = bind_addr.unwrap_or(Ipv4Addr::UNSPECIFIED);

    let fd = c_wrappers::create_tcp_socket().map_err(|e| log_failure("socket()", addr, port, e))?;
    c_wrappers::set_reuseaddr(fd.as_fd(), true)
        .map_err(|e| log_failure("setsockopt()", addr, port, e))?;
    c_wrappers::bind(fd.as_fd(), addr, port).map_err(|e| log_failure("bind()", addr, port, e))?;
    c_wrappers::listen(fd.as_fd(), BACKLOG).map_err(|e| log_failure("listen()", addr, port, e))?;

    tracing::debug!(%addr, port, "listener bound");
    Ok(TcpListener::from(fd))
}

#[cfg(unix)]
fn log_failure(op: &str, addr: Ipv4Addr, port: u16, e: io::Error) -> io::Error {
    tracing::error!(%addr, port, error = %e, "bind_listener: {op} failed");
    e
}
