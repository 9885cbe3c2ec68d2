//! Peer identification for connected sockets.
//!
//! Both operations here are diagnostic: a relay logs who is on the other end of an accepted
//! connection, and keeps serving it even when that question cannot be answered. Failure is
//! therefore `None`, never a hard error that would abort the caller.

use crate::resolver::{Lookup, Resolver};
use std::net::{IpAddr, TcpStream};

/// Returns the peer's address as dotted-decimal text, or `None` if the kernel cannot say.
pub fn peer_address(conn: &TcpStream) -> Option<String> {
    match conn.peer_addr() {
        Ok(addr) => Some(addr.ip().to_string()),
        Err(e) => {
            tracing::debug!(error = %e, "peer_address: getpeername failed");
            None
        }
    }
}

/// Returns the peer's reverse-DNS name, or `None` if it has none or cannot be queried.
///
/// The reverse lookup runs under the same mutex as forward resolution; the system resolver
/// tolerates neither direction running concurrently with the other.
pub fn peer_name<L: Lookup>(conn: &TcpStream, resolver: &Resolver<L>) -> Option<String> {
    let addr = match conn.peer_addr() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::debug!(error = %e, "peer_name: getpeername failed");
            return None;
        }
    };
    let v4 = match addr.ip() {
        IpAddr::V4(v4) => v4,
        IpAddr::V6(_) => return None,
    };
    resolver.reverse(v4)
}
