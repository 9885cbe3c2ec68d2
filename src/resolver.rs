//! Name resolution with the process-wide serialization the system resolver requires.
//!
//! The system resolver keeps internal static state and is not safe to call from two threads at
//! once, in either direction. [`Resolver`] owns the mutex that serializes those calls; one
//! `Resolver` value is shared by reference across every connection thread in the process. The
//! lock is an explicit object rather than a module-level static so tests can substitute an
//! instrumented [`Lookup`].

use crate::error::LookupError;
use std::{io, net::Ipv4Addr, sync::Mutex};

/// An external name-resolution backend.
///
/// Implementations are assumed non-reentrant; [`Resolver`] guarantees that at most one call to
/// either method is in flight at a time per `Resolver` value.
pub trait Lookup {
    /// Blocking forward lookup of `host`, returning its first IPv4 address.
    fn forward(&mut self, host: &str) -> io::Result<Ipv4Addr>;
    /// Blocking reverse lookup of `addr`, returning its canonical hostname.
    fn reverse(&mut self, addr: Ipv4Addr) -> io::Result<String>;
}

/// The operating system's resolver (`getaddrinfo`/`getnameinfo`).
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemLookup;

#[cfg(unix)]
impl Lookup for SystemLookup {
    fn forward(&mut self, host: &str) -> io::Result<Ipv4Addr> {
        crate::os::unix::c_wrappers::getaddrinfo_v4(host)
    }
    fn reverse(&mut self, addr: Ipv4Addr) -> io::Result<String> {
        crate::os::unix::c_wrappers::getnameinfo_v4(addr)
    }
}

/// Serialized access to a [`Lookup`] backend.
#[derive(Debug, Default)]
pub struct Resolver<L: Lookup = SystemLookup> {
    lookup: Mutex<L>,
}

#[cfg(unix)]
impl Resolver {
    /// Creates a resolver over the system resolver.
    pub fn system() -> Self {
        Self::new(SystemLookup)
    }
}

impl<L: Lookup> Resolver<L> {
    /// Creates a resolver over the given backend, wrapping it in the serializing mutex.
    pub fn new(lookup: L) -> Self {
        Self { lookup: Mutex::new(lookup) }
    }

    /// Turns a textual host into an IPv4 address.
    ///
    /// Literal dotted-decimal input is parsed directly, without taking the lock or touching the
    /// backend. Anything else is a blocking forward lookup under the lock.
    pub fn resolve(&self, host: &str) -> Result<Ipv4Addr, LookupError> {
        if host.is_empty() {
            return Err(LookupError::EmptyHost);
        }
        if let Ok(literal) = host.parse::<Ipv4Addr>() {
            return Ok(literal);
        }
        let failed = |source| LookupError::NotFound { host: host.to_owned(), source };
        let mut lookup = self.lookup.lock().map_err(|_| failed(poisoned()))?;
        lookup.forward(host).map_err(failed)
    }

    /// Reverse-resolves `addr` under the same lock as [`resolve`](Self::resolve).
    ///
    /// Reverse lookups feed diagnostics, not correctness, so failure is `None` rather than an
    /// error; see [`peer_name`](crate::peer::peer_name).
    pub fn reverse(&self, addr: Ipv4Addr) -> Option<String> {
        let mut lookup = self.lookup.lock().ok()?;
        lookup.reverse(addr).ok()
    }
}

fn poisoned() -> io::Error {
    io::Error::other("resolver lock poisoned")
}
