#![doc = include_str!("../README.md")]
// If this was in Cargo.toml, it would cover tests as well
#![warn(missing_docs, clippy::panic_in_result_fn, clippy::missing_assert_message)]

#[macro_use]
mod macros;

pub mod connect;
pub mod error;
pub mod line;
pub mod listener;
pub mod peer;
pub mod resolver;
pub mod transfer;

/// Platform-specific syscall plumbing. Everything public in the crate goes through std types;
/// this module only exists to hold the raw `libc` calls std has no knob for.
mod os {
    #[cfg(unix)]
    pub(crate) mod unix;
}

pub use {
    connect::ConnectError,
    error::LookupError,
    line::{read_line, ReadLineError, MAX_LINE_LEN, PEEK_WINDOW},
    listener::BACKLOG,
    peer::{peer_address, peer_name},
    resolver::{Lookup, Resolver, SystemLookup},
    transfer::{recv_once, send_all, PeekRecv, SendAllError},
};
#[cfg(unix)]
pub use {connect::open_stream, listener::bind_listener, transfer::set_nonblocking};

#[cfg(test)]
#[path = "../tests/index.rs"]
#[allow(clippy::unwrap_used)]
mod tests;
