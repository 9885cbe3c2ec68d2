//! Raw `AF_INET` syscalls and resolver calls that `std::net` does not expose with the control
//! this crate needs: per-syscall error attribution, `SO_REUSEADDR`, a fixed listen backlog,
//! blocking-mode toggles, and `getaddrinfo`/`getnameinfo`.

pub(crate) mod c_wrappers;

mod unixprelude {
    pub(crate) use {
        libc::{c_char, c_int},
        std::os::unix::prelude::*,
    };
}
