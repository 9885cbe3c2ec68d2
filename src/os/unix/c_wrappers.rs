use super::unixprelude::*;
use std::{
    ffi::{CStr, CString},
    io,
    mem::{size_of, zeroed},
    net::Ipv4Addr,
    ptr,
};

/// `NI_MAXHOST`, inlined because the libc crate types it inconsistently across platforms.
const HOSTNAME_BUF_LEN: usize = 1025;

fn sockaddr_in(addr: Ipv4Addr, port: u16) -> libc::sockaddr_in {
    // SAFETY: sockaddr_in is plain old data; all-zeroes is a valid (if useless) value.
    let mut sa: libc::sockaddr_in = unsafe { zeroed() };
    sa.sin_family = libc::AF_INET as libc::sa_family_t;
    sa.sin_port = port.to_be();
    sa.sin_addr = libc::in_addr { s_addr: u32::from(addr).to_be() };
    sa
}

pub(crate) fn create_tcp_socket() -> io::Result<OwnedFd> {
    let (success, fd) = unsafe {
        let result = libc::socket(libc::AF_INET, libc::SOCK_STREAM, 0);
        (result != -1, result)
    };
    ok_or_ret_errno!(success => unsafe {
        // SAFETY: we just created this descriptor
        OwnedFd::from_raw_fd(fd)
    })
}

pub(crate) fn connect(fd: BorrowedFd<'_>, addr: Ipv4Addr, port: u16) -> io::Result<()> {
    let sa = sockaddr_in(addr, port);
    let success = unsafe {
        libc::connect(
            fd.as_raw_fd(),
            // Double cast because you cannot cast a reference to a pointer of arbitrary type
            // but you can cast any narrow pointer to any other narrow pointer
            (&sa as *const libc::sockaddr_in).cast(),
            size_of::<libc::sockaddr_in>() as libc::socklen_t,
        ) != -1
    };
    ok_or_ret_errno!(success => ())
}

pub(crate) fn set_reuseaddr(fd: BorrowedFd<'_>, reuse: bool) -> io::Result<()> {
    let val = reuse as c_int;
    let success = unsafe {
        libc::setsockopt(
            fd.as_raw_fd(),
            libc::SOL_SOCKET,
            libc::SO_REUSEADDR,
            (&val as *const c_int).cast(),
            size_of::<c_int>() as libc::socklen_t,
        ) != -1
    };
    ok_or_ret_errno!(success => ())
}

pub(crate) fn bind(fd: BorrowedFd<'_>, addr: Ipv4Addr, port: u16) -> io::Result<()> {
    let sa = sockaddr_in(addr, port);
    let success = unsafe {
        libc::bind(
            fd.as_raw_fd(),
            (&sa as *const libc::sockaddr_in).cast(),
            size_of::<libc::sockaddr_in>() as libc::socklen_t,
        ) != -1
    };
    ok_or_ret_errno!(success => ())
}

pub(crate) fn listen(fd: BorrowedFd<'_>, backlog: c_int) -> io::Result<()> {
    let success = unsafe { libc::listen(fd.as_raw_fd(), backlog) != -1 };
    ok_or_ret_errno!(success => ())
}

unsafe fn fcntl_int(fd: BorrowedFd<'_>, cmd: c_int, val: c_int) -> io::Result<c_int> {
    let val = unsafe { libc::fcntl(fd.as_raw_fd(), cmd, val) };
    ok_or_ret_errno!(val != -1 => val)
}

pub(crate) fn set_nonblocking(fd: BorrowedFd<'_>, nonblocking: bool) -> io::Result<()> {
    let old_flags = unsafe { fcntl_int(fd, libc::F_GETFL, 0)? };
    let new_flags = if nonblocking {
        old_flags | libc::O_NONBLOCK
    } else {
        old_flags & !libc::O_NONBLOCK
    };
    if new_flags != old_flags {
        unsafe { fcntl_int(fd, libc::F_SETFL, new_flags)? };
    }
    Ok(())
}

/// Maps a `getaddrinfo`-family return code to an `io::Error`, deferring to `errno` where the
/// code says to.
fn gai_error(code: c_int) -> io::Error {
    if code == libc::EAI_SYSTEM {
        return io::Error::last_os_error();
    }
    let msg = unsafe {
        // SAFETY: gai_strerror returns a pointer to a static message for any code
        CStr::from_ptr(libc::gai_strerror(code))
    };
    io::Error::new(io::ErrorKind::NotFound, msg.to_string_lossy().into_owned())
}

/// Forward-resolves a hostname to its first IPv4 address. Blocking, and not safe to run
/// concurrently with itself or with [`getnameinfo_v4`]; the caller serializes.
pub(crate) fn getaddrinfo_v4(host: &str) -> io::Result<Ipv4Addr> {
    let host = CString::new(host)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "host contains a NUL byte"))?;
    // SAFETY: addrinfo is plain old data to us; only the hint fields below are inspected.
    let mut hints: libc::addrinfo = unsafe { zeroed() };
    hints.ai_family = libc::AF_INET;
    hints.ai_socktype = libc::SOCK_STREAM;

    let mut results: *mut libc::addrinfo = ptr::null_mut();
    let code = unsafe { libc::getaddrinfo(host.as_ptr(), ptr::null(), &hints, &mut results) };
    if code != 0 {
        return Err(gai_error(code));
    }

    let mut first = None;
    let mut cursor = results;
    while !cursor.is_null() {
        // SAFETY: getaddrinfo returned 0, so the list is valid until freeaddrinfo
        let entry = unsafe { &*cursor };
        if entry.ai_family == libc::AF_INET && !entry.ai_addr.is_null() {
            let sa = unsafe { &*entry.ai_addr.cast::<libc::sockaddr_in>() };
            first = Some(Ipv4Addr::from(u32::from_be(sa.sin_addr.s_addr)));
            break;
        }
        cursor = entry.ai_next;
    }
    unsafe { libc::freeaddrinfo(results) };

    first.ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no IPv4 address for host"))
}

/// Reverse-resolves an IPv4 address to a hostname, requiring one to exist (`NI_NAMEREQD`).
/// Same blocking and serialization caveats as [`getaddrinfo_v4`].
pub(crate) fn getnameinfo_v4(addr: Ipv4Addr) -> io::Result<String> {
    let sa = sockaddr_in(addr, 0);
    let mut host = [0 as c_char; HOSTNAME_BUF_LEN];
    let code = unsafe {
        libc::getnameinfo(
            (&sa as *const libc::sockaddr_in).cast(),
            size_of::<libc::sockaddr_in>() as libc::socklen_t,
            host.as_mut_ptr(),
            host.len() as libc::socklen_t,
            ptr::null_mut(),
            0,
            libc::NI_NAMEREQD,
        )
    };
    if code != 0 {
        return Err(gai_error(code));
    }
    let name = unsafe {
        // SAFETY: getnameinfo returned 0, so the buffer holds a null-terminated string
        CStr::from_ptr(host.as_ptr())
    };
    Ok(name.to_string_lossy().into_owned())
}
