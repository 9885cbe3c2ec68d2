//! Shared error types.

use std::{
    fmt::{self, Display, Formatter},
    io,
};

/// Failure to turn a textual host into an address.
///
/// Produced by [`Resolver::resolve`](crate::resolver::Resolver::resolve) and wrapped by
/// [`ConnectError::Lookup`](crate::connect::ConnectError::Lookup).
#[derive(Debug)]
pub enum LookupError {
    /// The host string was empty.
    EmptyHost,
    /// The external lookup failed or returned no usable address.
    NotFound {
        /// The host that was being resolved.
        host: String,
        /// What the resolver reported.
        source: io::Error,
    },
}

impl Display for LookupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyHost => f.write_str("empty host string"),
            Self::NotFound { host, source } => {
                write!(f, "could not lookup address \"{host}\": {source}")
            }
        }
    }
}

impl std::error::Error for LookupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::EmptyHost => None,
            Self::NotFound { source, .. } => Some(source),
        }
    }
}

impl From<LookupError> for io::Error {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::EmptyHost => io::Error::new(io::ErrorKind::InvalidInput, e.to_string()),
            LookupError::NotFound { .. } => io::Error::new(io::ErrorKind::NotFound, e.to_string()),
        }
    }
}
