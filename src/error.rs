//! Error types.

use std::str::Utf8Error;
use std::{error, fmt, io};

/// Unified error type for everything in the crate
#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// A civil time field or a conversion result is outside of its legal domain
    OutOfRange(&'static str),
    /// Grammar violation in a POSIX zone description string
    InvalidZoneString(&'static str),
    /// Invalid zone designation
    ZoneName(&'static str),
    /// Invalid zone transition rule
    ZoneRule(&'static str),
    /// I/O error while consulting the zoneinfo database
    Io(io::Error),
    /// UTF-8 error
    Utf8(Utf8Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::OutOfRange(error) => error.fmt(f),
            Self::InvalidZoneString(error) => write!(f, "invalid zone string: {}", error),
            Self::ZoneName(error) => write!(f, "invalid zone designation: {}", error),
            Self::ZoneRule(error) => write!(f, "invalid transition rule: {}", error),
            Self::Io(error) => error.fmt(f),
            Self::Utf8(error) => error.fmt(f),
        }
    }
}

impl error::Error for Error {}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Self::Io(error)
    }
}

impl From<Utf8Error> for Error {
    fn from(error: Utf8Error) -> Self {
        Self::Utf8(error)
    }
}
