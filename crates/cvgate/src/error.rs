// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub enum Error {
    /// A file the resource is built from does not exist.
    NotFound(String),
    /// The resource could not be constructed from its inputs.
    Allocation(String),
    /// A handle that was never issued, or was already released.
    InvalidHandle(String),
    /// The handle is in use by another in-flight call.
    Busy(String),
    InvalidArgument(String),
    /// The call completed but the wrapped library reported failure.
    OperationFailure(String),
    /// Input data exists but is not in a format the library can parse.
    Encoding(String),
    OpenCv(opencv::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound(msg) => write!(f, "not found: {msg}"),
            Error::Allocation(msg) => write!(f, "allocation failed: {msg}"),
            Error::InvalidHandle(msg) => write!(f, "invalid handle: {msg}"),
            Error::Busy(msg) => write!(f, "handle busy: {msg}"),
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Error::OperationFailure(msg) => write!(f, "operation failed: {msg}"),
            Error::Encoding(msg) => write!(f, "encoding failed: {msg}"),
            Error::OpenCv(e) => write!(f, "opencv error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::OpenCv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<opencv::Error> for Error {
    fn from(err: opencv::Error) -> Self {
        Error::OpenCv(err)
    }
}
