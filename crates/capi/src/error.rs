// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

//! Error handling utilities for the C API.
//!
//! Failures are reported through errno following POSIX conventions. No Rust
//! panic or OpenCV exception crosses the boundary: every exported function
//! runs inside [`guard`].

use cvgate::Error;
use errno::{set_errno, Errno};
use libc::c_int;
use opencv::core;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Set errno and return -1 for functions returning int
#[inline]
pub fn set_error(code: i32) -> i32 {
    set_errno(Errno(code));
    -1
}

/// The errno value reported for `err`.
pub(crate) fn errno_for(err: &Error) -> c_int {
    match err {
        Error::NotFound(_) => libc::ENOENT,
        Error::Allocation(_) => libc::ENOMEM,
        Error::InvalidHandle(_) => libc::EBADF,
        Error::Busy(_) => libc::EBUSY,
        Error::InvalidArgument(_) => libc::EINVAL,
        Error::OperationFailure(_) => libc::EIO,
        Error::Encoding(_) => libc::EBADMSG,
        Error::OpenCv(e) => match e.code {
            core::StsBadArg
            | core::StsOutOfRange
            | core::StsBadSize
            | core::StsBadFlag
            | core::StsUnmatchedSizes
            | core::StsUnmatchedFormats
            | core::StsUnsupportedFormat
            | core::StsAssert => libc::EINVAL,
            core::StsNoMem => libc::ENOMEM,
            _ => libc::EIO,
        },
    }
}

/// Log `err`, set errno from it and return -1.
pub(crate) fn report(err: &Error) -> c_int {
    log::debug!("{err}");
    set_error(errno_for(err))
}

/// 0 on success, -1 with errno set on failure.
pub(crate) fn status(result: cvgate::Result<()>) -> c_int {
    match result {
        Ok(()) => 0,
        Err(e) => report(&e),
    }
}

/// 1 or 0 for a boolean answer, -1 with errno set on failure.
pub(crate) fn flag(result: cvgate::Result<bool>) -> c_int {
    match result {
        Ok(value) => value as c_int,
        Err(e) => report(&e),
    }
}

/// Runs the body of an exported function. A panic is logged, reported as
/// `EIO` and turned into `fallback`.
pub(crate) fn guard<T>(fallback: T, body: impl FnOnce() -> T) -> T {
    cvgate::config::global();
    match catch_unwind(AssertUnwindSafe(body)) {
        Ok(value) => value,
        Err(panic) => {
            let msg = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            log::warn!("panic contained at the C boundary: {msg}");
            set_errno(Errno(libc::EIO));
            fallback
        }
    }
}

/// Check if a pointer is null, set EINVAL and return -1 if so
#[macro_export]
macro_rules! check_null {
    ($ptr:expr) => {
        if $ptr.is_null() {
            return $crate::error::set_error(libc::EINVAL);
        }
    };
    ($ptr:expr, $($rest:expr),+) => {
        $crate::check_null!($ptr);
        $crate::check_null!($($rest),+);
    };
}

/// Unwrap a cvgate Result, setting errno and returning -1 on error
#[macro_export]
macro_rules! try_or_errno {
    ($expr:expr) => {
        match $expr {
            Ok(val) => val,
            Err(e) => return $crate::error::report(&e),
        }
    };
}

/// Unwrap a cvgate Result, setting errno and returning the null handle on error
#[macro_export]
macro_rules! try_or_null {
    ($handle:ty, $expr:expr) => {
        match $expr {
            Ok(val) => val,
            Err(e) => {
                $crate::error::report(&e);
                return <$handle>::NULL;
            }
        }
    };
}

/// Borrow a required C string argument.
pub(crate) unsafe fn c_str_arg<'a>(ptr: *const libc::c_char, what: &str) -> cvgate::Result<&'a str> {
    if ptr.is_null() {
        return Err(Error::InvalidArgument(format!("{what} is NULL")));
    }
    std::ffi::CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| Error::InvalidArgument(format!("{what} is not valid UTF-8")))
}

/// Borrow `len` elements at `ptr`. A zero length accepts NULL.
pub(crate) unsafe fn slice_arg<'a, T>(ptr: *const T, len: usize, what: &str) -> cvgate::Result<&'a [T]> {
    if len == 0 {
        return Ok(&[]);
    }
    if ptr.is_null() {
        return Err(Error::InvalidArgument(format!("{what} is NULL")));
    }
    Ok(std::slice::from_raw_parts(ptr, len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_error() {
        let result = set_error(libc::EINVAL);
        assert_eq!(result, -1);
        assert_eq!(errno::errno().0, libc::EINVAL);
    }

    #[test]
    fn test_errno_mapping() {
        assert_eq!(errno_for(&Error::InvalidHandle("x".into())), libc::EBADF);
        assert_eq!(errno_for(&Error::Busy("x".into())), libc::EBUSY);
        assert_eq!(errno_for(&Error::NotFound("x".into())), libc::ENOENT);
        assert_eq!(errno_for(&Error::OperationFailure("x".into())), libc::EIO);
        let cv = opencv::Error::new(core::StsUnmatchedSizes, "sizes");
        assert_eq!(errno_for(&Error::OpenCv(cv)), libc::EINVAL);
        let cv = opencv::Error::new(core::StsNoMem, "oom");
        assert_eq!(errno_for(&Error::OpenCv(cv)), libc::ENOMEM);
        assert_eq!(errno_for(&Error::Encoding("x".into())), libc::EBADMSG);
    }

    #[test]
    fn test_status_and_flag() {
        assert_eq!(status(Ok(())), 0);
        assert_eq!(status(Err(Error::InvalidArgument("x".into()))), -1);
        assert_eq!(errno::errno().0, libc::EINVAL);
        assert_eq!(flag(Ok(true)), 1);
        assert_eq!(flag(Ok(false)), 0);
        assert_eq!(flag(Err(Error::InvalidHandle("x".into()))), -1);
        assert_eq!(errno::errno().0, libc::EBADF);
    }

    #[test]
    fn test_guard_contains_panic() {
        let result = guard(-7, || -> i32 { panic!("boom") });
        assert_eq!(result, -7);
        assert_eq!(errno::errno().0, libc::EIO);
        assert_eq!(guard(-1, || 3), 3);
    }

    #[test]
    fn test_c_str_args() {
        let s = std::ffi::CString::new("window").unwrap();
        unsafe {
            assert_eq!(c_str_arg(s.as_ptr(), "name").unwrap(), "window");
            assert!(c_str_arg(std::ptr::null(), "name").is_err());
            assert!(slice_arg::<i32>(std::ptr::null(), 0, "pairs").unwrap().is_empty());
            assert!(slice_arg::<i32>(std::ptr::null(), 2, "pairs").is_err());
        }
    }
}
