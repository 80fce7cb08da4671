// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

//! cvgate C API
//!
//! This crate exposes OpenCV matrices, video capture, cascade and HOG
//! detection, CamShift tracking and a few HighGUI calls to C callers.
//!
//! Resources are referenced through small typed handles (`CvgMat`,
//! `CvgHog`, ...) holding a generational id. A released handle is
//! detected and reported as `EBADF` instead of being dereferenced, and
//! releasing a handle twice is harmless. Failures set errno; see each
//! function for its return convention.

#![allow(clippy::missing_safety_doc)]
#![allow(unsafe_op_in_unsafe_fn)]

mod array;
mod error;
mod geometry;
mod handle;
mod highgui;
mod imgcodecs;
mod imgproc;
mod mat;
mod objdetect;
mod tracking;
mod videoio;

pub use array::*;
pub use error::*;
pub use geometry::*;
pub use highgui::*;
pub use imgcodecs::*;
pub use imgproc::*;
pub use mat::*;
pub use objdetect::*;
pub use tracking::*;
pub use videoio::*;

use libc::c_int;

/// Environment variable holding the log filter, in env_logger syntax.
pub const CVGATE_LOG_ENV: &str = "CVGATE_LOG";

/// Install a stderr logger filtered by the `CVGATE_LOG` environment
/// variable (default "warn").
///
/// @return 1 if the logger was installed, 0 if a logger was already set
#[no_mangle]
pub extern "C" fn cvg_init_logging() -> c_int {
    error::guard(0, || {
        let env = env_logger::Env::new().filter_or(CVGATE_LOG_ENV, "warn");
        match env_logger::Builder::from_env(env).try_init() {
            Ok(()) => {
                log::debug!("cvgate {} logging started", env!("CARGO_PKG_VERSION"));
                1
            }
            Err(_) => 0,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        let first = cvg_init_logging();
        assert!(first == 0 || first == 1);
        assert_eq!(cvg_init_logging(), 0);
    }
}
