// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

//! Video capture C API.

use crate::error::{flag, guard};
use crate::handle::{lock, Kind, Registry};
use crate::mat::{CvgMat, MATS};
use crate::try_or_null;
use cvgate::Capture;
use libc::c_int;

/// Opaque video capture handle. `id == 0` is the null handle.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CvgVideoCapture {
    pub id: u64,
}

impl CvgVideoCapture {
    pub const NULL: Self = Self { id: 0 };
}

static CAPTURES: Registry<Capture> = Registry::new(Kind::VideoCapture);

/// Open a capture device by index.
///
/// A handle is returned even when the device fails to open; check it with
/// cvg_videocapture_is_opened.
///
/// @param index Device index, 0 for the default camera
/// @return New capture handle, or the null handle on error
/// @par Errors (errno):
/// - EIO: The capture backend failed
#[no_mangle]
pub extern "C" fn cvg_videocapture_new(index: c_int) -> CvgVideoCapture {
    guard(CvgVideoCapture::NULL, || {
        let capture = try_or_null!(CvgVideoCapture, Capture::open(index));
        CvgVideoCapture {
            id: CAPTURES.insert(capture),
        }
    })
}

/// @return 1 if the device is open, 0 if not, -1 on error
#[no_mangle]
pub extern "C" fn cvg_videocapture_is_opened(capture: CvgVideoCapture) -> c_int {
    guard(-1, || flag(CAPTURES.with(capture.id, |c| c.is_opened())))
}

/// Grab and decode the next frame into `frame`.
///
/// @param capture Capture handle
/// @param frame Destination image
/// @return 1 if a frame was read, 0 at end of stream or when the device
///         delivered nothing (`frame` is then not guaranteed to be
///         overwritten), -1 on error
/// @par Errors (errno):
/// - EBADF: Invalid capture or frame handle
/// - EBUSY: Either handle in use by another call
#[no_mangle]
pub extern "C" fn cvg_videocapture_read(capture: CvgVideoCapture, frame: CvgMat) -> c_int {
    guard(-1, || {
        flag(CAPTURES.with(capture.id, |c| {
            let entry = MATS.resolve(frame.id)?;
            let mut image = lock(&entry, frame.id)?;
            c.read(&mut image)
        }))
    })
}

/// Release a capture handle and close its device. Releasing the null
/// handle, or a handle that was already released, does nothing.
#[no_mangle]
pub extern "C" fn cvg_videocapture_free(capture: CvgVideoCapture) {
    guard((), || {
        CAPTURES.remove(capture.id);
    })
}
