// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

//! HighGUI C API - debug windows, key polling and mouse callbacks.
//!
//! Windows need a display and should be driven from a single thread.

use crate::error::{c_str_arg, guard, report, status};
use crate::mat::{CvgMat, MATS};
use cvgate::highgui::{self, MouseEvent};
use errno::{set_errno, Errno};
use libc::{c_char, c_int, c_void};

/// Window size follows the user; the image is scaled to fit.
pub const CVG_WINDOW_NORMAL: c_int = 0x0;
/// Window size follows the image and cannot be changed.
pub const CVG_WINDOW_AUTOSIZE: c_int = 0x1;

/// Mouse callback: OpenCV event code, pointer position, OpenCV event flags
/// and the `user_data` given at registration.
pub type CvgMouseCallback =
    extern "C" fn(event: c_int, x: c_int, y: c_int, flags: c_int, user_data: *mut c_void);

/// Caller-owned pointer handed back to the callback untouched.
struct UserData(*mut c_void);

// SAFETY: the pointer is never dereferenced here, only passed back to the
// caller's callback; the caller is responsible for its thread safety.
unsafe impl Send for UserData {}
unsafe impl Sync for UserData {}

impl UserData {
    fn get(&self) -> *mut c_void {
        self.0
    }
}

fn trampoline(
    callback: CvgMouseCallback,
    user_data: *mut c_void,
) -> impl FnMut(MouseEvent) + Send + Sync + 'static {
    let user_data = UserData(user_data);
    move |e: MouseEvent| callback(e.event, e.x, e.y, e.flags, user_data.get())
}

/// Create a window.
///
/// @param name Window name, also used to address it later
/// @param flags CVG_WINDOW_NORMAL or CVG_WINDOW_AUTOSIZE
/// @return 0 on success, -1 on error
#[no_mangle]
pub unsafe extern "C" fn cvg_named_window(name: *const c_char, flags: c_int) -> c_int {
    guard(-1, || {
        status(c_str_arg(name, "name").and_then(|name| highgui::named_window(name, flags)))
    })
}

/// @return 0 on success, -1 on error
#[no_mangle]
pub unsafe extern "C" fn cvg_destroy_window(name: *const c_char) -> c_int {
    guard(-1, || {
        status(c_str_arg(name, "name").and_then(highgui::destroy_window))
    })
}

/// Show an image in a window, creating the window if needed.
///
/// @return 0 on success, -1 on error
/// @par Errors (errno):
/// - EBADF: Invalid image handle
/// - EINVAL: NULL name or empty image
#[no_mangle]
pub unsafe extern "C" fn cvg_imshow(name: *const c_char, mat: CvgMat) -> c_int {
    guard(-1, || {
        status(c_str_arg(name, "name").and_then(|name| {
            MATS.with(mat.id, |image| highgui::show(name, image))
        }))
    })
}

/// Process window events for `delay` milliseconds, or until a key press
/// when `delay` is 0.
///
/// @return Code of the key pressed, or -1 if none. errno is cleared on
///         entry and set only on error.
#[no_mangle]
pub extern "C" fn cvg_wait_key(delay: c_int) -> c_int {
    guard(-1, || {
        set_errno(Errno(0));
        match highgui::wait_key(delay) {
            Ok(key) => key,
            Err(e) => report(&e),
        }
    })
}

/// Set or clear the mouse callback of a window.
///
/// `callback` runs on the thread pumping window events (cvg_wait_key) and
/// receives `user_data` unchanged. The caller keeps `user_data` valid
/// until the callback is replaced or the window destroyed.
///
/// @param name Window name
/// @param callback Function to call, or NULL to remove the callback
/// @param user_data Opaque pointer passed to every call (can be NULL)
/// @return 0 on success, -1 on error
#[no_mangle]
pub unsafe extern "C" fn cvg_set_mouse_callback(
    name: *const c_char,
    callback: Option<CvgMouseCallback>,
    user_data: *mut c_void,
) -> c_int {
    guard(-1, || {
        status(c_str_arg(name, "name").and_then(|name| match callback {
            Some(callback) => highgui::set_mouse_callback(name, trampoline(callback, user_data)),
            None => highgui::clear_mouse_callback(name),
        }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};

    extern "C" fn record(event: c_int, x: c_int, y: c_int, flags: c_int, user_data: *mut c_void) {
        let sum = unsafe { &*(user_data as *const AtomicI32) };
        sum.fetch_add(event + x + y + flags, Ordering::SeqCst);
    }

    #[test]
    fn test_trampoline_passes_user_data() {
        let sum = AtomicI32::new(0);
        let mut f = trampoline(record, &sum as *const AtomicI32 as *mut c_void);
        f(MouseEvent {
            event: 1,
            x: 10,
            y: 20,
            flags: 4,
        });
        f(MouseEvent {
            event: 0,
            x: 1,
            y: 1,
            flags: 0,
        });
        assert_eq!(sum.load(Ordering::SeqCst), 37);
    }

    #[test]
    fn test_window_flags_match_opencv() {
        assert_eq!(CVG_WINDOW_NORMAL, opencv::highgui::WINDOW_NORMAL);
        assert_eq!(CVG_WINDOW_AUTOSIZE, opencv::highgui::WINDOW_AUTOSIZE);
    }

    #[test]
    fn test_null_window_names() {
        unsafe {
            assert_eq!(cvg_named_window(std::ptr::null(), 0), -1);
            assert_eq!(errno::errno().0, libc::EINVAL);
            assert_eq!(cvg_destroy_window(std::ptr::null()), -1);
            assert_eq!(errno::errno().0, libc::EINVAL);
            assert_eq!(cvg_imshow(std::ptr::null(), CvgMat::NULL), -1);
            assert_eq!(errno::errno().0, libc::EINVAL);
            assert_eq!(cvg_set_mouse_callback(std::ptr::null(), Some(record), std::ptr::null_mut()), -1);
            assert_eq!(errno::errno().0, libc::EINVAL);
        }
    }

    #[test]
    fn test_imshow_invalid_handle() {
        assert_eq!(unsafe { cvg_imshow(c"cvgate".as_ptr(), CvgMat::NULL) }, -1);
        assert_eq!(errno::errno().0, libc::EBADF);
    }
}
