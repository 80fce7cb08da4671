// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

//! Caller-owned result arrays.
//!
//! Arrays are allocated as exact-length boxed slices and released by
//! rebuilding the same boxed slice, so every allocation is matched by its
//! own release function. An empty result still carries a non-null pointer
//! with `len == 0`. Release resets the struct to `{ NULL, 0 }`, which makes
//! releasing it again a no-op.

use crate::geometry::CvgRect;
use libc::size_t;
use std::ptr;

/// Rectangles produced by a detection call.
#[repr(C)]
#[derive(Debug)]
pub struct CvgRectArray {
    pub data: *mut CvgRect,
    pub len: size_t,
}

/// Doubles produced by a detection call, one per rectangle.
#[repr(C)]
#[derive(Debug)]
pub struct CvgDoubleArray {
    pub data: *mut f64,
    pub len: size_t,
}

/// Output of `cvg_imencode`. `ok` is false when encoding failed; `data`
/// must be released with `cvg_encoded_free` either way.
#[repr(C)]
#[derive(Debug)]
pub struct CvgEncoded {
    pub ok: bool,
    pub data: *mut u8,
    pub len: size_t,
}

impl Default for CvgRectArray {
    fn default() -> Self {
        Self {
            data: ptr::null_mut(),
            len: 0,
        }
    }
}

impl Default for CvgDoubleArray {
    fn default() -> Self {
        Self {
            data: ptr::null_mut(),
            len: 0,
        }
    }
}

impl Default for CvgEncoded {
    fn default() -> Self {
        Self {
            ok: false,
            data: ptr::null_mut(),
            len: 0,
        }
    }
}

/// Hands `items` to the caller as a pointer and length.
pub(crate) fn into_raw_parts<T>(items: Vec<T>) -> (*mut T, usize) {
    let boxed = items.into_boxed_slice();
    let len = boxed.len();
    (Box::into_raw(boxed) as *mut T, len)
}

/// Reclaims a slice produced by [`into_raw_parts`].
///
/// # Safety
/// `data` and `len` must come from one call to `into_raw_parts::<T>` and not
/// have been freed yet. A null `data` is ignored.
pub(crate) unsafe fn free_raw_parts<T>(data: *mut T, len: usize) {
    if data.is_null() {
        return;
    }
    drop(Box::from_raw(ptr::slice_from_raw_parts_mut(data, len)));
}

impl CvgRectArray {
    pub(crate) fn from_vec(items: Vec<CvgRect>) -> Self {
        let (data, len) = into_raw_parts(items);
        Self { data, len }
    }
}

impl CvgDoubleArray {
    pub(crate) fn from_vec(items: Vec<f64>) -> Self {
        let (data, len) = into_raw_parts(items);
        Self { data, len }
    }
}

impl CvgEncoded {
    pub(crate) fn from_encoded(encoded: cvgate::Encoded) -> Self {
        let (data, len) = into_raw_parts(encoded.bytes);
        Self {
            ok: encoded.ok,
            data,
            len,
        }
    }
}

// ============================================================================
// Release Functions
// ============================================================================

/// Release the contents of a rectangle array and reset it to `{NULL, 0}`.
///
/// @param array Array filled by a detection call (can be NULL)
#[no_mangle]
pub unsafe extern "C" fn cvg_rect_array_free(array: *mut CvgRectArray) {
    if array.is_null() {
        return;
    }
    let array = &mut *array;
    free_raw_parts(array.data, array.len);
    *array = CvgRectArray::default();
}

/// Release the contents of a double array and reset it to `{NULL, 0}`.
///
/// @param array Array filled by a detection call (can be NULL)
#[no_mangle]
pub unsafe extern "C" fn cvg_double_array_free(array: *mut CvgDoubleArray) {
    if array.is_null() {
        return;
    }
    let array = &mut *array;
    free_raw_parts(array.data, array.len);
    *array = CvgDoubleArray::default();
}

/// Release an encode buffer and reset it to `{false, NULL, 0}`.
///
/// @param encoded Result of cvg_imencode (can be NULL)
#[no_mangle]
pub unsafe extern "C" fn cvg_encoded_free(encoded: *mut CvgEncoded) {
    if encoded.is_null() {
        return;
    }
    let encoded = &mut *encoded;
    free_raw_parts(encoded.data, encoded.len);
    *encoded = CvgEncoded::default();
}
