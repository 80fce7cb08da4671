// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

//! Image processing C API.
//!
//! Every function reading `src` and writing `dst` accepts the same handle
//! for both.

use crate::error::{guard, slice_arg, status};
use crate::geometry::{CvgRect, CvgScalar, CvgSize};
use crate::mat::{with_images, CvgMat, MATS};
use cvgate::imgproc::{self, Histogram};
use cvgate::{Error, Result};
use libc::{c_int, size_t};

/// Convert between color spaces.
///
/// @param src Source image
/// @param dst Destination image, reallocated as needed
/// @param code OpenCV conversion code such as COLOR_BGR2HSV
/// @return 0 on success, -1 on error
/// @par Errors (errno):
/// - EBADF: Invalid handle
/// - EINVAL: Empty source or conversion not valid for its channel count
#[no_mangle]
pub extern "C" fn cvg_cvt_color(src: CvgMat, dst: CvgMat, code: c_int) -> c_int {
    guard(-1, || {
        status(with_images(&[src.id], &[dst.id], |s, d| {
            imgproc::cvt_color(s[0], d[0], code)
        }))
    })
}

/// Blur and downsample by two in each dimension.
///
/// @return 0 on success, -1 on error
#[no_mangle]
pub extern "C" fn cvg_pyr_down(src: CvgMat, dst: CvgMat) -> c_int {
    guard(-1, || {
        status(with_images(&[src.id], &[dst.id], |s, d| {
            imgproc::pyr_down(s[0], d[0])
        }))
    })
}

/// Resize to `dsize`, or by the factors `fx` and `fy` when `dsize` is 0x0.
///
/// @param interpolation OpenCV interpolation flag such as INTER_LINEAR
/// @return 0 on success, -1 on error
/// @par Errors (errno):
/// - EBADF: Invalid handle
/// - EINVAL: Empty source, or neither a size nor positive factors
#[no_mangle]
pub extern "C" fn cvg_resize(
    src: CvgMat,
    dst: CvgMat,
    dsize: CvgSize,
    fx: f64,
    fy: f64,
    interpolation: c_int,
) -> c_int {
    guard(-1, || {
        status(with_images(&[src.id], &[dst.id], |s, d| {
            imgproc::resize(s[0], d[0], dsize.into(), fx, fy, interpolation)
        }))
    })
}

/// Draw a rectangle outline into `mat`, or fill it when `thickness` is
/// negative.
///
/// @return 0 on success, -1 on error
#[no_mangle]
pub extern "C" fn cvg_rectangle(
    mat: CvgMat,
    rect: CvgRect,
    color: CvgScalar,
    thickness: c_int,
) -> c_int {
    guard(-1, || {
        status(MATS.with(mat.id, |image| {
            imgproc::rectangle(image, rect.into(), color.into(), thickness)
        }))
    })
}

unsafe fn histogram(
    channels: *const c_int,
    dims: size_t,
    hist_size: Option<*const c_int>,
    ranges: *const f32,
) -> Result<Histogram> {
    if dims == 0 {
        return Err(Error::InvalidArgument("dims must be positive".to_string()));
    }
    let sizes = match hist_size {
        Some(ptr) => slice_arg(ptr, dims, "hist_size")?.to_vec(),
        None => Vec::new(),
    };
    Ok(Histogram {
        channels: slice_arg(channels, dims, "channels")?.to_vec(),
        sizes,
        ranges: slice_arg(ranges, dims * 2, "ranges")?.to_vec(),
    })
}

/// Compute a histogram over one or more images.
///
/// @param images Source images
/// @param image_count Number of source images
/// @param channels Channel index per histogram dimension, counted across
///        all images
/// @param dims Number of histogram dimensions
/// @param mask 8-bit mask selecting the pixels counted, or the null handle
/// @param hist Destination histogram (CV_32F)
/// @param hist_size Bin count per dimension
/// @param ranges Lower and upper bound per dimension, `2 * dims` values
/// @return 0 on success, -1 on error
/// @par Errors (errno):
/// - EBADF: Invalid handle
/// - EINVAL: NULL array, empty image, or channel out of range
#[no_mangle]
pub unsafe extern "C" fn cvg_calc_hist(
    images: *const CvgMat,
    image_count: size_t,
    channels: *const c_int,
    dims: size_t,
    mask: CvgMat,
    hist: CvgMat,
    hist_size: *const c_int,
    ranges: *const f32,
) -> c_int {
    guard(-1, || {
        let run = || -> Result<()> {
            let layout = histogram(channels, dims, Some(hist_size), ranges)?;
            let mut ids: Vec<u64> = slice_arg(images, image_count, "images")?
                .iter()
                .map(|m| m.id)
                .collect();
            let has_mask = mask != CvgMat::NULL;
            if has_mask {
                ids.push(mask.id);
            }
            with_images(&ids, &[hist.id], |s, d| {
                let (sources, mask) = match s.split_last() {
                    Some((mask, sources)) if has_mask => (sources, Some(*mask)),
                    _ => (s, None),
                };
                imgproc::calc_hist(sources, &layout, mask, d[0])
            })
        };
        status(run())
    })
}

/// Replace each pixel of the images by the value of its histogram bin.
///
/// @param images Source images
/// @param image_count Number of source images
/// @param channels Channel index per histogram dimension
/// @param dims Number of histogram dimensions, as given to cvg_calc_hist
/// @param hist Histogram from cvg_calc_hist
/// @param dst Destination, single channel with the size of the images
/// @param ranges Lower and upper bound per dimension, `2 * dims` values
/// @param scale Factor applied to every output value
/// @return 0 on success, -1 on error
#[no_mangle]
pub unsafe extern "C" fn cvg_calc_back_project(
    images: *const CvgMat,
    image_count: size_t,
    channels: *const c_int,
    dims: size_t,
    hist: CvgMat,
    dst: CvgMat,
    ranges: *const f32,
    scale: f64,
) -> c_int {
    guard(-1, || {
        let run = || -> Result<()> {
            let layout = histogram(channels, dims, None, ranges)?;
            let mut ids: Vec<u64> = slice_arg(images, image_count, "images")?
                .iter()
                .map(|m| m.id)
                .collect();
            ids.push(hist.id);
            with_images(&ids, &[dst.id], |s, d| match s.split_last() {
                Some((hist, sources)) => {
                    imgproc::calc_back_project(sources, &layout, hist, d[0], scale)
                }
                None => Err(Error::InvalidArgument("no histogram".to_string())),
            })
        };
        status(run())
    })
}
