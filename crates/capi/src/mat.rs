// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

//! Image C API - matrix handles, regions of interest and per-pixel operations.

use crate::error::{flag, guard, report, slice_arg, status};
use crate::geometry::{CvgRect, CvgScalar};
use crate::handle::{lock, Kind, Registry};
use crate::try_or_null;
use cvgate::{Error, Image, Result};
use libc::{c_int, size_t};

/// Opaque image handle. `id == 0` is the null handle.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CvgMat {
    pub id: u64,
}

impl CvgMat {
    pub const NULL: Self = Self { id: 0 };

    pub(crate) fn insert(image: Image) -> Self {
        Self {
            id: MATS.insert(image),
        }
    }
}

pub(crate) static MATS: Registry<Image> = Registry::new(Kind::Mat);

/// Runs `f` with the images behind `srcs` (read) and `dsts` (written)
/// locked. A handle listed as both source and destination is read from a
/// deep copy taken before `f` runs, so in-place calls see the original
/// pixels. Destinations must be distinct.
pub(crate) fn with_images<R>(
    srcs: &[u64],
    dsts: &[u64],
    f: impl FnOnce(&[&Image], &mut [&mut Image]) -> Result<R>,
) -> Result<R> {
    for (i, id) in dsts.iter().enumerate() {
        if dsts[..i].contains(id) {
            return Err(Error::InvalidArgument(format!(
                "mat {id:#x} is passed twice as a destination"
            )));
        }
    }
    let src_only: Vec<u64> = srcs.iter().copied().filter(|id| !dsts.contains(id)).collect();
    let dst_entries = MATS.resolve_distinct(dsts)?;
    let src_entries = MATS.resolve_distinct(&src_only)?;

    let mut dst_guards = dst_entries
        .iter()
        .map(|(id, entry)| lock(entry, *id))
        .collect::<Result<Vec<_>>>()?;
    let src_guards = src_entries
        .iter()
        .map(|(id, entry)| lock(entry, *id))
        .collect::<Result<Vec<_>>>()?;

    let mut snapshots: Vec<(u64, Image)> = Vec::new();
    for id in srcs {
        if let Some(pos) = dsts.iter().position(|d| d == id) {
            if snapshots.iter().all(|(seen, _)| seen != id) {
                snapshots.push((*id, dst_guards[pos].try_clone()?));
            }
        }
    }

    let sources = srcs
        .iter()
        .map(|id| {
            if let Some(pos) = src_entries.iter().position(|(seen, _)| seen == id) {
                return Ok(&*src_guards[pos]);
            }
            snapshots
                .iter()
                .find(|(seen, _)| seen == id)
                .map(|(_, image)| image)
                .ok_or_else(|| Error::InvalidHandle(format!("mat {id:#x}")))
        })
        .collect::<Result<Vec<&Image>>>()?;
    let mut targets: Vec<&mut Image> = dst_guards.iter_mut().map(|g| &mut **g).collect();
    f(&sources, &mut targets)
}

fn query(mat: CvgMat, f: impl FnOnce(&Image) -> c_int) -> c_int {
    guard(-1, || match MATS.with(mat.id, |image| Ok(f(image))) {
        Ok(value) => value,
        Err(e) => report(&e),
    })
}

// ============================================================================
// Construction and Release
// ============================================================================

/// Create an empty image. cvg_mat_is_valid reports 0 until an operation
/// writes into it.
///
/// @return New image handle, or the null handle on error
#[no_mangle]
pub extern "C" fn cvg_mat_new() -> CvgMat {
    guard(CvgMat::NULL, || CvgMat::insert(Image::empty()))
}

/// Create a zero-filled image.
///
/// @param rows Number of rows, must be positive
/// @param cols Number of columns, must be positive
/// @param mat_type OpenCV type code such as CV_8UC3
/// @return New image handle, or the null handle on error
/// @par Errors (errno):
/// - EINVAL: Non-positive size or a type OpenCV rejects
/// - ENOMEM: Allocation failed
#[no_mangle]
pub extern "C" fn cvg_mat_new_with_size(rows: c_int, cols: c_int, mat_type: c_int) -> CvgMat {
    guard(CvgMat::NULL, || {
        let image = try_or_null!(CvgMat, Image::new(rows, cols, mat_type));
        CvgMat::insert(image)
    })
}

/// Create a view of a rectangle inside `mat`.
///
/// The view shares pixel storage with its parent: writes through either
/// handle are visible through the other, and releasing either handle keeps
/// the storage alive for the other. The parent and its views must not be
/// written from different threads at the same time.
///
/// @param mat Parent image
/// @param rect Region, must lie inside the parent
/// @return New view handle, or the null handle on error
/// @par Errors (errno):
/// - EBADF: Invalid parent handle
/// - EINVAL: Empty parent or region out of bounds
#[no_mangle]
pub extern "C" fn cvg_mat_roi(mat: CvgMat, rect: CvgRect) -> CvgMat {
    guard(CvgMat::NULL, || {
        let view = try_or_null!(CvgMat, MATS.with(mat.id, |image| image.roi(rect.into())));
        CvgMat::insert(view)
    })
}

/// Release an image handle. Releasing the null handle, or a handle that
/// was already released, does nothing.
#[no_mangle]
pub extern "C" fn cvg_mat_free(mat: CvgMat) {
    guard((), || {
        MATS.remove(mat.id);
    })
}

// ============================================================================
// Queries
// ============================================================================

/// Whether the image holds pixel data.
///
/// @return 1 if it does, 0 if it is empty, -1 on error
/// @par Errors (errno):
/// - EBADF: Invalid handle
/// - EBUSY: Handle in use by another call
#[no_mangle]
pub extern "C" fn cvg_mat_is_valid(mat: CvgMat) -> c_int {
    guard(-1, || flag(MATS.with(mat.id, |image| Ok(image.is_valid()))))
}

/// Whether the image is a view created by cvg_mat_roi.
///
/// @return 1 or 0, -1 on error
#[no_mangle]
pub extern "C" fn cvg_mat_is_view(mat: CvgMat) -> c_int {
    guard(-1, || flag(MATS.with(mat.id, |image| Ok(image.is_view()))))
}

/// @return Number of rows, or -1 on error
#[no_mangle]
pub extern "C" fn cvg_mat_rows(mat: CvgMat) -> c_int {
    query(mat, Image::rows)
}

/// @return Number of columns, or -1 on error
#[no_mangle]
pub extern "C" fn cvg_mat_cols(mat: CvgMat) -> c_int {
    query(mat, Image::cols)
}

/// @return OpenCV depth code (CV_8U, CV_32F, ...), or -1 on error
#[no_mangle]
pub extern "C" fn cvg_mat_depth(mat: CvgMat) -> c_int {
    query(mat, Image::depth)
}

/// @return Number of channels, or -1 on error
#[no_mangle]
pub extern "C" fn cvg_mat_channels(mat: CvgMat) -> c_int {
    query(mat, Image::channels)
}

/// @return OpenCV type code (CV_8UC3, ...), or -1 on error
#[no_mangle]
pub extern "C" fn cvg_mat_type(mat: CvgMat) -> c_int {
    query(mat, Image::typ)
}

// ============================================================================
// Operations
// ============================================================================

/// Flip the image in place.
///
/// @param mat Image to flip
/// @param flip_code 0 around the x axis, positive around the y axis,
///        negative around both
/// @return 0 on success, -1 on error
/// @par Errors (errno):
/// - EBADF: Invalid handle
/// - EINVAL: Empty image
#[no_mangle]
pub extern "C" fn cvg_mat_flip(mat: CvgMat, flip_code: c_int) -> c_int {
    guard(-1, || status(MATS.with(mat.id, |image| image.flip(flip_code))))
}

/// Bitwise AND of `mat` with `mask`, in place. `mask` may be `mat` itself.
///
/// @return 0 on success, -1 on error
/// @par Errors (errno):
/// - EBADF: Invalid handle
/// - EINVAL: Size or type mismatch
#[no_mangle]
pub extern "C" fn cvg_mat_logic_and(mat: CvgMat, mask: CvgMat) -> c_int {
    guard(-1, || {
        status(with_images(&[mask.id], &[mat.id], |srcs, dsts| {
            dsts[0].logic_and(srcs[0])
        }))
    })
}

/// Write 255 into `dst` where every channel of `mat` lies in
/// `[lower, upper]`, and 0 elsewhere.
///
/// @return 0 on success, -1 on error
#[no_mangle]
pub extern "C" fn cvg_mat_in_range(
    mat: CvgMat,
    lower: CvgScalar,
    upper: CvgScalar,
    dst: CvgMat,
) -> c_int {
    guard(-1, || {
        status(with_images(&[mat.id], &[dst.id], |srcs, dsts| {
            srcs[0].in_range(lower.into(), upper.into(), dsts[0])
        }))
    })
}

/// Copy channels between images. Destinations must already be allocated.
///
/// @param srcs Source images
/// @param src_count Number of source images
/// @param dsts Destination images, distinct from each other
/// @param dst_count Number of destination images
/// @param from_to Pairs of (input channel, output channel) indices counted
///        across all images of each list
/// @param pair_count Number of pairs
/// @return 0 on success, -1 on error
/// @par Errors (errno):
/// - EBADF: Invalid handle in either list
/// - EINVAL: NULL list, empty destination, or channel index out of range
#[no_mangle]
pub unsafe extern "C" fn cvg_mat_mix_channels(
    srcs: *const CvgMat,
    src_count: size_t,
    dsts: *const CvgMat,
    dst_count: size_t,
    from_to: *const c_int,
    pair_count: size_t,
) -> c_int {
    guard(-1, || {
        let run = || -> Result<()> {
            let srcs = slice_arg(srcs, src_count, "srcs")?;
            let dsts = slice_arg(dsts, dst_count, "dsts")?;
            let values = pair_count
                .checked_mul(2)
                .ok_or_else(|| Error::InvalidArgument(format!("{pair_count} pairs")))?;
            let from_to = slice_arg(from_to, values, "from_to")?;
            let src_ids: Vec<u64> = srcs.iter().map(|m| m.id).collect();
            let dst_ids: Vec<u64> = dsts.iter().map(|m| m.id).collect();
            with_images(&src_ids, &dst_ids, |s, d| cvgate::mix_channels(s, d, from_to))
        };
        status(run())
    })
}

/// Normalize `mat` into `dst`.
///
/// @param alpha Norm value, or lower range bound for NORM_MINMAX
/// @param beta Upper range bound for NORM_MINMAX
/// @param norm_type OpenCV norm type (NORM_L2, NORM_MINMAX, ...)
/// @return 0 on success, -1 on error
#[no_mangle]
pub extern "C" fn cvg_mat_normalize(
    mat: CvgMat,
    dst: CvgMat,
    alpha: f64,
    beta: f64,
    norm_type: c_int,
) -> c_int {
    guard(-1, || {
        status(with_images(&[mat.id], &[dst.id], |srcs, dsts| {
            srcs[0].normalize(dsts[0], alpha, beta, norm_type)
        }))
    })
}
