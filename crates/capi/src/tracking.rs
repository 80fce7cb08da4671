// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

//! Tracking C API - termination criteria and CamShift.

use crate::error::{guard, status};
use crate::geometry::{CvgRect, CvgRotatedRect};
use crate::handle::{lock, Kind, Registry};
use crate::mat::{CvgMat, MATS};
use crate::{check_null, try_or_errno, try_or_null};
use cvgate::tracking::{self, TermCriteria};
use libc::c_int;

/// Stop after a maximum number of iterations.
pub const CVG_TERM_CRITERIA_COUNT: c_int = 1;
/// Same as CVG_TERM_CRITERIA_COUNT.
pub const CVG_TERM_CRITERIA_MAX_ITER: c_int = 1;
/// Stop once the search window moves less than epsilon.
pub const CVG_TERM_CRITERIA_EPS: c_int = 2;

/// Opaque termination criteria handle. `id == 0` is the null handle.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CvgTermCriteria {
    pub id: u64,
}

impl CvgTermCriteria {
    pub const NULL: Self = Self { id: 0 };
}

/// Parameters of a termination criteria handle.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CvgTermCriteriaParams {
    /// CVG_TERM_CRITERIA_COUNT, CVG_TERM_CRITERIA_EPS, or both OR-ed
    pub kind: c_int,
    pub max_count: c_int,
    pub epsilon: f64,
}

static TERM_CRITERIA: Registry<TermCriteria> = Registry::new(Kind::TermCriteria);

/// Create termination criteria for iterative algorithms.
///
/// @param kind CVG_TERM_CRITERIA_COUNT, CVG_TERM_CRITERIA_EPS, or both
/// @param max_count Iteration limit, positive when COUNT is set
/// @param epsilon Convergence threshold, non-negative when EPS is set
/// @return New criteria handle, or the null handle on error
/// @par Errors (errno):
/// - EINVAL: Unknown kind or out-of-range limit
#[no_mangle]
pub extern "C" fn cvg_term_criteria_new(
    kind: c_int,
    max_count: c_int,
    epsilon: f64,
) -> CvgTermCriteria {
    guard(CvgTermCriteria::NULL, || {
        let criteria = try_or_null!(
            CvgTermCriteria,
            TermCriteria::new(kind, max_count, epsilon)
        );
        CvgTermCriteria {
            id: TERM_CRITERIA.insert(criteria),
        }
    })
}

/// Read back the parameters of a criteria handle.
///
/// @return 0 on success, -1 on error
/// @par Errors (errno):
/// - EBADF: Invalid handle
/// - EINVAL: NULL out
#[no_mangle]
pub unsafe extern "C" fn cvg_term_criteria_get(
    criteria: CvgTermCriteria,
    out: *mut CvgTermCriteriaParams,
) -> c_int {
    guard(-1, || {
        check_null!(out);
        let params = try_or_errno!(TERM_CRITERIA.with(criteria.id, |c| {
            Ok(CvgTermCriteriaParams {
                kind: c.kind(),
                max_count: c.max_count(),
                epsilon: c.epsilon(),
            })
        }));
        *out = params;
        0
    })
}

#[no_mangle]
pub extern "C" fn cvg_term_criteria_free(criteria: CvgTermCriteria) {
    guard((), || {
        TERM_CRITERIA.remove(criteria.id);
    })
}

/// Track an object with CamShift.
///
/// @param back_project Back-projection of the object's histogram, from
///        cvg_calc_back_project
/// @param window Initial search window
/// @param criteria Termination criteria
/// @param out_box Receives the oriented box around the object
/// @param out_window Receives the converged search window, to pass as
///        `window` for the next frame (can be NULL)
/// @return 0 on success, -1 on error
/// @par Errors (errno):
/// - EBADF: Invalid image or criteria handle
/// - EINVAL: NULL out_box, empty image, or empty window
#[no_mangle]
pub unsafe extern "C" fn cvg_camshift(
    back_project: CvgMat,
    window: CvgRect,
    criteria: CvgTermCriteria,
    out_box: *mut CvgRotatedRect,
    out_window: *mut CvgRect,
) -> c_int {
    guard(-1, || {
        check_null!(out_box);
        let criteria = try_or_errno!(TERM_CRITERIA.with(criteria.id, |c| Ok(*c)));
        let mut tracked = None;
        let ret = status(MATS.resolve(back_project.id).and_then(|entry| {
            let image = lock(&entry, back_project.id)?;
            tracked = Some(tracking::camshift(&image, window.into(), &criteria)?);
            Ok(())
        }));
        if let Some(tracked) = tracked {
            *out_box = tracked.rotated.into();
            if !out_window.is_null() {
                *out_window = tracked.window.into();
            }
        }
        ret
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::cvg_rect_new;
    use crate::mat::{cvg_mat_free, cvg_mat_new, cvg_mat_new_with_size};
    use opencv::core::{Scalar, CV_8UC1};
    use opencv::prelude::*;

    #[test]
    fn test_constants_match_core() {
        assert_eq!(CVG_TERM_CRITERIA_COUNT, tracking::COUNT);
        assert_eq!(CVG_TERM_CRITERIA_MAX_ITER, tracking::MAX_ITER);
        assert_eq!(CVG_TERM_CRITERIA_EPS, tracking::EPS);
    }

    #[test]
    fn test_term_criteria_lifecycle() {
        let criteria = cvg_term_criteria_new(CVG_TERM_CRITERIA_COUNT | CVG_TERM_CRITERIA_EPS, 10, 1.0);
        assert_ne!(criteria, CvgTermCriteria::NULL);
        let mut params = CvgTermCriteriaParams::default();
        assert_eq!(unsafe { cvg_term_criteria_get(criteria, &mut params) }, 0);
        assert_eq!(
            params,
            CvgTermCriteriaParams {
                kind: 3,
                max_count: 10,
                epsilon: 1.0
            }
        );

        cvg_term_criteria_free(criteria);
        assert_eq!(unsafe { cvg_term_criteria_get(criteria, &mut params) }, -1);
        assert_eq!(errno::errno().0, libc::EBADF);
        cvg_term_criteria_free(criteria);

        assert_eq!(cvg_term_criteria_new(16, 10, 1.0), CvgTermCriteria::NULL);
        assert_eq!(errno::errno().0, libc::EINVAL);
    }

    #[test]
    fn test_camshift_converges_on_blob() {
        let bp = cvg_mat_new_with_size(120, 120, CV_8UC1);
        MATS.with(bp.id, |image| {
            let mut blob = image.roi(opencv::core::Rect::new(70, 40, 24, 24))?;
            blob.mat_mut().set_to_def(&Scalar::all(255.0))?;
            Ok(())
        })
        .unwrap();
        let criteria = cvg_term_criteria_new(CVG_TERM_CRITERIA_COUNT | CVG_TERM_CRITERIA_EPS, 20, 1.0);

        let mut out_box = CvgRotatedRect::default();
        let mut out_window = CvgRect::default();
        let ret = unsafe {
            cvg_camshift(bp, cvg_rect_new(60, 30, 30, 30), criteria, &mut out_box, &mut out_window)
        };
        assert_eq!(ret, 0);
        assert!((out_box.center.x - 82.0).abs() < 3.0, "{out_box:?}");
        assert!((out_box.center.y - 52.0).abs() < 3.0, "{out_box:?}");
        assert!(out_window.width > 0);

        // The converged window is optional.
        let ret = unsafe {
            cvg_camshift(bp, cvg_rect_new(60, 30, 30, 30), criteria, &mut out_box, std::ptr::null_mut())
        };
        assert_eq!(ret, 0);

        cvg_term_criteria_free(criteria);
        cvg_mat_free(bp);
    }

    #[test]
    fn test_camshift_errors() {
        let criteria = cvg_term_criteria_new(CVG_TERM_CRITERIA_COUNT, 5, 0.0);
        let empty = cvg_mat_new();
        let mut out_box = CvgRotatedRect::default();
        unsafe {
            let ret = cvg_camshift(empty, cvg_rect_new(0, 0, 4, 4), criteria, &mut out_box, std::ptr::null_mut());
            assert_eq!(ret, -1);
            assert_eq!(errno::errno().0, libc::EINVAL);

            let ret = cvg_camshift(empty, cvg_rect_new(0, 0, 4, 4), criteria, std::ptr::null_mut(), std::ptr::null_mut());
            assert_eq!(ret, -1);
            assert_eq!(errno::errno().0, libc::EINVAL);

            cvg_term_criteria_free(criteria);
            let ret = cvg_camshift(empty, cvg_rect_new(0, 0, 4, 4), criteria, &mut out_box, std::ptr::null_mut());
            assert_eq!(ret, -1);
            assert_eq!(errno::errno().0, libc::EBADF);
        }
        cvg_mat_free(empty);
    }
}
