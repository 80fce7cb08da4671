// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

//! Object detection C API - cascade classifiers and HOG people detection.

use crate::array::{CvgDoubleArray, CvgRectArray};
use crate::error::{c_str_arg, flag, guard, report, slice_arg, status};
use crate::geometry::{CvgRect, CvgSize};
use crate::handle::{lock, Kind, Registry};
use crate::mat::{CvgMat, MATS};
use crate::{check_null, try_or_errno, try_or_null};
use cvgate::{Cascade, CascadeParams, Error, Hog, HogParams, SvmDetector};
use libc::{c_char, c_int, size_t, ssize_t};

/// Opaque cascade classifier handle. `id == 0` is the null handle.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CvgCascadeClassifier {
    pub id: u64,
}

impl CvgCascadeClassifier {
    pub const NULL: Self = Self { id: 0 };
}

/// Opaque HOG descriptor handle. `id == 0` is the null handle.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CvgHog {
    pub id: u64,
}

impl CvgHog {
    pub const NULL: Self = Self { id: 0 };
}

/// Opaque SVM coefficient vector handle. `id == 0` is the null handle.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CvgSvmDetector {
    pub id: u64,
}

impl CvgSvmDetector {
    pub const NULL: Self = Self { id: 0 };
}

static CASCADES: Registry<Cascade> = Registry::new(Kind::CascadeClassifier);
static HOGS: Registry<Hog> = Registry::new(Kind::Hog);
static SVM_DETECTORS: Registry<SvmDetector> = Registry::new(Kind::SvmDetector);

// ============================================================================
// Cascade Classifier Functions
// ============================================================================

/// Create a cascade classifier with no model loaded.
///
/// @return New classifier handle, or the null handle on error
#[no_mangle]
pub extern "C" fn cvg_cascade_classifier_new() -> CvgCascadeClassifier {
    guard(CvgCascadeClassifier::NULL, || {
        let cascade = try_or_null!(CvgCascadeClassifier, Cascade::new());
        CvgCascadeClassifier {
            id: CASCADES.insert(cascade),
        }
    })
}

/// Create a cascade classifier from a model file.
///
/// Relative paths that do not exist are also looked up in the directory
/// named by the `CVGATE_CASCADE_DIR` environment variable.
///
/// @param path Model file (XML)
/// @return New classifier handle, or the null handle on error
/// @par Errors (errno):
/// - EINVAL: NULL or non UTF-8 path
/// - ENOENT: The file does not exist
/// - EBADMSG: The file is not a loadable cascade model
#[no_mangle]
pub unsafe extern "C" fn cvg_cascade_classifier_from_path(
    path: *const c_char,
) -> CvgCascadeClassifier {
    guard(CvgCascadeClassifier::NULL, || {
        let path = try_or_null!(CvgCascadeClassifier, c_str_arg(path, "path"));
        let cascade = try_or_null!(CvgCascadeClassifier, Cascade::from_path(path));
        CvgCascadeClassifier {
            id: CASCADES.insert(cascade),
        }
    })
}

/// Load a model into an existing classifier, replacing the current one.
///
/// @return 1 if the model loaded, 0 if the file is missing or not a
///         cascade model (the classifier is then empty), -1 on error
/// @par Errors (errno):
/// - EBADF: Invalid handle
/// - EINVAL: NULL or non UTF-8 path
#[no_mangle]
pub unsafe extern "C" fn cvg_cascade_classifier_load(
    cascade: CvgCascadeClassifier,
    path: *const c_char,
) -> c_int {
    guard(-1, || {
        let path = try_or_errno!(c_str_arg(path, "path"));
        flag(CASCADES.with(cascade.id, |c| c.load(path)))
    })
}

/// @return 1 if no model is loaded, 0 otherwise, -1 on error
#[no_mangle]
pub extern "C" fn cvg_cascade_classifier_is_empty(cascade: CvgCascadeClassifier) -> c_int {
    guard(-1, || flag(CASCADES.with(cascade.id, |c| c.is_empty())))
}

/// Detect objects at multiple scales.
///
/// On success `out` receives a newly allocated array, possibly of length 0
/// but never NULL, which must be released with cvg_rect_array_free. Prior
/// contents of `out` are overwritten, not released.
///
/// @param cascade Classifier with a model loaded
/// @param mat Image to search
/// @param out Receives the detected rectangles
/// @param scale_factor Scale step between pyramid levels, greater than 1
/// @param min_neighbors Neighbours a candidate needs to be kept
/// @param flags Legacy OpenCV flags, normally 0
/// @param min_size Smallest object size, 0x0 for no limit
/// @param max_size Largest object size, 0x0 for no limit
/// @return 0 on success, -1 on error
/// @par Errors (errno):
/// - EBADF: Invalid classifier or image handle
/// - EINVAL: NULL out, empty image, or scale_factor <= 1
/// - EIO: No model loaded
#[no_mangle]
pub unsafe extern "C" fn cvg_cascade_classifier_detect_multi_scale(
    cascade: CvgCascadeClassifier,
    mat: CvgMat,
    out: *mut CvgRectArray,
    scale_factor: f64,
    min_neighbors: c_int,
    flags: c_int,
    min_size: CvgSize,
    max_size: CvgSize,
) -> c_int {
    guard(-1, || {
        check_null!(out);
        let params = CascadeParams {
            scale_factor,
            min_neighbors,
            flags,
            min_size: min_size.into(),
            max_size: max_size.into(),
        };
        let found = try_or_errno!(CASCADES.with(cascade.id, |c| {
            let entry = MATS.resolve(mat.id)?;
            let image = lock(&entry, mat.id)?;
            c.detect(&image, &params)
        }));
        *out = CvgRectArray::from_vec(found.into_iter().map(CvgRect::from).collect());
        0
    })
}

/// Release a classifier handle. Releasing the null handle, or a handle
/// that was already released, does nothing.
#[no_mangle]
pub extern "C" fn cvg_cascade_classifier_free(cascade: CvgCascadeClassifier) {
    guard((), || {
        CASCADES.remove(cascade.id);
    })
}

// ============================================================================
// SVM Detector Functions
// ============================================================================

fn insert_detector(detector: cvgate::Result<SvmDetector>) -> CvgSvmDetector {
    let detector = try_or_null!(CvgSvmDetector, detector);
    CvgSvmDetector {
        id: SVM_DETECTORS.insert(detector),
    }
}

/// Coefficients of OpenCV's default people detector, trained for a 64x128
/// window.
///
/// @return New detector handle, or the null handle on error
#[no_mangle]
pub extern "C" fn cvg_hog_default_people_detector() -> CvgSvmDetector {
    guard(CvgSvmDetector::NULL, || {
        insert_detector(SvmDetector::default_people())
    })
}

/// Coefficients of the Daimler people detector, trained for a 48x96 window.
///
/// @return New detector handle, or the null handle on error
#[no_mangle]
pub extern "C" fn cvg_hog_daimler_people_detector() -> CvgSvmDetector {
    guard(CvgSvmDetector::NULL, || {
        insert_detector(SvmDetector::daimler_people())
    })
}

/// Caller-trained coefficients, copied. They must match the descriptor
/// size of the HOG window they are attached to, optionally plus a bias.
///
/// @param coefficients Coefficient values
/// @param len Number of values, must be positive
/// @return New detector handle, or the null handle on error
/// @par Errors (errno):
/// - EINVAL: NULL coefficients or zero length
#[no_mangle]
pub unsafe extern "C" fn cvg_svm_detector_new(
    coefficients: *const f32,
    len: size_t,
) -> CvgSvmDetector {
    guard(CvgSvmDetector::NULL, || {
        let coefficients = try_or_null!(
            CvgSvmDetector,
            slice_arg(coefficients, len, "coefficients")
        );
        insert_detector(SvmDetector::from_coefficients(coefficients))
    })
}

/// @return Number of coefficients, or -1 on error
#[no_mangle]
pub extern "C" fn cvg_svm_detector_len(detector: CvgSvmDetector) -> ssize_t {
    guard(-1, || {
        match SVM_DETECTORS.with(detector.id, |d| Ok(d.len())) {
            Ok(len) => len as ssize_t,
            Err(e) => report(&e) as ssize_t,
        }
    })
}

/// Release a detector handle. Releasing the null handle, a handle that was
/// already released, or a detector moved into a HOG descriptor does
/// nothing.
#[no_mangle]
pub extern "C" fn cvg_svm_detector_free(detector: CvgSvmDetector) {
    guard((), || {
        SVM_DETECTORS.remove(detector.id);
    })
}

// ============================================================================
// HOG Descriptor Functions
// ============================================================================

/// Create a HOG descriptor with OpenCV's default parameters (64x128
/// window) and no SVM detector.
///
/// @return New descriptor handle, or the null handle on error
#[no_mangle]
pub extern "C" fn cvg_hog_new() -> CvgHog {
    guard(CvgHog::NULL, || {
        let hog = try_or_null!(CvgHog, Hog::new());
        CvgHog {
            id: HOGS.insert(hog),
        }
    })
}

/// Attach an SVM detector, moving it into the descriptor.
///
/// On success `detector` is consumed: the handle becomes invalid and
/// releasing it does nothing. The preset detectors also set the detection
/// window they were trained for. When the coefficients do not fit, both
/// handles are unchanged. A detector is moved into at most one descriptor.
///
/// @return 0 on success, -1 on error
/// @par Errors (errno):
/// - EBADF: Invalid descriptor or detector handle
/// - EBUSY: Either handle in use by another call
/// - EINVAL: Coefficient count does not fit the descriptor window
#[no_mangle]
pub extern "C" fn cvg_hog_set_svm_detector(hog: CvgHog, detector: CvgSvmDetector) -> c_int {
    guard(-1, || {
        status(HOGS.with(hog.id, |h| {
            // The detector stays locked until it has left the registry, so
            // a concurrent attach of the same handle sees EBUSY or EBADF.
            let entry = SVM_DETECTORS.resolve(detector.id)?;
            let coefficients = lock(&entry, detector.id)?;
            h.check_svm_detector(&coefficients)?;
            if !SVM_DETECTORS.remove(detector.id) {
                return Err(Error::InvalidHandle(format!(
                    "svm detector {:#x} was released",
                    detector.id
                )));
            }
            h.set_svm_detector(coefficients.clone())
        }))
    })
}

/// Detect people at multiple scales.
///
/// On success `out_rects` and `out_weights` receive newly allocated arrays
/// of equal length, possibly 0 but never NULL, to be released with
/// cvg_rect_array_free and cvg_double_array_free. Prior contents are
/// overwritten, not released.
/// An image smaller than the detection window yields no detections.
///
/// @param hog Descriptor with an SVM detector attached
/// @param mat Image to search
/// @param out_rects Receives the detected rectangles
/// @param out_weights Receives one SVM confidence per rectangle (can be NULL)
/// @param hit_threshold Minimum SVM distance of a window to count as a hit
/// @param win_stride Window step, a multiple of the block stride, or 0x0
///        for the block stride
/// @param padding Padding added around the image
/// @param scale Scale step between pyramid levels, greater than 1
/// @param final_threshold Grouping threshold for overlapping hits
/// @param use_meanshift_grouping Group with mean shift instead of rectangles
/// @return 0 on success, -1 on error
/// @par Errors (errno):
/// - EBADF: Invalid descriptor or image handle
/// - EINVAL: NULL out_rects, empty image, scale <= 1, a win_stride that
///   is neither 0x0 nor positive, or negative padding
/// - EIO: No detector attached
#[no_mangle]
pub unsafe extern "C" fn cvg_hog_detect_multi_scale(
    hog: CvgHog,
    mat: CvgMat,
    out_rects: *mut CvgRectArray,
    out_weights: *mut CvgDoubleArray,
    hit_threshold: f64,
    win_stride: CvgSize,
    padding: CvgSize,
    scale: f64,
    final_threshold: f64,
    use_meanshift_grouping: bool,
) -> c_int {
    guard(-1, || {
        check_null!(out_rects);
        let params = HogParams {
            hit_threshold,
            win_stride: win_stride.into(),
            padding: padding.into(),
            scale,
            final_threshold,
            use_meanshift_grouping,
        };
        let found = try_or_errno!(HOGS.with(hog.id, |h| {
            let entry = MATS.resolve(mat.id)?;
            let image = lock(&entry, mat.id)?;
            h.detect(&image, &params)
        }));
        *out_rects = CvgRectArray::from_vec(found.rects.into_iter().map(CvgRect::from).collect());
        if !out_weights.is_null() {
            *out_weights = CvgDoubleArray::from_vec(found.weights);
        }
        0
    })
}

/// Release a descriptor handle together with its attached detector.
/// Releasing the null handle, or a handle that was already released, does
/// nothing.
#[no_mangle]
pub extern "C" fn cvg_hog_free(hog: CvgHog) {
    guard((), || {
        HOGS.remove(hog.id);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::{cvg_double_array_free, cvg_rect_array_free};
    use crate::geometry::cvg_size_new;
    use crate::mat::{cvg_mat_free, cvg_mat_new, cvg_mat_new_with_size};
    use opencv::core::{CV_8UC1, CV_8UC3};
    use std::ffi::CString;
    use std::path::PathBuf;

    /// A frontal face model from the environment or a usual install path.
    fn face_model() -> Option<CString> {
        let name = "haarcascade_frontalface_default.xml";
        let mut dirs: Vec<PathBuf> = std::env::var_os("CVGATE_CASCADE_DIR")
            .map(PathBuf::from)
            .into_iter()
            .collect();
        dirs.extend(
            [
                "/usr/share/opencv4/haarcascades",
                "/usr/local/share/opencv4/haarcascades",
                "/usr/share/opencv/haarcascades",
                "/opt/homebrew/share/opencv4/haarcascades",
            ]
            .map(PathBuf::from),
        );
        let path = dirs.into_iter().map(|d| d.join(name)).find(|p| p.exists())?;
        CString::new(path.to_str()?).ok()
    }

    unsafe fn hog_detect(hog: CvgHog, mat: CvgMat, hit_threshold: f64) -> (c_int, CvgRectArray, CvgDoubleArray) {
        let mut rects = CvgRectArray::default();
        let mut weights = CvgDoubleArray::default();
        let ret = cvg_hog_detect_multi_scale(
            hog,
            mat,
            &mut rects,
            &mut weights,
            hit_threshold,
            cvg_size_new(8, 8),
            cvg_size_new(0, 0),
            1.05,
            2.0,
            false,
        );
        (ret, rects, weights)
    }

    #[test]
    fn test_cascade_missing_and_bad_models() {
        let missing = unsafe { cvg_cascade_classifier_from_path(c"/nonexistent/model.xml".as_ptr()) };
        assert_eq!(missing, CvgCascadeClassifier::NULL);
        assert_eq!(errno::errno().0, libc::ENOENT);

        let bad = std::env::temp_dir().join(format!("cvgate-capi-bad-{}.xml", std::process::id()));
        std::fs::write(&bad, b"<opencv_storage></opencv_storage>").unwrap();
        let path = CString::new(bad.to_str().unwrap()).unwrap();
        let cascade = unsafe { cvg_cascade_classifier_from_path(path.as_ptr()) };
        assert_eq!(cascade, CvgCascadeClassifier::NULL);
        assert_eq!(errno::errno().0, libc::EBADMSG);

        let empty = cvg_cascade_classifier_new();
        assert_eq!(unsafe { cvg_cascade_classifier_load(empty, path.as_ptr()) }, 0);
        assert_eq!(cvg_cascade_classifier_is_empty(empty), 1);
        std::fs::remove_file(&bad).unwrap();

        let mat = cvg_mat_new_with_size(32, 32, CV_8UC1);
        let mut out = CvgRectArray::default();
        let ret = unsafe {
            cvg_cascade_classifier_detect_multi_scale(
                empty,
                mat,
                &mut out,
                1.1,
                3,
                0,
                cvg_size_new(0, 0),
                cvg_size_new(0, 0),
            )
        };
        assert_eq!(ret, -1);
        assert_eq!(errno::errno().0, libc::EIO);
        assert!(out.data.is_null());

        cvg_cascade_classifier_free(empty);
        assert_eq!(cvg_cascade_classifier_is_empty(empty), -1);
        assert_eq!(errno::errno().0, libc::EBADF);
        cvg_cascade_classifier_free(empty);
        cvg_mat_free(mat);
    }

    #[test]
    fn test_cascade_detects_nothing_on_blank_image() {
        let Some(model) = face_model() else {
            eprintln!("no cascade model found, skipping");
            return;
        };
        let cascade = unsafe { cvg_cascade_classifier_from_path(model.as_ptr()) };
        assert_ne!(cascade, CvgCascadeClassifier::NULL);
        assert_eq!(cvg_cascade_classifier_is_empty(cascade), 0);

        let mat = cvg_mat_new_with_size(120, 160, CV_8UC1);
        let mut out = CvgRectArray::default();
        unsafe {
            let ret = cvg_cascade_classifier_detect_multi_scale(
                cascade,
                mat,
                &mut out,
                1.1,
                3,
                0,
                cvg_size_new(0, 0),
                cvg_size_new(0, 0),
            );
            assert_eq!(ret, 0);
            assert!(!out.data.is_null());
            assert_eq!(out.len, 0);
            cvg_rect_array_free(&mut out);
            cvg_rect_array_free(&mut out);
        }
        assert_eq!(unsafe { cvg_cascade_classifier_load(cascade, model.as_ptr()) }, 1);
        cvg_cascade_classifier_free(cascade);
        cvg_mat_free(mat);
    }

    #[test]
    fn test_presets_share_attach_contract() {
        let image = cvg_mat_new_with_size(200, 200, CV_8UC3);
        for detector in [cvg_hog_default_people_detector(), cvg_hog_daimler_people_detector()] {
            assert_ne!(detector, CvgSvmDetector::NULL);
            assert!(cvg_svm_detector_len(detector) > 0);

            let hog = cvg_hog_new();
            assert_eq!(cvg_hog_set_svm_detector(hog, detector), 0);

            // The detector moved into the descriptor.
            assert_eq!(cvg_svm_detector_len(detector), -1);
            assert_eq!(errno::errno().0, libc::EBADF);
            cvg_svm_detector_free(detector);

            unsafe {
                let (ret, mut rects, mut weights) = hog_detect(hog, image, 0.0);
                assert_eq!(ret, 0);
                assert_eq!(rects.len, weights.len);
                cvg_rect_array_free(&mut rects);
                cvg_double_array_free(&mut weights);

                // Nothing clears an unreachable threshold.
                let (ret, mut rects, mut weights) = hog_detect(hog, image, 1.0e6);
                assert_eq!(ret, 0);
                assert!(!rects.data.is_null());
                assert_eq!(rects.len, 0);
                assert!(!weights.data.is_null());
                assert_eq!(weights.len, 0);
                cvg_rect_array_free(&mut rects);
                cvg_double_array_free(&mut weights);
            }
            cvg_hog_free(hog);
            cvg_hog_free(hog);
        }
        cvg_mat_free(image);
    }

    #[test]
    fn test_mismatched_detector_is_not_consumed() {
        let coefficients = [0.25f32; 12];
        let detector = unsafe { cvg_svm_detector_new(coefficients.as_ptr(), coefficients.len()) };
        assert_eq!(cvg_svm_detector_len(detector), 12);

        let hog = cvg_hog_new();
        assert_eq!(cvg_hog_set_svm_detector(hog, detector), -1);
        assert_eq!(errno::errno().0, libc::EINVAL);
        assert_eq!(cvg_svm_detector_len(detector), 12);

        let image = cvg_mat_new_with_size(128, 64, CV_8UC3);
        let (ret, rects, _) = unsafe { hog_detect(hog, image, 0.0) };
        assert_eq!(ret, -1);
        assert_eq!(errno::errno().0, libc::EIO);
        assert!(rects.data.is_null());

        assert_eq!(unsafe { cvg_svm_detector_new(std::ptr::null(), 4) }, CvgSvmDetector::NULL);
        assert_eq!(errno::errno().0, libc::EINVAL);

        cvg_svm_detector_free(detector);
        cvg_hog_free(hog);
        cvg_mat_free(image);
    }

    #[test]
    fn test_detector_moves_once() {
        let detector = cvg_hog_default_people_detector();
        let first = cvg_hog_new();
        let second = cvg_hog_new();

        // Another call holding the detector blocks the move.
        {
            let entry = SVM_DETECTORS.resolve(detector.id).unwrap();
            let _held = lock(&entry, detector.id).unwrap();
            assert_eq!(cvg_hog_set_svm_detector(first, detector), -1);
            assert_eq!(errno::errno().0, libc::EBUSY);
        }
        assert!(cvg_svm_detector_len(detector) > 0);
        assert!(!HOGS.with(first.id, |h| Ok(h.has_detector())).unwrap());

        assert_eq!(cvg_hog_set_svm_detector(first, detector), 0);
        assert_eq!(cvg_hog_set_svm_detector(second, detector), -1);
        assert_eq!(errno::errno().0, libc::EBADF);
        assert!(HOGS.with(first.id, |h| Ok(h.has_detector())).unwrap());
        assert!(!HOGS.with(second.id, |h| Ok(h.has_detector())).unwrap());

        cvg_hog_free(first);
        cvg_hog_free(second);
    }

    #[test]
    fn test_concurrent_attach_moves_detector_once() {
        for _ in 0..20 {
            let detector = cvg_hog_default_people_detector();
            let hogs = [cvg_hog_new(), cvg_hog_new(), cvg_hog_new(), cvg_hog_new()];
            let attached: usize = std::thread::scope(|s| {
                let workers: Vec<_> = hogs
                    .iter()
                    .map(|&hog| s.spawn(move || cvg_hog_set_svm_detector(hog, detector)))
                    .collect();
                workers
                    .into_iter()
                    .map(|w| w.join().unwrap())
                    .filter(|&ret| ret == 0)
                    .count()
            });
            let holding = hogs
                .iter()
                .filter(|hog| HOGS.with(hog.id, |h| Ok(h.has_detector())).unwrap())
                .count();
            assert!(attached <= 1);
            assert_eq!(attached, holding);
            cvg_svm_detector_free(detector);
            for hog in hogs {
                cvg_hog_free(hog);
            }
        }
    }

    #[test]
    fn test_detect_window_arguments() {
        let hog = cvg_hog_new();
        assert_eq!(cvg_hog_set_svm_detector(hog, cvg_hog_default_people_detector()), 0);
        let image = cvg_mat_new_with_size(160, 96, CV_8UC3);
        let small = cvg_mat_new_with_size(40, 40, CV_8UC3);
        unsafe {
            let mut rects = CvgRectArray::default();
            for (stride, padding) in [
                (cvg_size_new(0, 8), cvg_size_new(0, 0)),
                (cvg_size_new(8, -8), cvg_size_new(0, 0)),
                (cvg_size_new(8, 8), cvg_size_new(-4, 0)),
            ] {
                let ret = cvg_hog_detect_multi_scale(
                    hog,
                    image,
                    &mut rects,
                    std::ptr::null_mut(),
                    0.0,
                    stride,
                    padding,
                    1.05,
                    2.0,
                    false,
                );
                assert_eq!(ret, -1);
                assert_eq!(errno::errno().0, libc::EINVAL);
                assert!(rects.data.is_null());
            }

            let (ret, mut rects, mut weights) = hog_detect(hog, small, 0.0);
            assert_eq!(ret, 0);
            assert!(!rects.data.is_null());
            assert_eq!(rects.len, 0);
            assert_eq!(weights.len, 0);
            cvg_rect_array_free(&mut rects);
            cvg_double_array_free(&mut weights);
        }
        cvg_mat_free(small);
        cvg_mat_free(image);
        cvg_hog_free(hog);
    }

    #[test]
    fn test_detect_argument_errors() {
        let hog = cvg_hog_new();
        assert_eq!(cvg_hog_set_svm_detector(hog, cvg_hog_default_people_detector()), 0);
        let empty = cvg_mat_new();
        unsafe {
            let (ret, _, _) = hog_detect(hog, empty, 0.0);
            assert_eq!(ret, -1);
            assert_eq!(errno::errno().0, libc::EINVAL);

            let ret = cvg_hog_detect_multi_scale(
                hog,
                empty,
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                0.0,
                cvg_size_new(8, 8),
                cvg_size_new(0, 0),
                1.05,
                2.0,
                false,
            );
            assert_eq!(ret, -1);
            assert_eq!(errno::errno().0, libc::EINVAL);
        }
        cvg_mat_free(empty);
        cvg_hog_free(hog);

        unsafe {
            let (ret, _, _) = hog_detect(hog, empty, 0.0);
            assert_eq!(ret, -1);
            assert_eq!(errno::errno().0, libc::EBADF);
        }
    }
}
