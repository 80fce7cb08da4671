// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

//! Image encoding and decoding C API.

use crate::array::CvgEncoded;
use crate::error::{c_str_arg, guard, report, slice_arg};
use crate::mat::{CvgMat, MATS};
use crate::try_or_null;
use cvgate::codecs;
use libc::{c_char, c_int, size_t};

/// Decode an image held in memory.
///
/// Bytes that are not a decodable image still produce a live handle whose
/// cvg_mat_is_valid is 0; the handle must be released as usual.
///
/// @param data Encoded bytes (may be NULL when len is 0)
/// @param len Number of bytes
/// @param flags OpenCV IMREAD_* flags
/// @return New image handle, or the null handle on error
/// @par Errors (errno):
/// - EINVAL: NULL data with a non-zero length
/// - ENOMEM: Allocation failed
#[no_mangle]
pub unsafe extern "C" fn cvg_imdecode(data: *const u8, len: size_t, flags: c_int) -> CvgMat {
    guard(CvgMat::NULL, || {
        let bytes = try_or_null!(CvgMat, slice_arg(data, len, "data"));
        let image = try_or_null!(CvgMat, codecs::decode(bytes, flags));
        CvgMat::insert(image)
    })
}

/// Read an image file. A missing or unreadable file produces a live handle
/// whose cvg_mat_is_valid is 0.
///
/// @param path File path
/// @param flags OpenCV IMREAD_* flags
/// @return New image handle, or the null handle on error
/// @par Errors (errno):
/// - EINVAL: NULL or non UTF-8 path
#[no_mangle]
pub unsafe extern "C" fn cvg_imread(path: *const c_char, flags: c_int) -> CvgMat {
    guard(CvgMat::NULL, || {
        let path = try_or_null!(CvgMat, c_str_arg(path, "path"));
        let image = try_or_null!(CvgMat, codecs::read(path, flags));
        CvgMat::insert(image)
    })
}

/// Encode an image into the format named by `ext`.
///
/// The result is always allocated and must be released with
/// cvg_encoded_free, including when `ok` is false. Encoding an empty image
/// or into an unknown format gives `ok == false` without setting errno.
///
/// @param ext File extension naming the format, such as ".png" or ".jpg"
/// @param mat Image to encode
/// @param params OpenCV IMWRITE_* flag and value pairs (may be NULL)
/// @param param_count Number of ints in `params`
/// @return Encode result
/// @par Errors (errno, with ok == false):
/// - EBADF: Invalid handle
/// - EINVAL: NULL extension or odd param_count
#[no_mangle]
pub unsafe extern "C" fn cvg_imencode(
    ext: *const c_char,
    mat: CvgMat,
    params: *const c_int,
    param_count: size_t,
) -> CvgEncoded {
    let failed = || CvgEncoded::from_encoded(cvgate::Encoded::default());
    guard(CvgEncoded::default(), || {
        let run = || -> cvgate::Result<cvgate::Encoded> {
            let ext = c_str_arg(ext, "ext")?;
            let params = slice_arg(params, param_count, "params")?;
            MATS.with(mat.id, |image| codecs::encode(ext, image, params))
        };
        match run() {
            Ok(encoded) => CvgEncoded::from_encoded(encoded),
            Err(e) => {
                report(&e);
                failed()
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::cvg_encoded_free;
    use crate::mat::{cvg_mat_depth, cvg_mat_free, cvg_mat_is_valid, cvg_mat_new, cvg_mat_new_with_size, cvg_mat_rows, cvg_mat_cols};
    use opencv::core::{CV_16U, CV_16UC1, CV_8U, CV_8UC3};
    use opencv::imgcodecs::{IMREAD_COLOR, IMREAD_UNCHANGED};

    #[test]
    fn test_png_round_trip() {
        let ext = c".png";
        for (typ, depth) in [(CV_8UC3, CV_8U), (CV_16UC1, CV_16U)] {
            let mat = cvg_mat_new_with_size(6, 9, typ);
            unsafe {
                let mut encoded = cvg_imencode(ext.as_ptr(), mat, std::ptr::null(), 0);
                assert!(encoded.ok);
                assert!(encoded.len > 8);

                let decoded = cvg_imdecode(encoded.data, encoded.len, IMREAD_UNCHANGED);
                assert_eq!(cvg_mat_is_valid(decoded), 1);
                assert_eq!(cvg_mat_rows(decoded), 6);
                assert_eq!(cvg_mat_cols(decoded), 9);
                assert_eq!(cvg_mat_depth(decoded), depth);

                cvg_encoded_free(&mut encoded);
                cvg_encoded_free(&mut encoded);
                cvg_mat_free(decoded);
            }
            cvg_mat_free(mat);
        }
    }

    #[test]
    fn test_malformed_bytes_give_live_empty_image() {
        let junk = b"not an image at all";
        let decoded = unsafe { cvg_imdecode(junk.as_ptr(), junk.len(), IMREAD_COLOR) };
        assert_ne!(decoded, CvgMat::NULL);
        assert_eq!(cvg_mat_is_valid(decoded), 0);
        cvg_mat_free(decoded);

        // An invalid handle is reported differently from an empty image.
        assert_eq!(cvg_mat_is_valid(decoded), -1);
        assert_eq!(errno::errno().0, libc::EBADF);

        let none = unsafe { cvg_imdecode(std::ptr::null(), 4, IMREAD_COLOR) };
        assert_eq!(none, CvgMat::NULL);
        assert_eq!(errno::errno().0, libc::EINVAL);
    }

    #[test]
    fn test_encode_failure_still_allocates() {
        let empty = cvg_mat_new();
        unsafe {
            let mut encoded = cvg_imencode(c".png".as_ptr(), empty, std::ptr::null(), 0);
            assert!(!encoded.ok);
            assert!(!encoded.data.is_null());
            assert_eq!(encoded.len, 0);
            cvg_encoded_free(&mut encoded);

            cvg_mat_free(empty);
            let mut encoded = cvg_imencode(c".png".as_ptr(), empty, std::ptr::null(), 0);
            assert!(!encoded.ok);
            assert_eq!(errno::errno().0, libc::EBADF);
            cvg_encoded_free(&mut encoded);
        }
    }

    #[test]
    fn test_imread_missing_file() {
        let mat = unsafe { cvg_imread(c"/nonexistent/cvgate.png".as_ptr(), IMREAD_COLOR) };
        assert_eq!(cvg_mat_is_valid(mat), 0);
        cvg_mat_free(mat);
        assert_eq!(unsafe { cvg_imread(std::ptr::null(), IMREAD_COLOR) }, CvgMat::NULL);
        assert_eq!(errno::errno().0, libc::EINVAL);
    }
}
