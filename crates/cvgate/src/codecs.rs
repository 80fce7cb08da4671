// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

use crate::{Error, Image, Result};
use opencv::core::{self, Vector};
use opencv::imgcodecs;

/// Output of [`encode`]. `bytes` is empty when `ok` is false.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Encoded {
    pub ok: bool,
    pub bytes: Vec<u8>,
}

impl Encoded {
    fn failed() -> Self {
        Self::default()
    }
}

/// Decodes an in-memory image. Bytes that are not a decodable image produce
/// an empty [`Image`] rather than an error; only resource exhaustion fails.
pub fn decode(bytes: &[u8], flags: i32) -> Result<Image> {
    if bytes.is_empty() {
        log::debug!("decode called with no bytes");
        return Ok(Image::empty());
    }
    let buf = Vector::<u8>::from_slice(bytes);
    match imgcodecs::imdecode(&buf, flags) {
        Ok(mat) => Ok(Image::from_mat(mat)),
        Err(e) if e.code == core::StsNoMem => Err(Error::Allocation(e.message)),
        Err(e) => {
            log::debug!("decode of {} bytes failed: {e}", bytes.len());
            Ok(Image::empty())
        }
    }
}

/// Reads an image file. A missing or unreadable file yields an empty image.
pub fn read(path: &str, flags: i32) -> Result<Image> {
    match imgcodecs::imread(path, flags) {
        Ok(mat) => Ok(Image::from_mat(mat)),
        Err(e) if e.code == core::StsNoMem => Err(Error::Allocation(e.message)),
        Err(e) => {
            log::debug!("read of {path:?} failed: {e}");
            Ok(Image::empty())
        }
    }
}

/// Encodes `image` in the format named by `ext` (".png", ".jpg", ...).
/// `params` are OpenCV codec flag/value pairs.
pub fn encode(ext: &str, image: &Image, params: &[i32]) -> Result<Encoded> {
    if !image.is_valid() {
        log::debug!("encode called on an empty image");
        return Ok(Encoded::failed());
    }
    if params.len() % 2 != 0 {
        return Err(Error::InvalidArgument(format!(
            "codec parameters come in pairs, got {}",
            params.len()
        )));
    }
    let mut buf = Vector::<u8>::new();
    match imgcodecs::imencode(ext, image.mat(), &mut buf, &Vector::from_slice(params)) {
        Ok(true) => Ok(Encoded {
            ok: true,
            bytes: buf.to_vec(),
        }),
        Ok(false) => Ok(Encoded::failed()),
        Err(e) if e.code == core::StsNoMem => Err(Error::Allocation(e.message)),
        Err(e) => {
            log::debug!("encode as {ext:?} failed: {e}");
            Ok(Encoded::failed())
        }
    }
}
