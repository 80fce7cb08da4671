// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

use crate::{Error, Result};
use opencv::core::{self, Mat, Rect, Scalar, Vector};
use opencv::prelude::*;
use opencv::traits::Boxed;

/// A two dimensional typed buffer backed by an OpenCV `Mat`.
///
/// Storage is reference counted by OpenCV. An image created through
/// [`Image::roi`] is a view: it shares storage with its parent, writes made
/// through either one are visible in the other, and dropping either one
/// leaves the storage alive for the other. Views must not be mutated
/// concurrently with their parent.
#[derive(Debug)]
pub struct Image {
    mat: Mat,
    view: bool,
}

impl Default for Image {
    fn default() -> Self {
        Self::empty()
    }
}

impl Image {
    /// Creates an image with no data. `is_valid` reports false until an
    /// operation writes into it.
    pub fn empty() -> Self {
        Self {
            mat: Mat::default(),
            view: false,
        }
    }

    /// Creates a zero-filled image of `rows` x `cols` with the OpenCV type
    /// code `typ` (for example `CV_8UC3`).
    pub fn new(rows: i32, cols: i32, typ: i32) -> Result<Self> {
        if rows <= 0 || cols <= 0 {
            return Err(Error::InvalidArgument(format!(
                "image size must be positive, got {rows}x{cols}"
            )));
        }
        let mat = Mat::new_rows_cols_with_default(rows, cols, typ, Scalar::all(0.0))
            .map_err(|e| creation_error(e, rows, cols, typ))?;
        Ok(Self::from_mat(mat))
    }

    pub fn from_mat(mat: Mat) -> Self {
        Self { mat, view: false }
    }

    /// Creates a view over `rect`, which must lie inside this image.
    pub fn roi(&self, rect: Rect) -> Result<Self> {
        if !self.is_valid() {
            return Err(Error::InvalidArgument(
                "cannot take a region of an empty image".to_string(),
            ));
        }
        if rect.x < 0
            || rect.y < 0
            || rect.width <= 0
            || rect.height <= 0
            || rect.x + rect.width > self.cols()
            || rect.y + rect.height > self.rows()
        {
            return Err(Error::InvalidArgument(format!(
                "region {rect:?} outside {}x{} image",
                self.rows(),
                self.cols()
            )));
        }
        let view = Mat::roi(&self.mat, rect)?;
        // SAFETY: the view is a heap-allocated cv::Mat header holding its own
        // reference on the parent's storage; ownership of that header moves
        // into the new Mat and nothing else frees it.
        let mat = unsafe { Mat::from_raw(view.into_raw()) };
        Ok(Self { mat, view: true })
    }

    /// A header sharing this image's storage, used to build the
    /// array-of-images arguments some operations take.
    pub(crate) fn share(&self) -> Result<Mat> {
        if !self.is_valid() {
            return Ok(Mat::default());
        }
        let full = Rect::new(0, 0, self.cols(), self.rows());
        Ok(self.roi(full)?.mat)
    }

    pub fn is_valid(&self) -> bool {
        !self.mat.empty()
    }

    pub fn is_view(&self) -> bool {
        self.view
    }

    pub fn rows(&self) -> i32 {
        self.mat.rows()
    }

    pub fn cols(&self) -> i32 {
        self.mat.cols()
    }

    pub fn depth(&self) -> i32 {
        self.mat.depth()
    }

    pub fn channels(&self) -> i32 {
        self.mat.channels()
    }

    pub fn typ(&self) -> i32 {
        self.mat.typ()
    }

    pub fn mat(&self) -> &Mat {
        &self.mat
    }

    pub fn mat_mut(&mut self) -> &mut Mat {
        &mut self.mat
    }

    /// Deep copy with its own storage.
    pub fn try_clone(&self) -> Result<Self> {
        Ok(Self::from_mat(self.mat.try_clone()?))
    }

    /// Flips in place. `code` follows OpenCV: 0 around the x axis, positive
    /// around the y axis, negative around both.
    pub fn flip(&mut self, code: i32) -> Result<()> {
        self.require_valid("flip")?;
        let src = self.mat.try_clone()?;
        core::flip(&src, &mut self.mat, code)?;
        Ok(())
    }

    /// Bitwise AND with a mask of the same size and type, in place.
    pub fn logic_and(&mut self, mask: &Image) -> Result<()> {
        self.require_valid("logic_and")?;
        if mask.rows() != self.rows() || mask.cols() != self.cols() || mask.typ() != self.typ() {
            return Err(Error::InvalidArgument(format!(
                "mask {}x{} type {} does not match image {}x{} type {}",
                mask.rows(),
                mask.cols(),
                mask.typ(),
                self.rows(),
                self.cols(),
                self.typ()
            )));
        }
        let src = self.mat.try_clone()?;
        core::bitwise_and_def(&src, &mask.mat, &mut self.mat)?;
        Ok(())
    }

    /// Writes 255 into `dst` where every channel lies in `[lower, upper]`.
    pub fn in_range(&self, lower: Scalar, upper: Scalar, dst: &mut Image) -> Result<()> {
        self.require_valid("in_range")?;
        core::in_range(&self.mat, &lower, &upper, &mut dst.mat)?;
        Ok(())
    }

    pub fn normalize(&self, dst: &mut Image, alpha: f64, beta: f64, norm_type: i32) -> Result<()> {
        self.require_valid("normalize")?;
        core::normalize(
            &self.mat,
            &mut dst.mat,
            alpha,
            beta,
            norm_type,
            -1,
            &Mat::default(),
        )?;
        Ok(())
    }

    pub(crate) fn require_valid(&self, op: &str) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(Error::InvalidArgument(format!("{op}: image is empty")))
        }
    }
}

/// Only an out-of-memory failure is an allocation error; OpenCV rejecting
/// the type or size stays an OpenCV error.
fn creation_error(err: opencv::Error, rows: i32, cols: i32, typ: i32) -> Error {
    if err.code == core::StsNoMem {
        Error::Allocation(format!("{rows}x{cols} type {typ}: {}", err.message))
    } else {
        Error::OpenCv(err)
    }
}

/// Copies channels from `srcs` into the pre-allocated `dsts`. `from_to`
/// holds index pairs: input channel, output channel, counted across all
/// images of each list.
pub fn mix_channels(srcs: &[&Image], dsts: &mut [&mut Image], from_to: &[i32]) -> Result<()> {
    if from_to.is_empty() || from_to.len() % 2 != 0 {
        return Err(Error::InvalidArgument(format!(
            "mix_channels needs index pairs, got {} values",
            from_to.len()
        )));
    }
    if srcs.is_empty() || dsts.is_empty() {
        return Err(Error::InvalidArgument(
            "mix_channels needs at least one source and one destination".to_string(),
        ));
    }
    for dst in dsts.iter() {
        dst.require_valid("mix_channels destination")?;
    }
    let src_vec = shared(srcs.iter().copied())?;
    let mut dst_vec = shared(dsts.iter().map(|d| &**d))?;
    core::mix_channels(&src_vec, &mut dst_vec, from_to)?;
    Ok(())
}

/// Builds a vector of storage-sharing headers. Destinations written through
/// these headers land in the original images because they are
/// pre-allocated with a matching size and type.
pub(crate) fn shared<'a>(images: impl Iterator<Item = &'a Image>) -> Result<Vector<Mat>> {
    let mut out = Vector::<Mat>::new();
    for image in images {
        image.require_valid("image list")?;
        out.push(image.share()?);
    }
    Ok(out)
}
