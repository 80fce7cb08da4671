// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

//! Image processing operations delegated to OpenCV's imgproc module.
//!
//! Destinations are overwritten and reallocated when their size or type
//! does not match the result, except for views, which OpenCV writes into
//! only when the shapes already agree.

use crate::image::shared;
use crate::{Error, Image, Result};
use opencv::core::{Mat, Rect, Scalar, Size, Vector};
use opencv::imgproc;

pub fn cvt_color(src: &Image, dst: &mut Image, code: i32) -> Result<()> {
    src.require_valid("cvt_color")?;
    imgproc::cvt_color_def(src.mat(), dst.mat_mut(), code)?;
    Ok(())
}

/// Blurs and halves the image in each dimension.
pub fn pyr_down(src: &Image, dst: &mut Image) -> Result<()> {
    src.require_valid("pyr_down")?;
    imgproc::pyr_down_def(src.mat(), dst.mat_mut())?;
    Ok(())
}

/// Resizes to `dsize`, or by `fx`/`fy` when `dsize` is zero.
pub fn resize(
    src: &Image,
    dst: &mut Image,
    dsize: Size,
    fx: f64,
    fy: f64,
    interpolation: i32,
) -> Result<()> {
    src.require_valid("resize")?;
    if (dsize.width <= 0 || dsize.height <= 0) && (fx <= 0.0 || fy <= 0.0) {
        return Err(Error::InvalidArgument(format!(
            "resize needs a positive size or positive scale factors, got {dsize:?} fx={fx} fy={fy}"
        )));
    }
    imgproc::resize(src.mat(), dst.mat_mut(), dsize, fx, fy, interpolation)?;
    Ok(())
}

/// Draws the outline of `rect` (filled when `thickness` is negative).
pub fn rectangle(image: &mut Image, rect: Rect, color: Scalar, thickness: i32) -> Result<()> {
    image.require_valid("rectangle")?;
    imgproc::rectangle(image.mat_mut(), rect, color, thickness, imgproc::LINE_8, 0)?;
    Ok(())
}

/// Histogram layout shared by [`calc_hist`] and [`calc_back_project`].
///
/// `ranges` holds a `[low, high)` pair per entry of `channels`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub channels: Vec<i32>,
    pub sizes: Vec<i32>,
    pub ranges: Vec<f32>,
}

impl Histogram {
    fn validate(&self, with_sizes: bool) -> Result<()> {
        let dims = self.channels.len();
        if dims == 0 {
            return Err(Error::InvalidArgument(
                "histogram needs at least one channel".to_string(),
            ));
        }
        if with_sizes && self.sizes.len() != dims {
            return Err(Error::InvalidArgument(format!(
                "histogram has {dims} channels but {} bin counts",
                self.sizes.len()
            )));
        }
        if with_sizes && self.sizes.iter().any(|&n| n <= 0) {
            return Err(Error::InvalidArgument(
                "histogram bin counts must be positive".to_string(),
            ));
        }
        if self.ranges.len() != dims * 2 {
            return Err(Error::InvalidArgument(format!(
                "histogram has {dims} channels but {} range bounds",
                self.ranges.len()
            )));
        }
        Ok(())
    }
}

pub fn calc_hist(
    images: &[&Image],
    layout: &Histogram,
    mask: Option<&Image>,
    hist: &mut Image,
) -> Result<()> {
    layout.validate(true)?;
    if images.is_empty() {
        return Err(Error::InvalidArgument("calc_hist needs an image".to_string()));
    }
    let sources = shared(images.iter().copied())?;
    let no_mask = Mat::default();
    let mask = match mask {
        Some(m) if m.is_valid() => m.mat(),
        _ => &no_mask,
    };
    imgproc::calc_hist(
        &sources,
        &Vector::from_slice(&layout.channels),
        mask,
        hist.mat_mut(),
        &Vector::from_slice(&layout.sizes),
        &Vector::from_slice(&layout.ranges),
        false,
    )?;
    Ok(())
}

pub fn calc_back_project(
    images: &[&Image],
    layout: &Histogram,
    hist: &Image,
    dst: &mut Image,
    scale: f64,
) -> Result<()> {
    layout.validate(false)?;
    if images.is_empty() {
        return Err(Error::InvalidArgument(
            "calc_back_project needs an image".to_string(),
        ));
    }
    hist.require_valid("calc_back_project histogram")?;
    let sources = shared(images.iter().copied())?;
    imgproc::calc_back_project(
        &sources,
        &Vector::from_slice(&layout.channels),
        hist.mat(),
        dst.mat_mut(),
        &Vector::from_slice(&layout.ranges),
        scale,
    )?;
    Ok(())
}
