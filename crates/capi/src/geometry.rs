// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

//! Plain-data geometry passed by value across the boundary.

use cvgate::{Point2f, Rect, RotatedRect, Scalar, Size, Size2f};
use libc::c_int;

/// Axis-aligned rectangle in pixels.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CvgRect {
    pub x: c_int,
    pub y: c_int,
    pub width: c_int,
    pub height: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CvgSize {
    pub width: c_int,
    pub height: c_int,
}

/// Up to four channel values, for example a BGR color or a threshold.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CvgScalar {
    pub v0: f64,
    pub v1: f64,
    pub v2: f64,
    pub v3: f64,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CvgPoint2f {
    pub x: f32,
    pub y: f32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CvgSize2f {
    pub width: f32,
    pub height: f32,
}

/// Rectangle rotated about its center, `angle` in degrees.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CvgRotatedRect {
    pub center: CvgPoint2f,
    pub size: CvgSize2f,
    pub angle: f32,
}

impl From<CvgRect> for Rect {
    fn from(r: CvgRect) -> Self {
        Rect::new(r.x, r.y, r.width, r.height)
    }
}

impl From<Rect> for CvgRect {
    fn from(r: Rect) -> Self {
        Self {
            x: r.x,
            y: r.y,
            width: r.width,
            height: r.height,
        }
    }
}

impl From<CvgSize> for Size {
    fn from(s: CvgSize) -> Self {
        Size::new(s.width, s.height)
    }
}

impl From<CvgScalar> for Scalar {
    fn from(s: CvgScalar) -> Self {
        Scalar::new(s.v0, s.v1, s.v2, s.v3)
    }
}

impl From<Point2f> for CvgPoint2f {
    fn from(p: Point2f) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<Size2f> for CvgSize2f {
    fn from(s: Size2f) -> Self {
        Self {
            width: s.width,
            height: s.height,
        }
    }
}

impl From<RotatedRect> for CvgRotatedRect {
    fn from(r: RotatedRect) -> Self {
        Self {
            center: r.center.into(),
            size: r.size.into(),
            angle: r.angle,
        }
    }
}

#[no_mangle]
pub extern "C" fn cvg_rect_new(x: c_int, y: c_int, width: c_int, height: c_int) -> CvgRect {
    CvgRect {
        x,
        y,
        width,
        height,
    }
}

#[no_mangle]
pub extern "C" fn cvg_size_new(width: c_int, height: c_int) -> CvgSize {
    CvgSize { width, height }
}

/// Build a scalar. Unused channels should be 0.
#[no_mangle]
pub extern "C" fn cvg_scalar_new(v0: f64, v1: f64, v2: f64, v3: f64) -> CvgScalar {
    CvgScalar { v0, v1, v2, v3 }
}
