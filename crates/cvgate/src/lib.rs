// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

//! Owned, typed resources over OpenCV.
//!
//! Every OpenCV object the C boundary hands out is one of the types here:
//! [`Image`] (a matrix or a view into one), [`Capture`], [`Cascade`],
//! [`Hog`], [`SvmDetector`] and [`TermCriteria`]. Operations report failure
//! through [`Error`] and never panic on bad input.

pub mod capture;
pub mod codecs;
pub mod config;
mod error;
pub mod highgui;
pub mod image;
pub mod imgproc;
pub mod objdetect;
pub mod tracking;

pub use capture::Capture;
pub use codecs::Encoded;
pub use config::Config;
pub use error::{Error, Result};
pub use image::{mix_channels, Image};
pub use imgproc::Histogram;
pub use objdetect::{Cascade, CascadeParams, Detections, Hog, HogParams, SvmDetector};
pub use tracking::{camshift, TermCriteria, Tracked};

pub use opencv::core::{Point2f, Rect, RotatedRect, Scalar, Size, Size2f};
