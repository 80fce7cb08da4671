// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

//! CamShift object tracking over a back-projection image.

use crate::{Error, Image, Result};
use opencv::core::{self, Rect, RotatedRect};
use opencv::video;

/// Stop after a number of iterations.
pub const COUNT: i32 = 1;
/// Alias of [`COUNT`].
pub const MAX_ITER: i32 = COUNT;
/// Stop when the window moves less than epsilon.
pub const EPS: i32 = 2;

/// Termination rule for iterative algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TermCriteria {
    kind: i32,
    max_count: i32,
    epsilon: f64,
}

impl TermCriteria {
    /// `kind` is [`COUNT`], [`EPS`] or `COUNT | EPS`.
    pub fn new(kind: i32, max_count: i32, epsilon: f64) -> Result<Self> {
        if kind == 0 || kind & !(COUNT | EPS) != 0 {
            return Err(Error::InvalidArgument(format!(
                "unknown termination criteria kind {kind}"
            )));
        }
        if kind & COUNT != 0 && max_count <= 0 {
            return Err(Error::InvalidArgument(format!(
                "iteration limit must be positive, got {max_count}"
            )));
        }
        if kind & EPS != 0 && !(epsilon >= 0.0) {
            return Err(Error::InvalidArgument(format!(
                "epsilon must be non-negative, got {epsilon}"
            )));
        }
        Ok(Self {
            kind,
            max_count,
            epsilon,
        })
    }

    pub fn kind(&self) -> i32 {
        self.kind
    }

    pub fn max_count(&self) -> i32 {
        self.max_count
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    fn to_cv(self) -> Result<core::TermCriteria> {
        Ok(core::TermCriteria::new(self.kind, self.max_count, self.epsilon)?)
    }
}

/// Result of [`camshift`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tracked {
    /// Oriented box around the object.
    pub rotated: RotatedRect,
    /// Search window to use for the next frame.
    pub window: Rect,
}

/// Runs CamShift on `back_project` starting from `window`.
pub fn camshift(back_project: &Image, window: Rect, criteria: &TermCriteria) -> Result<Tracked> {
    back_project.require_valid("camshift")?;
    if window.width <= 0 || window.height <= 0 {
        return Err(Error::InvalidArgument(format!(
            "camshift window must have a positive size, got {window:?}"
        )));
    }
    let mut window = window;
    let rotated = video::cam_shift(back_project.mat(), &mut window, criteria.to_cv()?)?;
    log::trace!("camshift moved window to {window:?}");
    Ok(Tracked { rotated, window })
}
