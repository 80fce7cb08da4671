// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

//! Cascade classifier and HOG people detector.

use crate::{config, Error, Image, Result};
use opencv::core::{Rect, Size, Vector};
use opencv::objdetect::{self, HOGDescriptor};
use opencv::prelude::*;
use std::time::Instant;

/// Detection window of the default people detector.
pub const DEFAULT_PEOPLE_WINDOW: Size = Size {
    width: 64,
    height: 128,
};

/// Detection window of the Daimler people detector.
pub const DAIMLER_PEOPLE_WINDOW: Size = Size {
    width: 48,
    height: 96,
};

/// Parameters for [`Cascade::detect`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadeParams {
    pub scale_factor: f64,
    pub min_neighbors: i32,
    pub flags: i32,
    /// Smallest window considered; zero means no bound.
    pub min_size: Size,
    /// Largest window considered; zero means no bound.
    pub max_size: Size,
}

impl Default for CascadeParams {
    fn default() -> Self {
        Self {
            scale_factor: 1.1,
            min_neighbors: 3,
            flags: 0,
            min_size: Size::default(),
            max_size: Size::default(),
        }
    }
}

/// A cascade classifier, possibly without a model loaded.
pub struct Cascade {
    inner: objdetect::CascadeClassifier,
}

impl Cascade {
    /// Creates a classifier with no model.
    pub fn new() -> Result<Self> {
        Ok(Self {
            inner: objdetect::CascadeClassifier::default()?,
        })
    }

    /// Creates a classifier from a model file. Relative paths that do not
    /// exist are looked up under `CVGATE_CASCADE_DIR`.
    pub fn from_path(path: &str) -> Result<Self> {
        let resolved = config::global().resolve_model_path(path);
        if !resolved.exists() {
            return Err(Error::NotFound(format!("cascade model {path:?}")));
        }
        let mut cascade = Self::new()?;
        if !cascade.load(path)? {
            return Err(Error::Encoding(format!(
                "cascade model {} could not be loaded",
                resolved.display()
            )));
        }
        Ok(cascade)
    }

    /// Replaces the model. Returns false when the file is missing or is not
    /// a cascade model; the previous model is gone either way.
    pub fn load(&mut self, path: &str) -> Result<bool> {
        let resolved = config::global().resolve_model_path(path);
        let Some(resolved) = resolved.to_str() else {
            return Err(Error::InvalidArgument(format!("non UTF-8 path {path:?}")));
        };
        match self.inner.load(resolved) {
            Ok(loaded) => {
                if !loaded {
                    log::warn!("cascade model {resolved:?} failed to load");
                }
                Ok(loaded)
            }
            Err(e) => {
                log::warn!("cascade model {resolved:?} is malformed: {e}");
                Ok(false)
            }
        }
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.inner.empty()?)
    }

    /// Multi-scale detection. Returns every detected region, possibly none.
    pub fn detect(&mut self, image: &Image, params: &CascadeParams) -> Result<Vec<Rect>> {
        if self.is_empty()? {
            return Err(Error::OperationFailure(
                "cascade classifier has no model loaded".to_string(),
            ));
        }
        image.require_valid("cascade detect")?;
        if params.scale_factor <= 1.0 {
            return Err(Error::InvalidArgument(format!(
                "scale factor must exceed 1.0, got {}",
                params.scale_factor
            )));
        }

        let start = Instant::now();
        let mut found = Vector::<Rect>::new();
        self.inner.detect_multi_scale(
            image.mat(),
            &mut found,
            params.scale_factor,
            params.min_neighbors,
            params.flags,
            params.min_size,
            params.max_size,
        )?;
        log::trace!(
            "cascade found {} objects in {:?}",
            found.len(),
            start.elapsed()
        );
        Ok(found.to_vec())
    }
}

impl std::fmt::Debug for Cascade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cascade").finish_non_exhaustive()
    }
}

/// Linear SVM coefficients for a HOG descriptor.
///
/// Presets remember the detection window they were trained for so that
/// attaching one configures the descriptor to match.
#[derive(Debug, Clone)]
pub struct SvmDetector {
    coefficients: Vec<f32>,
    window: Option<Size>,
}

impl SvmDetector {
    pub fn default_people() -> Result<Self> {
        Ok(Self {
            coefficients: HOGDescriptor::get_default_people_detector()?.to_vec(),
            window: Some(DEFAULT_PEOPLE_WINDOW),
        })
    }

    pub fn daimler_people() -> Result<Self> {
        Ok(Self {
            coefficients: HOGDescriptor::get_daimler_people_detector()?.to_vec(),
            window: Some(DAIMLER_PEOPLE_WINDOW),
        })
    }

    /// Caller-trained coefficients for the descriptor's current window.
    pub fn from_coefficients(coefficients: &[f32]) -> Result<Self> {
        if coefficients.is_empty() {
            return Err(Error::InvalidArgument(
                "SVM detector needs at least one coefficient".to_string(),
            ));
        }
        Ok(Self {
            coefficients: coefficients.to_vec(),
            window: None,
        })
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    pub fn window(&self) -> Option<Size> {
        self.window
    }
}

/// Parameters for [`Hog::detect`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HogParams {
    pub hit_threshold: f64,
    pub win_stride: Size,
    pub padding: Size,
    pub scale: f64,
    pub final_threshold: f64,
    pub use_meanshift_grouping: bool,
}

impl Default for HogParams {
    fn default() -> Self {
        Self {
            hit_threshold: 0.0,
            win_stride: Size::new(8, 8),
            padding: Size::default(),
            scale: 1.05,
            final_threshold: 2.0,
            use_meanshift_grouping: false,
        }
    }
}

/// Detected regions with their SVM confidence, index aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detections {
    pub rects: Vec<Rect>,
    pub weights: Vec<f64>,
}

pub struct Hog {
    inner: HOGDescriptor,
    detector_len: usize,
}

impl Hog {
    pub fn new() -> Result<Self> {
        Ok(Self {
            inner: HOGDescriptor::default()?,
            detector_len: 0,
        })
    }

    pub fn window(&self) -> Size {
        self.inner.win_size()
    }

    pub fn has_detector(&self) -> bool {
        self.detector_len > 0
    }

    /// Checks that `detector` fits this descriptor once its window, if any,
    /// is applied. The descriptor is left as it was.
    pub fn check_svm_detector(&mut self, detector: &SvmDetector) -> Result<()> {
        let previous = self.inner.win_size();
        let window = detector.window.unwrap_or(previous);
        self.inner.set_win_size(window);
        let expected = self.inner.get_descriptor_size();
        self.inner.set_win_size(previous);
        let expected = expected?;
        // One weight per descriptor element, optionally plus a bias.
        if detector.len() != expected && detector.len() != expected + 1 {
            return Err(Error::InvalidArgument(format!(
                "{} coefficients do not fit a {}x{} window, expected {expected}",
                detector.len(),
                window.width,
                window.height
            )));
        }
        Ok(())
    }

    /// Attaches `detector`, consuming it. On failure the descriptor keeps
    /// its previous window and detector.
    pub fn set_svm_detector(&mut self, detector: SvmDetector) -> Result<()> {
        self.check_svm_detector(&detector)?;
        let previous = self.inner.win_size();
        if let Some(window) = detector.window {
            self.inner.set_win_size(window);
        }
        let coefficients = Vector::<f32>::from_slice(&detector.coefficients);
        if let Err(e) = self.inner.set_svm_detector(&coefficients) {
            self.inner.set_win_size(previous);
            self.detector_len = 0;
            return Err(e.into());
        }
        self.detector_len = detector.len();
        log::debug!("attached {} SVM coefficients", self.detector_len);
        Ok(())
    }

    /// Multi-scale detection. Returns every detected region, possibly none.
    pub fn detect(&self, image: &Image, params: &HogParams) -> Result<Detections> {
        if !self.has_detector() {
            return Err(Error::OperationFailure(
                "HOG descriptor has no SVM detector attached".to_string(),
            ));
        }
        image.require_valid("hog detect")?;
        if params.scale <= 1.0 {
            return Err(Error::InvalidArgument(format!(
                "pyramid scale must exceed 1.0, got {}",
                params.scale
            )));
        }
        // OpenCV divides by the stride; only 0x0 selects its default.
        let stride = params.win_stride;
        if stride != Size::default() && (stride.width <= 0 || stride.height <= 0) {
            return Err(Error::InvalidArgument(format!(
                "window stride must be 0x0 or positive, got {}x{}",
                stride.width, stride.height
            )));
        }
        if params.padding.width < 0 || params.padding.height < 0 {
            return Err(Error::InvalidArgument(format!(
                "padding must not be negative, got {}x{}",
                params.padding.width, params.padding.height
            )));
        }
        let window = self.inner.win_size();
        if image.cols() < window.width || image.rows() < window.height {
            log::trace!(
                "{}x{} image is smaller than the {}x{} window",
                image.cols(),
                image.rows(),
                window.width,
                window.height
            );
            return Ok(Detections::default());
        }

        let start = Instant::now();
        let mut rects = Vector::<Rect>::new();
        let mut weights = Vector::<f64>::new();
        self.inner.detect_multi_scale_weights(
            image.mat(),
            &mut rects,
            &mut weights,
            params.hit_threshold,
            params.win_stride,
            params.padding,
            params.scale,
            params.final_threshold,
            params.use_meanshift_grouping,
        )?;
        log::trace!(
            "hog found {} objects in {:?}",
            rects.len(),
            start.elapsed()
        );
        Ok(Detections {
            rects: rects.to_vec(),
            weights: weights.to_vec(),
        })
    }
}

impl std::fmt::Debug for Hog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hog")
            .field("detector_len", &self.detector_len)
            .finish_non_exhaustive()
    }
}
