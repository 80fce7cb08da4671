// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

use crate::{Image, Result};
use opencv::prelude::*;
use opencv::videoio;

/// A video source opened by device index.
pub struct Capture {
    inner: videoio::VideoCapture,
    index: i32,
}

impl Capture {
    /// Opens device `index`. A device that fails to open still yields a
    /// `Capture`; check [`Capture::is_opened`].
    pub fn open(index: i32) -> Result<Self> {
        let inner = videoio::VideoCapture::new(index, videoio::CAP_ANY)?;
        if !inner.is_opened()? {
            log::warn!("video device {index} did not open");
        }
        Ok(Self { inner, index })
    }

    pub fn is_opened(&self) -> Result<bool> {
        Ok(self.inner.is_opened()?)
    }

    /// Grabs and decodes one frame into `frame`. Returns false at the end of
    /// the stream or when the device is not delivering frames; `frame` may
    /// then hold stale or partial contents.
    pub fn read(&mut self, frame: &mut Image) -> Result<bool> {
        Ok(self.inner.read(frame.mat_mut())?)
    }
}

impl std::fmt::Debug for Capture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capture")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}
