// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

//! Thin wrappers over OpenCV's window functions for debugging.
//!
//! These need a display and the thread that created the window; none of
//! them are used by the detection or tracking paths.

use crate::{Image, Result};
use opencv::highgui;

/// A pointer event delivered to a window's mouse callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    /// One of OpenCV's `EVENT_*` codes.
    pub event: i32,
    pub x: i32,
    pub y: i32,
    /// Bitwise OR of OpenCV's `EVENT_FLAG_*` values.
    pub flags: i32,
}

pub fn named_window(name: &str, flags: i32) -> Result<()> {
    highgui::named_window(name, flags)?;
    Ok(())
}

pub fn destroy_window(name: &str) -> Result<()> {
    highgui::destroy_window(name)?;
    Ok(())
}

pub fn show(name: &str, image: &Image) -> Result<()> {
    image.require_valid("show")?;
    highgui::imshow(name, image.mat())?;
    Ok(())
}

/// Pumps window events for `delay_ms` (0 blocks) and returns the key
/// pressed, or -1.
pub fn wait_key(delay_ms: i32) -> Result<i32> {
    Ok(highgui::wait_key(delay_ms)?)
}

/// Replaces the mouse callback of window `name`.
pub fn set_mouse_callback<F>(name: &str, mut callback: F) -> Result<()>
where
    F: FnMut(MouseEvent) + Send + Sync + 'static,
{
    highgui::set_mouse_callback(
        name,
        Some(Box::new(move |event: i32, x: i32, y: i32, flags: i32| {
            callback(MouseEvent { event, x, y, flags })
        })),
    )?;
    Ok(())
}

pub fn clear_mouse_callback(name: &str) -> Result<()> {
    highgui::set_mouse_callback(name, None)?;
    Ok(())
}
