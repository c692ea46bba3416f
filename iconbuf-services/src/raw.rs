// SPDX-License-Identifier: LGPL-3.0-only
//! Raw RGBA icon buffers.
//!
//! A [`RawIcon`] is plain pixel memory. It can be moved between threads
//! freely and dropping it has no side effects, which makes it the form in
//! which icons travel from the background worker to the interactive thread.

use std::sync::Arc;

use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage};

/// An owned RGBA8 pixel buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawIcon {
    /// Raw RGBA pixel data, row-major.
    data: Arc<Vec<u8>>,
    /// Image width in pixels.
    width: u32,
    /// Image height in pixels.
    height: u32,
}

impl RawIcon {
    /// Wrap an RGBA8 buffer.
    ///
    /// Returns `None` if the dimensions are zero or the buffer length does
    /// not match `width * height * 4`.
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        if data.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        Some(Self {
            data: Arc::new(data),
            width,
            height,
        })
    }

    /// The explicit "no usable image" placeholder.
    pub fn empty() -> Self {
        Self {
            data: Arc::new(Vec::new()),
            width: 0,
            height: 0,
        }
    }

    /// Convert a decoded image into a raw icon.
    pub fn from_image(image: &DynamicImage) -> Self {
        Self::from_rgba_image(image.to_rgba8())
    }

    fn from_rgba_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Self::empty();
        }
        Self {
            data: Arc::new(image.into_raw()),
            width,
            height,
        }
    }

    /// Check whether this is the empty placeholder.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Borrow the pixel data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Take the pixel data, copying only if the buffer is still shared.
    pub fn into_rgba(self) -> Vec<u8> {
        Arc::try_unwrap(self.data).unwrap_or_else(|shared| shared.as_ref().clone())
    }

    /// Downscale so that the longer edge fits `pixel_size`, keeping the
    /// aspect ratio. Icons that already fit are returned unchanged.
    pub fn scaled_to(&self, pixel_size: u32) -> Self {
        let longest = self.width.max(self.height);
        if self.is_empty() || pixel_size == 0 || longest <= pixel_size {
            return self.clone();
        }

        let Some(image) = RgbaImage::from_raw(self.width, self.height, self.data.to_vec()) else {
            return self.clone();
        };

        let scale = pixel_size as f64 / longest as f64;
        let width = ((self.width as f64 * scale).round() as u32).max(1);
        let height = ((self.height as f64 * scale).round() as u32).max(1);

        Self::from_rgba_image(image::imageops::resize(&image, width, height, FilterType::Triangle))
    }

    /// Built-in generic document glyph.
    pub fn document(pixel_size: u32) -> Self {
        let size = pixel_size.max(1);
        let mut image = RgbaImage::new(size, size);

        let left = size / 6;
        let right = size - size / 6;
        let top = size / 12;
        let bottom = size - size / 12;
        let fold = (right - left) / 3;

        fill_rect(&mut image, left, top, right, bottom, Rgba([0x70, 0x70, 0x70, 0xff]));
        if size >= 8 {
            fill_rect(&mut image, left + 1, top + 1, right - 1, bottom - 1, Rgba([0xfa, 0xfa, 0xfa, 0xff]));
        }

        // Dog-ear in the top right corner.
        for y in top..(top + fold).min(bottom) {
            for x in (right - fold)..right {
                if x - (right - fold) > y - top {
                    image.put_pixel(x, y, Rgba([0, 0, 0, 0]));
                }
            }
        }

        Self::from_rgba_image(image)
    }

    /// Built-in generic folder glyph.
    pub fn folder(pixel_size: u32) -> Self {
        let size = pixel_size.max(1);
        let mut image = RgbaImage::new(size, size);

        let left = size / 12;
        let right = size - size / 12;
        let tab_top = size / 4;
        let body_top = size * 3 / 8;
        let bottom = size - size / 8;

        let amber = Rgba([0xe8, 0xb0, 0x40, 0xff]);
        fill_rect(&mut image, left, tab_top, left + (right - left) / 2, body_top, amber);
        fill_rect(&mut image, left, body_top, right, bottom, amber);

        Self::from_rgba_image(image)
    }

    /// Built-in symbolic link badge, meant to be drawn over another icon of
    /// the same size. Only the lower left quarter is opaque.
    pub fn link_badge(pixel_size: u32) -> Self {
        let size = pixel_size.max(1);
        let mut image = RgbaImage::new(size, size);

        let badge = (size / 2).max(1);
        let top = size - badge;

        fill_rect(&mut image, 0, top, badge, size, Rgba([0x20, 0x40, 0x90, 0xff]));
        if badge >= 4 {
            fill_rect(&mut image, 1, top + 1, badge - 1, size - 1, Rgba([0xff, 0xff, 0xff, 0xff]));
            // Arrow shaft from the lower left to the upper right of the badge.
            for step in 1..badge - 1 {
                image.put_pixel(step, size - 1 - step, Rgba([0x20, 0x40, 0x90, 0xff]));
            }
        }

        Self::from_rgba_image(image)
    }
}

fn fill_rect(image: &mut RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgba<u8>) {
    let x1 = x1.min(image.width());
    let y1 = y1.min(image.height());
    for y in y0..y1 {
        for x in x0..x1 {
            image.put_pixel(x, y, color);
        }
    }
}
