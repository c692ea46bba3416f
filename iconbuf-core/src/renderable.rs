// SPDX-License-Identifier: LGPL-3.0-only
use std::fmt;
use std::rc::Rc;

use iconbuf_services::RawIcon;
use vello::peniko::{Blob, ImageAlphaType, ImageBrush, ImageData, ImageFormat};

/// An icon ready to be drawn by the renderer.
///
/// Holds the image brush behind an [`Rc`], so the type is neither `Send` nor
/// `Sync`: renderable icons are created, cloned and dropped on the thread
/// that owns the [`IconBuffer`](crate::IconBuffer) only. Clones share the
/// same brush.
#[derive(Clone, Default)]
pub struct RenderableIcon {
    brush: Option<Rc<ImageBrush>>,
    width: u32,
    height: u32,
}

impl RenderableIcon {
    /// Turn raw pixels into a renderable icon. An empty raw icon produces
    /// [`RenderableIcon::empty`].
    pub fn materialize(raw: RawIcon) -> Self {
        if raw.is_empty() {
            return Self::empty();
        }

        let (width, height) = (raw.width(), raw.height());
        let image_data = ImageData {
            data: Blob::from(raw.into_rgba()),
            format: ImageFormat::Rgba8,
            alpha_type: ImageAlphaType::Alpha,
            width,
            height,
        };
        Self {
            brush: Some(Rc::new(ImageBrush::new(image_data))),
            width,
            height,
        }
    }

    /// The explicit "nothing to draw" icon.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.brush.is_none()
    }

    /// The brush to paint with, if any.
    pub fn brush(&self) -> Option<&ImageBrush> {
        self.brush.as_deref()
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl PartialEq for RenderableIcon {
    /// Two icons are equal when they share the same brush.
    fn eq(&self, other: &Self) -> bool {
        match (&self.brush, &other.brush) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for RenderableIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderableIcon")
            .field("empty", &self.is_empty())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}
