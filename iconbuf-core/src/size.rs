// SPDX-License-Identifier: LGPL-3.0-only
/// Requested icon size.
///
/// The size class decides both the pixel size handed to loaders and which
/// fallback steps are attempted: thumbnails are never produced for
/// [`SizeClass::Small`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeClass {
    /// List and detail views.
    Small,
    /// Icon views.
    Medium,
    /// Large thumbnail views.
    Large,
}

impl SizeClass {
    /// Edge length of small icons in pixels.
    pub const SMALL_PX: u32 = 16;
    /// Edge length of medium icons in pixels.
    pub const MEDIUM_PX: u32 = 48;
    /// Edge length of large icons in pixels.
    pub const LARGE_PX: u32 = 128;

    /// Edge length of icons of this class in pixels.
    pub const fn pixel_size(self) -> u32 {
        match self {
            Self::Small => Self::SMALL_PX,
            Self::Medium => Self::MEDIUM_PX,
            Self::Large => Self::LARGE_PX,
        }
    }

    /// Whether thumbnails are attempted for this class.
    pub const fn wants_thumbnail(self) -> bool {
        !matches!(self, Self::Small)
    }
}

impl Default for SizeClass {
    fn default() -> Self {
        Self::Small
    }
}
