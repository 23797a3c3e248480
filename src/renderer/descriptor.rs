//! Render Target Descriptors
//!
//! [`RenderTargetDescriptor`] is the key of the resource pool: a pooled target
//! is reused as long as the requested descriptor compares equal to the one it
//! was created from.
//!
//! # Formats
//!
//! | Color              | wgpu format       | Typical use              |
//! |--------------------|-------------------|--------------------------|
//! | `Rgba16Float`      | `Rgba16Float`     | HDR blended buffer       |
//! | `Rgba8Srgb`        | `Rgba8UnormSrgb`  | LDR blended buffer       |
//! | `Rgba8Unorm`       | `Rgba8Unorm`      | Linear LDR data          |
//!
//! | Depth              | wgpu format              | Stencil |
//! |--------------------|--------------------------|---------|
//! | `Depth24`          | `Depth24Plus`            | ❌      |
//! | `Depth24Stencil8`  | `Depth24PlusStencil8`    | ✅      |
//! | `Depth32`          | `Depth32Float`           | ❌      |
//! | `Depth32Stencil8`  | `Depth32FloatStencil8`   | ✅¹     |
//!
//! ¹ Not available on every platform; the pool degrades it according to the
//!   host capabilities.

use serde::{Deserialize, Serialize};

/// Color storage format of a render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColorFormat {
    /// No color storage (depth-only target).
    #[default]
    None,
    /// 16-bit float RGBA.
    Rgba16Float,
    /// 8-bit RGBA, sRGB encoded.
    Rgba8Srgb,
    /// 8-bit RGBA, linear.
    Rgba8Unorm,
}

impl ColorFormat {
    /// Returns the matching wgpu format, or `None` for depth-only targets.
    #[must_use]
    pub const fn wgpu_format(self) -> Option<wgpu::TextureFormat> {
        match self {
            Self::None => None,
            Self::Rgba16Float => Some(wgpu::TextureFormat::Rgba16Float),
            Self::Rgba8Srgb => Some(wgpu::TextureFormat::Rgba8UnormSrgb),
            Self::Rgba8Unorm => Some(wgpu::TextureFormat::Rgba8Unorm),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}

/// Depth (and optional stencil) storage format of a render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DepthFormat {
    /// No depth storage.
    #[default]
    None,
    Depth24,
    Depth24Stencil8,
    Depth32,
    Depth32Stencil8,
}

impl DepthFormat {
    /// Returns the matching wgpu format, or `None` when no depth is stored.
    #[must_use]
    pub const fn wgpu_format(self) -> Option<wgpu::TextureFormat> {
        match self {
            Self::None => None,
            Self::Depth24 => Some(wgpu::TextureFormat::Depth24Plus),
            Self::Depth24Stencil8 => Some(wgpu::TextureFormat::Depth24PlusStencil8),
            Self::Depth32 => Some(wgpu::TextureFormat::Depth32Float),
            Self::Depth32Stencil8 => Some(wgpu::TextureFormat::Depth32FloatStencil8),
        }
    }

    /// Number of depth bits (0 when no depth is stored).
    #[must_use]
    pub const fn depth_bits(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Depth24 | Self::Depth24Stencil8 => 24,
            Self::Depth32 | Self::Depth32Stencil8 => 32,
        }
    }

    #[inline]
    #[must_use]
    pub const fn has_stencil(self) -> bool {
        matches!(self, Self::Depth24Stencil8 | Self::Depth32Stencil8)
    }

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}

/// Texture addressing mode outside of `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WrapMode {
    #[default]
    Clamp,
    Repeat,
    Mirror,
}

impl WrapMode {
    #[must_use]
    pub const fn wgpu_address_mode(self) -> wgpu::AddressMode {
        match self {
            Self::Clamp => wgpu::AddressMode::ClampToEdge,
            Self::Repeat => wgpu::AddressMode::Repeat,
            Self::Mirror => wgpu::AddressMode::MirrorRepeat,
        }
    }
}

/// Texture sampling filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FilterMode {
    /// Nearest-texel sampling. Keeps hard edges against the copied depth.
    #[default]
    Point,
    Bilinear,
}

impl FilterMode {
    #[must_use]
    pub const fn wgpu_filter_mode(self) -> wgpu::FilterMode {
        match self {
            Self::Point => wgpu::FilterMode::Nearest,
            Self::Bilinear => wgpu::FilterMode::Linear,
        }
    }
}

/// Full description of a 2D render target.
///
/// Two descriptors that compare equal always map to the same pooled
/// allocation; any field change forces a reallocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderTargetDescriptor {
    pub width: u32,
    pub height: u32,
    pub color_format: ColorFormat,
    pub depth_format: DepthFormat,
    /// MSAA sample count (1, 2, 4 or 8).
    pub sample_count: u32,
    pub wrap_mode: WrapMode,
    pub filter_mode: FilterMode,
}

impl Default for RenderTargetDescriptor {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            color_format: ColorFormat::Rgba8Srgb,
            depth_format: DepthFormat::None,
            sample_count: 1,
            wrap_mode: WrapMode::Clamp,
            filter_mode: FilterMode::Point,
        }
    }
}

impl RenderTargetDescriptor {
    /// Creates a color-only descriptor.
    #[inline]
    #[must_use]
    pub fn color(width: u32, height: u32, format: ColorFormat) -> Self {
        Self {
            width,
            height,
            color_format: format,
            ..Default::default()
        }
    }

    /// Creates a depth-only descriptor (`color_format = None`).
    #[inline]
    #[must_use]
    pub fn depth(width: u32, height: u32, format: DepthFormat) -> Self {
        Self {
            width,
            height,
            color_format: ColorFormat::None,
            depth_format: format,
            ..Default::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_sample_count(mut self, sample_count: u32) -> Self {
        self.sample_count = sample_count;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_filter_mode(mut self, filter_mode: FilterMode) -> Self {
        self.filter_mode = filter_mode;
        self
    }

    /// Returns `true` when the target stores depth but no color.
    #[inline]
    #[must_use]
    pub fn is_depth_only(&self) -> bool {
        self.color_format.is_none() && !self.depth_format.is_none()
    }

    /// Returns `true` when the target stores neither color nor depth.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.color_format.is_none() && self.depth_format.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_only_descriptor() {
        let desc = RenderTargetDescriptor::depth(64, 32, DepthFormat::Depth32);
        assert!(desc.is_depth_only());
        assert!(!desc.is_empty());
        assert_eq!(desc.color_format.wgpu_format(), None);
        assert_eq!(
            desc.depth_format.wgpu_format(),
            Some(wgpu::TextureFormat::Depth32Float)
        );
    }

    #[test]
    fn stencil_formats() {
        assert!(DepthFormat::Depth24Stencil8.has_stencil());
        assert!(DepthFormat::Depth32Stencil8.has_stencil());
        assert!(!DepthFormat::Depth32.has_stencil());
        assert_eq!(DepthFormat::Depth24Stencil8.depth_bits(), 24);
        assert_eq!(DepthFormat::None.depth_bits(), 0);
    }

    #[test]
    fn descriptor_equality_tracks_every_field() {
        let a = RenderTargetDescriptor::color(320, 180, ColorFormat::Rgba16Float);
        assert_eq!(a, a.with_size(320, 180));
        assert_ne!(a, a.with_sample_count(4));
        assert_ne!(a, a.with_filter_mode(FilterMode::Bilinear));
    }
}
