//! Blended Buffer Settings
//!
//! Pure data describing how the blended buffer is scheduled and sized. The
//! struct is loaded by the host's settings system through serde; every field
//! has a default so partial documents are accepted.
//!
//! # Resolution
//!
//! | Setting                         | Offscreen size (1920×1080 camera) |
//! |---------------------------------|-----------------------------------|
//! | `Downsample(X2)` (default)      | 960×540                           |
//! | `Downsample(X4)`                | 480×270                           |
//! | `Explicit { 320, 180 }`         | 320×180, whatever the camera size |
//!
//! # Usage
//!
//! ```rust,ignore
//! let settings: PassSettings = serde_json::from_str(r#"{
//!     "event": "AfterRenderingSkybox",
//!     "resolution": { "downsample": 4 },
//!     "layer_mask": 256
//! }"#)?;
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::BlendError;
use crate::renderer::descriptor::{
    ColorFormat, DepthFormat, FilterMode, RenderTargetDescriptor, WrapMode,
};
use crate::renderer::graph::renderer_list::LayerMask;
use crate::renderer::graph::stage::RenderPassEvent;

/// Default GPU debugger label of the offscreen targets.
pub const DEFAULT_TARGET_NAME: &str = "_BlendedTarget";

/// Integer divisor applied to the camera resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
#[repr(u32)]
pub enum DownSampling {
    #[default]
    X2 = 2,
    X4 = 4,
    X8 = 8,
    X16 = 16,
}

impl DownSampling {
    #[inline]
    #[must_use]
    pub const fn divisor(self) -> u32 {
        self as u32
    }

    /// Returns all available factors.
    #[must_use]
    pub const fn all() -> &'static [DownSampling] {
        &[Self::X2, Self::X4, Self::X8, Self::X16]
    }
}

impl TryFrom<u32> for DownSampling {
    type Error = BlendError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Self::X2),
            4 => Ok(Self::X4),
            8 => Ok(Self::X8),
            16 => Ok(Self::X16),
            other => Err(BlendError::InvalidSetting(format!(
                "downsample factor {other} is not one of 2, 4, 8, 16"
            ))),
        }
    }
}

impl From<DownSampling> for u32 {
    fn from(value: DownSampling) -> Self {
        value.divisor()
    }
}

/// Size of the offscreen targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetResolution {
    /// Fixed size, independent of the camera.
    Explicit { width: u32, height: u32 },
    /// Camera size divided by the factor (integer division).
    Downsample(DownSampling),
}

impl Default for TargetResolution {
    fn default() -> Self {
        Self::Downsample(DownSampling::default())
    }
}

impl TargetResolution {
    /// Resolves the offscreen size for a camera of `width`×`height`.
    #[must_use]
    pub const fn resolve(self, width: u32, height: u32) -> (u32, u32) {
        match self {
            Self::Explicit { width, height } => (width, height),
            Self::Downsample(factor) => (width / factor.divisor(), height / factor.divisor()),
        }
    }
}

/// Material used to composite the blended buffer onto the camera.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeMaterial {
    /// Host default copy.
    #[default]
    Default,
    /// Custom shader program (upscale, blend, ...), looked up by name.
    Custom { shader: String },
}

/// How the blended buffer work is split into passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassLayout {
    /// Depth copy → offscreen draw → composite, three passes at one event.
    #[default]
    Split,
    /// A single pass doing all three steps.
    Fused,
}

/// Color format selection of the offscreen color target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorPrecision {
    /// Always 16-bit float.
    #[default]
    Hdr,
    /// Same format as the camera target (8-bit sRGB if the camera has none).
    FollowCamera,
}

/// Blended buffer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassSettings {
    /// Debug group label prefix.
    pub pass_tag: String,
    /// Pipeline event all passes are enqueued at.
    pub event: RenderPassEvent,
    pub resolution: TargetResolution,
    /// Layers drawn into the blended buffer (e.g. VFX layers).
    pub layer_mask: LayerMask,
    pub composite: CompositeMaterial,
    /// GPU debugger label of the offscreen targets.
    pub target_name: Option<String>,
    pub layout: PassLayout,
    pub color_precision: ColorPrecision,
    /// Sampling filter of the offscreen color (the depth is always point sampled).
    pub filter_mode: FilterMode,
}

impl Default for PassSettings {
    fn default() -> Self {
        Self {
            pass_tag: "BlendedBuffer".to_owned(),
            event: RenderPassEvent::AfterRenderingSkybox,
            resolution: TargetResolution::default(),
            layer_mask: LayerMask::NOTHING,
            composite: CompositeMaterial::Default,
            target_name: None,
            layout: PassLayout::Split,
            color_precision: ColorPrecision::Hdr,
            filter_mode: FilterMode::Point,
        }
    }
}

impl PassSettings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Base debugger label of the offscreen targets.
    #[must_use]
    pub fn target_name(&self) -> &str {
        self.target_name.as_deref().unwrap_or(DEFAULT_TARGET_NAME)
    }

    /// Offscreen color descriptor for a camera target.
    ///
    /// The color target carries no depth so it can be bound next to the
    /// separate depth target.
    #[must_use]
    pub fn color_descriptor(&self, camera: &RenderTargetDescriptor) -> RenderTargetDescriptor {
        let (width, height) = self.resolution.resolve(camera.width, camera.height);
        let color_format = match self.color_precision {
            ColorPrecision::Hdr => ColorFormat::Rgba16Float,
            ColorPrecision::FollowCamera if camera.color_format.is_none() => ColorFormat::Rgba8Srgb,
            ColorPrecision::FollowCamera => camera.color_format,
        };

        RenderTargetDescriptor {
            width,
            height,
            color_format,
            depth_format: DepthFormat::None,
            sample_count: camera.sample_count,
            wrap_mode: WrapMode::Clamp,
            filter_mode: self.filter_mode,
        }
    }

    /// Offscreen depth descriptor for a camera target.
    ///
    /// Depth-only (`color_format = None`) and never multisampled.
    #[must_use]
    pub fn depth_descriptor(&self, camera: &RenderTargetDescriptor) -> RenderTargetDescriptor {
        let (width, height) = self.resolution.resolve(camera.width, camera.height);
        let depth_format = if camera.depth_format.is_none() {
            DepthFormat::Depth32
        } else {
            camera.depth_format
        };

        RenderTargetDescriptor {
            width,
            height,
            color_format: ColorFormat::None,
            depth_format,
            sample_count: 1,
            wrap_mode: WrapMode::Clamp,
            filter_mode: FilterMode::Point,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> RenderTargetDescriptor {
        RenderTargetDescriptor {
            width: 1920,
            height: 1080,
            color_format: ColorFormat::Rgba8Srgb,
            depth_format: DepthFormat::Depth24Stencil8,
            sample_count: 4,
            ..Default::default()
        }
    }

    #[test]
    fn downsample_by_four() {
        let settings = PassSettings {
            resolution: TargetResolution::Downsample(DownSampling::X4),
            ..Default::default()
        };
        let color = settings.color_descriptor(&camera());
        let depth = settings.depth_descriptor(&camera());

        assert_eq!((color.width, color.height), (480, 270));
        assert_eq!((depth.width, depth.height), (480, 270));
    }

    #[test]
    fn explicit_resolution_ignores_camera_size() {
        let settings = PassSettings {
            resolution: TargetResolution::Explicit {
                width: 320,
                height: 180,
            },
            ..Default::default()
        };
        let color = settings.color_descriptor(&camera());
        let depth = settings.depth_descriptor(&camera().with_size(640, 360));

        assert_eq!((color.width, color.height), (320, 180));
        assert_eq!((depth.width, depth.height), (320, 180));
    }

    #[test]
    fn color_and_depth_formats() {
        let settings = PassSettings::default();
        let color = settings.color_descriptor(&camera());
        let depth = settings.depth_descriptor(&camera());

        assert_eq!(color.color_format, ColorFormat::Rgba16Float);
        assert_eq!(color.depth_format, DepthFormat::None);
        assert_eq!(color.sample_count, 4);

        assert!(depth.is_depth_only());
        assert_eq!(depth.depth_format, DepthFormat::Depth24Stencil8);
        assert_eq!(depth.sample_count, 1);
    }

    #[test]
    fn follow_camera_precision() {
        let settings = PassSettings {
            color_precision: ColorPrecision::FollowCamera,
            ..Default::default()
        };
        assert_eq!(
            settings.color_descriptor(&camera()).color_format,
            ColorFormat::Rgba8Srgb
        );

        let depth_only_camera = RenderTargetDescriptor::depth(64, 64, DepthFormat::Depth32);
        assert_eq!(
            settings.color_descriptor(&depth_only_camera).color_format,
            ColorFormat::Rgba8Srgb
        );
    }

    #[test]
    fn filter_mode_applies_to_color_only() {
        let settings = PassSettings {
            filter_mode: FilterMode::Bilinear,
            ..Default::default()
        };
        assert_eq!(PassSettings::default().filter_mode, FilterMode::Point);
        assert_eq!(
            settings.color_descriptor(&camera()).filter_mode,
            FilterMode::Bilinear
        );
        assert_eq!(
            settings.depth_descriptor(&camera()).filter_mode,
            FilterMode::Point
        );
    }

    #[test]
    fn downsampling_rejects_other_factors() {
        assert_eq!(DownSampling::try_from(8).unwrap(), DownSampling::X8);
        assert!(DownSampling::try_from(3).is_err());
        assert!(DownSampling::try_from(0).is_err());
    }

    #[test]
    fn default_target_name() {
        let mut settings = PassSettings::default();
        assert_eq!(settings.target_name(), DEFAULT_TARGET_NAME);
        settings.target_name = Some("_Vfx".to_owned());
        assert_eq!(settings.target_name(), "_Vfx");
    }
}
