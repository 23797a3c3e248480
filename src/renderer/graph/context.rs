//! Per-Frame Context
//!
//! [`FrameContext`] is what the host hands to the passes for one camera in
//! one frame. It is strictly read-only: passes record commands against it but
//! never mutate it, and it does not own any of the resources it refers to.
//!
//! | Field               | Description                                      |
//! |---------------------|--------------------------------------------------|
//! | `camera_type`       | Game / scene view / preview / reflection camera  |
//! | `culling`           | Visible renderers for this camera                |
//! | `target_descriptor` | Descriptor of the camera's primary color buffer  |
//! | `color_target`      | Primary camera color target                      |
//! | `depth_target`      | Primary camera depth target                      |

use crate::renderer::descriptor::RenderTargetDescriptor;
use crate::renderer::graph::renderer_list::CullingResults;
use crate::renderer::host::TextureHandle;

/// Kind of camera a frame is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CameraType {
    /// In-game camera. The only camera that uses the blended buffer.
    #[default]
    Game,
    /// Editor scene view.
    SceneView,
    /// Asset/material preview.
    Preview,
    /// Reflection probe capture.
    Reflection,
}

impl CameraType {
    #[inline]
    #[must_use]
    pub const fn is_game(self) -> bool {
        matches!(self, Self::Game)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Game => "Game",
            Self::SceneView => "SceneView",
            Self::Preview => "Preview",
            Self::Reflection => "Reflection",
        }
    }
}

/// Read-only per-camera frame data supplied by the host.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub camera_type: CameraType,
    pub culling: &'a CullingResults,
    /// Descriptor of the primary camera color buffer.
    pub target_descriptor: RenderTargetDescriptor,
    pub color_target: TextureHandle,
    pub depth_target: TextureHandle,
}

impl FrameContext<'_> {
    #[inline]
    #[must_use]
    pub fn is_game_camera(&self) -> bool {
        self.camera_type.is_game()
    }
}
