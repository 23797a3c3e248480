//! Offscreen Render Pass
//!
//! Draws the layer-masked transparent renderers (typically VFX) into the
//! reduced-resolution blended buffer.
//!
//! # Data Flow
//! ```text
//! CullingResults ─┐
//! Offscreen Depth ┴→ OffscreenRenderPass → Offscreen Color
//! ```
//!
//! Non-game cameras (scene view, previews) skip the blended buffer and draw
//! the same renderers straight into the camera targets.

use super::{blended_draw_settings, record_color_clear, record_draw, require_cleanup_list};
use crate::errors::Result;
use crate::renderer::graph::command::CommandList;
use crate::renderer::graph::context::FrameContext;
use crate::renderer::graph::node::{PassTargets, RenderPass};
use crate::renderer::graph::renderer_list::{DrawingSettings, FilteringSettings, LayerMask};
use crate::renderer::graph::stage::RenderPassEvent;

/// Offscreen Render Pass
///
/// # Camera Branch
/// - Game camera with targets: binds offscreen color + depth, clears color
///   only (the copied depth must survive)
/// - Any other camera: binds the camera's own color + depth, no clear
pub struct OffscreenRenderPass {
    name: String,
    event: RenderPassEvent,
    drawing: DrawingSettings,
    filtering: FilteringSettings,
    targets: PassTargets,
}

impl OffscreenRenderPass {
    #[must_use]
    pub fn new(name: impl Into<String>, event: RenderPassEvent, layer_mask: LayerMask) -> Self {
        let (drawing, filtering) = blended_draw_settings(layer_mask);
        Self {
            name: name.into(),
            event,
            drawing,
            filtering,
            targets: PassTargets::NONE,
        }
    }

    #[inline]
    #[must_use]
    pub fn targets(&self) -> PassTargets {
        self.targets
    }

    #[inline]
    #[must_use]
    pub fn filtering(&self) -> &FilteringSettings {
        &self.filtering
    }
}

impl RenderPass for OffscreenRenderPass {
    fn name(&self) -> &str {
        &self.name
    }

    fn event(&self) -> RenderPassEvent {
        self.event
    }

    fn setup(&mut self, targets: PassTargets) {
        self.targets = targets;
    }

    fn execute(&self, frame: &FrameContext, cmd: &mut CommandList) {
        match (frame.is_game_camera(), self.targets.color, self.targets.depth) {
            (true, Some(color), Some(depth)) => {
                cmd.set_render_target(Some(color.handle), Some(depth.handle));
                record_color_clear(cmd);
            }
            _ => cmd.set_render_target(Some(frame.color_target), Some(frame.depth_target)),
        }

        record_draw(cmd, frame, &self.drawing, &self.filtering);
    }

    fn cleanup(&mut self, cmd: Option<&mut CommandList>) -> Result<()> {
        require_cleanup_list(cmd)?;
        self.targets = PassTargets::NONE;
        Ok(())
    }
}
