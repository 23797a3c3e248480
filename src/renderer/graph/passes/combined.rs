//! Combined Blended Buffer Pass
//!
//! Fused variant of the three split passes: one pass binds the blended
//! buffer, copies depth, draws and composites.
//!
//! # Data Flow
//! ```text
//! Camera Depth ─┐
//!               ├→ [clear → depth blit → draw] → Offscreen Color → Camera Color
//! Culling ──────┘
//! ```
//!
//! Unlike the split layout, the offscreen color and depth are bound together
//! for the clear and the depth blit.

use super::{
    CompositeBinding, blended_draw_settings, record_composite, record_depth_blit, record_draw,
    record_full_clear, require_cleanup_list,
};
use crate::errors::Result;
use crate::renderer::graph::command::CommandList;
use crate::renderer::graph::context::FrameContext;
use crate::renderer::graph::node::{PassTargets, RenderPass};
use crate::renderer::graph::renderer_list::{DrawingSettings, FilteringSettings, LayerMask};
use crate::renderer::graph::stage::RenderPassEvent;
use crate::renderer::host::MaterialHandle;

/// Combined Blended Buffer Pass
pub struct CombinedBlendedPass {
    name: String,
    event: RenderPassEvent,
    copy_depth: Option<MaterialHandle>,
    composite: CompositeBinding,
    drawing: DrawingSettings,
    filtering: FilteringSettings,
    targets: PassTargets,
}

impl CombinedBlendedPass {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        event: RenderPassEvent,
        layer_mask: LayerMask,
        copy_depth: Option<MaterialHandle>,
        composite: CompositeBinding,
    ) -> Self {
        let (drawing, filtering) = blended_draw_settings(layer_mask);
        Self {
            name: name.into(),
            event,
            copy_depth,
            composite,
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

    pub(crate) fn release_materials(&mut self) {
        self.copy_depth = None;
        if matches!(self.composite, CompositeBinding::Material(_)) {
            self.composite = CompositeBinding::Unavailable;
        }
    }
}

impl RenderPass for CombinedBlendedPass {
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
        let offscreen = match (self.targets.color, self.targets.depth) {
            (Some(color), Some(depth)) if frame.is_game_camera() => Some((color, depth)),
            _ => None,
        };

        if let Some((color, depth)) = offscreen {
            cmd.set_render_target(Some(color.handle), Some(depth.handle));
            record_full_clear(cmd);
            if let Some(copy_depth) = self.copy_depth {
                record_depth_blit(cmd, frame, depth, copy_depth);
                // Blits invalidate the bound target
                cmd.set_render_target(Some(color.handle), Some(depth.handle));
            }
        } else {
            // Other cameras do not use the blended buffer
            cmd.set_render_target(Some(frame.color_target), Some(frame.depth_target));
        }

        record_draw(cmd, frame, &self.drawing, &self.filtering);

        if let Some((color, _)) = offscreen {
            record_composite(cmd, frame, color, self.composite);
        }
    }

    fn cleanup(&mut self, cmd: Option<&mut CommandList>) -> Result<()> {
        require_cleanup_list(cmd)?;
        self.targets = PassTargets::NONE;
        Ok(())
    }
}
