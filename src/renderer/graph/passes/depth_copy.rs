//! Depth Copy Pass
//!
//! Copies the camera depth buffer into the (smaller) offscreen depth target,
//! so that the blended buffer draw is occluded by opaque scene geometry.
//!
//! # Data Flow
//! ```text
//! Camera Depth → DepthCopyPass → Offscreen Depth
//! ```
//!
//! # Execution Order
//! - Before `OffscreenRenderPass` at the same event
//!
//! # Notes
//! - Game cameras only; other cameras never get offscreen targets
//! - Without the copy-depth shader the pass only clears the target

use super::{record_depth_blit, record_full_clear, require_cleanup_list};
use crate::errors::Result;
use crate::renderer::graph::command::CommandList;
use crate::renderer::graph::context::FrameContext;
use crate::renderer::graph::node::{BoundTarget, PassTargets, RenderPass};
use crate::renderer::graph::stage::RenderPassEvent;
use crate::renderer::host::MaterialHandle;

/// Depth Copy Pass
///
/// Binds the offscreen depth target alone, clears it and blits the camera
/// depth into it.
pub struct DepthCopyPass {
    name: String,
    event: RenderPassEvent,
    /// Copy-depth material (`None` when the shader was not found)
    copy_depth: Option<MaterialHandle>,
    /// Destination depth target (set per frame)
    target_depth: Option<BoundTarget>,
}

impl DepthCopyPass {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        event: RenderPassEvent,
        copy_depth: Option<MaterialHandle>,
    ) -> Self {
        Self {
            name: name.into(),
            event,
            copy_depth,
            target_depth: None,
        }
    }

    /// Returns `true` if the pass can copy the camera depth.
    #[inline]
    #[must_use]
    pub fn is_operational(&self) -> bool {
        self.copy_depth.is_some()
    }

    #[inline]
    #[must_use]
    pub fn target_depth(&self) -> Option<BoundTarget> {
        self.target_depth
    }

    /// Forgets the copy-depth material (after it has been destroyed).
    pub(crate) fn release_material(&mut self) {
        self.copy_depth = None;
    }
}

impl RenderPass for DepthCopyPass {
    fn name(&self) -> &str {
        &self.name
    }

    fn event(&self) -> RenderPassEvent {
        self.event
    }

    fn setup(&mut self, targets: PassTargets) {
        self.target_depth = targets.depth;
    }

    fn execute(&self, frame: &FrameContext, cmd: &mut CommandList) {
        if !frame.is_game_camera() {
            return;
        }
        let Some(depth) = self.target_depth else {
            return;
        };

        // The offscreen draw only clears color, so depth is cleared here
        // even when no copy follows
        cmd.set_render_target(None, Some(depth.handle));
        record_full_clear(cmd);
        if let Some(copy_depth) = self.copy_depth {
            record_depth_blit(cmd, frame, depth, copy_depth);
        }
    }

    fn cleanup(&mut self, cmd: Option<&mut CommandList>) -> Result<()> {
        require_cleanup_list(cmd)?;
        self.target_depth = None;
        Ok(())
    }
}
