//! Composite Pass
//!
//! Blits the blended buffer back onto the camera color target, optionally
//! through a user material (upscale / blend shader).
//!
//! # Data Flow
//! ```text
//! Offscreen Color → CompositePass → Camera Color
//! ```
//!
//! This is the only point where the offscreen result becomes visible. When
//! the custom material is unavailable, nothing is recorded and the camera
//! target is left as it was.

use super::{CompositeBinding, record_composite, require_cleanup_list};
use crate::errors::Result;
use crate::renderer::graph::command::CommandList;
use crate::renderer::graph::context::FrameContext;
use crate::renderer::graph::node::{BoundTarget, PassTargets, RenderPass};
use crate::renderer::graph::stage::RenderPassEvent;

/// Composite Pass
pub struct CompositePass {
    name: String,
    event: RenderPassEvent,
    composite: CompositeBinding,
    /// Offscreen color source (set per frame)
    source: Option<BoundTarget>,
}

impl CompositePass {
    #[must_use]
    pub fn new(name: impl Into<String>, event: RenderPassEvent, composite: CompositeBinding) -> Self {
        Self {
            name: name.into(),
            event,
            composite,
            source: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn composite(&self) -> CompositeBinding {
        self.composite
    }

    /// Forgets the composite material (after it has been destroyed).
    pub(crate) fn release_material(&mut self) {
        if matches!(self.composite, CompositeBinding::Material(_)) {
            self.composite = CompositeBinding::Unavailable;
        }
    }
}

impl RenderPass for CompositePass {
    fn name(&self) -> &str {
        &self.name
    }

    fn event(&self) -> RenderPassEvent {
        self.event
    }

    fn setup(&mut self, targets: PassTargets) {
        self.source = targets.color;
    }

    fn execute(&self, frame: &FrameContext, cmd: &mut CommandList) {
        if !frame.is_game_camera() {
            return;
        }
        if let Some(color) = self.source {
            record_composite(cmd, frame, color, self.composite);
        }
    }

    fn cleanup(&mut self, cmd: Option<&mut CommandList>) -> Result<()> {
        require_cleanup_list(cmd)?;
        self.source = None;
        Ok(())
    }
}
