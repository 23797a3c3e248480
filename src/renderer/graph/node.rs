//! Render Pass Trait
//!
//! Defines the abstract interface of a schedulable pass.
//! Every pass goes through the same per-frame lifecycle:
//!
//! ```text
//! setup(targets) ──► execute(frame, cmd) ──► cleanup(cmd)
//!   &mut self          &self                   &mut self
//! ```
//!
//! # Design Principles
//! - `setup` receives the non-owning target handles for this frame
//! - `execute` only records commands; it never allocates or mutates the pass
//! - `cleanup` forgets the per-frame handles again

use crate::errors::Result;
use crate::renderer::descriptor::RenderTargetDescriptor;
use crate::renderer::graph::command::CommandList;
use crate::renderer::graph::context::FrameContext;
use crate::renderer::graph::stage::RenderPassEvent;
use crate::renderer::host::TextureHandle;

/// Non-owning reference to a pooled target, valid for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundTarget {
    pub handle: TextureHandle,
    /// Descriptor the target was allocated with.
    pub descriptor: RenderTargetDescriptor,
}

/// Offscreen targets bound to a pass for one frame.
///
/// Both are `None` for cameras that bypass the blended buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassTargets {
    pub color: Option<BoundTarget>,
    pub depth: Option<BoundTarget>,
}

impl PassTargets {
    /// No offscreen targets (non-game cameras).
    pub const NONE: Self = Self {
        color: None,
        depth: None,
    };

    #[must_use]
    pub fn new(color: BoundTarget, depth: BoundTarget) -> Self {
        Self {
            color: Some(color),
            depth: Some(depth),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.color.is_some() || self.depth.is_some()
    }
}

/// Render pass trait.
///
/// All passes that can be scheduled by a [`PassQueue`](super::PassQueue)
/// implement this interface.
pub trait RenderPass {
    /// Returns the pass name, used as the debug group label.
    fn name(&self) -> &str;

    /// Event the pass is scheduled at.
    fn event(&self) -> RenderPassEvent;

    /// Stores this frame's offscreen targets.
    fn setup(&mut self, targets: PassTargets);

    /// Records the pass commands for the current camera.
    fn execute(&self, frame: &FrameContext, cmd: &mut CommandList);

    /// Drops the per-frame targets once the camera has been rendered.
    ///
    /// `None` means the host did not supply its command list; this is a
    /// contract violation.
    fn cleanup(&mut self, cmd: Option<&mut CommandList>) -> Result<()>;
}
