//! Blended Buffer Pass Implementations
//!
//! | Pass                   | Writes                         | Reads                     |
//! |------------------------|--------------------------------|---------------------------|
//! | [`DepthCopyPass`]      | offscreen depth                | camera depth              |
//! | [`OffscreenRenderPass`]| offscreen color (+ depth test) | culling results           |
//! | [`CompositePass`]      | camera color                   | offscreen color           |
//! | [`CombinedBlendedPass`]| all of the above in one pass   |                           |
//!
//! The split passes must be enqueued in the order listed above. The combined
//! pass records the same steps through the same helpers.

mod combined;
mod composite;
mod depth_copy;
mod offscreen;

pub use combined::CombinedBlendedPass;
pub use composite::CompositePass;
pub use depth_copy::DepthCopyPass;
pub use offscreen::OffscreenRenderPass;

use glam::Vec4;

use crate::errors::{BlendError, Result};
use crate::renderer::graph::command::{
    BlitCommand, ClearFlags, CommandList, LoadAction, StoreAction,
};
use crate::renderer::graph::context::FrameContext;
use crate::renderer::graph::node::{BoundTarget, PassTargets, RenderPass};
use crate::renderer::graph::renderer_list::{
    DrawingSettings, FilteringSettings, LayerMask, PerObjectData, RenderQueueRange, RendererList,
    ShaderTagId, SortingCriteria,
};
use crate::renderer::graph::stage::RenderPassEvent;
use crate::renderer::host::MaterialHandle;

/// Shader keyword telling the copy-depth shader to write `SV_Depth` instead
/// of a color value. Enabled when the destination has no color format.
pub const OUTPUT_DEPTH_KEYWORD: &str = "_OUTPUT_DEPTH";

/// Shader program used for the depth copy.
pub const COPY_DEPTH_SHADER: &str = "Hidden/BlendedBuffer/CopyDepth";

/// Shader tags eligible for the offscreen draw.
pub const BLENDED_SHADER_TAGS: [ShaderTagId; 2] =
    [ShaderTagId::DEFAULT_UNLIT, ShaderTagId::FORWARD_LIT];

/// Depth value written by full clears.
pub const DEPTH_CLEAR_VALUE: f32 = 0.0;

/// Material used by the composite blit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeBinding {
    /// Host default copy shader.
    #[default]
    Default,
    /// User supplied material.
    Material(MaterialHandle),
    /// A custom material was requested but could not be created.
    /// The composite records nothing and the camera target stays untouched.
    Unavailable,
}

impl CompositeBinding {
    /// Material handle for the blit, or `None` when the composite is skipped.
    #[inline]
    #[must_use]
    fn blit_material(self) -> Option<Option<MaterialHandle>> {
        match self {
            Self::Default => Some(None),
            Self::Material(m) => Some(Some(m)),
            Self::Unavailable => None,
        }
    }
}

// ─── Closed Pass Set ──────────────────────────────────────────────────────────

/// Every pass the blended buffer feature can schedule.
pub enum BlendedPass {
    DepthCopy(DepthCopyPass),
    Offscreen(OffscreenRenderPass),
    Composite(CompositePass),
    Combined(CombinedBlendedPass),
}

impl BlendedPass {
    fn inner(&self) -> &dyn RenderPass {
        match self {
            Self::DepthCopy(p) => p,
            Self::Offscreen(p) => p,
            Self::Composite(p) => p,
            Self::Combined(p) => p,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn RenderPass {
        match self {
            Self::DepthCopy(p) => p,
            Self::Offscreen(p) => p,
            Self::Composite(p) => p,
            Self::Combined(p) => p,
        }
    }
}

impl RenderPass for BlendedPass {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn event(&self) -> RenderPassEvent {
        self.inner().event()
    }

    fn setup(&mut self, targets: PassTargets) {
        self.inner_mut().setup(targets);
    }

    fn execute(&self, frame: &FrameContext, cmd: &mut CommandList) {
        self.inner().execute(frame, cmd);
    }

    fn cleanup(&mut self, cmd: Option<&mut CommandList>) -> Result<()> {
        self.inner_mut().cleanup(cmd)
    }
}

// ─── Shared Recording Helpers ─────────────────────────────────────────────────

/// Rejects a missing host command list.
fn require_cleanup_list(cmd: Option<&mut CommandList>) -> Result<()> {
    match cmd {
        Some(_) => Ok(()),
        None => Err(BlendError::ContractViolation(
            "camera cleanup called without a command list",
        )),
    }
}

/// Drawing + filtering settings of the offscreen draw.
fn blended_draw_settings(layer_mask: LayerMask) -> (DrawingSettings, FilteringSettings) {
    let mut drawing = DrawingSettings::new(&BLENDED_SHADER_TAGS, SortingCriteria::CommonTransparent);
    // Effect geometry: no lightmaps, probes or light lists
    drawing.per_object_data = PerObjectData::empty();
    let filtering = FilteringSettings::new(RenderQueueRange::TRANSPARENT, layer_mask);
    (drawing, filtering)
}

/// Copies the camera depth into `depth` through the copy-depth material.
///
/// The keyword branch must match the destination: a depth-only target
/// (no color format) needs the shader to output depth.
fn record_depth_blit(
    cmd: &mut CommandList,
    frame: &FrameContext,
    depth: BoundTarget,
    copy_depth: MaterialHandle,
) {
    cmd.set_keyword(OUTPUT_DEPTH_KEYWORD, depth.descriptor.color_format.is_none());
    cmd.blit(BlitCommand {
        source: frame.depth_target,
        destination: depth.handle,
        material: Some(copy_depth),
        scale_bias: BlitCommand::FULL_SCREEN,
        load: LoadAction::DontCare,
        store: StoreAction::Store,
    });
}

/// Filters and sorts the visible renderers and records the draw.
fn record_draw(
    cmd: &mut CommandList,
    frame: &FrameContext,
    drawing: &DrawingSettings,
    filtering: &FilteringSettings,
) {
    let list = RendererList::build(frame.culling, drawing, filtering);
    cmd.draw_renderer_list(list);
}

/// Blits the offscreen color onto the camera color and rebinds the camera
/// target for whatever the host renders next.
fn record_composite(
    cmd: &mut CommandList,
    frame: &FrameContext,
    color: BoundTarget,
    composite: CompositeBinding,
) {
    let Some(material) = composite.blit_material() else {
        return;
    };
    cmd.blit(BlitCommand {
        source: color.handle,
        destination: frame.color_target,
        material,
        scale_bias: BlitCommand::FULL_SCREEN,
        load: LoadAction::DontCare,
        store: StoreAction::Store,
    });
    cmd.set_render_target(Some(frame.color_target), Some(frame.depth_target));
}

/// Transparent black, used for color clears.
const CLEAR_COLOR: Vec4 = Vec4::ZERO;

fn record_full_clear(cmd: &mut CommandList) {
    cmd.clear_render_target(ClearFlags::ALL, CLEAR_COLOR, DEPTH_CLEAR_VALUE);
}

fn record_color_clear(cmd: &mut CommandList) {
    cmd.clear_render_target(ClearFlags::COLOR, CLEAR_COLOR, DEPTH_CLEAR_VALUE);
}
