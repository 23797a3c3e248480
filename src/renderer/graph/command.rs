//! Recorded Command Lists
//!
//! Passes do not submit GPU work themselves. They record [`RenderCommand`]s
//! into a [`CommandList`] which the host executes via
//! [`RenderHost::execute_commands`](crate::renderer::host::RenderHost::execute_commands).
//!
//! Like a tracked render pass, the list remembers the currently bound render
//! target and drops redundant `SetRenderTarget` calls.

use bitflags::bitflags;
use glam::Vec4;

use crate::renderer::graph::renderer_list::RendererList;
use crate::renderer::host::{MaterialHandle, TextureHandle};

bitflags! {
    /// Which planes of the bound render target a clear touches.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearFlags: u8 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
        const DEPTH_STENCIL = Self::DEPTH.bits() | Self::STENCIL.bits();
        const ALL = Self::COLOR.bits() | Self::DEPTH_STENCIL.bits();
    }
}

/// What happens to the destination contents before a blit writes to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadAction {
    #[default]
    Load,
    Clear,
    DontCare,
}

/// What happens to the destination contents after a blit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StoreAction {
    #[default]
    Store,
    DontCare,
}

/// Full-screen copy from `source` into `destination`.
#[derive(Debug, Clone, PartialEq)]
pub struct BlitCommand {
    pub source: TextureHandle,
    pub destination: TextureHandle,
    /// `None` selects the host's default copy shader.
    pub material: Option<MaterialHandle>,
    /// `xy` = UV scale, `zw` = UV offset.
    pub scale_bias: Vec4,
    pub load: LoadAction,
    pub store: StoreAction,
}

impl BlitCommand {
    /// Identity scale/bias used for full-screen copies.
    pub const FULL_SCREEN: Vec4 = Vec4::new(1.0, 1.0, 0.0, 0.0);
}

/// A single recorded command.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    PushDebugGroup(String),
    PopDebugGroup,
    SetRenderTarget {
        color: Option<TextureHandle>,
        depth: Option<TextureHandle>,
    },
    ClearRenderTarget {
        flags: ClearFlags,
        color: Vec4,
        depth: f32,
    },
    SetKeyword {
        keyword: &'static str,
        enabled: bool,
    },
    Blit(BlitCommand),
    DrawRendererList(RendererList),
}

/// Currently bound (color, depth) pair.
type TargetBinding = (Option<TextureHandle>, Option<TextureHandle>);

/// Ordered command sequence submitted to the host in one go.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandList {
    commands: Vec<RenderCommand>,
    current_target: Option<TargetBinding>,
}

impl CommandList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
            current_target: None,
        }
    }

    pub fn push_debug_group(&mut self, label: impl Into<String>) {
        self.commands.push(RenderCommand::PushDebugGroup(label.into()));
    }

    pub fn pop_debug_group(&mut self) {
        self.commands.push(RenderCommand::PopDebugGroup);
    }

    /// Binds `color` + `depth` as the active render target.
    ///
    /// Skipped when the same pair is already bound.
    pub fn set_render_target(
        &mut self,
        color: Option<TextureHandle>,
        depth: Option<TextureHandle>,
    ) {
        if self.current_target == Some((color, depth)) {
            return;
        }
        self.commands
            .push(RenderCommand::SetRenderTarget { color, depth });
        self.current_target = Some((color, depth));
    }

    /// Clears the planes selected by `flags` of the bound render target.
    pub fn clear_render_target(&mut self, flags: ClearFlags, color: Vec4, depth: f32) {
        self.commands.push(RenderCommand::ClearRenderTarget {
            flags,
            color,
            depth,
        });
    }

    pub fn set_keyword(&mut self, keyword: &'static str, enabled: bool) {
        self.commands
            .push(RenderCommand::SetKeyword { keyword, enabled });
    }

    /// Records a blit. The destination becomes the bound color target.
    pub fn blit(&mut self, blit: BlitCommand) {
        self.current_target = None;
        self.commands.push(RenderCommand::Blit(blit));
    }

    pub fn draw_renderer_list(&mut self, list: RendererList) {
        self.commands.push(RenderCommand::DrawRendererList(list));
    }

    /// Returns the currently bound render target, if any was set.
    #[inline]
    #[must_use]
    pub fn current_target(&self) -> Option<TargetBinding> {
        self.current_target
    }

    #[inline]
    #[must_use]
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Removes all commands and forgets the bound target (keeps capacity).
    pub fn clear(&mut self) {
        self.commands.clear();
        self.current_target = None;
    }

    /// Iterates over the recorded blits.
    pub fn blits(&self) -> impl Iterator<Item = &BlitCommand> {
        self.commands.iter().filter_map(|c| match c {
            RenderCommand::Blit(b) => Some(b),
            _ => None,
        })
    }

    /// Iterates over the recorded renderer list draws.
    pub fn draws(&self) -> impl Iterator<Item = &RendererList> {
        self.commands.iter().filter_map(|c| match c {
            RenderCommand::DrawRendererList(l) => Some(l),
            _ => None,
        })
    }
}

impl IntoIterator for CommandList {
    type Item = RenderCommand;
    type IntoIter = std::vec::IntoIter<RenderCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}
