//! Host Engine Interfaces
//!
//! The blended buffer passes never talk to a GPU API directly. Everything
//! they need from the surrounding engine goes through three traits:
//!
//! | Trait               | Provides                                           |
//! |---------------------|----------------------------------------------------|
//! | [`TargetAllocator`] | render target creation/release, capability query   |
//! | [`ShaderLibrary`]   | shader lookup, material creation/destruction       |
//! | [`RenderHost`]      | both of the above + command execution, requirements|
//!
//! Two implementations ship with the crate:
//! - [`RecordingHost`]: in-memory host that tracks allocations and keeps every
//!   submitted [`CommandList`]. Used for headless runs and tests.
//! - [`WgpuTargetAllocator`](crate::renderer::backend::WgpuTargetAllocator):
//!   allocator backed by a `wgpu::Device`.

pub mod recording;

pub use recording::{AllocationStats, RecordingHost};

use crate::errors::Result;
use crate::renderer::descriptor::{DepthFormat, RenderTargetDescriptor};
use crate::renderer::graph::command::CommandList;

slotmap::new_key_type! {
    /// Host-issued handle to a 2D render target.
    ///
    /// Handles are generational: a released and re-created target never
    /// compares equal to its predecessor.
    pub struct TextureHandle;

    /// Host-issued handle to a material instance.
    pub struct MaterialHandle;

    /// Host-issued identifier of a compiled shader program.
    pub struct ShaderProgramId;
}

// ─── Capabilities ─────────────────────────────────────────────────────────────

/// Runtime capabilities of the host platform.
///
/// Queried once at configuration time and cached by the resource pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
    /// 32-bit float depth with 8-bit stencil.
    pub depth32_stencil8: bool,
    /// 24-bit depth with 8-bit stencil.
    pub depth24_stencil8: bool,
    /// Largest accepted width/height of a 2D render target.
    pub max_target_dimension: u32,
    /// Largest accepted MSAA sample count.
    pub max_sample_count: u32,
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self {
            depth32_stencil8: true,
            depth24_stencil8: true,
            max_target_dimension: 8192,
            max_sample_count: 8,
        }
    }
}

impl HostCapabilities {
    /// Returns `true` if a target with this depth format can be created.
    #[must_use]
    pub const fn supports_depth(&self, format: DepthFormat) -> bool {
        match format {
            DepthFormat::Depth32Stencil8 => self.depth32_stencil8,
            DepthFormat::Depth24Stencil8 => self.depth24_stencil8,
            DepthFormat::None | DepthFormat::Depth24 | DepthFormat::Depth32 => true,
        }
    }
}

/// Engine-side capability a feature needs to be switched on.
///
/// Declared by the feature and handed to [`RenderHost::require`] during
/// configuration instead of mutating global pipeline settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityRequirement {
    /// The camera depth buffer must be readable as a texture.
    CameraDepthTexture,
}

// ─── Traits ───────────────────────────────────────────────────────────────────

/// Creates and releases render targets.
pub trait TargetAllocator {
    /// Returns the platform capabilities.
    fn capabilities(&self) -> HostCapabilities;

    /// Creates a render target exactly matching `desc`.
    ///
    /// `name` is used for GPU debugger labels only.
    fn create_target(&mut self, desc: &RenderTargetDescriptor, name: &str)
    -> Result<TextureHandle>;

    /// Releases a render target. Unknown handles are ignored.
    fn release_target(&mut self, handle: TextureHandle);
}

/// Resolves shader programs and owns material instances.
pub trait ShaderLibrary {
    /// Looks up a shader program by name.
    fn find_shader(&self, name: &str) -> Option<ShaderProgramId>;

    /// Creates a material instance for `program`.
    fn create_material(&mut self, program: ShaderProgramId) -> MaterialHandle;

    /// Destroys a material instance.
    fn destroy_material(&mut self, material: MaterialHandle);
}

/// Full host engine surface used by the feature controller.
pub trait RenderHost: TargetAllocator + ShaderLibrary {
    /// Asks the host to provide `requirement`.
    ///
    /// Returns `false` if the host cannot satisfy it.
    fn require(&mut self, requirement: CapabilityRequirement) -> bool;

    /// Executes a recorded command sequence.
    fn execute_commands(&mut self, commands: CommandList);
}
