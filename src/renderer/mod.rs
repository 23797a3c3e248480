//! Rendering Infrastructure
//!
//! - descriptor: render target descriptors and formats
//! - host: engine interfaces (allocation, shaders, command execution)
//! - pool: reallocate-if-needed target pool
//! - graph: pass scheduling, command recording and the blended buffer passes
//! - backend: wgpu implementation of the allocator

pub mod backend;
pub mod descriptor;
pub mod graph;
pub mod host;
pub mod pool;

pub use descriptor::{ColorFormat, DepthFormat, FilterMode, RenderTargetDescriptor, WrapMode};
pub use host::{
    CapabilityRequirement, HostCapabilities, MaterialHandle, RecordingHost, RenderHost,
    ShaderLibrary, ShaderProgramId, TargetAllocator, TextureHandle,
};
pub use pool::{DescriptorPolicy, PoolStats, PooledRenderTarget, ResourcePool};
