//! GPU backends for the host interfaces.

mod wgpu_allocator;

pub use wgpu_allocator::{WgpuTarget, WgpuTargetAllocator, device_capabilities};
