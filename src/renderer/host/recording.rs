//! Recording Host
//!
//! An in-memory [`RenderHost`] that performs no GPU work. It keeps track of
//! every live render target and material and stores every submitted
//! [`CommandList`], which makes it suitable for headless runs, capture tools
//! and tests.
//!
//! # Example
//!
//! ```ignore
//! let mut host = RecordingHost::new();
//! host.register_shader(COPY_DEPTH_SHADER);
//! let (color, depth) = host.create_camera_targets(&camera_desc);
//!
//! feature.configure(&mut host)?;
//! feature.setup_render_passes(&frame, &mut host)?;
//! ```

use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::SlotMap;

use super::{
    CapabilityRequirement, HostCapabilities, MaterialHandle, RenderHost, ShaderLibrary,
    ShaderProgramId, TargetAllocator, TextureHandle,
};
use crate::errors::{BlendError, Result};
use crate::renderer::descriptor::{ColorFormat, DepthFormat, RenderTargetDescriptor};
use crate::renderer::graph::command::CommandList;

/// Target entry of the recording host.
#[derive(Debug, Clone)]
pub struct RecordedTarget {
    pub descriptor: RenderTargetDescriptor,
    pub name: String,
    /// Owned by the camera rather than by a pool.
    pub camera_owned: bool,
}

/// Counters of allocator traffic (camera targets excluded).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocationStats {
    pub created: u32,
    pub released: u32,
    /// Releases of handles that were not live.
    pub invalid_releases: u32,
    pub materials_created: u32,
    pub materials_destroyed: u32,
}

/// In-memory host implementation.
pub struct RecordingHost {
    capabilities: HostCapabilities,
    targets: SlotMap<TextureHandle, RecordedTarget>,
    shaders: SlotMap<ShaderProgramId, String>,
    shader_names: FxHashMap<String, ShaderProgramId>,
    materials: SlotMap<MaterialHandle, ShaderProgramId>,
    refused: FxHashSet<CapabilityRequirement>,
    granted: FxHashSet<CapabilityRequirement>,
    /// Remaining `create_target` calls before allocations start failing.
    allocation_budget: Option<u32>,
    stats: AllocationStats,
    submissions: Vec<CommandList>,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingHost {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capabilities(HostCapabilities::default())
    }

    #[must_use]
    pub fn with_capabilities(capabilities: HostCapabilities) -> Self {
        Self {
            capabilities,
            targets: SlotMap::with_key(),
            shaders: SlotMap::with_key(),
            shader_names: FxHashMap::default(),
            materials: SlotMap::with_key(),
            refused: FxHashSet::default(),
            granted: FxHashSet::default(),
            allocation_budget: None,
            stats: AllocationStats::default(),
            submissions: Vec::new(),
        }
    }

    // ── Setup ──────────────────────────────────────────────────────────────

    /// Makes a shader program available to [`ShaderLibrary::find_shader`].
    pub fn register_shader(&mut self, name: &str) -> ShaderProgramId {
        if let Some(&id) = self.shader_names.get(name) {
            return id;
        }
        let id = self.shaders.insert(name.to_owned());
        self.shader_names.insert(name.to_owned(), id);
        id
    }

    /// Makes [`RenderHost::require`] refuse `requirement`.
    pub fn refuse(&mut self, requirement: CapabilityRequirement) {
        self.refused.insert(requirement);
    }

    /// Lets only the next `count` target creations succeed.
    pub fn limit_allocations(&mut self, count: u32) {
        self.allocation_budget = Some(count);
    }

    /// Creates the primary camera color and depth targets for `desc`.
    ///
    /// Camera targets do not count towards [`AllocationStats`].
    pub fn create_camera_targets(
        &mut self,
        desc: &RenderTargetDescriptor,
    ) -> (TextureHandle, TextureHandle) {
        let color_desc = RenderTargetDescriptor {
            depth_format: DepthFormat::None,
            ..*desc
        };
        let depth_format = if desc.depth_format.is_none() {
            DepthFormat::Depth32
        } else {
            desc.depth_format
        };
        let depth_desc = RenderTargetDescriptor {
            color_format: ColorFormat::None,
            depth_format,
            ..*desc
        };

        let color = self.targets.insert(RecordedTarget {
            descriptor: color_desc,
            name: "CameraColor".to_owned(),
            camera_owned: true,
        });
        let depth = self.targets.insert(RecordedTarget {
            descriptor: depth_desc,
            name: "CameraDepth".to_owned(),
            camera_owned: true,
        });
        (color, depth)
    }

    // ── Inspection ─────────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub fn stats(&self) -> AllocationStats {
        self.stats
    }

    #[must_use]
    pub fn target(&self, handle: TextureHandle) -> Option<&RecordedTarget> {
        self.targets.get(handle)
    }

    #[must_use]
    pub fn is_live(&self, handle: TextureHandle) -> bool {
        self.targets.contains_key(handle)
    }

    /// Number of live targets that were not created as camera targets.
    #[must_use]
    pub fn live_pooled_targets(&self) -> usize {
        self.targets.values().filter(|t| !t.camera_owned).count()
    }

    #[must_use]
    pub fn live_materials(&self) -> usize {
        self.materials.len()
    }

    #[must_use]
    pub fn material_shader(&self, material: MaterialHandle) -> Option<&str> {
        self.materials
            .get(material)
            .and_then(|&id| self.shaders.get(id))
            .map(String::as_str)
    }

    #[must_use]
    pub fn was_granted(&self, requirement: CapabilityRequirement) -> bool {
        self.granted.contains(&requirement)
    }

    #[must_use]
    pub fn submissions(&self) -> &[CommandList] {
        &self.submissions
    }

    #[must_use]
    pub fn last_submission(&self) -> Option<&CommandList> {
        self.submissions.last()
    }

    pub fn clear_submissions(&mut self) {
        self.submissions.clear();
    }
}

impl TargetAllocator for RecordingHost {
    fn capabilities(&self) -> HostCapabilities {
        self.capabilities
    }

    fn create_target(
        &mut self,
        desc: &RenderTargetDescriptor,
        name: &str,
    ) -> Result<TextureHandle> {
        if let Some(budget) = self.allocation_budget.as_mut() {
            if *budget == 0 {
                return Err(BlendError::Allocation(format!(
                    "allocation budget exhausted for '{name}'"
                )));
            }
            *budget -= 1;
        }

        self.stats.created += 1;
        Ok(self.targets.insert(RecordedTarget {
            descriptor: *desc,
            name: name.to_owned(),
            camera_owned: false,
        }))
    }

    fn release_target(&mut self, handle: TextureHandle) {
        if self.targets.remove(handle).is_some() {
            self.stats.released += 1;
        } else {
            self.stats.invalid_releases += 1;
            log::warn!("RecordingHost: release of unknown target {handle:?}");
        }
    }
}

impl ShaderLibrary for RecordingHost {
    fn find_shader(&self, name: &str) -> Option<ShaderProgramId> {
        self.shader_names.get(name).copied()
    }

    fn create_material(&mut self, program: ShaderProgramId) -> MaterialHandle {
        self.stats.materials_created += 1;
        self.materials.insert(program)
    }

    fn destroy_material(&mut self, material: MaterialHandle) {
        if self.materials.remove(material).is_some() {
            self.stats.materials_destroyed += 1;
        }
    }
}

impl RenderHost for RecordingHost {
    fn require(&mut self, requirement: CapabilityRequirement) -> bool {
        if self.refused.contains(&requirement) {
            return false;
        }
        self.granted.insert(requirement);
        true
    }

    fn execute_commands(&mut self, commands: CommandList) {
        self.submissions.push(commands);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn released_handles_are_not_reused() {
        let mut host = RecordingHost::new();
        let desc = RenderTargetDescriptor::color(4, 4, ColorFormat::Rgba8Srgb);

        let a = host.create_target(&desc, "a").unwrap();
        host.release_target(a);
        let b = host.create_target(&desc, "b").unwrap();

        assert_ne!(a, b);
        assert!(!host.is_live(a));
        assert!(host.is_live(b));
    }

    #[test]
    fn double_release_is_counted() {
        let mut host = RecordingHost::new();
        let desc = RenderTargetDescriptor::color(4, 4, ColorFormat::Rgba8Srgb);

        let a = host.create_target(&desc, "a").unwrap();
        host.release_target(a);
        host.release_target(a);

        assert_eq!(host.stats().released, 1);
        assert_eq!(host.stats().invalid_releases, 1);
    }

    #[test]
    fn camera_targets_are_not_pooled() {
        let mut host = RecordingHost::new();
        let desc = RenderTargetDescriptor::color(1920, 1080, ColorFormat::Rgba8Srgb);
        let (color, depth) = host.create_camera_targets(&desc);

        assert_eq!(host.live_pooled_targets(), 0);
        assert_eq!(host.stats().created, 0);
        assert!(host.target(depth).unwrap().descriptor.is_depth_only());
        assert_eq!(
            host.target(color).unwrap().descriptor.depth_format,
            DepthFormat::None
        );
    }

    #[test]
    fn allocation_budget() {
        let mut host = RecordingHost::new();
        host.limit_allocations(1);
        let desc = RenderTargetDescriptor::color(4, 4, ColorFormat::Rgba8Srgb);

        assert!(host.create_target(&desc, "a").is_ok());
        assert!(matches!(
            host.create_target(&desc, "b"),
            Err(BlendError::Allocation(_))
        ));
    }
}
