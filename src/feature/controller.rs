//! Blended Buffer Feature Controller
//!
//! Owns the settings, the offscreen targets, the materials and the passes,
//! and drives them through the host's per-camera lifecycle.
//!
//! # Lifecycle
//!
//! ```text
//!                 configure            setup_render_passes
//! Uninitialized ────────────► Configured ─────────────────► Active
//!       │                         │                           │ ▲
//!       │                         │                           └─┘ every camera / frame
//!       └───────── dispose ───────┴────────── dispose ────────┴──► Disposed
//! ```
//!
//! # Per Camera
//!
//! ```text
//! setup_render_passes(frame)   &mut self   reallocate targets, set up passes
//! add_render_passes(queue)     &self       enqueue passes at settings.event
//! queue.execute(frame, host)               host runs passes in event order
//! on_camera_cleanup(cmd)       &mut self   forget per-frame targets
//! ```
//!
//! Targets are only ever written in `setup_render_passes`; while the queue
//! borrows the passes, the controller cannot be mutated.

use smallvec::SmallVec;

use crate::errors::{BlendError, Result};
use crate::feature::settings::{CompositeMaterial, PassLayout, PassSettings, TargetResolution};
use crate::renderer::graph::command::CommandList;
use crate::renderer::graph::context::FrameContext;
use crate::renderer::graph::node::{PassTargets, RenderPass};
use crate::renderer::graph::passes::{
    BlendedPass, COPY_DEPTH_SHADER, CombinedBlendedPass, CompositeBinding, CompositePass,
    DepthCopyPass, OffscreenRenderPass,
};
use crate::renderer::graph::queue::PassQueue;
use crate::renderer::host::{CapabilityRequirement, MaterialHandle, RenderHost, TargetAllocator};
use crate::renderer::pool::{DescriptorPolicy, PoolStats, PooledRenderTarget, ResourcePool};

/// Capabilities the blended buffer needs from the host.
pub const REQUIREMENTS: &[CapabilityRequirement] = &[CapabilityRequirement::CameraDepthTexture];

/// Lifecycle state of a [`BlendedBufferFeature`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FeatureState {
    #[default]
    Uninitialized,
    /// Passes built, no targets allocated yet.
    Configured,
    /// Targets allocated and passes set up at least once.
    Active,
    Disposed,
}

impl FeatureState {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Configured => "configured",
            Self::Active => "active",
            Self::Disposed => "disposed",
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Configured | Self::Active)
    }
}

/// The blended buffer render feature.
///
/// Renders layer-masked transparent objects (typically VFX) into a
/// reduced-resolution offscreen buffer that is occlusion-tested against a
/// copy of the camera depth, then composites the result onto the camera.
pub struct BlendedBufferFeature {
    settings: PassSettings,
    policy: DescriptorPolicy,
    enabled: bool,
    state: FeatureState,

    // === Owned GPU Resources ===
    /// Created at configure with the cached host capabilities
    pool: Option<ResourcePool>,
    color_target: Option<PooledRenderTarget>,
    depth_target: Option<PooledRenderTarget>,
    copy_depth_material: Option<MaterialHandle>,
    composite_material: Option<MaterialHandle>,

    // === Passes (enqueue order) ===
    passes: SmallVec<[BlendedPass; 3]>,
}

impl BlendedBufferFeature {
    #[must_use]
    pub fn new(settings: PassSettings) -> Self {
        Self {
            settings,
            policy: DescriptorPolicy::default(),
            enabled: true,
            state: FeatureState::Uninitialized,
            pool: None,
            color_target: None,
            depth_target: None,
            copy_depth_material: None,
            composite_material: None,
            passes: SmallVec::new(),
        }
    }

    /// Sets how invalid target descriptors are handled.
    ///
    /// Only takes effect if called before [`configure`](Self::configure).
    #[must_use]
    pub fn with_descriptor_policy(mut self, policy: DescriptorPolicy) -> Self {
        self.policy = policy;
        self
    }

    // ── Accessors ──────────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &PassSettings {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> FeatureState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Capabilities this feature asks the host for during configuration.
    #[inline]
    #[must_use]
    pub fn requirements(&self) -> &'static [CapabilityRequirement] {
        REQUIREMENTS
    }

    #[inline]
    #[must_use]
    pub fn color_target(&self) -> Option<&PooledRenderTarget> {
        self.color_target.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn depth_target(&self) -> Option<&PooledRenderTarget> {
        self.depth_target.as_ref()
    }

    /// Passes in enqueue order.
    #[inline]
    #[must_use]
    pub fn passes(&self) -> &[BlendedPass] {
        &self.passes
    }

    #[must_use]
    pub fn pool_stats(&self) -> PoolStats {
        self.pool.as_ref().map(ResourcePool::stats).unwrap_or_default()
    }

    // ── Runtime Settings ───────────────────────────────────────────────────

    /// Changes the offscreen resolution.
    ///
    /// Targets are reallocated during the next `setup_render_passes`.
    pub fn set_resolution(&mut self, resolution: TargetResolution) {
        self.settings.resolution = resolution;
    }

    /// Enables or disables the feature. A disabled feature enqueues nothing.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    // ── Lifecycle ──────────────────────────────────────────────────────────

    /// Builds the passes and creates the materials.
    ///
    /// No render target is allocated here.
    pub fn configure(&mut self, host: &mut dyn RenderHost) -> Result<()> {
        if self.state != FeatureState::Uninitialized {
            return Err(self.invalid_state("configure"));
        }

        let mut depth_texture = true;
        for &requirement in REQUIREMENTS {
            if !host.require(requirement) {
                log::warn!(
                    "{}: host cannot provide {:?}, depth copy disabled",
                    self.settings.pass_tag,
                    requirement
                );
                depth_texture = false;
            }
        }

        self.pool = Some(ResourcePool::new(host.capabilities(), self.policy));

        if depth_texture {
            self.copy_depth_material = match host.find_shader(COPY_DEPTH_SHADER) {
                Some(program) => Some(host.create_material(program)),
                None => {
                    log::warn!(
                        "{}: shader '{}' not found, depth copy disabled",
                        self.settings.pass_tag,
                        COPY_DEPTH_SHADER
                    );
                    None
                }
            };
        }

        let composite = match &self.settings.composite {
            CompositeMaterial::Default => CompositeBinding::Default,
            CompositeMaterial::Custom { shader } => match host.find_shader(shader) {
                Some(program) => {
                    let material = host.create_material(program);
                    self.composite_material = Some(material);
                    CompositeBinding::Material(material)
                }
                None => {
                    log::warn!(
                        "{}: composite shader '{}' not found, blended buffer will not be composited",
                        self.settings.pass_tag,
                        shader
                    );
                    CompositeBinding::Unavailable
                }
            },
        };

        self.passes = self.build_passes(composite);
        self.state = FeatureState::Configured;
        log::debug!(
            "{}: configured {} pass(es) at {}",
            self.settings.pass_tag,
            self.passes.len(),
            self.settings.event.name()
        );
        Ok(())
    }

    fn build_passes(&self, composite: CompositeBinding) -> SmallVec<[BlendedPass; 3]> {
        let tag = &self.settings.pass_tag;
        let event = self.settings.event;
        let layer_mask = self.settings.layer_mask;

        let mut passes = SmallVec::new();
        match self.settings.layout {
            PassLayout::Split => {
                passes.push(BlendedPass::DepthCopy(DepthCopyPass::new(
                    format!("{tag}.DepthCopy"),
                    event,
                    self.copy_depth_material,
                )));
                passes.push(BlendedPass::Offscreen(OffscreenRenderPass::new(
                    format!("{tag}.Render"),
                    event,
                    layer_mask,
                )));
                passes.push(BlendedPass::Composite(CompositePass::new(
                    format!("{tag}.Composite"),
                    event,
                    composite,
                )));
            }
            PassLayout::Fused => {
                passes.push(BlendedPass::Combined(CombinedBlendedPass::new(
                    tag.clone(),
                    event,
                    layer_mask,
                    self.copy_depth_material,
                    composite,
                )));
            }
        }
        passes
    }

    /// Sizes the offscreen targets for this camera and sets up the passes.
    ///
    /// Non-game cameras allocate nothing; their passes draw straight into
    /// the camera targets.
    pub fn setup_render_passes(
        &mut self,
        frame: &FrameContext,
        allocator: &mut dyn TargetAllocator,
    ) -> Result<()> {
        if !self.state.is_running() {
            return Err(self.invalid_state("set up render passes"));
        }

        if !frame.is_game_camera() {
            self.setup_passes(PassTargets::NONE);
            return Ok(());
        }

        if let Err(err) = self.reallocate_targets(frame, allocator) {
            self.setup_passes(PassTargets::NONE);
            return Err(err);
        }

        let targets = PassTargets {
            color: self.color_target.as_ref().map(PooledRenderTarget::bound),
            depth: self.depth_target.as_ref().map(PooledRenderTarget::bound),
        };
        self.setup_passes(targets);
        self.state = FeatureState::Active;
        Ok(())
    }

    fn reallocate_targets(
        &mut self,
        frame: &FrameContext,
        allocator: &mut dyn TargetAllocator,
    ) -> Result<()> {
        let Some(pool) = self.pool.as_mut() else {
            return Err(BlendError::InvalidState {
                operation: "reallocate targets",
                state: self.state.name(),
            });
        };

        let camera = &frame.target_descriptor;
        let name = self.settings.target_name();
        let depth_desc = self.settings.depth_descriptor(camera);
        let color_desc = self.settings.color_descriptor(camera);

        pool.reallocate_if_needed(
            allocator,
            &mut self.depth_target,
            &depth_desc,
            &format!("{name}_Depth"),
        )?;
        pool.reallocate_if_needed(
            allocator,
            &mut self.color_target,
            &color_desc,
            &format!("{name}_Color"),
        )?;
        Ok(())
    }

    fn setup_passes(&mut self, targets: PassTargets) {
        for pass in &mut self.passes {
            pass.setup(targets);
        }
    }

    /// Enqueues the passes at the configured event, in dependency order.
    pub fn add_render_passes<'a>(&'a self, queue: &mut PassQueue<'a>) {
        if !self.enabled || !self.state.is_running() {
            return;
        }
        for pass in &self.passes {
            queue.enqueue_at(self.settings.event, pass);
        }
    }

    /// Drops the per-frame target references of every pass.
    ///
    /// A missing command list is a host contract violation.
    pub fn on_camera_cleanup(&mut self, cmd: Option<&mut CommandList>) -> Result<()> {
        let Some(cmd) = cmd else {
            return Err(BlendError::ContractViolation(
                "camera cleanup called without a command list",
            ));
        };
        for pass in &mut self.passes {
            pass.cleanup(Some(&mut *cmd))?;
        }
        Ok(())
    }

    /// Releases the targets and destroys the materials.
    ///
    /// Safe to call any number of times.
    pub fn dispose(&mut self, host: &mut dyn RenderHost) {
        if self.state == FeatureState::Disposed {
            return;
        }

        if let Some(pool) = self.pool.as_mut() {
            pool.release(host, &mut self.color_target);
            pool.release(host, &mut self.depth_target);
        }

        for pass in &mut self.passes {
            match pass {
                BlendedPass::DepthCopy(p) => p.release_material(),
                BlendedPass::Composite(p) => p.release_material(),
                BlendedPass::Combined(p) => p.release_materials(),
                BlendedPass::Offscreen(_) => {}
            }
        }
        if let Some(material) = self.copy_depth_material.take() {
            host.destroy_material(material);
        }
        if let Some(material) = self.composite_material.take() {
            host.destroy_material(material);
        }

        self.passes.clear();
        self.state = FeatureState::Disposed;
        log::debug!("{}: disposed", self.settings.pass_tag);
    }

    fn invalid_state(&self, operation: &'static str) -> BlendError {
        BlendError::InvalidState {
            operation,
            state: self.state.name(),
        }
    }
}

impl Drop for BlendedBufferFeature {
    fn drop(&mut self) {
        if self.color_target.is_some() || self.depth_target.is_some() {
            log::warn!(
                "{}: dropped without dispose, offscreen targets leak on the host",
                self.settings.pass_tag
            );
        }
    }
}
