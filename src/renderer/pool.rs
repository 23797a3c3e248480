//! Render Target Pool
//!
//! Keeps the blended buffer's color and depth targets alive across frames
//! and only touches the host allocator when the requested descriptor changes.
//!
//! # Reallocate-If-Needed
//!
//! ```text
//! requested desc ──► sanitize ──► == stored desc? ──yes──► keep handle
//!                                      │
//!                                      no
//!                                      ▼
//!                        release old ──► create new ──► store
//! ```
//!
//! # Sanitizing
//!
//! | Problem                          | `Strict`           | `Clamp` (default)        |
//! |----------------------------------|--------------------|--------------------------|
//! | zero width / height              | error              | raised to 1              |
//! | no color and no depth            | error              | `Rgba8Unorm` color       |
//! | larger than the host maximum     | error              | clamped to the maximum   |
//! | unsupported sample count         | error              | 1 sample                 |
//! | unsupported depth+stencil format | fallback           | fallback                 |
//!
//! Every recovered problem is logged once per target name, not every frame.

use rustc_hash::FxHashSet;

use crate::errors::{BlendError, Result};
use crate::renderer::descriptor::{ColorFormat, DepthFormat, RenderTargetDescriptor};
use crate::renderer::graph::node::BoundTarget;
use crate::renderer::host::{HostCapabilities, TargetAllocator, TextureHandle};

// ─── Public Types ─────────────────────────────────────────────────────────────

/// How the pool reacts to descriptors that cannot be allocated as requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DescriptorPolicy {
    /// Reject the descriptor with [`BlendError::InvalidDescriptor`].
    Strict,
    /// Repair the descriptor and log a warning once.
    #[default]
    Clamp,
}

/// A render target owned by the pool's caller.
///
/// Passes never hold this type; they receive a [`BoundTarget`] copy that is
/// only valid for the current frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PooledRenderTarget {
    handle: TextureHandle,
    descriptor: RenderTargetDescriptor,
    name: String,
}

impl PooledRenderTarget {
    #[inline]
    #[must_use]
    pub fn handle(&self) -> TextureHandle {
        self.handle
    }

    /// Descriptor the backing allocation was created from (post-sanitize).
    #[inline]
    #[must_use]
    pub fn descriptor(&self) -> &RenderTargetDescriptor {
        &self.descriptor
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Non-owning per-frame reference for passes.
    #[inline]
    #[must_use]
    pub fn bound(&self) -> BoundTarget {
        BoundTarget {
            handle: self.handle,
            descriptor: self.descriptor,
        }
    }
}

/// Allocation counters, mainly for diagnostics and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Targets created through the host.
    pub allocations: u32,
    /// Targets released through the host.
    pub releases: u32,
    /// Reallocation requests served by the existing target.
    pub reuses: u32,
}

// ─── Internal Types ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Diagnostic {
    ZeroSize,
    Empty,
    Oversized,
    SampleCount(u32),
    DepthFallback(DepthFormat),
}

// ─── Pool Implementation ──────────────────────────────────────────────────────

/// Reallocate-if-needed pool for long-lived offscreen targets.
///
/// The pool does not own the targets: the caller keeps them in
/// `Option<PooledRenderTarget>` slots and passes those in. The pool caches
/// the host capabilities queried at configuration time.
pub struct ResourcePool {
    capabilities: HostCapabilities,
    policy: DescriptorPolicy,
    /// (target name, problem) pairs that were already logged.
    reported: FxHashSet<(String, Diagnostic)>,
    stats: PoolStats,
}

impl ResourcePool {
    #[must_use]
    pub fn new(capabilities: HostCapabilities, policy: DescriptorPolicy) -> Self {
        Self {
            capabilities,
            policy,
            reported: FxHashSet::default(),
            stats: PoolStats::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn capabilities(&self) -> HostCapabilities {
        self.capabilities
    }

    #[inline]
    #[must_use]
    pub fn policy(&self) -> DescriptorPolicy {
        self.policy
    }

    #[inline]
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Makes sure `slot` holds a target matching `desc`.
    ///
    /// Returns `Ok(true)` if a new allocation was made and `Ok(false)` if the
    /// existing target was kept. If the host fails to create the new target,
    /// the slot is left empty (the old target has already been released).
    pub fn reallocate_if_needed(
        &mut self,
        allocator: &mut dyn TargetAllocator,
        slot: &mut Option<PooledRenderTarget>,
        desc: &RenderTargetDescriptor,
        name: &str,
    ) -> Result<bool> {
        let desc = self.sanitize(desc, name)?;

        if let Some(existing) = slot.as_ref()
            && existing.descriptor == desc
        {
            self.stats.reuses += 1;
            return Ok(false);
        }

        self.release(allocator, slot);

        let handle = allocator.create_target(&desc, name)?;
        self.stats.allocations += 1;
        log::debug!(
            "Allocated render target '{}' {}x{} {:?}/{:?} x{}",
            name,
            desc.width,
            desc.height,
            desc.color_format,
            desc.depth_format,
            desc.sample_count
        );

        *slot = Some(PooledRenderTarget {
            handle,
            descriptor: desc,
            name: name.to_owned(),
        });
        Ok(true)
    }

    /// Releases the target in `slot`, if any, and empties the slot.
    ///
    /// Returns `true` if something was released. Safe to call repeatedly.
    pub fn release(
        &mut self,
        allocator: &mut dyn TargetAllocator,
        slot: &mut Option<PooledRenderTarget>,
    ) -> bool {
        let Some(target) = slot.take() else {
            return false;
        };
        allocator.release_target(target.handle);
        self.stats.releases += 1;
        log::debug!("Released render target '{}'", target.name);
        true
    }

    /// Applies the descriptor policy and the host capabilities to `desc`.
    pub fn sanitize(
        &mut self,
        desc: &RenderTargetDescriptor,
        name: &str,
    ) -> Result<RenderTargetDescriptor> {
        let mut out = *desc;

        if out.width == 0 || out.height == 0 {
            self.invalid(
                name,
                Diagnostic::ZeroSize,
                format!("non-positive size {}x{}", out.width, out.height),
            )?;
            out.width = out.width.max(1);
            out.height = out.height.max(1);
        }

        if out.is_empty() {
            self.invalid(name, Diagnostic::Empty, "no color or depth format".to_owned())?;
            out.color_format = ColorFormat::Rgba8Unorm;
        }

        let max = self.capabilities.max_target_dimension;
        if out.width > max || out.height > max {
            self.invalid(
                name,
                Diagnostic::Oversized,
                format!("size {}x{} exceeds the host maximum {max}", out.width, out.height),
            )?;
            out.width = out.width.min(max);
            out.height = out.height.min(max);
        }

        let samples = out.sample_count;
        if !samples.is_power_of_two() || samples > self.capabilities.max_sample_count.max(1) {
            self.invalid(
                name,
                Diagnostic::SampleCount(samples),
                format!("unsupported sample count {samples}"),
            )?;
            out.sample_count = 1;
        }

        let depth = self.supported_depth_format(out.depth_format);
        if depth != out.depth_format {
            self.warn_once(
                name,
                Diagnostic::DepthFallback(out.depth_format),
                &format!("{:?} unsupported, falling back to {depth:?}", out.depth_format),
            );
            out.depth_format = depth;
        }

        Ok(out)
    }

    /// Picks the closest depth format the host can create.
    #[must_use]
    pub fn supported_depth_format(&self, format: DepthFormat) -> DepthFormat {
        let caps = &self.capabilities;
        if caps.supports_depth(format) {
            return format;
        }
        match format {
            DepthFormat::Depth32Stencil8 if caps.depth24_stencil8 => DepthFormat::Depth24Stencil8,
            DepthFormat::Depth32Stencil8 => DepthFormat::Depth32,
            DepthFormat::Depth24Stencil8 if caps.depth32_stencil8 => DepthFormat::Depth32Stencil8,
            DepthFormat::Depth24Stencil8 => DepthFormat::Depth24,
            other => other,
        }
    }

    /// Fails under `Strict`, warns once under `Clamp`.
    fn invalid(&mut self, name: &str, diagnostic: Diagnostic, reason: String) -> Result<()> {
        match self.policy {
            DescriptorPolicy::Strict => Err(BlendError::InvalidDescriptor {
                name: name.to_owned(),
                reason,
            }),
            DescriptorPolicy::Clamp => {
                self.warn_once(name, diagnostic, &reason);
                Ok(())
            }
        }
    }

    fn warn_once(&mut self, name: &str, diagnostic: Diagnostic, message: &str) {
        if self.reported.insert((name.to_owned(), diagnostic)) {
            log::warn!("Render target '{name}': {message}");
        }
    }
}
