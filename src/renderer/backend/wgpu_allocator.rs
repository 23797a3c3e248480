//! wgpu Target Allocator
//!
//! [`TargetAllocator`] implementation that backs pooled render targets with
//! real `wgpu::Texture`s. A descriptor with both a color and a depth format
//! produces two textures sharing one handle.
//!
//! Capabilities are read once from the device features and limits, so
//! depth/stencil fallbacks are decided at runtime instead of per platform.

use slotmap::SlotMap;

use crate::errors::{BlendError, Result};
use crate::renderer::descriptor::RenderTargetDescriptor;
use crate::renderer::host::{HostCapabilities, TargetAllocator, TextureHandle};

/// Derives allocator capabilities from device features and limits.
#[must_use]
pub fn device_capabilities(features: wgpu::Features, limits: &wgpu::Limits) -> HostCapabilities {
    HostCapabilities {
        depth32_stencil8: features.contains(wgpu::Features::DEPTH32FLOAT_STENCIL8),
        depth24_stencil8: true,
        max_target_dimension: limits.max_texture_dimension_2d,
        // 1 and 4 are the only counts WebGPU guarantees for every format
        max_sample_count: 4,
    }
}

/// Rejects descriptors the device cannot back with textures.
fn check_allocatable(
    desc: &RenderTargetDescriptor,
    name: &str,
    capabilities: &HostCapabilities,
) -> Result<()> {
    let depth_format = desc.depth_format.wgpu_format();
    if desc.color_format.wgpu_format().is_none() && depth_format.is_none() {
        return Err(BlendError::Allocation(format!(
            "'{name}' has neither a color nor a depth format"
        )));
    }
    if depth_format == Some(wgpu::TextureFormat::Depth32FloatStencil8)
        && !capabilities.depth32_stencil8
    {
        return Err(BlendError::Allocation(format!(
            "'{name}' requests Depth32FloatStencil8 which the device does not support"
        )));
    }
    Ok(())
}

/// GPU resources behind one [`TextureHandle`].
pub struct WgpuTarget {
    pub descriptor: RenderTargetDescriptor,
    pub color: Option<(wgpu::Texture, wgpu::TextureView)>,
    pub depth: Option<(wgpu::Texture, wgpu::TextureView)>,
    /// Sampler matching the descriptor's wrap and filter modes.
    pub sampler: wgpu::Sampler,
}

/// Render target allocator backed by a `wgpu::Device`.
pub struct WgpuTargetAllocator {
    device: wgpu::Device,
    capabilities: HostCapabilities,
    targets: SlotMap<TextureHandle, WgpuTarget>,
}

impl WgpuTargetAllocator {
    /// Creates an allocator and queries the device capabilities.
    #[must_use]
    pub fn new(device: &wgpu::Device) -> Self {
        let capabilities = device_capabilities(device.features(), &device.limits());
        log::debug!("wgpu target allocator capabilities: {capabilities:?}");

        Self {
            device: device.clone(),
            capabilities,
            targets: SlotMap::with_key(),
        }
    }

    #[must_use]
    pub fn get(&self, handle: TextureHandle) -> Option<&WgpuTarget> {
        self.targets.get(handle)
    }

    #[must_use]
    pub fn color_view(&self, handle: TextureHandle) -> Option<&wgpu::TextureView> {
        self.targets
            .get(handle)
            .and_then(|t| t.color.as_ref())
            .map(|(_, view)| view)
    }

    #[must_use]
    pub fn depth_view(&self, handle: TextureHandle) -> Option<&wgpu::TextureView> {
        self.targets
            .get(handle)
            .and_then(|t| t.depth.as_ref())
            .map(|(_, view)| view)
    }

    #[inline]
    #[must_use]
    pub fn live_targets(&self) -> usize {
        self.targets.len()
    }

    fn create_texture(
        &self,
        desc: &RenderTargetDescriptor,
        format: wgpu::TextureFormat,
        label: &str,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        let mut usage = wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING;
        if !format.is_depth_stencil_format() {
            usage |= wgpu::TextureUsages::COPY_SRC;
        }

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: desc.width,
                height: desc.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: desc.sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (texture, view)
    }
}

impl TargetAllocator for WgpuTargetAllocator {
    fn capabilities(&self) -> HostCapabilities {
        self.capabilities
    }

    fn create_target(
        &mut self,
        desc: &RenderTargetDescriptor,
        name: &str,
    ) -> Result<TextureHandle> {
        check_allocatable(desc, name, &self.capabilities)?;
        let color_format = desc.color_format.wgpu_format();
        let depth_format = desc.depth_format.wgpu_format();

        let color = color_format.map(|f| self.create_texture(desc, f, name));
        let depth = depth_format.map(|f| self.create_texture(desc, f, &format!("{name}_Depth")));

        let address_mode = desc.wrap_mode.wgpu_address_mode();
        let filter = desc.filter_mode.wgpu_filter_mode();
        let sampler = self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(name),
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            address_mode_w: address_mode,
            mag_filter: filter,
            min_filter: filter,
            ..Default::default()
        });

        Ok(self.targets.insert(WgpuTarget {
            descriptor: *desc,
            color,
            depth,
            sampler,
        }))
    }

    fn release_target(&mut self, handle: TextureHandle) {
        let Some(target) = self.targets.remove(handle) else {
            log::warn!("WgpuTargetAllocator: release of unknown target {handle:?}");
            return;
        };
        if let Some((texture, _)) = target.color {
            texture.destroy();
        }
        if let Some((texture, _)) = target.depth {
            texture.destroy();
        }
    }
}
