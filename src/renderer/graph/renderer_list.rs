//! Renderer Lists
//!
//! Turns the host's culling results into the ordered list of renderers a
//! pass draws. Filtering and sorting follow the usual forward-renderer rules:
//!
//! ```text
//! CullingResults ──► FilteringSettings (queue range, layer mask)
//!                ──► DrawingSettings   (shader tags, sorting, per-object data)
//!                ──► RendererList
//! ```
//!
//! An empty list is a valid result; the pass then only clears.

use std::cmp::Ordering;
use std::ops::RangeInclusive;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

// ─── Layers ───────────────────────────────────────────────────────────────────

/// 32-bit set of scene layers eligible for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NOTHING: Self = Self(0);
    pub const EVERYTHING: Self = Self(u32::MAX);

    /// Mask selecting a single layer.
    #[must_use]
    pub const fn layer(layer: u8) -> Self {
        if layer < 32 { Self(1 << layer) } else { Self(0) }
    }

    #[must_use]
    pub const fn with_layer(self, layer: u8) -> Self {
        Self(self.0 | Self::layer(layer).0)
    }

    #[inline]
    #[must_use]
    pub const fn contains_layer(self, layer: u8) -> bool {
        layer < 32 && self.0 & (1 << layer) != 0
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

// ─── Render Queues ────────────────────────────────────────────────────────────

/// Inclusive range of render queue values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderQueueRange(pub RangeInclusive<u32>);

impl RenderQueueRange {
    /// Opaque geometry (background, geometry, alpha test).
    pub const OPAQUE: Self = Self(0..=2500);
    /// Alpha-blended geometry (transparent, overlay).
    pub const TRANSPARENT: Self = Self(2501..=5000);
    pub const ALL: Self = Self(0..=5000);

    #[inline]
    #[must_use]
    pub fn contains(&self, queue: u32) -> bool {
        self.0.contains(&queue)
    }
}

/// Commonly used render queue values.
pub mod render_queue {
    pub const BACKGROUND: u32 = 1000;
    pub const GEOMETRY: u32 = 2000;
    pub const ALPHA_TEST: u32 = 2450;
    pub const TRANSPARENT: u32 = 3000;
    pub const OVERLAY: u32 = 4000;
}

// ─── Drawing Settings ─────────────────────────────────────────────────────────

/// Shader pass tag a material must carry to be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderTagId(pub &'static str);

impl ShaderTagId {
    /// Unlit pass present on every default material.
    pub const DEFAULT_UNLIT: Self = Self("DefaultUnlit");
    /// Forward-lit pass.
    pub const FORWARD_LIT: Self = Self("ForwardLit");
}

/// Draw order of the filtered renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortingCriteria {
    /// Keep culling order.
    None,
    /// Render queue ascending, then front-to-back.
    CommonOpaque,
    /// Render queue ascending, then back-to-front.
    #[default]
    CommonTransparent,
}

bitflags! {
    /// Per-object shader data the host uploads for each drawn renderer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PerObjectData: u16 {
        const LIGHTMAPS = 1 << 0;
        const LIGHT_PROBES = 1 << 1;
        const REFLECTION_PROBES = 1 << 2;
        const LIGHT_DATA = 1 << 3;
        const MOTION_VECTORS = 1 << 4;
    }
}

/// How eligible renderers are drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawingSettings {
    pub shader_tags: SmallVec<[ShaderTagId; 2]>,
    pub sorting: SortingCriteria,
    pub per_object_data: PerObjectData,
}

impl DrawingSettings {
    /// Creates settings for the given tags with default per-object data off.
    #[must_use]
    pub fn new(shader_tags: &[ShaderTagId], sorting: SortingCriteria) -> Self {
        Self {
            shader_tags: SmallVec::from_slice(shader_tags),
            sorting,
            per_object_data: PerObjectData::empty(),
        }
    }
}

impl Default for DrawingSettings {
    fn default() -> Self {
        Self {
            shader_tags: smallvec![ShaderTagId::DEFAULT_UNLIT],
            sorting: SortingCriteria::CommonOpaque,
            per_object_data: PerObjectData::empty(),
        }
    }
}

/// Which renderers are eligible at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteringSettings {
    pub queue_range: RenderQueueRange,
    pub layer_mask: LayerMask,
}

impl FilteringSettings {
    #[must_use]
    pub fn new(queue_range: RenderQueueRange, layer_mask: LayerMask) -> Self {
        Self {
            queue_range,
            layer_mask,
        }
    }

    #[inline]
    #[must_use]
    pub fn accepts(&self, renderer: &VisibleRenderer) -> bool {
        self.queue_range.contains(renderer.render_queue)
            && self.layer_mask.contains_layer(renderer.layer)
    }
}

// ─── Culling Results ──────────────────────────────────────────────────────────

/// Host-side identifier of a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RendererId(pub u32);

/// A renderer that survived the host's visibility culling.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleRenderer {
    pub id: RendererId,
    /// Scene layer index (0..32).
    pub layer: u8,
    pub render_queue: u32,
    pub shader_tag: ShaderTagId,
    /// Distance from the camera, used for sorting.
    pub camera_distance: f32,
}

/// Visible renderers for one camera.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CullingResults {
    pub renderers: Vec<VisibleRenderer>,
}

impl CullingResults {
    #[must_use]
    pub fn new(renderers: Vec<VisibleRenderer>) -> Self {
        Self { renderers }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

// ─── Renderer List ────────────────────────────────────────────────────────────

/// Filtered and sorted renderers, ready to be drawn by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RendererList {
    pub renderers: Vec<RendererId>,
    pub per_object_data: PerObjectData,
}

impl RendererList {
    /// Filters `culling` and sorts the survivors.
    ///
    /// Sorting is stable: renderers that compare equal keep culling order.
    #[must_use]
    pub fn build(
        culling: &CullingResults,
        drawing: &DrawingSettings,
        filtering: &FilteringSettings,
    ) -> Self {
        let mut eligible: Vec<&VisibleRenderer> = culling
            .renderers
            .iter()
            .filter(|r| filtering.accepts(r) && drawing.shader_tags.contains(&r.shader_tag))
            .collect();

        match drawing.sorting {
            SortingCriteria::None => {}
            SortingCriteria::CommonOpaque => eligible.sort_by(|a, b| {
                a.render_queue
                    .cmp(&b.render_queue)
                    .then_with(|| a.camera_distance.total_cmp(&b.camera_distance))
            }),
            SortingCriteria::CommonTransparent => {
                eligible.sort_by(|a, b| compare_back_to_front(a, b));
            }
        }

        Self {
            renderers: eligible.into_iter().map(|r| r.id).collect(),
            per_object_data: drawing.per_object_data,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.renderers.len()
    }
}

/// Render queue ascending, then farthest first.
#[must_use]
pub fn compare_back_to_front(a: &VisibleRenderer, b: &VisibleRenderer) -> Ordering {
    a.render_queue
        .cmp(&b.render_queue)
        .then_with(|| b.camera_distance.total_cmp(&a.camera_distance))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer(id: u32, layer: u8, queue: u32, tag: ShaderTagId, dist: f32) -> VisibleRenderer {
        VisibleRenderer {
            id: RendererId(id),
            layer,
            render_queue: queue,
            shader_tag: tag,
            camera_distance: dist,
        }
    }

    fn transparent_settings(mask: LayerMask) -> (DrawingSettings, FilteringSettings) {
        (
            DrawingSettings::new(
                &[ShaderTagId::DEFAULT_UNLIT, ShaderTagId::FORWARD_LIT],
                SortingCriteria::CommonTransparent,
            ),
            FilteringSettings::new(RenderQueueRange::TRANSPARENT, mask),
        )
    }

    #[test]
    fn layer_mask_bits() {
        let mask = LayerMask::layer(3).with_layer(31);
        assert!(mask.contains_layer(3));
        assert!(mask.contains_layer(31));
        assert!(!mask.contains_layer(0));
        assert!(!mask.contains_layer(40));
        assert_eq!(LayerMask::layer(40), LayerMask::NOTHING);
    }

    #[test]
    fn transparent_filter_and_back_to_front_sort() {
        let culling = CullingResults::new(vec![
            renderer(0, 8, render_queue::TRANSPARENT, ShaderTagId::DEFAULT_UNLIT, 2.0),
            renderer(1, 8, render_queue::GEOMETRY, ShaderTagId::DEFAULT_UNLIT, 5.0),
            renderer(2, 8, render_queue::TRANSPARENT, ShaderTagId::FORWARD_LIT, 9.0),
            renderer(3, 0, render_queue::TRANSPARENT, ShaderTagId::DEFAULT_UNLIT, 7.0),
            renderer(4, 8, render_queue::TRANSPARENT, ShaderTagId("Outline"), 1.0),
            renderer(5, 8, render_queue::OVERLAY, ShaderTagId::DEFAULT_UNLIT, 20.0),
        ]);
        let (drawing, filtering) = transparent_settings(LayerMask::layer(8));

        let list = RendererList::build(&culling, &drawing, &filtering);
        assert_eq!(
            list.renderers,
            vec![RendererId(2), RendererId(0), RendererId(5)]
        );
        assert!(list.per_object_data.is_empty());
    }

    #[test]
    fn empty_mask_yields_empty_list() {
        let culling = CullingResults::new(vec![renderer(
            0,
            1,
            render_queue::TRANSPARENT,
            ShaderTagId::DEFAULT_UNLIT,
            1.0,
        )]);
        let (drawing, filtering) = transparent_settings(LayerMask::NOTHING);

        let list = RendererList::build(&culling, &drawing, &filtering);
        assert!(list.is_empty());
    }

    #[test]
    fn equal_keys_keep_culling_order() {
        let culling = CullingResults::new(vec![
            renderer(7, 2, render_queue::TRANSPARENT, ShaderTagId::DEFAULT_UNLIT, 3.0),
            renderer(4, 2, render_queue::TRANSPARENT, ShaderTagId::DEFAULT_UNLIT, 3.0),
        ]);
        let (drawing, filtering) = transparent_settings(LayerMask::EVERYTHING);

        let list = RendererList::build(&culling, &drawing, &filtering);
        assert_eq!(list.renderers, vec![RendererId(7), RendererId(4)]);
    }

    #[test]
    fn back_to_front_comparator() {
        let near = renderer(0, 0, render_queue::TRANSPARENT, ShaderTagId::DEFAULT_UNLIT, 1.0);
        let far = renderer(1, 0, render_queue::TRANSPARENT, ShaderTagId::DEFAULT_UNLIT, 10.0);
        assert_eq!(compare_back_to_front(&far, &near), Ordering::Less);
    }
}
