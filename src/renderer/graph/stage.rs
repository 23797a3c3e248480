//! Render Pass Event Definitions
//!
//! `RenderPassEvent` defines the fixed insertion points of a frame, allowing
//! passes to be scheduled relative to the host's built-in rendering steps.

use serde::{Deserialize, Serialize};

/// Render pass event enumeration.
///
/// Defines the execution order of a frame. Each event may contain multiple
/// passes; passes within the same event execute in enqueue order.
///
/// # Event Overview
///
/// | Event | Runs |
/// |-------|------|
/// | `BeforeRendering` | before anything else in the camera frame |
/// | `*Shadows` | around shadow map rendering |
/// | `*PrePasses` | around depth / depth-normal prepasses |
/// | `*Opaques` | around opaque geometry |
/// | `*Skybox` | around the skybox (`AfterRenderingSkybox` is the default) |
/// | `*Transparents` | around alpha-blended geometry |
/// | `*PostProcessing` | around the post-processing chain |
/// | `AfterRendering` | after everything, before presentation |
///
/// # Example
///
/// ```ignore
/// // Render VFX into the blended buffer once the skybox is in place
/// queue.enqueue_at(RenderPassEvent::AfterRenderingSkybox, &offscreen_pass);
/// ```
#[derive(
    Debug, Hash, PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[repr(u16)]
pub enum RenderPassEvent {
    BeforeRendering = 0,
    BeforeRenderingShadows = 50,
    AfterRenderingShadows = 100,
    BeforeRenderingPrePasses = 150,
    AfterRenderingPrePasses = 200,
    BeforeRenderingOpaques = 250,
    AfterRenderingOpaques = 300,
    BeforeRenderingSkybox = 350,
    /// Default insertion point of the blended buffer.
    #[default]
    AfterRenderingSkybox = 400,
    BeforeRenderingTransparents = 450,
    AfterRenderingTransparents = 500,
    BeforeRenderingPostProcessing = 550,
    AfterRenderingPostProcessing = 600,
    AfterRendering = 1000,
}

impl RenderPassEvent {
    /// Returns the numeric value of the event (used for sorting).
    #[inline]
    #[must_use]
    pub const fn order(self) -> u16 {
        self as u16
    }

    /// Event name (for debugging).
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BeforeRendering => "BeforeRendering",
            Self::BeforeRenderingShadows => "BeforeRenderingShadows",
            Self::AfterRenderingShadows => "AfterRenderingShadows",
            Self::BeforeRenderingPrePasses => "BeforeRenderingPrePasses",
            Self::AfterRenderingPrePasses => "AfterRenderingPrePasses",
            Self::BeforeRenderingOpaques => "BeforeRenderingOpaques",
            Self::AfterRenderingOpaques => "AfterRenderingOpaques",
            Self::BeforeRenderingSkybox => "BeforeRenderingSkybox",
            Self::AfterRenderingSkybox => "AfterRenderingSkybox",
            Self::BeforeRenderingTransparents => "BeforeRenderingTransparents",
            Self::AfterRenderingTransparents => "AfterRenderingTransparents",
            Self::BeforeRenderingPostProcessing => "BeforeRenderingPostProcessing",
            Self::AfterRenderingPostProcessing => "AfterRenderingPostProcessing",
            Self::AfterRendering => "AfterRendering",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_ordering() {
        assert!(RenderPassEvent::BeforeRendering < RenderPassEvent::AfterRenderingShadows);
        assert!(RenderPassEvent::AfterRenderingOpaques < RenderPassEvent::BeforeRenderingSkybox);
        assert!(RenderPassEvent::AfterRenderingSkybox < RenderPassEvent::BeforeRenderingTransparents);
        assert!(
            RenderPassEvent::AfterRenderingTransparents
                < RenderPassEvent::BeforeRenderingPostProcessing
        );
        assert!(RenderPassEvent::AfterRenderingPostProcessing < RenderPassEvent::AfterRendering);
        assert_eq!(RenderPassEvent::default(), RenderPassEvent::AfterRenderingSkybox);
    }
}
