//! Pass Scheduling
//!
//! Provides:
//! - RenderPassEvent: ordered insertion points of a frame
//! - RenderPass: setup / execute / cleanup pass interface
//! - PassQueue: per-frame ordered pass list
//! - CommandList/RenderCommand: recorded command sequences
//! - RendererList: filtered and sorted draw lists
//! - FrameContext: per-camera frame data supplied by the host
//! - passes: the blended buffer passes

pub mod command;
pub mod context;
pub mod node;
pub mod passes;
pub mod queue;
pub mod renderer_list;
pub mod stage;

pub use command::{BlitCommand, ClearFlags, CommandList, LoadAction, RenderCommand, StoreAction};
pub use context::{CameraType, FrameContext};
pub use node::{BoundTarget, PassTargets, RenderPass};
pub use passes::{
    BlendedPass, CombinedBlendedPass, CompositeBinding, CompositePass, DepthCopyPass,
    OffscreenRenderPass,
};
pub use queue::PassQueue;
pub use renderer_list::{
    CullingResults, DrawingSettings, FilteringSettings, LayerMask, PerObjectData,
    RenderQueueRange, RendererId, RendererList, ShaderTagId, SortingCriteria, VisibleRenderer,
};
pub use stage::RenderPassEvent;
