//! Blended Buffer
//!
//! Downsampled offscreen render passes for transparent effects.
//!
//! Layer-masked transparent objects (particles, VFX) are drawn into a
//! reduced-resolution color target that is depth tested against a copy of
//! the camera depth, then composited back onto the camera target:
//!
//! ```text
//! Camera Depth ──► DepthCopyPass ──► Offscreen Depth ─┐
//!                                                     ├─► OffscreenRenderPass ──► Offscreen Color
//! Culling Results ────────────────────────────────────┘                                 │
//!                                                                                       ▼
//!                                          Camera Color ◄──────────────────────── CompositePass
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut feature = BlendedBufferFeature::new(settings);
//! feature.configure(&mut host)?;
//!
//! // Every camera, every frame
//! feature.setup_render_passes(&frame, &mut host)?;
//! {
//!     let mut queue = PassQueue::new();
//!     feature.add_render_passes(&mut queue);
//!     queue.execute(&frame, &mut host);
//! }
//! feature.on_camera_cleanup(Some(&mut cmd))?;
//!
//! feature.dispose(&mut host);
//! ```

pub mod errors;
pub mod feature;
pub mod renderer;

pub use errors::{BlendError, Result};
pub use feature::{BlendedBufferFeature, FeatureState, PassSettings};
pub use renderer::graph::{CameraType, CommandList, FrameContext, PassQueue, RenderPassEvent};
pub use renderer::host::{RecordingHost, RenderHost};
