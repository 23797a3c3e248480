//! Blended Buffer Feature
//!
//! Provides:
//! - PassSettings: serde-loadable configuration
//! - BlendedBufferFeature: lifecycle controller owning targets and passes

pub mod controller;
pub mod settings;

pub use controller::{BlendedBufferFeature, FeatureState, REQUIREMENTS};
pub use settings::{
    ColorPrecision, CompositeMaterial, DEFAULT_TARGET_NAME, DownSampling, PassLayout,
    PassSettings, TargetResolution,
};
