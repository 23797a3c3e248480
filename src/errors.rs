//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`BlendError`] covers the failure modes that are
//! surfaced to the caller:
//! - Invalid render target descriptors (strict validation only)
//! - Host allocation failures
//! - Contract violations by the host (e.g. a missing command list)
//! - Lifecycle misuse of the feature controller
//!
//! Missing shaders and non-game cameras are **not** errors: they degrade the
//! affected pass to a no-op or take an explicit branch.
//!
//! # Usage
//!
//! All fallible APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, BlendError>`.

use thiserror::Error;

/// The main error type for the blended buffer passes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlendError {
    // ========================================================================
    // Resource Errors
    // ========================================================================
    /// A render target descriptor failed strict validation.
    #[error("Invalid render target descriptor '{name}': {reason}")]
    InvalidDescriptor {
        /// Debug name of the target being allocated
        name: String,
        /// What was wrong with the descriptor
        reason: String,
    },

    /// The host refused to allocate a render target.
    #[error("Render target allocation failed: {0}")]
    Allocation(String),

    // ========================================================================
    // Lifecycle Errors
    // ========================================================================
    /// The host broke the calling contract (e.g. passed no command list).
    #[error("Contract violation: {0}")]
    ContractViolation(&'static str),

    /// A lifecycle method was called in the wrong state.
    #[error("Invalid state: cannot {operation} while {state}")]
    InvalidState {
        /// The rejected operation
        operation: &'static str,
        /// Human-readable name of the current state
        state: &'static str,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// A settings value is outside of its accepted set.
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),
}

/// Alias for `Result<T, BlendError>`.
pub type Result<T> = std::result::Result<T, BlendError>;
