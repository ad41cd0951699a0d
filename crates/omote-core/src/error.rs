//! Error types for the Omote pipeline

use thiserror::Error;

/// Core Omote errors
#[derive(Error, Debug)]
pub enum OmoteError {
    // Argument errors
    #[error("Invalid instance id: {0:?}")]
    InvalidInstanceId(String),

    #[error("Invalid platform context: {0}")]
    InvalidPlatformContext(String),

    #[error("Invalid audio format: {0}")]
    InvalidAudioFormat(String),

    // Lifecycle errors
    #[error("Instance not found: {0}")]
    InstanceNotFound(String),

    #[error("Model initialization failed: {0}")]
    ModelInit(String),

    #[error("Surface initialization failed: {0}")]
    SurfaceInit(String),

    #[error("Teardown failed: {0}")]
    Teardown(String),

    // Animation errors
    #[error("Unknown motion group: {0}")]
    UnknownMotionGroup(String),

    #[error("Motion rejected: priority {0} too low")]
    MotionRejected(i32),
}

/// Result type for Omote operations
pub type OmoteResult<T> = Result<T, OmoteError>;
