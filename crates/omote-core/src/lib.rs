//! Omote Core - Shared types and collaborator contracts
//!
//! This crate holds everything the pipeline crates agree on:
//! - Identity and math primitives (`InstanceId`, `Vec2`)
//! - The error taxonomy (`OmoteError`, `OmoteResult`)
//! - Standard animation parameter and motion constants
//! - The external collaborator traits (`AnimationModel`, `RenderSurface`,
//!   `SessionBackend`)
//!
//! The core never parses model files, opens audio devices, or touches the
//! GPU. Those capabilities live behind the traits defined here and are
//! supplied by the embedding application.

pub mod error;
pub mod id;
pub mod math;
pub mod model;
pub mod params;

pub use error::*;
pub use id::*;
pub use math::*;
pub use model::*;
pub use params::*;
