//! Collaborator contracts - the surface between the pipeline and the
//! embedding application
//!
//! The pipeline never loads model files or owns GPU state. It drives an
//! already-loaded model through `AnimationModel` and a caller-managed
//! surface through `RenderSurface`; `SessionBackend` is the factory the
//! registry uses to obtain both when a session is created.

use crate::{MotionGroup, MotionPriority, OmoteError, OmoteResult};

/// Handle to one loaded, renderable avatar model.
///
/// Capability queries (`has_expression`, `hit_test`) are explicit methods
/// rather than any form of runtime introspection; a model that lacks a
/// capability answers `false` and the caller degrades gracefully.
pub trait AnimationModel: Send {
    /// Overwrite a parameter for the current frame
    fn set_parameter(&mut self, id: &str, value: f32);

    /// Add to a parameter with a blend weight (1.0 = full effect)
    fn add_parameter(&mut self, id: &str, value: f32, weight: f32);

    /// Advance the model's internal animation state by `dt` seconds
    fn update(&mut self, dt: f32);

    /// Whether the model defines the given expression id
    fn has_expression(&self, id: &str) -> bool;

    /// Number of expressions the model carries (0 if none)
    fn expression_count(&self) -> usize;

    /// Activate the expression at `index`; out-of-range is a no-op
    fn set_expression(&mut self, index: usize);

    /// Activate the expression with the given id; unknown ids are a
    /// no-op (pair with `has_expression` to report failure)
    fn set_expression_by_id(&mut self, id: &str);

    /// Whether the point (in logical view coordinates) falls inside the
    /// named hit area
    fn hit_test(&self, area: &str, x: f32, y: f32) -> bool;

    /// Number of motions in the given group (0 if the group is absent)
    fn motion_count(&self, group: MotionGroup) -> usize;

    /// Start the motion at `index` in `group` with the given priority
    fn start_motion(
        &mut self,
        group: MotionGroup,
        index: usize,
        priority: MotionPriority,
    ) -> OmoteResult<()>;

    /// Whether the current motion (if any) has finished
    fn motion_finished(&self) -> bool;
}

/// Handle to one rendering surface.
///
/// Creation/resize/frame callbacks are driven by the external frame loop;
/// the pipeline only resumes, pauses, and releases the surface across
/// session lifecycle transitions.
pub trait RenderSurface: Send {
    /// Acquire the underlying platform surface
    fn acquire(&mut self) -> OmoteResult<()>;

    /// Propagate a viewport resize
    fn resize(&mut self, width: u32, height: u32);

    /// Resume presentation (session activated)
    fn resume(&mut self);

    /// Pause presentation (session deactivated)
    fn pause(&mut self);

    /// Release the underlying platform surface
    fn release(&mut self) -> OmoteResult<()>;
}

/// Platform binding supplied by the caller when creating a session
#[derive(Debug, Clone)]
pub struct PlatformContext {
    /// Surface extent in physical pixels
    pub surface_width: u32,
    pub surface_height: u32,
    /// Display density (logical → physical scale)
    pub density: f32,
}

impl PlatformContext {
    pub fn new(surface_width: u32, surface_height: u32, density: f32) -> Self {
        PlatformContext {
            surface_width,
            surface_height,
            density,
        }
    }

    /// A context is usable only with a non-degenerate surface extent and
    /// positive density
    pub fn validate(&self) -> OmoteResult<()> {
        if self.surface_width == 0 || self.surface_height == 0 {
            return Err(OmoteError::InvalidPlatformContext(format!(
                "degenerate surface extent {}x{}",
                self.surface_width, self.surface_height
            )));
        }
        if !(self.density.is_finite() && self.density > 0.0) {
            return Err(OmoteError::InvalidPlatformContext(format!(
                "invalid density {}",
                self.density
            )));
        }
        Ok(())
    }
}

/// Factory contract for session construction.
///
/// The registry holds the factory across the lifetime of the process and
/// calls it once per `create_instance`. A factory error aborts creation
/// and leaves the registry untouched.
pub trait SessionBackend: Send + Sync {
    /// Construct the animation-model handle for a new session
    fn create_model(
        &self,
        id: &str,
        ctx: &PlatformContext,
    ) -> OmoteResult<Box<dyn AnimationModel>>;

    /// Construct the rendering surface for a new session
    fn create_surface(
        &self,
        id: &str,
        ctx: &PlatformContext,
    ) -> OmoteResult<Box<dyn RenderSurface>>;
}
