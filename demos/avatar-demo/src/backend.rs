//! Console-backed collaborator implementations
//!
//! Stands in for the real renderer: the model records the latest value of
//! every parameter pushed to it, and lifecycle hooks log instead of
//! touching a GPU surface.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use omote_core::{
    AnimationModel, MotionGroup, MotionPriority, OmoteResult, PlatformContext, RenderSurface,
    SessionBackend,
};

type ParamStore = Arc<Mutex<HashMap<String, f32>>>;

/// Animation model that records parameter pushes
pub struct ConsoleModel {
    params: ParamStore,
    motion_running: bool,
}

impl AnimationModel for ConsoleModel {
    fn set_parameter(&mut self, id: &str, value: f32) {
        if let Ok(mut params) = self.params.lock() {
            params.insert(id.to_string(), value);
        }
    }

    fn add_parameter(&mut self, id: &str, value: f32, weight: f32) {
        if let Ok(mut params) = self.params.lock() {
            params.insert(id.to_string(), value * weight);
        }
    }

    fn update(&mut self, _dt: f32) {}

    fn has_expression(&self, _id: &str) -> bool {
        false
    }

    fn expression_count(&self) -> usize {
        0
    }

    fn set_expression(&mut self, _index: usize) {}

    fn set_expression_by_id(&mut self, _id: &str) {}

    fn hit_test(&self, _area: &str, _x: f32, _y: f32) -> bool {
        false
    }

    fn motion_count(&self, group: MotionGroup) -> usize {
        match group {
            MotionGroup::Idle => 1,
            MotionGroup::TapBody => 0,
        }
    }

    fn start_motion(
        &mut self,
        group: MotionGroup,
        index: usize,
        _priority: MotionPriority,
    ) -> OmoteResult<()> {
        debug!(group = group.id(), index, "motion started");
        self.motion_running = true;
        Ok(())
    }

    fn motion_finished(&self) -> bool {
        !self.motion_running
    }
}

/// Surface that logs its lifecycle
pub struct ConsoleSurface {
    id: String,
}

impl RenderSurface for ConsoleSurface {
    fn acquire(&mut self) -> OmoteResult<()> {
        info!(id = %self.id, "surface acquired");
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        debug!(id = %self.id, width, height, "surface resized");
    }

    fn resume(&mut self) {
        info!(id = %self.id, "surface resumed");
    }

    fn pause(&mut self) {
        info!(id = %self.id, "surface paused");
    }

    fn release(&mut self) -> OmoteResult<()> {
        info!(id = %self.id, "surface released");
        Ok(())
    }
}

/// Backend handing out console models; keeps the parameter store so the
/// demo can observe what the session pushed each frame
#[derive(Default)]
pub struct ConsoleBackend {
    params: ParamStore,
}

impl ConsoleBackend {
    /// Latest value pushed for a parameter, across all models
    pub fn last_value(&self, id: &str) -> Option<f32> {
        self.params.lock().ok().and_then(|p| p.get(id).copied())
    }
}

impl SessionBackend for ConsoleBackend {
    fn create_model(
        &self,
        id: &str,
        _ctx: &PlatformContext,
    ) -> OmoteResult<Box<dyn AnimationModel>> {
        info!(id, "model created");
        Ok(Box::new(ConsoleModel {
            params: Arc::clone(&self.params),
            motion_running: false,
        }))
    }

    fn create_surface(
        &self,
        id: &str,
        _ctx: &PlatformContext,
    ) -> OmoteResult<Box<dyn RenderSurface>> {
        Ok(Box::new(ConsoleSurface { id: id.to_string() }))
    }
}
