//! Test doubles for the collaborator traits
//!
//! The stub model records every parameter push and motion start into
//! shared state so tests can assert on what one tick produced; the stub
//! backend can be switched into failure modes to exercise the registry's
//! rollback paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use omote_core::{
    AnimationModel, MotionGroup, MotionPriority, OmoteError, OmoteResult, PlatformContext,
    RenderSurface, SessionBackend,
};

/// Everything a stub model observed
#[derive(Debug, Default)]
pub struct StubState {
    /// (id, value, weight) for every `add_parameter`/`set_parameter` call
    pub params: Vec<(String, f32, f32)>,
    pub updates: usize,
    pub last_expression: Option<usize>,
    pub last_expression_id: Option<String>,
    pub started_motions: Vec<(MotionGroup, usize, MotionPriority)>,
}

impl StubState {
    pub fn last_param(&self, id: &str) -> Option<f32> {
        self.params
            .iter()
            .rev()
            .find(|(pid, _, _)| pid == id)
            .map(|(_, v, _)| *v)
    }

    pub fn last_weighted(&self, id: &str) -> Option<(f32, f32)> {
        self.params
            .iter()
            .rev()
            .find(|(pid, _, _)| pid == id)
            .map(|(_, v, w)| (*v, *w))
    }
}

/// Recording animation-model double
pub struct StubModel {
    state: Arc<Mutex<StubState>>,
    expressions: usize,
    hit_areas: Vec<String>,
    motion_counts: HashMap<&'static str, usize>,
    finished: bool,
}

impl Default for StubModel {
    fn default() -> Self {
        StubModel {
            state: Arc::new(Mutex::new(StubState::default())),
            expressions: 0,
            hit_areas: Vec::new(),
            motion_counts: HashMap::new(),
            finished: false,
        }
    }
}

impl StubModel {
    pub fn with_expressions(count: usize) -> Self {
        StubModel {
            expressions: count,
            ..StubModel::default()
        }
    }

    pub fn hit_area(mut self, area: &str) -> Self {
        self.hit_areas.push(area.to_string());
        self
    }

    pub fn motions(mut self, group: MotionGroup, count: usize) -> Self {
        self.motion_counts.insert(group.id(), count);
        self
    }

    pub fn finished(mut self, finished: bool) -> Self {
        self.finished = finished;
        self
    }

    /// Shared recording state for assertions after the model is boxed
    pub fn state(&self) -> Arc<Mutex<StubState>> {
        Arc::clone(&self.state)
    }
}

impl AnimationModel for StubModel {
    fn set_parameter(&mut self, id: &str, value: f32) {
        self.state.lock().params.push((id.to_string(), value, 1.0));
    }

    fn add_parameter(&mut self, id: &str, value: f32, weight: f32) {
        self.state.lock().params.push((id.to_string(), value, weight));
    }

    fn update(&mut self, _dt: f32) {
        self.state.lock().updates += 1;
    }

    fn has_expression(&self, id: &str) -> bool {
        id.strip_prefix("exp_")
            .and_then(|n| n.parse::<usize>().ok())
            .map(|n| n < self.expressions)
            .unwrap_or(false)
    }

    fn expression_count(&self) -> usize {
        self.expressions
    }

    fn set_expression(&mut self, index: usize) {
        if index < self.expressions {
            self.state.lock().last_expression = Some(index);
        }
    }

    fn set_expression_by_id(&mut self, id: &str) {
        if self.has_expression(id) {
            self.state.lock().last_expression_id = Some(id.to_string());
        }
    }

    fn hit_test(&self, area: &str, _x: f32, _y: f32) -> bool {
        self.hit_areas.iter().any(|a| a == area)
    }

    fn motion_count(&self, group: MotionGroup) -> usize {
        self.motion_counts.get(group.id()).copied().unwrap_or(0)
    }

    fn start_motion(
        &mut self,
        group: MotionGroup,
        index: usize,
        priority: MotionPriority,
    ) -> OmoteResult<()> {
        self.state
            .lock()
            .started_motions
            .push((group, index, priority));
        self.finished = false;
        Ok(())
    }

    fn motion_finished(&self) -> bool {
        self.finished
    }
}

/// Recording surface double
#[derive(Debug, Default)]
pub struct StubSurface {
    pub acquired: bool,
    pub resumed: usize,
    pub paused: usize,
    pub fail_acquire: bool,
    pub fail_release: bool,
}

impl RenderSurface for StubSurface {
    fn acquire(&mut self) -> OmoteResult<()> {
        if self.fail_acquire {
            return Err(OmoteError::SurfaceInit("stub acquire failure".to_string()));
        }
        self.acquired = true;
        Ok(())
    }

    fn resize(&mut self, _width: u32, _height: u32) {}

    fn resume(&mut self) {
        self.resumed += 1;
    }

    fn pause(&mut self) {
        self.paused += 1;
    }

    fn release(&mut self) -> OmoteResult<()> {
        if self.fail_release {
            return Err(OmoteError::Teardown("stub release failure".to_string()));
        }
        self.acquired = false;
        Ok(())
    }
}

/// Backend double with switchable failure modes
#[derive(Debug, Default)]
pub struct StubBackend {
    pub fail_model: bool,
    pub fail_surface: bool,
    pub fail_acquire: bool,
    pub fail_release: bool,
    pub models_created: AtomicUsize,
}

impl StubBackend {
    pub fn models_created(&self) -> usize {
        self.models_created.load(Ordering::SeqCst)
    }
}

impl SessionBackend for StubBackend {
    fn create_model(
        &self,
        id: &str,
        _ctx: &PlatformContext,
    ) -> OmoteResult<Box<dyn AnimationModel>> {
        if self.fail_model {
            return Err(OmoteError::ModelInit(format!("stub model failure for {id}")));
        }
        self.models_created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(StubModel::default()))
    }

    fn create_surface(
        &self,
        id: &str,
        _ctx: &PlatformContext,
    ) -> OmoteResult<Box<dyn RenderSurface>> {
        if self.fail_surface {
            return Err(OmoteError::SurfaceInit(format!(
                "stub surface failure for {id}"
            )));
        }
        Ok(Box::new(StubSurface {
            fail_acquire: self.fail_acquire,
            fail_release: self.fail_release,
            ..StubSurface::default()
        }))
    }
}
