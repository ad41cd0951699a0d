//! One avatar session - gesture, lip sync, and per-frame parameter push

use rand::Rng;
use tokio::sync::watch;
use tracing::{debug, warn};

use omote_core::{
    AnimationModel, HitArea, InstanceId, MotionGroup, MotionPriority, RenderSurface,
    PARAM_ANGLE_X, PARAM_ANGLE_Y, PARAM_ANGLE_Z, PARAM_BODY_ANGLE_X, PARAM_EYE_BALL_X,
    PARAM_EYE_BALL_Y, PARAM_MOUTH_OPEN_Y,
};
use omote_envelope::EnvelopeCancel;
use omote_gesture::{GestureDelta, GestureTracker};

use crate::DragEaser;

/// Per-session tuning
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Blend weight for the lip-sync parameter
    pub lip_sync_weight: f32,
    /// Drag easing time constant in seconds
    pub drag_time_constant: f32,
    /// Head angle range driven by the drag position (degrees)
    pub head_angle_gain: f32,
    /// Body lean range driven by the drag position (degrees)
    pub body_angle_gain: f32,
    /// Whether an idle motion is started whenever no motion runs
    pub auto_idle: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            lip_sync_weight: 0.8,
            drag_time_constant: DragEaser::DEFAULT_TIME_CONSTANT,
            head_angle_gain: 30.0,
            body_angle_gain: 10.0,
            auto_idle: true,
        }
    }
}

/// One independently animated avatar instance.
///
/// Owned exclusively by the registry; UI/audio threads reach it through
/// the registry's `with_instance` accessor and the frame loop through
/// `tick_active`.
pub struct AvatarSession {
    id: InstanceId,
    active: bool,
    config: SessionConfig,
    model: Box<dyn AnimationModel>,
    surface: Box<dyn RenderSurface>,
    gesture: GestureTracker,
    drag: DragEaser,
    /// Last-value-wins lip-sync feed; values published between ticks
    /// overwrite each other and only the latest is applied
    lip_sync_rx: Option<watch::Receiver<f32>>,
    lip_sync_value: f32,
    /// Cancellation handle for a paced stream feeding `lip_sync_rx`
    lip_sync_cancel: Option<EnvelopeCancel>,
}

impl AvatarSession {
    pub fn new(
        id: InstanceId,
        model: Box<dyn AnimationModel>,
        surface: Box<dyn RenderSurface>,
        config: SessionConfig,
    ) -> Self {
        let drag = DragEaser::new(config.drag_time_constant);
        AvatarSession {
            id,
            active: false,
            config,
            model,
            surface,
            gesture: GestureTracker::new(),
            drag,
            lip_sync_rx: None,
            lip_sync_value: 0.0,
            lip_sync_cancel: None,
        }
    }

    pub fn id(&self) -> &InstanceId {
        &self.id
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The session's gesture tracker (UI-event thread feeds it)
    pub fn gesture_mut(&mut self) -> &mut GestureTracker {
        &mut self.gesture
    }

    pub fn gesture_delta(&self) -> GestureDelta {
        self.gesture.delta()
    }

    /// Point the face toward a normalized view position ([-1, 1] per axis)
    pub fn set_dragging(&mut self, x: f32, y: f32) {
        self.drag.set_target(x, y);
    }

    /// All pointers lifted: end the gesture and let the face drift back
    /// to center
    pub fn on_touch_end(&mut self) {
        self.gesture.end();
        self.drag.set_target(0.0, 0.0);
    }

    /// Bind a lip-sync feed; replaces (and cancels) any previous feed
    pub fn attach_lip_sync(&mut self, rx: watch::Receiver<f32>) {
        self.detach_lip_sync();
        self.lip_sync_rx = Some(rx);
    }

    /// Bind a paced stream: the feed plus the handle needed to stop the
    /// producer if this session goes away mid-extraction
    pub fn attach_lip_stream(&mut self, rx: watch::Receiver<f32>, cancel: EnvelopeCancel) {
        self.detach_lip_sync();
        self.lip_sync_rx = Some(rx);
        self.lip_sync_cancel = Some(cancel);
    }

    /// Unbind the lip-sync feed, cancel any paced producer, and close
    /// the mouth
    pub fn detach_lip_sync(&mut self) {
        if let Some(cancel) = self.lip_sync_cancel.take() {
            cancel.cancel();
        }
        self.lip_sync_rx = None;
        self.lip_sync_value = 0.0;
    }

    /// Latest lip-sync value applied to the model
    pub fn lip_sync_value(&self) -> f32 {
        self.lip_sync_value
    }

    /// Tap dispatch: head → random expression, body → random tap motion
    pub fn on_tap(&mut self, x: f32, y: f32) {
        if self.model.hit_test(HitArea::Head.id(), x, y) {
            let count = self.model.expression_count();
            if count > 0 {
                let index = rand::thread_rng().gen_range(0..count);
                debug!(id = %self.id, index, "tap on head, setting expression");
                self.model.set_expression(index);
            }
        } else if self.model.hit_test(HitArea::Body.id(), x, y) {
            self.start_random_motion(MotionGroup::TapBody, MotionPriority::Normal);
        }
    }

    /// Activate a named expression; `false` if the model lacks it.
    /// The capability query keeps unknown ids a reported no-op instead
    /// of a silent one.
    pub fn set_expression(&mut self, expression_id: &str) -> bool {
        if !self.model.has_expression(expression_id) {
            debug!(id = %self.id, expression_id, "expression not on model");
            return false;
        }
        self.model.set_expression_by_id(expression_id);
        true
    }

    /// One frame: drain the lip-sync slot, ease the drag point, push the
    /// derived parameters, and advance the model.
    pub fn tick(&mut self, dt: f32) {
        if let Some(rx) = &mut self.lip_sync_rx {
            match rx.has_changed() {
                Ok(true) => self.lip_sync_value = *rx.borrow_and_update(),
                Ok(false) => {}
                Err(_) => {
                    // Producer finished: a value published just before the
                    // sender dropped still wins, then the closed channel
                    // goes away
                    self.lip_sync_value = *rx.borrow_and_update();
                    self.lip_sync_rx = None;
                    self.lip_sync_cancel = None;
                }
            }
        }

        if self.config.auto_idle && self.model.motion_finished() {
            self.start_random_motion(MotionGroup::Idle, MotionPriority::Idle);
        }

        self.drag.update(dt);
        let drag = self.drag.value();
        let head = self.config.head_angle_gain;
        let body = self.config.body_angle_gain;

        // Face, body, and gaze follow the eased drag point
        self.model.add_parameter(PARAM_ANGLE_X, drag.x * head, 1.0);
        self.model.add_parameter(PARAM_ANGLE_Y, drag.y * head, 1.0);
        self.model
            .add_parameter(PARAM_ANGLE_Z, drag.x * drag.y * -head, 1.0);
        self.model.add_parameter(PARAM_BODY_ANGLE_X, drag.x * body, 1.0);
        self.model.add_parameter(PARAM_EYE_BALL_X, drag.x, 1.0);
        self.model.add_parameter(PARAM_EYE_BALL_Y, drag.y, 1.0);

        self.model.add_parameter(
            PARAM_MOUTH_OPEN_Y,
            self.lip_sync_value,
            self.config.lip_sync_weight,
        );

        self.model.update(dt);
    }

    /// Activation hook: mark active and resume presentation
    pub fn resume(&mut self) {
        self.active = true;
        self.surface.resume();
    }

    /// Deactivation hook: mark inactive and pause presentation.
    /// Gesture and lip-sync state survive so reactivation picks up where
    /// the session left off.
    pub fn pause(&mut self) {
        self.active = false;
        self.surface.pause();
    }

    /// Teardown: release the surface. Called by the registry on destroy;
    /// an error here is reported but the session is gone regardless.
    pub(crate) fn release(&mut self) -> omote_core::OmoteResult<()> {
        self.detach_lip_sync();
        self.surface.release()
    }

    fn start_random_motion(&mut self, group: MotionGroup, priority: MotionPriority) {
        let count = self.model.motion_count(group);
        if count == 0 {
            return;
        }
        let index = rand::thread_rng().gen_range(0..count);
        if let Err(e) = self.model.start_motion(group, index, priority) {
            warn!(id = %self.id, group = group.id(), index, error = %e, "motion start failed");
        }
    }
}
