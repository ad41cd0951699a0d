//! Touch tracking state machine

use omote_core::Vec2;

/// Current touch phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TouchState {
    /// No pointer down
    #[default]
    None,
    /// One pointer down - drag/pan territory
    Single,
    /// Two pointers down - pinch territory
    Multi,
}

/// Tracker tuning knobs
#[derive(Debug, Clone)]
pub struct GestureConfig {
    /// Displacement from the start point (per axis, logical units) before
    /// a single-pointer move counts as dragging
    pub drag_threshold: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig {
            drag_threshold: 10.0,
        }
    }
}

/// Derived output of the tracker for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureDelta {
    /// Pointer movement since the previous move sample
    pub dx: f32,
    pub dy: f32,
    /// Ratio of current to previous pinch distance; `1.0` outside a pinch
    /// or when either recorded distance is zero
    pub scale: f32,
}

impl GestureDelta {
    pub const IDENTITY: GestureDelta = GestureDelta {
        dx: 0.0,
        dy: 0.0,
        scale: 1.0,
    };
}

/// Multi-touch gesture tracker.
///
/// One tracker per avatar session; `begin`/`move_to`/`end` are fed from
/// the UI-event thread and `delta()` is read from the frame tick.
#[derive(Debug, Default)]
pub struct GestureTracker {
    config: GestureConfig,
    state: TouchState,
    /// Where the current gesture started (Single)
    start: Vec2,
    /// Latest and next-to-latest pointer positions (Single)
    current: Vec2,
    previous: Vec2,
    /// Latest and next-to-latest two-pointer distances (Multi)
    last_pinch: f32,
    previous_pinch: f32,
    dragging: bool,
}

impl GestureTracker {
    pub fn new() -> Self {
        GestureTracker::default()
    }

    pub fn with_config(config: GestureConfig) -> Self {
        GestureTracker {
            config,
            ..GestureTracker::default()
        }
    }

    /// Pointer(s) down. One point enters `Single`; two points enter
    /// `Multi` and record the initial pinch distance.
    pub fn begin(&mut self, p1: Vec2, p2: Option<Vec2>) {
        match p2 {
            None => {
                self.state = TouchState::Single;
                self.start = p1;
                self.current = p1;
                self.previous = p1;
                self.dragging = false;
            }
            Some(p2) => {
                self.state = TouchState::Multi;
                let d = p1.distance(p2);
                self.last_pinch = d;
                self.previous_pinch = d;
                self.dragging = false;
            }
        }
    }

    /// Pointer(s) moved. A sample whose pointer arity differs from the
    /// current state re-begins the gesture with the new arity; there is
    /// no silent `Single ↔ Multi` edge.
    pub fn move_to(&mut self, p1: Vec2, p2: Option<Vec2>) {
        match (self.state, p2) {
            (TouchState::Single, None) => {
                self.previous = self.current;
                self.current = p1;
                if !self.dragging {
                    let dx = (self.current.x - self.start.x).abs();
                    let dy = (self.current.y - self.start.y).abs();
                    if dx > self.config.drag_threshold || dy > self.config.drag_threshold {
                        self.dragging = true;
                    }
                }
            }
            (TouchState::Multi, Some(p2)) => {
                self.previous_pinch = self.last_pinch;
                self.last_pinch = p1.distance(p2);
            }
            (TouchState::None, _) | (TouchState::Single, Some(_)) | (TouchState::Multi, None) => {
                self.begin(p1, p2);
            }
        }
    }

    /// All pointers up. Idempotent.
    pub fn end(&mut self) {
        self.state = TouchState::None;
        self.dragging = false;
        self.previous = self.current;
        self.last_pinch = 0.0;
        self.previous_pinch = 0.0;
    }

    /// Movement and scale since the previous move sample
    pub fn delta(&self) -> GestureDelta {
        GestureDelta {
            dx: self.current.x - self.previous.x,
            dy: self.current.y - self.previous.y,
            scale: self.scale(),
        }
    }

    /// Pinch scale ratio; `1.0` whenever either recorded distance is zero
    pub fn scale(&self) -> f32 {
        if self.last_pinch == 0.0 || self.previous_pinch == 0.0 {
            1.0
        } else {
            self.last_pinch / self.previous_pinch
        }
    }

    /// Distance from the gesture's start point to the latest sample
    pub fn flick_distance(&self) -> f32 {
        self.start.distance(self.current)
    }

    pub fn state(&self) -> TouchState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }

    pub fn current(&self) -> Vec2 {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_begin_single() {
        let mut t = GestureTracker::new();
        t.begin(Vec2::new(5.0, 6.0), None);

        assert_eq!(t.state(), TouchState::Single);
        assert_eq!(t.start(), Vec2::new(5.0, 6.0));
        assert_eq!(t.current(), Vec2::new(5.0, 6.0));
        assert!(!t.is_dragging());
        assert_eq!(t.delta(), GestureDelta::IDENTITY);
    }

    #[test]
    fn test_drag_threshold_engages() {
        let mut t = GestureTracker::new();
        t.begin(Vec2::new(100.0, 100.0), None);
        t.move_to(Vec2::new(111.0, 100.0), None);

        assert!(t.is_dragging());
        let d = t.delta();
        assert_eq!(d.dx, 11.0);
        assert_eq!(d.dy, 0.0);
    }

    #[test]
    fn test_drag_threshold_holds_below() {
        let mut t = GestureTracker::new();
        t.begin(Vec2::new(100.0, 100.0), None);
        t.move_to(Vec2::new(105.0, 100.0), None);

        assert!(!t.is_dragging());
    }

    #[test]
    fn test_dragging_latches_until_end() {
        let mut t = GestureTracker::new();
        t.begin(Vec2::new(0.0, 0.0), None);
        t.move_to(Vec2::new(20.0, 0.0), None);
        assert!(t.is_dragging());

        // Returning inside the hysteresis box does not disengage
        t.move_to(Vec2::new(1.0, 0.0), None);
        assert!(t.is_dragging());

        t.end();
        assert!(!t.is_dragging());
        assert_eq!(t.state(), TouchState::None);
    }

    #[test]
    fn test_delta_tracks_last_move_only() {
        let mut t = GestureTracker::new();
        t.begin(Vec2::new(0.0, 0.0), None);
        t.move_to(Vec2::new(30.0, 0.0), None);
        t.move_to(Vec2::new(30.0, 4.0), None);

        let d = t.delta();
        assert_eq!(d.dx, 0.0);
        assert_eq!(d.dy, 4.0);
    }

    #[test]
    fn test_pinch_scale() {
        let mut t = GestureTracker::new();
        t.begin(Vec2::new(0.0, 0.0), Some(Vec2::new(10.0, 0.0)));
        assert_eq!(t.state(), TouchState::Multi);
        assert_eq!(t.scale(), 1.0);

        t.move_to(Vec2::new(0.0, 0.0), Some(Vec2::new(20.0, 0.0)));
        assert_eq!(t.scale(), 2.0);

        t.move_to(Vec2::new(0.0, 0.0), Some(Vec2::new(5.0, 0.0)));
        assert_eq!(t.scale(), 0.25);
    }

    #[test]
    fn test_scale_guard_against_zero() {
        let mut t = GestureTracker::new();
        // Both pointers at the same spot: recorded distance is zero
        t.begin(Vec2::new(1.0, 1.0), Some(Vec2::new(1.0, 1.0)));
        t.move_to(Vec2::new(0.0, 0.0), Some(Vec2::new(10.0, 0.0)));
        assert_eq!(t.scale(), 1.0);

        t.end();
        assert_eq!(t.scale(), 1.0);
    }

    #[test]
    fn test_end_idempotent() {
        let mut t = GestureTracker::new();
        t.begin(Vec2::new(0.0, 0.0), None);
        t.end();
        t.end();
        assert_eq!(t.state(), TouchState::None);
        assert!(!t.is_dragging());
    }

    #[test]
    fn test_arity_change_rebegins() {
        let mut t = GestureTracker::new();
        t.begin(Vec2::new(0.0, 0.0), None);
        t.move_to(Vec2::new(50.0, 0.0), None);
        assert!(t.is_dragging());

        // Second finger lands mid-drag: gesture restarts as a pinch
        t.move_to(Vec2::new(0.0, 0.0), Some(Vec2::new(10.0, 0.0)));
        assert_eq!(t.state(), TouchState::Multi);
        assert!(!t.is_dragging());
        assert_eq!(t.scale(), 1.0);
    }

    #[test]
    fn test_flick_distance() {
        let mut t = GestureTracker::new();
        t.begin(Vec2::new(0.0, 0.0), None);
        t.move_to(Vec2::new(3.0, 0.0), None);
        t.move_to(Vec2::new(3.0, 4.0), None);
        assert_eq!(t.flick_distance(), 5.0);
    }

    proptest! {
        /// Operations are total: any float input leaves the tracker in a
        /// consistent state and never produces a NaN scale from the guard.
        #[test]
        fn prop_scale_guard_total(
            x1 in -1e6f32..1e6, y1 in -1e6f32..1e6,
            x2 in -1e6f32..1e6, y2 in -1e6f32..1e6,
        ) {
            let mut t = GestureTracker::new();
            t.begin(Vec2::new(x1, y1), Some(Vec2::new(x1, y1)));
            t.move_to(Vec2::new(x1, y1), Some(Vec2::new(x2, y2)));
            // Previous distance was zero, so the guard must hold
            prop_assert_eq!(t.scale(), 1.0);
        }

        /// Dragging never engages without exceeding the threshold.
        #[test]
        fn prop_drag_needs_threshold(
            sx in -1e3f32..1e3, sy in -1e3f32..1e3,
            dx in -10.0f32..10.0, dy in -10.0f32..10.0,
        ) {
            let mut t = GestureTracker::new();
            t.begin(Vec2::new(sx, sy), None);
            t.move_to(Vec2::new(sx + dx, sy + dy), None);
            prop_assert!(!t.is_dragging());
        }
    }
}
