//! Omote Gesture - Multi-touch gesture state machine
//!
//! Converts raw pointer-down/move/up samples into per-tick drag deltas
//! and pinch scale ratios:
//!
//! - `None → Single` on a one-pointer down, `None → Multi` on a
//!   simultaneous two-pointer down, back to `None` when all pointers lift.
//! - Dragging engages only in `Single`, only once the pointer has left a
//!   hysteresis box around the gesture's start point.
//! - Pinch scale is the ratio of the current to the previous two-pointer
//!   distance, guarded to `1.0` whenever either distance is zero.
//!
//! All operations are total over any float input and purely mutate
//! internal state; the tracker performs no I/O.

pub mod tracker;

pub use tracker::*;
