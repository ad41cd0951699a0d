//! Omote Session - Avatar sessions and their lifecycle registry
//!
//! An [`AvatarSession`] is one independently animated avatar: its gesture
//! tracker, its drag-smoothing state, an optional lip-sync channel, and
//! the externally supplied animation-model/surface handles. The external
//! frame loop drives the active sessions through
//! [`InstanceRegistry::tick_active`] once per display refresh.
//!
//! The [`InstanceRegistry`] owns every session, keyed by caller-supplied
//! string id with an auxiliary dense index for allocation bookkeeping.
//! All mutating operations are serialized behind one mutex so no thread
//! can observe a torn state (an id resolvable while its record is
//! absent, or vice versa). The registry is constructed explicitly and
//! injected where needed; there is no process-wide singleton.

pub mod drag;
pub mod registry;
pub mod session;

#[cfg(test)]
mod stub;

pub use drag::*;
pub use registry::*;
pub use session::*;
