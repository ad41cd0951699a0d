//! Concurrency-safe lifecycle registry for avatar sessions
//!
//! Lifecycle calls arrive from arbitrary threads: the UI thread drives
//! create/destroy, background audio/speech threads re-activate sessions,
//! and the frame loop ticks active ones. Every mutating operation runs
//! under one mutex covering both maps and the allocation counter, so a
//! session id is either fully registered or fully absent.
//!
//! Boolean results mirror the platform-channel contract the registry
//! serves: argument and not-found failures are logged and reported as
//! `false`, initialization failures roll back without partial entries,
//! and teardown failures never prevent removal.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, error, warn};

use omote_core::{InstanceId, OmoteError, OmoteResult, PlatformContext, SessionBackend};
use omote_envelope::{spawn_paced, AudioFormat, EnvelopeExtractor, EnvelopeTask};

use crate::{AvatarSession, SessionConfig};

#[derive(Default)]
struct RegistryInner {
    /// Instance id → dense internal index
    ids: HashMap<String, u64>,
    /// Dense internal index → session record
    sessions: HashMap<u64, AvatarSession>,
    /// Allocation counter; monotonically increasing, never reused after
    /// a destroy
    next_index: u64,
}

/// Registry of named avatar sessions.
///
/// Constructed explicitly at the application's composition root and
/// injected wherever lifecycle calls originate; no global state.
pub struct InstanceRegistry {
    backend: Arc<dyn SessionBackend>,
    config: SessionConfig,
    inner: Mutex<RegistryInner>,
}

impl InstanceRegistry {
    pub fn new(backend: Arc<dyn SessionBackend>) -> Self {
        InstanceRegistry::with_config(backend, SessionConfig::default())
    }

    pub fn with_config(backend: Arc<dyn SessionBackend>, config: SessionConfig) -> Self {
        InstanceRegistry {
            backend,
            config,
            inner: Mutex::new(RegistryInner::default()),
        }
    }

    /// Create and register a session.
    ///
    /// Idempotent: an id that already exists is reported as success
    /// without mutation. An invalid id or context, or a backend failure,
    /// is logged and reported as `false`, leaving no partial entry in
    /// either map.
    pub fn create_instance(&self, id: &str, ctx: &PlatformContext) -> bool {
        let id = match InstanceId::parse(id) {
            Ok(id) => id,
            Err(e) => {
                error!(error = %e, "create rejected");
                return false;
            }
        };
        if let Err(e) = ctx.validate() {
            error!(id = %id, error = %e, "create rejected");
            return false;
        }

        // Lock held across initialization: concurrent creates for the
        // same id serialize, and the loser sees the winner's entry.
        let mut inner = self.inner.lock();

        if inner.ids.contains_key(id.as_str()) {
            debug!(id = %id, "instance already exists");
            return true;
        }

        let model = match self.backend.create_model(id.as_str(), ctx) {
            Ok(model) => model,
            Err(e) => {
                error!(id = %id, error = %e, "model creation failed");
                return false;
            }
        };
        let mut surface = match self.backend.create_surface(id.as_str(), ctx) {
            Ok(surface) => surface,
            Err(e) => {
                error!(id = %id, error = %e, "surface creation failed");
                return false;
            }
        };
        if let Err(e) = surface.acquire() {
            error!(id = %id, error = %e, "surface acquire failed");
            return false;
        }

        let index = inner.next_index;
        inner.next_index += 1;

        let session = AvatarSession::new(id.clone(), model, surface, self.config.clone());
        inner.ids.insert(id.as_str().to_string(), index);
        inner.sessions.insert(index, session);

        debug!(id = %id, index, "instance created");
        true
    }

    /// Tear down and remove a session.
    ///
    /// Teardown errors are logged and do not prevent removal: a session
    /// that fails to release cleanly is still gone from the registry.
    pub fn destroy_instance(&self, id: &str) -> bool {
        let mut inner = self.inner.lock();

        let Some(index) = inner.ids.remove(id.trim()) else {
            warn!(id, "destroy: unknown instance");
            return false;
        };

        if let Some(mut session) = inner.sessions.remove(&index) {
            if let Err(e) = session.release() {
                error!(id, error = %e, "teardown failed, removing anyway");
            }
        }

        debug!(id, index, "instance destroyed");
        true
    }

    /// Activate a session (resume hook + active flag)
    pub fn activate_instance(&self, id: &str) -> bool {
        let activated = self.with_instance(id, |session| session.resume()).is_some();
        if !activated {
            warn!(id, "activate: unknown instance");
        }
        activated
    }

    /// Deactivate a session (pause hook + active flag); state survives
    /// for later reactivation
    pub fn deactivate_instance(&self, id: &str) -> bool {
        let deactivated = self.with_instance(id, |session| session.pause()).is_some();
        if !deactivated {
            warn!(id, "deactivate: unknown instance");
        }
        deactivated
    }

    /// Whether a session with this id exists
    pub fn has_instance(&self, id: &str) -> bool {
        self.inner.lock().ids.contains_key(id.trim())
    }

    /// Run a closure against a session, if present. Sessions live behind
    /// the registry mutex, so access is scoped rather than by reference.
    pub fn with_instance<R>(&self, id: &str, f: impl FnOnce(&mut AvatarSession) -> R) -> Option<R> {
        let mut inner = self.inner.lock();
        let index = *inner.ids.get(id.trim())?;
        inner.sessions.get_mut(&index).map(f)
    }

    /// Bind a lip-sync feed to a session
    pub fn attach_lip_sync(&self, id: &str, rx: watch::Receiver<f32>) -> bool {
        self.with_instance(id, |session| session.attach_lip_sync(rx))
            .is_some()
    }

    /// Extract `pcm` as a paced lip-sync stream and bind it to a session.
    ///
    /// The session keeps the cancellation handle, so destroying it (or
    /// attaching a new feed) stops the producer within one window. The
    /// returned task can be joined to observe the stream outcome. Must be
    /// called from within a tokio runtime.
    pub fn stream_lip_sync(
        &self,
        id: &str,
        extractor: EnvelopeExtractor,
        pcm: Vec<u8>,
        format: AudioFormat,
    ) -> OmoteResult<EnvelopeTask> {
        let (tx, rx) = watch::channel(0.0f32);
        let task = spawn_paced(extractor, pcm, format, tx)?;

        let cancel = task.cancel_handle();
        let attached = self
            .with_instance(id, |session| session.attach_lip_stream(rx, cancel))
            .is_some();
        if !attached {
            task.cancel();
            return Err(OmoteError::InstanceNotFound(id.to_string()));
        }
        Ok(task)
    }

    /// Snapshot of all registered ids
    pub fn instance_ids(&self) -> HashSet<String> {
        self.inner.lock().ids.keys().cloned().collect()
    }

    /// Number of registered sessions
    pub fn count(&self) -> usize {
        self.inner.lock().ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Frame-loop entry point: tick every active session
    pub fn tick_active(&self, dt: f32) {
        let mut inner = self.inner.lock();
        for session in inner.sessions.values_mut() {
            if session.is_active() {
                session.tick(dt);
            }
        }
    }

    /// Destroy every session. Iterates a snapshot of the id set, never
    /// the live map, so registrations racing with teardown are either
    /// fully included or fully untouched.
    pub fn dispose_all(&self) {
        let ids = self.instance_ids();
        debug!(count = ids.len(), "disposing all instances");
        for id in ids {
            self.destroy_instance(&id);
        }
    }
}
