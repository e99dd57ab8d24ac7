//! Shared state between the API server and the effect loader
//!
//! The designer sits behind a synchronous lock. Guards are never held
//! across an await point; handlers read or mutate and release.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use crate::designer::Designer;
use crate::templates::TemplateStore;

/// State shared by every request handler
pub struct SharedState {
    designer: RwLock<Designer>,
    templates: Arc<dyn TemplateStore>,
    started: Instant,
}

/// Thread-safe handle to shared state
pub type SharedStateHandle = Arc<SharedState>;

impl SharedState {
    pub fn new(designer: Designer, templates: Arc<dyn TemplateStore>) -> Self {
        Self {
            designer: RwLock::new(designer),
            templates,
            started: Instant::now(),
        }
    }

    pub fn into_handle(self) -> SharedStateHandle {
        Arc::new(self)
    }

    /// Read access; a poisoned lock still yields the last written designer
    pub fn designer(&self) -> RwLockReadGuard<'_, Designer> {
        self.designer.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn designer_mut(&self) -> RwLockWriteGuard<'_, Designer> {
        self.designer.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn templates(&self) -> &dyn TemplateStore {
        self.templates.as_ref()
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}
