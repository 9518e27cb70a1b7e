//! Admission gate bounding simultaneous in-flight requests.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;

use cims_shared::{CimsError, Result};

/// Caps how many futures run at once.
///
/// Clones share the same permits, so one gate can be handed to several
/// callers and still bound their combined concurrency. Waiters are admitted
/// in the order they started waiting.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl AdmissionGate {
    /// Create a gate admitting at most `capacity` futures (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Configured cap.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits currently free.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Wait for a permit, then drive `fut` to completion while holding it.
    pub async fn run<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| CimsError::Network("admission gate closed".into()))?;
        fut.await
    }
}
