//! Per-case single-flight guard for generation requests.
//!
//! A second generate request for a case that already has a batch running is
//! refused rather than queued. The guard is released when dropped, so every
//! exit path of the handler (success, error, client disconnect) frees the case.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use identikit_core::types::DbId;

/// Set of case ids with a batch in flight.
#[derive(Debug, Default)]
pub struct InFlightCases {
    cases: Mutex<HashSet<DbId>>,
}

impl InFlightCases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `case_id`. Returns `None` if a batch for it is already running.
    pub fn try_acquire(self: &Arc<Self>, case_id: DbId) -> Option<InFlightGuard> {
        if !self.lock().insert(case_id) {
            return None;
        }
        Some(InFlightGuard {
            cases: Arc::clone(self),
            case_id,
        })
    }

    pub fn is_running(&self, case_id: DbId) -> bool {
        self.lock().contains(&case_id)
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<DbId>> {
        // The set stays consistent even if a holder panicked mid-operation.
        self.cases.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Releases its case when dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    cases: Arc<InFlightCases>,
    case_id: DbId,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.cases.lock().remove(&self.case_id);
    }
}
