//! Debounced handle availability checks
//!
//! Every handle edit restarts a quiet-period timer; only the edit that
//! survives the full period issues `GET /profile/handle/check`. Responses
//! are applied only while the handle they were requested for is still the
//! current one, so a slow answer for an older handle is dropped.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use common::error::ApiResult;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::validation::{HandleValidity, handle_validity, normalize_handle};

/// Result of the last availability lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandleAvailability {
    #[default]
    Idle,
    Checking,
    Available,
    Unavailable,
}

/// What the editor shows next to the handle field
///
/// Format errors win over any lookup result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleStatus {
    Idle,
    Invalid,
    Checking,
    Available,
    Unavailable,
}

/// Source of truth for handle availability
pub trait HandleLookup: Send + Sync + 'static {
    /// `true` when nobody else holds `handle`
    fn check_handle(&self, handle: &str) -> impl Future<Output = ApiResult<bool>> + Send;
}

#[derive(Debug, Default)]
struct CheckState {
    /// Normalized handle currently in the field
    current: String,
    availability: HandleAvailability,
}

/// A timer that has not fired yet, or a lookup still running
struct PendingCheck {
    cancel: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl PendingCheck {
    fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            // Err means the timer already fired; the lookup keeps running.
            let _ = cancel.send(());
        }
    }
}

/// Debounced, stale-safe availability checker for one editing session
pub struct HandleAvailabilityChecker<L> {
    lookup: Arc<L>,
    delay: Duration,
    state: Arc<Mutex<CheckState>>,
    pending: Option<PendingCheck>,
    original_handle: Option<String>,
    enabled: bool,
}

impl<L: HandleLookup> HandleAvailabilityChecker<L> {
    pub fn new(lookup: Arc<L>, delay: Duration) -> Self {
        Self {
            lookup,
            delay,
            state: Arc::new(Mutex::new(CheckState::default())),
            pending: None,
            original_handle: None,
            enabled: false,
        }
    }

    /// Checks only run once enabled (signed in and profile loaded)
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.cancel_pending();
            lock(&self.state).availability = HandleAvailability::Idle;
        }
    }

    /// Handle the account already owns; it is never looked up
    pub fn set_original_handle(&mut self, handle: &str) {
        let handle = normalize_handle(handle);
        self.original_handle = (!handle.is_empty()).then(|| handle.to_string());
    }

    pub fn original_handle(&self) -> Option<&str> {
        self.original_handle.as_deref()
    }

    /// True when `raw` differs from the handle loaded from the server
    pub fn is_changed(&self, raw: &str) -> bool {
        self.original_handle.as_deref() != Some(normalize_handle(raw))
    }

    /// React to an edit of the handle field
    ///
    /// Any pending timer is cancelled and the result resets to idle. A new
    /// timer starts only for a well-formed handle that differs from the
    /// original one.
    pub fn on_handle_changed(&mut self, raw: &str) {
        let handle = normalize_handle(raw).to_string();

        {
            let mut state = lock(&self.state);
            state.current = handle.clone();
            state.availability = HandleAvailability::Idle;
        }
        self.cancel_pending();

        if !self.enabled
            || handle_validity(&handle) != HandleValidity::Valid
            || !self.is_changed(&handle)
        {
            return;
        }

        debug!("Scheduling handle check for {}", handle);
        self.pending = Some(self.schedule(handle));
    }

    pub fn availability(&self) -> HandleAvailability {
        lock(&self.state).availability
    }

    /// Combine format validity with the last lookup result
    pub fn status(&self, raw: &str) -> HandleStatus {
        match handle_validity(raw) {
            HandleValidity::Idle => return HandleStatus::Idle,
            HandleValidity::Invalid => return HandleStatus::Invalid,
            HandleValidity::Valid => {}
        }

        if !self.is_changed(raw) {
            return HandleStatus::Idle;
        }

        match self.availability() {
            HandleAvailability::Idle => HandleStatus::Idle,
            HandleAvailability::Checking => HandleStatus::Checking,
            HandleAvailability::Available => HandleStatus::Available,
            HandleAvailability::Unavailable => HandleStatus::Unavailable,
        }
    }

    /// True while a timer is armed or a lookup is in flight
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| !pending.task.is_finished())
    }

    /// Wait for the armed timer and its lookup to finish
    pub async fn settle(&mut self) -> HandleAvailability {
        if let Some(mut pending) = self.pending.take() {
            // The cancel sender stays alive while awaiting so the timer runs out.
            if let Err(e) = (&mut pending.task).await {
                warn!("Handle check task failed: {}", e);
            }
        }
        self.availability()
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
    }

    fn schedule(&self, handle: String) -> PendingCheck {
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
        let lookup = Arc::clone(&self.lookup);
        let state = Arc::clone(&self.state);
        let delay = self.delay;

        let task = tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = cancel_rx => return,
            }

            if !apply_if_current(&state, &handle, HandleAvailability::Checking) {
                return;
            }

            info!("Checking handle availability for {}", handle);
            let availability = match lookup.check_handle(&handle).await {
                Ok(true) => HandleAvailability::Available,
                Ok(false) => HandleAvailability::Unavailable,
                Err(e) => {
                    // Fail open: the server still rejects duplicates on save.
                    warn!("Handle check for {} failed: {}", handle, e);
                    HandleAvailability::Idle
                }
            };

            if !apply_if_current(&state, &handle, availability) {
                debug!("Discarding stale handle check result for {}", handle);
            }
        });

        PendingCheck {
            cancel: Some(cancel_tx),
            task,
        }
    }
}

impl<L> Drop for HandleAvailabilityChecker<L> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
    }
}

fn apply_if_current(
    state: &Mutex<CheckState>,
    handle: &str,
    availability: HandleAvailability,
) -> bool {
    let mut state = lock(state);
    if state.current != handle {
        return false;
    }
    state.availability = availability;
    true
}

fn lock(state: &Mutex<CheckState>) -> MutexGuard<'_, CheckState> {
    // State is plain data, so a poisoned lock still holds a usable value.
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
