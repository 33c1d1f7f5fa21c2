//! One-at-a-time submission of the draft to the admissions endpoint.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use super::domain::ApplicationDraft;
use super::payload::{PayloadError, SubmissionPayload};
use super::store::{DraftStorage, DraftStore};
use crate::api::{ApiError, SubmittedApplication};

/// Shown when the backend gives no usable reason for a failed submission.
pub const SUBMIT_FALLBACK_MESSAGE: &str = "Failed to submit application";

/// Anything that can accept a finished application.
pub trait AdmissionGateway {
    fn submit_application(
        &self,
        payload: SubmissionPayload,
    ) -> impl Future<Output = Result<SubmittedApplication, ApiError>> + Send;
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl SubmitError {
    /// Text to show next to the submit control.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Payload(err) => err.to_string(),
            SubmitError::Api(err) => err.user_message(SUBMIT_FALLBACK_MESSAGE),
        }
    }
}

/// Outcome of a submit attempt as the review screen shows it.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitStatus {
    /// Accepted; the draft has been reset.
    Submitted(SubmittedApplication),
    /// Rejected or unreachable; the draft is untouched.
    Failed(String),
    /// Another submission was still outstanding; nothing was sent.
    Busy,
}

/// Grants at most one in-flight submission. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct SubmissionController {
    in_flight: Arc<AtomicBool>,
}

impl SubmissionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while the submit control should be disabled.
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Snapshot the draft and claim the in-flight slot, or `None` if a
    /// submission is already outstanding.
    pub fn begin<S: DraftStorage>(&self, store: &DraftStore<S>) -> Option<PendingSubmission> {
        let guard = InFlightGuard::acquire(&self.in_flight)?;
        Some(PendingSubmission {
            draft: store.draft().clone(),
            guard,
        })
    }

    /// Apply the outcome to the store: reset on success, leave it alone
    /// otherwise. Releases the in-flight slot.
    pub fn finish<S: DraftStorage>(
        &self,
        completed: CompletedSubmission,
        store: &mut DraftStore<S>,
    ) -> SubmitStatus {
        let CompletedSubmission { result, guard } = completed;
        let status = match result {
            Ok(application) => {
                store.reset();
                info!(application_id = %application.id, "admission application submitted");
                SubmitStatus::Submitted(application)
            }
            Err(err) => {
                warn!(error = %err, "admission submission failed; draft kept");
                SubmitStatus::Failed(err.user_message())
            }
        };
        drop(guard);
        status
    }

    /// Begin, send, and finish in one call.
    pub async fn submit<S, G>(&self, store: &mut DraftStore<S>, gateway: &G) -> SubmitStatus
    where
        S: DraftStorage,
        G: AdmissionGateway,
    {
        let Some(pending) = self.begin(store) else {
            return SubmitStatus::Busy;
        };
        let completed = pending.send(gateway).await;
        self.finish(completed, store)
    }
}

/// A claimed submission that has not been sent yet. Dropping it releases
/// the in-flight slot.
#[derive(Debug)]
pub struct PendingSubmission {
    draft: ApplicationDraft,
    guard: InFlightGuard,
}

impl PendingSubmission {
    pub fn draft(&self) -> &ApplicationDraft {
        &self.draft
    }

    /// Build the payload and hand it to the gateway. Sends exactly once.
    pub async fn send<G: AdmissionGateway>(self, gateway: &G) -> CompletedSubmission {
        let PendingSubmission { draft, guard } = self;
        let result = match SubmissionPayload::from_draft(&draft) {
            Ok(payload) => gateway
                .submit_application(payload)
                .await
                .map_err(SubmitError::from),
            Err(err) => Err(SubmitError::from(err)),
        };
        CompletedSubmission { result, guard }
    }
}

/// A response (or failure) still holding the in-flight slot until
/// [`SubmissionController::finish`] applies it.
#[derive(Debug)]
pub struct CompletedSubmission {
    result: Result<SubmittedApplication, SubmitError>,
    guard: InFlightGuard,
}

impl CompletedSubmission {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug)]
struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                flag: Arc::clone(flag),
            })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
