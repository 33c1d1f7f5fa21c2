//! Staff review of submitted applications.

use std::fmt;
use std::future::Future;

use tracing::info;

use crate::api::{ApiError, ApplicationStatus, PortalClient, SubmittedApplication};

/// Shown for referee details the applicant left empty.
pub const REFEREE_PLACEHOLDER: &str = "—";

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("Application is already {status}")]
    AlreadyDecided { status: &'static str },
    #[error("unknown status filter '{0}' (expected all, pending, review, approved or rejected)")]
    UnknownStatusFilter(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Which applications the list view shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ApplicationStatus),
}

impl StatusFilter {
    pub fn parse(raw: &str) -> Result<Self, ReviewError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(StatusFilter::All),
            "pending" => Ok(StatusFilter::Only(ApplicationStatus::Pending)),
            "review" | "under review" | "under_review" => {
                Ok(StatusFilter::Only(ApplicationStatus::UnderReview))
            }
            "approved" => Ok(StatusFilter::Only(ApplicationStatus::Approved)),
            "rejected" => Ok(StatusFilter::Only(ApplicationStatus::Rejected)),
            _ => Err(ReviewError::UnknownStatusFilter(raw.to_string())),
        }
    }

    /// Status to send as the `status` query parameter.
    pub fn status(&self) -> Option<&ApplicationStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Only(status) => Some(status),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    Reject,
}

impl ReviewAction {
    pub const fn target(self) -> ApplicationStatus {
        match self {
            ReviewAction::Approve => ApplicationStatus::Approved,
            ReviewAction::Reject => ApplicationStatus::Rejected,
        }
    }

    /// Refuse a transition into the state the application is already in.
    pub fn check(self, current: &ApplicationStatus) -> Result<(), ReviewError> {
        match (self, current) {
            (ReviewAction::Approve, ApplicationStatus::Approved) => {
                Err(ReviewError::AlreadyDecided { status: "approved" })
            }
            (ReviewAction::Reject, ApplicationStatus::Rejected) => {
                Err(ReviewError::AlreadyDecided { status: "rejected" })
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewAction::Approve => f.write_str("approve"),
            ReviewAction::Reject => f.write_str("reject"),
        }
    }
}

/// The slice of the backend the review workflow needs.
pub trait ReviewApi {
    fn fetch_application(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<SubmittedApplication, ApiError>> + Send;

    fn transition(
        &self,
        id: &str,
        action: ReviewAction,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

impl ReviewApi for PortalClient {
    fn fetch_application(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<SubmittedApplication, ApiError>> + Send {
        self.get_application(id)
    }

    async fn transition(&self, id: &str, action: ReviewAction) -> Result<(), ApiError> {
        match action {
            ReviewAction::Approve => self.approve_application(id).await,
            ReviewAction::Reject => self.reject_application(id).await,
        }
    }
}

/// Applies approve/reject decisions and reports the server's view afterwards.
#[derive(Debug)]
pub struct ApplicationReviewer<'a, A> {
    api: &'a A,
}

impl<'a, A: ReviewApi> ApplicationReviewer<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Check the current status, send the transition, then re-fetch. The
    /// returned record is the backend's, not a locally patched copy.
    pub async fn apply(
        &self,
        id: &str,
        action: ReviewAction,
    ) -> Result<SubmittedApplication, ReviewError> {
        let current = self.api.fetch_application(id).await?;
        action.check(&current.status)?;

        self.api.transition(id, action).await?;
        let updated = self.api.fetch_application(id).await?;
        info!(
            application_id = id,
            %action,
            status = %updated.status,
            "application review decision recorded"
        );
        Ok(updated)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefereeView {
    pub role: &'static str,
    pub name: String,
    pub organisation: String,
    pub position: String,
    pub phone: String,
    pub email: String,
}

/// Referees named on the application, academic first. A referee without a
/// name is left out.
pub fn referees(application: &SubmittedApplication) -> Vec<RefereeView> {
    let mut views = Vec::new();
    if !application.academic_referee.trim().is_empty() {
        views.push(RefereeView {
            role: "Academic Referee",
            name: application.academic_referee.trim().to_string(),
            organisation: or_placeholder(&application.academic_institution),
            position: or_placeholder(&application.academic_profession),
            phone: or_placeholder(&application.academic_phone),
            email: or_placeholder(&application.academic_email),
        });
    }
    if !application.clergy_referee.trim().is_empty() {
        views.push(RefereeView {
            role: "Clergy Referee",
            name: application.clergy_referee.trim().to_string(),
            organisation: or_placeholder(&application.clergy_church),
            position: or_placeholder(&application.clergy_position),
            phone: or_placeholder(&application.clergy_phone),
            email: or_placeholder(&application.clergy_email),
        });
    }
    views
}

fn or_placeholder(value: &str) -> String {
    match value.trim() {
        "" => REFEREE_PLACEHOLDER.to_string(),
        trimmed => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FakeReviewApi {
        status: Mutex<ApplicationStatus>,
        transitions: Mutex<Vec<ReviewAction>>,
    }

    impl FakeReviewApi {
        fn with_status(status: ApplicationStatus) -> Self {
            Self {
                status: Mutex::new(status),
                transitions: Mutex::new(Vec::new()),
            }
        }
    }

    impl ReviewApi for FakeReviewApi {
        async fn fetch_application(&self, id: &str) -> Result<SubmittedApplication, ApiError> {
            Ok(SubmittedApplication {
                id: id.to_string(),
                status: self.status.lock().expect("status lock").clone(),
                ..SubmittedApplication::default()
            })
        }

        async fn transition(&self, _id: &str, action: ReviewAction) -> Result<(), ApiError> {
            self.transitions.lock().expect("transitions lock").push(action);
            *self.status.lock().expect("status lock") = action.target();
            Ok(())
        }
    }

    #[test]
    fn status_filter_maps_review_and_all() {
        assert_eq!(StatusFilter::parse("all").expect("all"), StatusFilter::All);
        assert_eq!(
            StatusFilter::parse("review").expect("review").status(),
            Some(&ApplicationStatus::UnderReview)
        );
        assert_eq!(
            StatusFilter::parse("Approved").expect("approved").status(),
            Some(&ApplicationStatus::Approved)
        );
        assert!(matches!(
            StatusFilter::parse("archived"),
            Err(ReviewError::UnknownStatusFilter(_))
        ));
    }

    #[test]
    fn check_refuses_repeated_decision() {
        let err = ReviewAction::Approve
            .check(&ApplicationStatus::Approved)
            .expect_err("already approved");
        assert_eq!(err.to_string(), "Application is already approved");

        let err = ReviewAction::Reject
            .check(&ApplicationStatus::Rejected)
            .expect_err("already rejected");
        assert_eq!(err.to_string(), "Application is already rejected");

        assert!(ReviewAction::Reject.check(&ApplicationStatus::Approved).is_ok());
        assert!(ReviewAction::Approve.check(&ApplicationStatus::Pending).is_ok());
    }

    #[tokio::test]
    async fn apply_returns_refetched_record() {
        let api = FakeReviewApi::with_status(ApplicationStatus::UnderReview);
        let reviewer = ApplicationReviewer::new(&api);

        let updated = reviewer
            .apply("app-1", ReviewAction::Approve)
            .await
            .expect("approval succeeds");

        assert_eq!(updated.status, ApplicationStatus::Approved);
        assert_eq!(
            *api.transitions.lock().expect("transitions lock"),
            vec![ReviewAction::Approve]
        );
    }

    #[tokio::test]
    async fn apply_sends_nothing_when_already_decided() {
        let api = FakeReviewApi::with_status(ApplicationStatus::Rejected);
        let reviewer = ApplicationReviewer::new(&api);

        let err = reviewer
            .apply("app-1", ReviewAction::Reject)
            .await
            .expect_err("no-op transition refused");

        assert!(matches!(err, ReviewError::AlreadyDecided { .. }));
        assert!(api.transitions.lock().expect("transitions lock").is_empty());
    }

    #[test]
    fn referees_skip_unnamed_and_fill_placeholders() {
        let application = SubmittedApplication {
            academic_referee: "Dr. Grace Hopper".to_string(),
            academic_institution: "Yale".to_string(),
            clergy_referee: "  ".to_string(),
            clergy_church: "St. Mary's".to_string(),
            ..SubmittedApplication::default()
        };

        let views = referees(&application);
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].role, "Academic Referee");
        assert_eq!(views[0].organisation, "Yale");
        assert_eq!(views[0].position, REFEREE_PLACEHOLDER);
        assert_eq!(views[0].email, REFEREE_PLACEHOLDER);
    }
}
