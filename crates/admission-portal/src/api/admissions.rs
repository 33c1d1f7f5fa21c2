use std::future::Future;

use reqwest::Method;
use tracing::info;

use super::{ApiError, PortalClient, SubmittedApplication};
use crate::admission::{AdmissionGateway, SubmissionPayload};

impl PortalClient {
    /// `POST /admissions` with the multipart body built from the payload.
    pub async fn submit_admission(
        &self,
        payload: SubmissionPayload,
    ) -> Result<SubmittedApplication, ApiError> {
        let endpoint = "POST /admissions";
        let attachments = payload.files().len();
        let form = payload.into_form().await?;
        let application: SubmittedApplication = self
            .execute(endpoint, self.public(Method::POST, "admissions").multipart(form))
            .await?;
        info!(
            application_id = %application.id,
            attachments,
            "admission application accepted"
        );
        Ok(application)
    }

    pub async fn list_admissions(&self) -> Result<Vec<SubmittedApplication>, ApiError> {
        self.execute("GET /admissions", self.public(Method::GET, "admissions"))
            .await
    }

    pub async fn get_admission(&self, id: &str) -> Result<SubmittedApplication, ApiError> {
        let endpoint = format!("GET /admissions/{id}");
        self.execute(&endpoint, self.public(Method::GET, &format!("admissions/{id}")))
            .await
    }
}

impl AdmissionGateway for PortalClient {
    fn submit_application(
        &self,
        payload: SubmissionPayload,
    ) -> impl Future<Output = Result<SubmittedApplication, ApiError>> + Send {
        self.submit_admission(payload)
    }
}
