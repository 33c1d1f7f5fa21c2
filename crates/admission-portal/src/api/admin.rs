use reqwest::Method;

use super::{ApiError, ApplicationStatus, PortalClient, SubmittedApplication};

impl PortalClient {
    /// `GET /admin/admissions`, optionally narrowed to one status.
    pub async fn list_applications(
        &self,
        status: Option<&ApplicationStatus>,
    ) -> Result<Vec<SubmittedApplication>, ApiError> {
        let mut request = self.admin(Method::GET, "admin/admissions")?;
        if let Some(status) = status {
            request = request.query(&[("status", status.as_str())]);
        }
        self.execute("GET /admin/admissions", request).await
    }

    pub async fn get_application(&self, id: &str) -> Result<SubmittedApplication, ApiError> {
        let endpoint = format!("GET /admin/admissions/{id}");
        let request = self.admin(Method::GET, &format!("admin/admissions/{id}"))?;
        self.execute(&endpoint, request).await
    }

    pub async fn approve_application(&self, id: &str) -> Result<(), ApiError> {
        self.transition_application(id, "approve").await
    }

    pub async fn reject_application(&self, id: &str) -> Result<(), ApiError> {
        self.transition_application(id, "reject").await
    }

    async fn transition_application(&self, id: &str, action: &str) -> Result<(), ApiError> {
        let endpoint = format!("POST /admin/admissions/{id}/{action}");
        let request = self.admin(Method::POST, &format!("admin/admissions/{id}/{action}"))?;
        self.execute_ack(&endpoint, request).await
    }
}
