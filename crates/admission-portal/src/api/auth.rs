use reqwest::Method;
use tracing::info;

use super::{ApiError, LoginGrant, LoginRequest, PortalClient};

impl PortalClient {
    /// `POST /admin/login`. The grant is returned, not installed; callers
    /// decide whether to keep it.
    pub async fn admin_login(&self, credentials: &LoginRequest) -> Result<LoginGrant, ApiError> {
        self.login("POST /admin/login", "admin/login", credentials)
            .await
    }

    pub async fn student_login(&self, credentials: &LoginRequest) -> Result<LoginGrant, ApiError> {
        self.login("POST /student/login", "student/login", credentials)
            .await
    }

    async fn login(
        &self,
        endpoint: &str,
        path: &str,
        credentials: &LoginRequest,
    ) -> Result<LoginGrant, ApiError> {
        let grant: LoginGrant = self
            .execute(endpoint, self.public(Method::POST, path).json(credentials))
            .await?;
        info!(endpoint, token_type = %grant.token_type, "signed in");
        Ok(grant)
    }
}
