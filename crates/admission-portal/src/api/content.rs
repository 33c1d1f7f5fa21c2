//! News, events and testimonies under `/admin`.

use reqwest::Method;

use super::{
    ApiError, EventDraft, EventRecord, NewsArticle, NewsDraft, PortalClient, Testimony,
    TestimonyStatus,
};

impl PortalClient {
    pub async fn list_news(&self) -> Result<Vec<NewsArticle>, ApiError> {
        let request = self.admin(Method::GET, "admin/news")?;
        self.execute("GET /admin/news", request).await
    }

    pub async fn create_news(&self, draft: &NewsDraft) -> Result<NewsArticle, ApiError> {
        let request = self.admin(Method::POST, "admin/news")?.json(draft);
        self.execute("POST /admin/news", request).await
    }

    pub async fn update_news(&self, id: &str, draft: &NewsDraft) -> Result<NewsArticle, ApiError> {
        let endpoint = format!("PUT /admin/news/{id}");
        let request = self
            .admin(Method::PUT, &format!("admin/news/{id}"))?
            .json(draft);
        self.execute(&endpoint, request).await
    }

    pub async fn delete_news(&self, id: &str) -> Result<(), ApiError> {
        let endpoint = format!("DELETE /admin/news/{id}");
        let request = self.admin(Method::DELETE, &format!("admin/news/{id}"))?;
        self.execute_ack(&endpoint, request).await
    }

    pub async fn list_events(&self) -> Result<Vec<EventRecord>, ApiError> {
        let request = self.admin(Method::GET, "admin/events")?;
        self.execute("GET /admin/events", request).await
    }

    pub async fn create_event(&self, draft: &EventDraft) -> Result<EventRecord, ApiError> {
        let request = self.admin(Method::POST, "admin/events")?.json(draft);
        self.execute("POST /admin/events", request).await
    }

    pub async fn update_event(
        &self,
        id: &str,
        draft: &EventDraft,
    ) -> Result<EventRecord, ApiError> {
        let endpoint = format!("PUT /admin/events/{id}");
        let request = self
            .admin(Method::PUT, &format!("admin/events/{id}"))?
            .json(draft);
        self.execute(&endpoint, request).await
    }

    pub async fn delete_event(&self, id: &str) -> Result<(), ApiError> {
        let endpoint = format!("DELETE /admin/events/{id}");
        let request = self.admin(Method::DELETE, &format!("admin/events/{id}"))?;
        self.execute_ack(&endpoint, request).await
    }

    pub async fn list_testimonies(
        &self,
        status: Option<TestimonyStatus>,
    ) -> Result<Vec<Testimony>, ApiError> {
        let mut request = self.admin(Method::GET, "admin/testimonies")?;
        if let Some(status) = status {
            request = request.query(&[("status", status.as_str())]);
        }
        self.execute("GET /admin/testimonies", request).await
    }

    pub async fn approve_testimony(&self, id: &str) -> Result<(), ApiError> {
        let endpoint = format!("POST /admin/testimonies/{id}/approve");
        let request = self.admin(Method::POST, &format!("admin/testimonies/{id}/approve"))?;
        self.execute_ack(&endpoint, request).await
    }

    pub async fn delete_testimony(&self, id: &str) -> Result<(), ApiError> {
        let endpoint = format!("DELETE /admin/testimonies/{id}");
        let request = self.admin(Method::DELETE, &format!("admin/testimonies/{id}"))?;
        self.execute_ack(&endpoint, request).await
    }
}
