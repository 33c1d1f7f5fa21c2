//! Records exchanged with the portal backend. Every field tolerates absence
//! or `null` so that a partially filled record from the server still parses.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Review state of an admission application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    UnderReview,
    Approved,
    Rejected,
    Other(String),
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::UnderReview => "under review",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for ApplicationStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => ApplicationStatus::Pending,
            "under review" | "under_review" | "review" => ApplicationStatus::UnderReview,
            "approved" => ApplicationStatus::Approved,
            "rejected" => ApplicationStatus::Rejected,
            _ => ApplicationStatus::Other(raw),
        }
    }
}

impl From<ApplicationStatus> for String {
    fn from(status: ApplicationStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EducationEntry {
    pub id: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub institution: String,
    #[serde(deserialize_with = "null_as_default")]
    pub from: String,
    #[serde(deserialize_with = "null_as_default")]
    pub to: String,
    #[serde(deserialize_with = "null_as_default")]
    pub qualification: String,
}

/// An uploaded file as the backend stores it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileRef {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub admission_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub file_url: String,
}

/// An application as the backend returns it after submission or on review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubmittedApplication {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: ApplicationStatus,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,

    #[serde(deserialize_with = "null_as_default")]
    pub programme_level: String,
    #[serde(deserialize_with = "null_as_default")]
    pub programme_choice: String,

    #[serde(deserialize_with = "null_as_default")]
    pub surname: String,
    #[serde(deserialize_with = "null_as_default")]
    pub firstname: String,
    #[serde(deserialize_with = "null_as_default")]
    pub other_names: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date_of_birth: String,
    #[serde(deserialize_with = "null_as_default")]
    pub place_of_birth: String,
    #[serde(deserialize_with = "null_as_default")]
    pub gender: String,

    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub present_address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub permanent_address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub postal_address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub nationality: String,
    #[serde(deserialize_with = "null_as_default")]
    pub native_language: String,
    pub place_diff_nationality: Option<bool>,
    #[serde(deserialize_with = "null_as_default")]
    pub marital_status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub religion: String,
    #[serde(deserialize_with = "null_as_default")]
    pub denomination: String,

    #[serde(deserialize_with = "null_as_default")]
    pub parent_guardian: String,
    #[serde(deserialize_with = "null_as_default")]
    pub emergency_contact: String,
    #[serde(deserialize_with = "null_as_default")]
    pub emergency_phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub next_of_kin: String,
    #[serde(deserialize_with = "null_as_default")]
    pub next_of_kin_phone: String,

    #[serde(deserialize_with = "null_as_default")]
    pub finance_info: String,
    #[serde(deserialize_with = "null_as_default")]
    pub health_info: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,

    #[serde(deserialize_with = "null_as_default")]
    pub academic_referee: String,
    #[serde(deserialize_with = "null_as_default")]
    pub academic_profession: String,
    #[serde(deserialize_with = "null_as_default")]
    pub academic_institution: String,
    #[serde(deserialize_with = "null_as_default")]
    pub academic_address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub academic_phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub academic_email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub clergy_referee: String,
    #[serde(deserialize_with = "null_as_default")]
    pub clergy_position: String,
    #[serde(deserialize_with = "null_as_default")]
    pub clergy_church: String,
    #[serde(deserialize_with = "null_as_default")]
    pub clergy_address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub clergy_phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub clergy_email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub applicant_signature: String,
    #[serde(deserialize_with = "null_as_default")]
    pub applicant_date: String,

    #[serde(deserialize_with = "null_as_default")]
    pub education: Vec<EducationEntry>,
    #[serde(deserialize_with = "null_as_default")]
    pub certificates: Vec<FileRef>,
    #[serde(deserialize_with = "null_as_default")]
    pub passport_photos: Vec<FileRef>,
}

impl SubmittedApplication {
    pub fn applicant_name(&self) -> String {
        [self.title.as_str(), &self.firstname, &self.surname]
            .into_iter()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Submission time, when the backend sent a parseable RFC 3339 stamp.
    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.created_at.as_deref())
    }
}

/// The backend sends `null` for optional text and list fields; read it as
/// the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|value| DateTime::parse_from_rfc3339(value).ok())
        .map(|stamp| stamp.with_timezone(&Utc))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Bearer credentials handed out by the login endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginGrant {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub expires_in: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// `expiresIn` arrives as either `"1h"` or `3600` depending on the backend.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewsArticle {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(deserialize_with = "null_as_default")]
    pub body: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewsDraft {
    pub title: String,
    pub summary: String,
    pub category: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventDraft {
    pub title: String,
    pub date: String,
    pub location: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestimonyStatus {
    #[default]
    Pending,
    Approved,
}

impl TestimonyStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            TestimonyStatus::Pending => "pending",
            TestimonyStatus::Approved => "approved",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(TestimonyStatus::Pending),
            "approved" => Some(TestimonyStatus::Approved),
            _ => None,
        }
    }
}

impl fmt::Display for TestimonyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Testimony {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    pub photo_url: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub status: TestimonyStatus,
    pub created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_accepts_review_spellings() {
        for raw in ["under review", "under_review", "Review"] {
            let status: ApplicationStatus =
                serde_json::from_value(json!(raw)).expect("status parses");
            assert_eq!(status, ApplicationStatus::UnderReview);
        }
        let odd: ApplicationStatus = serde_json::from_value(json!("waitlisted")).expect("parses");
        assert_eq!(odd, ApplicationStatus::Other("waitlisted".to_string()));
        assert_eq!(odd.to_string(), "waitlisted");
    }

    #[test]
    fn partial_application_parses_with_defaults() {
        let application: SubmittedApplication = serde_json::from_value(json!({
            "id": "app-7",
            "firstname": "Ada",
            "surname": "Lovelace",
            "status": "approved",
            "createdAt": "2026-03-01T09:30:00Z",
            "passportPhotos": [{ "id": "f1", "admissionId": "app-7", "fileUrl": "/uploads/a.png" }]
        }))
        .expect("application parses");

        assert_eq!(application.status, ApplicationStatus::Approved);
        assert_eq!(application.applicant_name(), "Ada Lovelace");
        assert!(application.education.is_empty());
        assert_eq!(application.passport_photos.len(), 1);
        assert!(application.submitted_at().is_some());
        assert_eq!(application.place_diff_nationality, None);
    }

    #[test]
    fn null_fields_read_as_defaults() {
        let application: SubmittedApplication = serde_json::from_value(json!({
            "id": "app-1",
            "firstname": "Ada",
            "otherNames": null,
            "description": null,
            "status": null,
            "education": null,
            "certificates": [{ "id": "f2", "admissionId": "app-1", "fileUrl": null }],
            "placeDiffNationality": null
        }))
        .expect("application with nulls parses");
        assert_eq!(application.firstname, "Ada");
        assert_eq!(application.other_names, "");
        assert_eq!(application.description, "");
        assert_eq!(application.status, ApplicationStatus::Pending);
        assert!(application.education.is_empty());
        assert_eq!(application.certificates[0].file_url, "");

        let article: NewsArticle = serde_json::from_value(json!({
            "id": "n1",
            "title": "Open day",
            "summary": null,
            "body": null
        }))
        .expect("article with nulls parses");
        assert_eq!(article.title, "Open day");
        assert_eq!(article.summary, "");

        let testimony: Testimony = serde_json::from_value(json!({
            "id": "t1",
            "message": null,
            "status": null
        }))
        .expect("testimony with nulls parses");
        assert_eq!(testimony.status, TestimonyStatus::Pending);
    }

    #[test]
    fn login_grant_accepts_numeric_expiry() {
        let grant: LoginGrant = serde_json::from_value(json!({
            "accessToken": "abc",
            "tokenType": "Bearer",
            "expiresIn": 3600
        }))
        .expect("grant parses");
        assert_eq!(grant.expires_in.as_deref(), Some("3600"));

        let bare: LoginGrant =
            serde_json::from_value(json!({ "accessToken": "xyz" })).expect("grant parses");
        assert_eq!(bare.token_type, "Bearer");
        assert_eq!(bare.expires_in, None);
    }
}
