use std::path::PathBuf;

use admission_portal::admission::{DraftStore, FileDraftStorage};
use admission_portal::api::PortalClient;
use admission_portal::config::AppConfig;
use admission_portal::error::AppError;
use admission_portal::session::TokenStore;
use admission_portal::telemetry;
use chrono::NaiveDate;
use tracing::debug;

/// Loaded configuration plus the handles every command builds from it.
pub(crate) struct Context {
    config: AppConfig,
}

impl Context {
    pub(crate) fn load(
        api_url: Option<String>,
        data_dir: Option<PathBuf>,
    ) -> Result<Self, AppError> {
        let mut config = AppConfig::load()?;
        if let Some(api_url) = api_url {
            config.api.set_base_url(api_url)?;
        }
        if let Some(data_dir) = data_dir {
            config.storage.data_dir = data_dir;
        }

        telemetry::init(&config.telemetry)?;
        debug!(
            environment = ?config.environment,
            api = %config.api.base_url,
            data_dir = %config.storage.data_dir.display(),
            "portal configuration loaded"
        );
        Ok(Self { config })
    }

    pub(crate) fn draft_store(&self) -> DraftStore<FileDraftStorage> {
        DraftStore::open(FileDraftStorage::in_dir(&self.config.storage.data_dir))
    }

    pub(crate) fn tokens(&self) -> TokenStore {
        TokenStore::new(self.config.storage.session_path())
    }

    pub(crate) fn public_client(&self) -> Result<PortalClient, AppError> {
        Ok(PortalClient::new(&self.config.api)?)
    }

    /// Client carrying the saved bearer token.
    pub(crate) fn admin_client(&self) -> Result<PortalClient, AppError> {
        let token = self.tokens().token().ok_or_else(|| {
            AppError::Usage("not signed in; run `portal admin login` first".to_string())
        })?;
        Ok(self.public_client()?.with_token(token))
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// `value` if present, `-` otherwise, for table cells.
pub(crate) fn cell(value: &str) -> &str {
    match value.trim() {
        "" => "-",
        trimmed => trimmed,
    }
}
