use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use super::domain::{ApplicationDraft, Section, SectionData};

/// Storage key the draft is persisted under.
pub const DRAFT_STORAGE_KEY: &str = "admission_application";

/// Backing store for the serialized draft: one key, one JSON blob.
pub trait DraftStorage {
    fn read(&self) -> Result<Option<String>, StoreError>;
    fn write(&self, contents: &str) -> Result<(), StoreError>;
    fn remove(&self) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("draft storage at {path} failed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("draft could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("draft storage unavailable: {0}")]
    Unavailable(String),
}

/// Keeps the draft in a single JSON file.
#[derive(Debug, Clone)]
pub struct FileDraftStorage {
    path: PathBuf,
}

impl FileDraftStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<dir>/admission_application.json`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(format!("{DRAFT_STORAGE_KEY}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl DraftStorage for FileDraftStorage {
    fn read(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(self.io_error(err)),
        }
    }

    fn write(&self, contents: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
            }
        }

        // Write-then-rename: readers see the old draft or the new one.
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, contents).map_err(|err| self.io_error(err))?;
        fs::rename(&staging, &self.path).map_err(|err| self.io_error(err))
    }

    fn remove(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error(err)),
        }
    }
}

/// In-process storage. Clones share the same slot, so a test can keep a
/// handle and inspect what the store persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryDraftStorage {
    slot: Arc<Mutex<Option<String>>>,
    fail_writes: Arc<Mutex<bool>>,
}

impl MemoryDraftStorage {
    pub fn with_contents(contents: impl Into<String>) -> Self {
        let storage = Self::default();
        *storage.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(contents.into());
        storage
    }

    pub fn contents(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Make subsequent writes fail, as a full or read-only disk would.
    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap_or_else(PoisonError::into_inner) = fail;
    }
}

impl DraftStorage for MemoryDraftStorage {
    fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(self.contents())
    }

    fn write(&self, contents: &str) -> Result<(), StoreError> {
        if *self.fail_writes.lock().unwrap_or_else(PoisonError::into_inner) {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(contents.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<(), StoreError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Owner of the in-progress admission draft.
///
/// Every mutation is mirrored to the backing storage. Persistence is
/// best-effort: a failed write is logged and remembered in
/// [`DraftStore::persistence_error`], while the in-memory draft keeps the
/// change so the wizard can carry on.
#[derive(Debug)]
pub struct DraftStore<S> {
    storage: S,
    draft: ApplicationDraft,
    persistence_error: Option<String>,
}

impl<S: DraftStorage> DraftStore<S> {
    /// Hydrate from storage. A missing or unreadable blob yields the empty draft.
    pub fn open(storage: S) -> Self {
        let draft = load_draft(&storage);
        Self {
            storage,
            draft,
            persistence_error: None,
        }
    }

    pub fn draft(&self) -> &ApplicationDraft {
        &self.draft
    }

    pub fn section<T: Section>(&self) -> &T {
        T::in_draft(&self.draft)
    }

    /// Replace one section and persist the whole draft.
    pub fn update(&mut self, data: impl Into<SectionData>) {
        let data = data.into();
        let kind = data.kind();
        self.draft.apply(data);
        debug!(section = kind.key(), "admission draft section updated");
        self.persist();
    }

    /// Clear every section and drop the persisted copy.
    pub fn reset(&mut self) {
        self.draft = ApplicationDraft::default();
        match self.storage.remove() {
            Ok(()) => {
                self.persistence_error = None;
                debug!("admission draft reset");
            }
            Err(err) => {
                warn!(error = %err, "persisted admission draft could not be removed");
                self.persistence_error = Some(err.to_string());
            }
        }
    }

    /// Last persistence failure, cleared by the next successful write.
    pub fn persistence_error(&self) -> Option<&str> {
        self.persistence_error.as_deref()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&mut self) {
        let outcome = serde_json::to_string(&self.draft)
            .map_err(StoreError::from)
            .and_then(|json| self.storage.write(&json));

        match outcome {
            Ok(()) => self.persistence_error = None,
            Err(err) => {
                warn!(error = %err, "admission draft kept in memory only");
                self.persistence_error = Some(err.to_string());
            }
        }
    }
}

fn load_draft<S: DraftStorage>(storage: &S) -> ApplicationDraft {
    let raw = match storage.read() {
        Ok(Some(raw)) => raw,
        Ok(None) => return ApplicationDraft::default(),
        Err(err) => {
            warn!(error = %err, "persisted admission draft unreadable; starting empty");
            return ApplicationDraft::default();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(draft) => draft,
        Err(err) => {
            warn!(error = %err, "persisted admission draft is corrupt; starting empty");
            ApplicationDraft::default()
        }
    }
}
