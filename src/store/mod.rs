mod action;
mod answers;
mod persist;
pub mod selectors;

pub use action::{reduce, Action, ActionKind, BasicsData, HealthData};
pub use answers::{DateOfBirth, FormAnswers, Gender, Height};
pub use persist::{
    FileStorage, KeyValueStorage, MemoryStorage, StorageError, DEFAULT_STORAGE_KEY,
};

use std::sync::Arc;

use chrono::{DateTime, Local};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Owns the answers document.
///
/// The only way to change the document is [`Store::dispatch`]. Every change is
/// written to storage and published to subscribers. Storage failures are logged
/// and otherwise ignored; the in-memory document stays authoritative.
pub struct Store {
    state: FormAnswers,
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    changes: watch::Sender<FormAnswers>,
    last_saved: Option<DateTime<Local>>,
}

impl Store {
    /// Open the store, rehydrating from whatever `storage` holds under `key`.
    pub fn open(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let state = rehydrate(storage.as_ref(), &key);
        let (changes, _) = watch::channel(state.clone());

        Self {
            state,
            storage,
            key,
            changes,
            last_saved: None,
        }
    }

    pub fn state(&self) -> &FormAnswers {
        &self.state
    }

    /// Subscribe to document changes. The receiver starts at the current document.
    pub fn subscribe(&self) -> watch::Receiver<FormAnswers> {
        self.changes.subscribe()
    }

    /// Time of the last successful write to storage in this session.
    pub fn last_saved(&self) -> Option<DateTime<Local>> {
        self.last_saved
    }

    pub fn dispatch(&mut self, action: Action) -> &FormAnswers {
        let kind = action.kind();
        self.state = reduce(&self.state, &action);
        debug!("Dispatched {}", kind);

        self.changes.send_replace(self.state.clone());
        self.persist();
        &self.state
    }

    /// Drop the persisted document and reset to defaults.
    pub fn purge(&mut self) {
        if let Err(e) = self.storage.remove(&self.key) {
            warn!("Failed to remove persisted answers: {e}");
        }
        self.state = FormAnswers::default();
        self.changes.send_replace(self.state.clone());
        info!("Persisted answers purged");
    }

    fn persist(&mut self) {
        let serialized = match serde_json::to_string(&self.state) {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to serialize answers: {e}");
                return;
            }
        };

        match self.storage.set(&self.key, &serialized) {
            Ok(()) => self.last_saved = Some(Local::now()),
            Err(e) => warn!("Failed to persist answers under {:?}: {e}", self.key),
        }
    }
}

fn load(storage: &dyn KeyValueStorage, key: &str) -> persist::Result<Option<FormAnswers>> {
    match storage.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

fn rehydrate(storage: &dyn KeyValueStorage, key: &str) -> FormAnswers {
    match load(storage, key) {
        Ok(Some(answers)) => {
            info!("Rehydrated answers from {:?}", key);
            answers
        }
        Ok(None) => FormAnswers::default(),
        Err(e @ StorageError::Json(_)) => {
            warn!("Discarding undecodable answers under {:?}: {e}", key);
            FormAnswers::default()
        }
        Err(e) => {
            warn!("Failed to read answers under {:?}: {e}", key);
            FormAnswers::default()
        }
    }
}
