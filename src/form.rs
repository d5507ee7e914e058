//! Add/edit form state and the intents that drive the store.

use crate::language::LanguageRecord;
use crate::storage::KeyValueStorage;
use crate::store::{LanguageStore, StoreError};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Input rejected before it reaches the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Language name is required")]
    NameRequired,

    #[error("Extension is required")]
    ExtensionRequired,
}

/// Transient form state; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditSession {
    pub name_input: String,
    pub extension_input: String,
    /// `None` in add mode, the record under edit otherwise
    pub editing_id: Option<u64>,
    pub error_message: Option<String>,
}

impl EditSession {
    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    fn reset_inputs(&mut self) {
        self.name_input.clear();
        self.extension_input.clear();
        self.error_message = None;
    }
}

/// What a `submit` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Added(LanguageRecord),
    /// `found` is false when the record was removed while being edited
    Updated { id: u64, found: bool },
    Rejected(ValidationError),
}

pub struct FormController<S> {
    store: LanguageStore<S>,
    session: EditSession,
}

impl<S: KeyValueStorage> FormController<S> {
    pub fn new(store: LanguageStore<S>) -> Self {
        Self {
            store,
            session: EditSession::default(),
        }
    }

    pub fn store(&self) -> &LanguageStore<S> {
        &self.store
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn into_store(self) -> LanguageStore<S> {
        self.store
    }

    pub fn set_name_input(&mut self, value: impl Into<String>) {
        self.session.name_input = value.into();
    }

    pub fn set_extension_input(&mut self, value: impl Into<String>) {
        self.session.extension_input = value.into();
    }

    /// Value of the read-only "Number" field: the id under edit, or the
    /// id the next add will receive.
    pub fn number_field(&self) -> u64 {
        self.session
            .editing_id
            .unwrap_or_else(|| self.store.next_id())
    }

    /// Validate the inputs and save them as a new or edited language.
    ///
    /// Validation failures are reported through `error_message` and the
    /// returned `SubmitOutcome::Rejected`; only storage failures are `Err`.
    pub fn submit(&mut self) -> Result<SubmitOutcome, StoreError> {
        let name = self.session.name_input.trim().to_string();
        let extension = self.session.extension_input.trim().to_string();

        if let Err(e) = validate(&name, &extension) {
            debug!("Submit rejected: {}", e);
            self.session.error_message = Some(e.to_string());
            return Ok(SubmitOutcome::Rejected(e));
        }

        let outcome = match self.session.editing_id {
            Some(id) => {
                let found = self.store.update(id, &name, &extension)?;
                self.session.editing_id = None;
                SubmitOutcome::Updated { id, found }
            }
            None => SubmitOutcome::Added(self.store.add(&name, &extension)?),
        };

        self.session.reset_inputs();
        Ok(outcome)
    }

    /// Load a record into the form for editing. Unknown ids are ignored.
    pub fn begin_edit(&mut self, id: u64) {
        let Some(record) = self.store.find_by_id(id) else {
            debug!("Edit ignored: no language with id {}", id);
            return;
        };

        self.session.name_input = record.name.clone();
        self.session.extension_input = record.extension.clone();
        self.session.editing_id = Some(id);
        self.session.error_message = None;
    }

    /// Remove a record. If it was the one under edit, the form is reset
    /// so it cannot save into a vanished id.
    pub fn delete(&mut self, id: u64) -> Result<bool, StoreError> {
        let found = self.store.remove(id)?;

        if self.session.editing_id == Some(id) {
            debug!("Deleted language {} while editing it, resetting form", id);
            self.clear();
        }

        Ok(found)
    }

    pub fn clear(&mut self) {
        self.session = EditSession::default();
    }
}

fn validate(name: &str, extension: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::NameRequired);
    }
    if extension.is_empty() {
        return Err(ValidationError::ExtensionRequired);
    }
    Ok(())
}
