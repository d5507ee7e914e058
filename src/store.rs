use crate::language::{default_languages, LanguageRecord};
use crate::storage::{KeyValueStorage, StorageError};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Storage key holding the serialized language list
pub const STORAGE_KEY: &str = "programmingLanguages";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Persisted value under '{key}' is not a valid language list")]
    Malformed {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Persisted value under '{key}' repeats language id {id}")]
    DuplicateId { key: &'static str, id: u64 },

    #[error("No language ids left after {last}")]
    IdsExhausted { last: u64 },
}

/// Authoritative language list and id allocator.
///
/// Every successful mutation rewrites the whole list under `STORAGE_KEY`.
/// A mutation whose write fails leaves both the list and the allocator
/// as they were.
#[derive(Debug)]
pub struct LanguageStore<S> {
    storage: S,
    languages: Vec<LanguageRecord>,
    next_id: u64,
}

impl<S: KeyValueStorage> LanguageStore<S> {
    /// Load the list from storage, seeding and persisting the defaults
    /// when nothing has been stored yet.
    pub fn load(mut storage: S) -> Result<Self, StoreError> {
        let languages = match storage.get(STORAGE_KEY)? {
            Some(raw) => {
                let languages: Vec<LanguageRecord> = serde_json::from_str(&raw)
                    .map_err(|source| StoreError::Malformed {
                        key: STORAGE_KEY,
                        source,
                    })?;
                check_unique_ids(&languages)?;
                info!("Loaded {} languages from storage", languages.len());
                languages
            }
            None => {
                let languages = default_languages();
                write_list(&mut storage, &languages)?;
                info!("No stored languages, seeded {} defaults", languages.len());
                languages
            }
        };

        let next_id = next_id_after(&languages)?;
        debug!("Next language id is {}", next_id);

        Ok(Self {
            storage,
            languages,
            next_id,
        })
    }

    /// Append a new language under the next id.
    ///
    /// Inputs are stored as given; blank checks belong to the caller.
    pub fn add(&mut self, name: &str, extension: &str) -> Result<LanguageRecord, StoreError> {
        let following = self
            .next_id
            .checked_add(1)
            .ok_or(StoreError::IdsExhausted { last: self.next_id })?;

        let record = LanguageRecord::new(self.next_id, name, extension);
        let mut candidate = self.languages.clone();
        candidate.push(record.clone());
        self.commit(candidate)?;
        self.next_id = following;

        debug!("Added language {} ({}, .{})", record.id, record.name, record.extension);
        Ok(record)
    }

    /// Replace the name and extension of `id` in place.
    ///
    /// Returns `Ok(false)` without touching storage when `id` is unknown.
    pub fn update(&mut self, id: u64, name: &str, extension: &str) -> Result<bool, StoreError> {
        let Some(index) = self.languages.iter().position(|l| l.id == id) else {
            warn!("Update ignored: no language with id {}", id);
            return Ok(false);
        };

        let mut candidate = self.languages.clone();
        candidate[index].name = name.to_string();
        candidate[index].extension = extension.to_string();
        self.commit(candidate)?;

        debug!("Updated language {}", id);
        Ok(true)
    }

    /// Remove the language with `id`, returning whether one was found.
    ///
    /// The allocator is never rolled back, so a removed id is not handed
    /// out again. Removing the last language persists an empty list.
    pub fn remove(&mut self, id: u64) -> Result<bool, StoreError> {
        let candidate: Vec<LanguageRecord> = self
            .languages
            .iter()
            .filter(|l| l.id != id)
            .cloned()
            .collect();

        if candidate.len() == self.languages.len() {
            warn!("Remove ignored: no language with id {}", id);
            return Ok(false);
        }

        self.commit(candidate)?;
        debug!("Removed language {} ({} left)", id, self.languages.len());
        Ok(true)
    }

    pub fn find_by_id(&self, id: u64) -> Option<&LanguageRecord> {
        self.languages.iter().find(|l| l.id == id)
    }

    /// Languages in insertion order
    pub fn records(&self) -> &[LanguageRecord] {
        &self.languages
    }

    /// Id the next `add` will assign
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Write `candidate` and only then make it the current list
    fn commit(&mut self, candidate: Vec<LanguageRecord>) -> Result<(), StoreError> {
        write_list(&mut self.storage, &candidate)?;
        self.languages = candidate;
        Ok(())
    }
}

fn write_list<S: KeyValueStorage>(
    storage: &mut S,
    languages: &[LanguageRecord],
) -> Result<(), StoreError> {
    let list: Vec<Value> = languages
        .iter()
        .map(|l| json!({ "id": l.id, "name": l.name, "extension": l.extension }))
        .collect();

    storage.set(STORAGE_KEY, Value::Array(list).to_string())?;
    Ok(())
}

fn check_unique_ids(languages: &[LanguageRecord]) -> Result<(), StoreError> {
    let mut seen = std::collections::HashSet::new();
    match languages.iter().find(|l| !seen.insert(l.id)) {
        Some(duplicate) => Err(StoreError::DuplicateId {
            key: STORAGE_KEY,
            id: duplicate.id,
        }),
        None => Ok(()),
    }
}

/// `max(id) + 1`, or 1 for an empty list
fn next_id_after(languages: &[LanguageRecord]) -> Result<u64, StoreError> {
    let last = languages.iter().map(|l| l.id).max().unwrap_or(0);
    last.checked_add(1).ok_or(StoreError::IdsExhausted { last })
}
