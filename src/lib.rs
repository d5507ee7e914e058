//! Programming-language list editor.
//!
//! The crate keeps a list of `(name, extension)` pairs in a key-value
//! storage backend and exposes a small form controller that validates
//! user input before handing it to the store.
//!
//! - `storage`: the `KeyValueStorage` trait and its memory/file backends
//! - `language`: the persisted `LanguageRecord` type and seeded defaults
//! - `store`: `LanguageStore`, the list plus id allocator
//! - `form`: `FormController` and its `EditSession`
//! - `view`: read-only snapshot and plain-text rendering
//! - `commands`: line commands for the terminal front end
//! - `config`: environment-driven settings for the binary

pub mod commands;
pub mod config;
pub mod form;
pub mod language;
pub mod storage;
pub mod store;
pub mod view;

pub use form::{EditSession, FormController, SubmitOutcome, ValidationError};
pub use language::LanguageRecord;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use store::{LanguageStore, StoreError, STORAGE_KEY};
