use serde::{Deserialize, Serialize};

/// A programming language offered to contestants.
///
/// Serialized as `{"id": 1, "name": "C", "extension": "c"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageRecord {
    pub id: u64,
    pub name: String,
    /// File-extension token without the leading dot (e.g. "py3")
    pub extension: String,
}

impl LanguageRecord {
    pub fn new(id: u64, name: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            extension: extension.into(),
        }
    }
}

/// Languages written to storage the first time nothing is found there.
pub fn default_languages() -> Vec<LanguageRecord> {
    vec![
        LanguageRecord::new(1, "C", "c"),
        LanguageRecord::new(2, "C++11", "cc"),
        LanguageRecord::new(3, "Java", "java"),
        LanguageRecord::new(4, "Python2", "py2"),
        LanguageRecord::new(5, "Python3", "py3"),
    ]
}
