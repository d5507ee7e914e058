use anyhow::{bail, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Storage
    pub languages_file: PathBuf,

    // Contest
    pub contest_running: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Storage - JSON file standing in for browser local storage
            languages_file: std::env::var("LANGUAGES_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/languages.json")),

            // Contest - only changes the warnings shown
            contest_running: match std::env::var("CONTEST_RUNNING") {
                Ok(v) => parse_flag(&v)?,
                Err(_) => false,
            },
        })
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("CONTEST_RUNNING must be a boolean, got '{}'", other),
    }
}
