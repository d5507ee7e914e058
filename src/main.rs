use anyhow::{Context, Result};
use language_manager::commands::{self, Command};
use language_manager::config::Config;
use language_manager::view::ManagerView;
use language_manager::{FileStorage, FormController, LanguageStore};
use std::io::{self, BufRead, Write};
use tracing::{info, warn};

fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging on stderr so the table on stdout stays clean
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("language_manager=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    info!("Using language storage at {}", config.languages_file.display());

    let storage = FileStorage::new(&config.languages_file);
    let store = LanguageStore::load(storage).with_context(|| {
        format!(
            "Failed to load languages from {}",
            config.languages_file.display()
        )
    })?;
    let mut form = FormController::new(store);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    writeln!(stdout, "{}", ManagerView::new(&form, config.contest_running).render())?;
    writeln!(stdout, "Type 'help' for commands.")?;

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                writeln!(stdout, "{}", e)?;
                continue;
            }
        };

        match commands::apply(&mut form, &command) {
            Ok(Some(message)) => writeln!(stdout, "{}", message)?,
            Ok(None) => {}
            Err(e) => {
                warn!("Command failed: {:#}", e);
                writeln!(stdout, "Error: {:#}", e)?;
            }
        }

        if command == Command::Quit {
            break;
        }
        if command.changes_view() {
            writeln!(stdout, "{}", ManagerView::new(&form, config.contest_running).render())?;
        }
    }

    info!("Exiting with {} languages stored", form.store().len());
    Ok(())
}
