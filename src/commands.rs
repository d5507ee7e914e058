//! Line commands for the terminal front end.

use crate::form::{FormController, SubmitOutcome};
use crate::storage::KeyValueStorage;
use anyhow::{bail, Context, Result};

pub const HELP: &str = "Commands:
  list              show the languages and the form
  name <text>       set the name field
  ext <text>        set the extension field
  save              add the language, or save the one being edited
  edit <id>         load a language into the form
  delete <id>       delete a language
  clear             reset the form
  help              show this message
  quit              exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Name(String),
    Extension(String),
    Save,
    Edit(u64),
    Delete(u64),
    Clear,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Command> {
        let line = line.trim();
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        match command {
            "list" | "ls" => Ok(Command::List),
            "name" => Ok(Command::Name(arg.to_string())),
            "ext" | "extension" => Ok(Command::Extension(arg.to_string())),
            "save" => Ok(Command::Save),
            "edit" => Ok(Command::Edit(parse_id(arg)?)),
            "delete" | "rm" => Ok(Command::Delete(parse_id(arg)?)),
            "clear" => Ok(Command::Clear),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            "" => bail!("Empty command, type 'help' for usage"),
            other => bail!("Unknown command '{}', type 'help' for usage", other),
        }
    }

    /// Commands after which the table is worth redrawing
    pub fn changes_view(&self) -> bool {
        !matches!(self, Command::Help | Command::Quit)
    }
}

fn parse_id(arg: &str) -> Result<u64> {
    arg.parse()
        .with_context(|| format!("Expected a language number, got '{}'", arg))
}

/// Apply a command to the form, returning a one-line status for the user.
pub fn apply<S: KeyValueStorage>(
    form: &mut FormController<S>,
    command: &Command,
) -> Result<Option<String>> {
    let message = match command {
        Command::List | Command::Quit => None,
        Command::Help => Some(HELP.to_string()),
        Command::Name(value) => {
            form.set_name_input(value.as_str());
            None
        }
        Command::Extension(value) => {
            form.set_extension_input(value.as_str());
            None
        }
        Command::Save => match form.submit()? {
            SubmitOutcome::Added(record) => {
                Some(format!("Added language #{} ({})", record.id, record.name))
            }
            SubmitOutcome::Updated { id, found: true } => Some(format!("Saved language #{}", id)),
            SubmitOutcome::Updated { id, found: false } => {
                Some(format!("Language #{} no longer exists", id))
            }
            // Shown through the form's error line
            SubmitOutcome::Rejected(_) => None,
        },
        Command::Edit(id) => {
            form.begin_edit(*id);
            if form.session().editing_id == Some(*id) {
                None
            } else {
                Some(format!("No language #{}", id))
            }
        }
        Command::Delete(id) => {
            if form.delete(*id)? {
                Some(format!("Deleted language #{}", id))
            } else {
                Some(format!("No language #{}", id))
            }
        }
        Command::Clear => {
            form.clear();
            None
        }
    };

    Ok(message)
}
