use crate::form::{EditSession, FormController};
use crate::language::LanguageRecord;
use crate::storage::KeyValueStorage;
use serde::Serialize;
use std::fmt;

const CONTEST_WARNING: &str = "Warning: it is NOT recommended to change anything while the \
contest is running. Any changes will overwrite the already defined data.";

/// Everything a rendering layer needs to draw the table and the form
#[derive(Debug, Clone, Serialize)]
pub struct ManagerView<'a> {
    pub records: &'a [LanguageRecord],
    pub session: &'a EditSession,
    pub number: u64,
    pub contest_running: bool,
}

impl<'a> ManagerView<'a> {
    pub fn new<S: KeyValueStorage>(form: &'a FormController<S>, contest_running: bool) -> Self {
        Self {
            records: form.store().records(),
            session: form.session(),
            number: form.number_field(),
            contest_running,
        }
    }

    pub fn contest_status(&self) -> &'static str {
        if self.contest_running {
            "Contest running"
        } else {
            "Contest not running"
        }
    }

    /// Render the language table followed by the form state
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ManagerView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Programming Languages ({})", self.contest_status())?;
        f.write_str(&render_table(self.records))?;
        writeln!(f)?;

        match self.session.editing_id {
            Some(id) => writeln!(f, "Editing language #{}", id)?,
            None => writeln!(f, "Adding language #{}", self.number)?,
        }
        writeln!(f, "  Name:      {}", self.session.name_input)?;
        writeln!(f, "  Extension: {}", self.session.extension_input)?;

        if let Some(error) = &self.session.error_message {
            writeln!(f, "Error: {}", error)?;
        }
        if self.contest_running {
            writeln!(f, "{}", CONTEST_WARNING)?;
        }

        Ok(())
    }
}

pub fn render_table(records: &[LanguageRecord]) -> String {
    const HEADERS: [&str; 3] = ["Language #", "Name", "Extension"];

    let rows: Vec<[String; 3]> = records
        .iter()
        .map(|l| [l.id.to_string(), l.name.clone(), l.extension.clone()])
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut push_row = |cells: [&str; 3]| {
        let line = format!(
            "{:<w0$}  {:<w1$}  {}",
            cells[0],
            cells[1],
            cells[2],
            w0 = widths[0],
            w1 = widths[1],
        );
        out.push_str(line.trim_end());
        out.push('\n');
    };

    push_row(HEADERS);
    for row in &rows {
        push_row([&row[0], &row[1], &row[2]]);
    }

    if rows.is_empty() {
        out.push_str("(no languages)\n");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::store::LanguageStore;

    fn controller() -> FormController<MemoryStorage> {
        FormController::new(LanguageStore::load(MemoryStorage::new()).expect("Should load"))
    }

    #[test]
    fn test_render_table_aligns_columns() {
        let records = vec![
            LanguageRecord::new(1, "C", "c"),
            LanguageRecord::new(12, "JavaScript", "js"),
        ];
        let table = render_table(&records);
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines[0], "Language #  Name        Extension");
        assert_eq!(lines[1], "1           C           c");
        assert_eq!(lines[2], "12          JavaScript  js");
    }

    #[test]
    fn test_render_table_empty() {
        let table = render_table(&[]);
        assert!(table.contains("(no languages)"));
    }

    #[test]
    fn test_view_add_mode() {
        let form = controller();
        let view = ManagerView::new(&form, false);
        let rendered = view.render();

        assert_eq!(view.number, 6);
        assert!(rendered.contains("Contest not running"));
        assert!(rendered.contains("Adding language #6"));
        assert!(rendered.contains("Python3"));
        assert!(!rendered.contains("Warning"));
    }

    #[test]
    fn test_view_edit_mode_with_error() {
        let mut form = controller();
        form.begin_edit(2);
        form.set_name_input("");
        form.submit().unwrap();

        let view = ManagerView::new(&form, true);
        let rendered = view.render();

        assert_eq!(view.number, 2);
        assert!(rendered.contains("Editing language #2"));
        assert!(rendered.contains("Error: Language name is required"));
        assert!(rendered.contains("Contest running"));
        assert!(rendered.contains("NOT recommended"));
    }

    #[test]
    fn test_view_serializes_records() {
        let form = controller();
        let view = ManagerView::new(&form, false);
        let json = serde_json::to_value(&view).expect("Should serialize");

        assert_eq!(json["records"].as_array().map(Vec::len), Some(5));
        assert_eq!(json["number"], 6);
        assert_eq!(json["session"]["editing_id"], serde_json::Value::Null);
    }

    #[test]
    fn test_view_serializes_form_inputs() {
        let mut form = controller();
        form.begin_edit(3);
        form.set_name_input("Java17");

        let view = ManagerView::new(&form, false);
        let json = serde_json::to_value(&view).expect("Should serialize");

        assert_eq!(json["session"]["name_input"], "Java17");
        assert_eq!(json["session"]["extension_input"], "java");
        assert_eq!(json["session"]["editing_id"], 3);
        assert_eq!(json["number"], 3);
    }
}
