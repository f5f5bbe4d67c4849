//! Release and due date editors.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::model::{Payload, XBlockInfo, format_date_time, parse_date_time};
use crate::tui::widgets::form::{Form, FormField};

/// Field index for the date input.
const DATE: usize = 0;
/// Field index for the time input.
const TIME: usize = 1;

/// Which record date an editor is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateField {
    Start,
    Due,
}

impl DateField {
    /// Record and payload key.
    pub fn key(self) -> &'static str {
        match self {
            DateField::Start => "start",
            DateField::Due => "due",
        }
    }

    fn read(self, record: &XBlockInfo) -> Option<DateTime<Utc>> {
        match self {
            DateField::Start => record.start,
            DateField::Due => record.due,
        }
    }
}

/// Edits one date of the record and reports it only when it changed.
#[derive(Debug, Clone)]
pub struct DateEditor {
    field: DateField,
    form: Form,
    /// Value read back right after render.
    starting: Option<DateTime<Utc>>,
}

impl DateEditor {
    /// Fills the date and time inputs from the record and snapshots them.
    pub fn render(field: DateField, record: &XBlockInfo) -> Self {
        let mut form = Form::new(vec![
            FormField::text("Date (M/D/YYYY)"),
            FormField::text("Time (HH:MM, UTC)"),
        ]);
        if let Some(value) = field.read(record) {
            let (date, time) = format_date_time(&value);
            form.set_value(DATE, date);
            form.set_value(TIME, time);
        }
        let mut editor = Self {
            field,
            form,
            starting: None,
        };
        editor.starting = editor.value();
        editor
    }

    pub fn field(&self) -> DateField {
        self.field
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    /// Reads the inputs back. Unparseable input reads as the starting value.
    pub fn value(&self) -> Option<DateTime<Utc>> {
        match parse_date_time(self.form.value(DATE), self.form.value(TIME)) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(
                    field = self.field.key(),
                    error = %e,
                    "ignoring unparseable date input"
                );
                self.starting
            }
        }
    }

    /// Empties both inputs.
    pub fn clear(&mut self) {
        self.form.set_value(DATE, "");
        self.form.set_value(TIME, "");
    }

    /// `{metadata: {start|due: value}}` if the value changed, else empty.
    pub fn request_payload(&self) -> Payload {
        let current = self.value();
        if current == self.starting {
            return Payload::new();
        }
        Payload::new().with_metadata(self.field.key(), date_value(current))
    }
}

fn date_value(value: Option<DateTime<Utc>>) -> Value {
    value.map_or(Value::Null, |d| {
        Value::String(d.to_rfc3339_opts(SecondsFormat::Millis, true))
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::model::Category;

    fn subsection_starting(start: Option<DateTime<Utc>>) -> XBlockInfo {
        let mut record = XBlockInfo::new("s1", "Homework", Category::Sequential);
        record.start = start;
        record
    }

    fn retype(editor: &mut DateEditor, index: usize, text: &str) {
        editor.form_mut().set_value(index, text);
    }

    #[test]
    fn render_fills_inputs_from_record() {
        let start = Utc.with_ymd_and_hms(2026, 9, 1, 14, 0, 0).unwrap();
        let editor = DateEditor::render(DateField::Start, &subsection_starting(Some(start)));
        assert_eq!(editor.form().value(DATE), "9/1/2026");
        assert_eq!(editor.form().value(TIME), "14:00");
        assert_eq!(editor.value(), Some(start));
    }

    #[test]
    fn unchanged_release_date_is_empty() {
        let start = Utc.with_ymd_and_hms(2026, 9, 1, 14, 0, 0).unwrap();
        let editor = DateEditor::render(DateField::Start, &subsection_starting(Some(start)));
        assert!(editor.request_payload().is_empty());
    }

    #[test]
    fn retyping_the_same_value_is_unchanged() {
        let start = Utc.with_ymd_and_hms(2026, 9, 1, 14, 0, 0).unwrap();
        let mut editor = DateEditor::render(DateField::Start, &subsection_starting(Some(start)));
        retype(&mut editor, DATE, "09/01/2026");
        assert!(editor.request_payload().is_empty());
    }

    #[test]
    fn changed_release_date_is_reported() {
        let start = Utc.with_ymd_and_hms(2026, 9, 1, 14, 0, 0).unwrap();
        let mut editor = DateEditor::render(DateField::Start, &subsection_starting(Some(start)));
        retype(&mut editor, TIME, "15:30");
        assert_eq!(
            serde_json::to_value(editor.request_payload()).unwrap(),
            json!({"metadata": {"start": "2026-09-01T15:30:00.000Z"}})
        );
    }

    #[test]
    fn setting_a_date_on_an_empty_record() {
        let mut editor = DateEditor::render(DateField::Due, &subsection_starting(None));
        assert!(editor.request_payload().is_empty());
        retype(&mut editor, DATE, "10/15/2026");
        assert_eq!(
            serde_json::to_value(editor.request_payload()).unwrap(),
            json!({"metadata": {"due": "2026-10-15T00:00:00.000Z"}})
        );
    }

    #[test]
    fn clearing_sends_null() {
        let start = Utc.with_ymd_and_hms(2026, 9, 1, 14, 0, 0).unwrap();
        let mut editor = DateEditor::render(DateField::Start, &subsection_starting(Some(start)));
        editor.clear();
        assert_eq!(editor.form().value(DATE), "");
        assert_eq!(
            serde_json::to_value(editor.request_payload()).unwrap(),
            json!({"metadata": {"start": null}})
        );
    }

    #[test]
    fn unparseable_input_counts_as_unchanged() {
        let start = Utc.with_ymd_and_hms(2026, 9, 1, 14, 0, 0).unwrap();
        let mut editor = DateEditor::render(DateField::Start, &subsection_starting(Some(start)));
        retype(&mut editor, DATE, "someday");
        assert_eq!(editor.value(), Some(start));
        assert!(editor.request_payload().is_empty());
    }
}
