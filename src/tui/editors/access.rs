use crate::model::{Payload, XBlockInfo, validate_min_score};
use crate::tui::widgets::form::{FieldChoice, Form, FormField};

use super::EditorSignal;

/// Field index for the "is a prerequisite" checkbox.
const IS_PREREQ: usize = 0;
/// Field index for the prerequisite choice.
const PREREQ: usize = 1;
/// Field index for the minimum score input.
const MIN_SCORE: usize = 2;

/// Prerequisite settings of a subsection.
#[derive(Debug, Clone)]
pub struct AccessEditor {
    form: Form,
}

impl AccessEditor {
    pub fn render(record: &XBlockInfo) -> Self {
        let options = std::iter::once(FieldChoice::new("", "No prerequisite"))
            .chain(record.prereqs.iter().map(|p| {
                FieldChoice::new(p.block_usage_key.as_str(), p.block_display_name.as_str())
            }))
            .collect();
        let mut form = Form::new(vec![
            FormField::checkbox("Make this subsection available as a prerequisite"),
            FormField::choice("Limit access to", options),
            FormField::text("Minimum Score (%)"),
        ]);
        form.set_checked(IS_PREREQ, record.is_prereq.unwrap_or(false));
        let prereq = record.prereq.as_deref().unwrap_or("");
        if !form.select(PREREQ, prereq) {
            form.select(PREREQ, "");
        }
        form.set_value(
            MIN_SCORE,
            record
                .prereq_min_score
                .map(|score| score.to_string())
                .unwrap_or_default(),
        );
        let mut editor = Self { form };
        editor.toggle_min_score();
        editor
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    fn prereq(&self) -> &str {
        self.form.selected(PREREQ).unwrap_or("")
    }

    fn toggle_min_score(&mut self) {
        let hidden = self.prereq().is_empty();
        self.form.set_hidden(MIN_SCORE, hidden);
    }

    /// Re-validates the minimum score on every change to it; an invalid score
    /// disables the modal's save action until corrected.
    pub fn field_changed(&mut self, field: usize) -> EditorSignal {
        match field {
            PREREQ => {
                self.toggle_min_score();
                EditorSignal::None
            }
            MIN_SCORE => match validate_min_score(self.form.value(MIN_SCORE)) {
                Ok(_) => {
                    self.form.clear_error(MIN_SCORE);
                    EditorSignal::EnableSave
                }
                Err(e) => {
                    self.form.set_error(MIN_SCORE, e.to_string());
                    EditorSignal::DisableSave
                }
            },
            _ => EditorSignal::None,
        }
    }

    /// Always reports the prerequisite settings.
    pub fn request_payload(&self) -> Payload {
        Payload::new()
            .with_field("isPrereq", self.form.is_checked(IS_PREREQ))
            .with_field("prereqUsageKey", self.prereq())
            .with_field("prereqMinScore", self.form.value(MIN_SCORE).trim())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::{Category, PrereqOption};

    fn gated_subsection() -> XBlockInfo {
        let mut record = XBlockInfo::new("s2", "Quiz 2", Category::Sequential);
        record.is_prereq = Some(false);
        record.prereqs = vec![PrereqOption {
            block_usage_key: "s1".into(),
            block_display_name: "Quiz 1".into(),
        }];
        record
    }

    fn type_min_score(editor: &mut AccessEditor, text: &str) -> EditorSignal {
        editor.form_mut().set_value(MIN_SCORE, text);
        editor.field_changed(MIN_SCORE)
    }

    #[test]
    fn min_score_hidden_without_prereq() {
        let editor = AccessEditor::render(&gated_subsection());
        assert!(editor.form().fields()[MIN_SCORE].hidden);
    }

    #[test]
    fn render_selects_record_prereq() {
        let mut record = gated_subsection();
        record.prereq = Some("s1".into());
        record.prereq_min_score = Some(80);
        let editor = AccessEditor::render(&record);
        assert_eq!(editor.form().selected(PREREQ), Some("s1"));
        assert_eq!(editor.form().value(MIN_SCORE), "80");
        assert!(!editor.form().fields()[MIN_SCORE].hidden);
    }

    #[test]
    fn choosing_prereq_shows_min_score() {
        let mut editor = AccessEditor::render(&gated_subsection());
        editor.form_mut().select(PREREQ, "s1");
        assert_eq!(editor.field_changed(PREREQ), EditorSignal::None);
        assert!(!editor.form().fields()[MIN_SCORE].hidden);
    }

    #[test]
    fn invalid_min_score_disables_save() {
        let mut editor = AccessEditor::render(&gated_subsection());
        for bad in ["-1", "101", "12.5", "abc"] {
            assert_eq!(type_min_score(&mut editor, bad), EditorSignal::DisableSave);
            assert!(editor.form().fields()[MIN_SCORE].error.is_some());
        }
    }

    #[test]
    fn correcting_min_score_enables_save() {
        let mut editor = AccessEditor::render(&gated_subsection());
        type_min_score(&mut editor, "101");
        assert_eq!(type_min_score(&mut editor, "100"), EditorSignal::EnableSave);
        assert!(editor.form().fields()[MIN_SCORE].error.is_none());
    }

    #[test]
    fn empty_min_score_is_valid() {
        let mut editor = AccessEditor::render(&gated_subsection());
        assert_eq!(type_min_score(&mut editor, ""), EditorSignal::EnableSave);
    }

    #[test]
    fn payload_reports_all_fields() {
        let mut editor = AccessEditor::render(&gated_subsection());
        editor.form_mut().set_checked(IS_PREREQ, true);
        editor.form_mut().select(PREREQ, "s1");
        type_min_score(&mut editor, " 75 ");
        assert_eq!(
            serde_json::to_value(editor.request_payload()).unwrap(),
            json!({"isPrereq": true, "prereqUsageKey": "s1", "prereqMinScore": "75"})
        );
    }
}
