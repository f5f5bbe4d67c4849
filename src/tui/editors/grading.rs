use crate::model::{NOT_GRADED, Payload, XBlockInfo};
use crate::tui::widgets::form::{FieldChoice, Form, FormField};

/// Field index for the grading format choice.
const GRADING_TYPE: usize = 0;

/// Picks the assignment type a subsection is graded as.
#[derive(Debug, Clone)]
pub struct GradingEditor {
    form: Form,
}

impl GradingEditor {
    pub fn render(record: &XBlockInfo) -> Self {
        let options = std::iter::once(FieldChoice::new(NOT_GRADED, "Not Graded"))
            .chain(
                record
                    .course_graders
                    .iter()
                    .filter(|grader| grader.as_str() != NOT_GRADED)
                    .map(|grader| FieldChoice::new(grader.as_str(), grader.as_str())),
            )
            .collect();
        let mut form = Form::new(vec![FormField::choice("Grade as", options)]);
        if !form.select(GRADING_TYPE, record.grading_format()) {
            form.select(GRADING_TYPE, NOT_GRADED);
        }
        Self { form }
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    pub fn value(&self) -> &str {
        self.form.selected(GRADING_TYPE).unwrap_or(NOT_GRADED)
    }

    /// Always reports the selected format.
    pub fn request_payload(&self) -> Payload {
        Payload::new().with_field("graderType", self.value())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::Category;

    fn graded_subsection(format: Option<&str>) -> XBlockInfo {
        let mut record = XBlockInfo::new("s1", "Homework", Category::Sequential);
        record.course_graders = vec!["Homework".into(), "Exam".into()];
        record.format = format.map(str::to_string);
        record
    }

    #[test]
    fn defaults_to_not_graded() {
        let editor = GradingEditor::render(&graded_subsection(None));
        assert_eq!(editor.value(), NOT_GRADED);
        assert_eq!(
            serde_json::to_value(editor.request_payload()).unwrap(),
            json!({"graderType": "notgraded"})
        );
    }

    #[test]
    fn selects_record_format() {
        let editor = GradingEditor::render(&graded_subsection(Some("Exam")));
        assert_eq!(editor.value(), "Exam");
    }

    #[test]
    fn unknown_format_falls_back_to_not_graded() {
        let editor = GradingEditor::render(&graded_subsection(Some("Lab")));
        assert_eq!(editor.value(), NOT_GRADED);
    }

    #[test]
    fn reports_even_when_unchanged() {
        let editor = GradingEditor::render(&graded_subsection(Some("Homework")));
        assert_eq!(
            editor.request_payload().get("graderType"),
            Some(&json!("Homework"))
        );
    }

    #[test]
    fn reports_user_choice() {
        let mut editor = GradingEditor::render(&graded_subsection(None));
        editor.form_mut().set_focus(GRADING_TYPE);
        editor.form_mut().cycle_choice(true);
        assert_eq!(editor.value(), "Homework");
    }
}
