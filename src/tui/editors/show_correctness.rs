use crate::model::{Payload, ShowCorrectness, XBlockInfo};
use crate::tui::widgets::form::{FieldChoice, Form, FormField};

/// Field index for the show-correctness choice.
const SHOW_CORRECTNESS: usize = 0;

/// When learners see whether their answers were correct.
#[derive(Debug, Clone)]
pub struct ShowCorrectnessEditor {
    form: Form,
    model_value: ShowCorrectness,
}

impl ShowCorrectnessEditor {
    pub fn render(record: &XBlockInfo) -> Self {
        let options = ShowCorrectness::all()
            .iter()
            .map(|sc| {
                let label = match sc {
                    ShowCorrectness::Always => "Always show assessment results",
                    ShowCorrectness::PastDue => {
                        "Show assessment results when subsection is past due"
                    }
                    ShowCorrectness::Never => "Never show assessment results",
                };
                FieldChoice::new(sc.as_str(), label)
            })
            .collect();
        let mut form = Form::new(vec![FormField::choice("Assessment Results Visibility", options)]);
        let model_value = record.show_correctness_or_default();
        form.select(SHOW_CORRECTNESS, model_value.as_str());
        Self { form, model_value }
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    pub fn value(&self) -> ShowCorrectness {
        self.form
            .selected(SHOW_CORRECTNESS)
            .and_then(ShowCorrectness::from_str_value)
            .unwrap_or(self.model_value)
    }

    pub fn request_payload(&self) -> Payload {
        let value = self.value();
        if value == self.model_value {
            return Payload::new();
        }
        Payload::new()
            .with_field("publish", "republish")
            .with_metadata("show_correctness", value.as_str())
    }
}
