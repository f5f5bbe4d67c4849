use crate::model::{Payload, XBlockInfo};
use crate::tui::widgets::form::{Form, FormField};

/// Field index for the weight input.
const WEIGHT: usize = 0;

/// Problem weight of a unit. Always reported, changed or not.
#[derive(Debug, Clone)]
pub struct WeightEditor {
    form: Form,
}

impl WeightEditor {
    pub fn render(record: &XBlockInfo) -> Self {
        let mut form = Form::new(vec![FormField::text("Weight")]);
        if let Some(weight) = record.weight {
            form.set_value(WEIGHT, weight.to_string());
        }
        Self { form }
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    pub fn clear(&mut self) {
        self.form.set_value(WEIGHT, "");
    }

    pub fn request_payload(&self) -> Payload {
        Payload::new().with_metadata("weight", self.form.value(WEIGHT))
    }
}
