use crate::model::Payload;
use crate::tui::widgets::form::Form;

/// Publishes all pending changes of an item. Has no inputs.
#[derive(Debug, Clone)]
pub struct PublishEditor {
    form: Form,
}

impl PublishEditor {
    pub fn render() -> Self {
        Self {
            form: Form::new(Vec::new()),
        }
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    pub fn request_payload(&self) -> Payload {
        Payload::new().with_field("publish", "make_public")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn always_makes_public() {
        let editor = PublishEditor::render();
        assert!(editor.form().fields().is_empty());
        assert_eq!(
            serde_json::to_value(editor.request_payload()).unwrap(),
            json!({"publish": "make_public"})
        );
    }
}
