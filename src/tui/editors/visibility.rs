//! Staff lock and content visibility editors.

use serde_json::Value;

use crate::model::{CourseSettings, Payload, Visibility, XBlockInfo};
use crate::tui::widgets::form::{FieldChoice, Form, FormField};

/// Field index for the staff lock checkbox.
const LOCK: usize = 0;
/// Field index for the visibility choice.
const VISIBILITY: usize = 0;

const PUBLISH: &str = "publish";
const REPUBLISH: &str = "republish";

const ANCESTOR_LOCKED_HINT: &str = "A parent is already hidden from learners";
const UNLOCK_WARNING: &str =
    "Learners will see this content once it is released and published";

/// `true` for set, `null` for cleared.
fn flag(set: bool) -> Value {
    if set { Value::Bool(true) } else { Value::Null }
}

/// Hides an item from learners via an explicit staff lock.
#[derive(Debug, Clone)]
pub struct StaffLockEditor {
    form: Form,
    model_locked: bool,
}

impl StaffLockEditor {
    pub fn render(record: &XBlockInfo) -> Self {
        let mut form = Form::new(vec![FormField::checkbox("Hide from learners")]);
        form.set_checked(LOCK, record.has_explicit_staff_lock);
        if record.ancestor_has_staff_lock {
            form.set_hint(LOCK, Some(ANCESTOR_LOCKED_HINT.to_string()));
        }
        Self {
            form,
            model_locked: record.has_explicit_staff_lock,
        }
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    pub fn is_locked(&self) -> bool {
        self.form.is_checked(LOCK)
    }

    pub fn has_changes(&self) -> bool {
        self.model_locked != self.is_locked()
    }

    /// Republishes with the new lock; unlocking sends `null`, never `false`.
    pub fn request_payload(&self) -> Payload {
        if !self.has_changes() {
            return Payload::new();
        }
        Payload::new()
            .with_field(PUBLISH, REPUBLISH)
            .with_metadata("visible_to_staff_only", flag(self.is_locked()))
    }
}

/// Chooses between visible, hidden after due, and staff only.
#[derive(Debug, Clone)]
pub struct ContentVisibilityEditor {
    form: Form,
    model_visibility: Visibility,
    /// The record carries its own lock rather than inheriting one.
    explicitly_locked: bool,
}

impl ContentVisibilityEditor {
    pub fn render(record: &XBlockInfo, settings: &CourseSettings) -> Self {
        let hide_label = if settings.self_paced {
            "Hide content after course end date"
        } else {
            "Hide content after due date"
        };
        let options = Visibility::all()
            .iter()
            .map(|v| {
                let label = match v {
                    Visibility::Visible => "Show entire subsection",
                    Visibility::HideAfterDue => hide_label,
                    Visibility::StaffOnly => "Hide entire subsection",
                };
                FieldChoice::new(v.as_str(), label)
            })
            .collect();
        let mut form = Form::new(vec![FormField::choice("Subsection Visibility", options)]);
        let model_visibility = record.visibility();
        form.select(VISIBILITY, model_visibility.as_str());
        let mut editor = Self {
            form,
            model_visibility,
            explicitly_locked: record.has_explicit_staff_lock && !record.ancestor_has_staff_lock,
        };
        editor.toggle_unlock_warning();
        editor
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    /// Visibility derived from the record at render time.
    pub fn model_visibility(&self) -> Visibility {
        self.model_visibility
    }

    pub fn current_visibility(&self) -> Visibility {
        self.form
            .selected(VISIBILITY)
            .and_then(Visibility::from_str_value)
            .unwrap_or(self.model_visibility)
    }

    pub fn has_changes(&self) -> bool {
        self.model_visibility != self.current_visibility()
    }

    pub fn field_changed(&mut self, field: usize) {
        if field == VISIBILITY {
            self.toggle_unlock_warning();
        }
    }

    fn toggle_unlock_warning(&mut self) {
        let warn = self.explicitly_locked && self.current_visibility() != Visibility::StaffOnly;
        self.form
            .set_hint(VISIBILITY, warn.then(|| UNLOCK_WARNING.to_string()));
    }

    /// Republishes with exactly one of the two flags set, or neither.
    pub fn request_payload(&self) -> Payload {
        if !self.has_changes() {
            return Payload::new();
        }
        let current = self.current_visibility();
        Payload::new()
            .with_field(PUBLISH, REPUBLISH)
            .with_metadata(
                "visible_to_staff_only",
                flag(current == Visibility::StaffOnly),
            )
            .with_metadata("hide_after_due", flag(current == Visibility::HideAfterDue))
    }
}
