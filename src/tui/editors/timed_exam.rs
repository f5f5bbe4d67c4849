//! Special exam editor: none, timed, proctored or practice proctored.

use crate::model::{
    CourseSettings, DEFAULT_TIME_LIMIT, ExamType, Payload, XBlockInfo, minutes_to_time_limit,
    time_limit_to_minutes, validate_time_limit,
};
use crate::tui::widgets::form::{FieldChoice, Form, FormField};

/// Field index for the exam type choice.
const EXAM_TYPE: usize = 0;
/// Field index for the `HH:MM` time limit.
const TIME_LIMIT: usize = 1;
/// Field index for the proctoring review rules.
const REVIEW_RULES: usize = 2;

/// Minutes sent when the time limit cannot be read.
const DEFAULT_TIME_LIMIT_MINUTES: u32 = 30;

/// Configures whether a subsection is a timed or proctored exam.
#[derive(Debug, Clone)]
pub struct TimedExamEditor {
    form: Form,
    proctoring_enabled: bool,
}

impl TimedExamEditor {
    pub fn render(record: &XBlockInfo, settings: &CourseSettings) -> Self {
        let mut options = vec![
            FieldChoice::new(ExamType::None.as_str(), "None"),
            FieldChoice::new(ExamType::Timed.as_str(), "Timed"),
        ];
        if settings.enable_proctored_exams {
            options.push(FieldChoice::new(ExamType::Proctored.as_str(), "Proctored"));
            options.push(FieldChoice::new(
                ExamType::Practice.as_str(),
                "Practice Proctored",
            ));
        }
        let form = Form::new(vec![
            FormField::choice("Set as a Special Exam", options),
            FormField::text("Time Allotted (HH:MM)"),
            FormField::text("Review Rules"),
        ]);
        let mut editor = Self {
            form,
            proctoring_enabled: settings.enable_proctored_exams,
        };
        editor.set_exam_type(record);
        editor.form.set_value(
            TIME_LIMIT,
            minutes_to_time_limit(record.default_time_limit_minutes.unwrap_or(0)),
        );
        editor
            .form
            .set_value(REVIEW_RULES, record.exam_review_rules.as_str());
        editor
    }

    fn set_exam_type(&mut self, record: &XBlockInfo) {
        self.form.set_hidden(TIME_LIMIT, true);
        self.form.set_hidden(REVIEW_RULES, true);

        if !record.is_time_limited {
            self.form.select(EXAM_TYPE, ExamType::None.as_str());
            return;
        }

        self.form.set_hidden(TIME_LIMIT, false);

        if self.proctoring_enabled && record.is_proctored_exam {
            if record.is_practice_exam {
                self.form.select(EXAM_TYPE, ExamType::Practice.as_str());
            } else {
                self.form.select(EXAM_TYPE, ExamType::Proctored.as_str());
                self.form.set_hidden(REVIEW_RULES, false);
            }
        } else {
            self.form.select(EXAM_TYPE, ExamType::Timed.as_str());
        }
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    /// Currently selected exam type.
    pub fn exam_type(&self) -> ExamType {
        self.form
            .selected(EXAM_TYPE)
            .and_then(ExamType::from_str_value)
            .unwrap_or_default()
    }

    /// Shows the inputs that belong to the newly selected exam type.
    pub fn field_changed(&mut self, field: usize) {
        if field != EXAM_TYPE {
            return;
        }
        match self.exam_type() {
            ExamType::None => {
                self.form.set_hidden(TIME_LIMIT, true);
                self.form.set_hidden(REVIEW_RULES, true);
                self.form.set_value(TIME_LIMIT, "00:00");
            }
            ExamType::Timed | ExamType::Practice => self.select_special_exam(false),
            ExamType::Proctored => self.select_special_exam(true),
        }
    }

    fn select_special_exam(&mut self, show_rules: bool) {
        self.form.set_hidden(TIME_LIMIT, false);
        self.coerce_time_limit();
        self.form.set_hidden(REVIEW_RULES, !show_rules);
    }

    /// Leaving the time limit input replaces an invalid value with the default.
    pub fn focus_left(&mut self, field: usize) {
        if field == TIME_LIMIT {
            self.coerce_time_limit();
        }
    }

    fn coerce_time_limit(&mut self) {
        if validate_time_limit(self.form.value(TIME_LIMIT)).is_err() {
            self.form.set_value(TIME_LIMIT, DEFAULT_TIME_LIMIT);
        }
    }

    fn time_limit_minutes(&self) -> u32 {
        time_limit_to_minutes(self.form.value(TIME_LIMIT)).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default time limit");
            DEFAULT_TIME_LIMIT_MINUTES
        })
    }

    /// Always reports the full exam configuration.
    pub fn request_payload(&self) -> Payload {
        let (is_time_limited, is_practice_exam, is_proctored_enabled) = self.exam_type().flags();
        Payload::new()
            .with_metadata("is_practice_exam", is_practice_exam)
            .with_metadata("is_time_limited", is_time_limited)
            .with_metadata("exam_review_rules", self.form.value(REVIEW_RULES))
            .with_metadata("is_proctored_enabled", is_proctored_enabled)
            .with_metadata("default_time_limit_minutes", self.time_limit_minutes())
    }
}
