use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Grading format used when a record has none.
pub const NOT_GRADED: &str = "notgraded";

/// Kind of course outline item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// A section.
    Chapter,
    /// A subsection.
    Sequential,
    /// A unit.
    Vertical,
    #[default]
    #[serde(other)]
    Other,
}

impl Category {
    /// Human-readable name used in modal messages.
    pub fn label(self) -> &'static str {
        match self {
            Category::Chapter => "section",
            Category::Sequential => "subsection",
            Category::Vertical => "unit",
            Category::Other => "item",
        }
    }
}

#[mutants::skip]
impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Learner-facing visibility of a subsection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Visible,
    HideAfterDue,
    StaffOnly,
}

static ALL_VISIBILITIES: &[Visibility] = &[
    Visibility::Visible,
    Visibility::HideAfterDue,
    Visibility::StaffOnly,
];

impl Visibility {
    /// Returns the wire value for this visibility.
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Visible => "visible",
            Visibility::HideAfterDue => "hide_after_due",
            Visibility::StaffOnly => "staff_only",
        }
    }

    /// Parses a wire value.
    pub fn from_str_value(value: &str) -> Option<Self> {
        Self::all().iter().copied().find(|v| v.as_str() == value)
    }

    /// Returns all visibilities in display order.
    pub fn all() -> &'static [Visibility] {
        ALL_VISIBILITIES
    }
}

/// When learners see whether their answers were correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShowCorrectness {
    #[default]
    Always,
    PastDue,
    Never,
}

static ALL_SHOW_CORRECTNESS: &[ShowCorrectness] = &[
    ShowCorrectness::Always,
    ShowCorrectness::PastDue,
    ShowCorrectness::Never,
];

impl ShowCorrectness {
    /// Returns the wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            ShowCorrectness::Always => "always",
            ShowCorrectness::PastDue => "past_due",
            ShowCorrectness::Never => "never",
        }
    }

    /// Parses a wire value.
    pub fn from_str_value(value: &str) -> Option<Self> {
        Self::all().iter().copied().find(|v| v.as_str() == value)
    }

    /// Returns all values in display order.
    pub fn all() -> &'static [ShowCorrectness] {
        ALL_SHOW_CORRECTNESS
    }
}

/// Special exam configuration of a subsection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExamType {
    #[default]
    None,
    Timed,
    Proctored,
    Practice,
}

impl ExamType {
    /// Returns the form value for this exam type.
    pub fn as_str(self) -> &'static str {
        match self {
            ExamType::None => "no_special_exam",
            ExamType::Timed => "timed_exam",
            ExamType::Proctored => "proctored_exam",
            ExamType::Practice => "practice_exam",
        }
    }

    /// Parses a form value.
    pub fn from_str_value(value: &str) -> Option<Self> {
        [
            ExamType::None,
            ExamType::Timed,
            ExamType::Proctored,
            ExamType::Practice,
        ]
        .into_iter()
        .find(|t| t.as_str() == value)
    }

    /// Returns `(is_time_limited, is_practice_exam, is_proctored_enabled)`.
    pub fn flags(self) -> (bool, bool, bool) {
        match self {
            ExamType::None => (false, false, false),
            ExamType::Timed => (true, false, false),
            ExamType::Proctored => (true, false, true),
            ExamType::Practice => (true, true, true),
        }
    }
}

/// A subsection that may be chosen as a prerequisite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrereqOption {
    pub block_usage_key: String,
    pub block_display_name: String,
}

/// A course outline item as supplied by the read model.
///
/// Editors only read it; every change goes out as a [`Payload`](super::Payload).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct XBlockInfo {
    /// Usage locator of the block.
    pub id: String,
    pub display_name: String,
    pub category: Category,
    pub start: Option<DateTime<Utc>>,
    pub due: Option<DateTime<Utc>>,
    /// Grading format name, if graded.
    pub format: Option<String>,
    /// Assignment types defined by the course grading policy.
    pub course_graders: Vec<String>,
    pub has_explicit_staff_lock: bool,
    pub ancestor_has_staff_lock: bool,
    pub hide_after_due: bool,
    pub show_correctness: Option<ShowCorrectness>,
    pub is_time_limited: bool,
    pub is_proctored_exam: bool,
    pub is_practice_exam: bool,
    pub default_time_limit_minutes: Option<u32>,
    pub exam_review_rules: String,
    /// Absent when prerequisites are not enabled for the course.
    pub is_prereq: Option<bool>,
    pub prereqs: Vec<PrereqOption>,
    pub prereq: Option<String>,
    pub prereq_min_score: Option<u32>,
    pub weight: Option<f64>,
    pub published: bool,
}

impl XBlockInfo {
    /// Creates a record with the given identity and default settings.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            category,
            ..Self::default()
        }
    }

    /// Derived visibility: an explicit staff lock wins over hide-after-due.
    pub fn visibility(&self) -> Visibility {
        if self.has_explicit_staff_lock {
            Visibility::StaffOnly
        } else if self.hide_after_due {
            Visibility::HideAfterDue
        } else {
            Visibility::Visible
        }
    }

    /// Grading format, or [`NOT_GRADED`] when the record has none.
    pub fn grading_format(&self) -> &str {
        self.format.as_deref().unwrap_or(NOT_GRADED)
    }

    /// Show-correctness setting with the default applied.
    pub fn show_correctness_or_default(&self) -> ShowCorrectness {
        self.show_correctness.unwrap_or_default()
    }
}
