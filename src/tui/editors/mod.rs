//! Settings editors. Each editor owns a form bound to one facet of a record
//! and contributes a partial update when the modal saves.

mod access;
mod date;
mod grading;
mod publish;
mod show_correctness;
mod timed_exam;
mod visibility;
mod weight;

pub use access::AccessEditor;
pub use date::{DateEditor, DateField};
pub use grading::GradingEditor;
pub use publish::PublishEditor;
pub use show_correctness::ShowCorrectnessEditor;
pub use timed_exam::TimedExamEditor;
pub use visibility::{ContentVisibilityEditor, StaffLockEditor};
pub use weight::WeightEditor;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

use crate::model::{CourseSettings, Payload, XBlockInfo};
use crate::tui::widgets::form::{Form, draw_form};

/// The editors a modal can be composed of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorKind {
    ReleaseDate,
    DueDate,
    Grading,
    TimedExam,
    Access,
    StaffLock,
    ContentVisibility,
    ShowCorrectness,
    Weight,
    Publish,
}

impl EditorKind {
    pub fn title(self) -> &'static str {
        match self {
            EditorKind::ReleaseDate => "Release Date and Time",
            EditorKind::DueDate => "Due Date and Time",
            EditorKind::Grading => "Grading",
            EditorKind::TimedExam => "Special Exam",
            EditorKind::Access => "Prerequisites",
            EditorKind::StaffLock => "Visibility",
            EditorKind::ContentVisibility => "Subsection Visibility",
            EditorKind::ShowCorrectness => "Assessment Results Visibility",
            EditorKind::Weight => "Problem Weight",
            EditorKind::Publish => "Publish",
        }
    }

    /// Release and due dates; omitted in self-paced courses.
    pub fn is_schedule(self) -> bool {
        matches!(self, EditorKind::ReleaseDate | EditorKind::DueDate)
    }

    /// Instantiates the editor bound to `record`.
    pub fn render(self, record: &XBlockInfo, settings: &CourseSettings) -> Editor {
        match self {
            EditorKind::ReleaseDate => {
                Editor::ReleaseDate(DateEditor::render(DateField::Start, record))
            }
            EditorKind::DueDate => Editor::DueDate(DateEditor::render(DateField::Due, record)),
            EditorKind::Grading => Editor::Grading(GradingEditor::render(record)),
            EditorKind::TimedExam => Editor::TimedExam(TimedExamEditor::render(record, settings)),
            EditorKind::Access => Editor::Access(AccessEditor::render(record)),
            EditorKind::StaffLock => Editor::StaffLock(StaffLockEditor::render(record)),
            EditorKind::ContentVisibility => {
                Editor::ContentVisibility(ContentVisibilityEditor::render(record, settings))
            }
            EditorKind::ShowCorrectness => {
                Editor::ShowCorrectness(ShowCorrectnessEditor::render(record))
            }
            EditorKind::Weight => Editor::Weight(WeightEditor::render(record)),
            EditorKind::Publish => Editor::Publish(PublishEditor::render()),
        }
    }
}

/// What an editor asks of its modal after a field changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorSignal {
    #[default]
    None,
    DisableSave,
    EnableSave,
}

/// A rendered editor instance.
#[derive(Debug, Clone)]
pub enum Editor {
    ReleaseDate(DateEditor),
    DueDate(DateEditor),
    Grading(GradingEditor),
    TimedExam(TimedExamEditor),
    Access(AccessEditor),
    StaffLock(StaffLockEditor),
    ContentVisibility(ContentVisibilityEditor),
    ShowCorrectness(ShowCorrectnessEditor),
    Weight(WeightEditor),
    Publish(PublishEditor),
}

impl Editor {
    pub fn kind(&self) -> EditorKind {
        match self {
            Editor::ReleaseDate(_) => EditorKind::ReleaseDate,
            Editor::DueDate(_) => EditorKind::DueDate,
            Editor::Grading(_) => EditorKind::Grading,
            Editor::TimedExam(_) => EditorKind::TimedExam,
            Editor::Access(_) => EditorKind::Access,
            Editor::StaffLock(_) => EditorKind::StaffLock,
            Editor::ContentVisibility(_) => EditorKind::ContentVisibility,
            Editor::ShowCorrectness(_) => EditorKind::ShowCorrectness,
            Editor::Weight(_) => EditorKind::Weight,
            Editor::Publish(_) => EditorKind::Publish,
        }
    }

    pub fn title(&self) -> &'static str {
        self.kind().title()
    }

    pub fn form(&self) -> &Form {
        match self {
            Editor::ReleaseDate(e) | Editor::DueDate(e) => e.form(),
            Editor::Grading(e) => e.form(),
            Editor::TimedExam(e) => e.form(),
            Editor::Access(e) => e.form(),
            Editor::StaffLock(e) => e.form(),
            Editor::ContentVisibility(e) => e.form(),
            Editor::ShowCorrectness(e) => e.form(),
            Editor::Weight(e) => e.form(),
            Editor::Publish(e) => e.form(),
        }
    }

    pub fn form_mut(&mut self) -> &mut Form {
        match self {
            Editor::ReleaseDate(e) | Editor::DueDate(e) => e.form_mut(),
            Editor::Grading(e) => e.form_mut(),
            Editor::TimedExam(e) => e.form_mut(),
            Editor::Access(e) => e.form_mut(),
            Editor::StaffLock(e) => e.form_mut(),
            Editor::ContentVisibility(e) => e.form_mut(),
            Editor::ShowCorrectness(e) => e.form_mut(),
            Editor::Weight(e) => e.form_mut(),
            Editor::Publish(e) => e.form_mut(),
        }
    }

    /// This editor's share of the update; empty when it has nothing to change.
    pub fn request_payload(&self) -> Payload {
        match self {
            Editor::ReleaseDate(e) | Editor::DueDate(e) => e.request_payload(),
            Editor::Grading(e) => e.request_payload(),
            Editor::TimedExam(e) => e.request_payload(),
            Editor::Access(e) => e.request_payload(),
            Editor::StaffLock(e) => e.request_payload(),
            Editor::ContentVisibility(e) => e.request_payload(),
            Editor::ShowCorrectness(e) => e.request_payload(),
            Editor::Weight(e) => e.request_payload(),
            Editor::Publish(e) => e.request_payload(),
        }
    }

    /// Called after the user edited `field` of this editor's form.
    pub fn field_changed(&mut self, field: usize) -> EditorSignal {
        match self {
            Editor::TimedExam(e) => {
                e.field_changed(field);
                EditorSignal::None
            }
            Editor::Access(e) => e.field_changed(field),
            Editor::ContentVisibility(e) => {
                e.field_changed(field);
                EditorSignal::None
            }
            _ => EditorSignal::None,
        }
    }

    /// Called when focus leaves `field` of this editor's form.
    pub fn focus_left(&mut self, field: usize) {
        if let Editor::TimedExam(e) = self {
            e.focus_left(field);
        }
    }

    /// Empties the editor's inputs, if it supports clearing.
    pub fn clear(&mut self) -> bool {
        match self {
            Editor::ReleaseDate(e) | Editor::DueDate(e) => {
                e.clear();
                true
            }
            Editor::Weight(e) => {
                e.clear();
                true
            }
            _ => false,
        }
    }
}

/// Renders an editor as a titled block around its form.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_editor(editor: &Editor, active: bool, frame: &mut Frame, area: Rect) {
    let title_style = if active {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let block = Block::default()
        .title(editor.title())
        .title_style(title_style)
        .borders(Borders::TOP);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    draw_form(editor.form(), active, frame, inner);
}

/// Rows [`draw_editor`] needs for `editor`.
pub fn editor_height(editor: &Editor) -> u16 {
    editor.form().height() + 1
}
