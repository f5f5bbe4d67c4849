//! Which editors a modal shows for a given record, grouped into tabs.

use crate::model::{Category, CourseSettings, XBlockInfo};
use crate::tui::editors::EditorKind;

/// The two modals an outline item can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalKind {
    /// Item settings.
    Edit,
    /// Publish pending changes.
    Publish,
}

/// A named group of editors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabLayout {
    pub name: &'static str,
    pub display_name: &'static str,
    pub editors: Vec<EditorKind>,
}

impl TabLayout {
    fn new(name: &'static str, display_name: &'static str, editors: Vec<EditorKind>) -> Self {
        Self {
            name,
            display_name,
            editors,
        }
    }

    /// The single unnamed group of a modal without a tab bar.
    fn untitled(editors: Vec<EditorKind>) -> Self {
        Self::new("settings", "Settings", editors)
    }
}

/// Editor descriptors for one modal open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalLayout {
    pub kind: ModalKind,
    pub tabs: Vec<TabLayout>,
}

impl ModalLayout {
    /// Settings layout for `record`'s category.
    ///
    /// Self-paced courses have no release or due dates, so those editors are
    /// dropped from every tab.
    pub fn edit(record: &XBlockInfo, settings: &CourseSettings) -> Self {
        let mut tabs = match record.category {
            Category::Vertical => vec![TabLayout::untitled(vec![
                EditorKind::DueDate,
                EditorKind::Weight,
                EditorKind::StaffLock,
            ])],
            Category::Chapter => vec![
                TabLayout::new("basic", "Basic", vec![EditorKind::ReleaseDate]),
                TabLayout::new("visibility", "Visibility", vec![EditorKind::StaffLock]),
            ],
            Category::Sequential => {
                let mut tabs = vec![
                    TabLayout::new(
                        "basic",
                        "Basic",
                        vec![EditorKind::ReleaseDate, EditorKind::Grading],
                    ),
                    TabLayout::new(
                        "visibility",
                        "Visibility",
                        vec![EditorKind::ContentVisibility, EditorKind::ShowCorrectness],
                    ),
                ];
                let mut advanced = Vec::new();
                if settings.special_exams_enabled() {
                    advanced.push(EditorKind::TimedExam);
                }
                if record.is_prereq.is_some() {
                    advanced.push(EditorKind::Access);
                }
                if !advanced.is_empty() {
                    tabs.push(TabLayout::new("advanced", "Advanced", advanced));
                }
                tabs
            }
            Category::Other => vec![
                TabLayout::new("basic", "Basic", Vec::new()),
                TabLayout::new("visibility", "Visibility", Vec::new()),
            ],
        };

        if settings.self_paced {
            for tab in &mut tabs {
                tab.editors.retain(|kind| !kind.is_schedule());
            }
        }

        Self {
            kind: ModalKind::Edit,
            tabs,
        }
    }

    /// Publish layout: a single publish editor.
    pub fn publish() -> Self {
        Self {
            kind: ModalKind::Publish,
            tabs: vec![TabLayout::untitled(vec![EditorKind::Publish])],
        }
    }

    /// Whether the modal shows a tab bar.
    pub fn has_tabs(&self) -> bool {
        self.tabs.len() > 1
    }

    /// All editor kinds in declaration order.
    pub fn editors(&self) -> impl Iterator<Item = EditorKind> + '_ {
        self.tabs.iter().flat_map(|tab| tab.editors.iter().copied())
    }

    pub fn title(&self, record: &XBlockInfo) -> String {
        match self.kind {
            ModalKind::Edit => format!("{} Settings", record.display_name),
            ModalKind::Publish => format!("Publish {}", record.display_name),
        }
    }

    /// Text shown above the editors, if any.
    pub fn introduction(&self, record: &XBlockInfo) -> Option<String> {
        match self.kind {
            ModalKind::Edit if self.has_tabs() => None,
            ModalKind::Edit => Some(format!("Change the settings for {}", record.display_name)),
            ModalKind::Publish => Some(format!(
                "Publish all unpublished changes for this {}?",
                record.category.label()
            )),
        }
    }
}
