use serde::{Deserialize, Serialize};

use super::record::{Category, XBlockInfo};

/// Course-wide settings that shape which editors a modal offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CourseSettings {
    /// Self-paced courses have no release or due dates.
    pub self_paced: bool,
    pub enable_proctored_exams: bool,
    pub enable_timed_exams: bool,
}

impl CourseSettings {
    /// Returns `true` if either exam feature is enabled.
    pub fn special_exams_enabled(&self) -> bool {
        self.enable_proctored_exams || self.enable_timed_exams
    }
}

/// A course outline: settings plus items in outline order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CourseOutline {
    pub course_id: String,
    #[serde(flatten)]
    pub settings: CourseSettings,
    pub items: Vec<XBlockInfo>,
}

impl CourseOutline {
    /// Finds an item by its locator.
    pub fn item(&self, locator: &str) -> Option<&XBlockInfo> {
        self.items.iter().find(|item| item.id == locator)
    }

    /// Finds an item by its locator for mutation.
    pub fn item_mut(&mut self, locator: &str) -> Option<&mut XBlockInfo> {
        self.items.iter_mut().find(|item| item.id == locator)
    }

    /// Recomputes `ancestor_has_staff_lock` from the explicit locks of the
    /// enclosing section and subsection.
    pub fn refresh_ancestor_locks(&mut self) {
        let mut section_locked = false;
        let mut subsection_locked = false;
        for item in &mut self.items {
            match item.category {
                Category::Chapter => {
                    item.ancestor_has_staff_lock = false;
                    section_locked = item.has_explicit_staff_lock;
                    subsection_locked = section_locked;
                }
                Category::Sequential => {
                    item.ancestor_has_staff_lock = section_locked;
                    subsection_locked = section_locked || item.has_explicit_staff_lock;
                }
                Category::Vertical | Category::Other => {
                    item.ancestor_has_staff_lock = subsection_locked;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_are_flattened_into_outline() {
        let outline: CourseOutline = serde_json::from_str(
            r#"{
                "course_id": "course-v1:edX+DemoX+2026",
                "self_paced": true,
                "enable_timed_exams": true,
                "items": [{"id": "c1", "display_name": "Week 1", "category": "chapter"}]
            }"#,
        )
        .unwrap();
        assert!(outline.settings.self_paced);
        assert!(outline.settings.enable_timed_exams);
        assert!(!outline.settings.enable_proctored_exams);
        assert_eq!(outline.items.len(), 1);
        assert_eq!(outline.items[0].category, Category::Chapter);
    }

    #[test]
    fn special_exams_enabled_by_either_flag() {
        let mut settings = CourseSettings::default();
        assert!(!settings.special_exams_enabled());
        settings.enable_proctored_exams = true;
        assert!(settings.special_exams_enabled());
        settings = CourseSettings {
            enable_timed_exams: true,
            ..CourseSettings::default()
        };
        assert!(settings.special_exams_enabled());
    }

    #[test]
    fn item_lookup_by_locator() {
        let mut outline = CourseOutline::default();
        outline
            .items
            .push(XBlockInfo::new("s1", "Homework", Category::Sequential));
        assert!(outline.item("s1").is_some());
        assert!(outline.item("s2").is_none());
        outline.item_mut("s1").unwrap().hide_after_due = true;
        assert!(outline.item("s1").unwrap().hide_after_due);
    }

    #[test]
    fn ancestor_locks_follow_outline_order() {
        let mut outline = CourseOutline::default();
        let mut locked_section = XBlockInfo::new("c1", "Week 1", Category::Chapter);
        locked_section.has_explicit_staff_lock = true;
        let mut locked_subsection = XBlockInfo::new("s2", "Quiz", Category::Sequential);
        locked_subsection.has_explicit_staff_lock = true;
        let mut stale_unit = XBlockInfo::new("u3", "Unit 3", Category::Vertical);
        stale_unit.ancestor_has_staff_lock = true;
        outline.items = vec![
            locked_section,
            XBlockInfo::new("s1", "Homework", Category::Sequential),
            XBlockInfo::new("u1", "Unit 1", Category::Vertical),
            XBlockInfo::new("c2", "Week 2", Category::Chapter),
            locked_subsection,
            XBlockInfo::new("u2", "Unit 2", Category::Vertical),
            XBlockInfo::new("s3", "Lab", Category::Sequential),
            stale_unit,
        ];
        outline.refresh_ancestor_locks();
        let inherited: Vec<bool> = outline
            .items
            .iter()
            .map(|item| item.ancestor_has_staff_lock)
            .collect();
        assert_eq!(
            inherited,
            vec![false, true, true, false, false, true, false, false]
        );
    }
}
