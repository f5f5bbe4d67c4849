//! Outline screen: lists sections, subsections and units of the course.

use std::rc::Rc;

use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table};

use crate::model::{Category, CourseSettings, XBlockInfo};
use crate::storage::OutlineStore;
use crate::tui::action::Action;

/// State for the outline screen.
#[derive(Debug, Clone, Default)]
pub struct OutlineState {
    course_id: String,
    settings: CourseSettings,
    /// Shared with any open modal; replaced wholesale on reload.
    items: Vec<Rc<XBlockInfo>>,
    /// Index of the highlighted item, or `None` if the outline is empty.
    selected: Option<usize>,
}

impl OutlineState {
    /// Creates an empty state. Call [`load`](Self::load) to populate from storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a fresh copy of the stored outline, keeping the selection where
    /// possible.
    pub fn load(&mut self, store: &OutlineStore) {
        let outline = store.outline();
        self.course_id = outline.course_id.clone();
        self.settings = outline.settings;
        self.items = outline.items.iter().cloned().map(Rc::new).collect();
        self.selected = match (self.selected, self.items.len()) {
            (_, 0) => None,
            (Some(i), len) => Some(i.min(len - 1)),
            (None, _) => Some(0),
        };
    }

    /// Handles a key event, returning an [`Action`] for the app to apply.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Up => {
                self.select_prev();
                Action::None
            }
            KeyCode::Down => {
                self.select_next();
                Action::None
            }
            KeyCode::Enter | KeyCode::Char('e') => {
                self.selected.map_or(Action::None, Action::OpenSettings)
            }
            KeyCode::Char('p') => self.selected.map_or(Action::None, Action::OpenPublish),
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            _ => Action::None,
        }
    }

    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    /// Course-wide settings the modals are opened with.
    pub fn settings(&self) -> &CourseSettings {
        &self.settings
    }

    pub fn items(&self) -> &[Rc<XBlockInfo>] {
        &self.items
    }

    /// Returns a shared handle to the item at `index`.
    pub fn item(&self, index: usize) -> Option<Rc<XBlockInfo>> {
        self.items.get(index).cloned()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    fn select_prev(&mut self) {
        self.selected = match self.selected {
            Some(i) if i > 0 => Some(i - 1),
            other => other,
        };
    }

    fn select_next(&mut self) {
        self.selected = match self.selected {
            Some(i) if i + 1 < self.items.len() => Some(i + 1),
            other => other,
        };
    }
}

fn indent(category: Category) -> usize {
    match category {
        Category::Chapter => 0,
        Category::Sequential => 2,
        Category::Vertical | Category::Other => 4,
    }
}

fn format_date(value: Option<DateTime<Utc>>) -> String {
    value.map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d %H:%M").to_string())
}

fn status(item: &XBlockInfo) -> &'static str {
    if item.has_explicit_staff_lock || item.ancestor_has_staff_lock {
        "Staff only"
    } else if item.published {
        "Published"
    } else {
        "Draft"
    }
}

/// Renders the outline screen.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_outline(state: &OutlineState, frame: &mut Frame, area: Rect) {
    let title = if state.course_id().is_empty() {
        " Course Outline ".to_string()
    } else {
        format!(" Course Outline \u{2013} {} ", state.course_id())
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if state.items().is_empty() {
        let lines = vec![
            Line::from(""),
            Line::from("The outline is empty."),
            Line::from("Add items to the outline file and restart."),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header = Row::new(vec!["Name", "Type", "Release", "Due", "Status"])
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(1);

    let rows: Vec<Row> = state
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if state.selected() == Some(i) {
                Style::default().fg(Color::Black).bg(Color::Yellow)
            } else {
                Style::default()
            };
            Row::new(vec![
                format!("{:width$}{}", "", item.display_name, width = indent(item.category)),
                item.category.label().to_string(),
                format_date(item.start),
                format_date(item.due),
                status(item).to_string(),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(20),
        Constraint::Length(11),
        Constraint::Length(17),
        Constraint::Length(17),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths).header(header);

    let [table_area, footer_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);

    frame.render_widget(table, table_area);

    let footer = Paragraph::new("Enter/e: settings  p: publish  F1: help  q: quit")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}
