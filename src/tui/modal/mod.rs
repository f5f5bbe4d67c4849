//! Settings modal: composes editors for one record, aggregates their partial
//! updates and issues a single update request on save.

mod layout;
mod updater;

pub use layout::{ModalKind, ModalLayout, TabLayout};
pub use updater::{OnSave, XBlockUpdater};

use std::ops::Range;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs};

use crate::model::{CourseSettings, Payload, XBlockInfo};
use crate::tui::action::Action;
use crate::tui::editors::{Editor, EditorSignal, draw_editor, editor_height};
use crate::tui::widgets::form::Form;

/// A tab of an open modal; `editors` indexes into the modal's editor list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalTab {
    pub name: &'static str,
    pub display_name: &'static str,
    editors: Range<usize>,
}

/// An open settings or publish modal for one record.
#[derive(Debug)]
pub struct SettingsModal {
    record: Rc<XBlockInfo>,
    kind: ModalKind,
    title: String,
    introduction: Option<String>,
    has_tab_bar: bool,
    tabs: Vec<ModalTab>,
    /// Every tab's editors, in declaration order.
    editors: Vec<Editor>,
    active_tab: usize,
    /// Focused `(editor, field)`, within the active tab.
    focus: Option<(usize, usize)>,
    save_enabled: bool,
    open: bool,
}

impl SettingsModal {
    /// Renders every editor of `layout` against `record`.
    pub fn open(record: Rc<XBlockInfo>, layout: &ModalLayout, settings: &CourseSettings) -> Self {
        let mut editors = Vec::new();
        let mut tabs = Vec::with_capacity(layout.tabs.len());
        for tab in &layout.tabs {
            let start = editors.len();
            editors.extend(tab.editors.iter().map(|kind| kind.render(&record, settings)));
            tabs.push(ModalTab {
                name: tab.name,
                display_name: tab.display_name,
                editors: start..editors.len(),
            });
        }
        tracing::info!(
            locator = %record.id,
            kind = ?layout.kind,
            editors = editors.len(),
            "opened modal"
        );

        let mut modal = Self {
            title: layout.title(&record),
            introduction: layout.introduction(&record),
            record,
            kind: layout.kind,
            has_tab_bar: layout.has_tabs(),
            tabs,
            editors,
            active_tab: 0,
            focus: None,
            save_enabled: true,
            open: true,
        };
        modal.focus = modal.focus_targets().first().copied();
        modal.sync_form_focus();
        modal
    }

    pub fn record(&self) -> &XBlockInfo {
        &self.record
    }

    pub fn kind(&self) -> ModalKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn introduction(&self) -> Option<&str> {
        self.introduction.as_deref()
    }

    pub fn has_tab_bar(&self) -> bool {
        self.has_tab_bar
    }

    pub fn tabs(&self) -> &[ModalTab] {
        &self.tabs
    }

    pub fn active_tab(&self) -> usize {
        self.active_tab
    }

    /// Every editor of the modal, across all tabs.
    pub fn editors(&self) -> &[Editor] {
        &self.editors
    }

    /// Editors of the active tab.
    pub fn visible_editors(&self) -> &[Editor] {
        match self.tabs.get(self.active_tab) {
            Some(tab) => &self.editors[tab.editors.clone()],
            None => &[],
        }
    }

    pub fn focus(&self) -> Option<(usize, usize)> {
        self.focus
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_save_enabled(&self) -> bool {
        self.save_enabled
    }

    /// Merges every editor's payload in order; later editors win collisions.
    ///
    /// Editors on hidden tabs are included.
    pub fn request_payload(&self) -> Payload {
        Payload::merge_all(self.editors.iter().map(Editor::request_payload))
    }

    /// Issues the aggregate update and closes the modal.
    ///
    /// Nothing is sent when no editor has a change. The modal closes without
    /// waiting for the update; `on_save` runs only if it succeeds. Does
    /// nothing while saving is disabled or the modal is already closed.
    /// Returns the payload that was sent.
    pub fn save<U>(&mut self, updater: &mut U, on_save: OnSave) -> Option<Payload>
    where
        U: XBlockUpdater + ?Sized,
    {
        if !self.open {
            return None;
        }
        if !self.save_enabled {
            tracing::debug!(locator = %self.record.id, "save is disabled");
            return None;
        }

        self.blur();
        let payload = self.request_payload();
        let sent = if payload.is_empty() {
            tracing::debug!(locator = %self.record.id, "no changes to save");
            None
        } else {
            tracing::info!(locator = %self.record.id, "issuing update request");
            updater.update_fields(&self.record, payload.clone(), on_save);
            Some(payload)
        };
        self.hide();
        sent
    }

    /// Closes the modal without saving.
    pub fn cancel(&mut self) {
        tracing::debug!(locator = %self.record.id, "modal cancelled");
        self.hide();
    }

    fn hide(&mut self) {
        self.open = false;
        self.focus = None;
    }

    /// Makes tab `index` the visible one. Editors keep their state.
    pub fn show_tab(&mut self, index: usize) -> bool {
        if index >= self.tabs.len() {
            return false;
        }
        self.blur();
        self.active_tab = index;
        tracing::debug!(locator = %self.record.id, tab = self.tabs[index].name, "showing tab");
        self.focus = self.focus_targets().first().copied();
        self.sync_form_focus();
        true
    }

    pub fn next_tab(&mut self) {
        if !self.tabs.is_empty() {
            self.show_tab((self.active_tab + 1) % self.tabs.len());
        }
    }

    pub fn prev_tab(&mut self) {
        if !self.tabs.is_empty() {
            let len = self.tabs.len();
            self.show_tab((self.active_tab + len - 1) % len);
        }
    }

    /// Focusable `(editor, field)` pairs of the active tab.
    fn focus_targets(&self) -> Vec<(usize, usize)> {
        let Some(tab) = self.tabs.get(self.active_tab) else {
            return Vec::new();
        };
        tab.editors
            .clone()
            .flat_map(|e| {
                self.editors[e]
                    .form()
                    .visible_fields()
                    .into_iter()
                    .map(move |f| (e, f))
            })
            .collect()
    }

    fn move_focus(&mut self, forward: bool) {
        let targets = self.focus_targets();
        if targets.is_empty() {
            return;
        }
        let len = targets.len();
        let next = match self.focus.and_then(|f| targets.iter().position(|t| *t == f)) {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None => 0,
        };
        self.blur();
        self.focus = Some(targets[next]);
        self.sync_form_focus();
    }

    pub fn focus_next(&mut self) {
        self.move_focus(true);
    }

    pub fn focus_prev(&mut self) {
        self.move_focus(false);
    }

    fn sync_form_focus(&mut self) {
        if let Some((e, f)) = self.focus {
            self.editors[e].form_mut().set_focus(f);
        }
    }

    /// Runs the focus-out handling of the focused field.
    fn blur(&mut self) {
        if let Some((e, f)) = self.focus {
            self.editors[e].focus_left(f);
        }
    }

    fn apply_signal(&mut self, signal: EditorSignal) {
        match signal {
            EditorSignal::None => {}
            EditorSignal::DisableSave => self.save_enabled = false,
            EditorSignal::EnableSave => self.save_enabled = true,
        }
    }

    /// Applies `edit` to the focused form and notifies the editor on change.
    fn edit_focused(&mut self, edit: impl FnOnce(&mut Form) -> bool) {
        let Some((e, f)) = self.focus else {
            return;
        };
        let editor = &mut self.editors[e];
        if edit(editor.form_mut()) {
            let signal = editor.field_changed(f);
            self.apply_signal(signal);
        }
    }

    fn clear_focused(&mut self) {
        let Some((e, f)) = self.focus else {
            return;
        };
        let editor = &mut self.editors[e];
        if editor.clear() {
            let signal = editor.field_changed(f);
            self.apply_signal(signal);
        }
    }

    /// Handles a key event, returning an [`Action`] for the app to apply.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Tab => self.focus_next(),
            KeyCode::BackTab => self.focus_prev(),
            KeyCode::PageDown => self.next_tab(),
            KeyCode::PageUp => self.prev_tab(),
            KeyCode::Left => self.edit_focused(|form| form.cycle_choice(false)),
            KeyCode::Right => self.edit_focused(|form| form.cycle_choice(true)),
            KeyCode::Char(ch) => self.edit_focused(|form| {
                if form.focused_is_text() {
                    form.insert_char(ch)
                } else {
                    ch == ' ' && form.toggle()
                }
            }),
            KeyCode::Backspace => self.edit_focused(Form::delete_char),
            KeyCode::Delete => self.clear_focused(),
            KeyCode::Enter => return Action::SaveSettings,
            KeyCode::Esc => {
                self.cancel();
                return Action::CloseModal;
            }
            _ => {}
        }
        Action::None
    }
}

/// Renders the modal centered over `area`.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_modal(modal: &SettingsModal, frame: &mut Frame, area: Rect) {
    let [popup] = Layout::horizontal([Constraint::Percentage(80)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::vertical([Constraint::Percentage(90)])
        .flex(Flex::Center)
        .areas(popup);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(format!(" {} ", modal.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let intro_height = u16::from(modal.introduction().is_some());
    let tabs_height = if modal.has_tab_bar() { 2 } else { 0 };
    let [intro_area, tabs_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(intro_height),
        Constraint::Length(tabs_height),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(inner);

    if let Some(intro) = modal.introduction() {
        frame.render_widget(Paragraph::new(intro), intro_area);
    }

    if modal.has_tab_bar() {
        let titles: Vec<&str> = modal.tabs().iter().map(|t| t.display_name).collect();
        let tabs = Tabs::new(titles)
            .select(modal.active_tab())
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, tabs_area);
    }

    let offset = modal
        .tabs()
        .get(modal.active_tab())
        .map_or(0, |tab| tab.editors.start);
    let editors = modal.visible_editors();
    let constraints: Vec<Constraint> = editors
        .iter()
        .map(|e| Constraint::Length(editor_height(e)))
        .collect();
    let rows = Layout::vertical(constraints).split(body_area);
    for (i, editor) in editors.iter().enumerate() {
        let active = modal.focus().is_some_and(|(e, _)| e == offset + i);
        draw_editor(editor, active, frame, rows[i]);
    }

    let keys = concat!(
        "Tab: next field  Space/\u{2190}/\u{2192}: change  ",
        "PgUp/PgDn: tab  Del: clear  Enter: save  Esc: cancel"
    );
    let footer = if modal.is_save_enabled() {
        Line::from(Span::styled(keys, Style::default().fg(Color::DarkGray)))
    } else {
        Line::from(vec![
            Span::styled("Fix the errors above to save  ", Style::default().fg(Color::Red)),
            Span::styled(keys, Style::default().fg(Color::DarkGray)),
        ])
    };
    frame.render_widget(Paragraph::new(footer), footer_area);
}
