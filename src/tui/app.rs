use std::cell::Cell;
use std::rc::Rc;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Frame, Terminal};

use crate::storage::OutlineStore;

use super::action::Action;
use super::error::AppError;
use super::modal::{ModalLayout, SettingsModal, draw_modal};
use super::screens::{HelpState, OutlineState, draw_help, draw_outline};

/// All screens the app can navigate between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Browse the course outline.
    Outline,
    /// Show keybinding help.
    Help,
}

/// Top-level application state.
pub struct App {
    screen: Screen,
    store: OutlineStore,
    outline: OutlineState,
    help: HelpState,
    /// The settings modal, drawn over the current screen while open.
    modal: Option<SettingsModal>,
    /// Set by a successful update; the outline reloads on the next action.
    refresh: Rc<Cell<bool>>,
    should_quit: bool,
}

impl App {
    /// Creates a new `App` on the [`Screen::Outline`] screen.
    pub fn new(store: OutlineStore) -> Self {
        let mut outline = OutlineState::new();
        outline.load(&store);
        Self {
            screen: Screen::Outline,
            store,
            outline,
            help: HelpState::new(),
            modal: None,
            refresh: Rc::new(Cell::new(false)),
            should_quit: false,
        }
    }

    /// Main event loop: draw → read event → dispatch → check quit.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    pub fn run<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            if let Event::Key(key) = event::read()? {
                self.handle_key(key);
            }
        }
        Ok(())
    }

    /// Renders the current screen, with the modal on top if one is open.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        match self.screen {
            Screen::Outline => draw_outline(&self.outline, frame, area),
            Screen::Help => draw_help(&self.help, frame, area),
        }
        if let Some(modal) = &self.modal {
            draw_modal(modal, frame, area);
        }
    }

    /// Handles a key event: the open modal first, then global keys, then the
    /// current screen.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if let Some(modal) = &mut self.modal {
            let action = modal.handle_key(key);
            self.apply_action(action);
            return;
        }

        if matches!(key.code, KeyCode::F(1) | KeyCode::Char('?'))
            && self.screen == Screen::Outline
        {
            self.help.reset();
            self.screen = Screen::Help;
            return;
        }

        let action = match self.screen {
            Screen::Outline => self.outline.handle_key(key),
            Screen::Help => self.help.handle_key(key),
        };
        self.apply_action(action);
    }

    fn apply_action(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Navigate(screen) => self.screen = screen,
            Action::OpenSettings(index) => self.open_modal(index, false),
            Action::OpenPublish(index) => self.open_modal(index, true),
            Action::SaveSettings => self.save_modal(),
            Action::CloseModal => self.modal = None,
            Action::Quit => self.should_quit = true,
        }
        self.refresh_if_needed();
    }

    fn open_modal(&mut self, index: usize, publish: bool) {
        let Some(record) = self.outline.item(index) else {
            return;
        };
        let settings = *self.outline.settings();
        let layout = if publish {
            ModalLayout::publish()
        } else {
            ModalLayout::edit(&record, &settings)
        };
        self.modal = Some(SettingsModal::open(record, &layout, &settings));
    }

    fn save_modal(&mut self) {
        let Some(modal) = &mut self.modal else {
            return;
        };
        let flag = Rc::clone(&self.refresh);
        modal.save(&mut self.store, Box::new(move || flag.set(true)));
        if !modal.is_open() {
            self.modal = None;
        }
    }

    fn refresh_if_needed(&mut self) {
        if self.refresh.replace(false) {
            self.outline.load(&self.store);
        }
    }

    /// Returns the current screen.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Returns `true` if the app should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Returns a reference to the [`OutlineStore`].
    pub fn store(&self) -> &OutlineStore {
        &self.store
    }

    pub fn outline(&self) -> &OutlineState {
        &self.outline
    }

    /// Returns the open modal, if any.
    pub fn modal(&self) -> Option<&SettingsModal> {
        self.modal.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    use super::*;
    use crate::model::{Category, CourseOutline, CourseSettings, XBlockInfo};
    use crate::tui::modal::ModalKind;

    fn make_app() -> (tempfile::TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outline.json");
        let outline = CourseOutline {
            course_id: "course-v1:edX+DemoX+2026".into(),
            settings: CourseSettings::default(),
            items: vec![
                XBlockInfo::new("c1", "Week 1", Category::Chapter),
                XBlockInfo::new("s1", "Homework", Category::Sequential),
                XBlockInfo::new("u1", "Unit 1", Category::Vertical),
            ],
        };
        std::fs::write(&path, serde_json::to_string(&outline).unwrap()).unwrap();
        let store = OutlineStore::with_path(&path).unwrap();
        (dir, App::new(store))
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        }
    }

    mod navigation {
        use super::*;

        #[test]
        fn new_starts_on_outline() {
            let (_dir, app) = make_app();
            assert_eq!(app.screen(), Screen::Outline);
            assert!(!app.should_quit());
            assert!(app.modal().is_none());
            assert_eq!(app.outline().items().len(), 3);
        }

        #[test]
        fn q_on_outline_quits() {
            let (_dir, mut app) = make_app();
            app.handle_key(press(KeyCode::Char('q')));
            assert!(app.should_quit());
        }

        #[test]
        fn f1_and_question_mark_open_help() {
            for code in [KeyCode::F(1), KeyCode::Char('?')] {
                let (_dir, mut app) = make_app();
                app.handle_key(press(code));
                assert_eq!(app.screen(), Screen::Help);
            }
        }

        #[test]
        fn esc_on_help_returns_to_outline() {
            let (_dir, mut app) = make_app();
            app.handle_key(press(KeyCode::F(1)));
            app.handle_key(press(KeyCode::Esc));
            assert_eq!(app.screen(), Screen::Outline);
            assert!(!app.should_quit());
        }

        #[test]
        fn release_events_are_ignored() {
            let (_dir, mut app) = make_app();
            app.handle_key(release(KeyCode::Char('q')));
            assert!(!app.should_quit());
        }
    }

    mod modal {
        use super::*;

        fn open_unit_settings(app: &mut App) {
            app.handle_key(press(KeyCode::Down));
            app.handle_key(press(KeyCode::Down));
            app.handle_key(press(KeyCode::Enter));
        }

        #[test]
        fn enter_opens_settings_for_selection() {
            let (_dir, mut app) = make_app();
            open_unit_settings(&mut app);
            let modal = app.modal().unwrap();
            assert_eq!(modal.kind(), ModalKind::Edit);
            assert_eq!(modal.record().id, "u1");
        }

        #[test]
        fn p_opens_publish() {
            let (_dir, mut app) = make_app();
            app.handle_key(press(KeyCode::Char('p')));
            assert_eq!(app.modal().unwrap().kind(), ModalKind::Publish);
        }

        #[test]
        fn modal_captures_keys() {
            let (_dir, mut app) = make_app();
            open_unit_settings(&mut app);
            app.handle_key(press(KeyCode::Char('q')));
            assert!(!app.should_quit());
            assert!(app.modal().is_some());
        }

        #[test]
        fn esc_closes_modal_without_saving() {
            let (_dir, mut app) = make_app();
            open_unit_settings(&mut app);
            app.handle_key(press(KeyCode::Esc));
            assert!(app.modal().is_none());
            assert!(app.store().journal().unwrap().is_empty());
        }

        #[test]
        fn save_without_changes_sends_nothing() {
            let (_dir, mut app) = make_app();
            app.handle_key(press(KeyCode::Enter));
            app.handle_key(press(KeyCode::Enter));
            assert!(app.modal().is_none());
            assert!(app.store().journal().unwrap().is_empty());
        }

        #[test]
        fn publish_updates_store_and_refreshes_outline() {
            let (_dir, mut app) = make_app();
            app.handle_key(press(KeyCode::Char('p')));
            app.handle_key(press(KeyCode::Enter));
            assert!(app.modal().is_none());
            assert!(app.store().outline().item("c1").unwrap().published);
            assert!(app.outline().items()[0].published);
        }

        #[test]
        fn failed_update_closes_modal_without_refresh() {
            let (dir, mut app) = make_app();
            app.handle_key(press(KeyCode::Char('p')));
            // Journal path is a directory, so the append fails.
            std::fs::create_dir(dir.path().join("updates.jsonl")).unwrap();
            app.handle_key(press(KeyCode::Enter));
            assert!(app.modal().is_none());
            assert!(!app.store().outline().item("c1").unwrap().published);
            assert!(!app.outline().items()[0].published);
        }
    }
}
