//! Help screen: key reference for the outline and the settings modal.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table};

use crate::tui::action::Action;
use crate::tui::app::Screen;

/// `(context, keys, description)` rows in display order.
static BINDINGS: &[(&str, &str, &str)] = &[
    ("Outline", "↑/↓", "select item"),
    ("Outline", "Enter / e", "item settings"),
    ("Outline", "p", "publish item"),
    ("Outline", "F1 / ?", "this help"),
    ("Outline", "q / Esc", "quit"),
    ("Settings", "Tab / Shift-Tab", "next / prev field"),
    ("Settings", "PgDn / PgUp", "next / prev tab"),
    ("Settings", "Space", "toggle checkbox, next option"),
    ("Settings", "←/→", "prev / next option"),
    ("Settings", "Del", "clear date or weight"),
    ("Settings", "Enter", "save"),
    ("Settings", "Esc", "cancel"),
];

/// State for the help screen: the first visible binding.
#[derive(Debug, Clone, Default)]
pub struct HelpState {
    offset: usize,
}

impl HelpState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Scrolls back to the first binding.
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Handles a key event. `q` and `Esc` return to the outline.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Up => self.offset = self.offset.saturating_sub(1),
            KeyCode::Down => self.offset = (self.offset + 1).min(BINDINGS.len() - 1),
            KeyCode::Char('q') | KeyCode::Esc => return Action::Navigate(Screen::Outline),
            _ => {}
        }
        Action::None
    }
}

/// Renders the help screen.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_help(state: &HelpState, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [table_area, footer_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);

    let header = Row::new(vec!["", "Keys", "Action"])
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(1);
    let rows = BINDINGS
        .iter()
        .skip(state.offset())
        .map(|(context, keys, desc)| {
            Row::new(vec![*context, *keys, *desc]).style(Style::default().fg(Color::Gray))
        });
    let widths = [
        Constraint::Length(10),
        Constraint::Length(18),
        Constraint::Min(10),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(2)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(table, table_area);

    let footer =
        Paragraph::new("↑/↓: scroll  q/Esc: back").style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}
