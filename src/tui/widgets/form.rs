//! Reusable form widget: text inputs, checkboxes and radio choices.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

/// Rows taken by one visible field.
pub const ROW_HEIGHT: u16 = 3;

/// One option of a [`FieldKind::Choice`] field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChoice {
    /// Value read back by editors.
    pub value: String,
    /// Text shown to the user.
    pub label: String,
}

impl FieldChoice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// The input control a [`FormField`] renders as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text held in [`FormField::value`].
    Text,
    Checkbox { checked: bool },
    /// Radio group or dropdown; `selected` indexes into `options`.
    Choice {
        options: Vec<FieldChoice>,
        selected: Option<usize>,
    },
}

/// A single field within a [`Form`].
#[derive(Debug, Clone)]
pub struct FormField {
    /// Display label shown in the field border.
    pub label: String,
    pub kind: FieldKind,
    /// Current text value (text fields only).
    pub value: String,
    /// Validation error message, if any.
    pub error: Option<String>,
    /// Informational message, shown when there is no error.
    pub hint: Option<String>,
    /// Hidden fields are neither drawn nor focusable.
    pub hidden: bool,
}

impl FormField {
    fn with_kind(label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            label: label.into(),
            kind,
            value: String::new(),
            error: None,
            hint: None,
            hidden: false,
        }
    }

    /// Creates an empty text field.
    pub fn text(label: impl Into<String>) -> Self {
        Self::with_kind(label, FieldKind::Text)
    }

    /// Creates an unchecked checkbox.
    pub fn checkbox(label: impl Into<String>) -> Self {
        Self::with_kind(label, FieldKind::Checkbox { checked: false })
    }

    /// Creates a choice field with nothing selected.
    pub fn choice(label: impl Into<String>, options: Vec<FieldChoice>) -> Self {
        Self::with_kind(
            label,
            FieldKind::Choice {
                options,
                selected: None,
            },
        )
    }
}

/// A multi-field form with focus management.
#[derive(Debug, Clone)]
pub struct Form {
    fields: Vec<FormField>,
    focus: usize,
}

impl Form {
    /// Creates a new form with the given fields. Focus starts on the first field.
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields, focus: 0 }
    }

    /// Returns the index of the focused field.
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Moves focus to `index` if it names a visible field.
    pub fn set_focus(&mut self, index: usize) -> bool {
        if self.fields.get(index).is_some_and(|f| !f.hidden) {
            self.focus = index;
            true
        } else {
            false
        }
    }

    /// Indices of fields that are drawn and focusable.
    pub fn visible_fields(&self) -> Vec<usize> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.hidden)
            .map(|(i, _)| i)
            .collect()
    }

    /// Returns `true` if the focused field takes typed characters.
    pub fn focused_is_text(&self) -> bool {
        self.fields
            .get(self.focus)
            .is_some_and(|f| f.kind == FieldKind::Text)
    }

    /// Inserts a character at the end of the focused text field.
    pub fn insert_char(&mut self, ch: char) -> bool {
        match self.fields.get_mut(self.focus) {
            Some(field) if field.kind == FieldKind::Text => {
                field.value.push(ch);
                true
            }
            _ => false,
        }
    }

    /// Deletes the last character from the focused text field.
    pub fn delete_char(&mut self) -> bool {
        match self.fields.get_mut(self.focus) {
            Some(field) if field.kind == FieldKind::Text => field.value.pop().is_some(),
            _ => false,
        }
    }

    /// Flips the focused checkbox or advances the focused choice.
    pub fn toggle(&mut self) -> bool {
        match self.fields.get(self.focus).map(|f| &f.kind) {
            Some(FieldKind::Checkbox { checked }) => {
                let flipped = !*checked;
                self.set_checked(self.focus, flipped);
                true
            }
            Some(FieldKind::Choice { .. }) => self.cycle_choice(true),
            _ => false,
        }
    }

    /// Moves the focused choice to the next or previous option, wrapping.
    pub fn cycle_choice(&mut self, forward: bool) -> bool {
        let Some(FormField {
            kind: FieldKind::Choice { options, selected },
            ..
        }) = self.fields.get_mut(self.focus)
        else {
            return false;
        };
        if options.is_empty() {
            return false;
        }
        let len = options.len();
        *selected = Some(match (*selected, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        });
        true
    }

    /// Sets the text value of the field at `index`.
    pub fn set_value(&mut self, index: usize, value: impl Into<String>) {
        if let Some(field) = self.fields.get_mut(index) {
            field.value = value.into();
        }
    }

    /// Returns the text value of the field at `index`, or an empty string if out of bounds.
    pub fn value(&self, index: usize) -> &str {
        self.fields
            .get(index)
            .map(|f| f.value.as_str())
            .unwrap_or("")
    }

    /// Returns `true` if the field at `index` is a checked checkbox.
    pub fn is_checked(&self, index: usize) -> bool {
        matches!(
            self.fields.get(index).map(|f| &f.kind),
            Some(FieldKind::Checkbox { checked: true })
        )
    }

    /// Checks or unchecks the checkbox at `index`.
    pub fn set_checked(&mut self, index: usize, value: bool) {
        if let Some(FormField {
            kind: FieldKind::Checkbox { checked },
            ..
        }) = self.fields.get_mut(index)
        {
            *checked = value;
        }
    }

    /// Returns the selected value of the choice at `index`.
    pub fn selected(&self, index: usize) -> Option<&str> {
        match self.fields.get(index).map(|f| &f.kind) {
            Some(FieldKind::Choice {
                options,
                selected: Some(i),
            }) => options.get(*i).map(|o| o.value.as_str()),
            _ => None,
        }
    }

    /// Selects the option whose value is `value`. Returns `false` if there is none.
    pub fn select(&mut self, index: usize, value: &str) -> bool {
        let Some(FormField {
            kind: FieldKind::Choice { options, selected },
            ..
        }) = self.fields.get_mut(index)
        else {
            return false;
        };
        match options.iter().position(|o| o.value == value) {
            Some(i) => {
                *selected = Some(i);
                true
            }
            None => false,
        }
    }

    /// Shows or hides the field at `index`.
    pub fn set_hidden(&mut self, index: usize, hidden: bool) {
        if let Some(field) = self.fields.get_mut(index) {
            field.hidden = hidden;
        }
    }

    /// Sets an error message on a field by index.
    pub fn set_error(&mut self, index: usize, error: String) {
        if let Some(field) = self.fields.get_mut(index) {
            field.error = Some(error);
        }
    }

    /// Clears the error on a field by index.
    pub fn clear_error(&mut self, index: usize) {
        if let Some(field) = self.fields.get_mut(index) {
            field.error = None;
        }
    }

    /// Sets or clears the hint on a field by index.
    pub fn set_hint(&mut self, index: usize, hint: Option<String>) {
        if let Some(field) = self.fields.get_mut(index) {
            field.hint = hint;
        }
    }

    /// Returns a reference to the fields.
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Rows needed to draw the visible fields.
    pub fn height(&self) -> u16 {
        self.fields.iter().filter(|f| !f.hidden).count() as u16 * ROW_HEIGHT
    }
}

fn field_line(field: &FormField, is_focused: bool) -> Line<'_> {
    let cursor = || {
        Span::styled(
            "\u{2588}",
            Style::default().add_modifier(Modifier::SLOW_BLINK),
        )
    };
    match &field.kind {
        FieldKind::Text => {
            let mut spans = vec![Span::raw(&field.value)];
            if is_focused {
                spans.push(cursor());
            }
            Line::from(spans)
        }
        FieldKind::Checkbox { checked } => {
            Line::from(if *checked { "[x]" } else { "[ ]" })
        }
        FieldKind::Choice { options, selected } => {
            let mut spans = Vec::new();
            for (i, option) in options.iter().enumerate() {
                let is_selected = *selected == Some(i);
                let marker = if is_selected { "(\u{2022}) " } else { "( ) " };
                let style = if is_selected && is_focused {
                    Style::default().fg(Color::Black).bg(Color::Yellow)
                } else {
                    Style::default()
                };
                spans.push(Span::styled(format!("{marker}{}", option.label), style));
                spans.push(Span::raw("  "));
            }
            Line::from(spans)
        }
    }
}

/// Renders the visible fields of a form. Only an `active` form shows focus.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_form(form: &Form, active: bool, frame: &mut Frame, area: Rect) {
    let visible = form.visible_fields();
    let constraints: Vec<Constraint> = visible
        .iter()
        .map(|_| Constraint::Length(ROW_HEIGHT))
        .collect();

    let rows = Layout::vertical(constraints).split(area);

    for (row, &i) in visible.iter().enumerate() {
        let field = &form.fields[i];
        let is_focused = active && i == form.focus;

        let border_color = if field.error.is_some() {
            Color::Red
        } else if is_focused {
            Color::Yellow
        } else {
            Color::DarkGray
        };

        let block = Block::default()
            .title(field.label.as_str())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));

        let paragraph = Paragraph::new(field_line(field, is_focused)).block(block);
        frame.render_widget(paragraph, rows[row]);

        // Error, or failing that the hint, overlaps the bottom border.
        let message = match (&field.error, &field.hint) {
            (Some(err), _) => Some((err, Color::Red)),
            (None, Some(hint)) => Some((hint, Color::Yellow)),
            (None, None) => None,
        };
        if let Some((text, color)) = message {
            let line = Paragraph::new(Span::styled(text.as_str(), Style::default().fg(color)));
            let msg_area = Rect {
                x: rows[row].x + 2,
                y: rows[row].y + ROW_HEIGHT.saturating_sub(1),
                width: rows[row].width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(line, msg_area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIME: usize = 0;
    const LOCK: usize = 1;
    const KIND: usize = 2;

    fn make_form() -> Form {
        Form::new(vec![
            FormField::text("Time Limit"),
            FormField::checkbox("Hide from learners"),
            FormField::choice(
                "Exam",
                vec![
                    FieldChoice::new("none", "None"),
                    FieldChoice::new("timed", "Timed"),
                    FieldChoice::new("practice", "Practice"),
                ],
            ),
        ])
    }

    // --- Focus ---

    #[test]
    fn focus_starts_at_zero() {
        assert_eq!(make_form().focus(), 0);
    }

    #[test]
    fn set_focus_rejects_hidden_and_out_of_bounds() {
        let mut form = make_form();
        form.set_hidden(LOCK, true);
        assert!(!form.set_focus(LOCK));
        assert!(!form.set_focus(99));
        assert!(form.set_focus(KIND));
        assert_eq!(form.focus(), KIND);
    }

    #[test]
    fn visible_fields_skip_hidden() {
        let mut form = make_form();
        form.set_hidden(TIME, true);
        assert_eq!(form.visible_fields(), vec![LOCK, KIND]);
        assert_eq!(form.height(), 2 * ROW_HEIGHT);
    }

    // --- Text ---

    #[test]
    fn insert_and_delete_on_text_field() {
        let mut form = make_form();
        assert!(form.insert_char('1'));
        assert!(form.insert_char(':'));
        assert!(form.delete_char());
        assert_eq!(form.value(TIME), "1");
        assert!(form.focused_is_text());
    }

    #[test]
    fn insert_char_ignored_on_checkbox() {
        let mut form = make_form();
        form.set_focus(LOCK);
        assert!(!form.insert_char('x'));
        assert!(!form.delete_char());
        assert!(!form.focused_is_text());
    }

    #[test]
    fn value_out_of_bounds_returns_empty() {
        assert_eq!(make_form().value(99), "");
    }

    // --- Checkbox ---

    #[test]
    fn toggle_flips_checkbox() {
        let mut form = make_form();
        form.set_focus(LOCK);
        assert!(!form.is_checked(LOCK));
        assert!(form.toggle());
        assert!(form.is_checked(LOCK));
        form.set_checked(LOCK, false);
        assert!(!form.is_checked(LOCK));
    }

    #[test]
    fn toggle_on_text_is_noop() {
        let mut form = make_form();
        assert!(!form.toggle());
    }

    // --- Choice ---

    #[test]
    fn select_by_value() {
        let mut form = make_form();
        assert!(form.select(KIND, "timed"));
        assert_eq!(form.selected(KIND), Some("timed"));
        assert!(!form.select(KIND, "oral"));
        assert_eq!(form.selected(KIND), Some("timed"));
    }

    #[test]
    fn cycle_choice_wraps_both_ways() {
        let mut form = make_form();
        form.set_focus(KIND);
        assert!(form.cycle_choice(true));
        assert_eq!(form.selected(KIND), Some("none"));
        form.cycle_choice(false);
        assert_eq!(form.selected(KIND), Some("practice"));
        form.cycle_choice(true);
        assert_eq!(form.selected(KIND), Some("none"));
    }

    #[test]
    fn toggle_advances_choice() {
        let mut form = make_form();
        form.set_focus(KIND);
        form.select(KIND, "timed");
        form.toggle();
        assert_eq!(form.selected(KIND), Some("practice"));
    }

    #[test]
    fn selected_on_non_choice_is_none() {
        assert_eq!(make_form().selected(TIME), None);
    }

    // --- Errors and hints ---

    #[test]
    fn set_and_clear_error() {
        let mut form = make_form();
        form.set_error(TIME, "bad".into());
        assert_eq!(form.fields()[TIME].error.as_deref(), Some("bad"));
        form.clear_error(TIME);
        assert_eq!(form.fields()[TIME].error, None);
    }

    #[test]
    fn set_error_out_of_bounds_is_noop() {
        let mut form = make_form();
        form.set_error(99, "nope".into());
        assert!(form.fields().iter().all(|f| f.error.is_none()));
    }

    #[test]
    fn hint_is_not_an_error() {
        let mut form = make_form();
        form.set_hint(KIND, Some("heads up".into()));
        assert_eq!(form.fields()[KIND].error, None);
        assert_eq!(form.fields()[KIND].hint.as_deref(), Some("heads up"));
    }

    mod rendering {
        use ratatui::Terminal;
        use ratatui::backend::TestBackend;

        use super::*;

        fn buffer_to_string(buf: &ratatui::buffer::Buffer) -> String {
            let mut s = String::new();
            for y in 0..buf.area.height {
                for x in 0..buf.area.width {
                    s.push(buf[(x, y)].symbol().chars().next().unwrap_or(' '));
                }
                s.push('\n');
            }
            s
        }

        fn render(form: &Form) -> String {
            let backend = TestBackend::new(60, 12);
            let mut terminal = Terminal::new(backend).unwrap();
            terminal
                .draw(|frame| draw_form(form, true, frame, frame.area()))
                .unwrap();
            buffer_to_string(terminal.backend().buffer())
        }

        #[test]
        fn renders_labels_and_controls() {
            let mut form = make_form();
            form.set_value(TIME, "01:30");
            form.set_checked(LOCK, true);
            form.select(KIND, "timed");
            let output = render(&form);
            assert!(output.contains("Time Limit"));
            assert!(output.contains("01:30"));
            assert!(output.contains("[x]"));
            assert!(output.contains("Timed"));
        }

        #[test]
        fn hidden_fields_are_not_drawn() {
            let mut form = make_form();
            form.set_hidden(LOCK, true);
            let output = render(&form);
            assert!(!output.contains("Hide from learners"));
        }

        #[test]
        fn renders_error_message() {
            let mut form = make_form();
            form.set_error(TIME, "too long".into());
            assert!(render(&form).contains("too long"));
        }
    }
}
