//! Reusable TUI widgets.

pub mod form;

pub use form::{FieldChoice, FieldKind, Form, FormField, draw_form};
