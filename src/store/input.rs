use std::sync::Arc;

use tokio::sync::watch;

use crate::schema::defaults::SAMPLE_CODE;
use crate::types::Syntax;

/// Syntax choices offered to the user, in display order.
pub const SYNTAX_OPTIONS: [Syntax; 2] = [Syntax::Css, Syntax::Html];

/// What the user is editing: the code buffer and its syntax.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorInput {
    pub code: String,
    pub syntax: Syntax,
}

pub struct InputStore {
    cell: watch::Sender<Arc<EditorInput>>,
}

impl Default for InputStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InputStore {
    pub fn new() -> Self {
        let (cell, _) = watch::channel(Arc::new(EditorInput::default()));
        Self { cell }
    }

    pub fn get(&self) -> Arc<EditorInput> {
        self.cell.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<EditorInput>> {
        self.cell.subscribe()
    }

    pub fn code(&self) -> String {
        self.cell.borrow().code.clone()
    }

    pub fn syntax(&self) -> Syntax {
        self.cell.borrow().syntax
    }

    pub fn selected_label(&self) -> &'static str {
        self.syntax().label()
    }

    pub fn set_code(&self, code: impl Into<String>) {
        let code = code.into();
        self.update(|input| input.code = code);
    }

    pub fn reset_code(&self) {
        self.update(|input| input.code.clear());
    }

    pub fn load_sample(&self) {
        self.set_code(SAMPLE_CODE);
    }

    pub fn set_syntax(&self, syntax: Syntax) {
        self.cell.send_if_modified(|input| {
            if input.syntax == syntax {
                return false;
            }
            *input = Arc::new(EditorInput {
                syntax,
                ..EditorInput::clone(input)
            });
            true
        });
    }

    fn update(&self, apply: impl FnOnce(&mut EditorInput)) {
        self.cell.send_modify(|current| {
            let mut next = EditorInput::clone(current);
            apply(&mut next);
            *current = Arc::new(next);
        });
    }
}

/// `(syntax, label)` pairs for a syntax picker.
pub fn syntax_options() -> impl Iterator<Item = (Syntax, &'static str)> {
    SYNTAX_OPTIONS.into_iter().map(|syntax| (syntax, syntax.label()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty_with_css() {
        let input = InputStore::new();
        assert_eq!(input.code(), "");
        assert_eq!(input.syntax(), Syntax::Css);
        assert_eq!(input.selected_label(), "CSS");
    }

    #[test]
    fn code_edits_and_reset() {
        let input = InputStore::new();
        input.set_code("a{color:red}");
        assert_eq!(input.code(), "a{color:red}");

        input.reset_code();
        assert_eq!(input.code(), "");

        input.load_sample();
        assert!(input.code().starts_with("<style>"));
    }

    #[test]
    fn syntax_change_keeps_code_and_skips_no_ops() {
        let input = InputStore::new();
        input.set_code("<p></p>");
        let mut rx = input.subscribe();

        input.set_syntax(Syntax::Css);
        assert!(!rx.has_changed().unwrap());

        input.set_syntax(Syntax::Html);
        assert!(rx.has_changed().unwrap());
        assert_eq!(input.selected_label(), "HTML");
        assert_eq!(input.code(), "<p></p>");
    }

    #[test]
    fn options_are_labelled() {
        let options: Vec<_> = syntax_options().collect();
        assert_eq!(options, vec![(Syntax::Css, "CSS"), (Syntax::Html, "HTML")]);
    }
}
