use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::watch;

use crate::types::{LintResult, LintStatus, Warning};

/// Session flags plus the cached outcome of the last successful lint.
///
/// Both live in one snapshot so a commit that touches flags and results is
/// observed all at once.
#[derive(Debug, Clone, PartialEq)]
pub struct LintState {
    pub status: LintStatus,
    pub warnings: Arc<[Warning]>,
    pub version: String,
    pub info_config: Arc<Map<String, Value>>,
    /// Formatted code returned by the engine.
    pub output: String,
}

impl Default for LintState {
    fn default() -> Self {
        Self {
            status: LintStatus::default(),
            warnings: Arc::from(Vec::new()),
            version: String::new(),
            info_config: Arc::default(),
            output: String::new(),
        }
    }
}

impl LintState {
    pub fn has_diff(&self) -> bool {
        !self.output.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

pub struct LintStatusStore {
    cell: watch::Sender<Arc<LintState>>,
}

impl Default for LintStatusStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LintStatusStore {
    pub fn new() -> Self {
        let (cell, _) = watch::channel(Arc::new(LintState::default()));
        Self { cell }
    }

    pub fn snapshot(&self) -> Arc<LintState> {
        self.cell.borrow().clone()
    }

    pub fn status(&self) -> LintStatus {
        self.cell.borrow().status
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<LintState>> {
        self.cell.subscribe()
    }

    pub fn set_loading(&self, is_loading: bool) {
        self.update(|state| state.status.is_loading = is_loading);
    }

    pub fn set_loaded(&self, is_loaded: bool) {
        self.update(|state| state.status.is_loaded = is_loaded);
    }

    pub fn set_css_syntax_error(&self, is_css_syntax_error: bool) {
        self.update(|state| state.status.is_css_syntax_error = is_css_syntax_error);
    }

    pub fn toggle_show_rules(&self) {
        self.update(|state| state.status.is_show_rules = !state.status.is_show_rules);
    }

    /// Marks a lint run as started: loading on, syntax-error flag and stale
    /// warnings cleared.
    pub fn begin_run(&self) {
        self.update(|state| {
            state.status.is_loading = true;
            state.status.is_css_syntax_error = false;
            state.warnings = Arc::from(Vec::new());
        });
    }

    /// Stores a successful result and settles the run in one swap.
    pub fn commit_result(&self, result: &LintResult, has_syntax_error: bool) {
        self.update(|state| {
            state.warnings = Arc::from(result.warnings.as_slice());
            state.version = result.info.version.clone();
            state.info_config = Arc::new(result.info.config.clone().unwrap_or_default());
            state.output = result.output.clone();
            state.status.is_loaded = true;
            state.status.is_css_syntax_error = has_syntax_error;
            state.status.is_loading = false;
        });
    }

    /// Clears the cached result and the loaded/syntax-error flags. Loading
    /// and the rules panel are left as they are.
    pub fn reset(&self) {
        self.update(|state| {
            state.status.is_css_syntax_error = false;
            state.status.is_loaded = false;
            state.warnings = Arc::from(Vec::new());
            state.output.clear();
            state.version.clear();
            state.info_config = Arc::default();
        });
    }

    // Read-modify-write under the cell's lock, so two mutators in flight
    // never drop each other's field.
    fn update(&self, apply: impl FnOnce(&mut LintState)) {
        self.cell.send_modify(|current| {
            let mut next = LintState::clone(current);
            apply(&mut next);
            *current = Arc::new(next);
        });
    }
}
