use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;

use crate::schema::defaults::{default_config, default_rules, STORAGE_KEY_LINT_CONFIG};
use crate::schema::merge::{complete_config, overrides_of, Override};
use crate::storage::{read_json, write_json, KeyValueStore};
use crate::types::{LintConfig, OutputStyle, RuleValue};

/// Holds the current rule configuration and output style.
///
/// Every commit swaps in a complete new snapshot and then writes it to
/// storage. Readers holding an older `Arc` keep seeing that snapshot intact.
pub struct ConfigStore {
    cell: watch::Sender<Arc<LintConfig>>,
    storage: Arc<dyn KeyValueStore>,
    // Keeps memory order and storage order the same across writers.
    write: Mutex<()>,
}

impl ConfigStore {
    /// Loads the persisted configuration, or the default template when the
    /// key is absent or unreadable.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let config = read_json::<LintConfig>(storage.as_ref(), STORAGE_KEY_LINT_CONFIG)
            .map(complete_config)
            .unwrap_or_else(default_config);
        let (cell, _) = watch::channel(Arc::new(config));

        Self {
            cell,
            storage,
            write: Mutex::new(()),
        }
    }

    pub fn get(&self) -> Arc<LintConfig> {
        self.cell.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<LintConfig>> {
        self.cell.subscribe()
    }

    pub fn output_style(&self) -> OutputStyle {
        self.cell.borrow().output_style
    }

    /// Rules that differ from the default template.
    pub fn overrides(&self) -> Vec<Override> {
        overrides_of(&self.get().rules)
    }

    /// Replaces the whole configuration. Missing rules are filled in from
    /// the default template.
    pub fn set(&self, config: LintConfig) {
        let config = complete_config(config);
        self.commit(move |current| *current = config);
    }

    pub fn set_output_style(&self, style: OutputStyle) {
        self.commit(|current| current.output_style = style);
    }

    /// Sets one rule, leaving every other key untouched.
    pub fn update_rule(&self, key: &str, value: RuleValue) {
        self.commit(|current| {
            current.rules.insert(key.to_string(), value);
        });
    }

    /// Sets one rule from raw UI text using [`RuleValue::coerce`].
    pub fn update_rule_raw(&self, key: &str, raw: &str) {
        self.update_rule(key, RuleValue::coerce(raw));
    }

    /// Restores a fresh copy of the default configuration, output style
    /// included.
    pub fn reset(&self) {
        self.commit(|current| *current = default_config());
    }

    /// Writes the current snapshot to storage again.
    pub fn flush(&self) -> bool {
        let _guard = self.write.lock().unwrap_or_else(PoisonError::into_inner);
        self.persist(&self.get())
    }

    fn commit(&self, apply: impl FnOnce(&mut LintConfig)) {
        let _guard = self.write.lock().unwrap_or_else(PoisonError::into_inner);

        let mut next = LintConfig::clone(&self.get());
        apply(&mut next);
        let next = Arc::new(next);

        self.cell.send_replace(Arc::clone(&next));
        self.persist(&next);
    }

    fn persist(&self, config: &LintConfig) -> bool {
        write_json(self.storage.as_ref(), STORAGE_KEY_LINT_CONFIG, config)
    }
}
