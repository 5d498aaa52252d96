//! Sharing configurations as JSON documents.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};

use crate::errors::LintError;
use crate::io::atomic::atomic_write;
use crate::schema::validate::parse_import;
use crate::store::ConfigStore;
use crate::types::LintConfig;
use crate::ui::{Confirm, Notifier};

const IMPORT_SUCCESS: &str = "Configuration imported successfully.";

/// Where an imported document came from. Only changes the wording shown to
/// the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportSource {
    File,
    Clipboard,
}

impl ImportSource {
    fn prompt(self) -> &'static str {
        match self {
            ImportSource::File => {
                "Replace the current configuration with the imported one?\nThe current configuration will be overwritten."
            }
            ImportSource::Clipboard => {
                "Apply the configuration from the clipboard?\nThe current configuration will be overwritten."
            }
        }
    }

    fn failure(self) -> &'static str {
        match self {
            ImportSource::File => "Not a valid configuration file.\nCheck the JSON format.",
            ImportSource::Clipboard => "Not a valid configuration.\nCheck the JSON format.",
        }
    }
}

/// Pretty-printed JSON for the configuration.
pub fn export_json(config: &LintConfig) -> Result<String, LintError> {
    serde_json::to_string_pretty(config).map_err(|e| LintError::Storage {
        message: format!("Failed to serialize configuration: {}", e),
    })
}

/// `csslint-config-YYYY-MM-DD.json` for the given day.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("csslint-config-{}.json", date.format("%Y-%m-%d"))
}

pub fn suggested_file_name() -> String {
    export_file_name(Utc::now().date_naive())
}

/// Writes the current configuration into `dir` under today's suggested name
/// and returns the full path.
pub fn export_to_file(config: &ConfigStore, dir: &Path) -> Result<PathBuf, LintError> {
    let json = export_json(&config.get())?;
    let path = dir.join(suggested_file_name());
    atomic_write(&path, json.as_bytes())?;

    tracing::info!(path = %path.display(), "exported configuration");
    Ok(path)
}

/// Replaces the configuration with the one in `text` once the user agrees.
///
/// Returns `true` only when the configuration was replaced. A rejected
/// document or a failed check is reported through `notifier`; a declined
/// confirmation is silent.
pub fn import_text(
    config: &ConfigStore,
    text: &str,
    source: ImportSource,
    confirm: &dyn Confirm,
    notifier: &dyn Notifier,
) -> bool {
    let imported = match parse_import(text) {
        Ok(imported) => imported,
        Err(e) => {
            tracing::error!(error = %e, ?source, "rejected imported configuration");
            notifier.error(source.failure());
            return false;
        }
    };

    if !confirm.confirm(source.prompt()) {
        tracing::debug!(?source, "import declined");
        return false;
    }

    config.set(imported);
    notifier.success(IMPORT_SUCCESS);
    true
}

/// Reads `path` and imports it as a file.
pub fn import_file(
    config: &ConfigStore,
    path: &Path,
    confirm: &dyn Confirm,
    notifier: &dyn Notifier,
) -> bool {
    match fs::read_to_string(path) {
        Ok(text) => import_text(config, &text, ImportSource::File, confirm, notifier),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to read configuration file");
            notifier.error(ImportSource::File.failure());
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::defaults::{default_config, default_rules};
    use crate::storage::MemoryStore;
    use crate::testing::RecordingNotifier;
    use crate::types::{OutputStyle, RuleValue};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn store() -> ConfigStore {
        ConfigStore::load(Arc::new(MemoryStore::new()))
    }

    fn accept(_: &str) -> bool {
        true
    }

    fn decline(_: &str) -> bool {
        false
    }

    #[test]
    fn file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(export_file_name(date), "csslint-config-2024-03-07.json");
        assert!(suggested_file_name().starts_with("csslint-config-"));
    }

    #[test]
    fn export_is_pretty_and_reimportable() {
        let config = store();
        config.set_output_style(OutputStyle::Compact);
        let json = export_json(&config.get()).unwrap();
        assert!(json.contains("\n  \"outputStyle\": \"compact\""));

        let other = store();
        let notifier = RecordingNotifier::default();
        assert!(import_text(&other, &json, ImportSource::Clipboard, &accept, &notifier));
        assert_eq!(*other.get(), *config.get());
    }

    #[test]
    fn export_to_file_writes_into_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = store();

        let path = export_to_file(&config, dir.path()).unwrap();
        assert_eq!(path.parent(), Some(dir.path()));
        let written: LintConfig =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, default_config());
    }

    #[test]
    fn export_to_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = export_to_file(&store(), &dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, LintError::Storage { .. }));
    }

    #[test]
    fn partial_import_is_completed() {
        let config = store();
        let notifier = RecordingNotifier::default();
        let text = r#"{ "rules": { "color-named": "always", "custom/rule": true } }"#;

        assert!(import_text(&config, text, ImportSource::File, &accept, &notifier));

        let current = config.get();
        assert_eq!(current.rules["color-named"], RuleValue::from("always"));
        assert_eq!(current.rules["custom/rule"], RuleValue::Bool(true));
        assert_eq!(current.rules.len(), default_rules().len() + 1);
        assert_eq!(notifier.successes(), vec![IMPORT_SUCCESS.to_string()]);
    }

    #[test]
    fn declined_import_changes_nothing() {
        let config = store();
        let before = config.get();
        let notifier = RecordingNotifier::default();

        let asked = AtomicUsize::new(0);
        let counting_decline = |prompt: &str| {
            asked.fetch_add(1, Ordering::SeqCst);
            assert!(prompt.contains("overwritten"));
            false
        };

        assert!(!import_text(
            &config,
            r#"{ "rules": {} }"#,
            ImportSource::File,
            &counting_decline,
            &notifier
        ));
        assert_eq!(asked.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&before, &config.get()));
        assert!(notifier.errors().is_empty());
        assert!(notifier.successes().is_empty());
    }

    #[test]
    fn invalid_documents_are_rejected_before_confirmation() {
        let config = store();
        let before = config.get();

        for text in ["not json", "[1, 2]", r#"{ "outputStyle": "nested" }"#, r#"{ "rules": 3 }"#] {
            let notifier = RecordingNotifier::default();
            let never_asked = |_: &str| -> bool { panic!("confirmation requested for {}", text) };
            assert!(!import_text(&config, text, ImportSource::Clipboard, &never_asked, &notifier));
            assert_eq!(notifier.errors(), vec![ImportSource::Clipboard.failure().to_string()]);
        }
        assert!(Arc::ptr_eq(&before, &config.get()));
    }

    #[test]
    fn import_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shared.json");
        fs::write(&path, r#"{ "outputStyle": "nested", "rules": {} }"#).unwrap();

        let config = store();
        let notifier = RecordingNotifier::default();
        assert!(import_file(&config, &path, &accept, &notifier));
        assert_eq!(config.output_style(), OutputStyle::Nested);

        assert!(!import_file(&config, &dir.path().join("missing.json"), &accept, &notifier));
        assert_eq!(notifier.errors(), vec![ImportSource::File.failure().to_string()]);
        assert!(!import_file(&config, &path, &decline, &notifier));
    }
}
