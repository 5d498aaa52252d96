pub mod commands;
pub mod errors;
pub mod io;
pub mod logging;
pub mod platform;
pub mod schema;
pub mod service;
pub mod settings;
pub mod storage;
pub mod store;
pub mod types;
pub mod ui;

#[cfg(test)]
mod testing;

use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use commands::lint::LintOrchestrator;
pub use commands::transfer::ImportSource;
pub use errors::{LintError, StorageError};
pub use service::{HttpTransport, LintService, LintTransport};
pub use settings::Settings;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::{ConfigStore, InputStore, LintState, LintStatusStore, PresetStore};
pub use types::*;
pub use ui::{Confirm, Notifier, TracingNotifier};

use crate::logging::LogConfig;

/// Every store and service of one editing session, wired together.
///
/// Hosts build one with [`LintApp::new`] (everything injected) or
/// [`LintApp::from_settings`] (file storage, HTTP transport, log notifier),
/// and call [`LintApp::shutdown`] before exiting.
pub struct LintApp {
    config: Arc<ConfigStore>,
    presets: Arc<PresetStore>,
    status: Arc<LintStatusStore>,
    input: Arc<InputStore>,
    orchestrator: LintOrchestrator,
    notifier: Arc<dyn Notifier>,
}

impl LintApp {
    pub fn new(
        storage: Arc<dyn KeyValueStore>,
        transport: Arc<dyn LintTransport>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let config = Arc::new(ConfigStore::load(Arc::clone(&storage)));
        let presets = Arc::new(PresetStore::load(storage, Arc::clone(&config)));
        let status = Arc::new(LintStatusStore::new());
        let orchestrator = LintOrchestrator::new(
            LintService::new(transport),
            Arc::clone(&config),
            Arc::clone(&status),
            Arc::clone(&notifier),
        );

        Self {
            config,
            presets,
            status,
            input: Arc::new(InputStore::new()),
            orchestrator,
            notifier,
        }
    }

    /// File-backed storage under `settings.data_dir` and the HTTP transport.
    pub fn from_settings(settings: &Settings) -> Result<Self, LintError> {
        let storage = FileStore::open(&settings.data_dir)?;
        let transport = HttpTransport::new(settings)?;
        tracing::info!(
            data_dir = %settings.data_dir.display(),
            endpoint = %transport.endpoint(),
            "starting lint session"
        );

        Ok(Self::new(
            Arc::new(storage),
            Arc::new(transport),
            Arc::new(TracingNotifier),
        ))
    }

    /// Reads settings from the environment, installs logging into the data
    /// directory, then builds the session.
    pub fn from_env() -> Result<Self, LintError> {
        let settings = Settings::from_env();
        let log_config = LogConfig::from_settings(&settings).with_file_in(&settings.data_dir);
        if let Err(e) = logging::init_logging(&log_config) {
            eprintln!("failed to initialize logging: {}", e);
        }
        Self::from_settings(&settings)
    }

    pub fn config(&self) -> &Arc<ConfigStore> {
        &self.config
    }

    pub fn presets(&self) -> &Arc<PresetStore> {
        &self.presets
    }

    pub fn status(&self) -> &Arc<LintStatusStore> {
        &self.status
    }

    pub fn input(&self) -> &Arc<InputStore> {
        &self.input
    }

    pub fn orchestrator(&self) -> &LintOrchestrator {
        &self.orchestrator
    }

    pub async fn run(&self, code: &str, syntax: Syntax) -> Option<LintResult> {
        self.orchestrator.run(code, syntax).await
    }

    /// Lints whatever is in the editor.
    pub async fn run_current(&self) -> Option<LintResult> {
        let input = self.input.get();
        self.orchestrator.run(&input.code, input.syntax).await
    }

    pub fn export_json(&self) -> Result<String, LintError> {
        commands::transfer::export_json(&self.config.get())
    }

    pub fn export_to_file(&self, dir: &Path) -> Result<PathBuf, LintError> {
        commands::transfer::export_to_file(&self.config, dir)
    }

    pub fn import_text(&self, text: &str, source: ImportSource, confirm: &dyn Confirm) -> bool {
        commands::transfer::import_text(&self.config, text, source, confirm, self.notifier.as_ref())
    }

    pub fn import_file(&self, path: &Path, confirm: &dyn Confirm) -> bool {
        commands::transfer::import_file(&self.config, path, confirm, self.notifier.as_ref())
    }

    /// Writes the final configuration and preset list to storage. Returns
    /// `false` if either write failed; in-memory state is unaffected.
    pub fn shutdown(&self) -> bool {
        let config_ok = self.config.flush();
        let presets_ok = self.presets.flush();
        tracing::info!(config_ok, presets_ok, "lint session closed");
        config_ok && presets_ok
    }
}
