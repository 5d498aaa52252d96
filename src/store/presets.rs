use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use tokio::sync::watch;

use super::config::ConfigStore;
use crate::errors::LintError;
use crate::schema::defaults::{MAX_PRESETS, MAX_PRESET_NAME_LEN, STORAGE_KEY_PRESETS};
use crate::storage::{read_json, write_json, KeyValueStore};
use crate::types::{Preset, PresetId};

/// Named snapshots of the configuration.
///
/// The list is persisted as one value under one key, and every mutation
/// swaps in a whole new list.
pub struct PresetStore {
    cell: watch::Sender<Arc<Vec<Preset>>>,
    config: Arc<ConfigStore>,
    storage: Arc<dyn KeyValueStore>,
    write: Mutex<()>,
}

impl PresetStore {
    pub fn load(storage: Arc<dyn KeyValueStore>, config: Arc<ConfigStore>) -> Self {
        let presets = sanitize_loaded(
            read_json::<Vec<Preset>>(storage.as_ref(), STORAGE_KEY_PRESETS).unwrap_or_default(),
        );
        let (cell, _) = watch::channel(Arc::new(presets));

        Self {
            cell,
            config,
            storage,
            write: Mutex::new(()),
        }
    }

    pub fn list(&self) -> Arc<Vec<Preset>> {
        self.cell.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Preset>>> {
        self.cell.subscribe()
    }

    pub fn len(&self) -> usize {
        self.cell.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cell.borrow().is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.len() >= MAX_PRESETS
    }

    pub fn get(&self, id: &PresetId) -> Option<Preset> {
        self.cell.borrow().iter().find(|p| &p.id == id).cloned()
    }

    /// Saves the current configuration under `name`.
    pub fn save(&self, name: &str) -> Result<Preset, LintError> {
        let _guard = self.write.lock().unwrap_or_else(PoisonError::into_inner);
        let presets = self.list();

        if presets.len() >= MAX_PRESETS {
            return Err(LintError::Capacity { max: MAX_PRESETS });
        }
        let name = normalize_name(name)?;
        if presets.iter().any(|p| p.name == name) {
            return Err(LintError::DuplicateName { name });
        }

        let now = Utc::now();
        let preset = Preset {
            id: PresetId::generate(),
            name,
            config: self.config.get().as_ref().clone(),
            created_at: now,
            updated_at: now,
        };

        let mut next = presets.as_ref().clone();
        next.push(preset.clone());
        self.commit(next);

        tracing::debug!(id = %preset.id, name = %preset.name, "saved preset");
        Ok(preset)
    }

    /// Replaces the configuration with a copy of the preset's snapshot.
    /// Unknown ids are ignored.
    pub fn load_into_config(&self, id: &PresetId) -> bool {
        match self.get(id) {
            Some(preset) => {
                self.config.set(preset.config);
                true
            }
            None => false,
        }
    }

    /// Removes the preset. Unknown ids are ignored.
    pub fn delete(&self, id: &PresetId) {
        let _guard = self.write.lock().unwrap_or_else(PoisonError::into_inner);
        let presets = self.list();
        if !presets.iter().any(|p| &p.id == id) {
            return;
        }

        let next = presets.iter().filter(|p| &p.id != id).cloned().collect();
        self.commit(next);
    }

    /// Renames a preset. Keeping its own current name is allowed.
    /// Unknown ids are ignored.
    pub fn rename(&self, id: &PresetId, new_name: &str) -> Result<(), LintError> {
        let _guard = self.write.lock().unwrap_or_else(PoisonError::into_inner);
        let presets = self.list();

        let name = normalize_name(new_name)?;
        if presets.iter().any(|p| &p.id != id && p.name == name) {
            return Err(LintError::DuplicateName { name });
        }
        if !presets.iter().any(|p| &p.id == id) {
            return Ok(());
        }

        let now = Utc::now();
        let next = presets
            .iter()
            .map(|p| {
                if &p.id == id {
                    Preset {
                        name: name.clone(),
                        updated_at: now,
                        ..p.clone()
                    }
                } else {
                    p.clone()
                }
            })
            .collect();
        self.commit(next);
        Ok(())
    }

    pub fn flush(&self) -> bool {
        let _guard = self.write.lock().unwrap_or_else(PoisonError::into_inner);
        write_json(self.storage.as_ref(), STORAGE_KEY_PRESETS, self.list().as_slice())
    }

    // Callers hold `self.write`.
    fn commit(&self, presets: Vec<Preset>) {
        let presets = Arc::new(presets);
        self.cell.send_replace(Arc::clone(&presets));
        write_json(self.storage.as_ref(), STORAGE_KEY_PRESETS, presets.as_slice());
    }
}

// Applies the limits `save` enforces to a list read back from storage:
// first occurrence of each name wins, then at most `MAX_PRESETS` entries.
fn sanitize_loaded(stored: Vec<Preset>) -> Vec<Preset> {
    let total = stored.len();
    let mut seen = HashSet::new();
    let mut presets: Vec<Preset> = stored
        .into_iter()
        .filter(|p| {
            let first = seen.insert(p.name.clone());
            if !first {
                tracing::warn!(id = %p.id, name = %p.name, "dropping stored preset with duplicate name");
            }
            first
        })
        .collect();

    if presets.len() > MAX_PRESETS {
        tracing::warn!(
            stored = presets.len(),
            max = MAX_PRESETS,
            "stored preset list exceeds capacity, truncating"
        );
        presets.truncate(MAX_PRESETS);
    }
    if presets.len() != total {
        tracing::debug!(stored = total, kept = presets.len(), "sanitized stored presets");
    }
    presets
}

fn normalize_name(raw: &str) -> Result<String, LintError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(LintError::EmptyName);
    }
    if name.chars().count() > MAX_PRESET_NAME_LEN {
        return Err(LintError::NameTooLong {
            max: MAX_PRESET_NAME_LEN,
        });
    }
    Ok(name.to_string())
}
