use tracing::warn;

use super::{keys, HistoryEntry, KeyValueStore, Persistence, StoreError, HISTORY_LIMIT};

/// Best score, history and sound preference on top of a key-value store.
#[derive(Debug, Clone, Default)]
pub struct Scorebook<K> {
    kv: K,
}

impl<K: KeyValueStore> Scorebook<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    /// Forgets history and best score. The sound preference is kept.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.kv.remove(keys::HISTORY)?;
        self.kv.remove(keys::BEST)
    }
}

impl<K: KeyValueStore> Persistence for Scorebook<K> {
    fn best_score(&self) -> u32 {
        self.kv
            .get(keys::BEST)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(0)
    }

    fn set_best_score(&mut self, score: u32) -> Result<(), StoreError> {
        self.kv.set(keys::BEST, score.to_string())
    }

    fn history(&self) -> Vec<HistoryEntry> {
        let Some(raw) = self.kv.get(keys::HISTORY) else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(error = %err, "history payload unreadable, treating as empty");
                Vec::new()
            }
        }
    }

    fn append_history(&mut self, entry: HistoryEntry) -> Result<(), StoreError> {
        let mut history = self.history();
        history.insert(0, entry);
        history.truncate(HISTORY_LIMIT);
        let payload = serde_json::to_string(&history)?;
        self.kv.set(keys::HISTORY, payload)
    }

    fn sound_enabled(&self) -> bool {
        self.kv
            .get(keys::SOUND)
            .map(|raw| raw == "true")
            .unwrap_or(true)
    }

    fn set_sound_enabled(&mut self, enabled: bool) -> Result<(), StoreError> {
        self.kv.set(keys::SOUND, enabled.to_string())
    }
}
