//! Gallery - URI Ledger
//!
//! Ordered list of saved photo references, kept as one JSON array under a
//! single preferences key. Every change rewrites the whole record.

use std::sync::Arc;
use serde::{Deserialize, Serialize};

use crate::error::{GalleryError, GalleryResult};
use crate::platform::PreferencesPlugin;

/// Default preferences key
pub const DEFAULT_STORAGE_KEY: &str = "photos";

/// What to do with a stored value that does not parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorruptLedgerPolicy {
    /// Return `LedgerCorrupted`
    Fail,
    /// Move the raw value to `<key>.corrupt` and start empty
    #[default]
    Quarantine,
}

/// Result of [`UriLedger::load`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LedgerLoad {
    pub uris: Vec<String>,
    /// Set when a corrupt record was quarantined
    pub quarantined: bool,
}

/// URI Ledger
pub struct UriLedger {
    prefs: Arc<dyn PreferencesPlugin>,
    key: String,
    on_corrupt: CorruptLedgerPolicy,
    uris: Vec<String>,
}

impl UriLedger {
    pub fn new(prefs: Arc<dyn PreferencesPlugin>, key: impl Into<String>, on_corrupt: CorruptLedgerPolicy) -> Self {
        Self {
            prefs,
            key: key.into(),
            on_corrupt,
            uris: Vec::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Key a quarantined value is moved to
    pub fn quarantine_key(&self) -> String {
        format!("{}.corrupt", self.key)
    }

    /// In-memory entries, oldest first
    pub fn uris(&self) -> &[String] {
        &self.uris
    }

    pub fn len(&self) -> usize {
        self.uris.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }

    /// Read the persisted record, replacing the in-memory list
    pub fn load(&mut self) -> GalleryResult<LedgerLoad> {
        let value = self.prefs.get(&self.key)?;

        let Some(raw) = value else {
            self.uris.clear();
            return Ok(LedgerLoad::default());
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(uris) => {
                log::debug!("Ledger {:?} holds {} entries", self.key, uris.len());
                self.uris = uris.clone();
                Ok(LedgerLoad { uris, quarantined: false })
            }
            Err(e) => match self.on_corrupt {
                CorruptLedgerPolicy::Fail => {
                    Err(GalleryError::LedgerCorrupted(format!("{}: {}", self.key, e)))
                }
                CorruptLedgerPolicy::Quarantine => {
                    let backup = self.quarantine_key();
                    log::warn!(
                        "Ledger {:?} is corrupt ({}), moved raw value to {:?}",
                        self.key, e, backup
                    );
                    self.prefs.set(&backup, &raw)?;
                    self.prefs.remove(&self.key)?;
                    self.uris.clear();
                    Ok(LedgerLoad { uris: Vec::new(), quarantined: true })
                }
            },
        }
    }

    /// Append a reference and rewrite the record
    pub fn append(&mut self, reference: &str) -> GalleryResult<()> {
        self.uris.push(reference.to_string());
        if let Err(e) = self.persist() {
            self.uris.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Replace every entry and rewrite the record
    pub fn replace_all(&mut self, uris: Vec<String>) -> GalleryResult<()> {
        let previous = std::mem::replace(&mut self.uris, uris);
        if let Err(e) = self.persist() {
            self.uris = previous;
            return Err(e);
        }
        Ok(())
    }

    fn persist(&self) -> GalleryResult<()> {
        let value = serde_json::to_string(&self.uris)?;
        self.prefs.set(&self.key, &value)
    }
}
