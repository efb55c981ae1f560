//! Gallery - Photo Catalog
//!
//! In-memory, append-only list of photos shown to the user.

use serde::{Deserialize, Serialize};

/// A photo ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRecord {
    /// `data:image/<format>;base64,<payload>`
    pub data_url: String,
    /// File extension
    pub format: String,
    /// Where the file lives
    pub storage_reference: String,
    /// Not yet confirmed in the ledger
    pub transient: bool,
}

impl PhotoRecord {
    /// Record for a photo already listed in the ledger
    pub fn persisted(payload: &str, format: &str, storage_reference: &str) -> Self {
        Self {
            data_url: data_url(format, payload),
            format: format.to_string(),
            storage_reference: storage_reference.to_string(),
            transient: false,
        }
    }

    /// Record for a photo whose ledger write is still unconfirmed
    pub fn transient(payload: &str, format: &str, storage_reference: &str) -> Self {
        Self {
            transient: true,
            ..Self::persisted(payload, format, storage_reference)
        }
    }

    /// Base64 payload carried in the data URL
    pub fn payload(&self) -> &str {
        self.data_url
            .split_once(',')
            .map(|(_, payload)| payload)
            .unwrap_or_default()
    }
}

/// Build a display data URL
pub fn data_url(format: &str, payload: &str) -> String {
    format!("data:image/{};base64,{}", format, payload)
}

/// Format of a stored photo: text after the last `.` of its reference, or the
/// whole reference when there is none.
pub fn derive_format(reference: &str) -> &str {
    reference.rsplit('.').next().unwrap_or(reference)
}

/// Photo Catalog
#[derive(Debug, Default)]
pub struct PhotoCatalog {
    photos: Vec<PhotoRecord>,
}

impl PhotoCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: PhotoRecord) {
        self.photos.push(record);
    }

    pub fn photos(&self) -> &[PhotoRecord] {
        &self.photos
    }

    pub fn get(&self, index: usize) -> Option<&PhotoRecord> {
        self.photos.get(index)
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// References of confirmed records, in catalog order. Equal to the
    /// ledger minus entries that could not be read at startup.
    pub fn persisted_references(&self) -> Vec<String> {
        self.photos
            .iter()
            .filter(|p| !p.transient)
            .map(|p| p.storage_reference.clone())
            .collect()
    }

    pub fn transient_count(&self) -> usize {
        self.photos.iter().filter(|p| p.transient).count()
    }

    /// Clear the transient flag of the record at `reference`
    pub fn mark_saved(&mut self, reference: &str) -> bool {
        match self
            .photos
            .iter_mut()
            .find(|p| p.transient && p.storage_reference == reference)
        {
            Some(record) => {
                record.transient = false;
                true
            }
            None => false,
        }
    }

    pub fn contains_reference(&self, reference: &str) -> bool {
        self.photos.iter().any(|p| p.storage_reference == reference)
    }
}
