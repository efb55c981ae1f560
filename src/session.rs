//! Gallery - Photo Session
//!
//! Runs the two workflows over the device services:
//!
//! - **initialize**: load the ledger, refresh grants, reload every photo.
//! - **take_photo**: check/request grants, capture, save, record.
//!
//! Every failure on the capture path ends in the user error queue.

use std::sync::Arc;
use serde::Serialize;

use crate::catalog::{derive_format, PhotoCatalog, PhotoRecord};
use crate::config::GalleryConfig;
use crate::error::{GalleryError, GalleryResult};
use crate::image_store::ImageStore;
use crate::ledger::UriLedger;
use crate::notifications::ErrorQueue;
use crate::permissions::PermissionGateway;
use crate::platform::{
    CameraPermissions, CameraPlugin, Directory, FilesystemPlugin, ImageOptions, PlatformInfo,
    PreferencesPlugin, ResultType,
};
use crate::source::source_for;

// ═══════════════════════════════════════════════════════════════════════════════
// TYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// Device services a session runs on
#[derive(Clone)]
pub struct Services {
    pub camera: Arc<dyn CameraPlugin>,
    pub filesystem: Arc<dyn FilesystemPlugin>,
    pub preferences: Arc<dyn PreferencesPlugin>,
    pub platform: Arc<dyn PlatformInfo>,
}

/// Capture workflow state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorkflowState {
    Idle,
    PermissionCheck,
    PermissionRequest,
    Capturing,
    Saving,
    Cataloged,
    ErrorReported,
}

/// Result of [`PhotoSession::take_photo`]
#[derive(Debug)]
pub enum CaptureOutcome {
    /// Saved and recorded in the ledger
    Captured(PhotoRecord),
    /// File saved but the ledger write failed; the record is transient
    Unsaved {
        record: PhotoRecord,
        error: GalleryError,
    },
    /// Nothing was added
    Failed(GalleryError),
}

impl CaptureOutcome {
    pub fn record(&self) -> Option<&PhotoRecord> {
        match self {
            CaptureOutcome::Captured(record) | CaptureOutcome::Unsaved { record, .. } => Some(record),
            CaptureOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&GalleryError> {
        match self {
            CaptureOutcome::Captured(_) => None,
            CaptureOutcome::Unsaved { error, .. } | CaptureOutcome::Failed(error) => Some(error),
        }
    }
}

/// Report from [`PhotoSession::initialize`]
#[derive(Debug, Clone, Default, Serialize)]
pub struct InitReport {
    /// Photos placed in the catalog
    pub loaded: usize,
    /// Ledger entries whose files are gone (pruned from the ledger)
    pub missing: Vec<String>,
    /// Ledger entries that failed to load for another reason (kept in the ledger)
    pub unreadable: Vec<String>,
    /// Unreadable ledger moved aside
    pub ledger_quarantined: bool,
    /// Orphaned files added back
    pub adopted: usize,
    pub permissions: CameraPermissions,
}

/// What [`PhotoSession::reconcile`] does with orphaned files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrphanAction {
    /// Only list them
    Report,
    /// Append them to the ledger and catalog
    Adopt,
    /// Delete the files
    Delete,
}

/// Report from [`PhotoSession::reconcile`]
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileReport {
    /// Files in the data directory that no ledger entry points to
    pub orphans: Vec<String>,
    pub adopted: usize,
    pub deleted: usize,
}

// ═══════════════════════════════════════════════════════════════════════════════
// PHOTO SESSION
// ═══════════════════════════════════════════════════════════════════════════════

/// Photo Session - owns all workflow state for one app lifetime
pub struct PhotoSession {
    config: GalleryConfig,
    camera: Arc<dyn CameraPlugin>,
    filesystem: Arc<dyn FilesystemPlugin>,
    platform: Arc<dyn PlatformInfo>,
    permissions: PermissionGateway,
    store: ImageStore,
    ledger: UriLedger,
    catalog: PhotoCatalog,
    errors: ErrorQueue,
    state: WorkflowState,
    /// Set once initialize succeeded
    init: Option<InitReport>,
}

impl PhotoSession {
    pub fn new(services: Services, config: GalleryConfig) -> Self {
        let permissions = PermissionGateway::new(
            Arc::clone(&services.camera),
            services.platform.platform(),
        );
        let store = ImageStore::new(Arc::clone(&services.filesystem));
        let ledger = UriLedger::new(
            Arc::clone(&services.preferences),
            config.storage_key.clone(),
            config.corrupt_ledger,
        );

        Self {
            config,
            camera: services.camera,
            filesystem: services.filesystem,
            platform: services.platform,
            permissions,
            store,
            ledger,
            catalog: PhotoCatalog::new(),
            errors: ErrorQueue::new(),
            state: WorkflowState::Idle,
            init: None,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // ACCESSORS
    // ═══════════════════════════════════════════════════════════════════════

    pub fn photos(&self) -> &[PhotoRecord] {
        self.catalog.photos()
    }

    pub fn catalog(&self) -> &PhotoCatalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &[String] {
        self.ledger.uris()
    }

    pub fn errors(&mut self) -> &mut ErrorQueue {
        &mut self.errors
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn permissions(&self) -> CameraPermissions {
        self.permissions.state()
    }

    /// Prompt for any grant not yet given
    pub fn request_permissions(&mut self) -> CameraPermissions {
        self.permissions.request()
    }

    pub fn is_initialized(&self) -> bool {
        self.init.is_some()
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    fn set_state(&mut self, next: WorkflowState) {
        log::debug!("Workflow {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    // ═══════════════════════════════════════════════════════════════════════
    // INITIALIZE
    // ═══════════════════════════════════════════════════════════════════════

    /// Reload saved photos. Runs once; later calls return the first report.
    pub fn initialize(&mut self) -> GalleryResult<InitReport> {
        if let Some(ref report) = self.init {
            log::debug!("Session already initialized");
            return Ok(report.clone());
        }

        let loaded = self.ledger.load()?;
        let permissions = self.permissions.query();

        let mut records = Vec::with_capacity(loaded.uris.len());
        let mut kept = Vec::with_capacity(loaded.uris.len());
        let mut missing = Vec::new();
        let mut unreadable = Vec::new();

        for uri in &loaded.uris {
            match self.store.load(uri) {
                Ok(payload) => {
                    records.push(PhotoRecord::persisted(&payload, derive_format(uri), uri));
                    kept.push(uri.clone());
                }
                Err(GalleryError::FileNotFound(_)) => {
                    log::warn!("Dropping ledger entry {}: file is gone", uri);
                    missing.push(uri.clone());
                }
                Err(e) => {
                    log::error!("Cannot load {}, keeping it in the ledger: {}", uri, e);
                    unreadable.push(uri.clone());
                    kept.push(uri.clone());
                }
            }
        }

        if !missing.is_empty() {
            self.ledger.replace_all(kept)?;
        }

        for record in records {
            self.catalog.push(record);
        }

        let mut report = InitReport {
            loaded: self.catalog.len(),
            missing,
            unreadable,
            ledger_quarantined: loaded.quarantined,
            adopted: 0,
            permissions,
        };

        if self.config.adopt_orphans {
            match self.reconcile_loaded(OrphanAction::Adopt) {
                Ok(reconciled) => {
                    report.adopted = reconciled.adopted;
                    report.loaded = self.catalog.len();
                }
                Err(e) => {
                    self.catalog = PhotoCatalog::new();
                    return Err(e);
                }
            }
        }

        log::info!(
            "Loaded {} photos ({} missing, {} unreadable) on {}",
            report.loaded,
            report.missing.len(),
            report.unreadable.len(),
            self.platform.platform()
        );

        self.init = Some(report.clone());
        Ok(report)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // CAPTURE
    // ═══════════════════════════════════════════════════════════════════════

    /// Take a photo and keep it. Failures are queued for the user and
    /// returned in the outcome.
    pub fn take_photo(&mut self) -> CaptureOutcome {
        self.set_state(WorkflowState::Idle);

        match self.capture() {
            Ok(CaptureOutcome::Unsaved { record, error }) => {
                self.errors.enqueue_error_message(error.user_message());
                CaptureOutcome::Unsaved { record, error }
            }
            Ok(outcome) => outcome,
            Err(e) => {
                if e.is_permission_error() {
                    log::info!("Capture refused: {}", e);
                } else {
                    log::error!("Capture failed: {}", e);
                }
                self.set_state(WorkflowState::ErrorReported);
                self.errors.enqueue_error_message(e.user_message());
                CaptureOutcome::Failed(e)
            }
        }
    }

    fn capture(&mut self) -> GalleryResult<CaptureOutcome> {
        self.initialize()?;

        self.set_state(WorkflowState::PermissionCheck);
        if !self.permissions.has_all() {
            self.set_state(WorkflowState::PermissionRequest);
            self.permissions.request();
        }

        let perms = self.permissions.state();
        if !self.config.permission_policy.is_satisfied(&perms) {
            return Err(GalleryError::PermissionDenied);
        }

        self.set_state(WorkflowState::Capturing);
        let options = ImageOptions {
            quality: self.config.quality,
            result_type: ResultType::Base64,
            source: source_for(self.platform.is_native_platform(), &perms),
        };
        let photo = self.camera.get_photo(&options)?;

        let payload = match photo.base64 {
            Some(payload) if !payload.is_empty() => payload,
            _ => return Err(GalleryError::CaptureEmptyPayload),
        };

        self.set_state(WorkflowState::Saving);
        let reference = self.store.save(&payload, &photo.format)?;

        let outcome = match self.ledger.append(&reference) {
            Ok(()) => {
                let record = PhotoRecord::persisted(&payload, &photo.format, &reference);
                self.catalog.push(record.clone());
                CaptureOutcome::Captured(record)
            }
            Err(error) => {
                log::error!("Photo {} saved but not recorded: {}", reference, error);
                let record = PhotoRecord::transient(&payload, &photo.format, &reference);
                self.catalog.push(record.clone());
                CaptureOutcome::Unsaved { record, error }
            }
        };

        self.set_state(WorkflowState::Cataloged);
        Ok(outcome)
    }

    /// Write transient records into the ledger, keeping catalog order.
    /// Ledger entries that are not in the catalog stay where they are.
    /// Returns how many were confirmed.
    pub fn retry_unsaved(&mut self) -> GalleryResult<usize> {
        let pending: Vec<String> = self
            .catalog
            .photos()
            .iter()
            .filter(|p| p.transient)
            .map(|p| p.storage_reference.clone())
            .collect();

        if pending.is_empty() {
            return Ok(0);
        }

        let mut uris = self.ledger.uris().to_vec();
        let mut anchor: Option<usize> = None;
        for photo in self.catalog.photos() {
            if !photo.transient {
                anchor = uris.iter().position(|u| *u == photo.storage_reference);
                continue;
            }
            // After the previous catalog entry, else before the first one
            let at = match anchor {
                Some(i) => i + 1,
                None => self
                    .catalog
                    .photos()
                    .iter()
                    .filter(|p| !p.transient)
                    .find_map(|p| uris.iter().position(|u| *u == p.storage_reference))
                    .unwrap_or(uris.len()),
            };
            uris.insert(at, photo.storage_reference.clone());
            anchor = Some(at);
        }
        self.ledger.replace_all(uris)?;

        for reference in &pending {
            self.catalog.mark_saved(reference);
        }

        log::info!("Recorded {} previously unsaved photos", pending.len());
        Ok(pending.len())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // RECONCILE
    // ═══════════════════════════════════════════════════════════════════════

    /// Find photo files in the data directory that the ledger has lost track
    /// of, and optionally adopt or delete them.
    pub fn reconcile(&mut self, action: OrphanAction) -> GalleryResult<ReconcileReport> {
        self.initialize()?;
        self.reconcile_loaded(action)
    }

    fn reconcile_loaded(&mut self, action: OrphanAction) -> GalleryResult<ReconcileReport> {
        let known: Vec<String> = self
            .catalog
            .photos()
            .iter()
            .map(|p| p.storage_reference.as_str())
            .chain(self.ledger.uris().iter().map(String::as_str))
            .map(|r| file_name(r).to_string())
            .collect();

        let orphans: Vec<String> = self
            .filesystem
            .list_files(Directory::Data)?
            .into_iter()
            .filter(|uri| !known.iter().any(|k| k == file_name(uri)))
            .collect();

        let mut report = ReconcileReport {
            orphans: orphans.clone(),
            ..Default::default()
        };

        if orphans.is_empty() {
            return Ok(report);
        }
        log::warn!("Found {} orphaned photo files", orphans.len());

        match action {
            OrphanAction::Report => {}
            OrphanAction::Adopt => {
                let mut records = Vec::new();
                for uri in &orphans {
                    match self.store.load(uri) {
                        Ok(payload) => {
                            records.push(PhotoRecord::persisted(&payload, derive_format(uri), uri))
                        }
                        Err(e) => log::warn!("Cannot adopt {}: {}", uri, e),
                    }
                }

                let mut uris = self.ledger.uris().to_vec();
                uris.extend(records.iter().map(|r| r.storage_reference.clone()));
                self.ledger.replace_all(uris)?;

                report.adopted = records.len();
                for record in records {
                    self.catalog.push(record);
                }
            }
            OrphanAction::Delete => {
                for uri in &orphans {
                    self.filesystem.delete_file(uri)?;
                    report.deleted += 1;
                }
            }
        }

        Ok(report)
    }
}

/// Last path segment of a reference
fn file_name(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}
