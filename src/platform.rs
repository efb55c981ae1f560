//! Gallery - Platform Capabilities
//!
//! The device services the workflow talks to. Each one is a narrow
//! request/response contract; the host (mobile bridge, desktop shim, tests)
//! supplies the implementation.

use std::fmt;
use serde::{Deserialize, Serialize};

use crate::error::GalleryResult;

// ═══════════════════════════════════════════════════════════════════════════════
// PERMISSIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Grant state of a single device capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Granted,
    Denied,
    /// Not asked yet
    #[default]
    Prompt,
}

impl PermissionState {
    pub fn is_granted(self) -> bool {
        self == PermissionState::Granted
    }
}

/// Capability that can be requested from the camera service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionKind {
    Camera,
    Photos,
}

/// Grant states for camera and photo library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CameraPermissions {
    pub camera: PermissionState,
    pub photos: PermissionState,
}

impl CameraPermissions {
    pub fn new(camera: PermissionState, photos: PermissionState) -> Self {
        Self { camera, photos }
    }

    pub fn granted() -> Self {
        Self::new(PermissionState::Granted, PermissionState::Granted)
    }

    pub fn get(&self, kind: PermissionKind) -> PermissionState {
        match kind {
            PermissionKind::Camera => self.camera,
            PermissionKind::Photos => self.photos,
        }
    }

    pub fn set(&mut self, kind: PermissionKind, state: PermissionState) {
        match kind {
            PermissionKind::Camera => self.camera = state,
            PermissionKind::Photos => self.photos = state,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CAPTURE
// ═══════════════════════════════════════════════════════════════════════════════

/// Where the camera service takes the picture from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraSource {
    /// Device camera
    Camera,
    /// Photo library picker
    Photos,
    /// Let the user choose when capturing
    Prompt,
}

impl fmt::Display for CameraSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CameraSource::Camera => "camera",
            CameraSource::Photos => "photos",
            CameraSource::Prompt => "prompt",
        };
        f.write_str(name)
    }
}

/// Encoding of the returned picture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultType {
    Base64,
}

/// Capture request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageOptions {
    /// JPEG quality, 0-100
    pub quality: u8,
    pub result_type: ResultType,
    pub source: CameraSource,
}

/// Capture response. `base64` is `None` when the user dismissed the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPhoto {
    pub base64: Option<String>,
    /// File extension, e.g. `jpeg` or `png`
    pub format: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// FILESYSTEM
// ═══════════════════════════════════════════════════════════════════════════════

/// Storage area a file is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Directory {
    /// Application-private data
    Data,
    Cache,
    Documents,
}

impl Directory {
    pub fn dir_name(self) -> &'static str {
        match self {
            Directory::Data => "data",
            Directory::Cache => "cache",
            Directory::Documents => "documents",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CAPABILITY TRAITS
// ═══════════════════════════════════════════════════════════════════════════════

/// Camera service
pub trait CameraPlugin: Send + Sync {
    /// Current grants
    fn check_permissions(&self) -> GalleryResult<CameraPermissions>;

    /// Prompt the user for the given capabilities. A dismissed prompt is a
    /// normal return with non-granted states.
    fn request_permissions(&self, kinds: &[PermissionKind]) -> GalleryResult<CameraPermissions>;

    /// Take or pick a picture
    fn get_photo(&self, options: &ImageOptions) -> GalleryResult<CapturedPhoto>;
}

/// File storage service. Payloads cross this boundary base64-encoded.
pub trait FilesystemPlugin: Send + Sync {
    /// Write a new file and return its URI
    fn write_file(&self, path: &str, data: &str, directory: Directory) -> GalleryResult<String>;

    /// Read a file by URI or path
    fn read_file(&self, reference: &str) -> GalleryResult<String>;

    /// URIs of every file in a directory, sorted by name
    fn list_files(&self, directory: Directory) -> GalleryResult<Vec<String>>;

    fn delete_file(&self, reference: &str) -> GalleryResult<()>;
}

/// Small durable key-value store
pub trait PreferencesPlugin: Send + Sync {
    fn get(&self, key: &str) -> GalleryResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> GalleryResult<()>;

    fn remove(&self, key: &str) -> GalleryResult<()>;
}

/// Runtime identity
pub trait PlatformInfo: Send + Sync {
    /// `false` inside a plain web view
    fn is_native_platform(&self) -> bool;

    /// Platform name for diagnostics (`android`, `ios`, `web`, ...)
    fn platform(&self) -> &str;
}
