//! # Gallery
//!
//! Capture photos, keep them on device storage, show them again after restart.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                     PHOTO SESSION                        │
//! │        initialize (reload)   |   take_photo (capture)    │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────┐  │
//! │  │ PERMISSION  │  │  CAPTURE    │  │  ERROR QUEUE    │  │
//! │  │ GATEWAY     │  │  SOURCE     │  │  (user msgs)    │  │
//! │  └──────┬──────┘  └─────────────┘  └─────────────────┘  │
//! │         │                                                │
//! │  ┌──────┴──────┐  ┌─────────────┐  ┌─────────────────┐  │
//! │  │   CAMERA    │  │ IMAGE STORE │  │   URI LEDGER    │  │
//! │  │   PLUGIN    │  │ (files)     │  │  (preferences)  │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────┘  │
//! │                                                          │
//! │               PHOTO CATALOG (in memory)                  │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Persistence
//!
//! - Each photo is a new file `<unix-millis>.<ext>` in the app data directory
//! - The ledger (one JSON array under the `photos` preference) lists them in
//!   capture order
//! - A capture returns only after the ledger write; if that write fails the
//!   photo stays in the catalog as transient until [`PhotoSession::retry_unsaved`]
//! - [`PhotoSession::reconcile`] finds files the ledger has lost

pub mod catalog;
pub mod config;
pub mod desktop;
pub mod error;
pub mod filesystem;
pub mod image_store;
pub mod ledger;
pub mod notifications;
pub mod permissions;
pub mod platform;
pub mod preferences;
pub mod session;
pub mod source;

#[cfg(test)]
mod testing;

pub use catalog::{derive_format, PhotoCatalog, PhotoRecord};
pub use config::GalleryConfig;
pub use error::{GalleryError, GalleryResult};
pub use image_store::ImageStore;
pub use ledger::UriLedger;
pub use permissions::{PermissionGateway, PermissionPolicy};
pub use session::{CaptureOutcome, OrphanAction, PhotoSession, Services};
pub use source::select_source;

/// Gallery version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
