#![allow(clippy::missing_errors_doc)]
#![allow(clippy::uninlined_format_args)]

//! # Background Removal Service Client
//!
//! A Rust client library and CLI for a remote image background-removal
//! service. The service performs all pixel work (segmentation, compositing,
//! filtering); this crate is the session shell around it: it holds the two
//! pieces of in-memory image state, drives the two processing endpoints, and
//! saves results locally.
//!
//! ## Features
//!
//! - **Session state**: original and processed images held as data URLs,
//!   with the processed slot absent until removal succeeds
//! - **Upload ceiling**: size limit enforced before any bytes leave the
//!   process (5 MiB by default, configurable per deployment variant)
//! - **Effects**: background color or custom backdrop, brightness, contrast,
//!   sharpness, and edge smoothing, submitted server-side
//! - **Exports**: PNG pass-through or JPEG over a white matte, named after
//!   the original upload
//! - **CLI Integration**: optional command-line interface (enable with the
//!   `cli` feature)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bgremove_client::{ClientConfig, HttpRemovalService, OutputFormat, Session};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::builder()
//!     .service_url("http://localhost:5000")
//!     .build()?;
//! let service = HttpRemovalService::new(config.clone())?;
//!
//! let mut session = Session::new(config);
//! session.load_original("photo.jpg")?;
//! session.remove_background(&service).await?;
//! session.export(".", OutputFormat::Png)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Library vs CLI Usage
//!
//! All session and service functionality is available by default; the `cli`
//! feature adds the command-line interface and progress reporting. To use
//! only as a library:
//!
//! ```toml
//! [dependencies]
//! bgremove-client = { version = "0.1", default-features = false }
//! ```
//!
//! ## Service seam
//!
//! The session talks to the backend through the [`RemovalService`] trait, so
//! tests (and alternative transports) can substitute implementations without
//! touching session logic.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod data_url;
pub mod effects;
pub mod error;
pub mod export;
pub mod service;
pub mod session;
#[cfg(feature = "cli")]
pub mod tracing_config;

// Public API exports
pub use config::{
    ClientConfig, ClientConfigBuilder, OutputFormat, DEFAULT_MAX_UPLOAD_BYTES,
    DEFAULT_REQUEST_TIMEOUT, MAX_UPLOAD_CEILING_BYTES,
};
pub use data_url::DataUrl;
pub use effects::{BackgroundChoice, EffectSettings, EffectSettingsBuilder};
pub use error::{ClientError, Result};
pub use export::{encode_jpeg_on_white, write_jpeg_on_white, write_png};
pub use service::{
    ApplyEffectsRequest, HealthResponse, HttpRemovalService, RemovalService, ServiceResponse,
};
pub use session::{Applied, OriginalImage, Session, SessionPhase};

#[cfg(feature = "cli")]
pub use tracing_config::{init_cli_tracing, TracingConfig, TracingFormat};

/// Remove the background of a local file via the configured service
///
/// Convenience one-shot covering load, ceiling check, and the
/// remove-background call; returns the processed PNG.
///
/// # Arguments
///
/// * `path` - Local image file to process
/// * `config` - Client configuration (service URL, ceiling, timeout)
///
/// # Errors
/// - File too large or unreadable
/// - Transport, status, or service-reported errors
pub async fn remove_background_from_path<P: AsRef<std::path::Path>>(
    path: P,
    config: &ClientConfig,
) -> Result<DataUrl> {
    let service = HttpRemovalService::new(config.clone())?;
    let mut session = Session::new(config.clone());
    session.load_original(path)?;
    session.remove_background(&service).await?;
    session
        .processed()
        .cloned()
        .ok_or_else(|| ClientError::processing("Removal succeeded but no image was stored"))
}

/// Remove the background of in-memory image bytes via the configured service
///
/// Suitable when the image never touches the filesystem. The upload ceiling
/// is still enforced.
///
/// # Arguments
///
/// * `image_bytes` - Raw encoded image data (PNG, JPEG, WebP, ...)
/// * `file_name` - Filename hint forwarded in the multipart upload
/// * `config` - Client configuration
///
/// # Errors
/// - Payload above the configured ceiling
/// - Transport, status, or service-reported errors
pub async fn remove_background_from_bytes(
    image_bytes: &[u8],
    file_name: &str,
    config: &ClientConfig,
) -> Result<DataUrl> {
    if image_bytes.len() as u64 > config.max_upload_bytes {
        return Err(ClientError::FileTooLarge {
            actual: image_bytes.len() as u64,
            limit: config.max_upload_bytes,
        });
    }
    let service = HttpRemovalService::new(config.clone())?;
    service.remove_background(image_bytes, file_name).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bytes_api_enforces_ceiling() {
        let config = ClientConfig::builder().max_upload_bytes(8).build().unwrap();
        let err = remove_background_from_bytes(&[0u8; 16], "big.png", &config)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::FileTooLarge { .. }));
    }
}
