//! Session controller coordinating image state and service calls
//!
//! A [`Session`] holds the two pieces of in-memory state, the original
//! upload and the processed result, and drives the removal service with the
//! same discipline as the interactive front-end: a size ceiling enforced
//! before anything leaves the process, a busy flag restored on every exit
//! path, and failed calls leaving prior state untouched.

use crate::config::{ClientConfig, OutputFormat};
use crate::data_url::DataUrl;
use crate::effects::EffectSettings;
use crate::error::{ClientError, Result};
use crate::export;
use crate::service::RemovalService;
use std::fs;
use std::path::{Path, PathBuf};

/// Which view of the workflow the session is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No image selected yet; only upload is available
    #[default]
    Upload,
    /// An original is loaded; processing controls are available
    Workspace,
}

/// Whether an apply-effects request was actually submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Settings were submitted and the processed image replaced
    Yes,
    /// Nothing to apply: no processed image exists yet
    No,
}

/// The original upload: encoded bytes plus the filename outputs are named after
#[derive(Debug, Clone)]
pub struct OriginalImage {
    /// Encoded file contents
    pub data: DataUrl,
    /// Filename of the selected file, without directory components
    pub file_name: String,
    /// Resolved path of the selected file, used to keep exports from
    /// clobbering it
    pub source_path: PathBuf,
}

/// In-memory session state for one image workflow
#[derive(Debug)]
pub struct Session {
    config: ClientConfig,
    original: Option<OriginalImage>,
    processed: Option<DataUrl>,
    busy: bool,
}

impl Session {
    /// Create a new session in the upload phase
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            original: None,
            processed: None,
            busy: false,
        }
    }

    /// Configuration this session was created with
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Current workflow phase
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.original.is_some() {
            SessionPhase::Workspace
        } else {
            SessionPhase::Upload
        }
    }

    /// The loaded original, if any
    #[must_use]
    pub fn original(&self) -> Option<&OriginalImage> {
        self.original.as_ref()
    }

    /// The processed result, if remove-background has succeeded
    #[must_use]
    pub fn processed(&self) -> Option<&DataUrl> {
        self.processed.as_ref()
    }

    /// Whether a service request is currently in flight
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Load a local file as the session's original image
    ///
    /// Files above the configured ceiling are rejected before any read of
    /// their contents, and existing session state stays untouched.
    ///
    /// # Errors
    /// - [`ClientError::FileTooLarge`] when the file exceeds the ceiling
    /// - I/O failures reading the file
    pub fn load_original<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let metadata = fs::metadata(path)
            .map_err(|e| ClientError::file_io_error("inspect input file", path, e))?;

        if metadata.len() > self.config.max_upload_bytes {
            log::warn!(
                "Rejecting '{}': {} bytes exceeds {} byte limit",
                path.display(),
                metadata.len(),
                self.config.max_upload_bytes
            );
            return Err(ClientError::FileTooLarge {
                actual: metadata.len(),
                limit: self.config.max_upload_bytes,
            });
        }

        let bytes =
            fs::read(path).map_err(|e| ClientError::file_io_error("read input file", path, e))?;
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("upload")
            .to_string();

        let source_path = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

        tracing::info!(file = %file_name, bytes = bytes.len(), "Loaded original image");
        self.original = Some(OriginalImage {
            data: DataUrl::from_file_bytes(path, bytes),
            file_name,
            source_path,
        });
        Ok(())
    }

    /// Submit the original to the service and store the processed result
    ///
    /// The busy flag is set for the duration of the request and cleared on
    /// both the success and the error path. Any failure leaves the previous
    /// processed image (if any) in place.
    ///
    /// # Errors
    /// - [`ClientError::Processing`] when no original is loaded
    /// - Transport, status, and service-reported errors from the call
    pub async fn remove_background(&mut self, service: &dyn RemovalService) -> Result<()> {
        let original = self
            .original
            .clone()
            .ok_or_else(|| ClientError::processing("No image loaded; select a file first"))?;

        self.busy = true;
        let outcome = service
            .remove_background(original.data.bytes(), &original.file_name)
            .await;
        self.busy = false;

        match outcome {
            Ok(image) => {
                tracing::info!(bytes = image.len(), "Processed image stored");
                self.processed = Some(image);
                Ok(())
            },
            Err(e) => {
                log::error!("Background removal failed: {}", e);
                Err(e)
            },
        }
    }

    /// Submit the processed image with effect settings, replacing it on success
    ///
    /// A no-op returning [`Applied::No`] when no processed image exists yet.
    /// Settings are validated before anything is sent. Error and busy-flag
    /// discipline matches [`Session::remove_background`].
    ///
    /// # Errors
    /// - Invalid effect settings
    /// - Transport, status, and service-reported errors from the call
    pub async fn apply_effects(
        &mut self,
        service: &dyn RemovalService,
        settings: &EffectSettings,
    ) -> Result<Applied> {
        let Some(processed) = self.processed.clone() else {
            log::debug!("apply_effects skipped: no processed image yet");
            return Ok(Applied::No);
        };
        settings.validate()?;

        self.busy = true;
        let outcome = service.apply_effects(&processed, settings).await;
        self.busy = false;

        match outcome {
            Ok(image) => {
                tracing::info!(bytes = image.len(), "Effects applied, result replaced");
                self.processed = Some(image);
                Ok(Applied::Yes)
            },
            Err(e) => {
                log::error!("Applying effects failed: {}", e);
                Err(e)
            },
        }
    }

    /// Filename stem for exported outputs, taken from the original upload
    #[must_use]
    pub fn output_stem(&self) -> &str {
        self.original
            .as_ref()
            .map_or("background_removed", |original| {
                let name = original.file_name.as_str();
                name.rsplit_once('.').map_or(name, |(stem, _)| stem)
            })
    }

    /// Write the current result into `dir` in the requested format
    ///
    /// PNG is a direct pass-through of the processed bytes; JPEG re-encodes
    /// over a white matte at the configured quality. The output is named
    /// `<original stem>.<ext>`.
    ///
    /// # Errors
    /// - [`ClientError::Processing`] when no processed image exists
    /// - [`ClientError::InvalidConfig`] when the output would overwrite the
    ///   original upload
    /// - Decode, encode, or write failures
    pub fn export<P: AsRef<Path>>(&self, dir: P, format: OutputFormat) -> Result<PathBuf> {
        let processed = self
            .processed
            .as_ref()
            .ok_or_else(|| ClientError::processing("No processed image to export"))?;
        let out_dir = fs::canonicalize(dir.as_ref()).unwrap_or_else(|_| dir.as_ref().to_path_buf());
        let path = out_dir.join(format!("{}.{}", self.output_stem(), format.extension()));

        if self
            .original
            .as_ref()
            .is_some_and(|original| original.source_path == path)
        {
            return Err(ClientError::invalid_config(format!(
                "Output '{}' would overwrite the original upload; choose another directory or format",
                path.display()
            )));
        }

        match format {
            OutputFormat::Png => export::write_png(processed, &path)?,
            OutputFormat::Jpeg => {
                export::write_jpeg_on_white(processed, &path, self.config.jpeg_quality)?;
            },
        }
        tracing::info!(path = %path.display(), "Exported result");
        Ok(path)
    }

    /// Discard all in-memory image state and return to the upload phase
    pub fn reset(&mut self) {
        log::info!("Session reset; discarding in-memory images");
        self.original = None;
        self.processed = None;
        self.busy = false;
    }
}
