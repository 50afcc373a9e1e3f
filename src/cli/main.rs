//! Background removal client CLI
//!
//! Drives a remote background-removal service from the command line: upload
//! an image, optionally apply effects, and save the result locally.

use super::config::CliConfigBuilder;
use crate::{
    service::{HttpRemovalService, RemovalService},
    session::{Applied, Session},
    tracing_config::init_cli_tracing,
};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Background removal service client
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "bgremove-client")]
pub struct Cli {
    /// Input image file
    #[arg(value_name = "INPUT", required_unless_present = "ping")]
    pub input: Option<PathBuf>,

    /// Output directory for the saved result
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = CliOutputFormat::Png)]
    pub format: CliOutputFormat,

    /// Base URL of the removal service
    #[arg(short, long, default_value = "http://localhost:5000")]
    pub service_url: String,

    /// Client-side upload ceiling in MiB
    #[arg(long, default_value_t = 5)]
    pub max_upload_mb: u64,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 120)]
    pub timeout_secs: u64,

    /// JPEG quality (0-100) for JPEG output
    #[arg(long, default_value_t = 95)]
    pub jpeg_quality: u8,

    /// Solid background color as #RRGGBB
    #[arg(long, conflicts_with = "bg_image")]
    pub bg_color: Option<String>,

    /// Custom background image file
    #[arg(long, value_name = "PATH")]
    pub bg_image: Option<PathBuf>,

    /// Brightness multiplier (0.5-2.0)
    #[arg(long, default_value_t = 1.0)]
    pub brightness: f32,

    /// Contrast multiplier (0.5-2.0)
    #[arg(long, default_value_t = 1.0)]
    pub contrast: f32,

    /// Sharpness multiplier (0.0-2.0)
    #[arg(long, default_value_t = 1.0)]
    pub sharpness: f32,

    /// Smooth edges with the service's blur filter
    #[arg(long)]
    pub blur: bool,

    /// Probe the service health endpoint and exit
    #[arg(long)]
    pub ping: bool,

    /// Enable verbose logging (-v: INFO, -vv: DEBUG, -vvv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum CliOutputFormat {
    Png,
    Jpeg,
}

pub async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    init_cli_tracing(cli.verbose).context("Failed to initialize tracing")?;

    // Validate CLI arguments
    CliConfigBuilder::validate_cli(&cli).context("Invalid CLI arguments")?;

    // Convert CLI arguments to client configuration
    let config = CliConfigBuilder::from_cli(&cli).context("Failed to build configuration")?;
    let output_format = config.output_format;

    let service =
        HttpRemovalService::new(config.clone()).context("Failed to create service client")?;

    if cli.ping {
        service
            .health()
            .await
            .context("Removal service is not healthy")?;
        println!("✅ Service at {} is healthy", config.service_url);
        return Ok(());
    }

    let input = cli
        .input
        .clone()
        .context("An input image is required")?;

    info!("Starting background removal client");
    info!("Input: {}", input.display());
    info!("Service: {}", config.service_url);

    let mut session = Session::new(config);
    session
        .load_original(&input)
        .context("Failed to load input image")?;

    // Remove background
    let start_time = Instant::now();
    let spinner = create_spinner("Removing background...");
    let removal = session.remove_background(&service).await;
    spinner.finish_and_clear();
    removal.context("Error processing image")?;
    println!("✅ Background removed");

    // Apply effects only when the settings would change anything
    let settings =
        CliConfigBuilder::effect_settings(&cli).context("Failed to gather effect settings")?;
    if !settings.is_identity() {
        let spinner = create_spinner("Applying effects...");
        let applied = session.apply_effects(&service, &settings).await;
        spinner.finish_and_clear();
        match applied.context("Error applying effects")? {
            Applied::Yes => println!("✅ Effects applied"),
            Applied::No => println!("⚠️ No processed image; effects skipped"),
        }
    }

    // Save the result
    let saved = session
        .export(&cli.output, output_format)
        .context("Failed to save output")?;

    let total_time = start_time.elapsed();
    println!(
        "📥 Saved {} ({:.2}s)",
        saved.display(),
        total_time.as_secs_f64()
    );

    // Matches the front-end's reload-on-new-file: nothing survives the run
    session.reset();

    Ok(())
}

/// Create a spinner shown while a request is in flight
fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    #[test]
    fn test_output_format_mapping() {
        // ValueEnum derivation covers parsing; check the conversion contract
        let cli = Cli::parse_from(["bgremove-client", "photo.jpg", "--format", "jpeg"]);
        assert_eq!(cli.format, CliOutputFormat::Jpeg);
        let config = CliConfigBuilder::from_cli(&cli).unwrap();
        assert_eq!(config.output_format, OutputFormat::Jpeg);
    }

    #[test]
    fn test_ping_requires_no_input() {
        assert!(Cli::try_parse_from(["bgremove-client", "--ping"]).is_ok());
        assert!(Cli::try_parse_from(["bgremove-client"]).is_err());
    }

    #[test]
    fn test_background_flags_conflict() {
        let result = Cli::try_parse_from([
            "bgremove-client",
            "photo.jpg",
            "--bg-color",
            "#ffffff",
            "--bg-image",
            "backdrop.png",
        ]);
        assert!(result.is_err());
    }
}
