//! retouch-probe: CLI tool for transformation diagnostics.
//!
//! Exercises the same catalog, URL composition and upload path as the
//! web app, without a browser:
//!
//! - Compose a transformation URL from catalog ids
//! - List the catalog
//! - Check whether a transformed reference actually renders
//! - Upload a local file through the credential endpoint
//!
//! # Usage
//!
//! ```text
//! cargo run --bin retouch-probe -- build https://ik.imagekit.io/demo/img/plant.jpeg bg-removal upscale
//! cargo run --bin retouch-probe -- probe 'https://ik.imagekit.io/demo/img/plant.jpeg?tr=e-bgremove'
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use retouch_transport::ImageKitClient;
use retouch_workflow::{
    Catalog, LocalFile, StudioConfig, UploadEvent, UploadState, Workflow, build_chain_url,
};
use tracing_subscriber::EnvFilter;

/// Transformation diagnostics for retouch.
#[derive(Parser)]
#[command(name = "retouch-probe", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Full studio config as a JSON string.
    ///
    /// Individual endpoint flags are applied on top of it.
    #[arg(long, global = true)]
    config_json: Option<String>,

    /// Absolute URL of the credential endpoint.
    #[arg(long, global = true)]
    credential_endpoint: Option<String>,

    /// Absolute URL of the upload API.
    #[arg(long, global = true)]
    upload_endpoint: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the transformation URL for a base image and catalog ids.
    Build {
        /// Base image reference.
        base: String,
        /// Catalog ids, applied in the given order.
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// List the transformation catalog.
    Catalog {
        /// Output JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Fetch a reference and report whether it renders as an image.
    Probe {
        /// Reference to fetch.
        url: String,
        /// Seconds to wait before giving up.
        #[arg(long, default_value_t = 90)]
        timeout: u64,
        /// Output JSON instead of a summary line.
        #[arg(long)]
        json: bool,
    },
    /// Upload a local file and print its remote reference.
    Upload {
        /// Image file to upload.
        file: PathBuf,
    },
}

/// Build a [`StudioConfig`] from CLI arguments.
///
/// `--config-json` replaces the defaults; endpoint flags override
/// whichever config results.
fn config_from_cli(cli: &Cli) -> Result<StudioConfig, String> {
    let mut config = match cli.config_json {
        Some(ref json) => serde_json::from_str(json)
            .map_err(|e| format!("Error parsing --config-json: {e}"))?,
        None => StudioConfig::default(),
    };
    if let Some(ref endpoint) = cli.credential_endpoint {
        config.credential_endpoint.clone_from(endpoint);
    }
    if let Some(ref endpoint) = cli.upload_endpoint {
        config.upload_endpoint.clone_from(endpoint);
    }
    config
        .validate()
        .map_err(|e| format!("Invalid config: {e}"))?;
    Ok(config)
}

/// Compose the URL, warning about ids the catalog does not know.
fn build_url(catalog: &Catalog, base: &str, ids: &[String]) -> String {
    for id in ids.iter().filter(|id| catalog.get(id).is_none()) {
        tracing::warn!(%id, "unknown transformation id dropped");
    }
    build_chain_url(base, &catalog.resolve(ids))
}

/// Aligned `id  name  operation` table.
fn catalog_table(catalog: &Catalog) -> String {
    let options = catalog.list_all();
    let id_width = options.iter().map(|o| o.id.len()).max().unwrap_or(0);
    let name_width = options.iter().map(|o| o.name.len()).max().unwrap_or(0);
    options
        .iter()
        .map(|o| {
            format!(
                "{:<id_width$}  {:<name_width$}  {}",
                o.id, o.name, o.operation
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn require_absolute(endpoint: &str, flag: &str) -> Result<(), String> {
    reqwest::Url::parse(endpoint)
        .map(drop)
        .map_err(|e| format!("{flag} must be an absolute URL ({endpoint}): {e}"))
}

async fn run_probe(url: &str, timeout: u64, json: bool) -> Result<(), String> {
    let http = reqwest::Client::new();
    let report = tokio::time::timeout(
        Duration::from_secs(timeout),
        retouch_transport::probe(&http, url),
    )
    .await
    .map_err(|_| format!("No response within {timeout}s"))?
    .map_err(|e| format!("Request failed: {e}"))?;

    if json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Error serializing report: {e}"))?;
        println!("{json}");
    } else {
        println!(
            "{} {} {} bytes",
            report.status,
            report.content_type.as_deref().unwrap_or("-"),
            report.bytes,
        );
    }
    if report.loaded() {
        Ok(())
    } else {
        Err(format!("{url} did not render as an image"))
    }
}

async fn run_upload(config: StudioConfig, path: &Path) -> Result<(), String> {
    require_absolute(&config.credential_endpoint, "--credential-endpoint")?;
    require_absolute(&config.upload_endpoint, "--upload-endpoint")?;

    let bytes =
        std::fs::read(path).map_err(|e| format!("Error reading {}: {e}", path.display()))?;
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("upload")
        .to_owned();
    eprintln!("File: {} ({} bytes)", path.display(), bytes.len());

    let client = ImageKitClient::from_config(&config);
    let mut workflow = Workflow::new(config).map_err(|e| format!("Invalid config: {e}"))?;
    let job = workflow
        .pick_local_file(LocalFile::new(name, bytes, path.display().to_string()))
        .map_err(|e| format!("File rejected: {e}"))?;

    job.run(&client, |event| {
        if let UploadEvent::CredentialsIssued(_) = event {
            eprintln!("Credentials issued, uploading...");
        }
        workflow.apply_upload_event(event);
    })
    .await;

    match workflow.upload_state() {
        UploadState::Succeeded(url) => {
            println!("{url}");
            Ok(())
        }
        UploadState::Failed(e) => Err(format!("Upload failed ({}): {e}", e.reason())),
        other => Err(format!("Upload ended in unexpected state: {other:?}")),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };
    let catalog = Catalog::standard();

    let outcome = match cli.command {
        Command::Build { ref base, ref ids } => {
            println!("{}", build_url(&catalog, base, ids));
            Ok(())
        }
        Command::Catalog { json: true } => serde_json::to_string_pretty(catalog.list_all())
            .map(|json| println!("{json}"))
            .map_err(|e| format!("Error serializing catalog: {e}")),
        Command::Catalog { json: false } => {
            println!("{}", catalog_table(&catalog));
            Ok(())
        }
        Command::Probe {
            ref url,
            timeout,
            json,
        } => run_probe(url, timeout, json).await,
        Command::Upload { ref file } => run_upload(config, file).await,
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("{msg}");
            ExitCode::FAILURE
        }
    }
}
