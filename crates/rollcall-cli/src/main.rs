use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rollcall_core::{
    codec, input, FaceDetector, Gallery, NearestNeighborMatcher, RecognitionPipeline, RosterEntry,
    SeetaFaceBackend,
};
use std::io::Read;
use std::path::{Path, PathBuf};

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "rollcall", about = "Rollcall face-matching CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode the subject face of an enrollment photo
    Enroll {
        /// Path to the reference photo
        image: PathBuf,
    },
    /// Recognize faces in a frame against a roster snapshot
    Recognize {
        /// Path to the frame image; omit when using --data-uri
        image: Option<PathBuf>,
        /// Roster snapshot: JSON array of {key, name, encoding} records
        #[arg(long)]
        roster: PathBuf,
        /// Read a base64 data URI from stdin instead of an image path
        #[arg(long)]
        data_uri: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let backend = SeetaFaceBackend::load(&config.model_path)?;
    let pipeline = RecognitionPipeline::new(
        FaceDetector::new(Box::new(backend)),
        Box::new(NearestNeighborMatcher::with_threshold(config.match_threshold)),
        config.detect_downscale,
    );

    match cli.command {
        Commands::Enroll { image } => {
            let photo = input::load_from_path(&image)?;
            // EnrollError distinguishes "no face found" from "encoding
            // degenerate" in its display; both are terminal here.
            let encoding = pipeline
                .enroll(&photo)
                .with_context(|| format!("could not enroll {}", image.display()))?;
            println!("{}", codec::serialize(&encoding));
        }
        Commands::Recognize {
            image,
            roster,
            data_uri,
        } => {
            let gallery = load_gallery(&roster)?;

            let frame = if data_uri {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("reading data URI from stdin")?;
                input::decode_data_uri(&text)?
            } else {
                let path = image.context("an image path is required unless --data-uri is set")?;
                input::load_from_path(&path)?
            };

            let results = pipeline.recognize(&frame, &gallery);
            let output: Vec<serde_json::Value> = results
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "identity": r.identity.as_deref().unwrap_or("Unknown"),
                        "distance": r.distance.is_finite().then_some(r.distance),
                        "bbox": r.bbox.clone(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Load a roster snapshot file and rebuild the gallery from it.
fn load_gallery(path: &Path) -> Result<Gallery> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("could not read roster {}", path.display()))?;
    let roster: Vec<RosterEntry> =
        serde_json::from_str(&text).context("roster is not a JSON array of roster records")?;

    let (gallery, report) = Gallery::rebuild(&roster);
    if report.failed > 0 {
        tracing::warn!(
            failed = report.failed,
            succeeded = report.succeeded,
            "some roster records could not be loaded"
        );
    }
    Ok(gallery)
}
