mod config;
mod navigation;
mod session;

use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{error, info};

use escapefield_core::Precision;

use config::FieldConfig;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting escapefield");

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(config::default_path);
    let config = FieldConfig::load(&path);

    let outcome = match config.precision {
        Precision::Single => session::run::<f32>(&config),
        Precision::Double => session::run::<f64>(&config),
    };

    match outcome {
        Ok(summary) => {
            if let Some(last) = summary.frames.last() {
                info!(
                    frames = summary.frames.len(),
                    fps = ?summary.fps,
                    escaped = last.escaped,
                    samples = last.samples,
                    "Done"
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Session failed: {e}");
            ExitCode::FAILURE
        }
    }
}
