//! fOS Glyph - Main Entry Point

use std::process::ExitCode;
use fos_glyph::{ErrorKind, GlyphConfig, Outcome, Pipeline};
use fos_text::FontDatabase;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Starting fOS Glyph {}...", fos_glyph::VERSION);

    let config = match GlyphConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{:#}", e);
            return ExitCode::from(ErrorKind::Config.exit_code());
        }
    };

    let pipeline = Pipeline::new(FontDatabase::with_system_fonts(), config);
    match pipeline.run() {
        Ok(outcome) => {
            match &outcome {
                Outcome::Encoded(image) => tracing::info!(
                    "Rendered {}x{} {:?} glyph to {}",
                    image.width(),
                    image.height(),
                    image.format,
                    image.path.display()
                ),
                Outcome::Empty { glyph_id } => {
                    tracing::warn!("Glyph {} is empty, no image written", glyph_id)
                }
            }
            ExitCode::from(outcome.exit_code())
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(e.kind.exit_code())
        }
    }
}
