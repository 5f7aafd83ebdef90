//! Captioner CLI - generate a natural-language caption for an image.
//!
//! # Usage
//!
//! ```bash
//! captioner config.json photo.jpg
//! # Generated Caption: a dog running on grass
//! ```
//!
//! Exits 0 on success with the caption on stdout; exits 1 on any failure
//! with the error on stderr.

use std::path::PathBuf;

use clap::Parser;

use captioner_core::{CaptionGenerator, Config};

mod logging;

/// Captioner - image captioning via beam search over an ONNX scoring model.
#[derive(Parser, Debug)]
#[command(name = "captioner")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the JSON configuration file
    config_path: PathBuf,

    /// Image file to caption
    image_path: PathBuf,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json_logs: bool,
}

fn run(cli: &Cli) -> anyhow::Result<String> {
    let config = Config::load_from(&cli.config_path)?;
    let generator = CaptionGenerator::new(config)?;
    let caption = generator.generate(&cli.image_path)?;
    Ok(caption)
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json_logs);

    tracing::debug!("Captioner v{}", captioner_core::VERSION);

    match run(&cli) {
        Ok(caption) => println!("Generated Caption: {caption}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
