//! scanlate - command line front end
//!
//! Drives the binarization filter and the text reconstruction engine from
//! files. Capture, recognition and translation stay outside this tool.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use image::RgbaImage;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use scanlate::config::{self, AppConfig};
use scanlate::text::{Page, RecognizedText};
use scanlate::vision::{binarize_image, gaussian_kernel, Binarizer, PixelBuffer};

/// scanlate - binarize photos for OCR and rebuild sentences from OCR output
#[derive(Parser, Debug)]
#[command(name = "scanlate")]
#[command(about = "Adaptive binarization and text reconstruction for photo OCR")]
struct Args {
    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Binarize an image file
    Binarize {
        /// Input image (any format the image crate decodes)
        input: PathBuf,
        /// Output image; format follows the extension
        output: PathBuf,
        /// Gaussian kernel size (odd, at least 3)
        #[arg(short, long)]
        kernel_size: Option<usize>,
        /// Kernel sigma
        #[arg(short, long)]
        sigma: Option<f64>,
        /// Offset subtracted from the local mean
        #[arg(short, long, allow_negative_numbers = true)]
        offset: Option<i32>,
    },
    /// Print the weights of a Gaussian kernel
    Kernel {
        /// Kernel size (odd, at least 3)
        size: usize,
        /// Kernel sigma; defaults to (size - 1) / 6
        #[arg(short, long)]
        sigma: Option<f64>,
    },
    /// Rebuild words and sentences from a recognizer JSON dump
    Assemble {
        /// JSON file with `blocks` -> `lines` -> `elements`
        input: PathBuf,
        /// Print one sentence per line instead of JSON
        #[arg(long)]
        text: bool,
    },
    /// Write the effective configuration to the config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = config::load_or_default(args.config.as_deref())?;

    match args.command {
        Command::Binarize { input, output, kernel_size, sigma, offset } => {
            let mut settings = config.binarization.clone();
            if let Some(size) = kernel_size {
                settings.kernel_size = size;
            }
            if sigma.is_some() {
                settings.sigma = sigma;
            }
            if let Some(c) = offset {
                settings.offset = c;
            }
            run_binarize(&input, &output, &settings)
        }
        Command::Kernel { size, sigma } => {
            let sigma = sigma.unwrap_or_else(|| scanlate::vision::default_sigma(size));
            let kernel = gaussian_kernel(size, sigma)?;
            for w in kernel.weights() {
                println!("{:.8}", w);
            }
            Ok(())
        }
        Command::Assemble { input, text } => run_assemble(&input, text, &config),
        Command::InitConfig { force } => {
            let path = match args.config {
                Some(path) => path,
                None => config::default_config_path()?,
            };
            write_config(&config, &path, force)
        }
    }
}

/// Decode, binarize and re-encode one image
fn run_binarize(input: &Path, output: &Path, settings: &config::BinarizationSettings) -> Result<()> {
    settings.validate()?;

    let img = image::open(input)
        .with_context(|| format!("Failed to load image: {:?}", input))?
        .to_rgba8();
    info!("Loaded {:?} ({}x{})", input, img.width(), img.height());

    let result: RgbaImage = if settings.sigma.is_some() {
        let kernel = gaussian_kernel(settings.kernel_size, settings.effective_sigma())?;
        let mut binarizer = Binarizer::with_kernel(kernel, settings.offset);
        let mut frame = PixelBuffer::from(&img);
        frame.binarize_with(&mut binarizer);
        frame.into()
    } else {
        binarize_image(&img, settings.kernel_size, settings.offset)?
    };

    result
        .save(output)
        .with_context(|| format!("Failed to write image: {:?}", output))?;
    info!("Wrote {:?}", output);
    Ok(())
}

/// Read a recognizer dump and print the assembled page
fn run_assemble(input: &Path, as_text: bool, config: &AppConfig) -> Result<()> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {:?}", input))?;
    let recognized: RecognizedText = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse recognizer output {:?}", input))?;

    let page = Page::from_recognized(&recognized);
    info!("Assembled {} sentence(s)", page.sentences().len());

    if as_text {
        for sentence in page.sentences() {
            println!("{}", sentence);
        }
    } else if config.output.pretty_json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        println!("{}", serde_json::to_string(&page)?);
    }
    Ok(())
}

/// Save `config` to `path`, creating its directory
fn write_config(config: &AppConfig, path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{:?} already exists (use --force to overwrite)", path);
    }
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    config::save_config(config, path)?;
    info!("Wrote configuration to {:?}", path);
    Ok(())
}
