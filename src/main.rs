//! slide-rois - Tissue ROI extraction for whole-slide images
//!
//! CLI entry point

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use slide_rois::{
    exit_codes,
    // CLI
    Cli, Commands, OverviewArgs, PatchesArgs, SlideArgs,
    // Config
    ConfigError, RoiConfig,
    // Core
    ImageSlide, RoiError, RoiPipeline,
};
use tracing::{info, Level};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Overview(args) => run_overview(&args),
        Commands::Patches(args) => run_patches(&args),
        Commands::DefaultConfig => run_default_config(),
    };

    std::process::exit(match result {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_code_for(&e)
        }
    });
}

/// Log to stderr; each `-v` raises the level by one step
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Configuration and parameter problems exit with INVALID_CONFIG
fn exit_code_for(error: &anyhow::Error) -> i32 {
    for cause in error.chain() {
        if cause.downcast_ref::<ConfigError>().is_some() {
            return exit_codes::INVALID_CONFIG;
        }
        if let Some(RoiError::InvalidParameter(_)) = cause.downcast_ref::<RoiError>() {
            return exit_codes::INVALID_CONFIG;
        }
    }
    exit_codes::GENERAL_ERROR
}

// ============ Overview Command ============

fn run_overview(args: &OverviewArgs) -> Result<()> {
    let (pipeline, slide) = prepare(&args.slide)?;
    let regions = pipeline
        .overview(&slide)
        .with_context(|| format!("overview pass failed for {}", args.slide.input.display()))?;
    info!(regions = regions.len(), "overview written");
    write_json(&regions, args.slide.output.as_deref())
}

// ============ Patches Command ============

fn run_patches(args: &PatchesArgs) -> Result<()> {
    let (pipeline, slide) = prepare(&args.slide)?;

    match &args.region {
        Some(region) => {
            let patches = pipeline
                .patches(&slide, region)
                .with_context(|| format!("region pass failed for {:?}", region))?;
            write_json(&patches, args.slide.output.as_deref())
        }
        None => {
            let results = pipeline
                .run(&slide)
                .with_context(|| format!("pipeline failed for {}", args.slide.input.display()))?;
            write_json(&results, args.slide.output.as_deref())
        }
    }
}

// ============ Default Config Command ============

fn run_default_config() -> Result<()> {
    let text = RoiConfig::default().to_toml()?;
    print!("{}", text);
    Ok(())
}

// ============ Helper Functions ============

/// Resolve configuration and open the input slide
fn prepare(args: &SlideArgs) -> Result<(RoiPipeline, ImageSlide)> {
    if !args.input.exists() {
        eprintln!("Error: Input path does not exist: {}", args.input.display());
        std::process::exit(exit_codes::INPUT_NOT_FOUND);
    }

    let file_config = match &args.config {
        Some(path) => RoiConfig::load_from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => RoiConfig::default(),
    };
    let config = file_config.merge_with_cli(&args.overrides());
    config.validate().context("invalid configuration")?;

    let slide = ImageSlide::open(&args.input, args.levels)
        .map_err(|e| anyhow::anyhow!(e))
        .with_context(|| format!("failed to open {}", args.input.display()))?;
    info!(
        input = %args.input.display(),
        levels = slide.level_count(),
        "slide opened"
    );

    Ok((RoiPipeline::new(config), slide))
}

/// Pretty JSON to `output`, or stdout
fn write_json<T: Serialize + ?Sized>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => std::fs::write(path, json + "\n")
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }
    Ok(())
}
