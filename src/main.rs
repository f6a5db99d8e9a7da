use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{ArgAction, Parser};

use captionboard::Config;
use captionboard::engine::{CairoEngine, HttpImageSource};
use captionboard::export::{self, ExportTarget};
use captionboard::layers;
use captionboard::session::{BackgroundOutcome, Editor, EditorSettings, ToolAction};

#[derive(Parser, Debug)]
#[command(name = "captionboard")]
#[command(version, about = "Add captions and shapes to a photo and export the result")]
struct Cli {
    /// Background image: http(s) URL, file:// URL, or local path
    #[arg(long, short = 'i', value_name = "URL")]
    image: Option<String>,

    /// Add a layer (text, text:<content>, rectangle, circle, triangle, polygon).
    /// Repeat to add several; layers stack in the order given.
    #[arg(long = "add", short = 'a', value_name = "ACTION")]
    add: Vec<ToolAction>,

    /// Write the export here instead of the configured directory and file name
    #[arg(long, short = 'o', value_name = "PATH")]
    output: Option<PathBuf>,

    /// Print the recorded layers as JSON before exporting
    #[arg(long, action = ArgAction::SetTrue)]
    print_layers: bool,

    /// Read configuration from this file instead of the default location
    #[arg(long, short = 'c', value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write a documented default config file and exit
    #[arg(long, action = ArgAction::SetTrue)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if cli.init_config {
        let path = Config::create_default_file()?;
        println!("Created {}", path.display());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let user_agent = config
        .fetch
        .user_agent
        .clone()
        .unwrap_or_else(|| format!("captionboard/{}", env!("CARGO_PKG_VERSION")));
    let source = HttpImageSource::new(&user_agent, config.fetch.page_origin())
        .context("Failed to set up image fetching")?;
    let engine = Arc::new(CairoEngine::with_http(source));
    let mut editor = Editor::new(engine, EditorSettings::from_config(&config));

    let load = editor.start_session(cli.image.as_deref())?;
    log::info!("Loading background {}", load.url());
    let pending = tokio::spawn(load.wait());

    for action in &cli.add {
        if let Err(err) = action.apply(&mut editor) {
            log::warn!("Skipping {}: {}", action, err);
        }
    }

    let completion = pending.await.context("Background load task failed")?;
    match editor.complete_background(completion) {
        Ok(BackgroundOutcome::Applied { scale_factor, .. }) => {
            log::info!("Background placed at scale {:.4}", scale_factor);
        }
        Ok(BackgroundOutcome::Discarded) => {}
        Err(err) => log::error!("{}", err),
    }

    if cli.print_layers {
        let snapshot = editor.snapshot();
        println!(
            "{}",
            layers::describe(&snapshot).context("Failed to describe layers")?
        );
    }

    let bytes = editor.export_raster()?;
    let target = match &cli.output {
        Some(path) => ExportTarget::from_path(path)?,
        None => ExportTarget::from_config(&config.export),
    };
    let path = export::save_export(&bytes, &target, editor.settings().export_format)?;
    println!("Saved {}", path.display());

    editor.end_session();
    Ok(())
}
