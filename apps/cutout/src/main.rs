use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{bail, Context};
use clap::Parser;
use client_core::HttpBackgroundApi;
use shared::domain::HexColor;
use tracing_subscriber::EnvFilter;

mod app;
mod backend_bridge;
mod controller;
mod media;
mod shell;

use crate::{
    app::StudioApp,
    controller::{events::UiEvent, state::Section},
    shell::CliShell,
};

/// Remove an image's background through the studio server, then optionally
/// put it on a new backdrop.
#[derive(Parser, Debug)]
#[command(name = "cutout", version, about)]
struct Args {
    /// Image to cut out.
    image: PathBuf,

    #[arg(long, default_value = "http://127.0.0.1:5000")]
    server_url: String,

    /// Solid backdrop as #RGB or #RRGGBB.
    #[arg(long, conflicts_with = "background_image")]
    color: Option<String>,

    /// Image to use as the backdrop.
    #[arg(long)]
    background_image: Option<PathBuf>,

    /// Directory the downloads are written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Per-request timeout; unset waits indefinitely.
    #[arg(long)]
    timeout_secs: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    if let Some(color) = &args.color {
        HexColor::parse(color.trim()).with_context(|| format!("invalid --color {color:?}"))?;
    }
    let api = HttpBackgroundApi::with_timeout(
        args.server_url.clone(),
        args.timeout_secs.map(Duration::from_secs),
    )
    .context("failed to build http client")?;
    tracing::info!(server_url = api.server_url(), "using studio server");

    let (mut app, worker) = StudioApp::launch(Arc::new(api), CliShell::new(&args.out_dir))
        .context("failed to start backend worker")?;

    let original = media::read_image_file(&args.image)?;
    app.handle(UiEvent::FileInputChanged(Some(original)));
    app.wait_for_backend();
    bail_on_error(&app)?;
    app.handle(UiEvent::DownloadTransparentClicked);

    let composite = if let Some(color) = args.color {
        app.handle(UiEvent::TabClicked("color".to_string()));
        app.handle(UiEvent::ColorPickerInput(color));
        app.handle(UiEvent::ApplyColorClicked);
        true
    } else if let Some(path) = &args.background_image {
        let backdrop = media::read_image_file(path)?;
        app.handle(UiEvent::TabClicked("image".to_string()));
        app.handle(UiEvent::BackgroundFileInputChanged(Some(backdrop)));
        app.handle(UiEvent::ApplyImageClicked);
        true
    } else {
        false
    };

    if composite {
        app.wait_for_backend();
        bail_on_error(&app)?;
        app.handle(UiEvent::DownloadClicked);
    }
    bail_on_error(&app)?;

    for path in app.presenter().saved() {
        println!("{}", path.display());
    }

    drop(app);
    if worker.join().is_err() {
        tracing::warn!("backend worker panicked during shutdown");
    }
    Ok(())
}

fn bail_on_error(app: &StudioApp<CliShell>) -> anyhow::Result<()> {
    let view = app.view();
    if view.section_visible(Section::Error) {
        bail!(view.error_message.unwrap_or_default());
    }
    Ok(())
}
