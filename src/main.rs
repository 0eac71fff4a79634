//! Popchart - Population line chart viewer
//!
//! Prints the library catalog walkthrough, then either opens the interactive
//! chart window or renders the chart straight to an image file.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;
use popchart::catalog::{demo, Library};
use popchart::charts::{self, ChartRenderer, Scene};
use popchart::config::ChartConfig;
use popchart::data::DataSource;
use popchart::gui::PopchartApp;
use popchart::logging;
use std::io;
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "popchart", version, about = "Population line chart viewer")]
struct Args {
    /// CSV file with `year` and `population` columns
    #[arg(value_name = "CSV", default_value = "population_data.csv")]
    csv: PathBuf,

    /// JSON file overriding chart layout and styling
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Render the chart to an .svg or .png file instead of opening a window
    #[arg(short, long, value_name = "OUT")]
    export: Option<PathBuf>,

    /// Do not print the library catalog walkthrough
    #[arg(long)]
    skip_catalog: bool,
}

fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ChartConfig::from_json_file(path)
            .with_context(|| format!("failed to load chart config {}", path.display()))?,
        None => ChartConfig::default(),
    };
    config.validate()?;

    let library = if args.skip_catalog {
        None
    } else {
        Some(demo::run(&mut io::stdout().lock()).context("failed to print catalog")?)
    };

    let runtime = Runtime::new().context("failed to start async runtime")?;
    let renderer = ChartRenderer::new(config);
    let source = DataSource::new(&args.csv);

    match args.export {
        Some(out) => export_chart(&runtime, &renderer, source, &out),
        None => run_viewer(runtime, renderer, source, library),
    }
}

/// Render without a window. A failed load still exports the static labels.
fn export_chart(
    runtime: &Runtime,
    renderer: &ChartRenderer,
    source: DataSource,
    out: &Path,
) -> Result<()> {
    let mut scene = Scene::new();
    match runtime.block_on(renderer.run(&mut scene, source)) {
        Ok(layer) => info!(records = layer.markers.len(), "chart rendered"),
        Err(e) => error!(error = %e, "chart data unavailable, exporting labels only"),
    }

    let (width, height) = renderer.config().outer_size();
    charts::export(&scene, (width.ceil() as u32, height.ceil() as u32), out)
        .with_context(|| format!("failed to export chart to {}", out.display()))?;
    info!(path = %out.display(), "chart exported");
    Ok(())
}

fn run_viewer(
    runtime: Runtime,
    renderer: ChartRenderer,
    source: DataSource,
    library: Option<Library>,
) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1300.0, 700.0])
            .with_min_inner_size([900.0, 550.0])
            .with_title("Popchart"),
        ..Default::default()
    };

    eframe::run_native(
        "Popchart",
        options,
        Box::new(move |cc| {
            Ok(Box::new(PopchartApp::new(
                cc, runtime, renderer, source, library,
            )))
        }),
    )
    .map_err(|e| anyhow!("viewer failed: {e}"))
}
