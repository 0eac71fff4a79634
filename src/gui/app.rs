//! Popchart Main Application
//! Main window with control panel and chart viewer.

use crate::catalog::Library;
use crate::charts::{self, ChartFrame, ChartRenderer, DrawingSurface, Scene};
use crate::data::{DataSource, LoaderError, Record};
use crate::gui::{CatalogSummary, ChartViewer, ControlPanel, ControlPanelAction};
use egui::{CentralPanel, SidePanel};
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Longest animation step taken in one frame, so a stalled frame does not skip a fade.
const MAX_FRAME_STEP: f32 = 0.1;

type LoadTask = JoinHandle<Result<Vec<Record>, LoaderError>>;

/// Main application window.
pub struct PopchartApp {
    runtime: Runtime,
    renderer: ChartRenderer,
    scene: Scene,
    frame: Option<ChartFrame>,
    source: Option<DataSource>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async CSV loading
    load_task: Option<LoadTask>,
}

impl PopchartApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        runtime: Runtime,
        renderer: ChartRenderer,
        source: DataSource,
        library: Option<Library>,
    ) -> Self {
        let mut control_panel = ControlPanel::new();
        control_panel.catalog = library.as_ref().map(CatalogSummary::from_library);

        let mut app = Self {
            runtime,
            renderer,
            scene: Scene::new(),
            frame: None,
            source: None,
            control_panel,
            chart_viewer: ChartViewer::new(),
            load_task: None,
        };
        app.start_load(source);
        app
    }

    /// Redraw the static chart and load `source` in the background.
    fn start_load(&mut self, source: DataSource) {
        if self.load_task.is_some() {
            return; // Already loading
        }

        self.scene.clear();
        let frame = self.renderer.mount(&mut self.scene);
        self.renderer.draw_furniture(&mut self.scene, &frame);
        self.frame = Some(frame);

        info!(path = %source.path().display(), "loading chart data");
        self.control_panel.set_source(source.path());
        self.control_panel.set_status("Loading CSV file...");
        self.control_panel.loading = true;
        self.control_panel.can_export = true;

        self.load_task = Some(self.runtime.spawn(source.clone().load_async()));
        self.source = Some(source);
    }

    /// Check for CSV loading results
    fn check_load_result(&mut self) {
        let Some(task) = self.load_task.take() else {
            return;
        };
        if !task.is_finished() {
            self.load_task = Some(task);
            return;
        }

        self.control_panel.loading = false;
        let loaded = self
            .runtime
            .block_on(task)
            .unwrap_or_else(|e| Err(LoaderError::Interrupted(e.to_string())));

        let Some(frame) = self.frame else {
            return;
        };
        match self.renderer.finish(&mut self.scene, &frame, loaded) {
            Ok(layer) => {
                let status = format!("Loaded {} records", layer.markers.len());
                info!(records = layer.markers.len(), "chart ready");
                self.control_panel.set_status(status);
            }
            Err(e) => {
                error!(error = %e, "failed to render chart data");
                self.control_panel.set_error(format!("Error: {e}"));
            }
        }
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.start_load(DataSource::new(path));
        }
    }

    fn handle_reload(&mut self) {
        if let Some(source) = self.source.clone() {
            self.start_load(source);
        }
    }

    /// Handle chart export to SVG or PNG
    fn handle_export(&mut self) {
        let output_path = match rfd::FileDialog::new()
            .add_filter("SVG Image", &["svg"])
            .add_filter("PNG Image", &["png"])
            .set_file_name("population_chart.svg")
            .save_file()
        {
            Some(path) => path,
            None => return, // User cancelled
        };

        let (width, height) = self.renderer.config().outer_size();
        let size = (width.ceil() as u32, height.ceil() as u32);
        match charts::export(&self.scene, size, &output_path) {
            Ok(()) => {
                info!(path = %output_path.display(), "chart exported");
                self.control_panel
                    .set_status(format!("Exported to {}", output_path.display()));
            }
            Err(e) => {
                error!(error = %e, "chart export failed");
                self.control_panel.set_error(format!("Export error: {e}"));
            }
        }
    }
}

impl eframe::App for PopchartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_result();

        let dt = ctx.input(|i| i.stable_dt).clamp(0.0, MAX_FRAME_STEP);
        self.scene.advance(Duration::from_secs_f32(dt));

        // Request repaint while loading or fading
        if self.load_task.is_some() || self.scene.is_animating() {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::Reload => self.handle_reload(),
                        ControlPanelAction::ExportChart => self.handle_export(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        let size = self.renderer.config().outer_size();
        CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, &mut self.scene, size);
        });
    }
}
