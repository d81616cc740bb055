//! Climate Dash Main Application
//! Main window with the navigation sidebar and the chart viewer.

use crate::charts::StaticChartRenderer;
use crate::config::AppConfig;
use crate::data::{ClimateData, LoadCache};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::views::{Measurement, Page, PageView, ViewRenderer};
use egui::SidePanel;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;
use tracing::{error, info};

/// PNG export size
const EXPORT_SIZE: (u32, u32) = (1400, 800);

/// Reload result from background thread
enum LoadResult {
    Complete(Arc<ClimateData>),
    Error(String),
}

/// Main application window.
pub struct ClimateApp {
    config: AppConfig,
    cache: Arc<LoadCache>,
    data: Arc<ClimateData>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    view: PageView,

    // Async reload
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl ClimateApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        cache: Arc<LoadCache>,
        data: Arc<ClimateData>,
        start_page: Page,
        measurement: Measurement,
    ) -> Self {
        let mut control_panel = ControlPanel::new(start_page, &data);
        control_panel.measurement = measurement;
        let view = ViewRenderer::new(&data, &config.views)
            .render_or_home(start_page, &control_panel.params());
        Self {
            config,
            cache,
            data,
            control_panel,
            chart_viewer: ChartViewer::new(),
            view,
            load_rx: None,
            is_loading: false,
        }
    }

    /// Re-render the current page from the current selections.
    fn refresh_view(&mut self) {
        let page = self.control_panel.page;
        if page != self.view.page {
            self.chart_viewer.reset();
        }
        self.view = ViewRenderer::new(&self.data, &self.config.views)
            .render_or_home(page, &self.control_panel.params());
        // A failed render lands on Home; keep the sidebar in step.
        self.control_panel.page = self.view.page;
    }

    /// Reload through the cache on a background thread.
    fn handle_reload(&mut self) {
        if self.is_loading {
            return;
        }
        self.is_loading = true;
        self.control_panel.set_status("Reloading data...");

        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        let cache = Arc::clone(&self.cache);
        let sources = self.config.data.clone();

        thread::spawn(move || {
            let result = match cache.get_or_load(&sources) {
                Ok(data) => LoadResult::Complete(data),
                Err(e) => LoadResult::Error(e.to_string()),
            };
            let _ = tx.send(result);
        });
    }

    /// Check for reload results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete(data)) => {
                let reused = Arc::ptr_eq(&data, &self.data);
                info!(reused, cached = self.cache.len(), "reload finished");
                self.data = data;
                self.control_panel.update_choices(&self.data);
                self.refresh_view();
                self.control_panel.set_status(if reused {
                    "Data unchanged"
                } else {
                    "Data reloaded"
                });
                self.is_loading = false;
            }
            Ok(LoadResult::Error(e)) => {
                error!("reload failed: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
                self.is_loading = false;
            }
            Err(_) => self.load_rx = Some(rx),
        }
    }

    fn export_file_name(&self, extension: &str) -> String {
        format!(
            "{}.{}",
            self.view.page.label().to_lowercase().replace(' ', "_"),
            extension
        )
    }

    /// Handle PNG export - render the page's charts and open the first one
    fn handle_export_png(&mut self) {
        if self.view.charts.is_empty() {
            self.control_panel.set_status("This page has no charts to export");
            return;
        }

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(self.export_file_name("png"))
            .save_file()
        else {
            return; // User cancelled
        };

        match StaticChartRenderer::render_page(
            &self.view,
            self.chart_viewer.frame,
            &path,
            EXPORT_SIZE,
        ) {
            Ok(written) => {
                self.control_panel
                    .set_status(&format!("Exported {} chart(s)", written.len()));
                if let Some(first) = written.first() {
                    if let Err(e) = open::that(first) {
                        info!("could not open exported chart: {}", e);
                    }
                }
            }
            Err(e) => {
                error!("png export failed: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    /// Handle JSON export of the chart-ready page data
    fn handle_export_json(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name(self.export_file_name("json"))
            .save_file()
        else {
            return;
        };

        match StaticChartRenderer::export_json(&self.view, &path) {
            Ok(()) => self
                .control_panel
                .set_status(&format!("Exported {}", path.display())),
            Err(e) => {
                error!("json export failed: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for ClimateApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();
        if self.is_loading {
            ctx.request_repaint();
        }

        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui, self.is_loading) {
                        ControlPanelAction::SelectionChanged => self.refresh_view(),
                        ControlPanelAction::Reload => self.handle_reload(),
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::ExportJson => self.handle_export_json(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ctx, ui, &self.view);
        });
    }
}
