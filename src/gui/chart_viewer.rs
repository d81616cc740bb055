//! Chart Viewer Widget
//! Central scrollable panel showing the current page: title, text and charts.

use crate::charts::{Chart, ChartPlotter};
use crate::views::PageView;
use egui::{RichText, ScrollArea};
use std::time::{Duration, Instant};

const CHART_HEIGHT: f32 = 360.0;
const FRAME_INTERVAL: Duration = Duration::from_millis(350);

/// Displays a rendered page and drives choropleth animation.
pub struct ChartViewer {
    /// Current animation frame of the map, if the page has one.
    pub frame: usize,
    playing: bool,
    last_step: Instant,
}

impl Default for ChartViewer {
    fn default() -> Self {
        Self {
            frame: 0,
            playing: false,
            last_step: Instant::now(),
        }
    }
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget animation state, e.g. after switching page.
    pub fn reset(&mut self) {
        self.frame = 0;
        self.playing = false;
    }

    pub fn show(&mut self, ctx: &egui::Context, ui: &mut egui::Ui, view: &PageView) {
        ui.heading(RichText::new(&view.title).size(24.0));
        ui.add_space(6.0);
        for line in &view.text {
            ui.label(line);
        }
        ui.add_space(10.0);

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for chart in &view.charts {
                    if let Chart::Choropleth(map) = chart {
                        self.animation_controls(ctx, ui, map.frames.iter().map(|f| f.year).collect());
                    }
                    ChartPlotter::draw_chart(ui, chart, self.frame, CHART_HEIGHT);
                    ui.add_space(18.0);
                }
            });
    }

    fn animation_controls(&mut self, ctx: &egui::Context, ui: &mut egui::Ui, years: Vec<i32>) {
        if years.is_empty() {
            return;
        }
        let last = years.len() - 1;
        self.frame = self.frame.min(last);

        if self.playing && self.last_step.elapsed() >= FRAME_INTERVAL {
            self.frame = if self.frame >= last { 0 } else { self.frame + 1 };
            self.last_step = Instant::now();
        }
        if self.playing {
            ctx.request_repaint_after(FRAME_INTERVAL);
        }

        let year = years[self.frame].to_string();
        ui.horizontal(|ui| {
            let label = if self.playing { "⏸ Pause" } else { "▶ Play" };
            if ui.button(label).clicked() {
                self.playing = !self.playing;
                self.last_step = Instant::now();
            }
            ui.add(
                egui::Slider::new(&mut self.frame, 0..=last)
                    .show_value(false)
                    .text(year),
            );
        });
    }
}
