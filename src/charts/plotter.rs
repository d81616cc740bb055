//! Chart Plotter Module
//! Draws the chart model interactively using egui_plot.

use super::palette::{self, to_color32};
use super::{BarChart, Chart, ChoroplethChart, LineChart, MapFrame};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart as PlotBarChart, Legend, Line, Plot, PlotPoints, VLine};

/// Tile size of the country grid.
const TILE_WIDTH: f32 = 132.0;
const TILE_HEIGHT: f32 = 34.0;

/// Draws charts with egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw any chart. `frame` selects the animation frame of a choropleth.
    pub fn draw_chart(ui: &mut egui::Ui, chart: &Chart, frame: usize, height: f32) {
        ui.label(RichText::new(chart.title()).size(15.0).strong());
        ui.add_space(4.0);
        match chart {
            Chart::Line(line) => Self::draw_line_chart(ui, line, height),
            Chart::Bar(bar) => Self::draw_bar_chart(ui, bar, height),
            Chart::Choropleth(map) => Self::draw_choropleth(ui, map, frame),
        }
    }

    pub fn draw_line_chart(ui: &mut egui::Ui, chart: &LineChart, height: f32) {
        if chart.series.iter().all(|s| s.is_empty()) {
            ui.label(RichText::new("No data for this selection").color(Color32::GRAY));
        }

        Plot::new(format!("line_{}", chart.title))
            .height(height)
            .legend(Legend::default())
            .x_axis_label(chart.x_label.clone())
            .y_axis_label(chart.y_label.clone())
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                for (i, series) in chart.series.iter().enumerate() {
                    let points: PlotPoints = series.points.iter().map(|&(x, y)| [x, y]).collect();
                    plot_ui.line(
                        Line::new(points)
                            .color(to_color32(palette::series_rgb(i)))
                            .width(2.0)
                            .name(&series.name),
                    );
                }

                for marker in &chart.markers {
                    plot_ui.vline(
                        VLine::new(marker.x)
                            .color(to_color32(palette::MARKER))
                            .width(1.5)
                            .style(egui_plot::LineStyle::dashed_loose())
                            .name(&marker.label),
                    );
                }
            });
    }

    pub fn draw_bar_chart(ui: &mut egui::Ui, chart: &BarChart, height: f32) {
        // Color each bar by its own value, as a warm gradient.
        let range = value_range(chart.bars.iter().map(|&(_, y)| y));
        let bars: Vec<Bar> = chart
            .bars
            .iter()
            .map(|&(x, y)| {
                let color = range
                    .map(|r| to_color32(palette::scale_rgb(y, r)))
                    .unwrap_or_else(|| to_color32(palette::WARM_LINE));
                Bar::new(x, y)
                    .width(chart.bar_width)
                    .fill(color)
                    .name(format!("{:.0}", x))
            })
            .collect();

        Plot::new(format!("bar_{}", chart.title))
            .height(height)
            .x_axis_label(chart.x_label.clone())
            .y_axis_label(chart.y_label.clone())
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(PlotBarChart::new(bars).name(&chart.y_label));
            });
    }

    /// Countries as a grid of colored tiles, one frame at a time.
    pub fn draw_choropleth(ui: &mut egui::Ui, chart: &ChoroplethChart, frame: usize) {
        let (Some(range), Some(current)) = (chart.color_range, chart.frames.get(frame)) else {
            ui.label(RichText::new("No data for this selection").color(Color32::GRAY));
            return;
        };

        Self::draw_color_legend(ui, &chart.value_label, range);
        ui.add_space(6.0);
        Self::draw_frame_tiles(ui, current, range);
    }

    fn draw_frame_tiles(ui: &mut egui::Ui, frame: &MapFrame, range: (f64, f64)) {
        let columns = ((ui.available_width() / (TILE_WIDTH + 4.0)).floor() as usize).max(1);

        egui::Grid::new(ui.make_persistent_id("choropleth_tiles"))
            .spacing([4.0, 4.0])
            .show(ui, |ui| {
                for (i, (name, value)) in frame.values.iter().enumerate() {
                    let fill = to_color32(palette::scale_rgb(*value, range));
                    let (rect, response) = ui.allocate_exact_size(
                        egui::vec2(TILE_WIDTH, TILE_HEIGHT),
                        egui::Sense::hover(),
                    );
                    ui.painter().rect_filled(rect, 3.0, fill);
                    ui.painter().text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        name,
                        egui::FontId::proportional(11.0),
                        text_color_on(fill),
                    );
                    response.on_hover_text(format!("{} {}: {:.2} °C", name, frame.year, value));

                    if (i + 1) % columns == 0 {
                        ui.end_row();
                    }
                }
            });
    }

    /// Horizontal gradient bar with the fixed range at its ends.
    pub fn draw_color_legend(ui: &mut egui::Ui, label: &str, (min, max): (f64, f64)) {
        const STEPS: usize = 40;
        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("{:.1}", min)).size(11.0));
            let (rect, _) = ui.allocate_exact_size(egui::vec2(240.0, 14.0), egui::Sense::hover());
            let step_w = rect.width() / STEPS as f32;
            for step in 0..STEPS {
                let value = min + (max - min) * step as f64 / (STEPS - 1) as f64;
                let x0 = rect.left() + step as f32 * step_w;
                let cell = egui::Rect::from_min_size(
                    egui::pos2(x0, rect.top()),
                    egui::vec2(step_w + 0.5, rect.height()),
                );
                ui.painter()
                    .rect_filled(cell, 0.0, to_color32(palette::scale_rgb(value, (min, max))));
            }
            ui.label(RichText::new(format!("{:.1}", max)).size(11.0));
            ui.label(RichText::new(label).size(11.0).color(Color32::GRAY));
        });
    }
}

fn value_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

fn text_color_on(fill: Color32) -> Color32 {
    let luma = 0.299 * fill.r() as f32 + 0.587 * fill.g() as f32 + 0.114 * fill.b() as f32;
    if luma > 150.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}
