//! Control Panel Widget
//! Left sidebar with page navigation and the per-page selections.

use crate::data::ClimateData;
use crate::views::{Measurement, Page, ViewParams, YearRange};
use egui::{Color32, ComboBox, RichText};

/// Left sidebar: page list, page controls, export buttons and status line.
pub struct ControlPanel {
    pub page: Page,
    pub measurement: Measurement,
    pub country: Option<String>,
    pub city_a: String,
    pub city_b: String,
    pub limit_years: bool,
    pub year_start: i32,
    pub year_end: i32,
    pub status: String,
    countries: Vec<String>,
    cities: Vec<String>,
    year_bounds: (i32, i32),
}

impl ControlPanel {
    pub fn new(page: Page, data: &ClimateData) -> Self {
        let mut panel = Self {
            page,
            measurement: Measurement::default(),
            country: None,
            city_a: String::new(),
            city_b: String::new(),
            limit_years: false,
            year_start: 0,
            year_end: 0,
            status: "Ready".to_string(),
            countries: Vec::new(),
            cities: Vec::new(),
            year_bounds: (0, 0),
        };
        panel.update_choices(data);
        panel
    }

    /// Refresh the selectable values after a (re)load, keeping selections that
    /// still exist.
    pub fn update_choices(&mut self, data: &ClimateData) {
        self.countries = data.countries();
        self.cities = data.cities();
        self.year_bounds = data.year_bounds().unwrap_or((0, 0));

        if self
            .country
            .as_ref()
            .is_some_and(|c| !self.countries.contains(c))
        {
            self.country = None;
        }
        if !self.cities.contains(&self.city_a) {
            self.city_a = self.cities.first().cloned().unwrap_or_default();
        }
        if !self.cities.contains(&self.city_b) {
            self.city_b = self
                .cities
                .get(1)
                .cloned()
                .unwrap_or_else(|| self.city_a.clone());
        }
        if !self.limit_years {
            (self.year_start, self.year_end) = self.year_bounds;
        }
    }

    /// Parameters for the current page.
    pub fn params(&self) -> ViewParams {
        ViewParams {
            country: self.country.clone(),
            cities: (!self.cities.is_empty()).then(|| (self.city_a.clone(), self.city_b.clone())),
            measurement: self.measurement,
            years: self
                .limit_years
                .then(|| YearRange::new(self.year_start, self.year_end)),
        }
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, busy: bool) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🌡 Climate Dash")
                    .size(22.0)
                    .color(Color32::from_rgb(255, 87, 51)),
            );
        });
        ui.add_space(10.0);
        ui.separator();

        // ===== Navigation =====
        ui.label(RichText::new("Navigation").size(14.0).strong());
        ui.add_space(5.0);
        for page in Page::ALL {
            if ui.radio_value(&mut self.page, page, page.label()).changed() {
                action = ControlPanelAction::SelectionChanged;
            }
        }

        ui.add_space(10.0);
        ui.separator();

        // ===== Page options =====
        let changed = match self.page {
            Page::GlobalTrend => self.year_controls(ui),
            Page::WarmingStart => self.measurement_control(ui) | self.year_controls(ui),
            Page::GlobalMap => self.country_control(ui) | self.year_controls(ui),
            Page::CityCompare => self.city_controls(ui) | self.year_controls(ui),
            Page::Home | Page::DecadalAndSeasonal | Page::Credits => false,
        };
        if changed {
            action = ControlPanelAction::SelectionChanged;
        }

        ui.add_space(10.0);
        ui.separator();

        // ===== Actions =====
        ui.vertical_centered(|ui| {
            if ui.button("🖼 Export PNG").clicked() {
                action = ControlPanelAction::ExportPng;
            }
            if ui.button("📄 Export JSON").clicked() {
                action = ControlPanelAction::ExportJson;
            }
            ui.add_enabled_ui(!busy, |ui| {
                if ui.button("🔄 Reload Data").clicked() {
                    action = ControlPanelAction::Reload;
                }
            });
        });

        ui.add_space(10.0);
        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    fn measurement_control(&mut self, ui: &mut egui::Ui) -> bool {
        let mut changed = false;
        ui.label("Measurement:");
        ComboBox::from_id_salt("measurement")
            .width(220.0)
            .selected_text(self.measurement.label())
            .show_ui(ui, |ui| {
                for m in Measurement::ALL {
                    changed |= ui
                        .selectable_value(&mut self.measurement, m, m.label())
                        .changed();
                }
            });
        changed
    }

    fn country_control(&mut self, ui: &mut egui::Ui) -> bool {
        let mut changed = false;
        ui.label("Country:");
        ComboBox::from_id_salt("country")
            .width(220.0)
            .selected_text(self.country.as_deref().unwrap_or("(none)"))
            .show_ui(ui, |ui| {
                changed |= ui.selectable_value(&mut self.country, None, "(none)").changed();
                for c in &self.countries {
                    changed |= ui
                        .selectable_value(&mut self.country, Some(c.clone()), c)
                        .changed();
                }
            });
        changed
    }

    fn city_controls(&mut self, ui: &mut egui::Ui) -> bool {
        if self.cities.is_empty() {
            ui.label(RichText::new("No major-city data loaded").color(Color32::GRAY));
            return false;
        }

        let mut changed = false;
        for (id, label, selected) in [
            ("city_a", "First city:", &mut self.city_a),
            ("city_b", "Second city:", &mut self.city_b),
        ] {
            ui.label(label);
            ComboBox::from_id_salt(id)
                .width(220.0)
                .selected_text(selected.as_str())
                .show_ui(ui, |ui| {
                    for city in &self.cities {
                        changed |= ui.selectable_value(selected, city.clone(), city).changed();
                    }
                });
        }
        changed
    }

    fn year_controls(&mut self, ui: &mut egui::Ui) -> bool {
        let (lo, hi) = self.year_bounds;
        let mut changed = ui.checkbox(&mut self.limit_years, "Limit years").changed();
        ui.add_enabled_ui(self.limit_years, |ui| {
            ui.horizontal(|ui| {
                changed |= ui
                    .add(egui::DragValue::new(&mut self.year_start).range(lo..=hi))
                    .changed();
                ui.label("to");
                changed |= ui
                    .add(egui::DragValue::new(&mut self.year_end).range(lo..=hi))
                    .changed();
            });
        });
        changed
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    SelectionChanged,
    Reload,
    ExportPng,
    ExportJson,
}
