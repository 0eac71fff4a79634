//! Control Panel Widget
//! Left side panel with the data source, load status, export and the catalog listing.

use crate::catalog::Library;
use egui::{Color32, RichText, ScrollArea};
use std::path::{Path, PathBuf};

/// Actions the control panel can request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    Reload,
    ExportChart,
}

/// Read-only snapshot of the library shown under the chart controls.
#[derive(Debug, Clone, Default)]
pub struct CatalogSummary {
    pub name: String,
    pub books: Vec<String>,
    pub members: Vec<String>,
}

impl CatalogSummary {
    pub fn from_library(library: &Library) -> Self {
        Self {
            name: library.name.clone(),
            books: library.book_lines(),
            members: library.member_lines(),
        }
    }
}

/// Left side control panel.
pub struct ControlPanel {
    pub source_path: Option<PathBuf>,
    pub status: String,
    pub is_error: bool,
    pub loading: bool,
    pub can_export: bool,
    pub catalog: Option<CatalogSummary>,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            source_path: None,
            status: "Ready".to_string(),
            is_error: false,
            loading: false,
            can_export: false,
            catalog: None,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_source(&mut self, path: &Path) {
        self.source_path = Some(path.to_path_buf());
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
        self.is_error = false;
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.status = error.into();
        self.is_error = true;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📈 Popchart")
                    .size(22.0)
                    .color(Color32::from_rgb(70, 130, 180)),
            );
            ui.label(
                RichText::new("Population over time")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .source_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.source_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui
                            .add_enabled(!self.loading, egui::Button::new("📂 Browse"))
                            .clicked()
                        {
                            action = ControlPanelAction::BrowseCsv;
                        }
                        if ui
                            .add_enabled(
                                !self.loading && self.source_path.is_some(),
                                egui::Button::new("🔄"),
                            )
                            .on_hover_text("Reload")
                            .clicked()
                        {
                            action = ControlPanelAction::Reload;
                        }
                    });
                });
            });

        ui.add_space(8.0);

        // Status
        let status_color = if self.is_error {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.horizontal(|ui| {
            if self.loading {
                ui.spinner();
            }
            ui.label(RichText::new(&self.status).size(12.0).color(status_color));
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export Section =====
        ui.label(RichText::new("💾 Export").size(14.0).strong());
        ui.add_space(5.0);
        if ui
            .add_enabled(self.can_export, egui::Button::new("Save chart as SVG / PNG"))
            .clicked()
        {
            action = ControlPanelAction::ExportChart;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Catalog Section =====
        if let Some(catalog) = &self.catalog {
            ui.label(RichText::new(format!("📚 {}", catalog.name)).size(14.0).strong());
            ui.add_space(5.0);

            ScrollArea::vertical()
                .id_salt("catalog_scroll")
                .max_height(300.0)
                .show(ui, |ui| {
                    ui.collapsing(format!("Books ({})", catalog.books.len()), |ui| {
                        for line in &catalog.books {
                            ui.label(RichText::new(line).size(11.0));
                        }
                    });
                    ui.collapsing(format!("Members ({})", catalog.members.len()), |ui| {
                        for line in &catalog.members {
                            ui.label(RichText::new(line).size(11.0));
                        }
                    });
                });
        }

        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Book, Member};

    #[test]
    fn test_catalog_summary() {
        let mut library = Library::new("Branch", "1 Road", "555-0000");
        library.add_book(Book::new("Dune", "Frank Herbert", 1965));
        library.register_member(Member::new("Ada", "7", "ada@example.com"));

        let summary = CatalogSummary::from_library(&library);
        assert_eq!(summary.name, "Branch");
        assert_eq!(summary.books, vec!["Dune - Frank Herbert (1965)"]);
        assert_eq!(summary.members, vec!["Ada (ID: 7, Email: ada@example.com)"]);
    }

    #[test]
    fn test_status_flags() {
        let mut panel = ControlPanel::new();
        panel.set_error("Error: missing field");
        assert!(panel.is_error);
        panel.set_status("Loaded 3 records");
        assert!(!panel.is_error);
        assert_eq!(panel.status, "Loaded 3 records");
    }
}
