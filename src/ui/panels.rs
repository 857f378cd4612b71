use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::Column;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    if let Some(logo) = &state.config.logo {
        let uri = format!("file://{}", logo.display());
        ui.vertical_centered(|ui: &mut Ui| {
            ui.add(
                egui::Image::new(uri)
                    .max_width(ui.available_width() * 0.8)
                    .max_height(120.0),
            );
        });
        ui.add_space(4.0);
    }

    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Filters");
        if !state.selection.is_empty() && ui.small_button("Clear all").clicked() {
            state.clear_all_filters();
        }
    });
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for column in Column::FILTERABLE {
                filter_group(ui, state, column);
            }
        });
}

/// One collapsible checkbox list. Nothing ticked means no restriction.
fn filter_group(ui: &mut Ui, state: &mut AppState, column: Column) {
    // Clone so we can mutate state inside the loop.
    let options = state.filter_options(column).to_vec();
    let header_text = match state.selection.selected(column) {
        Some(values) if state.selection.is_active(column) => {
            format!("{}  ({}/{})", column.label(), values.len(), options.len())
        }
        _ => format!("{}  (all)", column.label()),
    };

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(column.name())
        .default_open(column != Column::NativeCountry)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(column);
                }
                if ui.small_button("Clear").clicked() {
                    state.clear_filter(column);
                }
            });

            for value in &options {
                let mut checked = state.selection.is_selected(column, value);
                if ui.checkbox(&mut checked, value.as_str()).changed() {
                    state.toggle_filter_value(column, value);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        for (variant, rows) in state.dashboard.row_counts {
            let total = state.datasets.get(variant).len();
            ui.label(format!("{}: {rows}/{total} rows", variant.label()));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open data folder")
        .set_directory(&state.config.data_dir)
        .pick_folder();

    if let Some(dir) = folder {
        log::info!("Reloading datasets from {}", dir.display());
        state.reload_from(&dir);
    }
}
