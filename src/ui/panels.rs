use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter;
use crate::data::model::{FieldValue, FilterField};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("絞り込み");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No catalog loaded.");
        return;
    };

    // Clone the options so we can mutate state inside the loop.
    let options: Vec<(FilterField, Vec<FieldValue>)> = FilterField::ALL
        .iter()
        .map(|&field| (field, dataset.distinct_values(field).to_vec()))
        .collect();

    if filter::active_field_count(&state.filters) > 0 && ui.button("Clear all").clicked() {
        state.clear_all();
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (field, values) in &options {
                let n_selected = state.filters.get(field).map_or(0, |s| s.len());
                let header_text = if n_selected == 0 {
                    format!("{}で絞り込む", field.label())
                } else {
                    format!("{}で絞り込む  ({n_selected}/{})", field.label(), values.len())
                };

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(field)
                    .default_open(matches!(field, FilterField::Skill | FilterField::Seconds))
                    .show(ui, |ui: &mut Ui| {
                        if n_selected > 0 && ui.small_button("Clear").clicked() {
                            state.clear_field(*field);
                        }
                        for value in values {
                            let mut checked = state.is_selected(*field, value);
                            if ui.checkbox(&mut checked, value.to_string()).changed() {
                                state.toggle_filter_value(*field, value);
                            }
                        }
                    });
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
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} idols loaded, {} match, {} shown",
                ds.len(),
                state.visible,
                state.view.shown
            ));
            if state.view.missing_images > 0 {
                ui.separator();
                ui.label(
                    RichText::new(format!("{} missing image(s)", state.view.missing_images))
                        .color(Color32::from_rgb(200, 120, 0)),
                );
            }
        }

        if let Some(failure) = &state.load_error {
            ui.separator();
            ui.label(RichText::new(&failure.message).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open idol catalog")
        .add_filter("Catalog files", &["csv", "tsv", "txt"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
    }
}
