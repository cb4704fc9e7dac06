use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::ColumnPalette;
use crate::state::AppState;
use crate::view::{GroupView, IdolCard, ImageRef};

// ---------------------------------------------------------------------------
// Catalog grid (central panel)
// ---------------------------------------------------------------------------

/// Render the grouped catalog in the central panel.
pub fn catalog_view(ui: &mut Ui, state: &AppState, palette: &ColumnPalette) {
    if let Some(failure) = &state.load_error {
        ui.centered_and_justified(|ui: &mut Ui| {
            let text = format!("{}\n{}", failure.headline(), failure.message);
            ui.heading(RichText::new(text).color(Color32::RED));
        });
        return;
    }
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a catalog to browse idols  (File → Open…)");
        });
        return;
    }

    ui.heading("アイドル管理システム");

    let image_width = state.config.image_width;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if state.view.groups.is_empty() {
                ui.label("No idols match the current filters.");
            }
            for group in &state.view.groups {
                skill_group(ui, group, palette, image_width);
                ui.add_space(12.0);
            }
        });
}

fn skill_group(ui: &mut Ui, group: &GroupView, palette: &ColumnPalette, image_width: f32) {
    ui.heading(&group.header);
    if group.columns.is_empty() {
        return;
    }

    // Column labels, once per group.
    egui::Frame::default()
        .fill(Color32::from_rgb(0xf5, 0xf5, 0xf5))
        .inner_margin(10.0)
        .show(ui, |ui: &mut Ui| {
            ui.columns(group.columns.len(), |cols| {
                for (col_ui, label) in cols.iter_mut().zip(&group.columns) {
                    col_ui.vertical_centered(|ui: &mut Ui| {
                        egui::Frame::default()
                            .fill(palette.color_for(label))
                            .inner_margin(5.0)
                            .show(ui, |ui: &mut Ui| {
                                ui.label(RichText::new(label).color(Color32::BLACK));
                            });
                    });
                }
            });
        });

    for row in &group.rows {
        ui.label(RichText::new(&row.header).strong());
        ui.columns(group.columns.len(), |cols| {
            for (col_ui, cell) in cols.iter_mut().zip(&row.cells) {
                for card in cell {
                    idol_card(col_ui, card, image_width);
                }
            }
        });
        ui.separator();
    }
}

fn idol_card(ui: &mut Ui, card: &IdolCard, image_width: f32) {
    match &card.image {
        ImageRef::Found(path) => {
            let uri = format!("file://{}", path.display());
            ui.add(egui::Image::new(uri).max_width(image_width));
        }
        ImageRef::Missing(reference) => {
            ui.colored_label(Color32::RED, format!("画像が見つかりません: {reference}"));
        }
    }

    for line in &card.name_lines {
        ui.label(line);
    }

    egui::CollapsingHeader::new("詳細")
        .id_salt(("detail", card.index))
        .show(ui, |ui: &mut Ui| {
            for field in &card.details {
                ui.horizontal_wrapped(|ui: &mut Ui| {
                    ui.label(RichText::new(format!("{}:", field.label)).strong());
                    ui.label(&field.value);
                });
            }
        });
    ui.add_space(6.0);
}
