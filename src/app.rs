use eframe::egui;

use crate::color::ColumnPalette;
use crate::state::AppState;
use crate::ui::{catalog, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct IdolCatalogApp {
    pub state: AppState,
    palette: ColumnPalette,
}

impl IdolCatalogApp {
    pub fn new(state: AppState, palette: ColumnPalette) -> Self {
        Self { state, palette }
    }
}

impl eframe::App for IdolCatalogApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: catalog grid ----
        egui::CentralPanel::default().show(ctx, |ui| {
            catalog::catalog_view(ui, &self.state, &self.palette);
        });
    }
}
