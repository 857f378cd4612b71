use eframe::egui;

use crate::report::narrative;
use crate::state::{AppState, Tab};
use crate::ui::{panels, tabs};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct AdultsApp {
    pub state: AppState,
}

impl AdultsApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for AdultsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: tabs ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    tabs::banner(ui, &self.state);
                    ui.vertical_centered(|ui| {
                        ui.label(egui::RichText::new(narrative::TITLE).size(32.0).strong());
                    });

                    ui.horizontal(|ui| {
                        for tab in Tab::ALL {
                            ui.selectable_value(&mut self.state.active_tab, tab, tab.label());
                        }
                    });
                    ui.separator();

                    tabs::active_tab(ui, &self.state);
                });
        });
    }
}
