use eframe::egui;

use crate::state::{AppState, Tab};
use crate::ui::{panels, tabs};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    /// Runs top to bottom on every interaction. Nothing past the access
    /// gate is drawn (or loaded) until the session is unlocked.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.state.is_unlocked() {
            egui::CentralPanel::default().show(ctx, |ui| {
                panels::login_panel(ui, &mut self.state);
            });
            return;
        }

        panels::handle_dropped_files(ctx, &mut self.state);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: upload ----
        egui::SidePanel::left("upload_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: footer ----
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            panels::footer(ui);
        });

        // ---- Central panel: header, tabs ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::header(ui);
            ui.add_space(8.0);
            panels::tab_bar(ui, &mut self.state);

            let tab = self.state.tab;
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match tab {
                    Tab::DataAnalysis => tabs::data_analysis(ui, &mut self.state),
                    Tab::SantaMap => tabs::santa_map(ui, &self.state),
                    Tab::Statistics => tabs::statistics(ui, &self.state),
                });
        });
    }
}
