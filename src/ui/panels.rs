use std::path::PathBuf;

use eframe::egui::{self, Color32, Key, RichText, Ui};

use crate::data::loader::Upload;
use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Password prompt shown until the session is authenticated.
pub fn login_panel(ui: &mut Ui, state: &mut AppState) {
    ui.add_space(40.0);
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading("🔒 Password Required");
        ui.add_space(8.0);
        ui.label("Please enter the password");

        let response = ui.add(
            egui::TextEdit::singleline(&mut state.login.input)
                .password(true)
                .desired_width(240.0),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
        if submitted || ui.button("Log in").clicked() {
            if state.submit_password() {
                ui.ctx().request_repaint();
            } else {
                response.request_focus();
            }
        }

        if let Some(err) = &state.login.error {
            ui.colored_label(Color32::RED, format!("😕 {err}"));
        }
    });
}

// ---------------------------------------------------------------------------
// Header / footer
// ---------------------------------------------------------------------------

pub fn header(ui: &mut Ui) {
    ui.heading(RichText::new("🧪 Researcher's Web App Starter").size(26.0));
    ui.label(
        "Welcome! This app turns your data files into an interactive tool: \
         upload a CSV or JSON file, filter it, and explore charts, maps and statistics.",
    );
}

pub fn footer(ui: &mut Ui) {
    ui.separator();
    ui.label(
        RichText::new("Built for the 2025 Researcher Workshop")
            .small()
            .weak(),
    );
}

/// Always-visible tab strip.
pub fn tab_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(&mut state.tab, tab, tab.label());
        }
    });
    ui.separator();
}

// ---------------------------------------------------------------------------
// Left side panel – upload
// ---------------------------------------------------------------------------

pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Upload Data");
    ui.separator();

    if ui.button("Choose a CSV or JSON file…").clicked() {
        open_file_dialog(state);
    }
    ui.label(RichText::new("…or drop a file onto the window.").weak());

    if let (Some(name), Some(ds)) = (&state.file_name, &state.dataset) {
        ui.add_space(6.0);
        ui.label(RichText::new(name).strong());
        ui.label(format!("{} rows × {} columns", ds.len(), ds.columns.len()));
    }

    if let Some(msg) = &state.status_message {
        ui.add_space(6.0);
        ui.colored_label(Color32::RED, msg.as_str());
    }

    ui.add_space(12.0);
    ui.label(
        RichText::new("💡 Pro-tip: keep controls in this side panel so the main area stays tidy.")
            .color(Color32::LIGHT_BLUE),
    );
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
            let can_export = state.dataset.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export filtered CSV…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });
    });
}

// ---------------------------------------------------------------------------
// File dialogs / drag and drop
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Upload data")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        upload_path(state, path);
    }
}

fn upload_path(state: &mut AppState, path: PathBuf) {
    match Upload::from_path(&path) {
        Ok(upload) => state.ingest_or_report(&upload),
        Err(e) => {
            log::error!("Failed to read upload: {e}");
            state.status_message = Some(format!("Error: {e}"));
        }
    }
}

/// Ingest files dropped onto the window; the last one wins.
pub fn handle_dropped_files(ctx: &egui::Context, state: &mut AppState) {
    let dropped = ctx.input(|i| i.raw.dropped_files.clone());
    for file in dropped {
        if let Some(bytes) = &file.bytes {
            let name = if file.name.is_empty() {
                file.path
                    .as_ref()
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            } else {
                file.name.clone()
            };
            state.ingest_or_report(&Upload::new(name, bytes.to_vec()));
        } else if let Some(path) = file.path {
            upload_path(state, path);
        }
    }
}

fn export_file_dialog(state: &mut AppState) {
    let target = rfd::FileDialog::new()
        .set_title("Export filtered rows")
        .add_filter("CSV", &["csv"])
        .set_file_name("filtered.csv")
        .save_file();

    if let Some(path) = target {
        match state.export_filtered(&path) {
            Ok(n) => {
                log::info!("Exported {n} rows to {}", path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
