use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::app::Tab;
use crate::config::DashboardConfig;
use crate::data::filter::{DealColumn, FilterColumn, Selection, TerminalColumn};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel for the active tab.
pub fn side_panel(ui: &mut Ui, state: &mut AppState, tab: Tab) {
    ui.heading("Filters");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match tab {
            Tab::Map => terminal_filters(ui, state),
            Tab::Deals => deal_filters(ui, state),
            _ => {}
        });
}

fn terminal_filters(ui: &mut Ui, state: &mut AppState) {
    if state.terminals.is_err() {
        ui.label("No dataset loaded.");
        return;
    }

    for &col in TerminalColumn::ALL {
        let options = state.terminal_options(col);
        let current = state.terminal_filters.get(&col).cloned().unwrap_or_default();
        if let Some(choice) = selection_combo(ui, col, &current, &options) {
            state.set_terminal_filter(col, choice);
        }
    }

    ui.separator();
    ui.label(format!(
        "{} of {} terminals shown",
        state.visible_terminals.len(),
        state.terminals.as_ref().map(|t| t.len()).unwrap_or(0)
    ));

    // ---- Status legend ----
    if let Some(cm) = &state.color_map {
        ui.separator();
        ui.strong(&cm.column);
        for (status, color) in cm.legend_entries() {
            ui.label(RichText::new(format!("● {status}")).color(color));
        }
    }
}

fn deal_filters(ui: &mut Ui, state: &mut AppState) {
    if !matches!(state.deals, Some(Ok(_))) {
        ui.label("No deals loaded.");
        return;
    }

    for &col in DealColumn::ALL {
        let options = state.deal_options(col);
        let current = state.deal_filters.get(&col).cloned().unwrap_or_default();
        if let Some(choice) = selection_combo(ui, col, &current, &options) {
            state.set_deal_filter(col, choice);
        }
    }

    ui.separator();
    ui.label(format!("{} deals shown", state.visible_deals.len()));
}

/// A labelled dropdown; returns the new selection when the user picks one.
fn selection_combo<C: FilterColumn>(
    ui: &mut Ui,
    column: C,
    current: &Selection,
    options: &[Selection],
) -> Option<Selection> {
    let mut picked = None;
    ui.strong(column.label());
    egui::ComboBox::from_id_salt(column.label())
        .selected_text(current.to_string())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for option in options {
                if ui
                    .selectable_label(option == current, option.to_string())
                    .clicked()
                {
                    picked = Some(option.clone());
                }
            }
        });
    ui.add_space(4.0);
    picked.filter(|p| p != current)
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title block and the menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    let heading = Color32::from_rgb(0x00, 0x7B, 0xFF);
    ui.label(RichText::new(&state.config.title).heading().color(heading));
    ui.label(RichText::new(&state.config.subtitle).strong().color(heading));

    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Ok(table) = &state.terminals {
            ui.label(format!(
                "{} terminals loaded, {} visible",
                table.len(),
                state.visible_terminals.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let Some(dir) = rfd::FileDialog::new()
        .set_title("Open LNG data folder")
        .pick_folder()
    else {
        return;
    };

    match DashboardConfig::discover(None, Some(&dir)) {
        Ok(config) => {
            state.reload(config);
            match &state.terminals {
                Ok(table) => log::info!(
                    "Loaded {} terminals from {} ({} dropped)",
                    table.len(),
                    dir.display(),
                    table.dropped
                ),
                Err(e) => log::error!("Failed to load terminals: {e}"),
            }
        }
        Err(e) => {
            log::error!("Failed to read config: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
