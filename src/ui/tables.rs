use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::aggregate::CountryRole;
use crate::data::views::View;
use crate::state::AppState;

fn role_color(role: CountryRole) -> Color32 {
    match role {
        CountryRole::Seller => Color32::from_rgb(0x1f, 0x77, 0xb4),
        CountryRole::Buyer => Color32::from_rgb(0xd6, 0x27, 0x28),
        CountryRole::Both => Color32::from_rgb(0x94, 0x67, 0xbd),
    }
}

// ---------------------------------------------------------------------------
// Deals tab – country role summary
// ---------------------------------------------------------------------------

pub fn deals_tab(ui: &mut Ui, state: &AppState) {
    ui.heading("Country roles in long-term LNG deals");

    let rows = match state.summary_view() {
        None => {
            ui.label("No deals source configured.");
            return;
        }
        Some(View::Unavailable(msg)) => {
            ui.colored_label(Color32::RED, msg);
            return;
        }
        Some(View::NoMatches) => {
            ui.colored_label(Color32::YELLOW, "No deals match the selected filters.");
            return;
        }
        Some(View::Ready(rows)) => rows,
    };

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(160.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Country");
            });
            header.col(|ui| {
                ui.strong("Role");
            });
            header.col(|ui| {
                ui.strong("Deals");
            });
        })
        .body(|mut body| {
            for summary in &rows {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(&summary.country);
                    });
                    row.col(|ui| {
                        ui.label(
                            RichText::new(summary.role.to_string()).color(role_color(summary.role)),
                        );
                    });
                    row.col(|ui| {
                        ui.label(summary.deal_count.to_string());
                    });
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Definitions tab – search box and collapsible entries
// ---------------------------------------------------------------------------

pub fn definitions_tab(ui: &mut Ui, state: &mut AppState) {
    ui.heading("📚 Definitions and Terminology");
    ui.label("This section provides definitions and explanations of terms used in the dataset.");

    let mut query = state.definition_query.clone();
    ui.horizontal(|ui| {
        ui.label("🔍 Search definitions");
        if ui.text_edit_singleline(&mut query).changed() {
            state.set_definition_query(&query);
        }
    });
    ui.separator();

    let definitions = match state.definition_view() {
        None => {
            ui.label("No definitions source configured.");
            return;
        }
        Some(View::Unavailable(msg)) => {
            ui.colored_label(Color32::RED, msg);
            return;
        }
        Some(View::NoMatches) => {
            ui.label("No definitions match the search.");
            return;
        }
        Some(View::Ready(defs)) => defs,
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for (i, def) in definitions.iter().enumerate() {
                egui::CollapsingHeader::new(&def.term)
                    .id_salt(i)
                    .default_open(false)
                    .show(ui, |ui| {
                        ui.label(&def.text);
                    });
            }
        });
}

// ---------------------------------------------------------------------------
// About tab – markdown shown verbatim
// ---------------------------------------------------------------------------

pub fn about_tab(ui: &mut Ui, state: &AppState) {
    ui.heading("ℹ About Us");
    match &state.about {
        None => {
            ui.label("No about text configured.");
        }
        Some(Err(msg)) => {
            ui.colored_label(Color32::RED, msg);
        }
        Some(Ok(text)) => {
            ScrollArea::vertical().show(ui, |ui| {
                ui.label(text);
            });
        }
    }
}
