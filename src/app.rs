use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, tables};

/// Tabs of the central panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Map,
    Deals,
    Trends,
    Definitions,
    About,
}

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::Map, Tab::Deals, Tab::Trends, Tab::Definitions, Tab::About];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Map => "📍 Map View",
            Tab::Deals => "🤝 Deals",
            Tab::Trends => "📈 Trends",
            Tab::Definitions => "📚 Definitions",
            Tab::About => "ℹ About Us",
        }
    }
}

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LngDashboardApp {
    pub state: AppState,
    pub tab: Tab,
}

impl LngDashboardApp {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            tab: Tab::Map,
        }
    }
}

impl eframe::App for LngDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title and menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters for the active tab ----
        if matches!(self.tab, Tab::Map | Tab::Deals) {
            egui::SidePanel::left("filter_panel")
                .default_width(220.0)
                .resizable(true)
                .show(ctx, |ui| {
                    panels::side_panel(ui, &mut self.state, self.tab);
                });
        }

        // ---- Central panel: tab strip and content ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                for tab in Tab::ALL {
                    ui.selectable_value(&mut self.tab, tab, tab.title());
                }
            });
            ui.separator();

            match self.tab {
                Tab::Map => plot::terminal_map(ui, &self.state),
                Tab::Deals => tables::deals_tab(ui, &self.state),
                Tab::Trends => plot::trend_charts(ui, &self.state),
                Tab::Definitions => tables::definitions_tab(ui, &mut self.state),
                Tab::About => tables::about_tab(ui, &self.state),
            }
        });
    }
}
