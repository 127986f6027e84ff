use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use crate::data::views::View;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Terminal map (central panel, Map tab)
// ---------------------------------------------------------------------------

/// Scatter the visible terminals by longitude/latitude, coloured by status.
pub fn terminal_map(ui: &mut Ui, state: &AppState) {
    let markers = match state.marker_view() {
        View::Ready(markers) => markers,
        View::NoMatches => {
            ui.colored_label(Color32::YELLOW, "No terminals match the selected filters.");
            return;
        }
        View::Unavailable(msg) => {
            ui.colored_label(Color32::RED, msg);
            ui.label("Please ensure the terminals workbook is in the data folder (File → Open data folder…).");
            return;
        }
    };

    // Hover text is looked up by nearest marker.
    let hover: Vec<(f64, f64, String)> = markers
        .iter()
        .map(|m| (m.longitude, m.latitude, m.hover_text()))
        .collect();

    Plot::new("terminal_map")
        .legend(Legend::default())
        .data_aspect(1.0)
        .include_x(-180.0)
        .include_x(180.0)
        .include_y(-90.0)
        .include_y(90.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .label_formatter(move |_name, value| {
            hover
                .iter()
                .min_by(|a, b| {
                    let da = (a.0 - value.x).powi(2) + (a.1 - value.y).powi(2);
                    let db = (b.0 - value.x).powi(2) + (b.1 - value.y).powi(2);
                    da.total_cmp(&db)
                })
                .map(|(_, _, text)| text.clone())
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            let color_map = state.color_map.as_ref();
            let mut categories: Vec<&str> = markers.iter().map(|m| m.category.as_str()).collect();
            categories.sort_unstable();
            categories.dedup();

            // One series per status so the legend doubles as a colour key.
            for category in categories {
                let points: PlotPoints = markers
                    .iter()
                    .filter(|m| m.category == category)
                    .map(|m| [m.longitude, m.latitude])
                    .collect();
                let color = color_map
                    .map(|cm| cm.color_for(category))
                    .unwrap_or(Color32::LIGHT_BLUE);

                plot_ui.points(Points::new(points).name(category).color(color).radius(4.0));
            }
        });
}

// ---------------------------------------------------------------------------
// Import / export trends (central panel, Trends tab)
// ---------------------------------------------------------------------------

/// One line chart per configured trend source.
pub fn trend_charts(ui: &mut Ui, state: &AppState) {
    if state.trends.is_empty() {
        ui.label("No import or export trends configured.");
        return;
    }

    let height = (ui.available_height() / state.trends.len() as f32 - 24.0).max(150.0);
    for trend in &state.trends {
        ui.heading(trend.label);
        let series = match &trend.series {
            Ok(series) if series.is_empty() => {
                ui.label("No data.");
                continue;
            }
            Ok(series) => series,
            Err(e) => {
                ui.colored_label(Color32::RED, e.to_string());
                continue;
            }
        };

        Plot::new(trend.label)
            .legend(Legend::default())
            .height(height)
            .x_axis_label("Year")
            .y_axis_label(trend.label)
            .allow_boxed_zoom(true)
            .allow_drag(true)
            .allow_scroll(true)
            .allow_zoom(true)
            .show(ui, |plot_ui| {
                for s in series.iter() {
                    let points: PlotPoints = s.points.iter().copied().collect();
                    plot_ui.line(Line::new(points).name(&s.name).width(1.5));
                }
            });
    }
}
