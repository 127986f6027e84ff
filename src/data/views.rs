use std::collections::BTreeMap;

use super::error::LoadError;
use super::model::{Terminal, TrendPoint};
use super::schema::terminals as cols;

/// What a panel can show for a dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum View<T> {
    /// The source failed to load; carries the message to display.
    Unavailable(String),
    /// Loaded, but nothing passed the current filters.
    NoMatches,
    Ready(T),
}

impl<T> View<T> {
    pub fn unavailable(err: &LoadError) -> Self {
        View::Unavailable(err.to_string())
    }
}

impl<I> View<Vec<I>> {
    /// Wrap derived rows, mapping an empty result to [`View::NoMatches`].
    pub fn from_rows(rows: Vec<I>) -> Self {
        if rows.is_empty() {
            View::NoMatches
        } else {
            View::Ready(rows)
        }
    }
}

// ---------------------------------------------------------------------------
// Map markers
// ---------------------------------------------------------------------------

/// A terminal ready to be drawn on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub latitude: f64,
    pub longitude: f64,
    /// Colour-coding category (the terminal status).
    pub category: String,
    pub hover_name: String,
    /// Fixed hover-detail fields as `(column, value)`.
    pub details: Vec<(&'static str, String)>,
}

fn number(v: Option<f64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

impl MapMarker {
    pub fn from_terminal(t: &Terminal) -> Self {
        let details = vec![
            (cols::STATE_PROVINCE, t.state_province.clone()),
            (cols::COUNTRY, t.country.clone()),
            (cols::CAPACITY, number(t.capacity)),
            (cols::CAPACITY_UNITS, t.capacity_units.clone()),
            (cols::STATUS, t.status.clone()),
            (cols::OWNER, t.owner.clone()),
            (cols::PARENT, t.parent.clone()),
            (cols::CAPACITY_MTPA, number(t.capacity_mtpa)),
            (cols::CAPACITY_BCM, number(t.capacity_bcm_per_year)),
        ];
        MapMarker {
            latitude: t.latitude,
            longitude: t.longitude,
            category: t.status.clone(),
            hover_name: t.name.clone(),
            details,
        }
    }

    /// Multi-line hover text: name first, then one `column: value` per line.
    pub fn hover_text(&self) -> String {
        let mut text = self.hover_name.clone();
        for (label, value) in &self.details {
            text.push_str(&format!("\n{label}: {value}"));
        }
        text
    }
}

/// Markers for the visible rows of `terminals`.
pub fn map_markers(terminals: &[Terminal], visible: &[usize]) -> Vec<MapMarker> {
    visible
        .iter()
        .filter_map(|&i| terminals.get(i))
        .map(MapMarker::from_terminal)
        .collect()
}

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

/// One line of a trend chart. Points are `[year, value]`, ordered by year,
/// with missing values left out.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

/// Group long-form points into one series per identifier, ordered by name.
///
/// An identifier repeated across rows keeps the first value seen for each
/// year; later duplicates are logged and skipped.
pub fn time_series(points: &[TrendPoint]) -> Vec<TimeSeries> {
    let mut grouped: BTreeMap<&str, BTreeMap<i32, Option<f64>>> = BTreeMap::new();
    for p in points {
        let years = grouped.entry(p.identifier.as_str()).or_default();
        if years.contains_key(&p.year) {
            log::warn!(
                "Duplicate trend row for '{}' in {}, keeping the first value",
                p.identifier,
                p.year
            );
            continue;
        }
        years.insert(p.year, p.value);
    }

    grouped
        .into_iter()
        .map(|(name, years)| TimeSeries {
            name: name.to_string(),
            points: years
                .into_iter()
                .filter_map(|(y, v)| v.map(|v| [y as f64, v]))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> Terminal {
        Terminal {
            name: "Gate".into(),
            facility_type: "Import".into(),
            status: "Operating".into(),
            owner: "Gasunie".into(),
            parent: "Gasunie; Vopak".into(),
            country: "Netherlands".into(),
            state_province: "South Holland".into(),
            capacity: Some(16.0),
            capacity_units: "bcm/y".into(),
            capacity_mtpa: Some(11.7),
            capacity_bcm_per_year: Some(16.0),
            latitude: 51.95,
            longitude: 4.03,
        }
    }

    #[test]
    fn marker_carries_position_category_and_details() {
        let m = MapMarker::from_terminal(&gate());
        assert_eq!((m.latitude, m.longitude), (51.95, 4.03));
        assert_eq!(m.category, "Operating");
        let labels: Vec<_> = m.details.iter().map(|(l, _)| *l).collect();
        assert_eq!(
            labels,
            vec![
                "State/Province",
                "Country",
                "Capacity",
                "CapacityUnits",
                "Status",
                "Owner",
                "Parent",
                "CapacityInMtpa",
                "CapacityInBcm/y",
            ]
        );
        assert!(m.hover_text().starts_with("Gate\nState/Province: South Holland"));
    }

    #[test]
    fn markers_follow_visible_indices() {
        let mut other = gate();
        other.name = "Eemshaven".into();
        let terminals = vec![gate(), other];
        let markers = map_markers(&terminals, &[1]);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].hover_name, "Eemshaven");
    }

    #[test]
    fn empty_rows_are_no_matches() {
        let empty: Vec<MapMarker> = Vec::new();
        assert_eq!(View::from_rows(empty), View::NoMatches);
        let err = LoadError::SheetNotFound {
            path: "lng.json".into(),
            sheet: "#1".into(),
        };
        assert!(matches!(View::<Vec<MapMarker>>::unavailable(&err), View::Unavailable(m) if m.contains("lng.json")));
    }

    #[test]
    fn series_skip_missing_and_sort_by_year() {
        let p = |id: &str, year, value| TrendPoint {
            identifier: id.into(),
            year,
            value,
        };
        let points = vec![
            p("Spain", 2021, Some(2.0)),
            p("France", 2020, None),
            p("Spain", 2020, Some(1.0)),
        ];
        let series = time_series(&points);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "France");
        assert!(series[0].points.is_empty());
        assert_eq!(series[1].points, vec![[2020.0, 1.0], [2021.0, 2.0]]);
    }

    #[test]
    fn repeated_identifier_keeps_first_row_per_year() {
        let p = |id: &str, year, value| TrendPoint {
            identifier: id.into(),
            year,
            value,
        };
        // Year-major, as produced by the reshape: two "Spain" rows.
        let points = vec![
            p("Spain", 2020, Some(1.0)),
            p("Spain", 2020, Some(9.0)),
            p("Spain", 2021, None),
            p("Spain", 2021, Some(8.0)),
        ];
        let series = time_series(&points);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].points, vec![[2020.0, 1.0]]);
    }
}
