use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::{DashboardConfig, TrendSource};
use crate::data::aggregate::{CountrySummary, country_roles, reshape_long};
use crate::data::cache::DatasetCache;
use crate::data::error::LoadError;
use crate::data::filter::{
    DealColumn, FilterColumn, FilterState, Selection, TerminalColumn, filter_options,
    filtered_indices, init_filter_state, search_definitions,
};
use crate::data::model::{Deal, Definition, TerminalTable};
use crate::data::views::{MapMarker, TimeSeries, View, map_markers, time_series};

/// A dataset as the dashboard holds it: shared read-only, or the reason it
/// is missing.
pub type Loaded<T> = Result<Arc<T>, LoadError>;

/// Series of one trend source, computed once at load.
#[derive(Debug, Clone)]
pub struct TrendData {
    pub label: &'static str,
    pub series: Loaded<Vec<TimeSeries>>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,
    cache: DatasetCache,

    pub terminals: Loaded<TerminalTable>,
    /// Per-column filter selections for the map.
    pub terminal_filters: FilterState<TerminalColumn>,
    /// Indices of terminals passing the current filters (cached).
    pub visible_terminals: Vec<usize>,
    /// Colours for the status categories.
    pub color_map: Option<ColorMap>,

    pub deals: Option<Loaded<Vec<Deal>>>,
    pub deal_filters: FilterState<DealColumn>,
    pub visible_deals: Vec<usize>,
    /// Country roles over the visible deals.
    pub country_summary: Vec<CountrySummary>,

    pub definitions: Option<Loaded<Vec<Definition>>>,
    pub definition_query: String,
    pub visible_definitions: Vec<usize>,

    pub trends: Vec<TrendData>,
    pub about: Option<Result<String, String>>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Load every configured source and compute the initial views.
    pub fn new(config: DashboardConfig) -> Self {
        Self::with_cache(config, DatasetCache::new())
    }

    fn with_cache(config: DashboardConfig, mut cache: DatasetCache) -> Self {
        let terminals = cache.terminals(&config.terminals).map(Arc::new);
        let definitions = config
            .definitions
            .as_ref()
            .map(|spec| cache.definitions(spec).map(Arc::new));
        let deals = config
            .deals
            .as_ref()
            .map(|spec| cache.deals(spec).map(Arc::new));

        let mut trends = Vec::new();
        for (label, source) in [("Imports", &config.imports), ("Exports", &config.exports)] {
            if let Some(source) = source {
                trends.push(TrendData {
                    label,
                    series: load_series(&mut cache, source),
                });
            }
        }

        let about = config.about_markdown.as_ref().map(|path| {
            std::fs::read_to_string(path).map_err(|e| {
                log::warn!("Failed to read {}: {e}", path.display());
                format!("Could not read {}: {e}", path.display())
            })
        });

        let status_message = terminals.as_ref().err().map(|e| e.to_string());

        let mut state = Self {
            config,
            cache,
            terminals,
            terminal_filters: init_filter_state(),
            visible_terminals: Vec::new(),
            color_map: None,
            deals,
            deal_filters: init_filter_state(),
            visible_deals: Vec::new(),
            country_summary: Vec::new(),
            definitions,
            definition_query: String::new(),
            visible_definitions: Vec::new(),
            trends,
            about,
            status_message,
        };
        state.rebuild_color_map();
        state.refilter_terminals();
        state.refilter_deals();
        state.research_definitions();
        state
    }

    /// Switch to another config, keeping every source already read.
    pub fn reload(&mut self, config: DashboardConfig) {
        let cache = std::mem::take(&mut self.cache);
        log::debug!("Reloading with {} source file(s) already cached", cache.len());
        *self = Self::with_cache(config, cache);
    }

    /// Rebuild the status colour map from the loaded terminals.
    fn rebuild_color_map(&mut self) {
        self.color_map = self.terminals.as_ref().ok().map(|table| {
            let statuses = filter_options(&table.terminals, TerminalColumn::Status)
                .into_iter()
                .filter_map(|s| match s {
                    Selection::Only(v) => Some(v),
                    Selection::All => None,
                })
                .collect();
            ColorMap::new(TerminalColumn::Status.label(), statuses)
        });
    }

    // -- Terminals --

    /// Recompute `visible_terminals` after a filter change.
    pub fn refilter_terminals(&mut self) {
        self.visible_terminals = match &self.terminals {
            Ok(table) => filtered_indices(&table.terminals, &self.terminal_filters),
            Err(_) => Vec::new(),
        };
    }

    pub fn set_terminal_filter(&mut self, column: TerminalColumn, selection: Selection) {
        self.terminal_filters.insert(column, selection);
        self.refilter_terminals();
    }

    /// Dropdown options for a terminal column (empty when not loaded).
    pub fn terminal_options(&self, column: TerminalColumn) -> Vec<Selection> {
        match &self.terminals {
            Ok(table) => filter_options(&table.terminals, column),
            Err(_) => Vec::new(),
        }
    }

    pub fn marker_view(&self) -> View<Vec<MapMarker>> {
        match &self.terminals {
            Ok(table) => View::from_rows(map_markers(&table.terminals, &self.visible_terminals)),
            Err(e) => View::unavailable(e),
        }
    }

    // -- Deals --

    /// Recompute the visible deals and their country summary.
    pub fn refilter_deals(&mut self) {
        match &self.deals {
            Some(Ok(deals)) => {
                self.visible_deals = filtered_indices(deals, &self.deal_filters);
                self.country_summary =
                    country_roles(self.visible_deals.iter().map(|&i| &deals[i]));
            }
            _ => {
                self.visible_deals.clear();
                self.country_summary.clear();
            }
        }
    }

    pub fn set_deal_filter(&mut self, column: DealColumn, selection: Selection) {
        self.deal_filters.insert(column, selection);
        self.refilter_deals();
    }

    pub fn deal_options(&self, column: DealColumn) -> Vec<Selection> {
        match &self.deals {
            Some(Ok(deals)) => filter_options(deals, column),
            _ => Vec::new(),
        }
    }

    /// `None` when no deals source is configured.
    pub fn summary_view(&self) -> Option<View<Vec<CountrySummary>>> {
        self.deals.as_ref().map(|loaded| match loaded {
            Ok(_) => View::from_rows(self.country_summary.clone()),
            Err(e) => View::unavailable(e),
        })
    }

    // -- Definitions --

    pub fn set_definition_query(&mut self, query: &str) {
        self.definition_query = query.to_string();
        self.research_definitions();
    }

    fn research_definitions(&mut self) {
        self.visible_definitions = match &self.definitions {
            Some(Ok(defs)) => search_definitions(defs, &self.definition_query),
            _ => Vec::new(),
        };
    }

    pub fn definition_view(&self) -> Option<View<Vec<Definition>>> {
        self.definitions.as_ref().map(|loaded| match loaded {
            Ok(defs) => View::from_rows(
                self.visible_definitions
                    .iter()
                    .map(|&i| defs[i].clone())
                    .collect(),
            ),
            Err(e) => View::unavailable(e),
        })
    }

    /// Filter column labels, for logging and headers.
    pub fn active_terminal_filters(&self) -> Vec<String> {
        self.terminal_filters
            .iter()
            .filter(|(_, s)| **s != Selection::All)
            .map(|(c, s)| format!("{}={s}", c.label()))
            .collect()
    }
}

fn load_series(cache: &mut DatasetCache, source: &TrendSource) -> Loaded<Vec<TimeSeries>> {
    let table = cache.trends(&source.source, &source.identifier_column)?;
    let series = time_series(&reshape_long(&table));
    log::debug!(
        "{}: {} series by {} over {} year(s)",
        source.source,
        series.len(),
        table.identifier_column,
        table.years.len()
    );
    Ok(Arc::new(series))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::data::loader::{SheetSelector, SourceSpec};

    fn write_sources(dir: &Path) -> DashboardConfig {
        std::fs::write(
            dir.join("terminals.csv"),
            "TerminalName,FacilityType,Status,Owner,Country,Latitude,Longitude\n\
             Gate,Import,Operating,Gasunie,Netherlands,51.95,4.03\n\
             Sabine Pass,Export,Operating,Cheniere,USA,29.74,-93.87\n\
             Polar,Import,Proposed,Uniper,Norway,95,10\n\
             Brunsbuttel,Import,Construction,Uniper,Germany,53.89,9.20\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("deals.csv"),
            "Buyer,BuyerCountry,Seller,SellerCountry,Volume,Duration\n\
             Uniper,Germany,Cheniere,USA,0.2,20\n\
             SEFE,Germany,QatarEnergy,Qatar,0.1,27\n\
             Shell,,Shell,USA,0.3,15\n",
        )
        .unwrap();
        std::fs::write(dir.join("imports.csv"), "Country,2020,2021\nSpain,5,\nFrance,3,4\n").unwrap();

        DashboardConfig {
            terminals: SourceSpec::new(dir.join("terminals.csv"), SheetSelector::Index(0)),
            definitions: None,
            deals: Some(SourceSpec::new(dir.join("deals.csv"), SheetSelector::Index(0))),
            imports: Some(TrendSource {
                source: SourceSpec::new(dir.join("imports.csv"), SheetSelector::Index(0)),
                identifier_column: "Country".into(),
            }),
            ..DashboardConfig::default()
        }
    }

    #[test]
    fn initial_views_show_everything_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(write_sources(dir.path()));

        let table = state.terminals.as_ref().unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.dropped, 1);
        assert_eq!(state.visible_terminals, vec![0, 1, 2]);
        assert!(state.status_message.is_none());
        assert_eq!(state.country_summary.len(), 4);
        assert_eq!(state.trends[0].series.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn filters_narrow_without_touching_base_table() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(write_sources(dir.path()));

        state.set_terminal_filter(TerminalColumn::Owner, Selection::Only("Uniper".into()));
        assert_eq!(state.visible_terminals, vec![2]);
        state.set_terminal_filter(TerminalColumn::Status, Selection::Only("Operating".into()));
        assert_eq!(state.marker_view(), View::NoMatches);
        assert_eq!(state.terminals.as_ref().unwrap().len(), 3);

        state.set_terminal_filter(TerminalColumn::Owner, Selection::All);
        state.set_terminal_filter(TerminalColumn::Status, Selection::All);
        assert_eq!(state.visible_terminals.len(), 3);
    }

    #[test]
    fn deal_filters_recompute_country_summary() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(write_sources(dir.path()));

        state.set_deal_filter(DealColumn::SellerCountry, Selection::Only("Qatar".into()));
        let countries: Vec<_> = state
            .country_summary
            .iter()
            .map(|s| s.country.as_str())
            .collect();
        assert_eq!(countries, vec!["Qatar", "Germany"]);
    }

    #[test]
    fn missing_source_degrades_to_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig::default().resolved(dir.path());
        let state = AppState::new(config);

        assert!(state.status_message.is_some());
        assert!(matches!(state.marker_view(), View::Unavailable(_)));
        assert!(matches!(state.definition_view(), Some(View::Unavailable(_))));
        assert!(state.summary_view().is_none());
        assert!(state.terminal_options(TerminalColumn::Status).is_empty());
    }
}
