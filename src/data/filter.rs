use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::model::{Deal, Definition, Terminal};

// ---------------------------------------------------------------------------
// Filterable columns
// ---------------------------------------------------------------------------

/// A column of a typed row that can be constrained by a dropdown.
///
/// Each dataset enumerates its filter columns up front so a misspelt
/// column is a compile error instead of a filter that never applies.
pub trait FilterColumn: Copy + Ord + fmt::Debug + 'static {
    type Row;

    /// Every filter column of this dataset, in display order.
    const ALL: &'static [Self];

    /// Label shown next to the dropdown.
    fn label(self) -> &'static str;

    /// The row's value for this column.
    fn value(self, row: &Self::Row) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TerminalColumn {
    FacilityType,
    Status,
    Owner,
    Country,
    Parent,
}

impl FilterColumn for TerminalColumn {
    type Row = Terminal;

    const ALL: &'static [Self] = &[
        Self::FacilityType,
        Self::Status,
        Self::Owner,
        Self::Country,
        Self::Parent,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::FacilityType => "Facility Type",
            Self::Status => "Status",
            Self::Owner => "Owner",
            Self::Country => "Country",
            Self::Parent => "Parent",
        }
    }

    fn value(self, row: &Terminal) -> &str {
        match self {
            Self::FacilityType => &row.facility_type,
            Self::Status => &row.status,
            Self::Owner => &row.owner,
            Self::Country => &row.country,
            Self::Parent => &row.parent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DealColumn {
    SellerCountry,
    BuyerCountry,
}

impl FilterColumn for DealColumn {
    type Row = Deal;

    const ALL: &'static [Self] = &[Self::SellerCountry, Self::BuyerCountry];

    fn label(self) -> &'static str {
        match self {
            Self::SellerCountry => "Seller Country",
            Self::BuyerCountry => "Buyer Country",
        }
    }

    fn value(self, row: &Deal) -> &str {
        match self {
            Self::SellerCountry => &row.seller_country,
            Self::BuyerCountry => &row.buyer_country,
        }
    }
}

// ---------------------------------------------------------------------------
// Filter predicate: one selection per column
// ---------------------------------------------------------------------------

/// A dropdown choice: either no constraint, or one exact value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    /// Exact, case-sensitive match. `All` matches everything.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(v) => v == value,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => write!(f, "All"),
            Selection::Only(v) => write!(f, "{v}"),
        }
    }
}

/// Per-column selection state. A column that is absent behaves as `All`.
pub type FilterState<C> = BTreeMap<C, Selection>;

/// Initialise a [`FilterState`] with every column set to `All`.
pub fn init_filter_state<C: FilterColumn>() -> FilterState<C> {
    C::ALL.iter().map(|&c| (c, Selection::All)).collect()
}

/// Return indices of rows that pass all active filters, in table order.
///
/// Filters compose conjunctively. An empty result means "no matches"; the
/// base rows are never touched.
pub fn filtered_indices<R, C>(rows: &[R], filters: &FilterState<C>) -> Vec<usize>
where
    C: FilterColumn<Row = R>,
{
    rows.iter()
        .enumerate()
        .filter(|(_, row)| {
            filters
                .iter()
                .all(|(col, selected)| selected.matches(col.value(row)))
        })
        .map(|(i, _)| i)
        .collect()
}

/// Dropdown options for a column: `All`, then the sorted distinct values.
pub fn filter_options<R, C>(rows: &[R], column: C) -> Vec<Selection>
where
    C: FilterColumn<Row = R>,
{
    let distinct: BTreeSet<&str> = rows.iter().map(|r| column.value(r)).collect();
    std::iter::once(Selection::All)
        .chain(distinct.into_iter().map(|v| Selection::Only(v.to_string())))
        .collect()
}

// ---------------------------------------------------------------------------
// Free-text search
// ---------------------------------------------------------------------------

/// Indices of definitions where any field contains `query`, ignoring case.
/// An empty query returns every row.
pub fn search_definitions(definitions: &[Definition], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return (0..definitions.len()).collect();
    }
    let needle = query.to_lowercase();
    definitions
        .iter()
        .enumerate()
        .filter(|(_, d)| d.fields().iter().any(|f| f.to_lowercase().contains(&needle)))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn terminal(facility: &str, status: &str, owner: &str) -> Terminal {
        Terminal {
            name: format!("{facility}-{status}-{owner}"),
            facility_type: facility.into(),
            status: status.into(),
            owner: owner.into(),
            parent: String::new(),
            country: "Netherlands".into(),
            state_province: String::new(),
            capacity: None,
            capacity_units: String::new(),
            capacity_mtpa: None,
            capacity_bcm_per_year: None,
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    fn sample() -> Vec<Terminal> {
        vec![
            terminal("Import", "Operating", "Gasunie"),
            terminal("Export", "Operating", "Cheniere"),
            terminal("Import", "Proposed", "Gasunie"),
            terminal("Import", "operating", "Uniper"),
        ]
    }

    #[test]
    fn all_selected_is_identity() {
        let rows = sample();
        let filters = init_filter_state::<TerminalColumn>();
        assert_eq!(filtered_indices(&rows, &filters), vec![0, 1, 2, 3]);
    }

    #[test]
    fn selections_compose_and_are_case_sensitive() {
        let rows = sample();
        let mut filters = init_filter_state::<TerminalColumn>();
        filters.insert(TerminalColumn::FacilityType, Selection::Only("Import".into()));
        filters.insert(TerminalColumn::Status, Selection::Only("Operating".into()));

        assert_eq!(filtered_indices(&rows, &filters), vec![0]);
    }

    #[test]
    fn no_match_is_an_empty_result() {
        let rows = sample();
        let mut filters = FilterState::new();
        filters.insert(TerminalColumn::Owner, Selection::Only("Gasun".into()));
        assert!(filtered_indices(&rows, &filters).is_empty());
    }

    #[test]
    fn options_start_with_all_then_sorted_values() {
        let rows = sample();
        let opts = filter_options(&rows, TerminalColumn::Status);
        assert_eq!(
            opts,
            vec![
                Selection::All,
                Selection::Only("Operating".into()),
                Selection::Only("Proposed".into()),
                Selection::Only("operating".into()),
            ]
        );
    }

    #[test]
    fn deal_columns_filter_on_countries() {
        let deal = |s: &str, b: &str| Deal {
            buyer: String::new(),
            buyer_country: b.into(),
            seller: String::new(),
            seller_country: s.into(),
            volume: None,
            duration: None,
            start_date: String::new(),
            end_date: String::new(),
        };
        let deals = vec![deal("Qatar", "Germany"), deal("USA", "Germany"), deal("Qatar", "China")];
        let mut filters = init_filter_state::<DealColumn>();
        filters.insert(DealColumn::SellerCountry, Selection::Only("Qatar".into()));

        assert_eq!(filtered_indices(&deals, &filters), vec![0, 2]);
    }

    #[test]
    fn search_matches_any_field_ignoring_case() {
        let defs = vec![
            Definition {
                term: "FSRU".into(),
                text: "Floating Storage and Regasification Unit".into(),
            },
            Definition {
                term: "Mtpa".into(),
                text: "Million tonnes per annum".into(),
            },
        ];
        assert_eq!(search_definitions(&defs, "fsru"), vec![0]);
        assert_eq!(search_definitions(&defs, "TONNES"), vec![1]);
        assert!(search_definitions(&defs, "pipeline").is_empty());
    }

    #[test]
    fn empty_search_returns_everything_in_order() {
        let defs: Vec<Definition> = (0..5)
            .map(|i| Definition {
                term: format!("t{i}"),
                text: String::new(),
            })
            .collect();
        assert_eq!(search_definitions(&defs, ""), vec![0, 1, 2, 3, 4]);
    }

    fn arb_terminal() -> impl Strategy<Value = Terminal> {
        (
            prop::sample::select(vec!["Import", "Export"]),
            prop::sample::select(vec!["Operating", "Proposed", "Idle"]),
            prop::sample::select(vec!["A", "B", "C"]),
        )
            .prop_map(|(f, s, o)| terminal(f, s, o))
    }

    fn arb_selection() -> impl Strategy<Value = Selection> {
        prop_oneof![
            Just(Selection::All),
            prop::sample::select(vec!["Import", "Operating", "Idle", "A", "C"])
                .prop_map(|v| Selection::Only(v.to_string())),
        ]
    }

    proptest! {
        #[test]
        fn filtered_rows_are_a_matching_subset(
            rows in prop::collection::vec(arb_terminal(), 0..40),
            facility in arb_selection(),
            status in arb_selection(),
            owner in arb_selection(),
        ) {
            let mut filters = FilterState::new();
            filters.insert(TerminalColumn::FacilityType, facility);
            filters.insert(TerminalColumn::Status, status);
            filters.insert(TerminalColumn::Owner, owner);

            let idx = filtered_indices(&rows, &filters);
            prop_assert!(idx.windows(2).all(|w| w[0] < w[1]));
            for &i in &idx {
                prop_assert!(i < rows.len());
                for (col, sel) in &filters {
                    prop_assert!(sel.matches(col.value(&rows[i])));
                }
            }
            let expected = rows
                .iter()
                .filter(|r| filters.iter().all(|(c, s)| s.matches(c.value(r))))
                .count();
            prop_assert_eq!(idx.len(), expected);
        }

        #[test]
        fn all_filters_return_every_row(rows in prop::collection::vec(arb_terminal(), 0..40)) {
            let filters = init_filter_state::<TerminalColumn>();
            let idx = filtered_indices(&rows, &filters);
            prop_assert_eq!(idx, (0..rows.len()).collect::<Vec<_>>());
        }
    }
}
