use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use super::model::{Deal, TrendPoint, TrendTable};

// ---------------------------------------------------------------------------
// Country roles over deals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CountryRole {
    Seller,
    Buyer,
    Both,
}

impl fmt::Display for CountryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CountryRole::Seller => "Seller",
            CountryRole::Buyer => "Buyer",
            CountryRole::Both => "Both",
        };
        f.write_str(s)
    }
}

/// One country's role across a set of deals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountrySummary {
    pub country: String,
    pub role: CountryRole,
    pub deal_count: usize,
}

/// Summarise the role every country plays across `deals`, in first-seen order.
///
/// Each deal adds one to its seller country and one to its buyer country, so
/// the counts always sum to twice the number of deals. A country is only
/// promoted to [`CountryRole::Both`] by a deal whose seller and buyer
/// countries are equal; selling in one deal and buying in another keeps the
/// role it was first seen with.
pub fn country_roles<'a>(deals: impl IntoIterator<Item = &'a Deal>) -> Vec<CountrySummary> {
    let mut summary: Vec<CountrySummary> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for deal in deals {
        let seller = tally(&mut summary, &mut index, &deal.seller_country, CountryRole::Seller);
        tally(&mut summary, &mut index, &deal.buyer_country, CountryRole::Buyer);
        if deal.seller_country == deal.buyer_country {
            summary[seller].role = CountryRole::Both;
        }
    }
    summary
}

/// Count one deal slot for `country`, registering it with `role` on first
/// sight. Returns the country's position in `summary`.
fn tally<'a>(
    summary: &mut Vec<CountrySummary>,
    index: &mut HashMap<&'a str, usize>,
    country: &'a str,
    role: CountryRole,
) -> usize {
    let slot = *index.entry(country).or_insert_with(|| {
        summary.push(CountrySummary {
            country: country.to_string(),
            role,
            deal_count: 0,
        });
        summary.len() - 1
    });
    summary[slot].deal_count += 1;
    slot
}

// ---------------------------------------------------------------------------
// Wide → long reshape of trend tables
// ---------------------------------------------------------------------------

/// Melt a wide trend table into `(identifier, year, value)` points.
///
/// Points are year-major: every row for the first year column, then every
/// row for the next. Missing values are kept as `None`.
pub fn reshape_long(table: &TrendTable) -> Vec<TrendPoint> {
    table
        .years
        .iter()
        .enumerate()
        .flat_map(|(col, &year)| {
            table.rows.iter().map(move |row| TrendPoint {
                identifier: row.identifier.clone(),
                year,
                value: row.values.get(col).copied().flatten(),
            })
        })
        .collect()
}
