use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde_json::json;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform value in `[lo, hi)` rounded to two decimals.
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        ((lo + (hi - lo) * self.next_f64()) * 100.0).round() / 100.0
    }
}

// (name, type, status, owner, parent, country, state, mtpa, lat, lon)
type TerminalSeed = (&'static str, &'static str, &'static str, &'static str, &'static str, &'static str, &'static str, f64, f64, f64);

const TERMINALS: &[TerminalSeed] = &[
    ("Gate LNG", "Import", "Operating", "Gasunie", "Gasunie; Vopak", "Netherlands", "South Holland", 8.8, 51.95, 4.03),
    ("Eemshaven FSRU", "Import", "Operating", "EemsEnergyTerminal", "Gasunie; Vopak", "Netherlands", "Groningen", 5.9, 53.45, 6.83),
    ("Zeebrugge LNG", "Import", "Operating", "Fluxys", "Fluxys", "Belgium", "West Flanders", 6.6, 51.34, 3.20),
    ("Wilhelmshaven FSRU", "Import", "Operating", "Uniper", "Uniper", "Germany", "Lower Saxony", 5.2, 53.59, 8.15),
    ("Brunsbüttel FSRU", "Import", "Operating", "RWE", "RWE", "Germany", "Schleswig-Holstein", 3.7, 53.89, 9.20),
    ("Stade LNG", "Import", "Construction", "Hanseatic Energy Hub", "Fluxys; Partners Group", "Germany", "Lower Saxony", 9.6, 53.63, 9.51),
    ("Świnoujście LNG", "Import", "Operating", "Gaz-System", "Gaz-System", "Poland", "West Pomeranian", 4.5, 53.93, 14.27),
    ("Krk LNG", "Import", "Operating", "LNG Hrvatska", "HEP; Plinacro", "Croatia", "Primorje-Gorski Kotar", 2.1, 45.23, 14.54),
    ("Barcelona LNG", "Import", "Operating", "Enagás", "Enagás", "Spain", "Catalonia", 12.6, 41.34, 2.16),
    ("Gran Canaria LNG", "Import", "Proposed", "Enagás", "Enagás", "Spain", "Canary Islands", 1.0, 27.86, -15.38),
    ("Hammerfest LNG", "Export", "Operating", "Equinor", "Equinor", "Norway", "Finnmark", 4.3, 70.69, 23.60),
    ("Sabine Pass LNG", "Export", "Operating", "Cheniere", "Cheniere Energy", "USA", "Louisiana", 30.0, 29.74, -93.87),
    ("Calcasieu Pass LNG", "Export", "Operating", "Venture Global", "Venture Global", "USA", "Louisiana", 10.0, 29.78, -93.33),
    ("Ras Laffan LNG", "Export", "Operating", "QatarEnergy", "QatarEnergy", "Qatar", "Al Khor", 77.0, 25.90, 51.56),
    ("Dunkerque LNG", "Import", "Idle", "Fluxys", "Fluxys; AXA", "France", "Nord", 9.5, 51.03, 2.27),
    ("Shannon LNG", "Import", "Cancelled", "New Fortress Energy", "New Fortress Energy", "Ireland", "Kerry", 2.8, 52.59, -9.49),
];

// Rows that must be dropped at load: out-of-range or unparseable positions.
const BROKEN_TERMINALS: &[(&str, &str, &str)] = &[
    ("Polar Test Site", "95", "10"),
    ("Antimeridian Test Site", "45", "200"),
    ("Unknown Site", "", "4.5"),
];

const DEFINITIONS: &[(&str, &str)] = &[
    ("FSRU", "Floating Storage and Regasification Unit: a vessel that stores LNG and converts it back to gas."),
    ("Mtpa", "Million tonnes per annum, the usual unit of LNG terminal capacity."),
    ("Bcm/y", "Billion cubic metres per year of natural gas."),
    ("Status: Operating", "The terminal is in commercial operation."),
    ("Status: Construction", "A final investment decision has been taken and construction has started."),
    ("Status: Proposed", "The project has been announced but not sanctioned."),
    ("Status: Idle", "The terminal exists but is not currently receiving or shipping cargoes."),
    ("Status: Cancelled", "The project has been abandoned."),
];

// (buyer, buyer country, seller, seller country, bcf/d, years, start)
type DealSeed = (&'static str, &'static str, &'static str, &'static str, f64, f64, &'static str);

const DEALS: &[DealSeed] = &[
    ("SEFE", "Germany", "QatarEnergy", "Qatar", 0.26, 27.0, "2026-01-01"),
    ("Uniper", "Germany", "Woodside", "Australia", 0.1, 13.0, "2026-01-01"),
    ("Engie", "France", "Cheniere", "USA", 0.12, 20.0, "2027-01-01"),
    ("Shell", "Netherlands", "Venture Global", "USA", 0.26, 20.0, "2023-03-01"),
    ("PGNiG", "Poland", "Venture Global", "USA", 0.4, 20.0, "2023-01-01"),
    ("Equinor", "Norway", "Cheniere", "USA", 0.23, 15.0, "2026-06-01"),
    ("Cheniere Marketing", "USA", "Cheniere", "USA", 0.15, 10.0, "2024-01-01"),
    ("Eni", "Italy", "QatarEnergy", "Qatar", 0.13, 27.0, "2026-01-01"),
    ("Shell", "", "QatarEnergy", "Qatar", 0.46, 27.0, "2026-01-01"),
];

const IMPORT_COUNTRIES: &[&str] = &["Germany", "France", "Netherlands", "Spain", "Italy", "Poland"];
const EXPORT_COUNTRIES: &[&str] = &["USA", "Qatar", "Norway", "Australia"];
const YEARS: std::ops::RangeInclusive<i32> = 2018..=2024;

fn write_workbook(dir: &Path) -> Result<()> {
    let mut terminals: Vec<serde_json::Value> = TERMINALS
        .iter()
        .map(|&(name, kind, status, owner, parent, country, state, mtpa, lat, lon)| {
            json!({
                "TerminalName": name,
                "FacilityType": kind,
                "Status": status,
                "Owner": owner,
                "Parent": parent,
                "Country": country,
                "State/Province": state,
                "Capacity": mtpa,
                "CapacityUnits": "mtpa",
                "CapacityInMtpa": mtpa,
                "CapacityInBcm/y": (mtpa * 1.36 * 100.0).round() / 100.0,
                "Latitude": lat,
                "Longitude": lon,
            })
        })
        .collect();
    terminals.extend(BROKEN_TERMINALS.iter().map(|&(name, lat, lon)| {
        json!({
            "TerminalName": name,
            "FacilityType": "Import",
            "Status": "Proposed",
            "Owner": "Test",
            "Latitude": lat,
            "Longitude": lon,
        })
    }));

    let definitions: Vec<serde_json::Value> = DEFINITIONS
        .iter()
        .map(|&(term, text)| json!({ "Term": term, "Definition": text }))
        .collect();

    let terminal_rows = terminals.len();
    let workbook = json!({
        "sheets": [
            { "name": "Terminals", "rows": terminals },
            { "name": "Definitions", "rows": definitions },
        ]
    });
    let path = dir.join("LNG-Terminals.json");
    std::fs::write(&path, serde_json::to_string_pretty(&workbook)?)
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote {terminal_rows} terminal rows to {}", path.display());
    Ok(())
}

fn write_deals(dir: &Path) -> Result<()> {
    let column = |f: fn(&DealSeed) -> &'static str| {
        StringArray::from(DEALS.iter().map(f).collect::<Vec<_>>())
    };
    let end_dates: Vec<String> = DEALS
        .iter()
        .map(|d| {
            let start_year: i32 = d.6[..4].parse().unwrap_or(2026);
            format!("{}{}", start_year + d.5 as i32, &d.6[4..])
        })
        .collect();

    let schema = Arc::new(Schema::new(vec![
        Field::new("Buyer", DataType::Utf8, false),
        Field::new("BuyerCountry", DataType::Utf8, true),
        Field::new("Seller", DataType::Utf8, false),
        Field::new("SellerCountry", DataType::Utf8, true),
        Field::new("Volume", DataType::Float64, true),
        Field::new("Duration", DataType::Float64, true),
        Field::new("StartDate", DataType::Utf8, true),
        Field::new("EndDate", DataType::Utf8, true),
    ]));

    let buyer_country: StringArray = DEALS
        .iter()
        .map(|d| (!d.1.is_empty()).then_some(d.1))
        .collect();

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(column(|d| d.0)),
            Arc::new(buyer_country),
            Arc::new(column(|d| d.2)),
            Arc::new(column(|d| d.3)),
            Arc::new(Float64Array::from(DEALS.iter().map(|d| d.4).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(DEALS.iter().map(|d| d.5).collect::<Vec<_>>())),
            Arc::new(column(|d| d.6)),
            Arc::new(StringArray::from(end_dates)),
        ],
    )
    .context("building deals batch")?;

    let path = dir.join("deals.parquet");
    let file = std::fs::File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing deals batch")?;
    writer.close().context("closing parquet writer")?;
    println!("Wrote {} deals to {}", DEALS.len(), path.display());
    Ok(())
}

fn write_trend(dir: &Path, file_name: &str, countries: &[&str], rng: &mut SimpleRng) -> Result<()> {
    let path = dir.join(file_name);
    let mut writer = csv::Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))?;

    let mut header = vec!["Country".to_string()];
    header.extend(YEARS.map(|y| y.to_string()));
    writer.write_record(&header)?;

    for &country in countries {
        let mut level = rng.range(5.0, 60.0);
        let mut record = vec![country.to_string()];
        for _ in YEARS {
            // Roughly one gap in twenty, to show missing values.
            if rng.next_f64() < 0.05 {
                record.push(String::new());
            } else {
                level = (level * rng.range(0.85, 1.25) * 100.0).round() / 100.0;
                record.push(level.to_string());
            }
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    println!("Wrote {} rows to {}", countries.len(), path.display());
    Ok(())
}

fn write_config(dir: &Path) -> Result<()> {
    let config = json!({
        "title": "Sustainable Energy Analytics",
        "subtitle": "European Gas Report",
        "terminals": { "path": "LNG-Terminals.json", "sheet": "Terminals" },
        "definitions": { "path": "LNG-Terminals.json", "sheet": "Definitions" },
        "deals": { "path": "deals.parquet" },
        "imports": { "path": "imports.csv", "identifier_column": "Country" },
        "exports": { "path": "exports.csv", "identifier_column": "Country" },
        "about_markdown": "about.md",
    });
    std::fs::write(dir.join("dashboard.json"), serde_json::to_string_pretty(&config)?)?;
    std::fs::write(
        dir.join("about.md"),
        "Sustainable Energy Analytics covers LNG terminals, long-term supply deals \
         and European gas trade.\n\nThis folder holds generated sample data.\n",
    )?;
    Ok(())
}

fn main() -> Result<()> {
    let dir: PathBuf = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_data"));
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut rng = SimpleRng::new(42);
    write_workbook(&dir)?;
    write_deals(&dir)?;
    write_trend(&dir, "imports.csv", IMPORT_COUNTRIES, &mut rng)?;
    write_trend(&dir, "exports.csv", EXPORT_COUNTRIES, &mut rng)?;
    write_config(&dir)?;

    println!("Sample dashboard data ready in {}", dir.display());
    Ok(())
}
