use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::loader::{SheetSelector, SourceSpec};
use crate::data::schema::DEFAULT_TREND_IDENTIFIER;

/// File name looked up inside a data directory when no config is given.
pub const CONFIG_FILE_NAME: &str = "dashboard.json";

/// Workbook the default layout reads terminals and definitions from.
pub const DEFAULT_WORKBOOK: &str = "LNG-Terminals.json";

/// An import or export trend sheet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrendSource {
    #[serde(flatten)]
    pub source: SourceSpec,
    #[serde(default = "default_identifier")]
    pub identifier_column: String,
}

fn default_identifier() -> String {
    DEFAULT_TREND_IDENTIFIER.to_string()
}

/// Which sources the dashboard shows and how it is branded.
///
/// Every field is optional in the file; missing ones take the defaults
/// below (terminals on the first sheet and definitions on the second sheet
/// of [`DEFAULT_WORKBOOK`]).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    pub subtitle: String,
    pub terminals: SourceSpec,
    pub definitions: Option<SourceSpec>,
    pub deals: Option<SourceSpec>,
    pub imports: Option<TrendSource>,
    pub exports: Option<TrendSource>,
    /// Markdown shown verbatim on the About tab.
    pub about_markdown: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Sustainable Energy Analytics".to_string(),
            subtitle: "European Gas Report".to_string(),
            terminals: SourceSpec::new(DEFAULT_WORKBOOK, SheetSelector::Index(0)),
            definitions: Some(SourceSpec::new(DEFAULT_WORKBOOK, SheetSelector::Index(1))),
            deals: None,
            imports: None,
            exports: None,
            about_markdown: None,
        }
    }
}

impl DashboardConfig {
    /// Read a config file; relative source paths resolve against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(config.resolved(base))
    }

    /// Pick the config for a run.
    ///
    /// An explicit `config` path wins. Otherwise `data_dir` (or the current
    /// directory) is searched for [`CONFIG_FILE_NAME`], falling back to the
    /// default layout rooted there.
    pub fn discover(config: Option<&Path>, data_dir: Option<&Path>) -> Result<Self> {
        if let Some(path) = config {
            return Self::load(path);
        }
        let base = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => std::env::current_dir().context("resolving current directory")?,
        };
        let candidate = base.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            log::info!("Using config {}", candidate.display());
            return Self::load(&candidate);
        }
        log::info!("No {CONFIG_FILE_NAME} in {}, using defaults", base.display());
        Ok(Self::default().resolved(&base))
    }

    /// Resolve every relative path against `base`.
    pub fn resolved(mut self, base: &Path) -> Self {
        self.terminals = self.terminals.resolved(base);
        self.definitions = self.definitions.map(|s| s.resolved(base));
        self.deals = self.deals.map(|s| s.resolved(base));
        for trend in [&mut self.imports, &mut self.exports].into_iter().flatten() {
            trend.source = trend.source.resolved(base);
        }
        self.about_markdown = self.about_markdown.map(|p| {
            if p.is_absolute() {
                p
            } else {
                base.join(p)
            }
        });
        self
    }
}
