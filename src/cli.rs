use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "lng-dashboard", version, about = "LNG terminals and supply deals dashboard")]
pub struct CliArgs {
    /// Dashboard config file (JSON)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding the data files (and optionally dashboard.json)
    #[arg(long = "data-dir", value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Print a summary and exit
    #[arg(long)]
    pub headless: bool,

    /// Print the headless summary as JSON
    #[arg(long, requires = "headless")]
    pub json: bool,

    /// Only count terminals with this facility type
    #[arg(long, value_name = "TYPE")]
    pub facility: Option<String>,

    /// Only count terminals with this status
    #[arg(long, value_name = "STATUS")]
    pub status: Option<String>,

    /// Only count terminals with this owner
    #[arg(long, value_name = "OWNER")]
    pub owner: Option<String>,
}
