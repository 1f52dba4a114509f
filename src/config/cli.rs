use crate::config::ConfigOverrides;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "qsl-labels")]
#[command(about = "Process QSOs to data that can be printed onto QSL labels")]
pub struct CliConfig {
    /// File name of the .adif file with the QSOs to be processed
    #[arg(short = 'i', long = "input-adif")]
    pub input_adif: Option<String>,

    /// File name of the output .csv file for the label software
    #[arg(short, long)]
    pub output: Option<String>,

    /// Maximum number of QSOs per label (1 to 6)
    #[arg(short, long = "qsos-per-label", allow_negative_numbers = true)]
    pub qsos_per_label: Option<i64>,

    /// Only create labels for QSLs sent via a QSL manager
    #[arg(short = 'm', long, conflicts_with = "direct")]
    pub via_manager: bool,

    /// Only create labels for direct QSLs, even if the config file says otherwise
    #[arg(long)]
    pub direct: bool,

    /// ADIF tag holding the QSL manager callsign
    #[arg(long)]
    pub manager_field: Option<String>,

    /// TOML config file with defaults for the options above
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Log as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Parse and group the log, print a summary, write nothing
    #[arg(long)]
    pub dry_run: bool,
}

impl CliConfig {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            input_path: self.input_adif.clone(),
            output_path: self.output.clone(),
            qsos_per_label: self.qsos_per_label,
            via_manager: match (self.via_manager, self.direct) {
                (true, _) => Some(true),
                (false, true) => Some(false),
                (false, false) => None,
            },
            manager_field: self.manager_field.clone(),
        }
    }
}
