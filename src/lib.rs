pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use config::{storage::LocalStorage, ConfigOverrides, LabelConfig};
pub use crate::core::{etl::EtlEngine, pipeline::LabelPipeline};
pub use domain::model::{Contact, LabelCapacity, LabelTable, LabelUnit, QslStatus};
pub use utils::error::{EtlError, Result};
