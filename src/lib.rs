pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{manifest::Manifest, storage::LocalStorage};

pub use core::{migrator::Migrator, transform::Transformer};
pub use domain::model::{BatchReport, FileOutcome, FileStatus, MigrationRules};
pub use utils::error::{CodemodError, Result};
