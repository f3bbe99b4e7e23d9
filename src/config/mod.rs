pub mod manifest;
pub mod storage;

#[cfg(feature = "cli")]
use crate::config::manifest::Manifest;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "params-codemod")]
#[command(about = "Migrate route handlers to awaited (Promise) params")]
pub struct CliConfig {
    /// Route files to migrate, relative to the root. Overrides the manifest list
    pub files: Vec<String>,

    /// Path to a TOML manifest
    #[arg(short, long)]
    pub manifest: Option<String>,

    /// Directory the file list is relative to
    #[arg(long)]
    pub root: Option<String>,

    /// Suffix of pristine backup files
    #[arg(long)]
    pub backup_suffix: Option<String>,

    /// Report what would change without writing
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit log events as JSON")]
    pub log_json: bool,

    #[arg(long, help = "Print the batch report as JSON on stdout")]
    pub report_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the manifest (if any) and applies command line overrides.
    pub fn resolve_manifest(&self) -> Result<Manifest> {
        let mut manifest = match &self.manifest {
            Some(path) => Manifest::from_file(path)?,
            None => Manifest::default(),
        };

        if !self.files.is_empty() {
            manifest.migration.files = self.files.clone();
        }
        if let Some(root) = &self.root {
            manifest.migration.root = root.clone();
        }
        if let Some(suffix) = &self.backup_suffix {
            manifest.migration.backup_suffix = suffix.clone();
        }
        manifest.dry_run = self.dry_run;

        Ok(manifest)
    }
}
