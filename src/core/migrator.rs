use crate::core::loader::load_baseline;
use crate::core::transform::Transformer;
use crate::domain::model::{BatchReport, FileOutcome, FileStatus};
use crate::domain::ports::{ConfigProvider, Storage};
use crate::utils::error::Result;

/// Runs the migration over every configured file, one after the other.
/// A failing file never stops the batch.
pub struct Migrator<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    transformer: Transformer,
}

impl<S: Storage, C: ConfigProvider> Migrator<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let transformer = Transformer::new(config.rules())?;
        Ok(Self {
            storage,
            config,
            transformer,
        })
    }

    pub async fn run(&self) -> BatchReport {
        let files = self.config.files();
        tracing::info!("Migrating {} route files", files.len());

        let mut report = BatchReport {
            dry_run: self.config.dry_run(),
            outcomes: Vec::with_capacity(files.len()),
        };
        for path in files {
            report.outcomes.push(self.process_file(path).await);
        }

        tracing::info!("{}", report.summary());
        report
    }

    pub async fn process_file(&self, path: &str) -> FileOutcome {
        match self.try_process_file(path).await {
            Ok(outcome) => outcome,
            Err(e) if e.is_not_found() => {
                tracing::info!("Skip (not found): {}", path);
                FileOutcome::skipped_not_found(path)
            }
            Err(e) => {
                tracing::error!("Failed: {}: {}", path, e);
                FileOutcome::failed(path, e.to_string())
            }
        }
    }

    async fn try_process_file(&self, path: &str) -> Result<FileOutcome> {
        let unit = load_baseline(&self.storage, path, self.config.backup_suffix()).await?;
        let output = self.transformer.transform(&unit.text);

        if !output.stats.unanchored.is_empty() {
            tracing::warn!(
                "{}: handlers at lines {:?} need a manual resolution statement",
                path,
                output.stats.unanchored
            );
        }

        let status = if output.text == unit.text {
            tracing::info!("No changes needed: {}", path);
            FileStatus::SkippedNoChange
        } else if self.config.dry_run() {
            tracing::info!("Would fix: {}", path);
            FileStatus::WouldFix
        } else {
            self.storage.write_string(path, &output.text).await?;
            tracing::info!("Fixed: {}", path);
            FileStatus::Fixed
        };

        Ok(FileOutcome {
            path: path.to_string(),
            status,
            baseline: Some(unit.baseline),
            stats: Some(output.stats),
        })
    }
}
