use crate::domain::model::{Baseline, SourceUnit};
use crate::domain::ports::Storage;
use crate::utils::error::{CodemodError, Result};

pub fn backup_path(path: &str, suffix: &str) -> String {
    format!("{}{}", path, suffix)
}

/// Picks the text a run starts from: the backup when one exists, otherwise
/// the live file. The live file must exist either way.
pub async fn load_baseline<S: Storage>(
    storage: &S,
    path: &str,
    backup_suffix: &str,
) -> Result<SourceUnit> {
    if !storage.is_file(path).await {
        return Err(CodemodError::NotFound {
            path: path.to_string(),
        });
    }

    let backup = backup_path(path, backup_suffix);
    let (text, baseline) = if storage.is_file(&backup).await {
        tracing::debug!("Restoring baseline from backup {}", backup);
        (storage.read_to_string(&backup).await?, Baseline::Backup)
    } else {
        (storage.read_to_string(path).await?, Baseline::Live)
    };

    Ok(SourceUnit {
        path: path.to_string(),
        text,
        baseline,
    })
}
