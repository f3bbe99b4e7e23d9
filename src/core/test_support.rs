use crate::domain::model::MigrationRules;
use crate::domain::ports::{ConfigProvider, Storage};
use crate::utils::error::{CodemodError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone, Default)]
pub struct MemoryStorage {
    files: Arc<Mutex<HashMap<String, String>>>,
    writes: Arc<Mutex<Vec<String>>>,
}

impl MemoryStorage {
    pub async fn with_files(files: &[(&str, &str)]) -> Self {
        let storage = Self::default();
        {
            let mut map = storage.files.lock().await;
            for (path, contents) in files {
                map.insert(path.to_string(), contents.to_string());
            }
        }
        storage
    }

    pub async fn get_file(&self, path: &str) -> Option<String> {
        self.files.lock().await.get(path).cloned()
    }

    pub async fn writes(&self) -> Vec<String> {
        self.writes.lock().await.clone()
    }
}

impl Storage for MemoryStorage {
    async fn is_file(&self, path: &str) -> bool {
        self.files.lock().await.contains_key(path)
    }

    async fn read_to_string(&self, path: &str) -> Result<String> {
        let files = self.files.lock().await;
        files.get(path).cloned().ok_or_else(|| {
            CodemodError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("File not found: {}", path),
            ))
        })
    }

    async fn write_string(&self, path: &str, contents: &str) -> Result<()> {
        self.files
            .lock()
            .await
            .insert(path.to_string(), contents.to_string());
        self.writes.lock().await.push(path.to_string());
        Ok(())
    }
}

pub struct MockConfig {
    pub files: Vec<String>,
    pub backup_suffix: String,
    pub rules: MigrationRules,
    pub dry_run: bool,
}

impl MockConfig {
    pub fn new(files: &[&str]) -> Self {
        Self {
            files: files.iter().map(|f| f.to_string()).collect(),
            backup_suffix: ".bak".to_string(),
            rules: MigrationRules::default(),
            dry_run: false,
        }
    }
}

impl ConfigProvider for MockConfig {
    fn files(&self) -> &[String] {
        &self.files
    }

    fn backup_suffix(&self) -> &str {
        &self.backup_suffix
    }

    fn rules(&self) -> &MigrationRules {
        &self.rules
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }
}
