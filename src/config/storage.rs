use crate::core::Storage;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// Route files on the local filesystem, addressed relative to a root.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }
}

impl Storage for LocalStorage {
    async fn is_file(&self, path: &str) -> bool {
        tokio::fs::metadata(self.full_path(path))
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }

    async fn read_to_string(&self, path: &str) -> Result<String> {
        let contents = tokio::fs::read_to_string(self.full_path(path)).await?;
        Ok(contents)
    }

    async fn write_string(&self, path: &str, contents: &str) -> Result<()> {
        tokio::fs::write(self.full_path(path), contents).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_round_trip_under_root() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("api/[id]")).unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        assert!(!storage.is_file("api/[id]/route.ts").await);
        storage
            .write_string("api/[id]/route.ts", "export {};\n")
            .await
            .unwrap();

        assert!(storage.is_file("api/[id]/route.ts").await);
        assert!(!storage.is_file("api/[id]").await);
        assert_eq!(
            storage.read_to_string("api/[id]/route.ts").await.unwrap(),
            "export {};\n"
        );
    }
}
