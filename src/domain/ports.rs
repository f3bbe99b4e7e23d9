use crate::domain::model::MigrationRules;
use crate::utils::error::Result;

pub trait Storage: Send + Sync {
    fn is_file(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
    fn read_to_string(&self, path: &str)
        -> impl std::future::Future<Output = Result<String>> + Send;
    fn write_string(
        &self,
        path: &str,
        contents: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn files(&self) -> &[String];
    fn backup_suffix(&self) -> &str;
    fn rules(&self) -> &MigrationRules;
    fn dry_run(&self) -> bool;
}
