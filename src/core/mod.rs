pub mod classify;
pub mod injector;
pub mod loader;
pub mod migrator;
pub mod references;
pub mod signature;
pub mod transform;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::domain::model::{MigrationRules, TransformOutput, TransformStats};
pub use crate::domain::ports::{ConfigProvider, Storage};
pub use crate::utils::error::Result;
