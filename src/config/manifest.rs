use crate::core::ConfigProvider;
use crate::domain::model::MigrationRules;
use crate::utils::error::{CodemodError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mts", "mjs"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub migration: MigrationSection,
    #[serde(default)]
    pub rules: MigrationRules,
    #[serde(skip)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationSection {
    pub root: String,
    pub backup_suffix: String,
    pub files: Vec<String>,
}

impl Default for MigrationSection {
    fn default() -> Self {
        Self {
            root: ".".to_string(),
            backup_suffix: ".bak".to_string(),
            files: Vec::new(),
        }
    }
}

impl Manifest {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(&path).map_err(|e| CodemodError::ConfigError {
                message: format!("cannot read manifest {}: {}", path.as_ref().display(), e),
            })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CodemodError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ROUTES_ROOT})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}")?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn root(&self) -> &str {
        &self.migration.root
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("migration.root", &self.migration.root)?;
        validation::validate_non_empty_string(
            "migration.backup_suffix",
            &self.migration.backup_suffix,
        )?;
        validation::validate_non_empty_list("migration.files", &self.migration.files)?;
        for file in &self.migration.files {
            validation::validate_path("migration.files", file)?;
        }
        validation::validate_file_extensions(
            "migration.files",
            &self.migration.files,
            SOURCE_EXTENSIONS,
        )?;

        let rules = &self.rules;
        validation::validate_identifier("rules.param_name", &rules.param_name)?;
        validation::validate_identifier("rules.resolved_name", &rules.resolved_name)?;
        validation::validate_identifier("rules.wrapper", &rules.wrapper)?;
        if rules.param_name == rules.resolved_name {
            return Err(CodemodError::InvalidConfigValueError {
                field: "rules.resolved_name".to_string(),
                value: rules.resolved_name.clone(),
                reason: "Must differ from rules.param_name".to_string(),
            });
        }
        validation::validate_non_empty_list("rules.methods", &rules.methods)?;
        for method in &rules.methods {
            validation::validate_identifier("rules.methods", method)?;
        }
        for call in &rules.bootstrap_calls {
            validation::validate_identifier("rules.bootstrap_calls", call)?;
        }
        validation::validate_range("rules.signature_lookahead", rules.signature_lookahead, 1, 20)?;
        validation::validate_range("rules.scan_window", rules.scan_window, 2, 100)?;

        Ok(())
    }
}

impl ConfigProvider for Manifest {
    fn files(&self) -> &[String] {
        &self.migration.files
    }

    fn backup_suffix(&self) -> &str {
        &self.migration.backup_suffix
    }

    fn rules(&self) -> &MigrationRules {
        &self.rules
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }
}

impl Validate for Manifest {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
