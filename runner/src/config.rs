use crate::{
    registry::{RegistryError, Vendor},
    runner::RunnerError,
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs::File, path::Path};
use thiserror::Error;
use tracing::error;

/// placeholder name -> literal value, fed into template resolution
pub type Params = BTreeMap<String, String>;

#[derive(Error, Debug)]
pub enum ConfigErrors {
    #[error("Failed to read config file")]
    ReadFailed(#[from] std::io::Error),
    #[error("Failed to parse config file")]
    ParseFailed(#[from] serde_yaml::Error),
    #[error("Config failed preflight checks")]
    FailedPreflight,
    #[error(transparent)]
    UnknownVendor(#[from] RegistryError),
    #[error("Benchmark run failed")]
    RunFailed(#[from] RunnerError),
}

#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct BenchConfig {
    #[serde(alias = "database")]
    pub db: DbConfig,
    pub tablespace: TablespaceConfig,
    pub script: ScriptConfig,
    // execution behavior, absent section means lenient defaults
    #[serde(default)]
    pub executor: ExecutorConfig,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct DbConfig {
    // vendor selector, see Vendor::from_str for accepted names
    pub dbtype: String,
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct TablespaceConfig {
    pub name: String,
    pub path: String,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct ScriptConfig {
    // directory holding schema.sql, indexes.sql, analyze.sql, qtype*.sql and
    // the per-table data/control files
    pub path: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct ExecutorConfig {
    // abort on the first failed command instead of running every phase
    #[serde(default)]
    pub strict: bool,
}

impl BenchConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigErrors> {
        let file = File::open(path)?;
        Ok(serde_yaml::from_reader(file)?)
    }

    pub fn vendor(&self) -> Result<Vendor, RegistryError> {
        self.db.dbtype.parse()
    }

    /// flatten the config sections into the placeholder map the templates use
    pub fn params(&self) -> Params {
        Params::from([
            ("dbname".to_string(), self.db.name.clone()),
            ("dbuser".to_string(), self.db.username.clone()),
            ("dbpassword".to_string(), self.db.password.clone()),
            ("ts_name".to_string(), self.tablespace.name.clone()),
            ("ts_path".to_string(), self.tablespace.path.clone()),
            ("script_path".to_string(), self.script.path.clone()),
        ])
    }

    pub fn preflight_checks(&self) -> bool {
        // attempt to catch all errors instead of piece-by-piece to make debugging easier for users
        let mut contains_error = false;

        let vendor = match self.db.dbtype.parse::<Vendor>() {
            Ok(vendor) => Some(vendor),
            Err(error) => {
                error!("db.dbtype: {error}");
                contains_error = true;
                None
            }
        };

        if self.db.name.is_empty() {
            error!("db.name cannot be empty, every command template references it");
            contains_error = true;
        }

        if self.tablespace.name.is_empty() || self.tablespace.path.is_empty() {
            error!("tablespace.name and tablespace.path must both be set");
            contains_error = true;
        }

        if self.script.path.is_empty() {
            error!("script.path cannot be empty, schema and query scripts are loaded from it");
            contains_error = true;
        }

        if vendor == Some(Vendor::Oracle)
            && (self.db.username.is_empty() || self.db.password.is_empty())
        {
            error!("db.username and db.password are required for Oracle, sqlplus and sqlldr log in with them");
            contains_error = true;
        }

        contains_error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "\
db:
  dbtype: postgresql
  name: bench
  username: bench
  password: secret
tablespace:
  name: benchts
  path: /data/ts
script:
  path: /scripts
";

    #[test]
    fn config_flattens_into_params() {
        let config: BenchConfig = serde_yaml::from_str(EXAMPLE).unwrap();

        assert_eq!(config.vendor(), Ok(Vendor::Postgres));
        assert!(!config.executor.strict);

        let params = config.params();
        assert_eq!(params.get("dbname").map(String::as_str), Some("bench"));
        assert_eq!(params.get("ts_name").map(String::as_str), Some("benchts"));
        assert_eq!(params.get("ts_path").map(String::as_str), Some("/data/ts"));
        assert_eq!(
            params.get("script_path").map(String::as_str),
            Some("/scripts")
        );
    }

    #[test]
    fn preflight_flags_unknown_vendor_and_empty_paths() {
        let mut config: BenchConfig = serde_yaml::from_str(EXAMPLE).unwrap();
        assert!(!config.preflight_checks());

        config.db.dbtype = "Sybase".to_string();
        config.script.path = String::new();
        assert!(config.preflight_checks());
    }

    #[test]
    fn unknown_sections_are_rejected() {
        let input = format!("{EXAMPLE}bogus:\n  key: value\n");
        assert!(serde_yaml::from_str::<BenchConfig>(&input).is_err());
    }
}
