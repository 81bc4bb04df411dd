use serde::Deserialize;
use std::path::{Path, PathBuf};
use stockroom::ListLimits;
use tracing::Level;

#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub config_path: Option<PathBuf>,
    pub file: ConfigFile,
}

impl ProjectConfig {
    /// Load `config_path`. A missing file is only an error when `required`;
    /// otherwise built-in defaults apply.
    pub fn load(config_path: &Path, required: bool) -> anyhow::Result<Self> {
        if !required && !config_path.exists() {
            return Ok(Self {
                config_path: None,
                file: ConfigFile::default(),
            });
        }

        let raw = std::fs::read_to_string(config_path).map_err(|e| {
            anyhow::anyhow!(
                "failed to read config file {}: {e}",
                config_path.display()
            )
        })?;

        let file = ConfigFile::parse(&raw).map_err(|e| {
            anyhow::anyhow!(
                "invalid config file {}: {e:#}",
                config_path.display()
            )
        })?;

        Ok(Self {
            config_path: Some(config_path.to_path_buf()),
            file,
        })
    }

    /// Database URL: `--database`, then `DATABASE_URL`, then `database.url`.
    pub fn database_url(&self, cli_override: Option<&str>) -> anyhow::Result<String> {
        if let Some(url) = cli_override.filter(|u| !u.trim().is_empty()) {
            return Ok(url.to_string());
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.trim().is_empty() {
                return Ok(url);
            }
        }
        match &self.file.database.url {
            Some(url) => Ok(url.clone()),
            None => anyhow::bail!(
                "no database url: pass --database, set DATABASE_URL, or set database.url in the config"
            ),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub inventory: InventoryConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            version: default_version(),
            database: DatabaseConfig::default(),
            inventory: InventoryConfig::default(),
            log: LogConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            pool_size: default_pool_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InventoryConfig {
    #[serde(default = "default_list_limit")]
    pub default_limit: i64,
    #[serde(default = "default_max_limit")]
    pub max_limit: i64,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            default_limit: default_list_limit(),
            max_limit: default_max_limit(),
        }
    }
}

impl InventoryConfig {
    pub fn limits(&self) -> ListLimits {
        ListLimits {
            default: self.default_limit,
            max: self.max_limit,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// `tracing-subscriber` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Level of the per-statement SQL events.
    #[serde(default = "default_sql_level")]
    pub sql_level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            sql_level: default_sql_level(),
        }
    }
}

impl LogConfig {
    pub fn sql_level(&self) -> anyhow::Result<Level> {
        self.sql_level
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid log.sql_level: {}", self.sql_level))
    }
}

fn default_version() -> String {
    "1".to_string()
}

fn default_pool_size() -> usize {
    stockroom::pool::DEFAULT_POOL_SIZE
}

fn default_list_limit() -> i64 {
    ListLimits::default().default
}

fn default_max_limit() -> i64 {
    ListLimits::default().max
}

fn default_log_filter() -> String {
    "stockroom=info".to_string()
}

fn default_sql_level() -> String {
    "debug".to_string()
}

impl ConfigFile {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let mut file: ConfigFile = toml::from_str(raw)?;
        file.expand_env()?;
        file.validate()?;
        Ok(file)
    }

    fn expand_env(&mut self) -> anyhow::Result<()> {
        if let Some(url) = self.database.url.as_mut() {
            *url = expand_env_vars(url)?;
        }
        self.log.filter = expand_env_vars(&self.log.filter)?;
        self.log.sql_level = expand_env_vars(&self.log.sql_level)?;
        Ok(())
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.version.trim() != "1" {
            anyhow::bail!("unsupported config version: {}", self.version);
        }
        if let Some(url) = &self.database.url {
            if url.trim().is_empty() {
                anyhow::bail!("database.url must not be empty when set");
            }
        }
        if self.database.pool_size == 0 {
            anyhow::bail!("database.pool_size must be at least 1");
        }
        let inv = &self.inventory;
        if inv.default_limit < 1 || inv.max_limit < 1 {
            anyhow::bail!("inventory limits must be positive");
        }
        if inv.default_limit > inv.max_limit {
            anyhow::bail!(
                "inventory.default_limit ({}) exceeds inventory.max_limit ({})",
                inv.default_limit,
                inv.max_limit
            );
        }
        self.log.sql_level()?;
        Ok(())
    }
}

fn expand_env_vars(input: &str) -> anyhow::Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            anyhow::bail!("unterminated env var reference: ${{{after}");
        };
        let key = &after[..end];
        if key.is_empty() {
            anyhow::bail!("invalid env var reference: ${{}}");
        }
        let v = std::env::var(key)
            .map_err(|_| anyhow::anyhow!("missing env var for config expansion: {key}"))?;
        out.push_str(&v);
        rest = &after[end + 1..];
    }
    out.push_str(rest);

    Ok(out)
}
