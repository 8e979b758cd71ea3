use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::error::{Result, ScraperError};

/// Runtime configuration. Every field has a default, so `config.toml` is
/// optional and may override any subset of sections.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub output: OutputConfig,
    pub world_gross: WorldGrossConfig,
    pub indian_films: IndianFilmsConfig,
    pub mojo: MojoConfig,
    pub audit: AuditConfig,
    pub chart: ChartConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub accept_language: String,
    pub timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: constants::DEFAULT_USER_AGENT.to_string(),
            accept_language: constants::DEFAULT_ACCEPT_LANGUAGE.to_string(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory CSV and SVG files are written to
    pub dir: String,
    pub log_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: ".".to_string(),
            log_dir: "logs".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorldGrossConfig {
    pub url: String,
    pub limit: usize,
    pub output_file: String,
}

impl Default for WorldGrossConfig {
    fn default() -> Self {
        Self {
            url: constants::WORLD_GROSS_URL.to_string(),
            limit: 50,
            output_file: constants::WORLD_GROSS_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndianFilmsConfig {
    pub url: String,
    pub limit: usize,
    pub output_file: String,
}

impl Default for IndianFilmsConfig {
    fn default() -> Self {
        Self {
            url: constants::INDIAN_FILMS_URL.to_string(),
            limit: 50,
            output_file: constants::INDIAN_FILMS_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MojoConfig {
    pub url: String,
    pub single_page_limit: usize,
    pub multi_page_limit: usize,
    /// Pause between page requests in multi-page mode
    pub page_delay_ms: u64,
    pub single_page_file: String,
    pub multi_page_file: String,
}

impl Default for MojoConfig {
    fn default() -> Self {
        Self {
            url: constants::MOJO_URL.to_string(),
            single_page_limit: 100,
            multi_page_limit: 500,
            page_delay_ms: 2000,
            single_page_file: constants::MOJO_TOP_100_FILE.to_string(),
            multi_page_file: constants::MOJO_TOP_500_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub min_year: i32,
    pub max_year: i32,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            min_year: 1900,
            max_year: 2030,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub top: usize,
    pub output_file: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            top: 10,
            output_file: constants::CHART_FILE.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, falling back to defaults when the file
    /// does not exist.
    /// Load `path`, falling back to defaults when it does not exist. Nothing
    /// is logged here since logging is configured from the result.
    pub fn load(path: &Path) -> Result<(Self, ConfigSource)> {
        if !path.exists() {
            return Ok((Self::default(), ConfigSource::Defaults));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            ScraperError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config = Self::from_toml(&content)?;
        Ok((config, ConfigSource::File(path.to_path_buf())))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.audit.min_year > self.audit.max_year {
            return Err(ScraperError::Config(format!(
                "audit.min_year ({}) is greater than audit.max_year ({})",
                self.audit.min_year, self.audit.max_year
            )));
        }
        if self.mojo.single_page_limit == 0 || self.mojo.multi_page_limit == 0 {
            return Err(ScraperError::Config(
                "mojo page limits must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve a file name against the configured output directory.
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        Path::new(&self.output.dir).join(file_name)
    }
}

/// Where a loaded [`Config`] came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_match_original_scripts() {
        let config = Config::default();
        assert_eq!(config.world_gross.limit, 50);
        assert_eq!(config.indian_films.limit, 50);
        assert_eq!(config.mojo.single_page_limit, 100);
        assert_eq!(config.mojo.multi_page_limit, 500);
        assert_eq!(config.mojo.page_delay_ms, 2000);
        assert_eq!(config.audit.min_year, 1900);
        assert_eq!(config.audit.max_year, 2030);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = Config::from_toml(
            r#"
            [world_gross]
            limit = 10

            [http]
            user_agent = "test-agent"
            "#,
        )
        .unwrap();
        assert_eq!(config.world_gross.limit, 10);
        assert_eq!(config.world_gross.output_file, "top_50_worldwide_films.csv");
        assert_eq!(config.http.user_agent, "test-agent");
        assert_eq!(config.http.accept_language, "en-US,en;q=0.9");
    }

    #[test]
    fn test_invalid_year_range_is_rejected() {
        let err = Config::from_toml("[audit]\nmin_year = 2040\nmax_year = 2030\n").unwrap_err();
        assert!(matches!(err, ScraperError::Config(_)));
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        let err = Config::from_toml("[world_gross\nlimit = ").unwrap_err();
        assert!(matches!(err, ScraperError::Toml(_)));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let (config, source) = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.chart.top, 10);
        assert_eq!(source, ConfigSource::Defaults);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[output]\ndir = \"out\"\n").unwrap();
        let (config, source) = Config::load(&path).unwrap();
        assert_eq!(config.output_path("a.csv"), Path::new("out").join("a.csv"));
        assert_eq!(source, ConfigSource::File(path));
    }
}
