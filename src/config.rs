// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{MigrationError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_OLD_DOMAIN: &str = "gumption.typepad.com";
pub const DEFAULT_NEW_DOMAIN: &str = "interrelativity.com";
pub const DEFAULT_BASENAME_MAPPINGS_FILE: &str = "basename_mappings.txt";
pub const DEFAULT_URL_REPLACEMENTS_FILE: &str = "url_replacements.txt";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub migration: MigrationConfig,
    #[serde(default)]
    pub markers: MarkerConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MigrationConfig {
    pub old_domain: String,
    pub new_domain: String,
    /// Path segment between the old domain and the date, e.g. `blog`.
    #[serde(default)]
    pub old_path_prefix: String,
    #[serde(default = "default_true")]
    pub rewrite_basename_lines: bool,
}

/// Line prefixes identifying the marker lines of the export format.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarkerConfig {
    pub title: String,
    pub basename: String,
    pub protected: String,
    pub date: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub basename_mappings_file: PathBuf,
    pub url_replacements_file: PathBuf,
    #[serde(default)]
    pub report_file: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            title: "TITLE:".to_string(),
            basename: "BASENAME:".to_string(),
            protected: "UNIQUE URL:".to_string(),
            date: "DATE:".to_string(),
        }
    }
}

impl MigrationConfig {
    /// The configured path prefix without surrounding slashes.
    pub fn path_prefix(&self) -> &str {
        self.old_path_prefix.trim_matches('/')
    }

    /// `<old-domain>` or `<old-domain>/<prefix>`, the fixed part of every old post URL.
    /// The host is lowercased.
    pub fn old_url_root(&self) -> String {
        let domain = self.old_domain.to_ascii_lowercase();
        match self.path_prefix() {
            "" => domain,
            prefix => format!("{}/{}", domain, prefix),
        }
    }

    /// True when `url` is an http(s) url under `old_url_root()`. Scheme and host
    /// compare case-insensitively.
    pub fn is_under_old_root(&self, url: &str) -> bool {
        let Some((scheme, rest)) = url.trim().split_once("://") else {
            return false;
        };
        if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
            return false;
        }

        let (host, path) = rest.split_once('/').unwrap_or((rest, ""));
        if !host.eq_ignore_ascii_case(&self.old_domain) {
            return false;
        }

        match self.path_prefix() {
            "" => true,
            prefix => path
                .strip_prefix(prefix)
                .is_some_and(|tail| tail.starts_with('/')),
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("TYPEPAD_MIGRATE")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| MigrationError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| MigrationError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            migration: MigrationConfig {
                old_domain: DEFAULT_OLD_DOMAIN.to_string(),
                new_domain: DEFAULT_NEW_DOMAIN.to_string(),
                old_path_prefix: String::new(),
                rewrite_basename_lines: true,
            },
            markers: MarkerConfig::default(),
            output: OutputConfig {
                basename_mappings_file: PathBuf::from(DEFAULT_BASENAME_MAPPINGS_FILE),
                url_replacements_file: PathBuf::from(DEFAULT_URL_REPLACEMENTS_FILE),
                report_file: None,
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_domain("old_domain", &self.migration.old_domain)?;
        validate_domain("new_domain", &self.migration.new_domain)?;

        let markers = [
            ("title", &self.markers.title),
            ("basename", &self.markers.basename),
            ("protected", &self.markers.protected),
            ("date", &self.markers.date),
        ];
        for (name, prefix) in markers {
            if prefix.trim().is_empty() {
                return Err(MigrationError::Config(format!(
                    "marker prefix '{}' must not be empty",
                    name
                )));
            }
        }

        if self.output.basename_mappings_file == self.output.url_replacements_file {
            return Err(MigrationError::Config(
                "basename_mappings_file and url_replacements_file must differ".to_string(),
            ));
        }

        Ok(())
    }
}

fn validate_domain(name: &str, domain: &str) -> Result<()> {
    if domain.trim().is_empty() {
        return Err(MigrationError::Config(format!("{} must not be empty", name)));
    }

    if domain.contains("://") || domain.contains('/') || domain.chars().any(char::is_whitespace)
    {
        return Err(MigrationError::Config(format!(
            "{} must be a bare host name, got '{}'",
            name, domain
        )));
    }

    Ok(())
}
