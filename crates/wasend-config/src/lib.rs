use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use url::Url;
use wasend_core::link::{Dialing, DEFAULT_LINK_BASE};

const APP_DIR: &str = "wasend";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_SUGGESTION_LIMIT: usize = 6;
pub const MAX_SUGGESTION_LIMIT: usize = 50;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub default_country_code: Option<String>,
    pub suggestion_limit: usize,
    pub link_base: String,
    pub open: OpenConfig,
}

#[derive(Debug, Clone)]
pub struct OpenConfig {
    pub enabled: bool,
    pub command: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_country_code: None,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            link_base: DEFAULT_LINK_BASE.to_string(),
            open: OpenConfig {
                enabled: true,
                command: None,
            },
        }
    }
}

impl AppConfig {
    pub fn dialing(&self) -> Dialing {
        Dialing {
            default_country_code: self.default_country_code.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid default_country_code value: {0}")]
    InvalidCountryCode(String),
    #[error("invalid suggestion_limit value: {0}")]
    InvalidSuggestionLimit(usize),
    #[error("invalid link_base value: {0}")]
    InvalidLinkBase(String),
    #[error("invalid open.command value: {0:?}")]
    InvalidOpenCommand(String),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    default_country_code: Option<String>,
    suggestion_limit: Option<usize>,
    link_base: Option<String>,
    open: Option<OpenFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct OpenFile {
    enabled: Option<bool>,
    command: Option<String>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(code) = parsed.default_country_code {
        config.default_country_code = Some(validate_country_code(&code)?);
    }

    if let Some(limit) = parsed.suggestion_limit {
        if limit == 0 || limit > MAX_SUGGESTION_LIMIT {
            return Err(ConfigError::InvalidSuggestionLimit(limit));
        }
        config.suggestion_limit = limit;
    }

    if let Some(base) = parsed.link_base {
        config.link_base = validate_link_base(&base)?;
    }

    if let Some(open) = parsed.open {
        if let Some(enabled) = open.enabled {
            config.open.enabled = enabled;
        }
        if let Some(command) = open.command {
            let trimmed = command.trim();
            if trimmed.is_empty() {
                return Err(ConfigError::InvalidOpenCommand(command));
            }
            config.open.command = Some(trimmed.to_string());
        }
    }

    Ok(config)
}

fn validate_country_code(raw: &str) -> Result<String> {
    let code = raw.trim().trim_start_matches('+');
    let valid = (1..=3).contains(&code.len())
        && code.bytes().all(|b| b.is_ascii_digit())
        && !code.starts_with('0');
    if !valid {
        return Err(ConfigError::InvalidCountryCode(raw.to_string()));
    }
    Ok(code.to_string())
}

fn validate_link_base(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
            Ok(trimmed.to_string())
        }
        _ => Err(ConfigError::InvalidLinkBase(raw.to_string())),
    }
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{load_at_path, merge_config, ConfigError, ConfigFile, OpenFile};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn restrict_permissions(path: &Path) {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path).expect("metadata").permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms).expect("chmod");
        }
    }

    fn empty_file() -> ConfigFile {
        ConfigFile {
            default_country_code: None,
            suggestion_limit: None,
            link_base: None,
            open: None,
        }
    }

    #[test]
    fn merge_config_applies_values() {
        let parsed = ConfigFile {
            default_country_code: Some("+49".to_string()),
            suggestion_limit: Some(10),
            link_base: Some("https://api.whatsapp.com/send/".to_string()),
            open: Some(OpenFile {
                enabled: Some(false),
                command: Some(" firefox ".to_string()),
            }),
        };
        let merged = merge_config(parsed).expect("merge");
        assert_eq!(merged.default_country_code.as_deref(), Some("49"));
        assert_eq!(merged.suggestion_limit, 10);
        assert_eq!(merged.link_base, "https://api.whatsapp.com/send");
        assert!(!merged.open.enabled);
        assert_eq!(merged.open.command.as_deref(), Some("firefox"));
    }

    #[test]
    fn merge_config_rejects_bad_values() {
        let mut parsed = empty_file();
        parsed.default_country_code = Some("049".to_string());
        assert!(matches!(
            merge_config(parsed),
            Err(ConfigError::InvalidCountryCode(_))
        ));

        let mut parsed = empty_file();
        parsed.suggestion_limit = Some(0);
        assert!(matches!(
            merge_config(parsed),
            Err(ConfigError::InvalidSuggestionLimit(0))
        ));

        let mut parsed = empty_file();
        parsed.link_base = Some("mailto:someone@example.com".to_string());
        assert!(matches!(
            merge_config(parsed),
            Err(ConfigError::InvalidLinkBase(_))
        ));
    }

    #[test]
    fn load_at_path_requires_file_when_requested() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("config.toml");
        let err = load_at_path(&missing, true).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
        assert!(load_at_path(&missing, false).expect("optional").is_none());
    }

    #[test]
    fn load_at_path_parses_toml() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "default_country_code = \"44\"\nsuggestion_limit = 3\n[open]\nenabled = false\n",
        )
        .expect("write config");
        restrict_permissions(&path);

        let config = load_at_path(&path, true).expect("load").expect("config");
        assert_eq!(config.default_country_code.as_deref(), Some("44"));
        assert_eq!(config.suggestion_limit, 3);
        assert!(!config.open.enabled);
        assert_eq!(config.dialing().default_country_code.as_deref(), Some("44"));
    }

    #[test]
    fn load_at_path_rejects_unknown_keys() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "theme = \"dark\"\n").expect("write config");
        restrict_permissions(&path);

        let err = load_at_path(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
