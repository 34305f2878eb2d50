pub mod init;
mod schema;

pub use schema::{Config, Representative};

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/triangle-pipeline/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("triangle-pipeline"))
}

/// Get the default config file path (~/.config/triangle-pipeline/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   and falls back to stock settings when that file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        tracing::debug!(path = %config_path.display(), "no config file, using stock settings");
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!(
            "Failed to parse config: invalid YAML in {}",
            config_path.display()
        )
    })?;

    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
}

/// Write configuration as YAML atomically, creating parent directories
pub fn write_config(path: &Path, config: &Config) -> Result<()> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_explicit_missing_file_is_error() {
        let path = env::temp_dir().join("triangle_pipeline_test_missing_config.yaml");
        let _ = fs::remove_file(&path);
        let err = load_config(Some(path)).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_write_and_load_roundtrip() {
        let path = env::temp_dir()
            .join("triangle_pipeline_test_config")
            .join("config.yaml");
        let _ = fs::remove_file(&path);

        let mut sales = crate::scoring::SalesConfig::default();
        sales.priority_factors.recent_activity_days = 14;
        let config = Config {
            representative: Some(Representative {
                name: "Jordan".to_string(),
                email: Some("jordan@example.com".to_string()),
                territory: Some("Mexico".to_string()),
            }),
            sales: Some(sales),
            leads: Some(PathBuf::from("/tmp/leads.json")),
        };

        write_config(&path, &config).unwrap();
        let loaded = load_config(Some(path.clone())).unwrap();
        assert_eq!(loaded, config);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_partial_config() {
        let path = env::temp_dir().join("triangle_pipeline_test_partial.yaml");
        fs::write(
            &path,
            "representative:\n  name: Jordan\nsales:\n  priority_factors:\n    workflow_threshold: 5\n",
        )
        .unwrap();

        let config = load_config(Some(path.clone())).unwrap();
        assert_eq!(config.effective_representative().name, "Jordan");
        let sales = config.effective_sales();
        assert_eq!(sales.priority_factors.workflow_threshold, 5);
        assert_eq!(sales.priority_factors.recent_activity_days, 7);
        assert!(config.leads.is_none());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_yaml() {
        let path = env::temp_dir().join("triangle_pipeline_test_invalid.yaml");
        fs::write(&path, "sales:\n  bogus_section: 1\n").unwrap();
        let err = load_config(Some(path.clone())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::default();
        assert_eq!(config.effective_sales(), crate::scoring::SalesConfig::default());
        assert_eq!(config.effective_representative().name, "Sales Representative");
    }
}
