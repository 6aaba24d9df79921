use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::info;

/// Custom error type for config loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config error: {source}")]
    Config {
        #[from]
        source: config::ConfigError,
    },
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// This function implements a layered configuration strategy:
/// 1. **Base File**: Loads settings from a file (e.g., `server.toml`). If no path is provided, it defaults to `"server"`.
/// 2. **Environment Overrides**: Overlays values from environment variables prefixed with `QDECK__`.
///    Nested structures are accessed using double underscores (e.g., `QDECK__ADMIN__ADMIN_PATH` maps to `admin.admin_path`).
///
/// # Errors
/// This function will return an error if:
/// * The specified (or default) configuration file cannot be found.
/// * The content of the file does not match the structure of type `T`.
///
/// # Example
/// ```rust
/// use qdeck_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path = path.map_or_else(|| PathBuf::from("server"), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(
            Environment::with_prefix("QDECK")
                .separator("__")
                .convert_case(config::Case::Snake),
        );

    info!("Loading config from {}", effective_path.display());

    let config = builder.build()?.try_deserialize::<T>()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qdeck_domain::config::ApiConfig;
    use std::io::Write;

    #[test]
    fn loads_layered_config_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file_path = dir.path().join("server.toml");
        let mut file = std::fs::File::create(&file_path).expect("config file");
        writeln!(
            file,
            "[server]\nport = 9000\n\n[admin]\nsite_title = \"File Console\"\nadmin_path = \"/ops\"\n"
        )
        .expect("write config");

        let stem = dir.path().join("server");
        let cfg: ApiConfig = load_config(Some(&stem)).expect("config should load");
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.admin.site_title, "File Console");
        assert_eq!(cfg.admin.admin_prefix(), "/ops");
    }

    #[test]
    fn missing_file_is_an_error() {
        let result: Result<ApiConfig, _> = load_config(Some("definitely/not/here"));
        assert!(matches!(result, Err(ConfigError::Config { .. })));
    }
}
