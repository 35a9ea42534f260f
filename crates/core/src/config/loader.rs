//! Page configuration file loader.
//!
//! A page configuration is a single TOML file, or a YAML file when the file
//! extension is `.yaml` or `.yml`.

use crate::config::error::ConfigError;
use crate::config::error::ConfigResult;
use crate::config::models::PageConfig;
use std::path::Path;

/// Loads a page configuration from `path`.
///
/// The file is only parsed here; call [`PageConfig::validate`] before
/// polling, so that a page without endpoints can still be loaded and shown.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - The file cannot be read
/// - The file has invalid TOML or YAML syntax
/// - A field has the wrong type
///
/// # Example
///
/// ```rust,no_run
/// use pw_core::config::loader::load_page_config;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_page_config(Path::new("page.toml"))?;
/// println!("Tracking {} explicit processes", config.processes.len());
/// # Ok(())
/// # }
/// ```
pub fn load_page_config(path: &Path) -> ConfigResult<PageConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let ext = path.extension().and_then(|s| s.to_str());
    if ext == Some("yaml") || ext == Some("yml") {
        return serde_yaml::from_str(&content).map_err(|source| ConfigError::YamlParse {
            path: path.to_path_buf(),
            source,
        });
    }

    toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source,
    })
}
