use anyhow::Context;
use anyhow::Result;
use lessoncraft_catalog_client::ClientConfig;
use lessoncraft_catalog_filter::FilterConfig;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Contents of the `--config` TOML file.
///
/// ```toml
/// [catalog]
/// base_url = "https://lessons.example.org/api"
/// timeout_secs = 10
///
/// [filter]
/// debounce_ms = 250
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub catalog: ClientConfig,
    pub filter: FilterConfig,
}

impl CliConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: CliConfig = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.filter.validate()?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write as _;

    #[test]
    fn missing_path_gives_defaults() {
        assert_eq!(CliConfig::load(None).unwrap(), CliConfig::default());
    }

    #[test]
    fn partial_tables_fill_in_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[catalog]\nbase_url = \"https://lessons.example.org/api\"\n\n[filter]\ndebounce_ms = 250"
        )
        .unwrap();

        let config = CliConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.catalog.base_url, "https://lessons.example.org/api");
        assert_eq!(config.catalog.timeout_secs, 30);
        assert_eq!(config.filter.debounce_ms, 250);
        assert_eq!(config.filter.duration_slider_max, 60);
    }

    #[test]
    fn invalid_filter_values_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[filter]\ndebounce_ms = 0").unwrap();
        let err = CliConfig::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("debounce_ms must be > 0"), "{err}");
    }
}
