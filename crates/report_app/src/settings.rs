use std::fs;
use std::path::Path;

use anyhow::Context;
use report_core::PipelineConfig;
use report_logging::report_info;

/// Load the pipeline configuration from a RON file, or the built-in defaults
/// when no file is given. Fields missing from the file keep their defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<PipelineConfig> {
    let Some(path) = path else {
        return Ok(PipelineConfig::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let config: PipelineConfig =
        ron::from_str(&content).with_context(|| format!("parsing config file {}", path.display()))?;
    report_info!("Loaded configuration from {:?}", path);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn no_file_means_defaults() {
        assert_eq!(load_config(None).unwrap(), PipelineConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("report.ron");
        fs::write(
            &path,
            r#"(
                display_cap: 4,
                sources: (report_url: "https://example.com/report"),
                keywords: (dry: ["emerger"]),
            )"#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        let defaults = PipelineConfig::default();
        assert_eq!(config.display_cap, 4);
        assert_eq!(config.sources.report_url, "https://example.com/report");
        assert_eq!(config.sources.nymphs_collection, defaults.sources.nymphs_collection);
        assert_eq!(config.keywords.dry, vec!["emerger".to_string()]);
        assert_eq!(config.keywords.streamer, defaults.keywords.streamer);
        assert_eq!(config.dictionary, defaults.dictionary);
    }

    #[test]
    fn missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(load_config(Some(&temp.path().join("absent.ron"))).is_err());
    }
}
