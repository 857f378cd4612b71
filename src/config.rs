use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::model::DatasetVariant;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "ADULTS_DASHBOARD_CONFIG";

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "adults-dashboard.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Folder holding the three dataset files.
    pub data_dir: PathBuf,
    pub baseline_file: String,
    pub with_outliers_file: String,
    pub without_outliers_file: String,
    /// Logical edge length of every chart, before fitting to the window.
    pub chart_size: f32,
    /// Optional sidebar logo.
    pub logo: Option<PathBuf>,
    /// Optional banner shown above the title.
    pub banner: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            baseline_file: "dataset_v1.csv".to_string(),
            with_outliers_file: "with_outliers_cleaned_adult_dataset.csv".to_string(),
            without_outliers_file: "cleaned_without_outlierv2.csv".to_string(),
            chart_size: 800.0,
            logo: None,
            banner: None,
        }
    }
}

impl DashboardConfig {
    /// Resolve the config: `$ADULTS_DASHBOARD_CONFIG`, then
    /// `./adults-dashboard.json`, then built-in defaults.
    pub fn load() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            let path = PathBuf::from(path);
            log::info!("Reading config from {} (${CONFIG_ENV})", path.display());
            return Self::from_file(&path);
        }

        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            log::info!("Reading config from {}", local.display());
            Self::from_file(local)
        } else {
            log::info!("No {DEFAULT_CONFIG_FILE} found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: DashboardConfig = serde_json::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    pub fn file_for(&self, variant: DatasetVariant) -> &str {
        match variant {
            DatasetVariant::Baseline => &self.baseline_file,
            DatasetVariant::WithOutliers => &self.with_outliers_file,
            DatasetVariant::WithoutOutliers => &self.without_outliers_file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(&path, r#"{ "data_dir": "/srv/adults", "chart_size": 600 }"#).unwrap();

        let cfg = DashboardConfig::from_file(&path).unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("/srv/adults"));
        assert_eq!(cfg.chart_size, 600.0);
        assert_eq!(cfg.baseline_file, "dataset_v1.csv");
        assert_eq!(cfg.logo, None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(&path, r#"{ "data_directory": "x" }"#).unwrap();

        let err = DashboardConfig::from_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("data_directory"));
    }

    #[test]
    fn file_for_maps_each_variant() {
        let cfg = DashboardConfig::default();
        assert_eq!(cfg.file_for(DatasetVariant::Baseline), "dataset_v1.csv");
        assert_eq!(
            cfg.file_for(DatasetVariant::WithoutOutliers),
            "cleaned_without_outlierv2.csv"
        );
    }
}
