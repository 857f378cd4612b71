use std::path::Path;

use crate::config::DashboardConfig;
use crate::data::filter::FilterSelection;
use crate::data::loader::{load_datasets, Datasets};
use crate::data::model::Column;
use crate::report::{build_dashboard, Dashboard};

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    WithOutliers,
    WithoutOutliers,
    Summary,
}

impl Tab {
    pub const ALL: [Tab; 4] = [
        Tab::Overview,
        Tab::WithOutliers,
        Tab::WithoutOutliers,
        Tab::Summary,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::WithOutliers => "Visualization with Outliers",
            Tab::WithoutOutliers => "Visualization without Outliers",
            Tab::Summary => "Summary & Recommendations",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// The three loaded variants.
    pub datasets: Datasets,

    /// Current filter selection, shared by every tab.
    pub selection: FilterSelection,

    /// Tab content for the current selection (cached).
    pub dashboard: Dashboard,

    pub active_tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig, datasets: Datasets) -> Self {
        let selection = FilterSelection::new();
        let dashboard = build_dashboard(&datasets, &selection, config.chart_size);
        Self {
            config,
            datasets,
            selection,
            dashboard,
            active_tab: Tab::Overview,
            status_message: None,
        }
    }

    /// Rerun the pipeline after a selection change.
    pub fn refilter(&mut self) {
        self.dashboard = build_dashboard(&self.datasets, &self.selection, self.config.chart_size);
    }

    /// Values offered by a filter widget (taken from the baseline file).
    pub fn filter_options(&self, column: Column) -> &[String] {
        self.datasets.baseline.options(column)
    }

    /// Toggle a single value in a column's filter.
    pub fn toggle_filter_value(&mut self, column: Column, value: &str) {
        self.selection.toggle(column, value);
        self.refilter();
    }

    /// Tick every offered value of a column.
    pub fn select_all(&mut self, column: Column) {
        let options = self.filter_options(column).to_vec();
        self.selection = std::mem::take(&mut self.selection).with_values(column, options);
        self.refilter();
    }

    /// Remove any restriction on a column.
    pub fn clear_filter(&mut self, column: Column) {
        self.selection.clear(column);
        self.refilter();
    }

    pub fn clear_all_filters(&mut self) {
        self.selection.clear_all();
        self.refilter();
    }

    /// Swap in freshly loaded datasets, keeping the current selection.
    pub fn set_datasets(&mut self, datasets: Datasets) {
        self.datasets = datasets;
        self.status_message = None;
        self.refilter();
    }

    /// Reload every variant from `dir`. On failure the old data stays.
    pub fn reload_from(&mut self, dir: &Path) {
        match load_datasets(&self.config, dir) {
            Ok(datasets) => {
                self.config.data_dir = dir.to_path_buf();
                self.set_datasets(datasets);
            }
            Err(e) => {
                log::error!("Failed to load data folder: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::record;
    use crate::data::model::{Dataset, DatasetVariant, Income};

    fn state() -> AppState {
        let rows = vec![
            record("Male", "White", "United-States", Income::High),
            record("Female", "Black", "Jamaica", Income::Low),
            record("Female", "White", "Mexico", Income::High),
        ];
        let ds = Dataset::from_records(rows, vec!["sex".to_string()]);
        AppState::new(
            DashboardConfig::default(),
            Datasets {
                baseline: ds.clone(),
                with_outliers: ds.clone(),
                without_outliers: ds,
            },
        )
    }

    fn baseline_rows(state: &AppState) -> usize {
        state.dashboard.row_counts[0].1
    }

    #[test]
    fn toggling_a_value_reruns_the_pipeline() {
        let mut s = state();
        assert_eq!(baseline_rows(&s), 3);

        s.toggle_filter_value(Column::Sex, "Female");
        assert_eq!(baseline_rows(&s), 2);

        s.toggle_filter_value(Column::NativeCountry, "Mexico");
        assert_eq!(baseline_rows(&s), 1);

        s.clear_filter(Column::NativeCountry);
        assert_eq!(baseline_rows(&s), 2);

        s.clear_all_filters();
        assert_eq!(baseline_rows(&s), 3);
        assert_eq!(s.dashboard.row_counts[2].0, DatasetVariant::WithoutOutliers);
    }

    #[test]
    fn select_all_ticks_every_option_without_dropping_rows() {
        let mut s = state();
        s.toggle_filter_value(Column::Sex, "Female");
        s.select_all(Column::Race);
        assert!(s.selection.is_selected(Column::Race, "Black"));
        assert!(s.selection.is_selected(Column::Sex, "Female"));
        assert_eq!(baseline_rows(&s), 2);
    }

    #[test]
    fn failed_reload_keeps_old_data() {
        let mut s = state();
        let dir = tempfile::tempdir().unwrap();
        s.reload_from(dir.path());
        assert!(s.status_message.as_deref().unwrap_or("").starts_with("Error:"));
        assert_eq!(s.datasets.baseline.len(), 3);
        assert_eq!(s.config.data_dir, DashboardConfig::default().data_dir);
    }

    #[test]
    fn options_come_from_the_baseline() {
        let s = state();
        assert_eq!(s.filter_options(Column::Race), ["White", "Black"]);
    }
}
