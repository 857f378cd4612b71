//! Presentation model: derived tables turned into chart descriptions and prose.
//!
//! One call to [`build_dashboard`] is one run of the pipeline:
//! ```text
//!   Datasets ──filter(selection)──▶ rows ──aggregate──▶ ChartSpec / Overview
//! ```
//! The UI layer only draws what this module produces.

pub mod chart;
pub mod narrative;
pub mod overview;
pub mod variant;

use crate::data::filter::{apply_filters, FilterSelection};
use crate::data::loader::Datasets;
use crate::data::model::DatasetVariant;

use overview::{build_overview, Overview};
use variant::{variant_panels, Panel, PanelOptions};

/// Output of one pipeline run, cached until the selection changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub overview: Overview,
    pub with_outliers: Vec<Panel>,
    pub without_outliers: Vec<Panel>,
    /// Filtered row count per variant.
    pub row_counts: [(DatasetVariant, usize); 3],
}

/// Filter every variant with the same selection and build all tab content.
pub fn build_dashboard(datasets: &Datasets, selection: &FilterSelection, size: f32) -> Dashboard {
    let filter = |variant: DatasetVariant| apply_filters(&datasets.get(variant).records, selection);
    let baseline = filter(DatasetVariant::Baseline);
    let with_outliers = filter(DatasetVariant::WithOutliers);
    let without_outliers = filter(DatasetVariant::WithoutOutliers);

    log::debug!(
        "Filtered rows: baseline {}, with outliers {}, without outliers {}",
        baseline.len(),
        with_outliers.len(),
        without_outliers.len()
    );

    Dashboard {
        overview: build_overview(&datasets.baseline, &baseline, size),
        with_outliers: variant_panels(&with_outliers, &PanelOptions::with_outliers(size)),
        without_outliers: variant_panels(&without_outliers, &PanelOptions::without_outliers(size)),
        row_counts: [
            (DatasetVariant::Baseline, baseline.len()),
            (DatasetVariant::WithOutliers, with_outliers.len()),
            (DatasetVariant::WithoutOutliers, without_outliers.len()),
        ],
    }
}
