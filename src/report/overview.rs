use crate::data::aggregate::{
    correlation_matrix, describe_categorical, describe_numeric, CategoricalSummary,
    NumericSummary,
};
use crate::data::model::{Column, Dataset, NumericColumn, Record};

use super::chart::{heatmap, Bindings, ChartSpec};

/// Rows shown in the data preview.
pub const HEAD_ROWS: usize = 5;

/// Everything the Overview tab displays for the filtered baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub rows: usize,
    pub column_names: Vec<String>,
    /// First rows rendered as text, aligned with `column_names`.
    pub head: Vec<Vec<String>>,
    pub numeric: Vec<NumericSummary>,
    pub categorical: Vec<CategoricalSummary>,
    pub correlation: ChartSpec,
}

impl Overview {
    pub fn columns(&self) -> usize {
        self.column_names.len()
    }
}

fn has_column(dataset: &Dataset, name: &str) -> bool {
    dataset.column_names.iter().any(|c| c == name)
}

fn has_categorical(dataset: &Dataset, column: Column) -> bool {
    has_column(dataset, column.name()) || (column == Column::Income && has_column(dataset, "income"))
}

/// Numeric columns the file actually carries.
fn numeric_columns(dataset: &Dataset) -> Vec<NumericColumn> {
    NumericColumn::ALL
        .into_iter()
        .filter(|c| has_column(dataset, c.name()))
        .collect()
}

pub fn build_overview(dataset: &Dataset, rows: &[&Record], size: f32) -> Overview {
    let head = rows
        .iter()
        .take(HEAD_ROWS)
        .map(|r| dataset.column_names.iter().map(|c| r.cell(c)).collect())
        .collect();

    let numeric_cols = numeric_columns(dataset);
    let numeric = numeric_cols
        .iter()
        .filter_map(|&c| describe_numeric(rows, c).ok())
        .collect();
    let categorical = Column::CATEGORICAL
        .into_iter()
        .filter(|&c| has_categorical(dataset, c))
        .filter_map(|c| describe_categorical(rows, c).ok())
        .collect();

    // The heatmap describes the whole file, not the filtered view.
    let all_rows: Vec<&Record> = dataset.records.iter().collect();
    let correlation = heatmap(
        &correlation_matrix(&all_rows, &numeric_cols),
        Bindings::new("Correlation Matrix of Numerical Data", size),
    );

    Overview {
        rows: rows.len(),
        column_names: dataset.column_names.clone(),
        head,
        numeric,
        categorical,
        correlation,
    }
}
