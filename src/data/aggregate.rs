use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

use super::model::{Column, NumericColumn, Record};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregateError {
    #[error("not enough rows: need at least {needed}, got {got}")]
    EmptyInput { needed: usize, got: usize },

    #[error("'{column}' has zero variance, correlation is undefined")]
    ZeroVariance { column: NumericColumn },

    #[error("'{column}' has no values in this dataset")]
    MissingValues { column: NumericColumn },
}

// ---------------------------------------------------------------------------
// Derived tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupCount {
    pub group: String,
    pub subgroup: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupMean {
    pub group: String,
    pub mean: f64,
}

/// Output of `describe()` for one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub column: NumericColumn,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` below two rows.
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Output of `describe(include="O")` for one categorical column.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalSummary {
    pub column: Column,
    pub count: usize,
    pub unique: usize,
    pub top: String,
    pub freq: usize,
}

/// Pairwise Pearson coefficients; `None` where undefined.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<NumericColumn>,
    pub values: Vec<Vec<Option<f64>>>,
}

// ---------------------------------------------------------------------------
// Counting
// ---------------------------------------------------------------------------

/// Sort descending by count; `sort_by` is stable so ties keep input order.
fn sort_desc<T>(items: &mut [T], count: impl Fn(&T) -> usize) {
    items.sort_by(|a, b| count(b).cmp(&count(a)));
}

/// Frequency of each distinct value, most common first.
pub fn value_counts<'a, I>(rows: I, column: Column) -> Vec<ValueCount>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<ValueCount> = Vec::new();
    for row in rows {
        let value = column.value(row);
        match index.get(value) {
            Some(&i) => out[i].count += 1,
            None => {
                index.insert(value, out.len());
                out.push(ValueCount {
                    value: value.to_string(),
                    count: 1,
                });
            }
        }
    }
    sort_desc(&mut out, |vc| vc.count);
    out
}

/// Count per (group, subgroup) pair, most common pair first.
pub fn grouped_counts<'a, I>(rows: I, group: Column, subgroup: Column) -> Vec<GroupCount>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut out: Vec<GroupCount> = Vec::new();
    for row in rows {
        let key = (group.value(row), subgroup.value(row));
        match index.get(&key) {
            Some(&i) => out[i].count += 1,
            None => {
                index.insert(key, out.len());
                out.push(GroupCount {
                    group: key.0.to_string(),
                    subgroup: key.1.to_string(),
                    count: 1,
                });
            }
        }
    }
    sort_desc(&mut out, |gc| gc.count);
    out
}

/// The first `n` entries of an already-sorted count table.
pub fn top_n(mut counts: Vec<ValueCount>, n: usize) -> Vec<ValueCount> {
    counts.truncate(n);
    counts
}

// ---------------------------------------------------------------------------
// Means
// ---------------------------------------------------------------------------

/// Arithmetic mean of `numeric` per group, groups in ascending key order.
/// Rows where the numeric column is missing are skipped.
pub fn mean_by_group<'a, I>(rows: I, group: Column, numeric: NumericColumn) -> Vec<GroupMean>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for row in rows {
        let Some(v) = numeric.value(row) else {
            continue;
        };
        let entry = sums.entry(group.value(row)).or_insert((0.0, 0));
        entry.0 += v;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(g, (sum, n))| GroupMean {
            group: g.to_string(),
            mean: sum / n as f64,
        })
        .collect()
}

/// Reorder a mean table so the largest mean comes first.
pub fn sort_by_value_desc(mut means: Vec<GroupMean>) -> Vec<GroupMean> {
    means.sort_by(|a, b| b.mean.total_cmp(&a.mean));
    means
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Pearson correlation between two numeric columns over rows where both exist.
pub fn pearson<'a, I>(rows: I, x: NumericColumn, y: NumericColumn) -> Result<f64, AggregateError>
where
    I: IntoIterator<Item = &'a Record>,
{
    let pairs: Vec<(f64, f64)> = rows
        .into_iter()
        .filter_map(|r| Some((x.value(r)?, y.value(r)?)))
        .collect();
    if pairs.len() < 2 {
        return Err(AggregateError::EmptyInput {
            needed: 2,
            got: pairs.len(),
        });
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 {
        return Err(AggregateError::ZeroVariance { column: x });
    }
    if syy == 0.0 {
        return Err(AggregateError::ZeroVariance { column: y });
    }
    Ok((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

/// Pairwise correlation over `columns`, skipping columns with no values.
pub fn correlation_matrix(rows: &[&Record], columns: &[NumericColumn]) -> CorrelationMatrix {
    let columns: Vec<NumericColumn> = columns
        .iter()
        .copied()
        .filter(|c| rows.iter().any(|r| c.value(r).is_some()))
        .collect();
    let values = columns
        .iter()
        .map(|&a| {
            columns
                .iter()
                .map(|&b| pearson(rows.iter().copied(), a, b).ok())
                .collect()
        })
        .collect();
    CorrelationMatrix { columns, values }
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// Quantile with linear interpolation between closest ranks.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

pub fn describe_numeric(
    rows: &[&Record],
    column: NumericColumn,
) -> Result<NumericSummary, AggregateError> {
    let mut values: Vec<f64> = rows.iter().filter_map(|r| column.value(r)).collect();
    if values.is_empty() {
        return Err(if rows.is_empty() {
            AggregateError::EmptyInput { needed: 1, got: 0 }
        } else {
            AggregateError::MissingValues { column }
        });
    }
    values.sort_by(f64::total_cmp);

    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let std = (n > 1).then(|| {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    });

    Ok(NumericSummary {
        column,
        count: n,
        mean,
        std,
        min: values[0],
        q25: quantile(&values, 0.25),
        median: quantile(&values, 0.5),
        q75: quantile(&values, 0.75),
        max: values[n - 1],
    })
}

pub fn describe_categorical(
    rows: &[&Record],
    column: Column,
) -> Result<CategoricalSummary, AggregateError> {
    let counts = value_counts(rows.iter().copied(), column);
    let top = counts
        .first()
        .ok_or(AggregateError::EmptyInput { needed: 1, got: 0 })?;
    Ok(CategoricalSummary {
        column,
        count: rows.len(),
        unique: counts.len(),
        top: top.value.clone(),
        freq: top.count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{apply_filters, FilterSelection};
    use crate::data::model::fixtures::record;
    use crate::data::model::Income;

    fn rows() -> Vec<Record> {
        let mut out = Vec::new();
        for (i, (edu, income, hours)) in [
            ("Bachelors", Income::High, 50),
            ("HS-grad", Income::Low, 40),
            ("HS-grad", Income::Low, 35),
            ("Masters", Income::High, 60),
            ("Bachelors", Income::Low, 40),
            ("HS-grad", Income::High, 45),
        ]
        .into_iter()
        .enumerate()
        {
            let mut r = record("Male", "White", "United-States", income);
            r.education = edu.to_string();
            r.hours_per_week = hours;
            r.age = 20 + i as u32 * 5;
            out.push(r);
        }
        out
    }

    #[test]
    fn grouped_counts_sum_to_row_count() {
        let t = rows();
        let counts = grouped_counts(&t, Column::Education, Column::Income);
        assert_eq!(counts.iter().map(|c| c.count).sum::<usize>(), t.len());
        assert_eq!(
            counts[0],
            GroupCount {
                group: "HS-grad".into(),
                subgroup: "Low".into(),
                count: 2
            }
        );
    }

    #[test]
    fn grouped_counts_on_empty_table_are_empty() {
        let t = rows();
        let sel = FilterSelection::new().with_values(Column::NativeCountry, ["Atlantis"]);
        let filtered = apply_filters(&t, &sel);
        assert!(grouped_counts(filtered.iter().copied(), Column::Education, Column::Income)
            .is_empty());
        assert!(value_counts(filtered.iter().copied(), Column::Sex).is_empty());
    }

    #[test]
    fn value_counts_break_ties_by_first_appearance() {
        let t = rows();
        let counts = value_counts(&t, Column::Education);
        let order: Vec<&str> = counts.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(order, ["HS-grad", "Bachelors", "Masters"]);
    }

    #[test]
    fn top_n_is_bounded_and_descending() {
        let t = rows();
        let top = top_n(value_counts(&t, Column::Education), 2);
        assert_eq!(top.len(), 2);
        assert!(top[0].count >= top[1].count);
        assert_eq!(top_n(value_counts(&t, Column::Sex), 10).len(), 1);
    }

    #[test]
    fn mean_by_group_sorts_keys() {
        let t = rows();
        let means = mean_by_group(&t, Column::Income, NumericColumn::HoursPerWeek);
        assert_eq!(means[0].group, "High");
        assert!((means[0].mean - 155.0 / 3.0).abs() < 1e-9);
        assert_eq!(means[1].group, "Low");
        assert!((means[1].mean - 115.0 / 3.0).abs() < 1e-9);

        let sorted = sort_by_value_desc(mean_by_group(&t, Column::Education, NumericColumn::HoursPerWeek));
        assert_eq!(sorted[0].group, "Masters");
    }

    #[test]
    fn pearson_matches_hand_computation() {
        let t = rows();
        let r = pearson(&t, NumericColumn::HoursPerWeek, NumericColumn::IncomeNumeric).unwrap();
        assert!(r > 0.8 && r <= 1.0, "r = {r}");
        let self_r = pearson(&t, NumericColumn::Age, NumericColumn::Age).unwrap();
        assert!((self_r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_reports_zero_variance_and_short_input() {
        let t = rows();
        assert_eq!(
            pearson(&t, NumericColumn::EducationNum, NumericColumn::Age),
            Err(AggregateError::ZeroVariance {
                column: NumericColumn::EducationNum
            })
        );
        assert_eq!(
            pearson(&t[..1], NumericColumn::Age, NumericColumn::HoursPerWeek),
            Err(AggregateError::EmptyInput { needed: 2, got: 1 })
        );
    }

    #[test]
    fn correlation_matrix_marks_undefined_cells() {
        let t = rows();
        let refs: Vec<&Record> = t.iter().collect();
        let m = correlation_matrix(&refs, &[NumericColumn::Age, NumericColumn::CapitalLoss]);
        assert_eq!(m.columns.len(), 2);
        assert!((m.values[0][0].unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(m.values[0][1], None);
    }

    #[test]
    fn describe_numeric_uses_linear_quantiles() {
        let t = rows();
        let refs: Vec<&Record> = t.iter().collect();
        let s = describe_numeric(&refs, NumericColumn::HoursPerWeek).unwrap();
        // sorted: 35 40 40 45 50 60
        assert_eq!(s.count, 6);
        assert_eq!(s.min, 35.0);
        assert_eq!(s.max, 60.0);
        assert_eq!(s.median, 42.5);
        assert_eq!(s.q25, 40.0);
        assert_eq!(s.q75, 48.75);
        assert!(s.std.is_some());
        assert_eq!(
            describe_numeric(&[], NumericColumn::Age),
            Err(AggregateError::EmptyInput { needed: 1, got: 0 })
        );
    }

    #[test]
    fn describe_categorical_reports_top_value() {
        let t = rows();
        let refs: Vec<&Record> = t.iter().collect();
        let s = describe_categorical(&refs, Column::Education).unwrap();
        assert_eq!((s.count, s.unique, s.top.as_str(), s.freq), (6, 3, "HS-grad", 3));
    }
}
