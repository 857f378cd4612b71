use crate::color::{ChartTheme, ColorMap};
use crate::data::aggregate::{
    grouped_counts, mean_by_group, pearson, sort_by_value_desc, top_n, value_counts,
    AggregateError,
};
use crate::data::model::{Column, Income, NumericColumn, Record};

use super::chart::{
    count_bars, grouped_bar, mean_bars, pie, scatter, shaded_count_bars, treemap, Bindings,
    ChartSpec, Orientation, PointSeries,
};
use super::narrative;

/// One chart slot of a visualization tab.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: String,
    pub chart: Result<ChartSpec, AggregateError>,
    pub narrative: Option<&'static str>,
}

/// How a visualization tab is dressed.
#[derive(Debug, Clone)]
pub struct PanelOptions {
    pub theme: ChartTheme,
    /// Show the prose under each chart.
    pub narrate: bool,
    /// Colour scatter points by income class.
    pub color_scatter: bool,
    pub size: f32,
}

impl PanelOptions {
    pub fn with_outliers(size: f32) -> Self {
        Self {
            theme: ChartTheme::blues(),
            narrate: true,
            color_scatter: false,
            size,
        }
    }

    pub fn without_outliers(size: f32) -> Self {
        Self {
            theme: ChartTheme::greens(),
            narrate: false,
            color_scatter: true,
            size,
        }
    }
}

fn high_income<'a>(rows: &[&'a Record]) -> Vec<&'a Record> {
    rows.iter()
        .copied()
        .filter(|r| r.income == Income::High)
        .collect()
}

/// Build every chart of a visualization tab from the filtered rows.
pub fn variant_panels(rows: &[&Record], opts: &PanelOptions) -> Vec<Panel> {
    let theme = &opts.theme;
    let size = opts.size;
    let high = high_income(rows);
    let all = || rows.iter().copied();

    let mut panels = Vec::with_capacity(11);
    let mut push = |chart: Result<ChartSpec, AggregateError>, title: String, text: &'static str| {
        if let Err(e) = &chart {
            log::warn!("{title}: {e}");
        }
        panels.push(Panel {
            title,
            chart,
            narrative: opts.narrate.then_some(text),
        });
    };

    let title = "Income Distribution by Education Level";
    push(
        Ok(grouped_bar(
            &grouped_counts(all(), Column::Education, Column::Income),
            Bindings::new(title, size).axes("Education Level", "Count"),
            theme,
        )),
        title.to_string(),
        narrative::EDUCATION,
    );

    let title = "Gender Distribution (High Income)";
    let genders = value_counts(high.iter().copied(), Column::Sex);
    push(
        Ok(pie(
            genders.iter().map(|c| (c.value.as_str(), c.count as f64)),
            0.0,
            Bindings::new(title, size),
            theme,
        )),
        title.to_string(),
        narrative::GENDER,
    );

    let title = "Top Occupations (High Income)";
    let occupations = value_counts(high.iter().copied(), Column::Occupation);
    push(
        Ok(count_bars(
            &occupations,
            Orientation::Horizontal,
            Bindings::new(title, size).axes("Count", "Occupation"),
            &ColorMap::uniform(theme.primary),
        )),
        title.to_string(),
        narrative::OCCUPATIONS,
    );

    let chart = pearson(all(), NumericColumn::HoursPerWeek, NumericColumn::IncomeNumeric).map(|r| {
        let title = format!("Income vs Hours per Week (Correlation = {r:.2})");
        scatter(
            hours_vs_income(rows, opts),
            Bindings::new(title, size).axes("Hours per Week", "Income (0 = <=50K, 1 = >50K)"),
        )
    });
    let title = match &chart {
        Ok(spec) => spec.title.clone(),
        Err(_) => "Income vs Hours per Week".to_string(),
    };
    push(chart, title, narrative::HOURS);

    let title = "Top 10 Countries with High Income";
    push(
        Ok(shaded_count_bars(
            &top_n(value_counts(high.iter().copied(), Column::NativeCountry), 10),
            Orientation::Horizontal,
            Bindings::new(title, size).axes("Count", "Country"),
            theme,
        )),
        title.to_string(),
        narrative::COUNTRIES,
    );

    let title = "Income Classification by Marital Status";
    push(
        Ok(grouped_bar(
            &grouped_counts(all(), Column::MaritalStatus, Column::Income),
            Bindings::new(title, size).axes("Marital Status", "Count"),
            theme,
        )),
        title.to_string(),
        narrative::MARITAL,
    );

    let title = "Average Education Level by Income";
    let education_means = mean_by_group(all(), Column::Income, NumericColumn::EducationNum);
    push(
        Ok(pie(
            education_means.iter().map(|m| (m.group.as_str(), m.mean)),
            0.5,
            Bindings::new(title, size),
            theme,
        )),
        title.to_string(),
        narrative::EDUCATION_NUM,
    );

    let title = "Average Weekly Work Hours by Workclass";
    push(
        Ok(mean_bars(
            &sort_by_value_desc(mean_by_group(all(), Column::Workclass, NumericColumn::HoursPerWeek)),
            Orientation::Horizontal,
            Bindings::new(title, size).axes("Average hours per week", "Workclass"),
            theme.primary,
        )),
        title.to_string(),
        narrative::WORKCLASS_HOURS,
    );

    let title = "Income Classification by Race";
    let races = value_counts(high.iter().copied(), Column::Race);
    let race_labels: Vec<&str> = races.iter().map(|c| c.value.as_str()).collect();
    push(
        Ok(count_bars(
            &races,
            Orientation::Vertical,
            Bindings::new(title, size).axes("race", "Count"),
            &theme.color_map(&race_labels),
        )),
        title.to_string(),
        narrative::RACE,
    );

    let title = "Income Distribution by Workclass";
    push(
        Ok(grouped_bar(
            &grouped_counts(all(), Column::Workclass, Column::Income),
            Bindings::new(title, size).axes("Workclass", "Number of People"),
            theme,
        )),
        title.to_string(),
        narrative::WORKCLASS,
    );

    let title = "Top 5 Occupations Among Females";
    let females: Vec<&Record> = all().filter(|r| r.sex == "Female").collect();
    push(
        Ok(treemap(
            &top_n(value_counts(females, Column::Occupation), 5),
            Bindings::new(title, size),
            theme,
        )),
        title.to_string(),
        narrative::FEMALE_OCCUPATIONS,
    );

    panels
}

/// Scatter series: one per income class, or a single series.
fn hours_vs_income(rows: &[&Record], opts: &PanelOptions) -> Vec<PointSeries> {
    let point = |r: &Record| [r.hours_per_week as f64, r.income.numeric() as f64];
    if !opts.color_scatter {
        return vec![PointSeries {
            name: "individuals".to_string(),
            color: opts.theme.primary,
            points: rows.iter().map(|r| point(*r)).collect(),
        }];
    }
    let colors = opts.theme.color_map(&[Income::Low.as_str(), Income::High.as_str()]);
    Income::ALL
        .iter()
        .map(|income| PointSeries {
            name: income.to_string(),
            color: colors.color_for(income.as_str()),
            points: rows
                .iter()
                .filter(|r| r.income == *income)
                .map(|r| point(*r))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{apply_filters, FilterSelection};
    use crate::data::model::fixtures::record;
    use crate::report::chart::ChartKind;

    fn table() -> Vec<Record> {
        let mut rows = vec![
            record("Male", "White", "United-States", Income::High),
            record("Female", "Black", "United-States", Income::Low),
            record("Female", "White", "Mexico", Income::High),
            record("Male", "White", "India", Income::Low),
        ];
        rows[0].hours_per_week = 60;
        rows[2].hours_per_week = 45;
        rows[3].hours_per_week = 30;
        rows[2].occupation = "Prof-specialty".to_string();
        rows
    }

    #[test]
    fn builds_eleven_panels_with_narrative() {
        let t = table();
        let refs: Vec<&Record> = t.iter().collect();
        let panels = variant_panels(&refs, &PanelOptions::with_outliers(800.0));
        assert_eq!(panels.len(), 11);
        assert!(panels.iter().all(|p| p.narrative.is_some()));
        assert!(panels.iter().all(|p| p.chart.is_ok()));
        assert!(panels[3].title.starts_with("Income vs Hours per Week (Correlation = 0."));
    }

    #[test]
    fn without_outliers_splits_scatter_by_income() {
        let t = table();
        let refs: Vec<&Record> = t.iter().collect();
        let panels = variant_panels(&refs, &PanelOptions::without_outliers(800.0));
        assert!(panels.iter().all(|p| p.narrative.is_none()));
        let Ok(spec) = &panels[3].chart else {
            panic!("scatter should build");
        };
        let ChartKind::Scatter { series } = &spec.kind else {
            panic!("expected scatter");
        };
        assert_eq!(series.len(), 2);
        assert_eq!(series[1].points, vec![[60.0, 1.0], [45.0, 1.0]]);
    }

    #[test]
    fn empty_selection_result_degrades_per_chart() {
        let t = table();
        let sel = FilterSelection::new().with_values(Column::NativeCountry, ["Atlantis"]);
        let rows = apply_filters(&t, &sel);
        let panels = variant_panels(&rows, &PanelOptions::with_outliers(800.0));

        assert_eq!(panels.len(), 11);
        assert_eq!(
            panels[3].chart,
            Err(AggregateError::EmptyInput { needed: 2, got: 0 })
        );
        for (i, p) in panels.iter().enumerate() {
            if i != 3 {
                assert!(p.chart.as_ref().unwrap().kind.is_empty(), "{}", p.title);
            }
        }
    }

    #[test]
    fn female_treemap_only_counts_female_rows() {
        let t = table();
        let refs: Vec<&Record> = t.iter().collect();
        let panels = variant_panels(&refs, &PanelOptions::with_outliers(800.0));
        let ChartKind::Treemap { tiles } = &panels[10].chart.as_ref().unwrap().kind else {
            panic!("expected treemap");
        };
        let total: f64 = tiles.iter().map(|t| t.value).sum();
        assert_eq!(total, 2.0);
    }
}
