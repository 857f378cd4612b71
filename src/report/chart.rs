use eframe::egui::Color32;

use crate::color::{ChartTheme, ColorMap};
use crate::data::aggregate::{CorrelationMatrix, GroupCount, GroupMean, ValueCount};

// ---------------------------------------------------------------------------
// Declarative chart description
// ---------------------------------------------------------------------------

/// Everything the renderer needs to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Logical edge length; the renderer shrinks it to fit.
    pub size: f32,
    pub kind: ChartKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    /// Categories on the y axis, first category at the top.
    Horizontal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub color: Color32,
    /// One value per category, aligned with `ChartKind::GroupedBar::categories`.
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
    pub label: String,
    pub value: f64,
    pub color: Color32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointSeries {
    pub name: String,
    pub color: Color32,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartKind {
    GroupedBar {
        categories: Vec<String>,
        series: Vec<Series>,
    },
    Bar {
        orientation: Orientation,
        bars: Vec<Mark>,
    },
    Pie {
        slices: Vec<Mark>,
        /// Inner radius as a fraction of the outer one; 0 for a full pie.
        hole: f32,
    },
    Scatter {
        series: Vec<PointSeries>,
    },
    Treemap {
        tiles: Vec<Mark>,
    },
    Heatmap {
        labels: Vec<String>,
        cells: Vec<Vec<Option<f64>>>,
    },
}

impl ChartKind {
    /// True when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        match self {
            ChartKind::GroupedBar { categories, .. } => categories.is_empty(),
            ChartKind::Bar { bars, .. } => bars.is_empty(),
            ChartKind::Pie { slices, .. } => slices.is_empty(),
            ChartKind::Scatter { series } => series.iter().all(|s| s.points.is_empty()),
            ChartKind::Treemap { tiles } => tiles.is_empty(),
            ChartKind::Heatmap { labels, .. } => labels.is_empty(),
        }
    }
}

// ---------------------------------------------------------------------------
// Builders: derived table + bindings + palette → ChartSpec
// ---------------------------------------------------------------------------

/// Axis titles and fixed size shared by every builder.
#[derive(Debug, Clone)]
pub struct Bindings {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub size: f32,
}

impl Bindings {
    pub fn new(title: impl Into<String>, size: f32) -> Self {
        Self {
            title: title.into(),
            x_label: String::new(),
            y_label: String::new(),
            size,
        }
    }

    pub fn axes(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_label = x.into();
        self.y_label = y.into();
        self
    }

    fn into_spec(self, kind: ChartKind) -> ChartSpec {
        ChartSpec {
            title: self.title,
            x_label: self.x_label,
            y_label: self.y_label,
            size: self.size,
            kind,
        }
    }
}

/// Distinct values in first-appearance order.
fn ordered_unique<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for v in values {
        if !out.iter().any(|o| o == v) {
            out.push(v.to_string());
        }
    }
    out
}

/// Grouped bars: one category per group, one series per subgroup.
/// Categories and series keep the order they first appear in `counts`.
pub fn grouped_bar(counts: &[GroupCount], bindings: Bindings, theme: &ChartTheme) -> ChartSpec {
    let categories = ordered_unique(counts.iter().map(|c| c.group.as_str()));
    let names = ordered_unique(counts.iter().map(|c| c.subgroup.as_str()));
    let colors = theme.color_map(&names);

    let series = names
        .iter()
        .map(|name| {
            let values = categories
                .iter()
                .map(|cat| {
                    counts
                        .iter()
                        .find(|c| &c.group == cat && &c.subgroup == name)
                        .map_or(0.0, |c| c.count as f64)
                })
                .collect();
            Series {
                name: name.clone(),
                color: colors.color_for(name),
                values,
            }
        })
        .collect();

    bindings.into_spec(ChartKind::GroupedBar { categories, series })
}

fn marks<'a>(
    entries: impl Iterator<Item = (&'a str, f64)>,
    color: impl Fn(&str, f64) -> Color32,
) -> Vec<Mark> {
    entries
        .map(|(label, value)| Mark {
            label: label.to_string(),
            value,
            color: color(label, value),
        })
        .collect()
}

/// Bars for a value-count table, coloured by `colors`.
pub fn count_bars(
    counts: &[ValueCount],
    orientation: Orientation,
    bindings: Bindings,
    colors: &ColorMap,
) -> ChartSpec {
    let bars = marks(
        counts.iter().map(|c| (c.value.as_str(), c.count as f64)),
        |label, _| colors.color_for(label),
    );
    bindings.into_spec(ChartKind::Bar { orientation, bars })
}

/// Bars for a value-count table shaded by count on the theme's ramp.
pub fn shaded_count_bars(
    counts: &[ValueCount],
    orientation: Orientation,
    bindings: Bindings,
    theme: &ChartTheme,
) -> ChartSpec {
    let max = counts.iter().map(|c| c.count).max().unwrap_or(0) as f64;
    let min = counts.iter().map(|c| c.count).min().unwrap_or(0) as f64;
    let bars = marks(
        counts.iter().map(|c| (c.value.as_str(), c.count as f64)),
        |_, value| theme.scale.color_at(value, min, max),
    );
    bindings.into_spec(ChartKind::Bar { orientation, bars })
}

/// Single-colour bars for a per-group mean table.
pub fn mean_bars(
    means: &[GroupMean],
    orientation: Orientation,
    bindings: Bindings,
    color: Color32,
) -> ChartSpec {
    let bars = marks(
        means.iter().map(|m| (m.group.as_str(), m.mean)),
        |_, _| color,
    );
    bindings.into_spec(ChartKind::Bar { orientation, bars })
}

/// Pie (or donut, with `hole > 0`) over labelled values.
pub fn pie<'a>(
    entries: impl Iterator<Item = (&'a str, f64)>,
    hole: f32,
    bindings: Bindings,
    theme: &ChartTheme,
) -> ChartSpec {
    let entries: Vec<(&str, f64)> = entries.collect();
    let labels: Vec<&str> = entries.iter().map(|e| e.0).collect();
    let colors = theme.color_map(&labels);
    let slices = marks(entries.into_iter(), |label, _| colors.color_for(label));
    bindings.into_spec(ChartKind::Pie { slices, hole })
}

/// Treemap tiles, shaded in order with the theme's tile colours.
pub fn treemap(counts: &[ValueCount], bindings: Bindings, theme: &ChartTheme) -> ChartSpec {
    let tiles = counts
        .iter()
        .enumerate()
        .map(|(i, c)| Mark {
            label: c.value.clone(),
            value: c.count as f64,
            color: theme.shades[i % theme.shades.len()],
        })
        .collect();
    bindings.into_spec(ChartKind::Treemap { tiles })
}

pub fn scatter(series: Vec<PointSeries>, bindings: Bindings) -> ChartSpec {
    bindings.into_spec(ChartKind::Scatter { series })
}

pub fn heatmap(matrix: &CorrelationMatrix, bindings: Bindings) -> ChartSpec {
    bindings.into_spec(ChartKind::Heatmap {
        labels: matrix.columns.iter().map(|c| c.name().to_string()).collect(),
        cells: matrix.values.clone(),
    })
}
