use eframe::egui::{self, Grid, RichText, ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::aggregate::{CategoricalSummary, NumericSummary};
use crate::report::narrative::{self, bold_runs};
use crate::report::overview::Overview;
use crate::report::variant::Panel;
use crate::state::{AppState, Tab};

use super::plot;

// ---------------------------------------------------------------------------
// Shared widgets
// ---------------------------------------------------------------------------

/// Wrapped paragraph with `**bold**` runs.
pub fn paragraph(ui: &mut Ui, text: &str) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        for (run, bold) in bold_runs(text) {
            if bold {
                ui.label(RichText::new(run).strong());
            } else {
                ui.label(run);
            }
        }
    });
}

fn centered_heading(ui: &mut Ui, text: &str) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(text);
    });
}

/// Plain text table with a header row.
fn text_table(ui: &mut Ui, id: &str, header: &[String], rows: &[Vec<String>]) {
    ui.push_id(id, |ui: &mut Ui| {
        ScrollArea::horizontal().id_salt(id).show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .vscroll(false)
                .columns(TableColumn::auto().at_least(60.0), header.len())
                .header(20.0, |mut head| {
                    for name in header {
                        head.col(|ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|mut body| {
                    for row in rows {
                        body.row(18.0, |mut cells| {
                            for cell in row {
                                cells.col(|ui| {
                                    ui.label(cell);
                                });
                            }
                        });
                    }
                });
        });
    });
}

fn fmt_stat(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e12 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

// ---------------------------------------------------------------------------
// Tab dispatch
// ---------------------------------------------------------------------------

/// Render the content of the active tab.
pub fn active_tab(ui: &mut Ui, state: &AppState) {
    match state.active_tab {
        Tab::Overview => overview_tab(ui, &state.dashboard.overview),
        Tab::WithOutliers => variant_tab(ui, &state.dashboard.with_outliers),
        Tab::WithoutOutliers => variant_tab(ui, &state.dashboard.without_outliers),
        Tab::Summary => summary_tab(ui),
    }
}

// ---------------------------------------------------------------------------
// Overview
// ---------------------------------------------------------------------------

fn overview_tab(ui: &mut Ui, overview: &Overview) {
    centered_heading(ui, "Overview");
    paragraph(ui, narrative::INTRO);
    ui.add_space(8.0);

    centered_heading(ui, "Column Descriptions");
    Grid::new("column_descriptions")
        .striped(true)
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            for (name, description) in narrative::COLUMN_DESCRIPTIONS {
                ui.strong(name);
                ui.label(description);
                ui.end_row();
            }
        });
    ui.add_space(8.0);

    let warn = ui.visuals().warn_fg_color;
    ui.label(RichText::new(narrative::CLEANED_NOTE.replace("**", "")).color(warn).strong());
    ui.label(format!(
        "Shape: {} rows × {} columns",
        overview.rows,
        overview.columns()
    ));
    ui.add_space(4.0);

    ui.strong("First rows");
    text_table(ui, "head", &overview.column_names, &overview.head);
    ui.add_space(8.0);

    ui.strong("Numeric columns");
    numeric_table(ui, &overview.numeric);
    ui.add_space(8.0);

    ui.strong("Categorical columns");
    categorical_table(ui, &overview.categorical);
    ui.add_space(8.0);

    plot::chart(ui, &overview.correlation);
}

/// One column per numeric field, one row per statistic.
fn numeric_table(ui: &mut Ui, summaries: &[NumericSummary]) {
    if summaries.is_empty() {
        ui.weak("No numeric data for the current filters.");
        return;
    }
    let mut header = vec![String::new()];
    header.extend(summaries.iter().map(|s| s.column.name().to_string()));

    type Stat = fn(&NumericSummary) -> String;
    let stats: [(&str, Stat); 8] = [
        ("count", |s| s.count.to_string()),
        ("mean", |s| fmt_stat(s.mean)),
        ("std", |s| s.std.map_or_else(|| "n/a".to_string(), fmt_stat)),
        ("min", |s| fmt_stat(s.min)),
        ("25%", |s| fmt_stat(s.q25)),
        ("50%", |s| fmt_stat(s.median)),
        ("75%", |s| fmt_stat(s.q75)),
        ("max", |s| fmt_stat(s.max)),
    ];
    let rows: Vec<Vec<String>> = stats
        .iter()
        .map(|(name, stat)| {
            let mut row = vec![name.to_string()];
            row.extend(summaries.iter().map(stat));
            row
        })
        .collect();
    text_table(ui, "numeric_summary", &header, &rows);
}

fn categorical_table(ui: &mut Ui, summaries: &[CategoricalSummary]) {
    if summaries.is_empty() {
        ui.weak("No categorical data for the current filters.");
        return;
    }
    let mut header = vec![String::new()];
    header.extend(summaries.iter().map(|s| s.column.name().to_string()));

    let mut rows = vec![
        vec!["count".to_string()],
        vec!["unique".to_string()],
        vec!["top".to_string()],
        vec!["freq".to_string()],
    ];
    for s in summaries {
        rows[0].push(s.count.to_string());
        rows[1].push(s.unique.to_string());
        rows[2].push(s.top.clone());
        rows[3].push(s.freq.to_string());
    }
    text_table(ui, "categorical_summary", &header, &rows);
}

// ---------------------------------------------------------------------------
// Variant tabs
// ---------------------------------------------------------------------------

fn variant_tab(ui: &mut Ui, panels: &[Panel]) {
    for (i, panel) in panels.iter().enumerate() {
        ui.push_id(i, |ui: &mut Ui| match &panel.chart {
            Ok(spec) => plot::chart(ui, spec),
            Err(e) => {
                centered_heading(ui, &panel.title);
                let color = ui.visuals().error_fg_color;
                ui.vertical_centered(|ui: &mut Ui| {
                    ui.label(RichText::new(format!("Cannot draw this chart: {e}")).color(color));
                });
            }
        });
        if let Some(text) = panel.narrative {
            paragraph(ui, text);
        }
        ui.add_space(12.0);
        ui.separator();
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

fn summary_tab(ui: &mut Ui) {
    centered_heading(ui, "Summary");
    paragraph(ui, narrative::SUMMARY_INTRO);
    ui.add_space(8.0);

    ui.strong("Key insights");
    for (i, (head, text)) in narrative::INSIGHTS.iter().enumerate() {
        paragraph(ui, &format!("{}. **{head}:** {text}", i + 1));
    }
    ui.add_space(8.0);

    centered_heading(ui, "Recommendations");
    for (head, text) in narrative::RECOMMENDATIONS {
        paragraph(ui, &format!("• **{head}:** {text}"));
    }
}

/// Banner image above the title, when configured.
pub fn banner(ui: &mut Ui, state: &AppState) {
    if let Some(path) = &state.config.banner {
        ui.add(
            egui::Image::new(format!("file://{}", path.display()))
                .max_width(ui.available_width())
                .max_height(200.0),
        );
    }
}
