use std::f32::consts::{FRAC_PI_2, TAU};
use std::ops::RangeInclusive;

use eframe::egui::{
    pos2, vec2, Align2, Color32, FontId, Pos2, Rect, RichText, Sense, Shape, Stroke, Ui, Vec2,
};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot, PlotPoints, Points};

use crate::color;
use crate::report::chart::{ChartKind, ChartSpec, Mark, Orientation, PointSeries, Series};

/// Plots are drawn a bit flatter than square to keep tabs scrollable.
const ASPECT: f32 = 0.75;

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Render one chart description with its title.
pub fn chart(ui: &mut Ui, spec: &ChartSpec) {
    let width = spec.size.min(ui.available_width()).max(240.0);

    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(&spec.title).size(20.0).strong());
    });

    if spec.kind.is_empty() {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.weak("No rows match the current filters.");
        });
        return;
    }

    match &spec.kind {
        ChartKind::GroupedBar { categories, series } => {
            grouped_bars(ui, spec, categories, series, width)
        }
        ChartKind::Bar { orientation, bars } => single_bars(ui, spec, *orientation, bars, width),
        ChartKind::Pie { slices, hole } => pie(ui, slices, *hole, width),
        ChartKind::Scatter { series } => scatter(ui, spec, series, width),
        ChartKind::Treemap { tiles } => treemap(ui, tiles, width),
        ChartKind::Heatmap { labels, cells } => heatmap(ui, labels, cells, width),
    }
}

// ---------------------------------------------------------------------------
// egui_plot based charts
// ---------------------------------------------------------------------------

/// Axis formatter that prints category names at integer positions.
fn category_formatter(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let i = mark.value.round();
        if (mark.value - i).abs() > 1e-6 || i < 0.0 {
            return String::new();
        }
        labels.get(i as usize).cloned().unwrap_or_default()
    }
}

fn base_plot<'a>(spec: &ChartSpec, width: f32) -> Plot<'a> {
    Plot::new(&spec.title)
        .width(width)
        .height(width * ASPECT)
        .legend(Legend::default())
        .x_axis_label(spec.x_label.clone())
        .y_axis_label(spec.y_label.clone())
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
}

fn grouped_bars(ui: &mut Ui, spec: &ChartSpec, categories: &[String], series: &[Series], width: f32) {
    let k = series.len().max(1) as f64;
    let bar_width = 0.8 / k;

    let charts: Vec<BarChart> = series
        .iter()
        .enumerate()
        .map(|(s, ser)| {
            let offset = (s as f64 - (k - 1.0) / 2.0) * bar_width;
            let bars = ser
                .values
                .iter()
                .zip(categories)
                .enumerate()
                .map(|(i, (&value, cat))| {
                    Bar::new(i as f64 + offset, value)
                        .width(bar_width)
                        .name(format!("{cat} ({})", ser.name))
                        .fill(ser.color)
                        .stroke(Stroke::new(1.0, ser.color))
                })
                .collect();
            BarChart::new(bars).name(&ser.name).color(ser.color)
        })
        .collect();

    base_plot(spec, width)
        .x_axis_formatter(category_formatter(categories.to_vec()))
        .x_grid_spacer(egui_plot::uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .show(ui, |plot_ui| {
            for c in charts {
                plot_ui.bar_chart(c);
            }
        });
}

fn single_bars(ui: &mut Ui, spec: &ChartSpec, orientation: Orientation, marks: &[Mark], width: f32) {
    let n = marks.len();
    // Horizontal charts list the first category at the top.
    let position = |i: usize| match orientation {
        Orientation::Vertical => i as f64,
        Orientation::Horizontal => (n - 1 - i) as f64,
    };
    let mut labels = vec![String::new(); n];
    for (i, m) in marks.iter().enumerate() {
        labels[position(i) as usize] = m.label.clone();
    }

    let bars: Vec<Bar> = marks
        .iter()
        .enumerate()
        .map(|(i, m)| {
            Bar::new(position(i), m.value)
                .width(0.7)
                .name(&m.label)
                .fill(m.color)
                .stroke(Stroke::new(1.0, m.color))
        })
        .collect();
    let mut chart = BarChart::new(bars);
    let plot = base_plot(spec, width);

    let plot = match orientation {
        Orientation::Vertical => plot
            .x_axis_formatter(category_formatter(labels))
            .x_grid_spacer(egui_plot::uniform_grid_spacer(|_| [1.0, 5.0, 10.0])),
        Orientation::Horizontal => {
            chart = chart.horizontal();
            plot.y_axis_formatter(category_formatter(labels))
                .y_grid_spacer(egui_plot::uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        }
    };

    plot.show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

fn scatter(ui: &mut Ui, spec: &ChartSpec, series: &[PointSeries], width: f32) {
    base_plot(spec, width).show(ui, |plot_ui| {
        for s in series {
            plot_ui.points(
                Points::new(PlotPoints::from(s.points.clone()))
                    .radius(2.5)
                    .color(s.color)
                    .name(&s.name),
            );
        }
    });
}

// ---------------------------------------------------------------------------
// Painter based charts
// ---------------------------------------------------------------------------

fn legend_row(ui: &mut Ui, marks: &[Mark]) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for m in marks {
            ui.label(RichText::new("■").color(m.color));
            ui.label(&m.label);
            ui.add_space(8.0);
        }
    });
}

fn pie(ui: &mut Ui, slices: &[Mark], hole: f32, width: f32) {
    let side = width * ASPECT;
    let total: f64 = slices.iter().map(|s| s.value).sum();

    ui.vertical_centered(|ui: &mut Ui| {
        let (response, painter) = ui.allocate_painter(Vec2::splat(side), Sense::hover());
        let center = response.rect.center();
        let outer = side * 0.45;
        let inner = outer * hole.clamp(0.0, 0.95);
        let at = |r: f32, angle: f32| center + Vec2::angled(angle) * r;

        let mut start = -FRAC_PI_2;
        for slice in slices {
            let sweep = (slice.value / total) as f32 * TAU;
            let steps = ((sweep / 0.05).ceil() as usize).max(1);
            for k in 0..steps {
                let a0 = start + sweep * k as f32 / steps as f32;
                let a1 = start + sweep * (k + 1) as f32 / steps as f32;
                let points = if inner > 0.0 {
                    vec![at(inner, a0), at(outer, a0), at(outer, a1), at(inner, a1)]
                } else {
                    vec![center, at(outer, a0), at(outer, a1)]
                };
                painter.add(Shape::convex_polygon(points, slice.color, Stroke::NONE));
            }

            let mid = start + sweep / 2.0;
            let label_radius = if inner > 0.0 {
                (inner + outer) / 2.0
            } else {
                outer * 0.65
            };
            let pct = slice.value / total * 100.0;
            painter.text(
                at(label_radius, mid),
                Align2::CENTER_CENTER,
                format!("{}\n{pct:.1}%", slice.label),
                FontId::proportional(13.0),
                color::text_on(slice.color),
            );
            start += sweep;
        }
        legend_row(ui, slices);
    });
}

/// Split `rect` among `values` by recursive halving along the longer side.
/// Returned rects are aligned with `values`.
pub fn treemap_layout(values: &[f64], rect: Rect) -> Vec<Rect> {
    let mut out = vec![Rect::NOTHING; values.len()];
    split_tiles(values, 0, rect, &mut out);
    out
}

fn split_tiles(values: &[f64], offset: usize, rect: Rect, out: &mut [Rect]) {
    match values.len() {
        0 => return,
        1 => {
            out[offset] = rect;
            return;
        }
        _ => {}
    }

    let total: f64 = values.iter().sum();
    let mut acc = 0.0;
    let mut cut = 1;
    let mut best = f64::INFINITY;
    for i in 1..values.len() {
        acc += values[i - 1];
        let d = (acc - total / 2.0).abs();
        if d < best {
            best = d;
            cut = i;
        }
    }
    let left: f64 = values[..cut].iter().sum();
    let frac = if total > 0.0 { (left / total) as f32 } else { 0.5 };

    let (a, b) = if rect.width() >= rect.height() {
        let x = rect.min.x + rect.width() * frac;
        (
            Rect::from_min_max(rect.min, pos2(x, rect.max.y)),
            Rect::from_min_max(pos2(x, rect.min.y), rect.max),
        )
    } else {
        let y = rect.min.y + rect.height() * frac;
        (
            Rect::from_min_max(rect.min, pos2(rect.max.x, y)),
            Rect::from_min_max(pos2(rect.min.x, y), rect.max),
        )
    };
    split_tiles(&values[..cut], offset, a, out);
    split_tiles(&values[cut..], offset + cut, b, out);
}

fn treemap(ui: &mut Ui, tiles: &[Mark], width: f32) {
    let (response, painter) =
        ui.allocate_painter(vec2(width, width * ASPECT), Sense::hover());
    let values: Vec<f64> = tiles.iter().map(|t| t.value).collect();
    let total: f64 = values.iter().sum();

    for (tile, rect) in tiles.iter().zip(treemap_layout(&values, response.rect)) {
        let rect = rect.shrink(1.5);
        painter.rect_filled(rect, 2.0, tile.color);
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            format!("{}\n{} ({:.1}%)", tile.label, tile.value, tile.value / total * 100.0),
            FontId::proportional(14.0),
            color::text_on(tile.color),
        );
    }
}

fn heatmap(ui: &mut Ui, labels: &[String], cells: &[Vec<Option<f64>>], width: f32) {
    const LEFT: f32 = 110.0;
    const TOP: f32 = 24.0;

    let n = labels.len();
    let side = (width - LEFT).max(120.0);
    let cell = side / n as f32;
    let text_color = ui.visuals().text_color();

    let (response, painter) = ui.allocate_painter(vec2(LEFT + side, TOP + side), Sense::hover());
    let origin: Pos2 = response.rect.min + vec2(LEFT, TOP);

    for (i, row) in cells.iter().enumerate() {
        for (j, value) in row.iter().enumerate() {
            let rect = Rect::from_min_size(
                origin + vec2(j as f32 * cell, i as f32 * cell),
                Vec2::splat(cell),
            )
            .shrink(1.0);
            let fill = value.map_or(Color32::DARK_GRAY, color::diverging);
            let text = value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"));
            painter.rect_filled(rect, 0.0, fill);
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                text,
                FontId::proportional(12.0),
                color::text_on(fill),
            );
        }
    }

    for (i, label) in labels.iter().enumerate() {
        let along = (i as f32 + 0.5) * cell;
        painter.text(
            pos2(origin.x - 6.0, origin.y + along),
            Align2::RIGHT_CENTER,
            label,
            FontId::proportional(12.0),
            text_color,
        );
        painter.text(
            pos2(origin.x + along, origin.y - 4.0),
            Align2::CENTER_BOTTOM,
            label,
            FontId::proportional(11.0),
            text_color,
        );
    }
}
