//! Chart sink: draws a `ChartSpec` with ratatui widgets.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, Gauge, GraphType, Paragraph, Row, Table},
    Frame,
};

use crate::domain::chart::{
    BoxPlotChart, DistributionChart, Heatmap, PieChart, ScatterChart, SummaryView,
};
use crate::domain::stats::{BoxSummary, ColumnSummary};
use crate::domain::{format_number, ChartSpec};
use crate::tui::styles::MedicalTheme;

/// Draw a chart specification into `area`.
pub fn render_chart_spec(f: &mut Frame, area: Rect, spec: &ChartSpec) {
    match spec {
        ChartSpec::Summary(view) => render_summary(f, area, view),
        ChartSpec::Pie(pie) => render_pie(f, area, pie),
        ChartSpec::Distribution(dist) => render_distribution(f, area, dist),
        ChartSpec::Heatmap(heatmap) => render_heatmap(f, area, heatmap),
        ChartSpec::BoxPlot(chart) => render_box_plot(f, area, chart),
        ChartSpec::Scatter(chart) => render_scatter(f, area, chart),
    }
}

fn titled_block(title: &str) -> Block<'static> {
    Block::default()
        .title(Span::styled(format!(" {title} "), MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border())
}

fn render_summary(f: &mut Frame, area: Rect, view: &SummaryView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(view.head.len() as u16 + 3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let widths: Vec<Constraint> = view.columns.iter().map(|_| Constraint::Min(8)).collect();

    let head_header = Row::new(view.columns.iter().map(|c| Cell::from(c.clone())))
        .style(MedicalTheme::header());
    let head_rows = view
        .head
        .iter()
        .map(|row| Row::new(row.iter().map(|v| Cell::from(v.clone()))).style(MedicalTheme::text()));
    let head = Table::new(head_rows, widths.clone())
        .header(head_header)
        .block(titled_block(&format!("Top {} samples", view.head.len())));
    f.render_widget(head, chunks[0]);

    let mut stat_widths = vec![Constraint::Length(7)];
    stat_widths.extend(widths);
    let stats_header = Row::new(
        std::iter::once(Cell::from(""))
            .chain(view.statistics.iter().map(|s| Cell::from(s.name.clone()))),
    )
    .style(MedicalTheme::header());
    let stats_rows = STAT_ROWS.iter().map(|label| {
        Row::new(
            std::iter::once(Cell::from(*label).style(MedicalTheme::text_secondary())).chain(
                view.statistics
                    .iter()
                    .map(|s| Cell::from(stat_value(label, s).unwrap_or_else(|| "NaN".to_string()))),
            ),
        )
        .style(MedicalTheme::text())
    });
    let stats = Table::new(stats_rows, stat_widths)
        .header(stats_header)
        .block(titled_block("Stats report of dataset"));
    f.render_widget(stats, chunks[1]);

    let shape = Paragraph::new(Line::from(vec![
        Span::styled(" Shape of dataset: ", MedicalTheme::text_secondary()),
        Span::styled(
            format!("({}, {})", view.shape.0, view.shape.1),
            MedicalTheme::text(),
        ),
    ]));
    f.render_widget(shape, chunks[2]);
}

const STAT_ROWS: [&str; 11] = [
    "count", "unique", "top", "freq", "mean", "std", "min", "25%", "50%", "75%", "max",
];

fn stat_value(row: &str, s: &ColumnSummary) -> Option<String> {
    let num = |x: Option<f64>| x.map(format_number);
    match row {
        "count" => Some(s.count.to_string()),
        "unique" => s.unique.map(|u| u.to_string()),
        "top" => s.top.clone(),
        "freq" => s.freq.map(|u| u.to_string()),
        "mean" => num(s.mean),
        "std" => num(s.std),
        "min" => num(s.min),
        "25%" => num(s.q25),
        "50%" => num(s.median),
        "75%" => num(s.q75),
        "max" => num(s.max),
        _ => None,
    }
}

fn render_pie(f: &mut Frame, area: Rect, pie: &PieChart) {
    let block = titled_block(&pie.title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let constraints: Vec<Constraint> = pie
        .slices
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(inner);

    for (i, slice) in pie.slices.iter().enumerate() {
        let color = MedicalTheme::chart_color(slice.color);
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .title(Span::styled(format!(" {} ", slice.label), Style::default().fg(color)))
                    .borders(Borders::ALL)
                    .border_style(MedicalTheme::border()),
            )
            .gauge_style(Style::default().fg(color))
            .ratio(slice.fraction.clamp(0.0, 1.0))
            .label(format!("{} ({:.1}%)", slice.count, slice.fraction * 100.0));
        f.render_widget(gauge, chunks[i]);
    }
}

/// Axis bounds over a point cloud with relative padding; never zero-width.
fn bounds(points: impl Iterator<Item = f64>, padding: f64) -> [f64; 2] {
    let (lo, hi) = points.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return [0.0, 1.0];
    }
    let pad = ((hi - lo) * padding).max(1e-3);
    [lo - pad, hi + pad]
}

fn axis_labels(b: [f64; 2]) -> Vec<Span<'static>> {
    vec![
        Span::from(format_number((b[0] * 100.0).round() / 100.0)),
        Span::from(format_number(((b[0] + b[1]) / 2.0 * 100.0).round() / 100.0)),
        Span::from(format_number((b[1] * 100.0).round() / 100.0)),
    ]
}

fn render_distribution(f: &mut Frame, area: Rect, dist: &DistributionChart) {
    let bars: Vec<(f64, f64)> = dist
        .bins
        .iter()
        .map(|b| ((b.start + b.end) / 2.0, b.density))
        .collect();

    let x = bounds(
        dist.bins
            .iter()
            .flat_map(|b| [b.start, b.end])
            .chain(dist.density_curve.iter().map(|(x, _)| *x)),
        0.02,
    );
    let y_max = bars
        .iter()
        .chain(dist.density_curve.iter())
        .map(|(_, y)| *y)
        .fold(0.0, f64::max);
    let y = [0.0, if y_max > 0.0 { y_max * 1.1 } else { 1.0 }];

    let datasets = vec![
        Dataset::default()
            .name(dist.feature.clone())
            .marker(Marker::HalfBlock)
            .graph_type(GraphType::Bar)
            .style(Style::default().fg(MedicalTheme::PRIMARY))
            .data(&bars),
        Dataset::default()
            .name("density")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(MedicalTheme::WARNING))
            .data(&dist.density_curve),
    ];

    let chart = Chart::new(datasets)
        .block(titled_block(&format!(
            "{} (bin size {})",
            dist.title,
            format_number(dist.bin_size)
        )))
        .x_axis(
            Axis::default()
                .title(Span::styled(dist.feature.clone(), MedicalTheme::text_muted()))
                .style(MedicalTheme::text_muted())
                .bounds(x)
                .labels(axis_labels(x)),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("density", MedicalTheme::text_muted()))
                .style(MedicalTheme::text_muted())
                .bounds(y)
                .labels(vec![
                    Span::from("0"),
                    Span::from(format!("{:.4}", y[1] / 2.0)),
                    Span::from(format!("{:.4}", y[1])),
                ]),
        );
    f.render_widget(chart, area);
}

fn render_heatmap(f: &mut Frame, area: Rect, heatmap: &Heatmap) {
    let header = Row::new(
        std::iter::once(Cell::from("")).chain(heatmap.labels.iter().map(|l| Cell::from(l.clone()))),
    )
    .style(MedicalTheme::header());

    let rows = heatmap.labels.iter().enumerate().map(|(r, label)| {
        Row::new(
            std::iter::once(Cell::from(label.clone()).style(MedicalTheme::text_secondary())).chain(
                (0..heatmap.labels.len()).map(|c| {
                    let value = heatmap.get(r, c);
                    let text = value.map_or_else(|| "NaN".to_string(), |v| format!("{v:.2}"));
                    Cell::from(text).style(
                        Style::default()
                            .bg(MedicalTheme::diverging(value))
                            .fg(MedicalTheme::diverging_text(value)),
                    )
                }),
            ),
        )
    });

    let widths: Vec<Constraint> = std::iter::once(Constraint::Length(26))
        .chain(heatmap.labels.iter().map(|_| Constraint::Min(6)))
        .collect();

    let table = Table::new(rows, widths)
        .header(header)
        .block(titled_block(&heatmap.title));
    f.render_widget(table, area);
}

/// One-line box plot scaled to `[lo, hi]` over `width` cells.
pub(crate) fn box_line(summary: &BoxSummary, lo: f64, hi: f64, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let span = (hi - lo).max(f64::EPSILON);
    let pos = |v: f64| ((((v - lo) / span) * (width - 1) as f64).round() as usize).min(width - 1);

    let mut cells = vec![' '; width];
    for c in cells
        .iter_mut()
        .take(pos(summary.upper_whisker) + 1)
        .skip(pos(summary.lower_whisker))
    {
        *c = '─';
    }
    for c in cells
        .iter_mut()
        .take(pos(summary.q3) + 1)
        .skip(pos(summary.q1))
    {
        *c = '█';
    }
    cells[pos(summary.lower_whisker)] = '├';
    cells[pos(summary.upper_whisker)] = '┤';
    cells[pos(summary.median)] = '┃';
    for &o in &summary.outliers {
        cells[pos(o)] = '•';
    }
    cells.into_iter().collect()
}

fn render_box_plot(f: &mut Frame, area: Rect, chart: &BoxPlotChart) {
    let block = titled_block(&chart.title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [lo, hi] = bounds(
        chart.groups.iter().flat_map(|g| {
            let s = &g.summary;
            [s.lower_whisker, s.upper_whisker]
                .into_iter()
                .chain(s.outliers.iter().copied())
        }),
        0.0,
    );
    let label_width = 4;
    let width = (inner.width as usize).saturating_sub(label_width + 2);

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} ({} on the y axis)", chart.x_title, chart.feature),
            MedicalTheme::text_secondary(),
        )),
        Line::from(""),
    ];
    for group in &chart.groups {
        let style = Style::default().fg(MedicalTheme::chart_color(group.color));
        let s = &group.summary;
        lines.push(Line::from(vec![
            Span::styled(format!("{:>label_width$} ", group.name), style),
            Span::styled(box_line(s, lo, hi, width), style),
        ]));
        lines.push(Line::from(Span::styled(
            format!(
                "{:>label_width$} n={} q1={} median={} q3={} whiskers=[{}, {}] outliers={}",
                "",
                s.count,
                format_number(s.q1),
                format_number(s.median),
                format_number(s.q3),
                format_number(s.lower_whisker),
                format_number(s.upper_whisker),
                s.outliers.len()
            ),
            MedicalTheme::text_muted(),
        )));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        format!(
            "{:>label_width$} {}{:>w$}",
            "",
            format_number(lo),
            format_number(hi),
            w = width.saturating_sub(format_number(lo).len())
        ),
        MedicalTheme::text_muted(),
    )));

    f.render_widget(Paragraph::new(lines), inner);
}

fn render_scatter(f: &mut Frame, area: Rect, chart: &ScatterChart) {
    let x = bounds(
        chart.series.iter().flat_map(|s| s.points.iter().map(|(x, _)| *x)),
        0.05,
    );
    let y = bounds(
        chart.series.iter().flat_map(|s| s.points.iter().map(|(_, y)| *y)),
        0.05,
    );

    let datasets: Vec<Dataset> = chart
        .series
        .iter()
        .map(|s| {
            Dataset::default()
                .name(format!("{} {}", chart.legend_title, s.label))
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(MedicalTheme::chart_color(s.color)))
                .data(&s.points)
        })
        .collect();

    let chart_widget = Chart::new(datasets)
        .block(titled_block(&chart.title))
        .x_axis(
            Axis::default()
                .title(Span::styled(chart.x_title.clone(), MedicalTheme::text_muted()))
                .style(MedicalTheme::text_muted())
                .bounds(x)
                .labels(axis_labels(x)),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(chart.y_title.clone(), MedicalTheme::text_muted()))
                .style(MedicalTheme::text_muted())
                .bounds(y)
                .labels(axis_labels(y)),
        );
    f.render_widget(chart_widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> BoxSummary {
        BoxSummary {
            count: 5,
            q1: 2.0,
            median: 3.0,
            q3: 4.0,
            lower_whisker: 1.0,
            upper_whisker: 5.0,
            outliers: vec![10.0],
        }
    }

    #[test]
    fn test_box_line_layout() {
        let line = box_line(&summary(), 0.0, 10.0, 11);
        assert_eq!(line.chars().count(), 11);
        assert_eq!(line, " ├█┃█┤    •");
    }

    #[test]
    fn test_box_line_zero_width() {
        assert_eq!(box_line(&summary(), 0.0, 10.0, 0), "");
    }

    #[test]
    fn test_bounds_never_empty() {
        assert_eq!(bounds(std::iter::empty(), 0.1), [0.0, 1.0]);
        let [lo, hi] = bounds([3.0, 3.0].into_iter(), 0.1);
        assert!(lo < 3.0 && hi > 3.0);
    }
}
