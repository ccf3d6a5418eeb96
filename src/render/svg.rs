use std::fmt::Write;
use super::format::{escape_html, format_usd};
use super::series::{ChartKind, ChartSeries};

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 240.0;
const PAD_LEFT: f64 = 64.0;
const PAD_RIGHT: f64 = 12.0;
const PAD_TOP: f64 = 12.0;
const PAD_BOTTOM: f64 = 36.0;
const GRID_LINES: usize = 4;

struct Plot {
    max: f64,
}

impl Plot {
    fn new(series: &ChartSeries) -> Self {
        // flat-zero series still get a usable axis
        let max = series.max_value();
        Self { max: if max > 0.0 { max } else { 1.0 } }
    }

    fn inner_width(&self) -> f64 {
        WIDTH - PAD_LEFT - PAD_RIGHT
    }

    fn inner_height(&self) -> f64 {
        HEIGHT - PAD_TOP - PAD_BOTTOM
    }

    fn y(&self, value: f64) -> f64 {
        let ratio = (value.max(0.0) / self.max).min(1.0);
        PAD_TOP + self.inner_height() * (1.0 - ratio)
    }

    fn baseline(&self) -> f64 {
        PAD_TOP + self.inner_height()
    }
}

/// Render a series as a standalone inline SVG element.
pub fn render_chart(series: &ChartSeries) -> String {
    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg class="chart" viewBox="0 0 {w} {h}" width="100%" role="img" aria-label="{title}">"#,
        w = WIDTH,
        h = HEIGHT,
        title = escape_html(&series.title),
    );

    if series.is_empty() {
        let _ = write!(
            svg,
            r#"<text class="empty" x="{}" y="{}" text-anchor="middle">No data</text></svg>"#,
            WIDTH / 2.0,
            HEIGHT / 2.0
        );
        return svg;
    }

    let plot = Plot::new(series);
    grid(&mut svg, &plot);
    match series.kind {
        ChartKind::Bar => bars(&mut svg, &plot, series),
        ChartKind::Line => line(&mut svg, &plot, series),
    }
    svg.push_str("</svg>");
    svg
}

fn grid(svg: &mut String, plot: &Plot) {
    for i in 0..=GRID_LINES {
        let value = plot.max * i as f64 / GRID_LINES as f64;
        let y = plot.y(value);
        let _ = write!(
            svg,
            r#"<line class="grid" x1="{x1}" y1="{y:.1}" x2="{x2}" y2="{y:.1}"/><text class="axis" x="{tx}" y="{ty:.1}" text-anchor="end">{label}</text>"#,
            x1 = PAD_LEFT,
            x2 = WIDTH - PAD_RIGHT,
            y = y,
            tx = PAD_LEFT - 6.0,
            ty = y + 4.0,
            label = format_usd(value),
        );
    }
}

fn bars(svg: &mut String, plot: &Plot, series: &ChartSeries) {
    let slot = plot.inner_width() / series.points.len() as f64;
    let bar_width = slot * 0.6;

    for (i, point) in series.points.iter().enumerate() {
        let x = PAD_LEFT + slot * i as f64 + (slot - bar_width) / 2.0;
        let y = plot.y(point.value);
        let _ = write!(
            svg,
            r#"<rect class="bar" x="{x:.1}" y="{y:.1}" width="{bw:.1}" height="{bh:.1}" fill="{color}"><title>{label}: {value}</title></rect><text class="axis" x="{lx:.1}" y="{ly:.1}" text-anchor="middle">{label}</text>"#,
            x = x,
            y = y,
            bw = bar_width,
            bh = plot.baseline() - y,
            color = series.color,
            label = escape_html(&point.label),
            value = format_usd(point.value),
            lx = x + bar_width / 2.0,
            ly = plot.baseline() + 16.0,
        );
    }
}

fn line_x(plot: &Plot, index: usize, len: usize) -> f64 {
    if len <= 1 {
        PAD_LEFT + plot.inner_width() / 2.0
    } else {
        PAD_LEFT + plot.inner_width() * index as f64 / (len - 1) as f64
    }
}

fn line(svg: &mut String, plot: &Plot, series: &ChartSeries) {
    let len = series.points.len();
    let coords: Vec<(f64, f64)> = series
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| (line_x(plot, i, len), plot.y(p.value)))
        .collect();

    let path = line_path(&coords);
    let (first_x, _) = coords[0];
    let (last_x, _) = coords[len - 1];
    let _ = write!(
        svg,
        r#"<path class="area" d="{path} L {lx:.1},{b:.1} L {fx:.1},{b:.1} Z" fill="{color}" opacity="0.15"/><path class="line" d="{path}" fill="none" stroke="{color}" stroke-width="2"/>"#,
        path = path,
        lx = last_x,
        fx = first_x,
        b = plot.baseline(),
        color = series.color,
    );

    if len == 1 {
        let (x, y) = coords[0];
        let _ = write!(svg, r#"<circle cx="{:.1}" cy="{:.1}" r="3" fill="{}"/>"#, x, y, series.color);
    }

    // first, middle and last tick labels keep the axis readable
    let mut ticks = vec![0, len / 2, len - 1];
    ticks.dedup();
    for i in ticks {
        let _ = write!(
            svg,
            r#"<text class="axis" x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
            coords[i].0,
            plot.baseline() + 16.0,
            escape_html(&series.points[i].label),
        );
    }
}

fn line_path(coords: &[(f64, f64)]) -> String {
    let points: Vec<String> = coords.iter().map(|(x, y)| format!("{:.1},{:.1}", x, y)).collect();
    format!("M {}", points.join(" L "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::series::{SeriesPoint, TOKEN_COLOR};

    fn series(kind: ChartKind, values: &[f64]) -> ChartSeries {
        ChartSeries {
            title: "Test <chart>".into(),
            color: TOKEN_COLOR,
            kind,
            points: values
                .iter()
                .enumerate()
                .map(|(i, v)| SeriesPoint { label: format!("P{}", i), value: *v })
                .collect(),
        }
    }

    #[test]
    fn empty_series_renders_placeholder() {
        let svg = render_chart(&series(ChartKind::Line, &[]));
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("No data"));
        assert!(!svg.contains("<path"));
    }

    #[test]
    fn bar_count_matches_points() {
        let svg = render_chart(&series(ChartKind::Bar, &[3.0, 2.0, 1.0]));
        assert_eq!(svg.matches("<rect").count(), 3);
        assert!(svg.contains("Test &lt;chart&gt;"));
    }

    #[test]
    fn line_has_one_vertex_per_point() {
        let svg = render_chart(&series(ChartKind::Line, &[1.0, 4.0, 2.0, 8.0]));
        let path = svg.split(r#"class="line" d=""#).nth(1).unwrap();
        let d = &path[..path.find('"').unwrap()];
        assert_eq!(d.matches(',').count(), 4);
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn single_point_line_gets_a_marker() {
        let svg = render_chart(&series(ChartKind::Line, &[5.0]));
        assert!(svg.contains("<circle"));
    }

    #[test]
    fn tallest_bar_reaches_top() {
        let plot = Plot::new(&series(ChartKind::Bar, &[10.0, 5.0]));
        assert_eq!(plot.y(10.0), PAD_TOP);
        assert_eq!(plot.y(0.0), plot.baseline());
    }
}
