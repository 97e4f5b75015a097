// fund_report_core/src/plot.rs

//! Chart rendering.
//!
//! A [`Figure`] owns everything one chart needs: size, series and the
//! optional leverage panel. Nothing is shared between figures, so every
//! report can render its own charts independently.
//!
//! Series are positioned by date, not by index, so funds covering different
//! ranges can share one chart.

use std::path::Path;

use chrono::NaiveDate;
use image::{ImageError, ImageFormat, Rgb, RgbImage};

use crate::error::ComputationError;
use crate::html::escape;
use crate::series::{self, ValueSeries};

const LEFT_MARGIN: f64 = 72.0;
const RIGHT_MARGIN: f64 = 24.0;
const TOP_MARGIN: f64 = 36.0;
const BOTTOM_MARGIN: f64 = 72.0;
const PANEL_GAP: f64 = 32.0;
const DATE_TICKS: usize = 6;
const VALUE_TICKS: usize = 5;
const DATE_LABEL_FORMAT: &str = "%b %d %Y";

const STRATEGY_COLOR: &str = "#348dc1";
const BENCHMARK_COLOR: &str = "#ff9933";
const PALETTE: [&str; 6] = [STRATEGY_COLOR, BENCHMARK_COLOR, "#4fa487", "#af4b64", "#8c8c8c", "#9467bd"];
const LEVERAGE_COLOR: &str = "#af4b64";
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

#[derive(Debug, Clone)]
struct DatedSeries {
    label: Option<String>,
    color: &'static str,
    points: Vec<(NaiveDate, f64)>,
}

#[derive(Debug, Clone)]
struct LegendEntry {
    label: String,
    color: &'static str,
}

/// Pixel box of one panel plus the data range it maps.
#[derive(Debug, Clone, Copy)]
struct Panel {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
    start: NaiveDate,
    span_days: f64,
    min: f64,
    max: f64,
}

impl Panel {
    fn x(&self, date: NaiveDate) -> f64 {
        if self.span_days == 0.0 {
            return (self.left + self.right) / 2.0;
        }
        let offset = (date - self.start).num_days() as f64;
        self.left + offset / self.span_days * (self.right - self.left)
    }

    fn y(&self, value: f64) -> f64 {
        let norm = (value - self.min) / (self.max - self.min);
        self.bottom - norm * (self.bottom - self.top)
    }
}

/// Panels and ticks shared by the SVG and PNG renderers.
struct Layout {
    main: Panel,
    main_ticks: Vec<f64>,
    leverage: Option<(Panel, Vec<f64>)>,
    date_axis: Panel,
    end: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct Figure {
    width: f64,
    height: f64,
    title: Option<String>,
    series: Vec<DatedSeries>,
    leverage_panel: bool,
    leverage_title: Option<String>,
    leverage: Option<DatedSeries>,
}

impl Figure {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f64,
            height: height as f64,
            title: None,
            series: Vec::new(),
            leverage_panel: false,
            leverage_title: None,
            leverage: None,
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Reserves a lower panel for leverage; the main panel keeps 3/4 of the height.
    pub fn with_leverage_panel(mut self) -> Self {
        self.leverage_panel = true;
        self
    }

    /// Adds a line. Values are plotted as given; see [`Figure::add_normalized`].
    pub fn add_series(&mut self, label: Option<&str>, dates: &[NaiveDate], values: &[f64]) -> &mut Self {
        let color = PALETTE[self.series.len() % PALETTE.len()];
        self.series.push(DatedSeries {
            label: label.map(str::to_string),
            color,
            points: dates.iter().copied().zip(values.iter().copied()).collect(),
        });
        self
    }

    /// Adds a line scaled so that its first value equals `notional`.
    pub fn add_normalized(
        &mut self,
        label: Option<&str>,
        values: &ValueSeries,
        notional: f64,
    ) -> Result<&mut Self, ComputationError> {
        let normalized = series::normalize(values.values(), notional)?;
        Ok(self.add_series(label, values.dates(), &normalized))
    }

    /// Plots leverage in the lower panel, enabling it if needed.
    pub fn set_leverage(&mut self, title: &str, leverage: &ValueSeries) -> &mut Self {
        self.leverage_panel = true;
        self.leverage_title = Some(format!("{} Leverage", title));
        self.leverage = Some(DatedSeries {
            label: Some("Leverage".to_string()),
            color: LEVERAGE_COLOR,
            points: leverage.dates().iter().copied().zip(leverage.values().iter().copied()).collect(),
        });
        self
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// Labelled vector rendering of the chart.
    pub fn render(&self) -> String {
        let mut svg = svg_header(self.width, self.height);

        if let Some(title) = &self.title {
            svg.push_str(&format!(
                r##"<text x="{x:.2}" y="{y:.2}" text-anchor="middle" font-size="13" fill="#333">{title}</text>"##,
                x = self.width / 2.0,
                y = TOP_MARGIN / 2.0 + 4.0,
                title = escape(title),
            ));
        }

        let Some(layout) = self.layout() else {
            svg.push_str(svg_footer());
            return svg;
        };

        draw_value_axis(&mut svg, &layout.main, &layout.main_ticks, "Fund Value");
        let mut legend = Vec::new();
        for series in &self.series {
            draw_series(&mut svg, &layout.main, series);
            if let Some(label) = &series.label {
                legend.push(LegendEntry { label: label.clone(), color: series.color });
            }
        }
        draw_line_legend(&mut svg, &layout.main, &legend);

        if let Some((panel, ticks)) = &layout.leverage {
            draw_value_axis(&mut svg, panel, ticks, "Leverage");

            if let Some(title) = &self.leverage_title {
                svg.push_str(&format!(
                    r##"<text x="{x:.2}" y="{y:.2}" text-anchor="middle" font-size="11" fill="#333">{title}</text>"##,
                    x = (panel.left + panel.right) / 2.0,
                    y = panel.top - 8.0,
                    title = escape(title),
                ));
            }
            if let Some(leverage) = &self.leverage {
                draw_series(&mut svg, panel, leverage);
                let entry = LegendEntry { label: "Leverage".to_string(), color: leverage.color };
                draw_line_legend(&mut svg, panel, &[entry]);
            }
        }

        add_date_axis(&mut svg, &layout.date_axis, layout.end);

        svg.push_str(svg_footer());
        svg
    }

    /// Raster rendering of the chart: frames, grid, lines and legend swatches.
    pub fn render_png(&self) -> RgbImage {
        let mut img = RgbImage::from_pixel(self.width as u32, self.height as u32, WHITE);
        let Some(layout) = self.layout() else {
            return img;
        };

        draw_frame_png(&mut img, &layout.main, &layout.main_ticks);
        for series in &self.series {
            draw_series_png(&mut img, &layout.main, series);
        }
        let swatches: Vec<_> = self.series.iter().filter(|s| s.label.is_some()).map(|s| s.color).collect();
        draw_legend_png(&mut img, &layout.main, &swatches);

        if let Some((panel, ticks)) = &layout.leverage {
            draw_frame_png(&mut img, panel, ticks);
            if let Some(leverage) = &self.leverage {
                draw_series_png(&mut img, panel, leverage);
                draw_legend_png(&mut img, panel, &[leverage.color]);
            }
        }

        for date in date_ticks(layout.date_axis.start, layout.end) {
            let x = layout.date_axis.x(date);
            let y = layout.date_axis.bottom;
            draw_segment(&mut img, (x, y), (x, y + 4.0), hex_color("#cccccc"));
        }

        img
    }

    /// Writes the PNG to `path` and the labelled SVG next to it.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ImageError> {
        save_chart(path, &self.render_png(), &self.render())
    }

    fn layout(&self) -> Option<Layout> {
        let (start, end) = self.date_range()?;

        let left = LEFT_MARGIN;
        let right = self.width - RIGHT_MARGIN;
        let top = TOP_MARGIN;
        let bottom = self.height - BOTTOM_MARGIN;
        let span_days = (end - start).num_days() as f64;

        let (main_bottom, leverage_top) = if self.leverage_panel {
            let available = bottom - top - PANEL_GAP;
            let main_bottom = top + available * 0.75;
            (main_bottom, main_bottom + PANEL_GAP)
        } else {
            (bottom, bottom)
        };

        let main_values = self.series.iter().flat_map(|s| s.points.iter().map(|(_, v)| *v));
        let (min, max) = extent(main_values).unwrap_or((0.0, 1.0));
        let main = Panel { left, right, top, bottom: main_bottom, start, span_days, min, max };

        let leverage = self.leverage_panel.then(|| {
            let values: Vec<f64> = self
                .leverage
                .iter()
                .flat_map(|s| s.points.iter().map(|(_, v)| *v))
                .collect();
            let tick_values: Vec<f64> = leverage_ticks(&values).map(|t| t.to_vec()).unwrap_or_default();
            let (min, max) = extent(values.iter().copied().chain(tick_values.iter().copied())).unwrap_or((0.0, 1.0));
            let panel = Panel { left, right, top: leverage_top, bottom, start, span_days, min, max };
            let ticks = if tick_values.is_empty() { even_ticks(min, max, 3) } else { tick_values };
            (panel, ticks)
        });

        Some(Layout {
            main_ticks: even_ticks(min, max, VALUE_TICKS),
            date_axis: Panel { bottom, ..main },
            main,
            leverage,
            end,
        })
    }

    fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let dates = self
            .series
            .iter()
            .chain(self.leverage.iter())
            .flat_map(|s| s.points.iter().map(|(d, _)| *d));

        let (mut start, mut end) = (None::<NaiveDate>, None::<NaiveDate>);
        for date in dates {
            start = Some(start.map_or(date, |s| s.min(date)));
            end = Some(end.map_or(date, |e| e.max(date)));
        }
        start.zip(end)
    }
}

/// Three tick values for a leverage axis: just below the minimum, the
/// midpoint and just above the maximum, rounded to the magnitude of the
/// maximum (`-(round(log10(max)) - 1)` decimals).
pub fn leverage_ticks(values: &[f64]) -> Option<[f64; 3]> {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !min.is_finite() || !max.is_finite() || max <= 0.0 {
        return None;
    }

    let digits = -(max.log10().round() as i32 - 1);
    Some([
        round_to(min * 0.9, digits),
        round_to((max + min) / 2.0, digits),
        round_to(max * 1.1, digits),
    ])
}

/// Rounds to `digits` decimals; negative `digits` round to tens, hundreds, ...
pub fn round_to(value: f64, digits: i32) -> f64 {
    if digits >= 0 {
        let factor = 10f64.powi(digits);
        (value * factor).round() / factor
    } else {
        let factor = 10f64.powi(-digits);
        (value / factor).round() * factor
    }
}

/// Equal-width bins over the finite values.
struct Bins {
    min: f64,
    max: f64,
    counts: Vec<usize>,
}

impl Bins {
    fn new(values: &[f64], bins: usize) -> Option<Self> {
        let (min, max) = extent(values.iter().copied())?;
        let bins = bins.clamp(5, 50);
        let bin_width = (max - min) / bins as f64;
        let mut counts = vec![0usize; bins];
        for value in values.iter().filter(|v| v.is_finite()) {
            let idx = ((value - min) / bin_width).floor().max(0.0) as usize;
            counts[idx.min(bins - 1)] += 1;
        }
        Some(Self { min, max, counts })
    }

    fn max_count(&self) -> f64 {
        self.counts.iter().copied().max().unwrap_or(0).max(1) as f64
    }

    /// `(left, top, right)` of each bar inside the plot box; the bars stand on `bottom`.
    fn bars(&self, left: f64, right: f64, top: f64, bottom: f64) -> Vec<(f64, f64, f64)> {
        let slot = (right - left) / self.counts.len() as f64;
        let max_count = self.max_count();
        self.counts
            .iter()
            .enumerate()
            .map(|(i, count)| {
                let bar_left = left + i as f64 * slot + slot * 0.1;
                let bar_top = bottom - *count as f64 / max_count * (bottom - top);
                (bar_left, bar_top, bar_left + slot * 0.8)
            })
            .collect()
    }
}

/// Histogram of `values` as a standalone SVG document.
/// Bin edges are labelled in percent.
pub fn render_histogram(values: &[f64], bins: usize, width: u32, height: u32, title: &str) -> String {
    let (width, height) = (width as f64, height as f64);
    let mut svg = svg_header(width, height);
    svg.push_str(&format!(
        r##"<text x="{x:.2}" y="{y:.2}" text-anchor="middle" font-size="13" fill="#333">{title}</text>"##,
        x = width / 2.0,
        y = TOP_MARGIN / 2.0 + 4.0,
        title = escape(title),
    ));

    let Some(bins) = Bins::new(values, bins) else {
        svg.push_str(svg_footer());
        return svg;
    };

    let left = LEFT_MARGIN;
    let right = width - RIGHT_MARGIN;
    let top = TOP_MARGIN;
    let bottom = height - BOTTOM_MARGIN;

    for (x, y, bar_right) in bins.bars(left, right, top, bottom) {
        svg.push_str(&format!(
            r##"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="{color}" />"##,
            x = x,
            y = y,
            w = bar_right - x,
            h = bottom - y,
            color = STRATEGY_COLOR,
        ));
    }

    let max_count = bins.max_count();
    let panel = histogram_panel(left, right, top, bottom, max_count);
    draw_value_axis(&mut svg, &panel, &even_ticks(0.0, max_count, VALUE_TICKS), "Funds");

    for (x, value) in [(left, bins.min), (right, bins.max)] {
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle">{label:.1}%</text>"#,
            x = x,
            y = bottom + 16.0,
            label = value * 100.0,
        ));
    }
    svg.push_str(&format!(
        r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle">Total Return</text>"#,
        x = (left + right) / 2.0,
        y = bottom + 36.0,
    ));

    svg.push_str(svg_footer());
    svg
}

/// Raster counterpart of [`render_histogram`].
pub fn render_histogram_png(values: &[f64], bins: usize, width: u32, height: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, WHITE);
    let Some(bins) = Bins::new(values, bins) else {
        return img;
    };

    let left = LEFT_MARGIN;
    let right = width as f64 - RIGHT_MARGIN;
    let top = TOP_MARGIN;
    let bottom = height as f64 - BOTTOM_MARGIN;

    let max_count = bins.max_count();
    let panel = histogram_panel(left, right, top, bottom, max_count);
    draw_frame_png(&mut img, &panel, &even_ticks(0.0, max_count, VALUE_TICKS));

    let color = hex_color(STRATEGY_COLOR);
    for (x, y, bar_right) in bins.bars(left, right, top, bottom) {
        fill_rect(&mut img, x, y, bar_right, bottom, color);
    }

    img
}

/// Writes `image` as PNG to `path` and `svg` to the same path with an `.svg` extension.
pub fn save_chart<P: AsRef<Path>>(path: P, image: &RgbImage, svg: &str) -> Result<(), ImageError> {
    let path = path.as_ref();
    image.save_with_format(path, ImageFormat::Png)?;
    std::fs::write(path.with_extension("svg"), svg).map_err(ImageError::IoError)
}

fn histogram_panel(left: f64, right: f64, top: f64, bottom: f64, max_count: f64) -> Panel {
    Panel {
        left,
        right,
        top,
        bottom,
        start: NaiveDate::MIN,
        span_days: 0.0,
        min: 0.0,
        max: max_count,
    }
}

fn svg_header(width: f64, height: f64) -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><style>text{{font-family:Arial,sans-serif;font-size:10px;fill:#666}}</style><rect width="100%" height="100%" fill="#ffffff" />"##,
        w = width,
        h = height
    )
}

fn svg_footer() -> &'static str {
    "</svg>"
}

fn extent<I: Iterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    let (mut min_v, mut max_v) = (f64::INFINITY, f64::NEG_INFINITY);
    for value in values.filter(|v| v.is_finite()) {
        min_v = min_v.min(value);
        max_v = max_v.max(value);
    }

    if !min_v.is_finite() || !max_v.is_finite() {
        return None;
    }

    if min_v == max_v {
        let adjust = if min_v == 0.0 { 1.0 } else { min_v.abs() * 0.1 }; // widen flat ranges
        min_v -= adjust;
        max_v += adjust;
    }

    Some((min_v, max_v))
}

fn even_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    let steps = count.max(2) - 1;
    (0..=steps)
        .map(|i| min + (max - min) * i as f64 / steps as f64)
        .collect()
}

fn format_tick(value: f64, range: f64) -> String {
    if range >= 10.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

fn draw_series(svg: &mut String, panel: &Panel, series: &DatedSeries) {
    let coords: Vec<String> = series
        .points
        .iter()
        .filter(|(_, value)| value.is_finite())
        .map(|(date, value)| format!("{:.2},{:.2}", panel.x(*date), panel.y(*value)))
        .collect();

    if coords.is_empty() {
        return;
    }

    svg.push_str(&format!(
        r#"<polyline fill="none" stroke="{stroke}" stroke-width="1.5" points="{coords}" />"#,
        stroke = series.color,
        coords = coords.join(" "),
    ));
}

fn draw_value_axis(svg: &mut String, panel: &Panel, ticks: &[f64], label: &str) {
    svg.push_str(&format!(
        r##"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="none" stroke="#000" stroke-width="1" />"##,
        x = panel.left,
        y = panel.top,
        w = panel.right - panel.left,
        h = panel.bottom - panel.top,
    ));

    let range = panel.max - panel.min;
    for tick in ticks {
        let y = panel.y(*tick);
        svg.push_str(&format!(
            r##"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="#dddddd" stroke-width="0.5" />"##,
            x1 = panel.left,
            x2 = panel.right,
            y = y,
        ));
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="end">{label}</text>"#,
            x = panel.left - 6.0,
            y = y + 3.0,
            label = format_tick(*tick, range),
        ));
    }

    let x = 16.0;
    let y = (panel.top + panel.bottom) / 2.0;
    svg.push_str(&format!(
        r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle" transform="rotate(-90 {x:.2} {y:.2})">{label}</text>"#,
        x = x,
        y = y,
        label = escape(label),
    ));
}

fn date_ticks(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let total = (end - start).num_days();
    let ticks = if total == 0 { 1 } else { DATE_TICKS };

    (0..ticks)
        .map(|i| {
            let offset = if ticks == 1 { 0 } else { total * i as i64 / (ticks - 1) as i64 };
            start + chrono::Duration::days(offset)
        })
        .collect()
}

fn add_date_axis(svg: &mut String, panel: &Panel, end: NaiveDate) {
    for date in date_ticks(panel.start, end) {
        let x = panel.x(date);
        let y = panel.bottom + 14.0;

        svg.push_str(&format!(
            r##"<line x1="{x:.2}" y1="{y1:.2}" x2="{x:.2}" y2="{y2:.2}" stroke="#ccc" stroke-width="1" />"##,
            x = x,
            y1 = panel.bottom,
            y2 = panel.bottom + 4.0,
        ));
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="end" transform="rotate(-30 {x:.2} {y:.2})">{label}</text>"#,
            x = x,
            y = y,
            label = date.format(DATE_LABEL_FORMAT),
        ));
    }

    svg.push_str(&format!(
        r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle">Date</text>"#,
        x = (panel.left + panel.right) / 2.0,
        y = panel.bottom + BOTTOM_MARGIN - 10.0,
    ));
}

fn draw_line_legend(svg: &mut String, panel: &Panel, entries: &[LegendEntry]) {
    let x = panel.left + 10.0;
    let mut y = panel.top + 14.0;
    for entry in entries {
        svg.push_str(&format!(
            r##"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="{color}" stroke-width="1.5" />"##,
            x1 = x,
            x2 = x + 20.0,
            y = y - 4.0,
            color = entry.color,
        ));
        svg.push_str(&format!(
            r##"<text x="{x:.2}" y="{y:.2}" text-anchor="start" fill="#333">{label}</text>"##,
            x = x + 26.0,
            y = y,
            label = escape(&entry.label),
        ));
        y += 16.0;
    }
}

fn hex_color(hex: &str) -> Rgb<u8> {
    let channel = |at: usize| {
        hex.get(at..at + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
            .unwrap_or(0)
    };
    Rgb([channel(1), channel(3), channel(5)])
}

fn put(img: &mut RgbImage, x: f64, y: f64, color: Rgb<u8>) {
    if x < 0.0 || y < 0.0 {
        return;
    }
    let (px, py) = (x.round() as u32, y.round() as u32);
    if px < img.width() && py < img.height() {
        img.put_pixel(px, py, color);
    }
}

fn draw_segment(img: &mut RgbImage, from: (f64, f64), to: (f64, f64), color: Rgb<u8>) {
    let steps = (to.0 - from.0).abs().max((to.1 - from.1).abs()).ceil().max(1.0) as usize;
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        put(img, from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t, color);
    }
}

fn fill_rect(img: &mut RgbImage, left: f64, top: f64, right: f64, bottom: f64, color: Rgb<u8>) {
    let mut y = top.round();
    while y <= bottom.round() {
        draw_segment(img, (left, y), (right, y), color);
        y += 1.0;
    }
}

fn draw_frame_png(img: &mut RgbImage, panel: &Panel, ticks: &[f64]) {
    let grid = hex_color("#dddddd");
    for tick in ticks {
        let y = panel.y(*tick);
        draw_segment(img, (panel.left, y), (panel.right, y), grid);
    }

    let frame = hex_color("#000000");
    let corners = [
        (panel.left, panel.top),
        (panel.right, panel.top),
        (panel.right, panel.bottom),
        (panel.left, panel.bottom),
    ];
    for (i, corner) in corners.iter().enumerate() {
        draw_segment(img, *corner, corners[(i + 1) % corners.len()], frame);
    }
}

fn draw_series_png(img: &mut RgbImage, panel: &Panel, series: &DatedSeries) {
    let color = hex_color(series.color);
    let points: Vec<(f64, f64)> = series
        .points
        .iter()
        .filter(|(_, value)| value.is_finite())
        .map(|(date, value)| (panel.x(*date), panel.y(*value)))
        .collect();

    if let [only] = points.as_slice() {
        put(img, only.0, only.1, color);
    }
    for pair in points.windows(2) {
        draw_segment(img, pair[0], pair[1], color);
        draw_segment(img, (pair[0].0, pair[0].1 + 1.0), (pair[1].0, pair[1].1 + 1.0), color); // 2px stroke
    }
}

fn draw_legend_png(img: &mut RgbImage, panel: &Panel, colors: &[&str]) {
    let x = panel.left + 10.0;
    let mut y = panel.top + 10.0;
    for color in colors {
        fill_rect(img, x, y - 1.0, x + 20.0, y + 1.0, hex_color(color));
        y += 16.0;
    }
}
