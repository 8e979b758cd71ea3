//! Horizontal SVG bar chart from one column pair of a CSV.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::constants::{COL_FILM_NAME, COL_GROSS_USD};
use crate::csv::CsvTable;
use crate::error::{Result, ScraperError};
use crate::normalize::parse_display_amount;

const WIDTH: f64 = 960.0;
const LABEL_WIDTH: f64 = 280.0;
const VALUE_WIDTH: f64 = 90.0;
const BAR_HEIGHT: f64 = 26.0;
const BAR_GAP: f64 = 8.0;
const TOP_MARGIN: f64 = 56.0;
const BOTTOM_MARGIN: f64 = 24.0;

#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub label_column: String,
    pub value_column: String,
    pub top: usize,
    pub title: String,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            label_column: COL_FILM_NAME.to_string(),
            value_column: COL_GROSS_USD.to_string(),
            top: 10,
            title: "Top Grossing Films Worldwide".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

fn require_column(table: &CsvTable, name: &str) -> Result<usize> {
    table
        .column_index(name)
        .ok_or_else(|| ScraperError::MissingColumn {
            field: name.to_string(),
            headers: table.headers.clone(),
        })
}

/// Highest `top` bars, rows whose value does not parse skipped.
pub fn collect_bars(table: &CsvTable, options: &ChartOptions) -> Result<Vec<Bar>> {
    let label_col = require_column(table, &options.label_column)?;
    let value_col = require_column(table, &options.value_column)?;

    let mut bars: Vec<Bar> = (0..table.len())
        .filter_map(|row| {
            let raw = table.cell(row, value_col);
            let value = parse_display_amount(raw);
            if value.is_none() {
                debug!(row, raw, "Skipping unparseable value");
            }
            Some(Bar {
                label: table.cell(row, label_col).to_string(),
                value: value?,
            })
        })
        .collect();

    bars.sort_by(|a, b| b.value.total_cmp(&a.value));
    bars.truncate(options.top);
    Ok(bars)
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// `2_923_706_026.0` → `$2.92B`
pub fn format_billions(value: f64) -> String {
    format!("${:.2}B", value / 1e9)
}

pub fn render_svg(bars: &[Bar], title: &str) -> String {
    let height = TOP_MARGIN + bars.len() as f64 * (BAR_HEIGHT + BAR_GAP) + BOTTOM_MARGIN;
    let plot_width = WIDTH - LABEL_WIDTH - VALUE_WIDTH;
    let max = bars.iter().map(|b| b.value).fold(0.0_f64, f64::max);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
        w = WIDTH,
        h = height
    );
    let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"  <text x="{}" y="32" font-size="20" font-weight="bold" text-anchor="middle">{}</text>"#,
        WIDTH / 2.0,
        escape_xml(title)
    );

    for (i, bar) in bars.iter().enumerate() {
        let y = TOP_MARGIN + i as f64 * (BAR_HEIGHT + BAR_GAP);
        let width = if max > 0.0 { bar.value / max * plot_width } else { 0.0 };
        let text_y = y + BAR_HEIGHT / 2.0 + 5.0;

        let _ = writeln!(
            svg,
            r#"  <text x="{}" y="{}" font-size="13" text-anchor="end">{}</text>"#,
            LABEL_WIDTH - 10.0,
            text_y,
            escape_xml(&bar.label)
        );
        let _ = writeln!(
            svg,
            r##"  <rect x="{}" y="{}" width="{:.1}" height="{}" fill="#4c72b0"/>"##,
            LABEL_WIDTH, y, width, BAR_HEIGHT
        );
        let _ = writeln!(
            svg,
            r#"  <text x="{:.1}" y="{}" font-size="12">{}</text>"#,
            LABEL_WIDTH + width + 6.0,
            text_y,
            format_billions(bar.value)
        );
    }

    svg.push_str("</svg>\n");
    svg
}

/// Read `input`, render the chart and write it to `output`. Returns the
/// number of bars drawn.
pub fn render_chart_file(input: &Path, output: &Path, options: &ChartOptions) -> Result<usize> {
    let table = CsvTable::from_path(input)?;
    let bars = collect_bars(&table, options)?;

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(output, render_svg(&bars, &options.title))?;

    info!(input = %input.display(), output = %output.display(), bars = bars.len(), "Rendered chart");
    Ok(bars.len())
}
