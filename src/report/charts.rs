// Charts built from the insights, and the sinks that draw them.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;

use crate::report::*;

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    /// The color group of the bar, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: u64,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<u64>,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ChartKind {
    Histogram {
        bins: Vec<Bin>,
    },
    Bar {
        bars: Vec<Bar>,
        horizontal: bool,
    },
    Heatmap {
        rows: Vec<String>,
        columns: Vec<String>,
        cells: Vec<Vec<u64>>,
    },
    #[serde(rename = "stackedBar")]
    StackedBar {
        categories: Vec<String>,
        #[serde(rename = "legendTitle")]
        legend_title: String,
        series: Vec<Series>,
    },
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct Chart {
    pub number: usize,
    pub title: String,
    #[serde(rename = "xLabel")]
    pub x_label: String,
    #[serde(rename = "yLabel")]
    pub y_label: String,
    #[serde(flatten)]
    pub kind: ChartKind,
}

impl Chart {
    /// A file name fragment derived from the title.
    pub fn slug(&self) -> String {
        let mut s = String::new();
        for c in self.title.chars() {
            if c.is_alphanumeric() {
                s.extend(c.to_lowercase());
            } else if !s.ends_with('-') && !s.is_empty() {
                s.push('-');
            }
        }
        s.trim_end_matches('-').to_string()
    }
}

fn count_bars(vc: &ValueCounts) -> Vec<Bar> {
    vc.counts
        .iter()
        .map(|(label, count)| Bar {
            label: label.clone(),
            value: *count as f64,
            group: None,
        })
        .collect()
}

/// The chart drawn for an insight, if the insight has one.
pub fn chart_for(insight: Insight, data: &InsightData) -> Option<Chart> {
    let chart = |x_label: &str, y_label: &str, kind: ChartKind| Chart {
        number: insight.number(),
        title: insight.title().to_string(),
        x_label: x_label.to_string(),
        y_label: y_label.to_string(),
        kind,
    };
    match (insight, data) {
        (Insight::MarginDistribution, InsightData::Histogram(bins)) => Some(chart(
            "Margin",
            "Frequency",
            ChartKind::Histogram {
                bins: bins
                    .iter()
                    .map(|b| Bin {
                        lower: b.lower,
                        upper: b.upper,
                        count: b.count,
                    })
                    .collect(),
            },
        )),
        (Insight::LeadingPartyChart, InsightData::Counts(vc)) => Some(chart(
            "Party",
            "Count",
            ChartKind::Bar {
                bars: count_bars(vc),
                horizontal: false,
            },
        )),
        (Insight::GenderDistribution, InsightData::Counts(vc)) => Some(chart(
            "Gender",
            "Count",
            ChartKind::Bar {
                bars: count_bars(vc),
                horizontal: false,
            },
        )),
        (Insight::PartiesByState, InsightData::CrossTab(ct)) => Some(chart(
            &ct.column_field,
            &ct.row_field,
            ChartKind::Heatmap {
                rows: ct.row_keys.clone(),
                columns: ct.column_keys.clone(),
                cells: ct.cells.clone(),
            },
        )),
        (Insight::SeatDistribution, InsightData::CrossTab(ct)) => Some(chart(
            &ct.row_field,
            "Number of Seats Won",
            ChartKind::StackedBar {
                categories: ct.row_keys.clone(),
                legend_title: ct.column_field.clone(),
                series: ct
                    .column_keys
                    .iter()
                    .enumerate()
                    .map(|(j, party)| Series {
                        name: party.clone(),
                        values: ct.cells.iter().map(|row| row[j]).collect(),
                    })
                    .collect(),
            },
        )),
        (Insight::TopTurnout, InsightData::Turnout(rows)) => Some(chart(
            "Voter Turnout (%)",
            "Constituency",
            ChartKind::Bar {
                bars: rows
                    .iter()
                    .map(|r| Bar {
                        label: r.constituency.clone().unwrap_or_default(),
                        value: r.turnout,
                        group: r.state.clone(),
                    })
                    .collect(),
                horizontal: true,
            },
        )),
        (Insight::MarginByState, InsightData::StateMeans(means)) => Some(chart(
            "State/UT",
            "Average Margin",
            ChartKind::Bar {
                // States without a mean have no bar.
                bars: means
                    .iter()
                    .filter_map(|m| {
                        m.mean.map(|value| Bar {
                            label: m.state.clone(),
                            value,
                            group: None,
                        })
                    })
                    .collect(),
                horizontal: false,
            },
        )),
        _ => None,
    }
}

/// Receives the charts of the report, one at a time.
pub trait ChartSink {
    fn render(&mut self, chart: &Chart) -> ReportResult<()>;
}

/// Discards all the charts.
pub struct NullSink {}

impl ChartSink for NullSink {
    fn render(&mut self, chart: &Chart) -> ReportResult<()> {
        debug!("NullSink: dropping chart {:?}", chart.title);
        Ok(())
    }
}

/// Writes each chart as a JSON document in a directory.
pub struct JsonSink {
    dir: PathBuf,
}

impl JsonSink {
    pub fn new(dir: PathBuf) -> JsonSink {
        JsonSink { dir }
    }
}

impl ChartSink for JsonSink {
    fn render(&mut self, chart: &Chart) -> ReportResult<()> {
        let path = self
            .dir
            .join(format!("{:02}-{}.json", chart.number, chart.slug()));
        let p = path.display().to_string();
        let js = serde_json::to_string_pretty(chart).context(ParsingJsonSnafu {})?;
        fs::write(&path, js).context(WritingOutputSnafu { path: p.clone() })?;
        info!("Wrote chart {}", p);
        Ok(())
    }
}

const BAR_WIDTH: usize = 50;
const STACK_SYMBOLS: [char; 10] = ['#', '=', '*', '+', 'o', '%', '@', '~', 'x', ':'];

/// Draws the charts as text.
pub struct TerminalSink<W: Write> {
    out: W,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> TerminalSink<W> {
        TerminalSink { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn bar_of(value: f64, max: f64, symbol: char) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let n = ((value / max) * BAR_WIDTH as f64).round() as usize;
    std::iter::repeat(symbol).take(n.max(1)).collect()
}

/// The segments of a stacked bar. The running total is rounded rather than
/// each segment, so the bar length always matches the total.
fn stacked_bar_of(values: &[u64], max: f64) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let scale = |x: u64| ((x as f64 / max) * BAR_WIDTH as f64).round() as usize;
    let mut bar = String::new();
    let mut total = 0;
    let mut drawn = 0;
    for (j, v) in values.iter().enumerate() {
        total += v;
        let end = scale(total);
        let symbol = STACK_SYMBOLS[j % STACK_SYMBOLS.len()];
        bar.extend(std::iter::repeat(symbol).take(end - drawn));
        drawn = end;
    }
    bar
}

fn label_width<'a, I: Iterator<Item = &'a String>>(labels: I) -> usize {
    labels.map(|l| l.chars().count()).max().unwrap_or(0)
}

pub fn draw_chart(chart: &Chart) -> String {
    let mut lines: Vec<String> = vec![
        format!("[Chart {}] {}", chart.number, chart.title),
        format!("x: {}, y: {}", chart.x_label, chart.y_label),
    ];
    match &chart.kind {
        ChartKind::Histogram { bins } => {
            let max = bins.iter().map(|b| b.count).max().unwrap_or(0) as f64;
            let labels: Vec<String> = bins
                .iter()
                .map(|b| format!("[{:.1}, {:.1})", b.lower, b.upper))
                .collect();
            let w = label_width(labels.iter());
            for (label, b) in labels.iter().zip(bins.iter()) {
                lines.push(format!(
                    "{:<w$} | {} {}",
                    label,
                    bar_of(b.count as f64, max, '#'),
                    b.count,
                    w = w
                ));
            }
        }
        ChartKind::Bar { bars, .. } => {
            let max = bars.iter().map(|b| b.value).fold(0.0, f64::max);
            let labels: Vec<String> = bars
                .iter()
                .map(|b| match &b.group {
                    Some(g) => format!("{} ({})", b.label, g),
                    None => b.label.clone(),
                })
                .collect();
            let w = label_width(labels.iter());
            for (label, b) in labels.iter().zip(bars.iter()) {
                lines.push(format!(
                    "{:<w$} | {} {}",
                    label,
                    bar_of(b.value, max, '#'),
                    format_number(round2(b.value)),
                    w = w
                ));
            }
        }
        ChartKind::Heatmap {
            rows,
            columns,
            cells,
        } => {
            let w = label_width(rows.iter());
            let cw = label_width(columns.iter()).max(3);
            let mut header = format!("{:<w$} |", "", w = w);
            for c in columns.iter() {
                header.push_str(&format!(" {:>cw$}", c, cw = cw));
            }
            lines.push(header);
            for (r, row) in rows.iter().zip(cells.iter()) {
                let mut line = format!("{:<w$} |", r, w = w);
                for v in row.iter() {
                    line.push_str(&format!(" {:>cw$}", v, cw = cw));
                }
                lines.push(line);
            }
        }
        ChartKind::StackedBar {
            categories,
            legend_title,
            series,
        } => {
            let totals: Vec<u64> = (0..categories.len())
                .map(|i| series.iter().map(|s| s.values[i]).sum())
                .collect();
            let max = totals.iter().cloned().max().unwrap_or(0) as f64;
            let w = label_width(categories.iter());
            for (i, cat) in categories.iter().enumerate() {
                let values: Vec<u64> = series.iter().map(|s| s.values[i]).collect();
                let bar = stacked_bar_of(&values, max);
                lines.push(format!("{:<w$} | {} {}", cat, bar, totals[i], w = w));
            }
            lines.push(format!("{}:", legend_title));
            for (j, s) in series.iter().enumerate() {
                lines.push(format!("  {} {}", STACK_SYMBOLS[j % STACK_SYMBOLS.len()], s.name));
            }
        }
    }
    lines.join("\n")
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

impl<W: Write> ChartSink for TerminalSink<W> {
    fn render(&mut self, chart: &Chart) -> ReportResult<()> {
        writeln!(self.out, "\n{}", draw_chart(chart)).context(WritingOutputSnafu {
            path: "stdout".to_string(),
        })
    }
}
