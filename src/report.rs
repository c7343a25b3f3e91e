use log::{debug, info, warn};

use election_stats::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::io::Write;
use std::path::Path;

use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::report::charts::*;
use crate::report::config_reader::*;
use crate::report::printing::*;
use crate::report::summary::*;

mod charts;
mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;
mod printing;
mod summary;

#[derive(Debug, Snafu)]
pub enum ReportError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("The content of {path} is not valid {encoding}"))]
    Decoding {
        source: std::string::FromUtf8Error,
        path: String,
        encoding: String,
    },
    #[snafu(display("Error reading CSV file {path}"))]
    CsvParse { source: csv::Error, path: String },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The Excel file {path} has no worksheet {worksheet}"))]
    MissingWorksheet { path: String, worksheet: String },
    #[snafu(display("The Excel file {path} has no header row"))]
    EmptyExcel { path: String },
    #[snafu(display("Malformed dataset in {path}"))]
    MalformedDataset {
        source: DatasetError,
        path: String,
    },
    #[snafu(display("Error opening JSON file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Unknown {option} option: {value}"))]
    UnknownOption { option: String, value: String },
    #[snafu(display("No parent directory for {path}"))]
    MissingParentDir { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type ReportResult<T> = Result<T, ReportError>;

fn load_dataset(input: &InputSource) -> ReportResult<Dataset> {
    info!("Attempting to read election file {:?}", input.path);
    match &input.provider {
        Provider::Csv { encoding } => io_csv::read_csv_dataset(&input.path, *encoding),
        Provider::Excel { worksheet } => {
            io_excel::read_excel_dataset(&input.path, worksheet.as_deref())
        }
    }
}

fn emit<W: Write>(out: &mut W, text: &str) -> ReportResult<()> {
    writeln!(out, "{}", text).context(WritingOutputSnafu {
        path: "stdout".to_string(),
    })
}

fn skip_notice(insight: Insight) -> String {
    let names: Vec<&str> = insight
        .required_fields()
        .iter()
        .map(|f| f.column_name())
        .collect();
    if names.len() == 1 {
        format!("Column '{}' not found in the dataset.", names[0])
    } else {
        format!("Columns '{}' not found in the dataset.", names.join("' or '"))
    }
}

/// Runs all the stages of the report on the pipeline, printing to `out` and
/// drawing to `sink`.
///
/// Returns the JSON summary of the run.
fn report_pipeline<W: Write>(
    pipeline: &mut Pipeline,
    preview_rows: usize,
    sink: &mut dyn ChartSink,
    out: &mut W,
) -> ReportResult<JSValue> {
    let dataset = pipeline.dataset();
    emit(out, "Dataset Preview:")?;
    emit(out, &format_preview(dataset, preview_rows))?;
    emit(out, "\nColumn Names:")?;
    emit(out, &format_column_names(&dataset.column_names()))?;

    let raw = pipeline.describe();
    emit(out, "\nDataset Information:")?;
    emit(out, &format_info(&raw.info))?;
    emit(out, "\nDuplicated Rows:")?;
    emit(out, &raw.duplicated_rows.to_string())?;
    emit(out, "\nSummary Statistics for Numerical Columns:")?;
    emit(out, &format_numeric_summaries(&raw.numeric))?;
    emit(out, "\nSummary Statistics for Object Columns:")?;
    emit(out, &format_categorical_summaries(&raw.categorical))?;

    let cleaning = pipeline.clean();
    let missing = pipeline.missing_values();
    emit(out, "\nMissing Values:")?;
    emit(out, &format_missing_values(&missing))?;

    let cleaned = pipeline.describe();
    emit(out, "\nDetailed Summary Statistics for Numerical Columns:")?;
    emit(out, &format_numeric_summaries(&cleaned.numeric))?;
    emit(out, "\nDetailed Summary Statistics for Object Columns:")?;
    emit(out, &format_categorical_summaries(&cleaned.categorical))?;

    let mut outcomes: Vec<(Insight, InsightOutcome)> = Vec::new();
    for insight in Insight::ALL {
        let outcome = pipeline.run_insight(insight);
        match &outcome {
            InsightOutcome::Computed(data) => {
                if insight.prints_table() {
                    emit(out, &format!("\n{}:", insight.title()))?;
                    emit(out, &format_insight_data(data))?;
                }
                if insight.has_chart() {
                    if let Some(chart) = chart_for(insight, data) {
                        debug!("Rendering chart {:?}", chart.title);
                        sink.render(&chart)?;
                    }
                }
            }
            InsightOutcome::Skipped { missing } => {
                warn!(
                    "Insight {} skipped, missing columns: {:?}",
                    insight.number(),
                    missing
                );
                emit(out, &format!("\n{}", skip_notice(insight)))?;
            }
        }
        outcomes.push((insight, outcome));
    }

    Ok(build_summary_js(&raw, &cleaning, &missing, &outcomes))
}

fn write_summary(out_path: &str, pretty_js: &str) -> ReportResult<()> {
    if out_path == "stdout" {
        println!("{}", pretty_js);
        return Ok(());
    }
    info!("Writing summary to {}", out_path);
    fs::write(out_path, pretty_js).context(WritingOutputSnafu {
        path: out_path.to_string(),
    })
}

fn check_reference(reference_path: &str, pretty_js_stats: &str) -> ReportResult<()> {
    let summary_ref = read_summary(reference_path)?;
    debug!("reference summary: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference summary");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        whatever!("Difference detected between computed summary and reference summary")
    }
    info!("The summary matches the reference {}", reference_path);
    Ok(())
}

pub fn run_report(args: &Args) -> ReportResult<()> {
    let settings = resolve_settings(args)?;
    info!("settings: {:?}", settings);

    let dataset = load_dataset(&settings.input)?;
    let mut sink = make_sink(&settings.charts)?;
    let mut pipeline = Pipeline::new(dataset, settings.insight_settings.clone());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary_js = report_pipeline(
        &mut pipeline,
        settings.preview_rows,
        sink.as_mut(),
        &mut out,
    )?;
    drop(out);

    let pretty_js_stats = serde_json::to_string_pretty(&summary_js).context(ParsingJsonSnafu {})?;
    if let Some(out_path) = &settings.out {
        write_summary(out_path, &pretty_js_stats)?;
    }
    if let Some(reference_path) = &settings.reference {
        check_reference(reference_path, &pretty_js_stats)?;
    }
    Ok(())
}

fn make_sink(mode: &ChartMode) -> ReportResult<Box<dyn ChartSink>> {
    Ok(match mode {
        ChartMode::Terminal => Box::new(TerminalSink::new(std::io::stdout())),
        ChartMode::Json { directory } => {
            let dir = Path::new(directory);
            fs::create_dir_all(dir).context(WritingOutputSnafu {
                path: directory.clone(),
            })?;
            Box::new(JsonSink::new(dir.to_path_buf()))
        }
        ChartMode::Disabled => Box::new(NullSink {}),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        charts: Vec<Chart>,
    }

    impl ChartSink for RecordingSink {
        fn render(&mut self, chart: &Chart) -> ReportResult<()> {
            self.charts.push(chart.clone());
            Ok(())
        }
    }

    fn test_data(name: &str) -> String {
        format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), name)
    }

    fn run_fixture(name: &str) -> (String, Vec<Chart>, JSValue) {
        let _ = env_logger::builder().is_test(true).try_init();
        let ds = io_csv::read_csv_dataset(&test_data(name), Encoding::Latin1).unwrap();
        let mut pipeline = Pipeline::new(ds, InsightSettings::DEFAULT_SETTINGS);
        let mut sink = RecordingSink::default();
        let mut out: Vec<u8> = Vec::new();
        let js = report_pipeline(&mut pipeline, 5, &mut sink, &mut out).unwrap();
        (String::from_utf8(out).unwrap(), sink.charts, js)
    }

    #[test]
    fn full_report_on_complete_dataset() {
        let (text, charts, js) = run_fixture("election_small.csv");
        assert!(text.starts_with("Dataset Preview:"));
        assert!(text.contains("\nDuplicated Rows:\n1\n"));
        assert!(text.contains("Count of Leading Parties:"));
        assert!(text.contains("Gender Distribution of Elected Representatives:"));
        assert!(text.contains("Top 10 Constituencies with the Highest Voter Turnout:"));
        assert!(!text.contains("not found in the dataset"));
        // Histogram, party bars, heatmap, stacked bars, gender, turnout, state margins.
        assert_eq!(charts.len(), 7);
        assert_eq!(charts[0].title, "Distribution of Winning Margins");

        let margin_missing = js["missingValues"]
            .as_array()
            .unwrap()
            .iter()
            .find(|m| m["column"] == "Margin")
            .unwrap()["missing"]
            .clone();
        assert_eq!(margin_missing, serde_json::json!(1));
        assert_eq!(js["cleaning"]["marginsLost"], serde_json::json!(1));

        let turnout = &js["insights"][8];
        assert_eq!(turnout["status"], "computed");
        let rows = turnout["data"]["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0]["constituency"], "Kottayam");
    }

    #[test]
    fn report_without_optional_columns() {
        let (text, charts, js) = run_fixture("election_no_gender.csv");
        assert!(text.contains("\nColumn 'Gender' not found in the dataset."));
        assert!(text.contains("\nColumns 'Votes Polled' or 'Electors' not found in the dataset."));
        assert!(text.contains("Average Winning Margin by State:"));
        assert!(charts.iter().all(|c| !c.title.contains("Gender")));
        assert_eq!(charts.len(), 5);
        assert_eq!(js["insights"][7]["status"], "skipped");
        assert_eq!(js["insights"][9]["status"], "computed");
    }

    #[test]
    fn skip_notices() {
        assert_eq!(
            skip_notice(Insight::GenderDistribution),
            "Column 'Gender' not found in the dataset."
        );
        assert_eq!(
            skip_notice(Insight::MarginByState),
            "Columns 'State/UT' or 'Margin' not found in the dataset."
        );
    }

    #[test]
    fn reference_check_detects_differences() {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = std::env::temp_dir().join("election_insights_reference_test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("reference.json");
        fs::write(&path, "{\"a\": 1}").unwrap();
        let p = path.display().to_string();
        assert!(check_reference(&p, "{\n  \"a\": 1\n}").is_ok());
        assert!(check_reference(&p, "{\n  \"a\": 2\n}").is_err());
    }
}
