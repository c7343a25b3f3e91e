use crate::report::*;

use serde::{Deserialize, Serialize};

pub const DEFAULT_INPUT_PATH: &str = "Election-data.csv";
pub const DEFAULT_PREVIEW_ROWS: usize = 5;
pub const DEFAULT_CHART_DIR: &str = "charts";

/// The optional JSON description of a report.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(rename = "inputPath")]
    pub input_path: Option<String>,
    #[serde(rename = "inputType")]
    pub input_type: Option<String>,
    pub encoding: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "summaryPath")]
    pub summary_path: Option<String>,
    pub charts: Option<String>,
    #[serde(rename = "previewRows")]
    pub preview_rows: Option<usize>,
    #[serde(rename = "histogramBins")]
    pub histogram_bins: Option<usize>,
    #[serde(rename = "topTurnoutCount")]
    pub top_turnout_count: Option<usize>,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Encoding {
    Latin1,
    Utf8,
}

impl Encoding {
    pub fn parse(s: &str) -> ReportResult<Encoding> {
        match s.to_lowercase().as_str() {
            "latin1" | "latin-1" | "iso-8859-1" => Ok(Encoding::Latin1),
            "utf8" | "utf-8" => Ok(Encoding::Utf8),
            _ => UnknownOptionSnafu {
                option: "encoding",
                value: s,
            }
            .fail(),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Provider {
    Csv { encoding: Encoding },
    Excel { worksheet: Option<String> },
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct InputSource {
    pub path: String,
    pub provider: Provider,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ChartMode {
    Terminal,
    Json { directory: String },
    Disabled,
}

/// The validated settings of a run, after merging the command line and the
/// configuration file.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ReportSettings {
    pub input: InputSource,
    pub charts: ChartMode,
    pub out: Option<String>,
    pub reference: Option<String>,
    pub preview_rows: usize,
    pub insight_settings: InsightSettings,
}

pub fn read_config(path: &str) -> ReportResult<ReportConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: ReportConfig = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn read_summary(path: &str) -> ReportResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

// Paths in the config file are relative to the config file.
fn resolve_path(root: &Path, p: &str) -> String {
    let path = Path::new(p);
    if path.is_absolute() {
        p.to_string()
    } else {
        root.join(path).display().to_string()
    }
}

pub fn resolve_settings(args: &Args) -> ReportResult<ReportSettings> {
    let (config, root) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root = Path::new(config_path)
                .parent()
                .context(MissingParentDirSnafu { path: config_path })?
                .to_path_buf();
            (config, Some(root))
        }
        None => (ReportConfig::default(), None),
    };
    merge_settings(args, &config, root.as_deref())
}

/// Command-line values take precedence over the configuration values.
pub fn merge_settings(
    args: &Args,
    config: &ReportConfig,
    root: Option<&Path>,
) -> ReportResult<ReportSettings> {
    let from_config = |p: &Option<String>| -> Option<String> {
        p.as_ref().map(|x| match root {
            Some(r) => resolve_path(r, x),
            None => x.clone(),
        })
    };

    let path = args
        .input
        .clone()
        .or_else(|| from_config(&config.input_path))
        .unwrap_or_else(|| DEFAULT_INPUT_PATH.to_string());

    let input_type = args
        .input_type
        .clone()
        .or_else(|| config.input_type.clone())
        .unwrap_or_else(|| "csv".to_string());
    let provider = match input_type.as_str() {
        "csv" => {
            let encoding = match args.encoding.as_ref().or(config.encoding.as_ref()) {
                Some(e) => Encoding::parse(e)?,
                None => Encoding::Latin1,
            };
            Provider::Csv { encoding }
        }
        "excel" | "xlsx" => Provider::Excel {
            worksheet: args
                .excel_worksheet_name
                .clone()
                .or_else(|| config.excel_worksheet_name.clone()),
        },
        x => {
            return UnknownOptionSnafu {
                option: "input type",
                value: x,
            }
            .fail()
        }
    };

    let charts = match args
        .charts
        .clone()
        .or_else(|| config.charts.clone())
        .as_deref()
    {
        None | Some("terminal") => ChartMode::Terminal,
        Some("json") => ChartMode::Json {
            directory: args
                .chart_dir
                .clone()
                .or_else(|| from_config(&config.output_directory))
                .unwrap_or_else(|| DEFAULT_CHART_DIR.to_string()),
        },
        Some("none") => ChartMode::Disabled,
        Some(x) => {
            return UnknownOptionSnafu {
                option: "charts",
                value: x,
            }
            .fail()
        }
    };

    let defaults = InsightSettings::DEFAULT_SETTINGS;
    Ok(ReportSettings {
        input: InputSource { path, provider },
        charts,
        out: args.out.clone().or_else(|| from_config(&config.summary_path)),
        reference: args.reference.clone(),
        preview_rows: config.preview_rows.unwrap_or(DEFAULT_PREVIEW_ROWS),
        insight_settings: InsightSettings {
            histogram_bins: config.histogram_bins.unwrap_or(defaults.histogram_bins),
            top_turnout_count: config
                .top_turnout_count
                .unwrap_or(defaults.top_turnout_count),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(xs: &[&str]) -> Args {
        let mut v = vec!["elinsights"];
        v.extend_from_slice(xs);
        Args::parse_from(v)
    }

    #[test]
    fn defaults_match_fixed_invocation() {
        let s = merge_settings(&args(&[]), &ReportConfig::default(), None).unwrap();
        assert_eq!(s.input.path, "Election-data.csv");
        assert_eq!(
            s.input.provider,
            Provider::Csv {
                encoding: Encoding::Latin1
            }
        );
        assert_eq!(s.charts, ChartMode::Terminal);
        assert_eq!(s.preview_rows, 5);
        assert_eq!(s.insight_settings, InsightSettings::DEFAULT_SETTINGS);
        assert_eq!(s.out, None);
    }

    #[test]
    fn command_line_overrides_config() {
        let config: ReportConfig = serde_json::from_str(
            r#"{"inputPath": "data/results.csv", "encoding": "utf8", "charts": "json",
                "outputDirectory": "out", "topTurnoutCount": 5}"#,
        )
        .unwrap();
        let root = Path::new("/tmp/report");
        let s = merge_settings(&args(&["--encoding", "latin1"]), &config, Some(root)).unwrap();
        assert_eq!(s.input.path, "/tmp/report/data/results.csv");
        assert_eq!(
            s.input.provider,
            Provider::Csv {
                encoding: Encoding::Latin1
            }
        );
        assert_eq!(
            s.charts,
            ChartMode::Json {
                directory: "/tmp/report/out".to_string()
            }
        );
        assert_eq!(s.insight_settings.top_turnout_count, 5);
        assert_eq!(s.insight_settings.histogram_bins, 30);

        let s = merge_settings(&args(&["-i", "other.csv"]), &config, Some(root)).unwrap();
        assert_eq!(s.input.path, "other.csv");
    }

    #[test]
    fn config_file_paths_are_relative_to_its_directory() {
        let dir = std::env::temp_dir().join("election_insights_config_test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("report.json");
        fs::write(
            &path,
            r#"{"inputPath": "data/results.xlsx", "inputType": "excel",
                "excelWorksheetName": "Results", "summaryPath": "summary.json",
                "charts": "none", "previewRows": 3, "histogramBins": 10}"#,
        )
        .unwrap();
        let config_path = path.display().to_string();
        let s = resolve_settings(&args(&["-c", config_path.as_str()])).unwrap();
        assert_eq!(
            s.input.path,
            dir.join("data/results.xlsx").display().to_string()
        );
        assert_eq!(
            s.input.provider,
            Provider::Excel {
                worksheet: Some("Results".to_string())
            }
        );
        assert_eq!(s.out, Some(dir.join("summary.json").display().to_string()));
        assert_eq!(s.charts, ChartMode::Disabled);
        assert_eq!(s.preview_rows, 3);
        assert_eq!(s.insight_settings.histogram_bins, 10);

        let err = resolve_settings(&args(&["-c", "/nonexistent/report.json"])).unwrap_err();
        assert!(matches!(err, ReportError::OpeningJson { .. }));
    }

    #[test]
    fn excel_input() {
        let s = merge_settings(
            &args(&["--input-type", "excel", "--excel-worksheet-name", "Results"]),
            &ReportConfig::default(),
            None,
        )
        .unwrap();
        assert_eq!(
            s.input.provider,
            Provider::Excel {
                worksheet: Some("Results".to_string())
            }
        );
    }

    #[test]
    fn rejects_unknown_options() {
        let cfg = ReportConfig::default();
        assert!(merge_settings(&args(&["--encoding", "ebcdic"]), &cfg, None).is_err());
        assert!(merge_settings(&args(&["--input-type", "parquet"]), &cfg, None).is_err());
        assert!(merge_settings(&args(&["--charts", "svg"]), &cfg, None).is_err());
    }
}
