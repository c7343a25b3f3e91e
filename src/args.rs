use clap::Parser;

/// This is an exploratory report program for constituency-level election results.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file describing the report. Relative paths in this file are
    /// resolved against the directory of the file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, default Election-data.csv) The election results. Setting this option overrides
    /// the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv or excel.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default latin1) The text encoding of a CSV input: latin1 or utf8.
    #[clap(long, value_parser)]
    pub encoding: Option<String>,

    /// (default: first worksheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the report will be written in JSON
    /// format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing a report summary in JSON format. If provided,
    /// the computed summary is checked against the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (default terminal) Where the charts go: terminal, json or none.
    #[clap(long, value_parser)]
    pub charts: Option<String>,

    /// (directory) The directory receiving the chart files with --charts json.
    #[clap(long, value_parser)]
    pub chart_dir: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
