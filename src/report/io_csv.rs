// Primitives for reading CSV files.

use crate::report::config_reader::Encoding;
use crate::report::{io_common::*, *};

/// Reads a CSV file with a header row into a dataset.
pub fn read_csv_dataset(path: &str, encoding: Encoding) -> ReportResult<Dataset> {
    let bytes = fs::read(path).context(OpeningFileSnafu { path })?;
    let text = decode_text(bytes, encoding, path)?;
    let (headers, rows) = read_csv_text(&text, path)?;
    info!(
        "Read {} rows from {}",
        rows.len(),
        simplify_file_name(path)
    );
    Dataset::from_rows(headers, rows).context(MalformedDatasetSnafu { path })
}

fn read_csv_text(text: &str, path: &str) -> ReportResult<(Vec<String>, Vec<Vec<String>>)> {
    // Short and long rows are accepted here and checked when assembling the dataset.
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers: Vec<String> = rdr
        .headers()
        .context(CsvParseSnafu { path })?
        .iter()
        .map(|s| s.to_string())
        .collect();
    debug!("read_csv_text: headers: {:?}", headers);
    let mut rows: Vec<Vec<String>> = Vec::new();
    for line_r in rdr.records() {
        let line = line_r.context(CsvParseSnafu { path })?;
        rows.push(line.iter().map(|s| s.to_string()).collect());
    }
    Ok((headers, rows))
}
