use calamine::{open_workbook, DataType, Range, Reader, Xlsx};

use crate::report::{io_common::*, *};

fn get_range(path: &str, worksheet: Option<&str>) -> ReportResult<Range<DataType>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = match worksheet {
        Some(name) => workbook.worksheet_range(name),
        None => workbook.worksheet_range_at(0),
    };
    wrange
        .context(MissingWorksheetSnafu {
            path,
            worksheet: worksheet.unwrap_or("#0"),
        })?
        .context(OpeningExcelSnafu { path })
}

/// Reads a worksheet into a dataset. The first row holds the column names.
pub fn read_excel_dataset(path: &str, worksheet: Option<&str>) -> ReportResult<Dataset> {
    let wrange = get_range(path, worksheet)?;
    let mut iter = wrange.rows();
    let header = iter.next().context(EmptyExcelSnafu { path })?;
    let mut headers: Vec<String> = header.iter().map(cell_text).collect();
    // The range spans every used cell of the sheet, so a stray cell to the
    // right of the table widens the header with empty names.
    while headers.last().map(|h| h.is_empty()).unwrap_or(false) {
        headers.pop();
    }
    debug!("read_excel_dataset: header: {:?}", headers);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for row in iter {
        let mut cells: Vec<String> = row.iter().map(cell_text).collect();
        // Non-empty cells beyond the header are kept and rejected as a ragged row.
        while cells.len() > headers.len() && cells.last().map(|c| c.is_empty()).unwrap_or(false) {
            cells.pop();
        }
        rows.push(cells);
    }
    info!(
        "Read {} rows from worksheet of {}",
        rows.len(),
        simplify_file_name(path)
    );
    Dataset::from_rows(headers, rows).context(MalformedDatasetSnafu { path })
}
