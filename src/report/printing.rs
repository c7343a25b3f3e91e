// Text rendering of the report sections.

use crate::report::*;

/// Lays out cells in aligned columns. The first column is left aligned, the
/// others right aligned.
fn format_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let num_cols = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows.iter() {
        for (j, cell) in row.iter().enumerate().take(num_cols) {
            widths[j] = widths[j].max(cell.chars().count());
        }
    }
    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(j, c)| {
                if j == 0 {
                    format!("{:<w$}", c, w = widths[j])
                } else {
                    format!("{:>w$}", c, w = widths[j])
                }
            })
            .collect::<Vec<String>>()
            .join("  ")
            .trim_end()
            .to_string()
    };
    let mut lines = vec![line(headers)];
    lines.extend(rows.iter().map(|r| line(r.as_slice())));
    lines.join("\n")
}

fn cell(v: &Value) -> String {
    match v {
        Value::Missing => "NaN".to_string(),
        Value::Number(x) => format_number(*x),
        Value::Text(s) => s.clone(),
    }
}

fn stat(x: Option<f64>) -> String {
    match x {
        Some(v) => format!("{:.6}", v),
        None => "NaN".to_string(),
    }
}

pub fn format_preview(dataset: &Dataset, num_rows: usize) -> String {
    let mut headers = vec!["".to_string()];
    headers.extend(dataset.column_names());
    let rows: Vec<Vec<String>> = (0..dataset.num_rows().min(num_rows))
        .map(|idx| {
            let mut r = vec![idx.to_string()];
            r.extend(dataset.row(idx).into_iter().map(cell));
            r
        })
        .collect();
    format_table(&headers, &rows)
}

pub fn format_column_names(names: &[String]) -> String {
    names
        .iter()
        .enumerate()
        .map(|(i, n)| format!("{:>3}  {}", i, n))
        .collect::<Vec<String>>()
        .join("\n")
}

pub fn format_info(info: &DatasetInfo) -> String {
    let headers = vec![
        "#".to_string(),
        "Column".to_string(),
        "Non-Null Count".to_string(),
        "Dtype".to_string(),
    ];
    let rows: Vec<Vec<String>> = info
        .columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            vec![
                i.to_string(),
                c.name.clone(),
                format!("{} non-null", c.non_null),
                c.kind.dtype_name().to_string(),
            ]
        })
        .collect();
    format!(
        "{} entries, {} columns\n{}",
        info.num_rows,
        info.columns.len(),
        format_table(&headers, &rows)
    )
}

pub fn format_numeric_summaries(summaries: &[NumericSummary]) -> String {
    if summaries.is_empty() {
        return "No numerical columns.".to_string();
    }
    let mut headers = vec!["".to_string()];
    headers.extend(summaries.iter().map(|s| s.column.clone()));
    let stats: [(&str, fn(&NumericSummary) -> String); 8] = [
        ("count", |s| format!("{:.6}", s.count as f64)),
        ("mean", |s| stat(s.mean)),
        ("std", |s| stat(s.std)),
        ("min", |s| stat(s.min)),
        ("25%", |s| stat(s.q25)),
        ("50%", |s| stat(s.q50)),
        ("75%", |s| stat(s.q75)),
        ("max", |s| stat(s.max)),
    ];
    let rows: Vec<Vec<String>> = stats
        .iter()
        .map(|(name, f)| {
            let mut r = vec![name.to_string()];
            r.extend(summaries.iter().map(f));
            r
        })
        .collect();
    format_table(&headers, &rows)
}

pub fn format_categorical_summaries(summaries: &[CategoricalSummary]) -> String {
    if summaries.is_empty() {
        return "No object columns.".to_string();
    }
    let mut headers = vec!["".to_string()];
    headers.extend(summaries.iter().map(|s| s.column.clone()));
    let rows = vec![
        row_of("count", summaries, |s| s.count.to_string()),
        row_of("unique", summaries, |s| s.unique.to_string()),
        row_of("top", summaries, |s| {
            s.top.clone().unwrap_or_else(|| "NaN".to_string())
        }),
        row_of("freq", summaries, |s| s.freq.to_string()),
    ];
    format_table(&headers, &rows)
}

fn row_of<F: Fn(&CategoricalSummary) -> String>(
    name: &str,
    summaries: &[CategoricalSummary],
    f: F,
) -> Vec<String> {
    let mut r = vec![name.to_string()];
    r.extend(summaries.iter().map(f));
    r
}

pub fn format_missing_values(missing: &[(String, usize)]) -> String {
    let rows: Vec<Vec<String>> = missing
        .iter()
        .map(|(name, n)| vec![name.clone(), n.to_string()])
        .collect();
    format_table(&["".to_string(), "missing".to_string()], &rows)
}

pub fn format_insight_data(data: &InsightData) -> String {
    match data {
        InsightData::Counts(vc) => {
            let rows: Vec<Vec<String>> = vc
                .counts
                .iter()
                .map(|(k, c)| vec![k.clone(), c.to_string()])
                .collect();
            format_table(&[vc.field.clone(), "count".to_string()], &rows)
        }
        InsightData::Turnout(rows) => {
            let headers = vec![
                "".to_string(),
                Field::Constituency.column_name().to_string(),
                Field::StateUt.column_name().to_string(),
                Field::VoterTurnout.column_name().to_string(),
            ];
            let rows: Vec<Vec<String>> = rows
                .iter()
                .map(|r| {
                    vec![
                        r.index.to_string(),
                        r.constituency.clone().unwrap_or_else(|| "NaN".to_string()),
                        r.state.clone().unwrap_or_else(|| "NaN".to_string()),
                        stat(Some(r.turnout)),
                    ]
                })
                .collect();
            format_table(&headers, &rows)
        }
        InsightData::StateMeans(means) => {
            let rows: Vec<Vec<String>> = means
                .iter()
                .map(|m| vec![m.state.clone(), stat(m.mean)])
                .collect();
            format_table(
                &[
                    Field::StateUt.column_name().to_string(),
                    Field::Margin.column_name().to_string(),
                ],
                &rows,
            )
        }
        InsightData::Histogram(bins) => {
            let rows: Vec<Vec<String>> = bins
                .iter()
                .map(|b| {
                    vec![
                        format!("[{}, {})", stat(Some(b.lower)), stat(Some(b.upper))),
                        b.count.to_string(),
                    ]
                })
                .collect();
            format_table(&["bin".to_string(), "count".to_string()], &rows)
        }
        InsightData::CrossTab(ct) => {
            let mut headers = vec![ct.row_field.clone()];
            headers.extend(ct.column_keys.iter().cloned());
            let rows: Vec<Vec<String>> = ct
                .row_keys
                .iter()
                .zip(ct.cells.iter())
                .map(|(k, cells)| {
                    let mut r = vec![k.clone()];
                    r.extend(cells.iter().map(|c| c.to_string()));
                    r
                })
                .collect();
            format_table(&headers, &rows)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_counts_table() {
        let data = InsightData::Counts(ValueCounts {
            field: "Status".to_string(),
            counts: vec![
                ("Result Declared".to_string(), 541),
                ("Uncontested".to_string(), 1),
            ],
        });
        assert_eq!(
            format_insight_data(&data),
            "Status           count\nResult Declared    541\nUncontested          1"
        );
    }

    #[test]
    fn undefined_means_print_as_nan() {
        let data = InsightData::StateMeans(vec![
            StateMean {
                state: "Goa".to_string(),
                mean: Some(20.0),
            },
            StateMean {
                state: "Assam".to_string(),
                mean: None,
            },
        ]);
        let text = format_insight_data(&data);
        assert!(text.contains("Goa       20.000000"));
        assert!(text.ends_with("Assam           NaN"));
    }

    #[test]
    fn numeric_summary_rows() {
        let s = NumericSummary {
            column: "Margin".to_string(),
            count: 2,
            mean: Some(750.0),
            std: None,
            min: Some(500.0),
            q25: Some(625.0),
            q50: Some(750.0),
            q75: Some(875.0),
            max: Some(1000.0),
        };
        let text = format_numeric_summaries(&[s]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert!(lines[1].starts_with("count"));
        assert!(lines[1].ends_with("2.000000"));
        assert!(lines[3].ends_with("NaN"));
        assert_eq!(format_numeric_summaries(&[]), "No numerical columns.");
    }

    #[test]
    fn preview_shows_missing_cells() {
        let ds = Dataset::from_rows(
            vec!["a".to_string(), "b".to_string()],
            vec![
                vec!["x".to_string(), "".to_string()],
                vec!["y".to_string(), "2".to_string()],
            ],
        )
        .unwrap();
        let text = format_preview(&ds, 1);
        assert_eq!(text, "   a    b\n0  x  NaN");
    }
}
