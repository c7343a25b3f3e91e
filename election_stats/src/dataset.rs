use log::{debug, info, warn};

use std::collections::HashSet;

use crate::schema::*;

/// The cell contents that are read as a missing value.
pub const MISSING_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(PartialEq, Debug, Clone)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<Value>,
}

impl Column {
    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_missing()).count()
    }

    pub fn non_missing_count(&self) -> usize {
        self.values.len() - self.missing_count()
    }

    pub fn numbers(&self) -> Vec<f64> {
        self.values.iter().filter_map(|v| v.as_number()).collect()
    }
}

/// One election result record, with the attributes that the insights use.
///
/// Any attribute may be absent, either because the column does not exist
/// or because the cell is missing.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct ElectionRecord {
    pub constituency: Option<String>,
    pub state: Option<String>,
    pub leading_party: Option<String>,
    pub trailing_party: Option<String>,
    pub status: Option<String>,
    pub margin: Option<f64>,
    pub votes_polled: Option<f64>,
    pub electors: Option<f64>,
    pub gender: Option<String>,
}

impl ElectionRecord {
    /// The voter turnout of the record, always computed from the votes and
    /// electors.
    pub fn turnout(&self) -> Option<f64> {
        compute_turnout(self.votes_polled, self.electors)
    }
}

/// `votes / electors * 100`, undefined without electors.
pub fn compute_turnout(votes_polled: Option<f64>, electors: Option<f64>) -> Option<f64> {
    match (votes_polled, electors) {
        (Some(v), Some(e)) if e != 0.0 => Some(v / e * 100.0),
        _ => None,
    }
}

/// The in-memory table of election results.
///
/// Columns are stored in input order. The set of rows never changes after
/// construction; only whole columns are coerced or derived.
#[derive(PartialEq, Debug, Clone)]
pub struct Dataset {
    columns: Vec<Column>,
    num_rows: usize,
}

impl Dataset {
    /// Builds a dataset from a header and raw text rows, inferring the type of
    /// each column.
    ///
    /// Short rows are padded with missing values. A row with more fields than
    /// the header is an error.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Dataset, DatasetError> {
        if headers.is_empty() {
            return Err(DatasetError::NoColumns);
        }
        let names = dedup_headers(headers);
        let width = names.len();
        let mut raw_columns: Vec<Vec<Option<String>>> = vec![Vec::with_capacity(rows.len()); width];
        for (idx, row) in rows.into_iter().enumerate() {
            if row.len() > width {
                return Err(DatasetError::RaggedRow {
                    // The header is on the first line.
                    lineno: idx + 2,
                    expected: width,
                    found: row.len(),
                });
            }
            let found = row.len();
            for (col_idx, cell) in row.into_iter().enumerate() {
                raw_columns[col_idx].push(read_missing(cell));
            }
            for col in raw_columns.iter_mut().skip(found) {
                col.push(None);
            }
        }
        let num_rows = raw_columns.first().map(|c| c.len()).unwrap_or(0);

        let columns: Vec<Column> = names
            .into_iter()
            .zip(raw_columns)
            .map(|(name, raw)| infer_column(name, raw))
            .collect();
        for c in columns.iter() {
            debug!("from_rows: column {:?} inferred as {:?}", c.name, c.kind);
        }
        info!(
            "Assembled dataset with {} rows and {} columns",
            num_rows,
            columns.len()
        );
        Ok(Dataset { columns, num_rows })
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn field(&self, field: Field) -> Option<&Column> {
        self.column(field.column_name())
    }

    pub fn has_field(&self, field: Field) -> bool {
        self.field(field).is_some()
    }

    /// The subset of `required` that is absent from the dataset, in the
    /// order given.
    pub fn missing_fields(&self, required: &[Field]) -> Vec<Field> {
        required
            .iter()
            .filter(|f| !self.has_field(**f))
            .cloned()
            .collect()
    }

    /// The cells of one row, in column order.
    pub fn row(&self, idx: usize) -> Vec<&Value> {
        self.columns.iter().map(|c| &c.values[idx]).collect()
    }

    /// The rows of the dataset as records.
    ///
    /// The margin is only read from a numeric column. The votes and electors
    /// are read from text cells as well, without touching the columns.
    pub fn records(&self) -> Vec<ElectionRecord> {
        let text = |field: Field, idx: usize| -> Option<String> {
            self.field(field).and_then(|c| c.values[idx].as_category())
        };
        let number = |field: Field, idx: usize| -> Option<f64> {
            self.field(field).and_then(|c| c.values[idx].as_number())
        };
        let lenient = |field: Field, idx: usize| -> Option<f64> {
            self.field(field).and_then(|c| match &c.values[idx] {
                Value::Text(s) => parse_number(s),
                v => v.as_number(),
            })
        };
        (0..self.num_rows)
            .map(|idx| ElectionRecord {
                constituency: text(Field::Constituency, idx),
                state: text(Field::StateUt, idx),
                leading_party: text(Field::LeadingParty, idx),
                trailing_party: text(Field::TrailingParty, idx),
                status: text(Field::Status, idx),
                margin: number(Field::Margin, idx),
                votes_polled: lenient(Field::VotesPolled, idx),
                electors: lenient(Field::Electors, idx),
                gender: text(Field::Gender, idx),
            })
            .collect()
    }

    /// Converts a column to numbers. Cells that cannot be read as a number
    /// become missing; the rows themselves are kept.
    ///
    /// Returns the number of cells that were lost in the conversion, or `None`
    /// if the column does not exist.
    pub fn coerce_numeric(&mut self, field: Field) -> Option<usize> {
        let column = self
            .columns
            .iter_mut()
            .find(|c| c.name == field.column_name())?;
        if column.kind.is_numeric() {
            debug!("coerce_numeric: {} is already numeric", field);
            return Some(0);
        }
        let mut lost = 0;
        let values: Vec<Value> = column
            .values
            .iter()
            .map(|v| match v {
                Value::Text(s) => match parse_number(s) {
                    Some(x) => Value::Number(x),
                    None => {
                        debug!("coerce_numeric: {}: cannot read {:?}", field, s);
                        lost += 1;
                        Value::Missing
                    }
                },
                other => other.clone(),
            })
            .collect();
        if lost > 0 {
            warn!(
                "{} value(s) of column {} could not be read as numbers",
                lost, field
            );
        }
        column.kind = numeric_kind(&values);
        column.values = values;
        Some(lost)
    }

    /// Adds (or replaces) the `Voter Turnout` column, computed as
    /// `Votes Polled / Electors * 100`.
    ///
    /// The turnout is missing when either input is missing, unreadable, or
    /// when there are no electors. The source columns are left as loaded.
    /// Returns false if either source column is absent.
    pub fn derive_voter_turnout(&mut self) -> bool {
        if !self.missing_fields(&[Field::VotesPolled, Field::Electors]).is_empty() {
            return false;
        }
        let values: Vec<Value> = self
            .records()
            .iter()
            .map(|r| match compute_turnout(r.votes_polled, r.electors) {
                Some(t) => Value::Number(t),
                None => Value::Missing,
            })
            .collect();
        let column = Column {
            name: Field::VoterTurnout.column_name().to_string(),
            kind: ColumnKind::Float,
            values,
        };
        match self
            .columns
            .iter_mut()
            .find(|c| c.name == column.name)
        {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
        true
    }

    /// The number of missing cells in each column, in column order.
    pub fn missing_counts(&self) -> Vec<(String, usize)> {
        self.columns
            .iter()
            .map(|c| (c.name.clone(), c.missing_count()))
            .collect()
    }

    /// The number of rows that are identical to an earlier row.
    pub fn duplicated_rows(&self) -> usize {
        let mut seen: HashSet<Vec<CellKey>> = HashSet::new();
        let mut dups = 0;
        for idx in 0..self.num_rows {
            let key: Vec<CellKey> = self.row(idx).into_iter().map(CellKey::from).collect();
            if !seen.insert(key) {
                dups += 1;
            }
        }
        dups
    }
}

// Hashable view of a cell.
#[derive(Eq, PartialEq, Hash)]
enum CellKey<'a> {
    Missing,
    Number(u64),
    Text(&'a str),
}

impl<'a> From<&'a Value> for CellKey<'a> {
    fn from(v: &'a Value) -> Self {
        match v {
            Value::Missing => CellKey::Missing,
            // -0.0 and 0.0 compare equal
            Value::Number(x) if *x == 0.0 => CellKey::Number(0f64.to_bits()),
            Value::Number(x) => CellKey::Number(x.to_bits()),
            Value::Text(s) => CellKey::Text(s.as_str()),
        }
    }
}

fn read_missing(cell: String) -> Option<String> {
    if MISSING_MARKERS.contains(&cell.as_str()) {
        None
    } else {
        Some(cell)
    }
}

/// Reads a number, ignoring surrounding whitespace. NaN is not a number here.
pub fn parse_number(s: &str) -> Option<f64> {
    match s.trim().parse::<f64>() {
        Ok(x) if !x.is_nan() => Some(x),
        _ => None,
    }
}

fn numeric_kind(values: &[Value]) -> ColumnKind {
    let all_integral = values.iter().all(|v| match v {
        Value::Number(x) => x.fract() == 0.0,
        _ => false,
    });
    if all_integral && !values.is_empty() {
        ColumnKind::Integer
    } else {
        ColumnKind::Float
    }
}

fn infer_column(name: String, raw: Vec<Option<String>>) -> Column {
    let no_missing = raw.iter().all(|c| c.is_some());
    let all_int = no_missing
        && !raw.is_empty()
        && raw
            .iter()
            .flatten()
            .all(|s| s.trim().parse::<i64>().is_ok());
    let all_float = raw.iter().flatten().all(|s| parse_number(s).is_some());

    let kind = if all_int {
        ColumnKind::Integer
    } else if all_float {
        ColumnKind::Float
    } else {
        ColumnKind::Text
    };

    let values = raw
        .into_iter()
        .map(|cell| match (cell, kind) {
            (None, _) => Value::Missing,
            (Some(s), ColumnKind::Text) => Value::Text(s),
            // Checked above for all the cells of numeric columns.
            (Some(s), _) => parse_number(&s).map(Value::Number).unwrap_or(Value::Missing),
        })
        .collect();
    Column { name, kind, values }
}

/// Renames repeated headers `X` to `X.1`, `X.2`, ...
fn dedup_headers(headers: Vec<String>) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut res: Vec<String> = Vec::new();
    for h in headers {
        let mut name = h.clone();
        let mut suffix = 1;
        while used.contains(&name) {
            name = format!("{}.{}", h, suffix);
            suffix += 1;
        }
        used.insert(name.clone());
        res.push(name);
    }
    res
}
