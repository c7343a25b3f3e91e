// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The columns of an election result record that the insights know about.
///
/// Any other column present in the input is carried along and reported by the
/// generic statistics, but no insight depends on it.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Field {
    Constituency,
    StateUt,
    LeadingParty,
    TrailingParty,
    Status,
    Margin,
    VotesPolled,
    Electors,
    Gender,
    /// Derived from `VotesPolled` and `Electors`.
    VoterTurnout,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::Constituency,
        Field::StateUt,
        Field::LeadingParty,
        Field::TrailingParty,
        Field::Status,
        Field::Margin,
        Field::VotesPolled,
        Field::Electors,
        Field::Gender,
        Field::VoterTurnout,
    ];

    /// The header of this field in the input file.
    pub fn column_name(&self) -> &'static str {
        match self {
            Field::Constituency => "Constituency",
            Field::StateUt => "State/UT",
            Field::LeadingParty => "Leading Party",
            Field::TrailingParty => "Trailing Party",
            Field::Status => "Status",
            Field::Margin => "Margin",
            Field::VotesPolled => "Votes Polled",
            Field::Electors => "Electors",
            Field::Gender => "Gender",
            Field::VoterTurnout => "Voter Turnout",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

/// A single cell of the dataset.
#[derive(PartialEq, Debug, Clone)]
pub enum Value {
    Missing,
    Number(f64),
    Text(String),
}

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(x) => Some(*x),
            _ => None,
        }
    }

    /// The textual form of the cell, as it would be used for a category.
    /// Numbers are rendered without a trailing `.0` when they are integral.
    pub fn as_category(&self) -> Option<String> {
        match self {
            Value::Missing => None,
            Value::Number(x) => Some(format_number(*x)),
            Value::Text(s) => Some(s.clone()),
        }
    }
}

/// Renders a number the way the report prints it.
pub fn format_number(x: f64) -> String {
    if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e15 {
        format!("{}", x as i64)
    } else {
        format!("{}", x)
    }
}

/// The storage type inferred for a column when it is loaded.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum ColumnKind {
    /// All cells are integers and none is missing.
    Integer,
    /// All non-missing cells are numbers.
    Float,
    /// Free text or mixed content.
    Text,
}

impl ColumnKind {
    pub fn is_numeric(&self) -> bool {
        !matches!(self, ColumnKind::Text)
    }

    pub fn dtype_name(&self) -> &'static str {
        match self {
            ColumnKind::Integer => "int64",
            ColumnKind::Float => "float64",
            ColumnKind::Text => "object",
        }
    }
}

// ******** Output data structures *********

/// The count of each distinct value of a categorical column.
/// Sorted by decreasing count, ties in order of first appearance.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ValueCounts {
    pub field: String,
    pub counts: Vec<(String, u64)>,
}

impl ValueCounts {
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|(_, c)| *c).sum()
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: u64,
}

/// Counts of records for each (row key, column key) pair, zero-filled.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CrossTab {
    pub row_field: String,
    pub column_field: String,
    pub row_keys: Vec<String>,
    pub column_keys: Vec<String>,
    /// `cells[i][j]` is the count for `row_keys[i]` and `column_keys[j]`.
    pub cells: Vec<Vec<u64>>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct TurnoutRow {
    /// Position of the record in the dataset.
    pub index: usize,
    pub constituency: Option<String>,
    pub state: Option<String>,
    pub turnout: f64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct StateMean {
    pub state: String,
    /// Undefined when no record of the state has a margin.
    pub mean: Option<f64>,
}

/// Errors that prevent a dataset from being assembled.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum DatasetError {
    NoColumns,
    RaggedRow {
        lineno: usize,
        expected: usize,
        found: usize,
    },
}

impl Error for DatasetError {}

impl Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::NoColumns => write!(f, "the dataset has no header row"),
            DatasetError::RaggedRow {
                lineno,
                expected,
                found,
            } => write!(
                f,
                "line {}: expected at most {} fields, found {}",
                lineno, expected, found
            ),
        }
    }
}
