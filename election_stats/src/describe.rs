use crate::dataset::{Column, Dataset};
use crate::schema::*;
use crate::tally::value_counts;

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ColumnInfo {
    pub name: String,
    pub non_null: usize,
    pub kind: ColumnKind,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DatasetInfo {
    pub num_rows: usize,
    pub columns: Vec<ColumnInfo>,
}

/// Summary of a numeric column. The statistics are undefined when the column
/// has no value (and `std` when it has a single one).
#[derive(PartialEq, Debug, Clone)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub q50: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CategoricalSummary {
    pub column: String,
    pub count: usize,
    pub unique: usize,
    pub top: Option<String>,
    pub freq: u64,
}

pub fn dataset_info(dataset: &Dataset) -> DatasetInfo {
    DatasetInfo {
        num_rows: dataset.num_rows(),
        columns: dataset
            .columns()
            .iter()
            .map(|c| ColumnInfo {
                name: c.name.clone(),
                non_null: c.non_missing_count(),
                kind: c.kind,
            })
            .collect(),
    }
}

pub fn describe_numeric(dataset: &Dataset) -> Vec<NumericSummary> {
    dataset
        .columns()
        .iter()
        .filter(|c| c.kind.is_numeric())
        .map(numeric_summary)
        .collect()
}

pub fn describe_categorical(dataset: &Dataset) -> Vec<CategoricalSummary> {
    dataset
        .columns()
        .iter()
        .filter(|c| !c.kind.is_numeric())
        .map(categorical_summary)
        .collect()
}

pub fn numeric_summary(column: &Column) -> NumericSummary {
    let mut xs = column.numbers();
    xs.sort_by(|a, b| a.total_cmp(b));
    let n = xs.len();
    let mean = if n > 0 {
        Some(xs.iter().sum::<f64>() / n as f64)
    } else {
        None
    };
    // Sample standard deviation.
    let std = match mean {
        Some(m) if n > 1 => {
            let ss: f64 = xs.iter().map(|x| (x - m) * (x - m)).sum();
            Some((ss / (n - 1) as f64).sqrt())
        }
        _ => None,
    };
    NumericSummary {
        column: column.name.clone(),
        count: n,
        mean,
        std,
        min: xs.first().cloned(),
        q25: quantile(&xs, 0.25),
        q50: quantile(&xs, 0.5),
        q75: quantile(&xs, 0.75),
        max: xs.last().cloned(),
    }
}

pub fn categorical_summary(column: &Column) -> CategoricalSummary {
    let vc = value_counts(column);
    let (top, freq) = match vc.counts.first() {
        Some((k, c)) => (Some(k.clone()), *c),
        None => (None, 0),
    };
    CategoricalSummary {
        column: column.name.clone(),
        count: column.non_missing_count(),
        unique: vc.counts.len(),
        top,
        freq,
    }
}

/// Linear interpolation between the closest ranks. `sorted` must be sorted.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
}
