use log::{info, warn};

use crate::dataset::Dataset;
use crate::describe::*;
use crate::insights::*;
use crate::schema::*;

/// The descriptive statistics of a dataset at one point of the pipeline.
#[derive(PartialEq, Debug, Clone)]
pub struct Description {
    pub info: DatasetInfo,
    pub duplicated_rows: usize,
    pub numeric: Vec<NumericSummary>,
    pub categorical: Vec<CategoricalSummary>,
}

/// What the cleaning stage changed.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CleaningReport {
    /// The number of margins that could not be read as numbers, or `None`
    /// when there is no margin column.
    pub margins_lost: Option<usize>,
}

/// The state of one run of the report.
///
/// The pipeline owns the dataset for the whole run. The stages are meant to be
/// called in order: describe, clean, missing values, insights.
pub struct Pipeline {
    dataset: Dataset,
    settings: InsightSettings,
}

impl Pipeline {
    pub fn new(dataset: Dataset, settings: InsightSettings) -> Pipeline {
        Pipeline { dataset, settings }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn settings(&self) -> &InsightSettings {
        &self.settings
    }

    pub fn describe(&self) -> Description {
        Description {
            info: dataset_info(&self.dataset),
            duplicated_rows: self.dataset.duplicated_rows(),
            numeric: describe_numeric(&self.dataset),
            categorical: describe_categorical(&self.dataset),
        }
    }

    /// Converts the margins to numbers.
    pub fn clean(&mut self) -> CleaningReport {
        let margins_lost = self.dataset.coerce_numeric(Field::Margin);
        match margins_lost {
            Some(n) => info!("Cleaned column {}: {} value(s) now missing", Field::Margin, n),
            None => warn!("No column {} to clean", Field::Margin),
        }
        CleaningReport { margins_lost }
    }

    pub fn missing_values(&self) -> Vec<(String, usize)> {
        self.dataset.missing_counts()
    }

    /// Computes one insight. The voter turnout column is derived, replacing
    /// any column of that name, when the turnout insight runs.
    pub fn run_insight(&mut self, insight: Insight) -> InsightOutcome {
        if insight == Insight::TopTurnout {
            self.dataset.derive_voter_turnout();
        }
        compute_insight(&self.dataset, insight, &self.settings)
    }

    /// Computes all the insights, in report order.
    pub fn run_all(&mut self) -> Vec<(Insight, InsightOutcome)> {
        Insight::ALL
            .iter()
            .map(|i| (*i, self.run_insight(*i)))
            .collect()
    }
}
