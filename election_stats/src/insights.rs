// The catalogue of insights computed on an election dataset.

use log::{debug, info};

use crate::dataset::Dataset;
use crate::schema::*;
use crate::tally::*;

/// One of the ten summaries of the report, in report order.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Insight {
    LeadingPartyCounts,
    TrailingPartyCounts,
    StatusCounts,
    MarginDistribution,
    LeadingPartyChart,
    PartiesByState,
    SeatDistribution,
    GenderDistribution,
    TopTurnout,
    MarginByState,
}

impl Insight {
    pub const ALL: [Insight; 10] = [
        Insight::LeadingPartyCounts,
        Insight::TrailingPartyCounts,
        Insight::StatusCounts,
        Insight::MarginDistribution,
        Insight::LeadingPartyChart,
        Insight::PartiesByState,
        Insight::SeatDistribution,
        Insight::GenderDistribution,
        Insight::TopTurnout,
        Insight::MarginByState,
    ];

    /// Position in the report, starting at 1.
    pub fn number(&self) -> usize {
        Insight::ALL
            .iter()
            .position(|i| i == self)
            .map(|p| p + 1)
            .unwrap_or(0)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Insight::LeadingPartyCounts => "Count of Leading Parties",
            Insight::TrailingPartyCounts => "Count of Trailing Parties",
            Insight::StatusCounts => "Status Counts",
            Insight::MarginDistribution => "Distribution of Winning Margins",
            Insight::LeadingPartyChart => "Leading Party Count",
            Insight::PartiesByState => "Frequency of Leading Parties by State/UT",
            Insight::SeatDistribution => "Seat Distribution by Party within Each State",
            Insight::GenderDistribution => "Gender Distribution of Elected Representatives",
            Insight::TopTurnout => "Top 10 Constituencies with the Highest Voter Turnout",
            Insight::MarginByState => "Average Winning Margin by State",
        }
    }

    /// The fields that must be present in the dataset for the insight to be
    /// computed.
    pub fn required_fields(&self) -> &'static [Field] {
        match self {
            Insight::LeadingPartyCounts | Insight::LeadingPartyChart => &[Field::LeadingParty],
            Insight::TrailingPartyCounts => &[Field::TrailingParty],
            Insight::StatusCounts => &[Field::Status],
            Insight::MarginDistribution => &[Field::Margin],
            Insight::PartiesByState | Insight::SeatDistribution => {
                &[Field::StateUt, Field::LeadingParty]
            }
            Insight::GenderDistribution => &[Field::Gender],
            Insight::TopTurnout => &[Field::VotesPolled, Field::Electors],
            Insight::MarginByState => &[Field::StateUt, Field::Margin],
        }
    }

    /// Whether the report prints the computed data as text, in addition to
    /// handing it to the chart renderer.
    pub fn prints_table(&self) -> bool {
        !matches!(
            self,
            Insight::MarginDistribution
                | Insight::LeadingPartyChart
                | Insight::PartiesByState
                | Insight::SeatDistribution
        )
    }

    /// Whether the insight is drawn.
    pub fn has_chart(&self) -> bool {
        !matches!(
            self,
            Insight::LeadingPartyCounts | Insight::TrailingPartyCounts | Insight::StatusCounts
        )
    }
}

/// Tunable parameters of the insights.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct InsightSettings {
    pub histogram_bins: usize,
    pub top_turnout_count: usize,
}

impl InsightSettings {
    pub const DEFAULT_SETTINGS: InsightSettings = InsightSettings {
        histogram_bins: 30,
        top_turnout_count: 10,
    };
}

/// The data computed for an insight.
#[derive(PartialEq, Debug, Clone)]
pub enum InsightData {
    Counts(ValueCounts),
    Histogram(Vec<HistogramBin>),
    CrossTab(CrossTab),
    Turnout(Vec<TurnoutRow>),
    StateMeans(Vec<StateMean>),
}

#[derive(PartialEq, Debug, Clone)]
pub enum InsightOutcome {
    Computed(InsightData),
    /// The insight was not computed because some required columns are absent.
    Skipped { missing: Vec<Field> },
}

impl InsightOutcome {
    pub fn data(&self) -> Option<&InsightData> {
        match self {
            InsightOutcome::Computed(d) => Some(d),
            InsightOutcome::Skipped { .. } => None,
        }
    }
}

/// Computes one insight on the dataset.
///
/// The dataset is expected to be cleaned already: text margins are not
/// counted by the numeric insights.
pub fn compute_insight(
    dataset: &Dataset,
    insight: Insight,
    settings: &InsightSettings,
) -> InsightOutcome {
    let missing = dataset.missing_fields(insight.required_fields());
    if !missing.is_empty() {
        info!(
            "Skipping insight {} ({}): missing columns {:?}",
            insight.number(),
            insight.title(),
            missing
        );
        return InsightOutcome::Skipped { missing };
    }

    let counts_of = |field: Field| -> Option<InsightData> {
        dataset
            .field(field)
            .map(|c| InsightData::Counts(value_counts(c)))
    };

    let data = match insight {
        Insight::LeadingPartyCounts | Insight::LeadingPartyChart => {
            counts_of(Field::LeadingParty)
        }
        Insight::TrailingPartyCounts => counts_of(Field::TrailingParty),
        Insight::StatusCounts => counts_of(Field::Status),
        Insight::GenderDistribution => counts_of(Field::Gender),
        Insight::MarginDistribution => dataset
            .field(Field::Margin)
            .map(|c| InsightData::Histogram(histogram(&c.numbers(), settings.histogram_bins))),
        Insight::PartiesByState | Insight::SeatDistribution => {
            cross_tab(dataset, Field::StateUt, Field::LeadingParty).map(InsightData::CrossTab)
        }
        Insight::TopTurnout => Some(InsightData::Turnout(top_turnout(
            &dataset.records(),
            settings.top_turnout_count,
        ))),
        Insight::MarginByState => Some(InsightData::StateMeans(mean_margin_by_state(
            &dataset.records(),
        ))),
    };
    debug!("compute_insight: {:?}: {:?}", insight, data);
    match data {
        Some(d) => InsightOutcome::Computed(d),
        // Only reachable if the required fields above are incomplete.
        None => InsightOutcome::Skipped {
            missing: insight.required_fields().to_vec(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(headers: &[&str], rows: &[&[&str]]) -> Dataset {
        Dataset::from_rows(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn numbers_follow_report_order() {
        assert_eq!(Insight::LeadingPartyCounts.number(), 1);
        assert_eq!(Insight::GenderDistribution.number(), 8);
        assert_eq!(Insight::MarginByState.number(), 10);
    }

    #[test]
    fn skips_when_gender_is_absent() {
        let ds = dataset(&["Leading Party"], &[&["BJP"]]);
        let out = compute_insight(
            &ds,
            Insight::GenderDistribution,
            &InsightSettings::DEFAULT_SETTINGS,
        );
        assert_eq!(
            out,
            InsightOutcome::Skipped {
                missing: vec![Field::Gender]
            }
        );
        let out = compute_insight(
            &ds,
            Insight::LeadingPartyCounts,
            &InsightSettings::DEFAULT_SETTINGS,
        );
        assert!(out.data().is_some());
    }

    #[test]
    fn turnout_skipped_without_electors() {
        let ds = dataset(&["Constituency", "Votes Polled"], &[&["A", "10"]]);
        let out = compute_insight(&ds, Insight::TopTurnout, &InsightSettings::DEFAULT_SETTINGS);
        assert_eq!(
            out,
            InsightOutcome::Skipped {
                missing: vec![Field::Electors]
            }
        );
    }

    #[test]
    fn turnout_computed_without_derived_column() {
        let ds = dataset(
            &["Constituency", "Votes Polled", "Electors"],
            &[&["A", "10", "20"], &["B", "", "20"], &["C", "15", "20"]],
        );
        let out = compute_insight(&ds, Insight::TopTurnout, &InsightSettings::DEFAULT_SETTINGS);
        match out {
            InsightOutcome::Computed(InsightData::Turnout(rows)) => {
                let names: Vec<Option<String>> =
                    rows.iter().map(|r| r.constituency.clone()).collect();
                assert_eq!(names, vec![Some("C".to_string()), Some("A".to_string())]);
                assert_eq!(rows[0].turnout, 75.0);
                assert_eq!(rows[1].turnout, 50.0);
            }
            x => panic!("unexpected outcome {:?}", x),
        }
    }

    #[test]
    fn histogram_uses_setting() {
        let ds = dataset(&["Margin"], &[&["1"], &["2"], &["3"]]);
        let settings = InsightSettings {
            histogram_bins: 2,
            top_turnout_count: 10,
        };
        match compute_insight(&ds, Insight::MarginDistribution, &settings) {
            InsightOutcome::Computed(InsightData::Histogram(bins)) => {
                assert_eq!(bins.len(), 2);
                assert_eq!(bins.iter().map(|b| b.count).sum::<u64>(), 3);
            }
            x => panic!("unexpected outcome {:?}", x),
        }
    }
}
