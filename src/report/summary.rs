// JSON summary of a report run.

use serde_json::json;

use crate::report::*;

fn insight_data_to_json(data: &InsightData) -> JSValue {
    match data {
        InsightData::Counts(vc) => {
            let counts: Vec<JSValue> = vc
                .counts
                .iter()
                .map(|(value, count)| json!({"value": value, "count": count}))
                .collect();
            json!({"field": vc.field, "counts": counts})
        }
        InsightData::Histogram(bins) => {
            let bins: Vec<JSValue> = bins
                .iter()
                .map(|b| json!({"lower": b.lower, "upper": b.upper, "count": b.count}))
                .collect();
            json!({ "bins": bins })
        }
        InsightData::CrossTab(ct) => json!({
            "rowField": ct.row_field,
            "columnField": ct.column_field,
            "rows": ct.row_keys,
            "columns": ct.column_keys,
            "cells": ct.cells,
        }),
        InsightData::Turnout(rows) => {
            let rows: Vec<JSValue> = rows
                .iter()
                .map(|r| {
                    json!({
                        "index": r.index,
                        "constituency": r.constituency,
                        "state": r.state,
                        "turnout": r.turnout,
                    })
                })
                .collect();
            json!({ "rows": rows })
        }
        InsightData::StateMeans(means) => {
            let states: Vec<JSValue> = means
                .iter()
                .map(|m| json!({"state": m.state, "mean": m.mean}))
                .collect();
            json!({ "states": states })
        }
    }
}

pub fn build_summary_js(
    description: &Description,
    cleaning: &CleaningReport,
    missing: &[(String, usize)],
    outcomes: &[(Insight, InsightOutcome)],
) -> JSValue {
    let columns: Vec<JSValue> = description
        .info
        .columns
        .iter()
        .map(|c| json!({"name": c.name, "dtype": c.kind.dtype_name(), "nonNull": c.non_null}))
        .collect();
    let missing_values: Vec<JSValue> = missing
        .iter()
        .map(|(column, n)| json!({"column": column, "missing": n}))
        .collect();
    let insights: Vec<JSValue> = outcomes
        .iter()
        .map(|(insight, outcome)| match outcome {
            InsightOutcome::Computed(data) => json!({
                "number": insight.number(),
                "title": insight.title(),
                "status": "computed",
                "data": insight_data_to_json(data),
            }),
            InsightOutcome::Skipped { missing } => {
                let names: Vec<&str> = missing.iter().map(|f| f.column_name()).collect();
                json!({
                    "number": insight.number(),
                    "title": insight.title(),
                    "status": "skipped",
                    "missingColumns": names,
                })
            }
        })
        .collect();
    json!({
        "dataset": {
            "rows": description.info.num_rows,
            "columns": columns,
            "duplicatedRows": description.duplicated_rows,
        },
        "cleaning": { "marginsLost": cleaning.margins_lost },
        "missingValues": missing_values,
        "insights": insights,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skipped_insights_name_missing_columns() {
        let ds = Dataset::from_rows(vec!["Margin".to_string()], vec![vec!["1".to_string()]])
            .unwrap();
        let mut pipeline = Pipeline::new(ds, InsightSettings::DEFAULT_SETTINGS);
        let description = pipeline.describe();
        let cleaning = pipeline.clean();
        let missing = pipeline.missing_values();
        let outcomes = pipeline.run_all();
        let js = build_summary_js(&description, &cleaning, &missing, &outcomes);
        assert_eq!(js["dataset"]["rows"], json!(1));
        assert_eq!(js["cleaning"]["marginsLost"], json!(0));
        assert_eq!(js["insights"][3]["status"], "computed");
        assert_eq!(
            js["insights"][8]["missingColumns"],
            json!(["Votes Polled", "Electors"])
        );
        assert_eq!(js["insights"][9]["missingColumns"], json!(["State/UT"]));
    }

    #[test]
    fn undefined_mean_is_null() {
        let data = InsightData::StateMeans(vec![StateMean {
            state: "Assam".to_string(),
            mean: None,
        }]);
        let js = insight_data_to_json(&data);
        assert_eq!(js["states"][0]["mean"], JSValue::Null);
    }
}
