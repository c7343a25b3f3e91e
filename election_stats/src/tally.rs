// Counting and aggregation primitives over dataset columns.

use log::debug;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::dataset::{Column, Dataset, ElectionRecord};
use crate::schema::*;

/// Counts the distinct non-missing values of a column.
///
/// The result is sorted by decreasing count. Values with the same count keep
/// the order in which they first appear in the column.
pub fn value_counts(column: &Column) -> ValueCounts {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, u64> = HashMap::new();
    for v in column.values.iter() {
        if let Some(key) = v.as_category() {
            let c = counts.entry(key.clone()).or_insert(0);
            if *c == 0 {
                order.push(key);
            }
            *c += 1;
        }
    }
    let mut res: Vec<(String, u64)> = order
        .into_iter()
        .map(|k| {
            let c = counts[&k];
            (k, c)
        })
        .collect();
    // Stable: equal counts stay in order of appearance.
    res.sort_by(|a, b| b.1.cmp(&a.1));
    ValueCounts {
        field: column.name.clone(),
        counts: res,
    }
}

/// Splits the non-missing values into `num_bins` bins of equal width.
///
/// The bins cover the range of the values, and the last bin includes its
/// upper edge. A range reduced to a single point is widened by 0.5 on each
/// side.
pub fn histogram(values: &[f64], num_bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().cloned().filter(|x| x.is_finite()).collect();
    if finite.is_empty() || num_bins == 0 {
        return vec![];
    }
    let mut lo = finite.iter().cloned().fold(f64::INFINITY, f64::min);
    let mut hi = finite.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / num_bins as f64;
    let mut bins: Vec<HistogramBin> = (0..num_bins)
        .map(|i| HistogramBin {
            lower: lo + width * i as f64,
            upper: if i + 1 == num_bins {
                hi
            } else {
                lo + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();
    for x in finite {
        let idx = (((x - lo) / width).floor() as usize).min(num_bins - 1);
        bins[idx].count += 1;
    }
    debug!("histogram: {} bins of width {}", num_bins, width);
    bins
}

/// Counts the records for each pair of values of two columns.
///
/// Keys are sorted on both axes. Records with a missing key are dropped.
pub fn cross_tab(dataset: &Dataset, row_field: Field, column_field: Field) -> Option<CrossTab> {
    let rows = dataset.field(row_field)?;
    let cols = dataset.field(column_field)?;
    let mut pairs: BTreeMap<(String, String), u64> = BTreeMap::new();
    let mut row_keys: BTreeSet<String> = BTreeSet::new();
    let mut column_keys: BTreeSet<String> = BTreeSet::new();
    for (r, c) in rows.values.iter().zip(cols.values.iter()) {
        if let (Some(r), Some(c)) = (r.as_category(), c.as_category()) {
            row_keys.insert(r.clone());
            column_keys.insert(c.clone());
            *pairs.entry((r, c)).or_insert(0) += 1;
        }
    }
    let row_keys: Vec<String> = row_keys.into_iter().collect();
    let column_keys: Vec<String> = column_keys.into_iter().collect();
    let cells = row_keys
        .iter()
        .map(|r| {
            column_keys
                .iter()
                .map(|c| pairs.get(&(r.clone(), c.clone())).cloned().unwrap_or(0))
                .collect()
        })
        .collect();
    Some(CrossTab {
        row_field: row_field.column_name().to_string(),
        column_field: column_field.column_name().to_string(),
        row_keys,
        column_keys,
        cells,
    })
}

/// The `n` records with the highest voter turnout, highest first.
///
/// Records without a turnout are left out. Records with the same turnout keep
/// their order in the dataset.
pub fn top_turnout(records: &[ElectionRecord], n: usize) -> Vec<TurnoutRow> {
    let mut rows: Vec<TurnoutRow> = records
        .iter()
        .enumerate()
        .filter_map(|(index, r)| {
            r.turnout().map(|turnout| TurnoutRow {
                index,
                constituency: r.constituency.clone(),
                state: r.state.clone(),
                turnout,
            })
        })
        .collect();
    rows.sort_by(|a, b| b.turnout.total_cmp(&a.turnout));
    rows.truncate(n);
    rows
}

/// The mean margin of each state, highest first.
///
/// States are first ordered by name, so states with the same mean appear in
/// alphabetical order. A state without any margin has no mean and comes last.
pub fn mean_margin_by_state(records: &[ElectionRecord]) -> Vec<StateMean> {
    let mut groups: BTreeMap<String, (f64, u64)> = BTreeMap::new();
    for r in records.iter() {
        if let Some(state) = &r.state {
            let entry = groups.entry(state.clone()).or_insert((0.0, 0));
            if let Some(m) = r.margin {
                entry.0 += m;
                entry.1 += 1;
            }
        }
    }
    let mut res: Vec<StateMean> = groups
        .into_iter()
        .map(|(state, (sum, count))| StateMean {
            state,
            mean: if count > 0 {
                Some(sum / count as f64)
            } else {
                None
            },
        })
        .collect();
    res.sort_by(|a, b| match (a.mean, b.mean) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_column(values: &[Option<&str>]) -> Column {
        Column {
            name: "Leading Party".to_string(),
            kind: ColumnKind::Text,
            values: values
                .iter()
                .map(|v| match v {
                    Some(s) => Value::Text(s.to_string()),
                    None => Value::Missing,
                })
                .collect(),
        }
    }

    fn record(state: Option<&str>, margin: Option<f64>) -> ElectionRecord {
        ElectionRecord {
            state: state.map(|s| s.to_string()),
            margin,
            ..Default::default()
        }
    }

    fn turnout(constituency: &str, t: Option<f64>) -> ElectionRecord {
        ElectionRecord {
            constituency: Some(constituency.to_string()),
            votes_polled: t,
            electors: Some(100.0),
            ..Default::default()
        }
    }

    #[test]
    fn value_counts_sorted_and_summing_to_non_missing() {
        let col = text_column(&[
            Some("INC"),
            Some("BJP"),
            None,
            Some("BJP"),
            Some("CPI"),
            Some("INC"),
            Some("BJP"),
            None,
        ]);
        let vc = value_counts(&col);
        assert_eq!(
            vc.counts,
            vec![
                ("BJP".to_string(), 3),
                ("INC".to_string(), 2),
                ("CPI".to_string(), 1)
            ]
        );
        assert_eq!(vc.total(), col.non_missing_count() as u64);
    }

    #[test]
    fn value_counts_ties_keep_first_appearance() {
        let col = text_column(&[Some("b"), Some("a"), Some("c"), Some("a"), Some("b")]);
        let keys: Vec<String> = value_counts(&col).counts.into_iter().map(|p| p.0).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn histogram_covers_range() {
        let bins = histogram(&[0.0, 1.0, 2.0, 3.0, 4.0], 4);
        assert_eq!(bins.len(), 4);
        let counts: Vec<u64> = bins.iter().map(|b| b.count).collect();
        // The maximum falls in the last bin.
        assert_eq!(counts, vec![1, 1, 1, 2]);
        assert_eq!(bins[0].lower, 0.0);
        assert_eq!(bins[3].upper, 4.0);
    }

    #[test]
    fn histogram_single_value_and_empty() {
        let bins = histogram(&[7.0, 7.0], 2);
        assert_eq!(bins[0].lower, 6.5);
        assert_eq!(bins[1].upper, 7.5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<u64>(), 2);
        assert!(histogram(&[], 30).is_empty());
    }

    #[test]
    fn top_turnout_is_stable_and_bounded() {
        let mut records: Vec<ElectionRecord> = (0..15)
            .map(|i| turnout(&format!("C{}", i), Some(50.0 + (i % 5) as f64)))
            .collect();
        records.push(turnout("missing", None));
        let top = top_turnout(&records, 10);
        assert_eq!(top.len(), 10);
        for w in top.windows(2) {
            assert!(w[0].turnout >= w[1].turnout);
        }
        // Three records at 54.0: C4, C9, C14, in that order.
        let first: Vec<usize> = top.iter().take(3).map(|r| r.index).collect();
        assert_eq!(first, vec![4, 9, 14]);
        assert!(top.iter().all(|r| r.constituency.as_deref() != Some("missing")));
    }

    #[test]
    fn top_turnout_fewer_than_n() {
        let records = vec![turnout("A", Some(60.0)), turnout("B", Some(70.0))];
        let top = top_turnout(&records, 10);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].constituency.as_deref(), Some("B"));
    }

    #[test]
    fn mean_margin_per_state() {
        let records = vec![
            record(Some("Goa"), Some(10.0)),
            record(Some("Bihar"), Some(5.0)),
            record(Some("Goa"), Some(20.0)),
            record(Some("Assam"), None),
            record(None, Some(1000.0)),
            record(Some("Goa"), Some(30.0)),
            record(Some("Bihar"), None),
        ];
        let means = mean_margin_by_state(&records);
        assert_eq!(
            means,
            vec![
                StateMean {
                    state: "Goa".to_string(),
                    mean: Some(20.0)
                },
                StateMean {
                    state: "Bihar".to_string(),
                    mean: Some(5.0)
                },
                StateMean {
                    state: "Assam".to_string(),
                    mean: None
                },
            ]
        );
    }

    #[test]
    fn cross_tab_zero_fills() {
        let headers: Vec<String> = vec!["State/UT".to_string(), "Leading Party".to_string()];
        let rows: Vec<Vec<String>> = vec![
            vec!["Goa".to_string(), "INC".to_string()],
            vec!["Assam".to_string(), "BJP".to_string()],
            vec!["Goa".to_string(), "BJP".to_string()],
            vec!["Goa".to_string(), "INC".to_string()],
            vec!["".to_string(), "INC".to_string()],
        ];
        let ds = Dataset::from_rows(headers, rows).unwrap();
        let ct = cross_tab(&ds, Field::StateUt, Field::LeadingParty).unwrap();
        assert_eq!(ct.row_keys, vec!["Assam", "Goa"]);
        assert_eq!(ct.column_keys, vec!["BJP", "INC"]);
        assert_eq!(ct.cells, vec![vec![1, 0], vec![1, 2]]);
        assert!(cross_tab(&ds, Field::StateUt, Field::Gender).is_none());
    }
}
