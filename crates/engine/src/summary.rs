//! Aggregation engine: derives summary tables from materialized detail
//! rows. Pure function of its inputs; the only signals besides the tables
//! themselves are warning values for summaries whose grouping column is
//! absent (those degrade to empty blocks, never abort the worksheet).

use std::collections::BTreeMap;

use crate::model::{RowSet, SummaryKind, SummaryRow, SummaryTable, Warning};

/// Grouping column for the issue-state summary.
pub const ISSUE_STATE_COLUMN: &str = "Issue_State";
/// Grouping column for the resident-state summary.
pub const RESIDENT_STATE_COLUMN: &str = "Resident_State";
/// Numeric column bucketed by the TAT summary. May arrive as text.
pub const TAT_COLUMN: &str = "TAT_in_Days";
/// Year-granularity column grouped by the pay-req summary.
pub const PAYREQ_COLUMN: &str = "Year_Pay_Req_Received";
/// Designated count column: a row counts toward state/pay-req summaries
/// only when this column is non-null. Case-sensitive by contract.
pub const COUNT_COLUMN: &str = "Policy_Num";

/// The four TAT buckets: fixed order, mutually exclusive, collectively
/// exhaustive over [-1, +inf). Values below -1 (and non-numeric values)
/// fall outside every bucket and are excluded from the grand total.
pub const TAT_BUCKET_LABELS: [&str; 4] = ["-1 to <31", ">30 and <61", ">60 and <91", ">90"];

/// Bucket index for a TAT value, or None when the value is out of range.
pub fn tat_bucket(tat: f64) -> Option<usize> {
    if !tat.is_finite() || tat < -1.0 {
        None
    } else if tat < 31.0 {
        Some(0)
    } else if tat < 61.0 {
        Some(1)
    } else if tat < 91.0 {
        Some(2)
    } else {
        Some(3)
    }
}

/// Compute the summary tables a template requires, in their fixed order.
/// Missing grouping columns produce a warning and an empty block in place.
pub fn summarize(rows: &RowSet, kinds: &[SummaryKind]) -> (Vec<SummaryTable>, Vec<Warning>) {
    let mut tables = Vec::with_capacity(kinds.len());
    let mut warnings = Vec::new();

    for &kind in kinds {
        let group_column = match kind {
            SummaryKind::StateIssue => ISSUE_STATE_COLUMN,
            SummaryKind::StateResident => RESIDENT_STATE_COLUMN,
            SummaryKind::Tat => TAT_COLUMN,
            SummaryKind::PayReq => PAYREQ_COLUMN,
        };

        let Some(group_idx) = rows.column_index(group_column) else {
            warnings.push(Warning::MissingSummaryColumn {
                kind,
                column: group_column.to_string(),
            });
            tables.push(SummaryTable::empty(kind));
            continue;
        };

        let table = match kind {
            SummaryKind::StateIssue | SummaryKind::StateResident => {
                state_summary(rows, kind, group_idx)
            }
            SummaryKind::Tat => tat_summary(rows, group_idx),
            SummaryKind::PayReq => payreq_summary(rows, group_idx),
        };
        tables.push(table);
    }

    (tables, warnings)
}

/// Group by state label, ascending. Rows with a null state are excluded
/// from this summary only; they stay in the detail block untouched.
fn state_summary(rows: &RowSet, kind: SummaryKind, group_idx: usize) -> SummaryTable {
    let count_idx = rows.column_index(COUNT_COLUMN);
    let mut groups: BTreeMap<String, u64> = BTreeMap::new();

    for row in &rows.rows {
        let group = &row[group_idx];
        if group.is_null() {
            continue;
        }
        let counted = match count_idx {
            Some(idx) => !row[idx].is_null(),
            // No count column in the result set: every row in the group counts.
            None => true,
        };
        let entry = groups.entry(group.display()).or_insert(0);
        if counted {
            *entry += 1;
        }
    }

    SummaryTable {
        kind,
        headers: kind.headers(),
        rows: groups
            .into_iter()
            .map(|(label, count)| SummaryRow {
                label,
                count,
                percent: None,
                is_grand_total: false,
            })
            .collect(),
        grand_total: None,
    }
}

/// Bucket TAT values into the four fixed ranges with percentage-of-total.
/// All four bucket rows are always emitted, plus a grand-total row.
fn tat_summary(rows: &RowSet, group_idx: usize) -> SummaryTable {
    let mut counts = [0u64; 4];

    for row in &rows.rows {
        // Non-numeric and null values are excluded from every bucket but
        // retained in the detail block.
        if let Some(bucket) = row[group_idx].as_number().and_then(tat_bucket) {
            counts[bucket] += 1;
        }
    }

    let grand_total: u64 = counts.iter().sum();

    let mut out = Vec::with_capacity(5);
    for (label, &count) in TAT_BUCKET_LABELS.iter().zip(counts.iter()) {
        out.push(SummaryRow {
            label: (*label).to_string(),
            count,
            percent: Some(percent_of(count, grand_total)),
            is_grand_total: false,
        });
    }
    out.push(SummaryRow {
        label: "Grand Total".to_string(),
        count: grand_total,
        percent: Some(if grand_total > 0 { 100.0 } else { 0.0 }),
        is_grand_total: true,
    });

    SummaryTable {
        kind: SummaryKind::Tat,
        headers: SummaryKind::Tat.headers(),
        rows: out,
        grand_total: Some(grand_total),
    }
}

/// Percentage rounded to one decimal place; zero when the total is zero.
fn percent_of(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = (count as f64 / total as f64) * 100.0;
    (pct * 10.0).round() / 10.0
}

/// Counts per year of the pay-req column, ascending. The column is already
/// year-granularity; anything that doesn't coerce to a number is excluded.
fn payreq_summary(rows: &RowSet, group_idx: usize) -> SummaryTable {
    let count_idx = rows.column_index(COUNT_COLUMN);
    let mut groups: BTreeMap<i64, u64> = BTreeMap::new();

    for row in &rows.rows {
        let Some(year) = row[group_idx].as_number() else {
            continue;
        };
        let counted = match count_idx {
            Some(idx) => !row[idx].is_null(),
            None => true,
        };
        let entry = groups.entry(year as i64).or_insert(0);
        if counted {
            *entry += 1;
        }
    }

    SummaryTable {
        kind: SummaryKind::PayReq,
        headers: SummaryKind::PayReq.headers(),
        rows: groups
            .into_iter()
            .map(|(year, count)| SummaryRow {
                label: year.to_string(),
                count,
                percent: None,
                is_grand_total: false,
            })
            .collect(),
        grand_total: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regsheet_core::Value;

    fn rowset(columns: &[&str], rows: Vec<Vec<Value>>) -> RowSet {
        RowSet::new(columns.iter().map(|c| c.to_string()).collect(), rows)
    }

    fn state_rows(states: &[Option<&str>]) -> RowSet {
        rowset(
            &["Policy_Num", "Issue_State"],
            states
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    vec![
                        Value::from(format!("P{i}")),
                        s.map(Value::from).unwrap_or(Value::Null),
                    ]
                })
                .collect(),
        )
    }

    #[test]
    fn state_grouping_sorts_and_excludes_nulls() {
        let rows = state_rows(&[Some("TX"), Some("TX"), Some("CA"), None]);
        let (tables, warnings) = summarize(&rows, &[SummaryKind::StateIssue]);
        assert!(warnings.is_empty());
        let t = &tables[0];
        assert_eq!(t.rows.len(), 2);
        assert_eq!((t.rows[0].label.as_str(), t.rows[0].count), ("CA", 1));
        assert_eq!((t.rows[1].label.as_str(), t.rows[1].count), ("TX", 2));
    }

    #[test]
    fn state_count_requires_non_null_policy_num() {
        let rows = rowset(
            &["Policy_Num", "Issue_State"],
            vec![
                vec![Value::from("P1"), Value::from("TX")],
                vec![Value::Null, Value::from("TX")],
            ],
        );
        let (tables, _) = summarize(&rows, &[SummaryKind::StateIssue]);
        assert_eq!(tables[0].rows[0].count, 1);
    }

    #[test]
    fn tat_buckets_are_exhaustive_and_exclusive() {
        // Boundary values: each maps to exactly one bucket.
        assert_eq!(tat_bucket(-1.0), Some(0));
        assert_eq!(tat_bucket(30.9), Some(0));
        assert_eq!(tat_bucket(31.0), Some(1));
        assert_eq!(tat_bucket(60.9), Some(1));
        assert_eq!(tat_bucket(61.0), Some(2));
        assert_eq!(tat_bucket(90.9), Some(2));
        assert_eq!(tat_bucket(91.0), Some(3));
        assert_eq!(tat_bucket(10_000.0), Some(3));
        assert_eq!(tat_bucket(-1.1), None);
        assert_eq!(tat_bucket(f64::NAN), None);
    }

    #[test]
    fn tat_counts_sum_to_grand_total() {
        let values: Vec<Vec<Value>> = [0.0, 15.0, 30.0, 31.0, 45.0, 61.0, 90.0, 91.0, 400.0]
            .iter()
            .map(|&v| vec![Value::Number(v)])
            .collect();
        let rows = rowset(&["TAT_in_Days"], values);
        let (tables, _) = summarize(&rows, &[SummaryKind::Tat]);
        let t = &tables[0];
        assert_eq!(t.grand_total, Some(9));
        let bucket_sum: u64 = t.rows.iter().filter(|r| !r.is_grand_total).map(|r| r.count).sum();
        assert_eq!(bucket_sum, 9);
        assert_eq!(t.rows.len(), 5, "four buckets plus grand total");
        assert!(t.rows[4].is_grand_total);
    }

    #[test]
    fn tat_percentages_round_to_one_decimal() {
        let mut values = Vec::new();
        for (n, tat) in [(10, 5.0), (20, 40.0), (30, 70.0), (40, 120.0)] {
            for _ in 0..n {
                values.push(vec![Value::Number(tat)]);
            }
        }
        let rows = rowset(&["TAT_in_Days"], values);
        let (tables, _) = summarize(&rows, &[SummaryKind::Tat]);
        let t = &tables[0];
        let pcts: Vec<f64> = t.rows.iter().filter_map(|r| r.percent).collect();
        assert_eq!(pcts, vec![10.0, 20.0, 30.0, 40.0, 100.0]);
        let sum: f64 = pcts[..4].iter().sum();
        assert_eq!(sum, 100.0);
    }

    #[test]
    fn tat_coerces_text_and_excludes_invalid() {
        let rows = rowset(
            &["TAT_in_Days"],
            vec![
                vec![Value::from("12")],
                vec![Value::from("95")],
                vec![Value::from("pending")],
                vec![Value::Null],
                vec![Value::Number(-5.0)],
            ],
        );
        let (tables, _) = summarize(&rows, &[SummaryKind::Tat]);
        let t = &tables[0];
        assert_eq!(t.grand_total, Some(2));
        assert_eq!(t.rows[0].count, 1);
        assert_eq!(t.rows[3].count, 1);
    }

    #[test]
    fn tat_zero_total_reports_zero_percentages() {
        let rows = rowset(&["TAT_in_Days"], vec![]);
        let (tables, _) = summarize(&rows, &[SummaryKind::Tat]);
        let t = &tables[0];
        assert_eq!(t.grand_total, Some(0));
        assert_eq!(t.rows.len(), 5);
        for r in &t.rows {
            assert_eq!(r.count, 0);
            assert_eq!(r.percent, Some(0.0));
        }
    }

    #[test]
    fn payreq_groups_years_ascending() {
        let rows = rowset(
            &["Policy_Num", "Year_Pay_Req_Received"],
            vec![
                vec![Value::from("P1"), Value::Number(2024.0)],
                vec![Value::from("P2"), Value::Number(2022.0)],
                vec![Value::from("P3"), Value::Number(2024.0)],
                vec![Value::from("P4"), Value::from("2023")],
                vec![Value::from("P5"), Value::Null],
            ],
        );
        let (tables, _) = summarize(&rows, &[SummaryKind::PayReq]);
        let t = &tables[0];
        let got: Vec<(&str, u64)> = t.rows.iter().map(|r| (r.label.as_str(), r.count)).collect();
        assert_eq!(got, vec![("2022", 1), ("2023", 1), ("2024", 2)]);
    }

    #[test]
    fn missing_grouping_column_degrades_to_empty_block() {
        let rows = rowset(&["Policy_Num"], vec![vec![Value::from("P1")]]);
        let (tables, warnings) = summarize(
            &rows,
            &[SummaryKind::StateIssue, SummaryKind::Tat],
        );
        assert_eq!(tables.len(), 2);
        assert!(tables[0].rows.is_empty());
        assert!(tables[1].rows.is_empty());
        assert_eq!(warnings.len(), 2);
        assert_eq!(
            warnings[0],
            Warning::MissingSummaryColumn {
                kind: SummaryKind::StateIssue,
                column: "Issue_State".into()
            }
        );
    }

    #[test]
    fn summary_matching_is_case_sensitive() {
        // Executor reported lowercase names; the contract is exact match.
        let rows = rowset(
            &["policy_num", "issue_state"],
            vec![vec![Value::from("P1"), Value::from("TX")]],
        );
        let (tables, warnings) = summarize(&rows, &[SummaryKind::StateIssue]);
        assert!(tables[0].rows.is_empty());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn empty_rowset_produces_zero_count_summaries() {
        let rows = rowset(&["Policy_Num", "Issue_State", "TAT_in_Days"], vec![]);
        let (tables, warnings) = summarize(&rows, &[SummaryKind::StateIssue, SummaryKind::Tat]);
        assert!(warnings.is_empty());
        assert!(tables[0].rows.is_empty());
        assert_eq!(tables[1].grand_total, Some(0));
    }
}
