use serde::{Deserialize, Serialize};

use regsheet_core::{ColRange, Value};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One logical worksheet as described by the report configuration.
/// Constructed once at report start, immutable afterwards.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorksheetSpec {
    /// Worksheet name, unique within a report. Doubles as the default
    /// `Schedule_ID` predicate value.
    pub name: String,
    pub table_name: Option<String>,
    /// Raw template-type string from config; resolved by the template
    /// registry (unknown values fall back with a warning, never fail).
    pub template_type: Option<String>,
    /// Explicit SQL. When present it wins verbatim and `filter` is ignored.
    pub query: Option<String>,
    /// SQL boolean fragment replacing the default `Schedule_ID` predicate.
    pub filter: Option<String>,
    /// Display labels for the detail header row. Defaults to the column
    /// names the executor actually returned.
    pub detail_columns: Option<Vec<String>>,
}

/// Connection identifiers plus the run's report date range. The engine
/// treats the dates as opaque text: they only matter when a custom query
/// references the substitution placeholders.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    pub account: String,
    pub warehouse: String,
    pub database: String,
    pub schema: String,
    pub report_start_dt: Option<String>,
    pub report_end_dt: Option<String>,
}

// ---------------------------------------------------------------------------
// Materialized rows
// ---------------------------------------------------------------------------

/// Column-name-indexed result set. `columns` are the names the executor
/// reported, case-sensitive — not the labels the caller asked for.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl RowSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Exact-match column lookup. Matching is deliberately case-sensitive:
    /// summary columns are a configuration contract, not a guess.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn value(&self, row: usize, col: usize) -> &Value {
        static NULL: Value = Value::Null;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&NULL)
    }
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryKind {
    StateIssue,
    StateResident,
    Tat,
    PayReq,
}

impl SummaryKind {
    /// Header labels for this block; length is the block's column width.
    pub fn headers(&self) -> Vec<String> {
        match self {
            Self::StateIssue => vec!["Issue State".into(), "Count".into()],
            Self::StateResident => vec!["Resident State".into(), "Count".into()],
            // First header intentionally blank: the bucket labels live in
            // the data rows, as on the original report templates.
            Self::Tat => vec![String::new(), "TAT COUNTS".into(), "% of Total".into()],
            Self::PayReq => vec!["Year Pay Req Received".into(), "Counts".into()],
        }
    }

    pub fn width(&self) -> u32 {
        self.headers().len() as u32
    }
}

impl std::fmt::Display for SummaryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StateIssue => write!(f, "state_issue"),
            Self::StateResident => write!(f, "state_resident"),
            Self::Tat => write!(f, "tat"),
            Self::PayReq => write!(f, "payreq"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub label: String,
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_grand_total: bool,
}

/// One derived aggregate block. Row order is the block's bucket order:
/// alphabetical for states, the fixed range sequence for TAT, ascending
/// year for pay-req.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryTable {
    pub kind: SummaryKind,
    pub headers: Vec<String>,
    pub rows: Vec<SummaryRow>,
    /// Sum across all TAT buckets (invalid values excluded). TAT only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grand_total: Option<u64>,
}

impl SummaryTable {
    pub fn empty(kind: SummaryKind) -> Self {
        Self {
            kind,
            headers: kind.headers(),
            rows: Vec::new(),
            grand_total: matches!(kind, SummaryKind::Tat).then_some(0u64),
        }
    }

    pub fn width(&self) -> u32 {
        self.headers.len() as u32
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SummaryPlacement {
    /// Index into the worksheet's summaries vector.
    pub summary: usize,
    pub range: ColRange,
}

/// Column assignment for one worksheet. Ranges never overlap; exactly one
/// spacer column sits between each adjacent pair of blocks.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LayoutPlan {
    pub detail: Option<ColRange>,
    pub summaries: Vec<SummaryPlacement>,
    pub spacers: Vec<u32>,
}

impl LayoutPlan {
    /// Highest occupied column, 0 when the plan is entirely empty.
    pub fn last_column(&self) -> u32 {
        let detail_end = self.detail.map(|r| r.end()).unwrap_or(0);
        let summary_end = self
            .summaries
            .iter()
            .map(|p| p.range.end())
            .max()
            .unwrap_or(0);
        detail_end.max(summary_end)
    }
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// Non-fatal signals collected during synthesis. The engine never logs;
/// callers decide what to do with these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Template string was absent or unrecognized; the legacy detail-only
    /// descriptor was used instead.
    UnknownTemplate { raw: Option<String> },
    /// A required summary grouping column is absent from the result set;
    /// that summary was rendered as an empty block.
    MissingSummaryColumn { kind: SummaryKind, column: String },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownTemplate { raw: Some(raw) } => {
                write!(f, "unknown template type '{raw}', using legacy detail-only structure")
            }
            Self::UnknownTemplate { raw: None } => {
                write!(f, "no template type given, using legacy detail-only structure")
            }
            Self::MissingSummaryColumn { kind, column } => {
                write!(f, "{kind} summary skipped: result set has no column '{column}'")
            }
        }
    }
}
