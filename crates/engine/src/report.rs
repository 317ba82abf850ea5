//! Per-worksheet synthesis: resolve -> execute -> summarize -> compose.
//!
//! Each worksheet yields its own `Result`; a failure is attributed to the
//! worksheet name and never aborts the batch. The orchestrator decides
//! whether to continue.

use crate::error::EngineError;
use crate::layout;
use crate::materialize::{materialize, QueryExecutor};
use crate::model::{LayoutPlan, RowSet, RunContext, SummaryTable, Warning, WorksheetSpec};
use crate::query;
use crate::summary;
use crate::template::{resolve_template, TemplateType};

/// Everything the spreadsheet sink needs to render one worksheet.
#[derive(Debug)]
pub struct WorksheetReport {
    pub name: String,
    pub template: TemplateType,
    pub has_detail: bool,
    /// Header labels for the detail block, positional over the executor's
    /// columns. Configured labels relabel from the left; the executor's
    /// own names fill any remainder.
    pub detail_headers: Vec<String>,
    pub detail: RowSet,
    pub summaries: Vec<SummaryTable>,
    pub layout: LayoutPlan,
    pub warnings: Vec<Warning>,
    pub resolved_query: String,
}

/// One worksheet's outcome inside a batch.
#[derive(Debug)]
pub struct WorksheetOutcome {
    pub name: String,
    pub result: Result<WorksheetReport, EngineError>,
}

/// Synthesize a single worksheet.
pub fn synthesize(
    spec: &WorksheetSpec,
    ctx: &RunContext,
    executor: &mut dyn QueryExecutor,
) -> Result<WorksheetReport, EngineError> {
    let mut warnings = Vec::new();

    let resolution = resolve_template(spec.template_type.as_deref());
    if let Some(w) = resolution.warning {
        warnings.push(w);
    }
    let descriptor = resolution.descriptor;

    let resolved_query = query::resolve(spec, descriptor, ctx)?;
    let detail = materialize(executor, &resolved_query, &spec.name)?;

    let (summaries, summary_warnings) = summary::summarize(&detail, descriptor.summary_kinds);
    warnings.extend(summary_warnings);

    let detail_headers = if descriptor.has_detail {
        detail_headers(&detail, spec.detail_columns.as_deref())
    } else {
        Vec::new()
    };

    let detail_width = descriptor
        .has_detail
        .then_some(detail_headers.len() as u32);
    let layout = layout::compose(detail_width, &summaries);

    Ok(WorksheetReport {
        name: spec.name.clone(),
        template: descriptor.template,
        has_detail: descriptor.has_detail,
        detail_headers,
        detail,
        summaries,
        layout,
        warnings,
        resolved_query,
    })
}

/// Synthesize every worksheet in configuration order. Never aborts: each
/// entry carries its own success or typed failure.
pub fn synthesize_all(
    specs: &[WorksheetSpec],
    ctx: &RunContext,
    executor: &mut dyn QueryExecutor,
) -> Vec<WorksheetOutcome> {
    specs
        .iter()
        .map(|spec| WorksheetOutcome {
            name: spec.name.clone(),
            result: synthesize(spec, ctx, executor),
        })
        .collect()
}

/// Display labels for the detail header row. The executor's column list
/// is authoritative for width; configured labels only relabel.
fn detail_headers(detail: &RowSet, configured: Option<&[String]>) -> Vec<String> {
    let mut headers: Vec<String> = detail.columns.clone();
    if let Some(labels) = configured {
        for (i, label) in labels.iter().enumerate() {
            if i < headers.len() {
                headers[i] = label.clone();
            }
        }
    }
    headers
}
