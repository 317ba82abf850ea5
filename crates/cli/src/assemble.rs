//! Report assembler: drives the engine over the configured worksheets and
//! hands the composed layouts to the XLSX sink. Continuation policy lives
//! here, not in the engine — a failed worksheet is reported and skipped.

use regsheet_config::{FormattingConfig, ReportConfig, ReportingPeriod, SummarySheetConfig, WorksheetEntry};
use regsheet_core::col_number;
use regsheet_engine::model::RunContext;
use regsheet_engine::{synthesize_all, QueryExecutor, WorksheetSpec};
use regsheet_io::{CoverRow, CoverSheet, RenderSheet, SheetFormatting};

/// Outcome of one generation run, before the sink writes anything.
pub struct AssembledReport {
    pub reports: Vec<regsheet_engine::WorksheetReport>,
    pub formatting: Vec<SheetFormatting>,
    pub cover: Option<CoverSheet>,
    pub failed: usize,
}

pub fn run_context(config: &ReportConfig, period: Option<&ReportingPeriod>) -> RunContext {
    let (start, end) = match period {
        Some(p) => {
            let (s, e) = p.iso_bounds();
            (Some(s), Some(e))
        }
        None => (None, None),
    };
    RunContext {
        account: config.connection.account.clone(),
        warehouse: config.connection.warehouse.clone(),
        database: config.connection.database.clone(),
        schema: config.connection.schema.clone(),
        report_start_dt: start,
        report_end_dt: end,
    }
}

pub fn to_spec(entry: &WorksheetEntry) -> WorksheetSpec {
    WorksheetSpec {
        name: entry.name.clone(),
        table_name: entry.table.clone(),
        template_type: entry.template.clone(),
        query: entry.query.clone(),
        filter: entry.filter.clone(),
        detail_columns: entry.detail_columns.clone(),
    }
}

pub fn to_formatting(f: &FormattingConfig) -> SheetFormatting {
    SheetFormatting {
        header_row: f.header_row.max(1),
        filters: f.filters,
        highlight_columns: f
            .highlight_columns
            .iter()
            .filter_map(|letters| col_number(letters))
            .collect(),
    }
}

/// Synthesize every configured worksheet. Failures are printed to stderr
/// and the run continues; `failed` counts them for the exit code.
pub fn assemble(
    config: &ReportConfig,
    ctx: &RunContext,
    period: Option<&ReportingPeriod>,
    executor: &mut dyn QueryExecutor,
) -> AssembledReport {
    let specs: Vec<WorksheetSpec> = config.worksheets.iter().map(to_spec).collect();
    let outcomes = synthesize_all(&specs, ctx, executor);

    let mut reports = Vec::new();
    let mut formatting = Vec::new();
    let mut failed = 0;

    for (entry, outcome) in config.worksheets.iter().zip(outcomes) {
        match outcome.result {
            Ok(report) => {
                for warning in &report.warnings {
                    eprintln!("warning: worksheet '{}': {warning}", report.name);
                }
                println!(
                    "worksheet {}: {} detail rows, {} summary block(s)",
                    report.name,
                    report.detail.len(),
                    report.summaries.len()
                );
                reports.push(report);
                formatting.push(to_formatting(&entry.formatting));
            }
            Err(err) => {
                eprintln!("error: {err}");
                failed += 1;
            }
        }
    }

    let cover = config.summary_sheet.as_ref().and_then(|cfg| {
        match build_cover(cfg, period, executor) {
            Ok(cover) => Some(cover),
            Err(err) => {
                eprintln!("error: cover sheet: {err}");
                None
            }
        }
    });

    AssembledReport {
        reports,
        formatting,
        cover,
        failed,
    }
}

pub fn render_sheets<'a>(assembled: &'a AssembledReport) -> Vec<RenderSheet<'a>> {
    assembled
        .reports
        .iter()
        .zip(assembled.formatting.iter())
        .map(|(report, formatting)| RenderSheet {
            report,
            formatting: formatting.clone(),
        })
        .collect()
}

/// Fetch the cover sheet's line items. The table name is interpolated, so
/// it gets a structural check first.
fn build_cover(
    cfg: &SummarySheetConfig,
    period: Option<&ReportingPeriod>,
    executor: &mut dyn QueryExecutor,
) -> Result<CoverSheet, String> {
    validate_table_name(&cfg.table)?;
    let query = format!(
        "SELECT Schedule_ID, Description, Value FROM {} ORDER BY Schedule_ID",
        cfg.table
    );
    let rows = executor.execute(&query)?;
    let id_idx = rows
        .column_index("Schedule_ID")
        .ok_or("summary table has no Schedule_ID column")?;
    let desc_idx = rows
        .column_index("Description")
        .ok_or("summary table has no Description column")?;
    let value_idx = rows
        .column_index("Value")
        .ok_or("summary table has no Value column")?;

    let cover_rows = rows
        .rows
        .iter()
        .map(|row| CoverRow {
            schedule_id: row[id_idx].display(),
            description: row[desc_idx].display(),
            value: row[value_idx].clone(),
        })
        .collect();

    Ok(CoverSheet {
        line_of_business: cfg.line_of_business.clone(),
        reporting_period: period
            .map(|p| p.display_long())
            .unwrap_or_else(|| "n/a".to_string()),
        filing_deadline: cfg.filing_deadline.clone(),
        data_source: "Warehouse".to_string(),
        schedule_titles: cfg.schedule_titles.clone(),
        rows: cover_rows,
    })
}

/// Alphanumeric, underscore, and dot (for schema.table) only.
fn validate_table_name(name: &str) -> Result<(), String> {
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '.') {
        return Err(format!("invalid table name '{name}'"));
    }
    Ok(())
}
