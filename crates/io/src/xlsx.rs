// XLSX sink: renders composed worksheet layouts with the report's visual
// contract (bold headers on an orange fill, thin borders, autofilter over
// the detail range, yellow highlight columns, bold grand-total rows).
//
// The sink only places cells where the LayoutPlan says; it never second-
// guesses column assignments.

use std::collections::BTreeMap;
use std::path::Path;

use rust_xlsxwriter::{
    Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet,
};

use regsheet_core::Value;
use regsheet_engine::{SummaryTable, WorksheetReport};

const HEADER_FILL: Color = Color::RGB(0xFFD966);
const HIGHLIGHT_FILL: Color = Color::RGB(0xFFFF00);
const MAX_COLUMN_WIDTH: f64 = 50.0;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Visual directives for one worksheet, resolved to column numbers.
#[derive(Debug, Clone)]
pub struct SheetFormatting {
    /// 1-based row carrying the header labels.
    pub header_row: u32,
    /// Autofilter over the detail range.
    pub filters: bool,
    /// 1-based detail columns highlighted in yellow.
    pub highlight_columns: Vec<u32>,
}

impl Default for SheetFormatting {
    fn default() -> Self {
        Self {
            header_row: 1,
            filters: true,
            highlight_columns: Vec::new(),
        }
    }
}

/// One worksheet ready to render.
pub struct RenderSheet<'a> {
    pub report: &'a WorksheetReport,
    pub formatting: SheetFormatting,
}

/// Cover sheet content: one row per schedule line item.
#[derive(Debug, Clone)]
pub struct CoverRow {
    pub schedule_id: String,
    pub description: String,
    pub value: Value,
}

#[derive(Debug, Clone)]
pub struct CoverSheet {
    pub line_of_business: String,
    pub reporting_period: String,
    pub filing_deadline: String,
    pub data_source: String,
    pub schedule_titles: BTreeMap<u32, String>,
    pub rows: Vec<CoverRow>,
}

// ---------------------------------------------------------------------------
// Formats
// ---------------------------------------------------------------------------

struct Formats {
    header: Format,
    body: Format,
    body_highlight: Format,
    count: Format,
    percent: Format,
    grand_total_label: Format,
    grand_total_count: Format,
    grand_total_percent: Format,
}

impl Formats {
    fn new() -> Self {
        let header = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_background_color(HEADER_FILL)
            .set_border(FormatBorder::Thin);
        let body = Format::new()
            .set_align(FormatAlign::Top)
            .set_border(FormatBorder::Thin);
        let body_highlight = body.clone().set_background_color(HIGHLIGHT_FILL);
        let count = Format::new()
            .set_align(FormatAlign::Right)
            .set_border(FormatBorder::Thin);
        let percent = count.clone().set_num_format("0.0");
        let grand_total_label = body.clone().set_bold();
        let grand_total_count = count.clone().set_bold();
        let grand_total_percent = percent.clone().set_bold();
        Self {
            header,
            body,
            body_highlight,
            count,
            percent,
            grand_total_label,
            grand_total_count,
            grand_total_percent,
        }
    }
}

// ---------------------------------------------------------------------------
// Workbook
// ---------------------------------------------------------------------------

/// Write the whole report. The cover sheet, when present, is the first
/// worksheet in the workbook.
pub fn write_workbook(
    path: &Path,
    cover: Option<&CoverSheet>,
    sheets: &[RenderSheet<'_>],
) -> Result<(), String> {
    let mut workbook = Workbook::new();
    let formats = Formats::new();

    if let Some(cover) = cover {
        let worksheet = workbook.add_worksheet();
        write_cover_sheet(worksheet, cover, &formats)?;
    }

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        write_report_sheet(worksheet, sheet, &formats)?;
    }

    workbook
        .save(path)
        .map_err(|e| format!("failed to save workbook {}: {e}", path.display()))
}

fn write_report_sheet(
    worksheet: &mut Worksheet,
    sheet: &RenderSheet<'_>,
    formats: &Formats,
) -> Result<(), String> {
    let report = sheet.report;
    worksheet
        .set_name(&report.name)
        .map_err(|e| format!("invalid worksheet name '{}': {e}", report.name))?;

    // 0-based row of the header line.
    let header_row = sheet.formatting.header_row.saturating_sub(1);
    let mut widths = ColumnWidths::default();

    if let Some(range) = report.layout.detail {
        write_detail_block(worksheet, sheet, header_row, &mut widths, formats)?;
        if sheet.formatting.filters && !report.detail_headers.is_empty() {
            let last_row = header_row + report.detail.len() as u32;
            worksheet
                .autofilter(
                    header_row,
                    (range.start - 1) as u16,
                    last_row,
                    (range.end() - 1) as u16,
                )
                .map_err(|e| format!("failed to set autofilter: {e}"))?;
        }
    }

    for placement in &report.layout.summaries {
        let table = &report.summaries[placement.summary];
        write_summary_block(
            worksheet,
            table,
            placement.range.start,
            header_row,
            &mut widths,
            formats,
        )?;
    }

    widths.apply(worksheet)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

fn write_detail_block(
    worksheet: &mut Worksheet,
    sheet: &RenderSheet<'_>,
    header_row: u32,
    widths: &mut ColumnWidths,
    formats: &Formats,
) -> Result<(), String> {
    let report = sheet.report;
    let Some(range) = report.layout.detail else {
        return Ok(());
    };
    let base = range.start;

    for (i, label) in report.detail_headers.iter().enumerate() {
        let col = base + i as u32;
        write_text(worksheet, header_row, col, label, &formats.header)?;
        widths.note(col, label.len());
    }

    for (r, row) in report.detail.rows.iter().enumerate() {
        let row_idx = header_row + 1 + r as u32;
        for i in 0..report.detail_headers.len() {
            let col = base + i as u32;
            let value = row.get(i).unwrap_or(&Value::Null);
            let format = if sheet.formatting.highlight_columns.contains(&col) {
                &formats.body_highlight
            } else {
                &formats.body
            };
            write_value(worksheet, row_idx, col, value, format)?;
            widths.note(col, value.display().len());
        }
    }

    Ok(())
}

fn write_summary_block(
    worksheet: &mut Worksheet,
    table: &SummaryTable,
    start_col: u32,
    header_row: u32,
    widths: &mut ColumnWidths,
    formats: &Formats,
) -> Result<(), String> {
    for (i, label) in table.headers.iter().enumerate() {
        let col = start_col + i as u32;
        write_text(worksheet, header_row, col, label, &formats.header)?;
        widths.note(col, label.len());
    }

    for (r, row) in table.rows.iter().enumerate() {
        let row_idx = header_row + 1 + r as u32;
        let (label_fmt, count_fmt, pct_fmt) = if row.is_grand_total {
            (
                &formats.grand_total_label,
                &formats.grand_total_count,
                &formats.grand_total_percent,
            )
        } else {
            (&formats.body, &formats.count, &formats.percent)
        };

        write_text(worksheet, row_idx, start_col, &row.label, label_fmt)?;
        widths.note(start_col, row.label.len());

        write_number(worksheet, row_idx, start_col + 1, row.count as f64, count_fmt)?;
        widths.note(start_col + 1, row.count.to_string().len());

        if let Some(pct) = row.percent {
            write_number(worksheet, row_idx, start_col + 2, pct, pct_fmt)?;
            widths.note(start_col + 2, 6);
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Cover sheet
// ---------------------------------------------------------------------------

/// Schedule number from an ID like "2-001". None for IDs without a dash.
pub fn schedule_number(schedule_id: &str) -> Option<u32> {
    let (prefix, _) = schedule_id.split_once('-')?;
    prefix.trim().parse().ok()
}

fn write_cover_sheet(
    worksheet: &mut Worksheet,
    cover: &CoverSheet,
    formats: &Formats,
) -> Result<(), String> {
    worksheet
        .set_name("Summary")
        .map_err(|e| format!("failed to name cover sheet: {e}"))?;

    let bold = Format::new().set_bold();
    let bold_highlight = bold.clone().set_background_color(HIGHLIGHT_FILL);
    let bordered = Format::new().set_border(FormatBorder::Thin);
    let bold_bordered = bold.clone().set_border(FormatBorder::Thin);
    let value_fmt = bordered
        .clone()
        .set_align(FormatAlign::Right)
        .set_background_color(HIGHLIGHT_FILL)
        .set_num_format("#,##0");

    // Row 1 deliberately blank; header block on rows 2-4.
    write_text(worksheet, 1, 1, &format!("Line of Business: {}", cover.line_of_business), &bold)?;
    write_text(
        worksheet,
        2,
        1,
        &format!("Reporting Period: {}", cover.reporting_period),
        &bold_highlight,
    )?;
    write_text(
        worksheet,
        3,
        1,
        &format!("Filing Deadline: {}", cover.filing_deadline),
        &bold_highlight,
    )?;

    // Group line items by schedule number, ascending.
    let mut groups: BTreeMap<u32, Vec<&CoverRow>> = BTreeMap::new();
    for row in &cover.rows {
        if let Some(n) = schedule_number(&row.schedule_id) {
            groups.entry(n).or_default().push(row);
        }
    }

    let mut current_row: u32 = 5; // 0-based; first schedule title on row 6
    for (schedule, mut rows) in groups {
        rows.sort_by(|a, b| a.schedule_id.cmp(&b.schedule_id));

        let title = cover
            .schedule_titles
            .get(&schedule)
            .cloned()
            .unwrap_or_else(|| format!("Schedule {schedule}"));
        write_text(worksheet, current_row, 1, &title, &bold)?;

        // Headers: ID in A, Description in C, Value in E, source in F;
        // B and D stay blank as gap columns.
        let header_row = current_row + 1;
        write_text(worksheet, header_row, 1, "ID", &bold_bordered)?;
        write_text(worksheet, header_row, 3, "Description", &bold_bordered)?;
        write_text(worksheet, header_row, 5, "Value", &bold_bordered)?;
        write_text(worksheet, header_row, 6, "Data Source", &bold_bordered)?;

        for (i, row) in rows.iter().enumerate() {
            let r = header_row + 1 + i as u32;
            write_text(worksheet, r, 1, &row.schedule_id, &bordered)?;
            write_text(worksheet, r, 3, &row.description, &bordered)?;
            match row.value.as_number() {
                Some(n) => write_number(worksheet, r, 5, n, &value_fmt)?,
                None => write_text(worksheet, r, 5, &row.value.display(), &value_fmt)?,
            }
            write_text(worksheet, r, 6, &cover.data_source, &bordered)?;
        }

        // One blank row between schedule sections.
        current_row = header_row + 1 + rows.len() as u32 + 1;
    }

    for (col, width) in [(1u32, 15.0), (2, 3.0), (3, 70.0), (4, 3.0), (5, 18.0), (6, 20.0)] {
        worksheet
            .set_column_width((col - 1) as u16, width)
            .map_err(|e| format!("failed to set column width: {e}"))?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Cell + width helpers
// ---------------------------------------------------------------------------

/// Auto column widths: longest content per column plus padding, capped.
#[derive(Default)]
struct ColumnWidths {
    max_len: BTreeMap<u32, usize>,
}

impl ColumnWidths {
    fn note(&mut self, col: u32, len: usize) {
        let entry = self.max_len.entry(col).or_insert(0);
        if len > *entry {
            *entry = len;
        }
    }

    fn apply(&self, worksheet: &mut Worksheet) -> Result<(), String> {
        for (&col, &len) in &self.max_len {
            let width = ((len + 2) as f64).min(MAX_COLUMN_WIDTH);
            worksheet
                .set_column_width((col - 1) as u16, width)
                .map_err(|e| format!("failed to set column width: {e}"))?;
        }
        Ok(())
    }
}

// `row` is 0-based xlsx row; `col` is our 1-based column number.
fn write_text(
    worksheet: &mut Worksheet,
    row: u32,
    col: u32,
    text: &str,
    format: &Format,
) -> Result<(), String> {
    worksheet
        .write_string_with_format(row, (col - 1) as u16, text, format)
        .map_err(|e| format!("failed to write cell ({row}, {col}): {e}"))?;
    Ok(())
}

fn write_number(
    worksheet: &mut Worksheet,
    row: u32,
    col: u32,
    value: f64,
    format: &Format,
) -> Result<(), String> {
    worksheet
        .write_number_with_format(row, (col - 1) as u16, value, format)
        .map_err(|e| format!("failed to write cell ({row}, {col}): {e}"))?;
    Ok(())
}

fn write_value(
    worksheet: &mut Worksheet,
    row: u32,
    col: u32,
    value: &Value,
    format: &Format,
) -> Result<(), String> {
    match value {
        Value::Number(n) => write_number(worksheet, row, col, *n, format),
        Value::Null => write_text(worksheet, row, col, "", format),
        Value::Text(s) => write_text(worksheet, row, col, s, format),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use regsheet_engine::layout::compose;
    use regsheet_engine::model::{RowSet, SummaryKind, SummaryRow};
    use regsheet_engine::report::WorksheetReport;
    use regsheet_engine::template::TemplateType;

    fn sample_report() -> WorksheetReport {
        let detail = RowSet::new(
            vec!["Policy_Num".into(), "Issue_State".into()],
            vec![
                vec![Value::from("P1"), Value::from("TX")],
                vec![Value::from("P2"), Value::from("CA")],
            ],
        );
        let summaries = vec![SummaryTable {
            kind: SummaryKind::Tat,
            headers: SummaryKind::Tat.headers(),
            rows: vec![
                SummaryRow { label: "-1 to <31".into(), count: 2, percent: Some(100.0), is_grand_total: false },
                SummaryRow { label: "Grand Total".into(), count: 2, percent: Some(100.0), is_grand_total: true },
            ],
            grand_total: Some(2),
        }];
        let layout = compose(Some(2), &summaries);
        WorksheetReport {
            name: "2-003".into(),
            template: TemplateType::DirectDumpTatSummary,
            has_detail: true,
            detail_headers: vec!["Policy Num".into(), "Issue State".into()],
            detail,
            summaries,
            layout,
            warnings: Vec::new(),
            resolved_query: "SELECT 1".into(),
        }
    }

    #[test]
    fn writes_a_nonempty_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        let report = sample_report();
        let sheets = [RenderSheet {
            report: &report,
            formatting: SheetFormatting::default(),
        }];
        write_workbook(&path, None, &sheets).unwrap();
        let meta = std::fs::metadata(&path).unwrap();
        assert!(meta.len() > 0);
    }

    #[test]
    fn writes_cover_sheet_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        let report = sample_report();
        let cover = CoverSheet {
            line_of_business: "Individual Long-Term Care".into(),
            reporting_period: "January 1, 2024 through December 31, 2024".into(),
            filing_deadline: "n/a".into(),
            data_source: "Warehouse".into(),
            schedule_titles: BTreeMap::from([(2, "Schedule 2 - Claimants".to_string())]),
            rows: vec![
                CoverRow {
                    schedule_id: "2-001".into(),
                    description: "Open claims".into(),
                    value: Value::Number(101_037.0),
                },
                CoverRow {
                    schedule_id: "2-003".into(),
                    description: "Denied claims".into(),
                    value: Value::from("N/A"),
                },
            ],
        };
        let sheets = [RenderSheet {
            report: &report,
            formatting: SheetFormatting::default(),
        }];
        write_workbook(&path, Some(&cover), &sheets).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn schedule_number_parses_prefix() {
        assert_eq!(schedule_number("2-001"), Some(2));
        assert_eq!(schedule_number("10-003"), Some(10));
        assert_eq!(schedule_number("Summary"), None);
        assert_eq!(schedule_number("x-1"), None);
    }
}
