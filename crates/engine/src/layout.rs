//! Layout composer: assigns column ranges to the detail block and each
//! summary block with a running cursor. Pure arithmetic — the only inputs
//! are the detail width and the summary block widths.
//!
//! Rules: detail starts at column 1 when present; exactly one spacer
//! column separates adjacent blocks; with no detail block the first
//! summary starts at column 1 with no leading spacer.

use regsheet_core::ColRange;

use crate::model::{LayoutPlan, SummaryPlacement, SummaryTable};

/// Compose the column plan for one worksheet. `detail_width` is None for
/// summary-only templates (and for a detail block with zero columns,
/// which occupies nothing).
pub fn compose(detail_width: Option<u32>, summaries: &[SummaryTable]) -> LayoutPlan {
    let mut plan = LayoutPlan::default();
    let mut cursor: u32 = 1;

    if let Some(width) = detail_width {
        if width > 0 {
            plan.detail = Some(ColRange::new(1, width));
            cursor = 1 + width;
        }
    }

    for (i, table) in summaries.iter().enumerate() {
        if cursor > 1 {
            plan.spacers.push(cursor);
            cursor += 1;
        }
        let range = ColRange::new(cursor, table.width());
        plan.summaries.push(SummaryPlacement { summary: i, range });
        cursor += table.width();
    }

    plan
}
