//! Query resolver: turns a worksheet spec into the final query text.
//!
//! Priority is hard, not a fallback chain: an explicit `query` wins
//! verbatim and the `filter` fragment has zero influence on it. Without
//! an explicit query, a default SELECT is generated from the template's
//! column list and the worksheet name becomes the `Schedule_ID` predicate;
//! a `filter` fragment fully replaces that predicate.

use crate::error::EngineError;
use crate::model::{RunContext, WorksheetSpec};
use crate::template::TemplateDescriptor;

/// Bound on query text carried inside diagnostics.
pub const QUERY_PREVIEW_LEN: usize = 200;

/// Truncate query text for error messages.
pub fn preview(query: &str) -> String {
    let trimmed = query.trim();
    if trimmed.len() <= QUERY_PREVIEW_LEN {
        trimmed.to_string()
    } else {
        let mut cut = QUERY_PREVIEW_LEN;
        while !trimmed.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...", &trimmed[..cut])
    }
}

/// Resolve the final query text for one worksheet.
pub fn resolve(
    spec: &WorksheetSpec,
    descriptor: &TemplateDescriptor,
    ctx: &RunContext,
) -> Result<String, EngineError> {
    if let Some(query) = spec.query.as_deref() {
        let query = query.trim();
        if !query.is_empty() {
            let query = qualify_bare_tables(query, &ctx.database, &ctx.schema);
            return Ok(substitute_report_dates(&query, ctx));
        }
    }

    let table = spec
        .table_name
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| EngineError::Configuration {
            worksheet: spec.name.clone(),
            message: "table_name is required when no explicit query is given".into(),
        })?;

    let predicate = match spec.filter.as_deref().map(str::trim) {
        Some(filter) if !filter.is_empty() => filter.to_string(),
        _ => format!("Schedule_ID = '{}'", spec.name),
    };

    Ok(format!(
        "SELECT {} FROM {} WHERE {}",
        descriptor.default_select.join(", "),
        table,
        predicate
    ))
}

/// Qualify bare single-identifier table references after FROM/JOIN to
/// `<database>.<schema>.<table>`. Multi-part references are left alone.
/// One textual pass; no SQL parsing beyond token boundaries.
fn qualify_bare_tables(query: &str, database: &str, schema: &str) -> String {
    if database.is_empty() || schema.is_empty() {
        return query.to_string();
    }

    let mut out = String::with_capacity(query.len() + 32);
    let mut prev_token = String::new();
    let mut chars = query.char_indices().peekable();

    while let Some(&(start, ch)) = chars.peek() {
        if is_ident_char(ch) {
            let mut end = start;
            while let Some(&(i, c)) = chars.peek() {
                if is_ident_char(c) {
                    end = i + c.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let token = &query[start..end];
            let after_table_keyword = prev_token.eq_ignore_ascii_case("from")
                || prev_token.eq_ignore_ascii_case("join");
            if after_table_keyword && is_bare_table_ref(token) {
                out.push_str(database);
                out.push('.');
                out.push_str(schema);
                out.push('.');
            }
            out.push_str(token);
            prev_token = token.to_string();
        } else {
            out.push(ch);
            chars.next();
        }
    }

    out
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.' || c == '"' || c == ':'
}

fn is_bare_table_ref(token: &str) -> bool {
    if token.contains('.') || token.contains('"') || token.contains(':') {
        return false;
    }
    // A subquery or keyword after FROM is not a table reference.
    !matches!(
        token.to_ascii_lowercase().as_str(),
        "select" | "values" | "lateral" | "table" | "unnest"
    )
}

/// Substitute the run's report date range into query text. Opaque pass-
/// through: queries that never mention the placeholders are unaffected.
fn substitute_report_dates(query: &str, ctx: &RunContext) -> String {
    let mut out = query.to_string();
    if let Some(start) = ctx.report_start_dt.as_deref() {
        out = out.replace(":report_start_dt", &format!("'{start}'"));
    }
    if let Some(end) = ctx.report_end_dt.as_deref() {
        out = out.replace(":report_end_dt", &format!("'{end}'"));
    }
    out
}
