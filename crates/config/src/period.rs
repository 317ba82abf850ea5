//! Reporting period: two inclusive dates accepted in the formats field
//! users actually type, rendered long-form for the cover sheet.

use chrono::NaiveDate;

use crate::error::ConfigError;

/// Accepted input formats, tried in order.
const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d", // 2024-01-01
    "%m/%d/%Y", // 01/01/2024
    "%Y/%m/%d", // 2024/01/01
    "%m-%d-%Y", // 01-01-2024
    "%B %d, %Y", // January 1, 2024
    "%b %d, %Y", // Jan 1, 2024
];

/// Parse a report date from any accepted format.
pub fn parse_report_date(input: &str) -> Result<NaiveDate, ConfigError> {
    let trimmed = input.trim();
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Ok(d);
        }
    }
    Err(ConfigError::DateParse(input.to_string()))
}

/// Inclusive report date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportingPeriod {
    pub fn parse(start: &str, end: &str) -> Result<Self, ConfigError> {
        let start = parse_report_date(start)?;
        let end = parse_report_date(end)?;
        if end < start {
            return Err(ConfigError::Validation(format!(
                "report end date {end} precedes start date {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Cover-sheet form: "January 1, 2024 through December 31, 2024".
    pub fn display_long(&self) -> String {
        format!("{} through {}", long_date(self.start), long_date(self.end))
    }

    /// ISO forms handed to the query resolver for placeholder substitution.
    pub fn iso_bounds(&self) -> (String, String) {
        (self.start.to_string(), self.end.to_string())
    }
}

/// "January 1, 2024" — no leading zero on the day.
fn long_date(d: NaiveDate) -> String {
    format!("{} {}, {}", d.format("%B"), d.format("%-d"), d.format("%Y"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_formats() {
        for input in ["2024-01-01", "01/01/2024", "2024/01/01", "01-01-2024", "January 1, 2024", "Jan 1, 2024"] {
            let d = parse_report_date(input).unwrap();
            assert_eq!(d, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        }
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(parse_report_date("1st of Jan 2024").is_err());
    }

    #[test]
    fn long_display_drops_leading_zero() {
        let p = ReportingPeriod::parse("2024-01-01", "2024-12-31").unwrap();
        assert_eq!(p.display_long(), "January 1, 2024 through December 31, 2024");
    }

    #[test]
    fn rejects_inverted_range() {
        let err = ReportingPeriod::parse("2024-12-31", "2024-01-01").unwrap_err();
        assert!(err.to_string().contains("precedes"));
    }

    #[test]
    fn iso_bounds_for_query_substitution() {
        let p = ReportingPeriod::parse("03/15/2024", "2024-09-30").unwrap();
        assert_eq!(p.iso_bounds(), ("2024-03-15".to_string(), "2024-09-30".to_string()));
    }
}
