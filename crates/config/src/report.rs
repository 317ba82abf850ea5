use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub connection: ConnectionConfig,
    /// Worksheets in report order. Order is preserved; the engine
    /// processes them sequentially.
    pub worksheets: Vec<WorksheetEntry>,
    /// Optional cover sheet built from a summary table.
    #[serde(default)]
    pub summary_sheet: Option<SummarySheetConfig>,
}

// ---------------------------------------------------------------------------
// Connection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub account: String,
    pub user: Option<String>,
    pub password: Option<String>,
    pub warehouse: String,
    pub database: String,
    pub schema: String,
    pub authenticator: Authenticator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Authenticator {
    /// SSO via browser redirect (default).
    #[default]
    ExternalBrowser,
    /// Username/password; requires `user` and `password`.
    Password,
}

impl std::fmt::Display for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExternalBrowser => write!(f, "external_browser"),
            Self::Password => write!(f, "password"),
        }
    }
}

// ---------------------------------------------------------------------------
// Worksheets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct WorksheetEntry {
    pub name: String,
    #[serde(default)]
    pub table: Option<String>,
    /// Template-type identifier. Unknown values are not an error here:
    /// the engine falls back to the legacy structure with a warning.
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub detail_columns: Option<Vec<String>>,
    #[serde(default)]
    pub formatting: FormattingConfig,
}

/// Per-worksheet visual directives, applied by the spreadsheet sink.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormattingConfig {
    pub header_row: u32,
    /// Autofilter over the detail range.
    pub filters: bool,
    /// Detail columns to highlight, by letter ("C", "D").
    pub highlight_columns: Vec<String>,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            header_row: 1,
            filters: true,
            highlight_columns: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Cover sheet
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SummarySheetConfig {
    /// Table holding (Schedule_ID, Description, Value) rows.
    pub table: String,
    #[serde(default = "default_line_of_business")]
    pub line_of_business: String,
    #[serde(default = "default_filing_deadline")]
    pub filing_deadline: String,
    /// Titles per schedule number, e.g. 1 -> "Schedule 1 - General Information".
    #[serde(default)]
    pub schedule_titles: BTreeMap<u32, String>,
}

fn default_line_of_business() -> String {
    "Individual Long-Term Care".to_string()
}

fn default_filing_deadline() -> String {
    "n/a".to_string()
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReportConfig {
    pub fn from_yaml(input: &str) -> Result<Self, ConfigError> {
        let mut config: ReportConfig =
            serde_yaml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_yaml(&input)
    }

    /// Environment variables win over config values, so credentials can
    /// stay out of the file.
    fn apply_env_overrides(&mut self) {
        let c = &mut self.connection;
        override_from_env(&mut c.account, "REGSHEET_ACCOUNT");
        override_from_env(&mut c.warehouse, "REGSHEET_WAREHOUSE");
        override_from_env(&mut c.database, "REGSHEET_DATABASE");
        override_from_env(&mut c.schema, "REGSHEET_SCHEMA");
        if let Ok(v) = std::env::var("REGSHEET_USER") {
            c.user = Some(v);
        }
        if let Ok(v) = std::env::var("REGSHEET_PASSWORD") {
            c.password = Some(v);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worksheets.is_empty() {
            return Err(ConfigError::Validation(
                "at least one worksheet is required".into(),
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for ws in &self.worksheets {
            if ws.name.trim().is_empty() {
                return Err(ConfigError::Validation("worksheet name must not be empty".into()));
            }
            if !seen.insert(ws.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate worksheet name '{}'",
                    ws.name
                )));
            }
            // table-less worksheets are allowed only with an explicit query;
            // the engine reports the per-worksheet error otherwise.
        }

        if self.connection.authenticator == Authenticator::Password
            && (self.connection.user.is_none() || self.connection.password.is_none())
        {
            return Err(ConfigError::Validation(
                "authenticator 'password' requires user and password".into(),
            ));
        }

        Ok(())
    }
}

fn override_from_env(slot: &mut String, var: &str) {
    if let Ok(v) = std::env::var(var) {
        if !v.is_empty() {
            *slot = v;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
connection:
  account: acme-ltc
  warehouse: REPORTING_WH
  database: LTC
  schema: FILINGS

worksheets:
  - name: "2-001"
    table: ltc_claims
    template: direct_dump_state_summary
  - name: "2-003"
    table: ltc_claims
    template: direct_dump_tat_summary
    formatting:
      filters: true
      highlight_columns: [C, D]
  - name: "1-001"
    table: ltc_claims
    template: state_summary_only
    formatting:
      filters: false

summary_sheet:
  table: ltc_summary
  schedule_titles:
    1: "Schedule 1 - General Information"
    2: "Schedule 2 - Claimants"
"#;

    #[test]
    fn parse_valid_config() {
        let config = ReportConfig::from_yaml(VALID).unwrap();
        assert_eq!(config.connection.account, "acme-ltc");
        assert_eq!(config.connection.authenticator, Authenticator::ExternalBrowser);
        assert_eq!(config.worksheets.len(), 3);
        assert_eq!(config.worksheets[0].name, "2-001");
        assert_eq!(config.worksheets[1].formatting.highlight_columns, vec!["C", "D"]);
        assert!(!config.worksheets[2].formatting.filters);
        let cover = config.summary_sheet.unwrap();
        assert_eq!(cover.table, "ltc_summary");
        assert_eq!(cover.line_of_business, "Individual Long-Term Care");
        assert_eq!(cover.schedule_titles[&1], "Schedule 1 - General Information");
    }

    #[test]
    fn worksheet_order_is_preserved() {
        let config = ReportConfig::from_yaml(VALID).unwrap();
        let names: Vec<&str> = config.worksheets.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["2-001", "2-003", "1-001"]);
    }

    #[test]
    fn reject_duplicate_worksheet_names() {
        let input = r#"
worksheets:
  - name: "2-001"
    table: t
  - name: "2-001"
    table: t
"#;
        let err = ReportConfig::from_yaml(input).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn reject_empty_worksheet_list() {
        let err = ReportConfig::from_yaml("worksheets: []").unwrap_err();
        assert!(err.to_string().contains("at least one worksheet"));
    }

    #[test]
    fn reject_password_auth_without_credentials() {
        let input = r#"
connection:
  account: a
  authenticator: password
worksheets:
  - name: "2-001"
    table: t
"#;
        let err = ReportConfig::from_yaml(input).unwrap_err();
        assert!(err.to_string().contains("requires user and password"));
    }

    #[test]
    fn unknown_template_string_is_not_a_parse_error() {
        let input = r#"
worksheets:
  - name: "9-001"
    table: t
    template: something_new
"#;
        let config = ReportConfig::from_yaml(input).unwrap();
        assert_eq!(config.worksheets[0].template.as_deref(), Some("something_new"));
    }
}
