//! Template registry: static map from template-type identifier to the
//! summaries it requires and the default column list for generated queries.
//!
//! Resolution is total. Unknown or absent template strings fall back to
//! the legacy detail-only descriptor and the resolution carries a warning
//! value; the registry itself never fails and never logs.

use crate::model::{SummaryKind, Warning};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateType {
    DirectDump,
    DirectDumpStateSummary,
    DirectDumpTatSummary,
    DirectDumpStateTatSummary,
    StateSummaryOnly,
    DirectDumpStatePayreqSummary,
    /// Fallback marker for absent or unrecognized template strings.
    Legacy,
}

impl TemplateType {
    /// Exact, case-sensitive match against the persisted identifiers.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "direct_dump" => Some(Self::DirectDump),
            "direct_dump_state_summary" => Some(Self::DirectDumpStateSummary),
            "direct_dump_tat_summary" => Some(Self::DirectDumpTatSummary),
            "direct_dump_state_tat_summary" => Some(Self::DirectDumpStateTatSummary),
            "state_summary_only" => Some(Self::StateSummaryOnly),
            "direct_dump_state_payreq_summary" => Some(Self::DirectDumpStatePayreqSummary),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectDump => "direct_dump",
            Self::DirectDumpStateSummary => "direct_dump_state_summary",
            Self::DirectDumpTatSummary => "direct_dump_tat_summary",
            Self::DirectDumpStateTatSummary => "direct_dump_state_tat_summary",
            Self::StateSummaryOnly => "state_summary_only",
            Self::DirectDumpStatePayreqSummary => "direct_dump_state_payreq_summary",
            Self::Legacy => "legacy",
        }
    }
}

impl std::fmt::Display for TemplateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Static structure for one template type. Read-only data, one per enum
/// value; never mutated at run time.
#[derive(Debug)]
pub struct TemplateDescriptor {
    pub template: TemplateType,
    /// Summary kinds in their fixed output order:
    /// state-issue, state-resident, tat, payreq.
    pub summary_kinds: &'static [SummaryKind],
    /// SELECT list used when the worksheet has no explicit query.
    pub default_select: &'static [&'static str],
    pub has_detail: bool,
}

const BASE_SELECT: &[&str] = &[
    "Policy_Num",
    "Claim_Num",
    "Product",
    "Claim_Status",
    "Company",
    "Issue_State",
    "Resident_State",
];

const TAT_SELECT: &[&str] = &[
    "Policy_Num",
    "Claim_Num",
    "Product",
    "Claim_Status",
    "Company",
    "Issue_State",
    "Resident_State",
    "TAT_in_Days",
];

const PAYREQ_SELECT: &[&str] = &[
    "Policy_Num",
    "Claim_Num",
    "Product",
    "Claim_Status",
    "Company",
    "Issue_State",
    "Resident_State",
    "Year_Pay_Req_Received",
];

const STATE_ONLY_SELECT: &[&str] = &["Policy_Num", "Issue_State", "Resident_State"];

const STATE_KINDS: &[SummaryKind] = &[SummaryKind::StateIssue, SummaryKind::StateResident];
const TAT_KINDS: &[SummaryKind] = &[SummaryKind::Tat];
const STATE_TAT_KINDS: &[SummaryKind] = &[
    SummaryKind::StateIssue,
    SummaryKind::StateResident,
    SummaryKind::Tat,
];
const STATE_PAYREQ_KINDS: &[SummaryKind] = &[
    SummaryKind::StateIssue,
    SummaryKind::StateResident,
    SummaryKind::PayReq,
];

static DIRECT_DUMP: TemplateDescriptor = TemplateDescriptor {
    template: TemplateType::DirectDump,
    summary_kinds: &[],
    default_select: BASE_SELECT,
    has_detail: true,
};

static DIRECT_DUMP_STATE: TemplateDescriptor = TemplateDescriptor {
    template: TemplateType::DirectDumpStateSummary,
    summary_kinds: STATE_KINDS,
    default_select: BASE_SELECT,
    has_detail: true,
};

static DIRECT_DUMP_TAT: TemplateDescriptor = TemplateDescriptor {
    template: TemplateType::DirectDumpTatSummary,
    summary_kinds: TAT_KINDS,
    default_select: TAT_SELECT,
    has_detail: true,
};

static DIRECT_DUMP_STATE_TAT: TemplateDescriptor = TemplateDescriptor {
    template: TemplateType::DirectDumpStateTatSummary,
    summary_kinds: STATE_TAT_KINDS,
    default_select: TAT_SELECT,
    has_detail: true,
};

static STATE_SUMMARY_ONLY: TemplateDescriptor = TemplateDescriptor {
    template: TemplateType::StateSummaryOnly,
    summary_kinds: STATE_KINDS,
    default_select: STATE_ONLY_SELECT,
    has_detail: false,
};

static DIRECT_DUMP_STATE_PAYREQ: TemplateDescriptor = TemplateDescriptor {
    template: TemplateType::DirectDumpStatePayreqSummary,
    summary_kinds: STATE_PAYREQ_KINDS,
    default_select: PAYREQ_SELECT,
    has_detail: true,
};

static LEGACY: TemplateDescriptor = TemplateDescriptor {
    template: TemplateType::Legacy,
    summary_kinds: &[],
    default_select: BASE_SELECT,
    has_detail: true,
};

/// Total function: every template type has exactly one descriptor.
pub fn descriptor_for(template: TemplateType) -> &'static TemplateDescriptor {
    match template {
        TemplateType::DirectDump => &DIRECT_DUMP,
        TemplateType::DirectDumpStateSummary => &DIRECT_DUMP_STATE,
        TemplateType::DirectDumpTatSummary => &DIRECT_DUMP_TAT,
        TemplateType::DirectDumpStateTatSummary => &DIRECT_DUMP_STATE_TAT,
        TemplateType::StateSummaryOnly => &STATE_SUMMARY_ONLY,
        TemplateType::DirectDumpStatePayreqSummary => &DIRECT_DUMP_STATE_PAYREQ,
        TemplateType::Legacy => &LEGACY,
    }
}

/// Descriptor resolution with the fallback made observable.
#[derive(Debug)]
pub struct TemplateResolution {
    pub descriptor: &'static TemplateDescriptor,
    pub warning: Option<Warning>,
}

/// Resolve a raw config string. Unknown or absent values yield the legacy
/// descriptor plus a warning value (emitted once per worksheet by callers).
pub fn resolve_template(raw: Option<&str>) -> TemplateResolution {
    match raw {
        Some(s) => match TemplateType::parse(s) {
            Some(t) => TemplateResolution {
                descriptor: descriptor_for(t),
                warning: None,
            },
            None => TemplateResolution {
                descriptor: &LEGACY,
                warning: Some(Warning::UnknownTemplate {
                    raw: Some(s.to_string()),
                }),
            },
        },
        None => TemplateResolution {
            descriptor: &LEGACY,
            warning: Some(Warning::UnknownTemplate { raw: None }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_has_a_descriptor() {
        for t in [
            TemplateType::DirectDump,
            TemplateType::DirectDumpStateSummary,
            TemplateType::DirectDumpTatSummary,
            TemplateType::DirectDumpStateTatSummary,
            TemplateType::StateSummaryOnly,
            TemplateType::DirectDumpStatePayreqSummary,
            TemplateType::Legacy,
        ] {
            let d = descriptor_for(t);
            assert_eq!(d.template, t);
            assert!(!d.default_select.is_empty());
        }
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert_eq!(TemplateType::parse("direct_dump"), Some(TemplateType::DirectDump));
        assert_eq!(TemplateType::parse("Direct_Dump"), None);
        assert_eq!(TemplateType::parse("DIRECT_DUMP"), None);
    }

    #[test]
    fn unknown_falls_back_with_warning() {
        let r = resolve_template(Some("fancy_new_template"));
        assert_eq!(r.descriptor.template, TemplateType::Legacy);
        assert!(r.descriptor.has_detail);
        assert!(r.descriptor.summary_kinds.is_empty());
        assert_eq!(
            r.warning,
            Some(Warning::UnknownTemplate {
                raw: Some("fancy_new_template".into())
            })
        );
    }

    #[test]
    fn absent_falls_back_with_warning() {
        let r = resolve_template(None);
        assert_eq!(r.descriptor.template, TemplateType::Legacy);
        assert_eq!(r.warning, Some(Warning::UnknownTemplate { raw: None }));
    }

    #[test]
    fn known_types_resolve_without_warning() {
        let r = resolve_template(Some("direct_dump_state_tat_summary"));
        assert!(r.warning.is_none());
        assert_eq!(
            r.descriptor.summary_kinds,
            &[
                crate::model::SummaryKind::StateIssue,
                crate::model::SummaryKind::StateResident,
                crate::model::SummaryKind::Tat
            ]
        );
    }

    #[test]
    fn summary_only_template_has_no_detail() {
        let r = resolve_template(Some("state_summary_only"));
        assert!(!r.descriptor.has_detail);
        assert_eq!(r.descriptor.default_select, &["Policy_Num", "Issue_State", "Resident_State"]);
    }
}
