//! Result types assembled by the validation pipeline.

use chrono::{DateTime, Utc};

use crate::dns::MxRecord;

/// Structured payload attached to some checks.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckDetail {
    /// MX records in ascending priority order (`mx` check).
    MxRecords(Vec<MxRecord>),
    /// Newline-joined raw lines received from the server (`smtp` check).
    Transcript(String),
}

/// Outcome of one check stage.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub passed: bool,
    pub message: String,
    pub detail: Option<CheckDetail>,
}

impl CheckResult {
    pub fn passed(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
            detail: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: CheckDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Transcript payload, if this result carries one.
    pub fn transcript(&self) -> Option<&str> {
        match &self.detail {
            Some(CheckDetail::Transcript(t)) => Some(t),
            _ => None,
        }
    }

    /// MX record payload, if this result carries one.
    pub fn mx_records(&self) -> Option<&[MxRecord]> {
        match &self.detail {
            Some(CheckDetail::MxRecords(records)) => Some(records.as_slice()),
            _ => None,
        }
    }
}

/// One slot per check kind. A `None` slot means the check never ran
/// (an earlier stage short-circuited the pipeline).
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailChecks {
    pub syntax: Option<CheckResult>,
    pub domain: Option<CheckResult>,
    pub mx: Option<CheckResult>,
    pub smtp: Option<CheckResult>,
    pub disposable: Option<CheckResult>,
    pub role_based: Option<CheckResult>,
}

impl EmailChecks {
    /// `true` only when syntax, domain, mx and smtp all passed.
    /// The disposable/role_based checks are advisory and never counted.
    pub fn all_required_passed(&self) -> bool {
        [&self.syntax, &self.domain, &self.mx, &self.smtp]
            .into_iter()
            .all(|check| check.as_ref().is_some_and(|c| c.passed))
    }
}

/// Aggregate report for one address, produced fresh per validation call.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub email: String,
    pub is_valid: bool,
    pub checks: EmailChecks,
    pub elapsed_ms: u64,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advisory_checks_do_not_affect_validity() {
        let mut checks = EmailChecks {
            syntax: Some(CheckResult::passed("ok")),
            domain: Some(CheckResult::passed("ok")),
            mx: Some(CheckResult::passed("ok")),
            smtp: Some(CheckResult::passed("ok")),
            disposable: Some(CheckResult::failed("known disposable provider")),
            role_based: Some(CheckResult::failed("role-based")),
        };
        assert!(checks.all_required_passed());

        checks.smtp = Some(CheckResult::failed("rejected"));
        assert!(!checks.all_required_passed());
    }

    #[test]
    fn missing_required_check_counts_as_failed() {
        let checks = EmailChecks {
            syntax: Some(CheckResult::passed("ok")),
            ..EmailChecks::default()
        };
        assert!(!checks.all_required_passed());
    }
}
