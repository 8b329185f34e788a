//! Syntax validation: pure, synchronous, deterministic.
//!
//! Rules are applied in order and short-circuit on the first violation,
//! each with its own message. No network access happens here.

mod domain;
mod local;

use std::sync::LazyLock;

use regex::Regex;

use crate::report::CheckResult;

pub(crate) use domain::check_domain_labels;
pub(crate) use local::dot_violation;

/// Address decomposition produced once syntax validation passes.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAddress {
    pub local: String,
    pub domain: String,
    /// IDNA-normalized, lowercase form used for DNS lookups.
    pub ascii_domain: String,
}

// RFC-5322-inspired shape: atext local part, dot-separated domain labels.
// Dot placement and hyphen edges are validated separately so their
// violations get specific messages.
static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*$")
        .expect("address pattern is valid")
});

/// Validates the structure of `email`. Returns the check outcome and, when
/// every rule passes, the decomposed address.
pub fn check_syntax(email: &str) -> (CheckResult, Option<ParsedAddress>) {
    if email.is_empty() {
        return fail("email must be a non-empty string");
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return fail("email must contain exactly one '@'");
    }
    let (local, domain) = (parts[0], parts[1]);

    if local.is_empty() || local.len() > 64 {
        return fail(format!("local part length {} invalid (1..=64)", local.len()));
    }
    if domain.is_empty() || domain.len() > 253 {
        return fail(format!("domain length {} invalid (1..=253)", domain.len()));
    }

    if !ADDRESS_RE.is_match(email) {
        return fail("email does not match RFC 5322 address format");
    }

    if let Some(reason) = dot_violation(local) {
        return fail(reason);
    }

    if domain.starts_with('-') || domain.ends_with('-') {
        return fail("domain cannot start or end with '-'");
    }
    if let Some(reason) = check_domain_labels(domain) {
        return fail(reason);
    }

    let ascii_domain = match idna::domain_to_ascii(domain) {
        Ok(ascii) => ascii,
        Err(_) => return fail("domain punycode conversion failed"),
    };

    let parsed = ParsedAddress {
        local: local.to_string(),
        domain: domain.to_string(),
        ascii_domain,
    };
    (CheckResult::passed("email syntax is valid"), Some(parsed))
}

fn fail(message: impl Into<String>) -> (CheckResult, Option<ParsedAddress>) {
    (CheckResult::failed(message), None)
}
