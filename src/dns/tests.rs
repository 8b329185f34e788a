use std::net::IpAddr;

use super::resolver::{self, NameService};
use super::{DnsError, MxRecord};

type HostResult = Result<Vec<IpAddr>, DnsError>;
type MxResult = Result<Vec<MxRecord>, DnsError>;

pub(crate) struct StubResolver {
    pub on_host: Box<dyn Fn(&str) -> HostResult>,
    pub on_mx: Box<dyn Fn(&str) -> MxResult>,
}

impl StubResolver {
    pub(crate) fn new<H, M>(on_host: H, on_mx: M) -> Self
    where
        H: Fn(&str) -> HostResult + 'static,
        M: Fn(&str) -> MxResult + 'static,
    {
        Self {
            on_host: Box::new(on_host),
            on_mx: Box::new(on_mx),
        }
    }

    /// A resolver where the domain resolves and MX lookup yields `records`.
    pub(crate) fn with_mx(records: Vec<MxRecord>) -> Self {
        Self::new(
            |_| Ok(vec!["192.0.2.1".parse().expect("ip literal")]),
            move |_| Ok(records.clone()),
        )
    }
}

impl NameService for StubResolver {
    fn lookup_host(&self, domain: &str) -> HostResult {
        (self.on_host)(domain)
    }

    fn lookup_mx(&self, domain: &str) -> MxResult {
        (self.on_mx)(domain)
    }
}

#[test]
fn normalize_domain_rejects_empty() {
    let err = resolver::normalize_domain("  ").expect_err("empty domain should fail");
    assert!(matches!(err, DnsError::EmptyDomain));
}

#[test]
fn normalize_exchange_trims_dot_and_lowercases() {
    let out = resolver::normalize_exchange("Mail.EXAMPLE.com.".to_string());
    assert_eq!(out, "mail.example.com");
}

#[test]
fn domain_check_reports_address_count() {
    let stub = StubResolver::new(
        |domain| {
            assert_eq!(domain, "example.com");
            Ok(vec![
                "192.0.2.1".parse().expect("ip literal"),
                "2001:db8::1".parse().expect("ip literal"),
            ])
        },
        |_| Ok(Vec::new()),
    );
    let result = resolver::check_domain_with(&stub, "example.com");
    assert!(result.passed);
    assert_eq!(result.message, "domain resolves (2 addresses)");
}

#[test]
fn domain_check_degrades_on_timeout() {
    let stub = StubResolver::new(|_| Err(DnsError::Timeout), |_| Ok(Vec::new()));
    let result = resolver::check_domain_with(&stub, "example.com");
    assert!(!result.passed);
    assert_eq!(result.message, "domain lookup timed out");
}

#[test]
fn domain_check_reports_nxdomain() {
    let stub = StubResolver::new(
        |domain| {
            Err(DnsError::NoRecords {
                domain: domain.to_string(),
            })
        },
        |_| Ok(Vec::new()),
    );
    let result = resolver::check_domain_with(&stub, "nonexistent-domain-example-zz.test");
    assert!(!result.passed);
    assert!(result.message.contains("does not resolve"));
}

#[test]
fn mx_check_sorts_and_dedups_records() {
    let stub = StubResolver::with_mx(vec![
        MxRecord::new(20, "mx2.example.com"),
        MxRecord::new(10, "mx1.example.com"),
        MxRecord::new(10, "mx1.example.com"),
        MxRecord::new(30, "mx3.example.com"),
    ]);

    let (result, records) = resolver::check_mx_with(&stub, "example.com");
    assert!(result.passed);
    assert_eq!(result.message, "3 MX record(s) found");
    assert_eq!(records.len(), 3);
    assert!(records.windows(2).all(|w| w[0].priority <= w[1].priority));
    assert_eq!(records[0].exchange, "mx1.example.com");
    assert_eq!(result.mx_records(), Some(records.as_slice()));
}

#[test]
fn mx_check_fails_on_empty_record_set() {
    let stub = StubResolver::with_mx(Vec::new());
    let (result, records) = resolver::check_mx_with(&stub, "example.com");
    assert!(!result.passed);
    assert_eq!(result.message, "no MX records found for domain");
    assert!(records.is_empty());
}

#[test]
fn mx_check_degrades_on_timeout() {
    let stub = StubResolver::new(|_| Ok(Vec::new()), |_| Err(DnsError::Timeout));
    let (result, _) = resolver::check_mx_with(&stub, "example.com");
    assert!(!result.passed);
    assert_eq!(result.message, "MX lookup timed out");
}
