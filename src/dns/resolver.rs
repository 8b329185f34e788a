use std::net::IpAddr;
use std::time::Duration;

use trust_dns_resolver::Resolver;
use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};
use trust_dns_resolver::system_conf::read_system_conf;

use crate::report::{CheckDetail, CheckResult};

use super::{DnsError, MxRecord};

/// Name resolution seam: the pipeline and the public check functions go
/// through this trait so tests can substitute a stub resolver.
pub(crate) trait NameService {
    fn lookup_host(&self, domain: &str) -> Result<Vec<IpAddr>, DnsError>;
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, DnsError>;
}

/// System resolver with the per-lookup deadline baked into its options.
pub struct SystemResolver {
    inner: Resolver,
}

impl SystemResolver {
    pub fn new(timeout: Duration) -> Result<Self, DnsError> {
        let (config, mut opts) = read_system_conf().map_err(DnsError::resolver_init)?;
        opts.timeout = timeout;
        let inner = Resolver::new(config, opts).map_err(DnsError::resolver_init)?;
        Ok(Self { inner })
    }
}

impl NameService for SystemResolver {
    fn lookup_host(&self, domain: &str) -> Result<Vec<IpAddr>, DnsError> {
        let lookup = self
            .inner
            .lookup_ip(domain)
            .map_err(|err| map_resolve_error(domain, err))?;
        let addrs: Vec<IpAddr> = lookup.iter().collect();
        if addrs.is_empty() {
            return Err(DnsError::NoRecords {
                domain: domain.to_string(),
            });
        }
        Ok(addrs)
    }

    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, DnsError> {
        match self.inner.mx_lookup(domain) {
            Ok(lookup) => Ok(lookup
                .iter()
                .map(|mx| MxRecord::new(mx.preference(), normalize_exchange(mx.exchange().to_utf8())))
                .collect()),
            // zero records is a reportable outcome, not an error
            Err(err) if matches!(err.kind(), ResolveErrorKind::NoRecordsFound { .. }) => {
                Ok(Vec::new())
            }
            Err(err) => Err(map_resolve_error(domain, err)),
        }
    }
}

fn map_resolve_error(domain: &str, err: ResolveError) -> DnsError {
    match err.kind() {
        ResolveErrorKind::Timeout => DnsError::Timeout,
        ResolveErrorKind::NoRecordsFound { .. } => DnsError::NoRecords {
            domain: domain.to_string(),
        },
        _ => DnsError::Lookup { source: err },
    }
}

pub(crate) fn normalize_domain(domain: &str) -> Result<String, DnsError> {
    let trimmed = domain.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return Err(DnsError::EmptyDomain);
    }
    idna::domain_to_ascii(trimmed).map_err(DnsError::idna)
}

pub(crate) fn normalize_exchange(exchange: String) -> String {
    exchange.trim_end_matches('.').to_ascii_lowercase()
}

/// Basic A/AAAA resolution of `domain`, bounded by `timeout`.
pub fn check_domain(domain: &str, timeout: Duration) -> CheckResult {
    match resolver_for(timeout, domain) {
        Ok((resolver, ascii)) => check_domain_with(&resolver, &ascii),
        Err(result) => result,
    }
}

/// MX resolution of `domain`, bounded by `timeout`. Records in the detail
/// payload are sorted ascending by priority.
pub fn check_mx(domain: &str, timeout: Duration) -> CheckResult {
    match resolver_for(timeout, domain) {
        Ok((resolver, ascii)) => check_mx_with(&resolver, &ascii).0,
        Err(result) => result,
    }
}

fn resolver_for(timeout: Duration, domain: &str) -> Result<(SystemResolver, String), CheckResult> {
    let ascii = normalize_domain(domain).map_err(|err| CheckResult::failed(err.to_string()))?;
    let resolver = SystemResolver::new(timeout)
        .map_err(|err| CheckResult::failed(err.to_string()))?;
    Ok((resolver, ascii))
}

pub(crate) fn check_domain_with<N: NameService>(ns: &N, ascii_domain: &str) -> CheckResult {
    match ns.lookup_host(ascii_domain) {
        Ok(addrs) => {
            tracing::debug!(domain = ascii_domain, addresses = addrs.len(), "domain resolves");
            CheckResult::passed(format!("domain resolves ({} addresses)", addrs.len()))
        }
        Err(DnsError::Timeout) => CheckResult::failed("domain lookup timed out"),
        Err(err) => CheckResult::failed(format!("domain does not resolve: {err}")),
    }
}

pub(crate) fn check_mx_with<N: NameService>(
    ns: &N,
    ascii_domain: &str,
) -> (CheckResult, Vec<MxRecord>) {
    match ns.lookup_mx(ascii_domain) {
        Ok(mut records) => {
            records.sort();
            records.dedup();
            if records.is_empty() {
                return (
                    CheckResult::failed("no MX records found for domain"),
                    Vec::new(),
                );
            }
            tracing::debug!(domain = ascii_domain, count = records.len(), "MX records found");
            let result = CheckResult::passed(format!("{} MX record(s) found", records.len()))
                .with_detail(CheckDetail::MxRecords(records.clone()));
            (result, records)
        }
        Err(DnsError::Timeout) => (CheckResult::failed("MX lookup timed out"), Vec::new()),
        Err(err) => (
            CheckResult::failed(format!("MX lookup failed: {err}")),
            Vec::new(),
        ),
    }
}
