//! Per-address validation pipeline and sequential batch runner.

use std::time::Instant;

use chrono::Utc;

use crate::dns::{self, SystemResolver};
use crate::heuristics;
use crate::options::ValidatorOptions;
use crate::report::{CheckResult, EmailChecks, ValidationReport};
use crate::smtp::{self, Connect, TcpConnector};
use crate::validator::{ParsedAddress, check_syntax};

/// Validation pipeline: syntax → domain → MX → SMTP probe → heuristics.
/// Holds only immutable configuration; one instance can serve any number
/// of validations.
pub struct EmailValidator {
    options: ValidatorOptions,
}

impl EmailValidator {
    pub fn new(options: ValidatorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    /// Runs the full pipeline for one address. Infallible by contract:
    /// every failure mode degrades to a failed check inside the report.
    pub fn validate(&self, email: &str) -> ValidationReport {
        let started = Instant::now();
        let mut checks = EmailChecks::default();

        let (syntax, parsed) = check_syntax(email);
        let syntax_ok = syntax.passed;
        checks.syntax = Some(syntax);

        if let (true, Some(parsed)) = (syntax_ok, parsed) {
            match SystemResolver::new(self.options.dns_timeout) {
                Ok(resolver) => {
                    self.run_network_stages(&parsed, &resolver, &TcpConnector, &mut checks);
                }
                Err(err) => {
                    // internal failures surface in the syntax slot instead
                    // of escaping the pipeline
                    checks.syntax = Some(CheckResult::failed(format!("validation error: {err}")));
                }
            }
        }

        self.assemble(email, checks, started)
    }

    /// Sequential batch: one report per input, input order preserved.
    /// A failing address never aborts the rest of the batch.
    pub fn validate_batch<S: AsRef<str>>(&self, emails: &[S]) -> Vec<ValidationReport> {
        emails
            .iter()
            .map(|email| self.validate(email.as_ref()))
            .collect()
    }

    fn run_network_stages<N: dns::NameService, C: Connect>(
        &self,
        parsed: &ParsedAddress,
        resolver: &N,
        connector: &C,
        checks: &mut EmailChecks,
    ) {
        let domain_result = dns::check_domain_with(resolver, &parsed.ascii_domain);
        let domain_ok = domain_result.passed;
        checks.domain = Some(domain_result);
        if !domain_ok {
            return;
        }

        let (mx_result, records) = dns::check_mx_with(resolver, &parsed.ascii_domain);
        let mx_ok = mx_result.passed;
        checks.mx = Some(mx_result);
        if !mx_ok {
            return;
        }

        let rcpt_to = format!("{}@{}", parsed.local, parsed.ascii_domain);
        checks.smtp = Some(smtp::verify_with_connector(
            connector,
            &rcpt_to,
            &parsed.ascii_domain,
            &records,
            &self.options,
        ));

        // advisory checks run even when the SMTP probe failed
        checks.disposable = Some(heuristics::check_disposable(&parsed.ascii_domain));
        checks.role_based = Some(heuristics::check_role_based(&parsed.local));
    }

    fn assemble(&self, email: &str, checks: EmailChecks, started: Instant) -> ValidationReport {
        let is_valid = checks.all_required_passed();
        tracing::debug!(email, is_valid, "validation finished");
        ValidationReport {
            email: email.to_string(),
            is_valid,
            checks,
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            timestamp: Utc::now(),
        }
    }

    #[cfg(test)]
    pub(crate) fn validate_with<N: dns::NameService, C: Connect>(
        &self,
        email: &str,
        resolver: &N,
        connector: &C,
    ) -> ValidationReport {
        let started = Instant::now();
        let mut checks = EmailChecks::default();

        let (syntax, parsed) = check_syntax(email);
        let syntax_ok = syntax.passed;
        checks.syntax = Some(syntax);

        if let (true, Some(parsed)) = (syntax_ok, parsed) {
            self.run_network_stages(&parsed, resolver, connector, &mut checks);
        }

        self.assemble(email, checks, started)
    }
}
