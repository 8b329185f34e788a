use std::thread;
use std::time::Instant;

use crate::dns::MxRecord;
use crate::options::ValidatorOptions;
use crate::report::{CheckDetail, CheckResult};

use super::probe::{self, ProbeCommands};
use super::transport::{Connect, TcpConnector};

/// Runs the SMTP probe for `local@ascii_domain` against `records` in
/// ascending priority order. The first host whose handshake completes
/// (accepted or rejected) decides the result; connection failures and
/// session timeouts advance to the next host. Hosts are retried in rounds
/// with a pause in between, under an overall stage deadline.
pub fn verify_mailbox(
    rcpt_to: &str,
    ascii_domain: &str,
    records: &[MxRecord],
    options: &ValidatorOptions,
) -> CheckResult {
    verify_with_connector(&TcpConnector, rcpt_to, ascii_domain, records, options)
}

pub(crate) fn verify_with_connector<C: Connect>(
    connector: &C,
    rcpt_to: &str,
    ascii_domain: &str,
    records: &[MxRecord],
    options: &ValidatorOptions,
) -> CheckResult {
    let stage_deadline = Instant::now() + options.smtp_timeout;
    let mail_from = options.envelope_sender(ascii_domain);
    let commands = ProbeCommands {
        rcpt_to,
        helo: &options.helo_hostname,
        mail_from: mail_from.as_ref(),
    };
    let rounds = options.retry_attempts.max(1);

    for round in 0..rounds {
        for record in records {
            let remaining = stage_deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return timeout_result(options);
            }
            let session_budget = options.session_timeout.min(remaining);

            let mut transport = match connector.connect(
                &record.exchange,
                options.port,
                session_budget.min(options.idle_timeout),
            ) {
                Ok(transport) => transport,
                Err(err) => {
                    tracing::debug!(host = %record.exchange, round, error = %err,
                        "connection failed, trying next host");
                    continue;
                }
            };

            let session_deadline = Instant::now() + session_budget;
            match probe::run_handshake(
                &mut transport,
                &commands,
                session_deadline,
                options.idle_timeout,
            ) {
                Ok(outcome) => {
                    tracing::debug!(host = %record.exchange, passed = outcome.passed,
                        "SMTP handshake completed");
                    return CheckResult {
                        passed: outcome.passed,
                        message: outcome.message,
                        detail: Some(CheckDetail::Transcript(outcome.transcript)),
                    };
                }
                Err(err) => {
                    tracing::debug!(host = %record.exchange, round, error = %err,
                        "SMTP session aborted, trying next host");
                }
            }
        }

        if round + 1 < rounds {
            let remaining = stage_deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return timeout_result(options);
            }
            thread::sleep(options.retry_pause.min(remaining));
        }
    }

    CheckResult::failed("SMTP validation failed for all MX servers after retries")
        .with_detail(CheckDetail::Transcript(String::new()))
}

fn timeout_result(options: &ValidatorOptions) -> CheckResult {
    CheckResult::failed(format!(
        "SMTP check timed out after {} ms",
        options.smtp_timeout.as_millis()
    ))
    .with_detail(CheckDetail::Transcript(String::new()))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::smtp::transport::testing::{ScriptStep, ScriptedConnector, ScriptedTransport};

    fn fast_options() -> ValidatorOptions {
        ValidatorOptions {
            smtp_timeout: Duration::from_secs(10),
            session_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(5),
            retry_attempts: 2,
            retry_pause: Duration::from_millis(1),
            ..ValidatorOptions::default()
        }
    }

    fn two_hosts() -> Vec<MxRecord> {
        vec![
            MxRecord::new(10, "mx1.example.com"),
            MxRecord::new(20, "mx2.example.com"),
        ]
    }

    fn accepting_transport() -> ScriptedTransport {
        ScriptedTransport::replies(&[
            "220 mx ready",
            "250 hello",
            "250 sender ok",
            "250 recipient ok",
        ])
    }

    #[test]
    fn exhausting_all_hosts_and_rounds_reports_failure() {
        let connector = ScriptedConnector::new([None, None, None, None]);
        let result = verify_with_connector(
            &connector,
            "user@example.com",
            "example.com",
            &two_hosts(),
            &fast_options(),
        );
        assert!(!result.passed);
        assert_eq!(
            result.message,
            "SMTP validation failed for all MX servers after retries"
        );
        assert_eq!(result.transcript(), Some(""));
        assert_eq!(
            *connector.attempts.borrow(),
            vec!["mx1.example.com", "mx2.example.com", "mx1.example.com", "mx2.example.com"]
        );
    }

    #[test]
    fn falls_back_to_next_host_after_connection_failure() {
        let connector = ScriptedConnector::new([None, Some(accepting_transport())]);
        let result = verify_with_connector(
            &connector,
            "user@example.com",
            "example.com",
            &two_hosts(),
            &fast_options(),
        );
        assert!(result.passed);
        assert_eq!(connector.attempts.borrow().len(), 2);
    }

    #[test]
    fn falls_back_after_session_timeout() {
        let silent = ScriptedTransport::new([ScriptStep::TimeOut]);
        let connector = ScriptedConnector::new([Some(silent), Some(accepting_transport())]);
        let result = verify_with_connector(
            &connector,
            "user@example.com",
            "example.com",
            &two_hosts(),
            &fast_options(),
        );
        assert!(result.passed);
        assert_eq!(connector.attempts.borrow().len(), 2);
    }

    #[test]
    fn conclusive_rejection_ends_the_search() {
        let rejecting = ScriptedTransport::replies(&[
            "220 mx ready",
            "250 hello",
            "250 sender ok",
            "550 no such user",
        ]);
        let connector = ScriptedConnector::new([Some(rejecting), Some(accepting_transport())]);
        let result = verify_with_connector(
            &connector,
            "user@example.com",
            "example.com",
            &two_hosts(),
            &fast_options(),
        );
        assert!(!result.passed);
        assert!(result.message.contains("rejected"));
        assert_eq!(connector.attempts.borrow().len(), 1);
    }

    #[test]
    fn stage_deadline_yields_timeout_result() {
        let options = ValidatorOptions {
            smtp_timeout: Duration::ZERO,
            ..fast_options()
        };
        let connector = ScriptedConnector::new([Some(accepting_transport())]);
        let result = verify_with_connector(
            &connector,
            "user@example.com",
            "example.com",
            &two_hosts(),
            &options,
        );
        assert!(!result.passed);
        assert!(result.message.contains("timed out"));
        assert!(connector.attempts.borrow().is_empty());
    }

    #[test]
    fn sender_defaults_to_postmaster_at_domain() {
        let transport = accepting_transport();
        let sent = transport.sent_handle();
        let connector = ScriptedConnector::new([Some(transport)]);
        let result = verify_with_connector(
            &connector,
            "user@example.com",
            "example.com",
            &two_hosts(),
            &fast_options(),
        );
        assert!(result.passed);
        assert!(
            sent.borrow()
                .contains(&"MAIL FROM:<postmaster@example.com>".to_string())
        );
    }
}
