use std::borrow::Cow;
use std::time::Duration;

/// Knobs for the validation pipeline. Set once at construction, never
/// mutated afterwards; safe to share between concurrent validations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorOptions {
    /// Overall deadline for the whole SMTP stage (all hosts, all rounds).
    pub smtp_timeout: Duration,
    /// Watchdog deadline for a single SMTP session.
    pub session_timeout: Duration,
    /// Socket idle timeout between reads/writes inside a session.
    pub idle_timeout: Duration,
    /// Deadline for each DNS lookup (A/AAAA and MX).
    pub dns_timeout: Duration,
    /// Retry rounds across the MX list.
    pub retry_attempts: u32,
    /// Pause between two retry rounds.
    pub retry_pause: Duration,
    /// Envelope sender for `MAIL FROM`. Defaults to `postmaster@<domain>`.
    pub sender_address: Option<String>,
    /// Identity announced in the `HELO` command.
    pub helo_hostname: String,
    /// SMTP port, 25 unless probing a test server.
    pub port: u16,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            smtp_timeout: Duration::from_millis(2_500),
            session_timeout: Duration::from_millis(2_500),
            idle_timeout: Duration::from_millis(2_500),
            dns_timeout: Duration::from_millis(2_000),
            retry_attempts: 2,
            retry_pause: Duration::from_millis(1_000),
            sender_address: None,
            helo_hostname: "localhost".to_string(),
            port: 25,
        }
    }
}

impl ValidatorOptions {
    /// Envelope sender used in `MAIL FROM`. When unspecified a
    /// `postmaster@domain` placeholder is synthesised.
    pub fn envelope_sender<'a>(&'a self, ascii_domain: &str) -> Cow<'a, str> {
        self.sender_address
            .as_deref()
            .filter(|value| !value.is_empty())
            .map(Cow::Borrowed)
            .unwrap_or_else(|| Cow::Owned(format!("postmaster@{ascii_domain}")))
    }
}
