#![forbid(unsafe_code)]
//! mailvet — email deliverability checks: syntax validation, DNS/MX
//! resolution, a live SMTP recipient handshake with retry/fallback across
//! mail exchangers, and static reputation heuristics.

pub mod dns;
pub mod heuristics;
mod options;
mod pipeline;
mod report;
pub mod smtp;
pub mod validator;

pub use dns::{DnsError, MxRecord, SystemResolver};
pub use options::ValidatorOptions;
pub use pipeline::EmailValidator;
pub use report::{CheckDetail, CheckResult, EmailChecks, ValidationReport};
pub use smtp::{ProbeError, verify_mailbox};
pub use validator::{ParsedAddress, check_syntax};
