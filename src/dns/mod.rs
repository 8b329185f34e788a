//! DNS resolution stages: basic domain (A/AAAA) lookup and MX lookup.
//!
//! Both lookups run against the system resolver with a bounded deadline;
//! a timeout degrades to a failed [`CheckResult`](crate::CheckResult)
//! instead of propagating.

mod error;
mod resolver;
mod types;

pub use error::DnsError;
pub use resolver::{SystemResolver, check_domain, check_mx};
pub use types::MxRecord;

pub(crate) use resolver::{NameService, check_domain_with, check_mx_with};

#[cfg(test)]
pub(crate) mod tests;
