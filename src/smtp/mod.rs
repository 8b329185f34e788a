//! SMTP recipient-verification probe.
//!
//! The handshake is an explicit state machine (`probe`) driven over a
//! line-oriented `transport` seam, so the whole protocol exchange is
//! unit-testable against a scripted transport. `retry` walks the MX list
//! in priority order with retry rounds and an overall stage deadline.

mod error;
mod probe;
mod retry;
mod session;
pub(crate) mod transport;

pub use error::ProbeError;
pub use retry::verify_mailbox;

pub(crate) use retry::verify_with_connector;
pub(crate) use transport::{Connect, TcpConnector};
