use std::time::{Duration, Instant};

use super::error::ProbeError;
use super::session::{SmtpReply, SmtpSession};
use super::transport::Transport;

/// Terminal result of a completed handshake against one host. An `Err`
/// from [`run_handshake`] means the session never reached a terminal
/// classification and the next host should be tried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProbeOutcome {
    pub passed: bool,
    pub message: String,
    pub transcript: String,
}

/// Commands sent during the scripted handshake.
pub(crate) struct ProbeCommands<'a> {
    pub rcpt_to: &'a str,
    pub helo: &'a str,
    pub mail_from: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProbeState {
    Greeting,
    HeloSent,
    MailSent,
    RcptSent,
}

/// Drives the handshake state machine over `transport`:
/// greeting `220` → `HELO` → `250` → `MAIL FROM` → `250` → `RCPT TO` →
/// terminal classification of the RCPT code. Any other code along the way
/// resolves as a rejection; connection-level failures and timeouts abort
/// the session with a retryable error.
pub(crate) fn run_handshake<T: Transport>(
    transport: &mut T,
    commands: &ProbeCommands<'_>,
    deadline: Instant,
    idle_timeout: Duration,
) -> Result<ProbeOutcome, ProbeError> {
    let mut session = SmtpSession::new(transport, deadline, idle_timeout);
    let mut state = ProbeState::Greeting;

    loop {
        let reply = session.read_reply()?;
        match state {
            ProbeState::Greeting => {
                if reply.code == Some(220) {
                    session.send(&format!("HELO {}", commands.helo))?;
                    state = ProbeState::HeloSent;
                } else {
                    return Ok(rejected(&mut session, "Connection rejected"));
                }
            }
            ProbeState::HeloSent => {
                if reply.code == Some(250) {
                    session.send(&format!("MAIL FROM:<{}>", commands.mail_from))?;
                    state = ProbeState::MailSent;
                } else {
                    return Ok(rejected(&mut session, "HELO rejected"));
                }
            }
            ProbeState::MailSent => {
                if reply.code == Some(250) {
                    session.send(&format!("RCPT TO:<{}>", commands.rcpt_to))?;
                    state = ProbeState::RcptSent;
                } else {
                    return Ok(rejected(&mut session, "MAIL FROM rejected"));
                }
            }
            ProbeState::RcptSent => {
                let (passed, message) = classify_rcpt(&reply);
                session.quit();
                return Ok(ProbeOutcome {
                    passed,
                    message,
                    transcript: session.transcript(),
                });
            }
        }
    }
}

fn rejected<T: Transport>(session: &mut SmtpSession<'_, T>, message: &str) -> ProbeOutcome {
    session.abort();
    ProbeOutcome {
        passed: false,
        message: message.to_string(),
        transcript: session.transcript(),
    }
}

fn classify_rcpt(reply: &SmtpReply) -> (bool, String) {
    match reply.code {
        Some(250) => (true, "Email address accepted by SMTP server".to_string()),
        Some(550 | 551 | 553) => (false, format!("Email address rejected: {}", reply.text)),
        Some(450 | 451 | 452) => (
            false,
            format!("Temporary failure (possible greylisting): {}", reply.text),
        ),
        _ => (false, format!("Unexpected response: {}", reply.text)),
    }
}
