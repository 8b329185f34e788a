use std::time::{Duration, Instant};

use super::error::ProbeError;
use super::transport::Transport;

/// One parsed server reply. `code` is `None` when the final line does not
/// start with a three-digit status code; the state machine treats that as
/// an unexpected response rather than a protocol error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SmtpReply {
    pub code: Option<u16>,
    pub text: String,
}

/// Reads replies off a transport while accumulating the transcript and
/// enforcing the per-session watchdog deadline. Both the watchdog and the
/// socket-idle timeout surface as [`ProbeError::Timeout`], after the
/// connection has been shut down.
pub(crate) struct SmtpSession<'a, T: Transport> {
    transport: &'a mut T,
    transcript: Vec<String>,
    deadline: Instant,
    idle_timeout: Duration,
}

impl<'a, T: Transport> SmtpSession<'a, T> {
    pub(crate) fn new(transport: &'a mut T, deadline: Instant, idle_timeout: Duration) -> Self {
        Self {
            transport,
            transcript: Vec::new(),
            deadline,
            idle_timeout,
        }
    }

    /// Every line received so far, newline-joined.
    pub(crate) fn transcript(&self) -> String {
        self.transcript.join("\n")
    }

    pub(crate) fn send(&mut self, command: &str) -> Result<(), ProbeError> {
        self.transport.send_line(command).map_err(ProbeError::io)
    }

    /// Reads one (possibly multi-line) reply.
    pub(crate) fn read_reply(&mut self) -> Result<SmtpReply, ProbeError> {
        let mut code = None;
        let mut last_line = String::new();
        loop {
            let line = self.read_line()?;
            let parsed = parse_code(&line);
            if code.is_none() {
                code = parsed;
            }
            let continuation = parsed.is_some() && line.as_bytes().get(3) == Some(&b'-');
            self.transcript.push(line.clone());
            last_line = line;
            if !continuation {
                break;
            }
        }
        let text = if code.is_some() {
            last_line.get(4..).unwrap_or("").trim().to_string()
        } else {
            last_line
        };
        Ok(SmtpReply { code, text })
    }

    fn read_line(&mut self) -> Result<String, ProbeError> {
        let remaining = self.deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            self.transport.shutdown();
            return Err(ProbeError::Timeout);
        }
        self.transport
            .set_read_deadline(remaining.min(self.idle_timeout))
            .map_err(ProbeError::io)?;
        match self.transport.read_line() {
            Ok(line) => Ok(line),
            Err(err)
                if matches!(err.kind(), std::io::ErrorKind::TimedOut)
                    || matches!(err.kind(), std::io::ErrorKind::WouldBlock) =>
            {
                self.transport.shutdown();
                Err(ProbeError::Timeout)
            }
            Err(err) => {
                self.transport.shutdown();
                Err(ProbeError::io(err))
            }
        }
    }

    /// Best-effort QUIT, then tear the connection down.
    pub(crate) fn quit(&mut self) {
        let _ = self.transport.send_line("QUIT");
        self.transport.shutdown();
    }

    /// Tear down without QUIT (early rejections, aborted sessions).
    pub(crate) fn abort(&mut self) {
        self.transport.shutdown();
    }
}

fn parse_code(line: &str) -> Option<u16> {
    let bytes = line.as_bytes();
    if bytes.len() < 3 || !bytes[..3].iter().all(u8::is_ascii_digit) {
        return None;
    }
    line[..3].parse().ok()
}
