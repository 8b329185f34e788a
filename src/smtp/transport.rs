use std::io::{self, BufRead, BufReader, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use super::error::ProbeError;

/// Line-oriented transport underneath the SMTP state machine. The probe
/// adjusts the read deadline before every reply; `shutdown` must actively
/// close the connection so an aborted session never leaks a socket.
pub(crate) trait Transport {
    fn send_line(&mut self, line: &str) -> io::Result<()>;
    /// One CRLF-terminated line, terminator stripped. `UnexpectedEof` when
    /// the peer closed the connection.
    fn read_line(&mut self) -> io::Result<String>;
    fn set_read_deadline(&mut self, timeout: Duration) -> io::Result<()>;
    fn shutdown(&mut self);
}

/// Connection factory seam for the retry orchestrator.
pub(crate) trait Connect {
    type Stream: Transport;

    fn connect(&self, host: &str, port: u16, timeout: Duration)
    -> Result<Self::Stream, ProbeError>;
}

pub(crate) struct TcpTransport {
    stream: TcpStream,
    reader: BufReader<TcpStream>,
}

impl TcpTransport {
    pub(crate) fn connect(host: &str, port: u16, timeout: Duration) -> Result<Self, ProbeError> {
        let addrs = (host, port)
            .to_socket_addrs()
            .map_err(|source| ProbeError::Connect {
                host: host.to_string(),
                source,
            })?;

        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => {
                    stream.set_read_timeout(Some(timeout)).map_err(ProbeError::io)?;
                    stream.set_write_timeout(Some(timeout)).map_err(ProbeError::io)?;
                    let reader = BufReader::new(stream.try_clone().map_err(ProbeError::io)?);
                    return Ok(Self { stream, reader });
                }
                Err(err) => last_err = Some(err),
            }
        }
        Err(ProbeError::Connect {
            host: host.to_string(),
            source: last_err.unwrap_or_else(|| {
                io::Error::new(io::ErrorKind::AddrNotAvailable, "no socket address resolved")
            }),
        })
    }
}

impl Transport for TcpTransport {
    fn send_line(&mut self, line: &str) -> io::Result<()> {
        let mut data = line.as_bytes().to_vec();
        data.extend_from_slice(b"\r\n");
        self.stream.write_all(&data)?;
        self.stream.flush()
    }

    fn read_line(&mut self) -> io::Result<String> {
        let mut raw = String::new();
        let bytes = self.reader.read_line(&mut raw)?;
        if bytes == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed while reading reply",
            ));
        }
        while raw.ends_with('\n') || raw.ends_with('\r') {
            raw.pop();
        }
        Ok(raw)
    }

    fn set_read_deadline(&mut self, timeout: Duration) -> io::Result<()> {
        // a zero timeout would disable the deadline entirely
        self.stream
            .set_read_timeout(Some(timeout.max(Duration::from_millis(1))))
    }

    fn shutdown(&mut self) {
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

pub(crate) struct TcpConnector;

impl Connect for TcpConnector {
    type Stream = TcpTransport;

    fn connect(
        &self,
        host: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<Self::Stream, ProbeError> {
        TcpTransport::connect(host, port, timeout)
    }
}
