//! Blocking Unix-socket client for the muxgeist daemon.
//!
//! One command per connection: connect, write the command, half-close,
//! read until the daemon closes, drop the stream.

use std::io::{self, Read, Write};
use std::net::Shutdown;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use muxgeist_core::{DecodeError, ResponseDecoder, SessionContext};
use serde::Serialize;
use socket2::{Domain, SockAddr, Socket, Type};

/// Connect, read, and write timeout applied to every exchange.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Replies larger than this are rejected.
pub const MAX_RESPONSE_BYTES: usize = 1 << 20;

/// Pause between connect attempts while the daemon's backlog is full.
const CONNECT_RETRY: Duration = Duration::from_millis(10);

const ERROR_PREFIX: &str = "ERROR";

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("cannot connect to daemon at {path}: {source}")]
    Connect {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to send command: {0}")]
    Write(#[source] io::Error),

    #[error("failed to read response: {0}")]
    Read(#[source] io::Error),

    #[error("daemon did not answer within {0:?}")]
    Timeout(Duration),

    #[error("response exceeded {limit} bytes")]
    TooLarge { limit: usize },
}

/// One line of a `list` reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionEntry {
    pub id: String,
    pub cwd: Option<String>,
}

#[derive(Debug)]
pub struct DaemonClient {
    socket_path: PathBuf,
    timeout: Duration,
    decoder: ResponseDecoder,
}

impl DaemonClient {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
            timeout: DEFAULT_TIMEOUT,
            decoder: ResponseDecoder::new(),
        }
    }

    /// Bounds connect, each read, and each write. Zero disables the timeout
    /// and blocks indefinitely.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_decoder(mut self, decoder: ResponseDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Send one command and return the full reply.
    pub fn try_send(&self, command: &str) -> Result<String, TransportError> {
        let mut stream = self.connect()?;

        let timeout = Some(self.timeout).filter(|t| !t.is_zero());
        stream
            .set_read_timeout(timeout)
            .and_then(|()| stream.set_write_timeout(timeout))
            .map_err(|source| self.connect_error(source))?;

        stream
            .write_all(command.as_bytes())
            .map_err(|e| self.classify(e, TransportError::Write))?;
        stream
            .shutdown(Shutdown::Write)
            .map_err(|e| self.classify(e, TransportError::Write))?;

        let mut buf = Vec::new();
        (&mut stream)
            .take(MAX_RESPONSE_BYTES as u64 + 1)
            .read_to_end(&mut buf)
            .map_err(|e| self.classify(e, TransportError::Read))?;
        if buf.len() > MAX_RESPONSE_BYTES {
            return Err(TransportError::TooLarge {
                limit: MAX_RESPONSE_BYTES,
            });
        }

        tracing::debug!(command, bytes = buf.len(), "daemon replied");
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Send one command. Any transport failure yields an empty string, which
    /// callers must read as "daemon unavailable".
    pub fn send_command(&self, command: &str) -> String {
        match self.try_send(command) {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(command, error = %e, "daemon communication failed");
                String::new()
            }
        }
    }

    /// The daemon's status line, or `None` when it is unreachable.
    pub fn status(&self) -> Option<String> {
        let reply = self.send_command("status");
        let line = reply.trim();
        (!line.is_empty()).then(|| line.to_string())
    }

    /// Tracked session ids in daemon order.
    pub fn list_sessions(&self) -> Vec<String> {
        self.list_session_entries()
            .into_iter()
            .map(|entry| entry.id)
            .collect()
    }

    pub fn list_session_entries(&self) -> Vec<SessionEntry> {
        parse_session_list(&self.send_command("list"))
    }

    /// Decoded context for `session_id`, or `None` when the daemon is down,
    /// does not know the session, or sends a malformed reply.
    pub fn get_context(&self, session_id: &str) -> Option<SessionContext> {
        let reply = self.send_command(&format!("context:{session_id}"));
        match self.decoder.decode(&reply) {
            Ok(ctx) => Some(ctx),
            Err(DecodeError::Empty) => None,
            Err(e) => {
                tracing::warn!(session_id, error = %e, "no context available");
                None
            }
        }
    }

    /// Connect within the timeout. A non-blocking Unix connect fails with
    /// `WouldBlock` while the listen backlog is full; retry until the deadline.
    fn connect(&self) -> Result<UnixStream, TransportError> {
        let addr = SockAddr::unix(&self.socket_path).map_err(|e| self.connect_error(e))?;
        let socket =
            Socket::new(Domain::UNIX, Type::STREAM, None).map_err(|e| self.connect_error(e))?;

        if self.timeout.is_zero() {
            socket.connect(&addr).map_err(|e| self.connect_error(e))?;
            return Ok(UnixStream::from(std::os::fd::OwnedFd::from(socket)));
        }

        socket
            .set_nonblocking(true)
            .map_err(|e| self.connect_error(e))?;
        let deadline = Instant::now() + self.timeout;
        loop {
            match socket.connect(&addr) {
                Ok(()) => break,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    if Instant::now() >= deadline {
                        return Err(TransportError::Timeout(self.timeout));
                    }
                    thread::sleep(CONNECT_RETRY);
                }
                Err(e) => return Err(self.connect_error(e)),
            }
        }
        socket
            .set_nonblocking(false)
            .map_err(|e| self.connect_error(e))?;
        Ok(UnixStream::from(std::os::fd::OwnedFd::from(socket)))
    }

    fn connect_error(&self, source: io::Error) -> TransportError {
        TransportError::Connect {
            path: self.socket_path.display().to_string(),
            source,
        }
    }

    fn classify(&self, e: io::Error, wrap: fn(io::Error) -> TransportError) -> TransportError {
        match e.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => {
                TransportError::Timeout(self.timeout)
            }
            _ => wrap(e),
        }
    }
}

/// Parse a `list` reply of `<id> (<cwd>)` lines. `ERROR` lines and blank
/// lines are skipped; the id is the first whitespace-delimited token.
pub fn parse_session_list(reply: &str) -> Vec<SessionEntry> {
    reply
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(ERROR_PREFIX))
        .filter_map(|line| {
            let mut parts = line.splitn(2, char::is_whitespace);
            let id = parts.next()?.to_string();
            let cwd = parts
                .next()
                .map(str::trim)
                .and_then(|rest| rest.strip_prefix('(')?.strip_suffix(')'))
                .map(String::from);
            Some(SessionEntry { id, cwd })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_list_with_cwds() {
        let reply = "work (/home/u/work)\nscratch (/tmp)\n";
        let entries = parse_session_list(reply);
        assert_eq!(
            entries,
            [
                SessionEntry {
                    id: "work".into(),
                    cwd: Some("/home/u/work".into()),
                },
                SessionEntry {
                    id: "scratch".into(),
                    cwd: Some("/tmp".into()),
                },
            ]
        );
    }

    #[test]
    fn parse_list_cwd_with_spaces() {
        let entries = parse_session_list("docs (/home/u/My Documents)\n");
        assert_eq!(entries[0].cwd.as_deref(), Some("/home/u/My Documents"));
    }

    #[test]
    fn parse_list_skips_errors_and_blanks() {
        let entries = parse_session_list("ERROR: Unknown command\n\nsolo\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "solo");
        assert_eq!(entries[0].cwd, None);
    }

    #[test]
    fn parse_list_ignores_unparenthesized_rest() {
        let entries = parse_session_list("main extra words\n");
        assert_eq!(entries[0].id, "main");
        assert_eq!(entries[0].cwd, None);
    }

    #[test]
    fn parse_empty_reply() {
        assert!(parse_session_list("").is_empty());
    }

    #[test]
    fn unreachable_daemon_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let client = DaemonClient::new(dir.path().join("missing.sock"));
        assert_eq!(client.send_command("status"), "");
        assert_eq!(client.status(), None);
        assert!(client.list_sessions().is_empty());
        assert_eq!(client.get_context("work"), None);
        assert!(matches!(
            client.try_send("status"),
            Err(TransportError::Connect { .. })
        ));
    }
}
