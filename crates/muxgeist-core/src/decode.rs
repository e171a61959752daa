//! Decoder for the daemon's `context:<id>` reply.
//!
//! Wire shape:
//!
//! ```text
//! Session: work
//! CWD: /home/me/proj
//! Pane: %3
//! Last Activity: 1718000000
//! Scrollback Length: 42
//! Scrollback:
//! <everything else, verbatim>
//! ```
//!
//! Header keys are matched case-insensitively; unknown keys are ignored.

use crate::error::DecodeError;
use crate::types::SessionContext;

/// Replies starting with this token carry no data.
pub const ERROR_PREFIX: &str = "ERROR";

/// Live capture used when the daemon reply carries no scrollback.
///
/// Implemented by the tmux crate; absent in tests that need deterministic
/// decoding.
pub trait ScrollbackFallback: Send + Sync {
    /// Best-effort capture of the session's visible content.
    fn capture(&self, session_id: &str) -> Option<String>;
}

impl<T: ScrollbackFallback + ?Sized> ScrollbackFallback for &T {
    fn capture(&self, session_id: &str) -> Option<String> {
        (**self).capture(session_id)
    }
}

#[derive(Default)]
pub struct ResponseDecoder {
    fallback: Option<Box<dyn ScrollbackFallback>>,
}

impl std::fmt::Debug for ResponseDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseDecoder")
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

#[derive(Default)]
struct Headers {
    session_id: Option<String>,
    cwd: Option<String>,
    pane: Option<String>,
    last_activity: Option<i64>,
    scrollback_length: Option<usize>,
}

impl ResponseDecoder {
    /// Decoder without a live-capture fallback.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: impl ScrollbackFallback + 'static) -> Self {
        self.fallback = Some(Box::new(fallback));
        self
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Decode a raw `context:<id>` reply.
    pub fn decode(&self, response: &str) -> Result<SessionContext, DecodeError> {
        if response.trim().is_empty() {
            return Err(DecodeError::Empty);
        }
        if response.starts_with(ERROR_PREFIX) {
            return Err(DecodeError::Daemon(response.trim().to_string()));
        }

        let response = response.trim_end_matches(['\n', '\r']);
        let mut headers = Headers::default();
        let mut body: Vec<&str> = Vec::new();
        let mut in_body = false;

        for line in response.split('\n') {
            if in_body {
                body.push(line);
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match key.trim().to_ascii_lowercase().as_str() {
                "session" => headers.session_id = Some(value.to_string()),
                "cwd" => headers.cwd = Some(value.to_string()),
                "pane" => headers.pane = Some(value.to_string()),
                "last activity" => {
                    headers.last_activity = Some(parse_int("last activity", value)?);
                }
                "scrollback length" => {
                    headers.scrollback_length = Some(parse_int("scrollback length", value)?);
                }
                "scrollback" => {
                    in_body = true;
                    if !value.is_empty() {
                        body.push(value);
                    }
                }
                _ => {}
            }
        }

        let mut scrollback = body.join("\n");
        if scrollback.is_empty()
            && let Some(session_id) = headers.session_id.as_deref()
            && let Some(captured) = self.capture_fallback(session_id)
        {
            headers.scrollback_length = Some(captured.len());
            scrollback = captured;
        }

        Ok(SessionContext {
            session_id: headers.session_id.ok_or(DecodeError::MissingField("session"))?,
            cwd: headers.cwd.ok_or(DecodeError::MissingField("cwd"))?,
            pane: headers.pane.ok_or(DecodeError::MissingField("pane"))?,
            last_activity: headers
                .last_activity
                .ok_or(DecodeError::MissingField("last activity"))?,
            scrollback_length: headers
                .scrollback_length
                .ok_or(DecodeError::MissingField("scrollback length"))?,
            scrollback,
        })
    }

    fn capture_fallback(&self, session_id: &str) -> Option<String> {
        let fallback = self.fallback.as_ref()?;
        match fallback.capture(session_id) {
            Some(text) if !text.is_empty() => {
                tracing::info!(
                    session_id,
                    chars = text.len(),
                    "retrieved scrollback directly from tmux"
                );
                Some(text)
            }
            _ => {
                tracing::warn!(session_id, "live scrollback capture unavailable");
                None
            }
        }
    }
}

fn parse_int<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, DecodeError> {
    value.parse().map_err(|_| DecodeError::InvalidInteger {
        field,
        value: value.to_string(),
    })
}

/// Render a context in the daemon's reply format.
pub fn encode_context(ctx: &SessionContext) -> String {
    format!(
        "Session: {}\nCWD: {}\nPane: {}\nLast Activity: {}\nScrollback Length: {}\nScrollback:\n{}\n",
        ctx.session_id,
        ctx.cwd,
        ctx.pane,
        ctx.last_activity,
        ctx.scrollback_length,
        ctx.scrollback
    )
}
