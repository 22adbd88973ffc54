//! The transport boundary.
//!
//! The router never touches sockets or response I/O. Everything it needs
//! from the HTTP layer (raw method, headers, request URI, the entry
//! script's path, the protocol string) arrives through the [`Transport`]
//! trait, and the two things it pushes back out (a generic not-found status
//! line, the begin/discard body-capture signals around `HEAD` requests) go
//! through it too.
//!
//! [`CgiTransport`] is the shipped implementation: a request context built
//! from CGI/1.1-style variables, constructible from an explicit variable
//! list for tests or from the process environment.

use std::collections::HashMap;
use std::io::{self, Write};

use anyhow::Context;
use tracing::debug;

/// What the dispatch engine requires of the HTTP layer.
///
/// Header *name* lookup must be case-insensitive, per HTTP; implementations
/// typically normalize names to lowercase at construction.
pub trait Transport {
    /// Raw request method as it arrived on the wire (e.g. `HEAD`).
    fn method(&self) -> &str;

    /// Look up a request header by case-insensitive name.
    fn header(&self, name: &str) -> Option<&str>;

    /// Raw request URI, still percent-encoded, query string included.
    fn request_uri(&self) -> &str;

    /// Path of the entry script, used for base-path auto-detection.
    fn script_name(&self) -> &str;

    /// Declared protocol string (e.g. `HTTP/1.1`), used for the generic
    /// not-found status line.
    fn protocol(&self) -> &str;

    /// Start capturing body output. Called before dispatching a raw `HEAD`
    /// request; the captured output is discarded afterwards.
    fn begin_body_capture(&mut self) {}

    /// Throw away output captured since [`begin_body_capture`].
    ///
    /// [`begin_body_capture`]: Transport::begin_body_capture
    fn discard_body_capture(&mut self) {}

    /// Emit a raw status line (e.g. `HTTP/1.1 404 Not Found`).
    fn send_status_line(&mut self, line: &str);
}

/// A request context assembled from CGI/1.1 variables.
///
/// `REQUEST_METHOD` and `REQUEST_URI` are required; `SCRIPT_NAME` defaults
/// to empty and `SERVER_PROTOCOL` to `HTTP/1.1`. Header variables
/// (`HTTP_*`, plus the `CONTENT_TYPE`/`CONTENT_LENGTH` specials) are
/// normalized to lowercase hyphenated names, so `HTTP_X_HTTP_METHOD_OVERRIDE`
/// is found by a lookup for `X-HTTP-Method-Override`.
///
/// Body output written through [`write_body`] is buffered in memory; the
/// capture capability truncates the buffer back to its pre-dispatch length,
/// which is all `HEAD` handling needs.
///
/// [`write_body`]: CgiTransport::write_body
pub struct CgiTransport {
    method: String,
    request_uri: String,
    script_name: String,
    protocol: String,
    headers: HashMap<String, String>,
    body: Vec<u8>,
    capture_from: Option<usize>,
    status_lines: Vec<String>,
}

impl CgiTransport {
    /// Build a request context from an explicit variable list.
    ///
    /// # Errors
    ///
    /// Fails when `REQUEST_METHOD` or `REQUEST_URI` is missing.
    pub fn from_vars<I, K, V>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut method = None;
        let mut request_uri = None;
        let mut script_name = None;
        let mut protocol = None;
        let mut headers = HashMap::new();

        for (key, value) in vars {
            let value = value.into();
            match key.as_ref() {
                "REQUEST_METHOD" => method = Some(value),
                "REQUEST_URI" => request_uri = Some(value),
                "SCRIPT_NAME" => script_name = Some(value),
                "SERVER_PROTOCOL" => protocol = Some(value),
                "CONTENT_TYPE" => {
                    headers.insert("content-type".to_string(), value);
                }
                "CONTENT_LENGTH" => {
                    headers.insert("content-length".to_string(), value);
                }
                key => {
                    if let Some(raw) = key.strip_prefix("HTTP_") {
                        headers.insert(raw.replace('_', "-").to_ascii_lowercase(), value);
                    }
                }
            }
        }

        let method = method.context("REQUEST_METHOD is not set")?;
        let request_uri = request_uri.context("REQUEST_URI is not set")?;

        debug!(
            method = %method,
            request_uri = %request_uri,
            header_count = headers.len(),
            "request context assembled"
        );

        Ok(CgiTransport {
            method,
            request_uri,
            script_name: script_name.unwrap_or_default(),
            protocol: protocol.unwrap_or_else(|| "HTTP/1.1".to_string()),
            headers,
            body: Vec::new(),
            capture_from: None,
            status_lines: Vec::new(),
        })
    }

    /// Build a request context from the process environment.
    ///
    /// # Errors
    ///
    /// Fails when the required CGI variables are missing.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(std::env::vars())
    }

    /// Append bytes to the response body buffer.
    pub fn write_body(&mut self, bytes: &[u8]) {
        self.body.extend_from_slice(bytes);
    }

    /// The buffered response body.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Status lines emitted so far, oldest first.
    #[must_use]
    pub fn status_lines(&self) -> &[String] {
        &self.status_lines
    }

    /// Write the buffered response (status lines, blank line, body) to `out`.
    ///
    /// # Errors
    ///
    /// Propagates any I/O error from `out`.
    pub fn flush_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for line in &self.status_lines {
            out.write_all(line.as_bytes())?;
            out.write_all(b"\r\n")?;
        }
        out.write_all(b"\r\n")?;
        out.write_all(&self.body)
    }
}

impl Transport for CgiTransport {
    fn method(&self) -> &str {
        &self.method
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    fn request_uri(&self) -> &str {
        &self.request_uri
    }

    fn script_name(&self) -> &str {
        &self.script_name
    }

    fn protocol(&self) -> &str {
        &self.protocol
    }

    fn begin_body_capture(&mut self) {
        self.capture_from = Some(self.body.len());
    }

    fn discard_body_capture(&mut self) {
        if let Some(mark) = self.capture_from.take() {
            self.body.truncate(mark);
        }
    }

    fn send_status_line(&mut self, line: &str) {
        self.status_lines.push(line.to_string());
    }
}
