//! The dispatch engine: effective-method resolution, URI normalization,
//! middleware-then-route walking, and handler invocation.

use std::time::Instant;

use tracing::{debug, error, trace, warn};

use super::core::{RouteEntry, Router};
use crate::handler::Handler;
use crate::method::{self, METHOD_OVERRIDE_HEADER};
use crate::transport::Transport;

impl Router {
    /// Dispatch the request described by `transport`.
    ///
    /// Runs every matching before-middleware entry for the effective
    /// method, then the first matching primary route. When no primary
    /// route matches, not-found handling fires: the configured 404 handler
    /// if set, otherwise a generic `<protocol> 404 Not Found` status line
    /// through the transport.
    ///
    /// For a raw `HEAD` request the transport is told to capture body
    /// output before dispatch and discard it afterwards, and matching runs
    /// against the `GET` table.
    ///
    /// Returns whether any primary route matched.
    pub fn run(&self, transport: &mut dyn Transport) -> bool {
        self.execute(transport, Option::<fn()>::None)
    }

    /// Like [`run`], but invokes `finish` after dispatch when (and only
    /// when) a primary route matched.
    ///
    /// [`run`]: Router::run
    pub fn run_with_finish<F: FnOnce()>(&self, transport: &mut dyn Transport, finish: F) -> bool {
        self.execute(transport, Some(finish))
    }

    fn execute<F: FnOnce()>(&self, transport: &mut dyn Transport, finish: Option<F>) -> bool {
        let raw_method = transport.method().to_owned();
        let is_head = raw_method.eq_ignore_ascii_case("HEAD");
        if is_head {
            transport.begin_body_capture();
        }

        let override_value = transport.header(METHOD_OVERRIDE_HEADER).map(str::to_owned);
        let method = match method::effective_method(&raw_method, override_value.as_deref()) {
            Ok(method) => method,
            Err(err) => {
                warn!(method = %raw_method, error = %err, "unroutable request method");
                self.handle_not_found(transport);
                if is_head {
                    transport.discard_body_capture();
                }
                return false;
            }
        };

        let uri = self.current_uri(transport);
        debug!(method = %method, uri = %uri, "dispatch start");

        if let Some(entries) = self.before_routes.get(&method) {
            self.handle(entries, &uri, false);
        }

        let start = Instant::now();
        let handled = self
            .routes
            .get(&method)
            .map_or(0, |entries| self.handle(entries, &uri, true));
        let duration_us = start.elapsed().as_micros() as u64;

        if handled == 0 {
            warn!(method = %method, uri = %uri, duration_us = duration_us, "no route matched");
            self.handle_not_found(transport);
        } else {
            debug!(
                method = %method,
                uri = %uri,
                duration_us = duration_us,
                "request handled"
            );
            if let Some(finish) = finish {
                finish();
            }
        }

        if is_head {
            transport.discard_body_capture();
        }

        handled != 0
    }

    /// Walk `entries` in registration order against `uri`, invoking the
    /// handler of each match. Returns the number of entries handled.
    fn handle(&self, entries: &[RouteEntry], uri: &str, stop_after_first: bool) -> usize {
        let mut handled = 0;
        for entry in entries {
            trace!(pattern = %entry.pattern.as_str(), uri = %uri, "route match attempt");
            if let Some(params) = entry.pattern.extract(uri) {
                debug!(
                    pattern = %entry.pattern.as_str(),
                    uri = %uri,
                    params = ?params,
                    "route matched"
                );
                self.invoke(&entry.handler, &params);
                handled += 1;
                if stop_after_first {
                    break;
                }
            }
        }
        handled
    }

    fn invoke(&self, handler: &Handler, params: &[String]) {
        match handler {
            Handler::Callable(f) => f(params),
            Handler::Named { controller, method } => {
                let controller = self.qualified(controller);
                if let Err(err) = self.registry.invoke(&controller, method, params) {
                    // the match still counts; only the invocation is lost
                    error!(
                        controller = %controller,
                        method = %method,
                        error = %err,
                        "handler resolution failed"
                    );
                }
            }
        }
    }

    fn handle_not_found(&self, transport: &mut dyn Transport) {
        match &self.not_found {
            Some(handler) => self.invoke(handler, &[]),
            None => {
                let line = format!("{} 404 Not Found", transport.protocol());
                transport.send_status_line(&line);
            }
        }
    }

    fn qualified(&self, controller: &str) -> String {
        if self.namespace.is_empty() {
            controller.to_string()
        } else {
            format!("{}::{}", self.namespace, controller)
        }
    }

    /// The path dispatch matches against: the raw URI percent-decoded,
    /// stripped of the base path and query string, slash-trimmed, and
    /// given back exactly one leading slash.
    pub(crate) fn current_uri(&self, transport: &dyn Transport) -> String {
        let decoded = percent_decode(transport.request_uri());
        let base = self.resolved_base_path(transport);
        let relative = decoded.get(base.len()..).unwrap_or("");
        let relative = relative.split('?').next().unwrap_or("");
        format!("/{}", relative.trim_matches('/'))
    }

    /// The explicit base path when set, otherwise everything up to and
    /// including the last slash of the transport's script path.
    pub(crate) fn resolved_base_path(&self, transport: &dyn Transport) -> String {
        match &self.base_path {
            Some(path) => path.clone(),
            None => match transport.script_name().rsplit_once('/') {
                Some((dir, _)) => format!("{dir}/"),
                None => "/".to_string(),
            },
        }
    }
}

/// Percent-decode `raw`; a URI whose escapes do not decode to UTF-8 is
/// matched literally instead of failing the request.
fn percent_decode(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_owned(),
    }
}
