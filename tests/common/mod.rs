//! Shared test fixtures: a recording transport and a call log.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use switchback::Transport;

/// A transport stub that records everything the dispatcher pushes at it.
pub struct RecordingTransport {
    pub method: String,
    pub uri: String,
    pub script_name: String,
    pub protocol: String,
    headers: HashMap<String, String>,
    pub status_lines: Vec<String>,
    pub captures_begun: usize,
    pub captures_discarded: usize,
}

impl RecordingTransport {
    pub fn new(method: &str, uri: &str) -> Self {
        RecordingTransport {
            method: method.to_string(),
            uri: uri.to_string(),
            script_name: "/index.cgi".to_string(),
            protocol: "HTTP/1.1".to_string(),
            headers: HashMap::new(),
            status_lines: Vec::new(),
            captures_begun: 0,
            captures_discarded: 0,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    pub fn with_script_name(mut self, script_name: &str) -> Self {
        self.script_name = script_name.to_string();
        self
    }
}

impl Transport for RecordingTransport {
    fn method(&self) -> &str {
        &self.method
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    fn request_uri(&self) -> &str {
        &self.uri
    }

    fn script_name(&self) -> &str {
        &self.script_name
    }

    fn protocol(&self) -> &str {
        &self.protocol
    }

    fn begin_body_capture(&mut self) {
        self.captures_begun += 1;
    }

    fn discard_body_capture(&mut self) {
        self.captures_discarded += 1;
    }

    fn send_status_line(&mut self, line: &str) {
        self.status_lines.push(line.to_string());
    }
}

/// Shared log of handler invocations, in call order.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// A handler closure that appends `label` to the log on every call.
pub fn logging_handler(log: &CallLog, label: &str) -> impl Fn(&[String]) + Send + Sync + 'static {
    let log = Arc::clone(log);
    let label = label.to_string();
    move |params: &[String]| {
        let entry = if params.is_empty() {
            label.clone()
        } else {
            format!("{}({})", label, params.join(","))
        };
        log.lock().unwrap().push(entry);
    }
}

pub fn entries(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}
