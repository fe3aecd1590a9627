//! Minimal HTTP/1.1 server imitating the catalog endpoint for integration tests.
//!
//! `GET /tiles?...&page=N` returns the N-th configured page body (an empty
//! page past the end, or when `Accept-Language` is missing, like the live
//! API). `GET /files/<name>` returns the configured artifact bytes or 404.
//! The first `fail_first` hits of any path answer 503. Page bodies may
//! contain [`BASE`], which is replaced with the server's own base URL.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

const EMPTY_PAGE: &str = r#"{"apps":{"dataList":[],"count":0}}"#;

/// Placeholder for `http://127.0.0.1:<port>/` inside page bodies.
pub const BASE: &str = "{{BASE}}";

/// Link to an artifact served by whichever server serves the page.
pub fn file_link(name: &str) -> String {
    format!("{}files/{}", BASE, name)
}

#[derive(Debug, Default, Clone)]
pub struct ServerSpec {
    /// JSON bodies for pages 1..=len.
    pub pages: Vec<String>,
    /// Artifact name -> body.
    pub files: HashMap<String, Vec<u8>>,
    /// Path (without query) -> number of leading requests answered with 503.
    pub fail_first: HashMap<String, u32>,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: Option<String>,
    pub accept_language: Option<String>,
}

pub struct CatalogServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl CatalogServer {
    pub fn tiles_url(&self) -> String {
        format!("{}tiles?product=power-bi-visuals", self.base_url)
    }

    pub fn file_url(&self, name: &str) -> String {
        format!("{}files/{}", self.base_url, name)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Page numbers requested, in order.
    pub fn page_requests(&self) -> Vec<u32> {
        self.requests()
            .iter()
            .filter(|r| r.path == "/tiles")
            .filter_map(|r| page_param(r.query.as_deref()?))
            .collect()
    }

    pub fn file_requests(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|r| r.path.starts_with("/files/"))
            .map(|r| r.path)
            .collect()
    }
}

/// Starts a server in a background thread. The server runs until the process exits.
pub fn start(spec: ServerSpec) -> CatalogServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let hits: Arc<Mutex<HashMap<String, u32>>> = Arc::new(Mutex::new(HashMap::new()));
    let base_url = format!("http://127.0.0.1:{}/", port);
    let mut spec = spec;
    for page in spec.pages.iter_mut() {
        *page = page.replace(BASE, &base_url);
    }
    let spec = Arc::new(spec);
    let log = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let spec = Arc::clone(&spec);
            let log = Arc::clone(&log);
            let hits = Arc::clone(&hits);
            thread::spawn(move || handle(stream, &spec, &log, &hits));
        }
    });
    CatalogServer { base_url, requests }
}

fn handle(
    mut stream: std::net::TcpStream,
    spec: &ServerSpec,
    log: &Mutex<Vec<RecordedRequest>>,
    hits: &Mutex<HashMap<String, u32>>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let recorded = match parse_request(request) {
        Some(r) => r,
        None => return,
    };
    log.lock().unwrap().push(recorded.clone());

    let hit = {
        let mut hits = hits.lock().unwrap();
        let h = hits.entry(recorded.path.clone()).or_insert(0);
        *h += 1;
        *h
    };
    if hit <= spec.fail_first.get(&recorded.path).copied().unwrap_or(0) {
        respond(&mut stream, "503 Service Unavailable", "text/plain", b"busy");
        return;
    }

    if recorded.path == "/tiles" {
        let page = recorded.query.as_deref().and_then(page_param).unwrap_or(0);
        let body = if recorded.accept_language.is_none() || page == 0 {
            EMPTY_PAGE
        } else {
            spec.pages
                .get(page as usize - 1)
                .map(String::as_str)
                .unwrap_or(EMPTY_PAGE)
        };
        respond(&mut stream, "200 OK", "application/json", body.as_bytes());
        return;
    }

    if let Some(name) = recorded.path.strip_prefix("/files/") {
        match spec.files.get(name) {
            Some(body) => respond(&mut stream, "200 OK", "application/octet-stream", body),
            None => respond(&mut stream, "404 Not Found", "text/plain", b"missing"),
        }
        return;
    }

    respond(&mut stream, "404 Not Found", "text/plain", b"missing");
}

fn respond(stream: &mut std::net::TcpStream, status: &str, content_type: &str, body: &[u8]) {
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        content_type,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
}

fn parse_request(request: &str) -> Option<RecordedRequest> {
    let mut lines = request.lines();
    let target = lines.next()?.split_whitespace().nth(1)?.to_string();
    let (path, query) = match target.split_once('?') {
        Some((p, q)) => (p.to_string(), Some(q.to_string())),
        None => (target.clone(), None),
    };
    let mut accept_language = None;
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("accept-language") {
                accept_language = Some(value.trim().to_string());
            }
        }
    }
    Some(RecordedRequest {
        path,
        query,
        accept_language,
    })
}

fn page_param(query: &str) -> Option<u32> {
    query
        .split('&')
        .filter_map(|kv| kv.split_once('='))
        .find(|(k, _)| *k == "page")
        .and_then(|(_, v)| v.parse().ok())
}

/// JSON body for one catalog page.
pub fn page_json(entries: &[(&str, String, &str, bool)]) -> String {
    let items: Vec<String> = entries
        .iter()
        .map(|(title, link, publisher, certified)| {
            let tags = if *certified {
                r#"[{"Id":"PowerBICertified"},{"Id":"Visualization"}]"#
            } else {
                r#"[{"Id":"Visualization"}]"#
            };
            format!(
                r#"{{"title":"{}","downloadLink":"{}","publisher":"{}","tags":{}}}"#,
                title, link, publisher, tags
            )
        })
        .collect();
    format!(
        r#"{{"apps":{{"dataList":[{}],"count":{}}}}}"#,
        items.join(","),
        entries.len()
    )
}
