//! In-process HTTP stub standing in for the Kong admin API in tests.
//!
//! One background thread accepts connections on `127.0.0.1:0`, answers each
//! request from a fixed route table and closes the connection. Every request
//! line and header set is recorded so tests can assert on what was sent.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Clone)]
pub enum Reply {
    Json(u16, String),
    /// Read the request, then drop the socket without answering.
    Hangup,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path:    String,
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

pub struct StubServer {
    pub base_url: String,
    requests:     Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    pub fn start(routes: Vec<(&str, Reply)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let routes: Vec<(String, Reply)> =
            routes.into_iter().map(|(p, r)| (p.to_string(), r)).collect();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                serve_one(stream, &routes, &log);
            }
        });

        Self { base_url, requests }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn serve_one(stream: TcpStream, routes: &[(String, Reply)], log: &Mutex<Vec<RecordedRequest>>) {
    let mut reader = BufReader::new(&stream);
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    let path = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or("")
        .to_string();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((k, v)) = line.split_once(':') {
            headers.push((k.trim().to_string(), v.trim().to_string()));
        }
    }
    log.lock().unwrap().push(RecordedRequest { path: path.clone(), headers });

    let reply = routes
        .iter()
        .find(|(p, _)| *p == path)
        .map(|(_, r)| r.clone())
        .unwrap_or_else(|| Reply::Json(404, r#"{"message":"Not found"}"#.to_string()));

    match reply {
        Reply::Hangup => {}
        Reply::Json(status, body) => {
            let response = format!(
                "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let mut stream = &stream;
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    }
}

/// A base URL on which nothing is listening.
pub fn refused_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
