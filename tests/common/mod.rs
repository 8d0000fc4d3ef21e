// tests/common/mod.rs
#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use fan_tracker::config::{DelayRange, FetchOptions};

/// Minimal HTTP/1.1 responder on 127.0.0.1. One request per connection.
pub struct MockServer {
    pub base: String,
    hits: Arc<Mutex<Vec<String>>>,
}

impl MockServer {
    /// `handler` maps a request path (with query) to (status, body).
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(&str) -> (u16, String) + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let hits = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&hits);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                serve(stream, &handler, &seen);
            }
        });
        Self { base, hits }
    }

    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }

    /// Fetch options pointing both bases here, without pacing.
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            api_base: self.base.clone(),
            space_base: self.base.clone(),
            timeout: Duration::from_secs(5),
            probe_delay: DelayRange::ZERO,
        }
    }
}

fn serve<F>(mut stream: TcpStream, handler: &F, seen: &Mutex<Vec<String>>)
where
    F: Fn(&str) -> (u16, String),
{
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    let head = String::from_utf8_lossy(&buf);
    let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
    seen.lock().unwrap().push(path.clone());

    let (status, body) = handler(&path);
    let resp = format!(
        "HTTP/1.1 {status} MOCK\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(resp.as_bytes());
    let _ = stream.flush();
}

pub fn follower_json(n: u64) -> String {
    format!(r#"{{"code":0,"data":{{"mid":1,"follower":{n}}}}}"#)
}

pub fn is_api(path: &str) -> bool {
    path.starts_with("/x/")
}
