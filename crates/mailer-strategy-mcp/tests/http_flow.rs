use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use serde_json::{json, Value};

fn reserve_addr() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("reserve addr");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    addr.to_string()
}

fn wait_for_http(addr: &str) {
    for _ in 0..80 {
        if TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(25));
    }
    panic!("http server not ready on {addr}");
}

fn send_http(addr: &str, method: &str, path: &str, body: &str) -> String {
    let mut stream = TcpStream::connect(addr).expect("connect http");
    let request = format!(
        "{method} {path} HTTP/1.1\r\nHost: {addr}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    stream.write_all(request.as_bytes()).expect("write request");
    stream.flush().expect("flush");
    let mut buf = String::new();
    stream.read_to_string(&mut buf).expect("read response");
    buf
}

fn response_body(response: &str) -> &str {
    response.split("\r\n\r\n").nth(1).unwrap_or("")
}

fn response_header(response: &str) -> &str {
    response.split("\r\n\r\n").next().unwrap_or("")
}

struct Daemon(Child);

impl Drop for Daemon {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

fn spawn_http(addr: &str, numeric_mode: &str) -> Daemon {
    let child = Command::new(env!("CARGO_BIN_EXE_mailer-strategyd"))
        .env("MAILER_STRATEGYD_TRANSPORT", "http")
        .env("MAILER_STRATEGY_HTTP_ADDR", addr)
        .env("MAILER_STRATEGY_NUMERIC_MODE", numeric_mode)
        .env("RUST_LOG", "warn")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .spawn()
        .expect("spawn mailer-strategyd");
    wait_for_http(addr);
    Daemon(child)
}

#[test]
fn http_health_and_strategy_call_work() {
    let addr = reserve_addr();
    let _daemon = spawn_http(&addr, "lenient");

    let health = send_http(&addr, "GET", "/health", "");
    assert!(response_header(&health).starts_with("HTTP/1.1 200"));
    let body: Value = serde_json::from_str(response_body(&health)).expect("health json");
    assert_eq!(body["status"], json!("ok"));

    let rpc = json!({
        "jsonrpc": "2.0",
        "id": 9,
        "method": "tools/call",
        "params": {
            "name": "calculate_strategy",
            "arguments": {
                "form": {
                    "revenue": "4000000",
                    "aov": "30",
                    "industry": "food",
                    "target_audience": "general",
                    "budget_constraint": true,
                    "has_repeat_customers": true
                }
            }
        }
    });
    let resp = send_http(&addr, "POST", "/mcp", &rpc.to_string());
    assert!(response_header(&resp).starts_with("HTTP/1.1 200"));
    let body: Value = serde_json::from_str(response_body(&resp)).expect("rpc json");
    assert_eq!(body["id"], json!(9));
    let rec = &body["result"]["structuredContent"]["recommendation"];
    assert_eq!(rec["format"], json!("postcard"));
    assert_eq!(rec["audience_size"], json!(50_000));

    let summary = send_http(&addr, "GET", "/metrics/summary", "");
    let body: Value = serde_json::from_str(response_body(&summary)).expect("metrics json");
    assert_eq!(
        body["tools"]["calculate_strategy"]["calls"].as_u64(),
        Some(1)
    );

    let missing = send_http(&addr, "GET", "/elsewhere", "");
    assert!(response_header(&missing).starts_with("HTTP/1.1 404"));
}

#[test]
fn http_strict_mode_rejects_unparseable_revenue() {
    let addr = reserve_addr();
    let _daemon = spawn_http(&addr, "strict");

    let rpc = json!({
        "jsonrpc": "2.0",
        "id": 3,
        "method": "tools/call",
        "params": {
            "name": "calculate_strategy",
            "arguments": {"form": {"revenue": "", "aov": "80"}}
        }
    });
    let resp = send_http(&addr, "POST", "/mcp", &rpc.to_string());
    let body: Value = serde_json::from_str(response_body(&resp)).expect("rpc json");
    assert_eq!(body["error"]["code"], json!(-32602));

    let bad = send_http(&addr, "POST", "/mcp", "{not json");
    assert!(response_header(&bad).starts_with("HTTP/1.1 400"));
}
