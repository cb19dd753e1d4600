/*
 * http_integration.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of flattr-rs.
 *
 * flattr-rs is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * flattr-rs is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with flattr-rs.  If not, see <http://www.gnu.org/licenses/>.
 */

//! The HTTP/1.1 client against raw server replies.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use flattr_core::protocol::http::{BufferedResponse, HttpClient, Method, RequestBuilder, Timeouts};

/// Accept one connection, read the request head, write `reply` verbatim.
async fn raw_server(reply: &'static [u8]) -> (u16, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut data = Vec::new();
        let mut tmp = [0u8; 1024];
        while !data.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut tmp).await.unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&tmp[..n]);
        }
        socket.write_all(reply).await.unwrap();
        let _ = socket.shutdown().await;
        String::from_utf8_lossy(&data).into_owned()
    });
    (port, handle)
}

async fn fetch(port: u16, request: RequestBuilder) -> BufferedResponse {
    let mut conn = HttpClient::connect("127.0.0.1", port, false, Timeouts::default())
        .await
        .unwrap();
    let mut response = BufferedResponse::default();
    conn.send(&request, &mut response).await.unwrap();
    conn.close().await;
    response
}

#[tokio::test]
async fn test_chunked_body_with_trailer() {
    let (port, server) = raw_server(
        b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\nContent-Type: application/json\r\n\r\n\
          5\r\n[{\"a\"\r\n7;ext=1\r\n:1},{}]\r\n0\r\nX-Trailer: done\r\n\r\n",
    )
    .await;
    let response = fetch(port, RequestBuilder::new(Method::Get, "/things/1")).await;
    assert!(response.complete);
    assert!(response.is_success());
    assert_eq!(response.body, b"[{\"a\":1},{}]");
    assert_eq!(response.header("X-Trailer"), Some("done"));

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /things/1 HTTP/1.1\r\n"), "{}", request);
    assert!(request.contains(&format!("Host: 127.0.0.1:{}\r\n", port)), "{}", request);
}

#[tokio::test]
async fn test_body_until_close() {
    let (port, _server) = raw_server(b"HTTP/1.0 503 Service Unavailable\r\n\r\nmaintenance").await;
    let response = fetch(port, RequestBuilder::new(Method::Get, "/")).await;
    assert!(!response.is_success());
    assert_eq!(response.status, 503);
    assert_eq!(response.status_line, "HTTP 503 Service Unavailable");
    assert_eq!(response.body, b"maintenance");
}

#[tokio::test]
async fn test_post_body_sent_with_length() {
    let (port, server) = raw_server(b"HTTP/1.1 204 No Content\r\n\r\n").await;
    let mut request = RequestBuilder::new(Method::Post, "/flattr");
    request
        .header("Content-Type", "application/json")
        .body(b"{\"url\":\"http://example.com\"}".to_vec());
    let response = fetch(port, request).await;
    assert_eq!(response.status, 204);
    assert!(response.body.is_empty());
    let seen = server.await.unwrap();
    assert!(seen.contains("Content-Length: 28\r\n"), "{}", seen);
}

#[tokio::test]
async fn test_truncated_body_is_error() {
    let (port, _server) = raw_server(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\nshort").await;
    let mut conn = HttpClient::connect("127.0.0.1", port, false, Timeouts::default())
        .await
        .unwrap();
    let mut response = BufferedResponse::default();
    let result = conn.send(&RequestBuilder::new(Method::Get, "/"), &mut response).await;
    assert!(result.is_err());
    assert!(!response.complete);
}

/// Real TLS round trip. Run with `--ignored` when online.
#[tokio::test]
#[ignore]
async fn test_https_get() {
    let mut conn = HttpClient::connect("api.flattr.com", 443, true, Timeouts::default())
        .await
        .unwrap();
    let mut response = BufferedResponse::default();
    let mut request = RequestBuilder::new(Method::Get, "/rest/v2/categories");
    request.header("Accept", "application/json");
    conn.send(&request, &mut response).await.unwrap();
    println!("{} ({} bytes)", response.status_line, response.body.len());
    assert!(response.status > 0);
}
