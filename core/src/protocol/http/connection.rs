/*
 * connection.rs
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

//! HTTP connection: one TCP or TLS stream carrying a single HTTP/1.1 exchange.

use bytes::BytesMut;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadBuf};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::client::TlsStream as TokioTlsStream;

use crate::protocol::http::parser::{H1ResponseHandler, ResponseParser};
use crate::protocol::http::request::{Method, RequestBuilder};
use crate::protocol::http::response::Response;
use crate::protocol::http::ResponseHandler;

/// Plain TCP or TLS. Implements AsyncRead + AsyncWrite.
pub enum HttpStream {
    Plain(TcpStream),
    Tls(Box<TokioTlsStream<TcpStream>>),
}

impl AsyncRead for HttpStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match &mut *self {
            HttpStream::Plain(s) => Pin::new(s).poll_read(cx, buf),
            HttpStream::Tls(s) => Pin::new(s.as_mut()).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for HttpStream {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match &mut *self {
            HttpStream::Plain(s) => Pin::new(s).poll_write(cx, buf),
            HttpStream::Tls(s) => Pin::new(s.as_mut()).poll_write(cx, buf),
        }
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match &mut *self {
            HttpStream::Plain(s) => Pin::new(s).poll_flush(cx),
            HttpStream::Tls(s) => Pin::new(s.as_mut()).poll_flush(cx),
        }
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match &mut *self {
            HttpStream::Plain(s) => Pin::new(s).poll_shutdown(cx),
            HttpStream::Tls(s) => Pin::new(s.as_mut()).poll_shutdown(cx),
        }
    }
}

/// Bridges parser events to the caller's `ResponseHandler`. Headers are
/// held back until the status is known so `ok`/`error` comes first.
struct H1Driver<'a> {
    handler: &'a mut (dyn ResponseHandler + Send),
}

impl H1ResponseHandler for H1Driver<'_> {
    fn status(&mut self, code: u16, reason: Option<&str>) {
        let response = match reason {
            Some(r) => Response::with_reason(code, r),
            None => Response::new(code),
        };
        if response.is_success() {
            self.handler.ok(response);
        } else {
            self.handler.error(response);
        }
    }

    fn header(&mut self, name: &str, value: &str) {
        self.handler.header(name, value);
    }

    fn headers_complete(&mut self, has_body: bool) {
        if has_body {
            self.handler.start_body();
        }
    }

    fn body_chunk(&mut self, data: &[u8]) {
        self.handler.body_chunk(data);
    }

    fn trailer(&mut self, name: &str, value: &str) {
        self.handler.header(name, value);
    }

    fn complete(&mut self) {
        self.handler.end_body();
        self.handler.complete();
    }
}

pub struct HttpConnection {
    stream: HttpStream,
    host: String,
    port: u16,
    secure: bool,
    read_timeout: Duration,
    read_buf: BytesMut,
    parser: ResponseParser,
}

impl HttpConnection {
    pub fn new(stream: HttpStream, host: String, port: u16, secure: bool, read_timeout: Duration) -> Self {
        Self {
            stream,
            host,
            port,
            secure,
            read_timeout,
            read_buf: BytesMut::with_capacity(8192),
            parser: ResponseParser::new(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    fn host_header(&self) -> String {
        let default_port = if self.secure { 443 } else { 80 };
        if self.port == default_port {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Write the request and drive the handler until the response is
    /// complete. Transport errors are reported to `failed` and returned.
    pub async fn send(
        &mut self,
        request: &RequestBuilder,
        handler: &mut (dyn ResponseHandler + Send),
    ) -> io::Result<()> {
        let result = self.exchange(request, handler).await;
        if let Err(e) = &result {
            handler.failed(e);
        }
        result
    }

    async fn exchange(
        &mut self,
        request: &RequestBuilder,
        handler: &mut (dyn ResponseHandler + Send),
    ) -> io::Result<()> {
        self.parser.reset(request.method == Method::Head);
        self.read_buf.clear();

        let bytes = request.to_bytes(&self.host_header());
        self.stream.write_all(&bytes).await?;
        self.stream.flush().await?;

        let mut driver = H1Driver { handler };
        let mut tmp = [0u8; 8192];
        while !self.parser.is_done() {
            let n = timeout(self.read_timeout, self.stream.read(&mut tmp))
                .await
                .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "HTTP read timed out"))??;
            if n == 0 {
                self.parser.eof(&mut driver)?;
                break;
            }
            self.read_buf.extend_from_slice(&tmp[..n]);
            self.parser.receive(&mut self.read_buf, &mut driver)?;
        }
        Ok(())
    }

    /// Close the write side; errors are ignored as the exchange is over.
    pub async fn close(mut self) {
        let _ = self.stream.shutdown().await;
    }
}
