// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt::Debug;
use std::fmt::Formatter;
use std::io::Read;
use std::ops::Deref;
use std::sync::Arc;

use bytes::Bytes;
use http::Method;
use http::Request;
use http::Response;
use log::debug;

use super::new_response_consume_error;
use crate::*;

/// HttpSender is a type erased [`HttpSend`].
pub type HttpSender = Arc<dyn HttpSend>;

/// A blocking HTTP client shared by all operations of a [`Client`].
///
/// # Notes
///
/// * The client never turns a non-success status into an error, the
///   response is handed back as is and callers decide what it means.
/// * The whole response body is buffered before returning.
#[derive(Clone)]
pub struct HttpClient {
    sender: HttpSender,
}

/// We don't want users to know details about our clients.
impl Debug for HttpClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient").finish()
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Create a new http client backed by a default [`ureq::Agent`].
    pub fn new() -> Self {
        Self::with(ureq::AgentBuilder::new().build())
    }

    /// Construct `Self` with given [`HttpSend`].
    ///
    /// Use this to configure timeouts, proxies or tls via a prepared
    /// [`ureq::Agent`], or to plug in a test double.
    pub fn with(sender: impl HttpSend) -> Self {
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Send a request and buffer the response.
    pub fn send(&self, req: Request<Bytes>) -> Result<Response<Bytes>> {
        self.sender.send(req)
    }
}

/// HttpSend is the trait to send a request in blocking way.
///
/// User should implement this trait to provide their own http client.
pub trait HttpSend: Send + Sync + 'static {
    /// Send a request and return the response with its body fully read.
    ///
    /// Implementations must return responses of every status code as `Ok`,
    /// only failures to talk to the server should be returned as `Err`.
    fn send(&self, req: Request<Bytes>) -> Result<Response<Bytes>>;
}

impl<T: HttpSend + ?Sized> HttpSend for Arc<T> {
    fn send(&self, req: Request<Bytes>) -> Result<Response<Bytes>> {
        self.deref().send(req)
    }
}

impl HttpSend for ureq::Agent {
    fn send(&self, req: Request<Bytes>) -> Result<Response<Bytes>> {
        let (parts, body) = req.into_parts();
        let url = parts.uri.to_string();

        let mut ur = self.request(parts.method.as_str(), &url);
        for (k, v) in parts.headers.iter() {
            let v = v.to_str().map_err(|err| {
                Error::new(ErrorKind::Unexpected, "header value is not visible ascii")
                    .with_operation("http_util::HttpClient::send")
                    .with_context("header", k)
                    .set_source(err)
            })?;
            ur = ur.set(k.as_str(), v);
        }

        // PUT always carries a body, even an empty one.
        let result = if body.is_empty() && parts.method != Method::PUT {
            ur.call()
        } else {
            ur.send_bytes(&body)
        };

        let resp = match result {
            Ok(resp) => resp,
            Err(ureq::Error::Status(_code, resp)) => resp,
            Err(ureq::Error::Transport(transport)) => {
                let is_temporary = matches!(
                    transport.kind(),
                    ureq::ErrorKind::Dns | ureq::ErrorKind::ConnectionFailed | ureq::ErrorKind::Io
                );

                return Err(Error::new(ErrorKind::Transport, "send blocking request")
                    .with_operation("http_util::HttpClient::send")
                    .with_temporary(is_temporary)
                    .set_source(transport));
            }
        };
        debug!("sync client: {} {} got status {}", parts.method, url, resp.status());

        let mut hr = Response::builder().status(resp.status());
        for name in resp.headers_names() {
            if let Some(value) = resp.header(&name) {
                hr = hr.header(name.as_str(), value);
            }
        }

        let mut buf = Vec::new();
        resp.into_reader()
            .read_to_end(&mut buf)
            .map_err(new_response_consume_error)?;

        hr.body(Bytes::from(buf)).map_err(|err| {
            Error::new(ErrorKind::Unexpected, "building http response")
                .with_operation("http_util::HttpClient::send")
                .set_source(err)
        })
    }
}
