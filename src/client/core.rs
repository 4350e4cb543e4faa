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

use std::fmt;
use std::fmt::Debug;
use std::fmt::Formatter;

use bytes::Bytes;
use http::header;
use http::HeaderValue;
use http::Request;
use http::Response;
use log::debug;
use url::Url;

use crate::raw::*;
use crate::*;

pub struct ClientCore {
    pub endpoint: Url,
    pub username: String,
    pub password: String,
    pub authorization: HeaderValue,
    pub check_status: bool,
    pub client: HttpClient,
}

impl Debug for ClientCore {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCore")
            .field("endpoint", &self.endpoint.as_str())
            .field("username", &self.username)
            .field("check_status", &self.check_status)
            .finish_non_exhaustive()
    }
}

impl ClientCore {
    /// Resolve the given path as an url reference against the endpoint.
    ///
    /// An absolute url replaces the endpoint entirely, a relative one is
    /// resolved following RFC 3986.
    ///
    /// References that a strict parser would refuse are rejected up front:
    /// control characters, malformed percent escapes, an empty scheme or a
    /// colon in the first segment of a relative reference.
    pub fn resolve(&self, op: Operation, path: &str) -> Result<Url> {
        if let Err(reason) = check_reference(path) {
            return Err(Error::new(ErrorKind::InvalidPath, reason)
                .with_operation(op)
                .with_context("endpoint", &self.endpoint)
                .with_context("path", path));
        }

        self.endpoint.join(path).map_err(|err| {
            Error::new(ErrorKind::InvalidPath, "path can't be resolved against endpoint")
                .with_operation(op)
                .with_context("endpoint", &self.endpoint)
                .with_context("path", path)
                .set_source(err)
        })
    }

    /// Send the request for given operation and buffer the response.
    pub fn dav_send(
        &self,
        op: Operation,
        path: &str,
        body: Bytes,
    ) -> Result<(Url, Response<Bytes>)> {
        let url = self.resolve(op, path)?;

        let req = Request::builder()
            .method(op.method())
            .uri(url.as_str())
            .header(header::AUTHORIZATION, self.authorization.clone())
            .body(body)
            .map_err(|err| new_request_build_error(err).with_operation(op))?;

        debug!("{op}: {} {url}", op.method());
        let resp = self
            .client
            .send(req)
            .map_err(|err| err.with_operation(op).with_context("url", &url))?;
        debug!(
            "{op}: {url} responded {} with {} bytes",
            resp.status(),
            resp.body().len()
        );

        Ok((url, resp))
    }

    /// Decode the response of given operation.
    ///
    /// The body is checked against the error envelope following the
    /// operation's [`ErrorBodyPolicy`], then the status is checked if
    /// enabled.
    pub fn dav_decode(&self, op: Operation, url: &Url, resp: Response<Bytes>) -> Result<Bytes> {
        let (parts, body) = resp.into_parts();

        ErrorBodyPolicy::from(op)
            .check(&body)
            .map_err(|err| err.with_operation(op).with_context("url", url))?;

        if self.check_status && !parts.status.is_success() {
            return Err(
                Error::new(ErrorKind::UnexpectedStatus, "response status is not success")
                    .with_operation(op)
                    .with_context("url", url)
                    .with_context("status", parts.status),
            );
        }

        Ok(body)
    }
}

/// `Url::join` is lenient: it drops tabs and newlines and keeps malformed
/// percent escapes. Refuse them before any request is built.
fn check_reference(path: &str) -> Result<(), &'static str> {
    if path.bytes().any(|b| b < 0x20 || b == 0x7f) {
        return Err("path contains control character");
    }

    let (rest, fragment) = path.split_once('#').unwrap_or((path, ""));
    // Query escapes are left to the server.
    let before_query = rest.split_once('?').map_or(rest, |(v, _)| v);
    if !has_valid_escapes(before_query) || !has_valid_escapes(fragment) {
        return Err("path contains invalid percent escape");
    }

    if !has_scheme(rest)?
        && before_query
            .split('/')
            .next()
            .is_some_and(|segment| segment.contains(':'))
    {
        return Err("first path segment contains colon");
    }

    Ok(())
}

fn has_valid_escapes(s: &str) -> bool {
    let bs = s.as_bytes();

    let mut idx = 0;
    while idx < bs.len() {
        if bs[idx] != b'%' {
            idx += 1;
            continue;
        }

        let is_hex = |i: usize| bs.get(i).is_some_and(|b| b.is_ascii_hexdigit());
        if !is_hex(idx + 1) || !is_hex(idx + 2) {
            return false;
        }
        idx += 3;
    }

    true
}

fn has_scheme(s: &str) -> Result<bool, &'static str> {
    for (idx, b) in s.bytes().enumerate() {
        match b {
            b'a'..=b'z' | b'A'..=b'Z' => {}
            b'0'..=b'9' | b'+' | b'-' | b'.' if idx > 0 => {}
            b':' if idx == 0 => return Err("path has empty scheme"),
            b':' => return Ok(true),
            _ => return Ok(false),
        }
    }

    Ok(false)
}
