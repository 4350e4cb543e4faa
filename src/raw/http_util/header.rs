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

use base64::engine::general_purpose;
use base64::Engine;
use http::HeaderValue;

use crate::*;

/// format authorization header by basic auth.
///
/// Empty username or password are encoded as is, the server decides
/// whether to accept them.
pub fn format_authorization_by_basic(username: &str, password: &str) -> String {
    let value = general_purpose::STANDARD.encode(format!("{username}:{password}"));

    format!("Basic {value}")
}

/// Build header value from given string.
///
/// The value is marked as sensitive so that it will never be logged.
pub fn build_sensitive_header_value(v: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(v).map_err(|e| {
        Error::new(
            ErrorKind::ConfigInvalid,
            "header value contains invalid characters",
        )
        .with_operation("http_util::build_sensitive_header_value")
        .set_source(e)
    })?;
    value.set_sensitive(true);

    Ok(value)
}
