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

use serde::Deserialize;
use serde::Serialize;

/// RemoteError is the error envelope returned by the storage backend.
///
/// The server reports failures as xml like:
///
/// ```xml
/// <?xml version="1.0" encoding="utf-8"?>
/// <d:error xmlns:d="DAV:" xmlns:s="http://sabredav.org/ns">
///   <s:exception>Sabre\DAV\Exception\Conflict</s:exception>
///   <s:message>Parent node does not exist</s:message>
/// </d:error>
/// ```
///
/// The name of the enclosing element is ignored, only `exception` and
/// `message` are read. An empty `exception` means the body is not an error.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteError {
    exception: String,
    message: String,
}

impl RemoteError {
    /// Create a new remote error.
    pub fn new(exception: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            exception: exception.into(),
            message: message.into(),
        }
    }

    /// Name of the exception raised by the server.
    pub fn exception(&self) -> &str {
        &self.exception
    }

    /// Human readable message attached to the exception.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check if this envelope reports an error.
    pub fn is_error(&self) -> bool {
        !self.exception.is_empty()
    }
}
