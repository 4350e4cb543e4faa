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

use serde::Deserialize;
use serde::Serialize;

use crate::raw::*;
use crate::*;

/// Config for [`Client`].
#[derive(Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
#[non_exhaustive]
pub struct ClientConfig {
    /// Endpoint of the storage backend, for example `https://dav.example.com/remote.php/dav/`.
    ///
    /// Paths given to operations are resolved against it, so the trailing
    /// slash matters.
    pub endpoint: Option<String>,
    /// Username for basic auth.
    pub username: Option<String>,
    /// Password for basic auth.
    pub password: Option<String>,
    /// Fail operations whose response status is not a success.
    ///
    /// Disabled by default: the client only trusts the xml error envelope
    /// and ignores status codes entirely.
    pub check_status: bool,
}

impl Debug for ClientConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut d = f.debug_struct("ClientConfig");
        d.field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("check_status", &self.check_status);

        d.finish_non_exhaustive()
    }
}

impl ClientConfig {
    /// Deserialize from an iterator of string pairs.
    ///
    /// Keys are case-insensitive, bool values accept `true/false`, `on/off`
    /// and `1/0`.
    #[allow(clippy::should_implement_trait)]
    pub fn from_iter(iter: impl IntoIterator<Item = (String, String)>) -> Result<Self> {
        let cfg = ConfigDeserializer::new(iter.into_iter().collect());

        Self::deserialize(cfg).map_err(|err| {
            Error::new(ErrorKind::ConfigInvalid, "failed to deserialize config").set_source(err)
        })
    }

    /// Convert this configuration into a client builder.
    pub fn into_builder(self) -> ClientBuilder {
        ClientBuilder::from_config(self)
    }
}
