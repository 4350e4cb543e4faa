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

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

use anyhow::anyhow;
use anyhow::Result;
use davcloud::Client;
use davcloud::ClientConfig;
use log::debug;

/// Prefix of the environment variables read by [`Config::load_from_env`].
const ENV_PREFIX: &str = "dav_";

/// Config holds the raw client options collected from every source.
///
/// Keys are lower case, values are kept as strings until the client is
/// built, so every source goes through the same parsing.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    options: HashMap<String, String>,
}

impl Config {
    /// Load options from both the local config file and environment
    /// variables, environment variables have higher precedence.
    pub fn load(fp: Option<&Path>) -> Result<Config> {
        let cfg = match fp {
            Some(fp) => Config::load_from_file(fp)?,
            None => Config::default(),
        };
        Ok(cfg.merge(Config::load_from_env()))
    }

    /// Parse a local config file.
    ///
    /// - If the config file is not present, a default Config is returned.
    pub fn load_from_file(config_path: &Path) -> Result<Config> {
        if !config_path.exists() {
            debug!("config file {} not found, skipped", config_path.display());
            return Ok(Config::default());
        }

        let data = fs::read_to_string(config_path)?;
        let table: toml::Table = toml::from_str(&data)?;

        let mut options = HashMap::with_capacity(table.len());
        for (k, v) in table {
            let v = match v {
                toml::Value::String(s) => s,
                toml::Value::Boolean(b) => b.to_string(),
                toml::Value::Integer(i) => i.to_string(),
                _ => return Err(anyhow!("unsupported value for '{k}' in config file")),
            };
            options.insert(k.to_lowercase(), v);
        }
        Ok(Config { options })
    }

    /// Load config from environment variables.
    ///
    /// The format of each environment variable should be `DAV_{OPTION}`,
    /// such as `DAV_ENDPOINT`, `DAV_CHECK_STATUS`.
    pub fn load_from_env() -> Config {
        Config::load_from_vars(env::vars())
    }

    pub(crate) fn load_from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Config {
        let options = vars
            .into_iter()
            .filter_map(|(k, v)| {
                k.to_lowercase()
                    .strip_prefix(ENV_PREFIX)
                    .filter(|k| !k.is_empty())
                    .map(|k| (k.to_string(), v))
            })
            .collect();
        Config { options }
    }

    /// Merge `other` into self, values in `other` win.
    pub fn merge(mut self, other: Config) -> Config {
        self.options.extend(other.options);
        self
    }

    /// Override a single option, empty values are ignored.
    pub fn set(&mut self, key: &str, value: Option<&str>) {
        if let Some(v) = value.filter(|v| !v.is_empty()) {
            self.options.insert(key.to_string(), v.to_string());
        }
    }

    /// Build the client from collected options.
    pub fn client(&self) -> Result<Client> {
        let cfg = ClientConfig::from_iter(self.options.clone())?;
        Ok(cfg.into_builder().build()?)
    }
}
