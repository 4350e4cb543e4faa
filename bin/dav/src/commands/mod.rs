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

//! Commands provides the implementation of each commands.
//!
//! Each submodule represents a single command and exports a `clap::Parser`
//! struct with a `run` method taking the [`GlobalArgs`].

pub mod get;
pub mod mkdir;
pub mod put;
pub mod rm;

use std::path::PathBuf;

use anyhow::Result;
use davcloud::Client;

use crate::config::Config;

/// Options shared by every command.
#[derive(Debug, clap::Args)]
pub struct GlobalArgs {
    /// Path to the config file, defaults to `<config dir>/dav/config.toml`.
    #[arg(long, global = true, value_parser = clap::value_parser!(PathBuf))]
    pub config: Option<PathBuf>,
    /// Endpoint that paths are resolved against.
    #[arg(long, global = true)]
    pub endpoint: Option<String>,
    /// Username for basic auth.
    #[arg(long, global = true)]
    pub username: Option<String>,
    /// Password for basic auth.
    #[arg(long, global = true)]
    pub password: Option<String>,
}

impl GlobalArgs {
    /// Build the client from the config file, environment and flags.
    pub fn client(&self) -> Result<Client> {
        let config_path = self.config.clone().or_else(default_config_path);

        let mut cfg = Config::load(config_path.as_deref())?;
        cfg.set("endpoint", self.endpoint.as_deref());
        cfg.set("username", self.username.as_deref());
        cfg.set("password", self.password.as_deref());
        cfg.client()
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("dav/config.toml"))
}

#[derive(Debug, clap::Subcommand)]
pub enum DavSubcommand {
    Mkdir(mkdir::MkdirCmd),
    Rm(rm::RmCmd),
    Put(put::PutCmd),
    Get(get::GetCmd),
}

impl DavSubcommand {
    pub fn run(&self, global: &GlobalArgs) -> Result<()> {
        let client = global.client()?;

        match self {
            Self::Mkdir(cmd) => cmd.run(&client),
            Self::Rm(cmd) => cmd.run(&client),
            Self::Put(cmd) => cmd.run(&client),
            Self::Get(cmd) => cmd.run(&client),
        }
    }
}
