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

//! The main dav command-line interface
//!
//! `dav` talks to a WebDAV-like storage backend: it can create folders,
//! upload and download files and delete resources.

use anyhow::Result;
use dav::commands::DavSubcommand;
use dav::commands::GlobalArgs;

#[derive(Debug, clap::Parser)]
#[command(about, version)]
pub struct Dav {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    subcommand: DavSubcommand,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli: Dav = clap::Parser::parse();
    cli.subcommand.run(&cli.global)?;
    Ok(())
}
