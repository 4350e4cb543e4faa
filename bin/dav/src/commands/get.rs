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

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use davcloud::Client;

#[derive(Debug, clap::Parser)]
#[command(
    name = "get",
    about = "Download a file, to stdout if no local file given",
    disable_version_flag = true
)]
pub struct GetCmd {
    /// Remote file to download.
    #[arg()]
    pub target: String,
    /// Local file to write into.
    #[arg(value_parser = clap::value_parser!(PathBuf))]
    pub output: Option<PathBuf>,
}

impl GetCmd {
    pub fn run(&self, client: &Client) -> Result<()> {
        let bs = client.download(&self.target)?;

        match &self.output {
            Some(output) => {
                fs::write(output, &bs)
                    .with_context(|| format!("failed to write {}", output.display()))?;
                println!("Downloaded: {} ({} bytes)", self.target, bs.len());
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(&bs)?;
                stdout.flush()?;
            }
        }
        Ok(())
    }
}
