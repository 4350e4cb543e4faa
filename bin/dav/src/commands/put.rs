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
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use davcloud::Client;

#[derive(Debug, clap::Parser)]
#[command(name = "put", about = "Upload a local file", disable_version_flag = true)]
pub struct PutCmd {
    /// Local file to upload.
    #[arg(value_parser = clap::value_parser!(PathBuf))]
    pub source: PathBuf,
    /// Remote destination of the file.
    #[arg()]
    pub destination: String,
}

impl PutCmd {
    pub fn run(&self, client: &Client) -> Result<()> {
        let bs = fs::read(&self.source)
            .with_context(|| format!("failed to read {}", self.source.display()))?;
        let size = bs.len();

        client.upload(bs, &self.destination)?;
        println!("Uploaded: {} ({size} bytes)", self.destination);
        Ok(())
    }
}
