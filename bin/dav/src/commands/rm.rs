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

use anyhow::Result;
use davcloud::Client;

#[derive(Debug, clap::Parser)]
#[command(name = "rm", about = "Remove a file or folder", disable_version_flag = true)]
pub struct RmCmd {
    #[arg()]
    pub target: String,
}

impl RmCmd {
    pub fn run(&self, client: &Client) -> Result<()> {
        client.delete(&self.target)?;
        println!("Delete: {}", self.target);
        Ok(())
    }
}
