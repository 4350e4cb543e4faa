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

//! davcloud is a blocking client for WebDAV-like storage backends that
//! report failures through an xml error envelope.
//!
//! - [`Client`]: the four storage operations `mkdir`, `delete`, `upload`
//!   and `download`.
//! - [`Error`]: every failure, with [`ErrorKind::RemoteException`] carrying
//!   the server's [`RemoteError`].
//! - [`raw`]: the transport seam, plug a custom [`raw::HttpSend`] here.
//!
//! # Quick Start
//!
//! ```no_run
//! use davcloud::Client;
//! use davcloud::ErrorKind;
//! use davcloud::Result;
//!
//! fn main() -> Result<()> {
//!     let client = Client::new("https://dav.example.com/remote.php/dav/", "alice", "secret")?;
//!
//!     // Create a collection
//!     client.mkdir("notes/")?;
//!
//!     // Write data
//!     client.upload("Hello, World!", "notes/hello.txt")?;
//!
//!     // Read data
//!     let bs = client.download("notes/hello.txt")?;
//!     assert_eq!(bs, "Hello, World!");
//!
//!     // Delete
//!     match client.delete("notes/hello.txt") {
//!         Err(err) if err.kind() == ErrorKind::RemoteException => {
//!             println!("server refused: {:?}", err.remote())
//!         }
//!         v => v?,
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Status codes
//!
//! By default the client never looks at the response status: a body that is
//! not an error envelope is a success, even for `404 Not Found`. Enable
//! [`ClientBuilder::check_status`] to fail on non-success statuses too.

// Make sure all our public APIs have docs.
#![warn(missing_docs)]
// Deny unused qualifications.
#![deny(unused_qualifications)]

// Private module with public types, they will be accessed via `davcloud::Xxxx`
mod types;
pub use types::*;

mod client;
pub use client::*;

pub mod raw;
