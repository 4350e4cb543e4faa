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

use std::mem;

use anyhow::anyhow;
use bytes::Bytes;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::raw::*;
use crate::*;

/// ErrorBodyPolicy decides how a response body is checked for the error
/// envelope, per operation.
///
/// | Operation  | Policy              |
/// |------------|---------------------|
/// | `mkdir`    | `WrapWithContext`   |
/// | `delete`   | `BarePropagate`     |
/// | `upload`   | `WrapWithContext`   |
/// | `download` | `SwallowAndSucceed` |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorBodyPolicy {
    /// Empty body is a success. A body that isn't an envelope fails with
    /// [`ErrorKind::MalformedErrorBody`] carrying the raw body.
    WrapWithContext,
    /// Empty body is a success. A body that isn't an envelope fails with
    /// the bare xml deserialize error.
    BarePropagate,
    /// Every body is parsed, even an empty one. A body that isn't an
    /// envelope is payload and never an error.
    SwallowAndSucceed,
}

impl From<Operation> for ErrorBodyPolicy {
    fn from(op: Operation) -> Self {
        match op {
            Operation::Mkdir | Operation::Upload => ErrorBodyPolicy::WrapWithContext,
            Operation::Delete => ErrorBodyPolicy::BarePropagate,
            Operation::Download => ErrorBodyPolicy::SwallowAndSucceed,
        }
    }
}

impl ErrorBodyPolicy {
    /// Check response body against the error envelope.
    ///
    /// Returns `Ok(())` if the body does not report an error under this policy.
    pub fn check(self, bs: &Bytes) -> Result<()> {
        if bs.is_empty() && self != ErrorBodyPolicy::SwallowAndSucceed {
            return Ok(());
        }

        let remote = match deserialize_remote_error(bs) {
            Ok(remote) => remote,
            Err(err) => {
                return match self {
                    ErrorBodyPolicy::WrapWithContext => Err(Error::new(
                        ErrorKind::MalformedErrorBody,
                        "error during xml unmarshal for response",
                    )
                    .with_context("body", String::from_utf8_lossy(bs))
                    .set_source(err)),
                    ErrorBodyPolicy::BarePropagate => Err(new_xml_deserialize_error(err)),
                    ErrorBodyPolicy::SwallowAndSucceed => Ok(()),
                }
            }
        };

        if remote.is_error() {
            return Err(Error::new_remote(remote));
        }

        Ok(())
    }
}

/// Deserialize the error envelope from given body.
///
/// Bodies that are not valid utf-8 are rejected before reaching the xml parser.
///
/// Only the direct `exception` and `message` children of the root element
/// are read, matched by local name. Their text is kept verbatim, including
/// surrounding whitespace, and a repeated field overwrites the previous one.
/// Anything before the root element and after its end is ignored.
pub fn deserialize_remote_error(bs: &[u8]) -> anyhow::Result<RemoteError> {
    let s = std::str::from_utf8(bs)?;

    let mut reader = Reader::from_str(s);
    reader.config_mut().trim_text(false);

    loop {
        match reader.read_event()? {
            Event::Start(_) => break,
            Event::Empty(_) => return Ok(RemoteError::default()),
            Event::Eof => return Err(anyhow!("no root element found")),
            _ => {}
        }
    }

    let mut exception = String::new();
    let mut message = String::new();
    let mut field = None;
    let mut text = String::new();
    let mut depth = 1;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                if depth == 2 {
                    field = Field::parse(e.local_name().as_ref());
                    text.clear();
                }
            }
            Event::Empty(e) if depth == 1 => match Field::parse(e.local_name().as_ref()) {
                Some(Field::Exception) => exception.clear(),
                Some(Field::Message) => message.clear(),
                None => {}
            },
            Event::Text(t) if depth == 2 && field.is_some() => text.push_str(&t.unescape()?),
            Event::CData(t) if depth == 2 && field.is_some() => {
                text.push_str(std::str::from_utf8(&t)?)
            }
            Event::End(_) => {
                if depth == 2 {
                    match field.take() {
                        Some(Field::Exception) => exception = mem::take(&mut text),
                        Some(Field::Message) => message = mem::take(&mut text),
                        None => {}
                    }
                }

                depth -= 1;
                if depth == 0 {
                    return Ok(RemoteError::new(exception, message));
                }
            }
            Event::Eof => return Err(anyhow!("root element is not closed")),
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Exception,
    Message,
}

impl Field {
    fn parse(name: &[u8]) -> Option<Self> {
        match name {
            b"exception" => Some(Field::Exception),
            b"message" => Some(Field::Message),
            _ => None,
        }
    }
}
