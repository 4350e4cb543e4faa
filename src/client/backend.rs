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
use std::sync::Arc;

use bytes::Bytes;
use log::debug;
use url::Url;

use super::core::ClientCore;
use crate::raw::*;
use crate::*;

/// Builder for [`Client`].
///
/// # Example
///
/// ```no_run
/// use davcloud::Client;
/// use davcloud::Result;
///
/// fn main() -> Result<()> {
///     let client = Client::builder()
///         .endpoint("https://dav.example.com/remote.php/dav/files/alice/")
///         .username("alice")
///         .password("secret")
///         .build()?;
///
///     client.mkdir("backups/")?;
///     Ok(())
/// }
/// ```
#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    http_client: Option<HttpClient>,
}

impl Debug for ClientBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut d = f.debug_struct("ClientBuilder");

        d.field("config", &self.config);

        d.finish_non_exhaustive()
    }
}

impl ClientBuilder {
    pub(super) fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            http_client: None,
        }
    }

    /// Set endpoint for the client.
    ///
    /// For example: `https://example.com/dav/`
    ///
    /// The endpoint is stored verbatim, callers are responsible for the
    /// trailing slash.
    pub fn endpoint(mut self, endpoint: &str) -> Self {
        self.config.endpoint = if endpoint.is_empty() {
            None
        } else {
            Some(endpoint.to_string())
        };

        self
    }

    /// set the username for basic auth
    ///
    /// default: empty username
    pub fn username(mut self, username: &str) -> Self {
        if !username.is_empty() {
            self.config.username = Some(username.to_owned());
        }
        self
    }

    /// set the password for basic auth
    ///
    /// default: empty password
    pub fn password(mut self, password: &str) -> Self {
        if !password.is_empty() {
            self.config.password = Some(password.to_owned());
        }
        self
    }

    /// Fail operations whose response status is not a success.
    ///
    /// default: disabled
    pub fn check_status(mut self, enabled: bool) -> Self {
        self.config.check_status = enabled;
        self
    }

    /// Specify the http client that used by this client.
    pub fn http_client(mut self, client: HttpClient) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Consume the builder to build a client.
    pub fn build(self) -> Result<Client> {
        debug!("client build started: {:?}", &self);

        let endpoint = match &self.config.endpoint {
            Some(v) => v,
            None => return Err(Error::new(ErrorKind::InvalidEndpoint, "endpoint is empty")),
        };
        let endpoint = Url::parse(endpoint).map_err(|err| {
            Error::new(ErrorKind::InvalidEndpoint, "endpoint is invalid")
                .with_context("endpoint", endpoint)
                .set_source(err)
        })?;

        let username = self.config.username.unwrap_or_default();
        let password = self.config.password.unwrap_or_default();
        let authorization =
            build_sensitive_header_value(&format_authorization_by_basic(&username, &password))?;

        let core = ClientCore {
            endpoint,
            username,
            password,
            authorization,
            check_status: self.config.check_status,
            client: self.http_client.unwrap_or_default(),
        };

        debug!("client build finished: {:?}", &core);
        Ok(Client {
            core: Arc::new(core),
        })
    }
}

/// Client talks to a WebDAV-like storage backend.
///
/// Every operation sends exactly one blocking request with basic auth and
/// buffers the whole response before deciding the result. Failures are
/// detected via the xml error envelope in the response body, see
/// [`RemoteError`].
///
/// `Client` is cheap to clone and can be shared across threads.
///
/// # Example
///
/// ```no_run
/// use davcloud::Client;
/// use davcloud::Result;
///
/// fn main() -> Result<()> {
///     let client = Client::new("https://dav.example.com/root/", "alice", "secret")?;
///
///     client.mkdir("photos/")?;
///     client.upload("Hello, World!", "photos/hello.txt")?;
///     let bs = client.download("photos/hello.txt")?;
///     assert_eq!(bs, "Hello, World!");
///     client.delete("photos/hello.txt")?;
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Client {
    core: Arc<ClientCore>,
}

impl Debug for Client {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").field("core", &self.core).finish()
    }
}

impl Client {
    /// Create a new client with given endpoint and credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidEndpoint`] if `endpoint` is not a valid url.
    pub fn new(endpoint: &str, username: &str, password: &str) -> Result<Self> {
        Self::builder()
            .endpoint(endpoint)
            .username(username)
            .password(password)
            .build()
    }

    /// Create a new [`ClientBuilder`].
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Endpoint that paths are resolved against.
    pub fn endpoint(&self) -> &Url {
        &self.core.endpoint
    }

    /// Username used for basic auth.
    pub fn username(&self) -> &str {
        &self.core.username
    }

    /// Password used for basic auth.
    pub fn password(&self) -> &str {
        &self.core.password
    }

    /// Create a collection at `folder` via `MKCOL`.
    pub fn mkdir(&self, folder: &str) -> Result<()> {
        self.call(Operation::Mkdir, folder, Bytes::new()).map(|_| ())
    }

    /// Delete the resource at `path` via `DELETE`.
    ///
    /// Deleting a missing resource is not special cased: it fails only if
    /// the server answers with an error envelope.
    pub fn delete(&self, path: &str) -> Result<()> {
        self.call(Operation::Delete, path, Bytes::new()).map(|_| ())
    }

    /// Upload `payload` to `dest` via `PUT`.
    ///
    /// The payload is sent as is, without content type.
    pub fn upload(&self, payload: impl Into<Bytes>, dest: &str) -> Result<()> {
        self.call(Operation::Upload, dest, payload.into()).map(|_| ())
    }

    /// Download the content at `path` via `GET`.
    ///
    /// Any body that is not an error envelope is returned as is, including
    /// an empty one.
    pub fn download(&self, path: &str) -> Result<Bytes> {
        self.call(Operation::Download, path, Bytes::new())
    }

    fn call(&self, op: Operation, path: &str, body: Bytes) -> Result<Bytes> {
        let (url, resp) = self.core.dav_send(op, path, body)?;

        self.core.dav_decode(op, &url, resp)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use http::header;
    use http::Method;
    use http::Request;
    use http::Response;
    use pretty_assertions::assert_eq;

    use super::*;

    const CONFLICT: &str =
        "<a><exception>Conflict</exception><message>already exists</message></a>";

    /// A png header followed by garbage, never valid xml.
    const BINARY: &[u8] = &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0xff, 0xfe, 0x00];

    /// MockSender replies with scripted responses and records every request.
    #[derive(Clone, Default)]
    struct MockSender {
        responses: Arc<Mutex<VecDeque<(u16, Bytes)>>>,
        requests: Arc<Mutex<Vec<Request<Bytes>>>>,
    }

    impl MockSender {
        fn reply(self, status: u16, body: impl Into<Bytes>) -> Self {
            self.responses
                .lock()
                .unwrap()
                .push_back((status, body.into()));
            self
        }

        fn requests(&self) -> Vec<Request<Bytes>> {
            self.requests.lock().unwrap().drain(..).collect()
        }
    }

    impl HttpSend for MockSender {
        fn send(&self, req: Request<Bytes>) -> Result<Response<Bytes>> {
            self.requests.lock().unwrap().push(req);

            let (status, body) = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or((200, Bytes::new()));
            Ok(Response::builder().status(status).body(body).unwrap())
        }
    }

    /// MemoryBackend is a tiny fake server keeping files in a map.
    #[derive(Default)]
    struct MemoryBackend {
        files: Mutex<HashMap<String, Bytes>>,
    }

    impl MemoryBackend {
        fn not_found(path: &str) -> Response<Bytes> {
            let body = format!(
                "<d:error xmlns:d=\"DAV:\" xmlns:s=\"http://sabredav.org/ns\">\
                 <s:exception>Sabre\\DAV\\Exception\\NotFound</s:exception>\
                 <s:message>{path} could not be located</s:message></d:error>"
            );
            Response::builder().status(404).body(body.into()).unwrap()
        }
    }

    impl HttpSend for MemoryBackend {
        fn send(&self, req: Request<Bytes>) -> Result<Response<Bytes>> {
            let path = req.uri().path().to_string();
            let mut files = self.files.lock().unwrap();

            let resp = match req.method().as_str() {
                "MKCOL" => {
                    files.insert(path, Bytes::new());
                    Response::builder().status(201).body(Bytes::new()).unwrap()
                }
                "PUT" => {
                    files.insert(path, req.into_body());
                    Response::builder().status(201).body(Bytes::new()).unwrap()
                }
                "GET" => match files.get(&path) {
                    Some(bs) => Response::builder().status(200).body(bs.clone()).unwrap(),
                    None => Self::not_found(&path),
                },
                "DELETE" => match files.remove(&path) {
                    Some(_) => Response::builder().status(204).body(Bytes::new()).unwrap(),
                    None => Self::not_found(&path),
                },
                _ => Response::builder().status(405).body(Bytes::new()).unwrap(),
            };
            Ok(resp)
        }
    }

    /// FailingSender can't reach the server at all.
    struct FailingSender;

    impl HttpSend for FailingSender {
        fn send(&self, _: Request<Bytes>) -> Result<Response<Bytes>> {
            Err(Error::new(ErrorKind::Transport, "send blocking request")
                .with_operation("http_util::HttpClient::send")
                .set_temporary())
        }
    }

    fn new_client(endpoint: &str, sender: impl HttpSend) -> Client {
        let _ = env_logger::builder().is_test(true).try_init();

        Client::builder()
            .endpoint(endpoint)
            .username("alice")
            .password("secret")
            .http_client(HttpClient::with(sender))
            .build()
            .expect("client must build")
    }

    #[test]
    fn test_client_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<Client>();
    }

    #[test]
    fn test_new_with_invalid_endpoint() {
        for endpoint in ["", "not a url", "https://[::1/"] {
            let err = Client::new(endpoint, "alice", "secret").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidEndpoint, "{endpoint}");
        }
    }

    #[test]
    fn test_new_keeps_components() {
        let client = Client::new("https://h/root", "alice", "secret").unwrap();

        assert_eq!(client.endpoint().as_str(), "https://h/root");
        assert_eq!(client.username(), "alice");
        assert_eq!(client.password(), "secret");
        assert!(!format!("{client:?}").contains("secret"));
    }

    #[test]
    fn test_from_config() {
        let client = ClientConfig::from_iter([
            ("endpoint".to_string(), "https://h/root/".to_string()),
            ("username".to_string(), "alice".to_string()),
        ])
        .unwrap()
        .into_builder()
        .build()
        .unwrap();

        assert_eq!(client.endpoint().as_str(), "https://h/root/");
        assert_eq!(client.username(), "alice");
        assert_eq!(client.password(), "");
    }

    #[test]
    fn test_resolve_url_reference() {
        let cases = vec![
            ("https://h/root/", "a/b", "https://h/root/a/b"),
            ("https://h/root/", "dir/", "https://h/root/dir/"),
            ("https://h/root/", "", "https://h/root/"),
            ("https://h/root/", "../up", "https://h/up"),
            ("https://h/root/", "/abs/x", "https://h/abs/x"),
            ("https://h/root/", "https://other/x", "https://other/x"),
            ("https://h/root", "a/b", "https://h/a/b"),
        ];

        for (endpoint, path, expected) in cases {
            let sender = MockSender::default();
            let client = new_client(endpoint, sender.clone());

            client.mkdir(path).unwrap();

            let reqs = sender.requests();
            assert_eq!(reqs.len(), 1);
            assert_eq!(reqs[0].uri().to_string(), expected, "{endpoint} + {path}");
        }
    }

    #[test]
    fn test_invalid_path_sends_nothing() {
        let sender = MockSender::default();
        let client = new_client("https://h/root/", sender.clone());

        let err = client.mkdir("http://[::1/x").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidPath);
        assert_eq!(err.operation(), "mkdir");
        assert_eq!(err.context("path"), Some("http://[::1/x"));
        assert!(sender.requests().is_empty());
    }

    #[test]
    fn test_malformed_reference_sends_nothing() {
        let sender = MockSender::default();
        let client = new_client("https://h/root/", sender.clone());

        for path in ["a%zz", "dir/a%2", "a\nb", ":x"] {
            let err = client.mkdir(path).unwrap_err();

            assert_eq!(err.kind(), ErrorKind::InvalidPath, "{path}");
            assert_eq!(err.operation(), "mkdir");
            assert_eq!(err.context("path"), Some(path));
        }
        assert!(sender.requests().is_empty());
    }

    #[test]
    fn test_request_shape() {
        let sender = MockSender::default();
        let client = new_client("https://h/root/", sender.clone());

        client.mkdir("a/").unwrap();
        client.delete("a/b").unwrap();
        client.upload(&b"hello"[..], "a/b").unwrap();
        client.download("a/b").unwrap();

        let reqs = sender.requests();
        let methods: Vec<_> = reqs.iter().map(|r| r.method().clone()).collect();
        assert_eq!(
            methods,
            vec![
                Method::from_bytes(b"MKCOL").unwrap(),
                Method::DELETE,
                Method::PUT,
                Method::GET
            ]
        );

        for req in &reqs {
            assert_eq!(
                req.headers().get(header::AUTHORIZATION).unwrap(),
                "Basic YWxpY2U6c2VjcmV0"
            );
        }

        assert!(reqs[0].body().is_empty());
        assert!(reqs[1].body().is_empty());
        assert_eq!(reqs[2].body(), &Bytes::from_static(b"hello"));
        assert!(reqs[3].body().is_empty());
    }

    #[test]
    fn test_remote_exception() {
        let sender = MockSender::default()
            .reply(409, CONFLICT)
            .reply(409, CONFLICT)
            .reply(409, CONFLICT)
            .reply(409, CONFLICT);
        let client = new_client("https://h/root/", sender);

        let errs = vec![
            ("mkdir", client.mkdir("a/").unwrap_err()),
            ("delete", client.delete("a/").unwrap_err()),
            ("upload", client.upload("x", "a/x").unwrap_err()),
            ("download", client.download("a/x").unwrap_err()),
        ];

        for (op, err) in errs {
            assert_eq!(err.kind(), ErrorKind::RemoteException, "{op}");
            assert_eq!(err.operation(), op);
            let remote = err.remote().unwrap();
            assert_eq!(remote.exception(), "Conflict");
            assert_eq!(remote.message(), "already exists");
        }
    }

    #[test]
    fn test_empty_body_is_success_regardless_of_status() {
        let sender = MockSender::default()
            .reply(404, "")
            .reply(500, "")
            .reply(403, "")
            .reply(404, "");
        let client = new_client("https://h/root/", sender);

        client.mkdir("a/").unwrap();
        client.delete("a/").unwrap();
        client.upload("x", "a/x").unwrap();
        assert_eq!(client.download("a/x").unwrap(), Bytes::new());
    }

    #[test]
    fn test_binary_body() {
        let sender = MockSender::default()
            .reply(200, BINARY)
            .reply(200, BINARY)
            .reply(200, BINARY)
            .reply(200, BINARY);
        let client = new_client("https://h/root/", sender);

        let err = client.mkdir("a/").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedErrorBody);
        assert_eq!(err.context("body"), Some(&*String::from_utf8_lossy(BINARY)));

        let err = client.delete("a/").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedErrorBody);
        assert_eq!(err.message(), "deserialize xml");
        assert_eq!(err.context("body"), None);

        let err = client.upload("x", "a/x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedErrorBody);
        assert_eq!(err.context("body"), Some(&*String::from_utf8_lossy(BINARY)));

        let bs = client.download("a/x").unwrap();
        assert_eq!(bs, Bytes::from_static(BINARY));
    }

    #[test]
    fn test_download_envelope_without_exception_is_payload() {
        let body = "<a><exception></exception><message>hi</message></a>";
        let sender = MockSender::default().reply(200, body);
        let client = new_client("https://h/root/", sender);

        assert_eq!(client.download("a.xml").unwrap(), body);
    }

    #[test]
    fn test_check_status() {
        let sender = MockSender::default()
            .reply(404, "")
            .reply(500, CONFLICT)
            .reply(404, "not found")
            .reply(201, "");
        let client = Client::builder()
            .endpoint("https://h/root/")
            .check_status(true)
            .http_client(HttpClient::with(sender))
            .build()
            .unwrap();

        let err = client.mkdir("a/").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedStatus);
        assert_eq!(err.context("status"), Some("404 Not Found"));

        let err = client.delete("a/").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RemoteException);

        let err = client.download("a/x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedStatus);

        client.upload("x", "a/x").unwrap();
    }

    #[test]
    fn test_transport_error() {
        let client = new_client("https://h/root/", FailingSender);

        let err = client.download("a/x").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.operation(), "download");
        assert_eq!(err.context("called"), Some("http_util::HttpClient::send"));
        assert_eq!(err.context("url"), Some("https://h/root/a/x"));
        assert!(err.is_temporary());
    }

    #[test]
    fn test_round_trip() {
        let client = new_client("https://h/root/", MemoryBackend::default());
        let payload = Bytes::from_static(BINARY);

        client.mkdir("photos/").unwrap();
        client.upload(payload.clone(), "photos/a.png").unwrap();
        assert_eq!(client.download("photos/a.png").unwrap(), payload);

        client.delete("photos/a.png").unwrap();
        let err = client.download("photos/a.png").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RemoteException);
        assert_eq!(
            err.remote().unwrap().exception(),
            r"Sabre\DAV\Exception\NotFound"
        );
    }

    #[test]
    fn test_delete_missing_resource() {
        let client = new_client("https://h/root/", MemoryBackend::default());

        let err = client.delete("missing.txt").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::RemoteException);
        assert_eq!(
            err.remote().unwrap().message(),
            "/root/missing.txt could not be located"
        );
    }

    #[test]
    fn test_shared_across_threads() {
        let client = new_client("https://h/root/", MemoryBackend::default());

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let client = client.clone();
                std::thread::spawn(move || {
                    let path = format!("file-{i}");
                    client.upload(path.clone(), &path).unwrap();
                    client.download(&path).unwrap()
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), format!("file-{i}"));
        }
    }
}
