#![allow(dead_code)]

//! Shared helpers for integration tests: a real HTTP server in front of a
//! mux (or a canned responder) on an ephemeral port.

use restmux::mux::Mux;
use std::io::Read;
use std::sync::Arc;
use std::thread::JoinHandle;

pub struct TestServer {
    pub base_url: String,
    server: Arc<tiny_http::Server>,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    /// Serve every request through `mux`.
    pub fn serve_mux(mux: Mux) -> Self {
        let mux = Arc::new(mux);
        Self::serve_raw(move |request| respond_with_mux(&mux, request))
    }

    /// Hand every request to `handler`, which must respond to it.
    pub fn serve_raw<F>(handler: F) -> Self
    where
        F: Fn(tiny_http::Request) + Send + 'static,
    {
        let server = Arc::new(tiny_http::Server::http("127.0.0.1:0").unwrap());
        let addr = server.server_addr().to_ip().unwrap();
        let worker = Arc::clone(&server);
        let handle = std::thread::spawn(move || {
            for request in worker.incoming_requests() {
                handler(request);
            }
        });
        Self {
            base_url: format!("http://{addr}"),
            server,
            handle: Some(handle),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn respond_with_mux(mux: &Mux, mut request: tiny_http::Request) {
    let mut body = Vec::new();
    request.as_reader().read_to_end(&mut body).unwrap();

    let mut builder = http::Request::builder()
        .method(request.method().as_str())
        .uri(request.url());
    for header in request.headers() {
        builder = builder.header(header.field.as_str().as_str(), header.value.as_str());
    }
    let response = mux.serve(builder.body(body).unwrap());

    let (parts, body) = response.into_parts();
    let mut reply = tiny_http::Response::from_data(body).with_status_code(parts.status.as_u16());
    for (name, value) in &parts.headers {
        if name == http::header::CONTENT_LENGTH {
            continue;
        }
        let header = tiny_http::Header::from_bytes(name.as_str().as_bytes(), value.as_bytes())
            .unwrap();
        reply = reply.with_header(header);
    }
    request.respond(reply).unwrap();
}

/// Respond with a fixed status, content type (omitted when empty) and body.
pub fn canned(
    status: u16,
    content_type: &'static str,
    body: &'static str,
) -> impl Fn(tiny_http::Request) + Send + 'static {
    move |request: tiny_http::Request| {
        let mut reply =
            tiny_http::Response::from_data(body.as_bytes().to_vec()).with_status_code(status);
        if !content_type.is_empty() {
            let header =
                tiny_http::Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes())
                    .unwrap();
            reply = reply.with_header(header);
        }
        request.respond(reply).unwrap();
    }
}
