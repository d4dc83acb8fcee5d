//! Local HTTP stub for exercising [`NominatimGeocoder`](super::NominatimGeocoder)
//! without network access.
//!
//! [`StubServer`] binds an ephemeral port on `127.0.0.1` and answers a fixed
//! sequence of connections, one canned response each, recording the raw
//! request heads it received.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

/// Canned HTTP server answering a fixed number of requests.
///
/// # Example
///
/// ```
/// use bangalore_core::Geocoder;
/// use bangalore_data::nominatim::NominatimGeocoder;
/// use bangalore_data::nominatim::test_support::StubServer;
///
/// let server = StubServer::respond(200, "[]");
/// let geocoder = NominatimGeocoder::new(server.base_url()).expect("geocoder");
///
/// assert!(geocoder.search("Bengaluru").expect("search").is_empty());
/// assert!(server.request().starts_with("GET /search?"));
/// ```
#[derive(Debug)]
pub struct StubServer {
    addr: SocketAddr,
    handle: JoinHandle<Vec<String>>,
}

/// Alias kept for single-response tests.
pub type OneShotServer = StubServer;

impl StubServer {
    /// Answer one request with `status` and `body`.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot bind.
    #[must_use]
    pub fn respond(status: u16, body: &str) -> Self {
        Self::sequence(vec![(status, body.to_owned())])
    }

    /// Answer one request per entry, in order.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot bind.
    #[must_use]
    pub fn sequence(responses: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub listener");
        let addr = listener.local_addr().expect("stub listener address");
        let handle = thread::spawn(move || {
            responses
                .into_iter()
                .filter_map(|(status, body)| {
                    let (stream, _) = listener.accept().ok()?;
                    serve(stream, status, &body)
                })
                .collect()
        });
        Self { addr, handle }
    }

    /// Base URL to configure as the endpoint.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Wait for the only request and return its head.
    ///
    /// # Panics
    ///
    /// Panics if the server thread panicked or saw no request.
    #[must_use]
    pub fn request(self) -> String {
        self.requests()
            .into_iter()
            .next()
            .expect("stub server saw no request")
    }

    /// Wait for every scripted request and return their heads in order.
    ///
    /// # Panics
    ///
    /// Panics if the server thread panicked.
    #[must_use]
    pub fn requests(self) -> Vec<String> {
        self.handle.join().expect("stub server thread panicked")
    }
}

fn serve(mut stream: TcpStream, status: u16, body: &str) -> Option<String> {
    let mut head = Vec::new();
    let mut buf = [0_u8; 1024];
    while !head.windows(4).any(|window| window == b"\r\n\r\n") {
        let read = stream.read(&mut buf).ok()?;
        if read == 0 {
            break;
        }
        head.extend_from_slice(&buf[..read]);
    }
    let reply = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\n\
         Content-Length: {len}\r\nConnection: close\r\n\r\n{body}",
        reason = reason(status),
        len = body.len(),
    );
    stream.write_all(reply.as_bytes()).ok()?;
    stream.flush().ok()?;
    Some(String::from_utf8_lossy(&head).into_owned())
}

const fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    }
}
